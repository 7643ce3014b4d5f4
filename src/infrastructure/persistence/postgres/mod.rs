pub mod access_policy;
pub mod delivery_note_store;
pub mod party_repository;
pub mod product_repository;

pub use access_policy::PostgresAccessPolicy;
pub use delivery_note_store::PostgresDeliveryNoteStore;
pub use party_repository::{PostgresAgentRepository, PostgresClientRepository};
pub use product_repository::PostgresProductRepository;

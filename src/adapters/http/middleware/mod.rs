pub mod auth;
pub mod request_id;

pub use auth::{AuthMiddleware, AuthUser, hash_token, require};
pub use request_id::{RequestId, RequestIdMiddleware};

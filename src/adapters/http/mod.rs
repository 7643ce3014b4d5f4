pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{CreateNoteRequest, ErrorResponse, NoteLineRequest, SuccessResponse, UpdateNoteRequest};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{AuthMiddleware, AuthUser, RequestId, RequestIdMiddleware, hash_token, require};
pub use routes::{configure_lookup_routes, configure_note_routes};

use super::value_objects::ValueObjectError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DeliveryError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Delivery note not found: {0}")]
  NoteNotFound(Uuid),

  #[error("Product not found: {0}")]
  ProductNotFound(Uuid),

  #[error("Agent not found: {0}")]
  AgentNotFound(Uuid),

  #[error("Client not found: {0}")]
  ClientNotFound(Uuid),

  #[error("Document number '{0}' already exists")]
  DocumentNumberAlreadyExists(String),

  #[error("Delivery note {note_id} was modified concurrently (expected version {expected})")]
  Conflict { note_id: Uuid, expected: i64 },

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

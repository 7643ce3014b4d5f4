use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// One line of a create/update request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NoteLineRequest {
  pub product_id: Uuid,

  /// Selling price per unit; must be non-negative
  #[validate(custom(function = validate_unit_price))]
  pub unit_price: Decimal,

  /// Whole units delivered
  #[validate(range(min = 1, message = "Quantity must be at least 1"))]
  pub quantity: i32,
}

fn validate_unit_price(value: &Decimal) -> Result<(), ValidationError> {
  if value.is_sign_negative() {
    return Err(ValidationError::new("unit_price").with_message("Unit price must be non-negative".into()));
  }
  Ok(())
}

/// Request to create a delivery note
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNoteRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Document number must be between 1 and 255 characters"
  ))]
  pub document_number: String,

  pub issued_date: NaiveDate,

  /// Whether this may be omitted depends on the `deliverer_required` setting
  #[validate(length(max = 255, message = "Deliverer name cannot exceed 255 characters"))]
  pub deliverer_name: Option<String>,

  pub agent_id: Uuid,
  pub client_id: Uuid,

  /// A note is only valid for creation with at least one line
  #[validate(length(min = 1, message = "At least one line is required"))]
  #[validate(nested)]
  pub lines: Vec<NoteLineRequest>,
}

/// Request to update a delivery note header and replace its full line set
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateNoteRequest {
  #[validate(length(
    min = 1,
    max = 255,
    message = "Document number must be between 1 and 255 characters"
  ))]
  pub document_number: String,

  pub issued_date: NaiveDate,

  #[validate(length(max = 255, message = "Deliverer name cannot exceed 255 characters"))]
  pub deliverer_name: Option<String>,

  pub agent_id: Uuid,
  pub client_id: Uuid,

  #[validate(length(min = 1, message = "At least one line is required"))]
  #[validate(nested)]
  pub lines: Vec<NoteLineRequest>,

  /// Version read when the note was loaded for editing
  pub version: i64,
}

/// Standard error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  pub error: String,
  pub message: String,
}

/// Standard success response for operations without a payload
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

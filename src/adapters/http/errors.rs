use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::access::AccessError;
use crate::domain::delivery::DeliveryError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication / authorization error (401 or 403)
  Auth(AuthErrorKind),

  /// Referenced entity does not exist (404 Not Found)
  NotFound(String),

  /// Duplicate document number or concurrent modification (409 Conflict)
  Conflict(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

#[derive(Debug, Serialize)]
pub enum AuthErrorKind {
  /// Missing or malformed Authorization header (401)
  InvalidToken,

  /// Token not recognized (401)
  UnknownToken,

  /// Authenticated but lacking the required capability (403)
  Forbidden(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authorization error: {:?}", kind),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::UnknownToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::Forbidden(_) => StatusCode::FORBIDDEN,
      },
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidToken => (
          "invalid_token",
          "Invalid or missing authorization token".to_string(),
        ),
        AuthErrorKind::UnknownToken => ("unknown_token", "Token not recognized".to_string()),
        AuthErrorKind::Forbidden(capability) => (
          "forbidden",
          format!("Missing required capability: {}", capability),
        ),
      },
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict(msg) => ("conflict", msg.clone()),
      ApiError::Internal(msg) => {
        // Don't expose internal error details to callers
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(ErrorResponse {
        error: error_type.to_string(),
        message,
      })
  }
}

impl From<DeliveryError> for ApiError {
  fn from(error: DeliveryError) -> Self {
    match error {
      DeliveryError::Validation(err) => ApiError::Validation(err.to_string()),
      DeliveryError::NoteNotFound(id) => {
        ApiError::NotFound(format!("Delivery note {} not found", id))
      }
      DeliveryError::ProductNotFound(id) => ApiError::NotFound(format!("Product {} not found", id)),
      DeliveryError::AgentNotFound(id) => ApiError::NotFound(format!("Agent {} not found", id)),
      DeliveryError::ClientNotFound(id) => ApiError::NotFound(format!("Client {} not found", id)),
      DeliveryError::DocumentNumberAlreadyExists(number) => {
        ApiError::Conflict(format!("Document number '{}' already exists", number))
      }
      DeliveryError::Conflict { note_id, .. } => ApiError::Conflict(format!(
        "Delivery note {} was modified concurrently; reload and retry",
        note_id
      )),
      DeliveryError::Repository(msg) => ApiError::Internal(msg),
      DeliveryError::Database(err) => ApiError::Internal(err.to_string()),
      DeliveryError::Internal(msg) => ApiError::Internal(msg),
    }
  }
}

impl From<AccessError> for ApiError {
  fn from(error: AccessError) -> Self {
    match error {
      AccessError::UnknownCapability(msg) => ApiError::Internal(msg),
      AccessError::Database(err) => ApiError::Internal(err.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use uuid::Uuid;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidToken).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::Forbidden("notes.edit".to_string())).status_code(),
      StatusCode::FORBIDDEN
    );
    assert_eq!(
      ApiError::NotFound("test".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Conflict("test".to_string()).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_delivery_error_mapping() {
    let id = Uuid::new_v4();

    let api_error: ApiError = DeliveryError::NoteNotFound(id).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError =
      DeliveryError::DocumentNumberAlreadyExists("BL-001".to_string()).into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = DeliveryError::Conflict {
      note_id: id,
      expected: 2,
    }
    .into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);
  }
}

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::delivery::{
  DeliveryError, DeliveryNoteLedger, DelivererName, DocumentNumber, LineInput, NoteData,
  Quantity, UnitPrice, ValueObjectError,
};

use super::NotePolicy;

#[derive(Debug, Deserialize)]
pub struct CreateNoteLineDto {
  pub product_id: Uuid,
  pub unit_price: Decimal,
  pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateNoteCommand {
  pub document_number: String,
  pub issued_date: NaiveDate,
  pub deliverer_name: Option<String>,
  pub agent_id: Uuid,
  pub client_id: Uuid,
  pub lines: Vec<CreateNoteLineDto>,
}

#[derive(Debug, Serialize)]
pub struct CreateNoteResponse {
  pub note_id: Uuid,
  pub document_number: String,
  pub total: Decimal,
  pub version: i64,
  pub created_at: DateTime<Utc>,
}

pub struct CreateNoteUseCase {
  ledger: Arc<DeliveryNoteLedger>,
  policy: NotePolicy,
}

impl CreateNoteUseCase {
  pub fn new(ledger: Arc<DeliveryNoteLedger>, policy: NotePolicy) -> Self {
    Self { ledger, policy }
  }

  pub async fn execute(
    &self,
    command: CreateNoteCommand,
  ) -> Result<CreateNoteResponse, DeliveryError> {
    let deliverer_name = self
      .policy
      .parse_deliverer(command.deliverer_name)
      .map_err(DeliveryError::Validation)?;
    let document_number = DocumentNumber::new(command.document_number)?;

    let lines = parse_lines(command.lines)?;

    let (note, _) = self
      .ledger
      .create_note(NoteData {
        document_number,
        issued_date: command.issued_date,
        deliverer_name,
        agent_id: command.agent_id,
        client_id: command.client_id,
        lines,
      })
      .await?;

    Ok(CreateNoteResponse {
      note_id: note.id,
      document_number: note.document_number.into_inner(),
      total: note.total,
      version: note.version,
      created_at: note.created_at,
    })
  }
}

pub(super) fn parse_lines(
  dtos: Vec<CreateNoteLineDto>,
) -> Result<Vec<LineInput>, ValueObjectError> {
  dtos
    .into_iter()
    .map(|dto| {
      Ok(LineInput {
        product_id: dto.product_id,
        unit_price: UnitPrice::new(dto.unit_price)?,
        quantity: Quantity::new(dto.quantity)?,
      })
    })
    .collect()
}

impl NotePolicy {
  /// Apply the `deliverer_required` policy: reject a missing value when the
  /// deployment requires one, validate it when present.
  pub(super) fn parse_deliverer(
    &self,
    value: Option<String>,
  ) -> Result<Option<DelivererName>, ValueObjectError> {
    match value {
      Some(name) => Ok(Some(DelivererName::new(name)?)),
      None if self.deliverer_required => Err(ValueObjectError::InvalidDelivererName(
        "Deliverer name is required".to_string(),
      )),
      None => Ok(None),
    }
  }
}

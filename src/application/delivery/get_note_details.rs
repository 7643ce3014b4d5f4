use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::delivery::{DeliveryError, DeliveryLine, DeliveryNote, DeliveryNoteLedger};

#[derive(Debug, Deserialize)]
pub struct GetNoteDetailsCommand {
  pub note_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct NoteLineDto {
  pub id: Uuid,
  pub product_id: Uuid,
  pub product_ref: String,
  pub unit_price: Decimal,
  pub quantity: i32,
  pub line_total: Decimal,
  pub line_order: i32,
}

impl From<DeliveryLine> for NoteLineDto {
  fn from(line: DeliveryLine) -> Self {
    Self {
      id: line.id,
      product_id: line.product_id,
      product_ref: line.product_ref,
      unit_price: line.unit_price.value(),
      quantity: line.quantity.value(),
      line_total: line.line_total,
      line_order: line.line_order,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct NoteDetailsResponse {
  pub note_id: Uuid,
  pub document_number: String,
  pub issued_date: NaiveDate,
  pub deliverer_name: Option<String>,
  pub agent_id: Uuid,
  pub client_id: Uuid,
  pub total: Decimal,
  pub version: i64,
  pub lines: Vec<NoteLineDto>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl NoteDetailsResponse {
  pub(super) fn from_note(note: DeliveryNote, lines: Vec<DeliveryLine>) -> Self {
    Self {
      note_id: note.id,
      document_number: note.document_number.into_inner(),
      issued_date: note.issued_date,
      deliverer_name: note.deliverer_name.map(|d| d.into_inner()),
      agent_id: note.agent_id,
      client_id: note.client_id,
      total: note.total,
      version: note.version,
      lines: lines.into_iter().map(NoteLineDto::from).collect(),
      created_at: note.created_at,
      updated_at: note.updated_at,
    }
  }
}

pub struct GetNoteDetailsUseCase {
  ledger: Arc<DeliveryNoteLedger>,
}

impl GetNoteDetailsUseCase {
  pub fn new(ledger: Arc<DeliveryNoteLedger>) -> Self {
    Self { ledger }
  }

  pub async fn execute(
    &self,
    command: GetNoteDetailsCommand,
  ) -> Result<NoteDetailsResponse, DeliveryError> {
    let (note, lines) = self.ledger.get_note(command.note_id).await?;
    Ok(NoteDetailsResponse::from_note(note, lines))
  }
}

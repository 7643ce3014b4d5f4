use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::delivery::{
  DeliveryError, DeliveryNoteLedger, DocumentNumber, NoteUpdateData,
};

use super::NotePolicy;
use super::create_note::{CreateNoteLineDto, parse_lines};

#[derive(Debug, Deserialize)]
pub struct UpdateNoteCommand {
  pub note_id: Uuid,
  pub document_number: String,
  pub issued_date: NaiveDate,
  pub deliverer_name: Option<String>,
  pub agent_id: Uuid,
  pub client_id: Uuid,
  /// Complete replacement set; the previous lines are always discarded.
  pub lines: Vec<CreateNoteLineDto>,
  /// Version the caller read; a concurrent write in between yields a conflict.
  pub version: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdateNoteResponse {
  pub note_id: Uuid,
  pub document_number: String,
  pub total: Decimal,
  pub version: i64,
  pub updated_at: DateTime<Utc>,
}

pub struct UpdateNoteUseCase {
  ledger: Arc<DeliveryNoteLedger>,
  policy: NotePolicy,
}

impl UpdateNoteUseCase {
  pub fn new(ledger: Arc<DeliveryNoteLedger>, policy: NotePolicy) -> Self {
    Self { ledger, policy }
  }

  pub async fn execute(
    &self,
    command: UpdateNoteCommand,
  ) -> Result<UpdateNoteResponse, DeliveryError> {
    let deliverer_name = self
      .policy
      .parse_deliverer(command.deliverer_name)
      .map_err(DeliveryError::Validation)?;
    let document_number = DocumentNumber::new(command.document_number)?;
    let lines = parse_lines(command.lines)?;

    let (note, _) = self
      .ledger
      .update_note(
        command.note_id,
        NoteUpdateData {
          document_number,
          issued_date: command.issued_date,
          deliverer_name,
          agent_id: command.agent_id,
          client_id: command.client_id,
          lines,
          expected_version: command.version,
        },
      )
      .await?;

    Ok(UpdateNoteResponse {
      note_id: note.id,
      document_number: note.document_number.into_inner(),
      total: note.total,
      version: note.version,
      updated_at: note.updated_at,
    })
  }
}

use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::delivery::{DeliveryError, DeliveryNoteLedger};

#[derive(Debug, Deserialize)]
pub struct DeleteNoteCommand {
  pub note_id: Uuid,
}

pub struct DeleteNoteUseCase {
  ledger: Arc<DeliveryNoteLedger>,
}

impl DeleteNoteUseCase {
  pub fn new(ledger: Arc<DeliveryNoteLedger>) -> Self {
    Self { ledger }
  }

  pub async fn execute(&self, command: DeleteNoteCommand) -> Result<(), DeliveryError> {
    self.ledger.delete_note(command.note_id).await
  }
}

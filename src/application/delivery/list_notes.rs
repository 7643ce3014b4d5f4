use serde::Serialize;
use std::sync::Arc;

use crate::domain::delivery::{DeliveryError, DeliveryNoteLedger};

use super::get_note_details::NoteDetailsResponse;

#[derive(Debug, Serialize)]
pub struct ListNotesResponse {
  pub notes: Vec<NoteDetailsResponse>,
}

pub struct ListNotesUseCase {
  ledger: Arc<DeliveryNoteLedger>,
}

impl ListNotesUseCase {
  pub fn new(ledger: Arc<DeliveryNoteLedger>) -> Self {
    Self { ledger }
  }

  pub async fn execute(&self) -> Result<ListNotesResponse, DeliveryError> {
    let notes = self.ledger.list_notes().await?;
    Ok(ListNotesResponse {
      notes: notes
        .into_iter()
        .map(|(note, lines)| NoteDetailsResponse::from_note(note, lines))
        .collect(),
    })
  }
}

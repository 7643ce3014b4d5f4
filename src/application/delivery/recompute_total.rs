use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::delivery::{DeliveryError, DeliveryNoteLedger};

#[derive(Debug, Deserialize)]
pub struct RecomputeTotalCommand {
  pub note_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecomputeTotalResponse {
  pub note_id: Uuid,
  pub total: Decimal,
}

/// Standalone repair entry point for the header total. Normal operations
/// already recompute inside their own transactions.
pub struct RecomputeTotalUseCase {
  ledger: Arc<DeliveryNoteLedger>,
}

impl RecomputeTotalUseCase {
  pub fn new(ledger: Arc<DeliveryNoteLedger>) -> Self {
    Self { ledger }
  }

  pub async fn execute(
    &self,
    command: RecomputeTotalCommand,
  ) -> Result<RecomputeTotalResponse, DeliveryError> {
    let total = self.ledger.recompute_total(command.note_id).await?;
    Ok(RecomputeTotalResponse {
      note_id: command.note_id,
      total,
    })
  }
}

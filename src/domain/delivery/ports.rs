use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::entities::{DeliveryLine, DeliveryNote};
use super::errors::DeliveryError;

/// Transactional store for delivery notes and their lines.
///
/// Every mutating method is one atomic unit against the backing store:
/// either all rows it touches are persisted together or none are, and the
/// header total is recomputed from the persisted lines as the final step of
/// the same transaction. `update` checks the note's optimistic version and
/// fails with `DeliveryError::Conflict` on a mismatch.
#[async_trait]
pub trait DeliveryNoteStore: Send + Sync {
  /// Persist a new header and its full line set, then recompute the total.
  async fn create(
    &self,
    note: DeliveryNote,
    lines: Vec<DeliveryLine>,
  ) -> Result<DeliveryNote, DeliveryError>;

  /// Persist header changes and replace the entire line set, then recompute
  /// the total. `note.version` must match the stored version.
  async fn update(
    &self,
    note: DeliveryNote,
    lines: Vec<DeliveryLine>,
  ) -> Result<DeliveryNote, DeliveryError>;

  /// Delete the note and all of its lines as one unit.
  async fn delete(&self, note_id: Uuid) -> Result<(), DeliveryError>;

  /// Rewrite `total` from the currently persisted line totals and return the
  /// stored value. Idempotent: repeated calls without intervening line
  /// changes yield the same result.
  async fn recompute_total(&self, note_id: Uuid) -> Result<Decimal, DeliveryError>;

  async fn find_by_id(&self, note_id: Uuid) -> Result<Option<DeliveryNote>, DeliveryError>;
  async fn find_lines(&self, note_id: Uuid) -> Result<Vec<DeliveryLine>, DeliveryError>;
  async fn list(&self) -> Result<Vec<DeliveryNote>, DeliveryError>;
  async fn find_lines_for_notes(
    &self,
    note_ids: &[Uuid],
  ) -> Result<Vec<DeliveryLine>, DeliveryError>;
  async fn exists_by_number(
    &self,
    document_number: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, DeliveryError>;
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::delivery::{
  DelivererName, DeliveryError, DeliveryLine, DeliveryNote, DeliveryNoteStore, DocumentNumber,
  Quantity, UnitPrice,
};

#[derive(Debug, FromRow)]
struct NoteRow {
  id: Uuid,
  document_number: String,
  issued_date: NaiveDate,
  deliverer_name: Option<String>,
  agent_id: Uuid,
  client_id: Uuid,
  total: Decimal,
  version: i64,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<NoteRow> for DeliveryNote {
  type Error = DeliveryError;

  fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
    let document_number = DocumentNumber::new(row.document_number)?;
    let deliverer_name = row.deliverer_name.map(DelivererName::new).transpose()?;

    Ok(DeliveryNote {
      id: row.id,
      document_number,
      issued_date: row.issued_date,
      deliverer_name,
      agent_id: row.agent_id,
      client_id: row.client_id,
      total: row.total,
      version: row.version,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct LineRow {
  id: Uuid,
  note_id: Uuid,
  product_id: Uuid,
  product_ref: String,
  unit_price: Decimal,
  quantity: i32,
  line_total: Decimal,
  line_order: i32,
}

impl TryFrom<LineRow> for DeliveryLine {
  type Error = DeliveryError;

  fn try_from(row: LineRow) -> Result<Self, Self::Error> {
    Ok(DeliveryLine {
      id: row.id,
      note_id: row.note_id,
      product_id: row.product_id,
      product_ref: row.product_ref,
      unit_price: UnitPrice::new(row.unit_price)?,
      quantity: Quantity::new(row.quantity)?,
      line_total: row.line_total,
      line_order: row.line_order,
    })
  }
}

const NOTE_COLUMNS: &str = "id, document_number, issued_date, deliverer_name, agent_id, \
                            client_id, total, version, created_at, updated_at";

const LINE_COLUMNS: &str =
  "id, note_id, product_id, product_ref, unit_price, quantity, line_total, line_order";

pub struct PostgresDeliveryNoteStore {
  pool: PgPool,
}

impl PostgresDeliveryNoteStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn insert_lines(
    tx: &mut Transaction<'_, Postgres>,
    lines: &[DeliveryLine],
  ) -> Result<(), DeliveryError> {
    for line in lines {
      sqlx::query(
        r#"
                INSERT INTO delivery_lines (
                    id, note_id, product_id, product_ref, unit_price,
                    quantity, line_total, line_order
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
      )
      .bind(line.id)
      .bind(line.note_id)
      .bind(line.product_id)
      .bind(&line.product_ref)
      .bind(line.unit_price.value())
      .bind(line.quantity.value())
      .bind(line.line_total)
      .bind(line.line_order)
      .execute(&mut **tx)
      .await?;
    }
    Ok(())
  }

  // The single writer of the derived header total. Runs as the last step of
  // every mutating transaction so the stored total always matches the
  // persisted lines at commit time.
  async fn recompute_total_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    note_id: Uuid,
  ) -> Result<Decimal, DeliveryError> {
    let total: Option<Decimal> = sqlx::query_scalar(
      r#"
            UPDATE delivery_notes
            SET total = (
                SELECT COALESCE(SUM(line_total), 0)
                FROM delivery_lines
                WHERE note_id = $1
            )
            WHERE id = $1
            RETURNING total
            "#,
    )
    .bind(note_id)
    .fetch_optional(&mut **tx)
    .await?;

    total.ok_or(DeliveryError::NoteNotFound(note_id))
  }

  async fn fetch_note_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    note_id: Uuid,
  ) -> Result<DeliveryNote, DeliveryError> {
    let row = sqlx::query_as::<_, NoteRow>(&format!(
      "SELECT {NOTE_COLUMNS} FROM delivery_notes WHERE id = $1"
    ))
    .bind(note_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DeliveryError::NoteNotFound(note_id))?;

    row.try_into()
  }
}

fn map_unique_violation(e: sqlx::Error, document_number: &str) -> DeliveryError {
  if let sqlx::Error::Database(db_err) = &e {
    // PostgreSQL unique violation code
    if db_err.code().as_deref() == Some("23505")
      && db_err.constraint() == Some("delivery_notes_document_number_unique")
    {
      return DeliveryError::DocumentNumberAlreadyExists(document_number.to_string());
    }
  }
  DeliveryError::Database(e)
}

#[async_trait]
impl DeliveryNoteStore for PostgresDeliveryNoteStore {
  async fn create(
    &self,
    note: DeliveryNote,
    lines: Vec<DeliveryLine>,
  ) -> Result<DeliveryNote, DeliveryError> {
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      r#"
            INSERT INTO delivery_notes (
                id, document_number, issued_date, deliverer_name, agent_id,
                client_id, total, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
    )
    .bind(note.id)
    .bind(note.document_number.value())
    .bind(note.issued_date)
    .bind(note.deliverer_name.as_ref().map(|d| d.value()))
    .bind(note.agent_id)
    .bind(note.client_id)
    .bind(note.total)
    .bind(note.version)
    .bind(note.created_at)
    .bind(note.updated_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, note.document_number.value()))?;

    Self::insert_lines(&mut tx, &lines).await?;
    Self::recompute_total_in_tx(&mut tx, note.id).await?;

    let stored = Self::fetch_note_in_tx(&mut tx, note.id).await?;
    tx.commit().await?;

    Ok(stored)
  }

  async fn update(
    &self,
    note: DeliveryNote,
    lines: Vec<DeliveryLine>,
  ) -> Result<DeliveryNote, DeliveryError> {
    let mut tx = self.pool.begin().await?;

    // Version-guarded header update. Zero rows means either the note is gone
    // or another writer got there first.
    let updated = sqlx::query(
      r#"
            UPDATE delivery_notes
            SET document_number = $3, issued_date = $4, deliverer_name = $5,
                agent_id = $6, client_id = $7, updated_at = $8,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
    )
    .bind(note.id)
    .bind(note.version)
    .bind(note.document_number.value())
    .bind(note.issued_date)
    .bind(note.deliverer_name.as_ref().map(|d| d.value()))
    .bind(note.agent_id)
    .bind(note.client_id)
    .bind(note.updated_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, note.document_number.value()))?;

    if updated.rows_affected() == 0 {
      let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM delivery_notes WHERE id = $1)")
          .bind(note.id)
          .fetch_one(&mut *tx)
          .await?;

      return Err(if exists {
        DeliveryError::Conflict {
          note_id: note.id,
          expected: note.version,
        }
      } else {
        DeliveryError::NoteNotFound(note.id)
      });
    }

    sqlx::query("DELETE FROM delivery_lines WHERE note_id = $1")
      .bind(note.id)
      .execute(&mut *tx)
      .await?;

    Self::insert_lines(&mut tx, &lines).await?;
    Self::recompute_total_in_tx(&mut tx, note.id).await?;

    let stored = Self::fetch_note_in_tx(&mut tx, note.id).await?;
    tx.commit().await?;

    Ok(stored)
  }

  async fn delete(&self, note_id: Uuid) -> Result<(), DeliveryError> {
    let mut tx = self.pool.begin().await?;

    // Lines go via ON DELETE CASCADE
    let deleted = sqlx::query("DELETE FROM delivery_notes WHERE id = $1")
      .bind(note_id)
      .execute(&mut *tx)
      .await?;

    if deleted.rows_affected() == 0 {
      return Err(DeliveryError::NoteNotFound(note_id));
    }

    tx.commit().await?;
    Ok(())
  }

  async fn recompute_total(&self, note_id: Uuid) -> Result<Decimal, DeliveryError> {
    let mut tx = self.pool.begin().await?;
    let total = Self::recompute_total_in_tx(&mut tx, note_id).await?;
    tx.commit().await?;
    Ok(total)
  }

  async fn find_by_id(&self, note_id: Uuid) -> Result<Option<DeliveryNote>, DeliveryError> {
    let row = sqlx::query_as::<_, NoteRow>(&format!(
      "SELECT {NOTE_COLUMNS} FROM delivery_notes WHERE id = $1"
    ))
    .bind(note_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(DeliveryNote::try_from).transpose()
  }

  async fn find_lines(&self, note_id: Uuid) -> Result<Vec<DeliveryLine>, DeliveryError> {
    let rows = sqlx::query_as::<_, LineRow>(&format!(
      "SELECT {LINE_COLUMNS} FROM delivery_lines WHERE note_id = $1 ORDER BY line_order"
    ))
    .bind(note_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(DeliveryLine::try_from).collect()
  }

  async fn list(&self) -> Result<Vec<DeliveryNote>, DeliveryError> {
    let rows = sqlx::query_as::<_, NoteRow>(&format!(
      "SELECT {NOTE_COLUMNS} FROM delivery_notes ORDER BY issued_date DESC, created_at DESC"
    ))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(DeliveryNote::try_from).collect()
  }

  async fn find_lines_for_notes(
    &self,
    note_ids: &[Uuid],
  ) -> Result<Vec<DeliveryLine>, DeliveryError> {
    if note_ids.is_empty() {
      return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, LineRow>(&format!(
      "SELECT {LINE_COLUMNS} FROM delivery_lines WHERE note_id = ANY($1) ORDER BY line_order"
    ))
    .bind(note_ids)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(DeliveryLine::try_from).collect()
  }

  async fn exists_by_number(
    &self,
    document_number: &str,
    exclude_id: Option<Uuid>,
  ) -> Result<bool, DeliveryError> {
    let exists: bool = sqlx::query_scalar(
      r#"
            SELECT EXISTS(
                SELECT 1 FROM delivery_notes
                WHERE document_number = $1
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
    )
    .bind(document_number)
    .bind(exclude_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(exists)
  }
}

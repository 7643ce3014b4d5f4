use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{DelivererName, DocumentNumber, Quantity, UnitPrice};

// Delivery note header ("sortie" / bon de livraison)
//
// `total` is derived: it only changes through the store's recompute step and
// always equals the sum of the note's line totals at rest. `version` is the
// optimistic counter checked at the storage boundary on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryNote {
  pub id: Uuid,
  pub document_number: DocumentNumber,
  pub issued_date: NaiveDate,
  pub deliverer_name: Option<DelivererName>,
  pub agent_id: Uuid,
  pub client_id: Uuid,
  pub total: Decimal,
  pub version: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl DeliveryNote {
  pub fn new(
    document_number: DocumentNumber,
    issued_date: NaiveDate,
    deliverer_name: Option<DelivererName>,
    agent_id: Uuid,
    client_id: Uuid,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      document_number,
      issued_date,
      deliverer_name,
      agent_id,
      client_id,
      total: Decimal::ZERO,
      version: 1,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn update_header(
    &mut self,
    document_number: DocumentNumber,
    issued_date: NaiveDate,
    deliverer_name: Option<DelivererName>,
    agent_id: Uuid,
    client_id: Uuid,
  ) {
    self.document_number = document_number;
    self.issued_date = issued_date;
    self.deliverer_name = deliverer_name;
    self.agent_id = agent_id;
    self.client_id = client_id;
    self.updated_at = Utc::now();
  }

  /// Reference computation for the derived header total. The persisted value
  /// is written by the store's recompute step, never taken from callers.
  pub fn total_of(lines: &[DeliveryLine]) -> Decimal {
    lines.iter().map(|line| line.line_total).sum()
  }
}

// One product entry on a delivery note
//
// `product_ref` is a snapshot of the product's reference code taken when the
// line is built, so later catalog edits do not rewrite history. `line_total`
// is derived in the constructor and has no other writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLine {
  pub id: Uuid,
  pub note_id: Uuid,
  pub product_id: Uuid,
  pub product_ref: String,
  pub unit_price: UnitPrice,
  pub quantity: Quantity,
  pub line_total: Decimal,
  pub line_order: i32,
}

impl DeliveryLine {
  pub fn new(
    note_id: Uuid,
    product_id: Uuid,
    product_ref: String,
    unit_price: UnitPrice,
    quantity: Quantity,
    line_order: i32,
  ) -> Self {
    let line_total = unit_price.value() * quantity.as_decimal();
    Self {
      id: Uuid::new_v4(),
      note_id,
      product_id,
      product_ref,
      unit_price,
      quantity,
      line_total,
      line_order,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn line(price: Decimal, quantity: i32, order: i32) -> DeliveryLine {
    DeliveryLine::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      "REF-001".to_string(),
      UnitPrice::new(price).unwrap(),
      Quantity::new(quantity).unwrap(),
      order,
    )
  }

  #[test]
  fn test_note_creation_starts_at_zero_total() {
    let note = DeliveryNote::new(
      DocumentNumber::new("BL-001".to_string()).unwrap(),
      NaiveDate::from_ymd_opt(2025, 7, 23).unwrap(),
      Some(DelivererName::new("Karim".to_string()).unwrap()),
      Uuid::new_v4(),
      Uuid::new_v4(),
    );
    assert_eq!(note.total, Decimal::ZERO);
    assert_eq!(note.version, 1);
  }

  #[test]
  fn test_line_total_is_price_times_quantity() {
    let first = line(dec!(100.00), 3, 1);
    assert_eq!(first.line_total, dec!(300.00));

    let second = line(dec!(50.00), 2, 2);
    assert_eq!(second.line_total, dec!(100.00));
  }

  #[test]
  fn test_line_total_exact_at_two_decimals() {
    let line = line(dec!(0.10), 3, 1);
    assert_eq!(line.line_total, dec!(0.30));
  }

  #[test]
  fn test_total_of_sums_line_totals() {
    let lines = vec![line(dec!(100.00), 3, 1), line(dec!(50.00), 2, 2)];
    assert_eq!(DeliveryNote::total_of(&lines), dec!(400.00));
    assert_eq!(DeliveryNote::total_of(&[]), Decimal::ZERO);
  }
}

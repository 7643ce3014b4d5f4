use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid document number: {0}")]
  InvalidDocumentNumber(String),
  #[error("Invalid deliverer name: {0}")]
  InvalidDelivererName(String),
  #[error("Invalid unit price: {0}")]
  InvalidUnitPrice(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid product reference: {0}")]
  InvalidProductRef(String),
}

// Document number ("numero BL") - user-editable, globally unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNumber(String);

impl DocumentNumber {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidDocumentNumber(
        "Document number cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 255 {
      return Err(ValueObjectError::InvalidDocumentNumber(
        "Document number cannot exceed 255 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  /// Suggest a document number following the `<prefix>-<timestamp>-<seq>` convention
  /// observed in existing data (e.g. `BL-S-1721584881-042`). The format is a
  /// convention for generated numbers, not a contract: callers may submit any
  /// non-empty string.
  pub fn generate(prefix: &str, at: DateTime<Utc>, sequence: u32) -> Self {
    Self(format!("{}-{}-{:03}", prefix, at.timestamp(), sequence % 1000))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for DocumentNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Deliverer ("livreur") - free text. Whether the field is required at all is a
// deployment policy (config `delivery.deliverer_required`), enforced before
// the ledger runs; the value object only guards non-empty content when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelivererName(String);

impl DelivererName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidDelivererName(
        "Deliverer name cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 255 {
      return Err(ValueObjectError::InvalidDelivererName(
        "Deliverer name cannot exceed 255 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for DelivererName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Unit price - non-negative decimal, max 2 decimal places, bounded to the
// numeric(12, 2) storage precision so derived line totals cannot overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
  const MAX_INTEGRAL: u64 = 10_000_000_000;

  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value.is_sign_negative() {
      return Err(ValueObjectError::InvalidUnitPrice(
        "Unit price cannot be negative".to_string(),
      ));
    }
    if value.scale() > 2 {
      return Err(ValueObjectError::InvalidUnitPrice(
        "Unit price cannot have more than 2 decimal places".to_string(),
      ));
    }
    if value >= Decimal::from(Self::MAX_INTEGRAL) {
      return Err(ValueObjectError::InvalidUnitPrice(
        "Unit price cannot have more than 10 integral digits".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

// Quantity - whole units, at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(i32);

impl Quantity {
  pub fn new(value: i32) -> Result<Self, ValueObjectError> {
    if value < 1 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be at least 1".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> i32 {
    self.0
  }

  pub fn as_decimal(&self) -> Decimal {
    Decimal::from(self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_document_number() {
    assert!(DocumentNumber::new("BL-001".to_string()).is_ok());
    assert!(DocumentNumber::new("".to_string()).is_err());
    assert!(DocumentNumber::new("   ".to_string()).is_err());
    assert_eq!(
      DocumentNumber::new("  BL-002 ".to_string()).unwrap().value(),
      "BL-002"
    );
  }

  #[test]
  fn test_document_number_generate() {
    let at = DateTime::parse_from_rfc3339("2025-07-21T18:01:21Z")
      .unwrap()
      .with_timezone(&Utc);
    let number = DocumentNumber::generate("BL-S", at, 42);
    assert_eq!(number.value(), "BL-S-1753120881-042");

    // Sequence wraps to three digits
    let number = DocumentNumber::generate("BL-S", at, 1042);
    assert!(number.value().ends_with("-042"));
  }

  #[test]
  fn test_deliverer_name() {
    assert!(DelivererName::new("Karim".to_string()).is_ok());
    assert!(DelivererName::new("  ".to_string()).is_err());
    assert!(DelivererName::new("x".repeat(256)).is_err());
  }

  #[test]
  fn test_unit_price() {
    assert!(UnitPrice::new(dec!(0)).is_ok());
    assert!(UnitPrice::new(dec!(100.50)).is_ok());
    assert!(UnitPrice::new(dec!(-0.01)).is_err());
    assert!(UnitPrice::new(dec!(1.125)).is_err());
  }

  #[test]
  fn test_unit_price_bounded_to_storage_precision() {
    assert!(UnitPrice::new(dec!(9999999999.99)).is_ok());
    assert!(UnitPrice::new(dec!(10000000000.00)).is_err());
    assert!(UnitPrice::new(Decimal::MAX).is_err());

    // A bounded price multiplied by any valid quantity stays representable
    let price = UnitPrice::new(dec!(9999999999.99)).unwrap();
    let quantity = Quantity::new(i32::MAX).unwrap();
    let _ = price.value() * quantity.as_decimal();
  }

  #[test]
  fn test_quantity() {
    assert!(Quantity::new(1).is_ok());
    assert!(Quantity::new(0).is_err());
    assert!(Quantity::new(-3).is_err());
    assert_eq!(Quantity::new(7).unwrap().as_decimal(), dec!(7));
  }
}

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::delivery::errors::DeliveryError;

/// Product catalog entry. The ledger reads it to snapshot the reference code
/// and to offer a default unit price; it never writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: Uuid,
  pub reference: String,
  pub label: String,
  pub unit_price: Decimal,
  pub is_active: bool,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DeliveryError>;
  async fn list_active(&self) -> Result<Vec<Product>, DeliveryError>;
}

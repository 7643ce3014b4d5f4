use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::catalog::{Product, ProductRepository};
use crate::domain::delivery::DeliveryError;

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  reference: String,
  label: String,
  unit_price: Decimal,
  is_active: bool,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      reference: row.reference,
      label: row.label,
      unit_price: row.unit_price,
      is_active: row.is_active,
    }
  }
}

pub struct PostgresProductRepository {
  pool: PgPool,
}

impl PostgresProductRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DeliveryError> {
    let row = sqlx::query_as::<_, ProductRow>(
      "SELECT id, reference, label, unit_price, is_active FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Product::from))
  }

  async fn list_active(&self) -> Result<Vec<Product>, DeliveryError> {
    let rows = sqlx::query_as::<_, ProductRow>(
      "SELECT id, reference, label, unit_price, is_active FROM products \
       WHERE is_active ORDER BY reference",
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Product::from).collect())
  }
}

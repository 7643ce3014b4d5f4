use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::access::{AccessError, AccessPolicy, Capability, User};

#[derive(Debug, FromRow)]
struct TokenUserRow {
  user_id: Uuid,
  name: String,
  expires_at: Option<DateTime<Utc>>,
}

pub struct PostgresAccessPolicy {
  pool: PgPool,
}

impl PostgresAccessPolicy {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl AccessPolicy for PostgresAccessPolicy {
  async fn resolve_token(&self, token_sha256: &str) -> Result<Option<User>, AccessError> {
    let row = sqlx::query_as::<_, TokenUserRow>(
      r#"
            SELECT u.id AS user_id, u.name, t.expires_at
            FROM api_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
    )
    .bind(token_sha256)
    .fetch_optional(&self.pool)
    .await?;

    let Some(row) = row else {
      return Ok(None);
    };

    // Expired tokens resolve to nobody, same as unknown ones
    if let Some(expires_at) = row.expires_at {
      if expires_at <= Utc::now() {
        return Ok(None);
      }
    }

    let keys: Vec<String> =
      sqlx::query_scalar("SELECT capability FROM user_capabilities WHERE user_id = $1")
        .bind(row.user_id)
        .fetch_all(&self.pool)
        .await?;

    let mut capabilities = HashSet::new();
    for key in keys {
      // Unknown keys are skipped rather than failing the whole login; rows
      // written by newer deployments must not lock older ones out.
      if let Ok(capability) = Capability::from_str(&key) {
        capabilities.insert(capability);
      } else {
        tracing::warn!(user_id = %row.user_id, capability = %key, "Skipping unknown capability key");
      }
    }

    Ok(Some(User {
      id: row.user_id,
      name: row.name,
      capabilities,
    }))
  }
}

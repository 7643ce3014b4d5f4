use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Capabilities gating delivery note operations. Mirrors the stored
/// permission keys (`notes.view`, `notes.create`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
  View,
  Create,
  Edit,
  Delete,
}

impl Capability {
  pub fn as_str(&self) -> &'static str {
    match self {
      Capability::View => "notes.view",
      Capability::Create => "notes.create",
      Capability::Edit => "notes.edit",
      Capability::Delete => "notes.delete",
    }
  }
}

impl fmt::Display for Capability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Capability {
  type Err = AccessError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "notes.view" => Ok(Capability::View),
      "notes.create" => Ok(Capability::Create),
      "notes.edit" => Ok(Capability::Edit),
      "notes.delete" => Ok(Capability::Delete),
      _ => Err(AccessError::UnknownCapability(s.to_string())),
    }
  }
}

/// Authenticated caller with the capability set resolved at token lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub capabilities: HashSet<Capability>,
}

impl User {
  pub fn can(&self, capability: Capability) -> bool {
    self.capabilities.contains(&capability)
  }
}

#[derive(Debug, Error)]
pub enum AccessError {
  #[error("Unknown capability: {0}")]
  UnknownCapability(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

/// Authorization collaborator: resolves an API token (already hashed by the
/// HTTP layer) to a user and their capabilities. Evaluated once per request
/// at the boundary; ledger methods never re-check.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
  async fn resolve_token(&self, token_sha256: &str) -> Result<Option<User>, AccessError>;
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::delivery::errors::DeliveryError;

/// Commercial agent ("commercial") - the sales representative a client and
/// their delivery notes are attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
  pub id: Uuid,
  pub code: String,
  pub full_name: String,
  pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  pub id: Uuid,
  pub code: String,
  pub full_name: String,
  pub phone: Option<String>,
  pub agent_id: Uuid,
}

#[async_trait]
pub trait AgentRepository: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, DeliveryError>;
  async fn list(&self) -> Result<Vec<Agent>, DeliveryError>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DeliveryError>;
  async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Client>, DeliveryError>;
  async fn list(&self) -> Result<Vec<Client>, DeliveryError>;
}

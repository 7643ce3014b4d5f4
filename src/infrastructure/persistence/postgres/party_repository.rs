use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::delivery::DeliveryError;
use crate::domain::parties::{Agent, AgentRepository, Client, ClientRepository};

#[derive(Debug, FromRow)]
struct AgentRow {
  id: Uuid,
  code: String,
  full_name: String,
  phone: Option<String>,
}

impl From<AgentRow> for Agent {
  fn from(row: AgentRow) -> Self {
    Agent {
      id: row.id,
      code: row.code,
      full_name: row.full_name,
      phone: row.phone,
    }
  }
}

#[derive(Debug, FromRow)]
struct ClientRow {
  id: Uuid,
  code: String,
  full_name: String,
  phone: Option<String>,
  agent_id: Uuid,
}

impl From<ClientRow> for Client {
  fn from(row: ClientRow) -> Self {
    Client {
      id: row.id,
      code: row.code,
      full_name: row.full_name,
      phone: row.phone,
      agent_id: row.agent_id,
    }
  }
}

pub struct PostgresAgentRepository {
  pool: PgPool,
}

impl PostgresAgentRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, DeliveryError> {
    let row =
      sqlx::query_as::<_, AgentRow>("SELECT id, code, full_name, phone FROM agents WHERE id = $1")
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

    Ok(row.map(Agent::from))
  }

  async fn list(&self) -> Result<Vec<Agent>, DeliveryError> {
    let rows =
      sqlx::query_as::<_, AgentRow>("SELECT id, code, full_name, phone FROM agents ORDER BY code")
        .fetch_all(&self.pool)
        .await?;

    Ok(rows.into_iter().map(Agent::from).collect())
  }
}

pub struct PostgresClientRepository {
  pool: PgPool,
}

impl PostgresClientRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DeliveryError> {
    let row = sqlx::query_as::<_, ClientRow>(
      "SELECT id, code, full_name, phone, agent_id FROM clients WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Client::from))
  }

  async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Client>, DeliveryError> {
    let rows = sqlx::query_as::<_, ClientRow>(
      "SELECT id, code, full_name, phone, agent_id FROM clients \
       WHERE agent_id = $1 ORDER BY code",
    )
    .bind(agent_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Client::from).collect())
  }

  async fn list(&self) -> Result<Vec<Client>, DeliveryError> {
    let rows = sqlx::query_as::<_, ClientRow>(
      "SELECT id, code, full_name, phone, agent_id FROM clients ORDER BY code",
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Client::from).collect())
  }
}

//! Pass-through reads backing the note editor: product details for line
//! entry, clients filtered by agent, and document number helpers. None of
//! these touch the ledger's consistency logic.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::ProductRepository;
use crate::domain::delivery::{DeliveryError, DeliveryNoteStore, DocumentNumber};
use crate::domain::parties::{Client, ClientRepository};

use super::NotePolicy;

#[derive(Debug, Deserialize)]
pub struct GetProductDetailsCommand {
  pub product_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ProductDetailsResponse {
  pub product_id: Uuid,
  pub reference: String,
  pub label: String,
  pub unit_price: Decimal,
}

pub struct GetProductDetailsUseCase {
  products: Arc<dyn ProductRepository>,
}

impl GetProductDetailsUseCase {
  pub fn new(products: Arc<dyn ProductRepository>) -> Self {
    Self { products }
  }

  pub async fn execute(
    &self,
    command: GetProductDetailsCommand,
  ) -> Result<ProductDetailsResponse, DeliveryError> {
    let product = self
      .products
      .find_by_id(command.product_id)
      .await?
      .ok_or(DeliveryError::ProductNotFound(command.product_id))?;

    Ok(ProductDetailsResponse {
      product_id: product.id,
      reference: product.reference,
      label: product.label,
      unit_price: product.unit_price,
    })
  }
}

#[derive(Debug, Deserialize)]
pub struct ListClientsByAgentCommand {
  pub agent_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ClientDto {
  pub id: Uuid,
  pub code: String,
  pub full_name: String,
  pub phone: Option<String>,
}

impl From<Client> for ClientDto {
  fn from(client: Client) -> Self {
    Self {
      id: client.id,
      code: client.code,
      full_name: client.full_name,
      phone: client.phone,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListClientsByAgentResponse {
  pub clients: Vec<ClientDto>,
}

pub struct ListClientsByAgentUseCase {
  clients: Arc<dyn ClientRepository>,
}

impl ListClientsByAgentUseCase {
  pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
    Self { clients }
  }

  pub async fn execute(
    &self,
    command: ListClientsByAgentCommand,
  ) -> Result<ListClientsByAgentResponse, DeliveryError> {
    let clients = self.clients.find_by_agent(command.agent_id).await?;
    Ok(ListClientsByAgentResponse {
      clients: clients.into_iter().map(ClientDto::from).collect(),
    })
  }
}

#[derive(Debug, Deserialize)]
pub struct CheckDocumentNumberCommand {
  pub document_number: String,
}

#[derive(Debug, Serialize)]
pub struct CheckDocumentNumberResponse {
  pub document_number: String,
  pub exists: bool,
}

pub struct CheckDocumentNumberUseCase {
  store: Arc<dyn DeliveryNoteStore>,
}

impl CheckDocumentNumberUseCase {
  pub fn new(store: Arc<dyn DeliveryNoteStore>) -> Self {
    Self { store }
  }

  pub async fn execute(
    &self,
    command: CheckDocumentNumberCommand,
  ) -> Result<CheckDocumentNumberResponse, DeliveryError> {
    let exists = self
      .store
      .exists_by_number(command.document_number.trim(), None)
      .await?;
    Ok(CheckDocumentNumberResponse {
      document_number: command.document_number,
      exists,
    })
  }
}

#[derive(Debug, Serialize)]
pub struct SuggestDocumentNumberResponse {
  pub document_number: String,
}

pub struct SuggestDocumentNumberUseCase {
  store: Arc<dyn DeliveryNoteStore>,
  policy: NotePolicy,
}

impl SuggestDocumentNumberUseCase {
  pub fn new(store: Arc<dyn DeliveryNoteStore>, policy: NotePolicy) -> Self {
    Self { store, policy }
  }

  pub async fn execute(&self) -> Result<SuggestDocumentNumberResponse, DeliveryError> {
    // Bump the sequence until the suggestion is free. Uniqueness is still
    // enforced at creation; this only avoids offering a number that is
    // already taken at suggestion time.
    let now = Utc::now();
    for sequence in 1..1000 {
      let candidate = DocumentNumber::generate(&self.policy.numbering_prefix, now, sequence);
      if !self.store.exists_by_number(candidate.value(), None).await? {
        return Ok(SuggestDocumentNumberResponse {
          document_number: candidate.into_inner(),
        });
      }
    }
    Err(DeliveryError::Internal(
      "Exhausted document number sequence for this timestamp".to_string(),
    ))
  }
}

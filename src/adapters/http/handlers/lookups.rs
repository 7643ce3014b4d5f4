use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::http::errors::ApiError;
use crate::adapters::http::middleware::{AuthUser, require};
use crate::application::delivery::{
  CheckDocumentNumberCommand, CheckDocumentNumberUseCase, GetProductDetailsCommand,
  GetProductDetailsUseCase, ListClientsByAgentCommand, ListClientsByAgentUseCase,
  SuggestDocumentNumberUseCase,
};
use crate::domain::access::Capability;

// GET /api/v1/lookups/products/{product_id}
pub async fn product_details_handler(
  req: HttpRequest,
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<GetProductDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::View)?;

  let response = use_case
    .execute(GetProductDetailsCommand {
      product_id: path.into_inner(),
    })
    .await?;
  Ok(HttpResponse::Ok().json(response))
}

// GET /api/v1/lookups/agents/{agent_id}/clients
pub async fn clients_by_agent_handler(
  req: HttpRequest,
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<ListClientsByAgentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::View)?;

  let response = use_case
    .execute(ListClientsByAgentCommand {
      agent_id: path.into_inner(),
    })
    .await?;
  Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
pub struct CheckNumberQuery {
  pub document_number: String,
}

// GET /api/v1/lookups/document-numbers/check?document_number=BL-001
pub async fn check_document_number_handler(
  req: HttpRequest,
  query: web::Query<CheckNumberQuery>,
  use_case: web::Data<Arc<CheckDocumentNumberUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::View)?;

  let response = use_case
    .execute(CheckDocumentNumberCommand {
      document_number: query.into_inner().document_number,
    })
    .await?;
  Ok(HttpResponse::Ok().json(response))
}

// GET /api/v1/lookups/document-numbers/suggest
pub async fn suggest_document_number_handler(
  req: HttpRequest,
  use_case: web::Data<Arc<SuggestDocumentNumberUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::Create)?;

  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

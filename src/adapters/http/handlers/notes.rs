use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::dtos::{CreateNoteRequest, SuccessResponse, UpdateNoteRequest};
use crate::adapters::http::errors::ApiError;
use crate::adapters::http::middleware::{AuthUser, require};
use crate::application::delivery::{
  CreateNoteCommand, CreateNoteLineDto, CreateNoteUseCase, DeleteNoteCommand, DeleteNoteUseCase,
  GetNoteDetailsCommand, GetNoteDetailsUseCase, ListNotesUseCase, RecomputeTotalCommand,
  RecomputeTotalUseCase, UpdateNoteCommand, UpdateNoteUseCase,
};
use crate::domain::access::Capability;
use crate::infrastructure::metrics;

// GET /api/v1/notes
pub async fn list_notes_handler(
  req: HttpRequest,
  use_case: web::Data<Arc<ListNotesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::View)?;

  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

// GET /api/v1/notes/{note_id}
pub async fn get_note_handler(
  req: HttpRequest,
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<GetNoteDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::View)?;

  let response = use_case
    .execute(GetNoteDetailsCommand {
      note_id: path.into_inner(),
    })
    .await?;
  Ok(HttpResponse::Ok().json(response))
}

// POST /api/v1/notes
pub async fn create_note_handler(
  req: HttpRequest,
  body: web::Json<CreateNoteRequest>,
  use_case: web::Data<Arc<CreateNoteUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::Create)?;

  let body = body.into_inner();
  body.validate()?;

  let response = use_case
    .execute(CreateNoteCommand {
      document_number: body.document_number,
      issued_date: body.issued_date,
      deliverer_name: body.deliverer_name,
      agent_id: body.agent_id,
      client_id: body.client_id,
      lines: body
        .lines
        .into_iter()
        .map(|line| CreateNoteLineDto {
          product_id: line.product_id,
          unit_price: line.unit_price,
          quantity: line.quantity,
        })
        .collect(),
    })
    .await?;

  metrics::LEDGER_OPERATIONS
    .with_label_values(&["create"])
    .inc();
  Ok(HttpResponse::Created().json(response))
}

// PUT /api/v1/notes/{note_id}
pub async fn update_note_handler(
  req: HttpRequest,
  path: web::Path<Uuid>,
  body: web::Json<UpdateNoteRequest>,
  use_case: web::Data<Arc<UpdateNoteUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::Edit)?;

  let body = body.into_inner();
  body.validate()?;

  let response = use_case
    .execute(UpdateNoteCommand {
      note_id: path.into_inner(),
      document_number: body.document_number,
      issued_date: body.issued_date,
      deliverer_name: body.deliverer_name,
      agent_id: body.agent_id,
      client_id: body.client_id,
      lines: body
        .lines
        .into_iter()
        .map(|line| CreateNoteLineDto {
          product_id: line.product_id,
          unit_price: line.unit_price,
          quantity: line.quantity,
        })
        .collect(),
      version: body.version,
    })
    .await?;

  metrics::LEDGER_OPERATIONS
    .with_label_values(&["replace_lines"])
    .inc();
  Ok(HttpResponse::Ok().json(response))
}

// DELETE /api/v1/notes/{note_id}
pub async fn delete_note_handler(
  req: HttpRequest,
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteNoteUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::Delete)?;

  use_case
    .execute(DeleteNoteCommand {
      note_id: path.into_inner(),
    })
    .await?;

  metrics::LEDGER_OPERATIONS
    .with_label_values(&["delete"])
    .inc();
  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Delivery note deleted".to_string(),
  }))
}

// POST /api/v1/notes/{note_id}/recompute-total
pub async fn recompute_total_handler(
  req: HttpRequest,
  path: web::Path<Uuid>,
  use_case: web::Data<Arc<RecomputeTotalUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = req.authenticated_user()?;
  require(&user, Capability::Edit)?;

  let response = use_case
    .execute(RecomputeTotalCommand {
      note_id: path.into_inner(),
    })
    .await?;

  metrics::LEDGER_OPERATIONS
    .with_label_values(&["recompute_total"])
    .inc();
  Ok(HttpResponse::Ok().json(response))
}

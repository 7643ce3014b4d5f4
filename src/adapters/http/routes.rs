use actix_web::web;
use std::sync::Arc;

use crate::application::delivery::{
  CheckDocumentNumberUseCase, CreateNoteUseCase, DeleteNoteUseCase, GetNoteDetailsUseCase,
  GetProductDetailsUseCase, ListClientsByAgentUseCase, ListNotesUseCase, RecomputeTotalUseCase,
  SuggestDocumentNumberUseCase, UpdateNoteUseCase,
};

use super::handlers::lookups::{
  check_document_number_handler, clients_by_agent_handler, product_details_handler,
  suggest_document_number_handler,
};
use super::handlers::notes::{
  create_note_handler, delete_note_handler, get_note_handler, list_notes_handler,
  recompute_total_handler, update_note_handler,
};

/// Configure delivery note routes
///
/// Mounts the note CRUD endpoints under the provided scope. All routes are
/// prefixed with the scope path (e.g., /api/v1/notes).
///
/// # Routes
///
/// - GET / - List notes with their lines
/// - POST / - Create a note with its full line set
/// - GET /{note_id} - Note details
/// - PUT /{note_id} - Update the header and replace the line set
/// - DELETE /{note_id} - Delete the note and its lines
/// - POST /{note_id}/recompute-total - Re-derive the stored total
pub fn configure_note_routes(
  cfg: &mut web::ServiceConfig,
  list_use_case: Arc<ListNotesUseCase>,
  create_use_case: Arc<CreateNoteUseCase>,
  get_use_case: Arc<GetNoteDetailsUseCase>,
  update_use_case: Arc<UpdateNoteUseCase>,
  delete_use_case: Arc<DeleteNoteUseCase>,
  recompute_use_case: Arc<RecomputeTotalUseCase>,
) {
  // Store use cases in app data so handlers can access them
  cfg
    .app_data(web::Data::new(list_use_case))
    .app_data(web::Data::new(create_use_case))
    .app_data(web::Data::new(get_use_case))
    .app_data(web::Data::new(update_use_case))
    .app_data(web::Data::new(delete_use_case))
    .app_data(web::Data::new(recompute_use_case))
    // Configure routes
    .route("", web::get().to(list_notes_handler))
    .route("", web::post().to(create_note_handler))
    .route("/{note_id}", web::get().to(get_note_handler))
    .route("/{note_id}", web::put().to(update_note_handler))
    .route("/{note_id}", web::delete().to(delete_note_handler))
    .route(
      "/{note_id}/recompute-total",
      web::post().to(recompute_total_handler),
    );
}

/// Configure lookup routes backing the note editor
///
/// - GET /products/{product_id} - Product details for line entry
/// - GET /agents/{agent_id}/clients - Clients attached to an agent
/// - GET /document-numbers/check - Availability check for a number
/// - GET /document-numbers/suggest - Generate a free number
pub fn configure_lookup_routes(
  cfg: &mut web::ServiceConfig,
  product_use_case: Arc<GetProductDetailsUseCase>,
  clients_use_case: Arc<ListClientsByAgentUseCase>,
  check_use_case: Arc<CheckDocumentNumberUseCase>,
  suggest_use_case: Arc<SuggestDocumentNumberUseCase>,
) {
  cfg
    .app_data(web::Data::new(product_use_case))
    .app_data(web::Data::new(clients_use_case))
    .app_data(web::Data::new(check_use_case))
    .app_data(web::Data::new(suggest_use_case))
    .route(
      "/products/{product_id}",
      web::get().to(product_details_handler),
    )
    .route(
      "/agents/{agent_id}/clients",
      web::get().to(clients_by_agent_handler),
    )
    .route(
      "/document-numbers/check",
      web::get().to(check_document_number_handler),
    )
    .route(
      "/document-numbers/suggest",
      web::get().to(suggest_document_number_handler),
    );
}

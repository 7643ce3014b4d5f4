pub mod create_note;
pub mod delete_note;
pub mod get_note_details;
pub mod list_notes;
pub mod lookups;
pub mod recompute_total;
pub mod update_note;

pub use create_note::{CreateNoteCommand, CreateNoteLineDto, CreateNoteResponse, CreateNoteUseCase};
pub use delete_note::{DeleteNoteCommand, DeleteNoteUseCase};
pub use get_note_details::{
  GetNoteDetailsCommand, GetNoteDetailsUseCase, NoteDetailsResponse, NoteLineDto,
};
pub use list_notes::{ListNotesResponse, ListNotesUseCase};
pub use lookups::{
  CheckDocumentNumberCommand, CheckDocumentNumberResponse, CheckDocumentNumberUseCase, ClientDto,
  GetProductDetailsCommand, GetProductDetailsUseCase, ListClientsByAgentCommand,
  ListClientsByAgentResponse, ListClientsByAgentUseCase, ProductDetailsResponse,
  SuggestDocumentNumberResponse, SuggestDocumentNumberUseCase,
};
pub use recompute_total::{RecomputeTotalCommand, RecomputeTotalResponse, RecomputeTotalUseCase};
pub use update_note::{UpdateNoteCommand, UpdateNoteResponse, UpdateNoteUseCase};

/// Deployment policy for note input handling, sourced from configuration.
#[derive(Debug, Clone)]
pub struct NotePolicy {
  /// Whether a deliverer name must accompany every note. The original system
  /// disagreed with itself on this; here it is a deliberate setting.
  pub deliverer_required: bool,
  /// Prefix used by the document number suggestion endpoint.
  pub numbering_prefix: String,
}

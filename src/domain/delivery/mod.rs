pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{DeliveryLine, DeliveryNote};
pub use errors::DeliveryError;
pub use ports::DeliveryNoteStore;
pub use services::{DeliveryNoteLedger, LineInput, NoteData, NoteUpdateData};
pub use value_objects::{
  DelivererName, DocumentNumber, Quantity, UnitPrice, ValueObjectError,
};

//! CV and cover letter documents attached to applications.

mod error;
mod service;
mod types;

pub use error::DocumentError;
pub use service::{DocumentRepository, DocumentService};
pub use types::{Document, DocumentContent, DocumentType, UpsertDocumentInput, UpsertedDocument};

//! Document types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::StoredFile;

/// Kind of document attached to an application. At most one of each per application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Curriculum vitae.
    Cv,
    /// Cover letter.
    CoverLetter,
}

impl DocumentType {
    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cv => "CV",
            Self::CoverLetter => "COVER_LETTER",
        }
    }

    /// Parse from database string value. Case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CV" => Some(Self::Cv),
            "COVER_LETTER" => Some(Self::CoverLetter),
            _ => None,
        }
    }

    /// Lower-cased directory segment used in storage paths.
    #[must_use]
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::Cv => "cv",
            Self::CoverLetter => "cover_letter",
        }
    }
}

/// Metadata of a stored document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Document ID. Changes when the document is replaced.
    pub id: Uuid,
    /// Owning application.
    pub application_id: Uuid,
    /// Document type.
    pub document_type: DocumentType,
    /// Filename supplied at upload.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Backend that holds the bytes.
    pub storage_backend: String,
    /// Opaque path returned by the backend.
    #[serde(skip_serializing)]
    pub storage_path: String,
    /// Uploaded at.
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Where the bytes live.
    #[must_use]
    pub fn stored_file(&self) -> StoredFile {
        StoredFile {
            backend: self.storage_backend.clone(),
            path: self.storage_path.clone(),
        }
    }
}

/// Row to write for an upload. Replaces any document of the same type on the application.
#[derive(Debug, Clone)]
pub struct UpsertDocumentInput {
    /// Owning application.
    pub application_id: Uuid,
    /// Document type.
    pub document_type: DocumentType,
    /// Filename supplied at upload.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Backend that holds the bytes.
    pub storage_backend: String,
    /// Opaque path returned by the backend.
    pub storage_path: String,
    /// Bytes to keep on the row, for the database backend.
    pub content: Option<Bytes>,
}

/// Result of an upsert: the row just written and the location it displaced.
#[derive(Debug, Clone)]
pub struct UpsertedDocument {
    /// The row written by this upsert, read back by its own ID.
    pub document: Document,
    /// Bytes of the replaced row, if one existed.
    pub superseded: Option<StoredFile>,
}

/// A document together with its bytes.
#[derive(Debug, Clone)]
pub struct DocumentContent {
    /// Metadata.
    pub document: Document,
    /// File content.
    pub bytes: Bytes,
}

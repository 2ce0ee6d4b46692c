//! Document service implementation.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use super::error::DocumentError;
use super::types::{Document, DocumentContent, DocumentType, UpsertDocumentInput, UpsertedDocument};
use crate::policy::{self, Actor, ApplicationFacts};
use crate::storage::{DATABASE_BACKEND, StorageService, UploadedFile};

/// Repository trait for document persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait DocumentRepository: Send + Sync {
    /// Ownership facts of an application.
    fn find_application_facts(
        &self,
        application_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ApplicationFacts>, DocumentError>> + Send;

    /// Find document by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Document>, DocumentError>> + Send;

    /// Insert or replace the document keyed on (application, type). The row gets a new ID.
    ///
    /// Reading the displaced row, writing the new one and reading it back by
    /// its own ID happen atomically, so concurrent uploads of the same type
    /// each learn exactly which location they replaced.
    fn upsert(
        &self,
        input: UpsertDocumentInput,
    ) -> impl std::future::Future<Output = Result<UpsertedDocument, DocumentError>> + Send;

    /// Documents of an application, newest first.
    fn list_by_application(
        &self,
        application_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send;

    /// Delete document metadata.
    fn delete(&self, id: Uuid) -> impl std::future::Future<Output = Result<bool, DocumentError>> + Send;

    /// Bytes kept on the row by the database backend.
    fn load_content(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Bytes>, DocumentError>> + Send;
}

/// Document service: uploads, downloads and deletions under the access policy.
pub struct DocumentService<R: DocumentRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Create a new document service.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    /// Upload a document, replacing any existing one of the same type.
    ///
    /// The new bytes are written under a fresh name first, then the metadata
    /// row is swapped in a single upsert, then the bytes that upsert displaced
    /// are discarded. A failed discard is logged and does not fail the upload.
    ///
    /// # Errors
    ///
    /// - `ApplicationNotFound` if the application is absent
    /// - `Denied(Forbidden)` unless the actor is the applicant
    /// - `Storage` with a validation cause for oversized or disallowed files
    /// - `Storage` or `Repository` when persisting fails
    pub async fn upload(
        &self,
        actor: &Actor,
        application_id: Uuid,
        document_type: DocumentType,
        file: UploadedFile,
    ) -> Result<Document, DocumentError> {
        let facts = self.application_facts(application_id).await?;
        policy::upload_document(actor, &facts)?;
        self.storage.validate_upload(&file)?;

        let dir = format!("{application_id}/{}", document_type.dir_name());
        let path = self.storage.save(&file, &dir).await?;
        let content = self
            .storage
            .stores_content_inline()
            .then(|| file.bytes.clone());

        let input = UpsertDocumentInput {
            application_id,
            document_type,
            original_name: file.original_name,
            mime_type: file.mime_type,
            size: i64::try_from(file.size).unwrap_or(i64::MAX),
            storage_backend: self.storage.provider_name().to_string(),
            storage_path: path.clone(),
            content,
        };

        let UpsertedDocument {
            document,
            superseded,
        } = match self.repo.upsert(input).await {
            Ok(upserted) => upserted,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&path).await {
                    tracing::warn!(error = %cleanup, path = %path, "Failed to remove orphaned upload");
                }
                return Err(e);
            }
        };

        if let Some(previous) = superseded.filter(|p| p.path != document.storage_path) {
            self.storage.discard(&previous).await;
        }

        tracing::info!(
            document_id = %document.id,
            application_id = %application_id,
            document_type = document_type.as_str(),
            size = document.size,
            "Document uploaded"
        );
        Ok(document)
    }

    /// Fetch a document and its bytes.
    ///
    /// The access policy is checked before any bytes are read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Denied(Forbidden)`, or `Storage`/`ContentMissing`
    /// when the bytes cannot be read.
    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<DocumentContent, DocumentError> {
        let document = self.find(id).await?;
        let facts = self.application_facts(document.application_id).await?;
        policy::view_document(actor, &facts)?;

        // Rows of the database backend carry their bytes whatever backend is active.
        let bytes = if document.storage_backend == DATABASE_BACKEND {
            self.repo
                .load_content(id)
                .await?
                .ok_or(DocumentError::ContentMissing(id))?
        } else {
            self.storage.read(&document.stored_file()).await?
        };

        Ok(DocumentContent { document, bytes })
    }

    /// Delete a document: bytes first, then metadata. Applicant only.
    ///
    /// Bytes written by an inactive file backend are skipped with a warning,
    /// the same way superseded files are.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Denied(Forbidden)`, or `Storage` if the bytes cannot be removed.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), DocumentError> {
        let document = self.find(id).await?;
        let facts = self.application_facts(document.application_id).await?;
        policy::delete_document(actor, &facts)?;

        match document.storage_backend.as_str() {
            DATABASE_BACKEND => {}
            backend if backend == self.storage.provider_name() => {
                self.storage.delete(&document.storage_path).await?;
            }
            _ => self.storage.discard(&document.stored_file()).await,
        }
        if !self.repo.delete(id).await? {
            return Err(DocumentError::NotFound(id));
        }

        tracing::info!(document_id = %id, "Document deleted");
        Ok(())
    }

    /// Documents of an application, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationNotFound` or `Denied(Forbidden)`.
    pub async fn list(&self, actor: &Actor, application_id: Uuid) -> Result<Vec<Document>, DocumentError> {
        let facts = self.application_facts(application_id).await?;
        policy::view_application(actor, &facts)?;
        self.repo.list_by_application(application_id).await
    }

    async fn find(&self, id: Uuid) -> Result<Document, DocumentError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DocumentError::NotFound(id))
    }

    async fn application_facts(&self, application_id: Uuid) -> Result<ApplicationFacts, DocumentError> {
        self.repo
            .find_application_facts(application_id)
            .await?
            .ok_or(DocumentError::ApplicationNotFound(application_id))
    }
}

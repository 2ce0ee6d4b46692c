//! Document repository for database operations.
//!
//! Metadata queries never select `file_data`; the bytes are only read by
//! [`load_content`](DocumentRepoTrait::load_content).

use bytes::Bytes;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    application_documents, applications, sea_orm_active_enums::DocumentType as DbDocumentType,
};
use jobboard_core::document::{
    Document, DocumentError, DocumentRepository as DocumentRepoTrait, DocumentType,
    UpsertDocumentInput, UpsertedDocument,
};
use jobboard_core::policy::ApplicationFacts;
use jobboard_core::storage::StoredFile;

use application_documents::Column;

/// Document repository implementation.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Create a new document repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn find_metadata() -> Select<application_documents::Entity> {
        application_documents::Entity::find()
            .select_only()
            .columns([
                Column::Id,
                Column::ApplicationId,
                Column::DocumentType,
                Column::OriginalName,
                Column::MimeType,
                Column::Size,
                Column::StorageBackend,
                Column::StoragePath,
                Column::UploadedAt,
            ])
    }
}

/// Document row without its content.
#[derive(Debug, FromQueryResult)]
struct DocumentRow {
    id: Uuid,
    application_id: Uuid,
    document_type: DbDocumentType,
    original_name: String,
    mime_type: String,
    size: i64,
    storage_backend: String,
    storage_path: String,
    uploaded_at: sea_orm::prelude::DateTimeWithTimeZone,
}

impl DocumentRepoTrait for DocumentRepository {
    async fn find_application_facts(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationFacts>, DocumentError> {
        let row = applications::Entity::find_by_id(application_id)
            .find_also_related(crate::entities::offers::Entity)
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(row.and_then(|(application, offer)| {
            offer.map(|offer| ApplicationFacts {
                applicant_id: application.user_id,
                recruiter_id: offer.recruiter_id,
            })
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentError> {
        let row = Self::find_metadata()
            .filter(Column::Id.eq(id))
            .into_model::<DocumentRow>()
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(row.map(to_domain))
    }

    async fn upsert(&self, input: UpsertDocumentInput) -> Result<UpsertedDocument, DocumentError> {
        let id = Uuid::now_v7();
        let application_id = input.application_id;
        let document_type = to_db_document_type(input.document_type);

        let active_model = application_documents::ActiveModel {
            id: Set(id),
            application_id: Set(application_id),
            document_type: Set(document_type.clone()),
            original_name: Set(input.original_name),
            mime_type: Set(input.mime_type),
            size: Set(input.size),
            storage_backend: Set(input.storage_backend),
            storage_path: Set(input.storage_path),
            file_data: Set(input.content.map(|b| b.to_vec())),
            uploaded_at: Set(Utc::now().into()),
        };

        let txn = self.db.begin().await.map_err(|e| DocumentError::repository(e.to_string()))?;

        // Uploads to one application queue on its row until this transaction ends.
        applications::Entity::find_by_id(application_id)
            .select_only()
            .column(applications::Column::Id)
            .lock_exclusive()
            .into_tuple::<Uuid>()
            .one(&txn)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        let superseded: Option<(String, String)> = application_documents::Entity::find()
            .select_only()
            .column(Column::StorageBackend)
            .column(Column::StoragePath)
            .filter(Column::ApplicationId.eq(application_id))
            .filter(Column::DocumentType.eq(document_type))
            .into_tuple()
            .one(&txn)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        application_documents::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([Column::ApplicationId, Column::DocumentType])
                    .update_columns([
                        Column::Id,
                        Column::OriginalName,
                        Column::MimeType,
                        Column::Size,
                        Column::StorageBackend,
                        Column::StoragePath,
                        Column::FileData,
                        Column::UploadedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        let row = Self::find_metadata()
            .filter(Column::Id.eq(id))
            .into_model::<DocumentRow>()
            .one(&txn)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?
            .ok_or_else(|| DocumentError::repository("document replaced before commit"))?;

        txn.commit().await.map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(UpsertedDocument {
            document: to_domain(row),
            superseded: superseded.map(|(backend, path)| StoredFile { backend, path }),
        })
    }

    async fn list_by_application(&self, application_id: Uuid) -> Result<Vec<Document>, DocumentError> {
        let rows = Self::find_metadata()
            .filter(Column::ApplicationId.eq(application_id))
            .order_by_desc(Column::UploadedAt)
            .order_by_desc(Column::Id)
            .into_model::<DocumentRow>()
            .all(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentError> {
        let result = application_documents::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn load_content(&self, id: Uuid) -> Result<Option<Bytes>, DocumentError> {
        let data: Option<Option<Vec<u8>>> = application_documents::Entity::find_by_id(id)
            .select_only()
            .column(Column::FileData)
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(data.flatten().map(Bytes::from))
    }
}

/// Stored files of every document attached to the selected applications.
pub(crate) async fn stored_files_for(
    db: &DatabaseConnection,
    applications: Select<applications::Entity>,
) -> Result<Vec<StoredFile>, DbErr> {
    let application_ids = applications
        .select_only()
        .column(applications::Column::Id)
        .into_query();

    let rows: Vec<(String, String)> = application_documents::Entity::find()
        .select_only()
        .column(Column::StorageBackend)
        .column(Column::StoragePath)
        .filter(Column::ApplicationId.in_subquery(application_ids))
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(backend, path)| StoredFile { backend, path })
        .collect())
}

/// Convert domain document type to database enum.
fn to_db_document_type(t: DocumentType) -> DbDocumentType {
    match t {
        DocumentType::Cv => DbDocumentType::Cv,
        DocumentType::CoverLetter => DbDocumentType::CoverLetter,
    }
}

/// Convert database document type to domain enum.
fn from_db_document_type(t: &DbDocumentType) -> DocumentType {
    match t {
        DbDocumentType::Cv => DocumentType::Cv,
        DbDocumentType::CoverLetter => DocumentType::CoverLetter,
    }
}

/// Convert database row to domain model.
fn to_domain(row: DocumentRow) -> Document {
    Document {
        id: row.id,
        application_id: row.application_id,
        document_type: from_db_document_type(&row.document_type),
        original_name: row.original_name,
        mime_type: row.mime_type,
        size: row.size,
        storage_backend: row.storage_backend,
        storage_path: row.storage_path,
        uploaded_at: row.uploaded_at.with_timezone(&Utc),
    }
}

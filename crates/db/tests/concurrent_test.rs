//! Concurrent document replacement against a real repository.
//!
//! Many uploads of the same document type race on one application. Whatever
//! the interleaving, one row survives, every caller gets back the row it
//! wrote, and only the surviving row's bytes stay in storage.

#![allow(clippy::cast_possible_wrap)]

mod common;

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use common::{create_offer, create_recruiter, create_user, setup};
use futures::future::join_all;
use jobboard_core::application::{ApplicationRepository as _, NewApplication};
use jobboard_core::auth::Role;
use jobboard_core::document::{Document, DocumentError, DocumentService, DocumentType};
use jobboard_core::policy::Actor;
use jobboard_core::storage::{StorageConfig, StorageKind, StorageService, UploadedFile};
use jobboard_db::entities::application_documents;
use jobboard_db::{ApplicationRepository, DocumentRepository};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tempfile::TempDir;
use tokio::sync::Barrier;
use uuid::Uuid;

const UPLOADS: usize = 16;

fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() { count_files(&path) } else { 1 }
        })
        .sum()
}

/// An application and its applicant.
async fn application(db: &DatabaseConnection) -> (Uuid, Actor) {
    let recruiter = create_recruiter(db).await;
    let applicant = create_user(db, Role::Applicant, None).await;
    let offer = create_offer(db, &recruiter, "Data engineer").await;
    let application = ApplicationRepository::new(db.clone())
        .create(NewApplication {
            user_id: applicant.id,
            offer_id: offer.id,
            company_id: offer.company_id,
        })
        .await
        .expect("apply");
    (application.id, Actor::new(applicant.id, Role::Applicant))
}

/// Fire `UPLOADS` CV uploads at once and check every caller got its own row back.
///
/// Returns how many returned documents are still readable.
async fn race_uploads(db: &DatabaseConnection, config: StorageConfig) -> usize {
    let (application_id, actor) = application(db).await;
    let storage = Arc::new(StorageService::from_config(config).expect("storage"));
    let service = Arc::new(DocumentService::new(
        storage,
        Arc::new(DocumentRepository::new(db.clone())),
    ));

    let barrier = Arc::new(Barrier::new(UPLOADS));
    let mut handles = Vec::with_capacity(UPLOADS);

    for i in 0..UPLOADS {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);

        handles.push(tokio::spawn(async move {
            let name = format!("cv-{i}.pdf");
            let body = Bytes::from(format!("%PDF-1.7 revision {i}"));
            let file = UploadedFile::new(&name, "application/pdf", body.clone());

            barrier.wait().await;
            let document = service
                .upload(&actor, application_id, DocumentType::Cv, file)
                .await;
            (name, body, document)
        }));
    }

    let mut uploaded: Vec<(String, Bytes, Document)> = Vec::with_capacity(UPLOADS);
    for result in join_all(handles).await {
        let (name, body, document) = result.expect("task panicked");
        let document = document.unwrap_or_else(|e| panic!("upload of {name} failed: {e}"));
        assert_eq!(document.original_name, name);
        assert_eq!(document.size, body.len() as i64);
        uploaded.push((name, body, document));
    }

    let mut ids: Vec<Uuid> = uploaded.iter().map(|(_, _, d)| d.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), UPLOADS, "every upload returns its own row");

    let mut current = 0;
    for (name, body, document) in &uploaded {
        match service.get(&actor, document.id).await {
            Ok(content) => {
                assert_eq!(&content.bytes, body, "{name} served another upload's bytes");
                assert_eq!(&content.document.original_name, name);
                current += 1;
            }
            Err(DocumentError::NotFound(_)) => {}
            Err(e) => panic!("reading {name} failed: {e}"),
        }
    }

    let rows = application_documents::Entity::find()
        .count(db)
        .await
        .expect("count");
    assert_eq!(rows, 1);

    let listed = service.list(&actor, application_id).await.expect("list");
    assert_eq!(listed.len(), 1);

    current
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_local_uploads_keep_one_file() {
    let db = setup().await;
    let dir = TempDir::new().expect("tempdir");

    let current = race_uploads(&db, StorageConfig::local(dir.path())).await;

    assert_eq!(current, 1, "exactly one upload stays current");
    assert_eq!(count_files(dir.path()), 1, "superseded uploads leave no files");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_database_uploads_keep_one_row() {
    let db = setup().await;

    let current = race_uploads(&db, StorageConfig::new(StorageKind::Database)).await;

    assert_eq!(current, 1, "exactly one upload stays current");
}

//! Integration tests for the repositories against an in-memory `SQLite` database.

mod common;

use bytes::Bytes;
use common::{create_offer, create_recruiter, create_user, setup};
use jobboard_core::application::{
    ApplicationError, ApplicationRepository as _, ApplicationStatus, NewApplication,
};
use jobboard_core::auth::Role;
use jobboard_core::document::{DocumentRepository as _, DocumentType, UpsertDocumentInput};
use jobboard_core::offer::{OfferRepository as _, OfferStatus};
use jobboard_db::entities::{application_documents, applications, offers};
use jobboard_db::{
    ApplicationRepository, CompanyRepository, DocumentRepository, OfferRepository,
    StatsRepository, UpdateProfileInput, UserRepository, is_unique_violation,
};
use jobboard_shared::types::PageRequest;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

fn document_input(application_id: Uuid, name: &str, path: &str, content: Option<&'static [u8]>) -> UpsertDocumentInput {
    UpsertDocumentInput {
        application_id,
        document_type: DocumentType::Cv,
        original_name: name.to_string(),
        mime_type: "application/pdf".to_string(),
        size: content.map_or(3, |c| c.len() as i64),
        storage_backend: if content.is_some() { "database" } else { "local" }.to_string(),
        storage_path: path.to_string(),
        content: content.map(Bytes::from_static),
    }
}

#[tokio::test]
async fn test_user_create_find_and_update() {
    let db = setup().await;
    let repo = UserRepository::new(db.clone());
    let user = create_user(&db, Role::Applicant, None).await;

    let found = repo
        .find_by_email(&user.email)
        .await
        .expect("Failed to query user")
        .expect("User should exist");
    assert_eq!(found.id, user.id);
    assert!(repo.email_exists(&user.email).await.expect("query"));
    assert!(!repo.email_exists("nobody@example.com").await.expect("query"));

    let updated = repo
        .update_profile(
            user.id,
            UpdateProfileInput {
                first_name: Some("Ada".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update profile")
        .expect("User should exist");
    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.last_name, "User");

    assert!(repo.update_password(user.id, "$argon2id$new").await.expect("update"));
    let reloaded = repo.find_by_id(user.id).await.expect("query").expect("exists");
    assert_eq!(reloaded.password_hash, "$argon2id$new");

    let missing = repo
        .update_profile(Uuid::new_v4(), UpdateProfileInput::default())
        .await
        .expect("query");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_unique_violation() {
    let db = setup().await;
    let repo = UserRepository::new(db.clone());
    let user = create_user(&db, Role::Applicant, None).await;

    let err = repo
        .create(jobboard_db::CreateUserInput {
            email: user.email.clone(),
            password_hash: "x".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            role: Role::Applicant,
            company_id: None,
        })
        .await
        .expect_err("duplicate email must fail");
    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn test_company_find_or_create_reuses_by_name() {
    let db = setup().await;
    let repo = CompanyRepository::new(db);

    let first = repo.find_or_create("Zeta", "Retail").await.expect("create");
    let again = repo.find_or_create("Zeta", "Ignored").await.expect("find");
    assert_eq!(first.id, again.id);
    assert_eq!(again.sector, "Retail");

    repo.create("Alpha", "Banking").await.expect("create");
    let names: Vec<_> = repo.list().await.expect("list").into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);

    let err = repo.create("Alpha", "Other").await.expect_err("duplicate");
    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn test_offer_listing_skips_paused_and_paginates() {
    let db = setup().await;
    let repo = OfferRepository::new(db.clone());
    let recruiter = create_recruiter(&db).await;

    for i in 0..5 {
        create_offer(&db, &recruiter, &format!("Offer {i}")).await;
    }
    let paused = create_offer(&db, &recruiter, "Paused").await;
    let paused = repo
        .set_status(paused.id, OfferStatus::Paused)
        .await
        .expect("pause");
    assert!(paused.is_paused());

    let (page1, total) = repo
        .list_active(PageRequest { page: 1, per_page: 2 })
        .await
        .expect("list");
    assert_eq!(total, 5);
    assert_eq!(page1.len(), 2);

    let (page3, _) = repo
        .list_active(PageRequest { page: 3, per_page: 2 })
        .await
        .expect("list");
    assert_eq!(page3.len(), 1);
    assert!(page3.iter().all(|o| o.status == OfferStatus::Active));

    let mine = repo.list_by_recruiter(recruiter.id).await.expect("list");
    assert_eq!(mine.len(), 6);
    assert_eq!(
        repo.recruiter_company(recruiter.id).await.expect("query"),
        recruiter.company_id
    );
}

#[tokio::test]
async fn test_offer_set_columns_round_trip() {
    let db = setup().await;
    let repo = OfferRepository::new(db.clone());
    let recruiter = create_recruiter(&db).await;
    let offer = create_offer(&db, &recruiter, "Backend").await;

    let mut content = jobboard_core::offer::CreateOfferInput {
        title: "Backend engineer".to_string(),
        description: offer.description.clone(),
        location: offer.location.clone(),
        contract_types: vec![
            jobboard_core::offer::ContractType::FullTime,
            jobboard_core::offer::ContractType::Freelance,
        ],
        experience_level: Some(jobboard_core::offer::ExperienceLevel::Senior),
        remote_policy: Some(jobboard_core::offer::RemotePolicy::Hybrid),
        disability_compatible: vec![jobboard_core::offer::DisabilityCategory::Mobility],
    };
    let updated = repo.update(offer.id, content.clone()).await.expect("update");
    assert_eq!(updated.title, "Backend engineer");
    assert_eq!(updated.contract_types, content.contract_types);
    assert_eq!(updated.experience_level, content.experience_level);
    assert_eq!(updated.disability_compatible, content.disability_compatible);

    content.experience_level = None;
    let cleared = repo.update(offer.id, content).await.expect("update");
    assert_eq!(cleared.experience_level, None);
}

#[tokio::test]
async fn test_duplicate_application_is_already_applied() {
    let db = setup().await;
    let repo = ApplicationRepository::new(db.clone());
    let recruiter = create_recruiter(&db).await;
    let applicant = create_user(&db, Role::Applicant, None).await;
    let offer = create_offer(&db, &recruiter, "Data engineer").await;

    let input = NewApplication {
        user_id: applicant.id,
        offer_id: offer.id,
        company_id: offer.company_id,
    };
    let application = repo.create(input.clone()).await.expect("first apply");
    assert_eq!(application.status, ApplicationStatus::NotViewed);
    assert_eq!(application.offer_title, "Data engineer");
    assert_eq!(application.recruiter_id, recruiter.id);
    assert_eq!(application.company_id, recruiter.company_id);

    let err = repo.create(input).await.expect_err("second apply");
    assert!(matches!(err, ApplicationError::AlreadyApplied(id) if id == offer.id));
    assert!(repo.exists_for_user(applicant.id, offer.id).await.expect("query"));
    assert_eq!(repo.list_by_offer(offer.id).await.expect("list").len(), 1);
}

#[tokio::test]
async fn test_application_status_update() {
    let db = setup().await;
    let repo = ApplicationRepository::new(db.clone());
    let recruiter = create_recruiter(&db).await;
    let applicant = create_user(&db, Role::Applicant, None).await;
    let offer = create_offer(&db, &recruiter, "QA").await;
    let application = repo
        .create(NewApplication {
            user_id: applicant.id,
            offer_id: offer.id,
            company_id: offer.company_id,
        })
        .await
        .expect("apply");

    let viewed = repo
        .update_status(application.id, ApplicationStatus::Viewed)
        .await
        .expect("update");
    assert_eq!(viewed.status, ApplicationStatus::Viewed);
    assert_eq!(viewed.offer_title, "QA");

    let err = repo
        .update_status(Uuid::new_v4(), ApplicationStatus::Viewed)
        .await
        .expect_err("missing application");
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn test_document_upsert_replaces_row() {
    let db = setup().await;
    let repo = DocumentRepository::new(db.clone());
    let recruiter = create_recruiter(&db).await;
    let applicant = create_user(&db, Role::Applicant, None).await;
    let offer = create_offer(&db, &recruiter, "Ops").await;
    let application = ApplicationRepository::new(db.clone())
        .create(NewApplication {
            user_id: applicant.id,
            offer_id: offer.id,
            company_id: offer.company_id,
        })
        .await
        .expect("apply");

    let first = repo
        .upsert(document_input(application.id, "cv-v1.pdf", "database://a/1", Some(b"v1")))
        .await
        .expect("upsert");
    assert!(first.superseded.is_none());
    let replaced = repo
        .upsert(document_input(application.id, "cv-v2.pdf", "database://a/2", Some(b"v2!")))
        .await
        .expect("upsert");
    let superseded = replaced.superseded.expect("first row displaced");
    assert_eq!(superseded.path, "database://a/1");
    assert_eq!(superseded.backend, "database");
    let (first, second) = (first.document, replaced.document);

    assert_ne!(first.id, second.id);
    assert_eq!(second.original_name, "cv-v2.pdf");
    assert_eq!(second.size, 3);

    let rows = application_documents::Entity::find()
        .count(&db)
        .await
        .expect("count");
    assert_eq!(rows, 1);

    assert!(repo.find_by_id(first.id).await.expect("query").is_none());
    let content = repo.load_content(second.id).await.expect("load");
    assert_eq!(content, Some(Bytes::from_static(b"v2!")));

    let facts = repo
        .find_application_facts(application.id)
        .await
        .expect("facts")
        .expect("application exists");
    assert_eq!(facts.applicant_id, applicant.id);
    assert_eq!(facts.recruiter_id, recruiter.id);

    let listed = repo.list_by_application(application.id).await.expect("list");
    assert_eq!(listed.len(), 1);

    assert!(repo.delete(second.id).await.expect("delete"));
    assert!(!repo.delete(second.id).await.expect("delete again"));
}

#[tokio::test]
async fn test_local_document_has_no_inline_content() {
    let db = setup().await;
    let repo = DocumentRepository::new(db.clone());
    let recruiter = create_recruiter(&db).await;
    let applicant = create_user(&db, Role::Applicant, None).await;
    let offer = create_offer(&db, &recruiter, "Ops").await;
    let application = ApplicationRepository::new(db.clone())
        .create(NewApplication {
            user_id: applicant.id,
            offer_id: offer.id,
            company_id: offer.company_id,
        })
        .await
        .expect("apply");

    let doc = repo
        .upsert(document_input(application.id, "cv.pdf", "app/cv/file.pdf", None))
        .await
        .expect("upsert")
        .document;
    assert_eq!(doc.storage_backend, "local");
    assert_eq!(repo.load_content(doc.id).await.expect("load"), None);
}

#[tokio::test]
async fn test_deleting_recruiter_cascades_and_lists_files() {
    let db = setup().await;
    let users = UserRepository::new(db.clone());
    let apps = ApplicationRepository::new(db.clone());
    let docs = DocumentRepository::new(db.clone());

    let recruiter = create_recruiter(&db).await;
    let other_recruiter = create_recruiter(&db).await;
    let offer_a = create_offer(&db, &recruiter, "A").await;
    let offer_b = create_offer(&db, &recruiter, "B").await;
    let elsewhere = create_offer(&db, &other_recruiter, "Elsewhere").await;

    let mut received = Vec::new();
    for offer in [&offer_a, &offer_b, &offer_a] {
        let applicant = create_user(&db, Role::Applicant, None).await;
        let application = apps
            .create(NewApplication {
                user_id: applicant.id,
                offer_id: offer.id,
                company_id: offer.company_id,
            })
            .await
            .expect("apply");
        docs.upsert(document_input(
            application.id,
            "cv.pdf",
            &format!("{}/cv/x.pdf", application.id),
            None,
        ))
        .await
        .expect("upsert");
        received.push(application.id);
    }

    // The recruiter also applied to someone else's offer.
    let own = apps
        .create(NewApplication {
            user_id: recruiter.id,
            offer_id: elsewhere.id,
            company_id: elsewhere.company_id,
        })
        .await
        .expect("apply");
    docs.upsert(document_input(own.id, "cv.pdf", "own/cv/x.pdf", None))
        .await
        .expect("upsert");

    let files = users.stored_files(recruiter.id).await.expect("files");
    assert_eq!(files.len(), 4);
    assert!(files.iter().any(|f| f.path == "own/cv/x.pdf"));

    assert!(users.delete(recruiter.id).await.expect("delete"));

    assert_eq!(offers::Entity::find().count(&db).await.expect("count"), 1);
    assert_eq!(applications::Entity::find().count(&db).await.expect("count"), 0);
    assert_eq!(
        application_documents::Entity::find().count(&db).await.expect("count"),
        0
    );
    for id in received {
        assert!(apps.find_by_id(id).await.expect("query").is_none());
    }
}

#[tokio::test]
async fn test_offer_stored_files_scoped_to_offer() {
    let db = setup().await;
    let offers_repo = OfferRepository::new(db.clone());
    let apps = ApplicationRepository::new(db.clone());
    let docs = DocumentRepository::new(db.clone());
    let recruiter = create_recruiter(&db).await;
    let offer = create_offer(&db, &recruiter, "Kept").await;
    let other = create_offer(&db, &recruiter, "Other").await;

    for (target, path) in [(&offer, "p1"), (&other, "p2")] {
        let applicant = create_user(&db, Role::Applicant, None).await;
        let application = apps
            .create(NewApplication {
                user_id: applicant.id,
                offer_id: target.id,
                company_id: target.company_id,
            })
            .await
            .expect("apply");
        docs.upsert(document_input(application.id, "cv.pdf", path, None))
            .await
            .expect("upsert");
    }

    let files = offers_repo.stored_files(offer.id).await.expect("files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "p1");
    assert_eq!(files[0].backend, "local");
}

#[tokio::test]
async fn test_stats_for_both_roles() {
    let db = setup().await;
    let stats = StatsRepository::new(db.clone());
    let apps = ApplicationRepository::new(db.clone());
    let offers_repo = OfferRepository::new(db.clone());

    let recruiter = create_recruiter(&db).await;
    let applicant = create_user(&db, Role::Applicant, None).await;
    let first = create_offer(&db, &recruiter, "First").await;
    let second = create_offer(&db, &recruiter, "Second").await;
    offers_repo
        .set_status(second.id, OfferStatus::Paused)
        .await
        .expect("pause");

    let mut ids = Vec::new();
    for offer in [&first, &second] {
        let application = apps
            .create(NewApplication {
                user_id: applicant.id,
                offer_id: offer.id,
                company_id: offer.company_id,
            })
            .await
            .expect("apply");
        ids.push(application.id);
    }
    apps.update_status(ids[0], ApplicationStatus::Viewed)
        .await
        .expect("view");

    let r = stats.recruiter(recruiter.id).await.expect("stats");
    assert_eq!(r.offers_total, 2);
    assert_eq!(r.offers_active, 1);
    assert_eq!(r.applications_total, 2);
    assert_eq!(r.applications_not_viewed, 1);

    let a = stats.applicant(applicant.id).await.expect("stats");
    assert_eq!(a.applications_total, 2);
    assert_eq!(a.applications_viewed, 1);
    assert_eq!(a.applications_not_viewed, 1);
}

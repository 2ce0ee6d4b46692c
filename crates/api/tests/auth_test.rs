//! HTTP tests for registration, login and account management.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.json("GET", "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
    assert_eq!(body["storage"], "database");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;
    let register = json!({
        "email": "jane@example.com",
        "password": "correct horse battery",
        "first_name": "Jane",
        "last_name": "Doe",
        "role": "APPLICANT",
    });

    let (status, body) = app
        .json("POST", "/api/v1/auth/register", None, Some(register.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "APPLICANT");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = app
        .json("POST", "/api/v1/auth/register", None, Some(register))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "wrong password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "correct horse battery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expires_in"], 3600);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = app.json("GET", "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jane@example.com");
    assert_eq!(body["first_name"], "Jane");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::new().await;
    let (status, _) = app
        .json(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "ghost@example.com", "password": "whatever" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_admin_and_companyless_recruiter() {
    let app = TestApp::new().await;
    for (role, company) in [("ADMIN", None::<&str>), ("RECRUITER", None), ("JANITOR", None)] {
        let (status, body) = app
            .json(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": format!("{}@example.com", role.to_lowercase()),
                    "password": "correct horse battery",
                    "first_name": "A",
                    "last_name": "B",
                    "role": role,
                    "company_name": company,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{role}");
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new().await;
    let (status, body) = app
        .json(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "short@example.com",
                "password": "short",
                "first_name": "A",
                "last_name": "B",
                "role": "APPLICANT",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_recruiters_share_company_by_name() {
    let app = TestApp::new().await;
    let (_, first) = app.register("RECRUITER", Some("Acme")).await;
    let (_, second) = app.register("RECRUITER", Some("Acme")).await;

    let (_, me1) = app.json("GET", "/api/v1/users/me", Some(&first), None).await;
    let (_, me2) = app.json("GET", "/api/v1/users/me", Some(&second), None).await;
    assert!(me1["company_id"].is_string());
    assert_eq!(me1["company_id"], me2["company_id"]);

    let (status, companies) = app.json("GET", "/api/v1/companies", Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(companies.as_array().unwrap().len(), 1);
    assert_eq!(companies[0]["name"], "Acme");

    let (status, _) = app
        .json(
            "POST",
            "/api/v1/companies",
            Some(&first),
            Some(json!({ "name": "Acme", "sector": "Retail" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/companies",
            Some(&first),
            Some(json!({ "name": "Globex", "sector": "Energy" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sector"], "Energy");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::new().await;

    let (status, body) = app.json("GET", "/api/v1/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");

    let (status, body) = app
        .json("GET", "/api/v1/users/me", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_account_changes_are_owner_only() {
    let app = TestApp::new().await;
    let (alice, alice_token) = app.applicant().await;
    let (_, bob_token) = app.applicant().await;

    let (status, _) = app
        .json(
            "PATCH",
            &format!("/api/v1/users/{alice}"),
            Some(&bob_token),
            Some(json!({ "first_name": "Mallory" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .json("DELETE", &format!("/api/v1/users/{alice}"), Some(&bob_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .json(
            "PATCH",
            &format!("/api/v1/users/{alice}"),
            Some(&alice_token),
            Some(json!({ "first_name": "Alice" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Alice");
    assert_eq!(body["last_name"], "User");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;
    let (id, token) = app.applicant().await;
    let (_, me) = app.json("GET", "/api/v1/users/me", Some(&token), None).await;
    let email = me["email"].as_str().unwrap().to_string();

    let (status, _) = app
        .json(
            "PUT",
            &format!("/api/v1/users/{id}/password"),
            Some(&token),
            Some(json!({ "current_password": "wrong", "new_password": "a brand new secret" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json(
            "PUT",
            &format!("/api/v1/users/{id}/password"),
            Some(&token),
            Some(json!({
                "current_password": "correct horse battery",
                "new_password": "a brand new secret",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .json(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "a brand new secret" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_account() {
    let app = TestApp::new().await;
    let (id, token) = app.applicant().await;

    let (status, _) = app
        .json("DELETE", &format!("/api/v1/users/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.json("GET", "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

use actix_web::{http::header, http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

use taskhub::auth::{AuthResponse, TokenService};
use taskhub::repository::memory::{MemoryCredentialStore, MemoryTaskRepository};
use taskhub::repository::CredentialStore;
use taskhub::routes;
use taskhub::usecase::TaskUsecase;

const TEST_SECRET: &str = "integration-test-secret";

fn deps() -> (TaskUsecase, Arc<dyn CredentialStore>, TokenService) {
    let usecase = TaskUsecase::new(Arc::new(MemoryTaskRepository::new()));
    let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
    let token_service = TokenService::new(TEST_SECRET);
    (usecase, store, token_service)
}

macro_rules! test_app {
    () => {{
        let (usecase, store, token_service) = deps();
        test::init_service(
            App::new()
                .app_data(web::Data::new(usecase))
                .app_data(web::Data::from(store))
                .app_data(web::Data::new(token_service.clone()))
                .configure(|cfg| routes::config(cfg, token_service.clone())),
        )
        .await
    }};
}

async fn register_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    email: &str,
    password: &str,
) -> StatusCode {
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(&json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .to_request();
    test::call_service(app, req).await.status()
}

#[actix_rt::test]
async fn test_register_then_duplicate_username_conflicts() {
    let app = test_app!();

    let status = register_user(&app, "alice", "a@x.com", "p@ssword").await;
    assert_eq!(status, StatusCode::CREATED);

    // Same username, different email: still a conflict, naming the username.
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(&json!({
            "username": "alice",
            "email": "other@x.com",
            "password": "p@ssword"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "username already exists");
}

#[actix_rt::test]
async fn test_duplicate_email_conflicts() {
    let app = test_app!();

    assert_eq!(
        register_user(&app, "alice", "a@x.com", "p@ssword").await,
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(&json!({
            "username": "bob",
            "email": "a@x.com",
            "password": "p@ssword"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "email already exists");
}

#[actix_rt::test]
async fn test_register_validation() {
    let app = test_app!();

    // Invalid email
    assert_eq!(
        register_user(&app, "alice", "invalid-email", "p@ssword").await,
        StatusCode::BAD_REQUEST
    );

    // Short password
    assert_eq!(
        register_user(&app, "alice", "a@x.com", "short").await,
        StatusCode::BAD_REQUEST
    );

    // Username with spaces
    assert_eq!(
        register_user(&app, "bad user", "a@x.com", "p@ssword").await,
        StatusCode::BAD_REQUEST
    );
}

#[actix_rt::test]
async fn test_login_returns_valid_token() {
    let app = test_app!();
    assert_eq!(
        register_user(&app, "alice", "a@x.com", "p@ssword").await,
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(&json!({"username": "alice", "password": "p@ssword"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let auth: AuthResponse = test::read_body_json(resp).await;

    // The issued token carries the identity and role claims.
    let claims = TokenService::new(TEST_SECRET).validate(&auth.token).unwrap();
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.role, "user");

    // And grants access to the protected surface.
    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", auth.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_login_failures_are_generic_401() {
    let app = test_app!();
    assert_eq!(
        register_user(&app, "alice", "a@x.com", "p@ssword").await,
        StatusCode::CREATED
    );

    // Wrong password
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(&json!({"username": "alice", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid credentials");

    // Unknown user gets the same answer.
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(&json!({"username": "nobody", "password": "p@ssword"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid credentials");
}

#[actix_rt::test]
async fn test_protected_routes_reject_bad_authorization_headers() {
    let app = test_app!();

    // No Authorization header at all.
    let req = test::TestRequest::get().uri("/tasks").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Wrong scheme.
    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, "Token abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Scheme without a token.
    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, "Bearer"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Three parts.
    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, "Bearer abc def"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Well-formed header, garbage token.
    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Token signed with a different secret.
    let foreign = TokenService::new("some-other-secret");
    let user = taskhub::models::User {
        id: uuid::Uuid::new_v4(),
        username: "mallory".to_string(),
        password_hash: String::new(),
        email: "m@x.com".to_string(),
        role: taskhub::models::Role::Admin,
    };
    let token = foreign.issue(&user).unwrap();
    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = test_app!();
    assert_eq!(
        register_user(&app, "alice", "a@x.com", "p@ssword").await,
        StatusCode::CREATED
    );
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(&json!({"username": "alice", "password": "p@ssword"}))
        .to_request();
    let auth: AuthResponse = test::read_body_json(test::call_service(&app, req).await).await;

    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("bEaReR {}", auth.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

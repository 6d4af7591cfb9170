#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use scholaris::router::init_router;
use scholaris::state::AppState;
use scholaris_auth::AccessClaims;
use scholaris_cache::MemoryRevocationList;
use scholaris_config::{CorsConfig, JwtConfig};
use scholaris_core::{AccountStatus, Role, hash_password_with_cost};
use scholaris_db::MemoryStore;
use scholaris_models::Account;

pub const ADMIN_EMAIL: &str = "admin@school.com";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub revocations: Arc<MemoryRevocationList>,
    pub admin: Account,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(
        "integration-access-secret-at-least-32-chars",
        "integration-refresh-secret-at-least-32-chars",
    )
}

/// Router over an in-memory store seeded with one active admin.
pub fn setup_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let revocations = Arc::new(MemoryRevocationList::new());
    let state = AppState::new(
        store.clone(),
        &jwt_config(),
        revocations.clone(),
        CorsConfig::from_origins("http://localhost:5173"),
    );
    let admin = create_account(&store, ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin);

    TestApp {
        router: init_router(state.clone()),
        state,
        store,
        revocations,
        admin,
    }
}

/// Low bcrypt cost keeps the suite fast.
pub fn create_account(store: &MemoryStore, email: &str, password: &str, role: Role) -> Account {
    let hash = hash_password_with_cost(password, 4).unwrap();
    store
        .insert_account(email, &hash, role, AccountStatus::Active)
        .unwrap()
}

pub fn access_token_for(app: &TestApp, account: &Account) -> String {
    app.state
        .codec
        .issue(&AccessClaims {
            user_id: account.id,
            email: account.email.clone(),
            user_type: account.role,
            status: account.status,
        })
        .unwrap()
        .token
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

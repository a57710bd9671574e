//! Shared helpers for the integration tests.

#![allow(dead_code)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use rugs::{
    api::routes::build_app, AppState, PasswordHasher, RugStore, RugsConfig, TokenService,
};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "admin@rugs.test";
pub const ADMIN_PASSWORD: &str = "Sup3rSecretPass";

/// Cheap bcrypt cost so the suite stays fast.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::with_cost(4)
}

pub async fn create_test_store() -> RugStore {
    RugStore::new_memory()
        .await
        .expect("Failed to create in-memory database")
}

pub async fn create_test_state() -> AppState {
    let store = create_test_store().await;
    let tokens = TokenService::new(TEST_SECRET).expect("valid secret");
    AppState::new(RugsConfig::default(), store, tokens, test_hasher())
        .expect("Failed to build app state")
}

/// Inserts an admin directly, bypassing the API.
pub async fn seed_admin(state: &AppState, email: &str, password: &str) -> Uuid {
    let hash = test_hasher()
        .hash_password(password)
        .expect("should hash password");
    let id = Uuid::new_v4();
    state
        .store
        .create_admin(id, "Seeded Admin", email, &hash)
        .await
        .expect("should create admin");
    id
}

/// Test server plus the state behind it and a seeded admin.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub admin_id: Uuid,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = create_test_state().await;
        let admin_id = seed_admin(&state, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let server = TestServer::new(build_app(state.clone())).expect("Failed to create test server");

        Self {
            server,
            state,
            admin_id,
        }
    }

    /// A valid token for the seeded admin.
    pub fn admin_token(&self) -> String {
        self.state
            .tokens
            .issue(self.admin_id)
            .expect("should issue token")
    }
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value")
}

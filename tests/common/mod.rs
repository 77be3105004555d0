//! Common test utilities and helpers
//!
//! - `TestApp` - the full router over a fresh in-memory store
//! - Authentication helpers (seeded users and their tokens)
//! - Fixtures for boards, columns and cards
//! - Custom assertions

pub mod assertions;

pub use assertions::*;
pub use auth_helpers::*;
pub use fixtures::*;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum::Router;
use axum_test::{TestRequest, TestServer};
use taskboard::backend::routes::create_router;
use taskboard::backend::server::AppState;
use taskboard::backend::store::RecordStore;
use taskboard::shared::{ServerConfig, ServerConfigBuilder};

/// Secret every test token is signed with
pub const TEST_JWT_SECRET: &str = "taskboard-test-secret";

/// Configuration builder with the cheapest bcrypt cost and a fixed secret
pub fn test_config_builder() -> ServerConfigBuilder {
    ServerConfig::builder()
        .jwt_secret(TEST_JWT_SECRET)
        .bcrypt_cost(4)
}

pub fn test_config() -> ServerConfig {
    test_config_builder().build().expect("test config is valid")
}

/// The application under test
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let state = AppState::new(RecordStore::memory(), config);
        let router = create_router(state.clone());
        let server = TestServer::new(router.clone()).expect("test server starts");
        Self {
            server,
            state,
            router,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.state.store
    }

    pub fn get(&self, path: &str, token: &str) -> TestRequest {
        self.server.get(path).add_header(AUTHORIZATION, bearer(token))
    }

    pub fn post(&self, path: &str, token: &str) -> TestRequest {
        self.server.post(path).add_header(AUTHORIZATION, bearer(token))
    }

    pub fn put(&self, path: &str, token: &str) -> TestRequest {
        self.server.put(path).add_header(AUTHORIZATION, bearer(token))
    }

    pub fn delete(&self, path: &str, token: &str) -> TestRequest {
        self.server.delete(path).add_header(AUTHORIZATION, bearer(token))
    }
}

/// `Authorization` header value for `token`
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("token is a valid header value")
}

//! Common test utilities and fixtures for integration tests.
//!
//! Tests run against the in-memory store so they need no external
//! services. The Postgres store tests in `pg_store.rs` require
//! DATABASE_URL and are ignored by default.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::Value;

use sleep_tracker_backend::db::{MemoryStore, SleepStore};
use sleep_tracker_backend::{build_router, AppState};

/// Test context wrapping a fresh in-memory store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn SleepStore> = store.clone();
        let app = build_router(AppState::new(shared));
        Self { store, app }
    }

    /// Get a clone of the router for testing.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }
}

/// Post entries in order, asserting each one is accepted.
pub async fn log_entries(server: &TestServer, date: &str, items: &[(&str, &str)]) -> Vec<Value> {
    let mut created = Vec::with_capacity(items.len());
    for (entry_type, time) in items {
        let response = server
            .post("/api/entries")
            .json(&fixtures::entry_request(entry_type, time, Some(date)))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        created.push(response.json::<Value>());
    }
    created
}

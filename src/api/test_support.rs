//! Shared fixtures for the HTTP-level tests.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use httpmock::MockServer;
use serde_json::{json, Value};

use super::client::ApiClient;
use crate::config::Config;
use crate::token::{MemoryTokenStore, TokenPair, TokenStore};

pub const STALE_ACCESS: &str = "stale-access-token";
pub const STALE_REFRESH: &str = "stale-refresh-token";
pub const FRESH_ACCESS: &str = "fresh-access-token";
pub const FRESH_REFRESH: &str = "fresh-refresh-token";

/// Pipe the pipeline's tracing output through `RUST_LOG` when a test needs it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn test_config(server: &MockServer) -> Config {
    Config::with_base_url(server.base_url())
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Browser-context client with an empty store.
pub fn api_client(server: &MockServer) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new(Duration::days(30)));
    let client = ApiClient::new(&test_config(server), store.clone());
    (client, store)
}

/// Browser-context client already holding a (stale) pair.
pub fn seeded_client(server: &MockServer) -> (ApiClient, Arc<MemoryTokenStore>) {
    let (client, store) = api_client(server);
    store.set(TokenPair::new(STALE_ACCESS, STALE_REFRESH));
    (client, store)
}

/// Unsigned JWT-shaped token whose payload carries `access_level`.
pub fn unsigned_token(sub: &str, access_level: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": sub, "accessLevel": access_level, "exp": 4102444800i64, "iat": 1767225600i64 })
            .to_string(),
    );
    format!("{}.{}.signature", header, payload)
}

pub fn user_json(id: &str, access_level: &str) -> Value {
    json!({
        "id": id,
        "name": "Ana",
        "lastName": "Silva",
        "email": "ana.silva@example.edu",
        "avatarUrl": null,
        "cpf": "111.444.777-35",
        "accessLevel": access_level,
        "createdAt": "2026-01-10T12:00:00Z"
    })
}

pub fn session_json(access_level: &str) -> Value {
    json!({
        "token": FRESH_ACCESS,
        "refreshToken": FRESH_REFRESH,
        "user": user_json("u1", access_level)
    })
}

pub fn refresh_json() -> Value {
    json!({ "token": FRESH_ACCESS, "refreshToken": FRESH_REFRESH })
}

pub fn invalid_token_json() -> Value {
    json!({ "message": super::client::INVALID_TOKEN_MESSAGE })
}

pub fn institution_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Instituto Federal do Cariri",
        "acronym": "IFCA",
        "city": "Juazeiro do Norte",
        "state": "CE",
        "createdAt": "2025-03-01T09:00:00Z"
    })
}

pub fn course_json(id: &str, institution_id: &str) -> Value {
    json!({
        "id": id,
        "institutionId": institution_id,
        "name": "Ciência da Computação",
        "createdAt": "2025-03-02T09:00:00Z"
    })
}

pub fn category_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "description": "Atividades do eixo" })
}

pub fn chart_json(id: &str, course_id: &str) -> Value {
    json!({
        "id": id,
        "courseId": course_id,
        "name": "Matriz 2025",
        "requiredHours": 200,
        "isActive": true,
        "requirements": [
            { "categoryId": "cat-1", "maxHours": 80 },
            { "categoryId": "cat-2", "maxHours": 60 }
        ],
        "createdAt": "2025-03-03T09:00:00Z"
    })
}

pub fn regulation_json(id: &str, course_id: &str) -> Value {
    json!({
        "id": id,
        "courseId": course_id,
        "name": "Resolução 12/2025",
        "documentUrl": "https://files.example.edu/res-12-2025.pdf",
        "publishedAt": "2025-04-01T00:00:00Z"
    })
}

pub fn activity_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "userId": "u1",
        "categoryId": "cat-1",
        "chartId": "chart-1",
        "description": "Monitoria de Algoritmos",
        "hours": 40,
        "awardedHours": null,
        "status": status,
        "reviewComment": null,
        "reviewerId": null,
        "submittedAt": "2026-02-01T14:00:00Z",
        "reviewedAt": null
    })
}

pub fn page_json(items: Vec<Value>) -> Value {
    json!({
        "page": 1,
        "perPage": 10,
        "total": items.len(),
        "items": items
    })
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use server::routes::{self, auth::ServerState};
use service::auth::domain::{AuthUser, Role};
use service::auth::repository::{mock::MockAuthRepository, AuthRepository};
use service::auth::TokenKeys;
use service::profile::repository::mock::MockProfileRepository;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MockAuthRepository>,
    pub profiles: Arc<MockProfileRepository>,
}

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

/// Router over in-memory repositories; no database needed.
pub fn build_app() -> TestApp {
    let users = Arc::new(MockAuthRepository::default());
    let profiles = Arc::new(MockProfileRepository::with_users(users.clone()));
    let auth = configs::AuthConfig { jwt_secret: SECRET.into(), token_ttl_hours: 1 };
    let state = ServerState::new(users.clone(), profiles.clone(), &auth);
    TestApp { router: routes::build_router(state, cors()), users, profiles }
}

impl TestApp {
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {}", t));
        }
        let req = match body {
            Some(v) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&v)?))?,
            None => builder.body(Body::empty())?,
        };
        let resp = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }

    /// Seed a user directly in the repository and mint a token for it.
    pub async fn user_with_token(&self, name: &str, role: Role) -> anyhow::Result<(AuthUser, String)> {
        let email = format!("{}_{}@example.com", name.to_lowercase().replace(' ', "_"), Uuid::new_v4());
        let user = self.users.create_user(name, &email, role).await?;
        let token = TokenKeys::new(SECRET, 1).issue(&user)?;
        Ok((user, token))
    }
}

pub fn profile_body(name: &str) -> Value {
    serde_json::json!({
        "businessName": name,
        "incorporationType": "LLC",
        "description": "Family run",
        "contact": {"email": "hello@example.com", "phone": "555-0100", "address": "1 Main St"},
        "productsAndServices": [
            {"name": "Consulting", "description": "Hourly", "price": 120.0, "availability": true},
            {"name": "Audit", "price": 900.0, "availability": false}
        ]
    })
}

//! Shared test helpers for the HTTP handler test modules.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use helpdesk_core::memory::MemoryStore;
use helpdesk_core::store::CredentialStore;
use helpdesk_core::user::NewUser;
use helpdesk_core::{Role, User};
use serde_json::Value;
use tower::ServiceExt;

use super::{AUTH_HEADER, AppState, build_router};
use crate::auth::{TokenKind, TokenService};

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-testing";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub tokens: TokenService,
}

pub fn test_app() -> TestApp {
    test_app_with_timeout(Duration::from_secs(5))
}

pub fn test_app_with_timeout(request_timeout: Duration) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let tokens = TokenService::new(TEST_SECRET, 1, 30);
    let state = AppState::new(Arc::clone(&store), tokens.clone(), 6, request_timeout);
    TestApp {
        router: build_router(state),
        store,
        tokens,
    }
}

impl TestApp {
    /// Send a request and return the status and the JSON body (`Null` when
    /// the body is empty or not JSON).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTH_HEADER, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Store an identity directly, bypassing registration.
    pub async fn seed_user(&self, email: &str, role: Role) -> User {
        let new_user = NewUser {
            role,
            email: email.into(),
            login: email.split('@').next().unwrap_or("user").into(),
            encrypted_password: "not-a-real-hash".into(),
            token: uuid::Uuid::new_v4().simple().to_string(),
            contacts: String::new(),
            is_active: true,
            created_at: 1,
        };
        self.store.create_user(new_user).await.unwrap()
    }

    pub fn access_token(&self, user: &User) -> String {
        self.tokens
            .issue(user.id, user.role, 1, TokenKind::Access)
            .unwrap()
    }

    pub fn refresh_token(&self, user: &User) -> String {
        self.tokens
            .issue(user.id, user.role, 30, TokenKind::Refresh)
            .unwrap()
    }
}

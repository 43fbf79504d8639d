#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_api::auth::PasswordHasher;
use storefront_api::config::{AppConfig, AuthMode};
use storefront_api::database::models::{NewUser, Product, ProductInput, Role};
use storefront_api::database::{MemoryStore, Store};
use storefront_api::{app, AppState};

pub const PASSWORD: &str = "motdepasse123";
pub const TOKEN_SECRET: &str = "integration-test-secret";

/// Router over a fresh in-memory store, driven in-process
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
}

/// Credential a test client replays: session cookie or bearer token
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub cookie: Option<String>,
    pub token: Option<String>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_cookie(cookie: &str) -> Self {
        Self {
            cookie: Some(cookie.to_string()),
            token: None,
        }
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            cookie: None,
            token: Some(token.to_string()),
        }
    }

    /// Pick up whatever credential the server handed out
    pub fn from_response(response: &TestResponse) -> Option<Self> {
        if let Some(cookie) = response.session_cookie() {
            return Some(Self::with_cookie(&cookie));
        }
        response.body["token"].as_str().map(Self::with_token)
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

impl TestResponse {
    /// `name=value` pair of the Set-Cookie header, if any
    pub fn session_cookie(&self) -> Option<String> {
        let set_cookie = self.headers.get(header::SET_COOKIE)?.to_str().ok()?;
        set_cookie.split(';').next().map(|pair| pair.trim().to_string())
    }

    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}

pub fn test_config(mode: AuthMode) -> AppConfig {
    let mut config = AppConfig::development();
    config.security.auth_mode = mode;
    config.security.secret = TOKEN_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config.api.enable_request_logging = false;
    config
}

impl TestApp {
    pub fn new(mode: AuthMode) -> Self {
        Self::with_config(test_config(mode))
    }

    pub fn session() -> Self {
        Self::new(AuthMode::Session)
    }

    pub fn token() -> Self {
        Self::new(AuthMode::Token)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.clone());

        Self {
            router: app(state),
            store,
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router failed")?;

        let status = response.status();
        let headers = response.headers().clone();
        let raw = to_bytes(response.into_body(), usize::MAX)
            .await
            .context("failed to read body")?
            .to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        Ok(TestResponse {
            status,
            headers,
            body,
            raw,
        })
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        caller: &Caller,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(cookie) = &caller.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(token) = &caller.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn get(&self, path: &str, caller: &Caller) -> Result<TestResponse> {
        self.request(Method::GET, path, None, caller).await
    }

    pub async fn post(&self, path: &str, body: Value, caller: &Caller) -> Result<TestResponse> {
        self.request(Method::POST, path, Some(body), caller).await
    }

    pub async fn put(&self, path: &str, body: Value, caller: &Caller) -> Result<TestResponse> {
        self.request(Method::PUT, path, Some(body), caller).await
    }

    pub async fn delete(&self, path: &str, caller: &Caller) -> Result<TestResponse> {
        self.request(Method::DELETE, path, None, caller).await
    }

    /// Register through the API and return the signed-in caller
    pub async fn register(&self, email: &str) -> Result<Caller> {
        let response = self.post("/api/register", registration(email), &Caller::anonymous()).await?;
        anyhow::ensure!(
            response.status == StatusCode::CREATED,
            "registration failed: {} {}",
            response.status,
            response.body
        );
        Caller::from_response(&response).context("registration returned no credential")
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TestResponse> {
        self.post(
            "/api/login",
            json!({ "email": email, "password": password }),
            &Caller::anonymous(),
        )
        .await
    }

    pub async fn login_as(&self, email: &str) -> Result<Caller> {
        let response = self.login(email, PASSWORD).await?;
        anyhow::ensure!(response.status == StatusCode::OK, "login failed: {}", response.body);
        Caller::from_response(&response).context("login returned no credential")
    }

    /// Insert an admin straight into the store, then sign in through the API
    pub async fn admin(&self) -> Result<Caller> {
        let email = "admin@boutique.test";
        let password_hash = PasswordHasher::new(4).hash(PASSWORD).await?;
        self.store
            .insert_user(NewUser {
                last_name: "Admin".into(),
                first_name: "Root".into(),
                email: email.into(),
                password_hash,
                role: Role::Admin,
            })
            .await?;
        self.login_as(email).await
    }

    pub async fn seed_product(&self, nom: &str, cents: i64) -> Result<Product> {
        Ok(self
            .store
            .insert_product(&ProductInput {
                nom: nom.to_string(),
                quantite: 10,
                prix: Decimal::new(cents, 2),
                description: Some(format!("{} description", nom)),
                image: Some(format!("{}.png", nom)),
            })
            .await?)
    }

    pub async fn user_count(&self) -> Result<usize> {
        Ok(self.store.list_users().await?.len())
    }
}

pub fn registration(email: &str) -> Value {
    json!({
        "nom": "Martin",
        "prenom": "Camille",
        "email": email,
        "password": PASSWORD,
        "confirm": PASSWORD,
    })
}

pub fn product_body(nom: &str, prix: f64) -> Value {
    json!({
        "nom": nom,
        "quantite": 5,
        "prix": prix,
        "description": "un produit",
    })
}

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use std::sync::Arc;
use tracing::debug;

use super::session::{clear_session_cookie, parse_cookie, session_cookie, SessionStore};
use super::token::{generate_jwt, validate_jwt, Claims};
use super::{AuthError, Principal};
use crate::config::{AuthMode, SecurityConfig};

/// Outcome of inspecting a request's credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Authenticated(Principal),
    /// No credential presented at all
    Anonymous,
    /// A credential was presented but cannot be honored
    Invalid(InvalidReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// `Authorization` header present but not `Bearer <token>`
    MalformedHeader,
    Expired,
    BadSignature,
    UnknownSession,
}

/// What the client must receive to hold (or drop) its credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Set-Cookie` header value
    Cookie(String),
    /// Bearer token returned in the response body
    Token { token: String, expires_in: i64 },
    None,
}

/// Single authentication strategy, chosen at startup by `AUTH_MODE`
#[async_trait]
pub trait Authenticator: Send + Sync {
    fn mode(&self) -> AuthMode;

    async fn authenticate(&self, headers: &HeaderMap) -> Authentication;

    /// Issue a fresh credential after a successful login or registration
    async fn establish(&self, principal: &Principal) -> Result<Credential, AuthError>;

    /// Re-issue the caller's credential with an updated snapshot
    async fn renew(&self, headers: &HeaderMap, principal: &Principal) -> Result<Credential, AuthError>;

    async fn revoke(&self, headers: &HeaderMap) -> Credential;

    /// Invalidate every credential held by `user_id` after its account changed or was removed.
    /// Stateless strategies cannot do this and rely on the admin gate re-reading the account.
    async fn revoke_user(&self, user_id: i64);
}

pub fn build_authenticator(security: &SecurityConfig) -> Arc<dyn Authenticator> {
    match security.auth_mode {
        AuthMode::Session => Arc::new(SessionAuthenticator::new(security)),
        AuthMode::Token => Arc::new(TokenAuthenticator::new(security)),
    }
}

/// Opaque session id in an HttpOnly cookie; principal held server-side
pub struct SessionAuthenticator {
    sessions: SessionStore,
    cookie_name: String,
    secure: bool,
}

impl SessionAuthenticator {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            sessions: SessionStore::new(security.session_ttl_minutes),
            cookie_name: security.session_cookie_name.clone(),
            secure: security.cookie_secure,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn cookie_for(&self, sid: &str) -> Credential {
        Credential::Cookie(session_cookie(&self.cookie_name, sid, self.sessions.ttl(), self.secure))
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    fn mode(&self) -> AuthMode {
        AuthMode::Session
    }

    async fn authenticate(&self, headers: &HeaderMap) -> Authentication {
        let Some(sid) = parse_cookie(headers, &self.cookie_name) else {
            return Authentication::Anonymous;
        };

        match self.sessions.get(&sid).await {
            Some(principal) => Authentication::Authenticated(principal),
            None => {
                debug!("Unknown or expired session id presented");
                Authentication::Invalid(InvalidReason::UnknownSession)
            }
        }
    }

    async fn establish(&self, principal: &Principal) -> Result<Credential, AuthError> {
        let sid = self.sessions.create(principal.clone()).await;
        Ok(self.cookie_for(&sid))
    }

    async fn renew(&self, headers: &HeaderMap, principal: &Principal) -> Result<Credential, AuthError> {
        if let Some(sid) = parse_cookie(headers, &self.cookie_name) {
            if self.sessions.update(&sid, principal.clone()).await {
                return Ok(self.cookie_for(&sid));
            }
        }
        self.establish(principal).await
    }

    async fn revoke(&self, headers: &HeaderMap) -> Credential {
        if let Some(sid) = parse_cookie(headers, &self.cookie_name) {
            self.sessions.destroy(&sid).await;
        }
        Credential::Cookie(clear_session_cookie(&self.cookie_name, self.secure))
    }

    async fn revoke_user(&self, user_id: i64) {
        let removed = self.sessions.revoke_user(user_id).await;
        if removed > 0 {
            debug!("Revoked {} session(s) of user {}", removed, user_id);
        }
    }
}

/// Stateless HS256 bearer tokens
pub struct TokenAuthenticator {
    secret: String,
    expiry_hours: u64,
}

impl TokenAuthenticator {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            secret: security.secret.clone(),
            expiry_hours: security.jwt_expiry_hours,
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
/// `Ok(None)` when the header is absent.
fn extract_bearer(headers: &HeaderMap) -> Result<Option<String>, InvalidReason> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| InvalidReason::MalformedHeader)?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(InvalidReason::MalformedHeader),
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    fn mode(&self) -> AuthMode {
        AuthMode::Token
    }

    async fn authenticate(&self, headers: &HeaderMap) -> Authentication {
        let token = match extract_bearer(headers) {
            Ok(Some(token)) => token,
            Ok(None) => return Authentication::Anonymous,
            Err(reason) => return Authentication::Invalid(reason),
        };

        match validate_jwt(&token, &self.secret) {
            Ok(claims) => Authentication::Authenticated(claims.into()),
            Err(AuthError::Expired) => Authentication::Invalid(InvalidReason::Expired),
            Err(e) => {
                debug!("Rejected bearer token: {}", e);
                Authentication::Invalid(InvalidReason::BadSignature)
            }
        }
    }

    async fn establish(&self, principal: &Principal) -> Result<Credential, AuthError> {
        let claims = Claims::new(principal, self.expiry_hours);
        let token = generate_jwt(&claims, &self.secret)?;
        Ok(Credential::Token {
            token,
            expires_in: claims.expires_in(),
        })
    }

    async fn renew(&self, _headers: &HeaderMap, principal: &Principal) -> Result<Credential, AuthError> {
        self.establish(principal).await
    }

    async fn revoke(&self, _headers: &HeaderMap) -> Credential {
        // Tokens expire on their own; the client discards its copy.
        Credential::None
    }

    async fn revoke_user(&self, _user_id: i64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::models::Role;
    use axum::http::HeaderValue;

    fn principal() -> Principal {
        Principal {
            id: 1,
            nom: "Petit".into(),
            prenom: "Inès".into(),
            email: "ines@example.com".into(),
            fonction: Role::Player,
        }
    }

    fn token_security() -> SecurityConfig {
        let mut security = AppConfig::development().security;
        security.auth_mode = AuthMode::Token;
        security.secret = "test-secret".into();
        security
    }

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn token_mode_distinguishes_outcomes() {
        let auth = TokenAuthenticator::new(&token_security());

        assert_eq!(auth.authenticate(&HeaderMap::new()).await, Authentication::Anonymous);
        assert_eq!(
            auth.authenticate(&bearer("Basic abc")).await,
            Authentication::Invalid(InvalidReason::MalformedHeader)
        );
        assert_eq!(
            auth.authenticate(&bearer("Bearer not.a.jwt")).await,
            Authentication::Invalid(InvalidReason::BadSignature)
        );

        let Credential::Token { token, .. } = auth.establish(&principal()).await.unwrap() else {
            panic!("token mode must issue a token");
        };
        assert_eq!(
            auth.authenticate(&bearer(&format!("Bearer {}", token))).await,
            Authentication::Authenticated(principal())
        );
    }

    #[tokio::test]
    async fn session_mode_round_trip() {
        let security = AppConfig::development().security;
        let auth = SessionAuthenticator::new(&security);

        let Credential::Cookie(set_cookie) = auth.establish(&principal()).await.unwrap() else {
            panic!("session mode must issue a cookie");
        };
        let pair = set_cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        assert_eq!(auth.authenticate(&headers).await, Authentication::Authenticated(principal()));

        auth.revoke(&headers).await;
        assert_eq!(
            auth.authenticate(&headers).await,
            Authentication::Invalid(InvalidReason::UnknownSession)
        );
    }

    #[tokio::test]
    async fn session_renew_keeps_the_same_id() {
        let auth = SessionAuthenticator::new(&AppConfig::development().security);
        let Credential::Cookie(set_cookie) = auth.establish(&principal()).await.unwrap() else {
            panic!("session mode must issue a cookie");
        };
        let pair = set_cookie.split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());

        let mut renamed = principal();
        renamed.email = "ines.petit@example.com".into();
        let Credential::Cookie(renewed) = auth.renew(&headers, &renamed).await.unwrap() else {
            panic!("session mode must issue a cookie");
        };

        assert!(renewed.starts_with(&pair));
        assert_eq!(auth.sessions().len().await, 1);
        assert_eq!(auth.authenticate(&headers).await, Authentication::Authenticated(renamed));
    }

    #[tokio::test]
    async fn revoking_a_user_ends_their_sessions() {
        let auth = SessionAuthenticator::new(&AppConfig::development().security);
        let Credential::Cookie(set_cookie) = auth.establish(&principal()).await.unwrap() else {
            panic!("session mode must issue a cookie");
        };
        let pair = set_cookie.split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());

        auth.revoke_user(principal().id).await;
        assert_eq!(
            auth.authenticate(&headers).await,
            Authentication::Invalid(InvalidReason::UnknownSession)
        );
    }
}

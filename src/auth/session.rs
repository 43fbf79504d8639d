use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::Principal;

struct SessionEntry {
    principal: Principal,
    expires_at: DateTime<Utc>,
}

/// Server-side session table keyed by an opaque random id
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::minutes(ttl_minutes as i64),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a session for `principal` and return its id
    pub async fn create(&self, principal: Principal) -> String {
        let sid = new_session_id();
        let now = Utc::now();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| entry.expires_at > now);
        sessions.insert(
            sid.clone(),
            SessionEntry {
                principal,
                expires_at: now + self.ttl,
            },
        );
        sid
    }

    /// Live principal for `sid`; expired entries are dropped on the way
    pub async fn get(&self, sid: &str) -> Option<Principal> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(sid) {
                Some(entry) if entry.expires_at > now => return Some(entry.principal.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().await.remove(sid);
        None
    }

    /// Replace the snapshot and extend the expiry. `false` when the session is gone.
    pub async fn update(&self, sid: &str, principal: Principal) -> bool {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(sid) {
            Some(entry) if entry.expires_at > now => {
                entry.principal = principal;
                entry.expires_at = now + self.ttl;
                true
            }
            _ => false,
        }
    }

    pub async fn destroy(&self, sid: &str) -> bool {
        self.sessions.write().await.remove(sid).is_some()
    }

    /// Drop every session held by `user_id`; returns how many were removed
    pub async fn revoke_user(&self, user_id: i64) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.principal.id != user_id);
        before - sessions.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

const SESSION_ID_LENGTH: usize = 48;

fn new_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Value of cookie `name` from the request's Cookie header(s)
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|s| s.split(';'))
        .find_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

pub fn session_cookie(name: &str, sid: &str, ttl: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        name,
        sid,
        ttl.num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(name: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}=deleted; HttpOnly; SameSite=Lax; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        name
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use axum::http::HeaderValue;

    fn principal() -> Principal {
        Principal {
            id: 7,
            nom: "Durand".into(),
            prenom: "Paul".into(),
            email: "paul@example.com".into(),
            fonction: Role::Player,
        }
    }

    #[tokio::test]
    async fn create_get_destroy() {
        let store = SessionStore::new(30);
        let sid = store.create(principal()).await;

        assert_eq!(sid.len(), SESSION_ID_LENGTH);
        assert!(sid.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(store.get(&sid).await, Some(principal()));
        assert!(store.destroy(&sid).await);
        assert_eq!(store.get(&sid).await, None);
        assert!(!store.destroy(&sid).await);
    }

    #[tokio::test]
    async fn expired_sessions_are_not_returned() {
        let store = SessionStore::new(0);
        let sid = store.create(principal()).await;

        assert_eq!(store.get(&sid).await, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_replaces_snapshot() {
        let store = SessionStore::new(30);
        let sid = store.create(principal()).await;

        let mut renamed = principal();
        renamed.nom = "Dupont".into();
        assert!(store.update(&sid, renamed.clone()).await);
        assert_eq!(store.get(&sid).await, Some(renamed));
        assert!(!store.update("missing", principal()).await);
    }

    #[tokio::test]
    async fn revoke_user_drops_only_that_users_sessions() {
        let store = SessionStore::new(30);
        let first = store.create(principal()).await;
        let second = store.create(principal()).await;

        let mut other = principal();
        other.id = 8;
        let kept = store.create(other.clone()).await;

        assert_eq!(store.revoke_user(7).await, 2);
        assert_eq!(store.get(&first).await, None);
        assert_eq!(store.get(&second).await, None);
        assert_eq!(store.get(&kept).await, Some(other));
        assert_eq!(store.revoke_user(7).await, 0);
    }

    #[test]
    fn parses_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; storefront_sid=abc123; lang=fr"),
        );

        assert_eq!(parse_cookie(&headers, "storefront_sid").as_deref(), Some("abc123"));
        assert_eq!(parse_cookie(&headers, "missing"), None);
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("sid", "abc", Duration::minutes(1), true);
        assert_eq!(cookie, "sid=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=60; Secure");
        assert!(clear_session_cookie("sid", false).contains("Max-Age=0"));
    }
}

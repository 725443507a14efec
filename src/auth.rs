use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::{state::AppState, utils::cookie_value};

pub const SESSION_COOKIE: &str = "vaultium_session";

/// Checks a username/password pair. Swap the implementation to change backends.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// One fixed account whose password is only kept as a salted SHA-256 digest.
pub struct DemoCredentials {
    username: String,
    salt: [u8; 16],
    digest: Vec<u8>,
}

impl DemoCredentials {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        let salt = *uuid::Uuid::new_v4().as_bytes();
        let digest = salted_digest(&salt, password);
        Self { username: username.into(), salt, digest }
    }
}

impl CredentialVerifier for DemoCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        let candidate = salted_digest(&self.salt, password);
        // evaluate both so timing doesn't reveal which half failed
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let pass_ok = constant_time_eq(&candidate, &self.digest);
        user_ok & pass_ok
    }
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut h = Sha256::new();
    h.update(salt);
    h.update(password.as_bytes());
    h.finalize().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[derive(Clone, Debug)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Live sessions keyed by opaque token.
pub struct SessionStore {
    ttl: TimeDelta,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self { ttl, sessions: RwLock::new(HashMap::new()) }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Starts a session and returns its token. Expired sessions are pruned here.
    pub async fn create(&self, username: &str, now: DateTime<Utc>) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            token.clone(),
            Session { username: username.to_string(), expires_at: now + self.ttl },
        );
        token
    }

    pub async fn lookup(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(s) if s.expires_at > now => return Some(s.clone()),
                None => return None,
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(token);
        None
    }

    pub async fn destroy(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Username of the authenticated caller, attached by [`require_session`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

pub async fn session_user(st: &AppState, headers: &HeaderMap) -> Option<String> {
    let token = cookie_value(headers, SESSION_COOKIE)?;
    st.sessions.lookup(&token, Utc::now()).await.map(|s| s.username)
}

/// Axum middleware: without a live session cookie, redirect to `/login`.
pub async fn require_session(
    State(st): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match session_user(&st, request.headers()).await {
        Some(username) => {
            request.extensions_mut().insert(CurrentUser(username));
            next.run(request).await
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "no session, redirecting to login");
            Redirect::to("/login").into_response()
        }
    }
}

pub fn session_cookie(token: &str, ttl: TimeDelta, secure: bool) -> String {
    let mut c = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.num_seconds()
    );
    if secure {
        c.push_str("; Secure");
    }
    c
}

pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

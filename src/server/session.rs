//! Cookie-keyed wizard sessions.

use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue};

use super::cache::TtlStore;
use crate::wizard::WizardSession;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "docwizard_session";

/// Identifies the session a request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: String,
    /// The browser did not present a live session; a cookie must be set.
    pub is_new: bool,
}

impl SessionHandle {
    /// `Set-Cookie` value to attach to the response, if one is needed.
    pub fn set_cookie(&self) -> Option<HeaderValue> {
        if !self.is_new {
            return None;
        }
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.id
        ))
        .ok()
    }
}

/// Server-side wizard state for every active browser.
pub struct SessionStore {
    sessions: TtlStore<WizardSession>,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: TtlStore::sliding(idle_ttl),
        }
    }

    /// Find the session for a request, minting a new id when the cookie is
    /// absent, unknown or expired.
    pub fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        match cookie_value(headers, SESSION_COOKIE) {
            Some(id) if self.sessions.contains(&id) => SessionHandle { id, is_new: false },
            _ => SessionHandle {
                id: uuid::Uuid::new_v4().to_string(),
                is_new: true,
            },
        }
    }

    /// Snapshot of the session state.
    pub fn load(&self, handle: &SessionHandle) -> WizardSession {
        self.sessions.get(&handle.id).unwrap_or_default()
    }

    /// Mutate the session, creating it if needed, and refresh its expiry.
    pub fn update<R>(&self, handle: &SessionHandle, f: impl FnOnce(&mut WizardSession) -> R) -> R {
        self.sessions.upsert(&handle.id, f)
    }

    /// Drop expired sessions, returning their ids.
    pub fn purge_expired(&self) -> Vec<String> {
        self.sessions.purge_expired()
    }
}

/// Read one cookie from the request's `Cookie` headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

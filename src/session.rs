use std::collections::HashMap;

use thiserror::Error;

/// An active login. Lives only in memory; the only way out is an
/// explicit logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: u32,
    pub bank_id: u16,
    pub display_name: String,
    pub login_name: String,
    pub token: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session already exists for user {0}")]
    AlreadyActive(u32),
    #[error("no session exists for user {0}")]
    NotFound(u32),
}

/// Why an authorization check rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    NotLoggedIn,
    InvalidToken,
}

/// Table of active logins, keyed by user id.
///
/// Login and logout address users by login name while every mid-session
/// request addresses them by numeric id; the store serves both lookups
/// rather than papering over the protocol's asymmetry.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<u32, Session>,
}

impl SessionStore {
    pub fn find_by_user(&self, user_id: u32) -> Option<&Session> {
        self.sessions.get(&user_id)
    }

    pub fn find_by_login_name(&self, login_name: &str) -> Option<&Session> {
        self.sessions.values().find(|s| s.login_name == login_name)
    }

    /// Token-gate a mid-session request. The caller learns whether the
    /// user has no session at all or presented the wrong token.
    pub fn authorize(&self, user_id: u32, token: &str) -> Result<&Session, AuthFailure> {
        let session = self
            .sessions
            .get(&user_id)
            .ok_or(AuthFailure::NotLoggedIn)?;
        if session.token != token {
            return Err(AuthFailure::InvalidToken);
        }
        Ok(session)
    }

    /// The login handler checks for an existing session first; the reject
    /// here is a backstop, not the exclusivity mechanism.
    pub fn insert(&mut self, session: Session) -> Result<(), SessionError> {
        if self.sessions.contains_key(&session.user_id) {
            return Err(SessionError::AlreadyActive(session.user_id));
        }
        self.sessions.insert(session.user_id, session);
        Ok(())
    }

    pub fn remove(&mut self, user_id: u32) -> Result<Session, SessionError> {
        self.sessions
            .remove(&user_id)
            .ok_or(SessionError::NotFound(user_id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

//! The logged-in identity, held by an explicit context object.
//!
//! A `SessionStore` is created by the caller (one per CLI process, one per
//! interactive shell) and handed to whatever needs "the current user".
//! Lifecycle: `login` writes, `logout` clears, dropping the store destroys it.

use crate::errors::{AppError, AppResult};
use crate::models::person::{Person, Role};
use chrono::{DateTime, Local};

/// Public fields of a Person, as returned by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicProfile {
    pub person_id: String,
    pub national_id: String,
    pub display_name: String,
    pub church_role: Option<String>,
    pub role: Role,
}

impl PublicProfile {
    pub fn from_person(id: &str, p: &Person) -> Self {
        Self {
            person_id: id.to_string(),
            national_id: p.national_id.clone(),
            display_name: p.display_name(),
            church_role: p.church_role.clone(),
            role: p.role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub profile: PublicProfile,
    pub started_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing session with a new one for `profile`.
    pub fn login(&mut self, profile: PublicProfile) -> &Session {
        self.current.insert(Session {
            profile,
            started_at: Local::now(),
        })
    }

    /// Clear the session, returning the one that was active.
    pub fn logout(&mut self) -> Option<Session> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn require_login(&self) -> AppResult<&Session> {
        self.current
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("login required".into()))
    }

    pub fn require_admin(&self) -> AppResult<&Session> {
        let s = self.require_login()?;
        if s.profile.role != Role::Administrator {
            return Err(AppError::Unauthorized(format!(
                "{} is not an administrator",
                s.profile.display_name
            )));
        }
        Ok(s)
    }

    /// Keep the session in line with its Person document after an edit.
    /// `None` means the document is gone, which ends the session.
    pub fn refresh(&mut self, person_id: &str, person: Option<&Person>) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        if current.profile.person_id != person_id {
            return;
        }

        match person {
            Some(p) => current.profile = PublicProfile::from_person(person_id, p),
            None => self.current = None,
        }
    }
}

//! Authentication.
//!
//! [`IdentityProvider`] is the seam the session layer signs in through.
//! [`LocalIdentityProvider`] keeps salted SHA-256 password hashes in the
//! `credentials` table of the local database.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AuthError;

const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub email: String,
}

/// Callback run on every sign-in and sign-out with the new session, if any.
pub type SessionListener = Box<dyn Fn(Option<&Session>)>;

pub trait IdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    fn sign_out(&self);

    fn on_session_change(&self, listener: SessionListener);

    fn current_session(&self) -> Option<Session>;
}

/// Identity provider over the local `credentials` table.
pub struct LocalIdentityProvider<'a> {
    conn: &'a Connection,
    current: RefCell<Option<Session>>,
    listeners: RefCell<Vec<Rc<dyn Fn(Option<&Session>)>>>,
}

impl<'a> LocalIdentityProvider<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            current: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Create credentials for a new account and return its uid.
    ///
    /// Does not sign the new account in.
    pub fn register(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Provider("auth/invalid-email".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Provider("auth/weak-password".to_string()));
        }

        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM credentials WHERE email = ?1",
                [&email],
                |_| Ok(()),
            )
            .optional()
            .map_err(provider_error)?
            .is_some();
        if exists {
            return Err(AuthError::EmailInUse(email));
        }

        let uid = Uuid::new_v4().simple().to_string();
        let salt = Uuid::new_v4().simple().to_string();
        let hash = hash_password(&salt, password);

        self.conn
            .execute(
                "INSERT INTO credentials (uid, email, password_hash, salt, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![uid, email, hash, salt, Local::now().to_rfc3339()],
            )
            .map_err(provider_error)?;

        log::info!("Registered account {} ({})", uid, email);
        Ok(uid)
    }

    /// Listeners may sign in, sign out or subscribe from inside the
    /// callback; no borrow is held while they run. A nested transition
    /// notifies everyone itself, so the outer pass stops once it is stale.
    fn set_current(&self, session: Option<Session>) {
        *self.current.borrow_mut() = session.clone();
        let listeners: Vec<_> = self.listeners.borrow().clone();
        for listener in listeners {
            if *self.current.borrow() != session {
                break;
            }
            listener(session.as_ref());
        }
    }
}

impl IdentityProvider for LocalIdentityProvider<'_> {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email);

        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT uid, password_hash, salt FROM credentials WHERE email = ?1",
                [&email],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(provider_error)?;

        let Some((uid, stored_hash, salt)) = row else {
            log::warn!("Sign-in failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if hash_password(&salt, password) != stored_hash {
            log::warn!("Sign-in failed: wrong password for {}", uid);
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session { uid, email };
        self.set_current(Some(session.clone()));
        Ok(session)
    }

    fn sign_out(&self) {
        if self.current.borrow().is_none() {
            return;
        }
        log::info!("Signed out");
        self.set_current(None);
    }

    fn on_session_change(&self, listener: SessionListener) {
        self.listeners.borrow_mut().push(Rc::from(listener));
    }

    fn current_session(&self) -> Option<Session> {
        self.current.borrow().clone()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn provider_error(err: rusqlite::Error) -> AuthError {
    AuthError::Provider(err.to_string())
}

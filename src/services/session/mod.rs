//! Signed-in user context.
//!
//! [`SessionManager`] turns an authenticated identity into a
//! [`SessionContext`] by loading the user's profile. A session without a
//! readable profile is signed out again; no role is ever assumed.

use std::cell::RefCell;

use crate::error::AppError;
use crate::models::availability::TeacherRef;
use crate::models::user::{Role, UserProfile};
use crate::schedule::access::TeacherSelection;
use crate::schedule::GridRequest;
use crate::services::identity::{IdentityProvider, Session};

pub mod navigation;

/// Source of user profiles, keyed by uid.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore {
    fn get_profile(&self, uid: &str) -> anyhow::Result<Option<UserProfile>>;
}

/// Everything operations need to know about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub photo: Option<String>,
}

impl SessionContext {
    pub fn from_profile(session: &Session, profile: UserProfile) -> Self {
        let email = if profile.email.is_empty() {
            session.email.clone()
        } else {
            profile.email
        };
        Self {
            uid: session.uid.clone(),
            email,
            name: profile.nombre,
            role: profile.rol,
            photo: profile.photo,
        }
    }

    /// Up to two initials of the name, or "U".
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }

    pub fn display_role(&self) -> String {
        self.role.display_name()
    }

    pub fn teacher_ref(&self) -> TeacherRef {
        TeacherRef::new(&self.uid, &self.name)
    }

    pub fn grid_request(&self, selection: TeacherSelection, career_id: Option<String>) -> GridRequest {
        GridRequest::new(self.role.clone(), &self.uid, selection, career_id)
    }
}

pub struct SessionManager<'a> {
    identity: &'a dyn IdentityProvider,
    profiles: &'a dyn ProfileStore,
    current: RefCell<Option<SessionContext>>,
}

impl<'a> SessionManager<'a> {
    pub fn new(identity: &'a dyn IdentityProvider, profiles: &'a dyn ProfileStore) -> Self {
        Self {
            identity,
            profiles,
            current: RefCell::new(None),
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<SessionContext, AppError> {
        let session = self.identity.sign_in(email, password)?;
        let uid = session.uid.clone();
        self.resolve_session(Some(session))?
            .ok_or(AppError::ProfileMissing { uid })
    }

    pub fn logout(&self) {
        self.identity.sign_out();
        self.current.borrow_mut().take();
    }

    /// Apply an identity change.
    ///
    /// `None` clears the context. A session whose profile is absent or
    /// cannot be read is signed out and the failure returned.
    pub fn resolve_session(&self, session: Option<Session>) -> Result<Option<SessionContext>, AppError> {
        let Some(session) = session else {
            self.current.borrow_mut().take();
            return Ok(None);
        };

        match self.profiles.get_profile(&session.uid) {
            Ok(Some(profile)) => {
                let context = SessionContext::from_profile(&session, profile);
                log::info!(
                    "Session established for {} as {}",
                    context.uid,
                    context.role
                );
                *self.current.borrow_mut() = Some(context.clone());
                Ok(Some(context))
            }
            Ok(None) => {
                log::warn!("No profile for {}; signing out", session.uid);
                self.logout();
                Err(AppError::ProfileMissing { uid: session.uid })
            }
            Err(err) => {
                log::warn!("Profile lookup for {} failed; signing out", session.uid);
                self.logout();
                Err(AppError::fetch("user profile", err))
            }
        }
    }

    pub fn current(&self) -> Option<SessionContext> {
        self.current.borrow().clone()
    }
}

// User service
// Profiles in the `users` collection and admin account creation

use serde_json::{json, Map, Value};

use crate::error::{AppError, ValidationError};
use crate::models::user::{Role, UserProfile};
use crate::services::identity::LocalIdentityProvider;
use crate::services::session::{ProfileStore, SessionContext};
use crate::services::store::{collections, to_document, RecordStore, StoredDocument};

/// Fields for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub rol: Role,
}

pub struct UserService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    pub fn list_all(&self) -> Result<Vec<UserProfile>, AppError> {
        let documents = self
            .store
            .list(collections::USERS)
            .map_err(|e| AppError::fetch("users", e))?;
        decode_all(&documents).map_err(|e| AppError::fetch("users", e))
    }

    /// Profiles with the `profesor` role, for the teacher filter.
    pub fn list_teachers(&self) -> Result<Vec<UserProfile>, AppError> {
        let documents = self
            .store
            .query_eq(collections::USERS, "rol", &json!(Role::Profesor.as_str()))
            .map_err(|e| AppError::fetch("teachers", e))?;
        let mut teachers = decode_all(&documents).map_err(|e| AppError::fetch("teachers", e))?;
        teachers.sort_by_key(|t| t.nombre.to_lowercase());
        Ok(teachers)
    }

    /// Register credentials and write the profile under the same uid.
    pub fn create_user(
        &self,
        session: &SessionContext,
        identity: &LocalIdentityProvider<'_>,
        new_user: NewUser,
    ) -> Result<UserProfile, AppError> {
        if session.role != Role::Admin {
            return Err(AppError::PermissionDenied("only administrators can create users"));
        }
        if new_user.nombre.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        if let Role::Other(raw) = &new_user.rol {
            return Err(ValidationError::UnknownRole(raw.clone()).into());
        }

        let uid = identity.register(&new_user.email, &new_user.password)?;
        let profile = UserProfile::new(
            uid.clone(),
            new_user.email.trim().to_lowercase(),
            new_user.nombre.trim(),
            new_user.rol,
        );

        let data = to_document(&profile).map_err(|e| AppError::mutation("user", e))?;
        self.store
            .set(collections::USERS, &uid, data)
            .map_err(|e| AppError::mutation("user", e))?;

        log::info!("Created user {} with role {}", uid, profile.rol);
        Ok(profile)
    }

    /// Create the first administrator of an empty installation.
    pub fn bootstrap_admin(
        &self,
        identity: &LocalIdentityProvider<'_>,
        email: &str,
        password: &str,
        nombre: &str,
    ) -> Result<UserProfile, AppError> {
        if !self.list_all()?.is_empty() {
            return Err(AppError::PermissionDenied("users already exist; sign in as an administrator"));
        }

        let bootstrap = SessionContext {
            uid: String::new(),
            email: String::new(),
            name: String::new(),
            role: Role::Admin,
            photo: None,
        };
        let new_user = NewUser {
            email: email.to_string(),
            password: password.to_string(),
            nombre: nombre.to_string(),
            rol: Role::Admin,
        };
        self.create_user(&bootstrap, identity, new_user)
    }

    /// Store a profile picture reference for the signed-in user.
    pub fn update_photo(&self, session: &SessionContext, photo: &str) -> Result<(), AppError> {
        let mut patch = Map::new();
        patch.insert("photo".to_string(), Value::String(photo.to_string()));

        if self
            .store
            .get(collections::USERS, &session.uid)
            .map_err(|e| AppError::fetch("user", e))?
            .is_none()
        {
            return Err(AppError::not_found(collections::USERS, &session.uid));
        }

        self.store
            .update(collections::USERS, &session.uid, patch)
            .map_err(|e| AppError::mutation("photo", e))
    }
}

impl ProfileStore for UserService<'_> {
    fn get_profile(&self, uid: &str) -> anyhow::Result<Option<UserProfile>> {
        self.store
            .get(collections::USERS, uid)?
            .map(|doc| decode(&doc))
            .transpose()
    }
}

fn decode(doc: &StoredDocument) -> anyhow::Result<UserProfile> {
    let mut profile: UserProfile = doc.parse()?;
    profile.uid = doc.id.clone();
    Ok(profile)
}

fn decode_all(documents: &[StoredDocument]) -> anyhow::Result<Vec<UserProfile>> {
    documents.iter().map(decode).collect()
}

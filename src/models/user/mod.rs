//! User profile model.
//!
//! Profiles live in the `users` collection keyed by the identity provider's
//! uid. Role strings are parsed into a closed [`Role`] enum so that access
//! checks match exhaustively; anything unrecognised becomes
//! [`Role::Other`] and is granted nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Role attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Director,
    Profesor,
    /// Any role string the application does not recognise.
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Director => "director",
            Role::Profesor => "profesor",
            Role::Other(raw) => raw,
        }
    }

    /// Parse a role chosen in a form; unknown values are rejected rather
    /// than stored as [`Role::Other`]. Form input is normalised here, stored
    /// role strings are not.
    pub fn parse_assignable(value: &str) -> Result<Role, ValidationError> {
        match Role::from(value.trim().to_lowercase()) {
            Role::Other(raw) => Err(ValidationError::UnknownRole(raw)),
            role => Ok(role),
        }
    }

    /// Capitalised label for headers ("Profesor", "Admin").
    pub fn display_name(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "No role".to_string(),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Role::Admin,
            "director" => Role::Director,
            "profesor" => Role::Profesor,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile document stored under the user's uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(skip)]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nombre: String,
    pub rol: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl UserProfile {
    pub fn new(
        uid: impl Into<String>,
        email: impl Into<String>,
        nombre: impl Into<String>,
        rol: Role,
    ) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            nombre: nombre.into(),
            rol,
            photo: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("admin", Role::Admin)]
    #[test_case("director", Role::Director)]
    #[test_case("profesor", Role::Profesor)]
    #[test_case("Admin", Role::Other("Admin".to_string()) ; "capitalised admin is unrecognised")]
    #[test_case(" director", Role::Other(" director".to_string()) ; "padded director is unrecognised")]
    #[test_case("PROFESOR", Role::Other("PROFESOR".to_string()) ; "uppercase profesor is unrecognised")]
    #[test_case("profesr", Role::Other("profesr".to_string()) ; "typo is not a professor")]
    fn test_role_from_string(raw: &str, expected: Role) {
        assert_eq!(Role::from(raw.to_string()), expected);
    }

    #[test]
    fn test_parse_assignable_rejects_unknown() {
        assert_eq!(Role::parse_assignable("admin"), Ok(Role::Admin));
        assert_eq!(Role::parse_assignable(" Director "), Ok(Role::Director));
        assert_eq!(
            Role::parse_assignable("student"),
            Err(ValidationError::UnknownRole("student".to_string()))
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Role::Profesor.display_name(), "Profesor");
        assert_eq!(Role::Other(String::new()).display_name(), "No role");
    }

    #[test]
    fn test_profile_round_trips_role_string() {
        let profile = UserProfile::new("u1", "ana@uni.edu", "Ana Ruiz", Role::Director);
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["rol"], "director");
        assert!(value.get("uid").is_none());

        let parsed: UserProfile =
            serde_json::from_value(serde_json::json!({ "nombre": "X", "rol": "janitor" })).unwrap();
        assert_eq!(parsed.rol, Role::Other("janitor".to_string()));
        assert_eq!(parsed.photo, None);
    }
}

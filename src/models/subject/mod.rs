//! Subject model.
//!
//! A subject has a canonical name and, optionally, a per-career alias that
//! replaces the name when the subject is shown in that career's context.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Weekly teaching hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectHours {
    pub theoretical: u32,
    pub practical: u32,
    pub total: u32,
}

impl SubjectHours {
    /// Build hours with `total` derived from the two components. The total
    /// saturates; [`SubjectHours::validate`] rejects it.
    pub fn new(theoretical: u32, practical: u32) -> Self {
        Self {
            theoretical,
            practical,
            total: theoretical.saturating_add(practical),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.theoretical.checked_add(self.practical) {
            Some(total) if total == self.total => Ok(()),
            _ => Err(ValidationError::InvalidHours {
                theoretical: self.theoretical,
                practical: self.practical,
            }),
        }
    }
}

/// A subject document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(skip)]
    pub id: Option<String>,
    pub name: String,
    pub semester: u32,
    #[serde(default)]
    pub hours: SubjectHours,
    /// Career id to override display name, in insertion order.
    #[serde(default)]
    pub career_aliases: IndexMap<String, String>,
}

impl Subject {
    pub fn new(name: impl Into<String>, semester: u32, hours: SubjectHours) -> Self {
        Self {
            id: None,
            name: name.into(),
            semester,
            hours,
            career_aliases: IndexMap::new(),
        }
    }

    /// Attach an alias for a career. Blank aliases are ignored.
    pub fn with_alias(mut self, career_id: impl Into<String>, alias: impl Into<String>) -> Self {
        self.set_alias(career_id, alias);
        self
    }

    pub fn set_alias(&mut self, career_id: impl Into<String>, alias: impl Into<String>) {
        let career_id = career_id.into();
        let alias = alias.into().trim().to_string();
        if alias.is_empty() {
            self.career_aliases.shift_remove(&career_id);
        } else {
            self.career_aliases.insert(career_id, alias);
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.semester == 0 {
            return Err(ValidationError::InvalidSemester);
        }
        self.hours.validate()
    }

    /// Comma-separated alias preview for subject listings.
    pub fn aliases_preview(&self) -> String {
        self.career_aliases
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

//! Subject display-name resolution.
//!
//! Within a single career a subject is shown under that career's alias when
//! one exists. Views that span careers show the canonical name followed by
//! every distinct alias.

use crate::models::subject::Subject;

/// Shown when a record references a subject that no longer exists.
pub const UNKNOWN_SUBJECT: &str = "Unknown subject";

/// Separator used between names on grid entries.
pub const GRID_SEPARATOR: &str = " - ";

/// Separator used between names in edit dialogs.
pub const DIALOG_SEPARATOR: &str = " / ";

/// Resolves the text shown for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasResolver {
    separator: &'static str,
}

impl Default for AliasResolver {
    fn default() -> Self {
        Self::new(GRID_SEPARATOR)
    }
}

impl AliasResolver {
    pub fn new(separator: &'static str) -> Self {
        Self { separator }
    }

    /// Name for a single career: its non-empty alias, else the canonical name.
    pub fn resolve(&self, subject: Option<&Subject>, career_id: &str) -> String {
        let Some(subject) = subject else {
            return UNKNOWN_SUBJECT.to_string();
        };

        match subject.career_aliases.get(career_id) {
            Some(alias) if !alias.trim().is_empty() => alias.clone(),
            _ => subject.name.clone(),
        }
    }

    /// Canonical name plus every distinct alias that differs from it, in
    /// alias-map insertion order.
    pub fn resolve_full(&self, subject: Option<&Subject>) -> String {
        let Some(subject) = subject else {
            return UNKNOWN_SUBJECT.to_string();
        };

        let mut parts: Vec<&str> = vec![subject.name.as_str()];
        for alias in subject.career_aliases.values() {
            let alias = alias.as_str();
            if alias.trim().is_empty() || alias == subject.name || parts[1..].contains(&alias) {
                continue;
            }
            parts.push(alias);
        }

        parts.join(self.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subject::SubjectHours;

    fn calculus() -> Subject {
        Subject::new("Calculus", 1, SubjectHours::new(4, 2)).with_alias("c1", "Calc I")
    }

    #[test]
    fn test_resolve_uses_career_alias() {
        let resolver = AliasResolver::default();
        let subject = calculus();
        assert_eq!(resolver.resolve(Some(&subject), "c1"), "Calc I");
        assert_eq!(resolver.resolve(Some(&subject), "c2"), "Calculus");
    }

    #[test]
    fn test_resolve_ignores_blank_alias() {
        let mut subject = calculus();
        subject.career_aliases.insert("c3".to_string(), "   ".to_string());
        let resolver = AliasResolver::default();
        assert_eq!(resolver.resolve(Some(&subject), "c3"), "Calculus");
    }

    #[test]
    fn test_missing_subject_is_unknown() {
        let resolver = AliasResolver::default();
        assert_eq!(resolver.resolve(None, "c1"), UNKNOWN_SUBJECT);
        assert_eq!(resolver.resolve_full(None), UNKNOWN_SUBJECT);
    }

    #[test]
    fn test_resolve_full_dedupes_in_insertion_order() {
        let subject = Subject::new("Calculus", 1, SubjectHours::default())
            .with_alias("z", "Math I")
            .with_alias("a", "Calc I")
            .with_alias("m", "Math I")
            .with_alias("k", "Calculus");

        assert_eq!(
            AliasResolver::new(GRID_SEPARATOR).resolve_full(Some(&subject)),
            "Calculus - Math I - Calc I"
        );
        assert_eq!(
            AliasResolver::new(DIALOG_SEPARATOR).resolve_full(Some(&subject)),
            "Calculus / Math I / Calc I"
        );
    }

    #[test]
    fn test_resolve_full_without_aliases() {
        let subject = Subject::new("Physics", 2, SubjectHours::default());
        assert_eq!(AliasResolver::default().resolve_full(Some(&subject)), "Physics");
    }
}

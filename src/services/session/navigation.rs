use std::fmt;

use crate::models::user::Role;

/// Top-level sections of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavItem {
    Dashboard,
    Users,
    Availability,
    Curriculum,
}

impl NavItem {
    pub fn label(&self) -> &'static str {
        match self {
            NavItem::Dashboard => "Dashboard",
            NavItem::Users => "Users",
            NavItem::Availability => "Availability",
            NavItem::Curriculum => "Curriculum",
        }
    }
}

impl fmt::Display for NavItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Menu entries a role may open, in display order.
pub fn navigation_for(role: &Role) -> Vec<NavItem> {
    let mut items = vec![NavItem::Dashboard];
    if matches!(role, Role::Admin) {
        items.push(NavItem::Users);
    }
    if matches!(role, Role::Profesor | Role::Director | Role::Admin) {
        items.push(NavItem::Availability);
    }
    if can_manage_catalog(role) {
        items.push(NavItem::Curriculum);
    }
    items
}

/// Careers, subjects and curricula are maintained by supervisors.
pub fn can_manage_catalog(role: &Role) -> bool {
    matches!(role, Role::Admin | Role::Director)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Role::Admin, &[NavItem::Dashboard, NavItem::Users, NavItem::Availability, NavItem::Curriculum])]
    #[test_case(Role::Director, &[NavItem::Dashboard, NavItem::Availability, NavItem::Curriculum])]
    #[test_case(Role::Profesor, &[NavItem::Dashboard, NavItem::Availability])]
    #[test_case(Role::Other("alumno".to_string()), &[NavItem::Dashboard] ; "unknown role")]
    fn test_navigation_for(role: Role, expected: &[NavItem]) {
        assert_eq!(navigation_for(&role), expected.to_vec());
    }

    #[test]
    fn test_catalog_management() {
        assert!(can_manage_catalog(&Role::Admin));
        assert!(can_manage_catalog(&Role::Director));
        assert!(!can_manage_catalog(&Role::Profesor));
    }
}

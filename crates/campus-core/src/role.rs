//! User role value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User roles with hierarchical permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Enrolled student with basic permissions.
    #[default]
    Student,
    /// Instructor who owns courses and grades assignments.
    Instructor,
    /// Administrator with full access.
    Admin,
}

impl UserRole {
    /// Returns the role's permission level (higher = more permissions).
    #[must_use]
    pub const fn level(&self) -> u8 {
        match self {
            Self::Student => 1,
            Self::Instructor => 2,
            Self::Admin => 3,
        }
    }

    /// Checks if this role has at least the permissions of the required role.
    #[must_use]
    pub const fn has_permission(&self, required: Self) -> bool {
        self.level() >= required.level()
    }

    /// Returns all available roles.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Student, Self::Instructor, Self::Admin]
    }

    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" => Some(Self::Student),
            "instructor" | "teacher" => Some(Self::Instructor),
            "admin" | "administrator" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Instructor => write!(f, "instructor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_levels() {
        assert!(UserRole::Instructor.level() > UserRole::Student.level());
        assert!(UserRole::Admin.level() > UserRole::Instructor.level());
    }

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.has_permission(UserRole::Student));
        assert!(UserRole::Admin.has_permission(UserRole::Instructor));
        assert!(!UserRole::Student.has_permission(UserRole::Instructor));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("teacher"), Some(UserRole::Instructor));
        assert_eq!(UserRole::parse("nobody"), None);
    }
}

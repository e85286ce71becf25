//! RBAC permission checks over the authenticated request identity.

use crate::AuthContext;
use campus_core::{CampusError, CampusResult, UserId, UserRole};

/// Extension trait for `AuthContext` to check permissions.
pub trait AuthContextExt {
    /// Requires a specific role.
    fn require_role(&self, role: UserRole) -> CampusResult<()>;

    /// Requires either the specified role or being the resource owner.
    fn require_role_or_owner(&self, role: UserRole, resource_owner_id: UserId) -> CampusResult<()>;

    /// Checks if the user is the owner of a resource.
    fn is_owner(&self, resource_owner_id: UserId) -> bool;

    /// Requires the user to be an instructor.
    fn require_instructor(&self) -> CampusResult<()>;

    /// Requires the user to be an admin.
    fn require_admin(&self) -> CampusResult<()>;
}

impl AuthContextExt for AuthContext {
    fn require_role(&self, role: UserRole) -> CampusResult<()> {
        if self.role.has_permission(role) {
            Ok(())
        } else {
            Err(CampusError::Forbidden(format!(
                "Required role: {}, your role: {}",
                role, self.role
            )))
        }
    }

    fn require_role_or_owner(&self, role: UserRole, resource_owner_id: UserId) -> CampusResult<()> {
        if self.role.has_permission(role) || self.is_owner(resource_owner_id) {
            Ok(())
        } else {
            Err(CampusError::Forbidden(
                "You don't have permission to access this resource".to_string(),
            ))
        }
    }

    fn is_owner(&self, resource_owner_id: UserId) -> bool {
        self.user_id == resource_owner_id
    }

    fn require_instructor(&self) -> CampusResult<()> {
        self.require_role(UserRole::Instructor)
    }

    fn require_admin(&self) -> CampusResult<()> {
        self.require_role(UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: UserRole) -> AuthContext {
        AuthContext {
            user_id: UserId::new(),
            role,
        }
    }

    #[test]
    fn test_require_role() {
        let admin = ctx(UserRole::Admin);
        let student = ctx(UserRole::Student);

        assert!(admin.require_role(UserRole::Student).is_ok());
        assert!(admin.require_role(UserRole::Admin).is_ok());

        assert!(student.require_role(UserRole::Student).is_ok());
        assert!(student.require_role(UserRole::Instructor).is_err());
        assert!(student.require_role(UserRole::Admin).is_err());
    }

    #[test]
    fn test_require_instructor() {
        assert!(ctx(UserRole::Student).require_instructor().is_err());
        assert!(ctx(UserRole::Instructor).require_instructor().is_ok());
        // Admin outranks instructor.
        assert!(ctx(UserRole::Admin).require_instructor().is_ok());
    }

    #[test]
    fn test_owner_access() {
        let student = ctx(UserRole::Student);
        let own_id = student.user_id;
        let other_id = UserId::new();

        assert!(student.is_owner(own_id));
        assert!(!student.is_owner(other_id));

        assert!(student.require_role_or_owner(UserRole::Admin, own_id).is_ok());
        assert!(student
            .require_role_or_owner(UserRole::Admin, other_id)
            .is_err());
    }

    #[test]
    fn test_admin_can_access_any_resource() {
        let admin = ctx(UserRole::Admin);
        let random_owner = UserId::new();

        assert!(admin
            .require_role_or_owner(UserRole::Admin, random_owner)
            .is_ok());
    }
}

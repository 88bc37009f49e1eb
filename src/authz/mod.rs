//! Access decisions for the user administration surface.
//!
//! Every decision is a pure function of the caller identity and, for
//! target-scoped operations, the target user id. Nothing here touches the
//! database or the request.

/// Role string stored on user records.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TENANT: &str = "tenant";

/// Coarse-grained permission class of a caller.
///
/// `LegacyUnset` covers accounts created before the role column existed:
/// they carry an empty role string and keep full admin rights. Single-admin
/// deployments rely on this, so the branch is deliberate and must stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Tenant,
    LegacyUnset,
    /// Any role string we do not recognize. Never grants admin; such a
    /// caller can only act on their own account.
    Unknown,
}

impl Role {
    pub fn parse(role: &str) -> Self {
        match role {
            ROLE_ADMIN => Role::Admin,
            ROLE_TENANT => Role::Tenant,
            "" => Role::LegacyUnset,
            _ => Role::Unknown,
        }
    }

    pub fn grants_admin(self) -> bool {
        matches!(self, Role::Admin | Role::LegacyUnset)
    }
}

/// The authenticated principal for the current request.
#[derive(Debug, Clone)]
pub struct LoginUser {
    pub id: i64,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_denied(self) -> bool {
        self == Decision::Deny
    }
}

/// Used by list-all, create and delete: admin role (or legacy-unset) only.
pub fn authorize_admin_only(caller: Option<&LoginUser>) -> Decision {
    match caller {
        Some(user) if user.role.grants_admin() => Decision::Allow,
        _ => Decision::Deny,
    }
}

/// Used by update: admins may act on anyone, everyone else only on their
/// own account.
pub fn authorize_self_or_admin(caller: Option<&LoginUser>, target_id: i64) -> Decision {
    match caller {
        Some(user) if user.role.grants_admin() || user.id == target_id => Decision::Allow,
        _ => Decision::Deny,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(id: i64, role: &str) -> LoginUser {
        LoginUser { id, role: Role::parse(role) }
    }

    #[test]
    fn admin_passes_both_checks() {
        let admin = caller(1, "admin");
        assert_eq!(authorize_admin_only(Some(&admin)), Decision::Allow);
        assert_eq!(authorize_self_or_admin(Some(&admin), 99), Decision::Allow);
    }

    #[test]
    fn legacy_empty_role_is_treated_as_admin() {
        let legacy = caller(1, "");
        assert_eq!(authorize_admin_only(Some(&legacy)), Decision::Allow);
        assert_eq!(authorize_self_or_admin(Some(&legacy), 99), Decision::Allow);
    }

    #[test]
    fn tenant_can_only_act_on_self() {
        let tenant = caller(5, "tenant");
        assert_eq!(authorize_admin_only(Some(&tenant)), Decision::Deny);
        assert_eq!(authorize_self_or_admin(Some(&tenant), 5), Decision::Allow);
        assert_eq!(authorize_self_or_admin(Some(&tenant), 7), Decision::Deny);
    }

    #[test]
    fn absent_caller_is_always_denied() {
        assert_eq!(authorize_admin_only(None), Decision::Deny);
        assert_eq!(authorize_self_or_admin(None, 5), Decision::Deny);
    }

    #[test]
    fn unrecognized_role_is_non_admin_but_may_self_update() {
        let odd = caller(5, "operator");
        assert_eq!(authorize_admin_only(Some(&odd)), Decision::Deny);
        assert_eq!(authorize_self_or_admin(Some(&odd), 5), Decision::Allow);
        assert_eq!(authorize_self_or_admin(Some(&odd), 6), Decision::Deny);
    }

    #[test]
    fn role_parse_round_trip() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("tenant"), Role::Tenant);
        assert_eq!(Role::parse(""), Role::LegacyUnset);
        assert_eq!(Role::parse("root"), Role::Unknown);
    }
}

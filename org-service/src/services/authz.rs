//! Ownership authorization engine.
//!
//! Every mutating request passes through the same fixed check: resolve the
//! target's owning company through the data gateway and compare it to the
//! authenticated caller's company. There is no policy DSL; this is the whole
//! rule.

use service_core::error::AppError;

use crate::models::{OwnerKind, Role};
use crate::services::database::Database;

/// Resource kinds that can appear as authorization targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Company,
    Group,
    Service,
    Prompt,
    Answer,
    Snippet,
}

impl From<OwnerKind> for ResourceKind {
    fn from(kind: OwnerKind) -> Self {
        match kind {
            OwnerKind::Company => ResourceKind::Company,
            OwnerKind::Group => ResourceKind::Group,
            OwnerKind::Service => ResourceKind::Service,
        }
    }
}

/// Authenticated caller identity with all ids already decoded to internal
/// integers.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub company_id: i64,
    pub role: Role,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Forbidden,
}

/// Pure admission rule. The resolved owner must match the caller's company;
/// admin-gated operations additionally need an admin-or-above role.
/// Cross-tenant, not-found, and insufficient role all collapse into the same
/// Forbidden signal so existence of foreign resources never leaks.
pub fn decide(
    caller_company: i64,
    caller_role: Role,
    resolved_company: Option<i64>,
    admin_required: bool,
) -> Decision {
    match resolved_company {
        Some(owner) if owner == caller_company => {
            if admin_required && !caller_role.is_admin() {
                Decision::Forbidden
            } else {
                Decision::Authorized
            }
        }
        _ => Decision::Forbidden,
    }
}

/// Role gate for operations with no target resource (creation under the
/// caller's own company).
pub fn require_role(caller: &AuthContext, min: Role) -> Result<(), AppError> {
    if caller.role >= min {
        Ok(())
    } else {
        Err(AppError::Forbidden(anyhow::anyhow!("Access denied")))
    }
}

/// Ownership check service bound to the data gateway.
#[derive(Clone)]
pub struct AuthzService {
    db: Database,
}

impl AuthzService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Membership check: the target must belong to the caller's company.
    pub async fn require_member(
        &self,
        caller: &AuthContext,
        kind: ResourceKind,
        id: i64,
    ) -> Result<(), AppError> {
        self.check(caller, kind, id, false).await
    }

    /// Admin check: membership plus an admin-or-above role.
    pub async fn require_admin(
        &self,
        caller: &AuthContext,
        kind: ResourceKind,
        id: i64,
    ) -> Result<(), AppError> {
        self.check(caller, kind, id, true).await
    }

    async fn check(
        &self,
        caller: &AuthContext,
        kind: ResourceKind,
        id: i64,
        admin_required: bool,
    ) -> Result<(), AppError> {
        let resolved = self.db.resolve_company_id(kind, id).await?;
        match decide(caller.company_id, caller.role, resolved, admin_required) {
            Decision::Authorized => Ok(()),
            Decision::Forbidden => Err(AppError::Forbidden(anyhow::anyhow!("Access denied"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_company_admin_is_authorized() {
        assert_eq!(
            decide(1, Role::Admin, Some(1), true),
            Decision::Authorized
        );
        assert_eq!(
            decide(1, Role::Superadmin, Some(1), true),
            Decision::Authorized
        );
    }

    #[test]
    fn same_company_plain_user_fails_admin_gate() {
        assert_eq!(decide(1, Role::User, Some(1), true), Decision::Forbidden);
        // Reads only need membership.
        assert_eq!(decide(1, Role::User, Some(1), false), Decision::Authorized);
    }

    #[test]
    fn cross_tenant_is_forbidden_regardless_of_role() {
        assert_eq!(
            decide(1, Role::Superadmin, Some(2), true),
            Decision::Forbidden
        );
        assert_eq!(
            decide(1, Role::Superadmin, Some(2), false),
            Decision::Forbidden
        );
    }

    #[test]
    fn missing_resource_is_indistinguishable_from_cross_tenant() {
        assert_eq!(decide(1, Role::Superadmin, None, true), Decision::Forbidden);
        assert_eq!(decide(1, Role::User, None, false), Decision::Forbidden);
    }

    #[test]
    fn owner_kinds_map_onto_resource_kinds() {
        assert_eq!(ResourceKind::from(OwnerKind::Company), ResourceKind::Company);
        assert_eq!(ResourceKind::from(OwnerKind::Group), ResourceKind::Group);
        assert_eq!(ResourceKind::from(OwnerKind::Service), ResourceKind::Service);
    }
}

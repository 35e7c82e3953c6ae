//! Authorization guard.
//!
//! Pure predicates over an already-resolved [`Principal`]. Lookups of the
//! guarded resource happen in the calling service, so a missing resource
//! surfaces as `NotFound` before any ownership comparison runs.

use uuid::Uuid;

use super::UserRole;
use crate::errors::{AppError, AppResult};

/// Authenticated identity attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: UserRole,
}

impl Principal {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Resources that record the user who created them.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Succeeds when upstream authentication produced a principal.
pub fn require_authenticated(principal: Option<&Principal>) -> AppResult<&Principal> {
    principal.ok_or(AppError::Unauthorized)
}

/// Succeeds iff the principal's role is one of `allowed`.
pub fn require_role(principal: &Principal, allowed: &[UserRole]) -> AppResult<()> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Succeeds iff the principal owns the resource or is an admin.
pub fn require_owner_or_admin(principal: &Principal, owner_id: Uuid) -> AppResult<()> {
    if principal.id == owner_id || principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Succeeds iff the principal created the resource. Admins get no bypass.
pub fn require_owner(principal: &Principal, owner_id: Uuid) -> AppResult<()> {
    if principal.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Ownership check over a resource that may not exist.
///
/// `None` fails with `NotFound(entity)` before ownership is considered.
pub fn authorize_owned<'r, T: Owned>(
    principal: &Principal,
    resource: Option<&'r T>,
    entity: &str,
) -> AppResult<&'r T> {
    let resource = resource.ok_or_else(|| AppError::not_found(entity))?;
    require_owner_or_admin(principal, resource.owner_id())?;
    Ok(resource)
}

use super::Principal;
use crate::database::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Role check for an already-authenticated principal. Admins satisfy every role.
pub fn require_role(principal: &Principal, role: Role) -> Access {
    match (principal.fonction, role) {
        (Role::Admin, _) => Access::Allow,
        (actual, required) if actual == required => Access::Allow,
        _ => Access::Deny,
    }
}

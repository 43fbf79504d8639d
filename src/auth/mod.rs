pub mod authenticator;
pub mod gate;
pub mod password;
pub mod session;
pub mod token;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::models::{Role, User};

pub use authenticator::{
    build_authenticator, Authentication, Authenticator, Credential, InvalidReason,
    SessionAuthenticator, TokenAuthenticator,
};
pub use gate::{require_role, Access};
pub use password::PasswordHasher;
pub use session::SessionStore;
pub use token::Claims;

/// Identity attached to an authenticated request.
///
/// A snapshot taken at login: it is not re-read from the database on every
/// request, so profile edits must renew it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub fonction: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.fonction == Role::Admin
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            nom: user.last_name.clone(),
            prenom: user.first_name.clone(),
            email: user.email.clone(),
            fonction: user.role,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token signing secret is not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

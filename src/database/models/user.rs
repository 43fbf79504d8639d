use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse permission tag stored in `utilisateur.fonction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "joueur")]
    Player,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" | "joueur" => Ok(Role::Player),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Row of the `utilisateur` table. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "fonction")]
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Editable identity fields, optionally with a role change (admin edits only)
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub role: Option<Role>,
}

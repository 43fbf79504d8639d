use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, Principal};
use crate::database::models::Role;

/// HS256 claims: the principal snapshot plus the registered `exp`/`iat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub fonction: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(principal: &Principal, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: principal.id,
            nom: principal.nom.clone(),
            prenom: principal.prenom.clone(),
            email: principal.email.clone(),
            fonction: principal.fonction,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn expires_in(&self) -> i64 {
        self.exp - self.iat
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            nom: claims.nom,
            prenom: claims.prenom,
            email: claims.email,
            fonction: claims.fonction,
        }
    }
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            id: 3,
            nom: "Bernard".into(),
            prenom: "Chloé".into(),
            email: "chloe@example.com".into(),
            fonction: Role::Admin,
        }
    }

    #[test]
    fn token_carries_principal() {
        let claims = Claims::new(&principal(), 1);
        let token = generate_jwt(&claims, "secret").unwrap();

        let decoded = validate_jwt(&token, "secret").unwrap();
        assert_eq!(Principal::from(decoded), principal());
        assert_eq!(claims.expires_in(), 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_jwt(&Claims::new(&principal(), 1), "secret").unwrap();
        assert!(matches!(validate_jwt(&token, "other"), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let mut claims = Claims::new(&principal(), 1);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = generate_jwt(&claims, "secret").unwrap();

        assert!(matches!(validate_jwt(&token, "secret"), Err(AuthError::Expired)));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        assert!(matches!(
            generate_jwt(&Claims::new(&principal(), 1), ""),
            Err(AuthError::InvalidSecret)
        ));
    }
}

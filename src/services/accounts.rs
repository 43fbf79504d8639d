use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::Principal;
use crate::database::models::{NewUser, Role, User, UserProfile};
use crate::error::ApiError;
use crate::services::validation::{
    self, normalize_email, required, validate_email, validate_new_password,
    validate_password_length,
};
use crate::state::AppState;

pub const INVALID_ROLE: &str = "Fonction invalide";
pub const USER_NOT_FOUND: &str = "Utilisateur introuvable";

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    /// Only honored on the admin update route
    pub fonction: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PasswordChangeRequest {
    #[serde(rename = "oldPassword")]
    pub old_password: Option<String>,
    pub password: Option<String>,
    pub confirm: Option<String>,
}

/// Admin-side account creation: no confirmation field, explicit role
#[derive(Debug, Default, Deserialize)]
pub struct NewAccountRequest {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub mdp: Option<String>,
    pub fonction: Option<String>,
}

fn parse_role(value: Option<&str>) -> Result<Option<Role>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<Role>()
            .map(Some)
            .map_err(|_| ApiError::field_error("fonction", INVALID_ROLE)),
    }
}

/// Self-service or admin registration. Duplicate emails surface as 409 from the store.
pub async fn register(state: &AppState, req: &RegisterRequest, role: Role) -> Result<User, ApiError> {
    let (Some(nom), Some(prenom), Some(email), Some(password), Some(confirm)) = (
        required(&req.nom),
        required(&req.prenom),
        required(&req.email),
        required(&req.password),
        required(&req.confirm),
    ) else {
        return Err(ApiError::validation_error(validation::MISSING_FIELDS));
    };

    validate_email(email.trim())?;
    validate_new_password(password, confirm)?;

    create_account(state, nom, prenom, email, password, role).await
}

/// Admin "add user" form
pub async fn create_user(state: &AppState, req: &NewAccountRequest) -> Result<User, ApiError> {
    let (Some(nom), Some(prenom), Some(email), Some(password)) = (
        required(&req.nom),
        required(&req.prenom),
        required(&req.email),
        required(&req.mdp),
    ) else {
        return Err(ApiError::validation_error(validation::MISSING_FIELDS));
    };

    validate_email(email.trim())?;
    validate_password_length(password)?;
    let role = parse_role(req.fonction.as_deref())?.unwrap_or(Role::Player);

    create_account(state, nom, prenom, email, password, role).await
}

async fn create_account(
    state: &AppState,
    nom: &str,
    prenom: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, ApiError> {
    let password_hash = state.hasher.hash(password).await?;

    let user = state
        .store
        .insert_user(NewUser {
            last_name: nom.trim().to_string(),
            first_name: prenom.trim().to_string(),
            email: normalize_email(email),
            password_hash,
            role,
        })
        .await?;

    info!("Created {} account {} ({})", user.role, user.id, user.email);
    Ok(user)
}

/// Unknown email and wrong password fail identically
pub async fn login(state: &AppState, req: &LoginRequest) -> Result<Principal, ApiError> {
    let (Some(email), Some(password)) = (required(&req.email), required(&req.password)) else {
        return Err(ApiError::validation_error(validation::MISSING_FIELDS));
    };

    let Some(user) = state.store.find_user_by_email(&normalize_email(email)).await? else {
        warn!("Rejected login: no account for submitted email");
        return Err(ApiError::InvalidCredentials);
    };

    if !state.hasher.verify(password, &user.password_hash).await {
        warn!("Rejected login for user {}: password mismatch", user.id);
        return Err(ApiError::InvalidCredentials);
    }

    info!("User {} logged in", user.id);
    Ok(Principal::from(&user))
}

/// Profile edit by the account owner. Returns the refreshed principal snapshot.
pub async fn update_profile(
    state: &AppState,
    principal: &Principal,
    req: &ProfileRequest,
) -> Result<Principal, ApiError> {
    let profile = profile_from(req, None)?;

    if !state.store.update_user(principal.id, &profile).await? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    Ok(Principal {
        id: principal.id,
        nom: profile.last_name,
        prenom: profile.first_name,
        email: profile.email,
        fonction: principal.fonction,
    })
}

/// Admin edit of any account, including its role
pub async fn update_user(state: &AppState, id: i64, req: &ProfileRequest) -> Result<(), ApiError> {
    let role = parse_role(req.fonction.as_deref())?;
    let profile = profile_from(req, role)?;

    if !state.store.update_user(id, &profile).await? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    // open sessions still carry the old snapshot and role
    state.authenticator.revoke_user(id).await;
    info!("Updated user {}", id);
    Ok(())
}

fn profile_from(req: &ProfileRequest, role: Option<Role>) -> Result<UserProfile, ApiError> {
    let (Some(nom), Some(prenom), Some(email)) =
        (required(&req.nom), required(&req.prenom), required(&req.email))
    else {
        return Err(ApiError::validation_error(validation::MISSING_FIELDS));
    };
    validate_email(email.trim())?;

    Ok(UserProfile {
        last_name: nom.trim().to_string(),
        first_name: prenom.trim().to_string(),
        email: normalize_email(email),
        role,
    })
}

pub async fn change_password(
    state: &AppState,
    principal: &Principal,
    req: &PasswordChangeRequest,
) -> Result<(), ApiError> {
    let (Some(old_password), Some(password), Some(confirm)) = (
        required(&req.old_password),
        required(&req.password),
        required(&req.confirm),
    ) else {
        return Err(ApiError::validation_error(validation::MISSING_FIELDS));
    };
    validate_new_password(password, confirm)?;

    let user = state
        .store
        .find_user(principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    if !state.hasher.verify(old_password, &user.password_hash).await {
        return Err(ApiError::field_error("oldPassword", validation::WRONG_PASSWORD));
    }

    let password_hash = state.hasher.hash(password).await?;
    if !state.store.update_password_hash(user.id, &password_hash).await? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    info!("User {} changed password", user.id);
    Ok(())
}

pub async fn find_user(state: &AppState, id: i64) -> Result<User, ApiError> {
    state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
}

pub async fn delete_user(state: &AppState, id: i64) -> Result<(), ApiError> {
    if !state.store.delete_user(id).await? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    state.authenticator.revoke_user(id).await;
    info!("Deleted user {}", id);
    Ok(())
}

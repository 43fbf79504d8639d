use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::{require_role, Access, Authentication, InvalidReason, Principal};
use crate::database::models::Role;
use crate::error::ApiError;
use crate::state::AppState;

/// Runs the configured authenticator on every request and stores the
/// outcome as an [`Authentication`] extension. Never rejects by itself.
pub async fn resolve_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authentication = state.authenticator.authenticate(request.headers()).await;
    request.extensions_mut().insert(authentication);
    next.run(request).await
}

/// Protected tier: any authenticated principal. Injects `Extension<Principal>`.
pub async fn require_user(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let principal = authenticated(&request)?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Elevated tier: admins only. A principal whose snapshot is not admin is denied here,
/// before any store access. One that claims admin is checked against its stored account,
/// so a removed or demoted admin loses access before its credential expires.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticated(&request)?;

    if require_role(&principal, Role::Admin) == Access::Deny {
        deny(&request, &principal);
        return Err(ApiError::forbidden());
    }

    let Some(account) = state.store.find_user(principal.id).await? else {
        warn!("Admin credential of removed user {} presented", principal.id);
        return Err(InvalidReason::UnknownSession.into());
    };

    let current = Principal::from(&account);
    if require_role(&current, Role::Admin) == Access::Deny {
        deny(&request, &current);
        return Err(ApiError::forbidden());
    }

    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

fn deny(request: &Request, principal: &Principal) {
    warn!(
        "Denied {} {} to user {} ({})",
        request.method(),
        request.uri().path(),
        principal.id,
        principal.fonction
    );
}

fn authenticated(request: &Request) -> Result<Principal, ApiError> {
    match request.extensions().get::<Authentication>() {
        Some(Authentication::Authenticated(principal)) => Ok(principal.clone()),
        Some(Authentication::Invalid(reason)) => Err((*reason).into()),
        Some(Authentication::Anonymous) | None => Err(ApiError::unauthorized()),
    }
}

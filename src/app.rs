use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::SecurityConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin, require_user, resolve_principal};
use crate::state::AppState;

/// Full application router. Every request passes through `resolve_principal`;
/// the protected and elevated tiers add their own gate as a route layer.
pub fn app(state: AppState) -> Router {
    let api = &state.config.api;

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes())
        .merge(elevated_routes(&state))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_principal))
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .layer(cors_layer(&state.config.security));

    let router = if api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(public::auth::login))
        .route("/api/register", post(public::auth::register))
        .route("/api/logout", get(public::auth::logout))
        .route("/api/produits", get(public::catalog::products))
        .route("/api/articles", get(public::catalog::articles))
        .route("/api/annonces", get(public::catalog::announcements))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/user",
            get(protected::account::whoami).post(protected::account::update_profile),
        )
        .route("/api/password", post(protected::account::change_password))
        .route("/api/commande", post(protected::orders::place_order))
        .route("/api/commandes", get(protected::orders::my_orders))
        .route_layer(middleware::from_fn(require_user))
}

fn elevated_routes(state: &AppState) -> Router<AppState> {
    use elevated::{orders, products, users};

    Router::new()
        // Catalog writes; the /api/produits forms are kept for existing clients
        .route("/api/produits", post(products::create))
        .route("/api/produits/:id", put(products::update).delete(products::delete))
        .route("/api/admin/produits", get(products::list).post(products::create))
        .route(
            "/api/admin/produits/:id",
            put(products::update).delete(products::delete),
        )
        // Accounts
        .route("/api/users", get(users::list))
        .route("/api/admin/users", get(users::list).post(users::create))
        .route(
            "/api/admin/users/:id",
            get(users::show).put(users::update).delete(users::delete),
        )
        .route("/api/admin/register", post(users::register_admin))
        // Orders
        .route("/api/admin/commandes", get(orders::list))
        .route("/api/admin/commandes/:id", delete(orders::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    // Credentialed requests need explicit origins, methods and headers
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Storefront API",
            "version": version,
            "description": "E-commerce backend: catalog, orders, accounts and admin",
            "auth_mode": state.authenticator.mode(),
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/login, /api/register, /api/logout (public)",
                "catalog": "/api/produits, /api/articles, /api/annonces (public)",
                "account": "/api/user, /api/password (protected)",
                "orders": "/api/commande, /api/commandes (protected)",
                "admin": "/api/admin/* , /api/users, writes on /api/produits (admin)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unreachable"
                    }
                })),
            )
        }
    }
}

mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{Caller, TestApp, PASSWORD};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::session();

    let res = app.get("/health", &Caller::anonymous()).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["database"], "ok");

    let root = app.get("/", &Caller::anonymous()).await?;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["data"]["name"], "Storefront API");
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> Result<()> {
    let app = TestApp::session();
    app.register("lucie@example.com").await?;

    let wrong_password = app.login("lucie@example.com", "pas-le-bon-mdp").await?;
    let unknown_email = app.login("personne@example.com", PASSWORD).await?;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.raw, unknown_email.raw);
    assert_eq!(wrong_password.message(), "Mot de passe ou email incorrect");
    assert_eq!(wrong_password.code(), "INVALID_CREDENTIALS");
    assert!(wrong_password.set_cookie().is_none());
    Ok(())
}

#[tokio::test]
async fn login_sets_an_http_only_session_cookie() -> Result<()> {
    let app = TestApp::session();
    app.register("lucie@example.com").await?;

    let res = app.login("lucie@example.com", PASSWORD).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.message(), "Connexion réussie");

    let set_cookie = res.set_cookie().expect("session cookie");
    assert!(set_cookie.starts_with("storefront_sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    let caller = Caller::from_response(&res).unwrap();
    let me = app.get("/api/user", &caller).await?;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["email"], "lucie@example.com");
    assert_eq!(me.body["user"]["fonction"], "player");
    assert!(me.body["user"].get("mdp").is_none());
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let app = TestApp::session();

    let res = app
        .post("/api/login", serde_json::json!({ "email": "a@b.fr" }), &Caller::anonymous())
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Veuillez remplir tous les champs");
    Ok(())
}

#[tokio::test]
async fn anonymous_and_invalid_sessions_are_distinct() -> Result<()> {
    let app = TestApp::session();

    let anonymous = app.get("/api/user", &Caller::anonymous()).await?;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.code(), "UNAUTHORIZED");
    assert_eq!(anonymous.body["success"], false);

    let forged = app
        .get("/api/user", &Caller::with_cookie("storefront_sid=deadbeef"))
        .await?;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.code(), "INVALID_TOKEN");
    Ok(())
}

#[tokio::test]
async fn logout_destroys_the_session() -> Result<()> {
    let app = TestApp::session();
    let caller = app.register("lucie@example.com").await?;

    let res = app.get("/api/logout", &caller).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "Déconnexion réussie");
    assert!(res.set_cookie().unwrap().contains("Max-Age=0"));

    let after = app.get("/api/user", &caller).await?;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.code(), "INVALID_TOKEN");
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected() -> Result<()> {
    let app = TestApp::session();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))?;
    let res = app.send(request).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "INVALID_JSON");
    assert_eq!(res.body["success"], false);
    Ok(())
}

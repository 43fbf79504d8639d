mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{registration, Caller, TestApp, PASSWORD};

#[tokio::test]
async fn registration_signs_the_new_player_in() -> Result<()> {
    let app = TestApp::session();

    let res = app
        .post("/api/register", registration("nina@example.com"), &Caller::anonymous())
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.message(), "Utilisateur enregistré avec succès");
    assert_eq!(res.body["user"]["fonction"], "player");
    assert!(res.body["user"].get("password_hash").is_none());

    let caller = Caller::from_response(&res).unwrap();
    let me = app.get("/api/user", &caller).await?;
    assert_eq!(me.body["user"]["email"], "nina@example.com");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict_and_creates_nothing() -> Result<()> {
    let app = TestApp::session();
    app.register("nina@example.com").await?;

    let res = app
        .post("/api/register", registration("nina@example.com"), &Caller::anonymous())
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.message(), "Cet email est déjà utilisé");
    assert!(res.set_cookie().is_none());
    assert_eq!(app.user_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_registrations_for_one_email() -> Result<()> {
    let app = TestApp::session();
    let body = registration("meme@example.com");

    let anon = Caller::anonymous();
    let (a, b) = tokio::join!(
        app.post("/api/register", body.clone(), &anon),
        app.post("/api/register", body.clone(), &anon),
    );
    let mut statuses = vec![a?.status, b?.status];
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(app.user_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn registration_rules_apply_in_order() -> Result<()> {
    let app = TestApp::session();
    let anon = Caller::anonymous();

    let cases = [
        (json!({ "nom": "A", "prenom": "B", "email": "a@b.fr", "password": PASSWORD }), "Veuillez remplir tous les champs"),
        (json!({ "nom": "", "prenom": "B", "email": "a@b.fr", "password": PASSWORD, "confirm": PASSWORD }), "Veuillez remplir tous les champs"),
        (json!({ "nom": "A", "prenom": "B", "email": "pas-un-email", "password": "court", "confirm": "x" }), "Email invalide"),
        (json!({ "nom": "A", "prenom": "B", "email": "a@b.fr", "password": "court", "confirm": "x" }), "Mot de passe trop court"),
        (json!({ "nom": "A", "prenom": "B", "email": "a@b.fr", "password": PASSWORD, "confirm": "autre-chose" }), "Les mots de passe ne correspondent pas"),
    ];

    for (body, expected) in cases {
        let res = app.post("/api/register", body, &anon).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", expected);
        assert_eq!(res.message(), expected);
    }
    assert_eq!(app.user_count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn short_passwords_never_reach_the_store() -> Result<()> {
    let app = TestApp::session();
    let caller = app.register("nina@example.com").await?;
    let before = app.store.statement_count();

    let mut body = registration("autre@example.com");
    body["password"] = json!("1234567");
    body["confirm"] = json!("1234567");
    let res = app.post("/api/register", body, &Caller::anonymous()).await?;
    assert_eq!(res.message(), "Mot de passe trop court");

    let res = app
        .post(
            "/api/password",
            json!({ "oldPassword": PASSWORD, "password": "court", "confirm": "court" }),
            &caller,
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Mot de passe trop court");

    assert_eq!(app.store.statement_count(), before);
    Ok(())
}

#[tokio::test]
async fn profile_update_renews_the_session_snapshot() -> Result<()> {
    let app = TestApp::session();
    let caller = app.register("nina@example.com").await?;

    let res = app
        .post(
            "/api/user",
            json!({ "nom": "Moreau", "prenom": "Nina", "email": "nina.moreau@example.com" }),
            &caller,
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "Informations de l'utilisateur mises à jour avec succès");

    let me = app.get("/api/user", &caller).await?;
    assert_eq!(me.body["user"]["nom"], "Moreau");
    assert_eq!(me.body["user"]["email"], "nina.moreau@example.com");

    let relogin = app.login("nina.moreau@example.com", PASSWORD).await?;
    assert_eq!(relogin.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn profile_update_cannot_steal_an_email() -> Result<()> {
    let app = TestApp::session();
    app.register("pris@example.com").await?;
    let caller = app.register("nina@example.com").await?;

    let res = app
        .post(
            "/api/user",
            json!({ "nom": "Moreau", "prenom": "Nina", "email": "pris@example.com" }),
            &caller,
        )
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let me = app.get("/api/user", &caller).await?;
    assert_eq!(me.body["user"]["email"], "nina@example.com");
    Ok(())
}

#[tokio::test]
async fn password_change_checks_the_old_password() -> Result<()> {
    let app = TestApp::session();
    let caller = app.register("nina@example.com").await?;

    let wrong = app
        .post(
            "/api/password",
            json!({ "oldPassword": "pas-le-bon", "password": "nouveau-mdp", "confirm": "nouveau-mdp" }),
            &caller,
        )
        .await?;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.message(), "Mot de passe incorrect");

    let ok = app
        .post(
            "/api/password",
            json!({ "oldPassword": PASSWORD, "password": "nouveau-mdp", "confirm": "nouveau-mdp" }),
            &caller,
        )
        .await?;
    assert_eq!(ok.status, StatusCode::OK);

    assert_eq!(app.login("nina@example.com", PASSWORD).await?.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login("nina@example.com", "nouveau-mdp").await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn emails_are_matched_without_regard_to_case() -> Result<()> {
    let app = TestApp::session();

    let res = app
        .post("/api/register", registration(" Alice@Example.com"), &Caller::anonymous())
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["user"]["email"], "alice@example.com");

    let again = app
        .post("/api/register", registration("alice@example.COM"), &Caller::anonymous())
        .await?;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.message(), "Cet email est déjà utilisé");
    assert_eq!(app.user_count().await?, 1);

    let login = app.login("ALICE@example.com", PASSWORD).await?;
    assert_eq!(login.status, StatusCode::OK);
    Ok(())
}

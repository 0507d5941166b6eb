use crate::helpers::{json_body, spawn_app, TestUser};
use foodgram_api::domain::Role;

#[tokio::test]
async fn login_returns_a_40_character_token() {
    let app = spawn_app().await;
    let user = TestUser::store(&mut app.connection().await, Role::User).await;

    let token = app.login(&user).await;

    assert_eq!(token.len(), 40);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn unknown_email_is_404() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/auth/token/login/",
            None,
            &serde_json::json!({ "email": "nobody@example.com", "password": "secret" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn wrong_password_is_400() {
    let app = spawn_app().await;
    let user = TestUser::store(&mut app.connection().await, Role::User).await;

    let response = app
        .post(
            "/auth/token/login/",
            None,
            &serde_json::json!({ "email": user.email, "password": "not-the-password" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn an_unknown_token_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .get("/tags/", Some("0123456789abcdefghij0123456789abcdefghij"))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    assert_eq!(app.get("/users/me/", Some(&token)).await.status().as_u16(), 200);

    let response = app
        .post("/auth/token/logout/", Some(&token), &serde_json::json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 204);

    let response = app.get("/users/me/", Some(&token)).await;
    assert_eq!(response.status().as_u16(), 401);
    let body = json_body(response).await;
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn each_login_issues_a_new_token() {
    let app = spawn_app().await;
    let user = TestUser::store(&mut app.connection().await, Role::User).await;

    let first = app.login(&user).await;
    let second = app.login(&user).await;

    assert_ne!(first, second);
    assert_eq!(app.get("/users/me/", Some(&first)).await.status().as_u16(), 200);
}

use crate::helpers::{json_body, spawn_app, TestUser};
use foodgram_api::domain::Role;

fn registration(username: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": email,
        "first_name": "Anna",
        "last_name": "Smith",
        "password": "s3cret-password"
    })
}

#[tokio::test]
async fn registration_returns_201_without_the_password() {
    let app = spawn_app().await;

    let response = app
        .post("/users/", None, &registration("anna", "anna@example.com"))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body = json_body(response).await;
    assert_eq!(body["username"], "anna");
    assert_eq!(body["email"], "anna@example.com");
    assert!(body["id"].is_i64());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn a_registered_user_can_log_in() {
    let app = spawn_app().await;
    app.post("/users/", None, &registration("anna", "anna@example.com"))
        .await;

    let response = app
        .post(
            "/auth/token/login/",
            None,
            &serde_json::json!({ "email": "anna@example.com", "password": "s3cret-password" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn username_me_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .post("/users/", None, &registration("me", "me@example.com"))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(json_body(response).await["username"].is_array());
}

#[tokio::test]
async fn duplicate_username_and_email_are_rejected() {
    let app = spawn_app().await;
    app.post("/users/", None, &registration("anna", "anna@example.com"))
        .await;

    let response = app
        .post("/users/", None, &registration("anna", "other@example.com"))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert!(json_body(response).await["username"].is_array());

    let response = app
        .post("/users/", None, &registration("other", "anna@example.com"))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert!(json_body(response).await["email"].is_array());
}

#[tokio::test]
async fn invalid_registration_fields_are_named() {
    let app = spawn_app().await;
    let cases = [
        (registration("bad name!", "a@example.com"), "username"),
        (registration("anna", "not-an-email"), "email"),
    ];
    for (body, field) in cases {
        let response = app.post("/users/", None, &body).await;
        assert_eq!(response.status().as_u16(), 400, "{field}");
        assert!(json_body(response).await[field].is_array(), "{field}");
    }
}

#[tokio::test]
async fn me_requires_authentication() {
    let app = spawn_app().await;

    let response = app.get("/users/me/", None).await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn me_returns_own_profile_and_can_be_patched() {
    let app = spawn_app().await;
    let (user, token) = app.logged_in_user(Role::User).await;

    let body = json_body(app.get("/users/me/", Some(&token)).await).await;
    assert_eq!(body["id"], user.id);
    assert_eq!(body["is_subscribed"], false);

    let response = app
        .patch(
            "/users/me/",
            Some(&token),
            &serde_json::json!({ "first_name": "Renamed" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(json_body(response).await["first_name"], "Renamed");
}

#[tokio::test]
async fn users_cannot_change_their_own_role() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;

    let response = app
        .patch("/users/me/", Some(&token), &serde_json::json!({ "role": "admin" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn user_listing_is_paginated_and_searchable() {
    let app = spawn_app().await;
    for name in ["alpha", "alpine", "beta"] {
        app.post(
            "/users/",
            None,
            &registration(name, &format!("{name}@example.com")),
        )
        .await;
    }

    let body = json_body(app.get("/users/?limit=2", None).await).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert!(body["next"].as_str().unwrap().contains("offset=2"));
    assert!(body["previous"].is_null());

    let body = json_body(app.get("/users/?search=ALP", None).await).await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn unknown_user_is_404() {
    let app = spawn_app().await;

    let response = app.get("/users/999999/", None).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn set_password_checks_the_current_password() {
    let app = spawn_app().await;
    let (mut user, token) = app.logged_in_user(Role::User).await;

    let response = app
        .post(
            "/users/set_password/",
            Some(&token),
            &serde_json::json!({ "current_password": "wrong", "new_password": "brand-new" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .post(
            "/users/set_password/",
            Some(&token),
            &serde_json::json!({
                "current_password": user.password,
                "new_password": "brand-new"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 204);

    user.password = "brand-new".into();
    app.login(&user).await;
}

#[tokio::test]
async fn only_admins_can_manage_other_users() {
    let app = spawn_app().await;
    let (_, user_token) = app.logged_in_user(Role::User).await;
    let (_, admin_token) = app.logged_in_user(Role::Admin).await;
    let target = TestUser::store(&mut app.connection().await, Role::User).await;
    let path = format!("/users/{}/", target.id);
    let promote = serde_json::json!({ "role": "admin" });

    assert_eq!(app.patch(&path, None, &promote).await.status().as_u16(), 401);
    assert_eq!(
        app.patch(&path, Some(&user_token), &promote).await.status().as_u16(),
        403
    );

    let response = app.patch(&path, Some(&admin_token), &promote).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(json_body(response).await["role"], "admin");

    let response = app.delete(&path, Some(&admin_token)).await;
    assert_eq!(response.status().as_u16(), 204);
    assert_eq!(app.get(&path, None).await.status().as_u16(), 404);
}

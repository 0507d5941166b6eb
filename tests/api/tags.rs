use crate::helpers::{json_body, spawn_app};
use foodgram_api::domain::Role;

fn tag_body(slug: &str) -> serde_json::Value {
    serde_json::json!({ "name": slug, "color": "#49B64E", "slug": slug })
}

#[tokio::test]
async fn tags_are_public_and_unpaginated() {
    let app = spawn_app().await;
    let lunch = app.add_tag("lunch").await;
    app.add_tag("dinner").await;

    let body = json_body(app.get("/tags/", None).await).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let body = json_body(app.get(&format!("/tags/{}/", lunch.id), None).await).await;
    assert_eq!(body["slug"], "lunch");
    assert_eq!(app.get("/tags/999999/", None).await.status().as_u16(), 404);
}

#[tokio::test]
async fn only_admins_create_tags() {
    let app = spawn_app().await;
    let (_, user_token) = app.logged_in_user(Role::User).await;
    let (_, admin_token) = app.logged_in_user(Role::Admin).await;

    assert_eq!(app.post("/tags/", None, &tag_body("lunch")).await.status().as_u16(), 401);
    assert_eq!(
        app.post("/tags/", Some(&user_token), &tag_body("lunch"))
            .await
            .status()
            .as_u16(),
        403
    );

    let response = app.post("/tags/", Some(&admin_token), &tag_body("lunch")).await;
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(json_body(response).await["color"], "#49b64e");

    let response = app.post("/tags/", Some(&admin_token), &tag_body("lunch")).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn malformed_tags_are_rejected() {
    let app = spawn_app().await;
    let (_, admin_token) = app.logged_in_user(Role::Admin).await;
    let cases = [
        (serde_json::json!({ "name": "x", "color": "red", "slug": "x" }), "color"),
        (serde_json::json!({ "name": "x", "color": "#ffffff", "slug": "a b" }), "slug"),
    ];
    for (body, field) in cases {
        let response = app.post("/tags/", Some(&admin_token), &body).await;
        assert_eq!(response.status().as_u16(), 400, "{field}");
        assert!(json_body(response).await[field].is_array(), "{field}");
    }
}

use crate::helpers::{json_body, recipe_body, spawn_app};
use foodgram_api::domain::Role;

#[tokio::test]
async fn created_recipe_round_trips() {
    let app = spawn_app().await;
    let (author, token) = app.logged_in_user(Role::User).await;
    let breakfast = app.add_tag("breakfast").await;
    let flour = app.add_ingredient("flour", "g").await;
    let eggs = app.add_ingredient("eggs", "pcs").await;

    let response = app
        .post(
            "/recipes/",
            Some(&token),
            &recipe_body("Pancakes", &[(flour.id, 200), (eggs.id, 2)], &[breakfast.id]),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let created = json_body(response).await;

    let fetched = json_body(
        app.get(&format!("/recipes/{}/", created["id"]), None).await,
    )
    .await;
    assert_eq!(fetched, created);
    assert_eq!(fetched["author"]["id"], author.id);
    assert_eq!(fetched["tags"][0]["slug"], "breakfast");
    assert_eq!(fetched["ingredients"][0]["name"], "flour");
    assert_eq!(fetched["ingredients"][0]["measurement_unit"], "g");
    assert_eq!(fetched["ingredients"][0]["amount"], 200);
    assert_eq!(fetched["ingredients"][1]["id"], eggs.id);
    assert!(fetched["image"].as_str().unwrap().contains("/media/recipes/"));
}

#[tokio::test]
async fn uploaded_image_is_served() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;
    let id = app.add_recipe(&token, "Bread", &[(flour.id, 500)], &[tag.id]).await;

    let recipe = json_body(app.get(&format!("/recipes/{id}/"), None).await).await;
    let image_url = recipe["image"].as_str().unwrap();
    let path = &image_url[image_url.find("/media/").unwrap()..];

    let response = app.get(path, None).await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(!response.bytes().await.unwrap().is_empty());
}

/// Location of a recipe's image file under the test media root.
fn stored_image(app: &crate::helpers::TestApp, recipe: &serde_json::Value) -> std::path::PathBuf {
    let url = recipe["image"].as_str().unwrap();
    let relative = &url[url.find("/media/").unwrap() + "/media/".len()..];
    app.media_root.path().join(relative)
}

#[tokio::test]
async fn replacing_the_image_removes_the_old_file() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;
    let id = app.add_recipe(&token, "Bread", &[(flour.id, 500)], &[tag.id]).await;
    let path = format!("/recipes/{id}/");
    let original = stored_image(&app, &json_body(app.get(&path, None).await).await);
    assert!(original.exists());

    let update = recipe_body("Bread", &[(flour.id, 400)], &[tag.id]);
    let response = app.patch(&path, Some(&token), &update).await;

    assert_eq!(response.status().as_u16(), 200);
    let replacement = stored_image(&app, &json_body(response).await);
    assert_ne!(replacement, original);
    assert!(replacement.exists());
    assert!(!original.exists());
}

#[tokio::test]
async fn editing_without_an_image_keeps_the_file() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;
    let id = app.add_recipe(&token, "Bread", &[(flour.id, 500)], &[tag.id]).await;
    let path = format!("/recipes/{id}/");
    let original = stored_image(&app, &json_body(app.get(&path, None).await).await);
    let mut update = recipe_body("Rye bread", &[(flour.id, 400)], &[tag.id]);
    update.as_object_mut().unwrap().remove("image");

    let response = app.patch(&path, Some(&token), &update).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(stored_image(&app, &json_body(response).await), original);
    assert!(original.exists());
}

#[tokio::test]
async fn duplicate_ingredient_is_rejected() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;

    let response = app
        .post(
            "/recipes/",
            Some(&token),
            &recipe_body("Bread", &[(flour.id, 100), (flour.id, 50)], &[tag.id]),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(json_body(response).await["ingredient"].is_array());
}

#[tokio::test]
async fn amount_below_one_is_rejected() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;

    let response = app
        .post(
            "/recipes/",
            Some(&token),
            &recipe_body("Bread", &[(flour.id, 0)], &[tag.id]),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(json_body(response).await["amount"].is_array());
}

#[tokio::test]
async fn empty_tag_list_is_rejected() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let flour = app.add_ingredient("flour", "g").await;

    let response = app
        .post("/recipes/", Some(&token), &recipe_body("Bread", &[(flour.id, 1)], &[]))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(json_body(response).await["tags"].is_array());
}

#[tokio::test]
async fn unknown_ingredient_is_404() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;

    let response = app
        .post("/recipes/", Some(&token), &recipe_body("Bread", &[(424242, 1)], &[tag.id]))
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn missing_image_is_rejected_on_create() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;
    let mut body = recipe_body("Bread", &[(flour.id, 1)], &[tag.id]);
    body.as_object_mut().unwrap().remove("image");

    let response = app.post("/recipes/", Some(&token), &body).await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(json_body(response).await["image"].is_array());
}

#[tokio::test]
async fn duplicate_recipe_name_is_rejected() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;
    app.add_recipe(&token, "Bread", &[(flour.id, 1)], &[tag.id]).await;

    let response = app
        .post("/recipes/", Some(&token), &recipe_body("Bread", &[(flour.id, 2)], &[tag.id]))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(json_body(response).await["name"].is_array());
}

#[tokio::test]
async fn anonymous_users_cannot_create_recipes() {
    let app = spawn_app().await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;

    let response = app
        .post("/recipes/", None, &recipe_body("Bread", &[(flour.id, 1)], &[tag.id]))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn only_the_author_or_an_admin_may_edit() {
    let app = spawn_app().await;
    let (_, author_token) = app.logged_in_user(Role::User).await;
    let (_, other_token) = app.logged_in_user(Role::User).await;
    let (_, admin_token) = app.logged_in_user(Role::Admin).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;
    let sugar = app.add_ingredient("sugar", "g").await;
    let id = app
        .add_recipe(&author_token, "Bread", &[(flour.id, 1)], &[tag.id])
        .await;
    let path = format!("/recipes/{id}/");
    let mut update = recipe_body("Sweet bread", &[(sugar.id, 5)], &[tag.id]);
    update.as_object_mut().unwrap().remove("image");

    assert_eq!(app.patch(&path, None, &update).await.status().as_u16(), 401);
    assert_eq!(
        app.patch(&path, Some(&other_token), &update).await.status().as_u16(),
        403
    );
    assert_eq!(app.delete(&path, Some(&other_token)).await.status().as_u16(), 403);

    let response = app.patch(&path, Some(&author_token), &update).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = json_body(response).await;
    assert_eq!(body["name"], "Sweet bread");
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 1);
    assert_eq!(body["ingredients"][0]["name"], "sugar");

    assert_eq!(app.delete(&path, Some(&admin_token)).await.status().as_u16(), 204);
    assert_eq!(app.get(&path, None).await.status().as_u16(), 404);
}

#[tokio::test]
async fn listing_filters_by_tag_and_author() {
    let app = spawn_app().await;
    let (first, first_token) = app.logged_in_user(Role::User).await;
    let (_, second_token) = app.logged_in_user(Role::User).await;
    let lunch = app.add_tag("lunch").await;
    let dinner = app.add_tag("dinner").await;
    let flour = app.add_ingredient("flour", "g").await;
    app.add_recipe(&first_token, "Soup", &[(flour.id, 1)], &[lunch.id]).await;
    app.add_recipe(&second_token, "Stew", &[(flour.id, 1)], &[dinner.id]).await;
    app.add_recipe(&second_token, "Salad", &[(flour.id, 1)], &[lunch.id, dinner.id])
        .await;

    let body = json_body(app.get("/recipes/", None).await).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"][0]["name"], "Salad");

    let body = json_body(app.get("/recipes/?tags=lunch", None).await).await;
    assert_eq!(body["count"], 2);

    let body = json_body(app.get("/recipes/?tags=lunch&tags=dinner", None).await).await;
    assert_eq!(body["count"], 3);

    let body = json_body(app.get(&format!("/recipes/?author={}", first.id), None).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Soup");

    let body = json_body(app.get("/recipes/?limit=2&page=2", None).await).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert!(body["next"].is_null());
    assert!(body["previous"].as_str().unwrap().contains("page=1"));
}

#[tokio::test]
async fn favoriting_twice_is_rejected() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;
    let id = app.add_recipe(&token, "Bread", &[(flour.id, 1)], &[tag.id]).await;
    let path = format!("/recipes/{id}/favorite/");

    let response = app.post(&path, Some(&token), &serde_json::json!({})).await;
    assert_eq!(response.status().as_u16(), 201);
    let body = json_body(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["cooking_time"], 30);

    let response = app.post(&path, Some(&token), &serde_json::json!({})).await;
    assert_eq!(response.status().as_u16(), 400);

    let recipe = json_body(app.get(&format!("/recipes/{id}/"), Some(&token)).await).await;
    assert_eq!(recipe["is_favorited"], true);
    let listing = json_body(app.get("/recipes/?is_favorited=1", Some(&token)).await).await;
    assert_eq!(listing["count"], 1);
}

#[tokio::test]
async fn unfavoriting_an_unfavorited_recipe_is_rejected() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;
    let tag = app.add_tag("lunch").await;
    let flour = app.add_ingredient("flour", "g").await;
    let id = app.add_recipe(&token, "Bread", &[(flour.id, 1)], &[tag.id]).await;
    let path = format!("/recipes/{id}/favorite/");

    assert_eq!(app.delete(&path, Some(&token)).await.status().as_u16(), 400);
    app.post(&path, Some(&token), &serde_json::json!({})).await;
    assert_eq!(app.delete(&path, Some(&token)).await.status().as_u16(), 204);
}

#[tokio::test]
async fn favoriting_an_unknown_recipe_is_404() {
    let app = spawn_app().await;
    let (_, token) = app.logged_in_user(Role::User).await;

    let response = app
        .post("/recipes/999999/favorite/", Some(&token), &serde_json::json!({}))
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

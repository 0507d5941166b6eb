use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version};
use diesel::Connection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use diesel_migrations::MigrationHarness;
use foodgram_api::configuration::{get_configuration, DatabaseSettings};
use foodgram_api::database::{DatabaseConnection, DatabaseConnectionPool, MIGRATIONS};
use foodgram_api::domain::Role;
use foodgram_api::models::{Ingredient, NewIngredientEntry, NewTagEntry, NewUserEntry, Tag, User};
use foodgram_api::schema::{ingredients, tags, users};
use foodgram_api::telemetry::setup_tracing;
use once_cell::sync::Lazy;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use std::future::IntoFuture;
use tempfile::TempDir;
use uuid::Uuid;

/// A 1x1 transparent PNG.
pub const PNG_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter = "debug";
    if std::env::var("TEST_LOG").is_ok() {
        setup_tracing("test", default_filter, std::io::stdout);
    } else {
        setup_tracing("test", default_filter, std::io::sink);
    }
});

pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    /// Inserts a user with a freshly hashed random password.
    pub async fn store(connection: &mut DatabaseConnection, role: Role) -> Self {
        let username = format!("user_{}", &Uuid::now_v7().simple().to_string()[..12]);
        let email = format!("{username}@example.com");
        let password = Uuid::now_v7().to_string();
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(15000, 2, 1, None).unwrap(),
        )
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();
        let user: User = diesel::insert_into(users::table)
            .values(&NewUserEntry {
                username: &username,
                email: &email,
                first_name: "Test",
                last_name: "User",
                password_hash: &hash,
                role: role.as_str(),
            })
            .get_result(connection)
            .await
            .expect("Failed to add user");
        Self {
            id: user.id,
            username,
            email,
            password,
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub pool: DatabaseConnectionPool,
    pub client: Client,
    pub media_root: TempDir,
}

impl TestApp {
    pub async fn connection(&self) -> DatabaseConnection {
        self.pool
            .get()
            .await
            .expect("Could not retrieve database connection")
    }

    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", &self.address, path));
        match token {
            Some(token) => builder.header("Authorization", format!("Token {token}")),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        self.request(Method::GET, path, token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> Response {
        self.request(Method::POST, path, token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn patch(
        &self,
        path: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> Response {
        self.request(Method::PATCH, path, token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Response {
        self.request(Method::DELETE, path, token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, user: &TestUser) -> String {
        let response = self
            .post(
                "/auth/token/login/",
                None,
                &serde_json::json!({ "email": user.email, "password": user.password }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: serde_json::Value = response.json().await.unwrap();
        body["auth_token"].as_str().unwrap().to_string()
    }

    /// A stored user of `role` together with a valid token.
    pub async fn logged_in_user(&self, role: Role) -> (TestUser, String) {
        let user = TestUser::store(&mut self.connection().await, role).await;
        let token = self.login(&user).await;
        (user, token)
    }

    pub async fn add_tag(&self, slug: &str) -> Tag {
        diesel::insert_into(tags::table)
            .values(&NewTagEntry {
                name: slug,
                color: "#e26c2d",
                slug,
            })
            .get_result(&mut self.connection().await)
            .await
            .expect("Failed to add tag")
    }

    pub async fn add_ingredient(&self, name: &str, unit: &str) -> Ingredient {
        diesel::insert_into(ingredients::table)
            .values(&NewIngredientEntry {
                name,
                measurement_unit: unit,
            })
            .get_result(&mut self.connection().await)
            .await
            .expect("Failed to add ingredient")
    }

    /// Creates a recipe through the API and returns its id.
    pub async fn add_recipe(
        &self,
        token: &str,
        name: &str,
        ingredients: &[(i32, i64)],
        tags: &[i32],
    ) -> i64 {
        let response = self
            .post("/recipes/", Some(token), &recipe_body(name, ingredients, tags))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: serde_json::Value = response.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }
}

pub fn recipe_body(name: &str, ingredients: &[(i32, i64)], tags: &[i32]) -> serde_json::Value {
    let ingredients: Vec<serde_json::Value> = ingredients
        .iter()
        .map(|(id, amount)| serde_json::json!({ "id": id, "amount": amount }))
        .collect();
    serde_json::json!({
        "ingredients": ingredients,
        "tags": tags,
        "image": PNG_IMAGE,
        "name": name,
        "text": "Mix everything and bake.",
        "cooking_time": 30
    })
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let media_root = tempfile::tempdir().expect("Failed to create media directory");
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration");
        c.database.database_name = Uuid::now_v7().to_string();
        c.application.port = 0;
        c.application.media_root = media_root.path().display().to_string();
        c
    };

    configure_database(&configuration.database).await;

    let application = foodgram_api::startup::Application::build(configuration)
        .await
        .expect("Failed to build app.");
    let app = TestApp {
        address: format!("http://127.0.0.1:{}", application.port()),
        pool: application.pool(),
        client: Client::new(),
        media_root,
    };
    tokio::spawn(application.run_until_stopped().into_future());
    app
}

async fn configure_database(db_settings: &DatabaseSettings) {
    let mut db_conn = AsyncPgConnection::establish(
        db_settings
            .connection_string_without_database()
            .expose_secret(),
    )
    .await
    .expect("Failed to connect");
    diesel::sql_query(format!(
        r#"CREATE DATABASE "{}";"#,
        db_settings.database_name
    ))
    .execute(&mut db_conn)
    .await
    .expect("Failed to create database");

    let conn_string = db_settings.connection_string();
    // Outside the test runtime the wrapper drives its own.
    let migrations = std::thread::spawn(move || {
        let mut db_conn =
            AsyncConnectionWrapper::<AsyncPgConnection>::establish(conn_string.expose_secret())
                .expect("Failed to connect for migrations");
        db_conn
            .run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|e| e.to_string())
    });
    tokio::task::spawn_blocking(move || migrations.join())
        .await
        .expect("Migration task failed")
        .expect("Migration thread panicked")
        .expect("Failed to run migrations");
}

pub async fn json_body(response: Response) -> serde_json::Value {
    response.json().await.expect("Response was not JSON")
}

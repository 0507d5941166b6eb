use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    serve::Serve,
    Router,
};
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info_span;
use uuid::Uuid;

use crate::{
    authentication::resolve_token,
    configuration::Settings,
    database::{diesel_configuration::create_connection_pool, DatabaseConnectionPool},
    media::MediaStorage,
    permissions::{read_only_or_authenticated, require_admin, require_authenticated},
    routes,
};

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct ApplicationState {
    pub database_pool: DatabaseConnectionPool,
    pub base_url: String,
    pub media: MediaStorage,
    pub page_size: i64,
}

pub struct Application {
    port: u16,
    pool: DatabaseConnectionPool,
    server: Serve<Router, Router>,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, std::io::Error> {
        let pool = create_connection_pool(
            configuration.database.connection_string().expose_secret(),
        )
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address).await?;
        let port = listener.local_addr()?.port();
        let app_state = ApplicationState {
            database_pool: pool.clone(),
            media: MediaStorage::new(
                &configuration.application.media_root,
                &configuration.application.base_url,
            ),
            base_url: configuration.application.base_url,
            page_size: configuration.application.page_size,
        };
        tracing::info!(port, "Listening.");
        let server = axum::serve(listener, router(app_state));
        Ok(Self { port, pool, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn pool(&self) -> DatabaseConnectionPool {
        self.pool.clone()
    }

    pub fn run_until_stopped(self) -> Serve<Router, Router> {
        self.server
    }
}

pub fn router(app_state: ApplicationState) -> Router {
    let public = Router::new()
        .route("/health_check", get(routes::health_check))
        .route("/auth/token/login/", post(routes::login))
        .route("/users/", get(routes::get_users).post(routes::register))
        .route("/users/:id/", get(routes::get_user_by_id))
        .route("/tags/", get(routes::get_tags))
        .route("/tags/:id/", get(routes::get_tag_by_id))
        .route("/ingredients/", get(routes::get_ingredients))
        .route("/ingredients/:id/", get(routes::get_ingredient_by_id));

    let authenticated = Router::new()
        .route("/auth/token/logout/", post(routes::logout))
        .route("/users/me/", get(routes::me).patch(routes::update_me))
        .route("/users/set_password/", post(routes::set_password))
        .route("/users/subscriptions/", get(routes::subscriptions))
        .route(
            "/users/:id/subscribe/",
            post(routes::subscribe).delete(routes::unsubscribe),
        )
        .route(
            "/recipes/download_shopping_cart/",
            get(routes::download_shopping_cart),
        )
        .route(
            "/recipes/:id/favorite/",
            post(routes::favorite).delete(routes::unfavorite),
        )
        .route(
            "/recipes/:id/shopping_cart/",
            post(routes::add_to_cart).delete(routes::remove_from_cart),
        )
        .route_layer(from_fn(require_authenticated));

    let admin = Router::new()
        .route(
            "/users/:id/",
            patch(routes::admin_update_user).delete(routes::admin_delete_user),
        )
        .route("/tags/", post(routes::create_tag))
        .route("/ingredients/", post(routes::create_ingredient))
        .route_layer(from_fn(require_admin));

    let recipes = Router::new()
        .route(
            "/recipes/",
            get(routes::get_recipes).post(routes::create_recipe),
        )
        .route(
            "/recipes/:id/",
            get(routes::get_recipe_by_id)
                .patch(routes::patch_recipe)
                .delete(routes::remove_recipe),
        )
        .route_layer(from_fn(read_only_or_authenticated));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .merge(recipes)
        .nest_service("/media", ServeDir::new(app_state.media.root()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(
                    |request: &Request<_>| {
                        let request_id = Uuid::now_v7();
                        info_span!(
                            "Http Request",
                            %request_id,
                            method = %request.method(),
                            request_uri = %request.uri()
                        )
                    },
                ))
                .layer(from_fn_with_state(app_state.clone(), resolve_token)),
        )
        .with_state(app_state)
}

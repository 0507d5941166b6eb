use std::fmt::Display;

use anyhow::Context;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    database::{get_connection, queries::get_user_for_token},
    domain::{AuthToken, Role},
    models::User,
    routes::ApiError,
    startup::ApplicationState,
};

/// The user a request was authenticated as.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role(),
        }
    }
}

impl Display for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.username, self.id)
    }
}

/// Resolves `Authorization: Token <key>` into an [`AuthenticatedUser`]
/// request extension. Requests without the header pass through anonymously;
/// an unknown or malformed token is rejected.
#[tracing::instrument(
    name = "Middleware token resolution",
    skip(app_state, request, next),
    fields(user_id = tracing::field::Empty)
)]
pub async fn resolve_token(
    State(app_state): State<ApplicationState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(header) = request.headers().get(AUTHORIZATION).cloned() else {
        return Ok(next.run(request).await);
    };
    let token = header
        .to_str()
        .ok()
        .and_then(|value| AuthToken::from_header(value).ok())
        .ok_or(ApiError::Unauthorized)?;
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let user = get_user_for_token(&mut connection, &token)
        .await
        .context("Failed to look up auth token.")?
        .ok_or(ApiError::Unauthorized)?;
    drop(connection);
    tracing::Span::current()
        .record("user_id", &tracing::field::display(user.id));
    request.extensions_mut().insert(AuthenticatedUser::from(&user));
    request.extensions_mut().insert(token);
    Ok(next.run(request).await)
}

/// Who is making the request, as resolved by [`resolve_token`].
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn viewer_id(&self) -> Option<i32> {
        self.user.as_ref().map(|user| user.id)
    }

    pub fn require_user(&self) -> Result<&AuthenticatedUser, ApiError> {
        self.user.as_ref().ok_or(ApiError::Unauthorized)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Sync + Send,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            user: parts.extensions.get::<AuthenticatedUser>().cloned(),
        })
    }
}

/// Extractor for handlers that only run for authenticated users.
pub struct CurrentUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Sync + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(Self)
            .ok_or(ApiError::Unauthorized)
    }
}

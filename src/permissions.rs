use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::{
    authentication::{AuthenticatedUser, RequestContext},
    routes::ApiError,
};

pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Rejects anonymous requests.
pub async fn require_authenticated(
    context: RequestContext,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    context.require_user()?;
    Ok(next.run(request).await)
}

/// Reads are public; anything else needs an authenticated user.
pub async fn read_only_or_authenticated(
    context: RequestContext,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_safe_method(request.method()) {
        context.require_user()?;
    }
    Ok(next.run(request).await)
}

/// Rejects anonymous requests with 401 and non-admins with 403.
pub async fn require_admin(
    context: RequestContext,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = context.require_user()?;
    if !user.is_admin() {
        tracing::warn!(%user, "Non-admin user attempted an admin action.");
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Object-level check for mutating a recipe.
pub fn ensure_author_or_admin(
    user: &AuthenticatedUser,
    author_id: i32,
) -> Result<(), ApiError> {
    if user.is_admin() || user.id == author_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

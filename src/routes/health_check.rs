use axum::{extract::State, http::StatusCode};
use diesel_async::RunQueryDsl;

use crate::{database::get_connection, startup::ApplicationState};

/// 200 while the database answers, 503 otherwise.
#[tracing::instrument(name = "Health check", skip(app_state))]
pub async fn health_check(State(app_state): State<ApplicationState>) -> StatusCode {
    let Ok(mut connection) = get_connection(&app_state.database_pool).await else {
        return StatusCode::SERVICE_UNAVAILABLE;
    };
    match diesel::sql_query("SELECT 1").execute(&mut connection).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Database is not answering.");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

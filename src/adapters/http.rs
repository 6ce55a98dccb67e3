//! Inbound HTTP surface: `GET /v1/users`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::domain::ports::UsersService;
use crate::utils::error::{ErrorCategory, UsersError};

/// Non-standard status used when the caller went away before we answered.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Shared application state
pub struct AppState {
    pub users: Arc<dyn UsersService>,
}

impl AppState {
    pub fn new(users: Arc<dyn UsersService>) -> Self {
        Self { users }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/users", get(get_users_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_users_handler(State(state): State<Arc<AppState>>) -> Result<String, UsersError> {
    // Dropping the handler future (client disconnect) cancels the upstream calls.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    state.users.get_users(&cancel).await
}

pub fn status_for(error: &UsersError) -> StatusCode {
    match error.category() {
        ErrorCategory::Upstream if error.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        ErrorCategory::Upstream => StatusCode::BAD_GATEWAY,
        ErrorCategory::Cancellation => StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        ErrorCategory::Configuration | ErrorCategory::System => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for UsersError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        if status.is_server_error() {
            tracing::error!(
                category = ?self.category(),
                "GET /v1/users failed: {}",
                self
            );
        } else {
            tracing::info!("GET /v1/users ended early: {}", self);
        }

        (status, self.user_friendly_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        let err = UsersError::UpstreamStatus {
            status: 501,
            url: "http://example.com/userss".to_string(),
        };
        assert_eq!(status_for(&err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn cancellation_maps_to_client_closed() {
        assert_eq!(status_for(&UsersError::Cancelled).as_u16(), 499);
    }

    #[test]
    fn configuration_failures_are_internal() {
        let err = UsersError::ConfigError {
            message: "broken".to_string(),
        };
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

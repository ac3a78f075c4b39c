use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use super::mailer::EmailProvider;
use super::rate_limit::client_identifier;
use super::service::{DispatchError, NotificationDispatcher};

pub const DISPATCH_PATH: &str = "/functions/v1/send-consultation-emails";

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            DispatchError::MailerNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            DispatchError::MalformedPayload(_) | DispatchError::Invalid(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (self.status(), Json(payload)).into_response()
    }
}

/// Browser callers send the hosted backend's auth headers along with JSON.
pub fn dispatcher_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Router exposing the dispatcher endpoint with CORS preflight handling.
pub fn notification_router<M>(dispatcher: Arc<NotificationDispatcher<M>>) -> Router
where
    M: EmailProvider + 'static,
{
    Router::new()
        .route(
            DISPATCH_PATH,
            post(dispatch_handler::<M>).options(preflight_handler),
        )
        .layer(dispatcher_cors())
        .with_state(dispatcher)
}

/// Bare `OPTIONS` without CORS request headers; real preflights never reach it.
async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn dispatch_handler<M>(
    State(dispatcher): State<Arc<NotificationDispatcher<M>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    M: EmailProvider + 'static,
{
    let client_id = client_identifier(&headers);
    match dispatcher.dispatch(&client_id, &body).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => err.into_response(),
    }
}

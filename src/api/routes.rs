use super::handlers::*;
use crate::ports::PaymentGatewayPort;
use crate::application::ErrorResponse;
use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

pub fn create_router<G: PaymentGatewayPort + 'static>(
    state: AppState<G>,
    cors_origins: &[String],
) -> Router {
    Router::new()
        .route("/health", get(health_check::<G>))
        .route("/api/process-payment", post(process_payment::<G>))
        .route(
            "/api/process-alternative-payment",
            post(process_alternative_payment::<G>),
        )
        .route("/api/activate-subscription", post(activate_subscription))
        .route("/webhook", post(webhook))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 处理器崩溃时返回 500 JSON，而不是断开连接
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(
            "Internal server error".to_string(),
            "The request could not be processed".to_string(),
        )),
    )
        .into_response()
}

/// 跨域配置，来源列表包含 `*` 时放行全部来源
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

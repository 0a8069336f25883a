use crate::application::{
    ActivateSubscriptionRequest, ActivateSubscriptionResponse, ErrorResponse, HealthResponse,
    PaymentService, WebhookNotification,
};
use crate::domain::errors::ValidationError;
use crate::domain::validation::REQUIRED_FIELDS;
use crate::domain::PaymentRequest;
use crate::ports::PaymentGatewayPort;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 应用状态
pub struct AppState<G: PaymentGatewayPort + 'static> {
    pub payment_service: Arc<PaymentService<G>>,
}

impl<G: PaymentGatewayPort + 'static> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            payment_service: self.payment_service.clone(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn validation_failure(e: ValidationError) -> ApiError {
    warn!("Payment validation failed: {}", e);
    (
        StatusCode::BAD_REQUEST,
        Json(
            ErrorResponse::new("Missing required data".to_string(), e.message)
                .with_required(&e.required),
        ),
    )
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    warn!("Invalid payment body: {}", rejection);
    (
        StatusCode::BAD_REQUEST,
        Json(
            ErrorResponse::new("Invalid request body".to_string(), rejection.body_text())
                .with_required(&REQUIRED_FIELDS),
        ),
    )
}

/// 银行卡支付
pub async fn process_payment<G: PaymentGatewayPort + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    info!("Received card payment request");
    debug!("Card payment payload: {:?}", request);

    state
        .payment_service
        .process_card_payment(request)
        .await
        .map(|result| (StatusCode::OK, Json(result)))
        .map_err(validation_failure)
}

/// 替代支付（线下凭证）
pub async fn process_alternative_payment<G: PaymentGatewayPort + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    info!("Received alternative payment request");
    debug!("Alternative payment payload: {:?}", request);

    state
        .payment_service
        .process_alternative_payment(request)
        .await
        .map(|result| (StatusCode::OK, Json(result)))
        .map_err(validation_failure)
}

/// 激活订阅（占位实现）
pub async fn activate_subscription(
    payload: Result<Json<ActivateSubscriptionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    info!(
        payment_id = ?request.payment_id,
        plan = ?request.plan,
        has_name = request.name.is_some(),
        has_phone = request.phone.is_some(),
        "Activating subscription"
    );

    (
        StatusCode::OK,
        Json(ActivateSubscriptionResponse::from(request)),
    )
}

/// 网关回调，只记录并确认收到
pub async fn webhook(body: String) -> StatusCode {
    info!("Received gateway webhook");

    match serde_json::from_str::<WebhookNotification>(&body) {
        Ok(notification) if notification.notification_type.as_deref() == Some("payment") => {
            let payment_id = notification.data.and_then(|d| d.id);
            info!("Payment notification for payment: {:?}", payment_id);
        }
        Ok(notification) => {
            debug!("Ignoring webhook of type: {:?}", notification.notification_type);
        }
        Err(e) => {
            warn!("Unparseable webhook body: {}", e);
        }
    }

    StatusCode::OK
}

/// 健康检查
pub async fn health_check<G: PaymentGatewayPort + 'static>(
    State(state): State<AppState<G>>,
) -> impl IntoResponse {
    let gateway_configured = state.payment_service.gateway_configured();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            message: if gateway_configured {
                "Payment service running with gateway".to_string()
            } else {
                "Payment service running in simulation-only mode".to_string()
            },
            gateway_configured,
            timestamp: chrono::Utc::now(),
        }),
    )
}

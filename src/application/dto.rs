use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,

    /// 必填字段（仅校验失败时返回）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            required: Vec::new(),
        }
    }

    pub fn with_required(mut self, required: &[&str]) -> Self {
        self.required = required.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// 订阅激活请求
#[derive(Debug, Default, Deserialize)]
pub struct ActivateSubscriptionRequest {
    #[serde(default)]
    pub payment_id: Option<Value>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// 订阅激活响应
#[derive(Debug, Serialize)]
pub struct ActivateSubscriptionResponse {
    pub success: bool,
    pub message: String,
    pub user: SubscribedUser,
}

#[derive(Debug, Serialize)]
pub struct SubscribedUser {
    pub email: Option<String>,
    pub plan: Option<String>,
    pub status: String,
}

impl From<ActivateSubscriptionRequest> for ActivateSubscriptionResponse {
    fn from(request: ActivateSubscriptionRequest) -> Self {
        Self {
            success: true,
            message: "Subscription activated".to_string(),
            user: SubscribedUser {
                email: request.email,
                plan: request.plan,
                status: "active".to_string(),
            },
        }
    }
}

/// 网关回调通知（仅用于日志）
#[derive(Debug, Default, Deserialize)]
pub struct WebhookNotification {
    #[serde(default, rename = "type")]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub id: Option<Value>,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub gateway_configured: bool,
    pub timestamp: DateTime<Utc>,
}

use std::fmt;
use thiserror::Error;

/// 请求校验错误（缺少必填字段或字段格式不正确）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// 错误说明
    pub message: String,

    /// 该类请求的必填字段
    pub required: Vec<&'static str>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, required: &[&'static str]) -> Self {
        Self {
            message: message.into(),
            required: required.to_vec(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (required: {})", self.message, self.required.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// 领域层错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 验证错误
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// 支付网关返回错误
    #[error("Gateway error (status {status:?}): {message}")]
    Gateway {
        status: Option<u16>,
        message: String,
    },

    /// 支付网关响应格式不正确
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// 支付网关调用超时
    #[error("Gateway call timed out after {0} ms")]
    GatewayTimeout(u128),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP请求错误
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// 是否属于网关调用失败（需要走降级路径）
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Gateway { .. }
                | DomainError::MalformedResponse(_)
                | DomainError::GatewayTimeout(_)
                | DomainError::HttpError(_)
                | DomainError::SerializationError(_)
                | DomainError::InternalError(_)
        )
    }
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::FallbackPolicy;
use std::time::Duration;

const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "https://tu-frontend.netlify.app",
    "https://tu-dominio.com",
];

/// 服务监听配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 允许的跨域来源，包含 `*` 时放行全部
    pub cors_origins: Vec<String>,
}

/// MercadoPago 网关配置
#[derive(Debug, Clone)]
pub struct MercadoPagoConfig {
    /// 访问令牌，未配置时进入纯模拟模式
    pub access_token: Option<String>,

    /// API基础URL
    pub base_url: String,

    /// 单次网关调用超时
    pub timeout: Duration,
}

impl MercadoPagoConfig {
    pub fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }
}

/// 支付处理配置
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// 缺省商品描述
    pub default_description: String,

    /// 线下凭证链接前缀
    pub ticket_base_url: String,

    /// 网关失败时的降级策略
    pub fallback_policy: FallbackPolicy,
}

/// 应用配置（启动时读取一次，之后只读）
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mercado_pago: MercadoPagoConfig,
    pub payments: PaymentsConfig,
}

impl AppConfig {
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| DomainError::ConfigurationError(format!("PORT: {}", e)))?,
            None => 10000,
        };

        let timeout_secs = match get("GATEWAY_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                DomainError::ConfigurationError(format!("GATEWAY_TIMEOUT_SECS: {}", e))
            })?,
            None => 10,
        };
        if timeout_secs == 0 {
            return Err(DomainError::ConfigurationError(
                "GATEWAY_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        let fallback_policy = match get("FALLBACK_POLICY") {
            Some(raw) => raw
                .parse::<FallbackPolicy>()
                .map_err(DomainError::ConfigurationError)?,
            None => FallbackPolicy::default(),
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            server: ServerConfig {
                host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
                cors_origins,
            },
            mercado_pago: MercadoPagoConfig {
                access_token: get("MERCADOPAGO_ACCESS_TOKEN"),
                base_url: get("MERCADOPAGO_BASE_URL")
                    .unwrap_or_else(|| "https://api.mercadopago.com".to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            payments: PaymentsConfig {
                default_description: get("DEFAULT_DESCRIPTION")
                    .unwrap_or_else(|| "Suscripción DENTALUX".to_string()),
                ticket_base_url: get("TICKET_BASE_URL")
                    .unwrap_or_else(|| "https://www.mercadopago.com.mx/payments".to_string()),
                fallback_policy,
            },
        })
    }
}

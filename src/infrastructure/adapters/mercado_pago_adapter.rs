use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::config::app_config::MercadoPagoConfig;
use crate::ports::payment_gateway_port::*;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

/// MercadoPago 支付网关适配器
#[derive(Clone)]
pub struct MercadoPagoAdapter {
    access_token: String,
    base_url: String,
    client: Client,
}

impl MercadoPagoAdapter {
    /// 根据配置创建适配器，未配置访问令牌时返回 `None`
    pub fn from_config(config: &MercadoPagoConfig) -> DomainResult<Option<Self>> {
        let Some(access_token) = config.access_token.clone() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::ConfigurationError(format!("HTTP client: {}", e)))?;

        Ok(Some(Self {
            access_token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }))
    }

    /// 生成幂等键
    fn generate_idempotency_key() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl PaymentGatewayPort for MercadoPagoAdapter {
    fn name(&self) -> &str {
        "mercadopago"
    }

    /// 创建支付
    async fn create_payment(
        &self,
        request: GatewayPaymentRequest,
    ) -> DomainResult<GatewayPaymentResponse> {
        let url = format!("{}/v1/payments", self.base_url);
        debug!("MercadoPago payment request: {:?}", request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("X-Idempotency-Key", Self::generate_idempotency_key())
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("MercadoPago API error: {} - {}", status, error_text);
            return Err(DomainError::Gateway {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let body = response.text().await?;
        debug!("MercadoPago payment response: {}", body);

        let payment: GatewayPaymentResponse = serde_json::from_str(&body)
            .map_err(|e| DomainError::MalformedResponse(e.to_string()))?;

        Ok(payment)
    }
}

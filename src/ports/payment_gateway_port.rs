use crate::domain::errors::DomainResult;
use crate::domain::{Identification, Money, ValidatedPayment};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 网关创建支付请求
#[derive(Clone, PartialEq, Serialize)]
pub struct GatewayPaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub transaction_amount: Money,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
    pub installments: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<i64>,
    pub payer: GatewayPayerRequest,
    pub metadata: Map<String, Value>,
}

#[derive(Clone, PartialEq, Serialize)]
pub struct GatewayPayerRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
}

// 卡令牌与邮箱只发送给网关，不写入日志
impl fmt::Debug for GatewayPaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayPaymentRequest")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("transaction_amount", &self.transaction_amount)
            .field("description", &self.description)
            .field("payment_method_id", &self.payment_method_id)
            .field("installments", &self.installments)
            .field("issuer_id", &self.issuer_id)
            .field("payer", &self.payer)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl fmt::Debug for GatewayPayerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayPayerRequest")
            .field("email", &"[REDACTED]")
            .field("identification", &self.identification)
            .finish()
    }
}

impl From<&ValidatedPayment> for GatewayPaymentRequest {
    fn from(payment: &ValidatedPayment) -> Self {
        Self {
            token: payment.token.clone(),
            transaction_amount: payment.amount,
            description: payment.description.clone(),
            payment_method_id: payment.payment_method_id.clone(),
            installments: payment.installments,
            issuer_id: payment.issuer_id,
            payer: GatewayPayerRequest {
                email: payment.payer.email.clone(),
                identification: payment.payer.identification.clone(),
            },
            metadata: payment.metadata.clone(),
        }
    }
}

/// 网关原始响应（字段均可能缺失，由结果规范化器处理）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayPaymentResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_detail: Option<String>,
    #[serde(default)]
    pub transaction_amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payer: Option<GatewayPayer>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub payment_type_id: Option<String>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_approved: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default)]
    pub transaction_details: Option<TransactionDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayPayer {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub identification: Option<GatewayIdentification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayIdentification {
    #[serde(default, rename = "type")]
    pub id_type: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionDetails {
    #[serde(default)]
    pub external_resource_url: Option<String>,
}

/// 支付网关端口接口
#[async_trait]
pub trait PaymentGatewayPort: Send + Sync {
    /// 网关名称（日志用）
    fn name(&self) -> &str;

    /// 创建支付，每次调用只向网关发送一次请求
    async fn create_payment(
        &self,
        request: GatewayPaymentRequest,
    ) -> DomainResult<GatewayPaymentResponse>;
}

use crate::domain::value_objects::{Identification, Money, PaymentKind, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 类型不符的可选字段按缺失处理，交由校验器填充默认值
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// 客户端提交的原始支付请求
///
/// 所有字段在传输层均为可选，由校验器决定哪些字段缺失。
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// 支付金额（数字或数字字符串）
    #[serde(default)]
    pub transaction_amount: Option<Value>,

    /// 商品描述
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,

    /// 支付方式ID（visa、master、oxxo等）
    #[serde(default, deserialize_with = "lenient")]
    pub payment_method_id: Option<String>,

    /// 分期数
    #[serde(default)]
    pub installments: Option<Value>,

    /// 发卡行ID
    #[serde(default)]
    pub issuer_id: Option<Value>,

    /// 卡令牌
    #[serde(default, deserialize_with = "lenient")]
    pub token: Option<String>,

    /// 付款人
    #[serde(default, deserialize_with = "lenient")]
    pub payer: Option<PayerRequest>,

    /// 附加数据
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<Map<String, Value>>,

    /// 卡面信息（仅模拟使用）
    #[serde(default, deserialize_with = "lenient")]
    pub card_data: Option<CardData>,

    /// 是否显式请求模拟
    #[serde(default, deserialize_with = "lenient")]
    pub simulation_requested: Option<bool>,
}

// 令牌与邮箱不进入日志
impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("transaction_amount", &self.transaction_amount)
            .field("description", &self.description)
            .field("payment_method_id", &self.payment_method_id)
            .field("installments", &self.installments)
            .field("issuer_id", &self.issuer_id)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("payer", &self.payer)
            .field("metadata", &self.metadata)
            .field("card_data", &self.card_data)
            .field("simulation_requested", &self.simulation_requested)
            .finish()
    }
}

/// 原始付款人信息
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PayerRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,

    /// 证件信息，类型与号码不全时视为缺失
    #[serde(default, deserialize_with = "lenient")]
    pub identification: Option<Identification>,
}

impl fmt::Debug for PayerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayerRequest")
            .field("email", &self.email.as_ref().map(|_| "[REDACTED]"))
            .field("identification", &self.identification)
            .finish()
    }
}

/// 卡面信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    /// 持卡人姓名
    #[serde(default, deserialize_with = "lenient")]
    pub holder_name: Option<String>,
}

/// 付款人
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
}

/// 校验并规范化后的支付请求
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayment {
    /// 请求类型
    pub kind: PaymentKind,

    /// 支付金额
    pub amount: Money,

    /// 商品描述（已填充默认值）
    pub description: String,

    /// 支付方式ID
    pub payment_method_id: Option<String>,

    /// 分期数（至少为1）
    pub installments: u32,

    /// 发卡行ID
    pub issuer_id: Option<i64>,

    /// 卡令牌
    pub token: Option<String>,

    /// 付款人
    pub payer: Payer,

    /// 附加数据
    pub metadata: Map<String, Value>,

    /// 卡面信息
    pub card_data: Option<CardData>,

    /// 是否显式请求模拟
    pub simulation_requested: bool,
}

impl ValidatedPayment {
    /// 是否携带可用的卡令牌
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// 统一的支付结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// 支付ID（网关签发或本地生成）
    pub id: String,

    /// 支付状态
    pub status: PaymentStatus,

    /// 状态详情
    pub status_detail: String,

    /// 支付金额
    pub transaction_amount: Money,

    /// 商品描述
    pub description: String,

    /// 付款人
    pub payer: Payer,

    /// 支付方式ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,

    /// 支付类型ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type_id: Option<String>,

    /// 创建时间
    pub date_created: DateTime<Utc>,

    /// 批准时间（仅批准时存在）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_approved: Option<DateTime<Utc>>,

    /// 附加数据
    pub metadata: Map<String, Value>,

    /// 是否为模拟结果
    pub simulated: bool,

    /// 结果说明
    pub message: String,

    /// 线下凭证链接
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_request() {
        let request: PaymentRequest = serde_json::from_value(json!({
            "transaction_amount": 100,
            "payer": { "email": "a@b.com" }
        }))
        .unwrap();

        assert_eq!(request.transaction_amount, Some(json!(100)));
        assert_eq!(request.payer.unwrap().email.as_deref(), Some("a@b.com"));
        assert!(request.card_data.is_none());
        assert!(request.simulation_requested.is_none());
    }

    #[test]
    fn test_deserialize_request_with_card_data() {
        let request: PaymentRequest = serde_json::from_value(json!({
            "transaction_amount": "50.5",
            "installments": "3",
            "card_data": { "holder_name": "JUAN APRO" },
            "simulation_requested": true
        }))
        .unwrap();

        assert_eq!(request.transaction_amount, Some(json!("50.5")));
        assert_eq!(
            request.card_data.and_then(|c| c.holder_name).as_deref(),
            Some("JUAN APRO")
        );
        assert_eq!(request.simulation_requested, Some(true));
    }

    #[test]
    fn test_mistyped_optional_fields_are_absent() {
        let request: PaymentRequest = serde_json::from_value(json!({
            "transaction_amount": 100,
            "description": 5,
            "token": 12345,
            "metadata": [],
            "simulation_requested": null,
            "card_data": "JUAN APRO",
            "payer": { "email": "a@b.com", "identification": { "type": "DNI" } }
        }))
        .unwrap();

        assert!(request.description.is_none());
        assert!(request.token.is_none());
        assert!(request.metadata.is_none());
        assert!(request.simulation_requested.is_none());
        assert!(request.card_data.is_none());
        let payer = request.payer.unwrap();
        assert_eq!(payer.email.as_deref(), Some("a@b.com"));
        assert!(payer.identification.is_none());
    }

    #[test]
    fn test_debug_output_redacts_token_and_email() {
        let request: PaymentRequest = serde_json::from_value(json!({
            "transaction_amount": 100,
            "token": "tok_secret_123",
            "payer": { "email": "private@b.com" }
        }))
        .unwrap();

        let output = format!("{:?}", request);
        assert!(!output.contains("tok_secret_123"));
        assert!(!output.contains("private@b.com"));
        assert!(output.contains("[REDACTED]"));
    }

    #[test]
    fn test_result_omits_absent_optional_fields() {
        let result = PaymentResult {
            id: "SIM-1".to_string(),
            status: PaymentStatus::Rejected,
            status_detail: "cc_rejected_call_for_authorize".to_string(),
            transaction_amount: Money::from_cents(5000),
            description: "test".to_string(),
            payer: Payer {
                email: "a@b.com".to_string(),
                identification: None,
            },
            payment_method_id: None,
            payment_type_id: None,
            date_created: Utc::now(),
            date_approved: None,
            metadata: Map::new(),
            simulated: true,
            message: "rejected".to_string(),
            ticket_url: None,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "rejected");
        assert_eq!(value["transaction_amount"], json!(50.0));
        assert!(value.get("date_approved").is_none());
        assert!(value.get("ticket_url").is_none());
    }
}

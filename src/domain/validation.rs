use crate::domain::entities::{Payer, PaymentRequest, ValidatedPayment};
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{Identification, Money, PaymentKind};
use serde_json::{Map, Value};

/// 两类请求共同的必填字段
pub const REQUIRED_FIELDS: [&str; 2] = ["transaction_amount", "payer.email"];

/// 支付请求校验器
#[derive(Debug, Clone)]
pub struct PaymentValidator {
    default_description: String,
}

impl PaymentValidator {
    pub fn new(default_description: impl Into<String>) -> Self {
        Self {
            default_description: default_description.into(),
        }
    }

    /// 校验并规范化请求
    pub fn validate(
        &self,
        request: PaymentRequest,
        kind: PaymentKind,
    ) -> Result<ValidatedPayment, ValidationError> {
        let email = request
            .payer
            .as_ref()
            .and_then(|p| p.email.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        let amount = request
            .transaction_amount
            .as_ref()
            .filter(|v| !v.is_null());

        // 1. 必填字段
        let mut missing = Vec::new();
        if amount.is_none() {
            missing.push("transaction_amount");
        }
        if email.is_none() {
            missing.push("payer.email");
        }
        if !missing.is_empty() {
            return Err(ValidationError::new(
                format!("Missing required data: {}", missing.join(", ")),
                &REQUIRED_FIELDS,
            ));
        }

        // 2. 金额
        let amount = amount
            .and_then(numeric_value)
            .ok_or_else(|| {
                ValidationError::new("transaction_amount must be a number", &REQUIRED_FIELDS)
            })
            .and_then(|value| {
                Money::try_from(value).map_err(|e| ValidationError::new(e.message, &REQUIRED_FIELDS))
            })?;

        // 3. 可选字段
        let identification = request
            .payer
            .and_then(|p| p.identification)
            .unwrap_or_else(Identification::placeholder);

        let description = request
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| self.default_description.clone());

        let payment_method_id = request.payment_method_id.filter(|id| !id.trim().is_empty());
        let metadata = request.metadata.unwrap_or_else(Map::new);
        let simulation_requested = request.simulation_requested.unwrap_or(false);

        let payer = Payer {
            email: email.unwrap_or_default(),
            identification: Some(identification),
        };

        let payment = match kind {
            PaymentKind::Card => ValidatedPayment {
                kind,
                amount,
                description,
                payment_method_id,
                installments: request
                    .installments
                    .as_ref()
                    .and_then(coerce_installments)
                    .unwrap_or(1),
                issuer_id: request.issuer_id.as_ref().and_then(coerce_integer),
                token: request.token.filter(|t| !t.trim().is_empty()),
                payer,
                metadata,
                card_data: request.card_data,
                simulation_requested,
            },
            PaymentKind::Alternative => ValidatedPayment {
                kind,
                amount,
                description,
                payment_method_id,
                installments: 1,
                issuer_id: None,
                token: None,
                payer,
                metadata,
                card_data: None,
                simulation_requested,
            },
        };

        Ok(payment)
    }
}

/// 数字或数字字符串转换为浮点数
fn numeric_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn coerce_installments(value: &Value) -> Option<u32> {
    numeric_value(value)
        .map(f64::trunc)
        .filter(|v| *v >= 1.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

use crate::domain::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 支付状态（终态）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// 已批准
    Approved,
    /// 待支付（如线下凭证）
    Pending,
    /// 已拒绝
    Rejected,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Approved => write!(f, "approved"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl PaymentStatus {
    /// 将网关返回的状态字符串映射为终态
    pub fn from_gateway(status: &str) -> Option<Self> {
        match status {
            "approved" | "authorized" => Some(PaymentStatus::Approved),
            "pending" | "in_process" | "in_mediation" => Some(PaymentStatus::Pending),
            "rejected" | "cancelled" | "refunded" | "charged_back" => {
                Some(PaymentStatus::Rejected)
            }
            _ => None,
        }
    }
}

/// 请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// 银行卡支付
    Card,
    /// 替代支付（OXXO、转账等线下凭证）
    Alternative,
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentKind::Card => write!(f, "card"),
            PaymentKind::Alternative => write!(f, "alternative"),
        }
    }
}

/// 模拟路径的触发原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationReason {
    /// 客户端显式请求模拟
    Requested,
    /// 请求中没有卡令牌
    MissingToken,
    /// 未配置网关凭证
    GatewayUnavailable,
    /// 替代支付始终走凭证模拟
    Voucher,
}

impl fmt::Display for SimulationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationReason::Requested => write!(f, "simulation_requested"),
            SimulationReason::MissingToken => write!(f, "missing_token"),
            SimulationReason::GatewayUnavailable => write!(f, "gateway_unavailable"),
            SimulationReason::Voucher => write!(f, "voucher"),
        }
    }
}

/// 路由决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentRoute {
    /// 本地模拟
    Simulated(SimulationReason),
    /// 真实网关
    Gateway,
    /// 网关失败后的降级模拟
    FallbackSimulated,
}

impl fmt::Display for PaymentRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentRoute::Simulated(reason) => write!(f, "simulated:{}", reason),
            PaymentRoute::Gateway => write!(f, "gateway"),
            PaymentRoute::FallbackSimulated => write!(f, "fallback_simulated"),
        }
    }
}

/// 网关失败时的降级策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// 返回模拟的批准结果
    #[default]
    SimulateApproved,
    /// 返回明确的拒绝结果，暴露网关失败
    SurfaceRejected,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" | "simulate_approved" => Ok(FallbackPolicy::SimulateApproved),
            "reject" | "surface_rejected" => Ok(FallbackPolicy::SurfaceRejected),
            other => Err(format!("unknown fallback policy: {}", other)),
        }
    }
}

/// 证件信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    #[serde(rename = "type")]
    pub id_type: String,
    pub number: String,
}

impl Identification {
    /// 缺省占位证件
    pub fn placeholder() -> Self {
        Self {
            id_type: "DNI".to_string(),
            number: "12345678".to_string(),
        }
    }
}

/// 货币金额（内部以分为单位，序列化为十进制数字）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Money {
    /// 金额（分）
    pub amount_cents: i64,
}

impl Money {
    /// 创建新的金额对象（单位：分）
    pub fn from_cents(cents: i64) -> Self {
        Self { amount_cents: cents }
    }

    /// 转换为十进制金额
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// 转换为分
    pub fn to_cents(&self) -> i64 {
        self.amount_cents
    }
}

impl TryFrom<f64> for Money {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(ValidationError::new(
                "transaction_amount must be a number",
                &["transaction_amount"],
            ));
        }

        if value <= 0.0 {
            return Err(ValidationError::new(
                "transaction_amount must be greater than 0",
                &["transaction_amount"],
            ));
        }

        let scaled = value * 100.0;
        let cents = scaled.round();
        if cents >= i64::MAX as f64 {
            return Err(ValidationError::new(
                "transaction_amount exceeds the maximum supported amount",
                &["transaction_amount"],
            ));
        }

        // 不足一分或超过两位小数的金额都无法按原值扣款，容差随数量级放大以吸收浮点误差
        let tolerance = (scaled * f64::EPSILON * 4.0).max(1e-6);
        if (scaled - cents).abs() > tolerance || cents < 1.0 {
            return Err(ValidationError::new(
                "transaction_amount must have at most two decimal places",
                &["transaction_amount"],
            ));
        }

        Ok(Self::from_cents(cents as i64))
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.to_decimal())
    }
}

use crate::domain::entities::PaymentResult;
use crate::domain::value_objects::{PaymentKind, PaymentRoute, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 领域事件trait
pub trait DomainEvent {
    fn event_type(&self) -> &'static str;
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// 支付已得出终态
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResolved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub payment_id: String,
    pub kind: PaymentKind,
    pub route: String,
    pub status: PaymentStatus,
    pub simulated: bool,
    pub amount_cents: i64,
}

impl DomainEvent for PaymentResolved {
    fn event_type(&self) -> &'static str {
        "PaymentResolved"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl PaymentResolved {
    pub fn from_result(result: &PaymentResult, kind: PaymentKind, route: PaymentRoute) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            payment_id: result.id.clone(),
            kind,
            route: route.to_string(),
            status: result.status,
            simulated: result.simulated,
            amount_cents: result.transaction_amount.to_cents(),
        }
    }
}

/// 网关调用失败，已切换到降级模拟
#[derive(Debug, Clone, Serialize)]
pub struct GatewayFallbackApplied {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub reason: String,
}

impl DomainEvent for GatewayFallbackApplied {
    fn event_type(&self) -> &'static str {
        "GatewayFallbackApplied"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl GatewayFallbackApplied {
    pub fn new(reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            reason,
        }
    }
}

use crate::domain::entities::{CardData, ValidatedPayment};
use crate::domain::value_objects::{FallbackPolicy, PaymentStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 持卡人姓名包含该标记时强制批准
pub const APPROVE_MARKER: &str = "APRO";

/// 持卡人姓名包含该标记（且不含批准标记）时拒绝
pub const REJECT_MARKER: &str = "CONT";

/// 模拟支付ID前缀
pub const SIMULATED_ID_PREFIX: &str = "SIM-";

/// 本地模拟产生的原始支付结果
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPayment {
    pub id: String,
    pub status: PaymentStatus,
    pub status_detail: String,
    pub payment_method_id: String,
    pub payment_type_id: String,
    pub date_created: DateTime<Utc>,
    pub date_approved: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub ticket_url: Option<String>,
}

/// 根据卡面信息决定模拟状态
///
/// 持卡人姓名不区分大小写：含 `APRO` 批准，否则含 `CONT` 拒绝，其余批准。
pub fn decide_card_status(card_data: Option<&CardData>) -> PaymentStatus {
    let Some(holder_name) = card_data.and_then(|c| c.holder_name.as_deref()) else {
        return PaymentStatus::Approved;
    };

    let holder_name = holder_name.to_uppercase();
    if holder_name.contains(APPROVE_MARKER) {
        PaymentStatus::Approved
    } else if holder_name.contains(REJECT_MARKER) {
        PaymentStatus::Rejected
    } else {
        PaymentStatus::Approved
    }
}

/// 本地支付模拟器，不访问任何外部系统
#[derive(Debug, Clone)]
pub struct PaymentSimulator {
    ticket_base_url: String,
}

impl PaymentSimulator {
    pub fn new(ticket_base_url: impl Into<String>) -> Self {
        Self {
            ticket_base_url: ticket_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 模拟银行卡支付
    pub fn simulate_card(&self, payment: &ValidatedPayment) -> SimulatedPayment {
        match decide_card_status(payment.card_data.as_ref()) {
            PaymentStatus::Rejected => self.rejected(
                payment,
                "cc_rejected_call_for_authorize",
                format!(
                    "Simulated payment rejected: cardholder name contains \"{}\". \
                     Use a cardholder name containing \"{}\" to force approval.",
                    REJECT_MARKER, APPROVE_MARKER
                ),
            ),
            _ => self.approved(payment, None),
        }
    }

    /// 模拟线下凭证支付（OXXO、转账等），始终为待支付
    pub fn simulate_voucher(&self, payment: &ValidatedPayment) -> SimulatedPayment {
        let id = generate_id();
        let ticket_url = format!("{}/{}/ticket", self.ticket_base_url, id);

        SimulatedPayment {
            status: PaymentStatus::Pending,
            status_detail: "pending_waiting_payment".to_string(),
            payment_method_id: payment
                .payment_method_id
                .clone()
                .unwrap_or_else(|| "oxxo".to_string()),
            payment_type_id: "ticket".to_string(),
            date_created: Utc::now(),
            date_approved: None,
            message: Some(format!(
                "Simulated voucher created, waiting for payment of {}",
                payment.amount
            )),
            ticket_url: Some(ticket_url),
            id,
        }
    }

    /// 网关失败后的降级结果
    pub fn simulate_fallback(
        &self,
        payment: &ValidatedPayment,
        policy: FallbackPolicy,
        reason: &str,
    ) -> SimulatedPayment {
        match policy {
            FallbackPolicy::SimulateApproved => self.approved(
                payment,
                Some(format!(
                    "Payment gateway unavailable ({}); simulated approval issued",
                    reason
                )),
            ),
            FallbackPolicy::SurfaceRejected => self.rejected(
                payment,
                "gateway_error",
                format!("Payment gateway failed: {}", reason),
            ),
        }
    }

    fn approved(&self, payment: &ValidatedPayment, message: Option<String>) -> SimulatedPayment {
        let now = Utc::now();
        SimulatedPayment {
            id: generate_id(),
            status: PaymentStatus::Approved,
            status_detail: "accredited".to_string(),
            payment_method_id: card_method(payment),
            payment_type_id: "credit_card".to_string(),
            date_created: now,
            date_approved: Some(now),
            message,
            ticket_url: None,
        }
    }

    fn rejected(
        &self,
        payment: &ValidatedPayment,
        status_detail: &str,
        message: String,
    ) -> SimulatedPayment {
        SimulatedPayment {
            id: generate_id(),
            status: PaymentStatus::Rejected,
            status_detail: status_detail.to_string(),
            payment_method_id: card_method(payment),
            payment_type_id: "credit_card".to_string(),
            date_created: Utc::now(),
            date_approved: None,
            message: Some(message),
            ticket_url: None,
        }
    }
}

fn card_method(payment: &ValidatedPayment) -> String {
    payment
        .payment_method_id
        .clone()
        .unwrap_or_else(|| "visa".to_string())
}

fn generate_id() -> String {
    format!("{}{}", SIMULATED_ID_PREFIX, Uuid::new_v4().simple())
}

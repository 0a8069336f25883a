use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{
    Identification, Money, Payer, PaymentResult, PaymentStatus, SimulatedPayment,
    ValidatedPayment,
};
use crate::ports::payment_gateway_port::GatewayPaymentResponse;
use chrono::Utc;
use serde_json::Value;

/// 将本地模拟结果统一为 `PaymentResult`
pub fn from_simulation(simulated: SimulatedPayment, payment: &ValidatedPayment) -> PaymentResult {
    let message = simulated
        .message
        .unwrap_or_else(|| default_message(simulated.status, true));

    PaymentResult {
        id: simulated.id,
        status: simulated.status,
        status_detail: simulated.status_detail,
        transaction_amount: payment.amount,
        description: payment.description.clone(),
        payer: payment.payer.clone(),
        payment_method_id: Some(simulated.payment_method_id),
        payment_type_id: Some(simulated.payment_type_id),
        date_created: simulated.date_created,
        date_approved: simulated.date_approved,
        metadata: payment.metadata.clone(),
        simulated: true,
        message,
        ticket_url: simulated.ticket_url,
    }
}

/// 将网关响应统一为 `PaymentResult`，缺少ID或状态无法识别时视为响应格式错误
pub fn from_gateway(
    response: GatewayPaymentResponse,
    payment: &ValidatedPayment,
) -> DomainResult<PaymentResult> {
    let id = match response.id {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(DomainError::MalformedResponse("missing payment id".to_string())),
    };

    let raw_status = response
        .status
        .ok_or_else(|| DomainError::MalformedResponse("missing payment status".to_string()))?;
    let status = PaymentStatus::from_gateway(&raw_status).ok_or_else(|| {
        DomainError::MalformedResponse(format!("unknown payment status: {}", raw_status))
    })?;

    let transaction_amount = response
        .transaction_amount
        .and_then(|amount| Money::try_from(amount).ok())
        .unwrap_or(payment.amount);

    let payer = match response.payer {
        Some(gateway_payer) => Payer {
            email: gateway_payer
                .email
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| payment.payer.email.clone()),
            identification: gateway_payer
                .identification
                .and_then(|i| match (i.id_type, i.number) {
                    (Some(id_type), Some(number)) => Some(Identification { id_type, number }),
                    _ => None,
                })
                .or_else(|| payment.payer.identification.clone()),
        },
        None => payment.payer.clone(),
    };

    let date_approved = match status {
        PaymentStatus::Approved => response.date_approved.or(response.date_created),
        _ => None,
    };

    Ok(PaymentResult {
        id,
        status,
        status_detail: response.status_detail.unwrap_or_else(|| raw_status.clone()),
        transaction_amount,
        description: response
            .description
            .unwrap_or_else(|| payment.description.clone()),
        payer,
        payment_method_id: response
            .payment_method_id
            .or_else(|| payment.payment_method_id.clone()),
        payment_type_id: response.payment_type_id,
        date_created: response.date_created.unwrap_or_else(Utc::now),
        date_approved,
        metadata: response
            .metadata
            .unwrap_or_else(|| payment.metadata.clone()),
        simulated: false,
        message: default_message(status, false),
        ticket_url: response
            .transaction_details
            .and_then(|details| details.external_resource_url),
    })
}

fn default_message(status: PaymentStatus, simulated: bool) -> String {
    let origin = if simulated { "Simulated payment" } else { "Payment" };
    match status {
        PaymentStatus::Approved => format!("{} approved", origin),
        PaymentStatus::Pending => format!("{} pending", origin),
        PaymentStatus::Rejected => format!("{} rejected", origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PaymentKind, PaymentSimulator};
    use serde_json::{json, Map};

    fn payment() -> ValidatedPayment {
        let mut metadata = Map::new();
        metadata.insert("plan".to_string(), json!("pro"));

        ValidatedPayment {
            kind: PaymentKind::Card,
            amount: Money::from_cents(10000),
            description: "Suscripción DENTALUX".to_string(),
            payment_method_id: Some("master".to_string()),
            installments: 1,
            issuer_id: None,
            token: Some("tok".to_string()),
            payer: Payer {
                email: "a@b.com".to_string(),
                identification: Some(Identification::placeholder()),
            },
            metadata,
            card_data: None,
            simulation_requested: false,
        }
    }

    fn gateway_response(value: Value) -> GatewayPaymentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_simulated_result_is_flagged_and_filled() {
        let simulated = PaymentSimulator::new("https://t.example").simulate_card(&payment());
        let result = from_simulation(simulated, &payment());

        assert!(result.simulated);
        assert_eq!(result.status, PaymentStatus::Approved);
        assert_eq!(result.message, "Simulated payment approved");
        assert_eq!(result.payment_method_id.as_deref(), Some("master"));
        assert_eq!(result.metadata["plan"], "pro");
        assert_eq!(result.transaction_amount.to_cents(), 10000);
    }

    #[test]
    fn test_gateway_result_passes_through() {
        let response = gateway_response(json!({
            "id": 987654321,
            "status": "approved",
            "status_detail": "accredited",
            "transaction_amount": 100.0,
            "payment_method_id": "visa",
            "payment_type_id": "credit_card",
            "date_created": "2024-05-01T10:00:00.000-04:00",
            "date_approved": "2024-05-01T10:00:01.000-04:00",
            "payer": { "email": "gateway@b.com" }
        }));

        let result = from_gateway(response, &payment()).unwrap();

        assert!(!result.simulated);
        assert_eq!(result.id, "987654321");
        assert_eq!(result.status_detail, "accredited");
        assert_eq!(result.payment_method_id.as_deref(), Some("visa"));
        assert_eq!(result.payer.email, "gateway@b.com");
        assert_eq!(result.payer.identification, Some(Identification::placeholder()));
        assert_eq!(result.description, "Suscripción DENTALUX");
        assert!(result.date_approved.is_some());
        assert_eq!(result.message, "Payment approved");
    }

    #[test]
    fn test_gateway_status_variants_are_mapped() {
        let response = gateway_response(json!({
            "id": "abc",
            "status": "in_process",
            "transaction_details": { "external_resource_url": "https://ticket" }
        }));

        let result = from_gateway(response, &payment()).unwrap();

        assert_eq!(result.status, PaymentStatus::Pending);
        assert_eq!(result.status_detail, "in_process");
        assert!(result.date_approved.is_none());
        assert_eq!(result.ticket_url.as_deref(), Some("https://ticket"));
    }

    #[test]
    fn test_malformed_gateway_response_is_an_error() {
        let missing_id = gateway_response(json!({ "status": "approved" }));
        assert!(matches!(
            from_gateway(missing_id, &payment()),
            Err(DomainError::MalformedResponse(_))
        ));

        let unknown_status = gateway_response(json!({ "id": 1, "status": "exploded" }));
        let err = from_gateway(unknown_status, &payment()).unwrap_err();
        assert!(err.is_gateway_failure());
    }
}

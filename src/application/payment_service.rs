use crate::application::normalizer;
use crate::domain::errors::{DomainError, DomainResult, ValidationError};
use crate::domain::{
    DomainEvent, FallbackPolicy, GatewayFallbackApplied, PaymentKind, PaymentRequest,
    PaymentResolved, PaymentResult, PaymentRoute, PaymentSimulator, PaymentValidator,
    SimulationReason, ValidatedPayment,
};
use crate::infrastructure::config::PaymentsConfig;
use crate::ports::payment_gateway_port::{GatewayPaymentRequest, GatewayPaymentResponse};
use crate::ports::PaymentGatewayPort;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 支付编排服务
///
/// 校验请求后在本地模拟与真实网关之间路由，网关失败时降级为模拟结果，
/// 通过校验的请求总能得到终态结果。
pub struct PaymentService<G: PaymentGatewayPort + 'static> {
    gateway: Option<Arc<G>>,
    validator: PaymentValidator,
    simulator: PaymentSimulator,
    fallback_policy: FallbackPolicy,
    gateway_timeout: Duration,
}

impl<G: PaymentGatewayPort + 'static> PaymentService<G> {
    pub fn new(gateway: Option<Arc<G>>, config: &PaymentsConfig, gateway_timeout: Duration) -> Self {
        Self {
            gateway,
            validator: PaymentValidator::new(config.default_description.clone()),
            simulator: PaymentSimulator::new(config.ticket_base_url.clone()),
            fallback_policy: config.fallback_policy,
            gateway_timeout,
        }
    }

    /// 是否配置了网关凭证
    pub fn gateway_configured(&self) -> bool {
        self.gateway.is_some()
    }

    /// 路由决策
    pub fn route(&self, payment: &ValidatedPayment) -> PaymentRoute {
        if payment.simulation_requested {
            PaymentRoute::Simulated(SimulationReason::Requested)
        } else if !payment.has_token() {
            PaymentRoute::Simulated(SimulationReason::MissingToken)
        } else if self.gateway.is_none() {
            PaymentRoute::Simulated(SimulationReason::GatewayUnavailable)
        } else {
            PaymentRoute::Gateway
        }
    }

    /// 处理银行卡支付
    pub async fn process_card_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentResult, ValidationError> {
        // 1. 校验
        let payment = self.validator.validate(request, PaymentKind::Card)?;
        info!("Processing card payment of {}", payment.amount);

        // 2. 路由
        let (result, route) = match self.route(&payment) {
            PaymentRoute::Gateway => self.resolve_via_gateway(&payment).await,
            route => {
                debug!("Simulating card payment ({})", route);
                let simulated = self.simulator.simulate_card(&payment);
                (normalizer::from_simulation(simulated, &payment), route)
            }
        };

        // 3. 结果
        self.publish_resolution(&result, payment.kind, route);
        Ok(result)
    }

    /// 处理替代支付（始终生成待支付凭证）
    pub async fn process_alternative_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentResult, ValidationError> {
        let payment = self.validator.validate(request, PaymentKind::Alternative)?;
        info!("Processing alternative payment of {}", payment.amount);

        let simulated = self.simulator.simulate_voucher(&payment);
        let result = normalizer::from_simulation(simulated, &payment);

        self.publish_resolution(
            &result,
            payment.kind,
            PaymentRoute::Simulated(SimulationReason::Voucher),
        );
        Ok(result)
    }

    async fn resolve_via_gateway(&self, payment: &ValidatedPayment) -> (PaymentResult, PaymentRoute) {
        let outcome = self
            .call_gateway(payment)
            .await
            .and_then(|response| normalizer::from_gateway(response, payment));

        match outcome {
            Ok(result) => (result, PaymentRoute::Gateway),
            Err(e) => {
                if e.is_gateway_failure() {
                    warn!("Gateway call failed, falling back to simulation: {}", e);
                } else {
                    error!("Unexpected gateway path error, falling back to simulation: {}", e);
                }

                let event = GatewayFallbackApplied::new(e.to_string());
                info!(
                    event_type = event.event_type(),
                    event_id = %event.event_id,
                    occurred_at = %event.occurred_at(),
                    reason = %event.reason,
                    "Gateway fallback applied"
                );

                let simulated =
                    self.simulator
                        .simulate_fallback(payment, self.fallback_policy, &event.reason);
                (
                    normalizer::from_simulation(simulated, payment),
                    PaymentRoute::FallbackSimulated,
                )
            }
        }
    }

    /// 在独立任务中调用网关，超时与任务崩溃都视为网关失败
    async fn call_gateway(&self, payment: &ValidatedPayment) -> DomainResult<GatewayPaymentResponse> {
        let gateway = self.gateway.clone().ok_or_else(|| {
            DomainError::ConfigurationError("gateway credential not configured".to_string())
        })?;
        let request = GatewayPaymentRequest::from(payment);

        info!("Submitting payment to gateway: {}", gateway.name());
        let task = tokio::spawn(async move { gateway.create_payment(request).await });
        let abort = task.abort_handle();

        match tokio::time::timeout(self.gateway_timeout, task).await {
            Ok(Ok(response)) => response,
            Ok(Err(join_error)) => Err(DomainError::InternalError(format!(
                "gateway task failed: {}",
                join_error
            ))),
            Err(_) => {
                abort.abort();
                Err(DomainError::GatewayTimeout(self.gateway_timeout.as_millis()))
            }
        }
    }

    fn publish_resolution(&self, result: &PaymentResult, kind: PaymentKind, route: PaymentRoute) {
        let event = PaymentResolved::from_result(result, kind, route);
        info!(
            event_type = event.event_type(),
            event_id = %event.event_id,
            occurred_at = %event.occurred_at(),
            payment_id = %event.payment_id,
            kind = %event.kind,
            route = %event.route,
            status = %event.status,
            simulated = event.simulated,
            amount_cents = event.amount_cents,
            "Payment resolved"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentStatus;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Respond(Value),
        Fail,
        Panic,
        Hang,
    }

    struct MockGateway {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl MockGateway {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentGatewayPort for MockGateway {
        fn name(&self) -> &str {
            "mock"
        }

        async fn create_payment(
            &self,
            _request: GatewayPaymentRequest,
        ) -> DomainResult<GatewayPaymentResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Respond(value) => Ok(serde_json::from_value(value.clone())?),
                Behavior::Fail => Err(DomainError::Gateway {
                    status: Some(503),
                    message: "network unreachable".to_string(),
                }),
                Behavior::Panic => panic!("gateway client bug"),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(GatewayPaymentResponse::default())
                }
            }
        }
    }

    fn payments_config(policy: FallbackPolicy) -> PaymentsConfig {
        PaymentsConfig {
            default_description: "Suscripción DENTALUX".to_string(),
            ticket_base_url: "https://tickets.example.com/payments".to_string(),
            fallback_policy: policy,
        }
    }

    fn service(gateway: Option<Arc<MockGateway>>) -> PaymentService<MockGateway> {
        PaymentService::new(
            gateway,
            &payments_config(FallbackPolicy::SimulateApproved),
            Duration::from_millis(200),
        )
    }

    fn request(value: Value) -> PaymentRequest {
        serde_json::from_value(value).unwrap()
    }

    fn tokenized(holder_name: &str) -> PaymentRequest {
        request(json!({
            "token": "card_tok",
            "transaction_amount": 100,
            "payment_method_id": "visa",
            "payer": { "email": "a@b.com" },
            "card_data": { "holder_name": holder_name }
        }))
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_gateway() {
        let gateway = MockGateway::new(Behavior::Fail);
        let service = service(Some(gateway.clone()));

        let err = service
            .process_card_payment(request(json!({ "token": "tok", "transaction_amount": 100 })))
            .await
            .unwrap_err();

        assert!(err.required.contains(&"payer.email"));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_scenario_a_apro_is_approved() {
        let result = service(None)
            .process_card_payment(request(json!({
                "transaction_amount": 100,
                "payer": { "email": "a@b.com" },
                "card_data": { "holder_name": "JUAN APRO" }
            })))
            .await
            .unwrap();

        assert_eq!(result.status, PaymentStatus::Approved);
        assert!(result.simulated);
        assert!(result.date_approved.is_some());
    }

    #[tokio::test]
    async fn test_scenario_b_cont_is_rejected() {
        let result = service(None)
            .process_card_payment(request(json!({
                "transaction_amount": 50,
                "payer": { "email": "a@b.com" },
                "card_data": { "holder_name": "JUAN CONT" }
            })))
            .await
            .unwrap();

        assert_eq!(result.status, PaymentStatus::Rejected);
        assert_eq!(result.status_detail, "cc_rejected_call_for_authorize");
        assert!(result.simulated);
    }

    #[tokio::test]
    async fn test_missing_token_is_simulated_even_with_gateway() {
        let gateway = MockGateway::new(Behavior::Respond(json!({ "id": 1, "status": "approved" })));
        let service = service(Some(gateway.clone()));

        let result = service
            .process_card_payment(request(json!({
                "transaction_amount": 100,
                "payer": { "email": "a@b.com" }
            })))
            .await
            .unwrap();

        assert!(result.simulated);
        assert_eq!(result.status, PaymentStatus::Approved);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_explicit_simulation_skips_gateway() {
        let gateway = MockGateway::new(Behavior::Respond(json!({ "id": 1, "status": "approved" })));
        let service = service(Some(gateway.clone()));

        let mut req = tokenized("MARIA CONT");
        req.simulation_requested = Some(true);
        let result = service.process_card_payment(req).await.unwrap();

        assert_eq!(result.status, PaymentStatus::Rejected);
        assert!(result.simulated);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_gateway_success_is_not_simulated() {
        let gateway = MockGateway::new(Behavior::Respond(json!({
            "id": 555,
            "status": "rejected",
            "status_detail": "cc_rejected_insufficient_amount"
        })));
        let service = service(Some(gateway.clone()));

        let result = service.process_card_payment(tokenized("JUAN APRO")).await.unwrap();

        assert!(!result.simulated);
        assert_eq!(result.id, "555");
        assert_eq!(result.status, PaymentStatus::Rejected);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_scenario_d_gateway_failure_falls_back_to_approved() {
        let gateway = MockGateway::new(Behavior::Fail);
        let service = service(Some(gateway.clone()));

        let result = service.process_card_payment(tokenized("JUAN CONT")).await.unwrap();

        assert_eq!(result.status, PaymentStatus::Approved);
        assert!(result.simulated);
        assert!(result.message.contains("network unreachable"));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_gateway_response_falls_back() {
        let gateway = MockGateway::new(Behavior::Respond(json!({ "status": "approved" })));
        let result = service(Some(gateway))
            .process_card_payment(tokenized("JUAN"))
            .await
            .unwrap();

        assert!(result.simulated);
        assert_eq!(result.status, PaymentStatus::Approved);
    }

    #[tokio::test]
    async fn test_gateway_timeout_falls_back() {
        let gateway = MockGateway::new(Behavior::Hang);
        let result = service(Some(gateway))
            .process_card_payment(tokenized("JUAN"))
            .await
            .unwrap();

        assert!(result.simulated);
        assert_eq!(result.status, PaymentStatus::Approved);
        assert!(result.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_gateway_panic_falls_back() {
        let gateway = MockGateway::new(Behavior::Panic);
        let result = service(Some(gateway))
            .process_card_payment(tokenized("JUAN"))
            .await
            .unwrap();

        assert!(result.simulated);
        assert_eq!(result.status, PaymentStatus::Approved);
    }

    #[tokio::test]
    async fn test_reject_policy_surfaces_gateway_failure() {
        let service = PaymentService::new(
            Some(MockGateway::new(Behavior::Fail)),
            &payments_config(FallbackPolicy::SurfaceRejected),
            Duration::from_millis(200),
        );

        let result = service.process_card_payment(tokenized("JUAN APRO")).await.unwrap();

        assert_eq!(result.status, PaymentStatus::Rejected);
        assert_eq!(result.status_detail, "gateway_error");
        assert!(result.simulated);
    }

    #[tokio::test]
    async fn test_alternative_payment_is_pending_with_ticket() {
        let gateway = MockGateway::new(Behavior::Respond(json!({ "id": 1, "status": "approved" })));
        let service = service(Some(gateway.clone()));

        let result = service
            .process_alternative_payment(request(json!({
                "transaction_amount": 300,
                "payment_method_id": "oxxo",
                "payer": { "email": "a@b.com" }
            })))
            .await
            .unwrap();

        assert_eq!(result.status, PaymentStatus::Pending);
        assert_eq!(result.status_detail, "pending_waiting_payment");
        assert!(result.ticket_url.unwrap().ends_with("/ticket"));
        assert!(result.simulated);
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_routing_rules() {
        let validator = PaymentValidator::new("x");
        let with_gateway = service(Some(MockGateway::new(Behavior::Fail)));
        let without_gateway = service(None);

        let payment = validator.validate(tokenized("A"), PaymentKind::Card).unwrap();
        assert_eq!(with_gateway.route(&payment), PaymentRoute::Gateway);
        assert_eq!(
            without_gateway.route(&payment),
            PaymentRoute::Simulated(SimulationReason::GatewayUnavailable)
        );
        assert!(with_gateway.gateway_configured());
        assert!(!without_gateway.gateway_configured());
    }
}

mod api;
mod application;
mod domain;
mod infrastructure;
mod ports;

use api::AppState;
use application::PaymentService;
use infrastructure::{AppConfig, MercadoPagoAdapter};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(false)
        .init();

    info!("Starting Payment Service...");

    // 读取配置
    let config = AppConfig::from_env()?;

    // 创建网关适配器（未配置访问令牌时为纯模拟模式）
    let gateway = MercadoPagoAdapter::from_config(&config.mercado_pago)?.map(Arc::new);
    if config.mercado_pago.is_configured() {
        info!("MercadoPago access token configured: {}", config.mercado_pago.base_url);
    } else {
        warn!("MercadoPago access token not configured - running in simulation-only mode");
    }

    // 创建支付服务
    let payment_service = Arc::new(PaymentService::new(
        gateway,
        &config.payments,
        config.mercado_pago.timeout,
    ));

    // 创建应用状态
    let app_state = AppState { payment_service };

    // 创建路由
    let app = api::create_router(app_state, &config.server.cors_origins);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);

    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /api/process-payment - Card payment");
    info!("  POST /api/process-alternative-payment - Voucher payment");
    info!("  POST /api/activate-subscription - Activate subscription");
    info!("  POST /webhook - Gateway notifications");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

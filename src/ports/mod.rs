pub mod payment_gateway_port;

pub use payment_gateway_port::PaymentGatewayPort;

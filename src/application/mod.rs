pub mod dto;
pub mod normalizer;
pub mod payment_service;

pub use dto::*;
pub use payment_service::PaymentService;

pub mod adapters;
pub mod config;

pub use adapters::MercadoPagoAdapter;
pub use config::AppConfig;

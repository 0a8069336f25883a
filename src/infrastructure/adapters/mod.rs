pub mod mercado_pago_adapter;

pub use mercado_pago_adapter::MercadoPagoAdapter;

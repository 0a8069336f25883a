pub mod entities;
pub mod errors;
pub mod events;
pub mod simulation;
pub mod validation;
pub mod value_objects;

pub use entities::{Payer, PaymentRequest, PaymentResult, ValidatedPayment};
pub use events::*;
pub use simulation::{PaymentSimulator, SimulatedPayment};
pub use validation::PaymentValidator;
pub use value_objects::{
    FallbackPolicy, Identification, Money, PaymentKind, PaymentRoute, PaymentStatus,
    SimulationReason,
};

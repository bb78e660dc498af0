// Domain layer - Immutable value types shared by every other layer
pub mod drug;
pub mod error;
pub mod price;

//! Foundry Domain Concerns

pub mod checkout;
pub mod downloads;
pub mod orders;

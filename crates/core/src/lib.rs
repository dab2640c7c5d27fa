//! Foundry
//!
//! Domain core for the type foundry marketplace: cart aggregation, order records
//! and the capability tokens that gate purchased font downloads.

pub mod cart;
pub mod orders;
pub mod prelude;
pub mod pricing;

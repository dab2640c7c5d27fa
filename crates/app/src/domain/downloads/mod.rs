//! Downloads

pub mod service;

pub use service::*;

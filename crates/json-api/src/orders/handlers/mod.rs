//! Order Handlers

pub(crate) mod index;
pub(crate) mod update_status;

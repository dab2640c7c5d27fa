//! Download Handlers

pub(crate) mod get;

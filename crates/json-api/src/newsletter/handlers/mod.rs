//! Newsletter Handlers

pub(crate) mod subscribe;
pub(crate) mod tag;

//! Payment provider webhooks

pub(crate) mod stripe;

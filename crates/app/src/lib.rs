//! Shared application domain, persistence and collaborator modules.

pub mod context;
pub mod database;
pub mod domain;
pub mod integrations;

#[cfg(test)]
mod test;

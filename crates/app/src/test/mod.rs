//! Test support.


pub(crate) use context::TestContext;
pub(crate) use db::TestDb;

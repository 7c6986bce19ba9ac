pub mod query;
pub mod serve;
pub mod setup;

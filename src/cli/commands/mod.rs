//! CLI command implementations

pub mod cache;
pub mod config;
pub mod plan;
pub mod resolve;

pub use cache::execute as cache;
pub use config::execute as config;
pub use plan::execute as plan;
pub use resolve::execute as resolve;

pub mod analysis;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod report;
pub mod store;
pub mod util;

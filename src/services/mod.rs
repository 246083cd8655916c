pub mod analytics;
pub mod export;
pub mod store;

// Domain layer - Data model shared by every other layer
pub mod dashboard;
pub mod endpoint;
pub mod error;
pub mod identity;
pub mod log_entry;
pub mod metrics;
pub mod resource;
pub mod user;

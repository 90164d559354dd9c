// Application layer - Use cases and the seams to external collaborators
pub mod dashboard_service;
pub mod endpoint_registry;
pub mod history;
pub mod identity_provider;
pub mod poller;
pub mod snapshot_store;
pub mod system_source;
pub mod task;
pub mod user_registry;

#[cfg(test)]
pub(crate) mod testing;

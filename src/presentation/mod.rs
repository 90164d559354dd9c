// Presentation layer - HTTP surface over the application services
pub mod app_state;
pub mod auth;
pub mod handlers;
pub mod routes;
pub mod views;

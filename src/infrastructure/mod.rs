// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod http_source;
pub mod mock_identity;
pub mod mock_source;
pub mod snapshot_stream;

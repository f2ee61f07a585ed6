// Infrastructure layer - External dependencies and adapters
pub mod chunked_frames;
pub mod config;
pub mod file_session_store;
pub mod http_api_repository;
pub mod http_response;

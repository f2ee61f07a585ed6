// Application layer - Editing engine, use cases and repository ports
pub mod dashboard_repository;
pub mod dashboard_service;
pub mod data_source_repository;
pub mod history;
pub mod layout;
pub mod mutation;
pub mod session;
pub mod session_store;
pub mod streaming_service;
pub mod widget_catalog;
pub mod widget_data_service;

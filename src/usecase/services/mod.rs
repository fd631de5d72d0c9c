pub mod export_service;
pub mod highlight;
pub mod import_service;
pub mod record_store;
pub mod session;
pub mod view_pipeline;

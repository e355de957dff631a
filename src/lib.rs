//! Multipart File Uploads Demo Service Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upload;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

//! Types shared by the HTTP service and its clients

pub mod types;

pub use types::{ApiResponse, HealthResponse, ServiceInfo};

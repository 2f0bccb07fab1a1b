//! HTTP API handlers for mvista-api

pub mod albums;
pub mod artists;
pub mod health;
pub mod insights;
pub mod params;
pub mod response;
pub mod tracks;

pub use albums::album_routes;
pub use artists::artist_routes;
pub use health::health_routes;
pub use insights::insight_routes;
pub use params::QueryParams;
pub use response::{ApiError, ApiResult};
pub use tracks::track_routes;

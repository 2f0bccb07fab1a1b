//! # MusicVista client
//!
//! Typed wrappers over the MusicVista HTTP API and the pieces of the `mvista`
//! browsing CLI (pagination and terminal rendering).

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod pagination;
pub mod render;

pub use client::{ApiClient, QueryPairs};
pub use config::{build_api_url, ApiConfig};
pub use endpoints::{AlbumQuery, ArtistQuery, TrackQuery};
pub use error::ClientError;
pub use pagination::{calculate_pagination, Pagination, DEFAULT_PAGE_SIZE};

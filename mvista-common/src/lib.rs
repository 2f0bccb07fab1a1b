//! # MusicVista Common Library
//!
//! Shared code for the MusicVista service and its clients:
//! - Configuration loading
//! - Database initialization and schema
//! - Catalog models (artists, albums, tracks, insights)
//! - Emotion bucket grid
//! - Parameterized SQL builder
//! - Response envelope types

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod emotion;
pub mod error;
pub mod models;
pub mod sql;
pub mod time;

pub use emotion::{Emotion, EmotionFilter};
pub use error::{Error, Result};

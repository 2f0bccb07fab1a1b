//! Catalog query services
//!
//! Each `build_*` function is pure: it turns a request into a
//! [`BuiltQuery`](mvista_common::sql::BuiltQuery) without touching the
//! database, so SQL text and parameter order can be checked in isolation.
//! The async `get_*` functions run the query against the pool and map rows
//! into models.

pub mod albums;
pub mod artists;
pub mod insights;
pub mod tracks;

mod shared;

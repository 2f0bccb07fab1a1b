//! Typed views over each API route group

mod albums;
mod artists;
mod insights;
mod tracks;

pub use albums::{AlbumQuery, AlbumsApi};
pub use artists::{ArtistQuery, ArtistsApi};
pub use insights::InsightsApi;
pub use tracks::{TrackQuery, TracksApi};

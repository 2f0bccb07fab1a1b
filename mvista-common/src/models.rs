//! Catalog models

use serde::{Deserialize, Serialize};

/// (id, name) pair of an artist credited on an album or track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: Option<String>,
    pub popularity: Option<i64>,
    pub followers: Option<i64>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Image URLs
    #[serde(default)]
    pub urls: Vec<String>,
    /// Tracks shared with the artist a collaborator list was requested for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collab_num: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub release_date_precision: Option<String>,
    pub popularity: Option<i64>,
    pub num_tracks: Option<i64>,
    #[serde(rename = "type")]
    pub album_type: Option<String>,
    pub label: Option<String>,
    #[serde(default)]
    pub artist_ids: Vec<String>,
    #[serde(default)]
    pub artist_names: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: Option<String>,
    pub album_id: Option<String>,
    pub album_name: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub artist_ids: Vec<String>,
    #[serde(default)]
    pub artist_names: Vec<String>,
    pub disc_num: Option<i64>,
    pub track_num: Option<i64>,
    pub duration_ms: Option<i64>,
    pub explicit: Option<bool>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub key: Option<i64>,
    pub loudness: Option<f64>,
    pub mode: Option<i64>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub time_signature: Option<i64>,
}

/// A track ranked by closeness to another track in the energy/valence plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTrack {
    pub id: String,
    pub name: Option<String>,
    pub album_id: Option<String>,
    pub album_name: Option<String>,
    pub duration_ms: Option<i64>,
    pub explicit: Option<bool>,
    #[serde(default)]
    pub artist_ids: Vec<String>,
    #[serde(default)]
    pub artist_names: Vec<String>,
    /// `-(Δenergy² + Δvalence²) / 2`; 0 is identical, more negative is further
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreDistribution {
    pub genre: String,
    pub artist_num: i64,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionDistribution {
    pub emotion: String,
    pub track_num: i64,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDistribution {
    #[serde(rename = "type")]
    pub album_type: String,
    pub count: i64,
    pub ratio: Option<f64>,
}

/// Occurrences of "love" in lyrics per emotion bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoveDistribution {
    pub emotion: String,
    pub cnt: i64,
    pub ratio: Option<f64>,
}

/// Popularity jump between two consecutive albums of one artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistGrowth {
    pub artist_id: String,
    pub artist: Option<String>,
    pub prev_album_id: String,
    pub prev_album: Option<String>,
    pub prev_release_date: Option<String>,
    pub prev_popularity: i64,
    pub curr_album_id: String,
    pub curr_album: Option<String>,
    pub curr_release_date: Option<String>,
    pub curr_popularity: i64,
    /// Percentage growth, rounded to two decimals
    pub popularity_growth_ratio: f64,
}

/// Spread of an artist's tracks over the energy/valence plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistEmotionVariety {
    pub id: String,
    pub name: Option<String>,
    /// Variance of energy plus variance of valence
    pub variety: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub cnt: i64,
}

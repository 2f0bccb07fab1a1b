//! Terminal rendering of catalog pages

use mvista_common::emotion::Emotion;
use mvista_common::models::{
    Album, Artist, ArtistEmotionVariety, ArtistGrowth, EmotionDistribution, GenreDistribution,
    LoveDistribution, SimilarTrack, Track, TypeDistribution, WordCount,
};

use crate::pagination::Pagination;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const BAR_WIDTH: usize = 30;

/// `m:ss` from milliseconds, `-` when unknown
pub fn format_duration(ms: Option<i64>) -> String {
    match ms {
        Some(ms) if ms >= 0 => {
            let secs = ms / 1000;
            format!("{}:{:02}", secs / 60, secs % 60)
        }
        _ => "-".to_string(),
    }
}

/// Horizontal bar for a ratio in [0, 1]
pub fn ratio_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Cut `s` to `width` characters, marking the cut with `…`
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn name_or_dash(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("-")
}

fn opt_num(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn header(title: &str) -> String {
    format!("\n{}\n{}\n", title, RULE)
}

/// CLI formatter for catalog data
pub struct CliFormatter;

impl CliFormatter {
    pub fn artists_table(artists: &[Artist]) -> String {
        if artists.is_empty() {
            return "No artists found\n".to_string();
        }
        let mut output = format!(
            "{:<24} {:<28} {:>4} {:>11}  {}\n",
            "ID", "Name", "Pop", "Followers", "Genres"
        );
        for artist in artists {
            output.push_str(&format!(
                "{:<24} {:<28} {:>4} {:>11}  {}\n",
                truncate(&artist.id, 24),
                truncate(name_or_dash(&artist.name), 28),
                opt_num(artist.popularity),
                opt_num(artist.followers),
                artist.genres.join(", ")
            ));
        }
        output
    }

    pub fn albums_table(albums: &[Album]) -> String {
        if albums.is_empty() {
            return "No albums found\n".to_string();
        }
        let mut output = format!(
            "{:<24} {:<28} {:<12} {:<11} {:>4}  {}\n",
            "ID", "Name", "Released", "Type", "Pop", "Artists"
        );
        for album in albums {
            output.push_str(&format!(
                "{:<24} {:<28} {:<12} {:<11} {:>4}  {}\n",
                truncate(&album.id, 24),
                truncate(name_or_dash(&album.name), 28),
                album.release_date.as_deref().unwrap_or("-"),
                album.album_type.as_deref().unwrap_or("-"),
                opt_num(album.popularity),
                album.artist_names.join(", ")
            ));
        }
        output
    }

    pub fn tracks_table(tracks: &[Track]) -> String {
        if tracks.is_empty() {
            return "No tracks found\n".to_string();
        }
        let mut output = format!(
            "{:<24} {:<28} {:>6} {:<10} {:<24}  {}\n",
            "ID", "Name", "Length", "Emotion", "Album", "Artists"
        );
        for track in tracks {
            let explicit = if track.explicit == Some(true) { " [E]" } else { "" };
            let name = format!("{}{}", name_or_dash(&track.name), explicit);
            output.push_str(&format!(
                "{:<24} {:<28} {:>6} {:<10} {:<24}  {}\n",
                truncate(&track.id, 24),
                truncate(&name, 28),
                format_duration(track.duration_ms),
                Emotion::classify(track.energy, track.valence),
                truncate(name_or_dash(&track.album_name), 24),
                track.artist_names.join(", ")
            ));
        }
        output
    }

    /// `Showing 13-24 of 30 (page 2/3)`
    pub fn page_footer(pagination: &Pagination, total: i64) -> String {
        match pagination.display_range(total) {
            Some((start, end)) => format!(
                "Showing {}-{} of {} (page {}/{})\n",
                start, end, total, pagination.page, pagination.total_pages
            ),
            None => "Showing 0 of 0\n".to_string(),
        }
    }

    pub fn artist_detail(artist: &Artist) -> String {
        let mut output = header(name_or_dash(&artist.name));
        output.push_str(&format!("ID: {}\n", artist.id));
        output.push_str(&format!("Popularity: {}\n", opt_num(artist.popularity)));
        output.push_str(&format!("Followers: {}\n", opt_num(artist.followers)));
        if !artist.genres.is_empty() {
            output.push_str(&format!("Genres: {}\n", artist.genres.join(", ")));
        }
        if let Some(url) = artist.urls.first() {
            output.push_str(&format!("Image: {}\n", url));
        }
        output
    }

    pub fn collaborators(artists: &[Artist]) -> String {
        let mut output = header("Collaborators");
        if artists.is_empty() {
            output.push_str("None\n");
        }
        for artist in artists {
            output.push_str(&format!(
                "  {} ({} shared tracks)\n",
                name_or_dash(&artist.name),
                artist.collab_num.unwrap_or(0)
            ));
        }
        output
    }

    pub fn album_detail(album: &Album, tracks: &[Track]) -> String {
        let mut output = header(name_or_dash(&album.name));
        output.push_str(&format!("ID: {}\n", album.id));
        output.push_str(&format!("Artists: {}\n", album.artist_names.join(", ")));
        output.push_str(&format!(
            "Released: {}\n",
            album.release_date.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!("Type: {}\n", album.album_type.as_deref().unwrap_or("-")));
        if let Some(label) = &album.label {
            output.push_str(&format!("Label: {}\n", label));
        }
        output.push_str(&format!("Popularity: {}\n", opt_num(album.popularity)));
        output.push_str(&format!("\nTracks ({}):\n", tracks.len()));
        for track in tracks {
            output.push_str(&format!(
                "  {:>2}.{:<2} {:<36} {:>6}\n",
                opt_num(track.disc_num),
                opt_num(track.track_num),
                truncate(name_or_dash(&track.name), 36),
                format_duration(track.duration_ms)
            ));
        }
        output
    }

    pub fn track_detail(track: &Track, lyrics: Option<&str>, similar: &[SimilarTrack]) -> String {
        let mut output = header(name_or_dash(&track.name));
        output.push_str(&format!("ID: {}\n", track.id));
        output.push_str(&format!("Artists: {}\n", track.artist_names.join(", ")));
        output.push_str(&format!("Album: {}\n", name_or_dash(&track.album_name)));
        output.push_str(&format!("Length: {}\n", format_duration(track.duration_ms)));
        output.push_str(&format!(
            "Emotion: {}\n",
            Emotion::classify(track.energy, track.valence)
        ));
        for (label, value) in [
            ("Energy", track.energy),
            ("Valence", track.valence),
            ("Danceability", track.danceability),
            ("Acousticness", track.acousticness),
        ] {
            if let Some(value) = value {
                output.push_str(&format!(
                    "  {:<13} {} {:.3}\n",
                    label,
                    ratio_bar(value, BAR_WIDTH),
                    value
                ));
            }
        }

        output.push_str("\nLyrics:\n");
        match lyrics {
            Some(text) if !text.trim().is_empty() => {
                for line in text.lines() {
                    output.push_str(&format!("  {}\n", line));
                }
            }
            _ => output.push_str("  (no lyrics)\n"),
        }

        output.push_str("\nSimilar tracks:\n");
        if similar.is_empty() {
            output.push_str("  None\n");
        }
        for s in similar {
            output.push_str(&format!(
                "  {:<32} {:<24} {:.4}\n",
                truncate(name_or_dash(&s.name), 32),
                truncate(&s.artist_names.join(", "), 24),
                s.similarity
            ));
        }
        output
    }

    pub fn genre_distribution(rows: &[GenreDistribution]) -> String {
        let mut output = header("Genres");
        for row in rows {
            output.push_str(&format!(
                "  {:<20} {} {:>4} ({:.1}%)\n",
                truncate(&row.genre, 20),
                ratio_bar(row.ratio, BAR_WIDTH),
                row.artist_num,
                row.ratio * 100.0
            ));
        }
        output
    }

    pub fn emotion_distribution(rows: &[EmotionDistribution]) -> String {
        let mut output = header("Emotions");
        for row in rows {
            output.push_str(&format!(
                "  {:<10} {} {:>4} ({:.1}%)\n",
                row.emotion,
                ratio_bar(row.ratio, BAR_WIDTH),
                row.track_num,
                row.ratio * 100.0
            ));
        }
        output
    }

    pub fn type_distribution(rows: &[TypeDistribution]) -> String {
        let mut output = header("Album types");
        for row in rows {
            let ratio = row.ratio.unwrap_or(0.0);
            output.push_str(&format!(
                "  {:<12} {} {:>4} ({:.1}%)\n",
                row.album_type,
                ratio_bar(ratio, BAR_WIDTH),
                row.count,
                ratio * 100.0
            ));
        }
        output
    }

    pub fn love_distribution(rows: &[LoveDistribution]) -> String {
        let mut output = header("\"Love\" in lyrics by emotion");
        for row in rows {
            let ratio = row.ratio.unwrap_or(0.0);
            output.push_str(&format!(
                "  {:<10} {} {:>4}\n",
                row.emotion,
                ratio_bar(ratio, BAR_WIDTH),
                row.cnt
            ));
        }
        output
    }

    pub fn pop_words(words: &[WordCount]) -> String {
        let mut output = header("Cheerful city pop words");
        let max = words.iter().map(|w| w.cnt).max().unwrap_or(0);
        for w in words {
            let ratio = if max > 0 { w.cnt as f64 / max as f64 } else { 0.0 };
            output.push_str(&format!(
                "  {:<16} {} {:>4}\n",
                truncate(&w.word, 16),
                ratio_bar(ratio, BAR_WIDTH),
                w.cnt
            ));
        }
        output
    }

    pub fn popularity_growth(rows: &[ArtistGrowth]) -> String {
        let mut output = header("Biggest album-to-album popularity jumps");
        for row in rows {
            output.push_str(&format!(
                "  {}: {} ({}) {} → {} ({}) {}  +{:.2}%\n",
                name_or_dash(&row.artist),
                name_or_dash(&row.prev_album),
                row.prev_release_date.as_deref().unwrap_or("-"),
                row.prev_popularity,
                name_or_dash(&row.curr_album),
                row.curr_release_date.as_deref().unwrap_or("-"),
                row.curr_popularity,
                row.popularity_growth_ratio
            ));
        }
        output
    }

    pub fn emotion_variety(rows: &[ArtistEmotionVariety]) -> String {
        let mut output = header("Most emotionally varied artists");
        for (i, row) in rows.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<28} {:.4}\n",
                i + 1,
                truncate(name_or_dash(&row.name), 28),
                row.variety
            ));
        }
        output
    }
}

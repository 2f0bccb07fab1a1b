//! Emotion buckets over the energy/valence plane
//!
//! Both audio features live in [0, 1]. Each axis is cut into three bands at
//! 0.333 and 0.666 and every cell of the resulting 3×3 grid carries a name.
//!
//! ```text
//!               valence:  low       mid        high
//! energy high             Frantic   Tense      Euphoric
//! energy mid              Upset     Calm       Cheerful
//! energy low              Bleak     Apathetic  Serene
//! ```
//!
//! Tracks without both features, or with a feature outside [0, 1], are `Other`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sql::SqlBuilder;
use crate::Error;

/// Lower cut between the low and mid bands
pub const LOW_MID_CUT: f64 = 0.333;
/// Lower cut between the mid and high bands
pub const MID_HIGH_CUT: f64 = 0.666;

/// One third of an audio-feature axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    /// Band containing `x`; `None` outside [0, 1]
    pub fn of(x: f64) -> Option<Band> {
        if !(0.0..=1.0).contains(&x) {
            None
        } else if x < LOW_MID_CUT {
            Some(Band::Low)
        } else if x < MID_HIGH_CUT {
            Some(Band::Mid)
        } else {
            Some(Band::High)
        }
    }

    /// Inclusive lower bound and upper bound of the band.
    ///
    /// The upper bound is exclusive except for `High`, which includes 1.0.
    pub fn range(self) -> (f64, f64) {
        match self {
            Band::Low => (0.0, LOW_MID_CUT),
            Band::Mid => (LOW_MID_CUT, MID_HIGH_CUT),
            Band::High => (MID_HIGH_CUT, 1.0),
        }
    }

    fn upper_op(self) -> &'static str {
        match self {
            Band::High => "<=",
            Band::Low | Band::Mid => "<",
        }
    }

    /// Literal SQL predicate for the band (no parameters)
    fn sql_literal(self, column: &str) -> String {
        let (lo, hi) = self.range();
        format!("{column} >= {lo} AND {column} {} {hi}", self.upper_op())
    }

    /// Parameterized SQL predicate for the band
    pub fn push_predicate(self, builder: &mut SqlBuilder, column: &str) -> String {
        let (lo, hi) = self.range();
        let lo = builder.bind(lo);
        let hi = builder.bind(hi);
        format!("{column} >= {lo} AND {column} {} {hi}", self.upper_op())
    }
}

/// Named region of the energy/valence grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Frantic,
    Tense,
    Euphoric,
    Upset,
    Calm,
    Cheerful,
    Bleak,
    Apathetic,
    Serene,
    Other,
}

impl Emotion {
    /// The nine grid cells, high energy first
    pub const GRID: [Emotion; 9] = [
        Emotion::Frantic,
        Emotion::Tense,
        Emotion::Euphoric,
        Emotion::Upset,
        Emotion::Calm,
        Emotion::Cheerful,
        Emotion::Bleak,
        Emotion::Apathetic,
        Emotion::Serene,
    ];

    /// Emotion of a track from its audio features
    pub fn classify(energy: Option<f64>, valence: Option<f64>) -> Emotion {
        match (energy.and_then(Band::of), valence.and_then(Band::of)) {
            (Some(e), Some(v)) => Emotion::from_bands(e, v),
            _ => Emotion::Other,
        }
    }

    fn from_bands(energy: Band, valence: Band) -> Emotion {
        match (energy, valence) {
            (Band::High, Band::Low) => Emotion::Frantic,
            (Band::High, Band::Mid) => Emotion::Tense,
            (Band::High, Band::High) => Emotion::Euphoric,
            (Band::Mid, Band::Low) => Emotion::Upset,
            (Band::Mid, Band::Mid) => Emotion::Calm,
            (Band::Mid, Band::High) => Emotion::Cheerful,
            (Band::Low, Band::Low) => Emotion::Bleak,
            (Band::Low, Band::Mid) => Emotion::Apathetic,
            (Band::Low, Band::High) => Emotion::Serene,
        }
    }

    /// Energy and valence bands of the cell, `None` for `Other`
    pub fn bands(self) -> Option<(Band, Band)> {
        let cell = match self {
            Emotion::Frantic => (Band::High, Band::Low),
            Emotion::Tense => (Band::High, Band::Mid),
            Emotion::Euphoric => (Band::High, Band::High),
            Emotion::Upset => (Band::Mid, Band::Low),
            Emotion::Calm => (Band::Mid, Band::Mid),
            Emotion::Cheerful => (Band::Mid, Band::High),
            Emotion::Bleak => (Band::Low, Band::Low),
            Emotion::Apathetic => (Band::Low, Band::Mid),
            Emotion::Serene => (Band::Low, Band::High),
            Emotion::Other => return None,
        };
        Some(cell)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Frantic => "Frantic",
            Emotion::Tense => "Tense",
            Emotion::Euphoric => "Euphoric",
            Emotion::Upset => "Upset",
            Emotion::Calm => "Calm",
            Emotion::Cheerful => "Cheerful",
            Emotion::Bleak => "Bleak",
            Emotion::Apathetic => "Apathetic",
            Emotion::Serene => "Serene",
            Emotion::Other => "Other",
        }
    }

    /// Parameterized predicate selecting tracks of this emotion
    pub fn push_predicate(
        self,
        builder: &mut SqlBuilder,
        energy_col: &str,
        valence_col: &str,
    ) -> String {
        match self.bands() {
            Some((e, v)) => format!(
                "{} AND {}",
                e.push_predicate(builder, energy_col),
                v.push_predicate(builder, valence_col)
            ),
            None => out_of_grid_sql(energy_col, valence_col),
        }
    }

    /// Static `CASE` expression labelling rows with their emotion
    pub fn sql_case(energy_col: &str, valence_col: &str) -> String {
        let mut sql = format!(
            "CASE WHEN {} THEN 'Other'",
            out_of_grid_sql(energy_col, valence_col)
        );
        for emotion in Emotion::GRID {
            if let Some((e, v)) = emotion.bands() {
                sql.push_str(&format!(
                    " WHEN {} AND {} THEN '{}'",
                    e.sql_literal(energy_col),
                    v.sql_literal(valence_col),
                    emotion.as_str()
                ));
            }
        }
        sql.push_str(" ELSE 'Other' END");
        sql
    }
}

fn out_of_grid_sql(energy_col: &str, valence_col: &str) -> String {
    format!(
        "({e} IS NULL OR {v} IS NULL OR {e} < 0 OR {e} > 1 OR {v} < 0 OR {v} > 1)",
        e = energy_col,
        v = valence_col
    )
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let emotion = match s.to_ascii_lowercase().as_str() {
            "frantic" => Emotion::Frantic,
            "tense" => Emotion::Tense,
            // Older clients send the misspelled label
            "euphoric" | "euphotic" => Emotion::Euphoric,
            "upset" => Emotion::Upset,
            "calm" => Emotion::Calm,
            "cheerful" => Emotion::Cheerful,
            "bleak" => Emotion::Bleak,
            "apathetic" => Emotion::Apathetic,
            "serene" => Emotion::Serene,
            "other" => Emotion::Other,
            _ => return Err(Error::InvalidInput(format!("unknown emotion: {}", s))),
        };
        Ok(emotion)
    }
}

/// Emotion filter of a track search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmotionFilter {
    #[default]
    All,
    Only(Emotion),
}

impl FromStr for EmotionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(EmotionFilter::All)
        } else {
            s.parse().map(EmotionFilter::Only)
        }
    }
}

impl fmt::Display for EmotionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionFilter::All => f.write_str("All"),
            EmotionFilter::Only(e) => e.fmt(f),
        }
    }
}

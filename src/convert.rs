//! Turning an opponent chart and a player chart into one FNF song chart.
//!
//! The pipeline for one output tier is:
//!
//! 1. time every note of both sides on its own timeline and resolve holds ([`ChartBundle::timed_notes`]),
//! 2. merge both sides into one lane space ([`merge::merge_sides`]),
//! 3. cut the stream into four-beat sections with reconstructed BPMs ([`bucket::bucket_sections`]).
//!
//! [`ConversionRequest`] runs it for every [`OutputTier`] against a [`ChartCatalog`].

pub mod bucket;
pub mod merge;

use num::ToPrimitive;
use thiserror::Error;

use crate::{
    chart::{ChartBundle, ChartCatalog},
    fnf::{FnfChart, FnfSong, display_song_name},
    simfile::{Difficulty, select::ChartLookupError},
    timing::TimingError,
};

/// An error occurred when converting charts.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// A timing field could not be read.
    #[error("malformed timing data: {0}")]
    MalformedTimingData(#[from] TimingError),
    /// The requested chart was missing or not unique.
    #[error(transparent)]
    Lookup(#[from] ChartLookupError),
    /// A section with notes collapsed to (almost) no time, which fixed-length sections cannot express.
    #[error("section {measure} has {notes} notes but spans {span_seconds:.3} seconds")]
    DegenerateMeasure {
        /// Index of the section, pickup not counted.
        measure: usize,
        /// Notes in the section.
        notes: usize,
        /// Seconds the section spans.
        span_seconds: f64,
    },
    /// A tier was assigned a difficulty the catalog has no chart for.
    #[error("no {0} chart loaded")]
    MissingSlot(Difficulty),
}

/// Knobs of a conversion, passed through to timing and to the output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertConfig {
    /// Seconds added to every note time, usually within -1..1.
    pub manual_offset: f64,
    /// Scroll speed of the output, usually within 0.2..4.
    pub speed: f64,
    /// Player character.
    pub player1: String,
    /// Opponent character.
    pub player2: String,
    /// How far opponent lanes are moved past the player's.
    pub opponent_lane_shift: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            manual_offset: 0.0,
            speed: 2.0,
            player1: "bf".to_owned(),
            player2: "dad".to_owned(),
            opponent_lane_shift: 4,
        }
    }
}

impl ConvertConfig {
    /// Typical range of [`ConvertConfig::manual_offset`].
    pub const MANUAL_OFFSET_RANGE: std::ops::RangeInclusive<f64> = -1.0..=1.0;
    /// Typical range of [`ConvertConfig::speed`].
    pub const SPEED_RANGE: std::ops::RangeInclusive<f64> = 0.2..=4.0;

    /// Sets the manual offset in seconds.
    #[must_use]
    pub const fn with_manual_offset(mut self, manual_offset: f64) -> Self {
        self.manual_offset = manual_offset;
        self
    }

    /// Sets the scroll speed.
    #[must_use]
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Sets both characters.
    #[must_use]
    pub fn with_players(mut self, player1: impl Into<String>, player2: impl Into<String>) -> Self {
        self.player1 = player1.into();
        self.player2 = player2.into();
        self
    }

    /// Sets the opponent lane shift.
    #[must_use]
    pub const fn with_opponent_lane_shift(mut self, shift: usize) -> Self {
        self.opponent_lane_shift = shift;
        self
    }

    fn warn_unusual_values(&self) {
        if !Self::MANUAL_OFFSET_RANGE.contains(&self.manual_offset) {
            log::warn!(
                "manual offset {}s is outside the usual {:?}",
                self.manual_offset,
                Self::MANUAL_OFFSET_RANGE
            );
        }
        if !Self::SPEED_RANGE.contains(&self.speed) {
            log::warn!(
                "speed {} is outside the usual {:?}",
                self.speed,
                Self::SPEED_RANGE
            );
        }
    }
}

/// The difficulty files written for a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputTier {
    /// `<song>-easy.json`
    Easy,
    /// `<song>.json`
    Normal,
    /// `<song>-hard.json`
    Hard,
}

impl OutputTier {
    /// Every tier, in the order they are written.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Suffix appended to the song folder name.
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Easy => "-easy",
            Self::Normal => "",
            Self::Hard => "-hard",
        }
    }

    /// File name of this tier's chart for the song folder `song`.
    #[must_use]
    pub fn chart_file_name(self, song: &str) -> String {
        format!("{song}{}.json", self.file_suffix())
    }
}

impl std::fmt::Display for OutputTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
        })
    }
}

/// Which source charts play each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SidePair {
    /// Chart of the opponent side.
    pub opponent: Difficulty,
    /// Chart of the player side.
    pub player: Difficulty,
}

/// The [`SidePair`] of every output tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierAssignments {
    /// Pair for [`OutputTier::Easy`].
    pub easy: SidePair,
    /// Pair for [`OutputTier::Normal`].
    pub normal: SidePair,
    /// Pair for [`OutputTier::Hard`].
    pub hard: SidePair,
}

impl TierAssignments {
    /// The same pair for every tier.
    #[must_use]
    pub const fn uniform(pair: SidePair) -> Self {
        Self {
            easy: pair,
            normal: pair,
            hard: pair,
        }
    }

    /// The usual assignment for slots `available` in probe order, hardest first.
    ///
    /// The opponent always plays the first slot. The player plays the third slot on easy, the second
    /// on normal and the first on hard, clamped to the slots there are. Returns `None` if nothing is
    /// available.
    #[must_use]
    pub fn defaults(available: &[Difficulty]) -> Option<Self> {
        let &opponent = available.first()?;
        let last = available.len() - 1;
        let pair = |tier_index: usize| {
            let player_index = (OutputTier::ALL.len() - tier_index - 1).min(last);
            available
                .get(player_index)
                .map(|&player| SidePair { opponent, player })
        };
        Some(Self {
            easy: pair(0)?,
            normal: pair(1)?,
            hard: pair(2)?,
        })
    }

    /// The pair of `tier`.
    #[must_use]
    pub const fn get(self, tier: OutputTier) -> SidePair {
        match tier {
            OutputTier::Easy => self.easy,
            OutputTier::Normal => self.normal,
            OutputTier::Hard => self.hard,
        }
    }

    /// Replaces the pair of `tier`.
    #[must_use]
    pub const fn with(mut self, tier: OutputTier, pair: SidePair) -> Self {
        match tier {
            OutputTier::Easy => self.easy = pair,
            OutputTier::Normal => self.normal = pair,
            OutputTier::Hard => self.hard = pair,
        }
        self
    }
}

/// Everything needed to write the charts of one song.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionRequest {
    /// Song folder name in the game, such as `dad-battle`.
    pub song: String,
    /// Source charts of each tier.
    pub assignments: TierAssignments,
    /// Conversion knobs.
    pub config: ConvertConfig,
}

impl ConversionRequest {
    /// Bundles a request.
    #[must_use]
    pub fn new(
        song: impl Into<String>,
        assignments: TierAssignments,
        config: ConvertConfig,
    ) -> Self {
        Self {
            song: song.into(),
            assignments,
            config,
        }
    }

    /// The song name written into the charts, see [`display_song_name`].
    #[must_use]
    pub fn display_name(&self) -> String {
        display_song_name(&self.song)
    }

    /// Converts every tier in the order of [`OutputTier::ALL`].
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingSlot`] if an assigned difficulty is not in `catalog`, or the
    /// first error of [`convert_pair`].
    pub fn run(&self, catalog: &ChartCatalog) -> Result<Vec<(OutputTier, FnfChart)>, ConvertError> {
        let song_name = self.display_name();
        OutputTier::ALL
            .into_iter()
            .map(|tier| {
                let SidePair { opponent, player } = self.assignments.get(tier);
                let lookup = |slot| catalog.get(slot).ok_or(ConvertError::MissingSlot(slot));
                log::debug!("{tier}: {opponent} against {player}");
                let chart =
                    convert_pair(lookup(opponent)?, lookup(player)?, &song_name, &self.config)?;
                Ok((tier, chart))
            })
            .collect()
    }
}

/// Converts one opponent/player pairing into a song chart named `song_name`.
///
/// Both bundles are only read. Sections are timed by the player's timeline, and the displayed BPM is
/// the player's first tempo, truncated.
///
/// # Errors
///
/// Returns [`ConvertError::DegenerateMeasure`] if a section cannot be expressed, see
/// [`bucket::bucket_sections`].
pub fn convert_pair(
    opponent: &ChartBundle,
    player: &ChartBundle,
    song_name: &str,
    config: &ConvertConfig,
) -> Result<FnfChart, ConvertError> {
    config.warn_unusual_values();

    let max_beat = opponent
        .max_beat()
        .into_iter()
        .chain(player.max_beat())
        .max_by(f64::total_cmp)
        .unwrap_or(0.0);
    let opponent_notes = opponent.timed_notes(config.manual_offset);
    let player_notes = player.timed_notes(config.manual_offset);
    let merged = merge::merge_sides(&opponent_notes, &player_notes, config.opponent_lane_shift);
    let sections =
        bucket::bucket_sections(&merged, max_beat, player.timing(), config.manual_offset)?;

    let initial_bpm = player.timing().initial_bpm();
    let bpm = initial_bpm.trunc().to_i64().unwrap_or_else(|| {
        log::warn!("initial BPM {initial_bpm} does not fit the output, shown as 0");
        0
    });
    let section_count = sections.len();

    Ok(FnfChart {
        song: FnfSong {
            song: song_name.to_owned(),
            notes: sections,
            bpm,
            sections: 0,
            needs_voices: false,
            player1: config.player1.clone(),
            player2: config.player2.clone(),
            section_lengths: Vec::new(),
            speed: config.speed,
            valid_score: true,
        },
        bpm,
        sections: section_count,
    })
}

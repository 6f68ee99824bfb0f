//! The simfile as handed over by the container reader.
//!
//! Reading `.sm`/`.ssc` text into tagged fields happens outside this crate. What arrives here is a
//! [`Simfile`]: the song-level header, and every chart with its raw `#NOTES` text and whatever
//! chart-level timing tags it carried.
//!
//! The two container kinds differ only in timing ownership: an `.ssc` chart that defines any timing
//! tag brings its own complete timing, while `.sm` charts always use the song timing.

pub mod select;

use crate::timing::{DEFAULT_SCROLLS, DEFAULT_SPEEDS, TimingFields};

/// Which container the simfile was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimfileKind {
    /// `.sm`, song-level timing only.
    #[default]
    Sm,
    /// `.ssc`, charts may carry their own timing.
    Ssc,
}

/// The difficulty slot a chart occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    /// `Beginner`
    Beginner,
    /// `Easy`
    Easy,
    /// `Medium`
    Medium,
    /// `Hard`
    Hard,
    /// `Challenge`
    Challenge,
    /// `Edit`
    Edit,
}

impl Difficulty {
    /// Slots probed when loading a song, hardest first.
    pub const PROBE_ORDER: [Self; 5] = [
        Self::Challenge,
        Self::Hard,
        Self::Medium,
        Self::Easy,
        Self::Beginner,
    ];

    /// Name as written in the `#DIFFICULTY` tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Challenge => "Challenge",
            Self::Edit => "Edit",
        }
    }

    /// Whether a raw `#DIFFICULTY` value names this slot, ignoring case and surrounding blanks.
    #[must_use]
    pub fn matches(self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Beginner,
            Self::Easy,
            Self::Medium,
            Self::Hard,
            Self::Challenge,
            Self::Edit,
        ]
        .into_iter()
        .find(|difficulty| difficulty.matches(s))
        .ok_or_else(|| format!("unknown difficulty `{s}`"))
    }
}

/// Timing tags, each present only if the container defined it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingTags {
    /// `#OFFSET`
    pub offset: Option<String>,
    /// `#BPMS`
    pub bpms: Option<String>,
    /// `#STOPS`
    pub stops: Option<String>,
    /// `#DELAYS`
    pub delays: Option<String>,
    /// `#WARPS`
    pub warps: Option<String>,
    /// `#SPEEDS`
    pub speeds: Option<String>,
    /// `#SCROLLS`
    pub scrolls: Option<String>,
    /// `#FAKES`
    pub fakes: Option<String>,
}

impl TimingTags {
    /// Whether no timing tag is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.offset.is_none()
            && self.bpms.is_none()
            && self.stops.is_none()
            && self.delays.is_none()
            && self.warps.is_none()
            && self.speeds.is_none()
            && self.scrolls.is_none()
            && self.fakes.is_none()
    }

    /// Names of the tags `other` defines but `self` leaves out.
    #[must_use]
    pub fn missing_from(&self, other: &Self) -> Vec<&'static str> {
        [
            ("OFFSET", self.offset.is_none() && other.offset.is_some()),
            ("BPMS", self.bpms.is_none() && other.bpms.is_some()),
            ("STOPS", self.stops.is_none() && other.stops.is_some()),
            ("DELAYS", self.delays.is_none() && other.delays.is_some()),
            ("WARPS", self.warps.is_none() && other.warps.is_some()),
            ("SPEEDS", self.speeds.is_none() && other.speeds.is_some()),
            ("SCROLLS", self.scrolls.is_none() && other.scrolls.is_some()),
            ("FAKES", self.fakes.is_none() && other.fakes.is_some()),
        ]
        .into_iter()
        .filter_map(|(tag, missing)| missing.then_some(tag))
        .collect()
    }

    /// Fills the absent tags with their neutral values.
    #[must_use]
    pub fn into_fields(self) -> TimingFields {
        TimingFields {
            offset: self.offset.unwrap_or_default(),
            bpms: self.bpms.unwrap_or_default(),
            stops: self.stops.unwrap_or_default(),
            delays: self.delays.unwrap_or_default(),
            warps: self.warps.unwrap_or_default(),
            speeds: self.speeds.unwrap_or_else(|| DEFAULT_SPEEDS.to_owned()),
            scrolls: self.scrolls.unwrap_or_else(|| DEFAULT_SCROLLS.to_owned()),
            fakes: self.fakes.unwrap_or_default(),
        }
    }
}

/// Song-level tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SongHeader {
    /// `#TITLE`
    pub title: String,
    /// `#TITLETRANSLIT`
    pub title_translit: String,
    /// `#ARTIST`
    pub artist: String,
    /// `#ARTISTTRANSLIT`
    pub artist_translit: String,
    /// Song timing, used by every chart without its own.
    pub timing: TimingTags,
}

/// One chart of the simfile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimfileChart {
    /// `#STEPSTYPE`, such as `dance-single`.
    pub steps_type: String,
    /// `#DIFFICULTY`, as written.
    pub difficulty: String,
    /// `#METER`
    pub meter: u32,
    /// `#DESCRIPTION`
    pub description: Option<String>,
    /// `#CREDIT`, `.ssc` only.
    pub credit: Option<String>,
    /// `#CHARTNAME`, `.ssc` only.
    pub chart_name: Option<String>,
    /// `#CHARTSTYLE`, `.ssc` only.
    pub chart_style: Option<String>,
    /// The raw `#NOTES` field.
    pub notes: String,
    /// Chart-level timing tags, `.ssc` only.
    pub timing: TimingTags,
}

/// A whole simfile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Simfile {
    /// The container kind.
    pub kind: SimfileKind,
    /// Song-level tags.
    pub header: SongHeader,
    /// Charts in file order.
    pub charts: Vec<SimfileChart>,
}

impl Simfile {
    /// Resolves the timing fields `chart` plays with.
    ///
    /// For `.ssc`, a chart defining any timing tag replaces the song timing wholesale, and the tags it
    /// leaves out fall back to neutral values rather than to the song's. Song tags dropped this way
    /// are logged as a warning.
    #[must_use]
    pub fn timing_fields(&self, chart: &SimfileChart) -> TimingFields {
        match self.kind {
            SimfileKind::Ssc if !chart.timing.is_empty() => {
                let dropped = chart.timing.missing_from(&self.header.timing);
                if !dropped.is_empty() {
                    log::warn!(
                        "{} {} chart has its own timing, ignoring song tags: {}",
                        chart.steps_type,
                        chart.difficulty,
                        dropped.join(", ")
                    );
                }
                chart.timing.clone().into_fields()
            }
            SimfileKind::Sm | SimfileKind::Ssc => self.header.timing.clone().into_fields(),
        }
    }

    /// The chart author credit, by the conventions of each container.
    ///
    /// `.sm` keeps it in the description. `.ssc` prefers `#CREDIT`, then `#DESCRIPTION`, then `#CHARTNAME`.
    #[must_use]
    pub fn credit(&self, chart: &SimfileChart) -> String {
        match self.kind {
            SimfileKind::Sm => chart.description.clone(),
            SimfileKind::Ssc => chart
                .credit
                .clone()
                .or_else(|| chart.description.clone())
                .or_else(|| chart.chart_name.clone()),
        }
        .unwrap_or_default()
    }
}

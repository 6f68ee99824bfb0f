//! Charts ready for conversion: parsed notes bound to their timing.
//!
//! A [`ChartBundle`] is built once per difficulty slot of a simfile and never changes afterwards.
//! Conversions read it and build new [`TimedNote`]s, so the same bundle can feed any number of
//! output tiers. [`ChartCatalog`] collects the bundles of every slot a simfile provides.

pub mod hold;

use crate::{
    convert::ConvertError,
    notes::{NoteEvent, ParseWarningWithRange, parse_notes_field},
    simfile::{
        Difficulty, Simfile,
        select::{ChartLookupError, ChartQuery, find_chart},
    },
    timing::TimingTimeline,
};

pub use self::hold::resolve_holds;

/// Descriptive fields of a chart and its song.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartInfo {
    /// Song title.
    pub title: String,
    /// Song title in latin script, may be blank.
    pub title_translit: String,
    /// Song artist.
    pub artist: String,
    /// Song artist in latin script, may be blank.
    pub artist_translit: String,
    /// Difficulty rating of the chart.
    pub meter: u32,
    /// Chart author.
    pub credit: String,
}

impl ChartInfo {
    /// Formats `Artist (ArtistTranslit) - "Title (TitleTranslit)"`, leaving out blank transliterations.
    #[must_use]
    pub fn song_name(&self) -> String {
        let with_translit = |name: &str, translit: &str| {
            if translit.trim().is_empty() {
                name.to_owned()
            } else {
                format!("{name} ({translit})")
            }
        };
        format!(
            "{} - \"{}\"",
            with_translit(&self.artist, &self.artist_translit),
            with_translit(&self.title, &self.title_translit),
        )
    }
}

/// A note with its time resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedNote {
    /// The note as parsed.
    pub note: NoteEvent,
    /// Seconds from the start of the audio.
    pub time: f64,
    /// Seconds until the matching end, for holds and rolls that have one.
    pub hold_length: Option<f64>,
}

/// One chart with its notes, timing and descriptive fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartBundle {
    notes: Vec<NoteEvent>,
    timing: TimingTimeline,
    info: ChartInfo,
    warnings: Vec<ParseWarningWithRange>,
}

impl ChartBundle {
    /// Bundles already parsed notes, in chart order, with their timing.
    #[must_use]
    pub const fn new(notes: Vec<NoteEvent>, timing: TimingTimeline, info: ChartInfo) -> Self {
        Self {
            notes,
            timing,
            info,
            warnings: Vec::new(),
        }
    }

    /// Selects the chart of `simfile` passing `query`, then parses its notes and timing.
    ///
    /// Note field warnings do not fail the load, they are kept in [`ChartBundle::warnings`].
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Lookup`] if `query` does not select exactly one chart, or
    /// [`ConvertError::MalformedTimingData`] if its timing fields cannot be read.
    pub fn from_simfile(simfile: &Simfile, query: &ChartQuery) -> Result<Self, ConvertError> {
        let chart = find_chart(simfile, query)?;
        let timing = TimingTimeline::from_fields(&simfile.timing_fields(chart))?;
        let parsed = parse_notes_field(&chart.notes);
        let header = &simfile.header;
        let info = ChartInfo {
            title: header.title.clone(),
            title_translit: header.title_translit.clone(),
            artist: header.artist.clone(),
            artist_translit: header.artist_translit.clone(),
            meter: chart.meter,
            credit: simfile.credit(chart),
        };
        Ok(Self {
            notes: parsed.notes,
            timing,
            info,
            warnings: parsed.warnings,
        })
    }

    /// Notes in chart order.
    #[must_use]
    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    /// The timing the notes are placed with.
    #[must_use]
    pub const fn timing(&self) -> &TimingTimeline {
        &self.timing
    }

    /// Descriptive fields.
    #[must_use]
    pub const fn info(&self) -> &ChartInfo {
        &self.info
    }

    /// Problems found in the note field. Byte ranges point into the chart's raw `#NOTES` text.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarningWithRange] {
        &self.warnings
    }

    /// The largest beat any note sits on, `None` for an empty chart.
    #[must_use]
    pub fn max_beat(&self) -> Option<f64> {
        self.notes
            .iter()
            .map(|note| note.beat)
            .max_by(f64::total_cmp)
    }

    /// Resolves the time of every note, then the length of every hold and roll.
    ///
    /// The bundle itself is left untouched.
    #[must_use]
    pub fn timed_notes(&self, manual_offset: f64) -> Vec<TimedNote> {
        let timed: Vec<_> = self
            .notes
            .iter()
            .map(|&note| TimedNote {
                note,
                time: self.timing.beat_to_time(note.beat, manual_offset),
                hold_length: None,
            })
            .collect();
        resolve_holds(&timed)
    }
}

/// The charts of one simfile by difficulty slot, in the order they were probed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartCatalog {
    slots: Vec<(Difficulty, ChartBundle)>,
}

impl ChartCatalog {
    /// Loads every slot of [`Difficulty::PROBE_ORDER`] that `simfile` has a `steps_type` chart for.
    ///
    /// A slot that fails to load is skipped. Missing slots are expected and only logged at debug
    /// level, anything else is logged as a warning.
    #[must_use]
    pub fn probe(simfile: &Simfile, steps_type: &str) -> Self {
        let mut catalog = Self::default();
        for difficulty in Difficulty::PROBE_ORDER {
            let query = ChartQuery::new()
                .steps_type(steps_type)
                .difficulty(difficulty);
            match ChartBundle::from_simfile(simfile, &query) {
                Ok(bundle) => catalog.insert(difficulty, bundle),
                Err(ConvertError::Lookup(ChartLookupError::NoChartFound { .. })) => {
                    log::debug!("no {query} chart, slot skipped");
                }
                Err(err) => log::warn!("{difficulty} slot skipped: {err}"),
            }
        }
        log::debug!(
            "catalog holds {} slots: {:?}",
            catalog.len(),
            catalog.available()
        );
        catalog
    }

    /// Adds or replaces the bundle of `difficulty`. A new slot goes last.
    pub fn insert(&mut self, difficulty: Difficulty, bundle: ChartBundle) {
        match self.slots.iter_mut().find(|(slot, _)| *slot == difficulty) {
            Some((_, existing)) => *existing = bundle,
            None => self.slots.push((difficulty, bundle)),
        }
    }

    /// The bundle of `difficulty`, if loaded.
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> Option<&ChartBundle> {
        self.slots
            .iter()
            .find_map(|(slot, bundle)| (*slot == difficulty).then_some(bundle))
    }

    /// Loaded slots in probe order.
    #[must_use]
    pub fn available(&self) -> Vec<Difficulty> {
        self.slots.iter().map(|(slot, _)| *slot).collect()
    }

    /// Number of loaded slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The song name built from the first loaded slot, see [`ChartInfo::song_name`].
    #[must_use]
    pub fn song_name(&self) -> Option<String> {
        self.slots.first().map(|(_, bundle)| bundle.info.song_name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn song_name_skips_blank_transliterations() {
        let mut info = ChartInfo {
            title: "Title".into(),
            artist: "Artist".into(),
            title_translit: "  ".into(),
            ..ChartInfo::default()
        };
        assert_eq!(info.song_name(), "Artist - \"Title\"");
        info.artist_translit = "Romaji".into();
        info.title_translit = "Latin".into();
        assert_eq!(info.song_name(), "Artist (Romaji) - \"Title (Latin)\"");
    }

    #[test]
    fn empty_chart_has_no_max_beat() {
        let timing = TimingTimeline::new(0.0, [(0.0, 120.0)], [], []).unwrap();
        let bundle = ChartBundle::new(vec![], timing, ChartInfo::default());
        assert_eq!(bundle.max_beat(), None);
        assert_eq!(bundle.timed_notes(0.0), vec![]);
    }
}

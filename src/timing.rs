//! Tempo timeline of a chart and the beat-to-seconds conversion built on it.
//!
//! Timing arrives as strings of `beat=value` pairs separated by commas (`#BPMS`, `#STOPS`, `#WARPS`, …)
//! plus an `#OFFSET` scalar. [`TimingTimeline`] parses them once and sorts every list by beat. A
//! repeated BPM or warp beat keeps only its last entry, while stops on the same beat all apply. Lookups never run off the end of the BPM list because a
//! synthetic segment at [`TERMINAL_BEAT`] repeats the last real BPM.
//!
//! Warps are parsed and stored, but [`TimingTimeline::beat_to_time`] does not apply them.

use itertools::Itertools;
use thiserror::Error;

/// Beat of the synthetic last BPM segment.
pub const TERMINAL_BEAT: f64 = 1_000_000.0;

/// Default `#SPEEDS` value: a ratio of 1 from the first beat.
pub const DEFAULT_SPEEDS: &str = "0.000=1.000=0.000=0";

/// Default `#SCROLLS` value: a ratio of 1 from the first beat.
pub const DEFAULT_SCROLLS: &str = "0.000=1.000";

/// Raw timing fields of one chart, after resolving chart-level against song-level values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingFields {
    /// `#OFFSET`, seconds of audio before beat 0, negated.
    pub offset: String,
    /// `#BPMS`, `beat=bpm` pairs.
    pub bpms: String,
    /// `#STOPS`, `beat=seconds` pairs.
    pub stops: String,
    /// `#DELAYS`, `beat=seconds` pairs. Carried through, not interpreted.
    pub delays: String,
    /// `#WARPS`, `beat=length in beats` pairs.
    pub warps: String,
    /// `#SPEEDS`. Carried through, not interpreted.
    pub speeds: String,
    /// `#SCROLLS`. Carried through, not interpreted.
    pub scrolls: String,
    /// `#FAKES`. Carried through, not interpreted.
    pub fakes: String,
}

impl Default for TimingFields {
    fn default() -> Self {
        Self {
            offset: String::new(),
            bpms: String::new(),
            stops: String::new(),
            delays: String::new(),
            warps: String::new(),
            speeds: DEFAULT_SPEEDS.to_owned(),
            scrolls: DEFAULT_SCROLLS.to_owned(),
            fakes: String::new(),
        }
    }
}

/// Names the timing field an error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingField {
    /// `#BPMS`
    Bpms,
    /// `#STOPS`
    Stops,
    /// `#WARPS`
    Warps,
}

impl std::fmt::Display for TimingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bpms => "BPMS",
            Self::Stops => "STOPS",
            Self::Warps => "WARPS",
        })
    }
}

/// An error occurred when building a [`TimingTimeline`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimingError {
    /// An entry of a pair list was not two finite numbers joined by `=`.
    #[error("malformed {field} entry `{entry}`, expected `beat=value`")]
    MalformedPair {
        /// Field the entry belongs to.
        field: TimingField,
        /// The offending entry, trimmed.
        entry: String,
    },
    /// `#OFFSET` was not a finite number.
    #[error("malformed OFFSET `{0}`")]
    MalformedOffset(String),
    /// `#BPMS` had no entry at all.
    #[error("BPMS defines no tempo")]
    NoBpm,
    /// A tempo of zero would stretch the rest of the chart to infinity.
    #[error("BPM of zero at beat {beat}")]
    ZeroBpm {
        /// Beat of the offending segment.
        beat: f64,
    },
}

/// A tempo in effect from `start_beat` until the next segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmSegment {
    /// Beat the tempo starts at.
    pub start_beat: f64,
    /// Beats per minute.
    pub bpm: f64,
}

/// A pause of the scroll at `beat`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopSegment {
    /// Beat the stop happens at.
    pub beat: f64,
    /// Seconds the chart stands still.
    pub duration: f64,
}

/// A jump forward of `length` beats at `beat`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarpSegment {
    /// Beat the warp starts at.
    pub beat: f64,
    /// Beats skipped.
    pub length: f64,
}

/// Sorted tempo, stop and warp events of one chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingTimeline {
    offset: f64,
    initial_bpm: f64,
    bpms: Vec<BpmSegment>,
    stops: Vec<StopSegment>,
    warps: Vec<WarpSegment>,
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses `beat=value[,beat=value...]`. Empty entries are skipped, parts past the second `=` ignored.
fn parse_pairs(field: TimingField, raw: &str) -> Result<Vec<(f64, f64)>, TimingError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let malformed = || TimingError::MalformedPair {
                field,
                entry: entry.to_owned(),
            };
            let mut parts = entry.split('=');
            let beat = parts.next().and_then(parse_finite).ok_or_else(malformed)?;
            let value = parts.next().and_then(parse_finite).ok_or_else(malformed)?;
            Ok((beat, value))
        })
        .collect()
}

/// Sorts by beat and keeps the later of two entries on the same beat.
fn sorted_by_beat(pairs: impl IntoIterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    pairs
        .into_iter()
        .sorted_by(|a, b| a.0.total_cmp(&b.0))
        .coalesce(|prev, next| {
            if prev.0.total_cmp(&next.0).is_eq() {
                Ok(next)
            } else {
                Err((prev, next))
            }
        })
        .collect()
}

impl TimingTimeline {
    /// Builds a timeline from already parsed `(beat, value)` lists.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::NoBpm`] if `bpms` is empty, or [`TimingError::ZeroBpm`] if a tempo is zero.
    pub fn new(
        offset: f64,
        bpms: impl IntoIterator<Item = (f64, f64)>,
        stops: impl IntoIterator<Item = (f64, f64)>,
        warps: impl IntoIterator<Item = (f64, f64)>,
    ) -> Result<Self, TimingError> {
        let mut bpms: Vec<_> = sorted_by_beat(bpms)
            .into_iter()
            .map(|(start_beat, bpm)| BpmSegment { start_beat, bpm })
            .collect();
        if let Some(zero) = bpms.iter().find(|segment| segment.bpm == 0.0) {
            return Err(TimingError::ZeroBpm {
                beat: zero.start_beat,
            });
        }
        let (Some(&first), Some(&last)) = (bpms.first(), bpms.last()) else {
            return Err(TimingError::NoBpm);
        };
        if last.start_beat < TERMINAL_BEAT {
            bpms.push(BpmSegment {
                start_beat: TERMINAL_BEAT,
                bpm: last.bpm,
            });
        }

        Ok(Self {
            offset,
            initial_bpm: first.bpm,
            bpms,
            stops: stops
                .into_iter()
                .sorted_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(beat, duration)| StopSegment { beat, duration })
                .collect(),
            warps: sorted_by_beat(warps)
                .into_iter()
                .map(|(beat, length)| WarpSegment { beat, length })
                .collect(),
        })
    }

    /// Parses the raw timing fields of a chart.
    ///
    /// An empty `#OFFSET` means zero. Delays, speeds, scrolls and fakes are not part of the timeline.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError`] if a field is present but not made of `beat=value` pairs, the offset is
    /// not a number, or no usable BPM is defined.
    pub fn from_fields(fields: &TimingFields) -> Result<Self, TimingError> {
        let offset = if fields.offset.trim().is_empty() {
            0.0
        } else {
            parse_finite(&fields.offset)
                .ok_or_else(|| TimingError::MalformedOffset(fields.offset.trim().to_owned()))?
        };
        Self::new(
            offset,
            parse_pairs(TimingField::Bpms, &fields.bpms)?,
            parse_pairs(TimingField::Stops, &fields.stops)?,
            parse_pairs(TimingField::Warps, &fields.warps)?,
        )
    }

    /// `#OFFSET` in seconds.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Tempo of the first segment, the one shown as the song BPM.
    #[must_use]
    pub const fn initial_bpm(&self) -> f64 {
        self.initial_bpm
    }

    /// Tempo segments ascending by beat, ending with the synthetic segment at [`TERMINAL_BEAT`].
    #[must_use]
    pub fn bpm_segments(&self) -> &[BpmSegment] {
        &self.bpms
    }

    /// Stops ascending by beat.
    #[must_use]
    pub fn stops(&self) -> &[StopSegment] {
        &self.stops
    }

    /// Warps ascending by beat.
    #[must_use]
    pub fn warps(&self) -> &[WarpSegment] {
        &self.warps
    }

    /// Seconds elapsed at `beat`, counted from the start of the audio.
    ///
    /// Starts at `-offset + manual_offset`, adds the time spent in each tempo segment up to `beat`,
    /// then the duration of every stop strictly before `beat`. A note sitting exactly on a stop is
    /// hit before the stop happens.
    ///
    /// # Example
    ///
    /// ```
    /// use sm2fnf::timing::TimingTimeline;
    ///
    /// let timeline = TimingTimeline::new(0.0, [(0.0, 120.0), (4.0, 60.0)], [(2.0, 0.25)], [])?;
    /// assert_eq!(timeline.beat_to_time(2.0, 0.0), 1.0);
    /// assert_eq!(timeline.beat_to_time(4.0, 0.0), 2.25);
    /// assert_eq!(timeline.beat_to_time(5.0, 0.1), 3.35);
    /// # Ok::<(), sm2fnf::timing::TimingError>(())
    /// ```
    #[must_use]
    pub fn beat_to_time(&self, beat: f64, manual_offset: f64) -> f64 {
        let mut time = -self.offset + manual_offset;
        for (segment, next) in self.bpms.iter().tuple_windows() {
            let up_to = beat.min(next.start_beat);
            time += (up_to - segment.start_beat) * 60.0 / segment.bpm;
            if next.start_beat > beat {
                break;
            }
        }
        time + self
            .stops
            .iter()
            .take_while(|stop| stop.beat < beat)
            .map(|stop| stop.duration)
            .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fields(offset: &str, bpms: &str, stops: &str, warps: &str) -> TimingFields {
        TimingFields {
            offset: offset.into(),
            bpms: bpms.into(),
            stops: stops.into(),
            warps: warps.into(),
            ..TimingFields::default()
        }
    }

    #[track_caller]
    fn assert_close(expected: f64, actual: f64) {
        assert!(
            (expected - actual).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn constant_tempo_is_linear() {
        let timeline = TimingTimeline::from_fields(&fields("0", "0=150", "", "")).unwrap();
        for beat in [0.0, 0.5, 3.0, 17.25, 400.0] {
            assert_close(beat * 60.0 / 150.0, timeline.beat_to_time(beat, 0.0));
        }
    }

    #[test]
    fn offsets_shift_every_beat() {
        let timeline =
            TimingTimeline::from_fields(&fields("-0.2", "0.000=100.000", "", "")).unwrap();
        assert_close(0.2, timeline.beat_to_time(0.0, 0.0));
        assert_close(0.2 + 0.6 - 0.05, timeline.beat_to_time(1.0, -0.05));
    }

    #[test]
    fn tempo_change_exactly_on_queried_beat() {
        let timeline = TimingTimeline::from_fields(&fields("0", "0=120,4=240", "", "")).unwrap();
        assert_close(2.0, timeline.beat_to_time(4.0, 0.0));
        assert_close(2.25, timeline.beat_to_time(5.0, 0.0));
    }

    #[test]
    fn stop_on_the_beat_applies_after_it() {
        let timeline = TimingTimeline::from_fields(&fields("0", "0=60", "2=1.5", "")).unwrap();
        assert_close(2.0, timeline.beat_to_time(2.0, 0.0));
        assert_close(2.0 + 1.5 + 0.5, timeline.beat_to_time(2.5, 0.0));
    }

    #[test]
    fn lists_are_sorted_and_tempos_deduplicated() {
        let timeline =
            TimingTimeline::from_fields(&fields("0", "8=90, 0=120, 8=180,", "4=0.1,1=0.2", ""))
                .unwrap();
        assert_eq!(
            timeline.bpm_segments(),
            &[
                BpmSegment {
                    start_beat: 0.0,
                    bpm: 120.0
                },
                BpmSegment {
                    start_beat: 8.0,
                    bpm: 180.0
                },
                BpmSegment {
                    start_beat: TERMINAL_BEAT,
                    bpm: 180.0
                },
            ]
        );
        let stop_beats: Vec<_> = timeline.stops().iter().map(|stop| stop.beat).collect();
        assert_eq!(stop_beats, vec![1.0, 4.0]);
        assert_eq!(timeline.initial_bpm(), 120.0);
    }

    #[test]
    fn duplicate_stops_accumulate() {
        let timeline =
            TimingTimeline::from_fields(&fields("0", "0=60", "2=0.5,1=0.25,2=0.5", "")).unwrap();
        assert_eq!(timeline.stops().len(), 3);
        assert_close(2.0 + 0.25, timeline.beat_to_time(2.0, 0.0));
        assert_close(3.0 + 0.25 + 0.5 + 0.5, timeline.beat_to_time(3.0, 0.0));
    }

    #[test]
    fn warps_are_stored_but_not_applied() {
        let warped = TimingTimeline::from_fields(&fields("0", "0=120", "", "4=4")).unwrap();
        let plain = TimingTimeline::from_fields(&fields("0", "0=120", "", "")).unwrap();
        assert_eq!(warped.warps(), &[WarpSegment { beat: 4.0, length: 4.0 }]);
        assert_eq!(warped.beat_to_time(12.0, 0.0), plain.beat_to_time(12.0, 0.0));
    }

    #[test]
    fn beyond_the_last_change_keeps_the_last_tempo() {
        let timeline = TimingTimeline::from_fields(&fields("0", "0=120,16=60", "", "")).unwrap();
        assert_close(8.0 + 4.0, timeline.beat_to_time(20.0, 0.0));
        assert_close(8.0 + 984.0, timeline.beat_to_time(1000.0, 0.0));
    }

    #[test]
    fn monotonic_under_changes_and_stops() {
        let timeline = TimingTimeline::from_fields(&fields(
            "0.05",
            "0=95,3.5=190,10=70",
            "2=0.3,3.5=0.1,9=1",
            "",
        ))
        .unwrap();
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=64 * 8 {
            let beat = f64::from(step) / 8.0;
            let time = timeline.beat_to_time(beat, 0.0);
            assert!(time >= previous, "time went back at beat {beat}");
            previous = time;
        }
    }

    #[test]
    fn malformed_fields_are_rejected() {
        assert_eq!(
            TimingTimeline::from_fields(&fields("0", "0=120,4:90", "", "")),
            Err(TimingError::MalformedPair {
                field: TimingField::Bpms,
                entry: "4:90".into()
            })
        );
        assert_eq!(
            TimingTimeline::from_fields(&fields("0", "0=120", "1=abc", "")),
            Err(TimingError::MalformedPair {
                field: TimingField::Stops,
                entry: "1=abc".into()
            })
        );
        assert_eq!(
            TimingTimeline::from_fields(&fields("zero", "0=120", "", "")),
            Err(TimingError::MalformedOffset("zero".into()))
        );
        assert_eq!(
            TimingTimeline::from_fields(&fields("0", "  ", "", "")),
            Err(TimingError::NoBpm)
        );
        assert_eq!(
            TimingTimeline::from_fields(&fields("0", "0=120,8=0", "", "")),
            Err(TimingError::ZeroBpm { beat: 8.0 })
        );
    }

    #[test]
    fn missing_optional_fields_are_neutral() {
        let timeline = TimingTimeline::from_fields(&fields("", "0=120", "", "")).unwrap();
        assert_eq!(timeline.offset(), 0.0);
        assert!(timeline.stops().is_empty());
        assert!(timeline.warps().is_empty());
    }
}

//! Cutting the merged stream into fixed four-beat sections.
//!
//! The output format has no tempo map: every section is sixteen steps long and carries one BPM.
//! Each section's BPM is therefore reconstructed from how long its four source beats actually last
//! on the player's timeline, stops included. Leading silence is realized by tempo as well, with a
//! one-step pickup section whose negative BPM the game reads as a delay.

use num::ToPrimitive;

use crate::{
    chart::TimedNote,
    fnf::{FnfNote, FnfSection},
    notes::{BEATS_PER_MEASURE, NoteKind},
    timing::TimingTimeline,
};

use super::ConvertError;

/// Sections spanning less than this many seconds cannot hold notes.
pub const MIN_SECTION_SECONDS: f64 = 0.001;

/// Seconds of a four-beat section at `bpm`, written as `240 / bpm`.
const SECONDS_PER_SECTION_AT_ONE_BPM: f64 = 240.0;

/// Milliseconds per second, the output time unit.
const MS: f64 = 1000.0;

fn section_of(beat: f64) -> Option<usize> {
    (beat / BEATS_PER_MEASURE as f64).floor().to_usize()
}

fn to_fnf_note(timed: &TimedNote) -> Option<FnfNote> {
    let (time, lane) = (timed.time * MS, timed.note.lane);
    match timed.note.kind {
        NoteKind::Tap => Some(FnfNote(time, lane, 0.0)),
        NoteKind::Hold | NoteKind::Roll => {
            Some(FnfNote(time, lane, timed.hold_length.unwrap_or(0.0) * MS))
        }
        NoteKind::End | NoteKind::Mine | NoteKind::Fake | NoteKind::Lift => None,
    }
}

fn degenerate(measure: usize, notes: usize, span_seconds: f64) -> ConvertError {
    ConvertError::DegenerateMeasure {
        measure,
        notes,
        span_seconds,
    }
}

/// Groups `merged` into sections and derives each section's BPM from `player_timing`.
///
/// There are `1 + floor(max_beat / 4)` regular sections. Only taps, holds and rolls are emitted:
/// `(time ms, lane, 0)` for a tap and `(time ms, lane, hold ms)` for the others.
///
/// Afterwards the start is aligned to the audio. With `full_offset = -offset + manual_offset` of
/// the player timeline, a positive `full_offset` above [`MIN_SECTION_SECONDS`] prepends a pickup
/// section of BPM `-15 / full_offset`. Otherwise the first section is stretched by `-full_offset`
/// seconds.
///
/// # Errors
///
/// Returns [`ConvertError::DegenerateMeasure`] if a section holding notes spans less than
/// [`MIN_SECTION_SECONDS`], or if a section's BPM comes out infinite or NaN.
pub fn bucket_sections(
    merged: &[TimedNote],
    max_beat: f64,
    player_timing: &TimingTimeline,
    manual_offset: f64,
) -> Result<Vec<FnfSection>, ConvertError> {
    let count = section_of(max_beat).unwrap_or(0) + 1;
    let mut buckets: Vec<Vec<FnfNote>> = vec![Vec::new(); count];
    for timed in merged {
        let Some(note) = to_fnf_note(timed) else {
            continue;
        };
        match section_of(timed.note.beat).and_then(|index| buckets.get_mut(index)) {
            Some(bucket) => bucket.push(note),
            None => log::warn!("note at beat {} lies outside the chart", timed.note.beat),
        }
    }

    let mut sections = buckets
        .into_iter()
        .enumerate()
        .map(|(index, notes)| {
            let start_beat = (index * BEATS_PER_MEASURE) as f64;
            let end_beat = start_beat + BEATS_PER_MEASURE as f64;
            let span = player_timing.beat_to_time(end_beat, manual_offset)
                - player_timing.beat_to_time(start_beat, manual_offset);
            if span < MIN_SECTION_SECONDS && !notes.is_empty() {
                return Err(degenerate(index, notes.len(), span));
            }
            let bpm = (SECONDS_PER_SECTION_AT_ONE_BPM / span).trunc();
            if !bpm.is_finite() {
                return Err(degenerate(index, notes.len(), span));
            }
            Ok(FnfSection::new(bpm, notes))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let full_offset = -player_timing.offset() + manual_offset;
    if full_offset > MIN_SECTION_SECONDS {
        let bpm = -15.0 / full_offset;
        log::debug!("offset {full_offset:.3}s realized by a pickup section at {bpm:.3} BPM");
        sections.insert(0, FnfSection::pickup(bpm));
    } else if let Some(first) = sections.first_mut() {
        let seconds = SECONDS_PER_SECTION_AT_ONE_BPM / first.bpm - full_offset;
        let bpm = SECONDS_PER_SECTION_AT_ONE_BPM / seconds;
        if !bpm.is_finite() {
            return Err(degenerate(0, first.section_notes.len(), seconds));
        }
        log::debug!("offset {full_offset:.3}s absorbed by the first section, {bpm:.3} BPM");
        first.bpm = bpm;
    }

    log::debug!("emitted {} sections", sections.len());
    Ok(sections)
}

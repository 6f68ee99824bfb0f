//! Parsing the raw `#NOTES` field of a chart into beat-positioned note events.
//!
//! The field is a sequence of rows, one per line, grouped into measures by lines starting with `,`
//! (or `;` at the end of the chart). Each character of a row is one lane:
//!
//! | char | kind |
//! |------|------|
//! | `0`  | nothing |
//! | `1`  | [`NoteKind::Tap`] |
//! | `2`  | [`NoteKind::Hold`] head |
//! | `3`  | [`NoteKind::End`] of a hold or roll |
//! | `4`  | [`NoteKind::Roll`] head |
//! | `F`  | [`NoteKind::Fake`] |
//! | `M`  | [`NoteKind::Mine`] |
//! | `L`  | [`NoteKind::Lift`] |
//!
//! Every measure spans four beats no matter how many rows it has, so a row's beat is
//! `tick * 4 / rows + measure * 4`.
//!
//! Malformed text is never fatal: rows are read as far as they make sense and everything else is
//! reported as a [`ParseWarning`] carrying the byte range it was found at.

mod cursor;

use thiserror::Error;

use crate::mixin::SourceRangeMixin;

use self::cursor::{LineCursor, SourceLine};

/// Beats covered by one measure of the note field.
pub const BEATS_PER_MEASURE: usize = 4;

/// Kind of a note object placed on a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    /// A single hit.
    Tap,
    /// Start of a hold, which must be kept pressed until its [`NoteKind::End`].
    Hold,
    /// Tail of a hold or a roll.
    End,
    /// Start of a roll, which must be hit repeatedly until its [`NoteKind::End`].
    Roll,
    /// A note that is shown but never judged.
    Fake,
    /// A note that must not be hit.
    Mine,
    /// A note judged on release.
    Lift,
}

impl NoteKind {
    /// Reads a note character of a row. `0` and unknown characters yield `None`.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '1' => Self::Tap,
            '2' => Self::Hold,
            '3' => Self::End,
            '4' => Self::Roll,
            'F' => Self::Fake,
            'M' => Self::Mine,
            'L' => Self::Lift,
            _ => return None,
        })
    }

    /// The character this kind is written as.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Tap => '1',
            Self::Hold => '2',
            Self::End => '3',
            Self::Roll => '4',
            Self::Fake => 'F',
            Self::Mine => 'M',
            Self::Lift => 'L',
        }
    }

    /// Whether this kind opens a long note closed by a later [`NoteKind::End`].
    #[must_use]
    pub const fn is_hold_head(self) -> bool {
        matches!(self, Self::Hold | Self::Roll)
    }
}

impl std::fmt::Display for NoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A note placed in the chart, positioned by beat.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// Row index inside its measure.
    pub tick: usize,
    /// What kind of object this is.
    pub kind: NoteKind,
    /// Lane, i.e. the character index in the row.
    pub lane: usize,
    /// Coarse subdivision label, see [`quantization_id`].
    pub quantization: usize,
    /// Position in beats from the start of the chart.
    pub beat: f64,
}

/// Labels the musical subdivision of row `tick` in a measure of `measure_length` rows.
///
/// The pair is reduced by one common factor of 3 and then up to six common factors of 2. A remaining
/// denominator of 1 or 2 is reported as `4` (quarters and eighths), 3 or 6 as `12`, anything else as
/// itself. The label is informational only and never used for timing.
#[must_use]
pub fn quantization_id(tick: usize, measure_length: usize) -> usize {
    let (mut tick, mut length) = (tick, measure_length);
    for (factor, times) in [(3, 1), (2, 6)] {
        for _ in 0..times {
            if length % factor != 0 {
                break;
            }
            if tick % factor == 0 {
                tick /= factor;
                length /= factor;
            }
        }
    }

    match length {
        1 | 2 => 4,
        3 | 6 => 12,
        other => other,
    }
}

/// A non-fatal problem found in the note field.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseWarning {
    /// A digit without a note meaning occupied a lane. The lane is kept empty.
    #[error("unknown note type `{0}`, lane left empty")]
    UnknownNoteChar(char),
    /// The line is neither a row, a measure delimiter nor a comment.
    #[error("line is neither a note row nor a measure delimiter")]
    UnrecognizedLine,
    /// Something other than a comment follows the row characters.
    #[error("unexpected text after note row")]
    TrailingText,
}

/// A [`ParseWarning`] with the byte range it was found at.
pub type ParseWarningWithRange = SourceRangeMixin<ParseWarning>;

#[cfg(feature = "diagnostics")]
impl crate::diagnostics::ToAriadne for ParseWarningWithRange {
    fn to_report<'a>(
        &self,
        src: &crate::diagnostics::SimpleSource<'a>,
    ) -> ariadne::Report<'a, (String, std::ops::Range<usize>)> {
        let color = match self.content() {
            ParseWarning::UnknownNoteChar(_) => ariadne::Color::Yellow,
            ParseWarning::UnrecognizedLine | ParseWarning::TrailingText => ariadne::Color::Blue,
        };
        crate::diagnostics::build_report(
            src,
            ariadne::ReportKind::Warning,
            self.range(),
            "notes: ignored text",
            self.content(),
            color,
        )
    }
}

/// Output of [`parse_notes_field`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct NotesOutput {
    /// Notes in measure-then-row order, so ascending by beat.
    pub notes: Vec<NoteEvent>,
    /// Number of measures read, including empty ones.
    pub measures: usize,
    /// Warnings that occurred during parsing.
    pub warnings: Vec<ParseWarningWithRange>,
}

#[derive(Debug, Default)]
struct MeasureAccumulator {
    measure: usize,
    rows: usize,
    pending: Vec<(usize, NoteKind, usize)>,
    closed: Vec<NoteEvent>,
}

impl MeasureAccumulator {
    fn push(&mut self, kind: NoteKind, lane: usize) {
        self.pending.push((self.rows, kind, lane));
    }

    fn next_row(&mut self) {
        self.rows += 1;
    }

    fn close_measure(&mut self) {
        let rows = self.rows;
        let start_beat = (self.measure * BEATS_PER_MEASURE) as f64;
        let increment = if rows == 0 {
            0.0
        } else {
            BEATS_PER_MEASURE as f64 / rows as f64
        };
        self.closed.extend(std::mem::take(&mut self.pending).into_iter().map(
            |(tick, kind, lane)| NoteEvent {
                tick,
                kind,
                lane,
                quantization: quantization_id(tick, rows),
                beat: tick as f64 * increment + start_beat,
            },
        ));
        self.measure += 1;
        self.rows = 0;
    }
}

const fn is_row_char(c: char) -> bool {
    matches!(c, '0'..='9' | 'F' | 'L' | 'M')
}

fn is_comment_or_blank(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.starts_with("//")
}

/// Parses a raw note field into beat-positioned notes.
///
/// Trailing `;` terminators are dropped and the final measure is closed implicitly, so text that
/// ends without a delimiter still yields its last measure.
///
/// # Example
///
/// ```
/// use sm2fnf::notes::{NoteKind, parse_notes_field};
///
/// let output = parse_notes_field("1000\n0000\n0100\n0000\n,\n0010\n;");
/// assert!(output.warnings.is_empty());
/// let beats: Vec<_> = output.notes.iter().map(|note| note.beat).collect();
/// assert_eq!(beats, vec![0.0, 2.0, 4.0]);
/// assert_eq!(output.notes[2].kind, NoteKind::Tap);
/// assert_eq!(output.notes[2].lane, 2);
/// ```
pub fn parse_notes_field(source: &str) -> NotesOutput {
    let body = source.trim_end().trim_end_matches(';');
    let mut measures = MeasureAccumulator::default();
    let mut warnings = Vec::new();

    for SourceLine { line, start, text } in LineCursor::new(body) {
        let trimmed = text.trim_start();
        let row_start = start + (text.len() - trimmed.len());

        if trimmed.starts_with([',', ';']) {
            measures.close_measure();
            continue;
        }

        let row_len = trimmed
            .find(|c: char| !is_row_char(c))
            .unwrap_or(trimmed.len());
        if row_len == 0 {
            if !is_comment_or_blank(trimmed) {
                log::trace!("note field line {line} skipped: {trimmed:?}");
                let end = row_start + trimmed.trim_end().len();
                warnings.push(ParseWarningWithRange::from((
                    ParseWarning::UnrecognizedLine,
                    row_start..end,
                )));
            }
            continue;
        }

        let (row, rest) = trimmed.split_at(row_len);
        for (lane, c) in row.chars().enumerate() {
            match NoteKind::from_char(c) {
                Some(kind) => measures.push(kind, lane),
                None if c != '0' => warnings.push(ParseWarningWithRange::from((
                    ParseWarning::UnknownNoteChar(c),
                    row_start + lane..row_start + lane + 1,
                ))),
                None => {}
            }
        }
        measures.next_row();

        if !is_comment_or_blank(rest) {
            let rest_start = row_start + row_len + (rest.len() - rest.trim_start().len());
            let rest_end = row_start + row_len + rest.trim_end().len();
            warnings.push(ParseWarningWithRange::from((
                ParseWarning::TrailingText,
                rest_start..rest_end,
            )));
        }
    }
    // The implicit terminator flushes the last measure.
    measures.close_measure();

    log::debug!(
        "parsed {} notes in {} measures ({} warnings)",
        measures.closed.len(),
        measures.measure,
        warnings.len()
    );

    NotesOutput {
        notes: measures.closed,
        measures: measures.measure,
        warnings,
    }
}

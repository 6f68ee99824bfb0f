//! Prelude module for the crate.
//!
//! Re-exports the types of a whole conversion, so `use sm2fnf::prelude::*;` is enough to go from a
//! [`Simfile`] to [`FnfChart`]s.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{ToAriadne, collect_note_reports, emit_note_warnings};

pub use crate::{
    chart::{ChartBundle, ChartCatalog, ChartInfo, TimedNote},
    convert::{
        ConversionRequest, ConvertConfig, ConvertError, OutputTier, SidePair, TierAssignments,
        convert_pair,
    },
    diagnostics::SimpleSource,
    fnf::{FnfChart, FnfNote, FnfSection, FnfSong, display_song_name},
    mixin::SourceRangeMixin,
    notes::{
        NoteEvent, NoteKind, NotesOutput, ParseWarning, ParseWarningWithRange, parse_notes_field,
    },
    simfile::{
        Difficulty, Simfile, SimfileChart, SimfileKind, SongHeader, TimingTags,
        select::{ChartLookupError, ChartQuery, find_chart},
    },
    timing::{TimingError, TimingFields, TimingTimeline},
};

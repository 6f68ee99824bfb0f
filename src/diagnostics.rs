//! Fancy diagnostics support using `ariadne`.
//!
//! Note field warnings carry the byte range of the raw `#NOTES` text they were found at. This module
//! turns them into `ariadne::Report`s, and ariadne works out rows and columns from those ranges.
//!
//! # Usage Example
//!
//! ```rust
//! # #[cfg(feature = "diagnostics")]
//! # {
//! use sm2fnf::{diagnostics::emit_note_warnings, notes::parse_notes_field};
//!
//! let notes = "1000\n0x00\n,\n0100\n;";
//! let output = parse_notes_field(notes);
//!
//! emit_note_warnings("Hard", notes, &output.warnings);
//! # }
//! ```

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

/// Simple source container that holds a name and the source text.
///
/// ```rust
/// use sm2fnf::diagnostics::SimpleSource;
///
/// let source = SimpleSource::new("Challenge", "1000\n;");
/// assert_eq!(source.name(), "Challenge");
/// assert_eq!(source.text(), "1000\n;");
/// ```
pub struct SimpleSource<'a> {
    /// Name shown in reports, such as the chart slot.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned warnings to `ariadne::Report`.
#[cfg(feature = "diagnostics")]
pub trait ToAriadne {
    /// Convert the warning to an ariadne Report. `src` supplies the name, ariadne handles row/column calculation.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

/// Renders every note field warning to stderr.
///
/// # Parameters
/// * `name` - Name shown in the reports, such as the chart slot
/// * `source` - The raw `#NOTES` text the warnings were found in
/// * `warnings` - Warnings to display
#[cfg(feature = "diagnostics")]
pub fn emit_note_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a crate::notes::ParseWarningWithRange>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for w in warnings {
        let report = w.to_report(&simple);
        let _ = report.eprint((name.to_string(), ariadne_source.clone()));
    }
}

/// Collect `ariadne::Report` instances for note field warnings without printing.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn collect_note_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a crate::notes::ParseWarningWithRange>,
) -> Vec<Report<'a, (String, std::ops::Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings.into_iter().map(|w| w.to_report(&simple)).collect()
}

//! Attaching source spans to values.
//!
//! [`SourceRangeMixin`] wraps a value together with the byte range of the raw note text it was found in,
//! so warnings can point back at the offending row.

/// A value tagged with the byte range `[start, end)` of the source text it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRangeMixin<T> {
    content: T,
    start: usize,
    end: usize,
}

impl<T> SourceRangeMixin<T> {
    /// Tags `content` with the span `[start, end)`.
    #[must_use]
    pub const fn new(content: T, start: usize, end: usize) -> Self {
        Self {
            content,
            start,
            end,
        }
    }

    /// Returns the wrapped content.
    #[must_use]
    pub const fn content(&self) -> &T {
        &self.content
    }

    /// Returns the span as a range usable for slicing the source.
    #[must_use]
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl<T: std::fmt::Display> std::fmt::Display for SourceRangeMixin<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at indices [{}, {})",
            self.content, self.start, self.end
        )
    }
}

impl<T> From<(T, std::ops::Range<usize>)> for SourceRangeMixin<T> {
    fn from((content, range): (T, std::ops::Range<usize>)) -> Self {
        Self::new(content, range.start, range.end)
    }
}

impl<T: std::error::Error + 'static> std::error::Error for SourceRangeMixin<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_accessors() {
        let tagged = SourceRangeMixin::from(("row", 4..9));
        assert_eq!(tagged, SourceRangeMixin::new("row", 4, 9));
        assert_eq!(tagged.range(), 4..9);
        assert_eq!(*tagged.content(), "row");
        assert_eq!(tagged.to_string(), "row at indices [4, 9)");
    }
}

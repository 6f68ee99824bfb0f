/// A line-by-line cursor over the note field, remembering where every line starts.
pub(crate) struct LineCursor<'a> {
    /// The line position, starts with 1.
    line: usize,
    /// The index position.
    index: usize,
    /// The source str.
    source: &'a str,
}

/// One line taken out of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    /// The line position, starts with 1.
    pub line: usize,
    /// Byte index of the first character of `text` in the whole source.
    pub start: usize,
    /// The line without its terminator (`\n` or `\r\n`).
    pub text: &'a str,
}

impl<'a> LineCursor<'a> {
    pub(crate) const fn new(source: &'a str) -> Self {
        Self {
            line: 1,
            index: 0,
            source,
        }
    }

    pub(crate) const fn is_end(&self) -> bool {
        self.index >= self.source.len()
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = SourceLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_end() {
            return None;
        }
        let rest = self.source.get(self.index..)?;
        let (raw, advance) = rest
            .split_once('\n')
            .map_or((rest, rest.len()), |(line, _)| (line, line.len() + 1));
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        let taken = SourceLine {
            line: self.line,
            start: self.index,
            text,
        };
        self.index += advance;
        self.line += 1;
        Some(taken)
    }
}

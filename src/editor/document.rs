use super::line::AttrLine;

/// The lines being edited.
///
/// A document is never empty: clearing it leaves a single empty line.
/// Every operation takes display columns and converts them to byte
/// offsets internally, so callers never deal with encoded lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<AttrLine>,
}

impl Document {
    /// Create a document holding one empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![AttrLine::default()],
        }
    }

    /// Create a document from text, one line per `\n`.
    ///
    /// A trailing newline produces a trailing empty line so that
    /// [`Document::text`] returns the input unchanged.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| AttrLine::new(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        Self { lines }
    }

    /// Total number of lines (always at least one).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by row.
    pub fn line(&self, row: usize) -> Option<&AttrLine> {
        self.lines.get(row)
    }

    pub fn lines(&self) -> &[AttrLine] {
        &self.lines
    }

    pub(crate) fn lines_mut(&mut self) -> &mut [AttrLine] {
        &mut self.lines
    }

    /// Display width of a row, zero for rows past the end.
    pub fn column_width(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, AttrLine::column_width)
    }

    /// The full text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(AttrLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Insert text at a column and return the position just past it.
    ///
    /// Newlines in `text` open new rows; the remainder of the original
    /// row follows the last inserted segment.
    pub fn insert(&mut self, row: usize, column: usize, text: &str) -> (usize, usize) {
        let Some(line) = self.lines.get_mut(row) else {
            return (row, column);
        };
        let at = line.column_to_byte(column);
        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or_default();
        line.insert(at, first);
        let mut end_row = row;
        let mut end_byte = at + first.len();

        for segment in segments {
            let rest = self.lines[end_row].split_off(end_byte);
            end_row += 1;
            let mut next = AttrLine::new(segment);
            end_byte = next.len();
            next.append(rest);
            self.lines.insert(end_row, next);
        }

        let end_line = &self.lines[end_row];
        let end_column = super::column::column_width(&end_line.text()[..end_byte]);
        (end_row, end_column)
    }

    /// Erase the columns `start..end` of a row and return the removed text.
    pub fn erase(&mut self, row: usize, start: usize, end: usize) -> String {
        let Some(line) = self.lines.get_mut(row) else {
            return String::new();
        };
        let from = line.column_to_byte(start);
        let to = line.column_to_byte(end);
        if from >= to {
            return String::new();
        }
        line.erase(from..to)
    }

    /// Split a row at a column; the remainder becomes row `row + 1`.
    pub fn split(&mut self, row: usize, column: usize) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let at = line.column_to_byte(column);
        let rest = line.split_off(at);
        self.lines.insert(row + 1, rest);
    }

    /// Merge row `row + 1` onto the end of `row`.
    ///
    /// Returns `false` when there is no following row.
    pub fn join(&mut self, row: usize) -> bool {
        if row + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(row + 1);
        self.lines[row].append(next);
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

use std::{borrow::Cow, fmt::Write};

const CELL_PADDING: usize = 1;

/// Builds a pipe-delimited table for terminal output.
#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.as_ref().iter().enumerate().take(col_count) {
                col_widths[i] = col_widths[i].max(display_width(cell));
            }
        }

        let mut table = String::with_capacity(256);
        self.write_line(&mut table, self.headers, &col_widths);

        table.push('|');
        for width in &col_widths {
            table.push_str(&"-".repeat(width + CELL_PADDING * 2));
            table.push('|');
        }
        table.push('\n');

        for row in &self.rows {
            self.write_line(&mut table, row.as_ref(), &col_widths);
        }

        table
    }

    fn write_line(&self, out: &mut String, cells: &[Cow<'_, str>], col_widths: &[usize]) {
        out.push('|');
        for (i, width) in col_widths.iter().enumerate() {
            let cell = cells.get(i).map(|c| c.as_ref()).unwrap_or("");
            let alignment = self.alignments.get(i).copied().unwrap_or_default();
            let (left, right) = padding(*width, display_width(cell), alignment);
            let pad = " ".repeat(CELL_PADDING);
            let _ = write!(
                out,
                "{pad}{}{cell}{}{pad}|",
                " ".repeat(left),
                " ".repeat(right)
            );
        }
        out.push('\n');
    }
}

fn padding(width: usize, text_width: usize, alignment: Alignment) -> (usize, usize) {
    let free = width.saturating_sub(text_width);
    match alignment {
        Alignment::Left => (0, free),
        Alignment::Center => (free / 2, free - free / 2),
        Alignment::Right => (free, 0),
    }
}

/// Terminal column count of `text`. Thai combining marks take no column and
/// CJK / fullwidth characters take two.
fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

fn char_width(c: char) -> usize {
    match c as u32 {
        0x0E31 | 0x0E34..=0x0E3A | 0x0E47..=0x0E4E => 0,
        0x0300..=0x036F | 0x200B..=0x200F => 0,
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFF00..=0xFF60 => {
            2
        }
        _ => 1,
    }
}

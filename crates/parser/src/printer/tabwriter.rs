//! Elastic tab stops for printer output.
//!
//! The printer separates alignment cells with `\t` (a hard cell that is
//! never discarded) or `\v` (a soft cell) and ends a line with `\n`, or with
//! `\f` to also close the current alignment section. Text that must stay in
//! one piece (literals, comments) is wrapped in [`ESCAPE`] bytes.
//!
//! Columns are laid out the way `text/tabwriter` does with a minimum width of
//! 0, tab width 8, padding 1, leading empty cells indented with tabs and
//! empty soft columns discarded. A trimming pass then drops the escape bytes
//! and trailing blanks.

use crate::error::EmitError;

pub(crate) const ESCAPE: u8 = 0xff;

const TAB_WIDTH: usize = 8;
const PADDING: usize = 1;

#[derive(Debug, Clone, Copy)]
struct Cell {
    start: usize,
    end: usize,
    /// Display width, escape bytes excluded.
    width: usize,
    /// Terminated by `\t` rather than `\v`.
    htab: bool,
}

impl Cell {
    fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[inline]
fn counts_as_char(b: u8) -> bool {
    // UTF-8 continuation bytes belong to the char that started before them.
    b & 0xc0 != 0x80 && b != ESCAPE
}

/// Aligns the cells of `buf`, then strips escapes and trailing blanks.
pub(crate) fn finish(buf: &[u8]) -> Result<String, EmitError> {
    let aligned = align(buf)?;
    let trimmed = trim(&aligned)?;
    String::from_utf8(trimmed).map_err(|_| EmitError::InvalidUtf8)
}

fn align(buf: &[u8]) -> Result<Vec<u8>, EmitError> {
    let mut lines: Vec<Vec<Cell>> = vec![Vec::new()];
    // Index of the first line of every section after the first.
    let mut sections = Vec::new();
    let mut cell_start = 0;
    let mut width = 0;
    let mut in_escape = false;

    for (i, &b) in buf.iter().enumerate() {
        if in_escape {
            if b == ESCAPE {
                in_escape = false;
            } else if counts_as_char(b) {
                width += 1;
            }
            continue;
        }
        match b {
            b'\t' | b'\x0b' | b'\n' | b'\x0c' => {
                let cell = Cell {
                    start: cell_start,
                    end: i,
                    width,
                    htab: b == b'\t',
                };
                if let Some(line) = lines.last_mut() {
                    line.push(cell);
                }
                cell_start = i + 1;
                width = 0;
                if b == b'\n' || b == b'\x0c' {
                    lines.push(Vec::new());
                    if b == b'\x0c' {
                        sections.push(lines.len() - 1);
                    }
                }
            }
            ESCAPE => in_escape = true,
            _ if counts_as_char(b) => width += 1,
            _ => {}
        }
    }
    if in_escape {
        return Err(EmitError::UnbalancedEscape);
    }
    if cell_start < buf.len() {
        if let Some(line) = lines.last_mut() {
            line.push(Cell {
                start: cell_start,
                end: buf.len(),
                width,
                htab: false,
            });
        }
    }

    let mut aligner = Aligner {
        buf,
        lines: &lines,
        widths: Vec::new(),
        out: Vec::with_capacity(buf.len() + buf.len() / 4),
    };
    let mut line0 = 0;
    for end in sections.into_iter().chain(std::iter::once(lines.len())) {
        aligner.format(line0, end);
        line0 = end;
    }
    Ok(aligner.out)
}

struct Aligner<'a> {
    buf: &'a [u8],
    lines: &'a [Vec<Cell>],
    widths: Vec<usize>,
    out: Vec<u8>,
}

impl Aligner<'_> {
    /// Lays out lines `line0..line1` given the widths of every column to the
    /// left of `self.widths.len()`.
    fn format(&mut self, mut line0: usize, line1: usize) {
        let column = self.widths.len();
        let mut this = line0;
        while this < line1 {
            // The last cell of a line is not part of any column.
            if column + 1 >= self.lines[this].len() {
                this += 1;
                continue;
            }

            self.write_lines(line0, this);
            line0 = this;

            let mut width = 0;
            let mut discardable = true;
            while this < line1 {
                let line = &self.lines[this];
                if column + 1 >= line.len() {
                    break;
                }
                let cell = line[column];
                width = width.max(cell.width + PADDING);
                if cell.width > 0 || cell.htab {
                    discardable = false;
                }
                this += 1;
            }
            if discardable {
                width = 0;
            }

            self.widths.push(width);
            self.format(line0, this);
            self.widths.pop();
            line0 = this;
        }
        self.write_lines(line0, line1);
    }

    fn write_lines(&mut self, line0: usize, line1: usize) {
        for i in line0..line1 {
            let mut use_tabs = true;
            for (j, cell) in self.lines[i].iter().enumerate() {
                let col_width = self.widths.get(j).copied();
                if cell.is_empty() {
                    if let Some(cw) = col_width {
                        self.pad(cell.width, cw, use_tabs);
                    }
                } else {
                    use_tabs = false;
                    self.out.extend_from_slice(&self.buf[cell.start..cell.end]);
                    if let Some(cw) = col_width {
                        self.pad(cell.width, cw, false);
                    }
                }
            }
            if i + 1 < self.lines.len() {
                self.out.push(b'\n');
            }
        }
    }

    fn pad(&mut self, text_width: usize, cell_width: usize, use_tabs: bool) {
        if use_tabs {
            let cell_width = cell_width.div_ceil(TAB_WIDTH) * TAB_WIDTH;
            let n = cell_width.saturating_sub(text_width);
            let tabs = n.div_ceil(TAB_WIDTH);
            self.out.extend(std::iter::repeat_n(b'\t', tabs));
        } else {
            let n = cell_width.saturating_sub(text_width);
            self.out.extend(std::iter::repeat_n(b' ', n));
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TrimState {
    Space,
    Escape,
    Text,
}

/// Removes escape bytes and blanks before line ends; `\v` becomes `\t` and
/// `\f` becomes `\n`. Escaped text passes through untouched.
pub(super) fn trim(data: &[u8]) -> Result<Vec<u8>, EmitError> {
    let mut out = Vec::with_capacity(data.len());
    let mut space: Vec<u8> = Vec::new();
    let mut state = TrimState::Space;
    let mut m = 0;

    for (n, &b) in data.iter().enumerate() {
        let b = if b == b'\x0b' { b'\t' } else { b };
        match state {
            TrimState::Space => match b {
                b'\t' | b' ' => space.push(b),
                b'\n' | b'\x0c' => {
                    space.clear();
                    out.push(b'\n');
                }
                ESCAPE => {
                    out.append(&mut space);
                    state = TrimState::Escape;
                    m = n + 1;
                }
                _ => {
                    out.append(&mut space);
                    state = TrimState::Text;
                    m = n;
                }
            },
            TrimState::Escape => {
                if b == ESCAPE {
                    out.extend_from_slice(&data[m..n]);
                    space.clear();
                    state = TrimState::Space;
                }
            }
            TrimState::Text => match b {
                b'\t' | b' ' => {
                    out.extend_from_slice(&data[m..n]);
                    space.clear();
                    space.push(b);
                    state = TrimState::Space;
                }
                b'\n' | b'\x0c' => {
                    out.extend_from_slice(&data[m..n]);
                    space.clear();
                    out.push(b'\n');
                    state = TrimState::Space;
                }
                ESCAPE => {
                    out.extend_from_slice(&data[m..n]);
                    state = TrimState::Escape;
                    m = n + 1;
                }
                _ => {}
            },
        }
    }
    match state {
        TrimState::Escape => Err(EmitError::UnbalancedEscape),
        TrimState::Text => {
            out.extend_from_slice(&data[m..]);
            Ok(out)
        }
        TrimState::Space => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(input: &str) -> String {
        finish(input.as_bytes()).unwrap()
    }

    #[test]
    fn soft_cells_align_with_spaces() {
        assert_eq!(run("x\x0bint\nlong\x0bstring\n"), "x    int\nlong string\n");
    }

    #[test]
    fn leading_hard_cells_become_tabs() {
        assert_eq!(run("\tx\n\t\ty\n"), "\tx\n\t\ty\n");
    }

    #[test]
    fn formfeed_ends_alignment_section() {
        assert_eq!(run("a\x0bb\x0cxyz\x0bc\n"), "a b\nxyz c\n");
        assert_eq!(run("a\x0bb\nxyz\x0bc\n"), "a   b\nxyz c\n");
    }

    #[test]
    fn empty_soft_column_is_discarded() {
        assert_eq!(run("\x0b\x0bx\n"), "x\n");
    }

    #[test]
    fn escaped_text_is_one_cell() {
        let input = b"\xffa\tb\xff\x0bc\n";
        assert_eq!(finish(input).unwrap(), "a\tb c\n");
    }

    #[test]
    fn trailing_blanks_are_removed() {
        assert_eq!(run("a \t\nb\n"), "a\nb\n");
    }

    #[test]
    fn unbalanced_escape_is_an_error() {
        assert_eq!(finish(b"a\xffb\n"), Err(EmitError::UnbalancedEscape));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        assert_eq!(finish(b"\xc3\n"), Err(EmitError::InvalidUtf8));
    }
}

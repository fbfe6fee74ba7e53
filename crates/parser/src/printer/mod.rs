//! # Canonical printer
//!
//! Renders a [`SourceUnit`] back to gofmt-style text. The layout rules are
//! those of the Go toolchain printer: the tree drives token order, while the
//! source line of every node decides where line breaks go, so a file that
//! is already canonical prints back byte for byte.
//!
//! Printing happens in two stages. The [`Printer`] walks the tree and
//! produces a byte stream where whitespace is still symbolic (`\v` cell
//! separators, `\f` section breaks, escaped literals); the
//! [`tabwriter`] stage then computes column widths and strips the markers.
//!
//! Comments are not attached to nodes. Every comment of the file sits in
//! one ordered list and is written out as soon as the printer reaches a
//! token positioned after it.

mod decl;
mod expr;
mod stmt;
mod tabwriter;

use std::collections::HashMap;

use crate::SourceUnit;
use crate::ast::*;
use crate::error::EmitError;
use tabwriter::ESCAPE;

const MAX_NEWLINES: i64 = 2;
/// Larger than any line or offset of a real file.
const INFINITY: i64 = 1 << 30;

const NO_EXTRA_BLANK: u8 = 1;
const NO_EXTRA_LINEBREAK: u8 = 2;

/// Prints a whole file.
pub fn print_unit(unit: &SourceUnit) -> Result<String, EmitError> {
    let mut p = Printer::new(unit, Mode::Full);
    p.file();
    p.finish();
    tabwriter::finish(&p.output)
}

/// Canonical text of a type: no comments, no layout taken from the source.
///
/// Two types with the same text are interchangeable as far as grouping of
/// parameters is concerned.
pub fn type_text(unit: &SourceUnit, ty: TypeId) -> Result<String, EmitError> {
    let mut p = Printer::new(unit, Mode::Bare);
    p.typ(ty);
    p.finish();
    tabwriter::finish(&p.output)
}

/// Pending whitespace, kept symbolic until the next token is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ws {
    Ignore,
    Blank,
    Vtab,
    Newline,
    Formfeed,
    Indent,
    Unindent,
}

impl Ws {
    fn byte(self) -> u8 {
        match self {
            Ws::Blank => b' ',
            Ws::Vtab => b'\x0b',
            Ws::Newline => b'\n',
            Ws::Formfeed => b'\x0c',
            Ws::Ignore | Ws::Indent | Ws::Unindent => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Keyword(&'static str),
    Op(&'static str),
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Period,
    Semicolon,
    Colon,
    Ellipsis,
    Eof,
}

impl Token {
    fn text(self) -> &'static str {
        match self {
            Token::Keyword(s) | Token::Op(s) => s,
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrack => "[",
            Token::RBrack => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Period => ".",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Ellipsis => "...",
            Token::Eof => "",
        }
    }

    /// A line break after this token would end the statement.
    fn implies_semi(self) -> bool {
        match self {
            Token::Keyword(kw) => matches!(kw, "break" | "continue" | "fallthrough" | "return"),
            Token::Op(op) => matches!(op, "++" | "--"),
            Token::RParen | Token::RBrack | Token::RBrace => true,
            _ => false,
        }
    }
}

/// What was written last; `Whitespace` after any whitespace item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastTok {
    Whitespace,
    Ident,
    Lit(BasicLitKind),
    Tok(Token),
}

/// Whether `next` glued to the previous token would lex differently.
fn may_combine(prev: LastTok, next: u8) -> bool {
    match prev {
        LastTok::Lit(BasicLitKind::Int) => next == b'.',
        LastTok::Tok(Token::Op("+")) => next == b'+',
        LastTok::Tok(Token::Op("-")) => next == b'-',
        LastTok::Tok(Token::Op("/")) => next == b'*',
        LastTok::Tok(Token::Op("<")) => next == b'-' || next == b'<',
        LastTok::Tok(Token::Op("&")) => next == b'&' || next == b'^',
        _ => false,
    }
}

/// Source or output position; line and column are 1-based, 0 is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Position {
    offset: i64,
    line: i64,
    col: i64,
}

impl Position {
    const INFINITY: Position = Position {
        offset: INFINITY,
        line: INFINITY,
        col: 0,
    };

    const START: Position = Position {
        offset: 0,
        line: 1,
        col: 1,
    };

    fn is_valid(&self) -> bool {
        self.line > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// File output: comments and source positions.
    Full,
    /// Single-line size estimate: source positions, no comments.
    Measure,
    /// Type text: neither comments nor positions.
    Bare,
}

/// Comments that belong together: adjacent, with no token between them,
/// each starting at most one line below the previous one (or on the same
/// line, for comments trailing a token).
#[derive(Debug, Clone, Copy)]
struct CommentGroup {
    first: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy)]
struct CommentCursor {
    /// Next group to load.
    next: usize,
    current: Option<usize>,
    /// Start of the current group, or `INFINITY` when none is left.
    offset: i64,
    /// The current group spans lines or contains a line comment.
    newline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NodeKey {
    Expr(ExprId),
    Stmt(StmtId),
    Type(TypeId),
    /// An interface method measured as `func(...)...`.
    Method(SignatureId),
}

/// An element of a comma-separated list.
#[derive(Debug, Clone, Copy)]
enum Elem {
    Expr(ExprId),
    Ident(IdentName),
    Type(TypeId),
}

pub(crate) struct Printer<'a> {
    unit: &'a SourceUnit,
    arena: &'a AstArena,
    mode: Mode,
    output: Vec<u8>,

    indent: i64,
    /// Nesting depth of composite literals.
    level: i32,
    flags: u8,
    /// Set after text that contained a line break: the next line break
    /// must end the alignment section.
    end_alignment: bool,
    implied_semi: bool,
    last_tok: LastTok,
    /// `(` or `[` if that was the last token before any other token.
    prev_open: Option<Token>,
    wsbuf: Vec<Ws>,

    /// Estimated position in the source of the next item.
    pos: Position,
    /// Position in the output.
    out: Position,
    /// `pos` after the last string written.
    last: Position,
    /// Slot receiving the output line of the next token.
    line_ptr: Option<usize>,
    line_slots: Vec<i64>,

    groups: Vec<CommentGroup>,
    cursor: CommentCursor,

    sizes: HashMap<NodeKey, i64>,
}

impl<'a> Printer<'a> {
    fn new(unit: &'a SourceUnit, mode: Mode) -> Self {
        let groups = if mode == Mode::Full {
            group_comments(unit)
        } else {
            Vec::new()
        };
        let mut p = Self {
            unit,
            arena: &unit.arena,
            mode,
            output: Vec::with_capacity(if mode == Mode::Full { unit.src.len() } else { 64 }),
            indent: 0,
            level: 0,
            flags: 0,
            end_alignment: false,
            implied_semi: false,
            last_tok: LastTok::Whitespace,
            prev_open: None,
            wsbuf: Vec::with_capacity(16),
            pos: Position::START,
            out: Position::START,
            last: Position::default(),
            line_ptr: None,
            line_slots: Vec::new(),
            groups,
            cursor: CommentCursor {
                next: 0,
                current: None,
                offset: INFINITY,
                newline: false,
            },
            sizes: HashMap::new(),
        };
        p.next_comment();
        p
    }

    /// Writes out pending comments and whitespace.
    fn finish(&mut self) {
        self.implied_semi = false;
        self.flush(Position::INFINITY, Token::Eof);
    }

    // -------------------------------------------------------------------
    // Positions

    fn pos_for(&self, offset: u32) -> Position {
        if self.mode == Mode::Bare {
            return Position::default();
        }
        let (line, col) = self.unit.lines.line_col(offset);
        Position {
            offset: i64::from(offset),
            line: i64::from(line),
            col: i64::from(col),
        }
    }

    /// Line of `offset`, 0 when unknown.
    fn line_for(&self, offset: Option<u32>) -> i64 {
        match offset {
            Some(offset) if self.mode != Mode::Bare => i64::from(self.unit.line(offset)),
            _ => 0,
        }
    }

    fn set_pos(&mut self, offset: Option<u32>) {
        if let Some(offset) = offset {
            if self.mode != Mode::Bare {
                self.pos = self.pos_for(offset);
            }
        }
    }

    /// Output columns between `start_col` and now, if `start` is on the
    /// current source line.
    fn distance_from(&self, start: u32, start_col: i64) -> i64 {
        if self.pos.is_valid() && self.line_for(Some(start)) == self.pos.line {
            self.out.col - start_col
        } else {
            INFINITY
        }
    }

    fn new_line_slot(&mut self) -> usize {
        self.line_slots.push(0);
        self.line_slots.len() - 1
    }

    fn free_line_slot(&mut self) {
        self.line_slots.pop();
    }

    /// The output line of the next token goes to `slot`.
    fn record_line(&mut self, slot: usize) {
        self.line_ptr = Some(slot);
    }

    fn lines_from(&self, slot: usize) -> i64 {
        self.out.line - self.line_slots[slot]
    }

    // -------------------------------------------------------------------
    // Items

    fn track_open(&mut self) {
        match self.last_tok {
            LastTok::Whitespace => {}
            LastTok::Tok(tok @ (Token::LParen | Token::LBrack)) => self.prev_open = Some(tok),
            _ => self.prev_open = None,
        }
    }

    fn ws(&mut self, ws: Ws) {
        self.track_open();
        if ws == Ws::Ignore {
            return;
        }
        self.wsbuf.push(ws);
        if matches!(ws, Ws::Newline | Ws::Formfeed) {
            self.implied_semi = false;
        }
        self.last_tok = LastTok::Whitespace;
    }

    fn toggle(&mut self, flags: u8) {
        self.track_open();
        self.flags ^= flags;
    }

    fn token(&mut self, tok: Token) {
        self.track_open();
        let text = tok.text();
        if text.bytes().next().is_some_and(|b| may_combine(self.last_tok, b)) {
            self.wsbuf.clear();
            self.wsbuf.push(Ws::Blank);
        }
        self.last_tok = LastTok::Tok(tok);
        self.emit(text, false, tok.implies_semi());
    }

    fn keyword(&mut self, kw: &'static str) {
        self.token(Token::Keyword(kw));
    }

    fn op(&mut self, op: &'static str) {
        self.token(Token::Op(op));
    }

    fn name(&mut self, name: &str) {
        self.track_open();
        self.last_tok = LastTok::Ident;
        self.emit(name, false, true);
    }

    /// Identifier at its source position.
    fn ident(&mut self, ident: IdentName) {
        self.set_pos(Some(ident.pos.start));
        let name = self.unit.name(ident);
        self.name(name);
    }

    fn basic_lit(&mut self, lit: BasicLit) {
        self.set_pos(Some(lit.span.start));
        self.track_open();
        self.last_tok = LastTok::Lit(lit.kind);
        let text = self.unit.text(lit.span);
        if lit.kind == BasicLitKind::RawString && text.contains('\r') {
            let text = text.replace('\r', "");
            self.emit(&text, true, true);
        } else {
            self.emit(text, true, true);
        }
    }

    fn emit(&mut self, data: &str, is_lit: bool, mut implied_semi: bool) {
        let next = self.pos;
        let (wrote_newline, dropped_ff) = self.flush(next, self.tok_kind());

        // Blank lines from the source between comments and the token.
        if !self.implied_semi {
            let mut n = nlimit(next.line - self.pos.line);
            if wrote_newline && n == MAX_NEWLINES {
                n = MAX_NEWLINES - 1;
            }
            if n > 0 {
                let ch = if dropped_ff { b'\x0c' } else { b'\n' };
                self.write_byte(ch, n);
                implied_semi = false;
            }
        }

        if let Some(slot) = self.line_ptr.take() {
            if let Some(line) = self.line_slots.get_mut(slot) {
                *line = self.out.line;
            }
        }

        self.write_string(next, data, is_lit);
        self.implied_semi = implied_semi;
    }

    fn tok_kind(&self) -> Token {
        match self.last_tok {
            LastTok::Tok(tok) => tok,
            _ => Token::Keyword(""),
        }
    }

    fn flush(&mut self, next: Position, tok: Token) -> (bool, bool) {
        if self.comment_before(next) {
            self.intersperse_comments(next, tok)
        } else {
            self.write_whitespace(self.wsbuf.len());
            (false, false)
        }
    }

    /// Emits up to two line breaks towards `line`, at least `min`.
    ///
    /// Returns the number of breaks; a new section counts as two.
    fn linebreak(&mut self, line: i64, min: i64, ws: Ws, new_section: bool) -> i64 {
        let mut n = nlimit(line - self.pos.line).max(min);
        let mut nbreaks = 0;
        if n > 0 {
            self.ws(ws);
            if new_section {
                self.ws(Ws::Formfeed);
                n -= 1;
                nbreaks = 2;
            }
            nbreaks += n;
            for _ in 0..n {
                self.ws(Ws::Newline);
            }
        }
        nbreaks
    }

    // -------------------------------------------------------------------
    // Output

    fn write_indent(&mut self) {
        let n = self.indent.max(0);
        self.output.extend(std::iter::repeat_n(b'\t', n as usize));
        self.pos.offset += n;
        self.pos.col += n;
        self.out.col += n;
    }

    fn write_byte(&mut self, ch: u8, n: i64) {
        let mut ch = ch;
        if self.end_alignment {
            if ch == b'\t' || ch == b'\x0b' {
                ch = b' ';
            } else if ch == b'\n' || ch == b'\x0c' {
                ch = b'\x0c';
                self.end_alignment = false;
            }
        }

        if self.out.col == 1 {
            self.write_indent();
        }
        self.output.extend(std::iter::repeat_n(ch, n.max(0) as usize));

        self.pos.offset += n;
        if ch == b'\n' || ch == b'\x0c' {
            self.pos.line += n;
            self.out.line += n;
            self.pos.col = 1;
            self.out.col = 1;
            return;
        }
        self.pos.col += n;
        self.out.col += n;
    }

    fn write_string(&mut self, pos: Position, s: &str, is_lit: bool) {
        if self.out.col == 1 {
            self.write_indent();
        }
        if pos.is_valid() {
            self.pos = pos;
        }

        if is_lit {
            self.output.push(ESCAPE);
        }
        self.output.extend_from_slice(s.as_bytes());

        let mut nlines = 0;
        let mut last_nl = 0;
        for (i, b) in s.bytes().enumerate() {
            if b == b'\n' || b == b'\x0c' {
                nlines += 1;
                last_nl = i;
                self.end_alignment = true;
            }
        }
        let len = s.len() as i64;
        self.pos.offset += len;
        if nlines > 0 {
            self.pos.line += nlines;
            self.out.line += nlines;
            let col = len - last_nl as i64;
            self.pos.col = col;
            self.out.col = col;
        } else {
            self.pos.col += len;
            self.out.col += len;
        }

        if is_lit {
            self.output.push(ESCAPE);
        }
        self.last = self.pos;
    }

    fn write_whitespace(&mut self, n: usize) {
        let n = n.min(self.wsbuf.len());
        let mut i = 0;
        while i < n {
            match self.wsbuf[i] {
                Ws::Ignore => {}
                Ws::Indent => self.indent += 1,
                Ws::Unindent => self.indent = (self.indent - 1).max(0),
                Ws::Newline | Ws::Formfeed if i + 1 < n && self.wsbuf[i + 1] == Ws::Unindent => {
                    // Unindent first, so a label lands in the outer column.
                    self.wsbuf[i] = Ws::Unindent;
                    self.wsbuf[i + 1] = Ws::Formfeed;
                    continue;
                }
                ws => self.write_byte(ws.byte(), 1),
            }
            i += 1;
        }
        self.wsbuf.drain(..n);
    }

    fn contains_linebreak(&self) -> bool {
        self.wsbuf
            .iter()
            .any(|ws| matches!(ws, Ws::Newline | Ws::Formfeed))
    }

    // -------------------------------------------------------------------
    // Comments

    fn next_comment(&mut self) {
        match self.groups.get(self.cursor.next).copied() {
            Some(group) => {
                self.cursor.current = Some(self.cursor.next);
                self.cursor.next += 1;
                self.cursor.offset = i64::from(self.unit.comments[group.first].span.start);
                self.cursor.newline = self.group_has_newline(group);
            }
            None => {
                self.cursor.current = None;
                self.cursor.offset = INFINITY;
            }
        }
    }

    fn group_has_newline(&self, group: CommentGroup) -> bool {
        let comments = &self.unit.comments[group.first..group.end];
        let first_line = self.unit.line(comments[0].span.start);
        comments.iter().enumerate().any(|(i, c)| {
            (i > 0 && self.unit.line(c.span.start) != first_line)
                || c.kind == CommentKind::Line
                || self.unit.text(c.span).contains('\n')
        })
    }

    /// The current comment group comes before `next` and printing it would
    /// not break a statement in two.
    fn comment_before(&self, next: Position) -> bool {
        self.cursor.offset < next.offset && (!self.implied_semi || !self.cursor.newline)
    }

    /// Length of the comment text before `next`.
    fn comment_size_before(&mut self, next: Position) -> i64 {
        let saved = self.cursor;
        let mut size = 0;
        while self.comment_before(next) {
            let Some(g) = self.cursor.current else { break };
            let group = self.groups[g];
            size += self.unit.comments[group.first..group.end]
                .iter()
                .map(|c| i64::from(c.span.len()))
                .sum::<i64>();
            self.next_comment();
        }
        self.cursor = saved;
        size
    }

    fn intersperse_comments(&mut self, next: Position, tok: Token) -> (bool, bool) {
        let mut last: Option<Comment> = None;
        while self.comment_before(next) {
            let Some(g) = self.cursor.current else { break };
            let group = self.groups[g];
            for idx in group.first..group.end {
                let c = self.unit.comments[idx];
                self.write_comment_prefix(self.pos_for(c.span.start), next, last, tok);
                self.write_comment(c);
                last = Some(c);
            }
            self.next_comment();
        }

        let Some(last) = last else {
            return (false, false);
        };
        let mut needs_linebreak = false;
        if self.flags & NO_EXTRA_BLANK == 0
            && last.kind == CommentKind::Block
            && self.line_for(Some(last.span.start)) == next.line
            && tok != Token::Comma
            && (tok != Token::RParen || self.prev_open == Some(Token::LParen))
            && (tok != Token::RBrack || self.prev_open == Some(Token::LBrack))
        {
            if self.contains_linebreak() && self.flags & NO_EXTRA_LINEBREAK == 0 && self.level == 0 {
                needs_linebreak = true;
            } else {
                self.write_byte(b' ', 1);
            }
        }
        if last.kind == CommentKind::Line
            || tok == Token::Eof
            || (tok == Token::RBrace && self.flags & NO_EXTRA_LINEBREAK == 0)
        {
            needs_linebreak = true;
        }
        self.write_comment_suffix(needs_linebreak)
    }

    fn write_comment_prefix(&mut self, pos: Position, next: Position, prev: Option<Comment>, tok: Token) {
        if self.output.is_empty() {
            return;
        }
        let prev_is_line = prev.is_some_and(|c| c.kind == CommentKind::Line);

        if pos.line == self.last.line && !prev_is_line {
            // Same line as the last item: at least one separator.
            let mut has_sep = false;
            if prev.is_none() {
                let mut j = 0;
                for i in 0..self.wsbuf.len() {
                    match self.wsbuf[i] {
                        Ws::Blank => {
                            self.wsbuf[i] = Ws::Ignore;
                            continue;
                        }
                        Ws::Vtab => {
                            has_sep = true;
                            continue;
                        }
                        Ws::Indent => continue,
                        _ => {}
                    }
                    j = i;
                    break;
                }
                self.write_whitespace(j);
            }
            if !has_sep {
                let sep = if pos.line == next.line { b' ' } else { b'\t' };
                self.write_byte(sep, 1);
            }
            return;
        }

        // Different line: at least one line break.
        let mut dropped_linebreak = false;
        let mut j = 0;
        for i in 0..self.wsbuf.len() {
            match self.wsbuf[i] {
                Ws::Blank | Ws::Vtab => {
                    self.wsbuf[i] = Ws::Ignore;
                    continue;
                }
                Ws::Indent => continue,
                Ws::Unindent => {
                    if i + 1 < self.wsbuf.len() && self.wsbuf[i + 1] == Ws::Unindent {
                        continue;
                    }
                    // A comment aligned with the next token belongs to it.
                    if tok != Token::RBrace && pos.col == next.col {
                        continue;
                    }
                }
                Ws::Newline | Ws::Formfeed => {
                    self.wsbuf[i] = Ws::Ignore;
                    dropped_linebreak = prev.is_none();
                }
                Ws::Ignore => {}
            }
            j = i;
            break;
        }
        self.write_whitespace(j);

        let mut n = 0;
        if pos.is_valid() && self.last.is_valid() {
            n = (pos.line - self.last.line).max(0);
        }
        // Keeps the blank line before a package-level doc comment.
        if self.indent == 0 && dropped_linebreak {
            n += 1;
        }
        if n == 0 && prev_is_line {
            n = 1;
        }
        if n > 0 {
            self.write_byte(b'\x0c', nlimit(n));
        }
    }

    fn write_comment(&mut self, comment: Comment) {
        let text = self.unit.text(comment.span);
        let mut pos = self.pos_for(comment.span.start);

        let saved_indent = self.indent;
        if text.starts_with("//line ") && (!pos.is_valid() || pos.col == 1) {
            self.indent = 0;
        }

        if comment.kind == CommentKind::Line {
            self.write_string(pos, text.trim_end(), true);
            self.indent = saved_indent;
            return;
        }

        let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
        if pos.is_valid() && pos.col == 1 && self.indent > 0 {
            for line in lines.iter_mut().skip(1) {
                line.insert_str(0, "   ");
            }
        }
        strip_common_prefix(&mut lines);

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.write_byte(b'\x0c', 1);
                pos = self.pos;
            }
            if !line.is_empty() {
                self.write_string(pos, line.trim_end(), true);
            }
        }
        self.indent = saved_indent;
    }

    fn write_comment_suffix(&mut self, mut needs_linebreak: bool) -> (bool, bool) {
        let mut wrote_newline = false;
        let mut dropped_ff = false;
        for ws in self.wsbuf.iter_mut() {
            match *ws {
                Ws::Blank | Ws::Vtab => *ws = Ws::Ignore,
                Ws::Newline | Ws::Formfeed => {
                    if needs_linebreak {
                        needs_linebreak = false;
                        wrote_newline = true;
                    } else {
                        if *ws == Ws::Formfeed {
                            dropped_ff = true;
                        }
                        *ws = Ws::Ignore;
                    }
                }
                Ws::Indent | Ws::Unindent | Ws::Ignore => {}
            }
        }
        self.write_whitespace(self.wsbuf.len());

        if needs_linebreak {
            self.write_byte(b'\n', 1);
            wrote_newline = true;
        }
        (wrote_newline, dropped_ff)
    }

    /// Index of the comment group holding comment `idx`.
    fn group_of(&self, idx: usize) -> Option<CommentGroup> {
        let g = self.groups.partition_point(|g| g.end <= idx);
        self.groups.get(g).copied().filter(|g| g.first <= idx)
    }

    /// A comment group ends on the line right above `start` and does not
    /// trail the token ending at `prev_end`.
    fn has_doc_comment(&self, prev_end: u32, start: u32) -> bool {
        if self.mode != Mode::Full {
            return false;
        }
        let comments = &self.unit.comments;
        let i = comments.partition_point(|c| c.span.start < start);
        if i == 0 {
            return false;
        }
        let Some(group) = self.group_of(i - 1) else {
            return false;
        };
        let first = comments[group.first];
        let last = comments[group.end - 1];
        first.span.start >= prev_end
            && self.unit.line(last.span.end) + 1 == self.unit.line(start)
            && self.unit.line(first.span.start) != self.unit.line(prev_end)
    }

    /// A comment follows `end` on the same line and nothing but comments
    /// follows it up to the line end.
    fn has_line_comment(&self, end: u32) -> bool {
        if self.mode != Mode::Full {
            return false;
        }
        let src = self.unit.src.as_bytes();
        let comments = &self.unit.comments;
        let mut i = comments.partition_point(|c| c.span.start < end);
        let Some(mut cur) = comments.get(i).copied() else {
            return false;
        };
        let gap = &src[end as usize..cur.span.start as usize];
        if gap.iter().any(|&b| b == b'\n' || !(b.is_ascii_whitespace() || b == b';')) {
            return false;
        }
        loop {
            if cur.kind == CommentKind::Line {
                return true;
            }
            let from = cur.span.end as usize;
            let line_end = memchr::memchr(b'\n', &src[from..]).map_or(src.len(), |k| from + k);
            if src[from..line_end].iter().all(u8::is_ascii_whitespace) {
                return true;
            }
            i += 1;
            match comments.get(i) {
                Some(next)
                    if (next.span.start as usize) < line_end
                        && src[from..next.span.start as usize].iter().all(u8::is_ascii_whitespace) =>
                {
                    cur = *next;
                }
                _ => return false,
            }
        }
    }

    // -------------------------------------------------------------------
    // Sizes

    /// Width of `key` printed on one line, or `max + 1` if it does not fit.
    fn node_size(&mut self, key: NodeKey, max: i64) -> i64 {
        if let Some(&size) = self.sizes.get(&key) {
            return size;
        }
        let mut size = max + 1;
        self.sizes.insert(key, size);

        let mode = if self.mode == Mode::Bare { Mode::Bare } else { Mode::Measure };
        let mut sub = Printer::new(self.unit, mode);
        sub.sizes = std::mem::take(&mut self.sizes);
        match key {
            NodeKey::Expr(x) => sub.expr(x),
            NodeKey::Type(t) => sub.typ(t),
            NodeKey::Stmt(s) => {
                if matches!(sub.arena.stmts[s], Stmt::Labeled { .. }) {
                    sub.indent = 1;
                }
                sub.stmt(s, false);
            }
            NodeKey::Method(sig) => {
                sub.keyword("func");
                sub.signature(sig);
            }
        }
        sub.finish();
        self.sizes = std::mem::take(&mut sub.sizes);

        if let Ok(text) = tabwriter::trim(&sub.output) {
            if !text.contains(&b'\n') && text.len() as i64 <= max {
                size = text.len() as i64;
                self.sizes.insert(key, size);
            }
        }
        size
    }
}

fn nlimit(n: i64) -> i64 {
    n.min(MAX_NEWLINES)
}

/// Groups comments the way the Go parser does.
fn group_comments(unit: &SourceUnit) -> Vec<CommentGroup> {
    let src = unit.src.as_bytes();
    let mut groups: Vec<CommentGroup> = Vec::new();
    let mut slack = 1;
    for (i, c) in unit.comments.iter().enumerate() {
        if let Some(group) = groups.last_mut() {
            let prev = unit.comments[i - 1];
            let between = &src[prev.span.end as usize..c.span.start as usize];
            if between.iter().all(u8::is_ascii_whitespace)
                && unit.line(c.span.start) <= unit.line(prev.span.end) + slack
            {
                group.end = i + 1;
                continue;
            }
        }
        slack = if follows_token_on_line(src, c.span.start as usize) { 0 } else { 1 };
        groups.push(CommentGroup { first: i, end: i + 1 });
    }
    groups
}

fn follows_token_on_line(src: &[u8], start: usize) -> bool {
    src[..start]
        .iter()
        .rev()
        .find(|&&b| !matches!(b, b' ' | b'\t' | b'\r'))
        .is_some_and(|&b| b != b'\n')
}

/// Re-indents the inner lines of a multi-line `/* */` comment relative to
/// its first line.
fn strip_common_prefix(lines: &mut [String]) {
    if lines.len() <= 1 {
        return;
    }
    let last_idx = lines.len() - 1;

    // Common whitespace prefix of the inner non-blank lines; blank lines
    // become empty.
    let mut prefix = String::new();
    let mut prefix_set = false;
    if lines.len() > 2 {
        for line in lines[1..last_idx].iter_mut() {
            if is_blank(line) {
                line.clear();
            } else {
                if !prefix_set {
                    prefix = line.clone();
                    prefix_set = true;
                }
                prefix = common_prefix(&prefix, line).to_owned();
            }
        }
    }
    if !prefix_set {
        let line = &lines[last_idx];
        prefix = common_prefix(line, line).to_owned();
    }

    let mut line_of_stars = false;
    if let Some((before, _)) = prefix.split_once('*') {
        prefix = before.strip_suffix(' ').unwrap_or(before).to_owned();
        line_of_stars = true;
    } else {
        let first = lines[0].as_bytes();
        if is_blank(lines[0].get(2..).unwrap_or("")) {
            // Keep text indented relative to an empty `/*` line.
            let bytes = prefix.as_bytes();
            let mut i = bytes.len();
            let mut n = 0;
            while n < 3 && i > 0 && bytes[i - 1] == b' ' {
                i -= 1;
                n += 1;
            }
            if i == bytes.len() && i > 0 && bytes[i - 1] == b'\t' {
                i -= 1;
            }
            prefix.truncate(i);
        } else {
            // Whitespace after `/*` on the first line counts as part of
            // the indentation of the following lines.
            let mut n = 2;
            while n < first.len() && first[n] <= b' ' {
                n += 1;
            }
            let suffix: Vec<u8> = if n > 2 && first[2] == b'\t' {
                first[2..n].to_vec()
            } else {
                let mut s = vec![b' ', b' '];
                s.extend_from_slice(&first[2..n]);
                s
            };
            if let Some(stripped) = prefix.as_bytes().strip_suffix(suffix.as_slice()) {
                let keep = stripped.len();
                prefix.truncate(keep);
            }
        }
    }

    // A last line holding only `*/` lines up with the opening `/*`.
    let last = &lines[last_idx];
    let before = last.split_once("*/").map_or(last.as_str(), |(b, _)| b);
    if is_blank(before) {
        let closing = if line_of_stars { " */" } else { "*/" };
        lines[last_idx] = format!("{prefix}{closing}");
    } else {
        prefix = common_prefix(&prefix, last).to_owned();
    }

    for line in lines.iter_mut().skip(1) {
        if !line.is_empty() {
            let stripped = line.get(prefix.len()..).unwrap_or("").to_owned();
            *line = stripped;
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.bytes().all(|b| b <= b' ')
}

fn common_prefix<'s>(a: &'s str, b: &str) -> &'s str {
    let n = a
        .bytes()
        .zip(b.bytes())
        .take_while(|&(x, y)| x == y && (x <= b' ' || x == b'*'))
        .count();
    &a[..n]
}

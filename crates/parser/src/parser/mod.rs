//! Recursive-descent parser for Go source files.
//!
//! The parser works over the fully tokenized file (semicolons already
//! inserted) and stops at the first syntax error. Expression/type
//! ambiguities are resolved the way the Go toolchain resolves them:
//! operands may be type literals, parameter entries are grouped after the
//! whole list is read, and `{` after an operand starts a composite literal
//! only outside control clause headers.

mod decl;
mod expr;
mod stmt;
mod types;

use crate::ast::{AstArena, IdentName, Interner, SourceFile, Span};
use crate::error::Diag;
use crate::lexer::{Spanned, Tok};

pub(crate) type PResult<T> = Result<T, Diag>;

const MAX_NESTING: u32 = 512;

pub(crate) struct Parser<'src> {
    toks: Vec<Spanned<'src>>,
    pos: usize,
    prev_end: u32,
    /// < 0 in control clause headers, >= 0 elsewhere.
    expr_lev: i32,
    depth: u32,
    pub(crate) arena: AstArena,
    pub(crate) interner: Interner,
}

impl<'src> Parser<'src> {
    /// `toks` must end with [`Tok::Eof`].
    pub(crate) fn new(toks: Vec<Spanned<'src>>) -> Self {
        debug_assert!(matches!(toks.last(), Some((_, Tok::Eof, _))));
        Self {
            toks,
            pos: 0,
            prev_end: 0,
            expr_lev: 0,
            depth: 0,
            arena: AstArena::default(),
            interner: Interner::new(),
        }
    }

    pub(crate) fn parse(&mut self) -> PResult<SourceFile> {
        self.source_file()
    }

    #[inline]
    fn tok(&self) -> Tok<'src> {
        self.toks[self.pos].1
    }

    #[inline]
    fn peek(&self, n: usize) -> Tok<'src> {
        self.toks.get(self.pos + n).map_or(Tok::Eof, |t| t.1)
    }

    #[inline]
    fn at(&self, tok: Tok<'src>) -> bool {
        self.tok() == tok
    }

    #[inline]
    fn span(&self) -> Span {
        let (start, _, end) = self.toks[self.pos];
        Span::new(start, end)
    }

    #[inline]
    fn start(&self) -> u32 {
        self.toks[self.pos].0 as u32
    }

    fn bump(&mut self) -> Span {
        let span = self.span();
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
        self.prev_end = span.end;
        span
    }

    fn eat(&mut self, tok: Tok<'src>) -> Option<Span> {
        self.at(tok).then(|| self.bump())
    }

    fn expect(&mut self, tok: Tok<'src>) -> PResult<Span> {
        if self.at(tok) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&tok.to_string()))
        }
    }

    /// A statement or declaration ends here: `;`, or nothing before a closer.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.tok() {
            Tok::Semi => {
                self.bump();
                Ok(())
            }
            Tok::RParen | Tok::RBrace | Tok::Eof => Ok(()),
            _ => Err(self.unexpected("`;` or newline")),
        }
    }

    fn unexpected(&self, expected: &str) -> Diag {
        let (start, tok, end) = self.toks[self.pos];
        let found = match tok {
            Tok::Semi if start == end => "newline".to_string(),
            tok => tok.to_string(),
        };
        Diag::parse(self.span(), format!("expected {expected}, found {found}"))
    }

    fn ident(&mut self) -> PResult<IdentName> {
        match self.tok() {
            Tok::Ident(name) => {
                let pos = self.bump();
                Ok(IdentName {
                    sym: self.interner.intern(name),
                    pos,
                })
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn ident_list(&mut self) -> PResult<Vec<IdentName>> {
        let mut names = vec![self.ident()?];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.ident()?);
        }
        Ok(names)
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    fn span_from(&self, start: u32) -> Span {
        Span {
            start,
            end: self.prev_end.max(start),
        }
    }

    /// Runs `f` one nesting level deeper, bounding recursion on
    /// pathological input.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(Diag::parse(self.span(), "nesting too deep"));
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Runs `f` with composite literals of bare type names disabled.
    fn control_clause<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let prev = self.expr_lev;
        self.expr_lev = -1;
        let result = f(self);
        self.expr_lev = prev;
        result
    }

    /// Runs `f` inside brackets, where composite literals are always allowed.
    fn bracketed<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let prev = self.expr_lev;
        self.expr_lev = prev.max(0) + 1;
        let result = f(self);
        self.expr_lev = prev;
        result
    }
}

//! Go source lexer, parser and canonical printer.
//!
//! - The lexer is built on Logos and implements Go semicolon insertion.
//! - The parser is hand-written recursive descent over the token vector and
//!   produces an arena AST ([`ast`]).
//! - The printer ([`printer`]) renders a tree back to gofmt-style text,
//!   keeping every comment of the source.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod lines;
mod parser;
pub mod parser_support;
pub mod printer;
pub mod walk;

pub use error::{Diag, DiagKind, EmitError, ParseFailure};
pub use lexer::Lexer;
pub use lines::LineIndex;
pub use printer::{print_unit, type_text};

use ast::{AstArena, Comment, IdentName, Interner, SourceFile, Span};

/// One parsed file: its text, tree, comments and line table.
#[derive(Debug)]
pub struct SourceUnit {
    pub src: String,
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
    /// Every comment of the file in source order.
    pub comments: Vec<Comment>,
    pub lines: LineIndex,
}

impl SourceUnit {
    /// Source text covered by `span`.
    #[inline]
    pub fn text(&self, span: Span) -> &str {
        &self.src[span.start as usize..span.end as usize]
    }

    #[inline]
    pub fn name(&self, ident: IdentName) -> &str {
        self.interner.resolve(ident.sym)
    }

    /// 1-based source line of a byte offset.
    #[inline]
    pub fn line(&self, offset: u32) -> u32 {
        self.lines.line(offset)
    }
}

/// Parses a whole Go file.
///
/// Any lexical or syntax error fails the parse; the error carries every
/// diagnostic collected up to the first syntax error.
pub fn parse_source(src: &str) -> Result<SourceUnit, ParseFailure> {
    let (toks, comments, mut diags) = lexer::tokenize(src);
    let mut parser = parser::Parser::new(toks);
    match parser.parse() {
        Ok(file) if diags.is_empty() => Ok(SourceUnit {
            src: src.to_owned(),
            arena: parser.arena,
            interner: parser.interner,
            file,
            comments,
            lines: LineIndex::new(src),
        }),
        Ok(_) => Err(ParseFailure { diags }),
        Err(diag) => {
            diags.push(diag);
            Err(ParseFailure { diags })
        }
    }
}

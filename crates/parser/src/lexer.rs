//! Go tokenizer.
//!
//! A logos-generated raw scanner does the matching; [`Lexer`] wraps it to
//! apply Go's automatic semicolon insertion, classify numeric literals,
//! record comments in a side table and collect lexical diagnostics.

use logos::{Lexer as LogosLexer, Logos};
use memchr::{memchr, memmem};
use std::fmt;
use std::ops::Range;

use crate::ast::{Comment, CommentKind, Span};
use crate::error::{Diag, LexError, LexErrorKind};

/// `(start, token, end)` byte positions.
pub type Spanned<'src> = (usize, Tok<'src>, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumKind {
    Int,
    Float,
    Imag,
}

macro_rules! define_tokens {
    ($($variant:ident => $text:tt,)*) => {
        #[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
        #[logos(error = LexErrorKind)]
        #[logos(skip r"[ \t\r]+")]
        enum RawTok {
            #[token("\u{FEFF}")]
            Bom,
            #[token("\n")]
            Newline,
            #[regex(r"//[^\n]*", allow_greedy = true)]
            LineComment,
            #[token("/*", lex_block_comment)]
            BlockComment,
            #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
            Ident,
            #[regex(r"[0-9]|\.[0-9]", lex_number)]
            Number(NumKind),
            #[token("`", lex_raw_string)]
            RawString,
            #[token("\"", lex_string)]
            String,
            #[token("'", lex_rune)]
            Rune,
            $(
                #[token($text)]
                $variant,
            )*
            #[regex(r".", priority = 0)]
            Error,
        }

        /// A Go token. Literal variants borrow their source text.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Tok<'src> {
            Ident(&'src str),
            IntLit(&'src str),
            FloatLit(&'src str),
            ImagLit(&'src str),
            RuneLit(&'src str),
            StringLit(&'src str),
            RawStringLit(&'src str),
            $($variant,)*
            Error,
            Eof,
        }

        impl<'src> Tok<'src> {
            fn from_raw(raw: RawTok, slice: &'src str) -> Self {
                match raw {
                    RawTok::Ident => Tok::Ident(slice),
                    RawTok::Number(NumKind::Int) => Tok::IntLit(slice),
                    RawTok::Number(NumKind::Float) => Tok::FloatLit(slice),
                    RawTok::Number(NumKind::Imag) => Tok::ImagLit(slice),
                    RawTok::RawString => Tok::RawStringLit(slice),
                    RawTok::String => Tok::StringLit(slice),
                    RawTok::Rune => Tok::RuneLit(slice),
                    $(RawTok::$variant => Tok::$variant,)*
                    RawTok::Bom
                    | RawTok::Newline
                    | RawTok::LineComment
                    | RawTok::BlockComment
                    | RawTok::Error => Tok::Error,
                }
            }
        }

        impl fmt::Display for Tok<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    Tok::Ident(s) => write!(f, "identifier {s}"),
                    Tok::IntLit(s)
                    | Tok::FloatLit(s)
                    | Tok::ImagLit(s)
                    | Tok::RuneLit(s)
                    | Tok::StringLit(s)
                    | Tok::RawStringLit(s) => write!(f, "literal {s}"),
                    $(Tok::$variant => f.write_str(concat!("`", $text, "`")),)*
                    Tok::Error => f.write_str("invalid token"),
                    Tok::Eof => f.write_str("EOF"),
                }
            }
        }
    };
}

define_tokens! {
    KwBreak => "break",
    KwCase => "case",
    KwChan => "chan",
    KwConst => "const",
    KwContinue => "continue",
    KwDefault => "default",
    KwDefer => "defer",
    KwElse => "else",
    KwFallthrough => "fallthrough",
    KwFor => "for",
    KwFunc => "func",
    KwGo => "go",
    KwGoto => "goto",
    KwIf => "if",
    KwImport => "import",
    KwInterface => "interface",
    KwMap => "map",
    KwPackage => "package",
    KwRange => "range",
    KwReturn => "return",
    KwSelect => "select",
    KwStruct => "struct",
    KwSwitch => "switch",
    KwType => "type",
    KwVar => "var",

    Ellipsis => "...",
    ShlAssign => "<<=",
    ShrAssign => ">>=",
    AndNotAssign => "&^=",
    AddAssign => "+=",
    SubAssign => "-=",
    MulAssign => "*=",
    DivAssign => "/=",
    ModAssign => "%=",
    AndAssign => "&=",
    OrAssign => "|=",
    XorAssign => "^=",
    Shl => "<<",
    Shr => ">>",
    AndNot => "&^",
    LAnd => "&&",
    LOr => "||",
    EqEq => "==",
    NotEq => "!=",
    Le => "<=",
    Ge => ">=",
    Inc => "++",
    Dec => "--",
    Define => ":=",
    Arrow => "<-",
    Assign => "=",
    Plus => "+",
    Minus => "-",
    Star => "*",
    Slash => "/",
    Percent => "%",
    Amp => "&",
    Pipe => "|",
    Caret => "^",
    Tilde => "~",
    Bang => "!",
    Lt => "<",
    Gt => ">",
    LParen => "(",
    RParen => ")",
    LBrack => "[",
    RBrack => "]",
    LBrace => "{",
    RBrace => "}",
    Comma => ",",
    Semi => ";",
    Colon => ":",
    Dot => ".",
}

impl Tok<'_> {
    /// Whether a newline directly after this token ends the statement.
    pub const fn ends_statement(&self) -> bool {
        matches!(
            self,
            Tok::Ident(_)
                | Tok::IntLit(_)
                | Tok::FloatLit(_)
                | Tok::ImagLit(_)
                | Tok::RuneLit(_)
                | Tok::StringLit(_)
                | Tok::RawStringLit(_)
                | Tok::KwBreak
                | Tok::KwContinue
                | Tok::KwFallthrough
                | Tok::KwReturn
                | Tok::Inc
                | Tok::Dec
                | Tok::RParen
                | Tok::RBrack
                | Tok::RBrace
        )
    }
}

// =============================================================================
// Callbacks
// =============================================================================

fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder();
    match memmem::find(rem.as_bytes(), b"*/") {
        Some(at) => {
            lex.bump(at + 2);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn lex_raw_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder();
    match memchr(b'`', rem.as_bytes()) {
        Some(at) => {
            lex.bump(at + 1);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(LexErrorKind::UnterminatedString)
        }
    }
}

fn lex_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    lex_quoted(lex, b'"').map(|_| ())
}

fn lex_rune(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    match lex_quoted(lex, b'\'')? {
        1 => Ok(()),
        _ => Err(LexErrorKind::InvalidRune),
    }
}

/// Scans an interpreted literal up to its closing `quote` on the same line
/// and returns how many characters its body denotes.
fn lex_quoted(lex: &mut LogosLexer<'_, RawTok>, quote: u8) -> Result<usize, LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rem.len() {
        match rem[i] {
            b'\\' => i += 2,
            b'\n' => break,
            c if c == quote => {
                lex.bump(i + 1);
                let slice = lex.slice();
                return check_escapes(&slice[1..slice.len() - 1], quote as char);
            }
            _ => i += 1,
        }
    }
    lex.bump(i.min(rem.len()));
    Err(if quote == b'"' {
        LexErrorKind::UnterminatedString
    } else {
        LexErrorKind::UnterminatedRune
    })
}

fn check_escapes(body: &str, quote: char) -> Result<usize, LexErrorKind> {
    let mut chars = body.chars();
    let mut count = 0;
    while let Some(c) = chars.next() {
        count += 1;
        if c != '\\' {
            continue;
        }
        match chars.next().ok_or(LexErrorKind::InvalidEscape)? {
            'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' => {}
            e if e == quote => {}
            d @ '0'..='7' => {
                let mut value = d as u32 - '0' as u32;
                for _ in 0..2 {
                    let next = chars.next().and_then(|c| c.to_digit(8));
                    value = value * 8 + next.ok_or(LexErrorKind::InvalidEscape)?;
                }
                if value > 255 {
                    return Err(LexErrorKind::InvalidEscape);
                }
            }
            'x' => {
                hex_escape(&mut chars, 2)?;
            }
            'u' => unicode_escape(&mut chars, 4)?,
            'U' => unicode_escape(&mut chars, 8)?,
            _ => return Err(LexErrorKind::InvalidEscape),
        }
    }
    Ok(count)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Result<u32, LexErrorKind> {
    (0..digits).try_fold(0u32, |acc, _| {
        let digit = chars.next().and_then(|c| c.to_digit(16));
        Ok(acc * 16 + digit.ok_or(LexErrorKind::InvalidEscape)?)
    })
}

fn unicode_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Result<(), LexErrorKind> {
    let value = hex_escape(chars, digits)?;
    char::from_u32(value)
        .map(|_| ())
        .ok_or(LexErrorKind::InvalidEscape)
}

/// Maximal munch over everything that could belong to a numeric literal,
/// then validation of the munched text.
fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<NumKind, LexErrorKind> {
    let src = lex.source().as_bytes();
    let start = lex.span().start;
    let matched_end = lex.span().end;
    let hex = src[start] == b'0' && matches!(src.get(start + 1), Some(b'x' | b'X'));

    let mut end = matched_end;
    let mut seen_dot = src[start] == b'.';
    let mut seen_exp = false;
    while let Some(&b) = src.get(end) {
        let is_exp = if hex {
            matches!(b, b'p' | b'P')
        } else {
            matches!(b, b'e' | b'E')
        };
        if is_exp && !seen_exp {
            seen_exp = true;
            end += 1;
            if matches!(src.get(end), Some(b'+' | b'-')) {
                end += 1;
            }
        } else if b.is_ascii_alphanumeric() || b == b'_' {
            end += 1;
        } else if b == b'.' && !seen_dot && !seen_exp && src.get(end + 1) != Some(&b'.') {
            seen_dot = true;
            end += 1;
        } else {
            break;
        }
    }
    lex.bump(end - matched_end);
    classify_number(&lex.source()[start..end])
}

fn classify_number(lit: &str) -> Result<NumKind, LexErrorKind> {
    let invalid = Err(LexErrorKind::InvalidNumber);
    let (body, imag) = match lit.strip_suffix('i') {
        Some(body) => (body.as_bytes(), true),
        None => (lit.as_bytes(), false),
    };
    let (radix, digits) = match body {
        [b'0', b'x' | b'X', rest @ ..] => (16, rest),
        [b'0', b'b' | b'B', rest @ ..] => (2, rest),
        [b'0', b'o' | b'O', rest @ ..] => (8, rest),
        _ => (10, body),
    };
    let prefixed = radix != 10;

    let exp_at = digits.iter().position(|&c| match radix {
        16 => c | 0x20 == b'p',
        10 => c | 0x20 == b'e',
        _ => false,
    });
    let (mantissa, exponent) = match exp_at {
        Some(at) => (&digits[..at], Some(&digits[at + 1..])),
        None => (digits, None),
    };
    let (int_part, frac_part) = match mantissa.iter().position(|&c| c == b'.') {
        Some(at) => (&mantissa[..at], Some(&mantissa[at + 1..])),
        None => (mantissa, None),
    };

    let is_float = frac_part.is_some() || exponent.is_some();
    if is_float && (radix == 2 || radix == 8) {
        return invalid;
    }
    if radix == 16 && is_float && exponent.is_none() {
        return invalid;
    }
    let frac = frac_part.unwrap_or_default();
    if !digits_ok(int_part, radix, prefixed) || !digits_ok(frac, radix, false) {
        return invalid;
    }
    let has_digit = |s: &[u8]| s.iter().any(|&c| c != b'_');
    if !has_digit(int_part) && !has_digit(frac) {
        return invalid;
    }
    if let Some(exp) = exponent {
        let exp = exp.strip_prefix(b"+").or_else(|| exp.strip_prefix(b"-")).unwrap_or(exp);
        if exp.is_empty() || !digits_ok(exp, 10, false) {
            return invalid;
        }
    }
    let legacy_octal = radix == 10 && !is_float && !imag && int_part.len() > 1 && int_part[0] == b'0';
    if legacy_octal && !int_part.iter().all(|&c| c == b'_' || (b'0'..=b'7').contains(&c)) {
        return invalid;
    }

    Ok(if imag {
        NumKind::Imag
    } else if is_float {
        NumKind::Float
    } else {
        NumKind::Int
    })
}

/// Digits of `radix` where every `_` sits between two digits (or directly
/// after a base prefix).
fn digits_ok(s: &[u8], radix: u32, after_prefix: bool) -> bool {
    let mut prev_digit = after_prefix;
    for &c in s {
        if c == b'_' {
            if !prev_digit {
                return false;
            }
            prev_digit = false;
        } else if (c as char).is_digit(radix) {
            prev_digit = true;
        } else {
            return false;
        }
    }
    s.last() != Some(&b'_')
}

// =============================================================================
// Lexer wrapper
// =============================================================================

pub struct Lexer<'src> {
    src: &'src str,
    logos: LogosLexer<'src, RawTok>,
    pending: Option<Spanned<'src>>,
    diags: Vec<Diag>,
    comments: Vec<Comment>,
    insert_semi: bool,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            logos: RawTok::lexer(src),
            pending: None,
            diags: Vec::new(),
            comments: Vec::new(),
            insert_semi: false,
            done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    /// Comments seen so far, in source order.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    fn error(&mut self, kind: LexErrorKind, span: Range<usize>) -> Spanned<'src> {
        let span = Span::new(span.start, span.end);
        self.diags.push(LexError { kind, span }.diag());
        self.insert_semi = false;
        (span.start as usize, Tok::Error, span.end as usize)
    }

    fn injected_semi(&mut self, at: usize) -> Option<Spanned<'src>> {
        if std::mem::take(&mut self.insert_semi) {
            Some((at, Tok::Semi, at))
        } else {
            None
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Spanned<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }
            if self.done {
                return None;
            }

            let Some(result) = self.logos.next() else {
                self.done = true;
                let end = self.src.len();
                self.pending = self.injected_semi(end);
                continue;
            };
            let span = self.logos.span();
            let raw = match result {
                Ok(raw) => raw,
                Err(kind) => return Some(self.error(kind, span)),
            };

            match raw {
                RawTok::Bom if span.start == 0 => {}
                RawTok::Bom | RawTok::Error => {
                    return Some(self.error(LexErrorKind::InvalidToken, span));
                }
                RawTok::Newline => {
                    if let Some(semi) = self.injected_semi(span.start) {
                        return Some(semi);
                    }
                }
                RawTok::LineComment => {
                    let end = span.end - usize::from(self.logos.slice().ends_with('\r'));
                    self.comments.push(Comment {
                        kind: CommentKind::Line,
                        span: Span::new(span.start, end),
                    });
                }
                RawTok::BlockComment => {
                    self.comments.push(Comment {
                        kind: CommentKind::Block,
                        span: Span::new(span.start, span.end),
                    });
                    if self.logos.slice().contains('\n') {
                        if let Some(semi) = self.injected_semi(span.start) {
                            return Some(semi);
                        }
                    }
                }
                raw => {
                    let tok = Tok::from_raw(raw, self.logos.slice());
                    self.insert_semi = tok.ends_statement();
                    return Some((span.start, tok, span.end));
                }
            }
        }
    }
}

/// Tokens of `src` followed by a single [`Tok::Eof`], plus comments and
/// lexical diagnostics.
pub fn tokenize(src: &str) -> (Vec<Spanned<'_>>, Vec<Comment>, Vec<Diag>) {
    let mut lexer = Lexer::new(src);
    let mut toks: Vec<Spanned<'_>> = lexer.by_ref().collect();
    toks.push((src.len(), Tok::Eof, src.len()));
    let comments = lexer.take_comments();
    let diags = lexer.take_diags();
    (toks, comments, diags)
}

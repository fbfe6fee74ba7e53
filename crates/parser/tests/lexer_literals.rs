use sigfold_parser::error::{Diag, LexErrorKind};
use sigfold_parser::lexer::{Lexer, Tok};

fn lex_all(input: &str) -> (Vec<Tok<'_>>, Vec<Diag>) {
    let mut lx = Lexer::new(input);
    let toks: Vec<_> = lx.by_ref().map(|(_, t, _)| t).collect();
    let diags = lx.take_diags();
    (toks, diags)
}

/// The single token of `input`, which must lex cleanly.
fn one(input: &str) -> Tok<'_> {
    let (toks, diags) = lex_all(input);
    assert!(diags.is_empty(), "{input:?}: {diags:?}");
    match toks.as_slice() {
        [tok] | [tok, Tok::Semi] => *tok,
        other => panic!("{input:?}: expected one token, got {other:?}"),
    }
}

fn error_kind(input: &str) -> String {
    let (toks, diags) = lex_all(input);
    assert!(toks.contains(&Tok::Error), "{input:?}: {toks:?}");
    match diags.as_slice() {
        [diag] => diag.message.clone(),
        other => panic!("{input:?}: expected one diagnostic, got {other:?}"),
    }
}

#[test]
fn integers() {
    for lit in ["0", "42", "1_000_000", "0x_1F", "0XdeadBEEF", "0b1010", "0o17", "0O7", "017", "0_17"] {
        assert_eq!(one(lit), Tok::IntLit(lit), "{lit}");
    }
}

#[test]
fn floats() {
    for lit in ["1.5", ".5", "1.", "1e9", "1E-9", "6.02e+23", "0x1p-2", "0x1.8p1", "0x_1p0", "09.5", "1_0.2_5"] {
        assert_eq!(one(lit), Tok::FloatLit(lit), "{lit}");
    }
}

#[test]
fn imaginaries() {
    for lit in ["1i", "0789i", "1.5i", ".5e3i", "0x1p2i", "0b11i"] {
        assert_eq!(one(lit), Tok::ImagLit(lit), "{lit}");
    }
}

#[test]
fn malformed_numbers() {
    let invalid = LexErrorKind::InvalidNumber.to_string();
    for lit in ["0x", "1__0", "1_", "0b102", "09", "1e", "0x1.8", "0b1.0", "0o8", "0_x1"] {
        assert_eq!(error_kind(lit), invalid, "{lit}");
    }
}

#[test]
fn number_stops_before_range_and_selector() {
    let (toks, _) = lex_all("a[1:2]");
    assert_eq!(toks[2], Tok::IntLit("1"));
    let (toks, _) = lex_all("x...");
    assert_eq!(toks, vec![Tok::Ident("x"), Tok::Ellipsis]);
}

#[test]
fn interpreted_strings() {
    for lit in [r#""""#, r#""abc""#, r#""a\nb""#, r#""\x41\101""#, r#""é\U0001F600""#, r#""\"q\"""#, r#""é日本""#] {
        assert_eq!(one(lit), Tok::StringLit(lit), "{lit}");
    }
}

#[test]
fn raw_strings_span_lines() {
    let lit = "`a\nb\\n\"c\"`";
    assert_eq!(one(lit), Tok::RawStringLit(lit));
}

#[test]
fn runes() {
    for lit in ["'a'", r"'\n'", r"'\''", r"'\x7f'", r"'é'", "'é'", r"'\\'"] {
        assert_eq!(one(lit), Tok::RuneLit(lit), "{lit}");
    }
}

#[test]
fn bad_escapes() {
    let invalid = LexErrorKind::InvalidEscape.to_string();
    for lit in [r#""\q""#, r#""\400""#, r#""\x4""#, r#""\uD800""#, r#""\'""#] {
        assert_eq!(error_kind(lit), invalid, "{lit}");
    }
}

#[test]
fn rune_must_hold_one_char() {
    let invalid = LexErrorKind::InvalidRune.to_string();
    assert_eq!(error_kind("'ab'"), invalid);
    assert_eq!(error_kind("''"), invalid);
}

#[test]
fn unterminated_literals() {
    assert_eq!(
        error_kind("\"abc\nx"),
        LexErrorKind::UnterminatedString.to_string()
    );
    assert_eq!(error_kind("`abc"), LexErrorKind::UnterminatedString.to_string());
    assert_eq!(error_kind("'a"), LexErrorKind::UnterminatedRune.to_string());
    assert_eq!(error_kind("x /* abc"), LexErrorKind::UnterminatedComment.to_string());
}

#[test]
fn unicode_identifiers() {
    for ident in ["café", "日本語", "_x1", "αβγ", "x٣"] {
        assert_eq!(one(ident), Tok::Ident(ident), "{ident}");
    }
}

#[test]
fn symbols_are_not_identifiers() {
    assert_eq!(error_kind("€"), LexErrorKind::InvalidToken.to_string());
    assert_eq!(error_kind("x @ y"), LexErrorKind::InvalidToken.to_string());
}

#[test]
fn error_span_points_at_the_literal() {
    let (_, diags) = lex_all("x := 0b2");
    assert_eq!((diags[0].span.start, diags[0].span.end), (5, 8));
}

use sigfold_parser::ast::CommentKind;
use sigfold_parser::lexer::{Lexer, Tok};

fn toks(input: &str) -> Vec<Tok<'_>> {
    Lexer::new(input).map(|(_, t, _)| t).collect()
}

fn injected_semis(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter_map(|(s, t, e)| (matches!(t, Tok::Semi) && s == e).then_some(s))
        .collect()
}

fn names(input: &str) -> Vec<&'static str> {
    Lexer::new(input).map(|(_, t, _)| name(&t)).collect()
}

fn name(t: &Tok<'_>) -> &'static str {
    match t {
        Tok::Ident(_) => "IDENT",
        Tok::IntLit(_) => "INT",
        Tok::FloatLit(_) => "FLOAT",
        Tok::ImagLit(_) => "IMAG",
        Tok::RuneLit(_) => "CHAR",
        Tok::StringLit(_) | Tok::RawStringLit(_) => "STRING",
        Tok::Semi => ";",
        Tok::Error => "ERROR",
        _ => "OP",
    }
}

#[test]
fn func_header() {
    assert_eq!(
        toks("func f(a, b int) (error) {}"),
        vec![
            Tok::KwFunc,
            Tok::Ident("f"),
            Tok::LParen,
            Tok::Ident("a"),
            Tok::Comma,
            Tok::Ident("b"),
            Tok::Ident("int"),
            Tok::RParen,
            Tok::LParen,
            Tok::Ident("error"),
            Tok::RParen,
            Tok::LBrace,
            Tok::RBrace,
            Tok::Semi,
        ]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        toks("a <<= b &^= c &^ d ... e <- f := g"),
        vec![
            Tok::Ident("a"),
            Tok::ShlAssign,
            Tok::Ident("b"),
            Tok::AndNotAssign,
            Tok::Ident("c"),
            Tok::AndNot,
            Tok::Ident("d"),
            Tok::Ellipsis,
            Tok::Ident("e"),
            Tok::Arrow,
            Tok::Ident("f"),
            Tok::Define,
            Tok::Ident("g"),
            Tok::Semi,
        ]
    );
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(
        toks("chan interface map struct funcs"),
        vec![
            Tok::KwChan,
            Tok::KwInterface,
            Tok::KwMap,
            Tok::KwStruct,
            Tok::Ident("funcs"),
            Tok::Semi,
        ]
    );
}

#[test]
fn semicolon_after_statement_enders() {
    for src in [
        "x\n", "42\n", "1.5\n", "2i\n", "'a'\n", "\"s\"\n", "`r`\n", "break\n", "continue\n",
        "fallthrough\n", "return\n", "x++\n", "x--\n", "f()\n", "a[0]\n", "T{}\n",
    ] {
        assert_eq!(injected_semis(src).len(), 1, "{src:?}");
    }
}

#[test]
fn no_semicolon_after_operators_or_open_tokens() {
    for src in ["a +\n", "a,\n", "f(\n", "[\n", "{\n", "x :=\n", "func\n", "if\n", ".\n"] {
        assert!(injected_semis(src).is_empty(), "{src:?}");
    }
}

#[test]
fn semicolon_sits_at_the_newline() {
    assert_eq!(injected_semis("x\ny\n"), vec![1, 3]);
}

#[test]
fn semicolon_at_eof_without_newline() {
    assert_eq!(injected_semis("return x"), vec![8]);
}

#[test]
fn explicit_semicolon_is_not_doubled() {
    assert_eq!(names("x;\n"), vec!["IDENT", ";"]);
}

#[test]
fn comments_before_newline_still_end_statement() {
    assert_eq!(names("x // c\n"), vec!["IDENT", ";"]);
    assert_eq!(names("x /* c */\n"), vec!["IDENT", ";"]);
    assert_eq!(names("x /* c\n */ y"), vec!["IDENT", ";", "IDENT", ";"]);
}

#[test]
fn comments_go_to_the_side_table() {
    let src = "// doc\nx /* a */ y // tail\n";
    let mut lexer = Lexer::new(src);
    let _: Vec<_> = lexer.by_ref().collect();
    let comments = lexer.take_comments();

    let kinds: Vec<_> = comments.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![CommentKind::Line, CommentKind::Block, CommentKind::Line]);
    let texts: Vec<_> = comments
        .iter()
        .map(|c| &src[c.span.start as usize..c.span.end as usize])
        .collect();
    assert_eq!(texts, vec!["// doc", "/* a */", "// tail"]);
}

#[test]
fn carriage_returns_are_whitespace() {
    assert_eq!(names("x\r\ny\r\n"), vec!["IDENT", ";", "IDENT", ";"]);
}

#[test]
fn leading_bom_is_skipped() {
    assert_eq!(names("\u{feff}package p"), vec!["OP", "IDENT", ";"]);
}

#[test]
fn bom_elsewhere_is_an_error() {
    let mut lexer = Lexer::new("x \u{feff}");
    let kinds: Vec<_> = lexer.by_ref().map(|(_, t, _)| name(&t)).collect();
    assert_eq!(kinds, vec!["IDENT", "ERROR"]);
    assert_eq!(lexer.take_diags().len(), 1);
}

#[test]
fn line_comment_excludes_carriage_return() {
    let src = "x // c\r\ny\r\n";
    let mut lexer = Lexer::new(src);
    let _: Vec<_> = lexer.by_ref().collect();
    let comments = lexer.take_comments();
    let c = comments[0];
    assert_eq!(&src[c.span.start as usize..c.span.end as usize], "// c");
}

use sigfold_parser::ast::{FieldList, Type, TopLevelDecl};
use sigfold_parser::{SourceUnit, parse_source};

fn assert_parses(src: &str) -> SourceUnit {
    match parse_source(src) {
        Ok(unit) => unit,
        Err(f) => panic!("expected parse ok, got diagnostics: {:#?}", f.diags),
    }
}

fn first_error(src: &str) -> (u32, String) {
    let failure = parse_source(src).expect_err("expected a parse failure");
    let diag = failure.first().expect("at least one diagnostic").clone();
    (diag.span.start, diag.message)
}

/// Name groups and type text of every field of `list`.
fn fields(unit: &SourceUnit, list: FieldList) -> Vec<(Vec<&str>, &str)> {
    unit.arena
        .fields(list.fields)
        .iter()
        .map(|&id| {
            let field = &unit.arena.fields[id];
            let names = unit
                .arena
                .ident_names(field.names)
                .iter()
                .map(|&n| unit.name(n))
                .collect();
            (names, unit.text(unit.arena.types.span(field.typ)))
        })
        .collect()
}

fn only_func(unit: &SourceUnit) -> sigfold_parser::ast::FuncDecl {
    match unit.arena.top_decls(unit.file.decls) {
        [TopLevelDecl::Func(id)] => unit.arena.funcs[*id],
        other => panic!("expected one function, got {other:?}"),
    }
}

#[test]
fn parses_imports_and_decls() {
    let _ = assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
)

const (
    A = 1
    B int = 2
)

var (
    x = 1
    y, z int
)

type (
    T = int
    U[T any] struct { F T }
    V interface {
        M(x int) int
        ~int | ~string
    }
)

func main() {
    fmt.Println(Sqrt(4))
}
"#,
    );
}

#[test]
fn parses_statements() {
    let _ = assert_parses(
        r#"
package p

func f(x int) int {
    if x < 0 { return -x }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    for range []int{1,2,3} {
    }
    switch x {
    case 0, 1:
        x++
    default:
        x = 3
    }
    select {
    case ch <- x:
        return x
    default:
        return 0
    }
}
"#,
    );
}

#[test]
fn parses_expressions() {
    let _ = assert_parses(
        r#"
package p

func f(a, b, c int, ch chan<- int) {
    _ = a + b*c - (a<<2)
    _ = a == b || a < c && b <= c
    _ = &a
    _ = <-ch
    _ = []int{1,2,3}[0]
    _ = []int{1,2,3}[1:]
    _ = []int{1,2,3}[:2]
    _ = []int{1,2,3}[0:2:3]
    _ = map[string]int{"a":1, "b":2}["a"]
    _ = f(a, b, c)
    _ = f(a, b, c...)
}
"#,
    );
}

#[test]
fn parameter_names_attach_to_the_next_type() {
    let unit = assert_parses("package p\nfunc f(a, b int, c string, d ...any) {}\n");
    let sig = unit.arena.signatures[only_func(&unit).sig];
    assert_eq!(
        fields(&unit, sig.params),
        vec![(vec!["a", "b"], "int"), (vec!["c"], "string"), (vec!["d"], "...any")]
    );
    assert!(sig.results.is_none());
}

#[test]
fn unnamed_parameters_are_types() {
    let unit = assert_parses("package p\nfunc f(int, pkg.T, []byte) {}\n");
    let sig = unit.arena.signatures[only_func(&unit).sig];
    assert_eq!(
        fields(&unit, sig.params),
        vec![(vec![], "int"), (vec![], "pkg.T"), (vec![], "[]byte")]
    );
}

#[test]
fn result_forms_record_their_parentheses() {
    let bare = assert_parses("package p\nfunc f() error { return nil }\n");
    let results = bare.arena.signatures[only_func(&bare).sig].results.unwrap();
    assert!(!results.has_delims());
    assert_eq!(fields(&bare, results), vec![(vec![], "error")]);

    let wrapped = assert_parses("package p\nfunc f() (error) { return nil }\n");
    let results = wrapped.arena.signatures[only_func(&wrapped).sig].results.unwrap();
    assert!(results.has_delims());
    assert_eq!(fields(&wrapped, results), vec![(vec![], "error")]);

    let named = assert_parses("package p\nfunc f() (n, m int, err error) { return }\n");
    let results = named.arena.signatures[only_func(&named).sig].results.unwrap();
    assert_eq!(
        fields(&named, results),
        vec![(vec!["n", "m"], "int"), (vec!["err"], "error")]
    );
}

#[test]
fn methods_keep_receivers_apart() {
    let unit = assert_parses("package p\nfunc (s *Server[T]) Serve(l net.Listener) error { return nil }\n");
    let func = only_func(&unit);
    assert_eq!(unit.name(func.name), "Serve");
    assert_eq!(fields(&unit, func.recv.unwrap()), vec![(vec!["s"], "*Server[T]")]);
}

#[test]
fn interface_elements() {
    let unit = assert_parses(
        r#"
package p

type I interface {
    fmt.Stringer
    Get(c echo.Context) (error)
    ~int | ~string
}
"#,
    );
    let iface = (0..unit.arena.types.len())
        .map(|i| &unit.arena.types[sigfold_parser::ast::TypeId::from_raw(i as u32)])
        .find_map(|t| match t {
            Type::Interface { elems, .. } => Some(*elems),
            _ => None,
        })
        .expect("interface type");
    assert_eq!(unit.arena.interface_elems(iface).len(), 3);
}

#[test]
fn generics_and_type_parameters() {
    let _ = assert_parses(
        r#"
package p

type List[T any] struct {
    items []T
}

func Map[S ~[]E, E, R any](s S, f func(E) R) []R {
    out := make([]R, 0, len(s))
    for _, v := range s {
        out = append(out, f(v))
    }
    return out
}

func use(xs []int) {
    _ = Map(xs, strconv.Itoa)
    var l List[int]
    _ = l
}
"#,
    );
}

#[test]
fn composite_literal_in_control_clause_needs_parens() {
    let _ = assert_parses("package p\nfunc f() {\n    if x == (T{}) {\n    }\n    for _, v := range []int{1} {\n        _ = v\n    }\n}\n");
}

#[test]
fn comments_are_collected_in_order() {
    let unit = assert_parses("// Package p.\npackage p\n\n/* a */ func f() {} // tail\n");
    let texts: Vec<_> = unit.comments.iter().map(|c| unit.text(c.span)).collect();
    assert_eq!(texts, vec!["// Package p.", "/* a */", "// tail"]);
}

#[test]
fn reports_mixed_parameter_forms() {
    let (_, message) = first_error("package p\nfunc f(a int, string) {}\n");
    assert!(message.contains("mixed named and unnamed"), "{message}");
}

#[test]
fn reports_missing_package_clause() {
    let (start, _) = first_error("func f() {}\n");
    assert_eq!(start, 0);
}

#[test]
fn reports_unclosed_parameter_list() {
    let src = "package p\n\nfunc f( {\n";
    let (start, _) = first_error(src);
    assert!(start as usize >= src.find('(').unwrap());
}

#[test]
fn lexical_errors_fail_the_parse() {
    let failure = parse_source("package p\nvar s = \"\\q\"\n").unwrap_err();
    assert_eq!(failure.diags[0].kind, sigfold_parser::DiagKind::Lex);
}

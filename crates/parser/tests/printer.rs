use indoc::indoc;
use pretty_assertions::assert_eq;
use sigfold_parser::ast::TopLevelDecl;
use sigfold_parser::{parse_source, print_unit, type_text};

fn print(src: &str) -> String {
    let unit = parse_source(src).unwrap_or_else(|f| panic!("parse failed: {:#?}", f.diags));
    print_unit(&unit).unwrap()
}

#[track_caller]
fn assert_canonical(src: &str) {
    assert_eq!(print(src), src);
}

/// Type text of every parameter of the first function in `src`.
fn param_types(src: &str) -> Vec<String> {
    let unit = parse_source(src).unwrap();
    let Some(TopLevelDecl::Func(id)) = unit.arena.top_decls(unit.file.decls).first().copied()
    else {
        panic!("expected a function first");
    };
    let sig = unit.arena.signatures[unit.arena.funcs[id].sig];
    unit.arena
        .fields(sig.params.fields)
        .iter()
        .map(|&f| type_text(&unit, unit.arena.fields[f].typ).unwrap())
        .collect()
}

#[test]
fn hello_world_is_canonical() {
    assert_canonical(indoc! {r#"
        package main

        import "fmt"

        func main() {
        	fmt.Println("Hello, World!")
        }
    "#});
}

#[test]
fn struct_fields_and_trailing_comments_align() {
    assert_canonical(indoc! {"
        package geometry

        // Point is a labelled position.
        type Point struct {
        	X, Y float64 // coordinates
        	Name string  // label
        }
    "});
}

#[test]
fn grouped_declarations() {
    assert_canonical(indoc! {r#"
        package p

        import (
        	"fmt"
        	"strings"
        )

        const (
        	A = iota
        	B
        	C
        )

        var (
        	x = 1
        	y int
        )
    "#});
}

#[test]
fn control_flow_is_canonical() {
    assert_canonical(indoc! {"
        package p

        func f(x int) int {
        	if x < 0 {
        		return -x
        	} else if x == 0 {
        		return 1
        	}
        	for i := 0; i < 10; i++ {
        		x += i
        	}
        	switch x {
        	case 1, 2:
        		return x * 2
        	default:
        		return x
        	}
        }
    "});
}

#[test]
fn keyed_literal_values_align() {
    assert_canonical(indoc! {r#"
        package p

        var m = map[string]int{
        	"a":   1,
        	"bcd": 2,
        }
    "#});
}

#[test]
fn one_line_bodies_stay_on_one_line() {
    assert_canonical(indoc! {"
        package p

        func f() {}

        func g() int { return 1 }
    "});
}

#[test]
fn comments_survive_in_place() {
    assert_canonical(indoc! {"
        // Package p does things.
        package p

        // f does one thing.
        func f(a int /* first */, b string) error {
        	// nothing yet
        	return nil // done
        }
    "});
}

#[test]
fn interface_methods_are_canonical() {
    assert_canonical(indoc! {"
        package p

        type MyInterface interface {
        	Get(c echo.Context) error
        	Update(id int, name string, age int, city string) error
        	Process(a, b int, c, d string) (User, error)
        }
    "});
}

#[test]
fn spaces_become_tabs() {
    let src = "package p\n\nfunc f() {\n    x := 1\n    _ = x\n}\n";
    assert_eq!(print(src), "package p\n\nfunc f() {\n\tx := 1\n\t_ = x\n}\n");
}

#[test]
fn binary_spacing_follows_precedence() {
    let src = "package p\n\nfunc f() {\n\tx = a+b\n\ty = a * b+c\n}\n";
    assert_eq!(print(src), "package p\n\nfunc f() {\n\tx = a + b\n\ty = a*b + c\n}\n");
}

#[test]
fn blank_lines_collapse_to_one() {
    let src = "package p\n\n\n\nvar x = 1\n\n\n\nvar y = 2\n";
    assert_eq!(print(src), "package p\n\nvar x = 1\n\nvar y = 2\n");
}

#[test]
fn output_ends_with_one_newline() {
    assert_eq!(print("package p"), "package p\n");
    assert_eq!(print("package p\n\n\n"), "package p\n");
}

#[test]
fn single_unnamed_result_loses_its_parens() {
    let src = "package p\n\nfunc f() (error) {\n\treturn nil\n}\n";
    assert_eq!(print(src), "package p\n\nfunc f() error {\n\treturn nil\n}\n");
    assert_canonical("package p\n\nfunc f() (err error) {\n\treturn nil\n}\n");
    assert_canonical("package p\n\nfunc f() (int, error)\n");
}

#[test]
fn function_typed_results_lose_their_parens() {
    let src = indoc! {"
        package p

        type F func() (error)

        var g func(a int) (error)

        func h(c func(int)(error)) {}
    "};
    assert_eq!(
        print(src),
        indoc! {"
            package p

            type F func() error

            var g func(a int) error

            func h(c func(int) error) {}
        "}
    );
}

#[test]
fn type_text_is_canonical() {
    let src = "package p\nfunc f(a map[ string ][]int, b *pkg.T, c chan<- int, d func(int) error, e ...string) {}\n";
    assert_eq!(
        param_types(src),
        vec!["map[string][]int", "*pkg.T", "chan<- int", "func(int) error", "...string"]
    );
}

#[test]
fn comment_after_comma_is_flushed_before_it() {
    let src = "package p\n\nfunc f(a int, /* c */ b string) {}\n";
    assert_eq!(print(src), "package p\n\nfunc f(a int /* c */, b string) {}\n");
}

#[test]
fn type_text_unwraps_function_results() {
    let src = "package p\nfunc f(a func() (error), b func() error) {}\n";
    assert_eq!(param_types(src), vec!["func() error", "func() error"]);
}

#[test]
fn type_text_ignores_comments() {
    let src = "package p\nfunc f(a []/* x */int, b []int) {}\n";
    assert_eq!(param_types(src), vec!["[]int", "[]int"]);
}

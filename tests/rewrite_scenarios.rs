use std::path::Path;

use indoc::indoc;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sigfold::format_source;

fn format(src: &str) -> String {
    match format_source(Path::new("t.go"), src) {
        Ok(out) => out.text,
        Err(err) => panic!("{err}"),
    }
}

#[test]
fn fixture_file() {
    let src = indoc! {"
        package main

        type MyInterface interface {
        	Get(c echo.Context) (error)
        	Update(id int, name string, age int, city string) (error)
        	Process(a, b int, c, d string) (User, error)
        }

        func Get(c echo.Context) error {
        	return nil
        }

        func Update(id int, name string, age int, city string) error {
        	return nil
        }
    "};
    let want = indoc! {"
        package main

        type MyInterface interface {
        	Get(c echo.Context) error
        	Update(id int, name string, age int, city string) error
        	Process(a, b int, c, d string) (User, error)
        }

        func Get(c echo.Context) error {
        	return nil
        }

        func Update(id int, name string, age int, city string) error {
        	return nil
        }
    "};
    assert_eq!(format(src), want);
}

#[test]
fn four_parameters_in_two_runs() {
    assert_eq!(
        format("package p\n\nfunc f(a int, b int, c string, d string) {}\n"),
        "package p\n\nfunc f(a, b int, c, d string) {}\n"
    );
}

#[test]
fn already_grouped_is_unchanged() {
    let src = "package p\n\nfunc f(a, b int, c, d string) {}\n";
    assert_eq!(format(src), src);
}

#[test]
fn named_results_are_grouped_too() {
    assert_eq!(
        format("package p\n\nfunc f() (n int, m int, err error) {\n\treturn\n}\n"),
        "package p\n\nfunc f() (n, m int, err error) {\n\treturn\n}\n"
    );
}

#[test]
fn function_literal_result_is_unwrapped_by_text_pass() {
    let src = indoc! {"
        package p

        var f = func() (error) {
        	return nil
        }

        var g = func() (err error) {
        	return nil
        }
    "};
    let want = indoc! {"
        package p

        var f = func() error {
        	return nil
        }

        var g = func() (err error) {
        	return nil
        }
    "};
    assert_eq!(format(src), want);
}

#[test]
fn variadic_stays_apart_from_its_element_type() {
    let src = "package p\n\nfunc f(a int, b ...int) {}\n";
    assert_eq!(format(src), src);
}

#[test]
fn pointer_and_value_types_differ() {
    let src = "package p\n\nfunc f(a T, b *T, c *T) {}\n";
    assert_eq!(format(src), "package p\n\nfunc f(a T, b, c *T) {}\n");
}

#[test]
fn comments_around_signatures_survive() {
    let src = indoc! {"
        package p

        // Sum adds.
        func Sum(a int, b int) (int) { // one line
        	return a + b // result
        }

        type I interface {
        	// M does things.
        	M(x string, y string) (error) // trailing
        }
    "};
    let want = indoc! {"
        package p

        // Sum adds.
        func Sum(a, b int) int { // one line
        	return a + b // result
        }

        type I interface {
        	// M does things.
        	M(x, y string) error // trailing
        }
    "};
    assert_eq!(format(src), want);
}

#[test]
fn multiline_parameter_lists_keep_their_shape() {
    let src = indoc! {"
        package p

        func f(
        	a int, b int,
        	c string,
        ) {
        }
    "};
    let want = indoc! {"
        package p

        func f(
        	a, b int,
        	c string,
        ) {
        }
    "};
    assert_eq!(format(src), want);
}

#[test]
fn unnamed_results_of_one_type_collapse() {
    let src = "package p\n\nfunc pair() (int, int) {\n\treturn 1\n}\n";
    assert_eq!(format(src), "package p\n\nfunc pair() int {\n\treturn 1\n}\n");
}

#[test]
fn methods_inside_function_bodies_are_reached() {
    let src = indoc! {"
        package p

        func outer() {
        	type local interface {
        		Run(a int, b int) (error)
        	}
        }
    "};
    let want = indoc! {"
        package p

        func outer() {
        	type local interface {
        		Run(a, b int) error
        	}
        }
    "};
    assert_eq!(format(src), want);
}

#[test]
fn output_is_idempotent() {
    let src = indoc! {"
        package p

        type S struct{ a, b int }

        func (s *S) Set(a int, b int) (error) {
        	s.a, s.b = a, b
        	return nil
        }

        func pair() (int, int) {
        	return 1, 2
        }
    "};
    let once = format(src);
    assert_eq!(format(&once), once);
}

#[test]
fn collapsed_results_settle_in_one_pass() {
    let src = indoc! {"
        package p

        type I interface {
        	M() (int, int)
        }

        func f() (int, int)
    "};
    let want = indoc! {"
        package p

        type I interface {
        	M() int
        }

        func f() int
    "};
    let once = format(src);
    assert_eq!(once, want);
    assert_eq!(format(&once), once);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn rewrite_is_idempotent(
        params in prop::collection::vec((0usize..4, any::<bool>()), 0..6),
        wrap_result in any::<bool>(),
    ) {
        const TYPES: [&str; 4] = ["int", "string", "*T", "map[string]int"];
        let params: Vec<String> = params
            .iter()
            .enumerate()
            .map(|(i, &(t, _))| format!("p{i} {}", TYPES[t]))
            .collect();
        let result = if wrap_result { "(error)" } else { "error" };
        let src = format!(
            "package p\n\nfunc f({}) {result} {{\n\treturn nil\n}}\n",
            params.join(", ")
        );

        let once = format(&src);
        prop_assert!(once.contains(") error {"), "{once}");
        prop_assert_eq!(format(&once), once.clone());
    }
}

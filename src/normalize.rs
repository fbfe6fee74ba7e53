//! Textual cleanup of printed output.
//!
//! The tree rewrite only touches declared functions and interface methods.
//! Function literals keep their result parentheses through printing, so a
//! last pass over the text drops them when they wrap one unnamed type.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// `) (T) {` where `T` is one type without commas, parentheses or blanks.
/// Blanks are allowed only after a `chan` keyword, which keeps named results
/// such as `(err error)` out of the match.
static SINGLE_RESULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\) \(((?:<-)?(?:chan(?:<-)? )*[^\s,()]+)\) \{")
        .expect("single result pattern is valid")
});

/// Rewrites every `) (T) {` in `text` to `) T {`.
pub fn strip_single_result_parens(text: &str) -> Cow<'_, str> {
    SINGLE_RESULT.replace_all(text, ") $1 {")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn function_literal_result_is_unwrapped() {
        let src = "\tf := func() (error) {\n";
        assert_eq!(strip_single_result_parens(src), "\tf := func() error {\n");
    }

    #[test]
    fn named_result_is_untouched() {
        let src = "\tf := func() (err error) {\n";
        assert!(matches!(strip_single_result_parens(src), Cow::Borrowed(_)));
    }

    #[test]
    fn multiple_results_are_untouched() {
        let src = "func f() (User, error) {\n";
        assert_eq!(strip_single_result_parens(src), src);
    }

    #[test]
    fn composite_types_are_unwrapped() {
        let cases = [
            ("func() (*T) {", "func() *T {"),
            ("func() ([]byte) {", "func() []byte {"),
            ("func() (map[string]int) {", "func() map[string]int {"),
            ("func() (pkg.List[T]) {", "func() pkg.List[T] {"),
            ("func() (chan int) {", "func() chan int {"),
            ("func() (<-chan int) {", "func() <-chan int {"),
            ("func() (chan<- int) {", "func() chan<- int {"),
        ];
        for (src, want) in cases {
            assert_eq!(strip_single_result_parens(src), want, "{src}");
        }
    }

    #[test]
    fn function_typed_result_is_untouched() {
        let src = "func() (func()) {";
        assert_eq!(strip_single_result_parens(src), src);
    }

    #[test]
    fn every_occurrence_is_rewritten() {
        let src = "a := func() (int) {\n\treturn func() (int) {\n";
        assert_eq!(
            strip_single_result_parens(src),
            "a := func() int {\n\treturn func() int {\n"
        );
    }
}

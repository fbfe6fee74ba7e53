use proptest::prelude::*;
use sigfold_parser::lexer::{Lexer, Tok, tokenize};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn never_panics_and_progresses(s in ".*") {
        let mut max_end = 0usize;
        let mut last_real_end = 0usize;
        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in Lexer::new(&s).enumerate() {
            prop_assert!(start <= end, "start>end: ({start},{end}) tok={tok:?} input={s:?}");
            prop_assert!(end <= s.len(), "end out of bounds: ({start},{end}) tok={tok:?} input={s:?}");

            let injected_semi = matches!(tok, Tok::Semi) && start == end;
            if injected_semi {
                prop_assert!(
                    start >= max_end,
                    "injected semi before progress: pos={start} < max_end={max_end} input={s:?}"
                );
            } else {
                prop_assert!(
                    start >= last_real_end,
                    "token moved backwards: start={start} < {last_real_end} tok={tok:?} input={s:?}"
                );
                last_real_end = end;
            }
            max_end = max_end.max(end);

            prop_assert!(steps <= max_steps, "too many steps: {steps} input={s:?}");
        }
    }

    #[test]
    fn tokenize_ends_with_one_eof(s in ".*") {
        let (toks, _, _) = tokenize(&s);
        let eofs = toks.iter().filter(|(_, t, _)| matches!(t, Tok::Eof)).count();
        prop_assert_eq!(eofs, 1);
        prop_assert!(matches!(toks.last(), Some((_, Tok::Eof, _))));
    }

    #[test]
    fn identifiers_borrow_their_source_text(words in prop::collection::vec("[a-z_][a-z0-9_]{0,6}", 1..12)) {
        let src = words.join(" ");
        for (start, tok, end) in Lexer::new(&src) {
            if let Tok::Ident(text) = tok {
                prop_assert_eq!(text, &src[start..end]);
            }
        }
    }

    #[test]
    fn comments_never_become_tokens(body in "[a-z ]{0,20}") {
        let src = format!("x // {body}\ny /* {body} */ z\n");
        let mut lexer = Lexer::new(&src);
        let idents: Vec<_> = lexer
            .by_ref()
            .filter_map(|(_, t, _)| match t {
                Tok::Ident(s) => Some(s),
                _ => None,
            })
            .collect();
        prop_assert_eq!(idents, vec!["x", "y", "z"]);
        prop_assert_eq!(lexer.take_comments().len(), 2);
    }
}

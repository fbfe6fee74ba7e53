//! Signature rewriting on the parsed tree.
//!
//! Two passes run over every function declaration and every interface
//! method: a parenthesized single unnamed result loses its parentheses,
//! then adjacent parameters and results whose types print identically are
//! folded into one field (`a int, b int` becomes `a, b int`).

use std::ops::Range;

use sigfold_parser::ast::{
    AstArena, Field, FieldId, FieldList, FuncDeclId, IdentName, InterfaceElem, ListRef,
    SignatureId, Type, TypeId,
};
use sigfold_parser::walk::{Visitor, Walk};
use sigfold_parser::{EmitError, SourceUnit, type_text};
use smallvec::SmallVec;

/// Collects the signatures that take part in the rewrite.
///
/// Function literals and function-typed fields are reached by the walk but
/// never recorded.
#[derive(Debug, Default)]
struct SignatureLocator {
    found: Vec<SignatureId>,
}

impl<'ast> Visitor<'ast> for SignatureLocator {
    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        let func = &a.funcs[id];
        self.found.push(func.sig);
        func.walk(a, self);
    }

    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        let ty = &a.types[id];
        if let Type::Interface { elems, .. } = ty {
            for elem in a.interface_elems(*elems) {
                match elem {
                    InterfaceElem::Method { sig, .. } => self.found.push(*sig),
                    InterfaceElem::Embed { .. } => {}
                }
            }
        }
        ty.walk(a, self);
    }
}

/// Every function declaration signature and interface method signature of
/// `unit`, in source order.
pub fn locate_signatures(unit: &SourceUnit) -> Vec<SignatureId> {
    let mut locator = SignatureLocator::default();
    locator.visit_source_file(&unit.arena, &unit.file);
    locator.found
}

/// Rewrites every located signature in place.
///
/// Returns the number of signatures whose lists changed.
pub fn rewrite_signatures(unit: &mut SourceUnit) -> Result<usize, EmitError> {
    let mut changed = 0;
    for sig in locate_signatures(unit) {
        if rewrite_signature(unit, sig)? {
            changed += 1;
        }
    }
    Ok(changed)
}

/// Depranthesizes the results of one signature, then groups both lists.
/// Results that grouping collapses to one unnamed field are depranthesized
/// again.
pub fn rewrite_signature(unit: &mut SourceUnit, id: SignatureId) -> Result<bool, EmitError> {
    let mut sig = unit.arena.signatures[id];
    let mut changed = false;

    if let Some(results) = sig.results.as_mut() {
        changed |= depranthesize(&unit.arena, results);
    }

    let (params, merged) = group_fields(unit, sig.params.fields)?;
    sig.params.fields = params;
    changed |= merged;

    if let Some(results) = sig.results.as_mut() {
        let (fields, merged) = group_fields(unit, results.fields)?;
        results.fields = fields;
        changed |= merged;
        // Grouping can leave a single unnamed field behind.
        changed |= depranthesize(&unit.arena, results);
    }

    unit.arena.signatures[id] = sig;
    Ok(changed)
}

/// Drops the parentheses of a result list made of exactly one unnamed
/// field. Returns whether the markers were cleared.
pub fn depranthesize(arena: &AstArena, results: &mut FieldList) -> bool {
    match arena.fields(results.fields) {
        [only] if arena.fields[*only].names.is_empty() && results.has_delims() => {
            results.open = None;
            results.close = None;
            true
        }
        _ => false,
    }
}

/// Folds every maximal run of adjacent fields with the same type text into
/// one field.
///
/// A merged field carries the names of the run in order and the first
/// field's type node. Fields that form a run of one are kept as they are.
/// The returned flag tells whether anything was merged; when it is false the
/// list is returned untouched.
pub fn group_fields(
    unit: &mut SourceUnit,
    list: ListRef<FieldId>,
) -> Result<(ListRef<FieldId>, bool), EmitError> {
    let view: &SourceUnit = unit;
    let ids: SmallVec<[FieldId; 8]> = SmallVec::from_slice(view.arena.fields(list));
    let keys = ids
        .iter()
        .map(|&field| type_text(view, view.arena.fields[field].typ))
        .collect::<Result<Vec<_>, _>>()?;

    let runs = maximal_runs(&keys);
    if runs.len() == ids.len() {
        return Ok((list, false));
    }

    let mut grouped: SmallVec<[FieldId; 8]> = SmallVec::with_capacity(runs.len());
    for run in runs {
        match &ids[run] {
            [single] => grouped.push(*single),
            members @ [first, .., last] => {
                let names: SmallVec<[IdentName; 8]> = members
                    .iter()
                    .flat_map(|&field| unit.arena.ident_names(unit.arena.fields[field].names))
                    .copied()
                    .collect();
                let arena = &mut unit.arena;
                let span = arena.fields.span(*first).to(arena.fields.span(*last));
                let typ = arena.fields[*first].typ;
                let names = arena.list_ident_names(names);
                grouped.push(arena.fields.alloc(
                    Field {
                        names,
                        typ,
                        tag: None,
                    },
                    span,
                ));
            }
            [] => {}
        }
    }
    Ok((unit.arena.list_fields(grouped), true))
}

/// Splits `keys` into maximal runs of equal adjacent keys.
pub fn maximal_runs<K: PartialEq>(keys: &[K]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=keys.len() {
        if i == keys.len() || keys[i] != keys[start] {
            runs.push(start..i);
            start = i;
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use sigfold_parser::{parse_source, print_unit};

    fn rewrite(src: &str) -> String {
        let mut unit = parse_source(src).unwrap();
        rewrite_signatures(&mut unit).unwrap();
        print_unit(&unit).unwrap()
    }

    fn names_of(unit: &SourceUnit, list: ListRef<FieldId>) -> Vec<Vec<String>> {
        unit.arena
            .fields(list)
            .iter()
            .map(|&f| {
                unit.arena
                    .ident_names(unit.arena.fields[f].names)
                    .iter()
                    .map(|&n| unit.name(n).to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn runs_split_on_key_change() {
        assert_eq!(maximal_runs(&[1, 1, 2, 2, 1]), vec![0..2, 2..4, 4..5]);
        assert_eq!(maximal_runs::<u8>(&[]), Vec::<Range<usize>>::new());
        assert_eq!(maximal_runs(&["x"]), vec![0..1]);
    }

    #[test]
    fn adjacent_parameters_of_one_type_are_grouped() {
        let out = rewrite("package p\n\nfunc f(a int, b int, c string, d string) {}\n");
        assert_eq!(out, "package p\n\nfunc f(a, b int, c, d string) {}\n");
    }

    #[test]
    fn grouped_parameters_are_left_alone() {
        let src = "package p\n\nfunc f(a, b int, c, d string) {}\n";
        let mut unit = parse_source(src).unwrap();
        assert_eq!(rewrite_signatures(&mut unit).unwrap(), 0);
        assert_eq!(print_unit(&unit).unwrap(), src);
    }

    #[test]
    fn qualified_and_bare_names_do_not_merge() {
        let src = "package p\n\nfunc f(a foo.T, b T) {}\n";
        assert_eq!(rewrite(src), src);
    }

    #[test]
    fn variadic_type_differs_from_its_element() {
        let src = "package p\n\nfunc f(a int, b ...int) {}\n";
        assert_eq!(rewrite(src), src);
    }

    #[test]
    fn merged_field_keeps_name_order_and_first_type() {
        let mut unit = parse_source("package p\n\nfunc f(x, y int, z int, w bool) {}\n").unwrap();
        let [sig] = locate_signatures(&unit)[..] else {
            panic!("expected one signature");
        };
        let before = unit.arena.signatures[sig].params.fields;
        let first_type = unit.arena.fields[unit.arena.fields(before)[0]].typ;
        assert!(rewrite_signature(&mut unit, sig).unwrap());

        let after = unit.arena.signatures[sig].params.fields;
        assert_eq!(
            names_of(&unit, after),
            vec![vec!["x", "y", "z"], vec!["w"]]
        );
        assert_eq!(unit.arena.fields[unit.arena.fields(after)[0]].typ, first_type);
    }

    #[test]
    fn single_unnamed_result_loses_parentheses() {
        let out = rewrite("package p\n\nfunc f() (error) {\n\treturn nil\n}\n");
        assert_eq!(out, "package p\n\nfunc f() error {\n\treturn nil\n}\n");
    }

    #[test]
    fn named_and_multiple_results_keep_parentheses() {
        let src = indoc! {"
            package p

            func f() (err error) {
            	return nil
            }

            func g() (User, error) {
            	return User{}, nil
            }
        "};
        assert_eq!(rewrite(src), src);
    }

    #[test]
    fn adjacent_unnamed_results_of_one_type_collapse() {
        let mut unit = parse_source("package p\n\ntype I interface {\n\tM() (int, int)\n}\n").unwrap();
        let [sig] = locate_signatures(&unit)[..] else {
            panic!("expected one signature");
        };
        assert!(rewrite_signature(&mut unit, sig).unwrap());
        let results = unit.arena.signatures[sig].results.unwrap();
        assert_eq!(results.fields.len(), 1);
        assert!(!results.has_delims());
        assert_eq!(
            print_unit(&unit).unwrap(),
            "package p\n\ntype I interface {\n\tM() int\n}\n"
        );
    }

    #[test]
    fn collapsed_results_of_bodyless_functions_lose_parentheses() {
        let out = rewrite("package p\n\nfunc f() (int, int)\n");
        assert_eq!(out, "package p\n\nfunc f() int\n");
    }

    #[test]
    fn interface_methods_are_rewritten() {
        let src = indoc! {"
            package p

            type MyInterface interface {
            	Get(c echo.Context) (error)
            	Update(id int, name string, age int, city string) (error)
            	Process(a int, b int, c string, d string) (User, error)
            }
        "};
        let want = indoc! {"
            package p

            type MyInterface interface {
            	Get(c echo.Context) error
            	Update(id int, name string, age int, city string) error
            	Process(a, b int, c, d string) (User, error)
            }
        "};
        assert_eq!(rewrite(src), want);
    }

    #[test]
    fn locator_reaches_nested_interfaces_but_not_literals() {
        let src = indoc! {"
            package p

            func outer(h interface{ Handle(a int, b int) }) {
            	type local interface {
            		Run(x string, y string)
            	}
            	f := func(a int, b int) {}
            	_ = f
            }
        "};
        let unit = parse_source(src).unwrap();
        // outer, Handle, Run
        assert_eq!(locate_signatures(&unit).len(), 3);
    }

    #[test]
    fn function_literals_are_not_grouped() {
        let src = indoc! {"
            package p

            var f = func(a int, b int) {}
        "};
        assert_eq!(rewrite(src), src);
    }

    #[test]
    fn methods_group_parameters_but_not_receivers() {
        let out = rewrite("package p\n\nfunc (s *S) Set(k string, v string) {}\n");
        assert_eq!(out, "package p\n\nfunc (s *S) Set(k, v string) {}\n");
    }

    proptest! {
        #[test]
        fn runs_cover_keys_and_alternate(keys in prop::collection::vec(0u8..3, 0..40)) {
            let runs = maximal_runs(&keys);
            let mut next = 0;
            for (i, run) in runs.iter().enumerate() {
                prop_assert_eq!(run.start, next);
                prop_assert!(run.end > run.start);
                prop_assert!(keys[run.clone()].iter().all(|k| *k == keys[run.start]));
                if i > 0 {
                    prop_assert_ne!(keys[runs[i - 1].start], keys[run.start]);
                }
                next = run.end;
            }
            prop_assert_eq!(next, keys.len());
        }

        #[test]
        fn grouping_conserves_names(types in prop::collection::vec(0usize..3, 1..8)) {
            const TYPES: [&str; 3] = ["int", "string", "[]byte"];
            let params: Vec<String> = types
                .iter()
                .enumerate()
                .map(|(i, &t)| format!("p{i} {}", TYPES[t]))
                .collect();
            let src = format!("package p\n\nfunc f({}) {{}}\n", params.join(", "));
            let mut unit = parse_source(&src).unwrap();
            let sig = locate_signatures(&unit)[0];
            rewrite_signature(&mut unit, sig).unwrap();

            let after = unit.arena.signatures[sig].params.fields;
            let flat: Vec<String> = names_of(&unit, after).into_iter().flatten().collect();
            let want: Vec<String> = (0..types.len()).map(|i| format!("p{i}")).collect();
            prop_assert_eq!(flat, want);
            prop_assert_eq!(after.len(), maximal_runs(&types).len());
        }
    }
}

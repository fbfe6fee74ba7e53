use crate::ast::*;

/// Recursion into the children of a node, in source order.
pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

/// Hooks called for each arena node reached by a walk.
///
/// Every default implementation just keeps walking; override the ones you
/// care about and call `walk` yourself to continue below them.
pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_source_file(&mut self, a: &'ast AstArena, f: &'ast SourceFile) {
        f.walk(a, self);
    }

    #[inline(always)]
    fn visit_gen_decl(&mut self, a: &'ast AstArena, id: GenDeclId) {
        a.gen_decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        a.funcs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        a.stmts[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        a.exprs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        a.types[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) {
        a.signatures[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_case_clause(&mut self, a: &'ast AstArena, id: CaseClauseId) {
        a.case_clauses[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_comm_clause(&mut self, a: &'ast AstArena, id: CommClauseId) {
        a.comm_clauses[id].walk(a, self);
    }
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    GenDeclId => visit_gen_decl,
    FuncDeclId => visit_func_decl,
    StmtId => visit_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
    CaseClauseId => visit_case_clause,
    CommClauseId => visit_comm_clause,
}

/// Arena buffer lookup for one list element type.
pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast> + 'ast,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for item in a.slice(*self) {
            item.walk(a, v);
        }
    }
}

macro_rules! impl_list_slice {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline(always)]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

impl_list_slice! {
    IdentName => ident_names,
    ExprId => exprs,
    StmtId => stmts,
    TypeId => types,
    FieldId => fields,
    Spec => specs,
    TopLevelDecl => top_decls,
    CaseClauseId => case_clauses,
    CommClauseId => comm_clauses,
    TypeTerm => type_terms,
    InterfaceElem => interface_elems,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

impl<'ast, C> Walk<'ast> for ClauseBlock<C>
where
    ListRef<C>: Walk<'ast>,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        self.clauses.walk(a, v);
    }
}

// Leaves.
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    Span,
    Symbol,
    IdentName,
    BasicLit,
    bool,
    GenDeclKind,
    BasicLitKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    BranchKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    #[derive(Default)]
    struct Counter {
        funcs: usize,
        signatures: usize,
        calls: usize,
    }

    impl<'ast> Visitor<'ast> for Counter {
        fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
            self.funcs += 1;
            a.funcs[id].walk(a, self);
        }

        fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) {
            self.signatures += 1;
            a.signatures[id].walk(a, self);
        }

        fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
            if matches!(a.exprs[id], Expr::Call { .. }) {
                self.calls += 1;
            }
            a.exprs[id].walk(a, self);
        }
    }

    #[test]
    fn reaches_nested_signatures_and_calls() {
        let unit = parse_source(
            "package p\n\
             type I interface{ M(x int) error }\n\
             func f() { g := func() {}; g(); switch { case h(): } }\n",
        )
        .expect("parses");
        let mut counter = Counter::default();
        counter.visit_source_file(&unit.arena, &unit.file);
        assert_eq!(counter.funcs, 1);
        // f, the interface method and the func literal.
        assert_eq!(counter.signatures, 3);
        assert_eq!(counter.calls, 2);
    }
}

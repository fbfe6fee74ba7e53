//! Statements, blocks and function bodies.

use super::{Elem, NO_EXTRA_LINEBREAK, NodeKey, Printer, Token, Ws};
use crate::ast::*;
use crate::walk::{Visitor, Walk};

impl Printer<'_> {
    pub(super) fn stmt(&mut self, id: StmtId, next_is_rbrace: bool) {
        let span = self.arena.stmts.span(id);
        self.set_pos(Some(span.start));

        match self.arena.stmts[id] {
            Stmt::Decl(decl) => self.gen_decl(decl),
            Stmt::Empty => {}
            Stmt::Labeled { label, stmt } => {
                // Pulled in front of the line break by `write_whitespace`.
                self.ws(Ws::Unindent);
                self.ident(label);
                self.token(Token::Colon);
                self.ws(Ws::Indent);
                if matches!(self.arena.stmts[stmt], Stmt::Empty) {
                    if !next_is_rbrace {
                        self.ws(Ws::Newline);
                        self.set_pos(Some(self.arena.stmts.span(stmt).start));
                        self.token(Token::Semicolon);
                        return;
                    }
                } else {
                    let line = self.line_for(Some(self.arena.stmts.span(stmt).start));
                    self.linebreak(line, 1, Ws::Ignore, true);
                }
                self.stmt(stmt, next_is_rbrace);
            }
            Stmt::Expr(x) => self.expr0(x, 1),
            Stmt::Send { chan, value } => {
                self.expr0(chan, 1);
                self.ws(Ws::Blank);
                self.op("<-");
                self.ws(Ws::Blank);
                self.expr0(value, 1);
            }
            Stmt::IncDec { x, inc } => {
                self.expr0(x, 2);
                self.op(if inc { "++" } else { "--" });
            }
            Stmt::Assign { lhs, op, op_pos, rhs } => {
                let depth = if lhs.len() > 1 && rhs.len() > 1 { 2 } else { 1 };
                let lhs = self.expr_elems(lhs);
                let rhs = self.expr_elems(rhs);
                self.expr_list(Some(span.start), &lhs, depth, 0, Some(op_pos.start));
                self.ws(Ws::Blank);
                self.set_pos(Some(op_pos.start));
                self.op(op.as_str());
                self.ws(Ws::Blank);
                self.expr_list(Some(op_pos.start), &rhs, depth, 0, None);
            }
            Stmt::Go { call } => {
                self.keyword("go");
                self.ws(Ws::Blank);
                self.expr(call);
            }
            Stmt::Defer { call } => {
                self.keyword("defer");
                self.ws(Ws::Blank);
                self.expr(call);
            }
            Stmt::Return { results } => {
                self.keyword("return");
                if !results.is_empty() {
                    self.ws(Ws::Blank);
                    let results = self.expr_elems(results);
                    if self.indent_list(&results) {
                        self.ws(Ws::Indent);
                        // No line break before the first result.
                        self.expr_list(None, &results, 1, super::expr::NO_INDENT, None);
                        self.ws(Ws::Unindent);
                    } else {
                        self.expr_list(None, &results, 1, 0, None);
                    }
                }
            }
            Stmt::Branch { kind, label } => {
                self.keyword(kind.keyword());
                if let Some(label) = label {
                    self.ws(Ws::Blank);
                    self.ident(label);
                }
            }
            Stmt::Block(block) => self.block(block, 1),
            Stmt::If { init, cond, then, els } => {
                self.keyword("if");
                self.control_clause(false, init, Some(cond), None);
                self.block(then, 1);
                if let Some(els) = els {
                    self.ws(Ws::Blank);
                    self.keyword("else");
                    self.ws(Ws::Blank);
                    self.stmt(els, next_is_rbrace);
                }
            }
            Stmt::Switch { init, tag, body } => {
                self.keyword("switch");
                self.control_clause(false, init, tag, None);
                self.case_block(body);
            }
            Stmt::TypeSwitch { init, assign, body } => {
                self.keyword("switch");
                if let Some(init) = init {
                    self.ws(Ws::Blank);
                    self.stmt(init, false);
                    self.token(Token::Semicolon);
                }
                self.ws(Ws::Blank);
                self.stmt(assign, false);
                self.ws(Ws::Blank);
                self.case_block(body);
            }
            Stmt::Select { body } => {
                self.keyword("select");
                self.ws(Ws::Blank);
                let empty = body.clauses.is_empty() && !self.comment_before(self.pos_for(body.r_brace.start));
                if empty {
                    self.set_pos(Some(body.l_brace.start));
                    self.token(Token::LBrace);
                    self.set_pos(Some(body.r_brace.start));
                    self.token(Token::RBrace);
                } else {
                    self.comm_block(body);
                }
            }
            Stmt::For { init, cond, post, body } => {
                self.keyword("for");
                self.control_clause(true, init, cond, post);
                self.block(body, 1);
            }
            Stmt::Range { key, value, define, x, body } => {
                self.keyword("for");
                self.ws(Ws::Blank);
                if let Some(key) = key {
                    self.expr(key);
                    if let Some(value) = value {
                        self.set_pos(Some(self.arena.exprs.span(value).start));
                        self.token(Token::Comma);
                        self.ws(Ws::Blank);
                        self.expr(value);
                    }
                    self.ws(Ws::Blank);
                    self.op(if define { ":=" } else { "=" });
                    self.ws(Ws::Blank);
                }
                self.keyword("range");
                self.ws(Ws::Blank);
                let x = self.strip_parens(x);
                self.expr(x);
                self.ws(Ws::Blank);
                self.block(body, 1);
            }
        }
    }

    pub(super) fn block(&mut self, block: Block, nindent: i64) {
        self.set_pos(Some(block.l_brace.start));
        self.token(Token::LBrace);
        let stmts = self.arena.stmts(block.stmts);
        self.stmt_list(stmts, nindent, true);
        self.linebreak(self.line_for(Some(block.r_brace.start)), 1, Ws::Ignore, true);
        self.set_pos(Some(block.r_brace.start));
        self.token(Token::RBrace);
    }

    fn stmt_list(&mut self, list: &[StmtId], nindent: i64, next_is_rbrace: bool) {
        if nindent > 0 {
            self.ws(Ws::Indent);
        }
        let slot = self.new_line_slot();
        let mut i = 0;
        for (k, &id) in list.iter().enumerate() {
            if matches!(self.arena.stmts[id], Stmt::Empty) {
                continue;
            }
            if !self.output.is_empty() {
                let line = self.line_for(Some(self.arena.stmts.span(id).start));
                let new_section = i == 0 || nindent == 0 || self.lines_from(slot) > 0;
                self.linebreak(line, 1, Ws::Ignore, new_section);
            }
            self.record_line(slot);
            self.stmt(id, next_is_rbrace && k == list.len() - 1);
            // Labels sit on their own lines; count from the labeled statement.
            let mut t = id;
            while let Stmt::Labeled { stmt, .. } = self.arena.stmts[t] {
                self.line_slots[slot] += 1;
                t = stmt;
            }
            i += 1;
        }
        self.free_line_slot();
        if nindent > 0 {
            self.ws(Ws::Unindent);
        }
    }

    /// Switch body: clauses at the level of the `switch`.
    fn case_block(&mut self, body: ClauseBlock<CaseClauseId>) {
        self.set_pos(Some(body.l_brace.start));
        self.token(Token::LBrace);
        let clauses = self.arena.case_clauses(body.clauses);
        for (i, &id) in clauses.iter().enumerate() {
            let span = self.arena.case_clauses.span(id);
            if !self.output.is_empty() {
                self.linebreak(self.line_for(Some(span.start)), 1, Ws::Ignore, true);
            }
            self.case_clause(id, i == clauses.len() - 1);
        }
        self.linebreak(self.line_for(Some(body.r_brace.start)), 1, Ws::Ignore, true);
        self.set_pos(Some(body.r_brace.start));
        self.token(Token::RBrace);
    }

    fn case_clause(&mut self, id: CaseClauseId, next_is_rbrace: bool) {
        let span = self.arena.case_clauses.span(id);
        let clause = self.arena.case_clauses[id];
        self.set_pos(Some(span.start));
        if clause.is_default {
            self.keyword("default");
        } else {
            self.keyword("case");
            self.ws(Ws::Blank);
            let list = self.expr_elems(clause.list);
            self.expr_list(Some(span.start), &list, 1, 0, Some(clause.colon.start));
        }
        self.set_pos(Some(clause.colon.start));
        self.token(Token::Colon);
        let body = self.arena.stmts(clause.body);
        self.stmt_list(body, 1, next_is_rbrace);
    }

    fn comm_block(&mut self, body: ClauseBlock<CommClauseId>) {
        self.set_pos(Some(body.l_brace.start));
        self.token(Token::LBrace);
        let clauses = self.arena.comm_clauses(body.clauses);
        for (i, &id) in clauses.iter().enumerate() {
            let span = self.arena.comm_clauses.span(id);
            if !self.output.is_empty() {
                self.linebreak(self.line_for(Some(span.start)), 1, Ws::Ignore, true);
            }
            let clause = self.arena.comm_clauses[id];
            self.set_pos(Some(span.start));
            match clause.comm {
                Some(comm) => {
                    self.keyword("case");
                    self.ws(Ws::Blank);
                    self.stmt(comm, false);
                }
                None => self.keyword("default"),
            }
            self.set_pos(Some(clause.colon.start));
            self.token(Token::Colon);
            let stmts = self.arena.stmts(clause.body);
            self.stmt_list(stmts, 1, i == clauses.len() - 1);
        }
        self.linebreak(self.line_for(Some(body.r_brace.start)), 1, Ws::Ignore, true);
        self.set_pos(Some(body.r_brace.start));
        self.token(Token::RBrace);
    }

    fn control_clause(&mut self, is_for: bool, init: Option<StmtId>, cond: Option<ExprId>, post: Option<StmtId>) {
        self.ws(Ws::Blank);
        let mut needs_blank = false;
        if init.is_none() && post.is_none() {
            if let Some(cond) = cond {
                let cond = self.strip_parens(cond);
                self.expr(cond);
                needs_blank = true;
            }
        } else {
            if let Some(init) = init {
                self.stmt(init, false);
            }
            self.token(Token::Semicolon);
            self.ws(Ws::Blank);
            if let Some(cond) = cond {
                let cond = self.strip_parens(cond);
                self.expr(cond);
                needs_blank = true;
            }
            if is_for {
                self.token(Token::Semicolon);
                self.ws(Ws::Blank);
                needs_blank = false;
                if let Some(post) = post {
                    self.stmt(post, false);
                    needs_blank = true;
                }
            }
        }
        if needs_blank {
            self.ws(Ws::Blank);
        }
    }

    /// Drops parentheses around a header expression unless a composite
    /// literal inside would then read as the opening brace of the block.
    fn strip_parens(&self, x: ExprId) -> ExprId {
        let Expr::Paren { x: inner } = self.arena.exprs[x] else {
            return x;
        };
        let mut finder = TypedLiteralFinder { found: false };
        finder.visit_expr(self.arena, inner);
        if finder.found { x } else { self.strip_parens(inner) }
    }

    /// Body of a function declaration or literal, on one line when it is
    /// short enough to fit next to a header of `header_size` columns.
    pub(super) fn func_body(&mut self, header_size: i64, sep: Ws, body: Option<Block>) {
        let Some(body) = body else { return };

        let saved_level = self.level;
        self.level = 0;

        const MAX_SIZE: i64 = 100;
        if header_size + self.body_size(body, MAX_SIZE) <= MAX_SIZE {
            self.ws(sep);
            self.set_pos(Some(body.l_brace.start));
            self.token(Token::LBrace);
            let stmts = self.arena.stmts(body.stmts);
            if !stmts.is_empty() {
                self.ws(Ws::Blank);
                for (i, &s) in stmts.iter().enumerate() {
                    if i > 0 {
                        self.token(Token::Semicolon);
                        self.ws(Ws::Blank);
                    }
                    self.stmt(s, i == stmts.len() - 1);
                }
                self.ws(Ws::Blank);
            }
            self.toggle(NO_EXTRA_LINEBREAK);
            self.set_pos(Some(body.r_brace.start));
            self.token(Token::RBrace);
            self.toggle(NO_EXTRA_LINEBREAK);
        } else {
            if sep != Ws::Ignore {
                self.ws(Ws::Blank);
            }
            self.block(body, 1);
        }

        self.level = saved_level;
    }

    fn body_size(&mut self, body: Block, max: i64) -> i64 {
        if self.mode != super::Mode::Bare
            && self.line_for(Some(body.l_brace.start)) != self.line_for(Some(body.r_brace.start))
        {
            return max + 1;
        }
        let stmts = self.arena.stmts(body.stmts);
        if stmts.len() > 5 {
            return max + 1;
        }
        let mut size = self.comment_size_before(self.pos_for(body.r_brace.start));
        for (i, &s) in stmts.iter().enumerate() {
            if size > max {
                break;
            }
            if i > 0 {
                size += 2;
            }
            size += self.node_size(NodeKey::Stmt(s), max);
        }
        size
    }

    /// Heuristic for `return` lists: indent the whole list when an element
    /// starts below the end of the previous one, or when more than one
    /// element spans lines.
    pub(super) fn indent_list(&self, list: &[Elem]) -> bool {
        if list.len() < 2 {
            return false;
        }
        let b = self.line_for(Some(self.elem_span(list[0]).start));
        let e = self.line_for(Some(self.elem_span(list[list.len() - 1]).end));
        if !(0 < b && b < e) {
            return false;
        }
        let mut multi_line = 0;
        let mut line = b;
        for &x in list {
            let span = self.elem_span(x);
            let xb = self.line_for(Some(span.start));
            let xe = self.line_for(Some(span.end));
            if line < xb {
                return true;
            }
            if xb < xe {
                multi_line += 1;
            }
            line = xe;
        }
        multi_line > 1
    }
}

/// Looks for a composite literal whose type is a plain (possibly
/// qualified) name, outside any parentheses.
struct TypedLiteralFinder {
    found: bool,
}

impl<'ast> Visitor<'ast> for TypedLiteralFinder {
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        if self.found {
            return;
        }
        match a.exprs[id] {
            Expr::Paren { .. } => {}
            Expr::CompositeLit { typ, .. } => {
                if typ.is_some_and(|t| is_type_name(a, t)) {
                    self.found = true;
                }
            }
            _ => a.exprs[id].walk(a, self),
        }
    }
}

fn is_type_name(a: &AstArena, x: ExprId) -> bool {
    match a.exprs[x] {
        Expr::Ident(_) => true,
        Expr::Selector { x, .. } => is_type_name(a, x),
        _ => false,
    }
}

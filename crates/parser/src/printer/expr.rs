//! Expressions, types and comma-separated lists.

use super::{Elem, NO_EXTRA_BLANK, NO_EXTRA_LINEBREAK, NodeKey, Position, Printer, Token, Ws};
use crate::ast::*;

/// A line break before the closing token adds a trailing comma.
pub(super) const COMMA_TERM: u8 = 1;
/// The list starts already indented.
pub(super) const NO_INDENT: u8 = 2;

const LOWEST_PREC: u8 = 0;
const UNARY_PREC: u8 = 6;
const HIGHEST_PREC: u8 = 7;

fn reduce_depth(depth: i32) -> i32 {
    (depth - 1).max(1)
}

impl Printer<'_> {
    pub(super) fn expr(&mut self, x: ExprId) {
        self.expr1(x, LOWEST_PREC, 1);
    }

    pub(super) fn expr0(&mut self, x: ExprId, depth: i32) {
        self.expr1(x, LOWEST_PREC, depth);
    }

    pub(super) fn typ(&mut self, t: TypeId) {
        self.type1(t, LOWEST_PREC, 1);
    }

    pub(super) fn expr_elems(&self, list: ListRef<ExprId>) -> Vec<Elem> {
        self.arena.exprs(list).iter().map(|&x| Elem::Expr(x)).collect()
    }

    fn expr1(&mut self, id: ExprId, prec1: u8, depth: i32) {
        let span = self.arena.exprs.span(id);
        self.set_pos(Some(span.start));

        match self.arena.exprs[id] {
            Expr::Ident(name) => self.ident(name),
            Expr::BasicLit(lit) => self.basic_lit(lit),
            Expr::Binary { .. } => {
                let depth = depth.max(1);
                let cutoff = self.cutoff(id, depth);
                self.binary_expr(id, prec1, cutoff, depth);
            }
            Expr::KeyValue { key, value } => {
                self.expr(key);
                self.token(Token::Colon);
                self.ws(Ws::Blank);
                self.expr(value);
            }
            Expr::Star { x } => {
                if UNARY_PREC < prec1 {
                    self.token(Token::LParen);
                    self.op("*");
                    self.expr(x);
                    self.token(Token::RParen);
                } else {
                    self.op("*");
                    self.expr(x);
                }
            }
            Expr::Unary { op, x } => {
                if UNARY_PREC < prec1 {
                    self.token(Token::LParen);
                    self.expr(id);
                    self.token(Token::RParen);
                } else {
                    self.op(op.as_str());
                    self.expr1(x, UNARY_PREC, depth);
                }
            }
            Expr::FuncLit { sig, body } => {
                self.keyword("func");
                let start_col = self.out.col - "func".len() as i64;
                self.signature(sig);
                let header = self.distance_from(span.start, start_col);
                self.func_body(header, Ws::Blank, Some(body));
            }
            Expr::Paren { x } => {
                if matches!(self.arena.exprs[x], Expr::Paren { .. }) {
                    self.expr0(x, depth);
                } else {
                    self.token(Token::LParen);
                    self.expr0(x, reduce_depth(depth));
                    self.set_pos(Some(span.end - 1));
                    self.token(Token::RParen);
                }
            }
            Expr::Selector { x, sel } => {
                self.selector_expr(x, sel, depth, false);
            }
            Expr::TypeAssert { x, typ, r_paren } => {
                self.expr1(x, HIGHEST_PREC, depth);
                self.token(Token::Period);
                self.token(Token::LParen);
                match typ {
                    Some(typ) => self.typ(typ),
                    None => self.keyword("type"),
                }
                self.set_pos(Some(r_paren.start));
                self.token(Token::RParen);
            }
            Expr::Index { x, l_brack, indices, r_brack } => {
                self.expr1(x, HIGHEST_PREC, 1);
                self.set_pos(Some(l_brack.start));
                self.token(Token::LBrack);
                let list = self.expr_elems(indices);
                if let [Elem::Expr(only)] = list.as_slice() {
                    self.expr0(*only, depth + 1);
                } else {
                    self.expr_list(Some(l_brack.start), &list, depth + 1, COMMA_TERM, Some(r_brack.start));
                }
                self.set_pos(Some(r_brack.start));
                self.token(Token::RBrack);
            }
            Expr::Slice { x, lo, hi, max, r_brack, .. } => {
                self.expr1(x, HIGHEST_PREC, 1);
                self.token(Token::LBrack);
                let mut indices = vec![lo, hi];
                if max.is_some() {
                    indices.push(max);
                }
                // Blanks around `:` only when some bound is a binary expression.
                let mut needs_blanks = false;
                if depth <= 1 {
                    let count = indices.iter().flatten().count();
                    let has_binaries = indices
                        .iter()
                        .flatten()
                        .any(|&i| matches!(self.arena.exprs[i], Expr::Binary { .. }));
                    needs_blanks = count > 1 && has_binaries;
                }
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        if indices[i - 1].is_some() && needs_blanks {
                            self.ws(Ws::Blank);
                        }
                        self.token(Token::Colon);
                        if index.is_some() && needs_blanks {
                            self.ws(Ws::Blank);
                        }
                    }
                    if let Some(index) = *index {
                        self.expr0(index, depth + 1);
                    }
                }
                self.set_pos(Some(r_brack.start));
                self.token(Token::RBrack);
            }
            Expr::Call { fun, l_paren, args, ellipsis, r_paren } => {
                let depth = if args.len() > 1 { depth + 1 } else { depth };
                // Conversions to function or receive-only channel types
                // need the type in parentheses.
                let paren = match self.arena.exprs[fun] {
                    Expr::Type(t) => matches!(
                        self.arena.types[t],
                        Type::Func { .. } | Type::Chan { dir: ChanDir::Recv, .. }
                    ),
                    _ => false,
                };
                if paren {
                    self.token(Token::LParen);
                }
                let was_indented = match self.arena.exprs[fun] {
                    Expr::Selector { x, sel } => {
                        self.set_pos(Some(self.arena.exprs.span(fun).start));
                        self.selector_expr(x, sel, depth, true)
                    }
                    _ => {
                        self.expr1(fun, HIGHEST_PREC, depth);
                        false
                    }
                };
                if paren {
                    self.token(Token::RParen);
                }

                self.set_pos(Some(l_paren.start));
                self.token(Token::LParen);
                let list = self.expr_elems(args);
                match ellipsis {
                    Some(dots) => {
                        self.expr_list(Some(l_paren.start), &list, depth, 0, Some(dots.start));
                        self.set_pos(Some(dots.start));
                        self.token(Token::Ellipsis);
                        if self.line_for(Some(dots.start)) < self.line_for(Some(r_paren.start)) {
                            self.token(Token::Comma);
                            self.ws(Ws::Formfeed);
                        }
                    }
                    None => {
                        self.expr_list(Some(l_paren.start), &list, depth, COMMA_TERM, Some(r_paren.start));
                    }
                }
                self.set_pos(Some(r_paren.start));
                self.token(Token::RParen);
                if was_indented {
                    self.ws(Ws::Unindent);
                }
            }
            Expr::CompositeLit { typ, l_brace, elts, r_brace } => {
                if let Some(typ) = typ {
                    self.expr1(typ, HIGHEST_PREC, depth);
                }
                self.level += 1;
                self.set_pos(Some(l_brace.start));
                self.token(Token::LBrace);
                let list = self.expr_elems(elts);
                self.expr_list(Some(l_brace.start), &list, 1, COMMA_TERM, Some(r_brace.start));
                // A trailing block comment must not push `}` to a new line
                // when there is no trailing comma.
                let mut mode = NO_EXTRA_LINEBREAK;
                if !elts.is_empty() {
                    mode |= NO_EXTRA_BLANK;
                }
                self.ws(Ws::Indent);
                self.ws(Ws::Unindent);
                self.toggle(mode);
                self.set_pos(Some(r_brace.start));
                self.token(Token::RBrace);
                self.toggle(mode);
                self.level -= 1;
            }
            Expr::Type(t) => self.type1(t, prec1, depth),
        }
    }

    /// Prints `x.sel`; a selector on a later line than `x` moves to a new,
    /// indented line. Reports whether that happened.
    fn selector_expr(&mut self, x: ExprId, sel: IdentName, depth: i32, is_method: bool) -> bool {
        self.expr1(x, HIGHEST_PREC, depth);
        self.token(Token::Period);
        let line = self.line_for(Some(sel.pos.start));
        if self.pos.is_valid() && self.pos.line < line {
            self.ws(Ws::Indent);
            self.ws(Ws::Newline);
            self.ident(sel);
            if !is_method {
                self.ws(Ws::Unindent);
            }
            return true;
        }
        self.ident(sel);
        false
    }

    fn binary_expr(&mut self, id: ExprId, prec1: u8, cutoff: u8, depth: i32) {
        let Expr::Binary { x, op, op_pos, y } = self.arena.exprs[id] else {
            return;
        };
        let prec = op.precedence();
        if prec < prec1 {
            self.token(Token::LParen);
            self.expr0(id, reduce_depth(depth));
            self.token(Token::RParen);
            return;
        }

        let mut print_blank = prec < cutoff;
        let mut ws = Ws::Indent;
        self.expr1(x, prec, depth + self.diff_prec(x, prec));
        if print_blank {
            self.ws(Ws::Blank);
        }
        let xline = self.pos.line;
        let yline = self.line_for(Some(self.arena.exprs.span(y).start));
        self.set_pos(Some(op_pos.start));
        self.op(op.as_str());
        if xline != yline && xline > 0 && yline > 0 && self.linebreak(yline, 1, ws, true) > 0 {
            ws = Ws::Ignore;
            print_blank = false;
        }
        if print_blank {
            self.ws(Ws::Blank);
        }
        self.expr1(y, prec + 1, depth + 1);
        if ws == Ws::Ignore {
            self.ws(Ws::Unindent);
        }
    }

    /// Precedence from which operators are written without blanks.
    fn cutoff(&self, id: ExprId, depth: i32) -> u8 {
        let (has4, has5, max_problem) = self.walk_binary(id);
        if max_problem > 0 {
            return max_problem + 1;
        }
        match (has4 && has5, depth == 1) {
            (true, true) => 5,
            (true, false) => 4,
            (false, true) => 6,
            (false, false) => 4,
        }
    }

    fn walk_binary(&self, id: ExprId) -> (bool, bool, u8) {
        let Expr::Binary { x, op, y, .. } = self.arena.exprs[id] else {
            return (false, false, 0);
        };
        let prec = op.precedence();
        let mut has4 = prec == 4;
        let mut has5 = prec == 5;
        let mut max_problem = 0;

        if let Expr::Binary { op: left, .. } = self.arena.exprs[x] {
            // A lower precedence operand gets parentheses and counts as one.
            if left.precedence() >= prec {
                let (h4, h5, mp) = self.walk_binary(x);
                has4 |= h4;
                has5 |= h5;
                max_problem = max_problem.max(mp);
            }
        }

        match self.arena.exprs[y] {
            Expr::Binary { op: right, .. } if right.precedence() > prec => {
                let (h4, h5, mp) = self.walk_binary(y);
                has4 |= h4;
                has5 |= h5;
                max_problem = max_problem.max(mp);
            }
            Expr::Star { .. } if op == BinaryOp::Div => max_problem = 5,
            Expr::Unary { op: unary, .. } => match (op.as_str(), unary.as_str()) {
                // `/*`, `&&` and `&^` would lex as other tokens.
                ("&", "&") | ("&", "^") => max_problem = 5,
                ("+", "+") | ("-", "-") => max_problem = max_problem.max(4),
                _ => {}
            },
            _ => {}
        }
        (has4, has5, max_problem)
    }

    fn diff_prec(&self, x: ExprId, prec: u8) -> i32 {
        match self.arena.exprs[x] {
            Expr::Binary { op, .. } if op.precedence() == prec => 0,
            _ => 1,
        }
    }

    fn type1(&mut self, id: TypeId, prec1: u8, depth: i32) {
        let span = self.arena.types.span(id);
        self.set_pos(Some(span.start));

        match self.arena.types[id] {
            Type::Name { pkg, name, args } => {
                match pkg {
                    Some(pkg) => {
                        self.ident(pkg);
                        self.token(Token::Period);
                        let line = self.line_for(Some(name.pos.start));
                        if self.pos.is_valid() && self.pos.line < line {
                            self.ws(Ws::Indent);
                            self.ws(Ws::Newline);
                            self.ident(name);
                            self.ws(Ws::Unindent);
                        } else {
                            self.ident(name);
                        }
                    }
                    None => self.ident(name),
                }
                if let Some(args) = args {
                    self.set_pos(Some(args.l_brack.start));
                    self.token(Token::LBrack);
                    let list: Vec<Elem> = self.arena.types(args.args).iter().map(|&t| Elem::Type(t)).collect();
                    if let [Elem::Type(only)] = list.as_slice() {
                        self.type1(*only, LOWEST_PREC, depth + 1);
                    } else {
                        self.expr_list(
                            Some(args.l_brack.start),
                            &list,
                            depth + 1,
                            COMMA_TERM,
                            Some(args.r_brack.start),
                        );
                    }
                    self.set_pos(Some(args.r_brack.start));
                    self.token(Token::RBrack);
                }
            }
            Type::Pointer { elem } => {
                if UNARY_PREC < prec1 {
                    self.token(Token::LParen);
                    self.op("*");
                    self.typ(elem);
                    self.token(Token::RParen);
                } else {
                    self.op("*");
                    self.typ(elem);
                }
            }
            Type::Array { len, elem } => {
                self.token(Token::LBrack);
                match len {
                    ArrayLen::Expr(len) => self.expr(len),
                    ArrayLen::Ellipsis => self.token(Token::Ellipsis),
                }
                self.token(Token::RBrack);
                self.typ(elem);
            }
            Type::Slice { elem } => {
                self.token(Token::LBrack);
                self.token(Token::RBrack);
                self.typ(elem);
            }
            Type::Map { key, value } => {
                self.keyword("map");
                self.token(Token::LBrack);
                self.typ(key);
                self.token(Token::RBrack);
                self.typ(value);
            }
            Type::Chan { dir, elem } => {
                match dir {
                    ChanDir::Both => self.keyword("chan"),
                    ChanDir::Recv => {
                        self.op("<-");
                        self.keyword("chan");
                    }
                    ChanDir::Send => {
                        self.keyword("chan");
                        self.op("<-");
                    }
                }
                self.ws(Ws::Blank);
                self.typ(elem);
            }
            Type::Func { sig } => {
                self.keyword("func");
                self.signature(sig);
            }
            Type::Struct { l_brace, fields, r_brace } => {
                self.keyword("struct");
                self.struct_fields(l_brace, fields, r_brace);
            }
            Type::Interface { l_brace, elems, r_brace } => {
                self.keyword("interface");
                self.interface_elems(l_brace, elems, r_brace);
            }
            Type::Paren { inner } => {
                if matches!(self.arena.types[inner], Type::Paren { .. }) {
                    self.type1(inner, LOWEST_PREC, depth);
                } else {
                    self.token(Token::LParen);
                    self.type1(inner, LOWEST_PREC, reduce_depth(depth));
                    self.set_pos(Some(span.end - 1));
                    self.token(Token::RParen);
                }
            }
            Type::Variadic { elem } => {
                self.token(Token::Ellipsis);
                self.typ(elem);
            }
            Type::Union { terms } => self.union(terms, depth),
        }
    }

    /// `A | ~B | C`, laid out like a chain of binary `|` expressions.
    fn union(&mut self, terms: ListRef<TypeTerm>, depth: i32) {
        let print_blank = depth == 1;
        for (i, &term) in self.arena.type_terms(terms).iter().enumerate() {
            let mut ws = Ws::Indent;
            let term_start = self.arena.types.span(term.typ).start;
            if i > 0 {
                if print_blank {
                    self.ws(Ws::Blank);
                }
                let xline = self.pos.line;
                let yline = self.line_for(Some(term_start));
                self.op("|");
                let mut blank = print_blank;
                if xline != yline && xline > 0 && yline > 0 && self.linebreak(yline, 1, ws, true) > 0 {
                    ws = Ws::Ignore;
                    blank = false;
                }
                if blank {
                    self.ws(Ws::Blank);
                }
            }
            if term.tilde {
                self.op("~");
            }
            let term_depth = if i > 0 { depth + 1 } else { depth };
            self.type1(term.typ, UNARY_PREC, term_depth);
            if ws == Ws::Ignore {
                self.ws(Ws::Unindent);
            }
        }
    }

    pub(super) fn elem_span(&self, elem: Elem) -> Span {
        match elem {
            Elem::Expr(x) => self.arena.exprs.span(x),
            Elem::Ident(name) => name.pos,
            Elem::Type(t) => self.arena.types.span(t),
        }
    }

    fn elem_size(&mut self, elem: Elem, max: i64) -> i64 {
        match elem {
            Elem::Expr(x) => self.node_size(NodeKey::Expr(x), max),
            Elem::Type(t) => self.node_size(NodeKey::Type(t), max),
            Elem::Ident(name) => {
                let len = self.unit.name(name).len() as i64;
                if len <= max { len } else { max + 1 }
            }
        }
    }

    fn print_elem(&mut self, elem: Elem, depth: i32) {
        match elem {
            Elem::Expr(x) => self.expr0(x, depth),
            Elem::Ident(name) => self.ident(name),
            Elem::Type(t) => self.type1(t, LOWEST_PREC, depth),
        }
    }

    fn opt_pos(&self, offset: Option<u32>) -> Position {
        offset.map_or_else(Position::default, |o| self.pos_for(o))
    }

    /// Comma-separated list between `prev0` and `next0`, breaking lines
    /// where the source does and aligning `key: value` pairs in columns.
    pub(super) fn expr_list(&mut self, prev0: Option<u32>, list: &[Elem], depth: i32, mode: u8, next0: Option<u32>) {
        let Some(&last) = list.last() else { return };

        let prev = self.opt_pos(prev0);
        let next = self.opt_pos(next0);
        let mut line = self.line_for(Some(self.elem_span(list[0]).start));
        let end_line = self.line_for(Some(self.elem_span(last).end));

        if prev.is_valid() && prev.line == line && line == end_line {
            for (i, &x) in list.iter().enumerate() {
                if i > 0 {
                    self.set_pos(Some(self.elem_span(x).start));
                    self.token(Token::Comma);
                    self.ws(Ws::Blank);
                }
                self.print_elem(x, depth);
            }
            return;
        }

        // Spans lines: follow the source line breaks. The first break is a
        // section break so the list does not align with what came before.
        let mut ws = if mode & NO_INDENT == 0 { Ws::Indent } else { Ws::Ignore };
        let mut prev_break: isize = -1;
        if prev.is_valid() && prev.line < line && self.linebreak(line, 0, ws, true) > 0 {
            ws = Ws::Ignore;
            prev_break = 0;
        }

        const INFINITY: i64 = 1_000_000;
        const SMALL_SIZE: i64 = 40;
        const RATIO: f64 = 2.5;

        // Geometric mean of the key sizes of the current run.
        let mut size = 0;
        let mut lnsum = 0.0_f64;
        let mut count = 0;

        let mut prev_line = prev.line;
        for (i, &x) in list.iter().enumerate() {
            let span = self.elem_span(x);
            line = self.line_for(Some(span.start));

            let pair = match x {
                Elem::Expr(e) => match self.arena.exprs[e] {
                    Expr::KeyValue { key, value } => Some((key, value)),
                    _ => None,
                },
                _ => None,
            };

            let mut use_ff = true;
            let prev_size = size;
            size = self.elem_size(x, INFINITY);
            if size <= INFINITY && prev.is_valid() && next.is_valid() {
                if let Some((key, _)) = pair {
                    size = self.node_size(NodeKey::Expr(key), INFINITY);
                }
            } else {
                size = 0;
            }

            if prev_size > 0 && size > 0 {
                if count == 0 || (prev_size <= SMALL_SIZE && size <= SMALL_SIZE) {
                    use_ff = false;
                } else {
                    let geomean = (lnsum / f64::from(count)).exp();
                    let ratio = size as f64 / geomean;
                    use_ff = RATIO * ratio <= 1.0 || RATIO <= ratio;
                }
            }

            let needs_linebreak = 0 < prev_line && prev_line < line;
            if i > 0 {
                if !needs_linebreak {
                    self.set_pos(Some(span.start));
                }
                self.token(Token::Comma);
                let mut needs_blank = true;
                if needs_linebreak {
                    let new_section = use_ff || prev_break + 1 < i as isize;
                    let nbreaks = self.linebreak(line, 0, ws, new_section);
                    if nbreaks > 0 {
                        ws = Ws::Ignore;
                        prev_break = i as isize;
                        needs_blank = false;
                    }
                    if nbreaks > 1 {
                        lnsum = 0.0;
                        count = 0;
                    }
                }
                if needs_blank {
                    self.ws(Ws::Blank);
                }
            }

            match pair {
                Some((key, value)) if list.len() > 1 && size > 0 && needs_linebreak => {
                    self.expr(key);
                    self.token(Token::Colon);
                    self.ws(Ws::Vtab);
                    self.expr(value);
                }
                _ => self.print_elem(x, depth),
            }

            if size > 0 {
                lnsum += (size as f64).ln();
                count += 1;
            }
            prev_line = self.line_for(Some(span.end));
        }

        if mode & COMMA_TERM != 0 && next.is_valid() && self.pos.line < next.line {
            self.token(Token::Comma);
            if ws == Ws::Ignore && mode & NO_INDENT == 0 {
                self.ws(Ws::Unindent);
            }
            self.ws(Ws::Formfeed);
            return;
        }

        if ws == Ws::Ignore && mode & NO_INDENT == 0 {
            self.ws(Ws::Unindent);
        }
    }
}

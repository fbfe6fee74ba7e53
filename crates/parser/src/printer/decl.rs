//! Files, declarations, signatures and field lists.

use super::{Elem, NodeKey, Printer, Token, Ws};
use crate::ast::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParamMode {
    Func,
    FuncTypeParams,
    TypeParams,
}

/// Declaration keyword, used to separate runs of different kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclTok {
    None,
    Gen(GenDeclKind),
    Func,
}

impl Printer<'_> {
    pub(super) fn file(&mut self) {
        let file = self.unit.file;
        self.set_pos(Some(file.package_pos.start));
        self.keyword("package");
        self.ws(Ws::Blank);
        self.ident(file.name);
        self.decl_list(file.decls, file.name.pos.end);
        self.ws(Ws::Newline);
    }

    fn decl_list(&mut self, decls: ListRef<TopLevelDecl>, mut prev_end: u32) {
        let mut tok = DeclTok::None;
        for &decl in self.arena.top_decls(decls) {
            let prev = tok;
            let span = match decl {
                TopLevelDecl::Gen(id) => {
                    tok = DeclTok::Gen(self.arena.gen_decls[id].kind);
                    self.arena.gen_decls.span(id)
                }
                TopLevelDecl::Func(id) => {
                    tok = DeclTok::Func;
                    self.arena.funcs.span(id)
                }
            };
            if !self.output.is_empty() {
                let min = if prev != tok || self.has_doc_comment(prev_end, span.start) {
                    2
                } else {
                    1
                };
                let num_lines = self.line_for(Some(span.end)) - self.line_for(Some(span.start)) + 1;
                let new_section = tok == DeclTok::Func && num_lines > 1;
                self.linebreak(self.line_for(Some(span.start)), min, Ws::Ignore, new_section);
            }
            match decl {
                TopLevelDecl::Gen(id) => self.gen_decl(id),
                TopLevelDecl::Func(id) => self.func_decl(id),
            }
            prev_end = span.end;
        }
    }

    pub(super) fn gen_decl(&mut self, id: GenDeclId) {
        let decl = self.arena.gen_decls[id];
        let specs = self.arena.specs(decl.specs);
        self.set_pos(Some(decl.kw_pos.start));
        self.keyword(decl.kind.keyword());
        self.ws(Ws::Blank);

        if decl.l_paren.is_none() && specs.len() == 1 {
            self.spec(specs[0], 1, true);
            return;
        }

        self.set_pos(decl.l_paren.map(|s| s.start));
        self.token(Token::LParen);
        let n = specs.len();
        if n > 0 {
            self.ws(Ws::Indent);
            self.ws(Ws::Formfeed);
            let keep_type = if n > 1 && matches!(decl.kind, GenDeclKind::Const | GenDeclKind::Var) {
                Some(keep_type_column(specs))
            } else {
                None
            };
            let slot = self.new_line_slot();
            for (i, &spec) in specs.iter().enumerate() {
                if i > 0 {
                    let new_section = self.lines_from(slot) > 0;
                    self.linebreak(self.line_for(Some(spec.span().start)), 1, Ws::Ignore, new_section);
                }
                self.record_line(slot);
                match (&keep_type, spec) {
                    (Some(keep), Spec::Value(value)) => self.value_spec(value, keep[i]),
                    _ => self.spec(spec, n, false),
                }
            }
            self.free_line_slot();
            self.ws(Ws::Unindent);
            self.ws(Ws::Formfeed);
        }
        self.set_pos(decl.r_paren.map(|s| s.start));
        self.token(Token::RParen);
    }

    /// A value spec inside a group of two or more, laid out in columns.
    fn value_spec(&mut self, spec: ValueSpec, keep_type: bool) {
        self.ident_list(spec.names, false);
        let mut extra_tabs = 3;
        if spec.typ.is_some() || keep_type {
            self.ws(Ws::Vtab);
            extra_tabs -= 1;
        }
        if let Some(typ) = spec.typ {
            self.typ(typ);
        }
        if !spec.values.is_empty() {
            self.ws(Ws::Vtab);
            self.op("=");
            self.ws(Ws::Blank);
            let values = self.expr_elems(spec.values);
            self.expr_list(None, &values, 1, 0, None);
            extra_tabs -= 1;
        }
        if self.has_line_comment(spec.span.end) {
            for _ in 0..extra_tabs {
                self.ws(Ws::Vtab);
            }
        }
    }

    fn spec(&mut self, spec: Spec, n: usize, do_indent: bool) {
        match spec {
            Spec::Import(import) => {
                if let Some(name) = import.name {
                    match name {
                        ImportName::Dot(span) => {
                            self.set_pos(Some(span.start));
                            self.name(".");
                        }
                        ImportName::Blank(span) => {
                            self.set_pos(Some(span.start));
                            self.name("_");
                        }
                        ImportName::Name(ident) => self.ident(ident),
                    }
                    self.ws(Ws::Blank);
                }
                self.basic_lit(import.path);
            }
            Spec::Value(value) => {
                self.ident_list(value.names, do_indent);
                if let Some(typ) = value.typ {
                    self.ws(Ws::Blank);
                    self.typ(typ);
                }
                if !value.values.is_empty() {
                    self.ws(Ws::Blank);
                    self.op("=");
                    self.ws(Ws::Blank);
                    let values = self.expr_elems(value.values);
                    self.expr_list(None, &values, 1, 0, None);
                }
            }
            Spec::Type(ts) => {
                self.ident(ts.name);
                if let Some(params) = ts.type_params {
                    self.parameters(params, ParamMode::TypeParams);
                }
                self.ws(if n == 1 { Ws::Blank } else { Ws::Vtab });
                if ts.assign.is_some() {
                    self.op("=");
                    self.ws(Ws::Blank);
                }
                self.typ(ts.typ);
            }
        }
    }

    fn func_decl(&mut self, id: FuncDeclId) {
        let decl = self.arena.funcs[id];
        self.set_pos(Some(decl.func_pos.start));
        self.keyword("func");
        self.ws(Ws::Blank);
        // The blank is still pending here, hence the extra column.
        let start_col = self.out.col - "func ".len() as i64;
        if let Some(recv) = decl.recv {
            self.parameters(recv, ParamMode::Func);
            self.ws(Ws::Blank);
        }
        self.ident(decl.name);
        if let Some(params) = decl.type_params {
            self.parameters(params, ParamMode::FuncTypeParams);
        }
        self.signature(decl.sig);
        let header = self.distance_from(decl.func_pos.start, start_col);
        self.func_body(header, Ws::Vtab, decl.body);
    }

    /// Parameters and results, without the `func` keyword.
    pub(super) fn signature(&mut self, id: SignatureId) {
        let sig = self.arena.signatures[id];
        self.parameters(sig.params, ParamMode::Func);

        let Some(results) = sig.results else { return };
        let fields = self.arena.fields(results.fields);
        let n: usize = fields
            .iter()
            .map(|&f| self.arena.ident_names(self.arena.fields[f].names).len().max(1))
            .sum();
        if n == 0 {
            return;
        }
        self.ws(Ws::Blank);
        let first = self.arena.fields[fields[0]];
        if n == 1 && first.names.is_empty() {
            let typ = self.strip_parens_always(first.typ);
            self.typ(typ);
            return;
        }
        self.parameters(results, ParamMode::Func);
    }

    pub(super) fn parameters(&mut self, list: FieldList, mode: ParamMode) {
        let (open, close) = match mode {
            ParamMode::Func => (Token::LParen, Token::RParen),
            ParamMode::FuncTypeParams | ParamMode::TypeParams => (Token::LBrack, Token::RBrack),
        };
        self.set_pos(list.open.map(|s| s.start));
        self.token(open);

        let fields = self.arena.fields(list.fields);
        if !fields.is_empty() {
            let mut prev_line = self.line_for(list.open.map(|s| s.start));
            let mut ws = Ws::Indent;
            for (i, &id) in fields.iter().enumerate() {
                let field = self.arena.fields[id];
                let field_pos = self.field_pos(&field);
                let line_beg = self.line_for(Some(field_pos));
                let line_end = self.line_for(Some(self.arena.types.span(field.typ).start));

                let needs_linebreak = 0 < prev_line && prev_line < line_beg;
                if i > 0 {
                    if !needs_linebreak {
                        self.set_pos(Some(field_pos));
                    }
                    self.token(Token::Comma);
                }
                if needs_linebreak && self.linebreak(line_beg, 0, ws, true) > 0 {
                    ws = Ws::Ignore;
                } else if i > 0 {
                    self.ws(Ws::Blank);
                }

                if !field.names.is_empty() {
                    self.ident_list(field.names, ws == Ws::Indent);
                    self.ws(Ws::Blank);
                }
                let typ = self.strip_parens_always(field.typ);
                self.typ(typ);
                prev_line = line_end;
            }

            let closing = self.line_for(list.close.map(|s| s.start));
            if 0 < prev_line && prev_line < closing {
                self.token(Token::Comma);
                self.linebreak(closing, 0, Ws::Ignore, true);
            } else if mode == ParamMode::TypeParams && fields.len() == 1 {
                // `[P *T]` would read as an array length; `[P *T,]` does not.
                let field = self.arena.fields[fields[0]];
                let typ = self.strip_parens_always(field.typ);
                if self.arena.ident_names(field.names).len() == 1 && self.combines_with_name(typ) {
                    self.token(Token::Comma);
                }
            }

            if ws == Ws::Ignore {
                self.ws(Ws::Unindent);
            }
        }

        self.set_pos(list.close.map(|s| s.start));
        self.token(close);
    }

    fn field_pos(&self, field: &Field) -> u32 {
        self.arena
            .ident_names(field.names)
            .first()
            .map_or_else(|| self.arena.types.span(field.typ).start, |name| name.pos.start)
    }

    fn field_end(&self, field: &Field) -> u32 {
        field
            .tag
            .map_or_else(|| self.arena.types.span(field.typ).end, |tag| tag.span.end)
    }

    pub(super) fn ident_list(&mut self, names: ListRef<IdentName>, indent: bool) {
        let elems: Vec<Elem> = self.arena.ident_names(names).iter().map(|&n| Elem::Ident(n)).collect();
        let mode = if indent { 0 } else { super::expr::NO_INDENT };
        self.expr_list(None, &elems, 1, mode, None);
    }

    pub(super) fn strip_parens_always(&self, mut typ: TypeId) -> TypeId {
        while let Type::Paren { inner } = self.arena.types[typ] {
            typ = inner;
        }
        typ
    }

    /// `name` followed by `typ` would parse as an expression.
    fn combines_with_name(&self, typ: TypeId) -> bool {
        match self.arena.types[typ] {
            Type::Pointer { elem } => !self.is_type_elem(elem),
            Type::Union { terms } => {
                let terms = self.arena.type_terms(terms);
                match terms.split_first() {
                    Some((first, rest)) => {
                        !first.tilde
                            && self.combines_with_name(first.typ)
                            && rest.iter().all(|t| !t.tilde && !self.is_type_elem(t.typ))
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn is_type_elem(&self, typ: TypeId) -> bool {
        match self.arena.types[typ] {
            Type::Array { .. }
            | Type::Slice { .. }
            | Type::Struct { .. }
            | Type::Func { .. }
            | Type::Interface { .. }
            | Type::Map { .. }
            | Type::Chan { .. } => true,
            Type::Paren { inner } => self.is_type_elem(inner),
            Type::Union { terms } => self
                .arena
                .type_terms(terms)
                .iter()
                .any(|t| t.tilde || self.is_type_elem(t.typ)),
            _ => false,
        }
    }

    /// Struct fields.
    pub(super) fn struct_fields(&mut self, l_brace: Span, fields: ListRef<FieldId>, r_brace: Span) {
        let list = self.arena.fields(fields);
        if self.field_list_on_one_line(l_brace, r_brace, list.len(), |p| p.struct_field_fits(list)) {
            if list.is_empty() {
                self.empty_braces(l_brace, r_brace);
                return;
            }
            self.set_pos(Some(l_brace.start));
            self.token(Token::LBrace);
            self.ws(Ws::Blank);
            let field = self.arena.fields[list[0]];
            for (i, &name) in self.arena.ident_names(field.names).iter().enumerate() {
                if i > 0 {
                    self.token(Token::Comma);
                    self.ws(Ws::Blank);
                }
                self.ident(name);
            }
            if !field.names.is_empty() {
                self.ws(Ws::Blank);
            }
            self.typ(field.typ);
            self.ws(Ws::Blank);
            self.set_pos(Some(r_brace.start));
            self.token(Token::RBrace);
            return;
        }

        self.open_field_block(l_brace, !list.is_empty(), r_brace);
        let sep = if list.len() == 1 { Ws::Blank } else { Ws::Vtab };
        let slot = self.new_line_slot();
        for (i, &id) in list.iter().enumerate() {
            let field = self.arena.fields[id];
            if i > 0 {
                let new_section = self.lines_from(slot) > 0;
                self.linebreak(self.line_for(Some(self.field_pos(&field))), 1, Ws::Ignore, new_section);
            }
            self.record_line(slot);
            let mut extra_tabs;
            if field.names.is_empty() {
                self.typ(field.typ);
                extra_tabs = 2;
            } else {
                self.ident_list(field.names, false);
                self.ws(sep);
                self.typ(field.typ);
                extra_tabs = 1;
            }
            if let Some(tag) = field.tag {
                if !field.names.is_empty() && sep == Ws::Vtab {
                    self.ws(sep);
                }
                self.ws(sep);
                self.basic_lit(tag);
                extra_tabs = 0;
            }
            if self.has_line_comment(self.field_end(&field)) {
                for _ in 0..extra_tabs {
                    self.ws(sep);
                }
            }
        }
        self.free_line_slot();
        self.close_field_block(r_brace);
    }

    /// Interface methods and embedded elements.
    pub(super) fn interface_elems(&mut self, l_brace: Span, elems: ListRef<InterfaceElem>, r_brace: Span) {
        let list = self.arena.interface_elems(elems);
        if self.field_list_on_one_line(l_brace, r_brace, list.len(), |p| p.interface_elem_fits(list)) {
            if list.is_empty() {
                self.empty_braces(l_brace, r_brace);
                return;
            }
            self.set_pos(Some(l_brace.start));
            self.token(Token::LBrace);
            self.ws(Ws::Blank);
            self.interface_elem(list[0]);
            self.ws(Ws::Blank);
            self.set_pos(Some(r_brace.start));
            self.token(Token::RBrace);
            return;
        }

        self.open_field_block(l_brace, !list.is_empty(), r_brace);
        let slot = self.new_line_slot();
        for (i, &elem) in list.iter().enumerate() {
            if i > 0 {
                let new_section = self.lines_from(slot) > 0;
                self.linebreak(self.line_for(Some(elem.span().start)), 1, Ws::Ignore, new_section);
            }
            self.record_line(slot);
            self.interface_elem(elem);
        }
        self.free_line_slot();
        self.close_field_block(r_brace);
    }

    fn interface_elem(&mut self, elem: InterfaceElem) {
        match elem {
            InterfaceElem::Method { name, sig, .. } => {
                self.ident(name);
                self.signature(sig);
            }
            InterfaceElem::Embed { typ, .. } => self.typ(typ),
        }
    }

    /// Braces on one source line with no comment inside, and either no
    /// entry or a single entry short enough.
    fn field_list_on_one_line(
        &mut self,
        l_brace: Span,
        r_brace: Span,
        len: usize,
        fits: impl FnOnce(&mut Self) -> bool,
    ) -> bool {
        let has_comments = self.comment_before(self.pos_for(r_brace.start));
        let src_is_one_line = self.mode != super::Mode::Bare
            && self.line_for(Some(l_brace.start)) == self.line_for(Some(r_brace.start));
        !has_comments && src_is_one_line && (len == 0 || (len == 1 && fits(self)))
    }

    fn struct_field_fits(&mut self, list: &[FieldId]) -> bool {
        const MAX_SIZE: i64 = 30;
        let field = self.arena.fields[list[0]];
        if field.tag.is_some() {
            return false;
        }
        let names_size = if field.names.is_empty() { 0 } else { 1 };
        names_size + self.node_size(NodeKey::Type(field.typ), MAX_SIZE) <= MAX_SIZE
    }

    fn interface_elem_fits(&mut self, list: &[InterfaceElem]) -> bool {
        const MAX_SIZE: i64 = 30;
        match list[0] {
            InterfaceElem::Method { sig, .. } => 1 + self.node_size(NodeKey::Method(sig), MAX_SIZE) <= MAX_SIZE,
            InterfaceElem::Embed { typ, .. } => self.node_size(NodeKey::Type(typ), MAX_SIZE) <= MAX_SIZE,
        }
    }

    fn empty_braces(&mut self, l_brace: Span, r_brace: Span) {
        self.set_pos(Some(l_brace.start));
        self.token(Token::LBrace);
        self.set_pos(Some(r_brace.start));
        self.token(Token::RBrace);
    }

    fn open_field_block(&mut self, l_brace: Span, non_empty: bool, r_brace: Span) {
        let has_comments = self.comment_before(self.pos_for(r_brace.start));
        self.ws(Ws::Blank);
        self.set_pos(Some(l_brace.start));
        self.token(Token::LBrace);
        self.ws(Ws::Indent);
        if has_comments || non_empty {
            self.ws(Ws::Formfeed);
        }
    }

    fn close_field_block(&mut self, r_brace: Span) {
        self.ws(Ws::Unindent);
        self.ws(Ws::Formfeed);
        self.set_pos(Some(r_brace.start));
        self.token(Token::RBrace);
    }
}

/// Whether each spec of a const/var group keeps an (empty) type column:
/// true inside a run of specs with values where at least one has a type.
fn keep_type_column(specs: &[Spec]) -> Vec<bool> {
    let mut keep = vec![false; specs.len()];
    let mut run_start: Option<usize> = None;
    let mut keep_type = false;

    let mut populate = |from: usize, to: usize, keep_type: bool| {
        if keep_type {
            keep[from..to].iter_mut().for_each(|k| *k = true);
        }
    };

    for (i, spec) in specs.iter().enumerate() {
        let Spec::Value(value) = spec else { continue };
        if !value.values.is_empty() {
            if run_start.is_none() {
                run_start = Some(i);
                keep_type = false;
            }
        } else if let Some(start) = run_start.take() {
            populate(start, i, keep_type);
        }
        if value.typ.is_some() {
            keep_type = true;
        }
    }
    if let Some(start) = run_start {
        populate(start, specs.len(), keep_type);
    }
    keep
}

use super::{PResult, Parser};
use crate::ast::*;
use crate::error::Diag;
use crate::lexer::Tok;
use crate::parser_support::{ParamDecl, resolve_param_list};

impl<'src> Parser<'src> {
    /// Parameters and optional results of a function type; the `func`
    /// keyword and name (if any) are already consumed.
    pub(super) fn signature(&mut self) -> PResult<SignatureId> {
        let start = self.start();
        let params = self.params()?;
        let results = self.results()?;
        let sig = Signature { params, results };
        Ok(self.arena.signatures.alloc(sig, self.span_from(start)))
    }

    fn results(&mut self) -> PResult<Option<FieldList>> {
        if self.at(Tok::LParen) {
            return self.params().map(Some);
        }
        if !self.starts_type() {
            return Ok(None);
        }
        let start = self.start();
        let typ = self.parse_type()?;
        let field = Field {
            names: ListRef::EMPTY,
            typ,
            tag: None,
        };
        let field = self.arena.fields.alloc(field, self.span_from(start));
        Ok(Some(FieldList {
            open: None,
            fields: self.arena.list_fields([field]),
            close: None,
        }))
    }

    pub(super) fn starts_type(&self) -> bool {
        matches!(
            self.tok(),
            Tok::Ident(_)
                | Tok::LBrack
                | Tok::Star
                | Tok::LParen
                | Tok::Arrow
                | Tok::KwFunc
                | Tok::KwMap
                | Tok::KwChan
                | Tok::KwStruct
                | Tok::KwInterface
        )
    }

    pub(super) fn params(&mut self) -> PResult<FieldList> {
        self.field_list(Tok::LParen, Tok::RParen)
    }

    pub(super) fn type_params(&mut self) -> PResult<FieldList> {
        self.field_list(Tok::LBrack, Tok::RBrack)
    }

    fn field_list(&mut self, open: Tok<'src>, close: Tok<'src>) -> PResult<FieldList> {
        let is_type_params = close == Tok::RBrack;
        let open_span = self.expect(open)?;
        let mut entries = Vec::new();
        while !self.at(close) {
            entries.push(self.param_entry(close, is_type_params)?);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        let close_span = self.expect(close)?;

        if is_type_params && !entries.iter().any(|e| e.name.is_some() && e.typ.is_some()) {
            return Err(Diag::parse(
                Span::new(open_span.start as usize, close_span.end as usize),
                "type parameters need constraints",
            ));
        }
        let fields = resolve_param_list(&mut self.arena, entries)?;
        Ok(FieldList {
            open: Some(open_span),
            fields,
            close: Some(close_span),
        })
    }

    fn param_entry(&mut self, close: Tok<'src>, is_type_params: bool) -> PResult<ParamDecl> {
        let start = self.start();
        if !matches!(self.tok(), Tok::Ident(_)) {
            let typ = self.param_type(is_type_params)?;
            return Ok(ParamDecl {
                name: None,
                typ: Some(typ),
                span: self.span_from(start),
            });
        }

        let name = self.ident()?;
        let (name, typ) = match self.tok() {
            Tok::Comma => return Ok(ParamDecl::bare(name)),
            tok if tok == close => return Ok(ParamDecl::bare(name)),
            Tok::Dot => (None, self.qualified_type(name)?),
            Tok::LBrack => self.array_or_instance(name)?,
            _ => (Some(name), self.param_type(is_type_params)?),
        };
        Ok(ParamDecl {
            name,
            typ: Some(typ),
            span: self.span_from(start),
        })
    }

    fn param_type(&mut self, is_type_params: bool) -> PResult<TypeId> {
        if self.at(Tok::Ellipsis) && !is_type_params {
            let start = self.start();
            self.bump();
            let elem = self.parse_type()?;
            return Ok(self.arena.types.alloc(Type::Variadic { elem }, self.span_from(start)));
        }
        if is_type_params {
            self.constraint()
        } else {
            self.parse_type()
        }
    }

    /// After `name` with `[` ahead, in a parameter list or struct body:
    /// `name []E` / `name [N]E` declare a named array or slice, while
    /// `T[A, B]` is an unnamed generic instance.
    pub(super) fn array_or_instance(
        &mut self,
        name: IdentName,
    ) -> PResult<(Option<IdentName>, TypeId)> {
        let start = self.start();
        let l_brack = self.bump();

        if self.eat(Tok::RBrack).is_some() {
            let elem = self.parse_type()?;
            let typ = self.arena.types.alloc(Type::Slice { elem }, self.span_from(start));
            return Ok((Some(name), typ));
        }
        if self.at(Tok::Ellipsis) && self.peek(1) == Tok::RBrack {
            self.bump();
            self.bump();
            let elem = self.parse_type()?;
            let typ = Type::Array {
                len: ArrayLen::Ellipsis,
                elem,
            };
            return Ok((Some(name), self.arena.types.alloc(typ, self.span_from(start))));
        }

        let args = self.bracketed(|p| {
            let mut args = vec![p.expr()?];
            while p.eat(Tok::Comma).is_some() && !p.at(Tok::RBrack) {
                args.push(p.expr()?);
            }
            Ok(args)
        })?;
        let r_brack = self.expect(Tok::RBrack)?;

        if let [len] = args[..] {
            if self.starts_type() {
                let elem = self.parse_type()?;
                let typ = Type::Array {
                    len: ArrayLen::Expr(len),
                    elem,
                };
                return Ok((Some(name), self.arena.types.alloc(typ, self.span_from(start))));
            }
        }

        let args = args
            .into_iter()
            .map(|e| self.expr_to_type(e))
            .collect::<PResult<Vec<_>>>()?;
        let typ = Type::Name {
            pkg: None,
            name,
            args: Some(TypeArgs {
                l_brack,
                args: self.arena.list_types(args),
                r_brack,
            }),
        };
        Ok((None, self.arena.types.alloc(typ, self.span_from(name.pos.start))))
    }

    pub(super) fn parse_type(&mut self) -> PResult<TypeId> {
        self.nested(|p| p.parse_type_inner())
    }

    fn parse_type_inner(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let typ = match self.tok() {
            Tok::Ident(_) => {
                let name = self.ident()?;
                return self.type_name_rest(name);
            }
            Tok::LBrack => {
                self.bump();
                if self.eat(Tok::RBrack).is_some() {
                    Type::Slice {
                        elem: self.parse_type()?,
                    }
                } else if self.at(Tok::Ellipsis) && self.peek(1) == Tok::RBrack {
                    self.bump();
                    self.bump();
                    Type::Array {
                        len: ArrayLen::Ellipsis,
                        elem: self.parse_type()?,
                    }
                } else {
                    let len = self.bracketed(|p| p.expr())?;
                    self.expect(Tok::RBrack)?;
                    Type::Array {
                        len: ArrayLen::Expr(len),
                        elem: self.parse_type()?,
                    }
                }
            }
            Tok::Star => {
                self.bump();
                Type::Pointer {
                    elem: self.parse_type()?,
                }
            }
            Tok::LParen => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(Tok::RParen)?;
                Type::Paren { inner }
            }
            Tok::KwFunc => {
                self.bump();
                Type::Func {
                    sig: self.signature()?,
                }
            }
            Tok::KwMap => {
                self.bump();
                self.expect(Tok::LBrack)?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack)?;
                Type::Map {
                    key,
                    value: self.parse_type()?,
                }
            }
            Tok::KwChan => {
                self.bump();
                let dir = if self.eat(Tok::Arrow).is_some() {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Type::Chan {
                    dir,
                    elem: self.parse_type()?,
                }
            }
            Tok::Arrow => {
                self.bump();
                self.expect(Tok::KwChan)?;
                Type::Chan {
                    dir: ChanDir::Recv,
                    elem: self.parse_type()?,
                }
            }
            Tok::KwStruct => return self.struct_type(),
            Tok::KwInterface => return self.interface_type(),
            _ => return Err(self.unexpected("type")),
        };
        Ok(self.arena.types.alloc(typ, self.span_from(start)))
    }

    /// `T`, `pkg.T` and their instances, with the first identifier consumed.
    fn type_name_rest(&mut self, name: IdentName) -> PResult<TypeId> {
        if self.at(Tok::Dot) {
            return self.qualified_type(name);
        }
        let args = self.opt_type_args()?;
        let typ = Type::Name {
            pkg: None,
            name,
            args,
        };
        Ok(self.arena.types.alloc(typ, self.span_from(name.pos.start)))
    }

    fn qualified_type(&mut self, pkg: IdentName) -> PResult<TypeId> {
        self.expect(Tok::Dot)?;
        let name = self.ident()?;
        let args = self.opt_type_args()?;
        let typ = Type::Name {
            pkg: Some(pkg),
            name,
            args,
        };
        Ok(self.arena.types.alloc(typ, self.span_from(pkg.pos.start)))
    }

    fn opt_type_args(&mut self) -> PResult<Option<TypeArgs>> {
        if !self.at(Tok::LBrack) {
            return Ok(None);
        }
        let l_brack = self.bump();
        let mut args = vec![self.parse_type()?];
        while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
            args.push(self.parse_type()?);
        }
        let r_brack = self.expect(Tok::RBrack)?;
        Ok(Some(TypeArgs {
            l_brack,
            args: self.arena.list_types(args),
            r_brack,
        }))
    }

    /// Type parameter constraint or interface element: `~A | B | C`.
    fn constraint(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let mut terms = Vec::new();
        loop {
            let tilde = self.eat(Tok::Tilde).is_some();
            let typ = self.parse_type()?;
            terms.push(TypeTerm { tilde, typ });
            if self.eat(Tok::Pipe).is_none() {
                break;
            }
        }
        if let [TypeTerm { tilde: false, typ }] = terms[..] {
            return Ok(typ);
        }
        let terms = self.arena.list_type_terms(terms);
        Ok(self.arena.types.alloc(Type::Union { terms }, self.span_from(start)))
    }

    fn struct_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        self.bump();
        let l_brace = self.expect(Tok::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
            fields.push(self.struct_field()?);
            self.expect_semi()?;
        }
        let r_brace = self.expect(Tok::RBrace)?;
        let typ = Type::Struct {
            l_brace,
            fields: self.arena.list_fields(fields),
            r_brace,
        };
        Ok(self.arena.types.alloc(typ, self.span_from(start)))
    }

    fn struct_field(&mut self) -> PResult<FieldId> {
        let start = self.start();
        let (names, typ) = match (self.tok(), self.peek(1)) {
            (Tok::Star, _) => (Vec::new(), self.parse_type()?),
            (
                Tok::Ident(_),
                Tok::Dot | Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_),
            ) => (Vec::new(), self.parse_type()?),
            (Tok::Ident(_), Tok::LBrack) => {
                let name = self.ident()?;
                let (name, typ) = self.array_or_instance(name)?;
                (name.into_iter().collect(), typ)
            }
            (Tok::Ident(_), _) => {
                let names = self.ident_list()?;
                (names, self.parse_type()?)
            }
            _ => return Err(self.unexpected("field name or embedded type")),
        };
        let tag = match self.tok() {
            Tok::StringLit(_) => Some(BasicLit {
                kind: BasicLitKind::String,
                span: self.bump(),
            }),
            Tok::RawStringLit(_) => Some(BasicLit {
                kind: BasicLitKind::RawString,
                span: self.bump(),
            }),
            _ => None,
        };
        let field = Field {
            names: self.arena.list_ident_names(names),
            typ,
            tag,
        };
        Ok(self.arena.fields.alloc(field, self.span_from(start)))
    }

    fn interface_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        self.bump();
        let l_brace = self.expect(Tok::LBrace)?;
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
            let elem_start = self.start();
            let elem = if matches!(self.tok(), Tok::Ident(_)) && self.peek(1) == Tok::LParen {
                let name = self.ident()?;
                let sig = self.signature()?;
                InterfaceElem::Method {
                    name,
                    sig,
                    span: self.span_from(elem_start),
                }
            } else {
                InterfaceElem::Embed {
                    typ: self.constraint()?,
                    span: self.span_from(elem_start),
                }
            };
            elems.push(elem);
            self.expect_semi()?;
        }
        let r_brace = self.expect(Tok::RBrace)?;
        let typ = Type::Interface {
            l_brace,
            elems: self.arena.list_interface_elems(elems),
            r_brace,
        };
        Ok(self.arena.types.alloc(typ, self.span_from(start)))
    }

    /// Reinterprets an expression parsed where a type was also possible.
    pub(super) fn expr_to_type(&mut self, e: ExprId) -> PResult<TypeId> {
        let span = self.arena.exprs.span(e);
        let typ = match self.arena.exprs[e] {
            Expr::Type(t) => return Ok(t),
            Expr::Ident(name) => Type::Name {
                pkg: None,
                name,
                args: None,
            },
            Expr::Selector { x, sel } => match self.arena.exprs[x] {
                Expr::Ident(pkg) => Type::Name {
                    pkg: Some(pkg),
                    name: sel,
                    args: None,
                },
                _ => return Err(Diag::parse(span, "expected type")),
            },
            Expr::Index {
                x,
                l_brack,
                indices,
                r_brack,
            } => {
                let base = self.expr_to_type(x)?;
                let Type::Name { pkg, name, args: None } = self.arena.types[base] else {
                    return Err(Diag::parse(span, "expected type"));
                };
                let indices = self.arena.exprs(indices).to_vec();
                let args = indices
                    .into_iter()
                    .map(|i| self.expr_to_type(i))
                    .collect::<PResult<Vec<_>>>()?;
                Type::Name {
                    pkg,
                    name,
                    args: Some(TypeArgs {
                        l_brack,
                        args: self.arena.list_types(args),
                        r_brack,
                    }),
                }
            }
            Expr::Star { x } => Type::Pointer {
                elem: self.expr_to_type(x)?,
            },
            Expr::Paren { x } => Type::Paren {
                inner: self.expr_to_type(x)?,
            },
            _ => return Err(Diag::parse(span, "expected type")),
        };
        Ok(self.arena.types.alloc(typ, span))
    }
}

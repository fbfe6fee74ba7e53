use super::{PResult, Parser};
use crate::ast::*;
use crate::lexer::Tok;

impl<'src> Parser<'src> {
    pub(super) fn source_file(&mut self) -> PResult<SourceFile> {
        let package_pos = self.expect(Tok::KwPackage)?;
        let name = self.ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        loop {
            let decl = match self.tok() {
                Tok::Eof => break,
                Tok::Semi => {
                    self.bump();
                    continue;
                }
                Tok::KwFunc => TopLevelDecl::Func(self.func_decl()?),
                Tok::KwImport => TopLevelDecl::Gen(self.gen_decl(GenDeclKind::Import)?),
                Tok::KwConst => TopLevelDecl::Gen(self.gen_decl(GenDeclKind::Const)?),
                Tok::KwVar => TopLevelDecl::Gen(self.gen_decl(GenDeclKind::Var)?),
                Tok::KwType => TopLevelDecl::Gen(self.gen_decl(GenDeclKind::Type)?),
                _ => return Err(self.unexpected("declaration")),
            };
            decls.push(decl);
            if !self.at(Tok::Eof) {
                self.expect(Tok::Semi)?;
            }
        }

        Ok(SourceFile {
            package_pos,
            name,
            decls: self.arena.list_top_decls(decls),
        })
    }

    /// `import`/`const`/`var`/`type`, single or parenthesized group.
    pub(super) fn gen_decl(&mut self, kind: GenDeclKind) -> PResult<GenDeclId> {
        let kw_pos = self.bump();
        let mut specs = Vec::new();
        let (l_paren, r_paren) = if let Some(l_paren) = self.eat(Tok::LParen) {
            while !self.at(Tok::RParen) && !self.at(Tok::Eof) {
                specs.push(self.spec(kind)?);
                self.expect_semi()?;
            }
            (Some(l_paren), Some(self.expect(Tok::RParen)?))
        } else {
            specs.push(self.spec(kind)?);
            (None, None)
        };

        let decl = GenDecl {
            kind,
            kw_pos,
            l_paren,
            specs: self.arena.list_specs(specs),
            r_paren,
        };
        Ok(self.arena.gen_decls.alloc(decl, self.span_from(kw_pos.start)))
    }

    fn spec(&mut self, kind: GenDeclKind) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => self.import_spec().map(Spec::Import),
            GenDeclKind::Const | GenDeclKind::Var => self.value_spec(kind).map(Spec::Value),
            GenDeclKind::Type => self.type_spec().map(Spec::Type),
        }
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let start = self.start();
        let name = match self.tok() {
            Tok::Dot => Some(ImportName::Dot(self.bump())),
            Tok::Ident("_") => Some(ImportName::Blank(self.bump())),
            Tok::Ident(_) => Some(ImportName::Name(self.ident()?)),
            _ => None,
        };
        let kind = match self.tok() {
            Tok::StringLit(_) => BasicLitKind::String,
            Tok::RawStringLit(_) => BasicLitKind::RawString,
            _ => return Err(self.unexpected("import path")),
        };
        let path = BasicLit {
            kind,
            span: self.bump(),
        };
        Ok(ImportSpec {
            name,
            path,
            span: self.span_from(start),
        })
    }

    fn value_spec(&mut self, kind: GenDeclKind) -> PResult<ValueSpec> {
        let start = self.start();
        let names = self.ident_list()?;
        let typ = match self.tok() {
            Tok::Assign | Tok::Semi | Tok::RParen | Tok::Eof => None,
            _ => Some(self.parse_type()?),
        };
        let values = if self.eat(Tok::Assign).is_some() {
            self.expr_list()?
        } else {
            if kind == GenDeclKind::Var && typ.is_none() {
                return Err(self.unexpected("type or `=`"));
            }
            ListRef::EMPTY
        };
        Ok(ValueSpec {
            names: self.arena.list_ident_names(names),
            typ,
            values,
            span: self.span_from(start),
        })
    }

    fn type_spec(&mut self) -> PResult<TypeSpec> {
        let start = self.start();
        let name = self.ident()?;
        let type_params = if self.at(Tok::LBrack) && self.type_params_follow() {
            Some(self.type_params()?)
        } else {
            None
        };
        let assign = self.eat(Tok::Assign);
        let typ = self.parse_type()?;
        Ok(TypeSpec {
            name,
            type_params,
            assign,
            typ,
            span: self.span_from(start),
        })
    }

    /// At `[` after a type name: is this `type T[P C] ...` rather than an
    /// array type `type T [N]E`?
    fn type_params_follow(&self) -> bool {
        matches!(self.peek(1), Tok::Ident(_))
            && matches!(
                self.peek(2),
                Tok::Ident(_)
                    | Tok::Comma
                    | Tok::Tilde
                    | Tok::LBrack
                    | Tok::KwInterface
                    | Tok::KwFunc
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwStruct
            )
    }

    fn func_decl(&mut self) -> PResult<FuncDeclId> {
        let func_pos = self.bump();
        let recv = if self.at(Tok::LParen) {
            Some(self.params()?)
        } else {
            None
        };
        let name = self.ident()?;
        let type_params = if self.at(Tok::LBrack) {
            Some(self.type_params()?)
        } else {
            None
        };
        let sig = self.signature()?;
        let body = if self.at(Tok::LBrace) {
            Some(self.bracketed(|p| p.block())?)
        } else {
            None
        };

        let decl = FuncDecl {
            func_pos,
            recv,
            name,
            type_params,
            sig,
            body,
        };
        Ok(self.arena.funcs.alloc(decl, self.span_from(func_pos.start)))
    }
}

use super::{PResult, Parser};
use crate::ast::*;
use crate::error::Diag;
use crate::lexer::Tok;

fn binary_op(tok: Tok<'_>) -> Option<BinaryOp> {
    Some(match tok {
        Tok::LOr => BinaryOp::LOr,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Rem,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::Amp => BinaryOp::And,
        Tok::AndNot => BinaryOp::AndNot,
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    /// Expression or type; operands may be type literals.
    pub(super) fn expr(&mut self) -> PResult<ExprId> {
        self.nested(|p| p.binary_expr(1))
    }

    pub(super) fn expr_list(&mut self) -> PResult<ListRef<ExprId>> {
        let exprs = self.expr_vec()?;
        Ok(self.arena.list_exprs(exprs))
    }

    pub(super) fn expr_vec(&mut self) -> PResult<Vec<ExprId>> {
        let mut exprs = vec![self.expr()?];
        while self.eat(Tok::Comma).is_some() {
            exprs.push(self.expr()?);
        }
        Ok(exprs)
    }

    fn binary_expr(&mut self, min_prec: u8) -> PResult<ExprId> {
        let mut x = self.unary_expr()?;
        while let Some(op) = binary_op(self.tok()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            let op_pos = self.bump();
            let y = self.binary_expr(prec + 1)?;
            let span = self.arena.exprs.span(x).to(self.arena.exprs.span(y));
            x = self.arena.exprs.alloc(Expr::Binary { x, op, op_pos, y }, span);
        }
        Ok(x)
    }

    fn unary_expr(&mut self) -> PResult<ExprId> {
        self.nested(|p| p.unary_expr_inner())
    }

    fn unary_expr_inner(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let op = match self.tok() {
            Tok::Plus => UnaryOp::Plus,
            Tok::Minus => UnaryOp::Minus,
            Tok::Bang => UnaryOp::Not,
            Tok::Caret => UnaryOp::Xor,
            Tok::Amp => UnaryOp::Addr,
            Tok::Arrow if self.peek(1) == Tok::KwChan => {
                let typ = self.parse_type()?;
                let x = self.arena.exprs.alloc(Expr::Type(typ), self.span_from(start));
                return self.primary_suffix(x);
            }
            Tok::Arrow => UnaryOp::Recv,
            Tok::Star => {
                self.bump();
                let x = self.unary_expr()?;
                return Ok(self.arena.exprs.alloc(Expr::Star { x }, self.span_from(start)));
            }
            _ => {
                let x = self.operand()?;
                return self.primary_suffix(x);
            }
        };
        self.bump();
        let x = self.unary_expr()?;
        Ok(self.arena.exprs.alloc(Expr::Unary { op, x }, self.span_from(start)))
    }

    fn operand(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let node = match self.tok() {
            Tok::Ident(_) => Expr::Ident(self.ident()?),
            Tok::IntLit(_) => self.basic_lit(BasicLitKind::Int),
            Tok::FloatLit(_) => self.basic_lit(BasicLitKind::Float),
            Tok::ImagLit(_) => self.basic_lit(BasicLitKind::Imag),
            Tok::RuneLit(_) => self.basic_lit(BasicLitKind::Rune),
            Tok::StringLit(_) => self.basic_lit(BasicLitKind::String),
            Tok::RawStringLit(_) => self.basic_lit(BasicLitKind::RawString),
            Tok::LParen => {
                self.bump();
                let x = self.bracketed(|p| p.expr())?;
                self.expect(Tok::RParen)?;
                Expr::Paren { x }
            }
            Tok::KwFunc => {
                self.bump();
                let sig = self.signature()?;
                if self.at(Tok::LBrace) {
                    let body = self.bracketed(|p| p.block())?;
                    Expr::FuncLit { sig, body }
                } else {
                    let typ = self.arena.types.alloc(Type::Func { sig }, self.span_from(start));
                    Expr::Type(typ)
                }
            }
            Tok::LBrack | Tok::KwStruct | Tok::KwMap | Tok::KwChan | Tok::KwInterface => {
                Expr::Type(self.parse_type()?)
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok(self.arena.exprs.alloc(node, self.span_from(start)))
    }

    fn basic_lit(&mut self, kind: BasicLitKind) -> Expr {
        Expr::BasicLit(BasicLit {
            kind,
            span: self.bump(),
        })
    }

    fn primary_suffix(&mut self, mut x: ExprId) -> PResult<ExprId> {
        let start = self.arena.exprs.span(x).start;
        loop {
            let node = match self.tok() {
                Tok::Dot => {
                    self.bump();
                    match self.tok() {
                        Tok::Ident(_) => Expr::Selector {
                            x,
                            sel: self.ident()?,
                        },
                        Tok::LParen => {
                            self.bump();
                            let typ = if self.eat(Tok::KwType).is_some() {
                                None
                            } else {
                                Some(self.parse_type()?)
                            };
                            let r_paren = self.expect(Tok::RParen)?;
                            Expr::TypeAssert { x, typ, r_paren }
                        }
                        _ => return Err(self.unexpected("selector or type assertion")),
                    }
                }
                Tok::LBrack => self.index_or_slice(x)?,
                Tok::LParen => self.call(x)?,
                Tok::LBrace if self.starts_composite(x) => self.composite_lit(Some(x))?,
                _ => return Ok(x),
            };
            x = self.arena.exprs.alloc(node, self.span_from(start));
        }
    }

    /// Whether `{` after `x` opens a composite literal rather than a block.
    fn starts_composite(&self, x: ExprId) -> bool {
        match self.arena.exprs[x] {
            Expr::Ident(_) | Expr::Selector { .. } | Expr::Index { .. } => self.expr_lev >= 0,
            Expr::Type(t) => matches!(
                self.arena.types[t],
                Type::Array { .. } | Type::Slice { .. } | Type::Struct { .. } | Type::Map { .. }
            ),
            _ => false,
        }
    }

    fn index_or_slice(&mut self, x: ExprId) -> PResult<Expr> {
        let l_brack = self.bump();
        self.bracketed(|p| {
            let first = if p.at(Tok::Colon) {
                None
            } else {
                Some(p.expr()?)
            };

            if p.at(Tok::Colon) {
                let mut idx = [first, None, None];
                let mut colons = 0;
                while colons < 2 && p.eat(Tok::Colon).is_some() {
                    colons += 1;
                    if !p.at(Tok::Colon) && !p.at(Tok::RBrack) {
                        idx[colons] = Some(p.expr()?);
                    }
                }
                let r_brack = p.expect(Tok::RBrack)?;
                let three = colons == 2;
                if three && (idx[1].is_none() || idx[2].is_none()) {
                    return Err(Diag::parse(
                        Span::new(l_brack.start as usize, r_brack.end as usize),
                        "middle and final index required in 3-index slice",
                    ));
                }
                return Ok(Expr::Slice {
                    x,
                    lo: idx[0],
                    hi: idx[1],
                    max: idx[2],
                    three,
                    r_brack,
                });
            }

            let Some(first) = first else {
                return Err(p.unexpected("index"));
            };
            let mut indices = vec![first];
            while p.eat(Tok::Comma).is_some() && !p.at(Tok::RBrack) {
                indices.push(p.expr()?);
            }
            let r_brack = p.expect(Tok::RBrack)?;
            Ok(Expr::Index {
                x,
                l_brack,
                indices: p.arena.list_exprs(indices),
                r_brack,
            })
        })
    }

    fn call(&mut self, fun: ExprId) -> PResult<Expr> {
        let l_paren = self.bump();
        let (args, ellipsis) = self.bracketed(|p| {
            let mut args = Vec::new();
            let mut ellipsis = None;
            while !p.at(Tok::RParen) {
                args.push(p.expr()?);
                if let Some(dots) = p.eat(Tok::Ellipsis) {
                    ellipsis = Some(dots);
                }
                if p.eat(Tok::Comma).is_none() {
                    break;
                }
            }
            Ok((args, ellipsis))
        })?;
        let r_paren = self.expect(Tok::RParen)?;
        Ok(Expr::Call {
            fun,
            l_paren,
            args: self.arena.list_exprs(args),
            ellipsis,
            r_paren,
        })
    }

    fn composite_lit(&mut self, typ: Option<ExprId>) -> PResult<Expr> {
        let l_brace = self.expect(Tok::LBrace)?;
        let elts = self.bracketed(|p| {
            let mut elts = Vec::new();
            while !p.at(Tok::RBrace) {
                elts.push(p.element()?);
                if p.eat(Tok::Comma).is_none() {
                    break;
                }
            }
            Ok(elts)
        })?;
        let r_brace = self.expect(Tok::RBrace)?;
        Ok(Expr::CompositeLit {
            typ,
            l_brace,
            elts: self.arena.list_exprs(elts),
            r_brace,
        })
    }

    fn element(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let key = self.element_value()?;
        if self.eat(Tok::Colon).is_some() {
            let value = self.element_value()?;
            return Ok(self
                .arena
                .exprs
                .alloc(Expr::KeyValue { key, value }, self.span_from(start)));
        }
        Ok(key)
    }

    fn element_value(&mut self) -> PResult<ExprId> {
        if !self.at(Tok::LBrace) {
            return self.expr();
        }
        let start = self.start();
        let lit = self.nested(|p| p.composite_lit(None))?;
        Ok(self.arena.exprs.alloc(lit, self.span_from(start)))
    }
}

use super::{PResult, Parser};
use crate::ast::*;
use crate::error::Diag;
use crate::lexer::Tok;

/// Result of a simple statement parsed in a `for` header, where
/// `k, v := range x` is also allowed.
enum Simple {
    Stmt(StmtId),
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        x: ExprId,
    },
}

enum ForHeader {
    Loop {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        x: ExprId,
    },
}

fn assign_op(tok: Tok<'_>) -> Option<AssignOp> {
    Some(match tok {
        Tok::Assign => AssignOp::Assign,
        Tok::Define => AssignOp::Define,
        Tok::AddAssign => AssignOp::Add,
        Tok::SubAssign => AssignOp::Sub,
        Tok::MulAssign => AssignOp::Mul,
        Tok::DivAssign => AssignOp::Div,
        Tok::ModAssign => AssignOp::Rem,
        Tok::AndAssign => AssignOp::And,
        Tok::OrAssign => AssignOp::Or,
        Tok::XorAssign => AssignOp::Xor,
        Tok::ShlAssign => AssignOp::Shl,
        Tok::ShrAssign => AssignOp::Shr,
        Tok::AndNotAssign => AssignOp::AndNot,
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    pub(super) fn block(&mut self) -> PResult<Block> {
        let l_brace = self.expect(Tok::LBrace)?;
        let stmts = self.stmt_list()?;
        let r_brace = self.expect(Tok::RBrace)?;
        Ok(Block {
            l_brace,
            stmts,
            r_brace,
        })
    }

    fn stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut stmts = Vec::new();
        loop {
            match self.tok() {
                Tok::RBrace | Tok::Eof | Tok::KwCase | Tok::KwDefault => break,
                Tok::Semi => {
                    self.bump();
                    continue;
                }
                _ => {}
            }
            stmts.push(self.stmt()?);
            if !matches!(self.tok(), Tok::RBrace | Tok::KwCase | Tok::KwDefault) {
                self.expect(Tok::Semi)?;
            }
        }
        Ok(self.arena.list_stmts(stmts))
    }

    fn stmt(&mut self) -> PResult<StmtId> {
        self.nested(|p| p.stmt_inner())
    }

    fn stmt_inner(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let node = match self.tok() {
            Tok::KwVar => Stmt::Decl(self.gen_decl(GenDeclKind::Var)?),
            Tok::KwConst => Stmt::Decl(self.gen_decl(GenDeclKind::Const)?),
            Tok::KwType => Stmt::Decl(self.gen_decl(GenDeclKind::Type)?),
            Tok::Ident(_) if self.peek(1) == Tok::Colon => {
                let label = self.ident()?;
                self.bump();
                let stmt = if matches!(self.tok(), Tok::Semi | Tok::RBrace) {
                    let at = self.prev_end;
                    self.arena.stmts.alloc(Stmt::Empty, Span::empty_at(at))
                } else {
                    self.stmt()?
                };
                Stmt::Labeled { label, stmt }
            }
            Tok::KwGo => {
                self.bump();
                Stmt::Go { call: self.expr()? }
            }
            Tok::KwDefer => {
                self.bump();
                Stmt::Defer { call: self.expr()? }
            }
            Tok::KwReturn => {
                self.bump();
                let results = if matches!(self.tok(), Tok::Semi | Tok::RBrace) {
                    ListRef::EMPTY
                } else {
                    self.expr_list()?
                };
                Stmt::Return { results }
            }
            Tok::KwBreak | Tok::KwContinue | Tok::KwGoto => {
                let kind = match self.tok() {
                    Tok::KwBreak => BranchKind::Break,
                    Tok::KwContinue => BranchKind::Continue,
                    _ => BranchKind::Goto,
                };
                self.bump();
                let label = if matches!(self.tok(), Tok::Ident(_)) {
                    Some(self.ident()?)
                } else {
                    None
                };
                Stmt::Branch { kind, label }
            }
            Tok::KwFallthrough => {
                self.bump();
                Stmt::Branch {
                    kind: BranchKind::Fallthrough,
                    label: None,
                }
            }
            Tok::LBrace => Stmt::Block(self.block()?),
            Tok::KwIf => return self.if_stmt(),
            Tok::KwSwitch => return self.switch_stmt(),
            Tok::KwSelect => return self.select_stmt(),
            Tok::KwFor => return self.for_stmt(),
            _ => return self.simple_stmt(),
        };
        Ok(self.arena.stmts.alloc(node, self.span_from(start)))
    }

    fn simple_stmt(&mut self) -> PResult<StmtId> {
        match self.simple_or_range(false)? {
            Simple::Stmt(id) => Ok(id),
            Simple::Range { x, .. } => Err(Diag::parse(
                self.arena.exprs.span(x),
                "range clause outside for statement",
            )),
        }
    }

    fn simple_or_range(&mut self, range_ok: bool) -> PResult<Simple> {
        let start = self.start();
        if range_ok && self.at(Tok::KwRange) {
            self.bump();
            let x = self.expr()?;
            return Ok(Simple::Range {
                key: None,
                value: None,
                define: false,
                x,
            });
        }

        let lhs = self.expr_vec()?;
        let node = if let Some(op) = assign_op(self.tok()) {
            let op_pos = self.bump();
            if range_ok
                && self.at(Tok::KwRange)
                && matches!(op, AssignOp::Assign | AssignOp::Define)
                && lhs.len() <= 2
            {
                self.bump();
                let x = self.expr()?;
                return Ok(Simple::Range {
                    key: lhs.first().copied(),
                    value: lhs.get(1).copied(),
                    define: op == AssignOp::Define,
                    x,
                });
            }
            let rhs = self.expr_list()?;
            Stmt::Assign {
                lhs: self.arena.list_exprs(lhs),
                op,
                op_pos,
                rhs,
            }
        } else {
            let [x] = lhs[..] else {
                return Err(self.unexpected("`:=`, `=` or `,`"));
            };
            match self.tok() {
                Tok::Arrow => {
                    self.bump();
                    Stmt::Send {
                        chan: x,
                        value: self.expr()?,
                    }
                }
                Tok::Inc | Tok::Dec => {
                    let inc = self.at(Tok::Inc);
                    self.bump();
                    Stmt::IncDec { x, inc }
                }
                _ => Stmt::Expr(x),
            }
        };
        Ok(Simple::Stmt(
            self.arena.stmts.alloc(node, self.span_from(start)),
        ))
    }

    /// The condition of a control clause must be a plain expression.
    fn cond_expr(&self, s: StmtId, what: &str) -> PResult<ExprId> {
        match self.arena.stmts[s] {
            Stmt::Expr(x) => Ok(x),
            _ => Err(Diag::parse(
                self.arena.stmts.span(s),
                format!("expected {what}, found simple statement"),
            )),
        }
    }

    fn if_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.bump();
        let (init, cond) = self.control_clause(|p| {
            if p.at(Tok::LBrace) {
                return Err(p.unexpected("condition"));
            }
            let mut init = None;
            let mut s = if p.at(Tok::Semi) {
                None
            } else {
                Some(p.simple_stmt()?)
            };
            if p.at(Tok::Semi) {
                p.bump();
                init = s.take();
                if p.at(Tok::LBrace) {
                    return Err(p.unexpected("condition"));
                }
                s = Some(p.simple_stmt()?);
            }
            let Some(s) = s else {
                return Err(p.unexpected("condition"));
            };
            Ok((init, p.cond_expr(s, "condition")?))
        })?;
        let then = self.block()?;
        let els = if self.eat(Tok::KwElse).is_some() {
            match self.tok() {
                Tok::KwIf => Some(self.if_stmt()?),
                Tok::LBrace => {
                    let block_start = self.start();
                    let block = self.block()?;
                    Some(self.arena.stmts.alloc(Stmt::Block(block), self.span_from(block_start)))
                }
                _ => return Err(self.unexpected("`if` or block after `else`")),
            }
        } else {
            None
        };
        let node = Stmt::If {
            init,
            cond,
            then,
            els,
        };
        Ok(self.arena.stmts.alloc(node, self.span_from(start)))
    }

    fn switch_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.bump();
        let (init, tag) = self.control_clause(|p| {
            let mut init = None;
            let mut tag = None;
            if !p.at(Tok::LBrace) {
                if !p.at(Tok::Semi) {
                    tag = Some(p.simple_stmt()?);
                }
                if p.eat(Tok::Semi).is_some() {
                    init = tag.take();
                    if !p.at(Tok::LBrace) {
                        tag = Some(p.simple_stmt()?);
                    }
                }
            }
            Ok((init, tag))
        })?;

        let l_brace = self.expect(Tok::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.tok(), Tok::KwCase | Tok::KwDefault) {
            clauses.push(self.case_clause()?);
        }
        let r_brace = self.expect(Tok::RBrace)?;
        let body = ClauseBlock {
            l_brace,
            clauses: self.arena.list_case_clauses(clauses),
            r_brace,
        };

        let node = match tag {
            Some(assign) if self.is_type_switch_guard(assign) => Stmt::TypeSwitch { init, assign, body },
            tag => Stmt::Switch {
                init,
                tag: tag.map(|s| self.cond_expr(s, "switch expression")).transpose()?,
                body,
            },
        };
        Ok(self.arena.stmts.alloc(node, self.span_from(start)))
    }

    /// `x.(type)` or `v := x.(type)`.
    fn is_type_switch_guard(&self, s: StmtId) -> bool {
        let is_guard = |e: ExprId| matches!(self.arena.exprs[e], Expr::TypeAssert { typ: None, .. });
        match self.arena.stmts[s] {
            Stmt::Expr(x) => is_guard(x),
            Stmt::Assign {
                lhs,
                op: AssignOp::Define,
                rhs,
                ..
            } => lhs.len() == 1 && matches!(self.arena.exprs(rhs), [x] if is_guard(*x)),
            _ => false,
        }
    }

    fn case_clause(&mut self) -> PResult<CaseClauseId> {
        let start = self.start();
        let (list, is_default) = if self.eat(Tok::KwCase).is_some() {
            (self.expr_list()?, false)
        } else {
            self.expect(Tok::KwDefault)?;
            (ListRef::EMPTY, true)
        };
        let colon = self.expect(Tok::Colon)?;
        let body = self.stmt_list()?;
        let clause = CaseClause {
            list,
            is_default,
            colon,
            body,
        };
        Ok(self.arena.case_clauses.alloc(clause, self.span_from(start)))
    }

    fn select_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.bump();
        let l_brace = self.expect(Tok::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.tok(), Tok::KwCase | Tok::KwDefault) {
            clauses.push(self.comm_clause()?);
        }
        let r_brace = self.expect(Tok::RBrace)?;
        let body = ClauseBlock {
            l_brace,
            clauses: self.arena.list_comm_clauses(clauses),
            r_brace,
        };
        Ok(self.arena.stmts.alloc(Stmt::Select { body }, self.span_from(start)))
    }

    fn comm_clause(&mut self) -> PResult<CommClauseId> {
        let start = self.start();
        let comm = if self.eat(Tok::KwCase).is_some() {
            Some(self.simple_stmt()?)
        } else {
            self.expect(Tok::KwDefault)?;
            None
        };
        let colon = self.expect(Tok::Colon)?;
        let body = self.stmt_list()?;
        let clause = CommClause { comm, colon, body };
        Ok(self.arena.comm_clauses.alloc(clause, self.span_from(start)))
    }

    fn for_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.bump();
        let header = self.control_clause(|p| {
            if p.at(Tok::LBrace) {
                return Ok(ForHeader::Loop {
                    init: None,
                    cond: None,
                    post: None,
                });
            }
            let mut first = None;
            if !p.at(Tok::Semi) {
                match p.simple_or_range(true)? {
                    Simple::Range {
                        key,
                        value,
                        define,
                        x,
                    } => {
                        return Ok(ForHeader::Range {
                            key,
                            value,
                            define,
                            x,
                        });
                    }
                    Simple::Stmt(s) => first = Some(s),
                }
            }
            if p.eat(Tok::Semi).is_none() {
                let cond = first.map(|s| p.cond_expr(s, "for condition")).transpose()?;
                return Ok(ForHeader::Loop {
                    init: None,
                    cond,
                    post: None,
                });
            }
            let cond = if p.at(Tok::Semi) {
                None
            } else {
                Some(p.simple_stmt()?)
            };
            p.expect(Tok::Semi)?;
            let post = if p.at(Tok::LBrace) {
                None
            } else {
                Some(p.simple_stmt()?)
            };
            let cond = cond.map(|s| p.cond_expr(s, "for condition")).transpose()?;
            Ok(ForHeader::Loop {
                init: first,
                cond,
                post,
            })
        })?;

        let body = self.block()?;
        let node = match header {
            ForHeader::Loop { init, cond, post } => Stmt::For {
                init,
                cond,
                post,
                body,
            },
            ForHeader::Range {
                key,
                value,
                define,
                x,
            } => Stmt::Range {
                key,
                value,
                define,
                x,
                body,
            },
        };
        Ok(self.arena.stmts.alloc(node, self.span_from(start)))
    }
}

//! # Arena AST for Go source files
//!
//! Every node lives in a typed arena (`SpannedArena<T>`) with its source span
//! kept in a parallel side table. Variable-length children are stored in the
//! centralized buffers of [`ExtraData`] and referenced through `ListRef<T>`.
//!
//! The tree is syntax only: it keeps every construct the printer needs to
//! reproduce a file (including the parentheses around a result list) but does
//! no name resolution or type checking.
//!
//! Walk/Visitor infrastructure lives in [`crate::walk`]; `#[derive(WalkAst)]`
//! generates the `Walk` impls for the node types below.

use ast_derive::WalkAst;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

// =============================================================================
// Positions, ids and lists
// =============================================================================

/// Byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Zero-width span at `pos`.
    #[inline]
    pub const fn empty_at(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Typed index into a `SpannedArena<T>`.
#[derive(Debug)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(self) -> usize {
        self.raw as usize
    }
}

/// Contiguous run inside one of the [`ExtraData`] buffers.
#[derive(Debug)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for ListRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.len == other.len
    }
}

impl<T> Eq for ListRef<T> {}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    const fn range(&self) -> core::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

// =============================================================================
// Symbols
// =============================================================================

/// Interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

/// Identifier occurrence: interned name plus where it appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentName {
    pub sym: Symbol,
    pub pos: Span,
}

/// Identity hasher; the interner hashes strings itself and keys buckets by
/// the resulting `u64`.
#[derive(Default)]
struct PrehashedKey(u64);

impl Hasher for PrehashedKey {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(b);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

/// String interner for identifiers.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, BuildHasherDefault<PrehashedKey>>,
    state: RandomState,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        let hash = self.state.hash_one(s);
        let bucket = self.buckets.entry(hash).or_default();
        if let Some(&sym) = bucket
            .iter()
            .find(|sym| &*self.strings[sym.0 as usize] == s)
        {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        bucket.push(sym);
        sym
    }

    /// Text of a symbol produced by this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arenas
// =============================================================================

/// Nodes and their spans in parallel vectors.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    #[inline]
    fn index(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    #[inline]
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }
}

pub type GenDeclId = Id<GenDecl>;
pub type FuncDeclId = Id<FuncDecl>;
pub type StmtId = Id<Stmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type CaseClauseId = Id<CaseClause>;
pub type CommClauseId = Id<CommClause>;

/// Centralized list buffers that `ListRef<T>` points into.
#[derive(Debug, Default)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub exprs: Vec<ExprId>,
    pub stmts: Vec<StmtId>,
    pub types: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub specs: Vec<Spec>,
    pub top_decls: Vec<TopLevelDecl>,
    pub case_clauses: Vec<CaseClauseId>,
    pub comm_clauses: Vec<CommClauseId>,
    pub type_terms: Vec<TypeTerm>,
    pub interface_elems: Vec<InterfaceElem>,
}

/// Owner of every node of one parsed file.
#[derive(Debug, Default)]
pub struct AstArena {
    pub gen_decls: SpannedArena<GenDecl>,
    pub funcs: SpannedArena<FuncDecl>,
    pub stmts: SpannedArena<Stmt>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub signatures: SpannedArena<Signature>,
    pub fields: SpannedArena<Field>,
    pub case_clauses: SpannedArena<CaseClause>,
    pub comm_clauses: SpannedArena<CommClause>,
    pub extras: ExtraData,
}

fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
    let start = buf.len();
    buf.extend(items);
    ListRef {
        start: start as u32,
        len: (buf.len() - start) as u32,
        _marker: PhantomData,
    }
}

macro_rules! list_accessors {
    ($($ty:ty => $buf:ident, $push:ident;)*) => {
        impl AstArena {
            $(
                pub fn $push(&mut self, items: impl IntoIterator<Item = $ty>) -> ListRef<$ty> {
                    push_list(&mut self.extras.$buf, items)
                }

                pub fn $buf(&self, r: ListRef<$ty>) -> &[$ty] {
                    &self.extras.$buf[r.range()]
                }
            )*
        }
    };
}

list_accessors! {
    IdentName => ident_names, list_ident_names;
    ExprId => exprs, list_exprs;
    StmtId => stmts, list_stmts;
    TypeId => types, list_types;
    FieldId => fields, list_fields;
    Spec => specs, list_specs;
    TopLevelDecl => top_decls, list_top_decls;
    CaseClauseId => case_clauses, list_case_clauses;
    CommClauseId => comm_clauses, list_comm_clauses;
    TypeTerm => type_terms, list_type_terms;
    InterfaceElem => interface_elems, list_interface_elems;
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...` up to (not including) the newline.
    Line,
    /// `/* ... */`, possibly spanning lines.
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub span: Span,
}

// =============================================================================
// File and declarations
// =============================================================================

#[derive(Debug, Clone, Copy, WalkAst)]
pub struct SourceFile {
    #[walk(skip)]
    pub package_pos: Span,
    #[walk(skip)]
    pub name: IdentName,
    pub decls: ListRef<TopLevelDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum TopLevelDecl {
    Gen(GenDeclId),
    Func(FuncDeclId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenDeclKind {
    Import,
    Const,
    Var,
    Type,
}

impl GenDeclKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            GenDeclKind::Import => "import",
            GenDeclKind::Const => "const",
            GenDeclKind::Var => "var",
            GenDeclKind::Type => "type",
        }
    }
}

/// `import`, `const`, `var` or `type` declaration, grouped or single.
#[derive(Debug, Clone, Copy, WalkAst)]
pub struct GenDecl {
    pub kind: GenDeclKind,
    #[walk(skip)]
    pub kw_pos: Span,
    pub l_paren: Option<Span>,
    pub specs: ListRef<Spec>,
    pub r_paren: Option<Span>,
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn span(&self) -> Span {
        match self {
            Spec::Import(s) => s.span,
            Spec::Value(s) => s.span,
            Spec::Type(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportName {
    Dot(Span),
    Blank(Span),
    Name(IdentName),
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub struct ImportSpec {
    #[walk(skip)]
    pub name: Option<ImportName>,
    pub path: BasicLit,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub struct ValueSpec {
    #[walk(skip)]
    pub names: ListRef<IdentName>,
    pub typ: Option<TypeId>,
    pub values: ListRef<ExprId>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub struct TypeSpec {
    #[walk(skip)]
    pub name: IdentName,
    pub type_params: Option<FieldList>,
    pub assign: Option<Span>,
    pub typ: TypeId,
    pub span: Span,
}

/// Function or method declaration.
#[derive(Debug, Clone, Copy, WalkAst)]
pub struct FuncDecl {
    #[walk(skip)]
    pub func_pos: Span,
    pub recv: Option<FieldList>,
    #[walk(skip)]
    pub name: IdentName,
    pub type_params: Option<FieldList>,
    pub sig: SignatureId,
    pub body: Option<Block>,
}

// =============================================================================
// Signatures and fields
// =============================================================================

/// Parameters and results of a function type.
#[derive(Debug, Clone, Copy, WalkAst)]
pub struct Signature {
    pub params: FieldList,
    pub results: Option<FieldList>,
}

/// Delimited list of fields: parameters, results, receivers, type
/// parameters, or struct fields.
///
/// `open`/`close` are the delimiter positions. A result list written as a
/// bare type has neither; clearing both on a parenthesized single result
/// makes the printer drop the parentheses.
#[derive(Debug, Clone, Copy, WalkAst)]
pub struct FieldList {
    pub open: Option<Span>,
    pub fields: ListRef<FieldId>,
    pub close: Option<Span>,
}

impl FieldList {
    pub const fn has_delims(&self) -> bool {
        self.open.is_some() && self.close.is_some()
    }
}

/// One entry of a [`FieldList`]: zero or more names sharing one type.
#[derive(Debug, Clone, Copy, WalkAst)]
pub struct Field {
    #[walk(skip)]
    pub names: ListRef<IdentName>,
    pub typ: TypeId,
    pub tag: Option<BasicLit>,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub struct TypeArgs {
    #[walk(skip)]
    pub l_brack: Span,
    pub args: ListRef<TypeId>,
    #[walk(skip)]
    pub r_brack: Span,
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub enum ArrayLen {
    Expr(ExprId),
    /// `[...]T` in a composite literal.
    Ellipsis,
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub struct TypeTerm {
    pub tilde: bool,
    pub typ: TypeId,
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub enum InterfaceElem {
    Method {
        #[walk(skip)]
        name: IdentName,
        sig: SignatureId,
        span: Span,
    },
    /// Embedded interface or type-set term list.
    Embed { typ: TypeId, span: Span },
}

impl InterfaceElem {
    pub fn span(&self) -> Span {
        match self {
            InterfaceElem::Method { span, .. } | InterfaceElem::Embed { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub enum Type {
    /// `T`, `pkg.T`, `T[A, B]`.
    Name {
        #[walk(skip)]
        pkg: Option<IdentName>,
        #[walk(skip)]
        name: IdentName,
        args: Option<TypeArgs>,
    },
    Pointer { elem: TypeId },
    Array { len: ArrayLen, elem: TypeId },
    Slice { elem: TypeId },
    Map { key: TypeId, value: TypeId },
    Chan { dir: ChanDir, elem: TypeId },
    Func { sig: SignatureId },
    Struct {
        #[walk(skip)]
        l_brace: Span,
        fields: ListRef<FieldId>,
        #[walk(skip)]
        r_brace: Span,
    },
    Interface {
        #[walk(skip)]
        l_brace: Span,
        elems: ListRef<InterfaceElem>,
        #[walk(skip)]
        r_brace: Span,
    },
    Paren { inner: TypeId },
    /// `...T`, only as the type of a final parameter.
    Variadic { elem: TypeId },
    /// `~A | B` constraint term list.
    Union { terms: ListRef<TypeTerm> },
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
    RawString,
}

/// Literal whose text is the source slice at `span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: BasicLitKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    Xor,
    Addr,
    Recv,
}

impl UnaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::Xor => "^",
            UnaryOp::Addr => "&",
            UnaryOp::Recv => "<-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    LOr,
    LAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinaryOp {
    pub const fn precedence(self) -> u8 {
        match self {
            BinaryOp::LOr => 1,
            BinaryOp::LAnd => 2,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 3,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Rem
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::And
            | BinaryOp::AndNot => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BinaryOp::LOr => "||",
            BinaryOp::LAnd => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&",
            BinaryOp::AndNot => "&^",
        }
    }
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub enum Expr {
    Ident(IdentName),
    BasicLit(BasicLit),
    CompositeLit {
        typ: Option<ExprId>,
        #[walk(skip)]
        l_brace: Span,
        elts: ListRef<ExprId>,
        #[walk(skip)]
        r_brace: Span,
    },
    KeyValue { key: ExprId, value: ExprId },
    FuncLit { sig: SignatureId, body: Block },
    Paren { x: ExprId },
    Selector {
        x: ExprId,
        #[walk(skip)]
        sel: IdentName,
    },
    /// `x[i]` and generic instantiation `f[A, B]`.
    Index {
        x: ExprId,
        #[walk(skip)]
        l_brack: Span,
        indices: ListRef<ExprId>,
        #[walk(skip)]
        r_brack: Span,
    },
    Slice {
        x: ExprId,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
        three: bool,
        #[walk(skip)]
        r_brack: Span,
    },
    /// `x.(T)`; `typ` is `None` for `x.(type)`.
    TypeAssert {
        x: ExprId,
        typ: Option<TypeId>,
        #[walk(skip)]
        r_paren: Span,
    },
    Call {
        fun: ExprId,
        #[walk(skip)]
        l_paren: Span,
        args: ListRef<ExprId>,
        ellipsis: Option<Span>,
        #[walk(skip)]
        r_paren: Span,
    },
    /// `*x`: dereference or pointer type in expression position.
    Star { x: ExprId },
    Unary { op: UnaryOp, x: ExprId },
    Binary {
        x: ExprId,
        op: BinaryOp,
        #[walk(skip)]
        op_pos: Span,
        y: ExprId,
    },
    /// Type literal used as an operand: conversions, composite literal
    /// types, `make`/`new` arguments, type switch cases.
    Type(TypeId),
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl AssignOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            BranchKind::Break => "break",
            BranchKind::Continue => "continue",
            BranchKind::Goto => "goto",
            BranchKind::Fallthrough => "fallthrough",
        }
    }
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub struct Block {
    #[walk(skip)]
    pub l_brace: Span,
    pub stmts: ListRef<StmtId>,
    #[walk(skip)]
    pub r_brace: Span,
}

/// `{ case ...: ... }` body of a switch or select.
#[derive(Debug, Clone, Copy)]
pub struct ClauseBlock<C> {
    pub l_brace: Span,
    pub clauses: ListRef<C>,
    pub r_brace: Span,
}

/// `case a, b:` or `default:` of an expression or type switch.
#[derive(Debug, Clone, Copy, WalkAst)]
pub struct CaseClause {
    /// Empty for `default`.
    pub list: ListRef<ExprId>,
    pub is_default: bool,
    #[walk(skip)]
    pub colon: Span,
    pub body: ListRef<StmtId>,
}

/// `case <comm>:` or `default:` of a select.
#[derive(Debug, Clone, Copy, WalkAst)]
pub struct CommClause {
    /// `None` for `default`.
    pub comm: Option<StmtId>,
    #[walk(skip)]
    pub colon: Span,
    pub body: ListRef<StmtId>,
}

#[derive(Debug, Clone, Copy, WalkAst)]
pub enum Stmt {
    Decl(GenDeclId),
    Labeled {
        #[walk(skip)]
        label: IdentName,
        stmt: StmtId,
    },
    Expr(ExprId),
    Send { chan: ExprId, value: ExprId },
    IncDec { x: ExprId, inc: bool },
    Assign {
        lhs: ListRef<ExprId>,
        op: AssignOp,
        #[walk(skip)]
        op_pos: Span,
        rhs: ListRef<ExprId>,
    },
    Go { call: ExprId },
    Defer { call: ExprId },
    Return { results: ListRef<ExprId> },
    Branch {
        kind: BranchKind,
        #[walk(skip)]
        label: Option<IdentName>,
    },
    Block(Block),
    If {
        init: Option<StmtId>,
        cond: ExprId,
        then: Block,
        els: Option<StmtId>,
    },
    Switch {
        init: Option<StmtId>,
        tag: Option<ExprId>,
        body: ClauseBlock<CaseClauseId>,
    },
    /// `assign` is `x.(type)` or `v := x.(type)`.
    TypeSwitch {
        init: Option<StmtId>,
        assign: StmtId,
        body: ClauseBlock<CaseClauseId>,
    },
    Select { body: ClauseBlock<CommClauseId> },
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: Block,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        x: ExprId,
        body: Block,
    },
    Empty,
}

//! Syntax tree shape consumed by the analysis engine.
//!
//! The parser is an external collaborator: it turns raw source text into a
//! [`SourceFile`] and hands it over, either in-process or serialized through
//! serde. Everything downstream works on these closed sum types with
//! exhaustive matches, so adding a node kind is a compile-time checked change.
//!
//! Line numbers are 1-based, matching what editors and the parser report.

pub mod visit;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Name from the package clause (`package worker`).
    pub package_name: String,
    /// Import path of the owning package (`example.com/app/internal/worker`).
    /// Falls back to `package_name` when the parser cannot resolve it.
    #[serde(default)]
    pub package_path: String,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub decls: Vec<Decl>,
    /// Raw source text, used for line classification and snippets.
    #[serde(default)]
    pub source: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, package_name: impl Into<String>) -> Self {
        let package_name = package_name.into();
        Self {
            path: path.into(),
            package_path: package_name.clone(),
            package_name,
            imports: Vec::new(),
            decls: Vec::new(),
            source: String::new(),
        }
    }

    /// Key identifying the owning package in the dependency graph.
    pub fn package_key(&self) -> &str {
        if self.package_path.is_empty() {
            &self.package_name
        } else {
            &self.package_path
        }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            Decl::Gen(_) | Decl::Bad { .. } => None,
        })
    }

    /// Number of type declarations in the file.
    pub fn type_count(&self) -> usize {
        self.decls
            .iter()
            .map(|decl| match decl {
                Decl::Gen(group) => group
                    .specs
                    .iter()
                    .filter(|spec| matches!(spec, Spec::Type(_)))
                    .count(),
                Decl::Func(_) | Decl::Bad { .. } => 0,
            })
            .sum()
    }

    /// Number of physical lines in the raw source.
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }
}

/// A parse failure reported by the parser for a whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub line: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub path: String,
    #[serde(default)]
    pub alias: Option<String>,
    pub line: usize,
}

/// Inclusive line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start_line: usize,
    pub end_line: usize,
}

impl Span {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_line >= 1 && self.start_line <= self.end_line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
    /// A declaration the parser could not make sense of.
    Bad { line: usize, reason: String },
}

impl From<FuncDecl> for Decl {
    fn from(func: FuncDecl) -> Self {
        Decl::Func(func)
    }
}

impl From<GenDecl> for Decl {
    fn from(group: GenDecl) -> Self {
        Decl::Gen(group)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    #[serde(default)]
    pub receiver: Option<Field>,
    #[serde(default)]
    pub type_params: Vec<Field>,
    #[serde(default)]
    pub params: Vec<Field>,
    #[serde(default)]
    pub results: Vec<Field>,
    /// `None` for functions implemented outside the language (assembly stubs).
    #[serde(default)]
    pub body: Option<Block>,
    pub span: Span,
}

impl FuncDecl {
    /// Qualified name: `Type.method` for methods, plain name otherwise.
    pub fn qualified_name(&self) -> String {
        match self.receiver_type_name() {
            Some(recv) => format!("{recv}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Receiver base type with pointers and type arguments stripped.
    pub fn receiver_type_name(&self) -> Option<String> {
        self.receiver.as_ref().map(|field| field.ty.base_name())
    }
}

/// A parameter, result, receiver, struct field or type parameter.
///
/// `names` is empty for unnamed fields (`func(int, string)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub names: Vec<String>,
    pub ty: TypeExpr,
}

impl Field {
    pub fn named(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            names: vec![name.into()],
            ty,
        }
    }

    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            names: Vec::new(),
            ty,
        }
    }

    /// How many entries this field contributes to a parameter list.
    pub fn arity(&self) -> usize {
        self.names.len().max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenKind {
    Var,
    Const,
    Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenDecl {
    pub kind: GenKind,
    pub specs: Vec<Spec>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<String>,
    #[serde(default)]
    pub ty: Option<TypeExpr>,
    #[serde(default)]
    pub values: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<Field>,
    pub ty: TypeExpr,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

/// `case` arm of a `switch` or type switch. An empty `exprs` list is `default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    #[serde(default)]
    pub exprs: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    pub line: usize,
}

/// `case` arm of a `select`. `comm == None` is `default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommClause {
    #[serde(default)]
    pub comm: Option<Box<Stmt>>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr {
        expr: Expr,
        line: usize,
    },
    Assign {
        lhs: Vec<Expr>,
        rhs: Vec<Expr>,
        /// `:=` rather than `=` or `op=`.
        define: bool,
        line: usize,
    },
    Decl(GenDecl),
    Go {
        call: Expr,
        line: usize,
    },
    Defer {
        call: Expr,
        line: usize,
    },
    Return {
        results: Vec<Expr>,
        line: usize,
    },
    Branch {
        kind: BranchKind,
        label: Option<String>,
        line: usize,
    },
    Block(Block),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        /// Either another `If` (else-if chain) or a `Block`.
        otherwise: Option<Box<Stmt>>,
        line: usize,
    },
    For {
        init: Option<Box<Stmt>>,
        /// `None` is the unconditional `for { }` form.
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
        line: usize,
    },
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        expr: Expr,
        body: Block,
        line: usize,
    },
    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        clauses: Vec<CaseClause>,
        line: usize,
    },
    TypeSwitch {
        init: Option<Box<Stmt>>,
        assign: Box<Stmt>,
        clauses: Vec<CaseClause>,
        line: usize,
    },
    Select {
        clauses: Vec<CommClause>,
        line: usize,
    },
    Labeled {
        label: String,
        stmt: Box<Stmt>,
        line: usize,
    },
    Send {
        channel: Expr,
        value: Expr,
        line: usize,
    },
    IncDec {
        expr: Expr,
        increment: bool,
        line: usize,
    },
    Empty,
}

impl Stmt {
    /// Source line of the statement, when it carries one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Stmt::Expr { line, .. }
            | Stmt::Assign { line, .. }
            | Stmt::Go { line, .. }
            | Stmt::Defer { line, .. }
            | Stmt::Return { line, .. }
            | Stmt::Branch { line, .. }
            | Stmt::If { line, .. }
            | Stmt::For { line, .. }
            | Stmt::Range { line, .. }
            | Stmt::Switch { line, .. }
            | Stmt::TypeSwitch { line, .. }
            | Stmt::Select { line, .. }
            | Stmt::Labeled { line, .. }
            | Stmt::Send { line, .. }
            | Stmt::IncDec { line, .. } => Some(*line),
            Stmt::Decl(group) => Some(group.line),
            Stmt::Block(block) => block.stmts.iter().find_map(Stmt::line),
            Stmt::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    Addr,
    /// Channel receive `<-ch`.
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    AndNot,
    LogicalAnd,
    LogicalOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::AndNot => "&^",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Ident(String),
    BasicLit {
        kind: LitKind,
        value: String,
    },
    Call {
        fun: Box<Expr>,
        args: Vec<Expr>,
        /// Trailing `...` spread on the last argument.
        #[serde(default)]
        ellipsis: bool,
        line: usize,
    },
    Selector {
        x: Box<Expr>,
        sel: String,
    },
    FuncLit {
        params: Vec<Field>,
        results: Vec<Field>,
        body: Block,
        span: Span,
    },
    CompositeLit {
        ty: Option<TypeExpr>,
        elts: Vec<Expr>,
        line: usize,
    },
    Unary {
        op: UnaryOp,
        x: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        x: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
    },
    Star(Box<Expr>),
    Paren(Box<Expr>),
    TypeAssert {
        x: Box<Expr>,
        /// `None` for `x.(type)` in a type switch.
        ty: Option<TypeExpr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    /// A type used in expression position, e.g. the first argument of `make`.
    Type(TypeExpr),
    Bad,
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// Strips redundant parentheses.
    pub fn unparen(&self) -> &Expr {
        match self {
            Expr::Paren(inner) => inner.unparen(),
            other => other,
        }
    }

    /// `pkg.Name` when the expression is a single-level selector on an identifier.
    pub fn as_qualified(&self) -> Option<(&str, &str)> {
        match self.unparen() {
            Expr::Selector { x, sel } => match x.unparen() {
                Expr::Ident(pkg) => Some((pkg.as_str(), sel.as_str())),
                _ => None,
            },
            _ => None,
        }
    }

    /// Type denoted by this expression, if it can denote one.
    pub fn as_type(&self) -> Option<TypeExpr> {
        match self.unparen() {
            Expr::Type(ty) => Some(ty.clone()),
            Expr::Ident(name) => Some(TypeExpr::Named(name.clone())),
            Expr::Selector { x, sel } => match x.unparen() {
                Expr::Ident(pkg) => Some(TypeExpr::Qualified {
                    package: pkg.clone(),
                    name: sel.clone(),
                }),
                _ => None,
            },
            Expr::Star(inner) => inner
                .as_type()
                .map(|ty| TypeExpr::Pointer(Box::new(ty))),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{name}"),
            Expr::BasicLit { value, .. } => write!(f, "{value}"),
            Expr::Call {
                fun,
                args,
                ellipsis,
                ..
            } => {
                write!(f, "{fun}(")?;
                write_joined(f, args)?;
                if *ellipsis {
                    write!(f, "...")?;
                }
                write!(f, ")")
            }
            Expr::Selector { x, sel } => write!(f, "{x}.{sel}"),
            Expr::FuncLit { .. } => write!(f, "func literal"),
            Expr::CompositeLit { ty, .. } => match ty {
                Some(ty) => write!(f, "{ty}{{...}}"),
                None => write!(f, "{{...}}"),
            },
            Expr::Unary { op, x } => {
                let symbol = match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                    UnaryOp::Plus => "+",
                    UnaryOp::BitNot => "^",
                    UnaryOp::Addr => "&",
                    UnaryOp::Recv => "<-",
                };
                write!(f, "{symbol}{x}")
            }
            Expr::Binary { op, lhs, rhs } => write!(f, "{lhs} {} {rhs}", op.symbol()),
            Expr::Index { x, index } => write!(f, "{x}[{index}]"),
            Expr::Slice { x, low, high } => {
                write!(f, "{x}[")?;
                if let Some(low) = low {
                    write!(f, "{low}")?;
                }
                write!(f, ":")?;
                if let Some(high) = high {
                    write!(f, "{high}")?;
                }
                write!(f, "]")
            }
            Expr::Star(x) => write!(f, "*{x}"),
            Expr::Paren(x) => write!(f, "({x})"),
            Expr::TypeAssert { x, ty } => match ty {
                Some(ty) => write!(f, "{x}.({ty})"),
                None => write!(f, "{x}.(type)"),
            },
            Expr::KeyValue { key, value } => write!(f, "{key}: {value}"),
            Expr::Type(ty) => write!(f, "{ty}"),
            Expr::Bad => write!(f, "<bad>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeExpr {
    /// Unqualified name, including predeclared types and `any`.
    Named(String),
    Qualified {
        package: String,
        name: String,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array {
        len: Option<String>,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Func {
        params: Vec<Field>,
        results: Vec<Field>,
    },
    Interface {
        methods: Vec<String>,
        #[serde(default)]
        embeds: Vec<TypeExpr>,
    },
    Struct {
        fields: Vec<Field>,
    },
    /// `...T` in the last parameter position.
    Ellipsis(Box<TypeExpr>),
    /// Instantiated generic type `List[T]`.
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(name.into())
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn chan(dir: ChanDir, elem: TypeExpr) -> Self {
        TypeExpr::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    /// Strips pointers and generic instantiation.
    pub fn base_name(&self) -> String {
        match self {
            TypeExpr::Pointer(inner) => inner.base_name(),
            TypeExpr::Generic { base, .. } => base.base_name(),
            other => other.to_string(),
        }
    }

    /// Interface-typed: an interface literal or the `any` alias.
    pub fn is_interface(&self) -> bool {
        match self {
            TypeExpr::Interface { .. } => true,
            TypeExpr::Named(name) => name == "any",
            _ => false,
        }
    }

    /// Zero-size element type used purely for signalling (`struct{}`).
    pub fn is_unit(&self) -> bool {
        match self {
            TypeExpr::Struct { fields } => fields.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => write!(f, "{name}"),
            TypeExpr::Qualified { package, name } => write!(f, "{package}.{name}"),
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Array { len, elem } => match len {
                Some(len) => write!(f, "[{len}]{elem}"),
                None => write!(f, "[...]{elem}"),
            },
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExpr::Func { params, results } => {
                write!(f, "func(")?;
                write_fields(f, params)?;
                write!(f, ")")?;
                match results.len() {
                    0 => Ok(()),
                    1 if results[0].names.is_empty() => write!(f, " {}", results[0].ty),
                    _ => {
                        write!(f, " (")?;
                        write_fields(f, results)?;
                        write!(f, ")")
                    }
                }
            }
            TypeExpr::Interface { methods, embeds } => {
                if methods.is_empty() && embeds.is_empty() {
                    write!(f, "interface{{}}")
                } else {
                    write!(f, "interface{{...}}")
                }
            }
            TypeExpr::Struct { fields } => {
                if fields.is_empty() {
                    write!(f, "struct{{}}")
                } else {
                    write!(f, "struct{{...}}")
                }
            }
            TypeExpr::Ellipsis(elem) => write!(f, "...{elem}"),
            TypeExpr::Generic { base, args } => {
                write!(f, "{base}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{expr}")?;
    }
    Ok(())
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Field]) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if field.names.is_empty() {
            write!(f, "{}", field.ty)?;
        } else {
            write!(f, "{} {}", field.names.join(", "), field.ty)?;
        }
    }
    Ok(())
}

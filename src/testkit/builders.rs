use crate::ast::{
    BinaryOp, Block, BranchKind, CaseClause, ChanDir, CommClause, Decl, Expr, Field, FuncDecl,
    GenDecl, GenKind, Import, LitKind, SourceFile, Span, Spec, Stmt, TypeExpr, TypeSpec, UnaryOp,
    ValueSpec,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

pub fn ty(name: &str) -> TypeExpr {
    TypeExpr::named(name)
}

pub fn qty(package: &str, name: &str) -> TypeExpr {
    TypeExpr::qualified(package, name)
}

pub fn ptr(inner: TypeExpr) -> TypeExpr {
    TypeExpr::Pointer(Box::new(inner))
}

/// The zero-size `struct{}` type.
pub fn unit() -> TypeExpr {
    TypeExpr::Struct { fields: Vec::new() }
}

pub fn chan_of(elem: TypeExpr) -> TypeExpr {
    TypeExpr::chan(ChanDir::Both, elem)
}

pub fn struct_of(fields: Vec<Field>) -> TypeExpr {
    TypeExpr::Struct { fields }
}

pub fn param(name: &str, ty: TypeExpr) -> Field {
    Field::named(name, ty)
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

pub fn ident(name: &str) -> Expr {
    Expr::ident(name)
}

pub fn int(value: i64) -> Expr {
    Expr::BasicLit {
        kind: LitKind::Int,
        value: value.to_string(),
    }
}

pub fn int_lit(text: &str) -> Expr {
    Expr::BasicLit {
        kind: LitKind::Int,
        value: text.to_string(),
    }
}

pub fn string_lit(text: &str) -> Expr {
    Expr::BasicLit {
        kind: LitKind::String,
        value: format!("{text:?}"),
    }
}

/// Dotted path to a selector chain: `"s.pool.Start"`.
pub fn path(dotted: &str) -> Expr {
    let mut parts = dotted.split('.');
    let first = ident(parts.next().unwrap_or_default());
    parts.fold(first, |x, sel| Expr::Selector {
        x: Box::new(x),
        sel: sel.to_string(),
    })
}

pub fn call(fun: &str, args: Vec<Expr>) -> Expr {
    call_expr(path(fun), args)
}

pub fn call_expr(fun: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        fun: Box::new(fun),
        args,
        ellipsis: false,
        line: 1,
    }
}

pub fn and(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::LogicalAnd, lhs, rhs)
}

pub fn or(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::LogicalOr, lhs, rhs)
}

pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Channel receive `<-ch`.
pub fn recv(channel: Expr) -> Expr {
    Expr::Unary {
        op: UnaryOp::Recv,
        x: Box::new(channel),
    }
}

pub fn addr(x: Expr) -> Expr {
    Expr::Unary {
        op: UnaryOp::Addr,
        x: Box::new(x),
    }
}

pub fn func_lit(body: Vec<Stmt>) -> Expr {
    Expr::FuncLit {
        params: Vec::new(),
        results: Vec::new(),
        body: block(body),
        span: Span::new(1, 1),
    }
}

pub fn composite(ty: TypeExpr) -> Expr {
    Expr::CompositeLit {
        ty: Some(ty),
        elts: Vec::new(),
        line: 1,
    }
}

/// `new(T)`.
pub fn new_of(ty: TypeExpr) -> Expr {
    call("new", vec![Expr::Type(ty)])
}

/// `make(chan elem)` or `make(chan elem, size)`.
pub fn make_chan(elem: TypeExpr, size: Option<Expr>) -> Expr {
    make_chan_dir(ChanDir::Both, elem, size)
}

pub fn make_chan_dir(dir: ChanDir, elem: TypeExpr, size: Option<Expr>) -> Expr {
    let mut args = vec![Expr::Type(TypeExpr::chan(dir, elem))];
    args.extend(size);
    call("make", args)
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block::new(stmts)
}

/// `name := value`.
pub fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        lhs: vec![ident(name)],
        rhs: vec![value],
        define: true,
        line: 1,
    }
}

/// `target = value`.
pub fn set(target: Expr, value: Expr) -> Stmt {
    Stmt::Assign {
        lhs: vec![target],
        rhs: vec![value],
        define: false,
        line: 1,
    }
}

/// `var name T = value` inside a function.
pub fn var_stmt(name: &str, ty: Option<TypeExpr>, value: Option<Expr>) -> Stmt {
    Stmt::Decl(var_group(name, ty, value))
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr { expr, line: 1 }
}

pub fn ret() -> Stmt {
    Stmt::Return {
        results: Vec::new(),
        line: 1,
    }
}

pub fn ret_val(value: Expr) -> Stmt {
    Stmt::Return {
        results: vec![value],
        line: 1,
    }
}

pub fn brk() -> Stmt {
    branch(BranchKind::Break, None)
}

pub fn brk_label(label: &str) -> Stmt {
    branch(BranchKind::Break, Some(label))
}

pub fn cont() -> Stmt {
    branch(BranchKind::Continue, None)
}

pub fn cont_label(label: &str) -> Stmt {
    branch(BranchKind::Continue, Some(label))
}

pub fn branch(kind: BranchKind, label: Option<&str>) -> Stmt {
    Stmt::Branch {
        kind,
        label: label.map(str::to_string),
        line: 1,
    }
}

pub fn if_stmt(cond: Expr, then: Vec<Stmt>) -> Stmt {
    Stmt::If {
        init: None,
        cond,
        then: block(then),
        otherwise: None,
        line: 1,
    }
}

pub fn if_else(cond: Expr, then: Vec<Stmt>, otherwise: Vec<Stmt>) -> Stmt {
    Stmt::If {
        init: None,
        cond,
        then: block(then),
        otherwise: Some(Box::new(Stmt::Block(block(otherwise)))),
        line: 1,
    }
}

pub fn if_else_if(cond: Expr, then: Vec<Stmt>, else_if: Stmt) -> Stmt {
    Stmt::If {
        init: None,
        cond,
        then: block(then),
        otherwise: Some(Box::new(else_if)),
        line: 1,
    }
}

/// Unconditional `for { ... }`.
pub fn for_ever(body: Vec<Stmt>) -> Stmt {
    Stmt::For {
        init: None,
        cond: None,
        post: None,
        body: block(body),
        line: 1,
    }
}

pub fn for_cond(cond: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::For {
        init: None,
        cond: Some(cond),
        post: None,
        body: block(body),
        line: 1,
    }
}

/// `for name := range expr { ... }`.
pub fn range_over(name: &str, expr: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::Range {
        key: Some(ident(name)),
        value: None,
        expr,
        body: block(body),
        line: 1,
    }
}

pub fn switch(tag: Option<Expr>, clauses: Vec<CaseClause>) -> Stmt {
    Stmt::Switch {
        init: None,
        tag,
        clauses,
        line: 1,
    }
}

pub fn case(exprs: Vec<Expr>, body: Vec<Stmt>) -> CaseClause {
    CaseClause {
        exprs,
        body,
        line: 1,
    }
}

pub fn default_case(body: Vec<Stmt>) -> CaseClause {
    case(Vec::new(), body)
}

pub fn select(clauses: Vec<CommClause>) -> Stmt {
    Stmt::Select { clauses, line: 1 }
}

/// `case name := <-channel:`.
pub fn comm_recv(name: &str, channel: Expr, body: Vec<Stmt>) -> CommClause {
    CommClause {
        comm: Some(Box::new(assign(name, recv(channel)))),
        body,
        line: 1,
    }
}

/// `case <-channel:`.
pub fn comm_recv_discard(channel: Expr, body: Vec<Stmt>) -> CommClause {
    CommClause {
        comm: Some(Box::new(expr_stmt(recv(channel)))),
        body,
        line: 1,
    }
}

/// `case channel <- value:`.
pub fn comm_send(channel: Expr, value: Expr, body: Vec<Stmt>) -> CommClause {
    CommClause {
        comm: Some(Box::new(send(channel, value))),
        body,
        line: 1,
    }
}

pub fn comm_default(body: Vec<Stmt>) -> CommClause {
    CommClause {
        comm: None,
        body,
        line: 1,
    }
}

pub fn send(channel: Expr, value: Expr) -> Stmt {
    Stmt::Send {
        channel,
        value,
        line: 1,
    }
}

pub fn labeled(label: &str, stmt: Stmt) -> Stmt {
    Stmt::Labeled {
        label: label.to_string(),
        stmt: Box::new(stmt),
        line: 1,
    }
}

/// `go func() { ... }()`.
pub fn go_anon(body: Vec<Stmt>) -> Stmt {
    Stmt::Go {
        call: call_expr(func_lit(body), Vec::new()),
        line: 1,
    }
}

/// `go worker(args)` or `go p.worker(args)` for dotted names.
pub fn go_call(fun: &str, args: Vec<Expr>) -> Stmt {
    Stmt::Go {
        call: call(fun, args),
        line: 1,
    }
}

pub fn defer_call(fun: &str, args: Vec<Expr>) -> Stmt {
    Stmt::Defer {
        call: call(fun, args),
        line: 1,
    }
}

/// Place a statement on `line`, including the call it wraps.
pub fn at(line: usize, stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::Expr { expr, .. } => Stmt::Expr {
            expr: expr_at(line, expr),
            line,
        },
        Stmt::Assign {
            lhs, rhs, define, ..
        } => Stmt::Assign {
            lhs,
            rhs: rhs.into_iter().map(|e| expr_at(line, e)).collect(),
            define,
            line,
        },
        Stmt::Decl(mut group) => {
            group.line = line;
            for spec in &mut group.specs {
                match spec {
                    Spec::Value(value) => {
                        value.line = line;
                        value.values = std::mem::take(&mut value.values)
                            .into_iter()
                            .map(|e| expr_at(line, e))
                            .collect();
                    }
                    Spec::Type(type_spec) => type_spec.line = line,
                }
            }
            Stmt::Decl(group)
        }
        Stmt::Go { call, .. } => Stmt::Go {
            call: expr_at(line, call),
            line,
        },
        Stmt::Defer { call, .. } => Stmt::Defer {
            call: expr_at(line, call),
            line,
        },
        Stmt::Return { results, .. } => Stmt::Return { results, line },
        Stmt::Branch { kind, label, .. } => Stmt::Branch { kind, label, line },
        Stmt::If {
            init,
            cond,
            then,
            otherwise,
            ..
        } => Stmt::If {
            init,
            cond,
            then,
            otherwise,
            line,
        },
        Stmt::For {
            init,
            cond,
            post,
            body,
            ..
        } => Stmt::For {
            init,
            cond,
            post,
            body,
            line,
        },
        Stmt::Range {
            key,
            value,
            expr,
            body,
            ..
        } => Stmt::Range {
            key,
            value,
            expr,
            body,
            line,
        },
        Stmt::Switch {
            init, tag, clauses, ..
        } => Stmt::Switch {
            init,
            tag,
            clauses,
            line,
        },
        Stmt::TypeSwitch {
            init,
            assign,
            clauses,
            ..
        } => Stmt::TypeSwitch {
            init,
            assign,
            clauses,
            line,
        },
        Stmt::Select { clauses, .. } => Stmt::Select { clauses, line },
        Stmt::Labeled { label, stmt, .. } => Stmt::Labeled {
            label,
            stmt: Box::new(at(line, *stmt)),
            line,
        },
        Stmt::Send { channel, value, .. } => Stmt::Send {
            channel,
            value,
            line,
        },
        Stmt::IncDec {
            expr, increment, ..
        } => Stmt::IncDec {
            expr,
            increment,
            line,
        },
        other @ (Stmt::Block(_) | Stmt::Empty) => other,
    }
}

/// Move a call, composite literal or function literal onto `line`.
fn expr_at(line: usize, expr: Expr) -> Expr {
    match expr {
        Expr::Call {
            fun,
            args,
            ellipsis,
            ..
        } => Expr::Call {
            fun: Box::new(expr_at(line, *fun)),
            args,
            ellipsis,
            line,
        },
        Expr::CompositeLit { ty, elts, .. } => Expr::CompositeLit { ty, elts, line },
        Expr::FuncLit {
            params,
            results,
            body,
            span,
        } => {
            let len = span.end_line.saturating_sub(span.start_line);
            Expr::FuncLit {
                params,
                results,
                body,
                span: Span::new(line, line + len),
            }
        }
        Expr::Unary { op, x } => Expr::Unary {
            op,
            x: Box::new(expr_at(line, *x)),
        },
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Declarations and files
// ---------------------------------------------------------------------------

/// A plain function spanning a single line.
pub fn func_decl(name: &str, body: Vec<Stmt>) -> FuncDecl {
    FuncDecl {
        name: name.to_string(),
        receiver: None,
        type_params: Vec::new(),
        params: Vec::new(),
        results: Vec::new(),
        body: Some(block(body)),
        span: Span::new(1, 1),
    }
}

pub fn method_decl(receiver: &str, name: &str, body: Vec<Stmt>) -> FuncDecl {
    FuncDecl {
        receiver: Some(param("r", ptr(ty(receiver)))),
        ..func_decl(name, body)
    }
}

pub fn var_group(name: &str, ty: Option<TypeExpr>, value: Option<Expr>) -> GenDecl {
    GenDecl {
        kind: GenKind::Var,
        specs: vec![Spec::Value(ValueSpec {
            names: vec![name.to_string()],
            ty,
            values: value.into_iter().collect(),
            line: 1,
        })],
        line: 1,
    }
}

/// Package-level `var name T = value`.
pub fn var_decl(name: &str, ty: Option<TypeExpr>, value: Option<Expr>) -> Decl {
    Decl::Gen(var_group(name, ty, value))
}

pub fn type_decl(name: &str, ty: TypeExpr) -> Decl {
    Decl::Gen(GenDecl {
        kind: GenKind::Type,
        specs: vec![Spec::Type(TypeSpec {
            name: name.to_string(),
            type_params: Vec::new(),
            ty,
            line: 1,
        })],
        line: 1,
    })
}

pub fn import(path: &str) -> Import {
    Import {
        path: path.to_string(),
        alias: None,
        line: 1,
    }
}

pub fn source_file(path: &str, package: &str, decls: Vec<Decl>) -> SourceFile {
    SourceFile {
        decls,
        ..SourceFile::new(path, package)
    }
}

/// A file belonging to package `package_path` that imports `imports`.
pub fn package_file(path: &str, package_path: &str, imports: &[&str]) -> SourceFile {
    let package_name = package_path.rsplit('/').next().unwrap_or(package_path);
    SourceFile {
        package_path: package_path.to_string(),
        imports: imports.iter().map(|p| import(p)).collect(),
        ..SourceFile::new(path, package_name)
    }
}

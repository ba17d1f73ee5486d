use super::leaks::assess_task_body;
use crate::ast::visit::{self, Visit};
use crate::ast::{
    Block, ChanDir, Expr, FuncDecl, GenDecl, LitKind, SourceFile, Spec, Stmt, TypeExpr,
};
use crate::config::FactConfig;
use crate::core::{
    CalleeKind, ChannelDirection, ChannelFact, ConcurrencyFacts, LeakRisk, SyncKind,
    SyncPrimitiveFact, TaskLaunch,
};
use std::collections::HashMap;

const ATOMIC_TYPES: &[&str] = &[
    "Bool", "Int32", "Int64", "Uint32", "Uint64", "Uintptr", "Value", "Pointer",
];

/// Collect the concurrency facts of one file.
pub fn collect_facts(file: &SourceFile, config: &FactConfig) -> ConcurrencyFacts {
    FactCollector::new(file, config).collect()
}

/// Single-pass visitor over one file.
///
/// Package-level declarations are seen with no enclosing function; function
/// literals inherit the name of the declaration they appear in.
pub struct FactCollector<'a> {
    file: &'a SourceFile,
    config: &'a FactConfig,
    source_lines: Vec<&'a str>,
    functions: HashMap<&'a str, Vec<&'a FuncDecl>>,
    sync_package: &'a str,
    atomic_package: &'a str,
    current_function: Option<String>,
    facts: ConcurrencyFacts,
}

impl<'a> FactCollector<'a> {
    pub fn new(file: &'a SourceFile, config: &'a FactConfig) -> Self {
        let mut functions: HashMap<&str, Vec<&FuncDecl>> = HashMap::new();
        for func in file.functions() {
            functions.entry(func.name.as_str()).or_default().push(func);
        }

        Self {
            file,
            config,
            source_lines: file.source.lines().collect(),
            functions,
            sync_package: local_package_name(file, "sync"),
            atomic_package: local_package_name(file, "sync/atomic"),
            current_function: None,
            facts: ConcurrencyFacts::default(),
        }
    }

    pub fn collect(mut self) -> ConcurrencyFacts {
        let file = self.file;
        self.visit_file(file);

        log::debug!(
            "{}: {} launches, {} channels, {} sync primitives, {} leak risks",
            file.path.display(),
            self.facts.launches.len(),
            self.facts.channels.len(),
            self.facts.sync_primitives.len(),
            self.facts.leak_risks.len()
        );
        self.facts
    }

    fn record_launch(&mut self, call: &'a Expr, line: usize) {
        let Expr::Call { fun, .. } = call.unparen() else {
            log::debug!(
                "{}:{}: go statement without a call expression",
                self.file.path.display(),
                line
            );
            return;
        };

        let (callee_kind, callee_name, target) = match fun.unparen() {
            Expr::FuncLit { body, .. } => (CalleeKind::Anonymous, fun.to_string(), Some(body)),
            Expr::Ident(name) => (CalleeKind::Named, name.clone(), self.function_body(name)),
            Expr::Selector { sel, .. } => {
                (CalleeKind::Method, fun.to_string(), self.method_body(sel))
            }
            // Generic instantiation `go worker[int](jobs)`.
            Expr::Index { x, .. } => match x.unparen() {
                Expr::Ident(name) => (CalleeKind::Named, name.clone(), self.function_body(name)),
                other => (CalleeKind::Method, other.to_string(), None),
            },
            other => (CalleeKind::Named, other.to_string(), None),
        };

        let context_snippet = match callee_kind {
            CalleeKind::Anonymous => self.snippet_at(line),
            CalleeKind::Named | CalleeKind::Method => String::new(),
        };

        if self.config.detect_leaks {
            if let Some(assessment) = target.and_then(assess_task_body) {
                self.facts.leak_risks.push(LeakRisk {
                    file: self.file.path.clone(),
                    line,
                    callee_name: callee_name.clone(),
                    level: assessment.level,
                    reason: assessment.reason,
                    recommendation: assessment.recommendation,
                });
            }
        }

        self.facts.launches.push(TaskLaunch {
            file: self.file.path.clone(),
            line,
            callee_kind,
            callee_name,
            context_snippet,
        });
    }

    /// Body of a same-file plain function called `name`.
    fn function_body(&self, name: &str) -> Option<&'a Block> {
        self.functions
            .get(name)?
            .iter()
            .find(|func| func.receiver.is_none())
            .and_then(|func| func.body.as_ref())
    }

    /// Body of a same-file method called `name`, when only one type declares it.
    fn method_body(&self, name: &str) -> Option<&'a Block> {
        let candidates: Vec<&&FuncDecl> = self
            .functions
            .get(name)?
            .iter()
            .filter(|func| func.receiver.is_some())
            .collect();
        match candidates.as_slice() {
            [only] => only.body.as_ref(),
            _ => None,
        }
    }

    fn snippet_at(&self, line: usize) -> String {
        let text = line
            .checked_sub(1)
            .and_then(|index| self.source_lines.get(index))
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "go func() { ... }".to_string());
        truncate_snippet(&text, self.config.snippet_max_len)
    }

    fn record_channel(&mut self, args: &[Expr], line: usize) {
        let Some(Expr::Type(TypeExpr::Chan { dir, elem })) = args.first().map(Expr::unparen) else {
            return;
        };

        let (buffered, buffer_size) = match args.get(1).map(Expr::unparen) {
            None => (false, 0),
            Some(Expr::BasicLit {
                kind: LitKind::Int,
                value,
            }) => match parse_int_literal(value) {
                Some(0) => (false, 0),
                Some(size) => (true, size),
                None => (true, 0),
            },
            Some(_) => (true, 0),
        };

        let direction = match dir {
            ChanDir::Both => ChannelDirection::Bidirectional,
            ChanDir::Send => ChannelDirection::SendOnly,
            ChanDir::Recv => ChannelDirection::ReceiveOnly,
        };

        self.facts.channels.push(ChannelFact {
            file: self.file.path.clone(),
            line,
            enclosing_function: self.current_function.clone(),
            element_type: elem.to_string(),
            unit_element: elem.is_unit(),
            buffered,
            buffer_size,
            direction,
        });
    }

    fn record_sync(&mut self, kind: SyncKind, variable_name: String, line: usize) {
        self.facts.sync_primitives.push(SyncPrimitiveFact {
            file: self.file.path.clone(),
            line,
            enclosing_function: self.current_function.clone(),
            kind,
            variable_name,
        });
    }

    fn record_value_bindings(&mut self, lhs: &[Expr], rhs: &[Expr], line: usize) {
        // `a, b := f()` binds results of one call; nothing to pair up.
        if lhs.len() != rhs.len() {
            return;
        }
        for (target, value) in lhs.iter().zip(rhs) {
            if is_blank(target) {
                continue;
            }
            if let Some(kind) = self.value_sync_kind(value) {
                self.record_sync(kind, target.to_string(), line);
            }
        }
    }

    fn record_gen_decl(&mut self, decl: &GenDecl) {
        for spec in &decl.specs {
            match spec {
                Spec::Value(value) => {
                    for (i, name) in value.names.iter().enumerate() {
                        if name == "_" {
                            continue;
                        }
                        let kind = value
                            .ty
                            .as_ref()
                            .and_then(|ty| self.type_sync_kind(ty))
                            .or_else(|| {
                                value.values.get(i).and_then(|v| self.value_sync_kind(v))
                            });
                        if let Some(kind) = kind {
                            self.record_sync(kind, name.clone(), value.line);
                        }
                    }
                }
                Spec::Type(type_spec) => {
                    let TypeExpr::Struct { fields } = &type_spec.ty else {
                        continue;
                    };
                    for field in fields {
                        let Some(kind) = self.type_sync_kind(&field.ty) else {
                            continue;
                        };
                        // Embedded fields are named after their type.
                        let names = if field.names.is_empty() {
                            vec![field.ty.base_name()]
                        } else {
                            field.names.clone()
                        };
                        for name in names {
                            self.record_sync(
                                kind,
                                format!("{}.{name}", type_spec.name),
                                type_spec.line,
                            );
                        }
                    }
                }
            }
        }
    }

    fn type_sync_kind(&self, ty: &TypeExpr) -> Option<SyncKind> {
        match ty {
            TypeExpr::Pointer(inner) => self.type_sync_kind(inner),
            TypeExpr::Generic { base, .. } => self.type_sync_kind(base),
            TypeExpr::Qualified { package, name } if package == self.sync_package => {
                match name.as_str() {
                    "Mutex" => Some(SyncKind::Mutex),
                    "RWMutex" => Some(SyncKind::RwMutex),
                    "WaitGroup" => Some(SyncKind::WaitGroup),
                    "Once" => Some(SyncKind::Once),
                    "Cond" => Some(SyncKind::Condvar),
                    _ => None,
                }
            }
            TypeExpr::Qualified { package, name }
                if package == self.atomic_package && ATOMIC_TYPES.contains(&name.as_str()) =>
            {
                Some(SyncKind::Atomic)
            }
            _ => None,
        }
    }

    /// Primitive constructed by `value`: `sync.Mutex{}`, `&sync.WaitGroup{}`,
    /// `new(sync.Once)` or `sync.NewCond(l)`.
    fn value_sync_kind(&self, value: &Expr) -> Option<SyncKind> {
        match value.unparen() {
            Expr::CompositeLit { ty: Some(ty), .. } => self.type_sync_kind(ty),
            Expr::Unary { x, .. } => self.value_sync_kind(x),
            Expr::Call { fun, args, .. } => match fun.unparen() {
                Expr::Ident(name) if name == "new" => args
                    .first()
                    .and_then(Expr::as_type)
                    .and_then(|ty| self.type_sync_kind(&ty)),
                other => match other.as_qualified() {
                    Some((package, "NewCond")) if package == self.sync_package => {
                        Some(SyncKind::Condvar)
                    }
                    _ => None,
                },
            },
            _ => None,
        }
    }
}

impl<'a> Visit<'a> for FactCollector<'a> {
    fn visit_func_decl(&mut self, func: &'a FuncDecl) {
        let previous = self.current_function.replace(func.qualified_name());
        visit::walk_func_decl(self, func);
        self.current_function = previous;
    }

    fn visit_gen_decl(&mut self, decl: &'a GenDecl) {
        self.record_gen_decl(decl);
        visit::walk_gen_decl(self, decl);
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Go { call, line } => self.record_launch(call, *line),
            Stmt::Assign { lhs, rhs, line, .. } => self.record_value_bindings(lhs, rhs, *line),
            _ => {}
        }
        visit::walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        if let Expr::Call { fun, args, line, .. } = expr {
            if matches!(fun.unparen(), Expr::Ident(name) if name == "make") {
                self.record_channel(args, *line);
            }
        }
        visit::walk_expr(self, expr);
    }
}

/// Local name under which `import_path` is visible in `file`.
fn local_package_name<'a>(file: &'a SourceFile, import_path: &'a str) -> &'a str {
    let default = import_path.rsplit('/').next().unwrap_or(import_path);
    file.imports
        .iter()
        .find(|import| import.path == import_path)
        .and_then(|import| import.alias.as_deref())
        .unwrap_or(default)
}

fn is_blank(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(name) if name == "_")
}

/// Integer literal value. Accepts `_` separators and the `0x`, `0o`, `0b`
/// and legacy leading-zero octal forms.
pub fn parse_int_literal(text: &str) -> Option<usize> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();

    let (digits, radix) = if let Some(rest) = cleaned.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = cleaned.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = cleaned.strip_prefix("0b") {
        (rest, 2)
    } else if cleaned.len() > 1 && cleaned.starts_with('0') {
        (&cleaned[1..], 8)
    } else {
        (cleaned.as_str(), 10)
    };

    usize::from_str_radix(digits, radix).ok()
}

fn truncate_snippet(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

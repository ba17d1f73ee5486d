// Shared fixtures for gomap integration tests
#![allow(dead_code)]

use gomap::ast::{ParseFailure, SourceFile, Span};
use gomap::testkit::*;
use gomap::{AnalysisConfig, AnalysisOutcome, AnalysisReport, AnalysisSession};

pub const MODULE: &str = "example.com/shop";

/// Source text of `pool/pool.go`, matching [`worker_pool_file`] line for line.
pub const WORKER_POOL_SOURCE: &str = "package pool

import \"sync\"

// Run fans jobs out to three workers.
func Run(jobs []int) {
\tvar wg sync.WaitGroup
\tqueue := make(chan int)
\twg.Add(3)
\tgo worker(queue, &wg)
\tgo worker(queue, &wg)
\tgo worker(queue, &wg)
\t/* feed the
\t   workers */
\tfor _, j := range jobs {
\t\tqueue <- j
\t}
\tclose(queue)
\twg.Wait()
}
";

/// Three launches, one unbuffered channel and a wait group in one function.
pub fn worker_pool_file() -> SourceFile {
    let mut run = func_decl(
        "Run",
        vec![
            at(7, var_stmt("wg", Some(qty("sync", "WaitGroup")), None)),
            at(8, assign("queue", make_chan(ty("int"), None))),
            at(9, expr_stmt(call("wg.Add", vec![int(3)]))),
            at(10, go_call("worker", vec![ident("queue"), addr(ident("wg"))])),
            at(11, go_call("worker", vec![ident("queue"), addr(ident("wg"))])),
            at(12, go_call("worker", vec![ident("queue"), addr(ident("wg"))])),
            at(
                15,
                range_over(
                    "j",
                    ident("jobs"),
                    vec![at(16, send(ident("queue"), ident("j")))],
                ),
            ),
            at(18, expr_stmt(call("close", vec![ident("queue")]))),
            at(19, expr_stmt(call("wg.Wait", vec![]))),
        ],
    );
    run.params = vec![param("jobs", gomap::ast::TypeExpr::Slice(Box::new(ty("int"))))];
    run.span = Span::new(6, 20);

    let mut file = package_file("pool/pool.go", &format!("{MODULE}/pool"), &["sync"]);
    file.decls = vec![run.into()];
    file.source = WORKER_POOL_SOURCE.to_string();
    file
}

/// A file in package `name` importing the given sibling packages.
pub fn package(name: &str, imports: &[&str]) -> SourceFile {
    let paths: Vec<String> = imports.iter().map(|i| format!("{MODULE}/{i}")).collect();
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let mut file = package_file(&format!("{name}/{name}.go"), &format!("{MODULE}/{name}"), &refs);
    file.decls = vec![func_decl("New", vec![]).into()];
    file
}

pub fn config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.graph.module_path = Some(MODULE.to_string());
    config
}

pub fn run(inputs: Vec<Result<SourceFile, ParseFailure>>) -> AnalysisOutcome {
    AnalysisSession::new(config())
        .expect("default config is valid")
        .analyze(inputs)
}

pub fn report(files: Vec<SourceFile>) -> AnalysisReport {
    run(files.into_iter().map(Ok).collect())
        .into_report()
        .expect("session was not cancelled")
}

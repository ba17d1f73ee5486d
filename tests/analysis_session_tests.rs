mod common;

use gomap::ast::{Field, ParseFailure, TypeExpr};
use gomap::config::ParallelConfig;
use gomap::testkit::*;
use gomap::{AnalysisConfig, AnalysisOutcome, AnalysisSession, Error, PatternKind};
use pretty_assertions::assert_eq;

fn synthetic_inputs(count: usize) -> Vec<Result<gomap::SourceFile, ParseFailure>> {
    (0..count)
        .map(|i| {
            let mut file = common::worker_pool_file();
            file.path = format!("pool/pool_{i:03}.go").into();
            Ok(file)
        })
        .collect()
}

fn session(parallel: ParallelConfig) -> AnalysisSession {
    AnalysisSession::new(AnalysisConfig {
        parallel,
        ..common::config()
    })
    .unwrap()
}

#[test]
fn test_worker_pool_report() {
    let report = common::report(vec![common::worker_pool_file()]);

    assert_eq!(report.files.len(), 1);
    let file = &report.files[0];
    assert_eq!(file.package, format!("{}/pool", common::MODULE));
    assert_eq!(
        (file.lines.total, file.lines.code, file.lines.comment, file.lines.blank),
        (20, 15, 3, 2)
    );

    let run = &file.functions[0];
    assert_eq!(run.name, "Run");
    assert_eq!(run.line, 6);
    assert_eq!(run.lines.total, 15);
    assert_eq!(run.lines.comment, 2);
    assert_eq!(run.complexity.cyclomatic, 2);
    assert_eq!(run.complexity.nesting_depth, 1);
    assert_eq!(run.signature.parameter_count, 1);
    assert_eq!(run.signature_complexity, 0.5);

    let worker_pool = report
        .patterns()
        .find(|p| p.kind() == PatternKind::WorkerPool)
        .unwrap();
    assert_eq!(worker_pool.confidence(), 1.0);
    assert_eq!(worker_pool.line(), 10);

    assert_eq!(report.summary.total_functions, 1);
    assert_eq!(report.summary.lines, file.lines);
    assert_eq!(report.dependencies.packages[0].name, "pool");
    assert!(report.failures.is_empty());
}

#[test]
fn test_straight_line_function_has_unit_cyclomatic() {
    let file = source_file(
        "main.go",
        "main",
        vec![func_decl(
            "main",
            vec![
                assign("x", int(1)),
                expr_stmt(call("fmt.Println", vec![ident("x")])),
            ],
        )
        .into()],
    );
    let report = common::report(vec![file]);
    let main = &report.files[0].functions[0];
    assert_eq!(main.complexity.cyclomatic, 1);
    assert_eq!(main.complexity.nesting_depth, 0);
}

#[test]
fn test_sibling_branches_report_deepest_nesting() {
    let body = vec![
        if_stmt(ident("a"), vec![if_stmt(ident("b"), vec![ret()])]),
        if_stmt(ident("c"), vec![if_stmt(ident("d"), vec![ret()])]),
    ];
    let file = source_file("check.go", "check", vec![func_decl("check", body).into()]);
    let report = common::report(vec![file]);
    let check = &report.files[0].functions[0];
    assert_eq!(check.complexity.nesting_depth, 2);
    assert_eq!(check.complexity.cyclomatic, 5);
}

#[test]
fn test_signature_complexity() {
    let mut func = func_decl("Map", vec![]);
    func.params = vec![
        param("items", TypeExpr::Slice(Box::new(ty("T")))),
        param("fn", ty("Mapper")),
    ];
    func.results = vec![Field::unnamed(ty("error"))];
    func.type_params = vec![param("T", ty("any"))];
    let file = source_file("map.go", "mapper", vec![func.into()]);

    let report = common::report(vec![file]);
    let map = &report.files[0].functions[0];
    assert!((map.signature_complexity - 2.8).abs() < 1e-9);
}

#[test]
fn test_reports_are_identical_across_runs() {
    let first = session(ParallelConfig::default())
        .analyze(synthetic_inputs(25))
        .into_report()
        .unwrap();
    let second = session(ParallelConfig::default())
        .analyze(synthetic_inputs(25))
        .into_report()
        .unwrap();

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_parallel_matches_sequential() {
    let parallel = session(ParallelConfig {
        enabled: true,
        max_concurrency: Some(4),
        batch_size: Some(7),
    })
    .analyze(synthetic_inputs(30));
    let sequential = session(ParallelConfig::sequential()).analyze(synthetic_inputs(30));

    assert_eq!(parallel, sequential);
    let report = parallel.report().unwrap();
    assert_eq!(report.files.len(), 30);
    assert_eq!(report.summary.total_functions, 30);
    assert_eq!(report.dependencies.packages[0].files.len(), 30);
}

#[test]
fn test_parse_failures_do_not_stop_the_session() {
    let mut inputs = synthetic_inputs(2);
    inputs.insert(
        1,
        Err(ParseFailure {
            path: "pool/broken.go".into(),
            line: None,
            message: "unexpected EOF".to_string(),
        }),
    );

    let report = common::run(inputs).into_report().unwrap();
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path.to_str(), Some("pool/broken.go"));
    assert!(report.failures[0].message.contains("unexpected EOF"));
}

#[test]
fn test_cancelled_session_returns_no_partial_report() {
    let session = session(ParallelConfig::default());
    let token = session.cancellation_token();
    token.cancel();
    assert!(token.is_cancelled());

    let outcome = session.analyze(synthetic_inputs(10));
    assert_eq!(outcome, AnalysisOutcome::Cancelled { files_processed: 0 });
    assert!(outcome.is_cancelled());
    assert!(outcome.report().is_none());
    assert!(matches!(
        outcome.into_report(),
        Err(Error::Cancelled { files_processed: 0 })
    ));
}

#[test]
fn test_empty_input() {
    let report = common::run(Vec::new()).into_report().unwrap();
    assert!(report.files.is_empty());
    assert!(report.dependencies.packages.is_empty());
    assert_eq!(report.summary.total_functions, 0);
    assert_eq!(report.summary.average_cyclomatic, 0.0);
}

//! Per-file analysis and the cross-file complexity summary.

use crate::ast::{Decl, FuncDecl, SourceFile};
use crate::complexity::{
    average_complexity, extract_signature, max_complexity, score_function, ComplexityCalculator,
};
use crate::concurrency::collect_facts;
use crate::config::AnalysisConfig;
use crate::core::{ComplexitySummary, FileAnalysis, FunctionReport, LineMetrics};
use crate::errors::{Error, Result, ResultExt};
use crate::metrics::LocCounter;
use crate::patterns::PatternDetector;

/// Analyze one parsed file.
///
/// Unusable declarations are skipped and listed in
/// [`FileAnalysis::skipped`]; the rest of the file is still analyzed.
pub fn analyze_file(
    file: &SourceFile,
    config: &AnalysisConfig,
    detector: &PatternDetector,
) -> FileAnalysis {
    let counter = LocCounter::new();
    let mut functions = Vec::new();
    let mut skipped = Vec::new();

    for decl in &file.decls {
        match decl {
            Decl::Func(func) => match function_report(file, func, &counter)
                .context(file.path.display().to_string())
            {
                Ok(report) => functions.push(report),
                Err(e) => {
                    log::warn!("Skipping function: {}", e);
                    skipped.push(e.to_string());
                }
            },
            Decl::Bad { line, reason } => {
                log::warn!(
                    "Skipping unparseable declaration at {}:{}: {}",
                    file.path.display(),
                    line,
                    reason
                );
                skipped.push(format!("line {line}: {reason}"));
            }
            Decl::Gen(_) => {}
        }
    }

    let facts = collect_facts(file, &config.facts);
    let patterns = detector.detect(&file.path, &facts);

    FileAnalysis {
        path: file.path.clone(),
        package: file.package_key().to_string(),
        lines: counter.count_content(&file.source),
        functions,
        facts,
        patterns,
        skipped,
    }
}

fn function_report(
    file: &SourceFile,
    func: &FuncDecl,
    counter: &LocCounter,
) -> Result<FunctionReport> {
    let span = func.span;
    if !span.is_well_formed() {
        return Err(Error::Analysis(format!(
            "function {} has malformed span {}..{}",
            func.qualified_name(),
            span.start_line,
            span.end_line
        )));
    }

    let signature = extract_signature(func);
    Ok(FunctionReport {
        name: func.name.clone(),
        receiver: func.receiver_type_name(),
        file: file.path.clone(),
        line: span.start_line,
        lines: counter.count_range(&file.source, span.start_line, span.end_line),
        complexity: score_function(func),
        signature_complexity: signature.signature_complexity(),
        signature,
    })
}

/// Aggregate complexity figures over every analyzed function.
pub fn summarize(files: &[FileAnalysis], calculator: &ComplexityCalculator) -> ComplexitySummary {
    let functions: Vec<&FunctionReport> = files.iter().flat_map(|f| &f.functions).collect();
    let cyclomatic: Vec<u32> = functions.iter().map(|f| f.complexity.cyclomatic).collect();

    ComplexitySummary {
        total_functions: functions.len(),
        average_cyclomatic: average_complexity(&cyclomatic),
        max_cyclomatic: max_complexity(&cyclomatic),
        max_nesting_depth: functions
            .iter()
            .map(|f| f.complexity.nesting_depth)
            .max()
            .unwrap_or(0),
        high_complexity_count: functions
            .iter()
            .filter(|f| calculator.is_complex(f))
            .count(),
        lines: files
            .iter()
            .fold(LineMetrics::default(), |acc, file| acc + file.lines),
    }
}

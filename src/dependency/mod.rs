//! Package dependency graph.
//!
//! [`DependencyGraphBuilder`] accumulates one file at a time and is consumed
//! by [`DependencyGraphBuilder::generate_report`], which scores every package
//! and runs cycle detection over the finished graph.

pub mod circular;
pub mod imports;
pub mod scoring;

pub use circular::DependencyGraph;
pub use imports::{ImportClassifier, ImportKind};
pub use scoring::{cohesion_score, coupling_score};

use crate::ast::SourceFile;
use crate::config::GraphConfig;
use crate::core::{DependencyReport, PackageNode};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Default)]
struct PackageAccumulator {
    files: Vec<PathBuf>,
    dependencies: BTreeSet<String>,
    function_count: usize,
    type_count: usize,
    line_count: usize,
}

#[derive(Debug)]
pub struct DependencyGraphBuilder {
    classifier: ImportClassifier,
    config: GraphConfig,
    packages: BTreeMap<String, PackageAccumulator>,
}

impl DependencyGraphBuilder {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            classifier: ImportClassifier::new(config.module_path.clone()),
            config: config.clone(),
            packages: BTreeMap::new(),
        }
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Merge one file into its package.
    pub fn analyze_file(&mut self, file: &SourceFile) {
        let package = self.classifier.package_key(file.package_key());

        let internal: Vec<String> = file
            .imports
            .iter()
            .filter(|import| self.classifier.classify(&import.path) == ImportKind::Internal)
            .map(|import| self.classifier.package_key(&import.path))
            .filter(|dep| *dep != package)
            .collect();

        let entry = self.packages.entry(package).or_default();
        entry.files.push(file.path.clone());
        entry.dependencies.extend(internal);
        entry.function_count += file.functions().count();
        entry.type_count += file.type_count();
        entry.line_count += file.line_count();
    }

    pub fn generate_report(self) -> DependencyReport {
        let mut graph = DependencyGraph::new();
        for (name, package) in &self.packages {
            graph.add_module(name.as_str());
            for dep in &package.dependencies {
                graph.add_dependency(name.as_str(), dep.as_str());
            }
        }

        let cycles = graph.detect_circular_dependencies();
        if !cycles.is_empty() {
            log::info!("Found {} circular package dependencies", cycles.len());
        }

        let packages = self
            .packages
            .iter()
            .map(|(name, package)| {
                let mut files = package.files.clone();
                files.sort();
                PackageNode {
                    name: name.clone(),
                    cohesion_score: cohesion_score(
                        package.function_count,
                        package.type_count,
                        files.len(),
                        self.config.baseline_elements_per_file,
                    ),
                    coupling_score: coupling_score(
                        package.dependencies.len(),
                        self.config.baseline_dependencies,
                    ),
                    files,
                    internal_dependencies: package.dependencies.clone(),
                    dependents: graph
                        .dependents(name)
                        .into_iter()
                        .filter(|dependent| self.packages.contains_key(dependent))
                        .collect(),
                    function_count: package.function_count,
                    type_count: package.type_count,
                    line_count: package.line_count,
                }
            })
            .collect();

        DependencyReport { packages, cycles }
    }
}

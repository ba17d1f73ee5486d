use crate::core::CircularDependency;
use std::collections::{BTreeMap, BTreeSet};

/// Package import graph used for cycle detection.
///
/// Ordered maps keep traversal, and therefore the reported cycles, stable
/// across runs.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: impl Into<String>) {
        self.adjacency.entry(module.into()).or_default();
    }

    /// Add an edge. Self-loops are ignored.
    pub fn add_dependency(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        if from == to {
            self.add_module(from);
            return;
        }
        self.add_module(to.clone());
        self.adjacency.entry(from).or_default().insert(to);
    }

    pub fn module_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    pub fn dependencies(&self, module: &str) -> Option<&BTreeSet<String>> {
        self.adjacency.get(module)
    }

    /// Modules with an edge into `module`.
    pub fn dependents(&self, module: &str) -> BTreeSet<String> {
        self.adjacency
            .iter()
            .filter(|(_, deps)| deps.contains(module))
            .map(|(other, _)| other.clone())
            .collect()
    }

    /// Detect cycles with a DFS from every unvisited module.
    ///
    /// Each DFS stops at the first back edge it finds, and a cycle already
    /// reported from another starting point (a rotation of the same path) is
    /// not reported again.
    pub fn detect_circular_dependencies(&self) -> Vec<CircularDependency> {
        let mut visited = BTreeSet::new();
        let mut seen = BTreeSet::new();
        let mut cycles = Vec::new();

        for module in self.adjacency.keys() {
            if visited.contains(module.as_str()) {
                continue;
            }
            let mut on_stack = BTreeSet::new();
            let mut path = Vec::new();
            if let Some(cycle) = self.dfs_detect_cycle(module, &mut visited, &mut on_stack, &mut path)
            {
                if seen.insert(canonical_rotation(&cycle)) {
                    cycles.push(CircularDependency::new(cycle));
                }
            }
        }

        cycles
    }

    fn dfs_detect_cycle<'a>(
        &'a self,
        module: &'a str,
        visited: &mut BTreeSet<&'a str>,
        on_stack: &mut BTreeSet<&'a str>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        visited.insert(module);
        on_stack.insert(module);
        path.push(module);

        if let Some(deps) = self.adjacency.get(module) {
            for dep in deps {
                let dep = dep.as_str();
                if on_stack.contains(dep) {
                    let start = path.iter().position(|m| *m == dep).unwrap_or(0);
                    return Some(path[start..].iter().map(|m| m.to_string()).collect());
                }
                if !visited.contains(dep) {
                    if let Some(cycle) = self.dfs_detect_cycle(dep, visited, on_stack, path) {
                        return Some(cycle);
                    }
                }
            }
        }

        path.pop();
        on_stack.remove(module);
        None
    }
}

/// The rotation of `cycle` starting at its smallest element.
fn canonical_rotation(cycle: &[String]) -> Vec<String> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0);
    cycle[start..]
        .iter()
        .chain(&cycle[..start])
        .cloned()
        .collect()
}

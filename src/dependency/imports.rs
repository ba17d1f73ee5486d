use serde::{Deserialize, Serialize};

/// Hosts whose paths are third-party modules when no module path is known.
const HOSTING_PREFIXES: &[&str] = &[
    "github.com/",
    "gitlab.com/",
    "bitbucket.org/",
    "golang.org/x/",
    "google.golang.org/",
    "gopkg.in/",
    "go.uber.org/",
    "k8s.io/",
    "sigs.k8s.io/",
    "cloud.google.com/",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    Standard,
    Internal,
    External,
}

#[derive(Debug, Clone, Default)]
pub struct ImportClassifier {
    module_path: Option<String>,
}

impl ImportClassifier {
    pub fn new(module_path: Option<String>) -> Self {
        let module_path = module_path
            .map(|m| m.trim_end_matches('/').to_string())
            .filter(|m| !m.is_empty());
        Self { module_path }
    }

    /// ```rust
    /// use gomap::dependency::{ImportClassifier, ImportKind};
    ///
    /// let classifier = ImportClassifier::new(Some("example.com/shop".into()));
    /// assert_eq!(classifier.classify("net/http"), ImportKind::Standard);
    /// assert_eq!(classifier.classify("example.com/shop/cart"), ImportKind::Internal);
    /// assert_eq!(classifier.classify("github.com/pkg/errors"), ImportKind::External);
    /// ```
    pub fn classify(&self, path: &str) -> ImportKind {
        if let Some(module) = &self.module_path {
            if is_under(path, module) {
                return ImportKind::Internal;
            }
        }

        let first_segment = path.split('/').next().unwrap_or(path);
        if path == "C" || !first_segment.contains('.') {
            return ImportKind::Standard;
        }

        match &self.module_path {
            Some(_) => ImportKind::External,
            None if HOSTING_PREFIXES.iter().any(|p| path.starts_with(p)) => ImportKind::External,
            None => ImportKind::Internal,
        }
    }

    /// Graph key for a package import path: the path relative to the module
    /// root, or the path itself outside the module.
    pub fn package_key(&self, path: &str) -> String {
        match &self.module_path {
            Some(module) if path != module => path
                .strip_prefix(module.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(path)
                .to_string(),
            _ => path.to_string(),
        }
    }
}

fn is_under(path: &str, module: &str) -> bool {
    path == module
        || path
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_paths() {
        let classifier = ImportClassifier::default();
        assert_eq!(classifier.classify("fmt"), ImportKind::Standard);
        assert_eq!(classifier.classify("sync/atomic"), ImportKind::Standard);
        assert_eq!(classifier.classify("C"), ImportKind::Standard);
    }

    #[test]
    fn test_dotless_module_is_internal() {
        let classifier = ImportClassifier::new(Some("shop".into()));
        assert_eq!(classifier.classify("shop/cart"), ImportKind::Internal);
        assert_eq!(classifier.classify("shopping/cart"), ImportKind::Standard);
    }

    #[test]
    fn test_without_module_path() {
        let classifier = ImportClassifier::default();
        assert_eq!(
            classifier.classify("github.com/acme/lib"),
            ImportKind::External
        );
        assert_eq!(
            classifier.classify("example.com/app/store"),
            ImportKind::Internal
        );
    }

    #[test]
    fn test_package_key_strips_module_prefix() {
        let classifier = ImportClassifier::new(Some("example.com/app/".into()));
        assert_eq!(classifier.package_key("example.com/app/store"), "store");
        assert_eq!(
            classifier.package_key("example.com/app/internal/db"),
            "internal/db"
        );
        assert_eq!(classifier.package_key("example.com/app"), "example.com/app");
        assert_eq!(classifier.package_key("fmt"), "fmt");
    }
}

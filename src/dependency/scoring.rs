//! Package cohesion and coupling scores, both on a 0-10 scale.

const MAX_SCORE: f64 = 10.0;

/// Declarations per file relative to `baseline_elements_per_file`.
pub fn cohesion_score(
    function_count: usize,
    type_count: usize,
    file_count: usize,
    baseline_elements_per_file: f64,
) -> f64 {
    if file_count == 0 || baseline_elements_per_file <= 0.0 {
        return 0.0;
    }
    let per_file = (function_count + type_count) as f64 / file_count as f64;
    (per_file / baseline_elements_per_file * MAX_SCORE).min(MAX_SCORE)
}

/// Internal dependency count relative to `baseline_dependencies`.
pub fn coupling_score(dependency_count: usize, baseline_dependencies: f64) -> f64 {
    if baseline_dependencies <= 0.0 {
        return 0.0;
    }
    (dependency_count as f64 / baseline_dependencies * MAX_SCORE).min(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cohesion() {
        assert_eq!(cohesion_score(5, 0, 1, 5.0), 10.0);
        assert_eq!(cohesion_score(4, 1, 2, 5.0), 5.0);
        assert_eq!(cohesion_score(40, 10, 1, 5.0), 10.0);
        assert_eq!(cohesion_score(3, 0, 0, 5.0), 0.0);
    }

    #[test]
    fn test_coupling() {
        assert_eq!(coupling_score(0, 10.0), 0.0);
        assert_eq!(coupling_score(5, 10.0), 5.0);
        assert_eq!(coupling_score(25, 10.0), 10.0);
    }
}

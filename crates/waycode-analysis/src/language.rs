//! File extension based language detection and coarse complexity metrics.

use std::path::Path;

/// Extension → language label table.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("jsx", "javascript"),
    ("tsx", "typescript"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("go", "go"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("php", "php"),
    ("cs", "csharp"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("scala", "scala"),
    ("html", "html"),
    ("css", "css"),
    ("sql", "sql"),
    ("sh", "bash"),
];

/// Map a file path to a language label by extension. Unknown or missing
/// extensions yield `"unknown"`.
pub fn detect_language(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return "unknown";
    };
    let ext = ext.to_ascii_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
        .unwrap_or("unknown")
}

/// Coarse, language-agnostic complexity metrics for a piece of code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityReport {
    pub total_lines: usize,
    pub code_lines: usize,
    pub max_nesting: usize,
    pub function_count: usize,
}

/// Compute coarse complexity metrics: line counts, brace/paren nesting
/// depth, and a naive function count.
pub fn complexity(code: &str) -> ComplexityReport {
    let total_lines = code.lines().count();
    let code_lines = code.lines().filter(|l| !l.trim().is_empty()).count();

    let mut max_nesting = 0usize;
    let mut current = 0usize;
    for ch in code.chars() {
        match ch {
            '{' | '(' => {
                current += 1;
                max_nesting = max_nesting.max(current);
            }
            '}' | ')' => current = current.saturating_sub(1),
            _ => {}
        }
    }

    let function_count =
        count_occurrences(code, "def ") + count_occurrences(code, "function ") + count_occurrences(code, "fn ");

    ComplexityReport {
        total_lines,
        code_lines,
        max_nesting,
        function_count,
    }
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_known_extensions() {
        assert_eq!(detect_language(&PathBuf::from("app.tsx")), "typescript");
        assert_eq!(detect_language(&PathBuf::from("main.rs")), "rust");
        assert_eq!(detect_language(&PathBuf::from("script.PY")), "python");
    }

    #[test]
    fn test_detect_unknown_extension() {
        assert_eq!(detect_language(&PathBuf::from("data.unknown")), "unknown");
        assert_eq!(detect_language(&PathBuf::from("Makefile")), "unknown");
    }

    #[test]
    fn test_complexity_counts() {
        let code = "def outer():\n    if (a and (b or c)):\n        pass\n\ndef inner():\n    pass\n";
        let report = complexity(code);
        assert_eq!(report.total_lines, 6);
        assert_eq!(report.code_lines, 5);
        assert_eq!(report.max_nesting, 2);
        assert_eq!(report.function_count, 2);
    }

    #[test]
    fn test_complexity_empty() {
        let report = complexity("");
        assert_eq!(report.total_lines, 0);
        assert_eq!(report.code_lines, 0);
        assert_eq!(report.max_nesting, 0);
        assert_eq!(report.function_count, 0);
    }

    #[test]
    fn test_unbalanced_close_does_not_underflow() {
        let report = complexity("}}}{");
        assert_eq!(report.max_nesting, 1);
    }
}

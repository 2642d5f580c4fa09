//! Textual pattern heuristics as an explicit rule table.
//!
//! These are coarse substring checks, not parsing. False positives and
//! negatives are acceptable; new heuristics are added by extending the
//! table, not by editing control flow.

/// A named heuristic over (code, language label).
pub struct PatternRule {
    pub name: &'static str,
    pub applies: fn(code: &str, language: &str) -> bool,
}

fn is_js_like(language: &str) -> bool {
    matches!(language, "javascript" | "typescript")
}

fn prefers_async_await(code: &str, _language: &str) -> bool {
    code.contains("async") && code.contains("await")
}

fn prefers_functional_components(code: &str, language: &str) -> bool {
    is_js_like(language) && code.contains("const ") && code.contains("=>")
}

fn uses_class_components(code: &str, language: &str) -> bool {
    is_js_like(language) && code.contains("class ") && code.contains("extends")
}

fn modern_js_syntax(code: &str, _language: &str) -> bool {
    code.contains("const ") || code.contains("let ")
}

pub const PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        name: "prefers_async_await",
        applies: prefers_async_await,
    },
    PatternRule {
        name: "prefers_functional_components",
        applies: prefers_functional_components,
    },
    PatternRule {
        name: "uses_class_components",
        applies: uses_class_components,
    },
    PatternRule {
        name: "modern_js_syntax",
        applies: modern_js_syntax,
    },
];

/// Names of all rules that match the given code.
pub fn detect_patterns(code: &str, language: &str) -> Vec<&'static str> {
    PATTERN_RULES
        .iter()
        .filter(|rule| (rule.applies)(code, language))
        .map(|rule| rule.name)
        .collect()
}

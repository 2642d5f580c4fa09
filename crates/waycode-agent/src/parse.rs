//! Parsing of the model's free-text refactor response.
//!
//! The output format is a soft contract: an explanation plus one fenced
//! code block. Parsing is positional (first closed fence pair), not
//! structured.

/// A successfully parsed refactor response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRefactor {
    pub code: String,
    pub explanation: String,
}

/// Extract the first closed fenced code block as the refactored code;
/// everything outside fences is the explanation. Returns None when the
/// response contains no closed, non-empty code block.
pub fn parse_refactored(response: &str) -> Option<ParsedRefactor> {
    let mut in_code = false;
    let mut code_done = false;
    let mut code_lines: Vec<&str> = Vec::new();
    let mut explanation_lines: Vec<&str> = Vec::new();

    for line in response.lines() {
        if line.trim_start().starts_with("```") {
            if in_code {
                in_code = false;
                code_done = true;
            } else {
                in_code = true;
            }
            continue;
        }

        if in_code {
            if !code_done {
                code_lines.push(line);
            }
        } else {
            explanation_lines.push(line);
        }
    }

    if !code_done || code_lines.is_empty() {
        return None;
    }

    Some(ParsedRefactor {
        code: code_lines.join("\n"),
        explanation: explanation_lines.join("\n").trim().to_string(),
    })
}

//! Unified diff rendering and patch application.

use similar::TextDiff;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Malformed hunk header: {0}")]
    MalformedHunk(String),
    #[error("Unrecognized patch line: {0}")]
    UnrecognizedLine(String),
    #[error("Patch context does not match original at line {line}")]
    ContextMismatch { line: usize },
}

/// Render a unified diff between two code strings. Equal inputs yield an
/// empty string.
pub fn unified_diff(original: &str, refactored: &str) -> String {
    if original == refactored {
        return String::new();
    }
    TextDiff::from_lines(original, refactored)
        .unified_diff()
        .context_radius(3)
        .header("original", "refactored")
        .to_string()
}

/// Render a fixed-width side-by-side comparison of two code strings.
pub fn side_by_side(original: &str, refactored: &str) -> String {
    let left: Vec<&str> = original.lines().collect();
    let right: Vec<&str> = refactored.lines().collect();
    let rows = left.len().max(right.len());

    let mut out = Vec::with_capacity(rows + 2);
    out.push(format!("{:<50} | {:<50}", "ORIGINAL", "REFACTORED"));
    out.push("-".repeat(103));
    for i in 0..rows {
        out.push(format!(
            "{:<50} | {:<50}",
            left.get(i).copied().unwrap_or(""),
            right.get(i).copied().unwrap_or("")
        ));
    }
    out.join("\n")
}

/// Apply a unified diff produced by [`unified_diff`] to the original text,
/// reconstructing the refactored text.
pub fn apply_patch(original: &str, patch: &str) -> Result<String, PatchError> {
    if patch.trim().is_empty() {
        return Ok(original.to_string());
    }

    let old_lines: Vec<&str> = original.lines().collect();
    let mut new_lines: Vec<String> = Vec::new();
    let mut old_idx = 0usize;
    let mut trailing_newline = true;
    let mut last_sign: Option<char> = None;

    for line in patch.lines() {
        if line.starts_with("--- ") || line.starts_with("+++ ") {
            continue;
        }
        if line.starts_with("@@") {
            let old_start = parse_hunk_old_start(line)?;
            let hunk_base = old_start.saturating_sub(1);
            if hunk_base < old_idx || hunk_base > old_lines.len() {
                return Err(PatchError::MalformedHunk(line.to_string()));
            }
            new_lines.extend(old_lines[old_idx..hunk_base].iter().map(|s| s.to_string()));
            old_idx = hunk_base;
            last_sign = None;
            continue;
        }
        match line.chars().next() {
            Some(' ') | None => {
                let expected = line.get(1..).unwrap_or("");
                let actual = old_lines
                    .get(old_idx)
                    .ok_or(PatchError::ContextMismatch { line: old_idx + 1 })?;
                if *actual != expected {
                    return Err(PatchError::ContextMismatch { line: old_idx + 1 });
                }
                new_lines.push((*actual).to_string());
                old_idx += 1;
                last_sign = Some(' ');
            }
            Some('-') => {
                let actual = old_lines
                    .get(old_idx)
                    .ok_or(PatchError::ContextMismatch { line: old_idx + 1 })?;
                if *actual != &line[1..] {
                    return Err(PatchError::ContextMismatch { line: old_idx + 1 });
                }
                old_idx += 1;
                last_sign = Some('-');
            }
            Some('+') => {
                new_lines.push(line[1..].to_string());
                last_sign = Some('+');
            }
            Some('\\') => {
                // "\ No newline at end of file", attached to the preceding line
                if matches!(last_sign, Some('+') | Some(' ')) {
                    trailing_newline = false;
                }
            }
            _ => return Err(PatchError::UnrecognizedLine(line.to_string())),
        }
    }

    let tail_copied = old_idx < old_lines.len();
    new_lines.extend(old_lines[old_idx..].iter().map(|s| s.to_string()));
    if tail_copied {
        trailing_newline = original.ends_with('\n');
    }

    let mut result = new_lines.join("\n");
    if trailing_newline && !result.is_empty() {
        result.push('\n');
    }
    Ok(result)
}

fn parse_hunk_old_start(header: &str) -> Result<usize, PatchError> {
    // "@@ -<start>[,<len>] +<start>[,<len>] @@"
    let rest = header
        .strip_prefix("@@ -")
        .ok_or_else(|| PatchError::MalformedHunk(header.to_string()))?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse()
        .map_err(|_| PatchError::MalformedHunk(header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_identical_is_empty() {
        let code = "fn main() {\n    println!(\"hi\");\n}\n";
        assert_eq!(unified_diff(code, code), "");
    }

    #[test]
    fn test_diff_round_trip() {
        let a = "line one\nline two\nline three\nline four\n";
        let b = "line one\nline 2\nline three\nline four\nline five\n";
        let patch = unified_diff(a, b);
        assert!(patch.contains("-line two"));
        assert!(patch.contains("+line 2"));
        assert_eq!(apply_patch(a, &patch).unwrap(), b);
    }

    #[test]
    fn test_round_trip_with_distant_hunks() {
        let a: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let b = a.replace("line 2\n", "changed 2\n").replace("line 28\n", "changed 28\n");
        let patch = unified_diff(&a, &b);
        assert_eq!(apply_patch(&a, &patch).unwrap(), b);
    }

    #[test]
    fn test_round_trip_from_empty() {
        let a = "";
        let b = "fresh line\n";
        let patch = unified_diff(a, b);
        assert_eq!(apply_patch(a, &patch).unwrap(), b);
    }

    #[test]
    fn test_apply_empty_patch_is_identity() {
        let a = "unchanged\n";
        assert_eq!(apply_patch(a, "").unwrap(), a);
    }

    #[test]
    fn test_apply_rejects_mismatched_context() {
        let a = "alpha\nbeta\n";
        let b = "alpha\ngamma\n";
        let patch = unified_diff(a, b);
        let err = apply_patch("totally\ndifferent\n", &patch).unwrap_err();
        assert!(matches!(err, PatchError::ContextMismatch { .. }));
    }

    #[test]
    fn test_side_by_side_pads_shorter_side() {
        let rendered = side_by_side("a\nb\n", "a\n");
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].contains("ORIGINAL"));
        assert!(lines[0].contains("REFACTORED"));
        // header + separator + two content rows
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("b"));
    }
}

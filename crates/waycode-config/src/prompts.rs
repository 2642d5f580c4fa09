//! Prompt templates for the refactor agent.

/// Template for the refactor request. Slots: memory context, language, code.
pub const REFACTOR_PROMPT_TEMPLATE: &str = r#"You are an expert code refactoring assistant with access to the latest programming best practices.

Context from project memory:
{memory_context}

Analyze this code and provide refactoring suggestions:

Language: {language}
Code:
```
{code}
```

Provide:
1. Issues found (code smells, anti-patterns, performance issues)
2. Refactored code with improvements
3. Brief explanation for each change
4. Confidence level (high/medium/low)

CRITICAL RULES FOR REFACTORED CODE:
- Write CLEAN, MINIMAL code
- Use BRIEF single-line docstrings ONLY for non-obvious functions
- NO multi-line docstrings with Args/Returns/Raises sections
- NO excessive comments
- Let code be self-documenting through clear naming and type hints
- Keep it concise and readable
- Focus on: readability, performance, modern syntax, best practices
"#;

/// Render the refactor prompt with the given memory context, language label,
/// and source code.
pub fn refactor_prompt(memory_context: &str, language: &str, code: &str) -> String {
    REFACTOR_PROMPT_TEMPLATE
        .replace("{memory_context}", memory_context)
        .replace("{language}", language)
        .replace("{code}", code)
}

// Shared prompt fragments and template-filling helpers.
// Each feature that needs oracle calls defines its own prompts.rs alongside it.

use serde::Serialize;

use crate::oracle::OracleError;

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies. \
    If you cannot produce a trustworthy answer, respond with the JSON literal null.";

/// Instruction appended to every career prompt.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the material provided. \
    Do NOT invent employers, numbers, or credentials that are not present in the input.";

/// Serializes `value` as pretty JSON for embedding in a prompt.
pub fn to_prompt_json<T: Serialize>(value: &T) -> Result<String, OracleError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Fills `{name}` placeholders in one left-to-right pass. Substituted values
/// are never rescanned, so user text containing `{job_text}` stays literal.
/// Unknown names are kept verbatim.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_prompt_json_is_pretty() {
        let rendered = to_prompt_json(&json!({"role": "SRE"})).unwrap();
        assert_eq!(rendered, "{\n  \"role\": \"SRE\"\n}");
    }

    #[test]
    fn test_json_only_system_allows_null() {
        assert!(JSON_ONLY_SYSTEM.contains("null"));
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "A: {a}\nB: {b}",
            &[("a", "literal {b} inside"), ("b", "second")],
        );
        assert_eq!(filled, "A: literal {b} inside\nB: second");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template(r#"{"title": {x}} {name}"#, &[("name", "SRE")]);
        assert_eq!(filled, r#"{"title": {x}} SRE"#);
    }
}

//! Placeholder scanning.
//!
//! A placeholder is `{name}` or `{name|param=value|…}`: the name is
//! alphanumeric/underscore, parameters are `key=value` pairs divided by
//! `|`. Anything malformed (unclosed brace, empty name, parameter without
//! `=`) is not a placeholder and stays literal in the template.

use indexmap::IndexMap;

/// One placeholder found in a message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Name between the opening brace and the first divider.
    pub name: String,
    /// The full matched pattern, braces included; substitution replaces
    /// every occurrence of this exact text.
    pub raw: String,
    /// `key=value` parameters, in order of appearance.
    pub params: IndexMap<String, String>,
}

/// Scan `template` for placeholders, first occurrence of each pattern only.
pub fn parse_placeholders(template: &str) -> Vec<Placeholder> {
    let bytes = template.as_bytes();
    let mut found: Vec<Placeholder> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }
        // Find the closing brace; a nested opening brace restarts the scan.
        let mut j = i + 1;
        let mut end = None;
        while j < bytes.len() {
            match bytes[j] {
                b'}' => {
                    end = Some(j);
                    break;
                }
                b'{' => break,
                _ => j += 1,
            }
        }
        let Some(end) = end else {
            i = j;
            continue;
        };
        if let Some(placeholder) = parse_single(&template[i..=end]) {
            if !found.iter().any(|p| p.raw == placeholder.raw) {
                found.push(placeholder);
            }
        }
        i = end + 1;
    }
    found
}

fn parse_single(raw: &str) -> Option<Placeholder> {
    let inner = &raw[1..raw.len() - 1];
    let mut parts = inner.split('|');
    let name = parts.next()?;
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    let mut params = IndexMap::new();
    for part in parts {
        let (key, value) = part.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        params.insert(key.to_string(), value.to_string());
    }
    Some(Placeholder {
        name: name.to_string(),
        raw: raw.to_string(),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_placeholder() {
        let found = parse_placeholders("value must be at least {min}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "min");
        assert_eq!(found[0].raw, "{min}");
        assert!(found[0].params.is_empty());
    }

    #[test]
    fn test_placeholder_with_params() {
        let found = parse_placeholders("{min|format=0.00|culture=invariant}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "min");
        assert_eq!(found[0].params.get("format").map(String::as_str), Some("0.00"));
        assert_eq!(
            found[0].params.get("culture").map(String::as_str),
            Some("invariant")
        );
    }

    #[test]
    fn test_multiple_and_repeated_placeholders() {
        let found = parse_placeholders("{_name} of {_path}: {_name}");
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["_name", "_path"], "repeats collapse to one entry");
    }

    #[test]
    fn test_malformed_patterns_stay_literal() {
        assert!(parse_placeholders("no braces here").is_empty());
        assert!(parse_placeholders("{unclosed").is_empty());
        assert!(parse_placeholders("{}").is_empty());
        assert!(parse_placeholders("{bad name}").is_empty());
        assert!(parse_placeholders("{name|noequals}").is_empty());
    }

    #[test]
    fn test_nested_open_brace_restarts_scan() {
        let found = parse_placeholders("{{inner}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw, "{inner}");
    }
}

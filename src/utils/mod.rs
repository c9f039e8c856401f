//! Utilities module for Campus Content
//!
//! Shared helper functions including:
//! - Text utilities for terminal output
//! - JSON scalar helpers used by the renderer

/// Text utilities
pub mod text {
    use regex::Regex;
    use std::sync::OnceLock;

    fn tag_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
    }

    /// Remove HTML tags and decode the few entities the backend emits
    pub fn strip_tags(s: &str) -> String {
        let stripped = tag_regex().replace_all(s, " ");
        let decoded = stripped
            .replace("&nbsp;", " ")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&");
        collapse_whitespace(&decoded)
    }

    /// Collapse runs of whitespace into single spaces
    pub fn collapse_whitespace(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Truncate to `max_chars` characters with ellipsis
    pub fn truncate(s: &str, max_chars: usize) -> String {
        if s.chars().count() <= max_chars {
            s.to_string()
        } else if max_chars <= 3 {
            "...".to_string()
        } else {
            let kept: String = s.chars().take(max_chars - 3).collect();
            format!("{}...", kept.trim_end())
        }
    }

    /// Display width in characters
    pub fn width(s: &str) -> usize {
        s.chars().count()
    }
}

/// JSON helpers
pub mod json {
    use serde_json::Value;

    /// Text form of a scalar; `None` for null, arrays and objects
    pub fn scalar_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => {
                let s = super::text::strip_tags(s);
                (!s.is_empty()).then_some(s)
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Text of a named field
    pub fn field_text(record: &Value, key: &str) -> Option<String> {
        record.get(key).and_then(scalar_text)
    }

    /// Integer value of a field stored as number or numeric string
    pub fn field_i64(record: &Value, key: &str) -> Option<i64> {
        match record.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

//! Placeholder substitution and HTML-to-text conversion.
//!
//! Templates may be authored with `{{key}}`, `[[key]]`, or `{key}`. They are
//! normalised to the canonical `{{key}}` form before substitution, so the
//! substitution step only understands one syntax.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use super::variables::KNOWN_VARIABLES;

/// Flat variable map handed to the renderer.
pub type Variables = BTreeMap<String, String>;

static AUTHORED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{\{\s*([A-Za-z][A-Za-z0-9_.]*)\s*\}\}|\[\[\s*([A-Za-z][A-Za-z0-9_.]*)\s*\]\]|\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}",
    )
    .expect("Is a valid regex")
});

static CANONICAL_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_.]*)\s*\}\}").expect("Is a valid regex")
});

static DELIMITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^{}]*)\}\}|\[\[([^\[\]]*)\]\]").expect("Is a valid regex")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.]*$").expect("Is a valid regex"));

static STYLE_OR_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style[^>]*>.*?</style>|<script[^>]*>.*?</script>|<head[^>]*>.*?</head>")
        .expect("Is a valid regex")
});

static LINE_BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|tr|h[1-6]|li|table|ul|ol)>").expect("Is a valid regex")
});

static CELL_END_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</t[dh]>").expect("Is a valid regex"));

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("Is a valid regex"));

/// Rewrite every supported placeholder syntax to `{{key}}`.
///
/// A single-brace match is left alone when it is half of a double brace,
/// so `{{key}` and `{key}}` are not rewritten.
pub fn normalize(template: &str) -> String {
    AUTHORED_PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            if let Some(key) = caps.get(1).or_else(|| caps.get(2)) {
                return format!("{{{{{}}}}}", key.as_str());
            }
            let Some(key) = caps.get(3) else {
                return whole.to_string();
            };
            let (start, end) = caps
                .get(0)
                .map(|m| (m.start(), m.end()))
                .unwrap_or_default();
            let before = template[..start].ends_with('{');
            let after = template[end..].starts_with('}');
            if before || after {
                whole.to_string()
            } else {
                format!("{{{{{}}}}}", key.as_str())
            }
        })
        .into_owned()
}

/// Substitute variables into a template.
///
/// Missing keys render as empty strings. When `escape_html` is set, values
/// are HTML-escaped unless their key ends in `_html`.
pub fn render(template: &str, variables: &Variables, escape_html: bool) -> String {
    let normalized = normalize(template);
    CANONICAL_PLACEHOLDER
        .replace_all(&normalized, |caps: &Captures<'_>| {
            let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            match variables.get(key) {
                Some(value) if escape_html && !key.ends_with("_html") => escape(value),
                Some(value) => value.clone(),
                None => String::new(),
            }
        })
        .into_owned()
}

/// Escape text for inclusion in HTML.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Derive a plaintext body from rendered HTML.
pub fn html_to_text(html: &str) -> String {
    let text = STYLE_OR_SCRIPT.replace_all(html, "");
    let text = LINE_BREAK_TAG.replace_all(&text, "\n");
    let text = CELL_END_TAG.replace_all(&text, " ");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Result of checking a template at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateValidation {
    /// Whether the template has no problems.
    pub valid: bool,
    /// Well-formed placeholders naming unknown variables.
    pub unknown_placeholders: Vec<String>,
    /// Placeholder-like fragments that cannot be parsed.
    pub malformed: Vec<String>,
}

/// Check every part of a template for unknown or malformed placeholders.
pub fn validate(parts: &[&str]) -> TemplateValidation {
    let mut unknown = BTreeSet::new();
    let mut malformed = Vec::new();

    for part in parts {
        for caps in DELIMITED.captures_iter(part) {
            let inner = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            if !IDENTIFIER.is_match(inner) {
                if let Some(m) = caps.get(0) {
                    malformed.push(m.as_str().to_string());
                }
            }
        }

        let stripped = DELIMITED.replace_all(part, "");
        for token in ["{{", "}}", "[[", "]]"] {
            if stripped.contains(token) {
                malformed.push(format!("unbalanced '{token}'"));
            }
        }

        let normalized = normalize(part);
        for caps in CANONICAL_PLACEHOLDER.captures_iter(&normalized) {
            if let Some(key) = caps.get(1).map(|m| m.as_str()) {
                if !KNOWN_VARIABLES.contains(&key) {
                    unknown.insert(key.to_string());
                }
            }
        }
    }

    malformed.dedup();
    TemplateValidation {
        valid: unknown.is_empty() && malformed.is_empty(),
        unknown_placeholders: unknown.into_iter().collect(),
        malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_all_syntaxes() {
        assert_eq!(
            normalize("{{ a }} [[b]] {c} {{d}"),
            "{{a}} {{b}} {{c}} {{d}"
        );
        assert_eq!(normalize("{x}}"), "{x}}");
        assert_eq!(normalize("td { color: red }"), "td { color: red }");
    }

    #[test]
    fn test_render_substitutes_each_syntax() {
        let v = vars(&[("shipment_number", "SHP-1001"), ("tenant_name", "Acme")]);
        assert_eq!(
            render("{{shipment_number}} / [[tenant_name]] / {shipment_number}", &v, false),
            "SHP-1001 / Acme / SHP-1001"
        );
    }

    #[test]
    fn test_missing_keys_render_empty_and_rerender_is_noop() {
        let template = "<p>Hi {{name}}, [[ref]] is {status}.</p>";
        let once = render(template, &Variables::new(), true);
        assert_eq!(once, "<p>Hi ,  is .</p>");
        assert_eq!(render(&once, &Variables::new(), true), once);
    }

    #[test]
    fn test_escapes_values_except_html_fragments() {
        let v = vars(&[
            ("item_description", "Chair <b>& table</b>"),
            ("items_table_html", "<table></table>"),
        ]);
        let out = render("{{item_description}}{{items_table_html}}", &v, true);
        assert_eq!(out, "Chair &lt;b&gt;&amp; table&lt;/b&gt;<table></table>");
        let raw = render("{{item_description}}", &v, false);
        assert_eq!(raw, "Chair <b>& table</b>");
    }

    #[test]
    fn test_html_to_text_strips_tags_and_styles() {
        let html = "<html><head><style>p { color: red; }</style></head><body>\
                    <h1>Shipment&nbsp;received</h1><p>Hello &amp; welcome</p>\
                    <script>alert(1)</script><table><tr><td>A</td><td>B</td></tr></table></body></html>";
        assert_eq!(html_to_text(html), "Shipment received\nHello & welcome\nA B");
    }

    #[test]
    fn test_validate_reports_unknown_and_malformed() {
        let result = validate(&["Shipment {{shipment_number}} for {{ acct name }}", "[[bogus_key]] {{tenant_name"]);
        assert!(!result.valid);
        assert_eq!(result.unknown_placeholders, vec!["bogus_key"]);
        assert!(result.malformed.contains(&"{{ acct name }}".to_string()));
        assert!(result.malformed.iter().any(|m| m.contains("{{")));

        let ok = validate(&["{{tenant_name}}: {shipment_number}"]);
        assert!(ok.valid);
    }
}

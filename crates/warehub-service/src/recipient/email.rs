//! Email address cleaning shared by every recipient tier.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@,;<>]+@[^\s@,;<>]+\.[^\s@,;<>]+$").expect("Is a valid regex")
});

/// Whether a trimmed string looks like a deliverable address.
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate.trim())
}

/// Trim, lowercase, validate, and de-duplicate addresses.
///
/// Invalid entries are dropped silently. The first occurrence wins, so the
/// output keeps the input order.
pub fn clean_emails<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .filter(|c| is_valid_email(c))
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

/// Split a comma- or semicolon-separated address list.
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Merge several address lists, keeping first-seen order and dropping duplicates.
pub fn merge(lists: &[&[String]]) -> Vec<String> {
    clean_emails(lists.iter().flat_map(|l| l.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_emails_lowercases_and_dedups() {
        let cleaned = clean_emails([
            " Ops@Acme.test ",
            "ops@acme.test",
            "not-an-email",
            "",
            "billing@acme.test",
            "OPS@ACME.TEST",
            "two@@acme.test",
            "no-dot@localhost",
        ]);
        assert_eq!(cleaned, vec!["ops@acme.test", "billing@acme.test"]);
    }

    #[test]
    fn test_clean_emails_output_is_always_normalised() {
        let inputs = [
            "A@B.CO", "a@b.co", "x y@b.co", "c@d.io", "C@D.io ", "@d.io", "e@", "f@g.h",
        ];
        let cleaned = clean_emails(inputs);
        let unique: HashSet<_> = cleaned.iter().collect();
        assert_eq!(unique.len(), cleaned.len());
        for email in &cleaned {
            assert_eq!(email, &email.to_lowercase());
            assert!(is_valid_email(email));
        }
        assert_eq!(cleaned, vec!["a@b.co", "c@d.io", "f@g.h"]);
    }

    #[test]
    fn test_split_list() {
        let parts: Vec<_> = split_list("a@x.io, b@x.io;;\n c@x.io ,").collect();
        assert_eq!(parts, vec!["a@x.io", "b@x.io", "c@x.io"]);
    }

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let internal = vec!["ops@acme.test".to_string()];
        let client = vec!["client@corp.test".to_string(), "OPS@acme.test".to_string()];
        assert_eq!(
            merge(&[&internal, &client]),
            vec!["ops@acme.test", "client@corp.test"]
        );
    }
}

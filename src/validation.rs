// Validation for engine templates
// Reports problems that would otherwise only show up as un-substituted `{...}` text

use std::fmt;

use crate::domain::{modifier::ModifierParser, PageContext, SEARCH_TERMS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintIssue {
    /// The template has a scheme other than http or https
    UnsafeScheme,
    /// A token for a known variable was found but its modifier chain does not parse
    MalformedVariable { variable: String, offset: usize },
    /// The template never references `{searchTerms}`
    MissingSearchTerms,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintIssue::UnsafeScheme => write!(f, "Only http:// and https:// URLs are allowed"),
            LintIssue::MalformedVariable { variable, offset } => write!(
                f,
                "Malformed {{{}}} at offset {}: it and the rest of the template will not be substituted",
                variable, offset
            ),
            LintIssue::MissingSearchTerms => {
                write!(f, "Template does not contain {{{}}}", SEARCH_TERMS)
            }
        }
    }
}

/// Every variable a template may reference
fn known_variables() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PageContext::VARIABLES.to_vec();
    names.push(SEARCH_TERMS);
    names
}

/// Collect all issues found in `template`
pub fn lint_template(template: &str) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    if !has_safe_scheme(template) {
        issues.push(LintIssue::UnsafeScheme);
    }

    let known = known_variables();
    for name in &known {
        if let Some(offset) = first_malformed_occurrence(template, name, &known) {
            issues.push(LintIssue::MalformedVariable {
                variable: name.to_string(),
                offset,
            });
        }
    }

    if ModifierParser::find_token(template, SEARCH_TERMS, 0).is_none() {
        issues.push(LintIssue::MissingSearchTerms);
    }

    issues
}

/// Offset of the first `{name` token that does not parse.
///
/// A `{host` token that is really a well-formed `{hostname}` is not an error for `host`.
fn first_malformed_occurrence(template: &str, name: &str, known: &[&str]) -> Option<usize> {
    let mut cursor = 0;

    while let Some(start) = ModifierParser::find_token(template, name, cursor) {
        let chain = ModifierParser::locate(template, name, start);
        if let Some(span) = chain.span {
            cursor = span.end;
            continue;
        }

        let shadowed = known.iter().any(|other| {
            other.len() > name.len()
                && other.to_ascii_lowercase().starts_with(&name.to_ascii_lowercase())
                && ModifierParser::locate(template, other, start)
                    .span
                    .is_some_and(|span| span.start == start)
        });
        if !shadowed {
            return Some(start);
        }

        // `{` is a single byte, so start + 1 is a char boundary
        cursor = start + 1;
    }

    None
}

/// Only http and https are allowed once a template names a scheme
pub fn has_safe_scheme(url: &str) -> bool {
    let url_lower = url.to_lowercase();

    if url_lower.contains("://")
        || url_lower.starts_with("javascript:")
        || url_lower.starts_with("data:")
        || url_lower.starts_with("file:")
    {
        return url_lower.starts_with("http://") || url_lower.starts_with("https://");
    }

    true
}

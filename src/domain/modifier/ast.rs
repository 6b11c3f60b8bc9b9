// Modification types produced by the modifier parser

use serde::Serialize;

/// A single text transformation parsed from a variable's modifier suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modification {
    /// `[start:end]` or `[index]`, with Python-style open and negative bounds
    Slice {
        start: Option<i64>,
        end: Option<i64>,
    },
    /// `{source|target}`
    Replacement { source: String, target: String },
    /// `{re/source/flags|target}`
    RegexReplacement {
        source: String,
        flags: String,
        target: String,
    },
    /// `{re/source/flags}`
    RegexMatch { source: String, flags: String },
    /// `(name)`
    Function { name: String },
}

impl Modification {
    pub fn slice(start: Option<i64>, end: Option<i64>) -> Self {
        Modification::Slice { start, end }
    }

    pub fn replacement(source: impl Into<String>, target: impl Into<String>) -> Self {
        Modification::Replacement {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Modification::Function { name: name.into() }
    }

    /// True for `(disableuriencoding)`, matched case-insensitively
    pub fn disables_uri_encoding(&self) -> bool {
        matches!(self, Modification::Function { name } if name.eq_ignore_ascii_case("disableuriencoding"))
    }
}

/// Byte offsets of a full `{variable...}` token inside a template.
/// `end` is exclusive and points just past the closing `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableSpan {
    pub start: usize,
    pub end: usize,
}

/// One located variable occurrence with its ordered modifications.
///
/// The default value is the "not found or malformed" sentinel: no span and no
/// modifications. A chain with a span is always syntactically complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModificationChain {
    pub span: Option<VariableSpan>,
    pub modifications: Vec<Modification>,
}

impl ModificationChain {
    pub fn new(span: VariableSpan, modifications: Vec<Modification>) -> Self {
        Self {
            span: Some(span),
            modifications,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.span.is_none()
    }

    /// Start offset, or -1 for the sentinel
    pub fn variable_start_index(&self) -> i64 {
        self.span.map_or(-1, |s| s.start as i64)
    }

    /// End offset (exclusive), or -1 for the sentinel
    pub fn variable_end_index(&self) -> i64 {
        self.span.map_or(-1, |s| s.end as i64)
    }

    pub fn disables_uri_encoding(&self) -> bool {
        self.modifications
            .iter()
            .any(Modification::disables_uri_encoding)
    }
}

// Substitution of a variable's occurrences inside a URL template

use std::sync::LazyLock;

use tracing::debug;

use super::ast::{ModificationChain, VariableSpan};
use super::functions::{encode_uri_component, FunctionRegistry};
use super::parser::ModifierParser;

static DEFAULT_SUBSTITUTER: LazyLock<Substituter> = LazyLock::new(Substituter::new);

/// Replace every occurrence of `{variable_name...}` in `url` with `raw_text`, using the
/// default function set. See [`Substituter::substitute`].
pub fn substitute(url: &str, variable_name: &str, raw_text: &str, encode: bool) -> String {
    DEFAULT_SUBSTITUTER.substitute(url, variable_name, raw_text, encode)
}

/// Substitute several variables in one pass, using the default function set.
/// See [`Substituter::substitute_all`].
pub fn substitute_all(url: &str, values: &[(&str, &str)], encode: bool) -> String {
    DEFAULT_SUBSTITUTER.substitute_all(url, values, encode)
}

/// Trim the way the browser's `String.prototype.trim` does, which also strips U+FEFF
pub fn trim_text(raw_text: &str) -> &str {
    raw_text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Applies modifier chains and splices the results back into the template
pub struct Substituter {
    functions: FunctionRegistry,
}

impl Substituter {
    pub fn new() -> Self {
        Self::with_functions(FunctionRegistry::new())
    }

    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Self { functions }
    }

    /// Substitute every occurrence of the variable, left to right.
    ///
    /// `raw_text` is trimmed once, then each occurrence runs its own modifier chain over
    /// it. With `encode`, the result is percent-encoded unless that occurrence's chain
    /// contains `(disableuriencoding)`. Scanning stops at the first malformed occurrence
    /// and everything from there on is copied verbatim.
    pub fn substitute(&self, url: &str, variable_name: &str, raw_text: &str, encode: bool) -> String {
        self.substitute_all(url, &[(variable_name, raw_text)], encode)
    }

    /// Substitute several `(name, raw_text)` variables in a single left-to-right pass.
    ///
    /// Literal segments always come from `url`, so text inserted for one variable is never
    /// scanned for another. Each variable stops at its first malformed occurrence, unless
    /// that token opens a well-formed occurrence of a longer name (`{host` in `{hostname}`).
    pub fn substitute_all(&self, url: &str, values: &[(&str, &str)], encode: bool) -> String {
        let texts: Vec<&str> = values.iter().map(|(_, raw)| trim_text(raw)).collect();
        let mut active = vec![true; values.len()];
        let mut result = String::with_capacity(url.len());
        let mut cursor = 0;

        loop {
            let mut next: Option<(usize, VariableSpan, ModificationChain)> = None;
            let mut malformed = Vec::new();

            for (index, (name, _)) in values.iter().enumerate() {
                if !active[index] {
                    continue;
                }
                let chain = ModifierParser::locate(url, name, cursor);
                let located = chain.span;
                match located {
                    Some(span) => {
                        if next.as_ref().map_or(true, |(_, best, _)| span.start < best.start) {
                            next = Some((index, span, chain));
                        }
                    }
                    None => match ModifierParser::find_token(url, name, cursor) {
                        Some(offset) => malformed.push((index, offset)),
                        None => active[index] = false,
                    },
                }
            }

            // A malformed token before the next substitution ends that variable
            let next_start = next.as_ref().map(|(_, span, _)| span.start);
            for (index, offset) in malformed {
                if next_start.map_or(true, |start| offset < start) {
                    debug!(
                        variable = values[index].0,
                        offset, "malformed occurrence, copying the rest of this variable verbatim"
                    );
                    active[index] = false;
                }
            }

            let Some((index, span, chain)) = next else {
                break;
            };
            result.push_str(&url[cursor..span.start]);
            result.push_str(&self.render(&chain, texts[index], encode));
            cursor = span.end;
        }

        result.push_str(&url[cursor..]);
        result
    }

    /// Run one occurrence's chain over the trimmed text
    pub fn render(&self, chain: &ModificationChain, text: &str, encode: bool) -> String {
        let transformed = self.apply_chain(chain, text);

        if encode && !chain.disables_uri_encoding() {
            encode_uri_component(&transformed)
        } else {
            transformed
        }
    }

    /// Thread the text through every modification in order
    pub fn apply_chain(&self, chain: &ModificationChain, text: &str) -> String {
        chain
            .modifications
            .iter()
            .fold(text.to_string(), |value, modification| {
                modification.apply(&value, &self.functions)
            })
    }
}

impl Default for Substituter {
    fn default() -> Self {
        Self::new()
    }
}

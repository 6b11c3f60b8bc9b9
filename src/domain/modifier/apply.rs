// Applying a single modification to a piece of text

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::ast::Modification;
use super::functions::FunctionRegistry;

impl Modification {
    /// Transform `text`. Never fails: an invalid regex leaves the text unchanged.
    pub fn apply(&self, text: &str, functions: &FunctionRegistry) -> String {
        match self {
            Modification::Slice { start, end } => slice_chars(text, *start, *end),
            Modification::Replacement { source, target } => {
                if source.is_empty() {
                    text.to_string()
                } else {
                    text.replace(source.as_str(), target)
                }
            }
            Modification::RegexReplacement {
                source,
                flags,
                target,
            } => match build_regex(source, flags) {
                Some(regex) => regex
                    .replace_all(text, translate_replacement(target, &regex).as_str())
                    .into_owned(),
                None => text.to_string(),
            },
            Modification::RegexMatch { source, flags } => match build_regex(source, flags) {
                Some(regex) => {
                    let matched: Vec<&str> = regex.find_iter(text).map(|m| m.as_str()).collect();
                    if matched.is_empty() {
                        text.to_string()
                    } else {
                        matched.concat()
                    }
                }
                None => text.to_string(),
            },
            Modification::Function { name } => functions.apply(name, text),
        }
    }
}

/// Python-style slice over characters. Negative bounds count from the end,
/// out-of-range bounds are clamped, and an empty or inverted range gives "".
pub fn slice_chars(text: &str, start: Option<i64>, end: Option<i64>) -> String {
    let len = text.chars().count() as i64;
    let resolve = |index: i64| {
        if index < 0 {
            (len + index).max(0)
        } else {
            index.min(len)
        }
    };

    let from = start.map_or(0, resolve);
    let to = end.map_or(len, resolve);
    if from >= to {
        return String::new();
    }

    text.chars()
        .skip(from as usize)
        .take((to - from) as usize)
        .collect()
}

/// Compile `source` with JavaScript-style flags.
///
/// `i`, `m`, `s` map to the matching regex options. `g`, `u`, `d` and `v` are accepted
/// and have no further effect (every match is always processed). Any other flag, a
/// repeated flag, or a pattern the engine rejects yields None.
fn build_regex(source: &str, flags: &str) -> Option<Regex> {
    let mut builder = RegexBuilder::new(&ascii_classes(source));
    let mut seen = String::new();

    for flag in flags.chars() {
        if seen.contains(flag) {
            debug!(source, flags, "repeated regex flag, skipping modification");
            return None;
        }
        seen.push(flag);

        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'g' | 'u' | 'd' | 'v' => {}
            _ => {
                debug!(source, flags, "unsupported regex flag, skipping modification");
                return None;
            }
        }
    }

    match builder.build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            debug!(source, error = %err, "invalid regex, skipping modification");
            None
        }
    }
}

/// Narrow `\d`, `\w` and `\b` (and their negations, except `\B`) to ASCII as in
/// JavaScript. `\s` is Unicode-aware in both dialects and stays as written.
fn ascii_classes(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars();
    let mut in_class = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('d') => out.push_str("[0-9]"),
                Some('D') => out.push_str("[^0-9]"),
                Some('w') => out.push_str("[0-9A-Za-z_]"),
                Some('W') => out.push_str("[^0-9A-Za-z_]"),
                // ASCII `\B` can split a code point, which the regex crate rejects
                Some('b') if !in_class => out.push_str("(?-u:\\b)"),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '[' => {
                in_class = true;
                out.push(ch);
            }
            ']' => {
                in_class = false;
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Rewrite a JavaScript replacement string into the `regex` crate syntax.
///
/// `$&` is the whole match, `$n`/`$nn` a numbered group, `$<name>` a named group and
/// `$$` a literal dollar. Numbered references to missing groups stay literal. `$<name>`
/// stays literal when the pattern has no named groups, and expands to nothing when it
/// has some but not that one.
fn translate_replacement(target: &str, regex: &Regex) -> String {
    let groups = regex.captures_len();
    let has_named_groups = regex.capture_names().flatten().next().is_some();
    let chars: Vec<char> = target.chars().collect();
    let mut out = String::with_capacity(target.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch != '$' {
            out.push(ch);
            i += 1;
            continue;
        }

        match chars.get(i + 1) {
            Some('$') => {
                out.push_str("$$");
                i += 2;
            }
            Some('&') => {
                out.push_str("${0}");
                i += 2;
            }
            Some('<') if has_named_groups => {
                match chars[i + 2..].iter().position(|&c| c == '>') {
                    Some(len) => {
                        let name: String = chars[i + 2..i + 2 + len].iter().collect();
                        let valid = !name.is_empty()
                            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                        if valid {
                            out.push_str(&format!("${{{}}}", name));
                        }
                        i += len + 3;
                    }
                    None => {
                        out.push_str("$$");
                        i += 1;
                    }
                }
            }
            Some(d) if d.is_ascii_digit() => {
                let first = d.to_digit(10).unwrap_or(0) as usize;
                let two_digit = chars
                    .get(i + 2)
                    .and_then(|c| c.to_digit(10))
                    .map(|second| first * 10 + second as usize)
                    .filter(|&n| n > 0 && n < groups);

                if let Some(n) = two_digit {
                    out.push_str(&format!("${{{}}}", n));
                    i += 3;
                } else if first > 0 && first < groups {
                    out.push_str(&format!("${{{}}}", first));
                    i += 2;
                } else {
                    out.push_str("$$");
                    i += 1;
                }
            }
            _ => {
                out.push_str("$$");
                i += 1;
            }
        }
    }

    out
}

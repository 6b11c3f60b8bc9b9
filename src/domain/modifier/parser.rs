// Modifier parser: locates `{variable...}` tokens and parses their modifier chain
//
// Grammar of the suffix that may follow the variable name:
//   {source|target}          literal replacement, `\` escapes the next character
//   {re/source/flags|target} regex replacement, `\/` is a literal slash
//   {re/source/flags}        regex match
//   (name)                   named function
//   [index] or [start:end]   slice
// Spaces between modifiers are ignored. Anything else makes the whole token malformed.

use std::mem;

use super::ast::{Modification, ModificationChain, VariableSpan};

/// Scanner states. Each state owns the buffers it is accumulating.
#[derive(Debug, Default)]
enum State {
    #[default]
    ExpectingModificationOrEnd,
    InReplace,
    InReplaceRegex {
        source: String,
    },
    InReplaceRegexFlags {
        source: String,
        flags: String,
    },
    InReplaceSource {
        source: String,
        escaped: bool,
    },
    InReplaceTarget {
        source: String,
        // Some(flags) when the source came from a `re/.../` block
        regex_flags: Option<String>,
        target: String,
        escaped: bool,
    },
    InFunction {
        name: String,
    },
    InRangeStart {
        start: String,
    },
    InRangeEnd {
        start: String,
        end: String,
    },
}

pub struct ModifierParser<'a> {
    input: &'a str,
    pos: usize,
    state: State,
    modifications: Vec<Modification>,
}

impl<'a> ModifierParser<'a> {
    /// Find the next `{variable_name...}` token at or after byte offset `search_from`
    /// and parse its modifiers.
    ///
    /// The name is matched case-insensitively. Returns the sentinel chain when the token
    /// is absent or its modifier suffix is malformed.
    pub fn locate(url: &'a str, variable_name: &str, search_from: usize) -> ModificationChain {
        if search_from > url.len() || !url.is_char_boundary(search_from) {
            return ModificationChain::default();
        }

        let token = format!("{{{}", variable_name);
        let Some((start, after_token)) = find_ignore_case(url, &token, search_from) else {
            return ModificationChain::default();
        };

        let mut parser = Self {
            input: url,
            pos: after_token,
            state: State::default(),
            modifications: Vec::new(),
        };

        match parser.parse_modifiers() {
            Some(end) => ModificationChain::new(VariableSpan { start, end }, parser.modifications),
            None => ModificationChain::default(),
        }
    }

    /// Byte offset of the next case-insensitive `{variable_name` at or after `search_from`,
    /// whether or not the token that follows is well-formed
    pub fn find_token(url: &str, variable_name: &str, search_from: usize) -> Option<usize> {
        if search_from > url.len() || !url.is_char_boundary(search_from) {
            return None;
        }
        let token = format!("{{{}", variable_name);
        find_ignore_case(url, &token, search_from).map(|(start, _)| start)
    }

    /// Runs the state machine until the closing `}`. Returns the offset just past it,
    /// or None if the suffix is malformed.
    fn parse_modifiers(&mut self) -> Option<usize> {
        loop {
            let ch = self.peek_char()?;

            self.state = match mem::take(&mut self.state) {
                State::ExpectingModificationOrEnd => {
                    self.pos += ch.len_utf8();
                    match ch {
                        '}' => return Some(self.pos),
                        '{' => State::InReplace,
                        '[' => State::InRangeStart {
                            start: String::new(),
                        },
                        '(' => State::InFunction {
                            name: String::new(),
                        },
                        ' ' => State::ExpectingModificationOrEnd,
                        _ => return None,
                    }
                }
                State::InReplace => {
                    if self.input[self.pos..].starts_with("re/") {
                        self.pos += 3;
                        State::InReplaceRegex {
                            source: String::new(),
                        }
                    } else {
                        // Current character belongs to the source; do not consume it here
                        State::InReplaceSource {
                            source: String::new(),
                            escaped: false,
                        }
                    }
                }
                State::InReplaceRegex { mut source } => {
                    self.pos += ch.len_utf8();
                    match ch {
                        '/' => State::InReplaceRegexFlags {
                            source,
                            flags: String::new(),
                        },
                        '\\' => {
                            let next = self.peek_char()?;
                            self.pos += next.len_utf8();
                            if next != '/' {
                                source.push('\\');
                            }
                            source.push(next);
                            State::InReplaceRegex { source }
                        }
                        _ => {
                            source.push(ch);
                            State::InReplaceRegex { source }
                        }
                    }
                }
                State::InReplaceRegexFlags { source, mut flags } => {
                    self.pos += ch.len_utf8();
                    match ch {
                        '|' => State::InReplaceTarget {
                            source,
                            regex_flags: Some(flags),
                            target: String::new(),
                            escaped: false,
                        },
                        '}' => {
                            self.modifications
                                .push(Modification::RegexMatch { source, flags });
                            State::ExpectingModificationOrEnd
                        }
                        '{' => return None,
                        _ => {
                            flags.push(ch);
                            State::InReplaceRegexFlags { source, flags }
                        }
                    }
                }
                State::InReplaceSource {
                    mut source,
                    escaped,
                } => {
                    self.pos += ch.len_utf8();
                    if escaped {
                        source.push(ch);
                        State::InReplaceSource {
                            source,
                            escaped: false,
                        }
                    } else {
                        match ch {
                            '\\' => State::InReplaceSource {
                                source,
                                escaped: true,
                            },
                            '|' => State::InReplaceTarget {
                                source,
                                regex_flags: None,
                                target: String::new(),
                                escaped: false,
                            },
                            '{' | '}' => return None,
                            _ => {
                                source.push(ch);
                                State::InReplaceSource { source, escaped }
                            }
                        }
                    }
                }
                State::InReplaceTarget {
                    source,
                    regex_flags,
                    mut target,
                    escaped,
                } => {
                    self.pos += ch.len_utf8();
                    if escaped {
                        target.push(ch);
                        State::InReplaceTarget {
                            source,
                            regex_flags,
                            target,
                            escaped: false,
                        }
                    } else {
                        match ch {
                            '\\' => State::InReplaceTarget {
                                source,
                                regex_flags,
                                target,
                                escaped: true,
                            },
                            '}' => {
                                self.modifications.push(match regex_flags {
                                    Some(flags) => Modification::RegexReplacement {
                                        source,
                                        flags,
                                        target,
                                    },
                                    None => Modification::Replacement { source, target },
                                });
                                State::ExpectingModificationOrEnd
                            }
                            '|' | '{' => return None,
                            _ => {
                                target.push(ch);
                                State::InReplaceTarget {
                                    source,
                                    regex_flags,
                                    target,
                                    escaped,
                                }
                            }
                        }
                    }
                }
                State::InFunction { mut name } => {
                    self.pos += ch.len_utf8();
                    if ch == ')' {
                        self.modifications.push(Modification::Function { name });
                        State::ExpectingModificationOrEnd
                    } else {
                        name.push(ch);
                        State::InFunction { name }
                    }
                }
                State::InRangeStart { mut start } => {
                    self.pos += ch.len_utf8();
                    match ch {
                        ']' => {
                            let index: i64 = start.parse().ok()?;
                            self.modifications
                                .push(Modification::slice(Some(index), Some(index.checked_add(1)?)));
                            State::ExpectingModificationOrEnd
                        }
                        ':' => State::InRangeEnd {
                            start,
                            end: String::new(),
                        },
                        _ => {
                            start.push(ch);
                            State::InRangeStart { start }
                        }
                    }
                }
                State::InRangeEnd { start, mut end } => {
                    self.pos += ch.len_utf8();
                    if ch == ']' {
                        let start = parse_bound(&start)?;
                        let end = parse_bound(&end)?;
                        self.modifications.push(Modification::slice(start, end));
                        State::ExpectingModificationOrEnd
                    } else {
                        end.push(ch);
                        State::InRangeEnd { start, end }
                    }
                }
            };
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }
}

/// Empty bound is open (`Some(None)`), a non-numeric bound is malformed (`None`)
fn parse_bound(raw: &str) -> Option<Option<i64>> {
    if raw.is_empty() {
        Some(None)
    } else {
        raw.parse().ok().map(Some)
    }
}

/// Case-insensitive search for `needle` in `haystack[from..]`.
/// Returns the byte offsets of the match start and of the first byte after it.
fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    haystack[from..].char_indices().find_map(|(offset, _)| {
        let start = from + offset;
        let mut rest = haystack[start..].chars();
        let mut len = 0;
        for expected in needle.chars() {
            let found = rest.next()?;
            if !chars_eq_ignore_case(found, expected) {
                return None;
            }
            len += found.len_utf8();
        }
        Some((start, start + len))
    })
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(url: &str) -> ModificationChain {
        ModifierParser::locate(url, "searchTerms", 0)
    }

    #[test]
    fn test_locate_plain_variable() {
        let chain = locate("https://example.com/?q={searchTerms}&x=1");
        assert_eq!(chain.variable_start_index(), 23);
        assert_eq!(chain.variable_end_index(), 36);
        assert!(chain.modifications.is_empty());
    }

    #[test]
    fn test_locate_not_found() {
        let chain = locate("https://example.com/?q={query}");
        assert!(chain.is_sentinel());
    }

    #[test]
    fn test_locate_is_case_insensitive() {
        let chain = locate("https://example.com/?q={SEARCHterms}");
        assert_eq!(chain.variable_start_index(), 23);
        assert_eq!(chain.variable_end_index(), 36);
    }

    #[test]
    fn test_locate_respects_search_offset() {
        let url = "{searchTerms}/{searchTerms(uppercase)}";
        let chain = ModifierParser::locate(url, "searchTerms", 1);
        assert_eq!(chain.variable_start_index(), 14);
        assert_eq!(chain.variable_end_index(), url.len() as i64);
        assert_eq!(chain.modifications, vec![Modification::function("uppercase")]);
    }

    #[test]
    fn test_locate_offset_past_end_is_sentinel() {
        assert!(ModifierParser::locate("{searchTerms}", "searchTerms", 99).is_sentinel());
    }

    #[test]
    fn test_find_token_ignores_well_formedness() {
        assert_eq!(ModifierParser::find_token("ab{searchTerms[x]}", "searchterms", 0), Some(2));
        assert_eq!(ModifierParser::find_token("ab{searchTerms}", "searchTerms", 3), None);
    }

    #[test]
    fn test_parse_replacement() {
        let chain = locate("{searchTerms{ |+}}");
        assert_eq!(chain.modifications, vec![Modification::replacement(" ", "+")]);
        assert_eq!(chain.variable_end_index(), 18);
    }

    #[test]
    fn test_parse_empty_replacement_target() {
        let chain = locate("{searchTerms{-|}}");
        assert_eq!(chain.modifications, vec![Modification::replacement("-", "")]);
    }

    #[test]
    fn test_parse_escaped_replacement() {
        let chain = locate(r"{searchTerms{\||\\}}");
        assert_eq!(chain.modifications, vec![Modification::replacement("|", "\\")]);
    }

    #[test]
    fn test_parse_escaped_braces_in_replacement() {
        let chain = locate(r"{searchTerms{\{|\}}}");
        assert_eq!(chain.modifications, vec![Modification::replacement("{", "}")]);
    }

    #[test]
    fn test_parse_regex_replacement() {
        let chain = locate(r"{searchTerms{re/\s+/g|-}}");
        assert_eq!(
            chain.modifications,
            vec![Modification::RegexReplacement {
                source: r"\s+".to_string(),
                flags: "g".to_string(),
                target: "-".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_regex_with_escaped_slash() {
        let chain = locate(r"{searchTerms{re/a\/b/|c}}");
        assert_eq!(
            chain.modifications,
            vec![Modification::RegexReplacement {
                source: "a/b".to_string(),
                flags: String::new(),
                target: "c".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_regex_match() {
        let chain = locate(r"{searchTerms{re/\d+/gi}}");
        assert_eq!(
            chain.modifications,
            vec![Modification::RegexMatch {
                source: r"\d+".to_string(),
                flags: "gi".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_function_and_slices() {
        let chain = locate("{searchTerms (uppercase) [0:5] [2] [:-1] [3:]}");
        assert_eq!(
            chain.modifications,
            vec![
                Modification::function("uppercase"),
                Modification::slice(Some(0), Some(5)),
                Modification::slice(Some(2), Some(3)),
                Modification::slice(None, Some(-1)),
                Modification::slice(Some(3), None),
            ]
        );
    }

    #[test]
    fn test_parse_preserves_order() {
        let chain = locate("{searchTerms{ |_}{_|aaa}(uppercase)}");
        assert_eq!(
            chain.modifications,
            vec![
                Modification::replacement(" ", "_"),
                Modification::replacement("_", "aaa"),
                Modification::function("uppercase"),
            ]
        );
    }

    #[test]
    fn test_malformed_inputs_return_sentinel() {
        let cases = [
            "{searchTerms",
            "{searchTerms{ |+}",
            "{searchTermsX}",
            "{searchTerms{a}}",
            "{searchTerms{a|b|c}}",
            "{searchTerms{a|{}}",
            "{searchTerms{re/a/g{}}",
            "{searchTerms{re/abc}}",
            "{searchTerms[a]}",
            "{searchTerms[]}",
            "{searchTerms[1:x]}",
            "{searchTerms[1:2}",
            "{searchTerms(uppercase}",
        ];
        for case in cases {
            let chain = locate(case);
            assert!(chain.is_sentinel(), "expected sentinel for {case}");
            assert!(chain.modifications.is_empty(), "partial chain for {case}");
        }
    }

    #[test]
    fn test_multibyte_offsets() {
        let url = "é{searchTerms{ä|ö}}ü";
        let chain = locate(url);
        let start = chain.variable_start_index() as usize;
        let end = chain.variable_end_index() as usize;
        assert_eq!(&url[start..end], "{searchTerms{ä|ö}}");
        assert_eq!(chain.modifications, vec![Modification::replacement("ä", "ö")]);
    }
}

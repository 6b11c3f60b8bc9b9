// Behavior of the modification language through the public substitution API

use selsearch::domain::modifier::{substitute, Modification, ModifierParser, Substituter};

const TEXT: &str = "a b_c_";

fn run(template: &str) -> String {
    substitute(template, "searchTerms", TEXT, false)
}

#[test]
fn test_template_without_variable_is_untouched() {
    let url = "https://example.com/?q={query}&x={other(uppercase)}";
    assert_eq!(substitute(url, "searchTerms", TEXT, true), url);
    assert_eq!(substitute(url, "searchTerms", TEXT, false), url);
}

#[test]
fn test_plain_variable_identity() {
    assert_eq!(run("{searchTerms}"), "a b_c_");
    assert_eq!(
        substitute("{searchTerms}", "searchTerms", "  a b_c_\n", true),
        "a%20b_c_"
    );
}

#[test]
fn test_end_to_end_example() {
    assert_eq!(
        run("http://a.com?q={searchTerms{ |+}{_|-}} site:{hostname}"),
        "http://a.com?q=a+b-c- site:{hostname}"
    );
}

#[test]
fn test_order_sensitivity() {
    let forward = run("{searchTerms{ |_}{_|aaa}(uppercase)}");
    assert_eq!(forward, "AAAABAAACAAA");

    let permutations = [
        "{searchTerms{ |_}(uppercase){_|aaa}}",
        "{searchTerms{_|aaa}{ |_}(uppercase)}",
        "{searchTerms{_|aaa}(uppercase){ |_}}",
        "{searchTerms(uppercase){ |_}{_|aaa}}",
        "{searchTerms(uppercase){_|aaa}{ |_}}",
    ];
    for template in permutations {
        assert_ne!(run(template), forward, "{template} should differ");
    }
}

#[test]
fn test_slice_matrix() {
    let cases = [
        ("{searchTerms[0:1]}", "a"),
        ("{searchTerms[2]}", "b"),
        ("{searchTerms[5:6]}", "_"),
        ("{searchTerms[5:7]}", "_"),
        ("{searchTerms[-2:-2]}", ""),
        ("{searchTerms[-2:]}", "c_"),
        ("{searchTerms[:2]}", "a "),
        ("{searchTerms[:]}", "a b_c_"),
        ("{searchTerms[10:]}", ""),
        ("{searchTerms[-10:2]}", "a "),
        ("{searchTerms[3:1]}", ""),
        ("{searchTerms[1:-1][1:-1]}", "b_"),
    ];
    for (template, expected) in cases {
        assert_eq!(run(template), expected, "{template}");
    }
}

#[test]
fn test_escaped_pipe_and_backslash() {
    assert_eq!(
        substitute(r"{searchTerms{\||\\}}", "searchTerms", r"a|b\c|", false),
        r"a\b\c\"
    );
}

#[test]
fn test_escaped_characters_in_target() {
    assert_eq!(
        substitute(r"{searchTerms{ |\}\|\{}}", "searchTerms", "a b", false),
        "a}|{b"
    );
}

#[test]
fn test_disable_encoding_only_for_own_occurrence() {
    let url = "https://x.com/{searchTerms(disableuriencoding)}?q={searchTerms}";
    assert_eq!(
        substitute(url, "searchTerms", "a/b c", true),
        "https://x.com/a/b c?q=a%2Fb%20c"
    );
}

#[test]
fn test_disable_encoding_name_is_case_insensitive() {
    assert_eq!(
        substitute("{searchTerms(DisableUriEncoding)}", "searchTerms", "a b", true),
        "a b"
    );
}

#[test]
fn test_encode_function_inside_chain_is_double_encoded_when_encoding() {
    assert_eq!(
        substitute("{searchTerms(encodeuricomponent)}", "searchTerms", "a b", true),
        "a%2520b"
    );
    assert_eq!(
        substitute("{searchTerms(encodeuricomponent)}", "searchTerms", "a b", false),
        "a%20b"
    );
}

#[test]
fn test_regex_failure_is_isolated() {
    assert_eq!(run("{searchTerms{re/(/g|x}(uppercase)}"), "A B_C_");
    assert_eq!(run("{searchTerms{re/[/g}{_|-}}"), "a b-c-");
}

#[test]
fn test_regex_replace_and_match() {
    assert_eq!(run(r"{searchTerms{re/[\s_]+/g|.}}"), "a.b.c.");
    assert_eq!(run(r"{searchTerms{re/[a-z]/g}}"), "abc");
    assert_eq!(run(r"{searchTerms{re/\d/g}}"), "a b_c_");
    assert_eq!(run(r"{searchTerms{re/B/gi|$&$&}}"), "a bb_c_");
}

#[test]
fn test_regex_with_escaped_slash() {
    assert_eq!(
        substitute(r"{searchTerms{re/\//g|-}}", "searchTerms", "a/b/c", false),
        "a-b-c"
    );
}

#[test]
fn test_malformed_templates_are_returned_unchanged() {
    let malformed = [
        "https://a.com/?q={searchTerms",
        "https://a.com/?q={searchTerms{ |+}",
        "https://a.com/?q={searchTerms{ }}",
        "https://a.com/?q={searchTerms[1:a]}",
        "https://a.com/?q={searchTerms[]}",
        "https://a.com/?q={searchTerms(lowercase}",
        "https://a.com/?q={searchTerms{re/a/i{}}",
        "https://a.com/?q={searchTerms{a|b|c}}",
        "https://a.com/?q={searchTerms;}",
    ];
    for url in malformed {
        assert_eq!(substitute(url, "searchTerms", TEXT, true), url);
    }
}

#[test]
fn test_malformed_occurrence_keeps_earlier_substitutions() {
    assert_eq!(
        run("{searchTerms[0]}-{searchTerms[x]}-{searchTerms[1]}"),
        "a-{searchTerms[x]}-{searchTerms[1]}"
    );
}

#[test]
fn test_variable_name_is_case_insensitive() {
    assert_eq!(substitute("{SearchTerms}", "searchterms", "x", false), "x");
}

#[test]
fn test_other_variable_names_use_the_same_engine() {
    assert_eq!(
        substitute("site:{hostname}", "hostname", "example.com", true),
        "site:example.com"
    );
    assert_eq!(
        substitute("{href(disableuriencoding)}", "href", "https://x.y/?a=b", true),
        "https://x.y/?a=b"
    );
}

#[test]
fn test_parser_reports_offsets() {
    let url = "http://a.com?q={searchTerms{ |+}} site:{hostname}";
    let chain = ModifierParser::locate(url, "searchTerms", 0);
    assert_eq!(chain.variable_start_index(), 15);
    assert_eq!(chain.variable_end_index(), 33);
    assert_eq!(chain.modifications, vec![Modification::replacement(" ", "+")]);

    let next = ModifierParser::locate(url, "searchTerms", 33);
    assert!(next.is_sentinel());
}

#[test]
fn test_substituter_instance_matches_free_function() {
    let substituter = Substituter::new();
    let template = "{searchTerms(uppercase)[0:3]}";
    assert_eq!(
        substituter.substitute(template, "searchTerms", TEXT, true),
        substitute(template, "searchTerms", TEXT, true)
    );
}

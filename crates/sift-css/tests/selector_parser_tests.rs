//! Integration tests for the selector parser.

use sift_css::parser::{CSSParserContext, CSSSelectorParser, ParserMode, parse_selector_list};
use sift_css::selector::{CSSSelector, MatchType, PseudoType, RelationType, SelectorList};
use sift_css::tokenizer::{CSSTokenizer, TokenRange};

fn parse(text: &str) -> SelectorList {
    parse_selector_list(text, &CSSParserContext::default())
}

fn an_plus_b(text: &str) -> Option<(i32, i32)> {
    let tokens = CSSTokenizer::tokenize_to_eof(text);
    let mut range = TokenRange::new(&tokens);
    CSSSelectorParser::consume_an_plus_b(&mut range)
}

#[test]
fn test_round_trip_serialization() {
    const CASES: &[(&str, &str)] = &[
        ("div", "div"),
        ("*", "*"),
        ("DIV", "div"),
        (".a", ".a"),
        ("#main", "#main"),
        ("div .a.b", "div .a.b"),
        ("div>p", "div > p"),
        ("a  +  b", "a + b"),
        ("a ~ b", "a ~ b"),
        ("ul li > a", "ul li > a"),
        ("*.a", ".a"),
        ("[attr]", "[attr]"),
        ("[ATTR=value]", "[attr=\"value\"]"),
        ("[attr~='v' i]", "[attr~=\"v\" i]"),
        ("[lang|=en]", "[lang|=\"en\"]"),
        ("[href^=http]", "[href^=\"http\"]"),
        ("[href$='.png' s]", "[href$=\".png\" s]"),
        ("[title*=\"a\\\"b\"]", "[title*=\"a\\\"b\"]"),
        (":hover", ":hover"),
        (":HOVER", ":hover"),
        (".a:focus", ".a:focus"),
        (":first-child", ":first-child"),
        (":nth-child(odd)", ":nth-child(2n+1)"),
        (":nth-child(even)", ":nth-child(2n)"),
        (":nth-child( -n + 3 )", ":nth-child(-n+3)"),
        (":nth-last-of-type(5)", ":nth-last-of-type(5)"),
        (":not(.a, .b)", ":not(.a, .b)"),
        (":is(div .a)", ":is(div .a)"),
        (":where(#x)", ":where(#x)"),
        (":lang(zh)", ":lang(zh)"),
        (":dir(rtl)", ":dir(rtl)"),
        ("a::before", "a::before"),
        (":before", "::before"),
        ("input::placeholder", "input::placeholder"),
        ("::placeholder", "::placeholder"),
        ("*::selection", "::selection"),
        ("#text::selection", "#text::selection"),
        (".\\[item\\]", ".[item]"),
        ("div, .a , #b", "div, .a, #b"),
        ("div /* comment */ .a", "div .a"),
        ("div ", "div"),
    ];
    for &(input, expected) in CASES {
        let list = parse(input);
        assert!(list.is_valid(), "{input:?} should parse");
        assert_eq!(list.selectors_text(), expected, "serializing {input:?}");
    }
}

#[test]
fn test_invalid_selectors_drop_the_whole_rule() {
    const CASES: &[&str] = &[
        "",
        "   ",
        "div,",
        ",div",
        "div >",
        "div > > p",
        ".",
        "#",
        ".a, ::before .b",
        "::before.a",
        "::before:hover",
        "[*]",
        "[*|*]",
        "[attr=]",
        "[attr==v]",
        "[attr=v x]",
        "ns|div",
        "|div",
        ":unknown-pseudo",
        "::unknown-element",
        ":unknown-function(a)",
        ":nth-child(10n + +5)",
        ":nth-child(3x)",
        ":nth-child()",
        ":not(::before)",
        ":not()",
        ":lang()",
        ":lang(en fr)",
        ":hover(1)",
        ":has(.a)",
        "::backdrop",
        ":placeholder",
        "div !",
    ];
    for &input in CASES {
        let list = parse(input);
        assert!(list.is_empty(), "{input:?} should be rejected, got {:?}", list.selectors_text());
    }
}

#[test]
fn test_attribute_namespace_prefix_is_ignored() {
    assert_eq!(parse("[ns|attr]").selectors_text(), "[attr]");
    assert_eq!(parse("[|attr=x]").selectors_text(), "[attr=\"x\"]");
}

#[test]
fn test_dash_match_is_not_a_namespace_pipe() {
    let list = parse("[lang|=en]");
    assert_eq!(list.as_slice()[0].match_type(), MatchType::AttributeHyphen);
    assert_eq!(list.as_slice()[0].attribute_name(), Some("lang"));
    assert_eq!(parse("[color|=red]").selectors_text(), "[color|=\"red\"]");
    assert_eq!(parse("[ns|lang|=en]").selectors_text(), "[lang|=\"en\"]");
    assert!(parse("[|=en]").is_empty());
}

#[test]
fn test_backdrop_is_only_allowed_in_user_agent_sheets() {
    let ua = parse_selector_list("::backdrop", &CSSParserContext::user_agent());
    assert_eq!(ua.selectors_text(), "::backdrop");
    assert_eq!(CSSParserContext::user_agent().mode, ParserMode::UserAgent);
}

#[test]
fn test_is_where_can_be_disabled() {
    let context = CSSParserContext {
        enable_is_where: false,
        ..CSSParserContext::default()
    };
    assert!(parse_selector_list(":is(.a)", &context).is_empty());
    assert!(parse_selector_list(":where(.a)", &context).is_empty());
    assert!(parse_selector_list(":not(.a)", &context).is_valid());
}

#[test]
fn test_nesting_depth_limit() {
    let context = CSSParserContext {
        max_nesting_depth: 1,
        ..CSSParserContext::default()
    };
    assert!(parse_selector_list(":not(.a)", &context).is_valid());
    assert!(parse_selector_list(":not(:is(.a))", &context).is_empty());
}

#[test]
fn test_storage_order_is_rightmost_compound_first() {
    let list = parse("div > .a:hover");
    let selectors = list.as_slice();
    assert_eq!(selectors.len(), 3);

    assert_eq!(selectors[0].match_type(), MatchType::Class);
    assert_eq!(selectors[0].relation(), RelationType::SubSelector);
    assert_eq!(selectors[1].pseudo_type(), PseudoType::Hover);
    assert_eq!(selectors[1].relation(), RelationType::Child);
    assert!(selectors[1].is_last_in_compound());
    assert_eq!(selectors[2].value(), "div");
    assert!(selectors[2].is_last_in_complex());
    assert!(selectors[2].is_last_in_selector_list());
}

#[test]
fn test_implicit_shadow_combinator() {
    let list = parse("input::placeholder");
    let selectors = list.as_slice();
    assert_eq!(selectors.len(), 2);
    assert_eq!(selectors[0].match_type(), MatchType::PseudoElement);
    assert_eq!(selectors[0].pseudo_type(), PseudoType::Placeholder);
    assert_eq!(selectors[0].relation(), RelationType::UAShadow);
    assert_eq!(selectors[1].value(), "input");

    let list = parse("::selection");
    let selectors = list.as_slice();
    assert_eq!(selectors.len(), 2);
    assert_eq!(selectors[0].pseudo_type(), PseudoType::Selection);
    assert!(selectors[1].is_universal());
    assert!(selectors[1].tag_is_implicit());

    // ::before is matched on its owner; no shadow relation is inserted.
    let list = parse("a::before");
    assert_eq!(list.len(), 2);
    assert_eq!(list.as_slice()[0].relation(), RelationType::SubSelector);
}

#[test]
fn test_alternatives_iterate_in_source_order() {
    let list = parse("div .a, #b, :hover");
    assert_eq!(list.complex_count(), 3);
    let texts: Vec<String> = list.iter().map(|selector| selector.selector_text()).collect();
    assert_eq!(texts, ["div .a", "#b", ":hover"]);
}

#[test]
fn test_an_plus_b() {
    const CASES: &[(&str, Option<(i32, i32)>)] = &[
        ("odd", Some((2, 1))),
        ("EVEN", Some((2, 0))),
        ("5", Some((0, 5))),
        ("-5", Some((0, -5))),
        ("n", Some((1, 0))),
        ("-n", Some((-1, 0))),
        ("+n", Some((1, 0))),
        ("2n", Some((2, 0))),
        ("2n+1", Some((2, 1))),
        ("2n-1", Some((2, -1))),
        ("2n + 1", Some((2, 1))),
        ("2n - 1", Some((2, -1))),
        ("-n+3", Some((-1, 3))),
        ("-2n- 3", Some((-2, -3))),
        ("3091970736n + 1", Some((i32::MAX, 1))),
        ("-3091970736n", Some((i32::MIN, 0))),
        ("10n + +5", None),
        ("10n - -5", None),
        (" odd", None),
        ("+ n", None),
        ("3x", None),
        ("n-b", None),
        ("2n +", None),
        ("1.5n", None),
        ("", None),
    ];
    for &(input, expected) in CASES {
        assert_eq!(an_plus_b(input), expected, "An+B {input:?}");
    }
}

#[test]
fn test_flattened_size_and_adopt_into_buffer() {
    let context = CSSParserContext::default();
    let vector = CSSSelectorParser::parse_selector_text("div .a, #b", &context);
    assert_eq!(vector.len(), 2);
    let size = CSSSelectorParser::flattened_size(&vector);
    assert_eq!(size, 3);

    let mut too_small = vec![CSSSelector::default(); size - 1];
    assert!(!CSSSelectorParser::adopt_selector_vector_into(vector.clone(), &mut too_small));
    assert!(too_small.iter().all(|selector| *selector == CSSSelector::default()));

    let mut buffer = vec![CSSSelector::default(); size];
    assert!(CSSSelectorParser::adopt_selector_vector_into(vector.clone(), &mut buffer));
    let from_buffer = SelectorList::from(buffer.into_boxed_slice());
    let adopted = CSSSelectorParser::adopt_selector_vector(vector);
    assert_eq!(from_buffer, adopted);
    assert_eq!(adopted.selectors_text(), "div .a, #b");
}

#[test]
fn test_empty_vector_adopts_to_invalid_list() {
    let context = CSSParserContext::default();
    let vector = CSSSelectorParser::parse_selector_text("div >", &context);
    assert!(vector.is_empty());
    assert_eq!(CSSSelectorParser::flattened_size(&vector), 0);
    assert!(!CSSSelectorParser::adopt_selector_vector(vector).is_valid());
}

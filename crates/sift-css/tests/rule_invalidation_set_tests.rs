//! Integration tests for building invalidation sets from style rules.

use std::sync::Arc;

use sift_css::invalidation::{
    Backing, DIRECT_ADJACENT_MAX, InvalidationLists, InvalidationSet, RuleInvalidationSet,
};
use sift_css::parser::{CSSParserContext, parse_selector_list};
use sift_css::selector::PseudoType;
use sift_css::style_rule::StyleRule;

fn add(set: &mut RuleInvalidationSet, text: &str) {
    let rule = StyleRule::parse(text, None, &CSSParserContext::default());
    assert!(rule.selector_list().is_valid(), "{text:?} should parse");
    set.add_style_rule(&rule);
}

fn rules(texts: &[&str]) -> RuleInvalidationSet {
    let mut set = RuleInvalidationSet::new();
    for text in texts {
        add(&mut set, text);
    }
    set
}

fn only(sets: &[Arc<InvalidationSet>]) -> &InvalidationSet {
    assert_eq!(sets.len(), 1, "expected exactly one set, got {sets:?}");
    &sets[0]
}

fn sorted(backing: &Backing) -> Vec<&str> {
    let mut items: Vec<&str> = backing.items().collect();
    items.sort_unstable();
    items
}

fn class_lists(set: &RuleInvalidationSet, class_name: &str) -> InvalidationLists {
    let mut lists = InvalidationLists::new();
    set.collect_class(&mut lists, class_name);
    lists
}

#[test]
fn test_subject_class_invalidates_self() {
    let set = rules(&[".p"]);
    let lists = class_lists(&set, "p");
    assert!(only(&lists.descendants).invalidates_self());
    assert!(lists.siblings.is_empty());
}

#[test]
fn test_id_descendant() {
    let set = rules(&["#a #b"]);
    let mut lists = InvalidationLists::new();
    set.collect_id(&mut lists, "a");
    let descendants = only(&lists.descendants);
    assert_eq!(sorted(descendants.ids()), ["b"]);
    assert!(!descendants.invalidates_self());
}

#[test]
fn test_pseudo_class_invalidates_self() {
    let set = rules(&[":focus"]);
    let mut lists = InvalidationLists::new();
    set.collect_pseudo_class(&mut lists, PseudoType::Focus);
    assert!(only(&lists.descendants).invalidates_self());
}

#[test]
fn test_pseudo_class_ancestor_records_tag_name() {
    let set = rules(&[":focus e"]);
    let mut lists = InvalidationLists::new();
    set.collect_pseudo_class(&mut lists, PseudoType::Focus);
    assert_eq!(sorted(only(&lists.descendants).tag_names()), ["e"]);
}

#[test]
fn test_universal_subject_invalidates_whole_subtree() {
    let set = rules(&[".a *"]);
    let lists = class_lists(&set, "a");
    assert!(only(&lists.descendants).whole_subtree_invalid());
}

#[test]
fn test_featureless_subject_under_pseudo_class() {
    let set = rules(&[":hover *"]);
    let mut lists = InvalidationLists::new();
    set.collect_pseudo_class(&mut lists, PseudoType::Hover);
    assert!(only(&lists.descendants).whole_subtree_invalid());
    assert!(lists.siblings.is_empty());

    let mut lists = InvalidationLists::new();
    set.collect_universal_sibling(&mut lists, 0);
    assert!(lists.siblings.is_empty());
}

#[test]
fn test_subject_only_keys_share_the_self_invalidation_set() {
    let set = rules(&[".a", "div .b", "#c", "[d]", ":hover"]);
    let shared = InvalidationSet::self_invalidation_set();

    let mut lists = InvalidationLists::new();
    set.collect_class(&mut lists, "a");
    set.collect_class(&mut lists, "b");
    set.collect_id(&mut lists, "c");
    set.collect_attribute(&mut lists, "d");
    set.collect_pseudo_class(&mut lists, PseudoType::Hover);
    // Identical sets are collected once.
    assert_eq!(lists.descendants.len(), 1);
    assert!(Arc::ptr_eq(&lists.descendants[0], &shared));

    lists.clear();
    set.collect_class(&mut lists, "b");
    let collected = &lists.descendants[0];
    assert!(collected.is_self_invalidation_set());
    assert!(collected.invalidates_self());
}

#[test]
fn test_self_invalidation_set_is_replaced_when_extended() {
    let mut set = rules(&[".a"]);
    let lists = class_lists(&set, "a");
    assert!(only(&lists.descendants).is_self_invalidation_set());

    add(&mut set, ".a div");
    let lists = class_lists(&set, "a");
    let descendants = only(&lists.descendants);
    assert!(descendants.invalidates_self());
    assert!(!descendants.is_self_invalidation_set());
    assert_eq!(sorted(descendants.tag_names()), ["div"]);
}

#[test]
fn test_negated_features_are_not_recorded_as_subject() {
    let set = rules(&[".b:not(.a) .c"]);
    let lists = class_lists(&set, "b");
    assert_eq!(sorted(only(&lists.descendants).classes()), ["c"]);

    let lists = class_lists(&set, "a");
    assert_eq!(sorted(only(&lists.descendants).classes()), ["c"]);

    assert!(class_lists(&set, "d").descendants.is_empty());
}

#[test]
fn test_negation_in_subject_keeps_the_other_features() {
    let set = rules(&[".x .y:not(.z)"]);
    let lists = class_lists(&set, "x");
    let descendants = only(&lists.descendants);
    assert_eq!(sorted(descendants.classes()), ["y"]);
    assert!(!descendants.whole_subtree_invalid());

    let lists = class_lists(&set, "z");
    assert!(only(&lists.descendants).invalidates_self());
}

#[test]
fn test_is_arguments_become_features() {
    let set = rules(&[".p :is(.a, .b)", ":is(.c, .d) .e"]);
    let lists = class_lists(&set, "p");
    assert_eq!(sorted(only(&lists.descendants).classes()), ["a", "b"]);

    for class_name in ["c", "d"] {
        let lists = class_lists(&set, class_name);
        assert_eq!(sorted(only(&lists.descendants).classes()), ["e"]);
    }
}

#[test]
fn test_is_with_a_featureless_argument_widens_to_subtree() {
    let set = rules(&[".p :is(*, .a)"]);
    let lists = class_lists(&set, "p");
    assert!(only(&lists.descendants).whole_subtree_invalid());
}

#[test]
fn test_narrowing_keeps_the_most_specific_feature() {
    let set = rules(&[".p div.a[title]#i", ".q span.b[title]", ".r span[title]"]);
    assert_eq!(sorted(only(&class_lists(&set, "p").descendants).ids()), ["i"]);

    let lists = class_lists(&set, "q");
    let descendants = only(&lists.descendants);
    assert_eq!(sorted(descendants.classes()), ["b"]);
    assert!(descendants.attributes().is_empty());
    assert!(descendants.tag_names().is_empty());

    let lists = class_lists(&set, "r");
    assert_eq!(sorted(only(&lists.descendants).attributes()), ["title"]);
}

#[test]
fn test_descendant_set_stays_after_subject_use() {
    let set = rules(&[".a div", "div"]);
    let lists = class_lists(&set, "a");
    assert_eq!(sorted(only(&lists.descendants).tag_names()), ["div"]);
}

#[test]
fn test_sibling_set_keeps_its_own_descendants() {
    let set = rules(&[".a ~ *", ".a div"]);
    let lists = class_lists(&set, "a");

    let siblings = only(&lists.siblings);
    assert!(siblings.is_sibling_invalidation_set());
    assert!(siblings.whole_subtree_invalid());
    assert!(siblings.invalidates_self());
    assert_eq!(siblings.max_direct_adjacent_selectors(), DIRECT_ADJACENT_MAX);

    let descendants = only(&lists.descendants);
    assert!(!descendants.whole_subtree_invalid());
    assert_eq!(sorted(descendants.tag_names()), ["div"]);
}

#[test]
fn test_sibling_rules_do_not_touch_own_subtree() {
    let set = rules(&[".a ~ div", ".a ~ div .b", ".a ~ div *"]);
    let lists = class_lists(&set, "a");
    assert!(lists.descendants.is_empty());

    let siblings = only(&lists.siblings);
    assert_eq!(sorted(siblings.tag_names()), ["div"]);
    assert!(siblings.invalidates_self());
    assert!(
        siblings
            .sibling_descendants()
            .is_some_and(|descendants| descendants.whole_subtree_invalid())
    );
}

#[test]
fn test_direct_adjacent_reach_is_counted() {
    let set = rules(&[".a + .b + .c", ".d + .e"]);
    let lists = class_lists(&set, "a");
    let siblings = only(&lists.siblings);
    assert_eq!(siblings.max_direct_adjacent_selectors(), 2);
    assert_eq!(sorted(siblings.classes()), ["c"]);

    let lists = class_lists(&set, "b");
    assert_eq!(only(&lists.siblings).max_direct_adjacent_selectors(), 1);

    let lists = class_lists(&set, "d");
    assert_eq!(only(&lists.siblings).max_direct_adjacent_selectors(), 1);
}

#[test]
fn test_sibling_of_ancestor_records_subject_in_sibling_descendants() {
    let set = rules(&[".a + .b .c"]);
    let lists = class_lists(&set, "a");
    let siblings = only(&lists.siblings);
    assert_eq!(sorted(siblings.classes()), ["b"]);
    assert!(!siblings.invalidates_self());
    assert!(
        siblings
            .sibling_descendants()
            .is_some_and(|descendants| descendants.classes().contains("c"))
    );

    let lists = class_lists(&set, "b");
    assert_eq!(sorted(only(&lists.descendants).classes()), ["c"]);
}

#[test]
fn test_universal_sibling_set() {
    let set = rules(&["* + .x", "* ~ .y"]);
    let mut lists = InvalidationLists::new();
    set.collect_universal_sibling(&mut lists, 1);
    let siblings = only(&lists.siblings);
    assert_eq!(sorted(siblings.classes()), ["x", "y"]);
    assert_eq!(siblings.max_direct_adjacent_selectors(), DIRECT_ADJACENT_MAX);

    let narrow = rules(&["* + .x"]);
    let mut lists = InvalidationLists::new();
    narrow.collect_universal_sibling(&mut lists, 2);
    assert!(lists.is_empty());
    narrow.collect_universal_sibling(&mut lists, 1);
    assert_eq!(only(&lists.siblings).max_direct_adjacent_selectors(), 1);
}

#[test]
fn test_collect_attribute_and_tag_name() {
    let set = rules(&["[title] span", "section > .x"]);
    let mut lists = InvalidationLists::new();
    set.collect_attribute(&mut lists, "title");
    assert_eq!(sorted(only(&lists.descendants).tag_names()), ["span"]);

    let mut lists = InvalidationLists::new();
    set.collect_tag_name(&mut lists, "SECTION");
    assert_eq!(sorted(only(&lists.descendants).classes()), ["x"]);

    let mut lists = InvalidationLists::new();
    set.collect_attribute(&mut lists, "href");
    set.collect_tag_name(&mut lists, "article");
    assert!(lists.is_empty());
}

#[test]
fn test_every_alternative_is_added() {
    let mut set = RuleInvalidationSet::new();
    let list = parse_selector_list(".a .b, .c .d", &CSSParserContext::default());
    for selector in &list {
        set.add_selector(selector);
    }
    assert_eq!(sorted(only(&class_lists(&set, "a").descendants).classes()), ["b"]);
    assert_eq!(sorted(only(&class_lists(&set, "c").descendants).classes()), ["d"]);
}

#[test]
fn test_merge_shares_and_combines() {
    let mut source = rules(&[".a div", ":hover *"]);
    let mut local = RuleInvalidationSet::new();
    local.merge(&source);
    source.clear();
    assert!(source.is_empty());

    let lists = class_lists(&local, "a");
    assert!(!only(&lists.descendants).whole_subtree_invalid());

    let mut lists = InvalidationLists::new();
    local.collect_pseudo_class(&mut lists, PseudoType::Hover);
    assert!(only(&lists.descendants).whole_subtree_invalid());

    let mut target = rules(&[".a span", ".s"]);
    target.merge(&rules(&[".a div", ".s"]));
    let lists = class_lists(&target, "a");
    assert_eq!(sorted(only(&lists.descendants).tag_names()), ["div", "span"]);
    let lists = class_lists(&target, "s");
    assert!(only(&lists.descendants).is_self_invalidation_set());
}

#[test]
fn test_merge_keeps_unrelated_keys_apart() {
    let mut target = rules(&["#x .a"]);
    target.merge(&rules(&["#y .b"]));

    let mut lists = InvalidationLists::new();
    target.collect_id(&mut lists, "x");
    assert_eq!(sorted(only(&lists.descendants).classes()), ["a"]);

    let mut lists = InvalidationLists::new();
    target.collect_id(&mut lists, "y");
    assert_eq!(sorted(only(&lists.descendants).classes()), ["b"]);
}

#[test]
fn test_merge_leaves_the_source_untouched() {
    let source = rules(&[".a div"]);
    let mut target = rules(&[".a span"]);
    target.merge(&source);

    let lists = class_lists(&source, "a");
    assert_eq!(sorted(only(&lists.descendants).tag_names()), ["div"]);
}

#[test]
fn test_clear() {
    let mut set = rules(&[".a .b", "#c + #d", ":focus"]);
    assert!(!set.is_empty());
    let before = class_lists(&set, "a");
    set.clear();
    assert!(set.is_empty());
    assert!(class_lists(&set, "a").is_empty());
    assert_eq!(sorted(only(&before.descendants).classes()), ["b"]);
}

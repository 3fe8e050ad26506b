//! Integration tests for selector matching.

use std::cell::Cell;
use std::rc::Rc;

use sift_common::PseudoState;
use sift_css::Element;
use sift_css::matcher::{SelectorMatcher, SelectorMatchingContext};
use sift_css::parser::{CSSParserContext, parse_selector_list};
use sift_css::selector::SelectorList;
use sift_dom::{DomTree, NodeId, NodeType};

fn parse(text: &str) -> SelectorList {
    let list = parse_selector_list(text, &CSSParserContext::default());
    assert!(list.is_valid(), "{text:?} should parse");
    list
}

fn matches_with(matcher: SelectorMatcher, tree: &DomTree, id: NodeId, text: &str) -> bool {
    let list = parse(text);
    let element = tree.element(id).expect("node should be an element");
    matcher.matches_list(&list, &element)
}

fn matches(tree: &DomTree, id: NodeId, text: &str) -> bool {
    matches_with(SelectorMatcher::new(), tree, id, text)
}

fn append(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.create_element(tag);
    tree.append_child(parent, id);
    id
}

/// ```text
/// <page :focus>
///   <text/>
///   <view id="main" class="foo" flatten="true" color="red green blue"
///         lang="zh-CN" :focus/>
///   <view/>
///   <view/>
/// </page>
/// ```
struct Page {
    tree: DomTree,
    page: NodeId,
    main: NodeId,
    last: NodeId,
}

fn page() -> Page {
    let mut tree = DomTree::new();
    let page = append(&mut tree, NodeId::ROOT, "page");
    tree.add_pseudo_state(page, PseudoState::FOCUS);
    let _ = append(&mut tree, page, "text");
    let main = append(&mut tree, page, "view");
    tree.set_id(main, "main");
    tree.add_class(main, "foo");
    tree.set_attribute(main, "flatten", "true");
    tree.set_attribute(main, "color", "red green blue");
    tree.set_attribute(main, "lang", "zh-CN");
    tree.add_pseudo_state(main, PseudoState::FOCUS);
    let _ = append(&mut tree, page, "view");
    let last = append(&mut tree, page, "view");
    Page {
        tree,
        page,
        main,
        last,
    }
}

#[test]
fn test_matching_selectors() {
    const CASES: &[&str] = &[
        "*",
        "view",
        "VIEW",
        ":root view",
        "page > view",
        ".foo",
        "#main",
        "view#main.foo",
        ":focus",
        ":focus *",
        ":focus > *",
        "text + .foo",
        "text ~ .foo",
        ":not(text)",
        ":not(:active, :hover)",
        ":is(.bar, .foo)",
        ":where(page) > #main",
        "page .foo:focus",
        ".bar, #main",
    ];
    let Page { tree, main, .. } = page();
    for &text in CASES {
        assert!(matches(&tree, main, text), "{text:?} should match #main");
    }
}

#[test]
fn test_non_matching_selectors() {
    const CASES: &[&str] = &[
        "text",
        ".bar",
        "#test",
        ":active",
        ":active:hover",
        ":focus:hover",
        "view + .foo",
        "view ~ .foo",
        "view > .foo",
        "div .foo",
        ":not(view)",
        ":not(:active, :focus)",
        ":is(.bar, #other)",
        ":root",
        "#main > *",
    ];
    let Page { tree, main, .. } = page();
    for &text in CASES {
        assert!(!matches(&tree, main, text), "{text:?} should not match #main");
    }
}

#[test]
fn test_focused_descendant() {
    let mut tree = DomTree::new();
    let outer = append(&mut tree, NodeId::ROOT, "div");
    let inner = append(&mut tree, outer, "div");
    tree.add_class(inner, "a");
    assert!(!matches(&tree, inner, "div .a:focus"));
    tree.add_pseudo_state(inner, PseudoState::FOCUS);
    assert!(matches(&tree, inner, "div .a:focus"));
    assert!(!matches(&tree, outer, "div .a:focus"));
}

#[test]
fn test_root() {
    let Page { tree, page, .. } = page();
    assert!(matches(&tree, page, ":root"));
    assert!(matches(&tree, page, "page:focus"));
    assert!(!matches(&tree, page, "* > page"));
}

#[test]
fn test_matching_context_uses_one_alternative() {
    let Page { tree, main, .. } = page();
    let list = parse(".bar, #main");
    let element = tree.element(main).expect("element");
    let matcher = SelectorMatcher::new();

    let first = list.first().expect("first alternative");
    assert!(!matcher.matches(&SelectorMatchingContext::new(element, first)));
    let second = list.next(first).expect("second alternative");
    assert!(matcher.matches(&SelectorMatchingContext::new(element, second)));
}

#[test]
fn test_subsequent_sibling_walks_past_non_matching_siblings() {
    let Page { tree, last, .. } = page();
    assert!(matches(&tree, last, "text ~ view"));
    assert!(matches(&tree, last, ".foo ~ view"));
    assert!(matches(&tree, last, ".foo + view + view"));
    assert!(!matches(&tree, last, ".foo + view"));
    assert!(matches(&tree, last, ":last-child"));
}

#[test]
fn test_attribute_selectors() {
    const CASES: &[(&str, bool)] = &[
        ("[flatten]", true),
        ("[FLATTEN]", true),
        ("[missing]", false),
        ("[flatten=true]", true),
        ("[flatten=TRUE]", false),
        ("[flatten=TRUE i]", true),
        ("[color~=green]", true),
        ("[color~=gre]", false),
        ("[color^=red]", true),
        ("[color$=blue]", true),
        ("[color*=\"n b\"]", true),
        ("[color|=red]", false),
        ("[lang|=zh]", true),
        ("[color=\"RED GREEN BLUE\" i]", true),
    ];
    let Page { tree, main, .. } = page();
    for &(text, expected) in CASES {
        assert_eq!(matches(&tree, main, text), expected, "{text:?}");
    }
}

#[test]
fn test_structural_pseudo_classes() {
    let mut tree = DomTree::new();
    let list = append(&mut tree, NodeId::ROOT, "ul");
    let mut items = Vec::new();
    for index in 0..5 {
        if index == 2 {
            let _ = append(&mut tree, list, "hr");
        }
        let text = tree.alloc(NodeType::Text(" ".to_owned()));
        tree.append_child(list, text);
        items.push(append(&mut tree, list, "li"));
    }

    let nth = |text: &str| -> Vec<usize> {
        (0..items.len())
            .filter(|&index| matches(&tree, items[index], text))
            .collect()
    };
    assert_eq!(nth(":first-child"), [0]);
    assert_eq!(nth(":last-child"), [4]);
    assert_eq!(nth(":nth-child(2)"), [1]);
    assert_eq!(nth(":nth-child(odd)"), [0, 3]);
    assert_eq!(nth(":nth-child(3)"), Vec::<usize>::new());
    assert_eq!(nth(":nth-of-type(odd)"), [0, 2, 4]);
    assert_eq!(nth(":nth-of-type(-n+2)"), [0, 1]);
    assert_eq!(nth(":nth-last-child(2)"), [3]);
    assert_eq!(nth(":nth-last-of-type(2n)"), [1, 3]);
    assert_eq!(nth(":first-of-type"), [0]);
    assert_eq!(nth(":last-of-type"), [4]);
    assert_eq!(nth(":only-of-type"), Vec::<usize>::new());
    assert_eq!(nth("hr + li"), [2]);
    assert_eq!(nth("hr ~ li"), [2, 3, 4]);

    assert!(matches(&tree, list, ":only-child"));
    assert!(matches(&tree, list, ":only-of-type"));
}

#[test]
fn test_empty() {
    let mut tree = DomTree::new();
    let root = append(&mut tree, NodeId::ROOT, "root");
    let blank = append(&mut tree, root, "blank");
    let whitespace = tree.alloc(NodeType::Text("  \n".to_owned()));
    tree.append_child(blank, whitespace);
    let comment = tree.alloc(NodeType::Comment("x".to_owned()));
    tree.append_child(blank, comment);
    let texty = append(&mut tree, root, "texty");
    let words = tree.alloc(NodeType::Text("words".to_owned()));
    tree.append_child(texty, words);

    assert!(matches(&tree, blank, ":empty"));
    assert!(!matches(&tree, texty, ":empty"));
    assert!(!matches(&tree, root, ":empty"));
}

#[test]
fn test_state_pseudo_classes() {
    let mut tree = DomTree::new();
    let form = append(&mut tree, NodeId::ROOT, "form");
    let input = append(&mut tree, form, "input");
    tree.add_pseudo_state(input, PseudoState::CHECKED | PseudoState::HOVER);
    let button = append(&mut tree, form, "button");
    tree.add_pseudo_state(button, PseudoState::DISABLED | PseudoState::DEFAULT);
    let link = append(&mut tree, form, "a");
    tree.set_attribute(link, "href", "#top");

    assert!(matches(&tree, input, ":checked:hover:enabled"));
    assert!(!matches(&tree, input, ":disabled"));
    assert!(matches(&tree, button, ":disabled:default"));
    assert!(!matches(&tree, button, ":enabled"));
    assert!(matches(&tree, link, ":link"));
    assert!(!matches(&tree, button, ":link"));

    tree.remove_pseudo_state(input, PseudoState::HOVER);
    assert!(!matches(&tree, input, ":hover"));
    assert!(matches(&tree, input, ":checked"));
}

#[test]
fn test_lang_and_dir_are_inherited() {
    let mut page = page();
    let child = append(&mut page.tree, page.main, "label");
    let tree = &page.tree;

    assert!(matches(tree, page.main, ":lang(zh)"));
    assert!(matches(tree, page.main, ":lang(zh-cn)"));
    assert!(!matches(tree, page.main, ":lang(en)"));
    assert!(matches(tree, child, ":lang(zh)"));
    assert!(!matches(tree, page.page, ":lang(zh)"));

    assert!(matches(tree, child, ":dir(ltr)"));
    assert!(!matches(tree, child, ":dir(rtl)"));
    page.tree.set_attribute(page.main, "dir", "rtl");
    assert!(matches(&page.tree, child, ":dir(rtl)"));
    assert!(matches(&page.tree, page.page, ":dir(ltr)"));
}

#[test]
fn test_pseudo_element_stand_ins() {
    let mut tree = DomTree::new();
    let form = append(&mut tree, NodeId::ROOT, "form");
    let input = append(&mut tree, form, "input");
    tree.add_class(input, "name");
    let placeholder = tree.create_element("placeholder");
    tree.add_pseudo_state(placeholder, PseudoState::PLACEHOLDER);
    tree.set_pseudo_element_owner(placeholder, input);
    let selection = tree.create_element("selection");
    tree.add_pseudo_state(selection, PseudoState::SELECTION);
    tree.set_pseudo_element_owner(selection, input);

    assert!(matches(&tree, placeholder, "input::placeholder"));
    assert!(matches(&tree, placeholder, "form > .name::placeholder"));
    assert!(matches(&tree, placeholder, "::placeholder"));
    assert!(!matches(&tree, placeholder, "textarea::placeholder"));
    assert!(!matches(&tree, placeholder, "input::selection"));
    assert!(!matches(&tree, input, "input::placeholder"));

    assert!(matches(&tree, selection, "::selection"));
    assert!(matches(&tree, selection, "input::selection"));
    assert!(!matches(&tree, selection, "::placeholder"));
}

#[test]
fn test_max_depth_bounds_ancestor_walks() {
    let mut tree = DomTree::new();
    let mut parent = append(&mut tree, NodeId::ROOT, "div");
    tree.add_class(parent, "a");
    for _ in 0..3 {
        parent = append(&mut tree, parent, "div");
    }
    let span = append(&mut tree, parent, "span");

    assert!(matches(&tree, span, ".a span"));
    assert!(matches_with(SelectorMatcher::with_max_depth(4), &tree, span, ".a span"));
    assert!(!matches_with(SelectorMatcher::with_max_depth(3), &tree, span, ".a span"));
    assert!(matches_with(SelectorMatcher::with_max_depth(1), &tree, span, "div > span"));
}

#[derive(Debug, Clone)]
struct CountingElement {
    classes: &'static [&'static str],
    state: PseudoState,
    class_lookups: Rc<Cell<usize>>,
    state_lookups: Rc<Cell<usize>>,
}

impl CountingElement {
    fn with_classes(classes: &'static [&'static str], class_lookups: &Rc<Cell<usize>>) -> Self {
        Self {
            classes,
            state: PseudoState::empty(),
            class_lookups: Rc::clone(class_lookups),
            state_lookups: Rc::new(Cell::new(0)),
        }
    }

    fn with_state(state: PseudoState, state_lookups: &Rc<Cell<usize>>) -> Self {
        Self {
            classes: &[],
            state,
            class_lookups: Rc::new(Cell::new(0)),
            state_lookups: Rc::clone(state_lookups),
        }
    }
}

impl Element for CountingElement {
    fn tag_name(&self) -> &str {
        "div"
    }

    fn id(&self) -> Option<&str> {
        None
    }

    fn has_class(&self, name: &str) -> bool {
        self.class_lookups.set(self.class_lookups.get() + 1);
        self.classes.contains(&name)
    }

    fn each_class(&self, callback: &mut dyn FnMut(&str)) {
        for class in self.classes {
            callback(class);
        }
    }

    fn attribute(&self, _name: &str) -> Option<&str> {
        None
    }

    fn pseudo_state(&self) -> PseudoState {
        self.state_lookups.set(self.state_lookups.get() + 1);
        self.state
    }

    fn parent_element(&self) -> Option<Self> {
        None
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        None
    }

    fn next_sibling_element(&self) -> Option<Self> {
        None
    }

    fn is_empty(&self) -> bool {
        true
    }

    fn pseudo_element_owner(&self) -> Option<Self> {
        None
    }
}

#[test]
fn test_compound_stops_at_first_failure() {
    let list = parse(".a.b.c");
    let matcher = SelectorMatcher::new();
    let lookups = Rc::new(Cell::new(0));

    let element = CountingElement::with_classes(&["b", "c"], &lookups);
    assert!(!matcher.matches_list(&list, &element));
    assert_eq!(lookups.get(), 1);

    lookups.set(0);
    let element = CountingElement::with_classes(&["a", "c"], &lookups);
    assert!(!matcher.matches_list(&list, &element));
    assert_eq!(lookups.get(), 2);

    lookups.set(0);
    let element = CountingElement::with_classes(&["c", "b", "a"], &lookups);
    assert!(matcher.matches_list(&list, &element));
    assert_eq!(lookups.get(), 3);
    assert!(element.is_root());
}

#[test]
fn test_state_pseudo_classes_stop_at_first_failure() {
    let list = parse(":active:hover");
    let matcher = SelectorMatcher::new();
    let lookups = Rc::new(Cell::new(0));

    // Only hovered: :active fails, so :hover is never evaluated.
    let element = CountingElement::with_state(PseudoState::HOVER, &lookups);
    assert!(!matcher.matches_list(&list, &element));
    assert_eq!(lookups.get(), 1);

    lookups.set(0);
    let element = CountingElement::with_state(PseudoState::ACTIVE, &lookups);
    assert!(!matcher.matches_list(&list, &element));
    assert_eq!(lookups.get(), 2);

    lookups.set(0);
    let element = CountingElement::with_state(PseudoState::ACTIVE | PseudoState::HOVER, &lookups);
    assert!(matcher.matches_list(&list, &element));
    assert_eq!(lookups.get(), 2);
}

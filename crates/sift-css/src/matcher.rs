//! Selector matching.
//!
//! [§ 17 Calculating a selector's match](https://www.w3.org/TR/selectors-4/#match-against-element)
//!
//! Selectors are stored rightmost compound first, so matching walks the
//! array forward: every simple selector of a compound is tested against the
//! current element, then the compound's relation moves the context to an
//! ancestor, a previous sibling or a pseudo-element's owner, and the next
//! compound is tested there.

use sift_common::PseudoState;

use crate::element::Element;
use crate::selector::{
    AttributeMatchType, MatchType, PseudoType, RelationType, SelectorList, SelectorRef,
};

/// What to match: one alternative of a selector list against one element.
#[derive(Debug, Clone)]
pub struct SelectorMatchingContext<'a, E: Element> {
    /// The element being tested.
    pub element: E,
    /// The start (subject compound) of the alternative.
    pub selector: SelectorRef<'a>,
}

impl<'a, E: Element> SelectorMatchingContext<'a, E> {
    /// A context for `selector` against `element`.
    pub const fn new(element: E, selector: SelectorRef<'a>) -> Self {
        Self { element, selector }
    }
}

/// Matches selectors against elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorMatcher {
    max_depth: Option<usize>,
}

impl SelectorMatcher {
    /// A matcher with no bound on tree walks.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_depth: None }
    }

    /// A matcher that gives up (reports no match) after `max_depth` steps of
    /// any single ancestor or sibling walk.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    /// Does the context's selector match the context's element?
    #[must_use]
    pub fn matches<E: Element>(&self, context: &SelectorMatchingContext<'_, E>) -> bool {
        self.match_complex(context.selector, &context.element)
    }

    /// Does any alternative of `list` match `element`?
    #[must_use]
    pub fn matches_list<E: Element>(&self, list: &SelectorList, element: &E) -> bool {
        list.iter()
            .any(|selector| self.match_complex(selector, element))
    }

    fn within_depth(&self, steps: usize) -> bool {
        self.max_depth.is_none_or(|max| steps < max)
    }

    fn match_complex<E: Element>(&self, selector: SelectorRef<'_>, element: &E) -> bool {
        // STEP 1: Every simple selector of the compound must match, in
        // order, stopping at the first failure.
        let mut current = selector;
        loop {
            if !self.match_simple(current, element) {
                return false;
            }
            if current.relation() != RelationType::SubSelector {
                break;
            }
            match current.tag_history() {
                Some(next) => current = next,
                None => return true,
            }
        }

        // STEP 2: Move to the element the next compound must match.
        let Some(next_compound) = current.tag_history() else {
            return true;
        };
        self.match_relation(current.relation(), next_compound, element)
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    fn match_relation<E: Element>(
        &self,
        relation: RelationType,
        next_compound: SelectorRef<'_>,
        element: &E,
    ) -> bool {
        match relation {
            // "A descendant combinator is whitespace that separates two
            // compound selectors. A selector of the form A B represents an
            // element B that is an arbitrary descendant of some ancestor
            // element A."
            RelationType::Descendant => {
                let mut steps = 0;
                let mut ancestor = element.parent_element();
                while let Some(candidate) = ancestor {
                    if !self.within_depth(steps) {
                        return false;
                    }
                    if self.match_complex(next_compound, &candidate) {
                        return true;
                    }
                    ancestor = candidate.parent_element();
                    steps += 1;
                }
                false
            }
            // "A child combinator describes a childhood relationship between
            // two elements."
            RelationType::Child => element
                .parent_element()
                .is_some_and(|parent| self.match_complex(next_compound, &parent)),
            // "The elements represented by the two compound selectors share
            // the same parent in the document tree and the element
            // represented by the first compound selector immediately precedes
            // the element represented by the second one."
            RelationType::DirectAdjacent => element
                .prev_sibling_element()
                .is_some_and(|sibling| self.match_complex(next_compound, &sibling)),
            // "...the element represented by the first compound selector
            // precedes (not necessarily immediately) the element represented
            // by the second one."
            RelationType::IndirectAdjacent => {
                let mut steps = 0;
                let mut sibling = element.prev_sibling_element();
                while let Some(candidate) = sibling {
                    if !self.within_depth(steps) {
                        return false;
                    }
                    if self.match_complex(next_compound, &candidate) {
                        return true;
                    }
                    sibling = candidate.prev_sibling_element();
                    steps += 1;
                }
                false
            }
            RelationType::UAShadow => element
                .pseudo_element_owner()
                .is_some_and(|owner| self.match_complex(next_compound, &owner)),
            RelationType::SubSelector => self.match_complex(next_compound, element),
        }
    }

    fn match_simple<E: Element>(&self, selector: SelectorRef<'_>, element: &E) -> bool {
        match selector.match_type() {
            // [§ 5.1](https://www.w3.org/TR/selectors-4/#type-selectors)
            MatchType::Tag => {
                selector.is_universal() || element.tag_name().eq_ignore_ascii_case(selector.value())
            }
            // [§ 6.7](https://www.w3.org/TR/selectors-4/#id-selectors)
            MatchType::Id => element.id() == Some(selector.value()),
            // [§ 6.6](https://www.w3.org/TR/selectors-4/#class-html)
            MatchType::Class => element.has_class(selector.value()),
            MatchType::PseudoClass => self.match_pseudo_class(selector, element),
            MatchType::PseudoElement => match_pseudo_element(selector.pseudo_type(), element),
            match_type if match_type.is_attribute() => {
                let Some(actual) = selector
                    .attribute_name()
                    .and_then(|name| element.attribute(name))
                else {
                    return false;
                };
                match_attribute_value(
                    match_type,
                    actual,
                    selector.value(),
                    selector.attribute_match_type() == AttributeMatchType::CaseInsensitive,
                )
            }
            _ => false,
        }
    }

    fn match_pseudo_class<E: Element>(&self, selector: SelectorRef<'_>, element: &E) -> bool {
        let state = element.pseudo_state();
        match selector.pseudo_type() {
            // [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
            // "The negation pseudo-class, :not(), is a functional pseudo-class
            // taking a selector list as an argument. It represents an element
            // that is not represented by its argument."
            PseudoType::Not => selector
                .selector_list()
                .is_some_and(|list| !self.matches_list(list, element)),
            // [§ 4.2 :is()](https://www.w3.org/TR/selectors-4/#matches)
            // [§ 4.4 :where()](https://www.w3.org/TR/selectors-4/#zero-matches)
            PseudoType::Is | PseudoType::Where => selector
                .selector_list()
                .is_some_and(|list| self.matches_list(list, element)),

            // [§ 9 User action pseudo-classes](https://www.w3.org/TR/selectors-4/#useraction-pseudos)
            PseudoType::Hover => state.contains(PseudoState::HOVER),
            PseudoType::Active => state.contains(PseudoState::ACTIVE),
            PseudoType::Focus => state.contains(PseudoState::FOCUS),
            // [§ 13 Input pseudo-classes](https://www.w3.org/TR/selectors-4/#input-pseudos)
            PseudoType::Checked => state.contains(PseudoState::CHECKED),
            PseudoType::Disabled => state.contains(PseudoState::DISABLED),
            PseudoType::Enabled => !state.contains(PseudoState::DISABLED),
            PseudoType::Default => state.contains(PseudoState::DEFAULT),
            // [§ 8.2 :link](https://www.w3.org/TR/selectors-4/#link)
            PseudoType::Link => element.attribute("href").is_some(),

            // [§ 14 Tree-structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
            PseudoType::Root => element.is_root(),
            PseudoType::Empty => element.is_empty(),
            PseudoType::FirstChild => element.prev_sibling_element().is_none(),
            PseudoType::LastChild => element.next_sibling_element().is_none(),
            PseudoType::OnlyChild => {
                element.prev_sibling_element().is_none() && element.next_sibling_element().is_none()
            }
            PseudoType::FirstOfType => count_siblings(element, Direction::Before, true) == 1,
            PseudoType::LastOfType => count_siblings(element, Direction::After, true) == 1,
            PseudoType::OnlyOfType => {
                count_siblings(element, Direction::Before, true) == 1
                    && count_siblings(element, Direction::After, true) == 1
            }
            PseudoType::NthChild => {
                selector.matches_nth(count_siblings(element, Direction::Before, false))
            }
            PseudoType::NthLastChild => {
                selector.matches_nth(count_siblings(element, Direction::After, false))
            }
            PseudoType::NthOfType => {
                selector.matches_nth(count_siblings(element, Direction::Before, true))
            }
            PseudoType::NthLastOfType => {
                selector.matches_nth(count_siblings(element, Direction::After, true))
            }

            // [§ 7.2 :lang()](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
            PseudoType::Lang => selector.argument().is_some_and(|range| {
                inherited_attribute(element, "lang").is_some_and(|lang| lang_matches(&lang, range))
            }),
            // [§ 7.1 :dir()](https://www.w3.org/TR/selectors-4/#the-dir-pseudo)
            PseudoType::Dir => selector.argument().is_some_and(|direction| {
                inherited_attribute(element, "dir")
                    .as_deref()
                    .unwrap_or("ltr")
                    .eq_ignore_ascii_case(direction)
            }),

            _ => false,
        }
    }
}

/// Pseudo-element stand-ins carry their kind in their pseudo state.
fn match_pseudo_element<E: Element>(pseudo_type: PseudoType, element: &E) -> bool {
    let wanted = match pseudo_type {
        PseudoType::Placeholder => PseudoState::PLACEHOLDER,
        PseudoType::Selection => PseudoState::SELECTION,
        PseudoType::Before => PseudoState::BEFORE,
        PseudoType::After => PseudoState::AFTER,
        _ => return false,
    };
    element.pseudo_state().contains(wanted)
}

/// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
/// [§ 6.2 Substring matching attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-substrings)
pub(crate) fn match_attribute_value(
    match_type: MatchType,
    actual: &str,
    expected: &str,
    case_insensitive: bool,
) -> bool {
    let (actual, expected) = if case_insensitive {
        (actual.to_ascii_lowercase(), expected.to_ascii_lowercase())
    } else {
        (actual.to_owned(), expected.to_owned())
    };
    match match_type {
        MatchType::AttributeSet => true,
        MatchType::AttributeExact => actual == expected,
        // "If 'val' contains whitespace, it will never represent anything
        // (since the words are separated by spaces). Also if 'val' is the
        // empty string, it will never represent anything."
        MatchType::AttributeList => {
            !expected.is_empty()
                && !expected.contains(|c: char| c.is_ascii_whitespace())
                && actual.split_ascii_whitespace().any(|word| word == expected)
        }
        // "...its value either being exactly 'val' or beginning with 'val'
        // immediately followed by '-' (U+002D)."
        MatchType::AttributeHyphen => {
            actual == expected
                || actual
                    .strip_prefix(expected.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        // "If 'val' is the empty string then the selector does not represent
        // anything."
        MatchType::AttributeBegin => !expected.is_empty() && actual.starts_with(&expected),
        MatchType::AttributeEnd => !expected.is_empty() && actual.ends_with(&expected),
        MatchType::AttributeContain => !expected.is_empty() && actual.contains(&expected),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Before,
    After,
}

/// 1-based position of `element` among its siblings, counted from the
/// start (`Before`) or the end (`After`), optionally only counting siblings
/// with the same tag name.
fn count_siblings<E: Element>(element: &E, direction: Direction, same_type: bool) -> i32 {
    let step = |e: &E| match direction {
        Direction::Before => e.prev_sibling_element(),
        Direction::After => e.next_sibling_element(),
    };
    let mut count = 1_i32;
    let mut sibling = step(element);
    while let Some(current) = sibling {
        if !same_type || current.tag_name().eq_ignore_ascii_case(element.tag_name()) {
            count = count.saturating_add(1);
        }
        sibling = step(&current);
    }
    count
}

/// The value of `name` on `element` or its nearest ancestor carrying it.
fn inherited_attribute<E: Element>(element: &E, name: &str) -> Option<String> {
    let mut current = Some(element.clone());
    while let Some(candidate) = current {
        if let Some(value) = candidate.attribute(name) {
            return Some(value.to_owned());
        }
        current = candidate.parent_element();
    }
    None
}

/// [§ 7.2](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
/// A language tag matches a range equal to it, or to one of its
/// `-`-separated prefixes.
fn lang_matches(lang: &str, range: &str) -> bool {
    if lang.eq_ignore_ascii_case(range) {
        return true;
    }
    lang.get(..range.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(range))
        && lang.as_bytes().get(range.len()) == Some(&b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_operators() {
        const CASES: &[(MatchType, &str, &str, bool, bool)] = &[
            (MatchType::AttributeExact, "red", "red", false, true),
            (MatchType::AttributeExact, "Red", "red", false, false),
            (MatchType::AttributeExact, "Red", "red", true, true),
            (MatchType::AttributeList, "red green blue", "green", false, true),
            (MatchType::AttributeList, "red green", "red green", false, false),
            (MatchType::AttributeList, "red", "", false, false),
            (MatchType::AttributeHyphen, "en-US", "en", false, true),
            (MatchType::AttributeHyphen, "en", "en", false, true),
            (MatchType::AttributeHyphen, "english", "en", false, false),
            (MatchType::AttributeBegin, "prefix-x", "prefix", false, true),
            (MatchType::AttributeBegin, "prefix", "", false, false),
            (MatchType::AttributeEnd, "a.png", ".png", false, true),
            (MatchType::AttributeContain, "abcdef", "cde", false, true),
            (MatchType::AttributeContain, "abcdef", "", false, false),
        ];
        for &(match_type, actual, expected, case_insensitive, result) in CASES {
            assert_eq!(
                match_attribute_value(match_type, actual, expected, case_insensitive),
                result,
                "{match_type:?} {actual:?} {expected:?}"
            );
        }
    }

    #[test]
    fn test_lang_matches() {
        assert!(lang_matches("zh-CN", "zh"));
        assert!(lang_matches("ZH", "zh"));
        assert!(!lang_matches("zhx", "zh"));
        assert!(!lang_matches("z", "zh"));
        assert!(!lang_matches("é-x", "e"));
    }
}

//! [§ 4.1 Selector Lists](https://www.w3.org/TR/selectors-4/#grouping)
//!
//! "A comma-separated list of selectors represents the union of all elements
//! selected by each of the individual selectors in the selector list."

use core::fmt;
use core::ops::Deref;

use super::{CSSSelector, MatchType, RelationType, SelectorData, SelectorFlags};

/// An immutable, flattened selector list.
///
/// An empty list means "invalid": the parser produces one whenever any part
/// of the source text fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    selectors: Box<[CSSSelector]>,
}

impl From<Box<[CSSSelector]>> for SelectorList {
    fn from(selectors: Box<[CSSSelector]>) -> Self {
        Self { selectors }
    }
}

impl SelectorList {
    /// The invalid (empty) list.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the list holds at least one selector.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.selectors.is_empty()
    }

    /// Whether the list holds no selectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Number of simple selectors across every alternative.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// The flattened simple selectors.
    #[must_use]
    pub fn as_slice(&self) -> &[CSSSelector] {
        &self.selectors
    }

    /// The first alternative.
    #[must_use]
    pub fn first(&self) -> Option<SelectorRef<'_>> {
        self.get(0)
    }

    /// A view starting at flattened index `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<SelectorRef<'_>> {
        (index < self.selectors.len()).then_some(SelectorRef {
            selectors: &self.selectors,
            index,
        })
    }

    /// The alternative following the one that starts at `current`.
    #[must_use]
    pub fn next<'a>(&'a self, current: SelectorRef<'a>) -> Option<SelectorRef<'a>> {
        let mut index = current.index;
        while let Some(selector) = self.selectors.get(index) {
            if selector.is_last_in_complex() {
                return self.get(index + 1);
            }
            index += 1;
        }
        None
    }

    /// Iterate over the alternatives (complex selectors).
    #[must_use]
    pub fn iter(&self) -> Alternatives<'_> {
        Alternatives {
            list: self,
            next: self.first(),
        }
    }

    /// Number of alternatives.
    #[must_use]
    pub fn complex_count(&self) -> usize {
        self.selectors
            .iter()
            .filter(|selector| selector.is_last_in_complex())
            .count()
    }

    /// [§ 6.7.5 Serializing Selectors](https://drafts.csswg.org/cssom/#serializing-selectors)
    ///
    /// "To serialize a group of selectors serialize each selector in the
    /// group of selectors and then serialize a comma-separated list of these
    /// serializations."
    #[must_use]
    pub fn selectors_text(&self) -> String {
        self.iter()
            .map(SelectorRef::selector_text)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> IntoIterator for &'a SelectorList {
    type Item = SelectorRef<'a>;
    type IntoIter = Alternatives<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the alternatives of a [`SelectorList`].
#[derive(Debug, Clone)]
pub struct Alternatives<'a> {
    list: &'a SelectorList,
    next: Option<SelectorRef<'a>>,
}

impl<'a> Iterator for Alternatives<'a> {
    type Item = SelectorRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.list.next(current);
        Some(current)
    }
}

/// A borrowed position inside a flattened selector list.
///
/// Dereferences to the [`CSSSelector`] at that position. Walking
/// [`tag_history`](Self::tag_history) visits the rest of the complex
/// selector, right to left by compound.
#[derive(Clone, Copy)]
pub struct SelectorRef<'a> {
    selectors: &'a [CSSSelector],
    index: usize,
}

impl fmt::Debug for SelectorRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorRef")
            .field("index", &self.index)
            .field("selector", self.selector())
            .finish()
    }
}

impl PartialEq for SelectorRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.selectors, other.selectors) && self.index == other.index
    }
}

impl Eq for SelectorRef<'_> {}

impl Deref for SelectorRef<'_> {
    type Target = CSSSelector;

    fn deref(&self) -> &CSSSelector {
        self.selector()
    }
}

impl<'a> SelectorRef<'a> {
    /// The selector at this position, borrowed for the list's lifetime.
    #[must_use]
    pub fn selector(&self) -> &'a CSSSelector {
        &self.selectors[self.index]
    }

    /// Flattened index into the owning list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The next simple selector of the same complex selector, or `None` at
    /// its end.
    #[must_use]
    pub fn tag_history(&self) -> Option<Self> {
        if self.selector().is_last_in_complex() {
            return None;
        }
        let index = self.index + 1;
        (index < self.selectors.len()).then_some(Self {
            selectors: self.selectors,
            index,
        })
    }

    /// The simple selectors of the compound starting here.
    #[must_use]
    pub const fn compound(&self) -> Compound<'a> {
        Compound { next: Some(*self) }
    }

    /// The last simple selector of the compound starting here.
    #[must_use]
    pub fn last_in_compound(&self) -> Self {
        let mut current = *self;
        while current.relation() == RelationType::SubSelector {
            match current.tag_history() {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Serialize the complex selector starting here.
    ///
    /// [§ 6.7.5 Serializing Selectors](https://drafts.csswg.org/cssom/#serialize-a-selector)
    #[must_use]
    pub fn selector_text(self) -> String {
        let mut result = String::new();
        let mut compound = self;
        loop {
            let mut builder = String::new();
            let last = compound.last_in_compound();
            for simple in compound.compound() {
                append_simple_selector(&simple, &mut builder);
            }
            let Some(next) = last.tag_history() else {
                builder.push_str(&result);
                return builder;
            };
            result = format!("{}{builder}{result}", last.relation().separator());
            compound = next;
        }
    }
}

/// Iterator over the simple selectors of one compound.
#[derive(Debug, Clone)]
pub struct Compound<'a> {
    next: Option<SelectorRef<'a>>,
}

impl<'a> Iterator for Compound<'a> {
    type Item = SelectorRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current.relation() == RelationType::SubSelector {
            current.tag_history()
        } else {
            None
        };
        Some(current)
    }
}

/// [§ 6.7.5 serialize a simple selector](https://drafts.csswg.org/cssom/#serialize-a-simple-selector)
fn append_simple_selector(selector: &CSSSelector, out: &mut String) {
    match selector.match_type() {
        MatchType::Tag => {
            if !selector.tag_is_implicit() {
                out.push_str(selector.value());
            }
        }
        MatchType::Id => {
            out.push('#');
            out.push_str(selector.value());
        }
        MatchType::Class => {
            out.push('.');
            out.push_str(selector.value());
        }
        MatchType::PseudoClass => {
            out.push(':');
            out.push_str(selector.value());
            match selector.data() {
                SelectorData::Nth { a, b } => {
                    out.push('(');
                    out.push_str(&serialize_nth(*a, *b));
                    out.push(')');
                }
                SelectorData::Argument(argument) => {
                    out.push('(');
                    out.push_str(argument);
                    out.push(')');
                }
                SelectorData::List(list) => {
                    out.push('(');
                    out.push_str(&list.selectors_text());
                    out.push(')');
                }
                SelectorData::None | SelectorData::Attribute { .. } => {}
            }
        }
        MatchType::PseudoElement => {
            out.push_str("::");
            out.push_str(selector.value());
        }
        match_type if match_type.is_attribute() => {
            out.push('[');
            out.push_str(selector.attribute_name().unwrap_or_default());
            if match_type != MatchType::AttributeSet {
                out.push_str(match_type.attribute_operator());
                serialize_string(selector.value(), out);
                match selector.attribute_match_type() {
                    super::AttributeMatchType::CaseInsensitive => out.push_str(" i"),
                    super::AttributeMatchType::CaseSensitiveAlways => out.push_str(" s"),
                    super::AttributeMatchType::CaseSensitive => {}
                }
            }
            out.push(']');
        }
        _ => {}
    }
}

/// [§ 2.1 serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
fn serialize_string(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\u{1}'..='\u{1f}' | '\u{7f}' => {
                out.push_str(&format!("\\{:x} ", u32::from(c)));
            }
            '\0' => out.push('\u{FFFD}'),
            _ => out.push(c),
        }
    }
    out.push('"');
}

/// [§ 6.7.5](https://drafts.csswg.org/cssom/#serializing-selectors): `An+B`
/// is written in its shortest form.
fn serialize_nth(a: i32, b: i32) -> String {
    let mut text = match a {
        0 => return b.to_string(),
        1 => "n".to_owned(),
        -1 => "-n".to_owned(),
        _ => format!("{a}n"),
    };
    if b > 0 {
        text.push_str(&format!("+{b}"));
    } else if b < 0 {
        text.push_str(&b.to_string());
    }
    text
}

/// Marks every selector of `selectors` (a run of complex selectors laid out
/// back to back) with its position flags. `ends` holds the flattened index
/// one past the end of each complex selector.
pub(crate) fn mark_positions(selectors: &mut [CSSSelector], ends: &[usize]) {
    let mut start = 0;
    for &end in ends {
        for index in start..end {
            let selector = &mut selectors[index];
            let mut flags = selector.flags() - SelectorFlags::POSITION;
            if index + 1 == end {
                flags |= SelectorFlags::LAST_IN_COMPOUND | SelectorFlags::LAST_IN_COMPLEX;
            } else if selector.relation() != RelationType::SubSelector {
                flags |= SelectorFlags::LAST_IN_COMPOUND;
            }
            selector.set_flags(flags);
        }
        start = end;
    }
    if let Some(last) = selectors.last_mut() {
        last.set_flags(last.flags() | SelectorFlags::LAST_IN_LIST);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_nth() {
        assert_eq!(serialize_nth(0, 5), "5");
        assert_eq!(serialize_nth(0, -5), "-5");
        assert_eq!(serialize_nth(1, 0), "n");
        assert_eq!(serialize_nth(-1, 3), "-n+3");
        assert_eq!(serialize_nth(2, 1), "2n+1");
        assert_eq!(serialize_nth(2, -1), "2n-1");
        assert_eq!(serialize_nth(i32::MAX, 0), "2147483647n");
    }

    #[test]
    fn test_serialize_string_escapes() {
        let mut out = String::new();
        serialize_string("a\"b\\c\u{1}", &mut out);
        assert_eq!(out, "\"a\\\"b\\\\c\\1 \"");
    }

    #[test]
    fn test_mark_positions() {
        let mut selectors = vec![
            CSSSelector::new(MatchType::Class, "a"),
            CSSSelector::new(MatchType::Class, "b"),
            CSSSelector::tag("div", false),
            CSSSelector::new(MatchType::Id, "c"),
        ];
        selectors[1].set_relation(RelationType::Descendant);
        mark_positions(&mut selectors, &[3, 4]);

        assert_eq!(selectors[0].flags(), SelectorFlags::empty());
        assert_eq!(selectors[1].flags(), SelectorFlags::LAST_IN_COMPOUND);
        assert_eq!(
            selectors[2].flags(),
            SelectorFlags::LAST_IN_COMPOUND | SelectorFlags::LAST_IN_COMPLEX
        );
        assert_eq!(selectors[3].flags(), SelectorFlags::POSITION);

        let list = SelectorList::from(selectors.into_boxed_slice());
        assert_eq!(list.complex_count(), 2);
        assert_eq!(list.selectors_text(), "div .a.b, #c");
    }
}

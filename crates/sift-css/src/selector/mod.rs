//! Selector data model.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//!
//! A parsed selector list is one flat array of [`CSSSelector`]s. Each
//! alternative (complex selector) occupies a contiguous run of that array:
//! the rightmost compound selector comes first, and inside a compound the
//! simple selectors keep their source order. The [`RelationType`] stored on
//! the last simple selector of a compound says how that compound relates to
//! the next one in the array, which is the compound to its left in the
//! source text.
//!
//! ```text
//! div .a:hover   =>   [ .a (sub-selector), :hover (descendant), div ]
//! ```
//!
//! Position flags ([`SelectorFlags`]) mark the end of every compound, every
//! complex selector and the whole list, so the array can be walked without
//! any side tables.

/// Binary encoding of selectors and selector lists.
pub mod codec;
/// The flattened selector list and borrowed views into it.
pub mod list;
/// Pseudo-class and pseudo-element names.
pub mod pseudo;

use bitflags::bitflags;
use strum_macros::FromRepr;

pub use codec::DecodeError;
pub use list::{SelectorList, SelectorRef};
pub use pseudo::PseudoType;

/// What a single simple selector tests.
///
/// [§ 3.1 Structure and Terminology](https://www.w3.org/TR/selectors-4/#structure)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr)]
#[repr(u8)]
pub enum MatchType {
    /// Never matches. Only seen on default-constructed selectors.
    #[default]
    Unknown,
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// `div`, or the universal selector `*`.
    Tag,
    /// [§ 6.7 ID selectors](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id,
    /// [§ 6.6 Class selectors](https://www.w3.org/TR/selectors-4/#class-html)
    Class,
    /// `:hover`, `:not(...)`, `:nth-child(...)`, ...
    PseudoClass,
    /// `::before`, `::placeholder`, ...
    PseudoElement,
    /// `[attr]`
    AttributeSet,
    /// `[attr=value]`
    AttributeExact,
    /// `[attr~=value]`
    AttributeList,
    /// `[attr|=value]`
    AttributeHyphen,
    /// `[attr^=value]`
    AttributeBegin,
    /// `[attr$=value]`
    AttributeEnd,
    /// `[attr*=value]`
    AttributeContain,
}

impl MatchType {
    /// Any of the `[attr...]` forms.
    #[must_use]
    pub const fn is_attribute(self) -> bool {
        matches!(
            self,
            Self::AttributeSet
                | Self::AttributeExact
                | Self::AttributeList
                | Self::AttributeHyphen
                | Self::AttributeBegin
                | Self::AttributeEnd
                | Self::AttributeContain
        )
    }

    /// The operator between the attribute name and value, empty for
    /// [`MatchType::AttributeSet`] and non-attribute selectors.
    #[must_use]
    pub const fn attribute_operator(self) -> &'static str {
        match self {
            Self::AttributeExact => "=",
            Self::AttributeList => "~=",
            Self::AttributeHyphen => "|=",
            Self::AttributeBegin => "^=",
            Self::AttributeEnd => "$=",
            Self::AttributeContain => "*=",
            _ => "",
        }
    }
}

/// How a compound selector relates to the compound after it in storage
/// order (the one to its left in the source).
///
/// [§ 15 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr)]
#[repr(u8)]
pub enum RelationType {
    /// Not a combinator: the next selector belongs to the same compound.
    #[default]
    SubSelector,
    /// `A B`
    Descendant,
    /// `A > B`
    Child,
    /// `A + B`
    DirectAdjacent,
    /// `A ~ B`
    IndirectAdjacent,
    /// The hidden combinator between an element and a pseudo-element hosted
    /// in its UA shadow tree, e.g. between `input` and `::placeholder`.
    UAShadow,
}

impl RelationType {
    /// `+` and `~`.
    #[must_use]
    pub const fn is_adjacent(self) -> bool {
        matches!(self, Self::DirectAdjacent | Self::IndirectAdjacent)
    }

    /// The text written between two compounds joined by this relation.
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::DirectAdjacent => " + ",
            Self::IndirectAdjacent => " ~ ",
            Self::SubSelector | Self::UAShadow => "",
        }
    }
}

/// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr)]
#[repr(u8)]
pub enum AttributeMatchType {
    /// No flag: the document language decides.
    #[default]
    CaseSensitive,
    /// `[attr=value i]`
    CaseInsensitive,
    /// `[attr=value s]`
    CaseSensitiveAlways,
}

bitflags! {
    /// Position markers on a stored selector.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SelectorFlags: u8 {
        /// The last simple selector of its compound.
        const LAST_IN_COMPOUND = 1 << 0;
        /// The last simple selector of its complex selector.
        const LAST_IN_COMPLEX = 1 << 1;
        /// The last selector of the whole list.
        const LAST_IN_LIST = 1 << 2;
        /// A type selector the parser inserted rather than one written by
        /// the author. Not serialized.
        const IMPLICIT_TAG = 1 << 3;
    }
}

impl SelectorFlags {
    /// The flags that flattening recomputes.
    pub const POSITION: Self = Self::LAST_IN_COMPOUND
        .union(Self::LAST_IN_COMPLEX)
        .union(Self::LAST_IN_LIST);
}

/// Payload carried by some selector kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectorData {
    /// Nothing beyond the value.
    #[default]
    None,
    /// Attribute selectors: the (lowercased) attribute name and case flag.
    /// The selector value holds the expected attribute value.
    Attribute {
        /// Attribute name.
        name: String,
        /// Case-sensitivity flag.
        case: AttributeMatchType,
    },
    /// `:nth-*()`: the `a` and `b` of `An+B`.
    Nth {
        /// Step.
        a: i32,
        /// Offset.
        b: i32,
    },
    /// `:lang()` and `:dir()`: the identifier argument.
    Argument(String),
    /// `:not()`, `:is()`, `:where()`: the nested selector list.
    List(SelectorList),
}

/// One simple selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CSSSelector {
    match_type: MatchType,
    relation: RelationType,
    pseudo_type: PseudoType,
    flags: SelectorFlags,
    value: String,
    data: SelectorData,
}

impl CSSSelector {
    /// A simple selector of `match_type` testing against `value`.
    #[must_use]
    pub fn new(match_type: MatchType, value: impl Into<String>) -> Self {
        Self {
            match_type,
            value: value.into(),
            ..Self::default()
        }
    }

    /// A type selector. `implicit` marks selectors the parser inserted.
    #[must_use]
    pub fn tag(name: impl Into<String>, implicit: bool) -> Self {
        let mut selector = Self::new(MatchType::Tag, name);
        selector.flags.set(SelectorFlags::IMPLICIT_TAG, implicit);
        selector
    }

    /// An attribute selector. `match_type` must be one of the attribute
    /// kinds.
    #[must_use]
    pub fn attribute(
        match_type: MatchType,
        name: impl Into<String>,
        value: impl Into<String>,
        case: AttributeMatchType,
    ) -> Self {
        let mut selector = Self::new(match_type, value);
        selector.data = SelectorData::Attribute {
            name: name.into(),
            case,
        };
        selector
    }

    /// A pseudo-class or pseudo-element selector.
    #[must_use]
    pub fn pseudo(match_type: MatchType, pseudo_type: PseudoType, name: impl Into<String>) -> Self {
        let mut selector = Self::new(match_type, name);
        selector.pseudo_type = pseudo_type;
        selector
    }

    /// What this selector tests.
    #[must_use]
    pub const fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// How this selector's compound relates to the next compound. Only
    /// meaningful on the last simple selector of a compound.
    #[must_use]
    pub const fn relation(&self) -> RelationType {
        self.relation
    }

    /// The pseudo kind, [`PseudoType::Unknown`] for non-pseudo selectors.
    #[must_use]
    pub const fn pseudo_type(&self) -> PseudoType {
        self.pseudo_type
    }

    /// Position flags.
    #[must_use]
    pub const fn flags(&self) -> SelectorFlags {
        self.flags
    }

    /// Tag name, id, class name, attribute value or pseudo name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Extra payload.
    #[must_use]
    pub const fn data(&self) -> &SelectorData {
        &self.data
    }

    /// The attribute name of an attribute selector.
    #[must_use]
    pub fn attribute_name(&self) -> Option<&str> {
        match &self.data {
            SelectorData::Attribute { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The case flag of an attribute selector.
    #[must_use]
    pub const fn attribute_match_type(&self) -> AttributeMatchType {
        match &self.data {
            SelectorData::Attribute { case, .. } => *case,
            _ => AttributeMatchType::CaseSensitive,
        }
    }

    /// `(a, b)` of an `:nth-*()` selector.
    #[must_use]
    pub const fn nth(&self) -> Option<(i32, i32)> {
        match self.data {
            SelectorData::Nth { a, b } => Some((a, b)),
            _ => None,
        }
    }

    /// The identifier argument of `:lang()` or `:dir()`.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        match &self.data {
            SelectorData::Argument(argument) => Some(argument),
            _ => None,
        }
    }

    /// The nested list of `:not()`, `:is()` and `:where()`.
    #[must_use]
    pub const fn selector_list(&self) -> Option<&SelectorList> {
        match &self.data {
            SelectorData::List(list) => Some(list),
            _ => None,
        }
    }

    /// Whether this ends a compound selector.
    #[must_use]
    pub const fn is_last_in_compound(&self) -> bool {
        self.flags.contains(SelectorFlags::LAST_IN_COMPOUND)
    }

    /// Whether this ends a complex selector.
    #[must_use]
    pub const fn is_last_in_complex(&self) -> bool {
        self.flags.contains(SelectorFlags::LAST_IN_COMPLEX)
    }

    /// Whether this is the final selector of its list.
    #[must_use]
    pub const fn is_last_in_selector_list(&self) -> bool {
        self.flags.contains(SelectorFlags::LAST_IN_LIST)
    }

    /// A type selector inserted by the parser.
    #[must_use]
    pub const fn tag_is_implicit(&self) -> bool {
        self.flags.contains(SelectorFlags::IMPLICIT_TAG)
    }

    /// The universal selector `*`.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.match_type == MatchType::Tag && self.value == "*"
    }

    /// Id, class or any attribute selector.
    #[must_use]
    pub const fn is_id_class_or_attribute(&self) -> bool {
        matches!(self.match_type, MatchType::Id | MatchType::Class) || self.match_type.is_attribute()
    }

    /// Pseudo-elements reached through a [`RelationType::UAShadow`] relation.
    #[must_use]
    pub fn needs_implicit_shadow_combinator(&self) -> bool {
        self.match_type == MatchType::PseudoElement
            && self.pseudo_type.needs_implicit_shadow_combinator()
    }

    /// Whether `count` (1-based) satisfies the `An+B` of this selector.
    ///
    /// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    #[must_use]
    pub fn matches_nth(&self, count: i32) -> bool {
        let SelectorData::Nth { a, b } = self.data else {
            return false;
        };
        nth_matches(a, b, count)
    }

    pub(crate) fn set_relation(&mut self, relation: RelationType) {
        self.relation = relation;
    }

    pub(crate) fn set_flags(&mut self, flags: SelectorFlags) {
        self.flags = flags;
    }

    pub(crate) fn set_pseudo(&mut self, match_type: MatchType, pseudo_type: PseudoType) {
        self.match_type = match_type;
        self.pseudo_type = pseudo_type;
    }

    pub(crate) fn set_data(&mut self, data: SelectorData) {
        self.data = data;
    }

    pub(crate) fn from_parts(
        match_type: MatchType,
        relation: RelationType,
        pseudo_type: PseudoType,
        flags: SelectorFlags,
        value: String,
        data: SelectorData,
    ) -> Self {
        Self {
            match_type,
            relation,
            pseudo_type,
            flags,
            value,
            data,
        }
    }
}

/// Does a 1-based `index` fall on `a*n + b` for some n >= 0?
pub(crate) fn nth_matches(a: i32, b: i32, index: i32) -> bool {
    let (a, b, index) = (i64::from(a), i64::from(b), i64::from(index));
    if a == 0 {
        return index == b;
    }
    if a > 0 {
        index >= b && (index - b) % a == 0
    } else {
        index <= b && (b - index) % -a == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_matches() {
        // 2n+1
        assert!(nth_matches(2, 1, 1));
        assert!(!nth_matches(2, 1, 2));
        assert!(nth_matches(2, 1, 3));
        // -n+3
        assert!(nth_matches(-1, 3, 1));
        assert!(nth_matches(-1, 3, 3));
        assert!(!nth_matches(-1, 3, 4));
        // 3
        assert!(nth_matches(0, 3, 3));
        assert!(!nth_matches(0, 3, 6));
        // n+0
        assert!(nth_matches(1, 0, 1));
        // Extremes do not overflow.
        assert!(!nth_matches(i32::MIN, i32::MAX, 1));
        assert!(nth_matches(i32::MAX, 1, 1));
    }

    #[test]
    fn test_flags() {
        let mut selector = CSSSelector::tag("*", true);
        assert!(selector.tag_is_implicit());
        assert!(selector.is_universal());
        selector.set_flags(selector.flags() | SelectorFlags::LAST_IN_COMPOUND);
        assert!(selector.is_last_in_compound());
        assert!(!selector.is_last_in_complex());
        assert!(selector.tag_is_implicit());
    }

    #[test]
    fn test_attribute_payload() {
        let selector = CSSSelector::attribute(
            MatchType::AttributeHyphen,
            "lang",
            "en",
            AttributeMatchType::CaseInsensitive,
        );
        assert!(selector.match_type().is_attribute());
        assert!(selector.is_id_class_or_attribute());
        assert_eq!(selector.attribute_name(), Some("lang"));
        assert_eq!(
            selector.attribute_match_type(),
            AttributeMatchType::CaseInsensitive
        );
        assert_eq!(selector.match_type().attribute_operator(), "|=");
        assert_eq!(selector.value(), "en");
    }
}

//! Pseudo-class and pseudo-element names.
//!
//! [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
//! [CSS Pseudo-Elements Level 4](https://www.w3.org/TR/css-pseudo-4/)

use strum_macros::{EnumString, FromRepr, IntoStaticStr};

use super::MatchType;
use crate::parser::ParserMode;

/// Every pseudo-class and pseudo-element the parser recognises.
///
/// Names are matched after ASCII lowercasing; whether a name is valid also
/// depends on whether it was written as a function (`:not(`) or a plain
/// identifier (`:hover`), see [`PseudoType::from_name`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, IntoStaticStr, FromRepr,
)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum PseudoType {
    /// Not a pseudo selector, or a name that is not recognised.
    #[default]
    Unknown,

    // Written without arguments.
    /// `:active`
    Active,
    /// `::after`
    After,
    /// `::backdrop`
    Backdrop,
    /// `::before`
    Before,
    /// `:checked`
    Checked,
    /// `:default`
    Default,
    /// `:disabled`
    Disabled,
    /// `:empty`
    Empty,
    /// `:enabled`
    Enabled,
    /// `:first-child`
    FirstChild,
    /// `::first-letter`
    FirstLetter,
    /// `::first-line`
    FirstLine,
    /// `:first-of-type`
    FirstOfType,
    /// `:focus`
    Focus,
    /// `:hover`
    Hover,
    /// `:last-child`
    LastChild,
    /// `:last-of-type`
    LastOfType,
    /// `:link`
    Link,
    /// `:only-child`
    OnlyChild,
    /// `:only-of-type`
    OnlyOfType,
    /// `::placeholder`
    Placeholder,
    /// `:root`
    Root,
    /// `::selection`
    Selection,

    // Written as functions.
    /// `:dir()`
    Dir,
    /// `:has()`
    Has,
    /// `:is()`
    Is,
    /// `:lang()`
    Lang,
    /// `:not()`
    Not,
    /// `:nth-child()`
    NthChild,
    /// `:nth-last-child()`
    NthLastChild,
    /// `:nth-last-of-type()`
    NthLastOfType,
    /// `:nth-of-type()`
    NthOfType,
    /// `:where()`
    Where,
}

impl PseudoType {
    /// Look up an (already lowercased) pseudo name. A functional name written
    /// without parentheses, or a plain name written as a function, is
    /// [`PseudoType::Unknown`]. So is the literal name `unknown`.
    #[must_use]
    pub fn from_name(name: &str, has_arguments: bool) -> Self {
        name.parse::<Self>()
            .ok()
            .filter(|pseudo| {
                *pseudo != Self::Unknown && pseudo.takes_arguments() == has_arguments
            })
            .unwrap_or_default()
    }

    /// The canonical (lowercase) name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Pseudo types that are written as functions.
    #[must_use]
    pub const fn takes_arguments(self) -> bool {
        matches!(
            self,
            Self::Dir
                | Self::Has
                | Self::Is
                | Self::Lang
                | Self::Not
                | Self::NthChild
                | Self::NthLastChild
                | Self::NthLastOfType
                | Self::NthOfType
                | Self::Where
        )
    }

    /// Pseudo types whose argument is itself a selector list.
    #[must_use]
    pub const fn takes_selector_list(self) -> bool {
        matches!(self, Self::Has | Self::Is | Self::Not | Self::Where)
    }

    /// `:nth-*()` pseudo-classes taking an `An+B` argument.
    #[must_use]
    pub const fn is_nth(self) -> bool {
        matches!(
            self,
            Self::NthChild | Self::NthLastChild | Self::NthLastOfType | Self::NthOfType
        )
    }

    /// Names that denote pseudo-elements.
    #[must_use]
    pub const fn is_pseudo_element(self) -> bool {
        matches!(
            self,
            Self::After
                | Self::Backdrop
                | Self::Before
                | Self::FirstLetter
                | Self::FirstLine
                | Self::Placeholder
                | Self::Selection
        )
    }

    /// Pseudo-elements that live in the UA shadow tree of their owner, and are
    /// therefore reached through a [`RelationType::UAShadow`](super::RelationType::UAShadow)
    /// relation rather than matched on the owner itself.
    #[must_use]
    pub const fn needs_implicit_shadow_combinator(self) -> bool {
        matches!(self, Self::Placeholder | Self::Selection)
    }

    /// [§ 11.1 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Reconcile a looked-up pseudo type with the number of colons it was
    /// written with, returning the match type and pseudo type to store.
    ///
    /// "For compatibility with existing style sheets, user agents must also
    /// accept the previous one-colon notation for pseudo-elements introduced in
    /// CSS levels 1 and 2 (namely, :first-line, :first-letter, :before, and
    /// :after)."
    ///
    /// Any other pseudo-element written with one colon, and any pseudo-class
    /// written with two, becomes [`PseudoType::Unknown`]. `::backdrop` is only
    /// available in user-agent sheets.
    #[must_use]
    pub const fn resolve(self, match_type: MatchType, mode: ParserMode) -> (MatchType, Self) {
        match self {
            Self::After | Self::Before | Self::FirstLetter | Self::FirstLine => {
                (MatchType::PseudoElement, self)
            }
            Self::Backdrop => match (match_type, mode) {
                (MatchType::PseudoElement, ParserMode::UserAgent) => (match_type, self),
                _ => (match_type, Self::Unknown),
            },
            Self::Placeholder | Self::Selection => match match_type {
                MatchType::PseudoElement => (match_type, self),
                _ => (match_type, Self::Unknown),
            },
            Self::Unknown => (match_type, Self::Unknown),
            _ => match match_type {
                MatchType::PseudoClass => (match_type, self),
                _ => (match_type, Self::Unknown),
            },
        }
    }
}

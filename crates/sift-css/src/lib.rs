//! CSS selector parsing, matching, rule indexing and style invalidation for
//! the Sift selector engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Comments as tokens, skipped by token ranges
//!   - Escape sequences
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, class, ID and attribute selectors
//!   - Pseudo-classes, including `:not()`, `:is()`, `:where()` and the
//!     [An+B](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax) family
//!   - Pseudo-elements, with an implicit UA-shadow relation for
//!     `::placeholder` and `::selection`
//!   - Combinators (descendant, child, next-sibling, subsequent-sibling)
//!   - Canonical serialization and a compact binary encoding
//!
//! - **Rule Set**: rules bucketed by their most selective subject feature
//!
//! - **Selector Matching** against any tree implementing [`Element`]
//!
//! - **Invalidation Sets**: which elements to restyle when a class, id,
//!   attribute or pseudo-class state changes
//!
//! # Not Implemented
//!
//! - Declaration parsing and the cascade
//! - Namespaces
//! - `:has()`

/// Element capabilities required by matching and invalidation.
pub mod element;
/// Invalidation sets and the rule-level feature maps.
pub mod invalidation;
/// Selector matching per [§ 17](https://www.w3.org/TR/selectors-4/#match-against-element).
pub mod matcher;
/// Selector parser per [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar).
pub mod parser;
/// Rule indexing by selective feature.
pub mod rule_set;
/// Selector data model per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Style rules.
pub mod style_rule;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

// Re-exports for convenience
pub use element::Element;
pub use invalidation::{InvalidationLists, InvalidationSet, InvalidationType, RuleInvalidationSet};
pub use matcher::{SelectorMatcher, SelectorMatchingContext};
pub use parser::{CSSParserContext, CSSSelectorParser, ParserMode, parse_selector_list};
pub use rule_set::{RuleData, RuleSet};
pub use selector::{
    AttributeMatchType, CSSSelector, DecodeError, MatchType, PseudoType, RelationType,
    SelectorList, SelectorRef,
};
pub use style_rule::{DeclarationHandle, StyleRule};
pub use tokenizer::{CSSToken, CSSTokenizer, TokenRange};

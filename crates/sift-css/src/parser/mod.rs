//! Selector parsing.

/// Parser configuration loaded by the host.
pub mod context;
/// [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar) and
/// [§ 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax).
pub mod selector_parser;

pub use context::{CSSParserContext, ParserMode};
pub use selector_parser::{CSSSelectorParser, ParserSelector, SelectorVector, parse_selector_list};

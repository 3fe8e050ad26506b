//! Parser configuration.

use serde::{Deserialize, Serialize};

/// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-origin)
///
/// The origin of the style sheet being parsed. User-agent sheets may use
/// internal pseudo-elements that author sheets may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParserMode {
    /// Author style sheets.
    #[default]
    Author,
    /// The user-agent style sheet.
    UserAgent,
}

/// Options for [`CSSSelectorParser`](super::CSSSelectorParser).
///
/// Deserializable with every field optional, so a host can embed it in its
/// own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CSSParserContext {
    /// Origin of the sheet.
    pub mode: ParserMode,
    /// Accept `:is()` and `:where()`.
    pub enable_is_where: bool,
    /// How deeply selector lists may nest inside functional pseudo-classes
    /// such as `:not(:is(...))`.
    pub max_nesting_depth: usize,
}

impl Default for CSSParserContext {
    fn default() -> Self {
        Self {
            mode: ParserMode::Author,
            enable_is_where: true,
            max_nesting_depth: 32,
        }
    }
}

impl CSSParserContext {
    /// Defaults for the user-agent style sheet.
    #[must_use]
    pub fn user_agent() -> Self {
        Self {
            mode: ParserMode::UserAgent,
            ..Self::default()
        }
    }
}

//! [CSSOM § 6.4.3 CSSStyleRule](https://drafts.csswg.org/cssom/#the-cssstylerule-interface)

use crate::parser::{CSSParserContext, parse_selector_list};
use crate::selector::{SelectorList, SelectorRef};

/// Opaque reference to a declaration block owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationHandle(pub usize);

/// A style rule: its selectors plus a handle to the declarations they
/// apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    selectors: SelectorList,
    declarations: Option<DeclarationHandle>,
}

impl StyleRule {
    /// A rule over an already parsed selector list.
    #[must_use]
    pub const fn new(selectors: SelectorList, declarations: Option<DeclarationHandle>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    /// Parse `selector_text` and wrap it. The rule's selector list is empty
    /// when the text is invalid.
    #[must_use]
    pub fn parse(
        selector_text: &str,
        declarations: Option<DeclarationHandle>,
        context: &CSSParserContext,
    ) -> Self {
        Self::new(parse_selector_list(selector_text, context), declarations)
    }

    /// The rule's selectors.
    #[must_use]
    pub const fn selector_list(&self) -> &SelectorList {
        &self.selectors
    }

    /// The first alternative, if the rule is valid.
    #[must_use]
    pub fn first_selector(&self) -> Option<SelectorRef<'_>> {
        self.selectors.first()
    }

    /// The declaration block.
    #[must_use]
    pub const fn declarations(&self) -> Option<DeclarationHandle> {
        self.declarations
    }
}

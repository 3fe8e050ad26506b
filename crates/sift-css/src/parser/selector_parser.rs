//! Selector parser.
//!
//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! ```text
//! <complex-selector-list> = <complex-selector>#
//! <complex-selector> = <compound-selector> [ <combinator>? <compound-selector> ]*
//! <compound-selector> = [ <type-selector>? <subclass-selector>*
//!                         [ <pseudo-element-selector> <pseudo-class-selector>* ]* ]!
//! ```
//!
//! Parsing is all-or-nothing: any grammar or legality violation anywhere in a
//! comma-separated list yields an empty [`SelectorVector`], and the caller
//! drops the whole rule.

use sift_common::warning::warn_once;

use super::context::CSSParserContext;
use crate::selector::list::mark_positions;
use crate::selector::{
    AttributeMatchType, CSSSelector, MatchType, PseudoType, RelationType, SelectorData,
    SelectorList,
};
use crate::tokenizer::{CSSToken, CSSTokenizer, HashType, NumericSign, NumericType, TokenRange};

/// One complex selector under construction, in storage order: rightmost
/// compound first, simple selectors of a compound left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParserSelector {
    selectors: Vec<CSSSelector>,
}

/// The parser's output: one [`ParserSelector`] per comma-separated
/// alternative. Empty means the rule is invalid.
pub type SelectorVector = Vec<ParserSelector>;

impl ParserSelector {
    fn new(selector: CSSSelector) -> Self {
        Self {
            selectors: vec![selector],
        }
    }

    /// Number of simple selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether no simple selector has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// The simple selectors in storage order.
    #[must_use]
    pub fn as_slice(&self) -> &[CSSSelector] {
        &self.selectors
    }

    fn first(&self) -> Option<&CSSSelector> {
        self.selectors.first()
    }

    /// Chain `history` after this selector, joined by `relation`.
    fn append_tag_history(&mut self, relation: RelationType, mut history: Self) {
        if let Some(end) = self.selectors.last_mut() {
            end.set_relation(relation);
        }
        self.selectors.append(&mut history.selectors);
    }

    fn prepend_tag_selector(&mut self, tag: CSSSelector) {
        self.selectors.insert(0, tag);
    }

    fn has_pseudo_element(&self) -> bool {
        self.selectors
            .iter()
            .any(|selector| selector.match_type() == MatchType::PseudoElement)
    }

    fn needs_implicit_shadow_combinator(&self) -> bool {
        self.first()
            .is_some_and(CSSSelector::needs_implicit_shadow_combinator)
    }

    /// Pseudo-elements hosted in a UA shadow tree (`::placeholder`) are
    /// matched against the pseudo-element node, not its owner, so the
    /// compound is split in two: `input::placeholder` becomes
    /// `::placeholder` joined by [`RelationType::UAShadow`] to `input`.
    fn split_at_implicit_shadow_crossing_combinator(mut self) -> Self {
        let Some(split) = self
            .selectors
            .iter()
            .skip(1)
            .position(CSSSelector::needs_implicit_shadow_combinator)
            .map(|offset| offset + 1)
        else {
            return self;
        };
        let remaining = Self {
            selectors: self.selectors.split_off(split),
        };
        let mut remaining = remaining.split_at_implicit_shadow_crossing_combinator();
        remaining.append_tag_history(RelationType::UAShadow, self);
        remaining
    }
}

/// Parse selector text into a [`SelectorList`], empty when invalid.
#[must_use]
pub fn parse_selector_list(text: &str, context: &CSSParserContext) -> SelectorList {
    let tokens = CSSTokenizer::tokenize_to_eof(text);
    let vector = CSSSelectorParser::parse_selector(TokenRange::new(&tokens), context);
    if vector.is_empty() {
        log::debug!("dropping rule with invalid selector {text:?}");
    }
    CSSSelectorParser::adopt_selector_vector(vector)
}

/// Selector parser state.
///
/// The associated functions [`parse_selector`](Self::parse_selector),
/// [`consume_an_plus_b`](Self::consume_an_plus_b) and the adoption helpers
/// are the public surface; an instance only lives for one parse.
#[derive(Debug)]
pub struct CSSSelectorParser<'c> {
    context: &'c CSSParserContext,
    /// Set by any violation that must invalidate the whole list even though
    /// the grammar could continue.
    failed_parsing: bool,
    disallow_pseudo_elements: bool,
    /// The pseudo-element of the compound being parsed, which restricts
    /// what may follow it.
    restricting_pseudo_element: PseudoType,
    nesting_depth: usize,
}

impl<'c> CSSSelectorParser<'c> {
    const fn new(context: &'c CSSParserContext) -> Self {
        Self {
            context,
            failed_parsing: false,
            disallow_pseudo_elements: false,
            restricting_pseudo_element: PseudoType::Unknown,
            nesting_depth: 0,
        }
    }

    /// [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#typedef-complex-selector-list)
    ///
    /// Parse a `<complex-selector-list>`. Leading whitespace is skipped;
    /// anything left over after the list makes the result empty.
    #[must_use]
    pub fn parse_selector(mut range: TokenRange<'_>, context: &CSSParserContext) -> SelectorVector {
        let mut parser = CSSSelectorParser::new(context);
        range.consume_whitespace();
        let result = parser.consume_complex_selector_list(&mut range);
        if !range.at_end() {
            return SelectorVector::new();
        }
        result
    }

    /// Parse selector text directly.
    #[must_use]
    pub fn parse_selector_text(text: &str, context: &CSSParserContext) -> SelectorVector {
        let tokens = CSSTokenizer::tokenize_to_eof(text);
        Self::parse_selector(TokenRange::new(&tokens), context)
    }

    /// Number of [`CSSSelector`]s the flattened form of `vector` occupies.
    #[must_use]
    pub fn flattened_size(vector: &[ParserSelector]) -> usize {
        vector.iter().map(ParserSelector::len).sum()
    }

    /// Flatten `vector` into a new [`SelectorList`].
    #[must_use]
    pub fn adopt_selector_vector(vector: SelectorVector) -> SelectorList {
        let mut selectors = Vec::with_capacity(Self::flattened_size(&vector));
        let mut ends = Vec::with_capacity(vector.len());
        for complex in vector {
            selectors.extend(complex.selectors);
            ends.push(selectors.len());
        }
        mark_positions(&mut selectors, &ends);
        SelectorList::from(selectors.into_boxed_slice())
    }

    /// Flatten `vector` into `dest`, which must be exactly
    /// [`flattened_size`](Self::flattened_size) long. Returns false, leaving
    /// `dest` untouched, on a size mismatch.
    #[must_use]
    pub fn adopt_selector_vector_into(vector: SelectorVector, dest: &mut [CSSSelector]) -> bool {
        if dest.len() != Self::flattened_size(&vector) {
            return false;
        }
        let mut ends = Vec::with_capacity(vector.len());
        let mut index = 0;
        for complex in vector {
            for selector in complex.selectors {
                dest[index] = selector;
                index += 1;
            }
            ends.push(index);
        }
        mark_positions(dest, &ends);
        true
    }

    fn consume_complex_selector_list(&mut self, range: &mut TokenRange<'_>) -> SelectorVector {
        let mut selector_list = SelectorVector::new();
        let Some(selector) = self.consume_complex_selector(range) else {
            return SelectorVector::new();
        };
        selector_list.push(selector);
        while !range.at_end() && matches!(range.peek(), CSSToken::Comma) {
            let _ = range.consume_including_whitespace();
            let Some(selector) = self.consume_complex_selector(range) else {
                return SelectorVector::new();
            };
            selector_list.push(selector);
        }

        if self.failed_parsing {
            return SelectorVector::new();
        }
        selector_list
    }

    fn consume_nested_selector_list(&mut self, range: &mut TokenRange<'_>) -> SelectorList {
        let result = self.consume_complex_selector_list(range);
        if result.is_empty() {
            return SelectorList::empty();
        }
        Self::adopt_selector_vector(result)
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// Compounds are consumed left to right, and each newly consumed
    /// compound becomes the head of the chain, so the finished selector
    /// starts at its rightmost compound.
    fn consume_complex_selector(&mut self, range: &mut TokenRange<'_>) -> Option<ParserSelector> {
        let mut selector = self.consume_compound_selector(range)?;
        let mut previous_has_pseudo_element = selector.has_pseudo_element();

        while let Some(combinator) = Self::consume_combinator(range) {
            let Some(mut next_selector) = self.consume_compound_selector(range) else {
                // Trailing whitespace is not a combinator.
                return (combinator == RelationType::Descendant).then_some(selector);
            };
            // [§ 3.6.1](https://www.w3.org/TR/selectors-4/#pseudo-element-structure)
            // "A pseudo-element may be immediately followed by any combination
            // of the user action pseudo-classes", but never by a combinator.
            if previous_has_pseudo_element {
                return None;
            }
            previous_has_pseudo_element = next_selector.has_pseudo_element();
            next_selector.append_tag_history(combinator, selector);
            selector = next_selector;
        }

        Some(selector)
    }

    fn consume_combinator(range: &mut TokenRange<'_>) -> Option<RelationType> {
        let mut fallback = None;
        while range.peek().is_whitespace() {
            let _ = range.consume();
            fallback = Some(RelationType::Descendant);
        }

        let relation = match range.peek() {
            CSSToken::Delim('+') => RelationType::DirectAdjacent,
            CSSToken::Delim('~') => RelationType::IndirectAdjacent,
            CSSToken::Delim('>') => RelationType::Child,
            _ => return fallback,
        };
        let _ = range.consume_including_whitespace();
        Some(relation)
    }

    fn consume_compound_selector(&mut self, range: &mut TokenRange<'_>) -> Option<ParserSelector> {
        let saved = self.restricting_pseudo_element;
        let result = self.consume_compound_selector_inner(range);
        self.restricting_pseudo_element = saved;
        result
    }

    fn consume_compound_selector_inner(
        &mut self,
        range: &mut TokenRange<'_>,
    ) -> Option<ParserSelector> {
        // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
        // Type selectors match ASCII case-insensitively in HTML.
        let element_name = self
            .consume_type_name(range)
            .map(|name| name.to_ascii_lowercase());

        let mut compound = None;
        if element_name.is_none() {
            let simple = self.consume_simple_selector(range)?;
            self.note_pseudo_element(&simple);
            compound = Some(simple);
        }

        while let Some(simple) = self.consume_simple_selector(range) {
            self.note_pseudo_element(&simple);
            match compound.as_mut() {
                Some(compound) => compound.append_tag_history(RelationType::SubSelector, simple),
                None => compound = Some(simple),
            }
        }

        let Some(mut compound) = compound else {
            return element_name.map(|name| ParserSelector::new(CSSSelector::tag(name, false)));
        };
        Self::prepend_type_selector_if_needed(element_name, &mut compound);
        Some(compound.split_at_implicit_shadow_crossing_combinator())
    }

    fn note_pseudo_element(&mut self, simple: &ParserSelector) {
        if let Some(selector) = simple.first()
            && selector.match_type() == MatchType::PseudoElement
        {
            self.restricting_pseudo_element = selector.pseudo_type();
        }
    }

    /// A type selector is only stored when it restricts the match, or when
    /// a UA-shadow pseudo-element needs something to hang its relation on.
    fn prepend_type_selector_if_needed(element_name: Option<String>, compound: &mut ParserSelector) {
        let needs_shadow = compound.needs_implicit_shadow_combinator();
        if element_name.is_none() && !needs_shadow {
            return;
        }
        let tag = element_name.unwrap_or_else(|| "*".to_owned());
        if tag != "*" || needs_shadow {
            let implicit = tag == "*";
            compound.prepend_tag_selector(CSSSelector::tag(tag, implicit));
        }
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// `<type-selector> = <wq-name> | <ns-prefix>? '*'`. Namespaces are not
    /// supported, so any `|` here fails the rule.
    fn consume_type_name(&mut self, range: &mut TokenRange<'_>) -> Option<String> {
        let name = match range.peek() {
            CSSToken::Ident(name) => name.clone(),
            CSSToken::Delim('*') => "*".to_owned(),
            CSSToken::Delim('|') => {
                self.failed_parsing = true;
                return None;
            }
            _ => return None,
        };
        let _ = range.consume();
        if range.peek().is_delim('|') {
            self.failed_parsing = true;
        }
        Some(name)
    }

    /// [§ 6.1](https://www.w3.org/TR/selectors-4/#attribute-representation)
    ///
    /// `<wq-name> = <ns-prefix>? <ident-token>`. A namespace prefix is
    /// accepted and ignored.
    fn consume_attribute_name(block: &mut TokenRange<'_>) -> Option<String> {
        let name = match block.peek() {
            CSSToken::Ident(name) => {
                let _ = block.consume();
                name.clone()
            }
            CSSToken::Delim('*') => {
                let _ = block.consume();
                "*".to_owned()
            }
            CSSToken::Delim('|') => String::new(),
            _ => return None,
        };
        // `|=` after the name is the dash-match operator, not a namespace.
        if !block.peek().is_delim('|') || block.peek_at(1).is_delim('=') {
            return (!name.is_empty()).then_some(name);
        }

        let name = match block.peek_at(1) {
            CSSToken::Ident(name) => name.clone(),
            CSSToken::Delim('*') => "*".to_owned(),
            _ => return None,
        };
        let _ = block.consume();
        let _ = block.consume();
        Some(name)
    }

    fn consume_simple_selector(&mut self, range: &mut TokenRange<'_>) -> Option<ParserSelector> {
        let selector = match range.peek() {
            CSSToken::Hash { .. } => Self::consume_id(range),
            CSSToken::Delim('.') => Self::consume_class(range),
            CSSToken::LeftBracket => self.consume_attribute(range),
            CSSToken::Colon => self.consume_pseudo(range),
            _ => return None,
        };
        let valid = selector.as_ref().is_some_and(|selector| {
            selector.first().is_some_and(|simple| {
                is_simple_selector_valid_after_pseudo_element(
                    simple,
                    self.restricting_pseudo_element,
                )
            })
        });
        if !valid {
            self.failed_parsing = true;
        }
        selector
    }

    /// [§ 6.7 ID selectors](https://www.w3.org/TR/selectors-4/#id-selectors)
    fn consume_id(range: &mut TokenRange<'_>) -> Option<ParserSelector> {
        let CSSToken::Hash {
            value,
            hash_type: HashType::Id,
        } = range.peek()
        else {
            return None;
        };
        let _ = range.consume();
        Some(ParserSelector::new(CSSSelector::new(MatchType::Id, value.clone())))
    }

    /// [§ 6.6 Class selectors](https://www.w3.org/TR/selectors-4/#class-html)
    fn consume_class(range: &mut TokenRange<'_>) -> Option<ParserSelector> {
        let _ = range.consume();
        let CSSToken::Ident(value) = range.peek() else {
            return None;
        };
        let _ = range.consume();
        Some(ParserSelector::new(CSSSelector::new(MatchType::Class, value.clone())))
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn consume_attribute(&mut self, range: &mut TokenRange<'_>) -> Option<ParserSelector> {
        let mut block = range.consume_block();
        block.consume_whitespace();

        // Universal attribute names (`[*]`, `[*|*]`) are not selectors.
        let name = Self::consume_attribute_name(&mut block)?;
        if name.is_empty() || name == "*" {
            return None;
        }
        block.consume_whitespace();

        // [§ 6.3](https://www.w3.org/TR/selectors-4/#attribute-case)
        // Attribute names are ASCII case-insensitive in HTML.
        let name = name.to_ascii_lowercase();

        if block.at_end() {
            return Some(ParserSelector::new(CSSSelector::attribute(
                MatchType::AttributeSet,
                name,
                "",
                AttributeMatchType::CaseSensitive,
            )));
        }

        let match_type = self.consume_attribute_match(&mut block);

        let value = match block.consume_including_whitespace() {
            CSSToken::Ident(value) | CSSToken::String(value) => value.clone(),
            _ => return None,
        };
        let case = self.consume_attribute_flags(&mut block);
        if !block.at_end() {
            return None;
        }

        Some(ParserSelector::new(CSSSelector::attribute(
            match_type, name, value, case,
        )))
    }

    fn consume_attribute_match(&mut self, block: &mut TokenRange<'_>) -> MatchType {
        let match_type = match block.consume() {
            CSSToken::Delim('=') => MatchType::AttributeExact,
            CSSToken::Delim(prefix @ ('~' | '|' | '^' | '$' | '*'))
                if block.peek().is_delim('=') =>
            {
                let _ = block.consume();
                match *prefix {
                    '~' => MatchType::AttributeList,
                    '|' => MatchType::AttributeHyphen,
                    '^' => MatchType::AttributeBegin,
                    '$' => MatchType::AttributeEnd,
                    _ => MatchType::AttributeContain,
                }
            }
            _ => {
                self.failed_parsing = true;
                MatchType::AttributeExact
            }
        };
        block.consume_whitespace();
        match_type
    }

    fn consume_attribute_flags(&mut self, block: &mut TokenRange<'_>) -> AttributeMatchType {
        let CSSToken::Ident(flag) = block.peek() else {
            return AttributeMatchType::CaseSensitive;
        };
        let _ = block.consume_including_whitespace();
        if flag.eq_ignore_ascii_case("i") {
            AttributeMatchType::CaseInsensitive
        } else if flag.eq_ignore_ascii_case("s") {
            AttributeMatchType::CaseSensitiveAlways
        } else {
            self.failed_parsing = true;
            AttributeMatchType::CaseSensitive
        }
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    fn consume_pseudo(&mut self, range: &mut TokenRange<'_>) -> Option<ParserSelector> {
        let _ = range.consume();
        let mut colons = 1;
        if matches!(range.peek(), CSSToken::Colon) {
            let _ = range.consume();
            colons += 1;
        }

        let (name, has_arguments) = match range.peek() {
            CSSToken::Ident(name) => (name, false),
            CSSToken::Function(name) => (name, true),
            _ => return None,
        };

        let written_as = if colons == 1 {
            MatchType::PseudoClass
        } else {
            MatchType::PseudoElement
        };
        let value = name.to_ascii_lowercase();
        let (match_type, pseudo_type) =
            PseudoType::from_name(&value, has_arguments).resolve(written_as, self.context.mode);

        if match_type == MatchType::PseudoElement && self.disallow_pseudo_elements {
            return None;
        }

        if !has_arguments {
            let _ = range.consume();
            if pseudo_type == PseudoType::Unknown {
                warn_unknown_pseudo(colons, &value);
                return None;
            }
            return Some(ParserSelector::new(CSSSelector::pseudo(
                match_type,
                pseudo_type,
                value,
            )));
        }

        let mut block = range.consume_block();
        block.consume_whitespace();
        if pseudo_type == PseudoType::Unknown {
            warn_unknown_pseudo(colons, &value);
            return None;
        }

        let data = match pseudo_type {
            PseudoType::Not | PseudoType::Is | PseudoType::Where => {
                if pseudo_type != PseudoType::Not && !self.context.enable_is_where {
                    return None;
                }
                let list = self.consume_pseudo_selector_list(&mut block)?;
                SelectorData::List(list)
            }
            PseudoType::Dir | PseudoType::Lang => {
                let CSSToken::Ident(argument) = block.consume_including_whitespace() else {
                    return None;
                };
                if !block.at_end() {
                    return None;
                }
                SelectorData::Argument(argument.clone())
            }
            pseudo if pseudo.is_nth() => {
                let (a, b) = Self::consume_an_plus_b(&mut block)?;
                block.consume_whitespace();
                if !block.at_end() {
                    return None;
                }
                SelectorData::Nth { a, b }
            }
            _ => return None,
        };

        let mut selector = CSSSelector::pseudo(match_type, pseudo_type, value);
        selector.set_data(data);
        Some(ParserSelector::new(selector))
    }

    /// The argument of `:not()`, `:is()` or `:where()`: a selector list
    /// without pseudo-elements.
    fn consume_pseudo_selector_list(&mut self, block: &mut TokenRange<'_>) -> Option<SelectorList> {
        if self.nesting_depth >= self.context.max_nesting_depth {
            self.failed_parsing = true;
            return None;
        }
        let saved_disallow = self.disallow_pseudo_elements;
        self.disallow_pseudo_elements = true;
        self.nesting_depth += 1;
        let list = self.consume_nested_selector_list(block);
        self.nesting_depth -= 1;
        self.disallow_pseudo_elements = saved_disallow;

        (list.is_valid() && block.at_end()).then_some(list)
    }

    /// [§ 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
    ///
    /// Consume an `An+B` expression and return `(a, b)`. Coefficients too
    /// large for an `i32` saturate. Returns `None` on any grammar violation.
    pub fn consume_an_plus_b(range: &mut TokenRange<'_>) -> Option<(i32, i32)> {
        let token = range.consume();

        // STEP 1: Forms without an `n`.
        match token {
            CSSToken::Number {
                value,
                numeric_type: NumericType::Integer,
                ..
            } => return Some((0, clamp_to_i32(*value))),
            CSSToken::Ident(ident) if ident.eq_ignore_ascii_case("odd") => return Some((2, 1)),
            CSSToken::Ident(ident) if ident.eq_ignore_ascii_case("even") => return Some((2, 0)),
            _ => {}
        }

        // STEP 2: Split off `a` and the token text starting at `n`.
        //
        // "+n" arrives as a delim followed by an ident, "3n" as a dimension
        // whose unit starts with `n`, and "-n" as a single ident.
        let (a, n_string) = match token {
            CSSToken::Delim('+') => match range.peek() {
                CSSToken::Ident(ident) => {
                    let _ = range.consume();
                    (1, ident.as_str())
                }
                _ => return None,
            },
            CSSToken::Dimension {
                value,
                numeric_type: NumericType::Integer,
                unit,
                ..
            } => (clamp_to_i32(*value), unit.as_str()),
            CSSToken::Ident(ident) => match ident.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, ident.as_str()),
            },
            _ => return None,
        };
        range.consume_whitespace();

        let mut chars = n_string.chars();
        if !chars.next().is_some_and(|c| c.eq_ignore_ascii_case(&'n')) {
            return None;
        }
        let after_n = chars.as_str();
        if !after_n.is_empty() && !after_n.starts_with('-') {
            return None;
        }

        // STEP 3: "n-5" lexes as one token; its tail is `b`.
        if after_n.len() > 1 {
            return after_n.parse::<i32>().ok().map(|b| (a, b));
        }

        // STEP 4: Otherwise `b` is a separate, optionally signed, integer.
        let mut sign = if after_n.is_empty() {
            NumericSign::NoSign
        } else {
            NumericSign::Minus
        };

        if sign == NumericSign::NoSign
            && let CSSToken::Delim(delim) = range.peek()
        {
            sign = match *delim {
                '+' => NumericSign::Plus,
                '-' => NumericSign::Minus,
                _ => return None,
            };
            let _ = range.consume_including_whitespace();
        }

        if sign == NumericSign::NoSign && !matches!(range.peek(), CSSToken::Number { .. }) {
            return Some((a, 0));
        }

        let CSSToken::Number {
            value,
            numeric_type: NumericType::Integer,
            sign: written_sign,
            ..
        } = range.consume()
        else {
            return None;
        };
        // Exactly one sign, either separated (`n - 5`) or attached (`n -5`).
        if (*written_sign == NumericSign::NoSign) == (sign == NumericSign::NoSign) {
            return None;
        }

        let b = clamp_to_i32(*value);
        let b = if sign == NumericSign::Minus {
            b.checked_neg().unwrap_or(i32::MAX)
        } else {
            b
        };
        Some((a, b))
    }
}

/// [§ 3.6.3](https://www.w3.org/TR/selectors-4/#pseudo-element-states)
///
/// After a pseudo-element, only `:not()` may still appear in the compound.
fn is_simple_selector_valid_after_pseudo_element(
    simple: &CSSSelector,
    restricting_pseudo_element: PseudoType,
) -> bool {
    if restricting_pseudo_element == PseudoType::Unknown {
        return true;
    }
    simple.match_type() == MatchType::PseudoClass && simple.pseudo_type() == PseudoType::Not
}

fn warn_unknown_pseudo(colons: usize, name: &str) {
    let prefix = if colons == 1 { ":" } else { "::" };
    warn_once("CSS", &format!("unsupported pseudo selector '{prefix}{name}'"));
}

#[allow(clippy::cast_possible_truncation)]
fn clamp_to_i32(value: f64) -> i32 {
    value.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

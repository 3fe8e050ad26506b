//! A restartable view over a token sequence.
//!
//! The selector grammar needs to descend into nested blocks (`:not(...)`,
//! `[attr=value]`, `:nth-child(...)`) and hand the inner tokens to another
//! consumer. A [`TokenRange`] is a borrowed slice that can be copied, peeked,
//! consumed from the front and split into sub-ranges without touching the
//! underlying tokens.
//!
//! [`CSSToken::Comment`] tokens are invisible to every operation on a range.

use core::ops::Range;

use super::token::CSSToken;

/// Returned by [`TokenRange::peek`] and [`TokenRange::consume`] once the
/// range is exhausted.
static EOF_TOKEN: CSSToken = CSSToken::EOF;

/// A cheap, copyable view over a slice of [`CSSToken`]s.
#[derive(Debug, Clone, Copy)]
pub struct TokenRange<'a> {
    tokens: &'a [CSSToken],
}

impl<'a> TokenRange<'a> {
    /// Create a range over `tokens`. A trailing [`CSSToken::EOF`] (as produced
    /// by [`CSSTokenizer::tokenize_to_eof`](super::CSSTokenizer::tokenize_to_eof))
    /// is not part of the range.
    #[must_use]
    pub fn new(tokens: &'a [CSSToken]) -> Self {
        let tokens = match tokens.split_last() {
            Some((CSSToken::EOF, rest)) => rest,
            _ => tokens,
        };
        Self { tokens }
    }

    /// Returns true when no significant token is left.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.peek().is_eof()
    }

    /// The next significant token, or EOF.
    #[must_use]
    pub fn peek(&self) -> &'a CSSToken {
        self.peek_at(0)
    }

    /// The significant token `offset` positions ahead, or EOF.
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> &'a CSSToken {
        self.tokens
            .iter()
            .filter(|token| !token.is_comment())
            .nth(offset)
            .unwrap_or(&EOF_TOKEN)
    }

    /// Consume and return the next significant token. Returns EOF, without
    /// advancing, once the range is exhausted.
    pub fn consume(&mut self) -> &'a CSSToken {
        self.skip_comments();
        match self.tokens.split_first() {
            Some((first, rest)) => {
                self.tokens = rest;
                first
            }
            None => &EOF_TOKEN,
        }
    }

    /// Consume the next token and any whitespace after it.
    pub fn consume_including_whitespace(&mut self) -> &'a CSSToken {
        let token = self.consume();
        self.consume_whitespace();
        token
    }

    /// Skip over whitespace (and comments).
    pub fn consume_whitespace(&mut self) {
        while let Some((first, rest)) = self.tokens.split_first() {
            if !first.is_whitespace() && !first.is_comment() {
                break;
            }
            self.tokens = rest;
        }
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Consume a whole block (a `<function-token>`, `[`, `(` or `{` up to
    /// its matching close token) and return the range of tokens inside it.
    /// An unterminated block runs to the end of the range.
    ///
    /// If the next token does not open a block, nothing is consumed and an
    /// empty range is returned.
    pub fn consume_block(&mut self) -> Self {
        self.skip_comments();
        let Some((first, rest)) = self.tokens.split_first() else {
            return Self { tokens: &[] };
        };
        if !first.is_block_start() {
            return Self { tokens: &[] };
        }

        let mut depth = 1_usize;
        for (index, token) in rest.iter().enumerate() {
            if token.is_block_start() {
                depth += 1;
            } else if token.is_block_end() {
                depth -= 1;
                if depth == 0 {
                    self.tokens = &rest[index + 1..];
                    return Self {
                        tokens: &rest[..index],
                    };
                }
            }
        }

        self.tokens = &[];
        Self { tokens: rest }
    }

    /// A sub-range covering `range` (indices into the remaining raw tokens,
    /// comments included). Returns `None` when `range` is out of bounds.
    #[must_use]
    pub fn make_sub_range(&self, range: Range<usize>) -> Option<Self> {
        self.tokens.get(range).map(|tokens| Self { tokens })
    }

    /// The remaining raw tokens, comments included.
    #[must_use]
    pub const fn remaining(&self) -> &'a [CSSToken] {
        self.tokens
    }

    fn skip_comments(&mut self) {
        while let Some((first, rest)) = self.tokens.split_first() {
            if !first.is_comment() {
                break;
            }
            self.tokens = rest;
        }
    }
}

//! Class diagram lexer
//!
//! Splits notation text into [`TokenPosition`]s using a [`TokenCatalog`].
//! Lexing never fails: text no matcher recognizes becomes [`Token::RawText`]
//! and the grammar reports it.

use tracing::{debug, span, trace, Level};

use super::token::{Token, TokenCatalog, TokenPosition};

/// Lexer over a token catalog
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    catalog: TokenCatalog,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: TokenCatalog) -> Self {
        Self { catalog }
    }

    /// Tokenize `text` into positions that cover every byte exactly once
    pub fn tokenize(&self, text: &str) -> Vec<TokenPosition> {
        let tokenize_span = span!(Level::TRACE, "tokenize", bytes = text.len());
        let _enter = tokenize_span.enter();

        let mut positions = Vec::new();
        let mut offset = 0;

        while offset < text.len() {
            let rest = &text[offset..];
            match self.catalog.best_match(rest) {
                Some((token, len)) => {
                    positions.push(TokenPosition::new(offset, len, token));
                    offset += len;
                }
                None => {
                    let len = self.unrecognized_len(rest);
                    trace!(offset, len, "unrecognized text");
                    positions.push(TokenPosition::new(offset, len, Token::RawText));
                    offset += len;
                }
            }
        }

        debug!(tokens = positions.len(), bytes = text.len(), "tokenized input");
        positions
    }

    /// Widen the window one character at a time until a matcher fires again
    fn unrecognized_len(&self, rest: &str) -> usize {
        for (idx, _) in rest.char_indices().skip(1) {
            if self.catalog.best_match(&rest[idx..]).is_some() {
                return idx;
            }
        }
        rest.len()
    }
}

/// Tokenize with the class diagram catalog
pub fn tokenize(text: &str) -> Vec<TokenPosition> {
    Lexer::new().tokenize(text)
}

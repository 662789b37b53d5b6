//! Forward-only cursor over one page's token sequence.

use crate::token::Token;

/// Returned by [`PageCursor::current`] before the first advance.
static START: Token = Token {
    text: String::new(),
    x: 0.0,
    y: 0.0,
};

/// Lookahead-1 cursor over a page's tokens.
///
/// `advance` consumes the next token; `current` is the token most recently
/// consumed, or a zero-valued sentinel before the first advance. Strictly
/// forward and non-restartable, with a single page lifetime. Scans that run
/// out of tokens while still expecting structure turn the `None` from
/// `advance` into a page-level error.
#[derive(Debug)]
pub struct PageCursor<'a> {
    tokens: &'a [Token],
    next: usize,
}

impl<'a> PageCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, next: 0 }
    }

    /// Consume and return the next token, or `None` once the page is
    /// exhausted.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.next)?;
        self.next += 1;
        Some(token)
    }

    /// The token most recently returned by [`advance`](Self::advance).
    pub fn current(&self) -> &'a Token {
        match self.next {
            0 => &START,
            n => &self.tokens[n - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new("a", 1.0, 1.0),
            Token::new("b", 2.0, 1.0),
            Token::new("c", 3.0, 1.0),
        ]
    }

    #[test]
    fn test_current_before_first_advance_is_sentinel() {
        let tokens = tokens();
        let cursor = PageCursor::new(&tokens);
        let current = cursor.current();
        assert_eq!(current.text, "");
        assert_eq!(current.x, 0.0);
        assert_eq!(current.y, 0.0);
    }

    #[test]
    fn test_advance_walks_the_page_in_order() {
        let tokens = tokens();
        let mut cursor = PageCursor::new(&tokens);
        assert_eq!(cursor.advance().map(|t| t.text.as_str()), Some("a"));
        assert_eq!(cursor.advance().map(|t| t.text.as_str()), Some("b"));
        assert_eq!(cursor.advance().map(|t| t.text.as_str()), Some("c"));
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn test_current_tracks_last_consumed_token() {
        let tokens = tokens();
        let mut cursor = PageCursor::new(&tokens);
        cursor.advance();
        assert_eq!(cursor.current().text, "a");
        cursor.advance();
        assert_eq!(cursor.current().text, "b");
    }

    #[test]
    fn test_current_stays_on_last_token_after_exhaustion() {
        let tokens = tokens();
        let mut cursor = PageCursor::new(&tokens);
        while cursor.advance().is_some() {}
        assert_eq!(cursor.current().text, "c");
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.current().text, "c");
    }

    #[test]
    fn test_empty_page() {
        let mut cursor = PageCursor::new(&[]);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.current().text, "");
    }
}

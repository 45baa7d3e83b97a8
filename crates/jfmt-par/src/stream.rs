//! Token stream - indexable, peekable view over the lexer's output.
//!
//! The stream serves two consumers with different needs. Committed parsing
//! wants each comment surfaced exactly once so the parser can allocate a
//! node for it; speculative parsing (lambda-vs-cast, generics-vs-less-than)
//! wants cheap lookahead and an integer cursor it can save and rewind
//! without cloning anything.
//!
//! Lookahead (`peek`, `nth`) skips trivia. Consumption comes in two forms:
//! the parser's committed path first drains leading trivia through
//! [`TokenStream::take_leading_trivia`] (allocating comment nodes), then
//! calls [`TokenStream::consume`]; speculative scans call `consume`
//! directly — it skips trivia silently — and rewind to a [`Mark`]
//! afterwards, so the skipped comments are still surfaced by the later
//! committed pass.

use jfmt_lex::{Token, TokenKind};

/// A restorable cursor position. Plain integers; saving and restoring is
/// free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark {
    pos: usize,
    prev_end: u32,
}

/// Indexable, peekable token stream.
pub struct TokenStream {
    /// All tokens, trivia included, terminated by `Eof`.
    tokens: Vec<Token>,
    /// Raw index of the next unconsumed token.
    pos: usize,
    /// End offset of the most recently consumed significant token.
    prev_end: u32,
}

impl TokenStream {
    /// Wraps a token vector. The vector must end with `Eof`, which
    /// [`jfmt_lex::tokenize`] guarantees.
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        Self {
            tokens,
            pos: 0,
            prev_end: 0,
        }
    }

    /// First non-trivia index at or after `i`. Terminates because `Eof` is
    /// never trivia.
    fn skip_trivia_from(&self, mut i: usize) -> usize {
        while self.tokens[i].kind.is_trivia() {
            i += 1;
        }
        i
    }

    /// The next significant token (trivia skipped, not consumed).
    pub fn peek(&self) -> &Token {
        &self.tokens[self.skip_trivia_from(self.pos)]
    }

    /// Kind of the next significant token.
    #[inline]
    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// The `n`-th significant token ahead (`nth(0) == peek()`). Saturates
    /// at `Eof`.
    pub fn nth(&self, n: usize) -> &Token {
        let mut i = self.skip_trivia_from(self.pos);
        for _ in 0..n {
            if self.tokens[i].kind == TokenKind::Eof {
                break;
            }
            i = self.skip_trivia_from(i + 1);
        }
        &self.tokens[i]
    }

    /// Kind of the `n`-th significant token ahead.
    #[inline]
    pub fn nth_kind(&self, n: usize) -> TokenKind {
        self.nth(n).kind
    }

    /// Pops one trivia token sitting before the next significant token,
    /// or `None` once the next raw token is significant.
    pub fn take_leading_trivia(&mut self) -> Option<Token> {
        if self.tokens[self.pos].kind.is_trivia() {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;
            Some(token)
        } else {
            None
        }
    }

    /// Consumes and returns the next significant token, silently skipping
    /// any leading trivia. Does not advance past `Eof`.
    pub fn consume(&mut self) -> Token {
        let i = self.skip_trivia_from(self.pos);
        let token = self.tokens[i].clone();
        if token.kind == TokenKind::Eof {
            self.pos = i;
        } else {
            self.pos = i + 1;
            self.prev_end = token.end();
        }
        token
    }

    /// End offset of the most recently consumed significant token.
    #[inline]
    pub fn prev_end(&self) -> u32 {
        self.prev_end
    }

    /// True when the next significant token is `Eof`.
    pub fn at_eof(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// Saves the cursor.
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            prev_end: self.prev_end,
        }
    }

    /// Rewinds to a saved cursor.
    #[inline]
    pub fn rewind(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.prev_end = mark.prev_end;
    }
}

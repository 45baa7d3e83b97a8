//! Comment scanning.
//!
//! Comments are tokens, not skipped trivia: the formatter must see and
//! reposition them. Three classes exist — line comments, block comments,
//! and Javadoc comments (`/**`). Java block comments do not nest.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Scans a token starting with `/`: a comment, `/=`, or `/`.
    pub(crate) fn lex_slash(&mut self) -> Token {
        self.cursor.advance();

        if self.cursor.match_char('/') {
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                self.cursor.advance();
            }
            return self.make(TokenKind::LineComment);
        }

        if self.cursor.match_char('*') {
            // `/**` begins Javadoc unless it is the degenerate `/**/`.
            let javadoc =
                self.cursor.current_char() == '*' && self.cursor.peek_char(1) != '/';

            loop {
                if self.cursor.is_at_end() {
                    return self.error_token("unterminated block comment");
                }
                if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                    self.cursor.advance_bytes(2);
                    break;
                }
                self.cursor.advance();
            }

            return self.make(if javadoc {
                TokenKind::JavadocComment
            } else {
                TokenKind::BlockComment
            });
        }

        if self.cursor.match_char('=') {
            self.make(TokenKind::SlashEq)
        } else {
            self.make(TokenKind::Slash)
        }
    }
}

//! Character literal, string literal, and text block scanning.
//!
//! Escape sequences inside literals are consumed so that `\"` does not
//! close a string, but their content is preserved verbatim: the formatter
//! reproduces literal text byte for byte, so nothing is decoded here —
//! including `\uXXXX` forms, which the escape preprocessor deliberately
//! leaves alone inside literals.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Scans a string literal or text block starting at `"`.
    pub(crate) fn lex_string(&mut self) -> Token {
        if self.cursor.peek_char(1) == '"' && self.cursor.peek_char(2) == '"' {
            return self.lex_text_block();
        }

        self.cursor.advance(); // opening quote

        loop {
            if self.cursor.is_at_end() {
                return self.error_token("unterminated string literal");
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    return self.make(TokenKind::StringLiteral);
                },
                '\n' => {
                    return self.error_token("unterminated string literal");
                },
                '\\' => self.consume_literal_escape(),
                _ => self.cursor.advance(),
            }
        }
    }

    /// Scans a text block: `"""` through the first unescaped `"""`.
    ///
    /// The whole block is one `StringLiteral` token.
    fn lex_text_block(&mut self) -> Token {
        self.cursor.advance_bytes(3); // opening delimiter

        loop {
            if self.cursor.is_at_end() {
                return self.error_token("unterminated text block");
            }
            if self.cursor.current_char() == '\\' {
                self.consume_literal_escape();
                continue;
            }
            if self.cursor.current_char() == '"'
                && self.cursor.peek_char(1) == '"'
                && self.cursor.peek_char(2) == '"'
            {
                self.cursor.advance_bytes(3);
                return self.make(TokenKind::StringLiteral);
            }
            self.cursor.advance();
        }
    }

    /// Scans a character literal starting at `'`.
    pub(crate) fn lex_char(&mut self) -> Token {
        self.cursor.advance(); // opening quote

        match self.cursor.current_char() {
            '\0' if self.cursor.is_at_end() => {
                return self.error_token("unterminated character literal");
            },
            '\'' => {
                self.cursor.advance();
                return self.error_token("empty character literal");
            },
            '\n' => {
                return self.error_token("unterminated character literal");
            },
            '\\' => self.consume_literal_escape(),
            _ => self.cursor.advance(),
        }

        if self.cursor.match_char('\'') {
            return self.make(TokenKind::CharLiteral);
        }

        // More than one character, or missing closer. Scan to a closing
        // quote on the same line so recovery resumes cleanly.
        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                return self.error_token("unterminated character literal");
            }
            if self.cursor.match_char('\'') {
                return self.error_token("character literal may only contain one character");
            }
            if self.cursor.current_char() == '\\' {
                self.consume_literal_escape();
            } else {
                self.cursor.advance();
            }
        }
    }

    /// Consumes one escape sequence inside a literal without decoding it.
    ///
    /// Octal escapes take up to three digits, with a leading `0`-`3`
    /// permitting the full three (`\377` is the ceiling). Everything else
    /// — standard escapes, `\uXXXX`, even invalid escapes — consumes the
    /// backslash plus one character; any remaining characters are ordinary
    /// content.
    fn consume_literal_escape(&mut self) {
        self.cursor.advance(); // backslash
        match self.cursor.current_char() {
            'u' => {
                // `\uXXXX` spans the whole escape but stays undecoded.
                while self.cursor.current_char() == 'u' {
                    self.cursor.advance();
                }
                for _ in 0..4 {
                    if self.cursor.current_char().is_ascii_hexdigit() {
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
            },
            '0'..='7' => {
                let first = self.cursor.current_char();
                self.cursor.advance();
                let max_more = if ('0'..='3').contains(&first) { 2 } else { 1 };
                for _ in 0..max_more {
                    if ('0'..='7').contains(&self.cursor.current_char()) {
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
            },
            '\0' if self.cursor.is_at_end() => {},
            _ => self.cursor.advance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use jfmt_util::Handler;

    fn first(source: &str) -> Token {
        let handler = Handler::new();
        tokenize(source, &handler).into_iter().next().unwrap()
    }

    #[test]
    fn test_simple_string() {
        let token = first(r#""hello""#);
        assert_eq!(token.kind, TokenKind::StringLiteral);
        assert_eq!(token.original_text(r#""hello""#), r#""hello""#);
    }

    #[test]
    fn test_string_with_escapes() {
        let source = r#""line\n\ttab\"q\\""#;
        let token = first(source);
        assert_eq!(token.kind, TokenKind::StringLiteral);
        assert_eq!(token.original_text(source), source);
    }

    #[test]
    fn test_string_with_octal_escape() {
        let source = r#""\377\0\41""#;
        let token = first(source);
        assert_eq!(token.kind, TokenKind::StringLiteral);
        assert_eq!(token.original_text(source), source);
    }

    #[test]
    fn test_unterminated_string() {
        let handler = Handler::new();
        let tokens = tokenize("\"abc\nx", &handler);
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert!(handler.has_errors());
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }

    #[test]
    fn test_text_block() {
        let source = "\"\"\"\n  hello \"world\"\n  \"\"\"";
        let token = first(source);
        assert_eq!(token.kind, TokenKind::StringLiteral);
        assert_eq!(token.original_text(source), source);
    }

    #[test]
    fn test_text_block_with_escaped_quotes() {
        let source = "\"\"\"\n  \\\"\"\"inner\n\"\"\"";
        let token = first(source);
        assert_eq!(token.kind, TokenKind::StringLiteral);
        assert_eq!(token.end(), source.len() as u32);
    }

    #[test]
    fn test_unterminated_text_block() {
        let token = first("\"\"\"\nnever closed");
        assert_eq!(token.kind, TokenKind::Error);
    }

    #[test]
    fn test_char_literal() {
        assert_eq!(first("'a'").kind, TokenKind::CharLiteral);
        assert_eq!(first(r"'\n'").kind, TokenKind::CharLiteral);
        assert_eq!(first(r"'\''").kind, TokenKind::CharLiteral);
        assert_eq!(first(r"'\\'").kind, TokenKind::CharLiteral);
        assert_eq!(first(r"'\377'").kind, TokenKind::CharLiteral);
    }

    #[test]
    fn test_char_literal_unicode_escape_preserved() {
        // `A` inside a char literal is consumed but not decoded.
        let source = r"'\u0041'";
        let token = first(source);
        assert_eq!(token.kind, TokenKind::CharLiteral);
        assert_eq!(token.original_text(source), source);
        assert!(!token.has_escapes());
    }

    #[test]
    fn test_empty_char_literal() {
        assert_eq!(first("''").kind, TokenKind::Error);
    }

    #[test]
    fn test_multi_char_literal() {
        assert_eq!(first("'ab'").kind, TokenKind::Error);
    }

    #[test]
    fn test_unterminated_char_literal() {
        assert_eq!(first("'a\n").kind, TokenKind::Error);
    }
}

//! Identifier and keyword scanning.
//!
//! Identifiers are scanned on the *decoded* view of the source, so a
//! keyword spelled with Unicode escapes is still recognized as a keyword.
//! The token span always covers the original bytes; the decoded text is
//! only materialized when an escape was actually present (copy-on-decode).

use crate::cursor::Decoded;
use crate::token::{keyword_from_str, Token, TokenKind};
use crate::unicode::is_java_ident_part;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Scans an identifier or keyword starting at the current position.
    ///
    /// The caller has already established that the current position decodes
    /// to an identifier-start character.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        // Holds the decoded text once the first escape is seen; until then
        // the original slice is the decoded text.
        let mut decoded: Option<String> = None;

        loop {
            match self.cursor.decode_current() {
                Decoded::Raw(c) if is_java_ident_part(c) => {
                    if let Some(buf) = &mut decoded {
                        buf.push(c);
                    }
                    self.cursor.advance();
                },
                Decoded::Escape(c, len) if is_java_ident_part(c) => {
                    if decoded.is_none() {
                        decoded = Some(self.cursor.slice_from(self.token_start).to_string());
                    }
                    if let Some(buf) = &mut decoded {
                        buf.push(c);
                    }
                    self.cursor.advance_bytes(len);
                },
                _ => break,
            }
        }

        let kind = {
            let text: &str = decoded
                .as_deref()
                .unwrap_or_else(|| self.cursor.slice_from(self.token_start));
            keyword_from_str(text).unwrap_or(TokenKind::Ident)
        };

        match decoded {
            Some(text) => Token::with_decoded(
                kind,
                jfmt_util::Span::new(self.token_start as u32, self.cursor.position() as u32),
                text,
            ),
            None => self.make(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use jfmt_util::Handler;

    fn first_token(source: &str) -> Token {
        let handler = Handler::new();
        tokenize(source, &handler).into_iter().next().unwrap()
    }

    #[test]
    fn test_plain_identifier() {
        let token = first_token("widget");
        assert_eq!(token.kind, TokenKind::Ident);
        assert_eq!(token.decoded_text("widget"), "widget");
        assert!(!token.has_escapes());
    }

    #[test]
    fn test_dollar_and_underscore() {
        assert_eq!(first_token("$value").kind, TokenKind::Ident);
        assert_eq!(first_token("_tmp").kind, TokenKind::Ident);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(first_token("class").kind, TokenKind::Class);
        assert_eq!(first_token("instanceof").kind, TokenKind::Instanceof);
        assert_eq!(first_token("yield").kind, TokenKind::Yield);
        assert_eq!(first_token("var").kind, TokenKind::Var);
    }

    #[test]
    fn test_when_is_an_identifier() {
        assert_eq!(first_token("when").kind, TokenKind::Ident);
    }

    #[test]
    fn test_literal_words() {
        assert_eq!(first_token("true").kind, TokenKind::BoolLiteral);
        assert_eq!(first_token("false").kind, TokenKind::BoolLiteral);
        assert_eq!(first_token("null").kind, TokenKind::NullLiteral);
    }

    #[test]
    fn test_escaped_keyword_classifies() {
        let source = "\\u0070ublic";
        let token = first_token(source);
        assert_eq!(token.kind, TokenKind::Public);
        assert_eq!(token.original_text(source), "\\u0070ublic");
        assert_eq!(token.decoded_text(source), "public");
        assert_eq!(token.start(), 0);
        assert_eq!(token.end(), 11);
    }

    #[test]
    fn test_escape_in_identifier_middle() {
        let source = "na\\u006De";
        let token = first_token(source);
        assert_eq!(token.kind, TokenKind::Ident);
        assert_eq!(token.decoded_text(source), "name");
        assert_eq!(token.end(), 9);
    }

    #[test]
    fn test_unicode_identifier() {
        let token = first_token("変数");
        assert_eq!(token.kind, TokenKind::Ident);
    }

    #[test]
    fn test_identifier_stops_at_operator() {
        let handler = Handler::new();
        let tokens = tokenize("foo+bar", &handler);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Plus);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }
}

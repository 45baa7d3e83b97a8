//! Operator and punctuation scanning.
//!
//! The one deliberate asymmetry: `<<` and `<<=` are single tokens, but the
//! `>` family is never merged. `List<Map<K, V>>` needs the two closing
//! angles as separate tokens, so `>>`, `>>>`, `>>=`, and `>>>=` are glued
//! back together by the parser from adjacent `Gt`/`GtEq` tokens.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// `+` `+=` `++`
    pub(crate) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::PlusEq)
        } else if self.cursor.match_char('+') {
            self.make(TokenKind::PlusPlus)
        } else {
            self.make(TokenKind::Plus)
        }
    }

    /// `-` `-=` `--` `->`
    pub(crate) fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::MinusEq)
        } else if self.cursor.match_char('-') {
            self.make(TokenKind::MinusMinus)
        } else if self.cursor.match_char('>') {
            self.make(TokenKind::Arrow)
        } else {
            self.make(TokenKind::Minus)
        }
    }

    /// `*` `*=`
    pub(crate) fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::StarEq)
        } else {
            self.make(TokenKind::Star)
        }
    }

    /// `%` `%=`
    pub(crate) fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::PercentEq)
        } else {
            self.make(TokenKind::Percent)
        }
    }

    /// `=` `==`
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::EqEq)
        } else {
            self.make(TokenKind::Assign)
        }
    }

    /// `!` `!=`
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::NotEq)
        } else {
            self.make(TokenKind::Bang)
        }
    }

    /// `<` `<=` `<<` `<<=`
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::LtEq)
        } else if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                self.make(TokenKind::ShlEq)
            } else {
                self.make(TokenKind::Shl)
            }
        } else {
            self.make(TokenKind::Lt)
        }
    }

    /// `>` `>=` — and nothing longer; see the module docs.
    ///
    /// `>>=` therefore reaches the parser as `Gt GtEq`, and `>>>=` as
    /// `Gt Gt GtEq`; adjacency of the spans lets it reassemble them.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::GtEq)
        } else {
            self.make(TokenKind::Gt)
        }
    }

    /// `&` `&&` `&=`
    pub(crate) fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            self.make(TokenKind::AndAnd)
        } else if self.cursor.match_char('=') {
            self.make(TokenKind::AmpEq)
        } else {
            self.make(TokenKind::Amp)
        }
    }

    /// `|` `||` `|=`
    pub(crate) fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            self.make(TokenKind::OrOr)
        } else if self.cursor.match_char('=') {
            self.make(TokenKind::PipeEq)
        } else {
            self.make(TokenKind::Pipe)
        }
    }

    /// `^` `^=`
    pub(crate) fn lex_caret(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::CaretEq)
        } else {
            self.make(TokenKind::Caret)
        }
    }

    /// `:` `::`
    pub(crate) fn lex_colon(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char(':') {
            self.make(TokenKind::ColonColon)
        } else {
            self.make(TokenKind::Colon)
        }
    }

    /// `.` `...` or a fraction-only literal (`.5`)
    pub(crate) fn lex_dot(&mut self) -> Token {
        if self.cursor.peek_char(1).is_ascii_digit() {
            return self.lex_fraction();
        }
        self.cursor.advance();
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1) == '.' {
            self.cursor.advance_bytes(2);
            self.make(TokenKind::Ellipsis)
        } else {
            self.make(TokenKind::Dot)
        }
    }
}

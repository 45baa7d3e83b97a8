//! Numeric literal scanning.
//!
//! Java numeric literals come in decimal, hexadecimal (`0x`), binary
//! (`0b`), and octal (leading `0`) integer forms, and decimal and
//! hexadecimal floating-point forms. Underscores may separate digits but
//! may not touch a prefix, suffix, or decimal point. Hexadecimal floats
//! require a `p`/`P` exponent.
//!
//! The lexer classifies and spans literals; it never computes their values.
//! The formatter downstream reproduces the original text byte for byte, so
//! `0xABCD_EF` stays exactly as written.

use crate::token::{Token, TokenKind};
use crate::unicode::is_digit_in_base;
use crate::Lexer;

/// Result of scanning a run of digits and underscores.
struct DigitRun {
    /// At least one real digit was present.
    has_digit: bool,
    /// The run started or ended with an underscore.
    bad_underscore: bool,
}

impl<'a> Lexer<'a> {
    /// Scans a numeric literal beginning with a digit.
    pub(crate) fn lex_number(&mut self) -> Token {
        if self.cursor.current_char() == '0' {
            match self.cursor.peek_char(1) {
                'x' | 'X' => return self.lex_hex(),
                'b' | 'B' => return self.lex_binary(),
                _ => {},
            }
        }
        self.lex_decimal()
    }

    /// Scans a fractional-only literal (`.5`), entered from the dot
    /// dispatch with a digit known to follow.
    pub(crate) fn lex_fraction(&mut self) -> Token {
        self.cursor.advance(); // '.'
        let run = self.scan_digit_run(10);
        if run.bad_underscore {
            return self.error_token("underscores must separate digits");
        }
        if !self.scan_decimal_exponent() {
            return self.error_token("missing digits in exponent");
        }
        self.float_suffix_token()
    }

    fn lex_hex(&mut self) -> Token {
        self.cursor.advance_bytes(2); // 0x
        let digits = self.scan_digit_run(16);

        let c = self.cursor.current_char();
        if c == '.' || c == 'p' || c == 'P' {
            // Hexadecimal floating point: significand then mandatory
            // binary exponent.
            if self.cursor.match_char('.') {
                let frac = self.scan_digit_run(16);
                if !digits.has_digit && !frac.has_digit {
                    return self.error_token("missing digits in hexadecimal literal");
                }
            } else if !digits.has_digit {
                return self.error_token("missing digits after hexadecimal prefix");
            }

            if !matches!(self.cursor.current_char(), 'p' | 'P') {
                return self
                    .error_token("hexadecimal floating-point literal requires an exponent");
            }
            self.cursor.advance();
            if matches!(self.cursor.current_char(), '+' | '-') {
                self.cursor.advance();
            }
            let exp = self.scan_digit_run(10);
            if !exp.has_digit {
                return self.error_token("missing digits in hexadecimal exponent");
            }
            return self.float_suffix_token();
        }

        if !digits.has_digit {
            return self.error_token("missing digits after hexadecimal prefix");
        }
        if digits.bad_underscore {
            return self.error_token("underscores must separate digits");
        }
        self.integer_suffix_token()
    }

    fn lex_binary(&mut self) -> Token {
        self.cursor.advance_bytes(2); // 0b
        let digits = self.scan_digit_run(2);
        if !digits.has_digit {
            return self.error_token("missing digits after binary prefix");
        }
        if digits.bad_underscore {
            return self.error_token("underscores must separate digits");
        }
        if self.cursor.current_char().is_ascii_digit() {
            self.scan_digit_run(10);
            return self.error_token("invalid digit in binary literal");
        }
        self.integer_suffix_token()
    }

    fn lex_decimal(&mut self) -> Token {
        let run_start = self.cursor.position();
        let int_run = self.scan_digit_run(10);
        if int_run.bad_underscore {
            return self.error_token("underscores must separate digits");
        }

        match self.cursor.current_char() {
            '.' => {
                self.cursor.advance();
                let frac = self.scan_digit_run(10);
                if frac.bad_underscore {
                    return self.error_token("underscores must separate digits");
                }
                if !self.scan_decimal_exponent() {
                    return self.error_token("missing digits in exponent");
                }
                self.float_suffix_token()
            },
            'e' | 'E' => {
                if !self.scan_decimal_exponent() {
                    return self.error_token("missing digits in exponent");
                }
                self.float_suffix_token()
            },
            'f' | 'F' | 'd' | 'D' => self.float_suffix_token(),
            _ => {
                // Integer. A leading zero with more digits selects octal.
                let text = self.cursor.slice_from(run_start);
                if text.len() > 1 && text.starts_with('0') {
                    let valid = text[1..]
                        .chars()
                        .all(|c| c == '_' || is_digit_in_base(c, 8));
                    if !valid {
                        return self.error_token("invalid digit in octal literal");
                    }
                }
                self.integer_suffix_token()
            },
        }
    }

    /// Scans `[eE][+-]?digits`, returning false when the exponent marker
    /// was present but its digits were missing. No-op (true) without a
    /// marker.
    fn scan_decimal_exponent(&mut self) -> bool {
        if !matches!(self.cursor.current_char(), 'e' | 'E') {
            return true;
        }
        self.cursor.advance();
        if matches!(self.cursor.current_char(), '+' | '-') {
            self.cursor.advance();
        }
        self.scan_digit_run(10).has_digit
    }

    /// Consumes an optional `l`/`L` suffix and builds the integer token.
    fn integer_suffix_token(&mut self) -> Token {
        if matches!(self.cursor.current_char(), 'l' | 'L') {
            self.cursor.advance();
            self.make(TokenKind::LongLiteral)
        } else {
            self.make(TokenKind::IntLiteral)
        }
    }

    /// Consumes an optional float suffix and builds the token; a bare
    /// fractional or exponent form defaults to `double`.
    fn float_suffix_token(&mut self) -> Token {
        match self.cursor.current_char() {
            'f' | 'F' => {
                self.cursor.advance();
                self.make(TokenKind::FloatLiteral)
            },
            'd' | 'D' => {
                self.cursor.advance();
                self.make(TokenKind::DoubleLiteral)
            },
            _ => self.make(TokenKind::DoubleLiteral),
        }
    }

    /// Scans a run of digits-or-underscores in the given base.
    fn scan_digit_run(&mut self, base: u32) -> DigitRun {
        let mut has_digit = false;
        let mut first_underscore = false;
        let mut last_underscore = false;
        let mut first = true;

        loop {
            let c = self.cursor.current_char();
            if c == '_' {
                if first {
                    first_underscore = true;
                }
                last_underscore = true;
            } else if is_digit_in_base(c, base) {
                has_digit = true;
                last_underscore = false;
            } else {
                break;
            }
            first = false;
            self.cursor.advance();
        }

        DigitRun {
            has_digit,
            bad_underscore: first_underscore || last_underscore,
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

    fn first_kind(source: &str) -> TokenKind {
        first(source).kind
    }

    #[test]
    fn test_decimal_integers() {
        assert_eq!(first_kind("0"), TokenKind::IntLiteral);
        assert_eq!(first_kind("42"), TokenKind::IntLiteral);
        assert_eq!(first_kind("1_000_000"), TokenKind::IntLiteral);
    }

    #[test]
    fn test_long_suffix() {
        assert_eq!(first_kind("42L"), TokenKind::LongLiteral);
        assert_eq!(first_kind("0xFFl"), TokenKind::LongLiteral);
        assert_eq!(first_kind("0b1010L"), TokenKind::LongLiteral);
    }

    #[test]
    fn test_hex_integers() {
        assert_eq!(first_kind("0xFF"), TokenKind::IntLiteral);
        assert_eq!(first_kind("0xAB_CD"), TokenKind::IntLiteral);
        assert_eq!(first_kind("0X1f"), TokenKind::IntLiteral);
    }

    #[test]
    fn test_octal_integers() {
        assert_eq!(first_kind("0777"), TokenKind::IntLiteral);
        assert_eq!(first_kind("07_77"), TokenKind::IntLiteral);
    }

    #[test]
    fn test_invalid_octal_digit() {
        assert_eq!(first_kind("0778"), TokenKind::Error);
    }

    #[test]
    fn test_doubles() {
        assert_eq!(first_kind("3.14"), TokenKind::DoubleLiteral);
        assert_eq!(first_kind("1."), TokenKind::DoubleLiteral);
        assert_eq!(first_kind("1e10"), TokenKind::DoubleLiteral);
        assert_eq!(first_kind("2.5e-3"), TokenKind::DoubleLiteral);
        assert_eq!(first_kind("1d"), TokenKind::DoubleLiteral);
    }

    #[test]
    fn test_floats() {
        assert_eq!(first_kind("3.14f"), TokenKind::FloatLiteral);
        assert_eq!(first_kind("1F"), TokenKind::FloatLiteral);
        assert_eq!(first_kind("1e3f"), TokenKind::FloatLiteral);
    }

    #[test]
    fn test_fraction_only() {
        let handler = Handler::new();
        let tokens = tokenize(".5", &handler);
        assert_eq!(tokens[0].kind, TokenKind::DoubleLiteral);
        assert_eq!(tokens[0].original_text(".5"), ".5");
    }

    #[test]
    fn test_hex_float() {
        let source = "0x1.8p1";
        let token = first(source);
        assert_eq!(token.kind, TokenKind::DoubleLiteral);
        assert_eq!(token.original_text(source), "0x1.8p1");
    }

    #[test]
    fn test_hex_float_variants() {
        assert_eq!(first_kind("0x1p3"), TokenKind::DoubleLiteral);
        assert_eq!(first_kind("0x1.p1"), TokenKind::DoubleLiteral);
        assert_eq!(first_kind("0x.8p-2"), TokenKind::DoubleLiteral);
        assert_eq!(first_kind("0x1.8p1f"), TokenKind::FloatLiteral);
    }

    #[test]
    fn test_hex_float_requires_exponent() {
        assert_eq!(first_kind("0x1.8"), TokenKind::Error);
    }

    #[test]
    fn test_missing_hex_digits() {
        assert_eq!(first_kind("0x"), TokenKind::Error);
        assert_eq!(first_kind("0b"), TokenKind::Error);
    }

    #[test]
    fn test_bad_underscores() {
        assert_eq!(first_kind("1_"), TokenKind::Error);
        assert_eq!(first_kind("0x_1F"), TokenKind::Error);
    }

    #[test]
    fn test_missing_exponent_digits() {
        assert_eq!(first_kind("1e"), TokenKind::Error);
        assert_eq!(first_kind("1e+"), TokenKind::Error);
    }

    #[test]
    fn test_invalid_binary_digit() {
        assert_eq!(first_kind("0b102"), TokenKind::Error);
    }

    #[test]
    fn test_number_followed_by_dot_call_stays_float() {
        // `1.` is a double literal even when more source follows.
        let handler = Handler::new();
        let tokens = tokenize("1.;", &handler);
        assert_eq!(tokens[0].kind, TokenKind::DoubleLiteral);
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
    }
}

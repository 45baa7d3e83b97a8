//! Core lexer implementation.
//!
//! The lexer walks the source left to right and emits a token for every
//! syntactic element, comments included. Whitespace is the only thing it
//! drops. It never fails: malformed input becomes `Error` tokens (reported
//! through the diagnostic handler) and scanning continues after them.

use jfmt_util::{Handler, Span};

use crate::cursor::{Cursor, Decoded};
use crate::token::{Token, TokenKind};
use crate::unicode::is_java_ident_start;

/// Lexer for Java source text.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    pub(crate) cursor: Cursor<'a>,

    /// Diagnostic sink for lexical errors.
    pub(crate) handler: &'a Handler,

    /// Starting byte offset of the token being scanned.
    pub(crate) token_start: usize,

    /// Whether a leading byte-order mark has been checked for.
    bom_checked: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`, reporting errors to `handler`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            bom_checked: false,
        }
    }

    /// Returns the next token.
    ///
    /// Dispatches on the current character after skipping whitespace.
    /// Returns `Eof` (with an empty span at the end of the source) once the
    /// input is exhausted; callers may keep calling and will keep getting
    /// `Eof`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.token_start = self.cursor.position();

        if self.cursor.is_at_end() {
            return self.make(TokenKind::Eof);
        }

        match self.cursor.current_char() {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '@' => self.single(TokenKind::At),
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            '^' => self.lex_caret(),
            '~' => self.single(TokenKind::Tilde),
            '?' => self.single(TokenKind::Question),
            ':' => self.lex_colon(),
            '.' => self.lex_dot(),
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            '\\' => self.lex_escape_start(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_java_ident_start(c) => self.lex_identifier(),
            c => {
                self.cursor.advance();
                self.error_token(format!("unexpected character '{}'", c))
            },
        }
    }

    /// Handles a token that begins with a backslash: either a Unicode
    /// escape spelling an identifier character, or a malformed escape.
    fn lex_escape_start(&mut self) -> Token {
        match self.cursor.decode_current() {
            Decoded::Escape(c, _) if is_java_ident_start(c) => self.lex_identifier(),
            Decoded::Escape(_, len) => {
                self.cursor.advance_bytes(len);
                self.error_token("Unicode escape does not start an identifier")
            },
            Decoded::Malformed(len) => {
                self.cursor.advance_bytes(len);
                self.error_token("malformed Unicode escape")
            },
            Decoded::Raw(_) => {
                self.cursor.advance();
                self.error_token("unexpected character '\\'")
            },
        }
    }

    /// Builds a token spanning from `token_start` to the current position.
    pub(crate) fn make(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(self.token_start as u32, self.cursor.position() as u32),
        )
    }

    /// Consumes one character and builds a single-character token.
    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make(kind)
    }

    /// Reports a lexical error over the current token span and builds the
    /// matching `Error` token.
    pub(crate) fn error_token(&mut self, message: impl Into<String>) -> Token {
        let span = Span::new(self.token_start as u32, self.cursor.position() as u32);
        self.handler.error(message, span);
        Token::new(TokenKind::Error, span)
    }

    /// Skips whitespace (never comments; those are tokens). A leading
    /// byte-order mark is treated as whitespace.
    fn skip_whitespace(&mut self) {
        if !self.bom_checked {
            self.bom_checked = true;
            if self.cursor.remaining().starts_with('\u{FEFF}') {
                self.cursor.advance();
            }
        }

        while matches!(
            self.cursor.current_char(),
            ' ' | '\t' | '\r' | '\n' | '\x0C'
        ) && !self.cursor.is_at_end()
        {
            self.cursor.advance();
        }
    }
}

/// Tokenizes an entire source buffer.
///
/// The returned vector always ends with exactly one `Eof` token.
///
/// # Example
///
/// ```
/// use jfmt_lex::{tokenize, TokenKind};
/// use jfmt_util::Handler;
///
/// let handler = Handler::new();
/// let tokens = tokenize("int x;", &handler);
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![TokenKind::Int, TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]
/// );
/// ```
pub fn tokenize(source: &str, handler: &Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

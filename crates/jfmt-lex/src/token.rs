//! Token definitions for Java source.
//!
//! A token records a kind and the exact byte span it covers in the original
//! source. When the token contained Unicode escapes (`public`), the
//! escape-decoded form is stored alongside; otherwise the decoded text *is*
//! the original slice and nothing is copied.

use std::sync::LazyLock;

use jfmt_util::Span;
use rustc_hash::FxHashMap;

/// The closed set of token kinds.
///
/// Comments are tokens here, not skipped trivia: the formatter downstream
/// must see every byte of the source. `>>` and `>>>` have no kinds of their
/// own — the lexer always emits individual `Gt` tokens so that nested
/// generic argument lists (`List<Map<K, V>>`) can close one bracket at a
/// time, and the parser glues adjacent `Gt`s back into shift operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    Final,
    Finally,
    Float,
    For,
    Goto,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    NonSealed,
    Package,
    Permits,
    Private,
    Protected,
    Public,
    Record,
    Return,
    Sealed,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    Try,
    Var,
    Void,
    Volatile,
    While,
    Yield,

    // Identifiers
    Ident,

    // Literals
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,
    BoolLiteral,
    NullLiteral,

    // Separators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    ColonColon,

    // Operators
    Assign,
    Gt,
    Lt,
    Bang,
    Tilde,
    Question,
    Colon,
    Arrow,
    EqEq,
    GtEq,
    LtEq,
    NotEq,
    AndAnd,
    OrOr,
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Star,
    Slash,
    Amp,
    Pipe,
    Caret,
    Percent,
    Shl,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    AmpEq,
    PipeEq,
    CaretEq,
    PercentEq,
    ShlEq,

    // Trivia
    LineComment,
    BlockComment,
    JavadocComment,

    // Sentinels
    Eof,
    Error,
}

static_assertions::assert_eq_size!(TokenKind, u8);

/// Keyword table, consulted with the *decoded* identifier text so that
/// `public` classifies as `public`.
static KEYWORDS: LazyLock<FxHashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    use TokenKind::*;
    FxHashMap::from_iter([
        ("abstract", Abstract),
        ("assert", Assert),
        ("boolean", Boolean),
        ("break", Break),
        ("byte", Byte),
        ("case", Case),
        ("catch", Catch),
        ("char", Char),
        ("class", Class),
        ("const", Const),
        ("continue", Continue),
        ("default", Default),
        ("do", Do),
        ("double", Double),
        ("else", Else),
        ("enum", Enum),
        ("extends", Extends),
        ("final", Final),
        ("finally", Finally),
        ("float", Float),
        ("for", For),
        ("goto", Goto),
        ("if", If),
        ("implements", Implements),
        ("import", Import),
        ("instanceof", Instanceof),
        ("int", Int),
        ("interface", Interface),
        ("long", Long),
        ("native", Native),
        ("new", New),
        ("non-sealed", NonSealed),
        ("package", Package),
        ("permits", Permits),
        ("private", Private),
        ("protected", Protected),
        ("public", Public),
        ("record", Record),
        ("return", Return),
        ("sealed", Sealed),
        ("short", Short),
        ("static", Static),
        ("strictfp", Strictfp),
        ("super", Super),
        ("switch", Switch),
        ("synchronized", Synchronized),
        ("this", This),
        ("throw", Throw),
        ("throws", Throws),
        ("transient", Transient),
        ("try", Try),
        ("var", Var),
        ("void", Void),
        ("volatile", Volatile),
        ("while", While),
        ("yield", Yield),
        // The boolean and null words lex as literal kinds.
        ("true", BoolLiteral),
        ("false", BoolLiteral),
        ("null", NullLiteral),
    ])
});

/// Classifies decoded identifier text as a keyword or literal word.
///
/// Returns `None` for ordinary identifiers. `when` is deliberately absent:
/// its promotion to a guard keyword is a parser-side decision made only
/// after a pattern in a `case` label.
///
/// # Example
///
/// ```
/// use jfmt_lex::token::{keyword_from_str, TokenKind};
///
/// assert_eq!(keyword_from_str("public"), Some(TokenKind::Public));
/// assert_eq!(keyword_from_str("when"), None);
/// assert_eq!(keyword_from_str("frobnicate"), None);
/// ```
pub fn keyword_from_str(text: &str) -> Option<TokenKind> {
    KEYWORDS.get(text).copied()
}

impl TokenKind {
    /// Returns true for comment kinds.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::JavadocComment
        )
    }

    /// Returns true for keyword kinds (literal words excluded).
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Abstract
                | Assert
                | Boolean
                | Break
                | Byte
                | Case
                | Catch
                | Char
                | Class
                | Const
                | Continue
                | Default
                | Do
                | Double
                | Else
                | Enum
                | Extends
                | Final
                | Finally
                | Float
                | For
                | Goto
                | If
                | Implements
                | Import
                | Instanceof
                | Int
                | Interface
                | Long
                | Native
                | New
                | NonSealed
                | Package
                | Permits
                | Private
                | Protected
                | Public
                | Record
                | Return
                | Sealed
                | Short
                | Static
                | Strictfp
                | Super
                | Switch
                | Synchronized
                | This
                | Throw
                | Throws
                | Transient
                | Try
                | Var
                | Void
                | Volatile
                | While
                | Yield
        )
    }

    /// Returns true for declaration modifiers.
    pub fn is_modifier(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Public
                | Protected
                | Private
                | Static
                | Final
                | Abstract
                | Default
                | Native
                | Synchronized
                | Transient
                | Volatile
                | Strictfp
                | Sealed
                | NonSealed
        )
    }

    /// Returns true for primitive type keywords (`void` excluded).
    pub fn is_primitive_type(self) -> bool {
        use TokenKind::*;
        matches!(self, Boolean | Byte | Short | Int | Long | Char | Float | Double)
    }

    /// Returns true for literal kinds.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntLiteral
                | LongLiteral
                | FloatLiteral
                | DoubleLiteral
                | CharLiteral
                | StringLiteral
                | BoolLiteral
                | NullLiteral
        )
    }

    /// Returns true for assignment operators the lexer can see.
    ///
    /// `>>=` and `>>>=` are not in this set; they only exist after the
    /// parser glues `Gt` tokens.
    pub fn is_assign_op(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign | PlusEq | MinusEq | StarEq | SlashEq | AmpEq | PipeEq | CaretEq
                | PercentEq | ShlEq
        )
    }

    /// A short human-readable description for diagnostics.
    pub fn describe(self) -> &'static str {
        use TokenKind::*;
        match self {
            Ident => "identifier",
            IntLiteral | LongLiteral => "integer literal",
            FloatLiteral | DoubleLiteral => "floating-point literal",
            CharLiteral => "character literal",
            StringLiteral => "string literal",
            BoolLiteral => "boolean literal",
            NullLiteral => "'null'",
            LParen => "'('",
            RParen => "')'",
            LBrace => "'{'",
            RBrace => "'}'",
            LBracket => "'['",
            RBracket => "']'",
            Semicolon => "';'",
            Comma => "','",
            Dot => "'.'",
            Ellipsis => "'...'",
            At => "'@'",
            ColonColon => "'::'",
            Assign => "'='",
            Gt => "'>'",
            Lt => "'<'",
            Bang => "'!'",
            Tilde => "'~'",
            Question => "'?'",
            Colon => "':'",
            Arrow => "'->'",
            EqEq => "'=='",
            GtEq => "'>='",
            LtEq => "'<='",
            NotEq => "'!='",
            AndAnd => "'&&'",
            OrOr => "'||'",
            PlusPlus => "'++'",
            MinusMinus => "'--'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Amp => "'&'",
            Pipe => "'|'",
            Caret => "'^'",
            Percent => "'%'",
            Shl => "'<<'",
            PlusEq => "'+='",
            MinusEq => "'-='",
            StarEq => "'*='",
            SlashEq => "'/='",
            AmpEq => "'&='",
            PipeEq => "'|='",
            CaretEq => "'^='",
            PercentEq => "'%='",
            ShlEq => "'<<='",
            LineComment => "line comment",
            BlockComment => "block comment",
            JavadocComment => "Javadoc comment",
            Eof => "end of file",
            Error => "invalid token",
            kw => KEYWORDS
                .iter()
                .find(|(_, v)| **v == kw)
                .map(|(k, _)| *k)
                .unwrap_or("token"),
        }
    }
}

/// A lexed token: kind, source span, and (when escapes were present) the
/// decoded text.
///
/// # Examples
///
/// ```
/// use jfmt_lex::token::{Token, TokenKind};
/// use jfmt_util::Span;
///
/// let source = "class A {}";
/// let token = Token::new(TokenKind::Class, Span::new(0, 5));
/// assert_eq!(token.original_text(source), "class");
/// assert_eq!(token.decoded_text(source), "class");
/// assert!(!token.has_escapes());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Byte span in the original source, escapes included.
    pub span: Span,
    /// Escape-decoded text; `None` when identical to the source slice.
    decoded: Option<Box<str>>,
}

impl Token {
    /// Creates a token whose decoded text equals its source slice.
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            decoded: None,
        }
    }

    /// Creates a token that contained Unicode escapes.
    pub fn with_decoded(kind: TokenKind, span: Span, decoded: String) -> Self {
        Self {
            kind,
            span,
            decoded: Some(decoded.into_boxed_str()),
        }
    }

    /// Start byte offset.
    #[inline]
    pub fn start(&self) -> u32 {
        self.span.start
    }

    /// End byte offset (exclusive).
    #[inline]
    pub fn end(&self) -> u32 {
        self.span.end
    }

    /// The exact source substring, `\uXXXX` forms preserved.
    #[inline]
    pub fn original_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start as usize..self.span.end as usize]
    }

    /// The logical text after Unicode-escape decoding.
    ///
    /// Borrows the source slice directly when no escape was present.
    #[inline]
    pub fn decoded_text<'a>(&'a self, source: &'a str) -> &'a str {
        match &self.decoded {
            Some(decoded) => decoded,
            None => self.original_text(source),
        }
    }

    /// Returns true if this token contained Unicode escapes.
    #[inline]
    pub fn has_escapes(&self) -> bool {
        self.decoded.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_from_str("class"), Some(TokenKind::Class));
        assert_eq!(keyword_from_str("sealed"), Some(TokenKind::Sealed));
        assert_eq!(keyword_from_str("non-sealed"), Some(TokenKind::NonSealed));
        assert_eq!(keyword_from_str("true"), Some(TokenKind::BoolLiteral));
        assert_eq!(keyword_from_str("null"), Some(TokenKind::NullLiteral));
        assert_eq!(keyword_from_str("when"), None);
        assert_eq!(keyword_from_str("Class"), None);
    }

    #[test]
    fn test_is_modifier() {
        assert!(TokenKind::Public.is_modifier());
        assert!(TokenKind::NonSealed.is_modifier());
        assert!(!TokenKind::Class.is_modifier());
    }

    #[test]
    fn test_is_primitive_type() {
        assert!(TokenKind::Int.is_primitive_type());
        assert!(TokenKind::Boolean.is_primitive_type());
        assert!(!TokenKind::Void.is_primitive_type());
        assert!(!TokenKind::Ident.is_primitive_type());
    }

    #[test]
    fn test_trivia() {
        assert!(TokenKind::LineComment.is_trivia());
        assert!(TokenKind::JavadocComment.is_trivia());
        assert!(!TokenKind::Semicolon.is_trivia());
    }

    #[test]
    fn test_token_text() {
        let source = "int x = 1;";
        let token = Token::new(TokenKind::Ident, Span::new(4, 5));
        assert_eq!(token.original_text(source), "x");
        assert_eq!(token.decoded_text(source), "x");
    }

    #[test]
    fn test_token_decoded_text() {
        let source = r"\u0070ublic";
        let token =
            Token::with_decoded(TokenKind::Public, Span::new(0, 11), "public".to_string());
        assert_eq!(token.original_text(source), r"\u0070ublic");
        assert_eq!(token.decoded_text(source), "public");
        assert!(token.has_escapes());
    }

    #[test]
    fn test_describe_keyword() {
        assert_eq!(TokenKind::Class.describe(), "class");
        assert_eq!(TokenKind::Semicolon.describe(), "';'");
    }
}

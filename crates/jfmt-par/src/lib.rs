//! jfmt-par - Recursive-descent Java parser producing an index-overlay CST.
//!
//! The parser drives [`jfmt_lex`] over a validated source buffer and builds
//! a flat [`NodeArena`] in which every node is `(kind, span, attribute?)`
//! and tree structure is implied by span containment plus post-order
//! allocation. Comments become nodes; nothing in the source is dropped.
//!
//! One parser instance performs one parse and owns its arena until the
//! caller takes it back inside the [`ParseResult`]. Parsing is pure CPU
//! work over the in-memory buffer: no I/O, no global state, no blocking.
//! Distinct parsers over distinct sources are fully independent.
//!
//! # Example
//!
//! ```
//! use jfmt_par::{parse, NodeKind, ParseResult};
//!
//! let result = parse("class A { int x; }").unwrap();
//! let ParseResult::Success { arena, .. } = result else {
//!     panic!("expected success");
//! };
//! assert!(arena
//!     .iter()
//!     .any(|n| n.kind == NodeKind::ClassDeclaration));
//! ```

pub mod arena;
pub mod node;
pub mod stream;
pub mod version;

mod edge_cases;
mod expr;
mod items;
mod pattern;
mod stmt;
mod types;

pub use arena::NodeArena;
pub use node::{
    AttrId, Attribute, Node, NodeId, NodeKind, ParameterAttribute, TypeDeclarationAttribute,
};
pub use version::{JavaVersion, LanguageLevel, ParsingPhase};

use jfmt_lex::{tokenize, Token, TokenKind};
use jfmt_util::{Handler, Level, Source, SourceError, Span, Symbol};

use stream::TokenStream;

/// Maximum nesting depth of expressions and statements.
///
/// The counter increments on each syntactic nesting level the parser
/// descends into and trips a parse failure beyond this bound, keeping
/// pathological inputs from exhausting the stack.
pub const MAX_NESTING_DEPTH: u32 = 200;

/// A single parse diagnostic: a character offset into the source and a
/// message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the original source.
    pub offset: u32,
    /// Human-readable description.
    pub message: String,
}

/// Outcome of a parse.
///
/// Both variants carry the arena: a failed parse still delivers everything
/// built up to (and after recovering from) its errors, so diagnostics can
/// be rendered with full positional context.
#[derive(Debug)]
pub enum ParseResult {
    /// The source parsed without errors.
    Success {
        /// Index of the `CompilationUnit` node.
        root: NodeId,
        /// The populated arena.
        arena: NodeArena,
    },
    /// One or more errors were recorded.
    Failure {
        /// All errors, in source order.
        errors: Vec<ParseError>,
        /// The partially built arena.
        arena: NodeArena,
    },
}

impl ParseResult {
    /// Returns true for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success { .. })
    }

    /// The arena, whichever variant this is.
    pub fn arena(&self) -> &NodeArena {
        match self {
            ParseResult::Success { arena, .. } => arena,
            ParseResult::Failure { arena, .. } => arena,
        }
    }

    /// The error list; empty on success.
    pub fn errors(&self) -> &[ParseError] {
        match self {
            ParseResult::Success { .. } => &[],
            ParseResult::Failure { errors, .. } => errors,
        }
    }
}

/// Parses Java source at the latest supported language level.
///
/// Argument-validation failures (empty or oversized source) surface as
/// `Err`; everything else — lexical and syntactic errors included — is
/// reported inside the returned [`ParseResult`].
pub fn parse(source: &str) -> Result<ParseResult, SourceError> {
    Ok(Parser::new(source)?.parse())
}

/// Hand-written recursive-descent parser.
///
/// Construction validates the input; [`Parser::parse`] consumes the parser
/// and returns the arena inside the result.
pub struct Parser<'s> {
    /// Original source text; token spans index into it.
    source: &'s str,
    pub(crate) stream: TokenStream,
    pub(crate) arena: NodeArena,
    pub(crate) handler: Handler,
    pub(crate) level: LanguageLevel,
    /// Current syntactic nesting depth.
    depth: u32,
    /// Set when the depth limit tripped; aborts the parse.
    pub(crate) fatal: bool,
    /// Cleared inside case-label constants, where `A ->` is a switch rule
    /// arrow rather than a lambda.
    pub(crate) lambda_allowed: bool,
}

impl<'s> Parser<'s> {
    /// Creates a parser at the latest language level with preview features.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the source is empty, whitespace-only,
    /// or exceeds the size limits.
    pub fn new(source: &'s str) -> Result<Self, SourceError> {
        Self::with_level(source, LanguageLevel::latest_preview())
    }

    /// Creates a parser at an explicit language level.
    pub fn with_level(source: &'s str, level: LanguageLevel) -> Result<Self, SourceError> {
        Source::validate(source)?;

        let handler = Handler::new();
        let tokens = tokenize(source, &handler);
        Ok(Self {
            source,
            stream: TokenStream::new(tokens),
            arena: NodeArena::with_capacity(tokens_estimate(source)),
            handler,
            level,
            depth: 0,
            fatal: false,
            lambda_allowed: true,
        })
    }

    /// Runs the parse, consuming the parser.
    pub fn parse(mut self) -> ParseResult {
        let root = self.parse_compilation_unit();

        let errors: Vec<ParseError> = self
            .handler
            .take()
            .into_iter()
            .filter(|d| d.level == Level::Error)
            .map(|d| ParseError {
                offset: d.span.start,
                message: d.message,
            })
            .collect();

        if errors.is_empty() {
            ParseResult::Success {
                root,
                arena: self.arena,
            }
        } else {
            ParseResult::Failure {
                errors,
                arena: self.arena,
            }
        }
    }

    // =========================================================================
    // Token access
    // =========================================================================

    #[inline]
    pub(crate) fn peek(&self) -> &Token {
        self.stream.peek()
    }

    #[inline]
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.stream.peek_kind()
    }

    #[inline]
    pub(crate) fn nth_kind(&self, n: usize) -> TokenKind {
        self.stream.nth_kind(n)
    }

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.stream.at_eof()
    }

    /// Decoded text of the next significant token.
    pub(crate) fn peek_text(&self) -> &str {
        self.stream.peek().decoded_text(self.source)
    }

    /// Length of the source in bytes; the compilation unit's end offset.
    #[inline]
    pub(crate) fn source_len(&self) -> u32 {
        self.source.len() as u32
    }

    /// Interns the decoded text of a token.
    pub(crate) fn intern(&self, token: &Token) -> Symbol {
        Symbol::intern(token.decoded_text(self.source))
    }

    /// Start offset of the next significant token; where a node about to
    /// be parsed will begin.
    #[inline]
    pub(crate) fn start(&self) -> u32 {
        self.peek().start()
    }

    /// End offset of the most recently consumed token; where a node being
    /// finished ends.
    #[inline]
    pub(crate) fn prev_end(&self) -> u32 {
        self.stream.prev_end()
    }

    // =========================================================================
    // Committed consumption (comments become nodes here)
    // =========================================================================

    /// Consumes the next significant token, allocating a comment node for
    /// every trivia token crossed on the way.
    pub(crate) fn bump(&mut self) -> Token {
        while let Some(trivia) = self.stream.take_leading_trivia() {
            self.alloc_comment(&trivia);
        }
        self.stream.consume()
    }

    /// Consumes the next token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or reports an error.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            self.error(format!(
                "expected {}, found {}",
                kind.describe(),
                self.peek_kind().describe()
            ));
            None
        }
    }

    /// Allocates comment nodes for any trivia before the next significant
    /// token without consuming that token.
    pub(crate) fn drain_trivia(&mut self) {
        while let Some(trivia) = self.stream.take_leading_trivia() {
            self.alloc_comment(&trivia);
        }
    }

    fn alloc_comment(&mut self, token: &Token) {
        let kind = match token.kind {
            TokenKind::LineComment => NodeKind::LineComment,
            TokenKind::BlockComment => NodeKind::BlockComment,
            TokenKind::JavadocComment => NodeKind::JavadocComment,
            _ => unreachable!("not a comment token: {:?}", token.kind),
        };
        self.arena.alloc(kind, token.span);
    }

    // =========================================================================
    // Node allocation protocol
    // =========================================================================

    /// Allocates a node spanning from `start` to the end of the most
    /// recently consumed token. Children were allocated by the recursive
    /// calls in between, preserving post-order.
    pub(crate) fn finish(&mut self, kind: NodeKind, start: u32) -> NodeId {
        self.arena.alloc(kind, Span::new(start, self.prev_end()))
    }

    // =========================================================================
    // Diagnostics and recovery
    // =========================================================================

    /// Reports an error at the next significant token.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let span = self.peek().span;
        self.handler.error(message, span);
    }

    /// Skips ahead to a synchronising point: `;` (consumed), `}` or a
    /// declaration-start keyword (left in place), or end of file. The
    /// skipped region, if any, becomes an `Error` node so that its tokens
    /// stay covered by the tree.
    pub(crate) fn recover(&mut self) {
        let start = self.start();
        loop {
            match self.peek_kind() {
                TokenKind::Eof | TokenKind::RBrace => break,
                TokenKind::Semicolon => {
                    self.bump();
                    break;
                },
                kind if is_declaration_start(kind) => break,
                _ => {
                    self.bump();
                },
            }
        }
        let end = self.prev_end();
        if end > start {
            self.arena.alloc(NodeKind::Error, Span::new(start, end));
        }
    }

    /// Guarantees forward progress in a recovery loop: when an iteration
    /// consumed nothing (the sync point is a token the caller will not
    /// consume either), the offending token becomes an `Error` node.
    pub(crate) fn force_progress(&mut self, before: stream::Mark) {
        if self.stream.mark() == before && !self.at_eof() {
            let token = self.bump();
            self.handler
                .error(format!("unexpected {}", token.kind.describe()), token.span);
            self.arena.alloc(NodeKind::Error, token.span);
        }
    }

    // =========================================================================
    // Depth guard
    // =========================================================================

    /// Enters one nesting level; reports and latches a fatal failure when
    /// the depth limit is exceeded.
    pub(crate) fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            if !self.fatal {
                self.fatal = true;
                self.error(format!(
                    "nesting depth exceeds the maximum of {MAX_NESTING_DEPTH}"
                ));
            }
            return false;
        }
        true
    }

    /// Leaves one nesting level.
    pub(crate) fn exit(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
    }
}

/// Tokens that reliably begin a declaration; used as recovery sync points.
pub(crate) fn is_declaration_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Enum
            | TokenKind::Record
            | TokenKind::Package
            | TokenKind::Import
    )
}

/// Rough node-count estimate used to pre-size the arena.
fn tokens_estimate(source: &str) -> usize {
    source.len() / 8 + 16
}

//! jfmt-lex - Lexical analysis for Java source.
//!
//! This crate turns Java source text into a token vector in which nothing
//! is lost: comments are tokens, every token knows its exact byte span, and
//! tokens that contained Unicode escapes carry their decoded text next to
//! the original spelling. The downstream formatter depends on being able to
//! reproduce the input byte for byte from token spans.
//!
//! The lexer targets the Java 25 lexical grammar: binary/hex/octal and
//! hex-float literals with underscores and suffixes, text blocks, all three
//! comment classes, and JLS §3.3 Unicode-escape preprocessing for
//! identifiers and keywords.
//!
//! # Example
//!
//! ```
//! use jfmt_lex::{tokenize, TokenKind};
//! use jfmt_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = tokenize("class A { /* body */ }", &handler);
//! assert_eq!(tokens[0].kind, TokenKind::Class);
//! assert_eq!(tokens[3].kind, TokenKind::BlockComment);
//! assert!(!handler.has_errors());
//! ```

pub mod cursor;
pub mod token;
pub mod unicode;

mod edge_cases;
mod lexer;

pub use lexer::{tokenize, Lexer};
pub use token::{keyword_from_str, Token, TokenKind};

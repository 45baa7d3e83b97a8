//! Lexer module.
//!
//! The implementation is split into focused components:
//! - `core` - the `Lexer` struct, dispatch, and the `tokenize` entry point
//! - `identifier` - identifier and keyword scanning (Unicode-escape aware)
//! - `number` - all Java numeric literal forms
//! - `string` - character literals, string literals, text blocks
//! - `comment` - line, block, and Javadoc comment tokens
//! - `operator` - operators and punctuation

mod comment;
mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use self::core::{tokenize, Lexer};

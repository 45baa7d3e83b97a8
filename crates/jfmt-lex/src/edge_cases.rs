//! Lexer edge-case and property tests.

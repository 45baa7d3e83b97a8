//! Type parsing and speculative type scanning.
//!
//! Types are parsed twice in this parser's life: first *scanned* without
//! consuming or allocating anything (to settle the genuine grammar
//! ambiguities — `<` as less-than versus generic bracket, cast versus
//! parenthesized expression, declaration versus expression statement), and
//! then parsed for real once the decision is made. The scanners work in
//! lookahead space (`nth` indices over significant tokens) so no rewinding
//! is ever needed and no comment is consumed prematurely.

use jfmt_lex::TokenKind;

use crate::node::{NodeId, NodeKind};
use crate::Parser;

/// What a speculative type scan saw, beyond where it ended.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TypeScan {
    /// Lookahead index just past the scanned type.
    pub after: usize,
    /// The type form is unambiguous: a primitive, or it carried type
    /// arguments or array dimensions. A bare (possibly qualified) name is
    /// not strong — `(a)` may be a parenthesized expression.
    pub strong: bool,
}

impl<'s> Parser<'s> {
    // =========================================================================
    // Speculative scanning (pure lookahead; no consumption, no allocation)
    // =========================================================================

    /// Scans a type starting at lookahead index `at`. Returns where it
    /// ended plus whether the form was unambiguously a type.
    pub(crate) fn scan_type(&self, at: usize) -> Option<TypeScan> {
        self.scan_type_at(at, 0)
    }

    fn scan_type_at(&self, at: usize, depth: u32) -> Option<TypeScan> {
        if depth > crate::MAX_NESTING_DEPTH {
            return None;
        }
        let mut i = self.scan_annotations(at);
        let mut strong = false;

        match self.nth_kind(i) {
            k if k.is_primitive_type() || k == TokenKind::Void => {
                i += 1;
                strong = true;
            },
            TokenKind::Ident | TokenKind::Var => {
                i += 1;
                loop {
                    if self.nth_kind(i) == TokenKind::Lt {
                        match self.scan_type_arguments_at(i, depth + 1) {
                            Some(j) => {
                                i = j;
                                strong = true;
                            },
                            // Not a type-argument list; the type ends here
                            // and the `<` is relational.
                            None => break,
                        }
                    }
                    if self.nth_kind(i) == TokenKind::Dot
                        && self.nth_kind(i + 1) == TokenKind::Ident
                    {
                        i += 2;
                    } else {
                        break;
                    }
                }
            },
            _ => return None,
        }

        loop {
            let j = self.scan_annotations(i);
            if self.nth_kind(j) == TokenKind::LBracket
                && self.nth_kind(j + 1) == TokenKind::RBracket
            {
                i = j + 2;
                strong = true;
            } else {
                break;
            }
        }

        Some(TypeScan { after: i, strong })
    }

    /// Scans a type-argument list starting at a `<`. Nested lists work
    /// naturally because `>>` reaches the stream as two `Gt` tokens.
    pub(crate) fn scan_type_arguments(&self, at: usize) -> Option<usize> {
        self.scan_type_arguments_at(at, 0)
    }

    fn scan_type_arguments_at(&self, at: usize, depth: u32) -> Option<usize> {
        debug_assert_eq!(self.nth_kind(at), TokenKind::Lt);
        if depth > crate::MAX_NESTING_DEPTH {
            return None;
        }
        let mut i = at + 1;

        // Diamond.
        if self.nth_kind(i) == TokenKind::Gt {
            return Some(i + 1);
        }

        loop {
            i = self.scan_type_argument_at(i, depth)?;
            match self.nth_kind(i) {
                TokenKind::Comma => i += 1,
                TokenKind::Gt => return Some(i + 1),
                _ => return None,
            }
        }
    }

    fn scan_type_argument_at(&self, at: usize, depth: u32) -> Option<usize> {
        let i = self.scan_annotations(at);
        if self.nth_kind(i) == TokenKind::Question {
            let mut i = i + 1;
            if matches!(self.nth_kind(i), TokenKind::Extends | TokenKind::Super) {
                i = self.scan_type_at(i + 1, depth + 1)?.after;
            }
            Some(i)
        } else {
            Some(self.scan_type_at(i, depth + 1)?.after)
        }
    }

    /// Skips annotations (`@Name`, `@Name(...)`) in lookahead space,
    /// returning the index after them. An `@` not followed by a name (e.g.
    /// `@interface`) is left in place.
    pub(crate) fn scan_annotations(&self, mut i: usize) -> usize {
        while self.nth_kind(i) == TokenKind::At && self.nth_kind(i + 1) == TokenKind::Ident {
            i += 2;
            while self.nth_kind(i) == TokenKind::Dot && self.nth_kind(i + 1) == TokenKind::Ident
            {
                i += 2;
            }
            if self.nth_kind(i) == TokenKind::LParen {
                let mut depth = 1;
                i += 1;
                while depth > 0 {
                    match self.nth_kind(i) {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => depth -= 1,
                        TokenKind::Eof => return i,
                        _ => {},
                    }
                    i += 1;
                }
            }
        }
        i
    }

    // =========================================================================
    // Committed parsing
    // =========================================================================

    /// Parses a type, array dimensions included. (Array-creation parses
    /// its base type itself so the brackets stay with the creation.)
    pub(crate) fn parse_type(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.parse_annotations();

        let mut ty = match self.peek_kind() {
            k if k.is_primitive_type() || k == TokenKind::Void => {
                self.bump();
                self.finish(NodeKind::PrimitiveType, start)
            },
            TokenKind::Ident => {
                let first = self.bump();
                let mut node = self.arena.alloc(NodeKind::Identifier, first.span);
                loop {
                    if self.at(TokenKind::Lt) && self.scan_type_arguments(0).is_some() {
                        self.parse_type_arguments()?;
                        node = self.finish(NodeKind::ParameterizedType, start);
                    }
                    if self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Ident {
                        self.bump();
                        let segment = self.bump();
                        self.arena.alloc(NodeKind::Identifier, segment.span);
                        node = self.finish(NodeKind::QualifiedName, start);
                    } else {
                        break;
                    }
                }
                node
            },
            _ => {
                self.error("expected type");
                return None;
            },
        };

        while self.array_dim_ahead() {
            self.parse_annotations();
            self.bump();
            self.bump();
            ty = self.finish(NodeKind::ArrayType, start);
        }

        Some(ty)
    }

    /// True when `[` `]` (possibly behind type annotations) comes next.
    pub(crate) fn array_dim_ahead(&self) -> bool {
        let i = self.scan_annotations(0);
        self.nth_kind(i) == TokenKind::LBracket && self.nth_kind(i + 1) == TokenKind::RBracket
    }

    /// Parses a committed type-argument list, diamond included.
    pub(crate) fn parse_type_arguments(&mut self) -> Option<()> {
        self.expect(TokenKind::Lt)?;
        if self.eat(TokenKind::Gt) {
            return Some(());
        }
        loop {
            self.parse_type_argument()?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt)?;
        Some(())
    }

    fn parse_type_argument(&mut self) -> Option<NodeId> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_type_argument_inner();
        self.exit();
        result
    }

    fn parse_type_argument_inner(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.parse_annotations();
        if self.at(TokenKind::Question) {
            self.bump();
            if matches!(self.peek_kind(), TokenKind::Extends | TokenKind::Super) {
                self.bump();
                self.parse_type()?;
            }
            Some(self.finish(NodeKind::WildcardType, start))
        } else {
            self.parse_type()
        }
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    /// Parses any run of annotations, allocating a node per annotation.
    pub(crate) fn parse_annotations(&mut self) {
        while self.at(TokenKind::At) && self.nth_kind(1) == TokenKind::Ident {
            if self.parse_annotation().is_none() {
                break;
            }
        }
    }

    /// Parses one annotation: `@Name`, `@Name(value)`, or
    /// `@Name(k = v, ...)`.
    pub(crate) fn parse_annotation(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.expect(TokenKind::At)?;

        let name = self.expect(TokenKind::Ident)?;
        let name_start = name.start();
        self.arena.alloc(NodeKind::Identifier, name.span);
        let mut qualified = false;
        while self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Ident {
            self.bump();
            let segment = self.bump();
            self.arena.alloc(NodeKind::Identifier, segment.span);
            qualified = true;
        }
        if qualified {
            self.finish(NodeKind::QualifiedName, name_start);
        }

        if self.eat(TokenKind::LParen) {
            if !self.at(TokenKind::RParen) {
                if self.at(TokenKind::Ident) && self.nth_kind(1) == TokenKind::Assign {
                    loop {
                        let key = self.expect(TokenKind::Ident)?;
                        self.arena.alloc(NodeKind::Identifier, key.span);
                        self.expect(TokenKind::Assign)?;
                        self.parse_element_value()?;
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                } else {
                    self.parse_element_value()?;
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        Some(self.finish(NodeKind::Annotation, start))
    }

    /// An annotation element value: a nested annotation, an array of
    /// values, or an expression.
    pub(crate) fn parse_element_value(&mut self) -> Option<NodeId> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_element_value_inner();
        self.exit();
        result
    }

    fn parse_element_value_inner(&mut self) -> Option<NodeId> {
        match self.peek_kind() {
            TokenKind::At => self.parse_annotation(),
            TokenKind::LBrace => {
                let start = self.start();
                self.bump();
                while !self.at(TokenKind::RBrace) && !self.at_eof() && !self.fatal {
                    self.parse_element_value()?;
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace)?;
                Some(self.finish(NodeKind::ArrayInitializer, start))
            },
            _ => self.parse_expression(),
        }
    }
}

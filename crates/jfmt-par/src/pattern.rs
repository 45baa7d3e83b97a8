//! Case-label and pattern parsing.
//!
//! A `case` label tries its alternatives in a fixed order: the `null`
//! literal, the `default` form, a record pattern, a type pattern, and
//! finally a constant expression. After any pattern an optional guard may
//! follow: the identifier `when` is promoted to a guard keyword *here and
//! only here* — everywhere else in the language it is an ordinary
//! identifier, and no identifier node is emitted for the promoted token.

use jfmt_lex::TokenKind;

use crate::node::{NodeId, NodeKind};
use crate::Parser;

/// What a single case label turned out to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CaseLabel {
    /// A pattern (record or type pattern); guards may follow.
    Pattern,
    /// `null`, `default`, or a constant expression; no guard.
    Constant,
}

impl<'s> Parser<'s> {
    /// Parses the label list of a `case`, comma separators included, and
    /// an optional `when` guard. The caller has consumed the `case`
    /// keyword.
    pub(crate) fn parse_case_labels(&mut self) -> Option<()> {
        let mut saw_pattern = false;
        loop {
            if self.parse_case_label()? == CaseLabel::Pattern {
                saw_pattern = true;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        // Guard promotion: `when` after a pattern, consumed with no
        // identifier node.
        if saw_pattern && self.at(TokenKind::Ident) && self.peek_text() == "when" {
            if !self.level.pattern_switch() {
                self.error("'when' guards require Java 21");
            }
            self.bump();
            self.parse_guard_expression()?;
        }

        Some(())
    }

    fn parse_case_label(&mut self) -> Option<CaseLabel> {
        match self.peek_kind() {
            TokenKind::NullLiteral => {
                let token = self.bump();
                self.arena.alloc(NodeKind::NullLiteral, token.span);
                Some(CaseLabel::Constant)
            },
            // `case default` / `case null, default`: accepted wherever a
            // pattern is; validity is a later pass's concern.
            TokenKind::Default => {
                self.bump();
                Some(CaseLabel::Constant)
            },
            _ => {
                if let Some(scan) = self.scan_type(0) {
                    if self.nth_kind(scan.after) == TokenKind::LParen {
                        if !self.level.record_patterns() {
                            self.error("record patterns require Java 21");
                        }
                        self.parse_record_pattern()?;
                        return Some(CaseLabel::Pattern);
                    }
                    if self.nth_kind(scan.after) == TokenKind::Ident {
                        if !self.level.pattern_switch() {
                            self.error("type patterns in case labels require Java 21");
                        }
                        self.parse_type_pattern()?;
                        return Some(CaseLabel::Pattern);
                    }
                }
                self.parse_case_constant()?;
                Some(CaseLabel::Constant)
            },
        }
    }

    /// A type pattern: a type followed by its binder.
    fn parse_type_pattern(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.eat(TokenKind::Final);
        self.parse_type()?;
        let binder = self.expect(TokenKind::Ident)?;
        self.arena.alloc(NodeKind::Identifier, binder.span);
        Some(self.finish(NodeKind::TypePattern, start))
    }

    /// A record pattern: a type followed by a parenthesized component
    /// list. Components are nested record patterns or type-and-binder
    /// forms; `var` and `_` are allowed as component binders.
    pub(crate) fn parse_record_pattern(&mut self) -> Option<NodeId> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_record_pattern_inner();
        self.exit();
        result
    }

    fn parse_record_pattern_inner(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.parse_type()?;
        self.expect(TokenKind::LParen)?;

        if !self.at(TokenKind::RParen) {
            loop {
                self.parse_component_pattern()?;
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen)?;
        Some(self.finish(NodeKind::RecordPattern, start))
    }

    fn parse_component_pattern(&mut self) -> Option<NodeId> {
        // Nested record pattern?
        if let Some(scan) = self.scan_type(0) {
            if self.nth_kind(scan.after) == TokenKind::LParen {
                return self.parse_record_pattern();
            }
        }

        let start = self.start();
        if self.eat(TokenKind::Var) {
            // `var` binder: no type to parse.
            let binder = self.expect(TokenKind::Ident)?;
            self.arena.alloc(NodeKind::Identifier, binder.span);
            return Some(self.finish(NodeKind::TypePattern, start));
        }

        self.parse_type()?;
        let binder = self.expect(TokenKind::Ident)?;
        self.arena.alloc(NodeKind::Identifier, binder.span);
        Some(self.finish(NodeKind::TypePattern, start))
    }

    /// A constant case label: a conditional-level expression. `A ->` must
    /// read as a label followed by the rule arrow, so lambda detection is
    /// suspended at this level (and restored inside any parentheses).
    fn parse_case_constant(&mut self) -> Option<NodeId> {
        let saved = self.lambda_allowed;
        self.lambda_allowed = false;
        let result = self.parse_expr_bp(crate::expr::bp::TERNARY);
        self.lambda_allowed = saved;
        result
    }

    /// The boolean expression of a `when` guard, ending at `->` or `:`.
    fn parse_guard_expression(&mut self) -> Option<NodeId> {
        let saved = self.lambda_allowed;
        self.lambda_allowed = false;
        let result = self.parse_expr_bp(crate::expr::bp::TERNARY);
        self.lambda_allowed = saved;
        result
    }
}

//! Statement parsing.
//!
//! Statement dispatch is mostly driven by the leading keyword; the two
//! interesting cases are the declaration-versus-expression ambiguity
//! (`Foo bar = ...` against `foo.bar()`), settled by a speculative type
//! scan, and local type declarations inside blocks.

use jfmt_lex::TokenKind;

use crate::node::{NodeId, NodeKind};
use crate::Parser;

impl<'s> Parser<'s> {
    /// Parses a `{ ... }` block.
    pub(crate) fn parse_block(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.expect(TokenKind::LBrace)?;
        while !self.at(TokenKind::RBrace) && !self.at_eof() && !self.fatal {
            let before = self.stream.mark();
            if self.parse_statement().is_none() {
                if self.fatal {
                    return None;
                }
                self.recover();
            }
            self.force_progress(before);
        }
        self.expect(TokenKind::RBrace)?;
        Some(self.finish(NodeKind::Block, start))
    }

    /// Parses one statement, entering one nesting level.
    pub(crate) fn parse_statement(&mut self) -> Option<NodeId> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_statement_inner();
        self.exit();
        result
    }

    fn parse_statement_inner(&mut self) -> Option<NodeId> {
        let start = self.start();
        match self.peek_kind() {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Semicolon => {
                self.bump();
                Some(self.finish(NodeKind::EmptyStatement, start))
            },
            TokenKind::If => {
                self.bump();
                self.expect(TokenKind::LParen)?;
                self.parse_expr_root()?;
                self.expect(TokenKind::RParen)?;
                self.parse_statement()?;
                if self.eat(TokenKind::Else) {
                    self.parse_statement()?;
                }
                Some(self.finish(NodeKind::IfStatement, start))
            },
            TokenKind::While => {
                self.bump();
                self.expect(TokenKind::LParen)?;
                self.parse_expr_root()?;
                self.expect(TokenKind::RParen)?;
                self.parse_statement()?;
                Some(self.finish(NodeKind::WhileStatement, start))
            },
            TokenKind::Do => {
                self.bump();
                self.parse_statement()?;
                self.expect(TokenKind::While)?;
                self.expect(TokenKind::LParen)?;
                self.parse_expr_root()?;
                self.expect(TokenKind::RParen)?;
                self.expect(TokenKind::Semicolon)?;
                Some(self.finish(NodeKind::DoStatement, start))
            },
            TokenKind::For => self.parse_for(start),
            TokenKind::Switch => self.parse_switch(NodeKind::SwitchStatement),
            TokenKind::Synchronized => {
                self.bump();
                self.expect(TokenKind::LParen)?;
                self.parse_expr_root()?;
                self.expect(TokenKind::RParen)?;
                self.parse_block()?;
                Some(self.finish(NodeKind::SynchronizedStatement, start))
            },
            TokenKind::Try => self.parse_try(start),
            TokenKind::Return => {
                self.bump();
                if !self.at(TokenKind::Semicolon) {
                    self.parse_expr_root()?;
                }
                self.expect(TokenKind::Semicolon)?;
                Some(self.finish(NodeKind::ReturnStatement, start))
            },
            TokenKind::Throw => {
                self.bump();
                self.parse_expr_root()?;
                self.expect(TokenKind::Semicolon)?;
                Some(self.finish(NodeKind::ThrowStatement, start))
            },
            TokenKind::Break => {
                self.bump();
                if self.at(TokenKind::Ident) {
                    let label = self.bump();
                    self.arena.alloc(NodeKind::Identifier, label.span);
                }
                self.expect(TokenKind::Semicolon)?;
                Some(self.finish(NodeKind::BreakStatement, start))
            },
            TokenKind::Continue => {
                self.bump();
                if self.at(TokenKind::Ident) {
                    let label = self.bump();
                    self.arena.alloc(NodeKind::Identifier, label.span);
                }
                self.expect(TokenKind::Semicolon)?;
                Some(self.finish(NodeKind::ContinueStatement, start))
            },
            TokenKind::Yield => {
                self.bump();
                self.parse_expr_root()?;
                self.expect(TokenKind::Semicolon)?;
                Some(self.finish(NodeKind::YieldStatement, start))
            },
            TokenKind::Assert => {
                self.bump();
                self.parse_expr_root()?;
                if self.eat(TokenKind::Colon) {
                    self.parse_expr_root()?;
                }
                self.expect(TokenKind::Semicolon)?;
                Some(self.finish(NodeKind::AssertStatement, start))
            },
            TokenKind::Ident if self.nth_kind(1) == TokenKind::Colon => {
                let label = self.bump();
                self.arena.alloc(NodeKind::Identifier, label.span);
                self.bump(); // ':'
                self.parse_statement()?;
                Some(self.finish(NodeKind::LabeledStatement, start))
            },
            _ => {
                if self.local_type_declaration_ahead() {
                    return self.parse_type_declaration();
                }
                if self.local_variable_declaration_ahead() {
                    return self.parse_local_variable_declaration(true);
                }
                self.parse_expr_root()?;
                self.expect(TokenKind::Semicolon)?;
                Some(self.finish(NodeKind::ExpressionStatement, start))
            },
        }
    }

    // =========================================================================
    // for statements
    // =========================================================================

    fn parse_for(&mut self, start: u32) -> Option<NodeId> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        if self.enhanced_for_ahead() {
            let var_start = self.start();
            while self.at(TokenKind::Final) || self.annotation_ahead() {
                if !self.eat(TokenKind::Final) {
                    self.parse_annotation()?;
                }
            }
            if !self.eat(TokenKind::Var) {
                self.parse_type()?;
            }
            let name = self.expect(TokenKind::Ident)?;
            self.arena.alloc(NodeKind::Identifier, name.span);
            self.finish(NodeKind::LocalVariableDeclaration, var_start);

            self.expect(TokenKind::Colon)?;
            self.parse_expr_root()?;
            self.expect(TokenKind::RParen)?;
            self.parse_statement()?;
            return Some(self.finish(NodeKind::EnhancedForStatement, start));
        }

        // Init.
        if !self.at(TokenKind::Semicolon) {
            if self.local_variable_declaration_ahead() {
                self.parse_local_variable_declaration(true)?;
            } else {
                loop {
                    let expr_start = self.start();
                    self.parse_expr_root()?;
                    self.finish(NodeKind::ExpressionStatement, expr_start);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::Semicolon)?;
            }
        } else {
            self.bump();
        }

        // Condition.
        if !self.at(TokenKind::Semicolon) {
            self.parse_expr_root()?;
        }
        self.expect(TokenKind::Semicolon)?;

        // Update.
        if !self.at(TokenKind::RParen) {
            loop {
                self.parse_expr_root()?;
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        self.parse_statement()?;
        Some(self.finish(NodeKind::ForStatement, start))
    }

    /// After `for (`: does `[modifiers] type name :` come next?
    fn enhanced_for_ahead(&self) -> bool {
        let mut i = self.scan_annotations(0);
        while self.nth_kind(i) == TokenKind::Final {
            i = self.scan_annotations(i + 1);
        }
        let Some(scan) = self.scan_type(i) else {
            return false;
        };
        self.nth_kind(scan.after) == TokenKind::Ident
            && self.nth_kind(scan.after + 1) == TokenKind::Colon
    }

    // =========================================================================
    // try statements
    // =========================================================================

    fn parse_try(&mut self, start: u32) -> Option<NodeId> {
        self.expect(TokenKind::Try)?;

        if self.eat(TokenKind::LParen) {
            // Resources: declarations or variable references, `;`
            // separated, optional trailing separator.
            while !self.at(TokenKind::RParen) && !self.at_eof() && !self.fatal {
                if self.resource_declaration_ahead() {
                    self.parse_resource_declaration()?;
                } else {
                    self.parse_expr_root()?;
                }
                if !self.eat(TokenKind::Semicolon) {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        self.parse_block()?;

        while self.at(TokenKind::Catch) {
            let catch_start = self.start();
            self.bump();
            self.expect(TokenKind::LParen)?;
            self.parse_catch_parameter()?;
            self.expect(TokenKind::RParen)?;
            self.parse_block()?;
            self.finish(NodeKind::CatchClause, catch_start);
        }

        if self.at(TokenKind::Finally) {
            let finally_start = self.start();
            self.bump();
            self.parse_block()?;
            self.finish(NodeKind::FinallyClause, finally_start);
        }

        Some(self.finish(NodeKind::TryStatement, start))
    }

    /// `[final] Type name = ...` begins a resource declaration; a bare
    /// name or field access is a variable-reference resource.
    fn resource_declaration_ahead(&self) -> bool {
        let mut i = self.scan_annotations(0);
        while self.nth_kind(i) == TokenKind::Final {
            i = self.scan_annotations(i + 1);
        }
        if self.nth_kind(i) == TokenKind::Var {
            return self.nth_kind(i + 1) == TokenKind::Ident;
        }
        let Some(scan) = self.scan_type(i) else {
            return false;
        };
        self.nth_kind(scan.after) == TokenKind::Ident
            && self.nth_kind(scan.after + 1) == TokenKind::Assign
    }

    fn parse_resource_declaration(&mut self) -> Option<NodeId> {
        let start = self.start();
        while self.at(TokenKind::Final) || self.annotation_ahead() {
            if !self.eat(TokenKind::Final) {
                self.parse_annotation()?;
            }
        }
        if !self.eat(TokenKind::Var) {
            self.parse_type()?;
        }

        let decl_start = self.start();
        let name = self.expect(TokenKind::Ident)?;
        self.arena.alloc(NodeKind::Identifier, name.span);
        self.expect(TokenKind::Assign)?;
        self.parse_expr_root()?;
        self.finish(NodeKind::VariableDeclarator, decl_start);

        Some(self.finish(NodeKind::LocalVariableDeclaration, start))
    }

    /// The formal of a `catch` clause; multi-catch types are separated by
    /// `|`.
    fn parse_catch_parameter(&mut self) -> Option<NodeId> {
        let start = self.start();
        let mut is_final = false;
        while self.at(TokenKind::Final) || self.annotation_ahead() {
            if self.eat(TokenKind::Final) {
                is_final = true;
            } else {
                self.parse_annotation()?;
            }
        }

        self.parse_type()?;
        while self.eat(TokenKind::Pipe) {
            self.parse_type()?;
        }

        let name = self.expect(TokenKind::Ident)?;
        let symbol = self.intern(&name);
        let attr = crate::node::ParameterAttribute {
            name: symbol,
            is_final,
            is_var_args: false,
            is_receiver: false,
        };
        Some(
            self.arena
                .alloc_parameter(jfmt_util::Span::new(start, self.prev_end()), attr),
        )
    }

    // =========================================================================
    // switch statements and expressions
    // =========================================================================

    /// Parses a full `switch`, as a statement or an expression depending
    /// on `kind`; the body grammar is identical.
    pub(crate) fn parse_switch(&mut self, kind: NodeKind) -> Option<NodeId> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_switch_inner(kind);
        self.exit();
        result
    }

    fn parse_switch_inner(&mut self, kind: NodeKind) -> Option<NodeId> {
        let start = self.start();
        self.expect(TokenKind::Switch)?;
        self.expect(TokenKind::LParen)?;
        self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;

        while !self.at(TokenKind::RBrace) && !self.at_eof() && !self.fatal {
            let before = self.stream.mark();
            if self.parse_switch_case().is_none() {
                if self.fatal {
                    return None;
                }
                self.recover();
            }
            self.force_progress(before);
        }

        self.expect(TokenKind::RBrace)?;
        Some(self.finish(kind, start))
    }

    /// One case group: labels plus either an arrow body or a `:` body.
    fn parse_switch_case(&mut self) -> Option<NodeId> {
        let start = self.start();
        match self.peek_kind() {
            TokenKind::Case => {
                self.bump();
                self.parse_case_labels()?;
            },
            TokenKind::Default => {
                self.bump();
            },
            _ => {
                self.error("expected 'case' or 'default'");
                return None;
            },
        }

        if self.eat(TokenKind::Arrow) {
            // Rule form: expression `;`, block, or throw statement.
            match self.peek_kind() {
                TokenKind::LBrace => {
                    self.parse_block()?;
                },
                TokenKind::Throw => {
                    self.parse_statement()?;
                },
                _ => {
                    let expr_start = self.start();
                    self.parse_expr_root()?;
                    self.expect(TokenKind::Semicolon)?;
                    self.finish(NodeKind::ExpressionStatement, expr_start);
                },
            }
        } else {
            self.expect(TokenKind::Colon)?;
            while !matches!(
                self.peek_kind(),
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) && !self.fatal
            {
                let before = self.stream.mark();
                if self.parse_statement().is_none() {
                    if self.fatal {
                        return None;
                    }
                    self.recover();
                }
                self.force_progress(before);
            }
        }

        Some(self.finish(NodeKind::SwitchCase, start))
    }

    // =========================================================================
    // Local variable declarations
    // =========================================================================

    /// `[modifiers] type name ...` at statement level means a local
    /// variable declaration rather than an expression statement.
    pub(crate) fn local_variable_declaration_ahead(&self) -> bool {
        let mut i = self.scan_annotations(0);
        while self.nth_kind(i) == TokenKind::Final {
            i = self.scan_annotations(i + 1);
        }
        if self.nth_kind(i) == TokenKind::Var {
            return self.nth_kind(i + 1) == TokenKind::Ident;
        }
        let Some(scan) = self.scan_type(i) else {
            return false;
        };
        if self.nth_kind(scan.after) != TokenKind::Ident {
            return false;
        }
        // The declarator continues with `=`, `;`, `,`, or `[`.
        matches!(
            self.nth_kind(scan.after + 1),
            TokenKind::Assign | TokenKind::Semicolon | TokenKind::Comma | TokenKind::LBracket
        )
    }

    /// Parses a local variable declaration; consumes the trailing `;`
    /// when `with_semi` is set (basic-`for` init shares this path).
    pub(crate) fn parse_local_variable_declaration(&mut self, with_semi: bool) -> Option<NodeId> {
        let start = self.start();
        while self.at(TokenKind::Final) || self.annotation_ahead() {
            if !self.eat(TokenKind::Final) {
                self.parse_annotation()?;
            }
        }

        if !self.eat(TokenKind::Var) {
            self.parse_type()?;
        }

        loop {
            let decl_start = self.start();
            let name = self.expect(TokenKind::Ident)?;
            self.arena.alloc(NodeKind::Identifier, name.span);
            // C-style trailing dims: `int a[];`
            while self.at(TokenKind::LBracket) && self.nth_kind(1) == TokenKind::RBracket {
                self.bump();
                self.bump();
            }
            if self.eat(TokenKind::Assign) {
                if self.at(TokenKind::LBrace) {
                    self.parse_array_initializer()?;
                } else {
                    self.parse_expr_root()?;
                }
            }
            self.finish(NodeKind::VariableDeclarator, decl_start);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        if with_semi {
            self.expect(TokenKind::Semicolon)?;
        }
        Some(self.finish(NodeKind::LocalVariableDeclaration, start))
    }

    /// True when an annotation (`@Name`, not `@interface`) comes next.
    pub(crate) fn annotation_ahead(&self) -> bool {
        self.at(TokenKind::At) && self.nth_kind(1) == TokenKind::Ident
    }

    /// A local class, interface, enum, record, or annotation declaration
    /// inside a block.
    pub(crate) fn local_type_declaration_ahead(&self) -> bool {
        let mut i = self.scan_annotations(0);
        loop {
            match self.nth_kind(i) {
                kind if kind.is_modifier() => i = self.scan_annotations(i + 1),
                TokenKind::Class | TokenKind::Interface | TokenKind::Enum | TokenKind::Record => {
                    return true;
                },
                TokenKind::At => return self.nth_kind(i + 1) == TokenKind::Interface,
                _ => return false,
            }
        }
    }
}

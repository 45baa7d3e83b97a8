//! Declaration parsing: compilation units, package and import
//! declarations, type declarations and their members.
//!
//! Entry: `CompilationUnit := [PackageDecl] ImportDecl* TypeDecl*`.

use jfmt_lex::TokenKind;
use jfmt_util::Span;

use crate::node::{NodeId, NodeKind, ParameterAttribute};
use crate::Parser;

impl<'s> Parser<'s> {
    /// Parses a whole compilation unit. Always produces a root node, even
    /// for badly broken input; errors land in the handler.
    pub(crate) fn parse_compilation_unit(&mut self) -> NodeId {
        // Package declaration, possibly behind package annotations.
        let after_annotations = self.scan_annotations(0);
        if self.nth_kind(after_annotations) == TokenKind::Package {
            let start = self.start();
            self.parse_annotations();
            self.bump(); // 'package'
            if self.parse_qualified_name().is_some() {
                self.expect(TokenKind::Semicolon);
            } else {
                self.recover();
            }
            self.finish(NodeKind::PackageDeclaration, start);
        }

        while self.at(TokenKind::Import) {
            self.parse_import_declaration();
        }

        while !self.at_eof() && !self.fatal {
            if self.at(TokenKind::Semicolon) {
                let start = self.start();
                self.bump();
                self.finish(NodeKind::EmptyStatement, start);
                continue;
            }
            let before = self.stream.mark();
            if self.parse_type_declaration().is_none() {
                if self.fatal {
                    break;
                }
                self.recover();
            }
            self.force_progress(before);
        }

        // Comments after the last declaration still become nodes.
        self.drain_trivia();

        let end = self.source_len();
        self.arena
            .alloc(NodeKind::CompilationUnit, Span::new(0, end))
    }

    fn parse_import_declaration(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.expect(TokenKind::Import)?;
        self.eat(TokenKind::Static);

        let name_start = self.start();
        let first = self.expect(TokenKind::Ident)?;
        self.arena.alloc(NodeKind::Identifier, first.span);
        let mut segments = 1;
        while self.at(TokenKind::Dot) {
            match self.nth_kind(1) {
                TokenKind::Ident => {
                    self.bump();
                    let segment = self.bump();
                    self.arena.alloc(NodeKind::Identifier, segment.span);
                    segments += 1;
                },
                TokenKind::Star => {
                    // On-demand import.
                    self.bump();
                    self.bump();
                    segments += 1;
                    break;
                },
                _ => break,
            }
        }
        if segments > 1 {
            self.finish(NodeKind::QualifiedName, name_start);
        }

        self.expect(TokenKind::Semicolon)?;
        Some(self.finish(NodeKind::ImportDeclaration, start))
    }

    /// Parses a qualified name, allocating one `Identifier` per segment
    /// and a wrapping `QualifiedName` when there is more than one.
    pub(crate) fn parse_qualified_name(&mut self) -> Option<NodeId> {
        let start = self.start();
        let first = self.expect(TokenKind::Ident)?;
        let mut node = self.arena.alloc(NodeKind::Identifier, first.span);
        while self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Ident {
            self.bump();
            let segment = self.bump();
            self.arena.alloc(NodeKind::Identifier, segment.span);
            node = self.finish(NodeKind::QualifiedName, start);
        }
        Some(node)
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    /// Parses a type declaration, modifiers and annotations included.
    /// Also used for local and nested types.
    pub(crate) fn parse_type_declaration(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.parse_modifiers();
        self.parse_type_declaration_after_modifiers(start)
    }

    fn parse_type_declaration_after_modifiers(&mut self, start: u32) -> Option<NodeId> {
        match self.peek_kind() {
            TokenKind::Class => self.parse_class_like(NodeKind::ClassDeclaration, start),
            TokenKind::Interface => {
                self.parse_class_like(NodeKind::InterfaceDeclaration, start)
            },
            TokenKind::Enum => self.parse_enum_declaration(start),
            TokenKind::Record => self.parse_record_declaration(start),
            TokenKind::At if self.nth_kind(1) == TokenKind::Interface => {
                self.parse_annotation_declaration(start)
            },
            _ => {
                self.error("expected class, interface, enum, record, or @interface");
                None
            },
        }
    }

    /// Consumes any run of annotations and modifier keywords.
    pub(crate) fn parse_modifiers(&mut self) {
        loop {
            if self.annotation_ahead() {
                if self.parse_annotation().is_none() {
                    return;
                }
            } else if self.peek_kind().is_modifier() {
                self.bump();
            } else {
                return;
            }
        }
    }

    fn parse_class_like(&mut self, kind: NodeKind, start: u32) -> Option<NodeId> {
        self.bump(); // 'class' or 'interface'
        let name = self.expect(TokenKind::Ident)?;
        let symbol = self.intern(&name);
        self.arena.alloc(NodeKind::Identifier, name.span);

        if self.at(TokenKind::Lt) {
            self.parse_type_parameters()?;
        }

        if kind == NodeKind::ClassDeclaration {
            if self.eat(TokenKind::Extends) {
                self.parse_type()?;
            }
            if self.eat(TokenKind::Implements) {
                self.parse_type_list()?;
            }
        } else {
            if self.eat(TokenKind::Extends) {
                self.parse_type_list()?;
            }
        }
        if self.eat(TokenKind::Permits) {
            self.parse_type_list()?;
        }

        self.parse_class_body()?;
        Some(self.finish_type_declaration(kind, start, symbol))
    }

    fn parse_enum_declaration(&mut self, start: u32) -> Option<NodeId> {
        self.bump(); // 'enum'
        let name = self.expect(TokenKind::Ident)?;
        let symbol = self.intern(&name);
        self.arena.alloc(NodeKind::Identifier, name.span);

        if self.eat(TokenKind::Implements) {
            self.parse_type_list()?;
        }

        self.expect(TokenKind::LBrace)?;

        // Constants, then an optional `;` and ordinary members.
        while !matches!(
            self.peek_kind(),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) && !self.fatal
        {
            if self.parse_enum_constant().is_none() {
                if self.fatal {
                    return None;
                }
                self.recover();
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if self.eat(TokenKind::Semicolon) {
            while !self.at(TokenKind::RBrace) && !self.at_eof() && !self.fatal {
                let before = self.stream.mark();
                if self.parse_member().is_none() {
                    if self.fatal {
                        return None;
                    }
                    self.recover();
                }
                self.force_progress(before);
            }
        }

        self.expect(TokenKind::RBrace)?;
        Some(self.finish_type_declaration(NodeKind::EnumDeclaration, start, symbol))
    }

    fn parse_enum_constant(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.parse_annotations();
        let name = self.expect(TokenKind::Ident)?;
        self.arena.alloc(NodeKind::Identifier, name.span);

        if self.eat(TokenKind::LParen) {
            self.parse_argument_list()?;
            self.expect(TokenKind::RParen)?;
        }
        if self.at(TokenKind::LBrace) {
            self.parse_class_body()?;
        }

        Some(self.finish(NodeKind::EnumConstant, start))
    }

    fn parse_record_declaration(&mut self, start: u32) -> Option<NodeId> {
        self.bump(); // 'record'
        let name = self.expect(TokenKind::Ident)?;
        let symbol = self.intern(&name);
        self.arena.alloc(NodeKind::Identifier, name.span);

        if self.at(TokenKind::Lt) {
            self.parse_type_parameters()?;
        }

        self.expect(TokenKind::LParen)?;
        if !self.at(TokenKind::RParen) {
            loop {
                self.parse_parameter()?;
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        if self.eat(TokenKind::Implements) {
            self.parse_type_list()?;
        }

        self.parse_class_body()?;
        Some(self.finish_type_declaration(NodeKind::RecordDeclaration, start, symbol))
    }

    fn parse_annotation_declaration(&mut self, start: u32) -> Option<NodeId> {
        self.bump(); // '@'
        self.bump(); // 'interface'
        let name = self.expect(TokenKind::Ident)?;
        let symbol = self.intern(&name);
        self.arena.alloc(NodeKind::Identifier, name.span);

        self.parse_class_body()?;
        Some(self.finish_type_declaration(NodeKind::AnnotationDeclaration, start, symbol))
    }

    fn finish_type_declaration(
        &mut self,
        kind: NodeKind,
        start: u32,
        name: jfmt_util::Symbol,
    ) -> NodeId {
        let span = Span::new(start, self.prev_end());
        self.arena.alloc_type_declaration(kind, span, name)
    }

    /// `<T, U extends A & B>`
    pub(crate) fn parse_type_parameters(&mut self) -> Option<()> {
        self.expect(TokenKind::Lt)?;
        loop {
            let start = self.start();
            self.parse_annotations();
            let name = self.expect(TokenKind::Ident)?;
            self.arena.alloc(NodeKind::Identifier, name.span);
            if self.eat(TokenKind::Extends) {
                self.parse_type()?;
                while self.eat(TokenKind::Amp) {
                    self.parse_type()?;
                }
            }
            self.finish(NodeKind::TypeParameter, start);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt)?;
        Some(())
    }

    fn parse_type_list(&mut self) -> Option<()> {
        loop {
            self.parse_type()?;
            if !self.eat(TokenKind::Comma) {
                return Some(());
            }
        }
    }

    // =========================================================================
    // Class bodies and members
    // =========================================================================

    fn parse_class_body(&mut self) -> Option<()> {
        self.expect(TokenKind::LBrace)?;
        while !self.at(TokenKind::RBrace) && !self.at_eof() && !self.fatal {
            let before = self.stream.mark();
            if self.parse_member().is_none() {
                if self.fatal {
                    return None;
                }
                self.recover();
            }
            self.force_progress(before);
        }
        self.expect(TokenKind::RBrace)?;
        Some(())
    }

    /// Body of an anonymous class in an object-creation expression; the
    /// members hang directly off the `ObjectCreation` span.
    pub(crate) fn parse_anonymous_class_body(&mut self) -> Option<()> {
        self.parse_class_body()
    }

    fn parse_member(&mut self) -> Option<NodeId> {
        let start = self.start();

        if self.at(TokenKind::Semicolon) {
            self.bump();
            return Some(self.finish(NodeKind::EmptyStatement, start));
        }
        if self.at(TokenKind::LBrace) {
            self.parse_block()?;
            return Some(self.finish(NodeKind::InitializerBlock, start));
        }
        if self.at(TokenKind::Static) && self.nth_kind(1) == TokenKind::LBrace {
            self.bump();
            self.parse_block()?;
            return Some(self.finish(NodeKind::InitializerBlock, start));
        }

        self.parse_modifiers();

        match self.peek_kind() {
            TokenKind::Class | TokenKind::Interface | TokenKind::Enum | TokenKind::Record => {
                return self.parse_type_declaration_after_modifiers(start);
            },
            TokenKind::At if self.nth_kind(1) == TokenKind::Interface => {
                return self.parse_type_declaration_after_modifiers(start);
            },
            _ => {},
        }

        if self.at(TokenKind::Lt) {
            self.parse_type_parameters()?;
        }

        // Constructor: `Name(` or a record's compact `Name {`.
        if self.at(TokenKind::Ident)
            && matches!(self.nth_kind(1), TokenKind::LParen | TokenKind::LBrace)
        {
            let name = self.bump();
            self.arena.alloc(NodeKind::Identifier, name.span);
            if self.eat(TokenKind::LParen) {
                self.parse_parameter_list()?;
                self.expect(TokenKind::RParen)?;
                if self.at(TokenKind::Throws) {
                    self.parse_throws()?;
                }
            }
            self.parse_constructor_body()?;
            return Some(self.finish(NodeKind::ConstructorDeclaration, start));
        }

        // Return type (or field type).
        self.parse_type()?;

        if self.at(TokenKind::Ident) && self.nth_kind(1) == TokenKind::LParen {
            // Method.
            let name = self.bump();
            self.arena.alloc(NodeKind::Identifier, name.span);
            self.bump(); // '('
            self.parse_parameter_list()?;
            self.expect(TokenKind::RParen)?;
            while self.at(TokenKind::LBracket) && self.nth_kind(1) == TokenKind::RBracket {
                self.bump();
                self.bump();
            }
            if self.at(TokenKind::Throws) {
                self.parse_throws()?;
            }
            if self.eat(TokenKind::Default) {
                // Annotation-member default value.
                self.parse_element_value()?;
            }
            if self.at(TokenKind::LBrace) {
                self.parse_block()?;
            } else {
                self.expect(TokenKind::Semicolon)?;
            }
            return Some(self.finish(NodeKind::MethodDeclaration, start));
        }

        // Field with one or more declarators.
        loop {
            let decl_start = self.start();
            let name = self.expect(TokenKind::Ident)?;
            self.arena.alloc(NodeKind::Identifier, name.span);
            while self.at(TokenKind::LBracket) && self.nth_kind(1) == TokenKind::RBracket {
                self.bump();
                self.bump();
            }
            if self.eat(TokenKind::Assign) {
                if self.at(TokenKind::LBrace) {
                    self.parse_array_initializer()?;
                } else {
                    self.parse_expression()?;
                }
            }
            self.finish(NodeKind::VariableDeclarator, decl_start);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)?;
        Some(self.finish(NodeKind::FieldDeclaration, start))
    }

    fn parse_parameter_list(&mut self) -> Option<()> {
        if self.at(TokenKind::RParen) {
            return Some(());
        }
        loop {
            self.parse_parameter()?;
            if !self.eat(TokenKind::Comma) {
                return Some(());
            }
        }
    }

    /// One formal parameter: modifiers, type, optional `...`, the name
    /// (or `this` for a receiver parameter), trailing dimensions.
    pub(crate) fn parse_parameter(&mut self) -> Option<NodeId> {
        let start = self.start();
        let mut is_final = false;
        while self.at(TokenKind::Final) || self.annotation_ahead() {
            if self.eat(TokenKind::Final) {
                is_final = true;
            } else {
                self.parse_annotation()?;
            }
        }

        if self.at(TokenKind::Var) && self.nth_kind(1) == TokenKind::Ident {
            // `var` lambda parameter: no type node.
            self.bump();
        } else {
            self.parse_type()?;
        }

        // Receiver parameter: `Type this` or `Type Outer.this` (the
        // qualifier was consumed as part of the type).
        if self.at(TokenKind::This)
            || (self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::This)
        {
            if self.at(TokenKind::Dot) {
                self.bump();
            }
            self.bump(); // 'this'
            let attr = ParameterAttribute {
                name: jfmt_util::Symbol::intern("this"),
                is_final,
                is_var_args: false,
                is_receiver: true,
            };
            return Some(
                self.arena
                    .alloc_parameter(Span::new(start, self.prev_end()), attr),
            );
        }

        let is_var_args = self.eat(TokenKind::Ellipsis);
        let name = self.expect(TokenKind::Ident)?;
        let symbol = self.intern(&name);
        while self.at(TokenKind::LBracket) && self.nth_kind(1) == TokenKind::RBracket {
            self.bump();
            self.bump();
        }

        let attr = ParameterAttribute {
            name: symbol,
            is_final,
            is_var_args,
            is_receiver: false,
        };
        Some(
            self.arena
                .alloc_parameter(Span::new(start, self.prev_end()), attr),
        )
    }

    fn parse_throws(&mut self) -> Option<()> {
        self.expect(TokenKind::Throws)?;
        loop {
            self.parse_type()?;
            if !self.eat(TokenKind::Comma) {
                return Some(());
            }
        }
    }

    /// A constructor body. Statements may precede the explicit
    /// `super(...)`/`this(...)` invocation only when flexible constructor
    /// bodies are enabled; the statements parse either way and the gate
    /// reports the feature use.
    fn parse_constructor_body(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.expect(TokenKind::LBrace)?;

        let mut seen_other_statement = false;
        while !self.at(TokenKind::RBrace) && !self.at_eof() && !self.fatal {
            let explicit_ctor_call = matches!(self.peek_kind(), TokenKind::This | TokenKind::Super)
                && self.nth_kind(1) == TokenKind::LParen;
            if explicit_ctor_call
                && seen_other_statement
                && !self.level.flexible_constructor_bodies()
            {
                self.error(
                    "statements before an explicit constructor invocation require Java 25 preview",
                );
            }
            if !explicit_ctor_call {
                seen_other_statement = true;
            }
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
}

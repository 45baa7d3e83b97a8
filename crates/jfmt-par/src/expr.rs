//! Expression parsing: Pratt precedence climbing plus the disambiguation
//! points Java's grammar genuinely needs lookahead for.
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `=` and compound assignment | Right |
//! | 2 | `?:` | Right |
//! | 3 | `\|\|` | Left |
//! | 4 | `&&` | Left |
//! | 5 | `\|` | Left |
//! | 6 | `^` | Left |
//! | 7 | `&` | Left |
//! | 8 | `==` `!=` | Left |
//! | 9 | `<` `>` `<=` `>=` `instanceof` | Left |
//! | 10 | `<<` `>>` `>>>` | Left |
//! | 11 | `+` `-` | Left |
//! | 12 | `*` `/` `%` | Left |
//!
//! The shift family above level 9 is glued at parse time: the lexer emits
//! `>` and `>=` only, and adjacency of spans decides whether `> >` is a
//! shift operator or two generic closers.

use jfmt_lex::TokenKind;

use crate::node::{NodeId, NodeKind, ParameterAttribute};
use crate::Parser;

/// Binding power levels. Higher binds tighter.
pub(crate) mod bp {
    /// Start of expression.
    pub const MIN: u8 = 0;

    /// Assignment: `=` `+=` `-=` `*=` `/=` `%=` `&=` `|=` `^=` `<<=` `>>=` `>>>=`
    pub const ASSIGNMENT: u8 = 2;

    /// Conditional: `?:`
    pub const TERNARY: u8 = 4;

    /// Logical OR: `||`
    pub const LOGICAL_OR: u8 = 6;

    /// Logical AND: `&&`
    pub const LOGICAL_AND: u8 = 8;

    /// Bitwise OR: `|`
    pub const BITWISE_OR: u8 = 10;

    /// Bitwise XOR: `^`
    pub const BITWISE_XOR: u8 = 12;

    /// Bitwise AND: `&`
    pub const BITWISE_AND: u8 = 14;

    /// Equality: `==` `!=`
    pub const EQUALITY: u8 = 16;

    /// Relational: `<` `>` `<=` `>=` `instanceof`
    pub const RELATIONAL: u8 = 18;

    /// Shift: `<<` `>>` `>>>`
    pub const SHIFT: u8 = 20;

    /// Additive: `+` `-`
    pub const ADDITIVE: u8 = 22;

    /// Multiplicative: `*` `/` `%`
    pub const MULTIPLICATIVE: u8 = 24;
}

/// A recognized (possibly glued) binary operator.
struct BinOp {
    lbp: u8,
    /// Number of tokens it occupies (3 for `>>>`).
    tokens: u8,
}

impl<'s> Parser<'s> {
    /// Parses one expression, entering one nesting level.
    ///
    /// This is the entry point for *nested* expression positions:
    /// parenthesized expressions, arguments, array indices, lambda bodies.
    pub(crate) fn parse_expression(&mut self) -> Option<NodeId> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_expr_bp(bp::MIN);
        self.exit();
        result
    }

    /// Parses a statement's direct expression child without a fresh
    /// nesting level; the enclosing statement's level covers this frame.
    pub(crate) fn parse_expr_root(&mut self) -> Option<NodeId> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Pratt loop with minimum binding power.
    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> Option<NodeId> {
        let mut lhs = self.parse_unary()?;

        loop {
            if self.fatal {
                return None;
            }

            // Assignment (right-associative, lowest). The right-recursive
            // chain counts against the nesting depth.
            if min_bp <= bp::ASSIGNMENT {
                if let Some(tokens) = self.assignment_op_ahead() {
                    let start = self.arena.get(lhs).start();
                    for _ in 0..tokens {
                        self.bump();
                    }
                    if !self.enter() {
                        return None;
                    }
                    let rhs = self.parse_expr_bp(bp::ASSIGNMENT);
                    self.exit();
                    rhs?;
                    lhs = self.finish(NodeKind::AssignmentExpression, start);
                    continue;
                }
            }

            // Conditional. The alternative parses at the ternary level, so
            // a lambda there belongs to the conditional:
            // `flag ? null : x -> x + 1` is `flag ? null : (x -> x + 1)`.
            if min_bp <= bp::TERNARY && self.at(TokenKind::Question) {
                let start = self.arena.get(lhs).start();
                self.bump();
                if !self.enter() {
                    return None;
                }
                let branches = (|| {
                    self.parse_expr_bp(bp::MIN)?;
                    self.expect(TokenKind::Colon)?;
                    self.parse_expr_bp(bp::TERNARY)
                })();
                self.exit();
                branches?;
                lhs = self.finish(NodeKind::ConditionalExpression, start);
                continue;
            }

            // `instanceof` sits at relational precedence and takes a type
            // or pattern operand.
            if bp::RELATIONAL >= min_bp && self.at(TokenKind::Instanceof) {
                let start = self.arena.get(lhs).start();
                self.bump();
                self.eat(TokenKind::Final);
                self.parse_instanceof_operand()?;
                lhs = self.finish(NodeKind::InstanceofExpression, start);
                continue;
            }

            // Ordinary binary operators, shift gluing included.
            let Some(op) = self.binary_op_ahead() else { break };
            if op.lbp < min_bp {
                break;
            }
            let start = self.arena.get(lhs).start();
            for _ in 0..op.tokens {
                self.bump();
            }
            self.parse_expr_bp(op.lbp + 1)?;
            lhs = self.finish(NodeKind::BinaryExpression, start);
        }

        Some(lhs)
    }

    /// Recognizes an assignment operator at the cursor, gluing `>>=` from
    /// `> >=` and `>>>=` from `> > >=` when the pieces are adjacent.
    fn assignment_op_ahead(&self) -> Option<u8> {
        let kind = self.peek_kind();
        if kind.is_assign_op() {
            return Some(1);
        }
        if kind == TokenKind::Gt {
            if self.nth_kind(1) == TokenKind::GtEq && self.glued(0) {
                return Some(2);
            }
            if self.nth_kind(1) == TokenKind::Gt
                && self.nth_kind(2) == TokenKind::GtEq
                && self.glued(0)
                && self.glued(1)
            {
                return Some(3);
            }
        }
        None
    }

    /// Recognizes a binary operator at the cursor, gluing `>>` and `>>>`
    /// from adjacent `>` tokens.
    fn binary_op_ahead(&self) -> Option<BinOp> {
        use TokenKind::*;
        let lbp = match self.peek_kind() {
            OrOr => bp::LOGICAL_OR,
            AndAnd => bp::LOGICAL_AND,
            Pipe => bp::BITWISE_OR,
            Caret => bp::BITWISE_XOR,
            Amp => bp::BITWISE_AND,
            EqEq | NotEq => bp::EQUALITY,
            Lt | LtEq | GtEq => bp::RELATIONAL,
            Shl => bp::SHIFT,
            Plus | Minus => bp::ADDITIVE,
            Star | Slash | Percent => bp::MULTIPLICATIVE,
            Gt => {
                if self.nth_kind(1) == Gt && self.glued(0) {
                    let tokens = if self.nth_kind(2) == Gt && self.glued(1) {
                        3 // >>>
                    } else {
                        2 // >>
                    };
                    return Some(BinOp {
                        lbp: bp::SHIFT,
                        tokens,
                    });
                }
                return Some(BinOp {
                    lbp: bp::RELATIONAL,
                    tokens: 1,
                });
            },
            _ => return None,
        };
        Some(BinOp { lbp, tokens: 1 })
    }

    /// True when lookahead tokens `i` and `i + 1` touch in the source.
    fn glued(&self, i: usize) -> bool {
        self.stream.nth(i).end() == self.stream.nth(i + 1).start()
    }

    // =========================================================================
    // Unary and postfix
    // =========================================================================

    fn parse_unary(&mut self) -> Option<NodeId> {
        match self.peek_kind() {
            TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Bang
            | TokenKind::Tilde => {
                if !self.enter() {
                    return None;
                }
                let start = self.start();
                self.bump();
                let result = match self.parse_unary() {
                    Some(_) => Some(self.finish(NodeKind::UnaryExpression, start)),
                    None => None,
                };
                self.exit();
                result
            },
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Option<NodeId> {
        let mut lhs = self.parse_primary()?;

        loop {
            if self.fatal {
                return None;
            }
            let start = self.arena.get(lhs).start();
            match self.peek_kind() {
                TokenKind::Dot => match self.nth_kind(1) {
                    TokenKind::Class => {
                        self.bump();
                        self.bump();
                        lhs = self.finish(NodeKind::ClassLiteral, start);
                    },
                    TokenKind::This => {
                        self.bump();
                        self.bump();
                        lhs = self.finish(NodeKind::ThisExpression, start);
                    },
                    TokenKind::Super => {
                        self.bump();
                        self.bump();
                        lhs = self.finish(NodeKind::SuperExpression, start);
                    },
                    TokenKind::New => {
                        // Qualified creation: `outer.new Inner(...)`.
                        self.bump();
                        lhs = self.parse_creation(start)?;
                    },
                    TokenKind::Lt => {
                        // Explicit type arguments: `recv.<T>method(...)`.
                        self.bump();
                        self.parse_type_arguments()?;
                        let name = self.expect(TokenKind::Ident)?;
                        self.arena.alloc(NodeKind::Identifier, name.span);
                        self.expect(TokenKind::LParen)?;
                        self.parse_argument_list()?;
                        self.expect(TokenKind::RParen)?;
                        lhs = self.finish(NodeKind::MethodInvocation, start);
                    },
                    TokenKind::Ident => {
                        self.bump();
                        let name = self.bump();
                        self.arena.alloc(NodeKind::Identifier, name.span);
                        if self.at(TokenKind::LParen) {
                            self.bump();
                            self.parse_argument_list()?;
                            self.expect(TokenKind::RParen)?;
                            lhs = self.finish(NodeKind::MethodInvocation, start);
                        } else {
                            lhs = self.finish(NodeKind::FieldAccess, start);
                        }
                    },
                    _ => {
                        self.error("expected member name after '.'");
                        return None;
                    },
                },
                TokenKind::LParen => {
                    self.bump();
                    self.parse_argument_list()?;
                    self.expect(TokenKind::RParen)?;
                    lhs = self.finish(NodeKind::MethodInvocation, start);
                },
                TokenKind::LBracket => {
                    if self.nth_kind(1) == TokenKind::RBracket {
                        // `Foo[].class`, `int[]::new`: dimensions in
                        // expression position make this a type reference.
                        while self.at(TokenKind::LBracket)
                            && self.nth_kind(1) == TokenKind::RBracket
                        {
                            self.bump();
                            self.bump();
                        }
                        lhs = self.finish(NodeKind::ArrayType, start);
                        continue;
                    }
                    self.bump();
                    self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    lhs = self.finish(NodeKind::ArrayAccess, start);
                },
                TokenKind::ColonColon => {
                    self.bump();
                    if self.at(TokenKind::Lt) {
                        self.parse_type_arguments()?;
                    }
                    if !self.eat(TokenKind::New) {
                        let name = self.expect(TokenKind::Ident)?;
                        self.arena.alloc(NodeKind::Identifier, name.span);
                    }
                    lhs = self.finish(NodeKind::MethodReference, start);
                },
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    self.bump();
                    lhs = self.finish(NodeKind::PostfixExpression, start);
                },
                _ => break,
            }
        }

        Some(lhs)
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary(&mut self) -> Option<NodeId> {
        match self.peek_kind() {
            kind if literal_node_kind(kind).is_some() => {
                let token = self.bump();
                Some(self.arena.alloc(literal_node_kind(kind).unwrap(), token.span))
            },
            TokenKind::Ident => {
                if self.lambda_allowed && self.nth_kind(1) == TokenKind::Arrow {
                    return self.parse_lambda_single_param();
                }
                let token = self.bump();
                Some(self.arena.alloc(NodeKind::Identifier, token.span))
            },
            TokenKind::LParen => {
                if self.lambda_allowed && self.paren_lambda_ahead() {
                    return self.parse_lambda_parenthesized();
                }
                if self.cast_ahead() {
                    return self.parse_cast();
                }
                self.bump();
                let saved = self.lambda_allowed;
                self.lambda_allowed = true;
                let inner = self.parse_expression();
                self.lambda_allowed = saved;
                self.expect(TokenKind::RParen)?;
                inner
            },
            TokenKind::This => {
                let token = self.bump();
                Some(self.arena.alloc(NodeKind::ThisExpression, token.span))
            },
            TokenKind::Super => {
                let token = self.bump();
                Some(self.arena.alloc(NodeKind::SuperExpression, token.span))
            },
            TokenKind::New => {
                let start = self.start();
                self.parse_creation(start)
            },
            TokenKind::Switch => self.parse_switch(NodeKind::SwitchExpression),
            kind if kind.is_primitive_type() || kind == TokenKind::Void => {
                // `int.class`, `long[]::new`; the postfix loop takes it
                // from here.
                let token = self.bump();
                Some(self.arena.alloc(NodeKind::PrimitiveType, token.span))
            },
            TokenKind::Error => {
                // Already reported by the lexer; keep the span covered.
                let token = self.bump();
                Some(self.arena.alloc(NodeKind::Error, token.span))
            },
            _ => {
                self.error(format!(
                    "expected expression, found {}",
                    self.peek_kind().describe()
                ));
                None
            },
        }
    }

    /// Arguments of a call: expressions until the closing `)`.
    pub(crate) fn parse_argument_list(&mut self) -> Option<()> {
        let saved = self.lambda_allowed;
        self.lambda_allowed = true;
        let result = self.parse_argument_list_inner();
        self.lambda_allowed = saved;
        result
    }

    fn parse_argument_list_inner(&mut self) -> Option<()> {
        if self.at(TokenKind::RParen) {
            return Some(());
        }
        loop {
            self.parse_expression()?;
            if !self.eat(TokenKind::Comma) {
                return Some(());
            }
        }
    }

    // =========================================================================
    // Lambdas
    // =========================================================================

    /// `x -> body`
    fn parse_lambda_single_param(&mut self) -> Option<NodeId> {
        let start = self.start();
        let name = self.bump();
        let symbol = self.intern(&name);
        self.arena
            .alloc_parameter(name.span, ParameterAttribute::named(symbol));
        self.expect(TokenKind::Arrow)?;
        self.parse_lambda_body()?;
        Some(self.finish(NodeKind::LambdaExpression, start))
    }

    /// `() -> body`, `(a, b) -> body`, `(Type a) -> body`
    fn parse_lambda_parenthesized(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.expect(TokenKind::LParen)?;
        if !self.at(TokenKind::RParen) {
            loop {
                if self.at(TokenKind::Ident)
                    && matches!(self.nth_kind(1), TokenKind::Comma | TokenKind::RParen)
                {
                    // Implicit parameter.
                    let name = self.bump();
                    let symbol = self.intern(&name);
                    self.arena
                        .alloc_parameter(name.span, ParameterAttribute::named(symbol));
                } else {
                    self.parse_parameter()?;
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Arrow)?;
        self.parse_lambda_body()?;
        Some(self.finish(NodeKind::LambdaExpression, start))
    }

    fn parse_lambda_body(&mut self) -> Option<NodeId> {
        if self.at(TokenKind::LBrace) {
            self.parse_block()
        } else {
            let saved = self.lambda_allowed;
            self.lambda_allowed = true;
            let result = self.parse_expression();
            self.lambda_allowed = saved;
            result
        }
    }

    /// Bounded lookahead to the matching `)`: a parenthesized group
    /// followed by `->` is a lambda parameter list, never an expression.
    fn paren_lambda_ahead(&self) -> bool {
        let mut i = 1;
        let mut depth = 1usize;
        loop {
            match self.nth_kind(i) {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.nth_kind(i + 1) == TokenKind::Arrow;
                    }
                },
                TokenKind::Eof => return false,
                _ => {},
            }
            i += 1;
        }
    }

    // =========================================================================
    // Casts
    // =========================================================================

    /// Commits to a cast when `(` Type `)` is followed by a token that can
    /// only start a casted operand. A bare name in the parentheses is
    /// ambiguous (`(a) - b` is subtraction), so the follow set narrows
    /// unless the type form was unambiguous.
    fn cast_ahead(&self) -> bool {
        let Some(scan) = self.scan_type(1) else {
            return false;
        };
        let mut after = scan.after;
        let mut strong = scan.strong;

        // Intersection cast: `(A & B) x`.
        while self.nth_kind(after) == TokenKind::Amp {
            match self.scan_type(after + 1) {
                Some(next) => {
                    after = next.after;
                    strong = true;
                },
                None => return false,
            }
        }

        if self.nth_kind(after) != TokenKind::RParen {
            return false;
        }

        match self.nth_kind(after + 1) {
            TokenKind::Ident
            | TokenKind::This
            | TokenKind::Super
            | TokenKind::New
            | TokenKind::LParen
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::Switch => true,
            kind if kind.is_literal() => true,
            TokenKind::Plus | TokenKind::Minus => strong,
            _ => false,
        }
    }

    fn parse_cast(&mut self) -> Option<NodeId> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_cast_inner();
        self.exit();
        result
    }

    fn parse_cast_inner(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.expect(TokenKind::LParen)?;
        self.parse_type()?;
        while self.eat(TokenKind::Amp) {
            self.parse_type()?;
        }
        self.expect(TokenKind::RParen)?;
        self.parse_unary()?;
        Some(self.finish(NodeKind::CastExpression, start))
    }

    // =========================================================================
    // Creation expressions
    // =========================================================================

    /// Parses `new ...` (array or object creation). `start` is where the
    /// whole expression begins — before a qualifier in the
    /// `outer.new Inner()` form.
    pub(crate) fn parse_creation(&mut self, start: u32) -> Option<NodeId> {
        self.expect(TokenKind::New)?;
        self.parse_annotations();

        if self.peek_kind().is_primitive_type() {
            let token = self.bump();
            self.arena.alloc(NodeKind::PrimitiveType, token.span);
        } else {
            self.parse_creation_type()?;
        }

        if self.at(TokenKind::LBracket) {
            while self.at(TokenKind::LBracket) {
                if self.nth_kind(1) == TokenKind::RBracket {
                    self.bump();
                    self.bump();
                } else {
                    self.bump();
                    self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                }
            }
            if self.at(TokenKind::LBrace) {
                self.parse_array_initializer()?;
            }
            return Some(self.finish(NodeKind::ArrayCreation, start));
        }

        self.expect(TokenKind::LParen)?;
        self.parse_argument_list()?;
        self.expect(TokenKind::RParen)?;
        if self.at(TokenKind::LBrace) {
            self.parse_anonymous_class_body()?;
        }
        Some(self.finish(NodeKind::ObjectCreation, start))
    }

    /// The class type after `new`: segments with optional type arguments
    /// (diamond included), but no array dimensions — those belong to the
    /// creation.
    fn parse_creation_type(&mut self) -> Option<NodeId> {
        let start = self.start();
        let first = self.expect(TokenKind::Ident)?;
        let mut node = self.arena.alloc(NodeKind::Identifier, first.span);
        loop {
            if self.at(TokenKind::Lt) {
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
        Some(node)
    }

    /// `{` elements `}` with nested initializers and an optional trailing
    /// comma.
    pub(crate) fn parse_array_initializer(&mut self) -> Option<NodeId> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_array_initializer_inner();
        self.exit();
        result
    }

    fn parse_array_initializer_inner(&mut self) -> Option<NodeId> {
        let start = self.start();
        self.expect(TokenKind::LBrace)?;
        while !self.at(TokenKind::RBrace) && !self.at_eof() && !self.fatal {
            if self.at(TokenKind::LBrace) {
                self.parse_array_initializer()?;
            } else {
                self.parse_expression()?;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Some(self.finish(NodeKind::ArrayInitializer, start))
    }

    // =========================================================================
    // instanceof operands
    // =========================================================================

    /// The right-hand side of `instanceof`: a record pattern, a type
    /// pattern (type plus binder), or a plain type.
    fn parse_instanceof_operand(&mut self) -> Option<()> {
        if let Some(scan) = self.scan_type(0) {
            if self.nth_kind(scan.after) == TokenKind::LParen {
                if !self.level.record_patterns() {
                    self.error("record patterns require Java 21");
                }
                self.parse_record_pattern()?;
                return Some(());
            }
            if self.nth_kind(scan.after) == TokenKind::Ident {
                let start = self.start();
                self.parse_type()?;
                let binder = self.bump();
                self.arena.alloc(NodeKind::Identifier, binder.span);
                self.finish(NodeKind::TypePattern, start);
                return Some(());
            }
        }
        self.parse_type()?;
        Some(())
    }
}

/// Maps a literal token kind to its node kind.
fn literal_node_kind(kind: TokenKind) -> Option<NodeKind> {
    match kind {
        TokenKind::IntLiteral => Some(NodeKind::IntegerLiteral),
        TokenKind::LongLiteral => Some(NodeKind::LongLiteral),
        TokenKind::FloatLiteral => Some(NodeKind::FloatLiteral),
        TokenKind::DoubleLiteral => Some(NodeKind::DoubleLiteral),
        TokenKind::CharLiteral => Some(NodeKind::CharLiteral),
        TokenKind::StringLiteral => Some(NodeKind::StringLiteral),
        TokenKind::BoolLiteral => Some(NodeKind::BooleanLiteral),
        TokenKind::NullLiteral => Some(NodeKind::NullLiteral),
        _ => None,
    }
}

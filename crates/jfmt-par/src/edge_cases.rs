//! End-to-end parser tests: concrete scenarios and the structural
//! invariants every parse must uphold.

#[cfg(test)]
mod tests {
    use crate::{
        parse, Attribute, JavaVersion, LanguageLevel, NodeArena, NodeKind, ParseResult, Parser,
        ParsingPhase,
    };
    use jfmt_util::Span;

    fn parse_ok(source: &str) -> NodeArena {
        match parse(source).expect("source passes validation") {
            ParseResult::Success { arena, .. } => arena,
            ParseResult::Failure { errors, .. } => {
                panic!("expected successful parse, got errors: {errors:?}")
            },
        }
    }

    fn parse_failure(source: &str) -> (Vec<crate::ParseError>, NodeArena) {
        match parse(source).expect("source passes validation") {
            ParseResult::Success { .. } => panic!("expected parse failure"),
            ParseResult::Failure { errors, arena } => (errors, arena),
        }
    }

    /// Span of the first occurrence of `needle` in `source`.
    fn span_of(source: &str, needle: &str) -> Span {
        let start = source.find(needle).expect("needle present") as u32;
        Span::new(start, start + needle.len() as u32)
    }

    fn has(arena: &NodeArena, kind: NodeKind, span: Span) -> bool {
        arena.iter().any(|n| n.kind == kind && n.span == span)
    }

    // =========================================================================
    // Concrete scenarios
    // =========================================================================

    /// Ternary whose alternative is a lambda: `->` binds looser than `:`.
    #[test]
    fn test_ternary_with_lambda_alternative() {
        let source = "class Test{void m(){Object r=flag?null:x->x+1;}}";
        let arena = parse_ok(source);

        let conditional = span_of(source, "flag?null:x->x+1");
        let lambda = span_of(source, "x->x+1");
        assert!(has(&arena, NodeKind::ConditionalExpression, conditional));
        assert!(has(&arena, NodeKind::LambdaExpression, lambda));
        assert!(has(&arena, NodeKind::NullLiteral, span_of(source, "null")));
    }

    /// Record pattern in a switch case.
    #[test]
    fn test_record_pattern_in_switch() {
        let source = "class T{void m(Object obj){switch(obj){case Point(int x,int y)->System.out.println(x);default->{}}}}";
        let arena = parse_ok(source);

        let pattern = span_of(source, "Point(int x,int y)");
        assert!(has(&arena, NodeKind::RecordPattern, pattern));

        // The pattern sits inside a switch case.
        let case = arena
            .iter()
            .find(|n| n.kind == NodeKind::SwitchCase && n.span.contains_span(pattern));
        assert!(case.is_some());
    }

    /// `when` after a pattern is a guard keyword: no identifier node, and
    /// the guard expression subtree exists inside the case.
    #[test]
    fn test_when_guard_promotion() {
        let source =
            "class T{void m(Object o){switch(o){case String s when s.length()>5->m(o);default->{}}}}";
        let arena = parse_ok(source);

        let when = span_of(source, "when");
        assert!(!has(&arena, NodeKind::Identifier, when));

        let guard = span_of(source, "s.length()>5");
        assert!(has(&arena, NodeKind::BinaryExpression, guard));
        assert!(has(&arena, NodeKind::TypePattern, span_of(source, "String s")));
    }

    /// Outside case labels `when` is an ordinary identifier.
    #[test]
    fn test_when_as_identifier() {
        let source =
            "class T{int when=10;int f(String whenValue){Object whenObj=when+whenValue.length();return 0;}}";
        let arena = parse_ok(source);

        let when_use = span_of(source, "when+whenValue");
        let when_span = Span::new(when_use.start, when_use.start + 4);
        assert!(has(&arena, NodeKind::Identifier, when_span));
    }

    /// Hex-float literal in declaration position.
    #[test]
    fn test_hex_float_literal() {
        let source = "class T{double d=0x1.8p1;}";
        let arena = parse_ok(source);
        assert!(has(&arena, NodeKind::DoubleLiteral, span_of(source, "0x1.8p1")));
    }

    /// A Unicode-escaped keyword drives modifier parsing.
    #[test]
    fn test_unicode_escaped_keyword() {
        let source = format!("{}u0070ublic class X {{}}", '\\');
        let arena = parse_ok(&source);

        let class = arena
            .iter_enumerated()
            .find(|(_, n)| n.kind == NodeKind::ClassDeclaration)
            .expect("class declaration");
        // The declaration starts at the escaped modifier.
        assert_eq!(class.1.start(), 0);
        match arena.attribute(class.0) {
            Some(Attribute::TypeDeclaration(attr)) => assert_eq!(attr.name.as_str(), "X"),
            other => panic!("unexpected attribute {other:?}"),
        }
    }

    /// Escaping an identifier changes spans but not structure: same kind
    /// sequence, same declared names.
    #[test]
    fn test_unicode_escape_structural_neutrality() {
        let plain = "class T{int value;int m(){return value;}}";
        let escaped = plain.replace("value", "\\u0076alue");
        assert_ne!(plain, escaped);

        let a = parse_ok(plain);
        let b = parse_ok(&escaped);

        let kinds = |arena: &NodeArena| -> Vec<NodeKind> {
            arena.iter().map(|n| n.kind).collect()
        };
        assert_eq!(kinds(&a), kinds(&b));

        let names = |arena: &NodeArena| -> Vec<&str> {
            arena
                .iter_enumerated()
                .filter_map(|(id, _)| arena.name_of(id))
                .map(|s| s.as_str())
                .collect()
        };
        assert_eq!(names(&a), names(&b));
    }

    /// Try-with-resources with a variable-reference resource: the first
    /// resource is an identifier, not a local declaration.
    #[test]
    fn test_try_with_resource_reference() {
        let source = "class T{void m(AutoCloseable resource){try(resource){work();}}}";
        let arena = parse_ok(source);

        let try_span = span_of(source, "try(resource){work();}");
        let resource = span_of(source, "(resource)");
        let resource = Span::new(resource.start + 1, resource.end - 1);

        assert!(has(&arena, NodeKind::Identifier, resource));
        assert!(has(&arena, NodeKind::TryStatement, try_span));
        assert!(!arena.iter().any(|n| {
            n.kind == NodeKind::LocalVariableDeclaration && try_span.contains_span(n.span)
        }));
    }

    /// Declared resources still parse as local declarations.
    #[test]
    fn test_try_with_resource_declaration() {
        let source = "class T{void m(){try(Reader r=open();r2){use(r);}}}";
        let arena = parse_ok(source);
        assert!(has(
            &arena,
            NodeKind::LocalVariableDeclaration,
            span_of(source, "Reader r=open()")
        ));
        assert!(has(&arena, NodeKind::Identifier, span_of(source, "r2")));
    }

    fn nested_parens(depth: usize) -> String {
        format!(
            "class T{{void m(){{int x={}1{};}}}}",
            "(".repeat(depth),
            ")".repeat(depth)
        )
    }

    /// 199 levels of parentheses parse; 201 trip the depth guard.
    #[test]
    fn test_depth_limit() {
        let ok = nested_parens(199);
        assert!(parse(&ok).unwrap().is_success());

        let too_deep = nested_parens(201);
        let (errors, _) = parse_failure(&too_deep);
        assert!(errors.iter().any(|e| e.message.contains("nesting depth")));
    }

    // =========================================================================
    // Universal properties
    // =========================================================================

    const CORPUS: &str = r#"
        package com.example;

        import java.util.List;
        import java.util.*;
        import static java.util.Map.entry;

        /** Sealed shape hierarchy. */
        public sealed interface Shape permits Circle, Square {
            double area();

            default String describe() {
                return "shape with area " + area();
            }
        }

        record Circle(double radius) implements Shape {
            Circle {
                if (radius < 0) {
                    throw new IllegalArgumentException("negative radius");
                }
            }

            public double area() {
                return Math.PI * radius * radius;
            }
        }

        final class Square implements Shape {
            private final double side;
            static int count = 0;
            int[] history = {1, 2, 3};

            static {
                count = 1;
            }

            Square(double side) {
                this.side = side;
            }

            public double area() {
                return side * side;
            }

            static String label(Object shape) {
                return switch (shape) {
                    case Circle(double r) when r > 1.0 -> "big circle";
                    case Circle c -> "circle";
                    case null, default -> {
                        yield "unknown";
                    }
                };
            }

            void control(List<String> items) throws Exception {
                outer:
                for (int i = 0, j = 0; i < items.size(); i++, j++) {
                    if ((i & 1) == 0) {
                        continue outer;
                    }
                    while (j > 0) {
                        j--;
                    }
                    do {
                        j++;
                    } while (j < i);
                }
                for (String item : items) {
                    synchronized (this) {
                        count += item.length();
                    }
                }
                try (var reader = open(); this.closeable) {
                    assert count >= 0 : "count underflow";
                } catch (IllegalStateException | IllegalArgumentException e) {
                    throw new RuntimeException(e);
                } finally {
                    count = 0;
                }
                long mask = (1L << 4) | (count >>> 2) & ~(count >> 1);
                mask >>>= 1;
                mask <<= 2;
                Runnable r = () -> System.out.println("run");
                java.util.function.Function<Integer, Integer> f = x -> x + 1;
                Object cls = Square.class;
                Runnable ref = items::clear;
                java.util.function.Supplier<int[]> maker = int[]::new;
                Object anon = new Object() {
                    public String toString() {
                        return "anon";
                    }
                };
                int[][] grid = new int[2][3];
                int[] filled = new int[]{1, 2, 3};
                double d = grid.length > 0 ? (double) grid[0][1] : .5;
                var when = d > 1 ? "big" : "small";
            }

            AutoCloseable closeable = null;

            static java.io.Reader open() {
                return null;
            }

            /* A local enum hides in here. */
            void locals() {
                enum Mode { ON, OFF }
                record Pair(int a, int b) {}
                class Helper {}
                Mode mode = Mode.ON;
                Object boxed = mode instanceof Mode m ? m : null;
                Object pair = new Pair(1, 2);
                if (pair instanceof Pair(int a, int b)) {
                    count = a + b;
                }
            }
        }

        @interface Marker {
            String value() default "none";
        }

        enum Palette {
            RED("r"), GREEN("g") {
                @Override
                public String tag() {
                    return "G";
                }
            };

            private final String code;

            Palette(String code) {
                this.code = code;
            }

            public String tag() {
                return code;
            }
        }
    "#;

    /// The corpus parses clean.
    #[test]
    fn test_corpus_parses() {
        let arena = parse_ok(CORPUS);
        assert!(arena.len() > 100);
    }

    /// Every token is covered by some node (leaf spans equal, the rest by
    /// containment), comments included.
    #[test]
    fn test_span_coverage() {
        let arena = parse_ok(CORPUS);
        let handler = jfmt_util::Handler::new();
        let tokens = jfmt_lex::tokenize(CORPUS, &handler);

        for token in &tokens {
            let covered = arena
                .iter()
                .any(|n| n.span.contains_span(token.span));
            assert!(covered, "token at {} uncovered", token.span);
        }
    }

    /// Comments become nodes with their exact spans.
    #[test]
    fn test_comment_preservation() {
        let arena = parse_ok(CORPUS);
        let handler = jfmt_util::Handler::new();
        let tokens = jfmt_lex::tokenize(CORPUS, &handler);

        for token in tokens.iter().filter(|t| t.kind.is_trivia()) {
            let preserved = arena
                .iter()
                .any(|n| n.kind.is_comment() && n.span == token.span);
            assert!(preserved, "comment at {} dropped", token.span);
        }
    }

    /// Comments inside expressions land inside the containing expression
    /// node.
    #[test]
    fn test_comment_inside_expression() {
        let source = "class T{int x=a/*mid*/+b;}";
        let arena = parse_ok(source);

        let comment = span_of(source, "/*mid*/");
        assert!(has(&arena, NodeKind::BlockComment, comment));

        let binary = span_of(source, "a/*mid*/+b");
        assert!(has(&arena, NodeKind::BinaryExpression, binary));
    }

    /// Post-order allocation: a node strictly containing another was
    /// allocated after it.
    #[test]
    fn test_post_order_allocation() {
        let arena = parse_ok(CORPUS);
        let nodes: Vec<_> = arena.iter_enumerated().collect();

        for (i, inner) in &nodes {
            for (j, outer) in &nodes {
                if i == j || inner.span == outer.span {
                    continue;
                }
                if outer.span.contains_span(inner.span) {
                    assert!(
                        i < j,
                        "containing node {:?} at {} allocated before {:?} at {}",
                        outer.kind,
                        outer.span,
                        inner.kind,
                        inner.span
                    );
                }
            }
        }
    }

    /// Parent spans contain child spans; the root spans the whole source.
    #[test]
    fn test_root_contains_everything() {
        let arena = parse_ok(CORPUS);
        let root = arena.iter().last().unwrap();
        assert_eq!(root.kind, NodeKind::CompilationUnit);
        assert_eq!(root.span, Span::new(0, CORPUS.len() as u32));
        for node in arena.iter() {
            assert!(root.span.contains_span(node.span));
        }
    }

    // =========================================================================
    // Feature gates
    // =========================================================================

    #[test]
    fn test_flexible_constructor_body_accepted_at_25_preview() {
        let source = "class T{int v;T(int v){if(v<0){v=0;}super();this.v=v;}}";
        assert!(parse(source).unwrap().is_success());
    }

    #[test]
    fn test_flexible_constructor_body_rejected_at_21() {
        let source = "class T{int v;T(int v){if(v<0){v=0;}super();this.v=v;}}";
        let level = LanguageLevel::new(JavaVersion::JAVA_21, ParsingPhase::Standard);
        let result = Parser::with_level(source, level).unwrap().parse();
        assert!(!result.is_success());
        assert!(result
            .errors()
            .iter()
            .any(|e| e.message.contains("constructor")));
    }

    #[test]
    fn test_record_pattern_rejected_at_17() {
        let source = "class T{void m(Object o){if(o instanceof Point(int x,int y)){m(o);}}}";
        let level = LanguageLevel::new(JavaVersion::JAVA_17, ParsingPhase::Standard);
        let result = Parser::with_level(source, level).unwrap().parse();
        assert!(!result.is_success());
    }

    // =========================================================================
    // Assorted grammar corners
    // =========================================================================

    #[test]
    fn test_shift_operators_glue() {
        let source = "class T{void m(int x){int a=x>>2;int b=x>>>3;x>>=1;x>>>=2;int c=x<<1;}}";
        let arena = parse_ok(source);
        assert!(has(&arena, NodeKind::BinaryExpression, span_of(source, "x>>2")));
        assert!(has(&arena, NodeKind::BinaryExpression, span_of(source, "x>>>3")));
        assert!(has(&arena, NodeKind::AssignmentExpression, span_of(source, "x>>=1")));
        assert!(has(&arena, NodeKind::AssignmentExpression, span_of(source, "x>>>=2")));
    }

    #[test]
    fn test_nested_generics_close_without_shift() {
        let source = "class T{java.util.Map<String,java.util.List<Integer>> m=null;}";
        let arena = parse_ok(source);
        assert!(arena.iter().any(|n| n.kind == NodeKind::ParameterizedType));
    }

    #[test]
    fn test_cast_vs_paren() {
        let source = "class T{void m(Object o,int a,int b){int x=(int)o;int y=(a)-b;String s=(String)o;}}";
        let arena = parse_ok(source);
        assert!(has(&arena, NodeKind::CastExpression, span_of(source, "(int)o")));
        // `(a)-b` is subtraction, not a cast of `-b`.
        assert!(!has(&arena, NodeKind::CastExpression, span_of(source, "(a)-b")));
        assert!(has(&arena, NodeKind::CastExpression, span_of(source, "(String)o")));
    }

    #[test]
    fn test_lambda_shapes() {
        let source =
            "class T{void m(){R a=()->go();R b=x->x;R c=(p,q)->p+q;R d=(int v)->{return v;};}}";
        let arena = parse_ok(source);
        assert_eq!(
            arena
                .iter()
                .filter(|n| n.kind == NodeKind::LambdaExpression)
                .count(),
            4
        );
        // Typed lambda parameter carries its attribute.
        let param = arena
            .iter_enumerated()
            .find(|(_, n)| n.kind == NodeKind::ParameterDeclaration && n.span == span_of(source, "int v"))
            .expect("typed lambda parameter");
        match arena.attribute(param.0) {
            Some(Attribute::Parameter(p)) => assert_eq!(p.name.as_str(), "v"),
            other => panic!("unexpected attribute {other:?}"),
        }
    }

    #[test]
    fn test_varargs_parameter_attribute() {
        let source = "class T{static void of(int first,String... rest){}}";
        let arena = parse_ok(source);
        let param = arena
            .iter_enumerated()
            .find(|(_, n)| {
                n.kind == NodeKind::ParameterDeclaration && n.span == span_of(source, "String... rest")
            })
            .expect("varargs parameter");
        match arena.attribute(param.0) {
            Some(Attribute::Parameter(p)) => {
                assert!(p.is_var_args);
                assert_eq!(p.name.as_str(), "rest");
            },
            other => panic!("unexpected attribute {other:?}"),
        }
    }

    #[test]
    fn test_receiver_parameter_attribute() {
        let source = "class T{void m(T this,int x){}}";
        let arena = parse_ok(source);
        let receiver = arena
            .iter_enumerated()
            .find(|(_, n)| n.kind == NodeKind::ParameterDeclaration && n.span == span_of(source, "T this"))
            .expect("receiver parameter");
        match arena.attribute(receiver.0) {
            Some(Attribute::Parameter(p)) => assert!(p.is_receiver),
            other => panic!("unexpected attribute {other:?}"),
        }
    }

    #[test]
    fn test_recovery_keeps_later_members() {
        let source = "class T{int bad=;int good=1;}";
        let (errors, arena) = parse_failure(source);
        assert!(!errors.is_empty());
        assert!(has(&arena, NodeKind::VariableDeclarator, span_of(source, "good=1")));
    }

    #[test]
    fn test_stray_brace_does_not_hang() {
        let (errors, _) = parse_failure("}}} class T{}");
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_type_declaration_names() {
        let source = "class A{} interface B{} enum C{X} record D(int v){} @interface E{}";
        let arena = parse_ok(source);
        let names: Vec<&str> = arena
            .iter_enumerated()
            .filter(|(_, n)| n.kind.is_type_declaration())
            .filter_map(|(id, _)| arena.name_of(id))
            .map(|s| s.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }
}

#[cfg(test)]
/// Parser unit tests.
///
/// These tests pin the tree shape of individual syntactic forms (as S-expressions) and the parser's recovery and
/// diagnostic behavior.
mod tests {
    use super::*;

    const BODY_PREFIX: &str =
        "(compilation_unit (function_definition name: (identifier) parameters: (parameters) body: ";

    fn sexp(source: &str) -> String {
        let parse = parse(source);
        assert!(parse.diagnostics.is_empty(), "unexpected diagnostics for {source:?}: {:#?}", parse.diagnostics);
        parse.root.to_sexp()
    }

    /// S-expression of the body of `def f() = <expr>`.
    fn body(expr: &str) -> String {
        let tree = sexp(&format!("def f() = {expr}\n"));
        match tree.strip_prefix(BODY_PREFIX).and_then(|rest| rest.strip_suffix("))")) {
            Some(body) => body.to_string(),
            None => panic!("not a single function definition: {tree}"),
        }
    }

    /// S-expression of the first node of `kind` in the tree.
    fn first(source: &str, kind: NodeKind) -> String {
        let parse = parse(source);
        assert!(parse.diagnostics.is_empty(), "unexpected diagnostics for {source:?}: {:#?}", parse.diagnostics);
        match parse.root.walk().find(|n| n.kind() == kind) {
            Some(node) => node.to_sexp(),
            None => panic!("no {kind} in {}", parse.root.to_sexp()),
        }
    }

    fn first_clause(pattern: &str) -> String {
        first(&format!("def f() = match x {{ case {pattern} => 1 }}\n"), NodeKind::CaseClause)
    }

    fn codes(parse: &Parse) -> Vec<&'static str> {
        parse.diagnostics.iter().map(Diagnostic::code).collect()
    }

    fn top_level_kinds(parse: &Parse) -> Vec<NodeKind> {
        parse.root.named_children().map(Node::kind).collect()
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    #[test]
    fn test_infix_chains_are_left_associative() {
        assert_eq!(
            body("a + b + c"),
            "(expression (infix_expression left: (infix_expression left: (identifier) operator: (operator_identifier) \
             right: (identifier)) operator: (operator_identifier) right: (identifier)))"
        );
    }

    #[test]
    fn test_prefix_operand_of_infix() {
        assert_eq!(
            body("-a + b"),
            "(expression (infix_expression left: (prefix_expression (identifier)) operator: (operator_identifier) \
             right: (identifier)))"
        );
    }

    #[test]
    fn test_operator_without_operand_is_postfix() {
        assert_eq!(body("a b"), "(expression (postfix_expression (identifier) (identifier)))");
    }

    #[test]
    fn test_field_access_and_call() {
        assert_eq!(
            body("List.map(f, xs)"),
            "(expression (call_expression function: (field_expression value: (identifier) field: (identifier)) \
             arguments: (arguments (expression (identifier)) (expression (identifier)))))"
        );
    }

    #[test]
    fn test_type_application() {
        assert_eq!(
            body("f[Int32](x)"),
            "(expression (call_expression function: (generic_function function: (expression (identifier)) \
             type_arguments: (type_arguments (type_identifier))) arguments: (arguments (expression (identifier)))))"
        );
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            body("x := 1"),
            "(expression (assignment_expression left: (identifier) right: (expression (integer_literal))))"
        );
    }

    #[test]
    fn test_ascription() {
        assert_eq!(body("x: Int32"), "(expression (ascription_expression (identifier) (type_identifier)))");
    }

    #[test]
    fn test_colon_call_with_block() {
        assert_eq!(
            body("f: { 1 }"),
            "(expression (call_expression function: (identifier) arguments: (colon_argument (block (expression \
             (integer_literal))))))"
        );
    }

    #[test]
    fn test_lambda_with_typed_bindings() {
        assert_eq!(
            body("(x: Int32) -> x"),
            "(expression (lambda_expression parameters: (bindings (binding name: (identifier) type: \
             (type_identifier))) (expression (identifier))))"
        );
    }

    #[test]
    fn test_wildcard_lambda() {
        assert_eq!(
            body("_ -> 1"),
            "(expression (lambda_expression parameters: (wildcard) (expression (integer_literal))))"
        );
    }

    #[test]
    fn test_parenthesized_tuple_and_unit() {
        assert_eq!(body("(x)"), "(expression (parenthesized_expression (expression (identifier))))");
        assert_eq!(
            body("(1, 2)"),
            "(expression (tuple_expression (expression (integer_literal)) (expression (integer_literal))))"
        );
        assert_eq!(body("()"), "(expression (unit))");
    }

    #[test]
    fn test_instance_expression() {
        assert_eq!(
            body("new Foo(1)"),
            "(expression (instance_expression (type_identifier) arguments: (arguments (expression \
             (integer_literal)))))"
        );
    }

    #[test]
    fn test_string_interpolation() {
        assert_eq!(body(r#""hi $name!""#), "(expression (interpolated_string (interpolation (identifier))))");
        assert_eq!(
            body(r#""a${ if (b) 1 else 2 }c""#),
            "(expression (interpolated_string (interpolation (block (expression (if_expression condition: \
             (parenthesized_expression (expression (identifier))) consequence: (expression (integer_literal)) \
             alternative: (expression (integer_literal))))))))"
        );
    }

    #[test]
    fn test_interpolator_prefix() {
        assert_eq!(
            body(r#"regex"a+""#),
            "(expression (interpolated_string_expression interpolator: (identifier) (interpolated_string)))"
        );
    }

    // ---------------------------------------------------------------------
    // Control forms
    // ---------------------------------------------------------------------

    #[test]
    fn test_match_with_case_block() {
        assert_eq!(
            body("match x { case 1 => 1 case _ => 0 }"),
            "(expression (match_expression value: (expression (identifier)) body: (expression (case_block \
             (case_clause pattern: (integer_literal) body: (expression (integer_literal))) (case_clause pattern: \
             (wildcard) body: (expression (integer_literal)))))))"
        );
    }

    #[test]
    fn test_while_forms() {
        assert_eq!(
            body("while (x) f()"),
            "(expression (while_expression condition: (parenthesized_expression (expression (identifier))) body: \
             (expression (call_expression function: (identifier) arguments: (arguments)))))"
        );
        assert_eq!(
            body("while x < 10 do f()"),
            "(expression (while_expression condition: (expression (infix_expression left: (identifier) operator: \
             (operator_identifier) right: (integer_literal))) body: (expression (call_expression function: \
             (identifier) arguments: (arguments)))))"
        );
    }

    #[test]
    fn test_foreach_and_comprehension() {
        assert_eq!(
            body("foreach (x <- xs) println(x)"),
            "(expression (for_expression (foreach_expression enumerators: (enumerators (enumerator (identifier) \
             (expression (identifier)))) body: (expression (call_expression function: (identifier) arguments: \
             (arguments (expression (identifier))))))))"
        );
        assert_eq!(
            body("forM (x <- xs; y <- ys) yield x"),
            "(expression (for_expression (foreach_yield_expression enumerators: (enumerators (enumerator \
             (identifier) (expression (identifier))) (enumerator (identifier) (expression (identifier)))) body: \
             (expression (identifier)))))"
        );
    }

    #[test]
    fn test_comprehension_requires_yield() {
        let parse = parse("def f() = forA (x <- xs) x\n");
        assert_eq!(codes(&parse), vec!["flix::parse::unexpected_token"]);
        assert!(parse.root.has_error());
    }

    #[test]
    fn test_try_catch() {
        assert_eq!(
            body("try f() catch { case e: Exception => 0 }"),
            "(expression (try_expression body: (expression (call_expression function: (identifier) arguments: \
             (arguments))) (catch_clause (expression (case_block (case_clause pattern: (typed_pattern pattern: \
             (identifier) type: (type_identifier)) body: (expression (integer_literal))))))))"
        );
    }

    #[test]
    fn test_query_expression() {
        assert_eq!(
            body("query p select x from y"),
            "(expression (query_expression (expression (identifier)) (expression (identifier)) (expression \
             (identifier))))"
        );
    }

    #[test]
    fn test_rel_block() {
        assert_eq!(
            body("#{ Edge(1, 2). Path(x, y) :- Edge(x, y). }"),
            "(expression (rel_block (rel_clause head: (rel_fact functor: (identifier) (atom (integer_literal)) \
             (atom (integer_literal))) (dot)) (rel_clause head: (rel_fact functor: (identifier) (atom (identifier)) \
             (atom (identifier))) body: (rel_body (rel_fact functor: (identifier) (atom (identifier)) (atom \
             (identifier)))) (dot))))"
        );
    }

    #[test]
    fn test_return_without_value() {
        assert_eq!(body("return"), "(expression (return_expression))");
    }

    // ---------------------------------------------------------------------
    // Bodies and layout
    // ---------------------------------------------------------------------

    #[test]
    fn test_unbraced_body_continues_after_let() {
        assert_eq!(
            body("let x = 1; x"),
            "(let_definition pattern: (identifier) value: (expression (integer_literal))) (expression (identifier))"
        );
    }

    #[test]
    fn test_indented_body() {
        let tree = sexp("def f(): Int32 =\n    let x = 1\n    x + 1\n");
        assert_eq!(
            tree,
            "(compilation_unit (function_definition name: (identifier) parameters: (parameters) return_type: \
             (type_identifier) body: (expression (indented_block (let_definition pattern: (identifier) value: \
             (expression (integer_literal))) (expression (infix_expression left: (identifier) operator: \
             (operator_identifier) right: (integer_literal)))))))"
        );
    }

    #[test]
    fn test_sibling_definitions_end_an_unbraced_body() {
        let parse = parse("def f() = let x = 1\ndef g() = 2\n");
        assert!(parse.diagnostics.is_empty(), "{:#?}", parse.diagnostics);
        assert_eq!(top_level_kinds(&parse), vec![NodeKind::FunctionDefinition, NodeKind::FunctionDefinition]);
    }

    // ---------------------------------------------------------------------
    // Patterns
    // ---------------------------------------------------------------------

    #[test]
    fn test_enum_pattern_with_guard() {
        assert_eq!(
            first("def f() = match x { case Some(y) if y > 0 => y }\n", NodeKind::CaseClause),
            "(case_clause pattern: (enum_pattern type: (type_identifier) pattern: (identifier)) (guard condition: \
             (infix_expression left: (identifier) operator: (operator_identifier) right: (integer_literal))) body: \
             (expression (identifier)))"
        );
    }

    #[test]
    fn test_infix_tuple_and_alternative_patterns() {
        assert_eq!(
            first_clause("x :: xs"),
            "(case_clause pattern: (infix_pattern left: (identifier) operator: (operator_identifier) right: \
             (identifier)) body: (expression (integer_literal)))"
        );
        assert_eq!(
            first_clause("(a, _)"),
            "(case_clause pattern: (tuple_pattern (identifier) (wildcard)) body: (expression (integer_literal)))"
        );
        assert_eq!(
            first_clause("A | B"),
            "(case_clause pattern: (alternative_pattern (identifier) (identifier)) body: (expression \
             (integer_literal)))"
        );
    }

    #[test]
    fn test_capture_and_qualified_patterns() {
        assert_eq!(
            first_clause("all @ Some(_)"),
            "(case_clause pattern: (capture_pattern name: (identifier) pattern: (enum_pattern type: \
             (type_identifier) pattern: (wildcard))) body: (expression (integer_literal)))"
        );
        assert_eq!(
            first_clause("Color.Red"),
            "(case_clause pattern: (qual_identifier (identifier) (identifier)) body: (expression (integer_literal)))"
        );
    }

    #[test]
    fn test_record_pattern() {
        assert_eq!(
            first_clause("{ x = 1 }"),
            "(case_clause pattern: (record_pattern (identifier) (expression (integer_literal))) body: (expression \
             (integer_literal)))"
        );
    }

    // ---------------------------------------------------------------------
    // Definitions and types
    // ---------------------------------------------------------------------

    #[test]
    fn test_function_with_tuple_and_function_types() {
        assert_eq!(
            first("def f(g: Int32 -> Bool): (Int32, Bool) = (1, true)\n", NodeKind::FunctionDefinition),
            "(function_definition name: (identifier) parameters: (parameters (parameter name: (identifier) type: \
             (function_type parameter_types: (parameter_types (type_identifier)) return_type: (type_identifier)))) \
             return_type: (tuple_type (type_identifier) (type_identifier)) body: (expression (tuple_expression \
             (expression (integer_literal)) (expression (boolean_literal)))))"
        );
    }

    #[test]
    fn test_effect_type() {
        assert_eq!(
            sexp("def f(): Unit \\ IO = ()\n"),
            "(compilation_unit (function_definition name: (identifier) parameters: (parameters) return_type: \
             (effect_type left: (type_identifier) right: (type_identifier)) body: (expression (unit))))"
        );
    }

    #[test]
    fn test_qualified_and_singleton_types() {
        assert_eq!(
            sexp("def f(x: a.type): A.B.C = x\n"),
            "(compilation_unit (function_definition name: (identifier) parameters: (parameters (parameter name: \
             (identifier) type: (singleton_type (identifier)))) return_type: (qual_type_identifier (qual_identifier \
             (identifier) (identifier)) (type_identifier)) body: (expression (identifier))))"
        );
    }

    #[test]
    fn test_type_alias() {
        assert_eq!(
            sexp("type alias M = Map[String, Int32]\n"),
            "(compilation_unit (type_definition (alias_modifier) name: (type_identifier) type: (generic_type type: \
             (type_identifier) type_arguments: (type_arguments (type_identifier) (type_identifier)))))"
        );
    }

    #[test]
    fn test_enum_cases() {
        assert_eq!(
            sexp("enum Color {\n    case Red, Green\n    case Blue(Int32)\n}\n"),
            "(compilation_unit (enum_definition (type_identifier) body: (enum_body (enum_case_definitions \
             (simple_enum_case name: (identifier)) (simple_enum_case name: (identifier))) (enum_case_definitions \
             (simple_enum_case name: (enum_pattern type: (type_identifier) pattern: (type_identifier)))))))"
        );
    }

    #[test]
    fn test_instance_definition() {
        assert_eq!(
            sexp("instance Eq[Int32] {\n    def eq(x: Int32, y: Int32): Bool = true\n}\n"),
            "(compilation_unit (instance_definition name: (identifier) type_parameters: (type_parameters \
             (type_parameter name: (identifier))) body: (template_body (function_definition name: (identifier) \
             parameters: (parameters (parameter name: (identifier) type: (type_identifier)) (parameter name: \
             (identifier) type: (type_identifier))) return_type: (type_identifier) body: (expression \
             (boolean_literal))))))"
        );
    }

    #[test]
    fn test_use_with_selectors() {
        assert_eq!(
            sexp("use A.B.{c, d}\n"),
            "(compilation_unit (use_declaration path: (identifier) (identifier) (namespace_selectors (identifier) \
             (identifier))))"
        );
    }

    #[test]
    fn test_module_with_body() {
        assert_eq!(
            sexp("mod A.B {\n    def f(): Int32 = 1\n}\n"),
            "(compilation_unit (mod_definition name: (mod_identifier (identifier) (identifier)) body: (template_body \
             (function_definition name: (identifier) parameters: (parameters) return_type: (type_identifier) body: \
             (expression (integer_literal))))))"
        );
    }

    #[test]
    fn test_annotation_on_its_own_line() {
        assert_eq!(
            sexp("@Test\npub def f(): Bool = true\n"),
            "(compilation_unit (function_definition (annotation name: (type_identifier)) (modifiers) name: \
             (identifier) parameters: (parameters) return_type: (type_identifier) body: (expression \
             (boolean_literal))))"
        );
    }

    #[test]
    fn test_declaration_without_body() {
        assert_eq!(
            first("class Show[a] {\n    def show(x: a): String\n}\n", NodeKind::FunctionDeclaration),
            "(function_declaration name: (identifier) parameters: (parameters (parameter name: (identifier) type: \
             (type_identifier))) return_type: (type_identifier))"
        );
    }

    // ---------------------------------------------------------------------
    // Conflicts
    // ---------------------------------------------------------------------

    #[test]
    fn test_conflict_registry_is_well_formed() {
        for conflict in Conflict::ALL {
            let (first, second) = conflict.alternatives();
            assert_ne!(first, second, "{conflict:?}");
            assert!(!conflict.to_string().is_empty());
        }
    }

    #[test]
    fn test_undecidable_lookahead_reports_ambiguity() {
        let tokens: Vec<Token> = lexer::lex("def f() = (x")
            .tokens
            .into_iter()
            .filter(|t| !matches!(t.kind, TokenKind::Error(_)))
            .collect();
        let parse = parse_tokens(tokens, &ParseOptions::default());
        assert!(codes(&parse).contains(&"flix::parse::unresolved_ambiguity"), "{:#?}", parse.diagnostics);

        // With the lexer's own diagnostic present, the inconclusive scan is expected and stays quiet.
        let parse = super::parse("def f() = (x");
        assert!(!codes(&parse).contains(&"flix::parse::unresolved_ambiguity"), "{:#?}", parse.diagnostics);
        assert!(codes(&parse).contains(&"flix::lex::unterminated_block"));
    }

    // ---------------------------------------------------------------------
    // Recovery and limits
    // ---------------------------------------------------------------------

    #[test]
    fn test_recovery_resumes_at_next_definition() {
        let parse = parse("def a() = 1\ndef g(): = 2\ndef b() = 3\n");
        assert_eq!(
            top_level_kinds(&parse),
            vec![NodeKind::FunctionDefinition, NodeKind::Error, NodeKind::FunctionDefinition]
        );
        assert_eq!(codes(&parse), vec!["flix::parse::unexpected_token"]);
        assert!(!parse.is_partial());
    }

    #[test]
    fn test_stray_expression_at_top_level() {
        let parse = parse("1 + 2\ndef f() = 1\n");
        assert_eq!(top_level_kinds(&parse), vec![NodeKind::Error, NodeKind::FunctionDefinition]);
        assert_eq!(codes(&parse), vec!["flix::parse::unexpected_token"]);
    }

    #[test]
    fn test_nesting_guard_is_fatal() {
        let source = format!("def f() = {}1{}\n", "(".repeat(100), ")".repeat(100));
        let parse = parse_with_options(&source, &ParseOptions::new().with_max_nesting_depth(32));
        assert_eq!(codes(&parse), vec!["flix::parse::nesting_too_deep"]);
        assert!(parse.is_partial());
        assert_eq!(top_level_kinds(&parse), vec![NodeKind::Error]);
    }

    #[test]
    fn test_long_left_nested_chains_hit_the_nesting_guard() {
        let sources = [
            format!("def f(): Int32 = a{}\n", ".b".repeat(20_000)),
            format!("def f(): Int32 = a{}\n", " + a".repeat(200_000)),
            format!("def f(): Int32 = match x {{ case {}_ => 1 }}\n", "a @ ".repeat(20_000)),
            format!("def f(): Int32 = match x {{ case a{} => 1 }}\n", " | a".repeat(20_000)),
            format!("def f(): A{} = 1\n", ".B".repeat(20_000)),
        ];
        for source in &sources {
            let parse = parse(source);
            assert_eq!(codes(&parse), vec!["flix::parse::nesting_too_deep"], "{}", &source[..40]);
            assert!(parse.is_partial());
            assert_eq!(top_level_kinds(&parse), vec![NodeKind::Error]);
        }
    }

    #[test]
    fn test_chains_within_the_nesting_limit_parse() {
        let parse = parse(&format!("def f(): Int32 = a{}{}\n", ".b".repeat(40), " + a".repeat(40)));
        assert!(parse.diagnostics.is_empty(), "{:#?}", parse.diagnostics);
        assert!(!parse.is_partial());

        // Levels charged by one chain are released before the next.
        let chain = " + a".repeat(60);
        let twice = super::parse(&format!("def f(): Int32 =\n    let x = a{chain}\n    let y = a{chain}\n    y\n"));
        assert!(twice.diagnostics.is_empty(), "{:#?}", twice.diagnostics);
    }

    #[test]
    fn test_unclosed_group_does_not_swallow_later_definitions() {
        for source in [
            "def a(): Int32 = 1\ndef b(: Int32 = 2\ndef c(): Int32 = 3\n",
            "def a(): Int32 = 1\ndef b(): List[Int32 = 2\ndef c(): Int32 = 3\n",
            "def a(): Int32 = f(1,\ndef c(): Int32 = 3\n",
        ] {
            let parse = parse(source);
            assert!(codes(&parse).contains(&"flix::lex::unterminated_block"), "{source:?}: {:#?}", parse.diagnostics);
            assert!(!parse.is_partial());
            let kinds = top_level_kinds(&parse);
            assert_eq!(kinds.last(), Some(&NodeKind::FunctionDefinition), "{source:?}: {kinds:?}");
            assert!(kinds.contains(&NodeKind::Error), "{source:?}: {kinds:?}");
        }
    }

    #[test]
    fn test_spans_cover_children_in_order() {
        let source = "def f(x: Int32): Int32 =\n    let y = x * 2\n    match y { case 0 => 1 case _ => y }\n";
        let parse = parse(source);
        assert!(parse.diagnostics.is_empty(), "{:#?}", parse.diagnostics);
        for node in parse.root.walk() {
            let spans: Vec<Span> = node.children().iter().map(|c| c.span()).collect();
            for pair in spans.windows(2) {
                assert!(pair[0].end <= pair[1].start, "{} children overlap", node.kind());
            }
            if let (Some(first), Some(last)) = (spans.first(), spans.last()) {
                assert_eq!(node.span(), first.merge(*last), "{} span", node.kind());
            }
        }
        assert_eq!(parse.root.span().end, source.len());
    }
}

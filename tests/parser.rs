#[cfg(test)]
mod parser_tests {
    use rox::ast::{Expr, Stmt};
    use rox::ast_printer::AstPrinter;
    use rox::error::LoxError;
    use rox::parser::Parser;
    use rox::scanner::tokenize;

    fn parse(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        Parser::new(tokens).parse()
    }

    fn printed(source: &str) -> Vec<String> {
        let printer = AstPrinter;
        parse(source)
            .unwrap_or_else(|errors| panic!("parse failed: {:?}", errors))
            .iter()
            .map(|stmt| printer.print_stmt(stmt))
            .collect()
    }

    fn parse_errors(source: &str) -> Vec<String> {
        match parse(source) {
            Ok(_) => panic!("expected parse errors for {:?}", source),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_precedence_and_left_associativity() {
        assert_eq!(
            printed("1 + 2 * 3 - 4 / 2;"),
            vec!["(; (- (+ 1.0 (* 2.0 3.0)) (/ 4.0 2.0)))"]
        );
        assert_eq!(printed("1 - 2 - 3;"), vec!["(; (- (- 1.0 2.0) 3.0))"]);
        assert_eq!(
            printed("1 < 2 == 3 >= 4;"),
            vec!["(; (== (< 1.0 2.0) (>= 3.0 4.0)))"]
        );
    }

    #[test]
    fn test_unary_is_right_associative() {
        assert_eq!(printed("!!true;"), vec!["(; (! (! true)))"]);
        assert_eq!(printed("-(-1);"), vec!["(; (- (group (- 1.0))))"]);
    }

    #[test]
    fn test_logical_operators_bind_looser_than_equality() {
        assert_eq!(
            printed("a or b and c == d;"),
            vec!["(; (or a (and b (== c d))))"]
        );
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
    }

    #[test]
    fn test_call_and_property_chains() {
        assert_eq!(printed("a.b().c;"), vec!["(; (. (call (. a b)) c))"]);
        assert_eq!(
            printed("obj.field = f(1)(2);"),
            vec!["(; (= (. obj field) (call (call f 1.0) 2.0)))"]
        );
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        assert_eq!(
            printed("if (a) if (b) print 1; else print 2;"),
            vec!["(if a (if b (print 1.0) (print 2.0)))"]
        );
    }

    #[test]
    fn test_for_desugars_into_while() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
        assert_eq!(
            printed("for (;;) print 1;"),
            vec!["(while true (block (print 1.0)))"]
        );
    }

    #[test]
    fn test_class_with_superclass_and_methods() {
        assert_eq!(
            printed("class B < A { init(x) { this.x = x; } get() { return super.get(); } }"),
            vec!["(class B < A (fun init(x) (; (= (. this x) x))) (fun get() (return (call (super get)))))"]
        );
    }

    #[test]
    fn test_resolvable_expressions_get_distinct_ids() {
        let statements = parse("a = b; print a;").expect("parses");

        let mut ids = Vec::new();
        for stmt in &statements {
            match stmt {
                Stmt::Expression(Expr::Assign { id, value, .. }) => {
                    ids.push(*id);
                    if let Expr::Variable { id, .. } = value.as_ref() {
                        ids.push(*id);
                    }
                }
                Stmt::Print(Expr::Variable { id, .. }) => ids.push(*id),
                other => panic!("unexpected statement {:?}", other),
            }
        }

        assert_eq!(ids.len(), 3);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_first_id_seed_is_respected() {
        let (tokens, _) = tokenize("x;");
        let mut parser = Parser::with_first_id(tokens, 100);
        let statements = parser.parse().expect("parses");

        match &statements[0] {
            Stmt::Expression(Expr::Variable { id, .. }) => assert_eq!(id.0, 100),
            other => panic!("unexpected statement {:?}", other),
        }
        assert_eq!(parser.next_id(), 101);
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert_eq!(
            parse_errors("1 + 2 = 3;"),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
    }

    #[test]
    fn test_missing_semicolon_reports_at_offending_token() {
        assert_eq!(
            parse_errors("print 1\nprint 2;"),
            vec!["[line 2] Error at 'print': Expect ';' after value."]
        );
        assert_eq!(
            parse_errors("var a = 1"),
            vec!["[line 1] Error at end: Expect ';' after variable declaration."]
        );
    }

    #[test]
    fn test_recovery_reports_errors_from_later_statements() {
        let errors = parse_errors("var = 1;\nprint (2;\nvar ok = 3;\nfun f( { }");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expect variable name.",
                "[line 2] Error at ';': Expect ')' after expression.",
                "[line 4] Error at '{': Expect parameter name.",
            ]
        );
    }

    #[test]
    fn test_too_many_arguments_is_reported_but_not_fatal() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});\nprint (;", args.join(", "));

        let errors = parse_errors(&source);

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            "[line 1] Error at '255': Can't have more than 255 arguments."
        );
        assert_eq!(errors[1], "[line 2] Error at ';': Expect expression.");
    }

    #[test]
    fn test_too_many_parameters_is_reported() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        assert_eq!(
            parse_errors(&source),
            vec!["[line 1] Error at 'p255': Can't have more than 255 parameters."]
        );
    }

    #[test]
    fn test_super_requires_method_name() {
        assert_eq!(
            parse_errors("super;"),
            vec!["[line 1] Error at ';': Expect '.' after 'super'."]
        );
    }
}

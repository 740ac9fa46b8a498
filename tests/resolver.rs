#[cfg(test)]
mod resolver_tests {
    use rox::ast::{Expr, Stmt};
    use rox::interpreter::Locals;
    use rox::parser::Parser;
    use rox::resolver::Resolver;
    use rox::scanner::tokenize;

    fn parse(source: &str) -> Vec<Stmt> {
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        Parser::new(tokens)
            .parse()
            .unwrap_or_else(|errors| panic!("parse failed: {:?}", errors))
    }

    fn resolve_errors(source: &str) -> Vec<String> {
        let statements = parse(source);
        match Resolver::new().resolve(&statements) {
            Ok(_) => Vec::new(),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_globals_are_left_unresolved() {
        let statements = parse("var a = 1; print a;");
        let locals: Locals = Resolver::new().resolve(&statements).expect("resolves");

        assert!(locals.is_empty());
    }

    #[test]
    fn test_distances_count_enclosing_scopes() {
        let statements = parse("{ var a = 1; { { print a; } } }");
        let locals: Locals = Resolver::new().resolve(&statements).expect("resolves");

        // { a   { { print a } } }
        let Stmt::Block(outer) = &statements[0] else {
            panic!("expected block");
        };
        let Stmt::Block(middle) = &outer[1] else {
            panic!("expected block");
        };
        let Stmt::Block(inner) = &middle[0] else {
            panic!("expected block");
        };
        let Stmt::Print(Expr::Variable { id, .. }) = &inner[0] else {
            panic!("expected print of a variable");
        };

        assert_eq!(locals.get(id), Some(&2));
    }

    #[test]
    fn test_function_parameters_are_one_scope_out_from_body_blocks() {
        let statements = parse("fun f(x) { { return x; } }");
        let locals: Locals = Resolver::new().resolve(&statements).expect("resolves");

        let Stmt::Function(decl) = &statements[0] else {
            panic!("expected function");
        };
        let Stmt::Block(body) = &decl.body[0] else {
            panic!("expected block");
        };
        let Stmt::Return {
            value: Some(Expr::Variable { id, .. }),
            ..
        } = &body[0]
        else {
            panic!("expected return of a variable");
        };

        assert_eq!(locals.get(id), Some(&1));
    }

    #[test]
    fn test_read_in_own_initializer_is_rejected() {
        assert_eq!(
            resolve_errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
        assert_eq!(
            resolve_errors("var a = a;"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_shadowing_outer_variable_in_initializer_is_rejected() {
        assert_eq!(
            resolve_errors("var a = 1; { var a = a + 1; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_redeclaration_in_same_local_scope() {
        assert_eq!(
            resolve_errors("fun f(a) { var a = 1; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
        assert!(resolve_errors("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_misplaced_return_this_and_super() {
        assert_eq!(
            resolve_errors("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
        assert_eq!(
            resolve_errors("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
        assert_eq!(
            resolve_errors("fun f() { super.g(); }"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
        assert_eq!(
            resolve_errors("class A { m() { super.m(); } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_initializer_rules() {
        assert_eq!(
            resolve_errors("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
        assert!(resolve_errors("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_class_cannot_inherit_from_itself() {
        assert_eq!(
            resolve_errors("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_all_errors_in_a_program_are_collected() {
        let errors = resolve_errors("return;\nprint this;\n{ var b = 1; var b = 2; }");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at 'return': Can't return from top-level code.",
                "[line 2] Error at 'this': Can't use 'this' outside of a class.",
                "[line 3] Error at 'b': Already a variable with this name in this scope.",
            ]
        );
    }

    #[test]
    fn test_context_is_restored_after_nested_functions() {
        // The inner function must not leave the resolver thinking it is still
        // inside a function once the outer body ends.
        let errors = resolve_errors("fun outer() { fun inner() { return 1; } return 2; }\nreturn 3;");

        assert_eq!(
            errors,
            vec!["[line 2] Error at 'return': Can't return from top-level code."]
        );
    }
}

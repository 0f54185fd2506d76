use crate::{
    lexer::prelude::{LexicalErrorType, Lexer, Token},
    parser::prelude::{parse_module, ExprKind, ParseError, ParseErrorType, Parser, StmtKind, UpdateOperator}
};

/// Parses `expr` as the only statement of `main` and prints it back.
fn grouping_of(expr: &str) -> String {
    let src = format!("int main() {{ {expr}; }}");
    let module = parse_module(&src).unwrap();
    let program = &module.program;

    let body = program.function("main").and_then(|main| main.body).unwrap();

    match &program.arena.stmt(body).kind {
        StmtKind::Block(statements) => match &program.arena.stmt(statements[0]).kind {
            StmtKind::Expression(id) => program.arena.expr_to_string(*id),
            other => panic!("Expected an expression statement, got {other:?}")
        },
        other => panic!("Expected a block, got {other:?}")
    }
}

fn error_of(src: &str) -> ParseErrorType {
    match parse_module(src) {
        Err(err) => err.error,
        Ok(module) => panic!("Expected an error for {src:?}, got:\n{}", module.program)
    }
}

#[test]
fn test_precedence() {
    let cases = vec![
        ("a + b * c", "(a + (b * c))"),
        ("a - b - c", "((a - b) - c)"),
        ("a * b % c / d", "(((a * b) % c) / d)"),
        ("1 << 2 + 3", "(1 << (2 + 3))"),
        ("a < b == c > d", "((a < b) == (c > d))"),
        ("a & b == c", "(a & (b == c))"),
        ("a | b ^ c & d", "(a | (b ^ (c & d)))"),
        ("a || b && c", "(a || (b && c))"),
        ("(a + b) * c", "((a + b) * c)"),
        ("-a * b", "((-a) * b)"),
        ("!a == b", "((!a) == b)"),
        ("~a & 3", "((~a) & 3)"),
        ("-x++", "(-(x++))"),
        ("a+++b", "((a++) + b)"),
        ("--i < 0", "((--i) < 0)"),
        ("f(a, b + 1) * 2", "(f(a, (b + 1)) * 2)"),
        ("rand()", "rand()"),
    ];

    for (input, expected) in cases {
        assert_eq!(grouping_of(input), expected, "input: {input}");
    }
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(grouping_of("a = b = c"), "(a = (b = c))");
    assert_eq!(grouping_of("x += y *= 2"), "(x += (y *= 2))");
    assert_eq!(grouping_of("x <<= 1 + 1"), "(x <<= (1 + 1))");
    assert_eq!(grouping_of("a = b || c"), "(a = (b || c))");
}

#[test]
fn test_conditional_and_comma() {
    assert_eq!(grouping_of("a ? b : c ? d : e"), "(a ? b : (c ? d : e))");
    assert_eq!(grouping_of("x = a ? 1 : 2"), "(x = (a ? 1 : 2))");
    assert_eq!(grouping_of("x = a, b"), "((x = a), b)");
    assert_eq!(grouping_of("a, b, c"), "((a, b), c)");
    assert_eq!(grouping_of("f((a, b), c)"), "f((a, b), c)");
}

#[test]
fn test_update_targets() {
    let module = parse_module("int main() { x++; --y; }").unwrap();
    let arena = &module.program.arena;

    let body = module.program.function("main").and_then(|main| main.body).unwrap();

    let StmtKind::Block(statements) = &arena.stmt(body).kind else {
        panic!("Expected a block");
    };

    let kinds = statements.iter()
        .map(|id| match &arena.stmt(*id).kind {
            StmtKind::Expression(expr) => arena.expr(*expr).kind.clone(),
            other => panic!("Unexpected statement {other:?}")
        })
        .collect::<Vec<ExprKind>>();

    assert!(matches!(
        &kinds[0],
        ExprKind::Postfix { operator: UpdateOperator::Increment, target } if target.value == "x"
    ));
    assert!(matches!(
        &kinds[1],
        ExprKind::Prefix { operator: UpdateOperator::Decrement, target } if target.value == "y"
    ));
}

#[test]
fn test_program_shape() -> Result<(), ParseError> {
    let input = r#"
        int putchar(int c);
        int g = 42, h;

        int add(int a, int b) {
            return a + b;
        }

        int main() {
            int i;
            for (i = 0; i < 3; i++) ;
            while (1) break;
            do { i--; } while (i);
            if (i) return 1; else return add(g, h);
        }
    "#;

    let module = parse_module(input)?;
    let program = &module.program;

    let names = program.functions.iter()
        .map(|function| function.name.value.as_str())
        .collect::<Vec<&str>>();

    assert_eq!(names, vec!["putchar", "add", "main"]);
    assert!(program.functions[0].body.is_none());
    assert_eq!(program.functions[1].params.len(), 2);

    let globals = program.globals.iter()
        .map(|global| (global.name.value.as_str(), global.initializer.is_some()))
        .collect::<Vec<_>>();

    assert_eq!(globals, vec![("g", true), ("h", false)]);

    // prototypes are skipped when looking up a definition
    assert!(program.function("putchar").is_none());
    assert!(program.function("add").is_some());

    Ok(())
}

#[test]
fn test_pretty_print() -> Result<(), ParseError> {
    let input = r#"
        int g = 42;
        int f(int a);
        int main() { for (int i = 0; i < 3; i++) g += i; return g; }
    "#;

    let module = parse_module(input)?;

    assert_eq!(
        module.program.to_string(),
        "int g = 42;\n\
         int f(int a);\n\
         int main()\n\
         {\n    for (int i = 0; (i < 3); (i++))\n        (g += i);\n    return g;\n}\n"
    );

    Ok(())
}

#[test]
fn test_empty_for_clauses() -> Result<(), ParseError> {
    let module = parse_module("int main() { for (;;) { break; } return 0; }")?;
    let program = &module.program;

    let body = program.function("main").and_then(|main| main.body).unwrap();
    let StmtKind::Block(statements) = &program.arena.stmt(body).kind else {
        panic!("Expected a block");
    };

    assert!(matches!(
        program.arena.stmt(statements[0]).kind,
        StmtKind::For { init: None, condition: None, step: None, .. }
    ));

    Ok(())
}

#[test]
fn test_stream_parse() -> Result<(), ParseError> {
    let input = "int main() { return 7; }";

    let lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);

    let module = parser.parse()?;

    assert_eq!(module.program.functions.len(), 1);
    assert_eq!(module.program.arena.stmt_count(), 2);

    Ok(())
}

#[test]
fn test_invalid_programs() {
    assert_eq!(
        error_of("int main() { int a = 1 }"),
        ParseErrorType::UnexpectedToken { token: Token::RBrace, expected: vec!["`;`".into()] }
    );

    assert_eq!(
        error_of("int main() {"),
        ParseErrorType::UnexpectedToken { token: Token::Eof, expected: vec!["`}`".into()] }
    );

    assert_eq!(error_of("int main() { 1 = 2; }"), ParseErrorType::InvalidAssignmentTarget);
    assert_eq!(error_of("int main() { 5++; }"), ParseErrorType::InvalidAssignmentTarget);
    assert_eq!(error_of("int main() { (a + b) += 1; }"), ParseErrorType::InvalidAssignmentTarget);

    assert_eq!(
        error_of("int main() { return *; }"),
        ParseErrorType::ExpectedExpression { token: Token::Star }
    );

    assert_eq!(error_of("int 5;"), ParseErrorType::ExpectedIdent);

    assert_eq!(
        error_of("main() {}"),
        ParseErrorType::UnexpectedToken { token: Token::Ident("main".into()), expected: vec!["`int`".into()] }
    );
}

#[test]
fn test_lex_error_wins() {
    match error_of("int main() { return 1 $ 2; }") {
        ParseErrorType::LexError { error } => {
            assert_eq!(error.error, LexicalErrorType::UnknownCharacter { ch: '$' })
        },
        other => panic!("Expected a lexical error, got {other:?}")
    }
}

#[test]
fn test_error_line_and_column() {
    let src = "int main() {\n    int a = 1;\n    return a +;\n}\n";

    match parse_module(src) {
        Err(err) => {
            let position = err.span.line_col(src);

            assert_eq!((position.line, position.column), (3, 15));
            assert_eq!(position.to_string(), "3:15");
        },
        Ok(_) => panic!("Expected a syntax error")
    }
}

#[test]
fn test_declarations_need_a_block() {
    let misplaced = [
        "int main() { for (;;) int a; }",
        "int main() { if (1) int a; return 0; }",
        "int main() { if (1) ; else int a; return 0; }",
        "int main() { while (1) int a; }",
        "int main() { do int a; while (0); return 0; }",
    ];

    for src in misplaced {
        assert_eq!(error_of(src), ParseErrorType::MisplacedDeclaration, "{src}");
    }

    let module = parse_module("int main() { for (int i = 0; i < 2; i++) { int a = i; } if (1) { int b; } return 0; }");

    assert!(module.is_ok());
}

#[test]
fn test_definition_skips_prototypes() -> Result<(), ParseError> {
    let module = parse_module("int f(int a); int main() { return f(1); } int f(int a) { return a; }")?;
    let program = &module.program;

    let (function, body) = program.definition("f").unwrap();

    assert_eq!(function.params.len(), 1);
    assert_eq!(Some(body), function.body);
    assert!(program.definition("putchar").is_none());

    Ok(())
}

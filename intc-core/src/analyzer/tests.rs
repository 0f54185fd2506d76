use std::{path::PathBuf, rc::Rc};

use crate::{
    parser::prelude::parse_module,
    utils::prelude::{Error, ModuleWarningEmitter, VectorWarningEmitterIO, Warning as EmittedWarning, WarningEmitter}
};

use super::prelude::{analyze_source, read_module, AnalyzeError, ModuleAnalyzer, Outcome, Warning};

/// Runs the analyzer over `src`, returning its errors and warnings.
fn analyze(src: &str) -> (Vec<AnalyzeError>, Vec<Warning>) {
    let module = parse_module(src).unwrap();
    let sink = Rc::new(VectorWarningEmitterIO::new());

    let emitter = ModuleWarningEmitter::new(
        PathBuf::new(),
        src.to_string(),
        WarningEmitter::new(sink.clone())
    );

    let errors = match ModuleAnalyzer::analyze(module, &emitter) {
        Outcome::Ok(_) => vec![],
        Outcome::PartialFailure(_, errors) => errors
    };

    let warnings = sink.take()
        .into_iter()
        .map(|EmittedWarning::Analyze { warning, .. }| warning)
        .collect();

    (errors, warnings)
}

fn errors(src: &str) -> Vec<AnalyzeError> {
    analyze(src).0
}

fn warnings(src: &str) -> Vec<Warning> {
    analyze(src).1
}

#[test]
fn test_fixtures_are_clean() {
    let fixtures = [
        include_str!("../../fixtures/loops.c"),
        include_str!("../../fixtures/operators.c"),
        include_str!("../../fixtures/operators_simulated.c"),
        include_str!("../../fixtures/globals.c"),
        include_str!("../../fixtures/c_std_calls.c"),
    ];

    for src in fixtures {
        assert_eq!(errors(src), vec![], "{src}");
    }
}

#[test]
fn test_undeclared_variable() {
    let src = "int main() { { int a = 1; } return a; }";

    assert!(matches!(
        errors(src).as_slice(),
        [AnalyzeError::VariableNotDeclared { variable, .. }] if variable == "a"
    ));

    let src = "int main() { b = 2; return 0; }";

    assert!(matches!(
        errors(src).as_slice(),
        [AnalyzeError::VariableNotDeclared { variable, .. }] if variable == "b"
    ));
}

#[test]
fn test_redeclaration_shows_both_locations() {
    let src = "int main() { int a; int a; return a; }";

    match errors(src).as_slice() {
        [AnalyzeError::VariableRedeclaration { location_a, location_b, variable }] => {
            assert_eq!(variable, "a");
            assert!(location_a.start < location_b.start);
        },
        other => panic!("Unexpected errors {other:?}")
    }

    assert_eq!(errors("int main() { int a = 1; { int a = 2; a++; } return a; }"), vec![]);
    assert_eq!(errors("int f(int a) { int b = a; return b; } int main() { return f(1); }"), vec![]);
}

#[test]
fn test_functions() {
    let src = r#"
        int f(int a) { return a; }
        int f(int a) { return 1; }
        int main() { return f(0); }
    "#;

    assert!(matches!(
        errors(src).as_slice(),
        [AnalyzeError::FunctionRedefinition { function, .. }] if function == "f"
    ));

    let src = r#"
        int f(int a, int b);
        int f(int a) { return a; }
        int main() { return f(1); }
    "#;

    assert!(matches!(
        errors(src).as_slice(),
        [AnalyzeError::ArityMismatch { expected: 2, got: 1, .. }]
    ));

    let src = "int main() { return missing(); }";

    assert!(matches!(
        errors(src).as_slice(),
        [AnalyzeError::UndefinedFunction { function, .. }] if function == "missing"
    ));

    let src = "int helper(int a); int main() { return helper(1); }";

    assert!(matches!(
        errors(src).as_slice(),
        [AnalyzeError::UndefinedFunction { function, .. }] if function == "helper"
    ));
}

#[test]
fn test_library_arity() {
    assert!(matches!(
        errors("int main() { putchar(); return 0; }").as_slice(),
        [AnalyzeError::ArityMismatch { function, expected: 1, got: 0, .. }] if function == "putchar"
    ));

    assert!(matches!(
        errors("int rand(int seed); int main() { return 0; }").as_slice(),
        [AnalyzeError::ArityMismatch { function, expected: 0, got: 1, .. }] if function == "rand"
    ));

    // a definition replaces the library function
    assert_eq!(errors("int abs(int a, int b) { return a; } int main() { return abs(1, 2); }"), vec![]);
}

#[test]
fn test_globals() {
    let src = r#"
        int a = 1;
        int b = a + 1;
        int main() { return b; }
    "#;

    assert!(matches!(
        errors(src).as_slice(),
        [AnalyzeError::NonConstantGlobalInitializer { variable, .. }] if variable == "b"
    ));

    assert_eq!(errors("int a = -(3 * 4) ? 1 : 2; int main() { return a; }"), vec![]);

    let src = "int f = 1; int f() { return 0; } int main() { return f; }";

    assert!(matches!(
        errors(src).as_slice(),
        [AnalyzeError::NameConflict { name, .. }] if name == "f"
    ));
}

#[test]
fn test_loop_control() {
    assert!(matches!(
        errors("int main() { break; return 0; }").as_slice(),
        [AnalyzeError::BreakOutsideLoop { .. }]
    ));

    assert!(matches!(
        errors("int main() { if (1) continue; return 0; }").as_slice(),
        [AnalyzeError::ContinueOutsideLoop { .. }]
    ));

    assert_eq!(errors("int main() { while (1) { if (1) break; } return 0; }"), vec![]);
}

#[test]
fn test_main() {
    assert!(matches!(
        errors("int f() { return 0; }").as_slice(),
        [AnalyzeError::MissingMain { .. }]
    ));

    assert!(matches!(
        errors("int main();").as_slice(),
        [AnalyzeError::MissingMain { .. }]
    ));

    assert!(matches!(
        errors("int main(int argc) { return argc; }").as_slice(),
        [AnalyzeError::MainHasParameters { .. }]
    ));
}

#[test]
fn test_errors_are_sorted() {
    let src = "int main() { x = 1; y = 2; break; }";
    let starts: Vec<u32> = errors(src).iter().map(|e| e.start_location()).collect();

    assert_eq!(starts.len(), 3);
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_unused_variable() {
    let found = warnings("int main() { int used = 1, unused; unused = 2; return used; }");

    assert!(matches!(
        found.as_slice(),
        [Warning::UnusedVariable { variable, .. }] if variable == "unused"
    ));

    // compound assignment reads its target
    assert_eq!(warnings("int main() { int a = 1; a += 2; return 0; }"), vec![]);
    assert_eq!(warnings("int g; int main() { g++; return 0; }"), vec![]);
}

#[test]
fn test_unreachable_code() {
    let found = warnings("int main() { return 1; putchar(65); putchar(66); }");

    assert!(matches!(found.as_slice(), [Warning::UnreachableCode { .. }]));

    let found = warnings("int main() { while (1) { break; putchar(65); } return 0; }");

    assert!(matches!(found.as_slice(), [Warning::UnreachableCode { .. }]));
}

#[test]
fn test_constant_conditions() {
    assert!(matches!(
        warnings("int main() { if (0) return 1; return 0; }").as_slice(),
        [Warning::UnreachableIfClause { .. }]
    ));

    assert!(matches!(
        warnings("int main() { if (2) return 1; else return 0; }").as_slice(),
        [Warning::UnreachableElseClause { .. }]
    ));

    assert_eq!(warnings("int main() { if (1) return 1; return 0; }"), vec![]);
}

#[test]
fn test_infinite_loop() {
    let endless = [
        "int main() { for (;;) ; }",
        "int main() { while (1) { } }",
        "int main() { do { } while (7); }",
        "int main() { while (1) { for (;;) break; } }",
    ];

    for src in endless {
        assert!(
            warnings(src).iter().any(|w| matches!(w, Warning::InfiniteLoop { .. })),
            "{src}"
        );
    }

    let bounded = [
        "int main() { for (;;) break; return 0; }",
        "int main() { while (1) { if (1) return 2; } }",
        "int main() { int i = 0; while (i < 3) i++; return 0; }",
    ];

    for src in bounded {
        assert!(
            !warnings(src).iter().any(|w| matches!(w, Warning::InfiniteLoop { .. })),
            "{src}"
        );
    }
}

#[test]
fn test_analyze_source_reports_errors() {
    let sink = Rc::new(VectorWarningEmitterIO::new());
    let src = "int main() { return nope; }";

    let result = analyze_source(PathBuf::from("test.c"), src, sink.clone());

    match result {
        Err(error @ Error::Analyze { .. }) => {
            let rendered = error.pretty_string();

            assert!(rendered.contains("Variable not declared"));
            assert!(rendered.contains("test.c"));
        },
        _ => panic!("Expected analysis to fail")
    }

    let result = analyze_source(PathBuf::from("test.c"), "int main() { return }", sink);

    assert!(matches!(result, Err(Error::Parse { .. })));
}

#[test]
fn test_warnings_render() {
    let sink = Rc::new(VectorWarningEmitterIO::new());
    let src = "int main() { int idle; return 0; }";

    assert!(analyze_source(PathBuf::from("idle.c"), src, sink.clone()).is_ok());

    let rendered: Vec<String> = sink.take().iter().map(|w| w.pretty_string()).collect();

    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("Unused variable"));
    assert!(rendered[0].contains("`idle` is never read"));
}

#[test]
fn test_read_module_skips_checks() {
    let path = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/globals.c"));

    let (module, src) = read_module(path).unwrap();

    assert_eq!(src, include_str!("../../fixtures/globals.c"));
    assert!(module.program.definition("main").is_some());

    let missing = read_module(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/missing.c")));

    assert!(matches!(missing, Err(Error::StdIo { err: std::io::ErrorKind::NotFound })));
}

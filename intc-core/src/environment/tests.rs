use crate::parser::prelude::{BinaryOperator, UnaryOperator};

use super::prelude::{Environment, ScopeError, Value, FALSE, TRUE};

#[test]
fn test_define_and_lookup() -> Result<(), ScopeError> {
    let mut env = Environment::new();

    env.define("g", Value(42))?;

    assert_eq!(env.lookup("g")?, &Value(42));
    assert_eq!(env.lookup("h"), Err(ScopeError::UndefinedVariable("h".into())));

    Ok(())
}

#[test]
fn test_redeclaration_is_per_scope() -> Result<(), ScopeError> {
    let mut env = Environment::new();

    env.push_frame();
    env.define("a", Value(1))?;

    assert_eq!(env.define("a", Value(2)), Err(ScopeError::Redeclaration("a".into())));

    env.push_scope();
    env.define("a", Value(3))?;

    assert_eq!(env.lookup("a")?, &Value(3));

    env.pop_scope();

    assert_eq!(env.lookup("a")?, &Value(1));

    Ok(())
}

#[test]
fn test_assign_writes_nearest_owner() -> Result<(), ScopeError> {
    let mut env = Environment::new();

    env.define("x", Value(0))?;

    env.push_frame();
    env.push_scope();
    env.assign("x", Value(7))?;
    env.pop_scope();
    env.pop_frame();

    assert_eq!(env.lookup("x")?, &Value(7));
    assert_eq!(env.assign("y", Value(1)), Err(ScopeError::UndefinedVariable("y".into())));

    Ok(())
}

#[test]
fn test_shadowing_hides_outer_binding() -> Result<(), ScopeError> {
    let mut env = Environment::new();

    env.define("x", Value(1))?;

    env.push_frame();
    env.define("x", Value(2))?;
    env.assign("x", Value(5))?;
    env.pop_frame();

    assert_eq!(env.lookup("x")?, &Value(1));

    Ok(())
}

#[test]
fn test_frames_do_not_see_caller_locals() -> Result<(), ScopeError> {
    let mut env = Environment::new();

    env.define("g", Value(1))?;

    env.push_frame();
    env.define("local", Value(2))?;

    env.push_frame();
    assert_eq!(env.depth(), 2);
    assert!(env.lookup("local").is_err());
    assert!(env.lookup("g").is_ok());
    env.pop_frame();

    assert!(env.lookup("local").is_ok());

    let popped = env.pop_frame();
    assert_eq!(popped.len(), 1);
    assert_eq!(env.depth(), 0);

    Ok(())
}

#[test]
fn test_value_arithmetic() {
    let cases = vec![
        (-7, BinaryOperator::Divide, 2, Some(-3)),
        (-7, BinaryOperator::Remainder, 2, Some(-1)),
        (7, BinaryOperator::Remainder, -2, Some(1)),
        (1, BinaryOperator::Divide, 0, None),
        (1, BinaryOperator::Remainder, 0, None),
        (i32::MAX, BinaryOperator::Add, 1, Some(i32::MIN)),
        (i32::MIN, BinaryOperator::Divide, -1, Some(i32::MIN)),
        (i32::MIN, BinaryOperator::Remainder, -1, Some(0)),
        (1, BinaryOperator::ShiftLeft, 33, Some(2)),
        (-8, BinaryOperator::ShiftRight, 1, Some(-4)),
        (6, BinaryOperator::BitXor, 3, Some(5)),
        (10, BinaryOperator::GreaterEqual, 3, Some(1)),
        (2, BinaryOperator::LogicalAnd, 0, Some(0)),
    ];

    for (a, operator, b, expected) in cases {
        assert_eq!(
            Value(a).binary(operator, Value(b)),
            expected.map(Value),
            "{a} {} {b}", operator.as_str()
        );
    }
}

#[test]
fn test_division_identity() {
    for a in [-17, -7, -1, 0, 5, 13, i32::MAX] {
        for b in [-5, -2, -1, 1, 3, 7] {
            let q = Value(a).binary(BinaryOperator::Divide, Value(b)).unwrap();
            let r = Value(a).binary(BinaryOperator::Remainder, Value(b)).unwrap();

            assert_eq!(q.0 * b + r.0, a, "{a} / {b}");
        }
    }
}

#[test]
fn test_value_unary() {
    assert_eq!(Value(5).unary(UnaryOperator::Negate), Value(-5));
    assert_eq!(Value(i32::MIN).unary(UnaryOperator::Negate), Value(i32::MIN));
    assert_eq!(Value(0).unary(UnaryOperator::BitNot), Value(-1));
    assert_eq!(Value(0).unary(UnaryOperator::Not), TRUE);
    assert_eq!(Value(9).unary(UnaryOperator::Not), FALSE);
}

#[test]
fn test_exit_code() {
    assert_eq!(Value(462).exit_code(), 206);
    assert_eq!(Value(-1).exit_code(), 255);
    assert_eq!(Value(17).exit_code(), 17);
}

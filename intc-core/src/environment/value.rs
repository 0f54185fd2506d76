use std::fmt::Display;

use crate::parser::prelude::{BinaryOperator, UnaryOperator};

pub const TRUE: Value = Value(1);
pub const FALSE: Value = Value(0);

/// The only kind of value a program can hold: a 32-bit `int` whose
/// arithmetic wraps on overflow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Value(pub i32);

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        if value { TRUE } else { FALSE }
    }
}

impl Value {
    pub fn is_truthy(self) -> bool {
        self.0 != 0
    }

    /// Applies a binary operator. Both logical operators are evaluated
    /// eagerly here; short-circuiting is the caller's job.
    ///
    /// Returns `None` when dividing or taking the remainder by zero.
    pub fn binary(self, operator: BinaryOperator, rhs: Value) -> Option<Value> {
        let (a, b) = (self.0, rhs.0);

        let value = match operator {
            BinaryOperator::Add => a.wrapping_add(b),
            BinaryOperator::Subtract => a.wrapping_sub(b),
            BinaryOperator::Multiply => a.wrapping_mul(b),
            // truncates toward zero; i32::MIN / -1 wraps back to i32::MIN
            BinaryOperator::Divide => match b {
                0 => return None,
                _ => a.wrapping_div(b)
            },
            BinaryOperator::Remainder => match b {
                0 => return None,
                _ => a.wrapping_rem(b)
            },
            BinaryOperator::BitAnd => a & b,
            BinaryOperator::BitOr => a | b,
            BinaryOperator::BitXor => a ^ b,
            // the count is reduced modulo 32
            BinaryOperator::ShiftLeft => a.wrapping_shl(b as u32),
            BinaryOperator::ShiftRight => a.wrapping_shr(b as u32),
            BinaryOperator::LogicalAnd => return Some(Value::from(a != 0 && b != 0)),
            BinaryOperator::LogicalOr => return Some(Value::from(a != 0 || b != 0)),
            BinaryOperator::Equal => return Some(Value::from(a == b)),
            BinaryOperator::NotEqual => return Some(Value::from(a != b)),
            BinaryOperator::Less => return Some(Value::from(a < b)),
            BinaryOperator::LessEqual => return Some(Value::from(a <= b)),
            BinaryOperator::Greater => return Some(Value::from(a > b)),
            BinaryOperator::GreaterEqual => return Some(Value::from(a >= b)),
        };

        Some(Value(value))
    }

    pub fn unary(self, operator: UnaryOperator) -> Value {
        match operator {
            UnaryOperator::Negate => Value(self.0.wrapping_neg()),
            UnaryOperator::BitNot => Value(!self.0),
            UnaryOperator::Not => Value::from(self.0 == 0),
        }
    }

    /// Low eight bits, as a process exit status.
    pub fn exit_code(self) -> u8 {
        self.0 as u8
    }
}

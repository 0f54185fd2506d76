use std::{io::Write, time::Duration};

use thiserror::Error;

use crate::environment::prelude::Value;

use super::rng::Rng;

/// The C library functions a program may call without defining them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFunction {
    Putchar,
    Sleep,
    Srand,
    Rand,
    Abs,
    Isdigit,
}

impl HostFunction {
    pub const ALL: [HostFunction; 6] = [
        Self::Putchar,
        Self::Sleep,
        Self::Srand,
        Self::Rand,
        Self::Abs,
        Self::Isdigit,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|function| function.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Putchar => "putchar",
            Self::Sleep => "sleep",
            Self::Srand => "srand",
            Self::Rand => "rand",
            Self::Abs => "abs",
            Self::Isdigit => "isdigit",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Rand => 0,
            _ => 1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepMode {
    /// `sleep` returns immediately.
    #[default]
    Skip,
    /// `sleep` blocks the thread, never longer than `cap_seconds`.
    Real { cap_seconds: u64 },
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("`{name}` takes {expected} argument(s), {got} given")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize
    },
    #[error("cannot write program output: {0}")]
    Output(#[from] std::io::Error),
}

/// Process state the host functions act on: the output sink and the
/// generator behind `srand`/`rand`. One per run.
#[derive(Debug)]
pub struct Host<W: Write> {
    out: W,
    rng: Rng,
    sleep: SleepMode,
}

impl<W: Write> Host<W> {
    pub fn new(out: W, sleep: SleepMode) -> Self {
        Self {
            out,
            rng: Rng::default(),
            sleep
        }
    }

    pub fn call(&mut self, function: HostFunction, args: &[Value]) -> Result<Value, HostError> {
        if args.len() != function.arity() {
            return Err(HostError::Arity {
                name: function.name(),
                expected: function.arity(),
                got: args.len()
            });
        }

        let value = match function {
            HostFunction::Putchar => {
                let c = args[0];
                self.out.write_all(&[c.0 as u8])?;

                c
            },
            HostFunction::Sleep => {
                if let SleepMode::Real { cap_seconds } = self.sleep {
                    // whatever was printed so far should be visible while we wait
                    self.out.flush()?;

                    let seconds = (args[0].0.max(0) as u64).min(cap_seconds);
                    std::thread::sleep(Duration::from_secs(seconds));
                }

                Value(0)
            },
            HostFunction::Srand => {
                self.rng.seed(args[0].0 as u32);

                Value(0)
            },
            HostFunction::Rand => Value(self.rng.rand()),
            HostFunction::Abs => Value(args[0].0.wrapping_abs()),
            HostFunction::Isdigit => Value::from(('0' as i32..='9' as i32).contains(&args[0].0)),
        };

        Ok(value)
    }

    pub fn flush(&mut self) -> Result<(), HostError> {
        self.out.flush()?;

        Ok(())
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

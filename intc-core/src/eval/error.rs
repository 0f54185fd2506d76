use crate::{environment::prelude::ScopeError, host::prelude::HostError, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeErrorType {
    UndefinedVariable { name: String },
    Redeclaration { name: String },
    UndefinedFunction { name: String },
    DivisionByZero,
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize
    },
    MissingMain,
    BreakOutsideLoop,
    ContinueOutsideLoop,
    CallDepthExceeded { limit: usize },
    StepLimitExceeded { limit: u64 },
    Interrupted,
    Output { kind: std::io::ErrorKind },
    ThreadSpawn { kind: std::io::ErrorKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub location: SrcSpan
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, location: SrcSpan) -> Self {
        Self { error, location }
    }

    pub fn from_scope(error: ScopeError, location: SrcSpan) -> Self {
        let error = match error {
            ScopeError::Redeclaration(name) => RuntimeErrorType::Redeclaration { name },
            ScopeError::UndefinedVariable(name) => RuntimeErrorType::UndefinedVariable { name },
        };

        Self { error, location }
    }

    pub fn from_host(error: HostError, location: SrcSpan) -> Self {
        let error = match error {
            HostError::Arity { name, expected, got } => RuntimeErrorType::ArityMismatch {
                name: name.to_string(),
                expected,
                got
            },
            HostError::Output(err) => RuntimeErrorType::Output { kind: err.kind() },
        };

        Self { error, location }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            RuntimeErrorType::UndefinedVariable { name } => {
                ("Undefined variable", vec![format!("`{name}` is not declared in any visible scope")])
            },
            RuntimeErrorType::Redeclaration { name } => {
                ("Redeclaration", vec![format!("`{name}` is already declared in this scope")])
            },
            RuntimeErrorType::UndefinedFunction { name } => {
                ("Undefined function", vec![format!("`{name}` is neither defined nor a library function")])
            },
            RuntimeErrorType::DivisionByZero => ("Division by zero", vec![]),
            RuntimeErrorType::ArityMismatch { name, expected, got } => (
                "Wrong number of arguments",
                vec![format!("`{name}` takes {expected} argument(s), {got} given")]
            ),
            RuntimeErrorType::MissingMain => ("No `main` function", vec![]),
            RuntimeErrorType::BreakOutsideLoop => ("`break` outside of a loop", vec![]),
            RuntimeErrorType::ContinueOutsideLoop => ("`continue` outside of a loop", vec![]),
            RuntimeErrorType::CallDepthExceeded { limit } => (
                "Call depth exceeded",
                vec![format!("More than {limit} nested calls")]
            ),
            RuntimeErrorType::StepLimitExceeded { limit } => (
                "Step limit exceeded",
                vec![format!("More than {limit} statements executed")]
            ),
            RuntimeErrorType::Interrupted => ("Interrupted", vec![]),
            RuntimeErrorType::Output { kind } => ("Cannot write output", vec![kind.to_string()]),
            RuntimeErrorType::ThreadSpawn { kind } => (
                "Cannot start the interpreter",
                vec![format!("No thread with a large enough stack: {kind}")]
            ),
        }
    }
}

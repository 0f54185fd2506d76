pub mod error;
pub mod interpreter;

pub mod prelude {
    pub use super::{
        error::*,
        interpreter::*,
        eval,
        execute,
        Exit,
        RunConfig
    };
}


use std::{io::Write, path::PathBuf, sync::{atomic::AtomicBool, Arc}};

use crate::{
    host::prelude::{Host, SleepMode},
    parser::prelude::{parse_module, Program},
    utils::prelude::{Error, SrcSpan}
};

use self::{error::{RuntimeError, RuntimeErrorType}, interpreter::Interpreter};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sleep: SleepMode,
    /// Nested user-function calls allowed before the run is aborted.
    pub max_call_depth: usize,
    /// Statements executed before the run is aborted.
    pub max_steps: Option<u64>,
    /// Checked before every statement; once set the run stops.
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sleep: SleepMode::Skip,
            max_call_depth: 1024,
            max_steps: None,
            interrupt: None
        }
    }
}

/// How a run ended: what `main` returned and the status a process would
/// exit with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub value: i32,
    pub code: u8,
}

/// Stack reserved for the interpreter thread besides what calls use.
const BASE_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Host stack one interpreted call may take, debug builds included.
const STACK_PER_CALL: usize = 64 * 1024;

fn stack_size(max_call_depth: usize) -> usize {
    max_call_depth
        .saturating_mul(STACK_PER_CALL)
        .saturating_add(BASE_STACK_SIZE)
}

/// Runs `main` of an already parsed program, writing `putchar` output to
/// `out`. Output produced before a failure stays in `out`.
///
/// The program runs on its own thread whose stack is sized from
/// `config.max_call_depth`, so hitting the depth limit reports
/// [`RuntimeErrorType::CallDepthExceeded`] instead of overflowing the
/// caller's stack.
pub fn execute<W: Write + Send>(program: &Program, out: W, config: &RunConfig) -> Result<Exit, RuntimeError> {
    std::thread::scope(|scope| {
        let interpreter = std::thread::Builder::new()
            .name("interpreter".into())
            .stack_size(stack_size(config.max_call_depth))
            .spawn_scoped(scope, move || run_program(program, out, config))
            .map_err(|err| RuntimeError::new(
                RuntimeErrorType::ThreadSpawn { kind: err.kind() },
                SrcSpan::default()
            ))?;

        match interpreter.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic)
        }
    })
}

fn run_program<W: Write>(program: &Program, out: W, config: &RunConfig) -> Result<Exit, RuntimeError> {
    let host = Host::new(out, config.sleep);
    let mut interpreter = Interpreter::new(program, host, config);

    let result = interpreter.run();

    let flushed = interpreter.host_mut()
        .flush()
        .map_err(|err| RuntimeError::from_host(err, SrcSpan::default()));

    let value = result?;
    flushed?;

    Ok(Exit {
        value: value.0,
        code: value.exit_code()
    })
}

/// Parses and runs `src` without the static analysis pass.
pub fn eval<W: Write + Send>(src: &str, out: W, config: &RunConfig) -> Result<Exit, Error> {
    let path = PathBuf::from("<input>");

    let module = parse_module(src).map_err(|error| Error::Parse {
        path: path.clone(),
        src: src.to_string(),
        error
    })?;

    execute(&module.program, out, config).map_err(|error| Error::Runtime {
        path,
        src: src.to_string(),
        error
    })
}

impl Exit {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

impl RuntimeError {
    pub fn is_interrupted(&self) -> bool {
        self.error == RuntimeErrorType::Interrupted
    }
}

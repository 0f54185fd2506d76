mod cli;
mod rlpl;
mod rppl;

use std::{
    io::BufWriter,
    path::PathBuf,
    rc::Rc,
    sync::{atomic::{AtomicBool, Ordering}, Arc},
    time::Instant
};

use clap::Parser;
use cli::{
    print_analyzed, print_analyzing, print_error, print_finished, print_running
};
use intc_core::{
    analyzer::{analyze, read_module},
    eval::prelude::{execute, RunConfig},
    host::prelude::SleepMode,
    utils::prelude::{Error, Warning, WarningEmitterIO}
};

/// Longest a single `sleep` call may block with `--real-sleep`.
const SLEEP_CAP_SECONDS: u64 = 10;

#[derive(Parser)]
enum Command {
    /// Analyzes a C source file and runs its `main`
    Run {
        /// Path of source file
        path: PathBuf,
        /// Make `sleep` actually block instead of returning at once
        #[arg(long, default_value_t = false)]
        real_sleep: bool,
        /// Abort after executing this many statements
        #[arg(long, value_name = "N")]
        max_steps: Option<u64>,
        /// Abort when calls nest deeper than this
        #[arg(long, value_name = "N", default_value_t = 1024)]
        max_depth: usize,
        /// Do not print status lines
        #[arg(short, long, default_value_t = false)]
        quiet: bool,
        /// Skip static checks, so errors surface while the program runs
        #[arg(long, default_value_t = false)]
        no_analyze: bool
    },
    /// Performs lexical, syntactical and semantical analysis
    Analyze {
        /// Path of source file
        path: PathBuf,
        /// Do not print parsed source code
        #[arg(short, long, default_value_t = false)]
        no_output: bool,
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn main() {
    let code = match Command::parse() {
        Command::Run { path, real_sleep, max_steps, max_depth, quiet, no_analyze } => {
            let sleep = match real_sleep {
                true => SleepMode::Real { cap_seconds: SLEEP_CAP_SECONDS },
                false => SleepMode::Skip
            };

            let config = RunConfig {
                sleep,
                max_call_depth: max_depth,
                max_steps,
                interrupt: None
            };

            run(path, config, quiet, !no_analyze)
        },
        Command::Analyze { path, no_output, print_ast } => {
            let warning_emitter = Rc::new(ConsoleWarningEmitter);

            print_analyzing(&path.to_string_lossy());
            let start = Instant::now();

            let code = match analyze(path, warning_emitter) {
                Ok((module, _)) => {
                    if !no_output {
                        if print_ast {
                            println!("{:#?}", module.program);
                        } else {
                            println!("{}", module.program);
                        }
                    }

                    0
                },
                Err(err) => {
                    print_error(&err);
                    1
                }
            };

            print_analyzed(start.elapsed());

            code
        },
        Command::Rlpl => exit_code(rlpl::start()),
        Command::Rppl => exit_code(rppl::start())
    };

    std::process::exit(code)
}

fn run(path: PathBuf, mut config: RunConfig, quiet: bool, checked: bool) -> i32 {
    let warning_emitter = Rc::new(ConsoleWarningEmitter);

    if !quiet {
        print_analyzing(&path.to_string_lossy());
    }
    let start = Instant::now();

    let loaded = match checked {
        true => analyze(path.clone(), warning_emitter),
        false => read_module(path.clone())
    };

    let (module, src) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            print_error(&err);
            return 1;
        }
    };

    if !quiet {
        print_analyzed(start.elapsed());
    }

    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = interrupt.clone();

    if let Err(err) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        eprintln!("Ctrl-C will not stop the program: {err}");
    }

    config.interrupt = Some(interrupt);

    if !quiet {
        print_running(&path.to_string_lossy());
    }
    let start = Instant::now();

    match execute(&module.program, BufWriter::new(std::io::stdout()), &config) {
        Ok(exit) => {
            if !quiet {
                print_finished(start.elapsed(), exit.code);
            }

            exit.code as i32
        },
        Err(error) => {
            print_error(&Error::Runtime { path, src, error });
            1
        }
    }
}

fn exit_code(result: std::io::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            print_error(&Error::StdIo { err: err.kind() });
            1
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleWarningEmitter;

impl WarningEmitterIO for ConsoleWarningEmitter {
    fn emit_warning(&self, warning: Warning) {
        let buffer_writer = crate::cli::stderr_buffer_writer();
        let mut buffer = buffer_writer.buffer();

        if warning.pretty(&mut buffer).is_ok() {
            let _ = buffer_writer.print(&buffer);
        }
    }
}

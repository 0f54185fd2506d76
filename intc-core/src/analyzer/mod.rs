pub mod error;
pub mod analyzer;

pub mod prelude {
    pub use super::{
        analyzer::*,
        error::*,
        analyze,
        analyze_source,
        read_module
    };
}

use std::{path::PathBuf, rc::Rc};

use utf8_chars::BufReadCharsExt;

use crate::{
    analyzer::prelude::{ModuleAnalyzer, Outcome},
    parser::prelude::{parse_module, parse_module_from_stream, Module},
    utils::prelude::{Error, ModuleWarningEmitter, WarningEmitter, WarningEmitterIO}
};

/// Reads `path` as a character stream and parses it, without the static
/// checks. The source text comes back alongside for diagnostics.
pub fn read_module(path: PathBuf) -> Result<(Module, String), Error> {
    let file = std::fs::File::open(&path)
        .map_err(|err| Error::StdIo { err: err.kind() })?;

    let file_size = file.metadata()
        .map_err(|err| Error::StdIo { err: err.kind() })?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut failure = None;
    let mut reader = std::io::BufReader::new(file);
    let mut stream = reader.chars()
        .map_while(|c| match c {
            Ok(c) => {
                src.push(c);
                Some(c)
            },
            Err(err) => {
                failure = Some(err.kind());
                None
            }
        });

    let parsed = parse_module_from_stream(&mut stream);

    // keep the rest of the file for diagnostics
    stream.for_each(drop);

    if let Some(err) = failure {
        return Err(Error::StdIo { err });
    }

    match parsed {
        Ok(module) => Ok((module, src)),
        Err(error) => Err(Error::Parse { path, src, error })
    }
}

/// Reads and parses `path`, then runs the static checks.
pub fn analyze(
    path: PathBuf,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<(Module, String), Error> {
    let (module, src) = read_module(path.clone())?;
    let module = check(path, &src, module, warnings)?;

    Ok((module, src))
}

/// Parses and checks source text that is already in memory.
pub fn analyze_source(
    path: PathBuf,
    src: &str,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Module, Error> {
    let module = match parse_module(src) {
        Ok(module) => module,
        Err(error) => {
            let error = Error::Parse { path, src: src.to_string(), error };
            return Err(error)
        }
    };

    check(path, src, module, warnings)
}

fn check(
    path: PathBuf,
    src: &str,
    module: Module,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Module, Error> {
    let warnings = ModuleWarningEmitter::new(
        path.clone(),
        src.to_string(),
        WarningEmitter::new(warnings)
    );

    match ModuleAnalyzer::analyze(module, &warnings) {
        Outcome::Ok(module) => Ok(module),
        Outcome::PartialFailure(_, errors) => {
            let error = Error::Analyze { path, src: src.to_string(), errors };
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests;

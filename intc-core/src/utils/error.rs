use std::{io, path::{Path, PathBuf}};

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    analyzer::prelude::AnalyzeError,
    eval::prelude::RuntimeError,
    utils::prelude::SrcSpan,
    parser::prelude::{ParseError, ParseErrorType},
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("static analysis failed")]
    Analyze {
        path: PathBuf,
        src: String,
        errors: Vec<AnalyzeError>
    },
    #[error("program aborted")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

fn located<'a>(
    title: &str,
    text: String,
    src: &'a str,
    path: &Path,
    label: Label,
    extra_labels: Vec<Label>
) -> Diagnostic<'a> {
    Diagnostic {
        title: title.into(),
        text,
        level: Level::Error,
        location: Some(Location {
            src,
            path: path.to_path_buf(),
            label,
            extra_labels
        }),
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();

        match self.pretty(&mut nocolor) {
            Ok(()) => String::from_utf8_lossy(nocolor.as_slice()).into_owned(),
            Err(err) => format!("{self}: {err}")
        }
    }

    pub fn pretty(&self, buf: &mut Buffer) -> io::Result<()> {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf)?;
            writeln!(buf)?;
        }

        Ok(())
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, error } => {
                let (label, extra) = error.details();

                let adjusted_location = match error.error {
                    ParseErrorType::UnexpectedEof => SrcSpan::from(src.len() as u32, src.len() as u32),
                    _ => error.span
                };

                vec![located(
                    "Syntax error",
                    extra.join("\n"),
                    src,
                    path,
                    Label::new(label, adjusted_location),
                    vec![]
                )]
            },
            Error::Analyze { path, src, errors } => errors.iter()
                .map(|error| analyze_diagnostic(error, src, path))
                .collect(),
            Error::Runtime { path, src, error } => {
                let (label, extra) = error.details();

                vec![located(
                    "Runtime error",
                    extra.join("\n"),
                    src,
                    path,
                    Label::new(label, error.location),
                    vec![]
                )]
            },
            Error::StdIo { err, } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}

fn analyze_diagnostic<'a>(error: &AnalyzeError, src: &'a str, path: &Path) -> Diagnostic<'a> {
    match error {
        AnalyzeError::VariableNotDeclared { location, variable } => located(
            "Variable not declared",
            format!("Variable `{variable}` is not declared."),
            src, path,
            Label::bare(*location),
            vec![]
        ),
        AnalyzeError::VariableRedeclaration { location_a, location_b, variable } => located(
            "Multiple declarations",
            format!("Variable `{variable}` was declared multiple times in one scope."),
            src, path,
            Label::new("Another defined here", *location_b),
            vec![Label::new("First defined here", *location_a)]
        ),
        AnalyzeError::FunctionRedefinition { location_a, location_b, function } => located(
            "Multiple definitions",
            format!("Function `{function}` has more than one body."),
            src, path,
            Label::new("Redefined here", *location_b),
            vec![Label::new("First defined here", *location_a)]
        ),
        AnalyzeError::ArityMismatch { location, function, expected, got } => located(
            "Wrong number of arguments",
            format!("`{function}` takes {expected} argument(s), but {got} given"),
            src, path,
            Label::bare(*location),
            vec![]
        ),
        AnalyzeError::UndefinedFunction { location, function } => located(
            "Undefined function",
            format!("`{function}` is neither defined in this program nor a library function."),
            src, path,
            Label::bare(*location),
            vec![]
        ),
        AnalyzeError::NameConflict { location_a, location_b, name } => located(
            "Name conflict",
            format!("`{name}` names both a function and a global variable."),
            src, path,
            Label::new("Variable declared here", *location_b),
            vec![Label::new("Function declared here", *location_a)]
        ),
        AnalyzeError::BreakOutsideLoop { location } => located(
            "`break` outside of a loop",
            String::new(),
            src, path,
            Label::bare(*location),
            vec![]
        ),
        AnalyzeError::ContinueOutsideLoop { location } => located(
            "`continue` outside of a loop",
            String::new(),
            src, path,
            Label::bare(*location),
            vec![]
        ),
        AnalyzeError::MissingMain { location } => located(
            "No `main` function",
            "Every program needs `int main() { ... }`.".into(),
            src, path,
            Label::bare(*location),
            vec![]
        ),
        AnalyzeError::MainHasParameters { location } => located(
            "`main` takes no parameters",
            String::new(),
            src, path,
            Label::new("Remove these", *location),
            vec![]
        ),
        AnalyzeError::NonConstantGlobalInitializer { location, variable } => located(
            "Non-constant initializer",
            format!("Global `{variable}` may only be initialized with literals and operators."),
            src, path,
            Label::bare(*location),
            vec![]
        ),
    }
}

use std::{io, path::PathBuf, rc::Rc, sync::{atomic::{AtomicUsize, Ordering}, Arc, RwLock}};

use termcolor::Buffer;

use crate::analyzer::error::Warning as AnalyzerWarning;
use super::diagnostic::{Diagnostic, Label, Level, Location};

pub trait WarningEmitterIO {
    fn emit_warning(&self, warning: Warning);
}

#[derive(Debug, Clone, Copy)]
pub struct NullWarningEmitterIO;

impl WarningEmitterIO for NullWarningEmitterIO {
    fn emit_warning(&self, _warning: Warning) {}
}

#[derive(Debug, Default, Clone)]
pub struct VectorWarningEmitterIO {
    pub warnings: Arc<RwLock<Vec<Warning>>>
}

impl VectorWarningEmitterIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Warning> {
        let mut warnings = self.write_lock();
        std::mem::take(&mut *warnings)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Warning>> {
        self.warnings.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WarningEmitterIO for VectorWarningEmitterIO {
    fn emit_warning(&self, warning: Warning) {
        let mut warnings = self.write_lock();

        warnings.push(warning);
    }
}

pub struct WarningEmitter {
    count: Arc<AtomicUsize>,
    emitter: Rc<dyn WarningEmitterIO>
}

impl WarningEmitter {
    pub fn new(emitter: Rc<dyn WarningEmitterIO>) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            emitter,
        }
    }

    pub fn null() -> Self {
        Self::new(Rc::new(NullWarningEmitterIO))
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn emit(&self, warning: Warning) {
        _ = self.count.fetch_add(1, Ordering::Relaxed);
        self.emitter.emit_warning(warning);
    }
}

/// Attaches the path and source of the module being analyzed to every
/// warning it reports.
pub struct ModuleWarningEmitter {
    module_path: PathBuf,
    module_src: String,
    emitter: WarningEmitter,
}

impl ModuleWarningEmitter {
    pub fn new(
        module_path: PathBuf,
        module_src: String,
        emitter: WarningEmitter
    ) -> Self {
        Self {
            module_path,
            module_src,
            emitter,
        }
    }

    pub fn null() -> Self {
        Self {
            module_path: PathBuf::new(),
            module_src: String::from(""),
            emitter: WarningEmitter::null(),
        }
    }

    pub fn count(&self) -> usize {
        self.emitter.count()
    }

    pub fn emit(&self, warning: AnalyzerWarning) {
        self.emitter.emit(Warning::Analyze {
            path: self.module_path.clone(),
            src: self.module_src.clone(),
            warning,
        });
    }
}

#[derive(Debug, Clone)]
pub enum Warning {
    Analyze {
        path: PathBuf,
        src: String,
        warning: AnalyzerWarning
    }
}

impl Warning {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();

        match self.pretty(&mut nocolor) {
            Ok(()) => String::from_utf8_lossy(nocolor.as_slice()).into_owned(),
            Err(err) => err.to_string()
        }
    }

    pub fn pretty(&self, buf: &mut Buffer) -> io::Result<()> {
        use std::io::Write;

        self.to_diagnostic().write(buf)?;
        buf.write_all(b"\n")
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let Warning::Analyze { path, src, warning } = self;

        let (title, label) = match warning {
            AnalyzerWarning::UnusedVariable { location, variable } => (
                "Unused variable",
                Label::new(format!("`{variable}` is never read"), *location)
            ),
            AnalyzerWarning::UnreachableIfClause { location } => (
                "Unreachable if clause",
                Label::new("The condition is always zero", *location)
            ),
            AnalyzerWarning::UnreachableElseClause { location } => (
                "Unreachable else clause",
                Label::new("The condition is never zero", *location)
            ),
            AnalyzerWarning::InfiniteLoop { location } => (
                "Infinite loop",
                Label::new("Nothing breaks out of this loop", *location)
            ),
            AnalyzerWarning::UnreachableCode { location } => (
                "Unreachable code",
                Label::bare(*location)
            ),
        };

        Diagnostic {
            title: title.into(),
            text: "".into(),
            level: Level::Warning,
            location: Some(Location {
                src,
                path: path.to_path_buf(),
                label,
                extra_labels: vec![]
            }),
        }
    }
}

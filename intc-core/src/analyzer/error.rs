use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problems {
    errors: Vec<AnalyzeError>,
    warnings: Vec<Warning>,
}

impl Problems {
    pub fn error(&mut self, error: AnalyzeError) {
        self.errors.push(error)
    }

    pub fn take_errors(&mut self) -> Vec<AnalyzeError> {
        std::mem::take(&mut self.errors)
    }

    pub fn warning(&mut self, warning: Warning) {
        self.warnings.push(warning)
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn sort(&mut self) {
        self.errors.sort_by_key(|e| e.start_location());
        self.warnings.sort_by_key(|w| w.location().start);
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalyzeError {
    /// Occurs when a variable is used but no visible scope declares it.
    ///
    /// Example:
    /// ```c
    /// int main() {
    ///     return a; // <- Variable not declared: `a`
    /// }
    /// ```
    VariableNotDeclared {
        location: SrcSpan,
        variable: String,
    },
    /// Occurs when a variable is declared twice in the same scope.
    ///
    /// Example:
    /// ```c
    /// int main() {
    ///     int a;
    ///     int a; // <- Variable redeclaration: `a`
    /// }
    /// ```
    VariableRedeclaration {
        location_a: SrcSpan,
        location_b: SrcSpan,
        variable: String,
    },
    /// Occurs when a function has two bodies.
    FunctionRedefinition {
        location_a: SrcSpan,
        location_b: SrcSpan,
        function: String,
    },
    /// Occurs when a declaration or a call disagrees with the number of
    /// parameters a function was first declared with.
    ///
    /// Example:
    /// ```c
    /// int putchar(int c);
    /// int main() {
    ///     putchar(); // <- expected 1 argument, got 0
    /// }
    /// ```
    ArityMismatch {
        location: SrcSpan,
        function: String,
        expected: usize,
        got: usize,
    },
    /// Occurs when a called function is neither defined in the program nor
    /// provided by the library.
    UndefinedFunction {
        location: SrcSpan,
        function: String,
    },
    /// Occurs when a global variable and a function share a name.
    NameConflict {
        location_a: SrcSpan,
        location_b: SrcSpan,
        name: String,
    },
    BreakOutsideLoop {
        location: SrcSpan,
    },
    ContinueOutsideLoop {
        location: SrcSpan,
    },
    MissingMain {
        location: SrcSpan,
    },
    MainHasParameters {
        location: SrcSpan,
    },
    /// Occurs when a global initializer refers to variables or calls
    /// functions.
    ///
    /// Example:
    /// ```c
    /// int a = 1;
    /// int b = a + 1; // <- initializer is not a constant expression
    /// ```
    NonConstantGlobalInitializer {
        location: SrcSpan,
        variable: String,
    },
}

impl AnalyzeError {
    pub fn start_location(&self) -> u32 {
        match self {
            AnalyzeError::VariableNotDeclared { location, .. }
            | AnalyzeError::VariableRedeclaration { location_b: location, .. }
            | AnalyzeError::FunctionRedefinition { location_b: location, .. }
            | AnalyzeError::ArityMismatch { location, .. }
            | AnalyzeError::UndefinedFunction { location, .. }
            | AnalyzeError::NameConflict { location_b: location, .. }
            | AnalyzeError::BreakOutsideLoop { location }
            | AnalyzeError::ContinueOutsideLoop { location }
            | AnalyzeError::MissingMain { location }
            | AnalyzeError::MainHasParameters { location }
            | AnalyzeError::NonConstantGlobalInitializer { location, .. } => location.start
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Warning {
    UnusedVariable {
        location: SrcSpan,
        variable: String
    },
    UnreachableIfClause {
        location: SrcSpan
    },
    UnreachableElseClause {
        location: SrcSpan
    },
    InfiniteLoop {
        location: SrcSpan
    },
    UnreachableCode {
        location: SrcSpan
    }
}

impl Warning {
    pub fn location(&self) -> SrcSpan {
        match self {
            Warning::UnusedVariable { location, .. }
            | Warning::UnreachableIfClause { location }
            | Warning::UnreachableElseClause { location }
            | Warning::InfiniteLoop { location }
            | Warning::UnreachableCode { location } => *location
        }
    }
}

use std::collections::HashMap;

use thiserror::Error;

pub type Scope<T> = HashMap<String, T>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("`{0}` is already declared in this scope")]
    Redeclaration(String),
    #[error("`{0}` is not declared")]
    UndefinedVariable(String),
}

/// Name resolution for one run.
///
/// The global scope lives as long as the environment. Every function call
/// gets its own frame, a stack of block scopes that only sees itself and the
/// globals, never the caller's locals. The evaluator stores values here and
/// the analyzer stores usage records.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment<T> {
    globals: Scope<T>,
    frames: Vec<Vec<Scope<T>>>,
}

impl<T> Default for Environment<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Environment<T> {
    pub fn new() -> Self {
        Self {
            globals: HashMap::new(),
            frames: vec![]
        }
    }

    fn current_scope_mut(&mut self) -> &mut Scope<T> {
        match self.frames.last_mut().and_then(|frame| frame.last_mut()) {
            Some(scope) => scope,
            None => &mut self.globals
        }
    }

    fn current_scope(&self) -> &Scope<T> {
        match self.frames.last().and_then(|frame| frame.last()) {
            Some(scope) => scope,
            None => &self.globals
        }
    }

    /// Innermost scopes first, globals last.
    fn visible_scopes(&self) -> impl Iterator<Item = &Scope<T>> {
        self.frames.last()
            .into_iter()
            .flat_map(|frame| frame.iter().rev())
            .chain(std::iter::once(&self.globals))
    }

    pub fn define(&mut self, name: &str, value: T) -> Result<(), ScopeError> {
        let scope = self.current_scope_mut();

        if scope.contains_key(name) {
            return Err(ScopeError::Redeclaration(name.to_string()));
        }

        scope.insert(name.to_string(), value);

        Ok(())
    }

    /// The binding of `name` in the innermost scope only.
    pub fn get_local(&self, name: &str) -> Option<&T> {
        self.current_scope().get(name)
    }

    pub fn lookup(&self, name: &str) -> Result<&T, ScopeError> {
        self.visible_scopes()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| ScopeError::UndefinedVariable(name.to_string()))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Result<&mut T, ScopeError> {
        let locals = self.frames.last_mut()
            .into_iter()
            .flat_map(|frame| frame.iter_mut().rev());

        locals.chain(std::iter::once(&mut self.globals))
            .find_map(|scope| scope.get_mut(name))
            .ok_or_else(|| ScopeError::UndefinedVariable(name.to_string()))
    }

    pub fn assign(&mut self, name: &str, value: T) -> Result<(), ScopeError> {
        let slot = self.lookup_mut(name)?;

        *slot = value;

        Ok(())
    }

    pub fn push_scope(&mut self) {
        match self.frames.last_mut() {
            Some(frame) => frame.push(HashMap::new()),
            // a block outside any function still needs somewhere to live
            None => self.frames.push(vec![HashMap::new()])
        }
    }

    pub fn pop_scope(&mut self) -> Option<Scope<T>> {
        let frame = self.frames.last_mut()?;
        let scope = frame.pop();

        if frame.is_empty() {
            self.frames.pop();
        }

        scope
    }

    /// Starts a call: a fresh scope for parameters that sees only the globals.
    pub fn push_frame(&mut self) {
        self.frames.push(vec![HashMap::new()]);
    }

    /// Ends a call, handing back whatever scopes it still held.
    pub fn pop_frame(&mut self) -> Vec<Scope<T>> {
        self.frames.pop().unwrap_or_default()
    }

    /// Number of active call frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn globals(&self) -> &Scope<T> {
        &self.globals
    }
}

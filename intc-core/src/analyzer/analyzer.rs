use std::collections::HashMap;

use crate::{
    analyzer::prelude::{AnalyzeError, Problems, Warning},
    environment::prelude::{Environment, Scope, ScopeError},
    host::prelude::HostFunction,
    parser::prelude::{Arena, Declaration, ExprId, ExprKind, ForInit, Function, Identifier, Module, Program, StmtId, StmtKind},
    utils::prelude::{ModuleWarningEmitter, SrcSpan}
};

pub enum Outcome<T, E> {
    Ok(T),
    PartialFailure(T, E)
}

/// Where a variable was declared and whether anything reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub location: SrcSpan,
    pub used: bool,
}

impl Usage {
    fn declared(location: SrcSpan) -> Self {
        Self { location, used: false }
    }
}

#[derive(Debug, Clone, Copy)]
struct Signature {
    arity: usize,
    location: SrcSpan,
    definition: Option<SrcSpan>,
}

#[derive(Debug)]
pub struct ModuleAnalyzer<'a> {
    problems: Problems,
    arena: &'a Arena,
    signatures: HashMap<&'a str, Signature>,
}

impl<'a> ModuleAnalyzer<'a> {
    pub fn analyze(
        module: Module,
        warnings: &ModuleWarningEmitter
    ) -> Outcome<Module, Vec<AnalyzeError>> {
        let program = &module.program;
        let mut analyzer = ModuleAnalyzer {
            problems: Default::default(),
            arena: &program.arena,
            signatures: HashMap::new()
        };

        let mut env = Environment::new();

        analyzer.collect_signatures(program);
        analyzer.analyze_globals(program, &mut env);
        analyzer.check_main(program);

        for function in &program.functions {
            analyzer.analyze_function(function, &mut env);
        }

        analyzer.warn_unused(env.globals().clone());

        analyzer.problems.sort();

        for warning in analyzer.problems.take_warnings() {
            warnings.emit(warning);
        }

        let errors = analyzer.problems.take_errors();

        match errors.is_empty() {
            true => Outcome::Ok(module),
            false => Outcome::PartialFailure(module, errors)
        }
    }

    fn collect_signatures(&mut self, program: &'a Program) {
        for function in &program.functions {
            let name = function.name.value.as_str();
            let location = function.name.location;
            let arity = function.params.len();
            let definition = function.body.map(|_| location);

            let Some(signature) = self.signatures.get_mut(name) else {
                self.signatures.insert(name, Signature { arity, location, definition });
                continue;
            };

            if signature.arity != arity {
                self.problems.error(AnalyzeError::ArityMismatch {
                    location,
                    function: name.to_string(),
                    expected: signature.arity,
                    got: arity
                });
            }

            match (signature.definition, definition) {
                (Some(location_a), Some(location_b)) => {
                    self.problems.error(AnalyzeError::FunctionRedefinition {
                        location_a,
                        location_b,
                        function: name.to_string()
                    });
                },
                // the definition decides what calls are checked against
                (None, Some(_)) => *signature = Signature { arity, location, definition },
                _ => {}
            }
        }

        // prototypes of library functions must agree with the library
        for (name, signature) in &self.signatures {
            let Some(host) = HostFunction::from_name(name) else { continue };

            if signature.definition.is_none() && signature.arity != host.arity() {
                self.problems.error(AnalyzeError::ArityMismatch {
                    location: signature.location,
                    function: name.to_string(),
                    expected: host.arity(),
                    got: signature.arity
                });
            }
        }
    }

    fn analyze_globals(&mut self, program: &Program, env: &mut Environment<Usage>) {
        for global in &program.globals {
            let name = &global.name;

            if let Some(initializer) = global.initializer {
                self.analyze_expression(initializer, env);

                if !self.is_constant(initializer) {
                    self.problems.error(AnalyzeError::NonConstantGlobalInitializer {
                        location: self.arena.expr(initializer).location,
                        variable: name.value.clone()
                    });
                }
            }

            if let Some(signature) = self.signatures.get(name.value.as_str()) {
                self.problems.error(AnalyzeError::NameConflict {
                    location_a: signature.location,
                    location_b: name.location,
                    name: name.value.clone()
                });
            }

            self.declare(name, env);
        }
    }

    fn check_main(&mut self, program: &Program) {
        match program.function("main") {
            None => self.problems.error(AnalyzeError::MissingMain {
                location: SrcSpan::from(program.location.end, program.location.end)
            }),
            Some(main) if !main.params.is_empty() => self.problems.error(AnalyzeError::MainHasParameters {
                location: main.params[0].location.merge(main.params[main.params.len() - 1].location)
            }),
            Some(_) => {}
        }
    }

    fn analyze_function(&mut self, function: &Function, env: &mut Environment<Usage>) {
        let Some(body) = function.body else { return };

        env.push_frame();

        for param in &function.params {
            self.declare(param, env);

            // parameters are part of the signature, reading them is optional
            if let Ok(usage) = env.lookup_mut(&param.value) {
                usage.used = true;
            }
        }

        let arena = self.arena;

        // the outermost block shares the parameter scope
        match &arena.stmt(body).kind {
            StmtKind::Block(statements) => self.analyze_block(statements, env, 0),
            _ => self.analyze_statement(body, env, 0)
        }

        for scope in env.pop_frame() {
            self.warn_unused(scope);
        }
    }

    fn analyze_block(&mut self, statements: &[StmtId], env: &mut Environment<Usage>, loops: usize) {
        let arena = self.arena;
        let mut jumped = false;

        for (idx, &statement) in statements.iter().enumerate() {
            self.analyze_statement(statement, env, loops);

            if jumped {
                continue;
            }

            let kind = &arena.stmt(statement).kind;
            jumped = matches!(kind, StmtKind::Return(_) | StmtKind::Break | StmtKind::Continue);

            if jumped && idx + 1 < statements.len() {
                let first = arena.stmt(statements[idx + 1]).location;
                let last = arena.stmt(statements[statements.len() - 1]).location;

                self.problems.warning(Warning::UnreachableCode { location: first.merge(last) });
            }
        }
    }

    fn analyze_statement(&mut self, id: StmtId, env: &mut Environment<Usage>, loops: usize) {
        let arena = self.arena;
        let statement = arena.stmt(id);
        let location = statement.location;

        match &statement.kind {
            StmtKind::Declaration(declaration) => self.analyze_declaration(declaration, env),
            StmtKind::Block(statements) => {
                env.push_scope();
                self.analyze_block(statements, env, loops);
                self.leave_scope(env);
            },
            StmtKind::If { condition, resolution, alternative } => {
                self.analyze_expression(*condition, env);
                self.analyze_statement(*resolution, env, loops);

                if let Some(alternative) = alternative {
                    self.analyze_statement(*alternative, env, loops);
                }

                match (self.literal(*condition), alternative) {
                    (Some(0), _) => {
                        let location = arena.stmt(*resolution).location;
                        self.problems.warning(Warning::UnreachableIfClause { location });
                    },
                    (Some(_), Some(alternative)) => {
                        let location = arena.stmt(*alternative).location;
                        self.problems.warning(Warning::UnreachableElseClause { location });
                    },
                    _ => {}
                }
            },
            StmtKind::For { init, condition, step, body } => {
                env.push_scope();

                match init {
                    Some(ForInit::Declaration(declaration)) => self.analyze_declaration(declaration, env),
                    Some(ForInit::Expression(expression)) => self.analyze_expression(*expression, env),
                    None => {}
                }

                if let Some(condition) = condition {
                    self.analyze_expression(*condition, env);
                }
                if let Some(step) = step {
                    self.analyze_expression(*step, env);
                }

                self.analyze_statement(*body, env, loops + 1);
                self.leave_scope(env);

                let endless = condition.map_or(true, |condition| self.is_true_literal(condition));
                self.check_infinite_loop(endless, *body, location);
            },
            StmtKind::While { condition, body } => {
                self.analyze_expression(*condition, env);
                self.analyze_statement(*body, env, loops + 1);

                self.check_infinite_loop(self.is_true_literal(*condition), *body, location);
            },
            StmtKind::DoWhile { body, condition } => {
                self.analyze_statement(*body, env, loops + 1);
                self.analyze_expression(*condition, env);

                self.check_infinite_loop(self.is_true_literal(*condition), *body, location);
            },
            StmtKind::Break if loops == 0 => {
                self.problems.error(AnalyzeError::BreakOutsideLoop { location });
            },
            StmtKind::Continue if loops == 0 => {
                self.problems.error(AnalyzeError::ContinueOutsideLoop { location });
            },
            StmtKind::Return(Some(value)) | StmtKind::Expression(value) => {
                self.analyze_expression(*value, env);
            },
            StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Return(None)
            | StmtKind::Empty => {}
        }
    }

    fn analyze_declaration(&mut self, declaration: &Declaration, env: &mut Environment<Usage>) {
        for variable in &declaration.variables {
            if let Some(initializer) = variable.initializer {
                self.analyze_expression(initializer, env);
            }

            self.declare(&variable.name, env);
        }
    }

    fn analyze_expression(&mut self, id: ExprId, env: &mut Environment<Usage>) {
        let arena = self.arena;
        let expression = arena.expr(id);

        match &expression.kind {
            ExprKind::Literal(_) => {},
            ExprKind::Identifier(identifier)
            | ExprKind::Prefix { target: identifier, .. }
            | ExprKind::Postfix { target: identifier, .. } => self.read(identifier, env),
            ExprKind::Assign { target, value } => {
                self.analyze_expression(*value, env);

                if let Err(ScopeError::UndefinedVariable(variable)) = env.lookup(&target.value) {
                    self.problems.error(AnalyzeError::VariableNotDeclared {
                        location: target.location,
                        variable
                    });
                }
            },
            ExprKind::CompoundAssign { target, value, .. } => {
                self.read(target, env);
                self.analyze_expression(*value, env);
            },
            ExprKind::Binary { left, right, .. } | ExprKind::Comma { left, right } => {
                self.analyze_expression(*left, env);
                self.analyze_expression(*right, env);
            },
            ExprKind::Unary { operand, .. } => self.analyze_expression(*operand, env),
            ExprKind::Conditional { condition, then, otherwise } => {
                self.analyze_expression(*condition, env);
                self.analyze_expression(*then, env);
                self.analyze_expression(*otherwise, env);
            },
            ExprKind::Call { name, arguments } => {
                for argument in arguments {
                    self.analyze_expression(*argument, env);
                }

                self.check_call(name, arguments.len(), expression.location);
            }
        }
    }

    fn check_call(&mut self, name: &Identifier, got: usize, location: SrcSpan) {
        let signature = self.signatures.get(name.value.as_str());
        let host = HostFunction::from_name(&name.value);

        let expected = match (signature, host) {
            (Some(signature), _) if signature.definition.is_some() => signature.arity,
            (_, Some(host)) => host.arity(),
            _ => {
                self.problems.error(AnalyzeError::UndefinedFunction {
                    location: name.location,
                    function: name.value.clone()
                });
                return;
            }
        };

        if expected != got {
            self.problems.error(AnalyzeError::ArityMismatch {
                location,
                function: name.value.clone(),
                expected,
                got
            });
        }
    }

    fn declare(&mut self, name: &Identifier, env: &mut Environment<Usage>) {
        if let Err(ScopeError::Redeclaration(variable)) = env.define(&name.value, Usage::declared(name.location)) {
            let location_a = env.get_local(&variable)
                .map_or(name.location, |usage| usage.location);

            self.problems.error(AnalyzeError::VariableRedeclaration {
                location_a,
                location_b: name.location,
                variable
            });
        }
    }

    fn read(&mut self, identifier: &Identifier, env: &mut Environment<Usage>) {
        match env.lookup_mut(&identifier.value) {
            Ok(usage) => usage.used = true,
            Err(_) => self.problems.error(AnalyzeError::VariableNotDeclared {
                location: identifier.location,
                variable: identifier.value.clone()
            })
        }
    }

    fn leave_scope(&mut self, env: &mut Environment<Usage>) {
        if let Some(scope) = env.pop_scope() {
            self.warn_unused(scope);
        }
    }

    fn warn_unused(&mut self, scope: Scope<Usage>) {
        for (variable, usage) in scope {
            if !usage.used {
                self.problems.warning(Warning::UnusedVariable { location: usage.location, variable });
            }
        }
    }

    fn check_infinite_loop(&mut self, endless: bool, body: StmtId, location: SrcSpan) {
        if endless && !self.escapes(body, false) {
            self.problems.warning(Warning::InfiniteLoop { location });
        }
    }

    /// Whether `id` contains a `return`, or a `break` that leaves the loop
    /// being checked rather than one nested inside it.
    fn escapes(&self, id: StmtId, nested: bool) -> bool {
        match &self.arena.stmt(id).kind {
            StmtKind::Return(_) => true,
            StmtKind::Break => !nested,
            StmtKind::Block(statements) => statements.iter().any(|&s| self.escapes(s, nested)),
            StmtKind::If { resolution, alternative, .. } => {
                self.escapes(*resolution, nested)
                    || alternative.is_some_and(|alternative| self.escapes(alternative, nested))
            },
            StmtKind::For { body, .. }
            | StmtKind::While { body, .. }
            | StmtKind::DoWhile { body, .. } => self.escapes(*body, true),
            StmtKind::Declaration(_)
            | StmtKind::Continue
            | StmtKind::Expression(_)
            | StmtKind::Empty => false
        }
    }

    fn literal(&self, id: ExprId) -> Option<i32> {
        match self.arena.expr(id).kind {
            ExprKind::Literal(value) => Some(value),
            _ => None
        }
    }

    fn is_true_literal(&self, id: ExprId) -> bool {
        self.literal(id).is_some_and(|value| value != 0)
    }

    /// Literals combined by operators, nothing that reads or writes state.
    fn is_constant(&self, id: ExprId) -> bool {
        match &self.arena.expr(id).kind {
            ExprKind::Literal(_) => true,
            ExprKind::Unary { operand, .. } => self.is_constant(*operand),
            ExprKind::Binary { left, right, .. } | ExprKind::Comma { left, right } => {
                self.is_constant(*left) && self.is_constant(*right)
            },
            ExprKind::Conditional { condition, then, otherwise } => {
                self.is_constant(*condition) && self.is_constant(*then) && self.is_constant(*otherwise)
            },
            ExprKind::Identifier(_)
            | ExprKind::Assign { .. }
            | ExprKind::CompoundAssign { .. }
            | ExprKind::Prefix { .. }
            | ExprKind::Postfix { .. }
            | ExprKind::Call { .. } => false
        }
    }
}

use std::{io::Write, sync::atomic::Ordering};

use crate::{
    environment::prelude::{Environment, Value, FALSE, TRUE},
    host::prelude::{Host, HostFunction},
    parser::prelude::{
        BinaryOperator, Declaration, ExprId, ExprKind, ForInit, Function,
        Identifier, Program, StmtId, StmtKind, UpdateOperator
    },
    utils::prelude::SrcSpan
};

use super::{error::{RuntimeError, RuntimeErrorType}, RunConfig};

type EvalResult<T> = Result<T, RuntimeError>;

/// What a statement asks of the construct around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

pub struct Interpreter<'a, W: Write> {
    program: &'a Program,
    env: Environment<Value>,
    host: Host<W>,
    config: &'a RunConfig,
    steps: u64,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(program: &'a Program, host: Host<W>, config: &'a RunConfig) -> Self {
        Self {
            program,
            env: Environment::new(),
            host,
            config,
            steps: 0
        }
    }

    pub fn host_mut(&mut self) -> &mut Host<W> {
        &mut self.host
    }

    /// Initialises the globals in source order, then calls `main`.
    pub fn run(&mut self) -> EvalResult<Value> {
        let program = self.program;

        for global in &program.globals {
            let value = match global.initializer {
                Some(initializer) => self.eval_expr(initializer)?,
                None => Value(0)
            };

            self.env.define(&global.name.value, value)
                .map_err(|err| RuntimeError::from_scope(err, global.name.location))?;
        }

        let (main, body) = program.definition("main").ok_or_else(|| RuntimeError::new(
            RuntimeErrorType::MissingMain,
            SrcSpan::from(program.location.end, program.location.end)
        ))?;

        self.call_function(main, body, vec![], main.name.location)
    }

    fn tick(&mut self) -> EvalResult<()> {
        let location = SrcSpan::default();

        if let Some(flag) = &self.config.interrupt {
            if flag.load(Ordering::Relaxed) {
                return Err(RuntimeError::new(RuntimeErrorType::Interrupted, location));
            }
        }

        self.steps += 1;

        match self.config.max_steps {
            Some(limit) if self.steps > limit => Err(RuntimeError::new(
                RuntimeErrorType::StepLimitExceeded { limit },
                location
            )),
            _ => Ok(())
        }
    }

    /// Runs `f` inside a fresh block scope, popping it on every exit path.
    fn in_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> EvalResult<R>) -> EvalResult<R> {
        self.env.push_scope();
        let result = f(self);
        self.env.pop_scope();

        result
    }

    fn exec_block(&mut self, statements: &[StmtId]) -> EvalResult<Flow> {
        for statement in statements {
            match self.exec_stmt(*statement)? {
                Flow::Normal => {},
                flow => return Ok(flow)
            }
        }

        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, id: StmtId) -> EvalResult<Flow> {
        let program = self.program;
        let statement = program.arena.stmt(id);

        self.tick().map_err(|err| RuntimeError { location: statement.location, ..err })?;

        match &statement.kind {
            StmtKind::Declaration(declaration) => {
                self.declare(declaration)?;

                Ok(Flow::Normal)
            },
            StmtKind::Block(statements) => self.in_scope(|this| this.exec_block(statements)),
            StmtKind::If { condition, resolution, alternative } => {
                if self.eval_expr(*condition)?.is_truthy() {
                    self.exec_stmt(*resolution)
                } else if let Some(alternative) = alternative {
                    self.exec_stmt(*alternative)
                } else {
                    Ok(Flow::Normal)
                }
            },
            // the init clause gets a scope that spans condition, step and body
            StmtKind::For { init, condition, step, body } => self.in_scope(|this| {
                match init {
                    Some(ForInit::Declaration(declaration)) => this.declare(declaration)?,
                    Some(ForInit::Expression(expr)) => {
                        this.eval_expr(*expr)?;
                    },
                    None => {}
                }

                this.exec_loop(*condition, *step, *body)
            }),
            StmtKind::While { condition, body } => self.exec_loop(Some(*condition), None, *body),
            StmtKind::DoWhile { body, condition } => {
                loop {
                    match self.exec_stmt(*body)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }

                    if !self.eval_expr(*condition)?.is_truthy() {
                        break;
                    }
                }

                Ok(Flow::Normal)
            },
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval_expr(*value)?,
                    None => Value(0)
                };

                Ok(Flow::Return(value))
            },
            StmtKind::Expression(expr) => {
                self.eval_expr(*expr)?;

                Ok(Flow::Normal)
            },
            StmtKind::Empty => Ok(Flow::Normal)
        }
    }

    /// `while` and `for` share this: a missing condition is always true and
    /// `continue` still runs the step.
    fn exec_loop(
        &mut self,
        condition: Option<ExprId>,
        step: Option<ExprId>,
        body: StmtId
    ) -> EvalResult<Flow> {
        loop {
            if let Some(condition) = condition {
                if !self.eval_expr(condition)?.is_truthy() {
                    break;
                }
            }

            match self.exec_stmt(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }

            if let Some(step) = step {
                self.eval_expr(step)?;
            }
        }

        Ok(Flow::Normal)
    }

    fn declare(&mut self, declaration: &Declaration) -> EvalResult<()> {
        for variable in &declaration.variables {
            // uninitialised locals read as zero
            let value = match variable.initializer {
                Some(initializer) => self.eval_expr(initializer)?,
                None => Value(0)
            };

            self.env.define(&variable.name.value, value)
                .map_err(|err| RuntimeError::from_scope(err, variable.name.location))?;
        }

        Ok(())
    }

    fn read(&self, ident: &Identifier) -> EvalResult<Value> {
        self.env.lookup(&ident.value)
            .copied()
            .map_err(|err| RuntimeError::from_scope(err, ident.location))
    }

    fn write(&mut self, ident: &Identifier, value: Value) -> EvalResult<()> {
        self.env.assign(&ident.value, value)
            .map_err(|err| RuntimeError::from_scope(err, ident.location))
    }

    fn apply(
        &self,
        operator: BinaryOperator,
        left: Value,
        right: Value,
        location: SrcSpan
    ) -> EvalResult<Value> {
        left.binary(operator, right)
            .ok_or_else(|| RuntimeError::new(RuntimeErrorType::DivisionByZero, location))
    }

    pub fn eval_expr(&mut self, id: ExprId) -> EvalResult<Value> {
        let program = self.program;
        let expr = program.arena.expr(id);

        match &expr.kind {
            ExprKind::Literal(value) => Ok(Value(*value)),
            ExprKind::Identifier(ident) => self.read(ident),
            ExprKind::Assign { target, value } => {
                let value = self.eval_expr(*value)?;
                self.write(target, value)?;

                Ok(value)
            },
            // `x op= y` reads x, evaluates y, then stores: the same steps as `x = x op y`
            ExprKind::CompoundAssign { operator, target, value } => {
                let current = self.read(target)?;
                let rhs = self.eval_expr(*value)?;
                let result = self.apply(*operator, current, rhs, expr.location)?;

                self.write(target, result)?;

                Ok(result)
            },
            ExprKind::Binary { operator: BinaryOperator::LogicalAnd, left, right } => {
                if !self.eval_expr(*left)?.is_truthy() {
                    return Ok(FALSE);
                }

                Ok(Value::from(self.eval_expr(*right)?.is_truthy()))
            },
            ExprKind::Binary { operator: BinaryOperator::LogicalOr, left, right } => {
                if self.eval_expr(*left)?.is_truthy() {
                    return Ok(TRUE);
                }

                Ok(Value::from(self.eval_expr(*right)?.is_truthy()))
            },
            ExprKind::Binary { operator, left, right } => {
                let left = self.eval_expr(*left)?;
                let right = self.eval_expr(*right)?;

                self.apply(*operator, left, right, expr.location)
            },
            ExprKind::Unary { operator, operand } => {
                Ok(self.eval_expr(*operand)?.unary(*operator))
            },
            ExprKind::Prefix { operator, target } => {
                let updated = updated(self.read(target)?, *operator);
                self.write(target, updated)?;

                Ok(updated)
            },
            ExprKind::Postfix { operator, target } => {
                let old = self.read(target)?;
                self.write(target, updated(old, *operator))?;

                Ok(old)
            },
            ExprKind::Comma { left, right } => {
                self.eval_expr(*left)?;
                self.eval_expr(*right)
            },
            ExprKind::Conditional { condition, then, otherwise } => {
                match self.eval_expr(*condition)?.is_truthy() {
                    true => self.eval_expr(*then),
                    false => self.eval_expr(*otherwise)
                }
            },
            ExprKind::Call { name, arguments } => self.call(name, arguments, expr.location)
        }
    }

    /// A definition in the program wins over a library function of the same
    /// name; prototypes alone fall through to the library.
    fn call(&mut self, name: &Identifier, arguments: &[ExprId], location: SrcSpan) -> EvalResult<Value> {
        let program = self.program;

        let mut values = Vec::with_capacity(arguments.len());

        for argument in arguments {
            values.push(self.eval_expr(*argument)?);
        }

        if let Some((function, body)) = program.definition(&name.value) {
            return self.call_function(function, body, values, location);
        }

        match HostFunction::from_name(&name.value) {
            Some(function) => self.host.call(function, &values)
                .map_err(|err| RuntimeError::from_host(err, location)),
            None => Err(RuntimeError::new(
                RuntimeErrorType::UndefinedFunction { name: name.value.clone() },
                name.location
            ))
        }
    }

    fn call_function(
        &mut self,
        function: &'a Function,
        body: StmtId,
        arguments: Vec<Value>,
        location: SrcSpan
    ) -> EvalResult<Value> {
        if arguments.len() != function.params.len() {
            return Err(RuntimeError::new(
                RuntimeErrorType::ArityMismatch {
                    name: function.name.value.clone(),
                    expected: function.params.len(),
                    got: arguments.len()
                },
                location
            ));
        }

        let limit = self.config.max_call_depth;

        if self.env.depth() >= limit {
            return Err(RuntimeError::new(RuntimeErrorType::CallDepthExceeded { limit }, location));
        }

        self.env.push_frame();
        let flow = self.enter(function, arguments, body);
        self.env.pop_frame();

        match flow? {
            Flow::Return(value) => Ok(value),
            // falling off the end returns 0
            Flow::Normal => Ok(Value(0)),
            Flow::Break => Err(RuntimeError::new(RuntimeErrorType::BreakOutsideLoop, function.location)),
            Flow::Continue => Err(RuntimeError::new(RuntimeErrorType::ContinueOutsideLoop, function.location)),
        }
    }

    fn enter(&mut self, function: &Function, arguments: Vec<Value>, body: StmtId) -> EvalResult<Flow> {
        let program = self.program;

        for (param, value) in function.params.iter().zip(arguments) {
            self.env.define(&param.value, value)
                .map_err(|err| RuntimeError::from_scope(err, param.location))?;
        }

        // the outermost block of the body shares the parameter scope
        match &program.arena.stmt(body).kind {
            StmtKind::Block(statements) => self.exec_block(statements),
            _ => self.exec_stmt(body)
        }
    }
}

fn updated(value: Value, operator: UpdateOperator) -> Value {
    match operator {
        UpdateOperator::Increment => Value(value.0.wrapping_add(1)),
        UpdateOperator::Decrement => Value(value.0.wrapping_sub(1)),
    }
}

use std::fmt::{Display, Write};

use crate::{lexer::prelude::{LexResult, Token}, utils::prelude::SrcSpan};
use super::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence};

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub program: Program
}

/// Index of an expression node inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

/// Index of a statement node inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(u32);

/// Owns every expression and statement of a program. Children are referenced
/// by id, so the tree never holds owning pointers to its nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arena {
    exprs: Vec<Expression>,
    stmts: Vec<Statement>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_expr(&mut self, kind: ExprKind, location: SrcSpan) -> ExprId {
        self.exprs.push(Expression { kind, location });

        ExprId(self.exprs.len() as u32 - 1)
    }

    pub fn push_stmt(&mut self, kind: StmtKind, location: SrcSpan) -> StmtId {
        self.stmts.push(Statement { kind, location });

        StmtId(self.stmts.len() as u32 - 1)
    }

    pub fn expr(&self, id: ExprId) -> &Expression {
        &self.exprs[id.0 as usize]
    }

    pub fn stmt(&self, id: StmtId) -> &Statement {
        &self.stmts[id.0 as usize]
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

// program -> { <global_declaration> | <function> }
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
    pub globals: Vec<VarDecl>,
    pub arena: Arena,
    pub location: SrcSpan
}

impl Program {
    /// The definition of `name`, skipping prototypes.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter()
            .find(|function| function.name.value == name && function.body.is_some())
    }

    /// Like [`Program::function`], paired with the body it is known to have.
    pub fn definition(&self, name: &str) -> Option<(&Function, StmtId)> {
        self.functions.iter()
            .filter(|function| function.name.value == name)
            .find_map(|function| function.body.map(|body| (function, body)))
    }
}

// function -> int <identifier> ( [int <identifier> {, int <identifier>}] ) (<block> | ;)
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    /// `None` for a prototype such as `int putchar(int c);`
    pub body: Option<StmtId>,
    pub location: SrcSpan
}

// declaration -> int <var_decl> {, <var_decl>} ;
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub variables: Vec<VarDecl>,
    pub location: SrcSpan
}

// var_decl -> <identifier> [= <expression>]
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Identifier,
    pub initializer: Option<ExprId>,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StmtKind,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Declaration(Declaration),
    Block(Vec<StmtId>),
    If {
        condition: ExprId,
        resolution: StmtId,
        alternative: Option<StmtId>
    },
    For {
        init: Option<ForInit>,
        condition: Option<ExprId>,
        step: Option<ExprId>,
        body: StmtId
    },
    While {
        condition: ExprId,
        body: StmtId
    },
    DoWhile {
        body: StmtId,
        condition: ExprId
    },
    Break,
    Continue,
    Return(Option<ExprId>),
    Expression(ExprId),
    Empty
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(Declaration),
    Expression(ExprId)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(i32),
    Identifier(Identifier),
    Assign {
        target: Identifier,
        value: ExprId
    },
    CompoundAssign {
        operator: BinaryOperator,
        target: Identifier,
        value: ExprId
    },
    Binary {
        operator: BinaryOperator,
        left: ExprId,
        right: ExprId
    },
    Unary {
        operator: UnaryOperator,
        operand: ExprId
    },
    Prefix {
        operator: UpdateOperator,
        target: Identifier
    },
    Postfix {
        operator: UpdateOperator,
        target: Identifier
    },
    Comma {
        left: ExprId,
        right: ExprId
    },
    Conditional {
        condition: ExprId,
        then: ExprId,
        otherwise: ExprId
    },
    Call {
        name: Identifier,
        arguments: Vec<ExprId>
    }
}

// identifier -> (<letter> | _) { <letter> | <digit> | _ }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    LogicalAnd,
    LogicalOr,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOperator {
    pub fn from_token(token: &Token) -> Option<Self> {
        Some(match token {
            Token::Plus => Self::Add,
            Token::Minus => Self::Subtract,
            Token::Star => Self::Multiply,
            Token::Slash => Self::Divide,
            Token::Percent => Self::Remainder,
            Token::Ampersand => Self::BitAnd,
            Token::Pipe => Self::BitOr,
            Token::Caret => Self::BitXor,
            Token::ShiftLeft => Self::ShiftLeft,
            Token::ShiftRight => Self::ShiftRight,
            Token::AndAnd => Self::LogicalAnd,
            Token::OrOr => Self::LogicalOr,
            Token::Equal => Self::Equal,
            Token::NotEqual => Self::NotEqual,
            Token::LessThan => Self::Less,
            Token::LessThanOrEqual => Self::LessEqual,
            Token::GreaterThan => Self::Greater,
            Token::GreaterThanOrEqual => Self::GreaterEqual,
            _ => return None
        })
    }

    /// The operator behind a compound assignment token (`+=` -> `+`).
    pub fn from_compound_token(token: &Token) -> Option<Self> {
        Some(match token {
            Token::PlusAssign => Self::Add,
            Token::MinusAssign => Self::Subtract,
            Token::StarAssign => Self::Multiply,
            Token::SlashAssign => Self::Divide,
            Token::PercentAssign => Self::Remainder,
            Token::AmpersandAssign => Self::BitAnd,
            Token::PipeAssign => Self::BitOr,
            Token::CaretAssign => Self::BitXor,
            Token::ShiftLeftAssign => Self::ShiftLeft,
            Token::ShiftRightAssign => Self::ShiftRight,
            _ => return None
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    BitNot,
    Not,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::BitNot => "~",
            Self::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

impl UpdateOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

// Pretty printing. Compound expressions are fully parenthesised so the
// printed form shows how the source was grouped.

impl Arena {
    pub fn expr_to_string(&self, id: ExprId) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, id);
        out
    }

    fn write_expr(&self, out: &mut String, id: ExprId) {
        let _ = match &self.expr(id).kind {
            ExprKind::Literal(value) => write!(out, "{value}"),
            ExprKind::Identifier(ident) => write!(out, "{ident}"),
            ExprKind::Assign { target, value } => {
                write!(out, "({target} = {})", self.expr_to_string(*value))
            },
            ExprKind::CompoundAssign { operator, target, value } => {
                write!(out, "({target} {}= {})", operator.as_str(), self.expr_to_string(*value))
            },
            ExprKind::Binary { operator, left, right } => {
                write!(out, "({} {} {})",
                    self.expr_to_string(*left),
                    operator.as_str(),
                    self.expr_to_string(*right)
                )
            },
            ExprKind::Unary { operator, operand } => {
                write!(out, "({}{})", operator.as_str(), self.expr_to_string(*operand))
            },
            ExprKind::Prefix { operator, target } => write!(out, "({}{target})", operator.as_str()),
            ExprKind::Postfix { operator, target } => write!(out, "({target}{})", operator.as_str()),
            ExprKind::Comma { left, right } => {
                write!(out, "({}, {})", self.expr_to_string(*left), self.expr_to_string(*right))
            },
            ExprKind::Conditional { condition, then, otherwise } => {
                write!(out, "({} ? {} : {})",
                    self.expr_to_string(*condition),
                    self.expr_to_string(*then),
                    self.expr_to_string(*otherwise)
                )
            },
            ExprKind::Call { name, arguments } => {
                let arguments = arguments.iter()
                    .map(|argument| self.expr_to_string(*argument))
                    .collect::<Vec<String>>();

                write!(out, "{name}({})", arguments.join(", "))
            }
        };
    }

    fn declaration_to_string(&self, declaration: &Declaration) -> String {
        let variables = declaration.variables.iter()
            .map(|variable| match variable.initializer {
                Some(initializer) => format!("{} = {}", variable.name, self.expr_to_string(initializer)),
                None => variable.name.to_string()
            })
            .collect::<Vec<String>>();

        format!("int {};", variables.join(", "))
    }

    fn write_stmt(&self, out: &mut String, id: StmtId, indent: usize) {
        let pad = "    ".repeat(indent);

        let _ = match &self.stmt(id).kind {
            StmtKind::Declaration(declaration) => {
                writeln!(out, "{pad}{}", self.declaration_to_string(declaration))
            },
            StmtKind::Block(statements) => {
                let _ = writeln!(out, "{pad}{{");
                for statement in statements {
                    self.write_stmt(out, *statement, indent + 1);
                }
                writeln!(out, "{pad}}}")
            },
            StmtKind::If { condition, resolution, alternative } => {
                let _ = writeln!(out, "{pad}if ({})", self.expr_to_string(*condition));
                self.write_stmt(out, *resolution, indent + 1);

                if let Some(alternative) = alternative {
                    let _ = writeln!(out, "{pad}else");
                    self.write_stmt(out, *alternative, indent + 1);
                }

                Ok(())
            },
            StmtKind::For { init, condition, step, body } => {
                let init = match init {
                    Some(ForInit::Declaration(declaration)) => self.declaration_to_string(declaration),
                    Some(ForInit::Expression(expr)) => format!("{};", self.expr_to_string(*expr)),
                    None => ";".to_string()
                };
                let condition = condition.map(|id| format!(" {}", self.expr_to_string(id))).unwrap_or_default();
                let step = step.map(|id| format!(" {}", self.expr_to_string(id))).unwrap_or_default();

                let _ = writeln!(out, "{pad}for ({init}{condition};{step})");
                self.write_stmt(out, *body, indent + 1);

                Ok(())
            },
            StmtKind::While { condition, body } => {
                let _ = writeln!(out, "{pad}while ({})", self.expr_to_string(*condition));
                self.write_stmt(out, *body, indent + 1);

                Ok(())
            },
            StmtKind::DoWhile { body, condition } => {
                let _ = writeln!(out, "{pad}do");
                self.write_stmt(out, *body, indent + 1);
                writeln!(out, "{pad}while ({});", self.expr_to_string(*condition))
            },
            StmtKind::Break => writeln!(out, "{pad}break;"),
            StmtKind::Continue => writeln!(out, "{pad}continue;"),
            StmtKind::Return(Some(value)) => writeln!(out, "{pad}return {};", self.expr_to_string(*value)),
            StmtKind::Return(None) => writeln!(out, "{pad}return;"),
            StmtKind::Expression(expr) => writeln!(out, "{pad}{};", self.expr_to_string(*expr)),
            StmtKind::Empty => writeln!(out, "{pad};"),
        };
    }

    pub fn stmt_to_string(&self, id: StmtId) -> String {
        let mut out = String::new();
        self.write_stmt(&mut out, id, 0);
        out
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for global in &self.globals {
            match global.initializer {
                Some(initializer) => writeln!(f, "int {} = {};", global.name, self.arena.expr_to_string(initializer))?,
                None => writeln!(f, "int {};", global.name)?
            }
        }

        for function in &self.functions {
            let params = function.params.iter()
                .map(|param| format!("int {param}"))
                .collect::<Vec<String>>();

            match function.body {
                Some(body) => write!(f, "int {}({})\n{}", function.name, params.join(", "), self.arena.stmt_to_string(body))?,
                None => writeln!(f, "int {}({});", function.name, params.join(", "))?
            }
        }

        Ok(())
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Program {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut functions = vec![];
        let mut globals = vec![];

        loop {
            match &parser.current_token {
                Some((_, Token::Eof, _)) => break,
                Some(_) => {},
                None => return parser.unexpected_eof()
            }

            let (start, _) = parser.expect_one(Token::Int)?;

            match (&parser.current_token, &parser.next_token) {
                (Some((_, Token::Ident(_), _)), Some((_, Token::LParen, _))) => {
                    functions.push(Function::parse_after_type(parser, start)?);
                },
                _ => {
                    let declaration = Declaration::parse_after_type(parser, start)?;
                    globals.extend(declaration.variables);
                }
            }
        }

        Ok(Self {
            functions,
            globals,
            arena: std::mem::take(&mut parser.arena),
            location: SrcSpan { start: 0, end: parser.last_end }
        })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Function {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Int)?;

        Self::parse_after_type(parser, start)
    }
}

impl Function {
    fn parse_after_type<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        start: u32
    ) -> Result<Self, ParseError> {
        let name: Identifier = parser.expect_ident()?.into();

        parser.expect_one(Token::LParen)?;

        let mut params = vec![];

        if parser.eat(Token::RParen).is_none() {
            loop {
                parser.expect_one(Token::Int)?;
                params.push(parser.expect_ident()?.into());

                if parser.eat(Token::Comma).is_none() {
                    parser.expect_one(Token::RParen)?;
                    break;
                }
            }
        }

        let body = match &parser.current_token {
            Some((_, Token::Semicolon, _)) => {
                parser.step();
                None
            },
            Some((_, Token::LBrace, _)) => Some(StmtId::parse(parser, None)?),
            Some((start, token, end)) => return parse_error(
                ParseErrorType::UnexpectedToken {
                    token: token.clone(),
                    expected: vec!["`{`".into(), "`;`".into()]
                },
                SrcSpan { start: *start, end: *end }
            ),
            None => return parser.unexpected_eof()
        };

        Ok(Self {
            name,
            params,
            body,
            location: SrcSpan { start, end: parser.last_end }
        })
    }
}

// block_item -> <declaration> | <statement>
fn parse_block_item<T: Iterator<Item = LexResult>>(parser: &mut Parser<T>) -> Result<StmtId, ParseError> {
    match parser.current_is(&Token::Int) {
        true => {
            let declaration = Declaration::parse(parser, None)?;
            let location = declaration.location;

            Ok(parser.arena.push_stmt(StmtKind::Declaration(declaration), location))
        },
        false => StmtId::parse(parser, None)
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Declaration {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Int)?;

        Self::parse_after_type(parser, start)
    }
}

impl Declaration {
    fn parse_after_type<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        start: u32
    ) -> Result<Self, ParseError> {
        let mut variables = vec![VarDecl::parse(parser, None)?];

        while parser.eat(Token::Comma).is_some() {
            variables.push(VarDecl::parse(parser, None)?);
        }

        parser.expect_one(Token::Semicolon)?;

        Ok(Self {
            variables,
            location: SrcSpan { start, end: parser.last_end }
        })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for VarDecl {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let name: Identifier = parser.expect_ident()?.into();

        // `int a = 1, b;` the comma separates declarators, not operands
        let initializer = match parser.eat(Token::Assign) {
            Some(_) => Some(ExprId::parse(parser, Some(Precedence::Comma))?),
            None => None
        };

        let location = SrcSpan { start: name.location.start, end: parser.last_end };

        Ok(Self {
            name,
            initializer,
            location
        })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for StmtId {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, token) = match &parser.current_token {
            Some((start, token, _)) => (*start, token.clone()),
            None => return parser.unexpected_eof()
        };

        let kind = match token {
            Token::LBrace => {
                parser.step();

                let mut statements = vec![];

                loop {
                    match &parser.current_token {
                        Some((_, Token::RBrace, _)) => {
                            parser.step();
                            break;
                        },
                        Some((_, Token::Eof, _)) | None => {
                            parser.expect_one(Token::RBrace)?;
                            break;
                        },
                        Some(_) => statements.push(parse_block_item(parser)?)
                    }
                }

                StmtKind::Block(statements)
            },
            // `if (c) int a;` has no scope for `a` to live in
            Token::Int => return parse_error(
                ParseErrorType::MisplacedDeclaration,
                SrcSpan { start, end: start + 3 }
            ),
            Token::If => {
                parser.step();
                parser.expect_one(Token::LParen)?;

                let condition = ExprId::parse(parser, None)?;

                parser.expect_one(Token::RParen)?;

                let resolution = StmtId::parse(parser, None)?;

                let alternative = match parser.eat(Token::Else) {
                    Some(_) => Some(StmtId::parse(parser, None)?),
                    None => None
                };

                StmtKind::If { condition, resolution, alternative }
            },
            Token::For => {
                parser.step();
                parser.expect_one(Token::LParen)?;

                let init = match &parser.current_token {
                    Some((_, Token::Semicolon, _)) => {
                        parser.step();
                        None
                    },
                    Some((_, Token::Int, _)) => Some(ForInit::Declaration(Declaration::parse(parser, None)?)),
                    _ => {
                        let init = ExprId::parse(parser, None)?;
                        parser.expect_one(Token::Semicolon)?;

                        Some(ForInit::Expression(init))
                    }
                };

                let condition = match parser.current_is(&Token::Semicolon) {
                    true => None,
                    false => Some(ExprId::parse(parser, None)?)
                };

                parser.expect_one(Token::Semicolon)?;

                let step = match parser.current_is(&Token::RParen) {
                    true => None,
                    false => Some(ExprId::parse(parser, None)?)
                };

                parser.expect_one(Token::RParen)?;

                let body = StmtId::parse(parser, None)?;

                StmtKind::For { init, condition, step, body }
            },
            Token::While => {
                parser.step();
                parser.expect_one(Token::LParen)?;

                let condition = ExprId::parse(parser, None)?;

                parser.expect_one(Token::RParen)?;

                let body = StmtId::parse(parser, None)?;

                StmtKind::While { condition, body }
            },
            Token::Do => {
                parser.step();

                let body = StmtId::parse(parser, None)?;

                parser.expect_one(Token::While)?;
                parser.expect_one(Token::LParen)?;

                let condition = ExprId::parse(parser, None)?;

                parser.expect_one(Token::RParen)?;
                parser.expect_one(Token::Semicolon)?;

                StmtKind::DoWhile { body, condition }
            },
            Token::Break => {
                parser.step();
                parser.expect_one(Token::Semicolon)?;

                StmtKind::Break
            },
            Token::Continue => {
                parser.step();
                parser.expect_one(Token::Semicolon)?;

                StmtKind::Continue
            },
            Token::Return => {
                parser.step();

                match parser.eat(Token::Semicolon) {
                    Some(_) => StmtKind::Return(None),
                    None => {
                        let value = ExprId::parse(parser, None)?;
                        parser.expect_one(Token::Semicolon)?;

                        StmtKind::Return(Some(value))
                    }
                }
            },
            Token::Semicolon => {
                parser.step();

                StmtKind::Empty
            },
            _ => {
                let expr = ExprId::parse(parser, None)?;
                parser.expect_one(Token::Semicolon)?;

                StmtKind::Expression(expr)
            }
        };

        Ok(parser.arena.push_stmt(kind, SrcSpan { start, end: parser.last_end }))
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ExprId {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut left = parse_prefix(parser)?;

        while precedence.unwrap_or(Precedence::Lowest) < parser.current_precedence() {
            let start = parser.arena.expr(left).location.start;
            let kind = ExprKind::parse(parser, left, precedence)?;

            left = parser.arena.push_expr(kind, SrcSpan { start, end: parser.last_end });
        }

        Ok(left)
    }
}

// prefix -> <number> | <identifier> | <call> | ( <expression> ) | <unary_op> <expression>
fn parse_prefix<T: Iterator<Item = LexResult>>(parser: &mut Parser<T>) -> Result<ExprId, ParseError> {
    let (start, token, end) = match &parser.current_token {
        Some(span) => span.clone(),
        None => return parser.unexpected_eof()
    };

    let kind = match token {
        Token::Number(value) => {
            parser.step();

            ExprKind::Literal(value)
        },
        Token::Ident(_) if matches!(parser.next_token, Some((_, Token::LParen, _))) => {
            let name: Identifier = parser.expect_ident()?.into();

            parser.expect_one(Token::LParen)?;

            let mut arguments = vec![];

            if parser.eat(Token::RParen).is_none() {
                loop {
                    arguments.push(ExprId::parse(parser, Some(Precedence::Comma))?);

                    if parser.eat(Token::Comma).is_none() {
                        parser.expect_one(Token::RParen)?;
                        break;
                    }
                }
            }

            ExprKind::Call { name, arguments }
        },
        Token::Ident(_) => ExprKind::Identifier(parser.expect_ident()?.into()),
        Token::LParen => {
            parser.step();

            let expression = ExprId::parse(parser, None)?;

            parser.expect_one(Token::RParen)?;

            return Ok(expression);
        },
        Token::Minus | Token::Tilde | Token::Bang => {
            parser.step();

            let operator = match token {
                Token::Minus => UnaryOperator::Negate,
                Token::Tilde => UnaryOperator::BitNot,
                _ => UnaryOperator::Not
            };

            let operand = ExprId::parse(parser, Some(Precedence::Prefix))?;

            ExprKind::Unary { operator, operand }
        },
        Token::Increment | Token::Decrement => {
            parser.step();

            let operator = match token {
                Token::Increment => UpdateOperator::Increment,
                _ => UpdateOperator::Decrement
            };

            let operand = ExprId::parse(parser, Some(Precedence::Prefix))?;

            ExprKind::Prefix { operator, target: assignment_target(parser, operand)? }
        },
        token => return parse_error(
            ParseErrorType::ExpectedExpression { token },
            SrcSpan { start, end }
        )
    };

    Ok(parser.arena.push_expr(kind, SrcSpan { start, end: parser.last_end }))
}

fn assignment_target<T: Iterator<Item = LexResult>>(
    parser: &Parser<T>,
    id: ExprId
) -> Result<Identifier, ParseError> {
    let expr = parser.arena.expr(id);

    match &expr.kind {
        ExprKind::Identifier(ident) => Ok(ident.clone()),
        _ => parse_error(ParseErrorType::InvalidAssignmentTarget, expr.location)
    }
}

// infix -> <expression> <binary_op> <expression>
//        | <identifier> <assign_op> <expression>
//        | <expression> ? <expression> : <expression>
//        | <expression> , <expression>
//        | <identifier> (++ | --)
impl<T: Iterator<Item = LexResult>> InfixParse<T> for ExprKind {
    fn parse(
        parser: &mut Parser<T>,
        left: ExprId,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();

        let (start, token, end) = match parser.next_token() {
            Some(span) => span,
            None => return parser.unexpected_eof()
        };

        let kind = match token {
            Token::Question => {
                let then = ExprId::parse(parser, None)?;

                parser.expect_one(Token::Colon)?;

                let otherwise = ExprId::parse(parser, Some(Precedence::Assign))?;

                Self::Conditional { condition: left, then, otherwise }
            },
            Token::Comma => Self::Comma {
                left,
                right: ExprId::parse(parser, Some(Precedence::Comma))?
            },
            Token::Increment | Token::Decrement => Self::Postfix {
                operator: match token {
                    Token::Increment => UpdateOperator::Increment,
                    _ => UpdateOperator::Decrement
                },
                target: assignment_target(parser, left)?
            },
            Token::Assign => {
                let target = assignment_target(parser, left)?;

                // right associative: `a = b = c` is `a = (b = c)`
                let value = ExprId::parse(parser, Some(Precedence::Comma))?;

                Self::Assign { target, value }
            },
            token => match (BinaryOperator::from_compound_token(&token), BinaryOperator::from_token(&token)) {
                (Some(operator), _) => {
                    let target = assignment_target(parser, left)?;
                    let value = ExprId::parse(parser, Some(Precedence::Comma))?;

                    Self::CompoundAssign { operator, target, value }
                },
                (None, Some(operator)) => Self::Binary {
                    operator,
                    left,
                    right: ExprId::parse(parser, Some(precedence))?
                },
                (None, None) => return parse_error(
                    ParseErrorType::UnexpectedToken {
                        token,
                        expected: vec!["an operator".into()]
                    },
                    SrcSpan { start, end }
                )
            }
        };

        Ok(kind)
    }
}

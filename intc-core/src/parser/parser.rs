use crate::{lexer::prelude::{LexResult, LexicalError, Lexer, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Arena, ExprId, Module, Program};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: ExprId,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub lex_errors: Vec<LexicalError>,
    pub arena: Arena,
    /// End offset of the last consumed token.
    pub last_end: u32,

    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            lex_errors: vec![],
            arena: Arena::new(),
            last_end: 0,

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();

        let next = match self.tokens.next() {
            Some(Ok(tok)) => Some(tok),
            Some(Err(err)) => {
                self.lex_errors.push(err);

                None
            },
            None => None
        };

        if let Some((_, _, end)) = &t {
            self.last_end = *end;
        }

        self.current_token = self.next_token.take();
        self.next_token = next;

        t
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    pub fn current_is(&self, token: &Token) -> bool {
        matches!(&self.current_token, Some((_, current, _)) if current == token)
    }

    pub fn parse(&mut self) -> Result<Module, ParseError> {
        let program = Program::parse(self, None);

        if let Some(error) = self.lex_errors.first() {
            return parse_error(
                ParseErrorType::LexError { error: *error },
                error.location
            );
        }

        Ok(Module {
            name: "".into(),
            program: program?
        })
    }

    /// Consumes `token` if it is current, otherwise leaves the stream untouched.
    pub fn eat(&mut self, token: Token) -> Option<(u32, u32)> {
        if self.current_is(&token) {
            self.next_token().map(|(start, _, end)| (start, end))
        } else {
            None
        }
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match &self.current_token {
            Some((start, tok, end)) if *tok == token => {
                let span = (*start, *end);
                self.step();
                Ok(span)
            },
            Some((start, tok, end)) => parse_error(
                ParseErrorType::UnexpectedToken {
                    token: tok.clone(),
                    expected: vec![format!("`{}`", token.as_literal())],
                },
                SrcSpan { start: *start, end: *end }
            ),
            None => self.unexpected_eof()
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match &self.current_token {
            Some((start, Token::Ident(value), end)) => {
                let ident = (*start, value.clone(), *end);
                self.step();
                Ok(ident)
            },
            Some((start, _, end)) => parse_error(
                ParseErrorType::ExpectedIdent,
                SrcSpan { start: *start, end: *end }
            ),
            None => self.unexpected_eof()
        }
    }

    pub fn unexpected_eof<R>(&self) -> Result<R, ParseError> {
        parse_error(
            ParseErrorType::UnexpectedEof,
            SrcSpan { start: self.last_end, end: self.last_end }
        )
    }
}

/// Binding strength of the token that follows an operand. A loop
/// `while precedence < current_precedence()` keeps extending the left side.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Comma,
    Assign,
    Conditional,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equals,
    LessGreater,
    Shift,
    Sum,
    Product,
    Prefix,
    Postfix
}

pub fn parse_module(src: &str) -> Result<Module, ParseError> {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);
    let parsed = parser.parse()?;

    Ok(parsed)
}

pub fn parse_module_from_stream(stream: impl Iterator<Item = char>) -> Result<Module, ParseError> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);
    let parsed = parser.parse()?;

    Ok(parsed)
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Comma => Self::Comma,
            token if token.is_assignment() => Self::Assign,
            Token::Question => Self::Conditional,
            Token::OrOr => Self::LogicalOr,
            Token::AndAnd => Self::LogicalAnd,
            Token::Pipe => Self::BitOr,
            Token::Caret => Self::BitXor,
            Token::Ampersand => Self::BitAnd,
            Token::Equal | Token::NotEqual => Self::Equals,
            Token::LessThan | Token::GreaterThan |
            Token::LessThanOrEqual | Token::GreaterThanOrEqual => Self::LessGreater,
            Token::ShiftLeft | Token::ShiftRight => Self::Shift,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Star | Token::Slash | Token::Percent => Self::Product,
            Token::Increment | Token::Decrement => Self::Postfix,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}

use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedIdent,
    ExpectedExpression {
        token: Token
    },
    InvalidAssignmentTarget,
    MisplacedDeclaration,
    UnexpectedEof,
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(_) => "a Number".to_string(),
        Token::Ident(_) => "an Identifier".to_string(),
        Token::Eof => "the end of file".to_string(),
        _ if token.is_reserved_word() => format!("the keyword `{}`", token.as_literal()),
        _ => format!("`{}`", token.as_literal())
    }
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected identifier", vec![]),
            ParseErrorType::ExpectedExpression { token } => {
                ("Expected an expression", vec![format!("Found {}", describe(token))])
            },
            ParseErrorType::InvalidAssignmentTarget => (
                "Invalid assignment target",
                vec!["Only a variable name can be assigned, incremented or decremented".into()]
            ),
            ParseErrorType::MisplacedDeclaration => (
                "Declaration is not a statement",
                vec!["Wrap it in braces to give it a scope".into()]
            ),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let messages = std::iter::once(format!("Found {}, expected one of: ", describe(token)))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::LexError { error } => error.details()
        }
    }
}

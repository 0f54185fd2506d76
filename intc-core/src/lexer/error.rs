use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnknownCharacter { ch: char },
    UnterminatedLiteral,
    EmptyCharLiteral,
    UnknownEscape { ch: char },
    IntegerTooLarge,
    UnterminatedComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnknownCharacter { ch } => {
                ("Unknown character", vec![format!("`{}` is not part of the language", ch.escape_default())])
            },
            LexicalErrorType::UnterminatedLiteral => {
                ("Unterminated character literal", vec!["Expected a closing `'`".into()])
            },
            LexicalErrorType::EmptyCharLiteral => {
                ("Empty character literal", vec![])
            },
            LexicalErrorType::UnknownEscape { ch } => {
                ("Unknown escape sequence", vec![format!("`\\{}` is not supported", ch.escape_default())])
            },
            LexicalErrorType::IntegerTooLarge => {
                ("Integer literal does not fit in `int`", vec![format!("The largest literal is {}", i32::MAX)])
            },
            LexicalErrorType::UnterminatedComment => {
                ("Unterminated block comment", vec!["Expected a closing `*/`".into()])
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    // decimal literal or a desugared character literal such as '0'
    Number(i32),

    // Keywords
    Int, // int
    If, // if
    Else, // else
    For, // for
    While, // while
    Do, // do
    Break, // break
    Continue, // continue
    Return, // return

    // Arithmetic
    Plus, // +
    Minus, // -
    Star, // *
    Slash, // /
    Percent, // %

    // Bitwise
    Ampersand, // &
    Pipe, // |
    Caret, // ^
    Tilde, // ~
    ShiftLeft, // <<
    ShiftRight, // >>

    // Logical
    Bang, // !
    AndAnd, // &&
    OrOr, // ||

    // Relational
    Equal, // ==
    NotEqual, // !=
    LessThan, // <
    LessThanOrEqual, // <=
    GreaterThan, // >
    GreaterThanOrEqual, // >=

    // Assignment
    Assign, // =
    PlusAssign, // +=
    MinusAssign, // -=
    StarAssign, // *=
    SlashAssign, // /=
    PercentAssign, // %=
    AmpersandAssign, // &=
    PipeAssign, // |=
    CaretAssign, // ^=
    ShiftLeftAssign, // <<=
    ShiftRightAssign, // >>=

    Increment, // ++
    Decrement, // --

    Question, // ?
    Colon, // :
    Comma, // ,
    Semicolon, // ;
    LBrace, // {
    RBrace, // }
    LParen, // (
    RParen, // )

    Eof,
}

pub fn str_to_keyword(word: &str) -> Option<Token> {
    Some(match word {
        "int" => Token::Int,
        "if" => Token::If,
        "else" => Token::Else,
        "for" => Token::For,
        "while" => Token::While,
        "do" => Token::Do,
        "break" => Token::Break,
        "continue" => Token::Continue,
        "return" => Token::Return,
        _ => return None
    })
}

impl Token {
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            Token::Int
            | Token::If
            | Token::Else
            | Token::For
            | Token::While
            | Token::Do
            | Token::Break
            | Token::Continue
            | Token::Return
        )
    }

    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            Token::Assign
            | Token::PlusAssign
            | Token::MinusAssign
            | Token::StarAssign
            | Token::SlashAssign
            | Token::PercentAssign
            | Token::AmpersandAssign
            | Token::PipeAssign
            | Token::CaretAssign
            | Token::ShiftLeftAssign
            | Token::ShiftRightAssign
        )
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => return value.clone(),
            Token::Number(value) => return value.to_string(),

            Token::Int => "int",
            Token::If => "if",
            Token::Else => "else",
            Token::For => "for",
            Token::While => "while",
            Token::Do => "do",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Return => "return",

            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Ampersand => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::Tilde => "~",
            Token::ShiftLeft => "<<",
            Token::ShiftRight => ">>",
            Token::Bang => "!",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Equal => "==",
            Token::NotEqual => "!=",
            Token::LessThan => "<",
            Token::LessThanOrEqual => "<=",
            Token::GreaterThan => ">",
            Token::GreaterThanOrEqual => ">=",
            Token::Assign => "=",
            Token::PlusAssign => "+=",
            Token::MinusAssign => "-=",
            Token::StarAssign => "*=",
            Token::SlashAssign => "/=",
            Token::PercentAssign => "%=",
            Token::AmpersandAssign => "&=",
            Token::PipeAssign => "|=",
            Token::CaretAssign => "^=",
            Token::ShiftLeftAssign => "<<=",
            Token::ShiftRightAssign => ">>=",
            Token::Increment => "++",
            Token::Decrement => "--",
            Token::Question => "?",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LParen => "(",
            Token::RParen => ")",

            Token::Eof => "end of file",
        }.to_string()
    }
}

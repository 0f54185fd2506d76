use super::prelude::{tokenize, Lexer, LexicalError, LexicalErrorType, Token};

fn tokens_of(input: &str) -> Vec<Token> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|(_, token, _)| token)
        .collect()
}

#[test]
fn test_function_header() -> std::result::Result<(), LexicalError> {
    let input = "int main() { return 42; }";

    let mut lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

    let tokens = vec![
        Token::Int,
        Token::Ident("main".into()),
        Token::LParen,
        Token::RParen,
        Token::LBrace,
        Token::Return,
        Token::Number(42),
        Token::Semicolon,
        Token::RBrace,
        Token::Eof,
    ];

    for (idx, token) in tokens.iter().enumerate() {
        let (_, next_token, _) = lexer.next_token()?;

        assert_eq!(
            *token, next_token,
            "Next token does not match expected token ({:?}, {:?}) at {}",
            next_token, token, idx
        );
    }

    Ok(())
}

#[test]
fn test_operators_longest_match() {
    let input = "+ += ++ - -= -- * *= / /= % %= & &= && | |= || ^ ^= ~ ! != = == < <= << <<= > >= >> >>= ? : , ;";

    assert_eq!(tokens_of(input), vec![
        Token::Plus, Token::PlusAssign, Token::Increment,
        Token::Minus, Token::MinusAssign, Token::Decrement,
        Token::Star, Token::StarAssign,
        Token::Slash, Token::SlashAssign,
        Token::Percent, Token::PercentAssign,
        Token::Ampersand, Token::AmpersandAssign, Token::AndAnd,
        Token::Pipe, Token::PipeAssign, Token::OrOr,
        Token::Caret, Token::CaretAssign,
        Token::Tilde,
        Token::Bang, Token::NotEqual,
        Token::Assign, Token::Equal,
        Token::LessThan, Token::LessThanOrEqual, Token::ShiftLeft, Token::ShiftLeftAssign,
        Token::GreaterThan, Token::GreaterThanOrEqual, Token::ShiftRight, Token::ShiftRightAssign,
        Token::Question, Token::Colon, Token::Comma, Token::Semicolon,
        Token::Eof,
    ]);
}

#[test]
fn test_operators_without_spaces() {
    assert_eq!(tokens_of("a+++b"), vec![
        Token::Ident("a".into()),
        Token::Increment,
        Token::Plus,
        Token::Ident("b".into()),
        Token::Eof,
    ]);

    assert_eq!(tokens_of("x<<=1"), vec![
        Token::Ident("x".into()),
        Token::ShiftLeftAssign,
        Token::Number(1),
        Token::Eof,
    ]);
}

#[test]
fn test_char_literals() {
    assert_eq!(tokens_of(r"'0' '\n' 'A' '\\' '\'' '\0'"), vec![
        Token::Number(48),
        Token::Number(10),
        Token::Number(65),
        Token::Number(92),
        Token::Number(39),
        Token::Number(0),
        Token::Eof,
    ]);
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(tokens_of("int if else for while do break continue return _x1 integer"), vec![
        Token::Int,
        Token::If,
        Token::Else,
        Token::For,
        Token::While,
        Token::Do,
        Token::Break,
        Token::Continue,
        Token::Return,
        Token::Ident("_x1".into()),
        Token::Ident("integer".into()),
        Token::Eof,
    ]);
}

#[test]
fn test_comments_are_skipped() {
    let input = r#"
        int g = 42; // trailing comment
        /* block
           comment */ int h;
    "#;

    assert_eq!(tokens_of(input), vec![
        Token::Int,
        Token::Ident("g".into()),
        Token::Assign,
        Token::Number(42),
        Token::Semicolon,
        Token::Int,
        Token::Ident("h".into()),
        Token::Semicolon,
        Token::Eof,
    ]);
}

#[test]
fn test_spans() {
    let tokens = tokenize("int ab = 10;").unwrap();

    assert_eq!(tokens[0], (0, Token::Int, 3));
    assert_eq!(tokens[1], (4, Token::Ident("ab".into()), 6));
    assert_eq!(tokens[2], (7, Token::Assign, 8));
    assert_eq!(tokens[3], (9, Token::Number(10), 11));
    assert_eq!(tokens[4], (11, Token::Semicolon, 12));
    assert_eq!(tokens[5], (12, Token::Eof, 12));
}

#[test]
fn test_empty_input() {
    assert_eq!(tokenize("").unwrap(), vec![(0, Token::Eof, 0)]);
}

#[test]
fn test_iterator_is_finite() {
    let lexer = Lexer::new("a b".char_indices().map(|(i, c)| (i as u32, c)));

    assert_eq!(lexer.count(), 3);
}

#[test]
fn test_invalid_input() {
    let fails = vec![
        ("int main() { return 42$; }", LexicalErrorType::UnknownCharacter { ch: '$' }),
        ("'a", LexicalErrorType::UnterminatedLiteral),
        ("'ab'", LexicalErrorType::UnterminatedLiteral),
        ("''", LexicalErrorType::EmptyCharLiteral),
        (r"'\q'", LexicalErrorType::UnknownEscape { ch: 'q' }),
        ("99999999999", LexicalErrorType::IntegerTooLarge),
        ("/* never closed", LexicalErrorType::UnterminatedComment),
    ];

    for (input, fail) in fails {
        match tokenize(input) {
            Err(err) => assert_eq!(err.error, fail, "input: {input}"),
            Ok(tokens) => panic!("Expected {fail:?} for {input:?}, got Ok({tokens:?})")
        }
    }
}

#[test]
fn test_error_stops_iteration() {
    let mut lexer = Lexer::new("a $ b".char_indices().map(|(i, c)| (i as u32, c)));

    assert!(matches!(lexer.next(), Some(Ok((0, Token::Ident(_), 1)))));
    assert!(matches!(lexer.next(), Some(Err(LexicalError { location, .. })) if location.start == 2));
    assert!(lexer.next().is_none());
}

#[test]
fn test_max_literal() {
    assert_eq!(tokens_of("2147483647"), vec![Token::Number(i32::MAX), Token::Eof]);
}

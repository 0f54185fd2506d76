use super::error::{LexicalError, LexicalErrorType};
use super::token::{str_to_keyword, Token};
use std::fmt::Display;
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
	finished: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
			next_ch: None,
            input,
			finished: false,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    pub fn next_token(&mut self) -> LexResult {
		loop {
			match (self.ch, self.next_ch) {
				(Some('/'), Some('/')) => self.skip_line_comment(),
				(Some('/'), Some('*')) => self.skip_block_comment()?,
				(Some(ch), _) if ch.is_whitespace() => {
					self.next_char();
				},
				_ => break
			}
		}

		let span = match self.ch {
			Some(ch) => match ch {
				'(' => self.eat_one_char(Token::LParen),
				')' => self.eat_one_char(Token::RParen),
				'{' => self.eat_one_char(Token::LBrace),
				'}' => self.eat_one_char(Token::RBrace),
				';' => self.eat_one_char(Token::Semicolon),
				',' => self.eat_one_char(Token::Comma),
				'?' => self.eat_one_char(Token::Question),
				':' => self.eat_one_char(Token::Colon),
				'~' => self.eat_one_char(Token::Tilde),
				'+' => match self.next_ch {
					Some('+') => self.eat_two_chars(Token::Increment),
					Some('=') => self.eat_two_chars(Token::PlusAssign),
					_ => self.eat_one_char(Token::Plus)
				},
				'-' => match self.next_ch {
					Some('-') => self.eat_two_chars(Token::Decrement),
					Some('=') => self.eat_two_chars(Token::MinusAssign),
					_ => self.eat_one_char(Token::Minus)
				},
				'*' => self.eat_with_assign(Token::Star, Token::StarAssign),
				'/' => self.eat_with_assign(Token::Slash, Token::SlashAssign),
				'%' => self.eat_with_assign(Token::Percent, Token::PercentAssign),
				'^' => self.eat_with_assign(Token::Caret, Token::CaretAssign),
				'!' => self.eat_with_assign(Token::Bang, Token::NotEqual),
				'=' => self.eat_with_assign(Token::Assign, Token::Equal),
				'&' => match self.next_ch {
					Some('&') => self.eat_two_chars(Token::AndAnd),
					Some('=') => self.eat_two_chars(Token::AmpersandAssign),
					_ => self.eat_one_char(Token::Ampersand)
				},
				'|' => match self.next_ch {
					Some('|') => self.eat_two_chars(Token::OrOr),
					Some('=') => self.eat_two_chars(Token::PipeAssign),
					_ => self.eat_one_char(Token::Pipe)
				},
				'<' => match self.next_ch {
					Some('<') => self.eat_shift(Token::ShiftLeft, Token::ShiftLeftAssign),
					Some('=') => self.eat_two_chars(Token::LessThanOrEqual),
					_ => self.eat_one_char(Token::LessThan)
				},
				'>' => match self.next_ch {
					Some('>') => self.eat_shift(Token::ShiftRight, Token::ShiftRightAssign),
					Some('=') => self.eat_two_chars(Token::GreaterThanOrEqual),
					_ => self.eat_one_char(Token::GreaterThan)
				},
				'\'' => return self.lex_char(),
				'a'..='z' | 'A'..='Z' | '_' => {
					return Ok(self.lex_ident());
				},
				'0'..='9' => {
					return self.lex_number();
				},
				c => {
					let location = self.position;
					return Err(LexicalError {
						error: LexicalErrorType::UnknownCharacter { ch: c },
						location: SrcSpan {
							start: location,
							end: location + c.len_utf8() as u32,
						},
					});
				}
			},
			None => {
				let position = self.position;
				(position, Token::Eof, position)
			}
		};

		Ok(span)
    }

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				self.next_position += self.next_ch.map_or(0, |c| c.len_utf8() as u32);

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		ch
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn eat_two_chars(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn eat_with_assign(&mut self, plain: Token, with_assign: Token) -> Spanned {
		match self.next_ch {
			Some('=') => self.eat_two_chars(with_assign),
			_ => self.eat_one_char(plain)
		}
	}

	// `<<` / `>>` optionally followed by `=`
	fn eat_shift(&mut self, shift: Token, shift_assign: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		self.next_char();

		let token = if self.ch == Some('=') {
			self.next_char();
			shift_assign
		} else {
			shift
		};

		(start_pos, token, self.position)
	}

	fn lex_ident(&mut self) -> Spanned {
        let start_pos = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}

			ident.push(ch);
			self.next_char();
		}

        let end_pos = self.position;

		match str_to_keyword(&ident) {
			Some(keyword) => (start_pos, keyword, end_pos),
			None => (start_pos, Token::Ident(ident), end_pos)
		}
	}

	fn lex_number(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value = String::new();

		while let Some(ch) = self.ch {
			if !ch.is_ascii_digit() {
				break;
			}

			value.push(ch);
			self.next_char();
		}

		let end_pos = self.position;

		match value.parse::<i32>() {
			Ok(value) => Ok((start_pos, Token::Number(value), end_pos)),
			Err(_) => Err(LexicalError {
				error: LexicalErrorType::IntegerTooLarge,
				location: SrcSpan::from(start_pos, end_pos)
			})
		}
	}

	fn lex_char(&mut self) -> LexResult {
		let start_pos = self.position;

		self.next_char(); // opening quote

		let value = match self.ch {
			Some('\'') => {
				self.next_char();

				return Err(LexicalError {
					error: LexicalErrorType::EmptyCharLiteral,
					location: SrcSpan::from(start_pos, self.position)
				});
			},
			Some('\\') => {
				self.next_char();

				let escaped = match self.ch {
					Some('n') => '\n',
					Some('t') => '\t',
					Some('r') => '\r',
					Some('0') => '\0',
					Some('\\') => '\\',
					Some('\'') => '\'',
					Some('"') => '"',
					Some(ch) if ch != '\n' => {
						let location = SrcSpan::from(self.position - 1, self.position + ch.len_utf8() as u32);

						return Err(LexicalError {
							error: LexicalErrorType::UnknownEscape { ch },
							location
						});
					},
					_ => return Err(LexicalError {
						error: LexicalErrorType::UnterminatedLiteral,
						location: SrcSpan::from(start_pos, self.position)
					})
				};

				self.next_char();
				escaped
			},
			Some(ch) if ch != '\n' => {
				self.next_char();
				ch
			},
			_ => return Err(LexicalError {
				error: LexicalErrorType::UnterminatedLiteral,
				location: SrcSpan::from(start_pos, self.position)
			})
		};

		if self.ch != Some('\'') {
			return Err(LexicalError {
				error: LexicalErrorType::UnterminatedLiteral,
				location: SrcSpan::from(start_pos, self.position)
			});
		}

		self.next_char(); // closing quote

		Ok((start_pos, Token::Number(value as i32), self.position))
	}

	fn skip_line_comment(&mut self) {
		while let Some(ch) = self.ch {
			if ch == '\n' {
				break;
			}

			self.next_char();
		}
	}

	fn skip_block_comment(&mut self) -> Result<(), LexicalError> {
		let start_pos = self.position;

		self.next_char(); // `/`
		self.next_char(); // `*`

		loop {
			match (self.ch, self.next_ch) {
				(Some('*'), Some('/')) => {
					self.next_char();
					self.next_char();

					return Ok(());
				},
				(Some(_), _) => {
					self.next_char();
				},
				(None, _) => return Err(LexicalError {
					error: LexicalErrorType::UnterminatedComment,
					location: SrcSpan::from(start_pos, self.position)
				})
			}
		}
	}
}

/// Yields tokens up to and including `Eof`, or up to the first error.
impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(token, Ok((_, Token::Eof, _)) | Err(_)) {
			self.finished = true;
		}

		Some(token)
	}
}

pub fn tokenize(src: &str) -> Result<Vec<Spanned>, LexicalError> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c))).collect()
}

use std::io::Write;

use intc_core::lexer::prelude::{Lexer, Token};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		if let Some('\n') = input.chars().next_back() {
			input.pop();
		}
		if let Some('\r') = input.chars().next_back() {
			input.pop();
		}

		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

				for res in lexer {
					match res {
						Ok((start, Token::Eof, _)) => println!("{start:>4} Eof"),
						Ok((start, token, end)) => println!("{start:>4}..{end:<4} {token:?}"),
						Err(err) => {
							let (message, extra) = err.details();
							println!("[at {}] Lexical error: {}", err.location.start, message);
							if !extra.is_empty() {
								println!("{}", extra.join("\n"));
							}
						}
					}
				}
			}
		}
	}
}

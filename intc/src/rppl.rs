use std::{io::Write, path::PathBuf};

use intc_core::{parser::prelude::parse_module, utils::prelude::Error};

use crate::cli::print_error;

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
			_ => match parse_module(&input) {
				Ok(module) => println!("{}", module.program),
				Err(error) => print_error(&Error::Parse {
					path: PathBuf::from("<stdin>"),
					src: input.clone(),
					error
				})
			}
		}
	}
}

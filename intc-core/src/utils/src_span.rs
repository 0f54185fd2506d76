use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
}

/// 1-based line and column of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
	pub line: u32,
	pub column: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	pub fn merge(self, other: SrcSpan) -> Self {
		Self {
			start: self.start.min(other.start),
			end: self.end.max(other.end)
		}
	}

	pub fn line_col(&self, src: &str) -> LineCol {
		let offset = (self.start as usize).min(src.len());
		let mut line = 1;
		let mut column = 1;

		for (idx, ch) in src.char_indices() {
			if idx >= offset {
				break;
			}

			if ch == '\n' {
				line += 1;
				column = 1;
			} else {
				column += 1;
			}
		}

		LineCol { line, column }
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}

impl Display for LineCol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

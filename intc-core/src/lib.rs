pub mod lexer;
pub mod parser;
pub mod environment;
pub mod host;
pub mod analyzer;
pub mod eval;
pub mod utils;

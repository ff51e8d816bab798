pub mod lexer;
pub mod token;
pub mod token_dumper;

pub use lexer::{CompressedInstruction, RunPolicy, Span, compress, compress_with};
pub use token::Command;

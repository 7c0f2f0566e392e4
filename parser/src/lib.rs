//! # Shadegen - Method DSL Parser
//!
//! The parser converts method source text written in the shading DSL into an
//! abstract syntax tree. The DSL is a restricted C-like language with the
//! host surface forms the rewriter knows how to translate: `new Type(...)`
//! construction, intrinsic classes such as `Vector.Dot(a, b)`, and float
//! literals with a single precision suffix.

mod lexer;
mod parser;
mod tokens;

pub use lexer::lex;
pub use parser::parse_function;
pub use tokens::Token;

use thiserror::Error;

/// Failure cases when lexing or parsing method source
#[derive(PartialEq, Debug, Error)]
pub enum ParseError {
    #[error("unexpected character at byte offset {0}")]
    UnexpectedCharacter(usize),

    #[error("unexpected end of source")]
    UnexpectedEndOfSource,

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
}

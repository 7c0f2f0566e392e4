//! # Shadegen - Abstract Syntax Tree
//!
//! The AST library contains the definitions for the abstract syntax tree of
//! the shading DSL method bodies are authored in. The root of a method's
//! tree is a [FunctionDefinition] instance.

mod ast_expressions;
mod ast_functions;
mod ast_statements;

pub use ast_expressions::*;
pub use ast_functions::*;
pub use ast_statements::*;

//! # Shadegen
//!
//! This is a meta crate that re-exports all the sub libraries

pub use shadegen_ast as ast;
pub use shadegen_graph as graph;
pub use shadegen_hlsl as hlsl;
pub use shadegen_parser as parser;

pub use shadegen_derive::ShaderNode;
pub use shadegen_graph::*;
pub use shadegen_hlsl::{
    generate, GenerateError, MethodBodyError, MethodBodyProvider, MethodSyntaxCache,
    ShaderCompilationContext, ShaderGenerationResult,
};

mod compile;
mod provider;

pub use compile::*;
pub use provider::DslMethodBodyProvider;

//! # Shadegen - HLSL generation
//!
//! Turns a shader object graph into HLSL source text. The graph is walked
//! once to find every reachable type and method, method bodies are rewritten
//! from the host surface into HLSL syntax, and the result is printed with
//! deterministic register bindings and an entry point table.

mod collect;
mod emit;
mod extract;
mod names;
mod reflect;
mod rewrite;

pub use extract::{MethodBodyError, MethodBodyProvider, MethodSyntaxCache};

use shadegen_graph::{DescriptorRegistry, ShaderNode, ShaderStage};
use thiserror::Error;

/// Error cases a generation pass can end with
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A member's type could not be mapped to anything the target language
    /// can declare
    #[error("member '{member}' of '{shader_type}' has unsupported type '{member_type}'")]
    UnsupportedResourceKind {
        shader_type: String,
        member: String,
        member_type: String,
    },

    /// A method body could not be produced
    #[error("method '{method}' of '{shader_type}' failed to resolve: {reason}")]
    MethodResolution {
        shader_type: String,
        method: String,
        reason: String,
    },

    /// The generated source has no entry point for a requested stage
    #[error("no {0} entry point was generated")]
    MissingEntryPoint(ShaderStage),
}

/// Shared state for generating shaders
///
/// Holds the type registry, the method body provider, and the body cache.
/// One context can serve any number of generation passes, concurrently.
pub struct ShaderCompilationContext {
    registry: DescriptorRegistry,
    provider: Box<dyn MethodBodyProvider>,
    cache: MethodSyntaxCache,
}

impl ShaderCompilationContext {
    pub fn new(
        registry: DescriptorRegistry,
        provider: Box<dyn MethodBodyProvider>,
    ) -> ShaderCompilationContext {
        ShaderCompilationContext {
            registry,
            provider,
            cache: MethodSyntaxCache::new(),
        }
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &dyn MethodBodyProvider {
        self.provider.as_ref()
    }

    pub fn cache(&self) -> &MethodSyntaxCache {
        &self.cache
    }
}

/// Generated source together with the entry points it contains
pub struct ShaderGenerationResult {
    source: String,
    entry_points: Vec<(ShaderStage, String)>,
}

impl ShaderGenerationResult {
    /// The full generated HLSL source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every stage annotated function, in emission order
    pub fn entry_points(&self) -> &[(ShaderStage, String)] {
        &self.entry_points
    }

    /// Find the entry point function name for a stage
    pub fn entry_point(&self, stage: ShaderStage) -> Result<&str, GenerateError> {
        self.entry_points
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, name)| name.as_str())
            .ok_or(GenerateError::MissingEntryPoint(stage))
    }
}

/// Generate HLSL source for a shader object graph
pub fn generate(
    root: &dyn ShaderNode,
    context: &ShaderCompilationContext,
) -> Result<ShaderGenerationResult, GenerateError> {
    log::debug!("generating shader source for '{}'", root.descriptor().name);

    let collection = collect::collect(root, context)?;
    let output = emit::emit(&collection);

    log::debug!(
        "generated {} bytes with {} entry points",
        output.source.len(),
        output.entry_points.len()
    );

    Ok(ShaderGenerationResult {
        source: output.source,
        entry_points: output.entry_points,
    })
}

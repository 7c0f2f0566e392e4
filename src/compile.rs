use crate::*;
use thiserror::Error;

/// Invoke the generator to build a shader graph into a compiled shader
///
/// On top of [generate] this checks that an entry point exists for every
/// requested pipeline stage and returns them in the requested order.
pub fn compile(args: CompileArgs) -> Result<CompiledShader, CompileError> {
    log::debug!(
        "compiling '{}' for {} pipeline stages",
        args.root.descriptor().name,
        args.stages.len()
    );

    let result = generate(args.root, args.context)?;

    let mut stages = Vec::new();
    for stage in args.stages {
        let entry_point = result.entry_point(*stage)?.to_string();
        stages.push(CompiledShaderStage {
            stage: *stage,
            entry_point,
        });
    }

    log::debug!("resolved entry points for all {} stages", stages.len());

    Ok(CompiledShader {
        source: result.source().to_string(),
        stages,
    })
}

/// Output of a compiled shader graph
pub struct CompiledShader {
    /// Generated HLSL source for the whole graph
    pub source: String,

    /// Entry point data for each requested stage
    pub stages: Vec<CompiledShaderStage>,
}

/// Output for a single stage in a compiled shader
pub struct CompiledShaderStage {
    /// Shader type
    pub stage: ShaderStage,

    /// Name of the entry point
    pub entry_point: String,
}

/// Error for [compile()]
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Arguments for [compile()]
pub struct CompileArgs<'a> {
    root: &'a dyn shadegen_graph::ShaderNode,
    context: &'a ShaderCompilationContext,
    stages: &'a [ShaderStage],
}

impl<'a> CompileArgs<'a> {
    /// Create new args with required arguments
    pub fn new(
        root: &'a dyn shadegen_graph::ShaderNode,
        context: &'a ShaderCompilationContext,
    ) -> Self {
        CompileArgs {
            root,
            context,
            stages: &[],
        }
    }

    /// Set the pipeline stages the shader must provide entry points for
    pub fn stages(mut self, stages: &'a [ShaderStage]) -> Self {
        self.stages = stages;
        self
    }
}

use shadegen_graph::{MethodDescriptor, ShaderNode};
use shadegen_hlsl::{
    generate, MethodBodyError, MethodBodyProvider, ShaderCompilationContext,
    ShaderGenerationResult,
};

/// Provider that parses the DSL source attached to each method
pub struct DslProvider;

impl MethodBodyProvider for DslProvider {
    fn method_body(
        &self,
        _type_name: &str,
        method: &MethodDescriptor,
    ) -> Result<shadegen_ast::FunctionDefinition, MethodBodyError> {
        shadegen_parser::parse_function(method.source).map_err(|err| MethodBodyError(err.to_string()))
    }
}

#[track_caller]
#[allow(unused)]
pub fn check_generated(
    root: &dyn ShaderNode,
    context: &ShaderCompilationContext,
    expected: &str,
) -> ShaderGenerationResult {
    let result = match generate(root, context) {
        Ok(ok) => ok,
        Err(err) => panic!("{}", err),
    };

    let output_lines = result.source().lines();
    let expected_lines = expected.lines();
    for (output_line, expected_line) in output_lines.zip(expected_lines) {
        pretty_assertions::assert_eq!(output_line, expected_line);
    }
    pretty_assertions::assert_eq!(result.source(), expected);

    result
}

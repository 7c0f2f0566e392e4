use shadegen_ast::FunctionDefinition;
use shadegen_graph::MethodDescriptor;
use shadegen_hlsl::{MethodBodyError, MethodBodyProvider};

/// Method body provider that parses the DSL source on each descriptor
///
/// This is the provider to use when method bodies are authored as source
/// text. Generation passes cache parsed bodies, so each method is parsed at
/// most once per compilation context.
#[derive(Default)]
pub struct DslMethodBodyProvider;

impl MethodBodyProvider for DslMethodBodyProvider {
    fn method_body(
        &self,
        type_name: &str,
        method: &MethodDescriptor,
    ) -> Result<FunctionDefinition, MethodBodyError> {
        shadegen_parser::parse_function(method.source).map_err(|err| {
            MethodBodyError(format!(
                "failed to parse body of '{}.{}': {}",
                type_name, method.name, err
            ))
        })
    }
}

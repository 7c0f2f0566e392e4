use crate::ast_statements::Statement;

/// A full method definition parsed from DSL source
#[derive(PartialEq, Debug, Clone)]
pub struct FunctionDefinition {
    pub name: String,
    pub return_type: String,
    pub params: Vec<FunctionParam>,
    pub body: Vec<Statement>,
}

/// A parameter in a method signature
#[derive(PartialEq, Debug, Clone)]
pub struct FunctionParam {
    pub name: String,
    pub type_name: String,
}

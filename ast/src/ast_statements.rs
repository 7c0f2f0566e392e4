use crate::ast_expressions::Expression;

#[derive(PartialEq, Debug, Clone)]
pub enum Statement {
    Empty,
    Expression(Expression),
    Var(VarDef),
    Block(Vec<Statement>),
    If(Expression, Box<Statement>),
    IfElse(Expression, Box<Statement>, Box<Statement>),
    For(InitStatement, Expression, Expression, Box<Statement>),
    While(Expression, Box<Statement>),
    Break,
    Continue,
    Return(Option<Expression>),
}

#[derive(PartialEq, Debug, Clone)]
pub enum InitStatement {
    Empty,
    Expression(Expression),
    Declaration(VarDef),
}

/// A local variable declaration with an optional initializer
#[derive(PartialEq, Debug, Clone)]
pub struct VarDef {
    pub type_name: String,
    pub name: String,
    pub init: Option<Expression>,
}

impl VarDef {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> VarDef {
        VarDef {
            type_name: type_name.into(),
            name: name.into(),
            init: None,
        }
    }

    pub fn with_init(
        type_name: impl Into<String>,
        name: impl Into<String>,
        init: Expression,
    ) -> VarDef {
        VarDef {
            type_name: type_name.into(),
            name: name.into(),
            init: Some(init),
        }
    }
}

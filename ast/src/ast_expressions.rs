#[derive(PartialEq, Debug, Clone)]
pub enum Expression {
    Literal(Literal),
    Variable(String),
    UnaryOperation(UnaryOp, Box<Expression>),
    BinaryOperation(BinOp, Box<Expression>, Box<Expression>),
    TernaryConditional(Box<Expression>, Box<Expression>, Box<Expression>),
    ArraySubscript(Box<Expression>, Box<Expression>),
    Member(Box<Expression>, String),
    Call(
        /// Function to invoke
        Box<Expression>,
        /// Arguments
        Vec<Expression>,
    ),
    /// Host object construction: `new Type(args)`
    Constructor(String, Vec<Expression>),
    /// Cast to a named type - only produced by the rewriter, the DSL has no
    /// cast syntax
    Cast(String, Box<Expression>),
    /// Namespaced static access `Type::Member` - only produced by the
    /// rewriter
    ScopedMember(String, String),
}

#[derive(PartialEq, Debug, Clone)]
pub enum Literal {
    Bool(bool),
    Int(u64),
    UInt(u64),
    Float(f32),
    Double(f64),
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum UnaryOp {
    PrefixIncrement,
    PrefixDecrement,
    Plus,
    Minus,
    LogicalNot,
    BitwiseNot,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    LeftShift,
    RightShift,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BooleanAnd,
    BooleanOr,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Equality,
    Inequality,
    Assignment,
    SumAssignment,
    DifferenceAssignment,
    ProductAssignment,
    QuotientAssignment,
}

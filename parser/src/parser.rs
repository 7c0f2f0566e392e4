use crate::lexer::lex;
use crate::tokens::Token;
use crate::ParseError;
use shadegen_ast::*;

/// Internal parse result type: remaining tokens plus the parsed node
type ParseResult<'t, T> = Result<(&'t [Token], T), ParseError>;

/// Parse a full method definition from DSL source text
pub fn parse_function(source: &str) -> Result<FunctionDefinition, ParseError> {
    let tokens = lex(source)?;
    let (rest, def) = parse_function_internal(&tokens)?;
    if !rest.is_empty() {
        return Err(unexpected(rest));
    }
    Ok(def)
}

/// Make an error naming the token that was not expected
fn unexpected(input: &[Token]) -> ParseError {
    match input.first() {
        Some(token) => ParseError::UnexpectedToken(format!("{:?}", token)),
        None => ParseError::UnexpectedEndOfSource,
    }
}

/// Parse an exact token from the start of the stream
fn parse_token(input: &[Token], token: Token) -> ParseResult<()> {
    match input.first() {
        Some(t) if *t == token => Ok((&input[1..], ())),
        _ => Err(unexpected(input)),
    }
}

/// Match a single identifier token
fn match_identifier(input: &[Token]) -> ParseResult<String> {
    match input.first() {
        Some(Token::Id(name)) => Ok((&input[1..], name.clone())),
        _ => Err(unexpected(input)),
    }
}

/// Parse the signature and body of a method
fn parse_function_internal(input: &[Token]) -> ParseResult<FunctionDefinition> {
    let (input, return_type) = match_identifier(input)?;
    let (input, name) = match_identifier(input)?;
    let (input, _) = parse_token(input, Token::LeftParen)?;

    let mut params = Vec::new();
    let mut input = input;
    if parse_token(input, Token::RightParen).is_err() {
        loop {
            let (rest, type_name) = match_identifier(input)?;
            let (rest, param_name) = match_identifier(rest)?;
            params.push(FunctionParam {
                name: param_name,
                type_name,
            });
            match parse_token(rest, Token::Comma) {
                Ok((rest, ())) => input = rest,
                Err(_) => {
                    input = rest;
                    break;
                }
            }
        }
    }
    let (input, _) = parse_token(input, Token::RightParen)?;

    let (input, body) = parse_block(input)?;

    Ok((
        input,
        FunctionDefinition {
            name,
            return_type,
            params,
            body,
        },
    ))
}

/// Parse a braced statement block
fn parse_block(input: &[Token]) -> ParseResult<Vec<Statement>> {
    let (mut input, _) = parse_token(input, Token::LeftBrace)?;
    let mut statements = Vec::new();
    while parse_token(input, Token::RightBrace).is_err() {
        let (rest, statement) = parse_statement(input)?;
        statements.push(statement);
        input = rest;
    }
    let (input, _) = parse_token(input, Token::RightBrace)?;
    Ok((input, statements))
}

/// Parse a single statement
fn parse_statement(input: &[Token]) -> ParseResult<Statement> {
    match input.first() {
        None => Err(ParseError::UnexpectedEndOfSource),
        Some(Token::Semicolon) => Ok((&input[1..], Statement::Empty)),
        Some(Token::LeftBrace) => {
            let (input, block) = parse_block(input)?;
            Ok((input, Statement::Block(block)))
        }
        Some(Token::If) => {
            let (input, _) = parse_token(&input[1..], Token::LeftParen)?;
            let (input, cond) = parse_expression(input)?;
            let (input, _) = parse_token(input, Token::RightParen)?;
            let (input, then_branch) = parse_statement(input)?;
            match parse_token(input, Token::Else) {
                Ok((input, ())) => {
                    let (input, else_branch) = parse_statement(input)?;
                    Ok((
                        input,
                        Statement::IfElse(cond, Box::new(then_branch), Box::new(else_branch)),
                    ))
                }
                Err(_) => Ok((input, Statement::If(cond, Box::new(then_branch)))),
            }
        }
        Some(Token::While) => {
            let (input, _) = parse_token(&input[1..], Token::LeftParen)?;
            let (input, cond) = parse_expression(input)?;
            let (input, _) = parse_token(input, Token::RightParen)?;
            let (input, body) = parse_statement(input)?;
            Ok((input, Statement::While(cond, Box::new(body))))
        }
        Some(Token::For) => {
            let (input, _) = parse_token(&input[1..], Token::LeftParen)?;
            let (input, init) = parse_init_statement(input)?;
            let (input, _) = parse_token(input, Token::Semicolon)?;
            let (input, cond) = parse_expression(input)?;
            let (input, _) = parse_token(input, Token::Semicolon)?;
            let (input, inc) = parse_expression(input)?;
            let (input, _) = parse_token(input, Token::RightParen)?;
            let (input, body) = parse_statement(input)?;
            Ok((input, Statement::For(init, cond, inc, Box::new(body))))
        }
        Some(Token::Return) => {
            let input = &input[1..];
            match parse_token(input, Token::Semicolon) {
                Ok((input, ())) => Ok((input, Statement::Return(None))),
                Err(_) => {
                    let (input, value) = parse_expression(input)?;
                    let (input, _) = parse_token(input, Token::Semicolon)?;
                    Ok((input, Statement::Return(Some(value))))
                }
            }
        }
        Some(Token::Break) => {
            let (input, _) = parse_token(&input[1..], Token::Semicolon)?;
            Ok((input, Statement::Break))
        }
        Some(Token::Continue) => {
            let (input, _) = parse_token(&input[1..], Token::Semicolon)?;
            Ok((input, Statement::Continue))
        }
        _ => {
            // A local declaration is two identifiers in a row - anything else
            // starting from here is an expression statement
            if let Ok((rest, def)) = parse_var_def(input) {
                let (rest, _) = parse_token(rest, Token::Semicolon)?;
                return Ok((rest, Statement::Var(def)));
            }
            let (input, expr) = parse_expression(input)?;
            let (input, _) = parse_token(input, Token::Semicolon)?;
            Ok((input, Statement::Expression(expr)))
        }
    }
}

/// Parse the init clause of a for statement
fn parse_init_statement(input: &[Token]) -> ParseResult<InitStatement> {
    if parse_token(input, Token::Semicolon).is_ok() {
        return Ok((input, InitStatement::Empty));
    }
    if let Ok((rest, def)) = parse_var_def(input) {
        return Ok((rest, InitStatement::Declaration(def)));
    }
    let (input, expr) = parse_expression(input)?;
    Ok((input, InitStatement::Expression(expr)))
}

/// Parse a local variable declaration without the trailing semicolon
fn parse_var_def(input: &[Token]) -> ParseResult<VarDef> {
    let (input, type_name) = match_identifier(input)?;
    let (input, name) = match_identifier(input)?;
    match parse_token(input, Token::Equals) {
        Ok((input, ())) => {
            let (input, init) = parse_assignment_expression(input)?;
            Ok((input, VarDef::with_init(type_name, name, init)))
        }
        Err(_) => Ok((input, VarDef::new(type_name, name))),
    }
}

/// Parse any expression
fn parse_expression(input: &[Token]) -> ParseResult<Expression> {
    parse_assignment_expression(input)
}

/// Parse an assignment or anything with higher precedence
fn parse_assignment_expression(input: &[Token]) -> ParseResult<Expression> {
    let (rest, left) = parse_ternary_expression(input)?;

    let op = match rest.first() {
        Some(Token::Equals) => BinOp::Assignment,
        Some(Token::PlusEquals) => BinOp::SumAssignment,
        Some(Token::MinusEquals) => BinOp::DifferenceAssignment,
        Some(Token::AsterixEquals) => BinOp::ProductAssignment,
        Some(Token::ForwardSlashEquals) => BinOp::QuotientAssignment,
        _ => return Ok((rest, left)),
    };

    // Right associative
    let (rest, right) = parse_assignment_expression(&rest[1..])?;
    Ok((
        rest,
        Expression::BinaryOperation(op, Box::new(left), Box::new(right)),
    ))
}

/// Parse a ternary conditional or anything with higher precedence
fn parse_ternary_expression(input: &[Token]) -> ParseResult<Expression> {
    let (input, cond) = parse_binary_expression(input, 0)?;
    match parse_token(input, Token::QuestionMark) {
        Ok((input, ())) => {
            let (input, left) = parse_expression(input)?;
            let (input, _) = parse_token(input, Token::Colon)?;
            let (input, right) = parse_assignment_expression(input)?;
            Ok((
                input,
                Expression::TernaryConditional(Box::new(cond), Box::new(left), Box::new(right)),
            ))
        }
        Err(_) => Ok((input, cond)),
    }
}

/// Binary operator table ordered by precedence level, lowest binding first
const BINARY_LEVELS: &[&[(Token, BinOp)]] = &[
    &[(Token::VerticalBarVerticalBar, BinOp::BooleanOr)],
    &[(Token::AmpersandAmpersand, BinOp::BooleanAnd)],
    &[(Token::VerticalBar, BinOp::BitwiseOr)],
    &[(Token::Hat, BinOp::BitwiseXor)],
    &[(Token::Ampersand, BinOp::BitwiseAnd)],
    &[
        (Token::EqualsEquals, BinOp::Equality),
        (Token::ExclamationPointEquals, BinOp::Inequality),
    ],
    &[
        (Token::LeftAngleBracket, BinOp::LessThan),
        (Token::LeftAngleBracketEquals, BinOp::LessEqual),
        (Token::RightAngleBracket, BinOp::GreaterThan),
        (Token::RightAngleBracketEquals, BinOp::GreaterEqual),
    ],
    &[
        (Token::LeftShift, BinOp::LeftShift),
        (Token::RightShift, BinOp::RightShift),
    ],
    &[(Token::Plus, BinOp::Add), (Token::Minus, BinOp::Subtract)],
    &[
        (Token::Asterix, BinOp::Multiply),
        (Token::ForwardSlash, BinOp::Divide),
        (Token::Percent, BinOp::Modulus),
    ],
];

/// Parse left associative binary operators by precedence climbing
fn parse_binary_expression(input: &[Token], level: usize) -> ParseResult<Expression> {
    if level >= BINARY_LEVELS.len() {
        return parse_unary_expression(input);
    }

    let (mut input, mut left) = parse_binary_expression(input, level + 1)?;
    'outer: loop {
        for (token, op) in BINARY_LEVELS[level] {
            if input.first() == Some(token) {
                let (rest, right) = parse_binary_expression(&input[1..], level + 1)?;
                left = Expression::BinaryOperation(*op, Box::new(left), Box::new(right));
                input = rest;
                continue 'outer;
            }
        }
        break;
    }
    Ok((input, left))
}

/// Parse a prefix unary operator or anything with higher precedence
fn parse_unary_expression(input: &[Token]) -> ParseResult<Expression> {
    let op = match input.first() {
        Some(Token::Plus) => Some(UnaryOp::Plus),
        Some(Token::Minus) => Some(UnaryOp::Minus),
        Some(Token::ExclamationPoint) => Some(UnaryOp::LogicalNot),
        Some(Token::Tilde) => Some(UnaryOp::BitwiseNot),
        Some(Token::PlusPlus) => Some(UnaryOp::PrefixIncrement),
        Some(Token::MinusMinus) => Some(UnaryOp::PrefixDecrement),
        _ => None,
    };

    match op {
        Some(op) => {
            let (input, inner) = parse_unary_expression(&input[1..])?;
            Ok((input, Expression::UnaryOperation(op, Box::new(inner))))
        }
        None => parse_postfix_expression(input),
    }
}

/// Parse member access, calls and subscripts after a primary expression
fn parse_postfix_expression(input: &[Token]) -> ParseResult<Expression> {
    let (mut input, mut expr) = parse_primary_expression(input)?;

    loop {
        match input.first() {
            Some(Token::Period) => {
                let (rest, member) = match_identifier(&input[1..])?;
                expr = Expression::Member(Box::new(expr), member);
                input = rest;
            }
            Some(Token::LeftParen) => {
                let (rest, args) = parse_call_arguments(&input[1..])?;
                expr = Expression::Call(Box::new(expr), args);
                input = rest;
            }
            Some(Token::LeftSquareBracket) => {
                let (rest, index) = parse_expression(&input[1..])?;
                let (rest, _) = parse_token(rest, Token::RightSquareBracket)?;
                expr = Expression::ArraySubscript(Box::new(expr), Box::new(index));
                input = rest;
            }
            _ => break,
        }
    }

    Ok((input, expr))
}

/// Parse comma separated call arguments up to and including the close paren
fn parse_call_arguments(input: &[Token]) -> ParseResult<Vec<Expression>> {
    let mut args = Vec::new();
    let mut input = input;
    if parse_token(input, Token::RightParen).is_err() {
        loop {
            let (rest, arg) = parse_assignment_expression(input)?;
            args.push(arg);
            match parse_token(rest, Token::Comma) {
                Ok((rest, ())) => input = rest,
                Err(_) => {
                    input = rest;
                    break;
                }
            }
        }
    }
    let (input, _) = parse_token(input, Token::RightParen)?;
    Ok((input, args))
}

/// Parse a literal, variable, parenthesized expression or construction
fn parse_primary_expression(input: &[Token]) -> ParseResult<Expression> {
    match input.first() {
        Some(Token::LiteralInt(v)) => Ok((&input[1..], Expression::Literal(Literal::Int(*v)))),
        Some(Token::LiteralUInt(v)) => Ok((&input[1..], Expression::Literal(Literal::UInt(*v)))),
        Some(Token::LiteralFloat(v)) => Ok((&input[1..], Expression::Literal(Literal::Float(*v)))),
        Some(Token::LiteralDouble(v)) => {
            Ok((&input[1..], Expression::Literal(Literal::Double(*v))))
        }
        Some(Token::True) => Ok((&input[1..], Expression::Literal(Literal::Bool(true)))),
        Some(Token::False) => Ok((&input[1..], Expression::Literal(Literal::Bool(false)))),
        Some(Token::Id(name)) => Ok((&input[1..], Expression::Variable(name.clone()))),
        Some(Token::New) => {
            let (input, type_name) = match_identifier(&input[1..])?;
            let (input, _) = parse_token(input, Token::LeftParen)?;
            let (input, args) = parse_call_arguments(input)?;
            Ok((input, Expression::Constructor(type_name, args)))
        }
        Some(Token::LeftParen) => {
            let (input, expr) = parse_expression(&input[1..])?;
            let (input, _) = parse_token(input, Token::RightParen)?;
            Ok((input, expr))
        }
        _ => Err(unexpected(input)),
    }
}

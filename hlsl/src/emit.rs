//! Text emission of the collected shader
//!
//! Walks a [ShaderCollection] in its deterministic order and prints HLSL.
//! Register slots are handed out by [BindingTracker] in emission order, so
//! two generations of the same graph always agree on every binding.

use crate::collect::{CollectedType, ShaderCollection};
use crate::names;
use crate::rewrite::{self, RewriteContext};
use shadegen_ast::*;
use shadegen_graph::{ResourceKind, ShaderStage, TypeKind};
use std::fmt::Write;

/// Emitted source together with the entry points found along the way
pub struct EmitOutput {
    pub source: String,
    pub entry_points: Vec<(ShaderStage, String)>,
}

/// Register slot allocator
///
/// Constant buffers, textures and samplers count up independently from
/// zero. All texture kinds draw from the shared t space.
#[derive(Default)]
pub struct BindingTracker {
    constant_buffers: u32,
    textures: u32,
    samplers: u32,
}

impl BindingTracker {
    /// Claim the next slot in the register space of a resource kind
    pub fn allocate(&mut self, kind: ResourceKind) -> u32 {
        let counter = match kind {
            ResourceKind::ConstantBuffer => &mut self.constant_buffers,
            ResourceKind::Sampler => &mut self.samplers,
            ResourceKind::Texture2D | ResourceKind::TextureArray | ResourceKind::TextureCube => {
                &mut self.textures
            }
            _ => panic!("resource kind {:?} does not bind to a register", kind),
        };
        let slot = *counter;
        *counter += 1;
        slot
    }
}

/// Emit a collected shader as HLSL source
pub fn emit(collection: &ShaderCollection) -> EmitOutput {
    let rewrite_context = build_rewrite_context(collection);

    let mut output = String::new();
    let mut context = EmitContext {
        indent: 0,
        bindings: BindingTracker::default(),
    };
    let mut entry_points = Vec::new();
    let mut last_was_variable = false;

    for ty in &collection.types {
        begin_item(false, &mut last_was_variable, &mut output, &context);
        match &ty.descriptor.kind {
            TypeKind::Enum(values) => {
                emit_enum(ty.descriptor.name, values, &mut output, &mut context)
            }
            TypeKind::Struct => emit_struct(ty, &rewrite_context, &mut output, &mut context),
        }
    }

    for member in &collection.root.members {
        emit_root_member(
            collection,
            member,
            &mut last_was_variable,
            &mut output,
            &mut context,
        );
    }

    for chain in &collection.root.methods {
        begin_item(false, &mut last_was_variable, &mut output, &context);
        let def = rewrite::rewrite_chain(&chain.bodies, &rewrite_context, &[]);
        if let Some(stage) = chain.stage {
            entry_points.push((stage, def.name.clone()));
        }
        emit_function(&def, &mut output, &mut context);
    }

    output.push('\n');
    EmitOutput {
        source: output,
        entry_points,
    }
}

/// Build the name environment every method body is rewritten against
fn build_rewrite_context(collection: &ShaderCollection) -> RewriteContext {
    let types = collection
        .types
        .iter()
        .map(|t| t.descriptor.name.to_string())
        .collect();

    let globals = collection
        .root
        .members
        .iter()
        .filter(|m| {
            matches!(
                m.kind,
                Some(ResourceKind::ConstantBuffer)
                    | Some(ResourceKind::Sampler)
                    | Some(ResourceKind::Texture2D)
                    | Some(ResourceKind::TextureArray)
                    | Some(ResourceKind::TextureCube)
                    | Some(ResourceKind::StaticResource)
            )
        })
        .map(|m| m.member.name.to_string())
        .collect();

    RewriteContext::new(types, globals)
}

/// Start a root item, inserting the blank line between groups
///
/// Sequential single line declarations group together; everything else gets
/// a blank line before it.
fn begin_item(
    is_variable: bool,
    last_was_variable: &mut bool,
    output: &mut String,
    context: &EmitContext,
) {
    context.new_line(output);
    if !(is_variable && *last_was_variable) {
        context.new_line(output);
    }
    *last_was_variable = is_variable;
}

fn emit_enum(name: &str, values: &[&'static str], output: &mut String, context: &mut EmitContext) {
    output.push_str("enum ");
    output.push_str(name);

    context.new_line(output);
    output.push('{');
    context.push_indent();

    for (index, value) in values.iter().enumerate() {
        context.new_line(output);
        write!(output, "{} = {},", value, index).unwrap();
    }

    context.pop_indent();
    context.new_line(output);
    output.push_str("};");
}

fn emit_struct(
    ty: &CollectedType,
    rewrite_context: &RewriteContext,
    output: &mut String,
    context: &mut EmitContext,
) {
    output.push_str("struct ");
    output.push_str(ty.descriptor.name);

    context.new_line(output);
    output.push('{');
    context.push_indent();

    // Semantic indices restart for every structure
    let mut semantic_counts: Vec<(&'static str, u32)> = Vec::new();

    for member in &ty.members {
        context.new_line(output);
        output.push_str(&field_type_text(&member.type_name));
        output.push(' ');
        output.push_str(member.member.name);
        if let Some(ResourceKind::Semantic(semantic)) = member.kind {
            let name = names::semantic_name(semantic);
            output.push_str(" : ");
            output.push_str(name);
            if names::semantic_has_index(semantic) {
                let index = match semantic_counts.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, count)) => {
                        *count += 1;
                        *count - 1
                    }
                    None => {
                        semantic_counts.push((name, 1));
                        0
                    }
                };
                write!(output, "{}", index).unwrap();
            }
        }
        output.push(';');
    }

    let visible: Vec<String> = ty
        .members
        .iter()
        .map(|m| m.member.name.to_string())
        .collect();

    for chain in &ty.methods {
        context.new_line(output);
        context.new_line(output);
        let def = rewrite::rewrite_chain(&chain.bodies, rewrite_context, &visible);
        emit_function(&def, output, context);
    }

    context.pop_indent();
    context.new_line(output);
    output.push_str("};");
}

/// Emit the global declarations a root member contributes
fn emit_root_member(
    collection: &ShaderCollection,
    member: &crate::reflect::ClassifiedMember,
    last_was_variable: &mut bool,
    output: &mut String,
    context: &mut EmitContext,
) {
    match member.kind {
        // Plain data and stage input fields do not reach global scope
        None | Some(ResourceKind::Semantic(_)) => {}
        Some(ResourceKind::ConstantBuffer) => {
            begin_item(false, last_was_variable, output, context);
            let slot = context.bindings.allocate(ResourceKind::ConstantBuffer);
            write!(
                output,
                "cbuffer {}Buffer : register({}{})",
                member.member.name,
                names::register_prefix(ResourceKind::ConstantBuffer),
                slot
            )
            .unwrap();

            context.new_line(output);
            output.push('{');
            context.push_indent();

            context.new_line(output);
            write!(
                output,
                "{} {};",
                field_type_text(&member.type_name),
                member.member.name
            )
            .unwrap();

            context.pop_indent();
            context.new_line(output);
            output.push('}');
        }
        Some(
            kind @ (ResourceKind::Sampler
            | ResourceKind::Texture2D
            | ResourceKind::TextureArray
            | ResourceKind::TextureCube),
        ) => {
            begin_item(true, last_was_variable, output, context);
            emit_resource_declaration(member.member.name, kind, output, context);
        }
        Some(ResourceKind::StaticResource) => {
            let target = match collection.find_type(&member.type_name) {
                Some(target) => target,
                None => {
                    log::warn!(
                        "static resource '{}' of type '{}' was not collected",
                        member.member.name,
                        member.type_name
                    );
                    return;
                }
            };
            emit_static_composite(
                collection,
                target,
                &member.type_name,
                member.member.name,
                last_was_variable,
                output,
                context,
            );
        }
    }
}

/// Emit one resource binding line
fn emit_resource_declaration(
    name: &str,
    kind: ResourceKind,
    output: &mut String,
    context: &mut EmitContext,
) {
    let slot = context.bindings.allocate(kind);
    write!(
        output,
        "{} {} : register({}{});",
        names::resource_type_name(kind),
        name,
        names::register_prefix(kind),
        slot
    )
    .unwrap();
}

/// Flatten a static composite into synthetic resource declarations
///
/// Each resource member becomes a free declaration named after the path to
/// it, then the composite itself is declared static with an aggregate
/// initializer naming those declarations in member order.
fn emit_static_composite(
    collection: &ShaderCollection,
    ty: &CollectedType,
    type_name: &str,
    name: &str,
    last_was_variable: &mut bool,
    output: &mut String,
    context: &mut EmitContext,
) {
    let mut initializers = Vec::new();

    for member in &ty.members {
        match member.kind {
            Some(
                kind @ (ResourceKind::Sampler
                | ResourceKind::Texture2D
                | ResourceKind::TextureArray
                | ResourceKind::TextureCube),
            ) => {
                let synthetic = format!("{}_{}", name, member.member.name);
                begin_item(true, last_was_variable, output, context);
                emit_resource_declaration(&synthetic, kind, output, context);
                initializers.push(synthetic);
            }
            Some(ResourceKind::StaticResource) => {
                let synthetic = format!("{}_{}", name, member.member.name);
                match collection.find_type(&member.type_name) {
                    Some(inner) => {
                        emit_static_composite(
                            collection,
                            inner,
                            &member.type_name,
                            &synthetic,
                            last_was_variable,
                            output,
                            context,
                        );
                        initializers.push(synthetic);
                    }
                    None => log::warn!(
                        "static resource '{}' of type '{}' was not collected",
                        synthetic,
                        member.type_name
                    ),
                }
            }
            _ => {}
        }
    }

    begin_item(true, last_was_variable, output, context);
    if initializers.is_empty() {
        write!(output, "static {} {};", type_name, name).unwrap();
    } else {
        write!(
            output,
            "static {} {} = {{ {} }};",
            type_name,
            name,
            initializers.join(", ")
        )
        .unwrap();
    }
}

fn field_type_text(type_name: &str) -> String {
    match names::target_type_name(type_name) {
        Some(mapped) => mapped.to_string(),
        None => type_name.to_string(),
    }
}

fn emit_function(def: &FunctionDefinition, output: &mut String, context: &mut EmitContext) {
    write!(output, "{} {}(", def.return_type, def.name).unwrap();
    if let Some((last, main)) = def.params.split_last() {
        for param in main {
            write!(output, "{} {}, ", param.type_name, param.name).unwrap();
        }
        write!(output, "{} {}", last.type_name, last.name).unwrap();
    }
    output.push(')');

    context.new_line(output);
    output.push('{');
    context.push_indent();
    for statement in &def.body {
        emit_statement(statement, output, context);
    }
    context.pop_indent();
    context.new_line(output);
    output.push('}');
}

fn emit_statement(statement: &Statement, output: &mut String, context: &mut EmitContext) {
    context.new_line(output);
    match statement {
        Statement::Empty => output.push(';'),
        Statement::Expression(expr) => {
            emit_expression(expr, output);
            output.push(';');
        }
        Statement::Var(def) => {
            emit_var_def(def, output);
            output.push(';');
        }
        Statement::Block(block) => emit_block(block, output, context),
        Statement::If(cond, body) => {
            output.push_str("if (");
            emit_expression(cond, output);
            output.push(')');
            emit_body(body, output, context);
        }
        Statement::IfElse(cond, body_true, body_false) => {
            output.push_str("if (");
            emit_expression(cond, output);
            output.push(')');
            emit_body(body_true, output, context);
            context.new_line(output);
            output.push_str("else");
            emit_body(body_false, output, context);
        }
        Statement::For(init, cond, inc, body) => {
            output.push_str("for (");
            match init {
                InitStatement::Empty => {}
                InitStatement::Expression(expr) => emit_expression(expr, output),
                InitStatement::Declaration(def) => emit_var_def(def, output),
            }
            output.push_str("; ");
            emit_expression(cond, output);
            output.push_str("; ");
            emit_expression(inc, output);
            output.push(')');
            emit_body(body, output, context);
        }
        Statement::While(cond, body) => {
            output.push_str("while (");
            emit_expression(cond, output);
            output.push(')');
            emit_body(body, output, context);
        }
        Statement::Break => output.push_str("break;"),
        Statement::Continue => output.push_str("continue;"),
        Statement::Return(expr) => {
            output.push_str("return");
            if let Some(expr) = expr {
                output.push(' ');
                emit_expression(expr, output);
            }
            output.push(';');
        }
    }
}

/// Emit a control flow body as a braced block
fn emit_body(statement: &Statement, output: &mut String, context: &mut EmitContext) {
    context.new_line(output);
    match statement {
        Statement::Block(block) => emit_block(block, output, context),
        single => {
            output.push('{');
            context.push_indent();
            emit_statement(single, output, context);
            context.pop_indent();
            context.new_line(output);
            output.push('}');
        }
    }
}

fn emit_block(block: &[Statement], output: &mut String, context: &mut EmitContext) {
    output.push('{');
    context.push_indent();
    for statement in block {
        emit_statement(statement, output, context);
    }
    context.pop_indent();
    context.new_line(output);
    output.push('}');
}

fn emit_var_def(def: &VarDef, output: &mut String) {
    write!(output, "{} {}", def.type_name, def.name).unwrap();
    if let Some(init) = &def.init {
        output.push_str(" = ");
        emit_subexpression(init, 16, OperatorSide::Right, output);
    }
}

enum OperatorSide {
    Left,
    Right,
    Middle,
}

enum Associativity {
    LeftToRight,
    RightToLeft,
    None,
}

fn emit_expression(expr: &Expression, output: &mut String) {
    emit_subexpression(expr, u32::MAX, OperatorSide::Middle, output);
}

/// Emit an expression within another expression
fn emit_subexpression(
    expr: &Expression,
    outer_precedence: u32,
    side: OperatorSide,
    output: &mut String,
) {
    let prec = get_expression_precedence(expr);
    let requires_paren = match prec.cmp(&outer_precedence) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => !matches!(
            (side, get_precedence_associativity(prec)),
            (OperatorSide::Left, Associativity::LeftToRight)
                | (OperatorSide::Right, Associativity::RightToLeft)
                | (OperatorSide::Middle, _)
        ),
    };
    if requires_paren {
        output.push('(');
    }
    match expr {
        Expression::Literal(literal) => emit_literal(literal, output),
        Expression::Variable(name) => output.push_str(name),
        Expression::ScopedMember(type_name, member) => {
            write!(output, "{}::{}", type_name, member).unwrap()
        }
        Expression::UnaryOperation(op, inner) => {
            output.push_str(unary_op_text(*op));
            emit_subexpression(inner, prec, OperatorSide::Right, output);
        }
        Expression::BinaryOperation(op, left, right) => {
            emit_subexpression(left, prec, OperatorSide::Left, output);
            write!(output, " {} ", binary_op_text(*op)).unwrap();
            emit_subexpression(right, prec, OperatorSide::Right, output);
        }
        Expression::TernaryConditional(cond, expr_true, expr_false) => {
            emit_subexpression(cond, prec, OperatorSide::Left, output);
            output.push_str(" ? ");
            emit_subexpression(expr_true, prec, OperatorSide::Middle, output);
            output.push_str(" : ");
            emit_subexpression(expr_false, prec, OperatorSide::Right, output);
        }
        Expression::ArraySubscript(object, index) => {
            emit_subexpression(object, prec, OperatorSide::Left, output);
            output.push('[');
            emit_subexpression(index, prec, OperatorSide::Middle, output);
            output.push(']');
        }
        Expression::Member(object, member) => {
            emit_subexpression(object, prec, OperatorSide::Left, output);
            output.push('.');
            output.push_str(member);
        }
        Expression::Call(callee, args) => {
            emit_subexpression(callee, prec, OperatorSide::Left, output);
            output.push('(');
            emit_argument_list(args, output);
            output.push(')');
        }
        Expression::Constructor(type_name, args) => {
            output.push_str(type_name);
            output.push('(');
            emit_argument_list(args, output);
            output.push(')');
        }
        Expression::Cast(type_name, inner) => {
            write!(output, "({})", type_name).unwrap();
            emit_subexpression(inner, prec, OperatorSide::Right, output);
        }
    }
    if requires_paren {
        output.push(')');
    }
}

fn emit_argument_list(args: &[Expression], output: &mut String) {
    if let Some((last, main)) = args.split_last() {
        for arg in main {
            emit_subexpression(arg, 17, OperatorSide::Middle, output);
            output.push_str(", ");
        }
        emit_subexpression(last, 17, OperatorSide::Middle, output);
    }
}

fn emit_literal(literal: &Literal, output: &mut String) {
    match literal {
        Literal::Bool(true) => output.push_str("true"),
        Literal::Bool(false) => output.push_str("false"),
        Literal::Int(v) => write!(output, "{}", v).unwrap(),
        Literal::UInt(v) => write!(output, "{}u", v).unwrap(),
        Literal::Float(v) if *v == (*v as i64 as f32) => {
            write!(output, "{}.0", *v as i64).unwrap()
        }
        Literal::Float(v) => write!(output, "{}", v).unwrap(),
        Literal::Double(v) if *v == (*v as i64 as f64) => {
            write!(output, "{}.0L", *v as i64).unwrap()
        }
        Literal::Double(v) => write!(output, "{}L", v).unwrap(),
    }
}

fn unary_op_text(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::PrefixIncrement => "++",
        UnaryOp::PrefixDecrement => "--",
        UnaryOp::Plus => "+",
        UnaryOp::Minus => "-",
        UnaryOp::LogicalNot => "!",
        UnaryOp::BitwiseNot => "~",
    }
}

fn binary_op_text(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Subtract => "-",
        BinOp::Multiply => "*",
        BinOp::Divide => "/",
        BinOp::Modulus => "%",
        BinOp::LeftShift => "<<",
        BinOp::RightShift => ">>",
        BinOp::BitwiseAnd => "&",
        BinOp::BitwiseOr => "|",
        BinOp::BitwiseXor => "^",
        BinOp::BooleanAnd => "&&",
        BinOp::BooleanOr => "||",
        BinOp::LessThan => "<",
        BinOp::LessEqual => "<=",
        BinOp::GreaterThan => ">",
        BinOp::GreaterEqual => ">=",
        BinOp::Equality => "==",
        BinOp::Inequality => "!=",
        BinOp::Assignment => "=",
        BinOp::SumAssignment => "+=",
        BinOp::DifferenceAssignment => "-=",
        BinOp::ProductAssignment => "*=",
        BinOp::QuotientAssignment => "/=",
    }
}

/// Get the precedence of an expression when it is HLSL
fn get_expression_precedence(expr: &Expression) -> u32 {
    match expr {
        Expression::Literal(_) | Expression::Variable(_) => 0,
        Expression::ScopedMember(_, _) => 1,
        Expression::Member(_, _)
        | Expression::Call(_, _)
        | Expression::ArraySubscript(_, _)
        | Expression::Constructor(_, _) => 2,
        Expression::UnaryOperation(_, _) | Expression::Cast(_, _) => 3,
        Expression::BinaryOperation(op, _, _) => match op {
            BinOp::Multiply | BinOp::Divide | BinOp::Modulus => 5,
            BinOp::Add | BinOp::Subtract => 6,
            BinOp::LeftShift | BinOp::RightShift => 7,
            BinOp::LessThan | BinOp::LessEqual | BinOp::GreaterThan | BinOp::GreaterEqual => 9,
            BinOp::Equality | BinOp::Inequality => 10,
            BinOp::BitwiseAnd => 11,
            BinOp::BitwiseXor => 12,
            BinOp::BitwiseOr => 13,
            BinOp::BooleanAnd => 14,
            BinOp::BooleanOr => 15,
            BinOp::Assignment
            | BinOp::SumAssignment
            | BinOp::DifferenceAssignment
            | BinOp::ProductAssignment
            | BinOp::QuotientAssignment => 16,
        },
        Expression::TernaryConditional(_, _, _) => 16,
    }
}

/// Get the associativity of a precedence level
fn get_precedence_associativity(prec: u32) -> Associativity {
    match prec {
        1 | 2 => Associativity::LeftToRight,
        3 => Associativity::RightToLeft,
        4..=15 => Associativity::LeftToRight,
        16 => Associativity::RightToLeft,
        17 => Associativity::LeftToRight,

        _ => Associativity::None,
    }
}

/// Contextual state for the emitter
struct EmitContext {
    indent: u32,
    bindings: BindingTracker,
}

impl EmitContext {
    /// Increase indentation
    fn push_indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation
    fn pop_indent(&mut self) {
        self.indent -= 1;
    }

    /// Begin a new line and indent up to the current level of indentation
    fn new_line(&self, output: &mut String) {
        // Nothing to separate from at the start of the file
        if output.is_empty() {
            return;
        }

        // Remove indentation left on otherwise empty lines
        let trimmed = output.trim_end_matches(' ');
        if output.len() != trimmed.len() {
            output.truncate(trimmed.len());
        }

        output.push('\n');

        for _ in 0..self.indent {
            output.push_str("    ");
        }
    }
}

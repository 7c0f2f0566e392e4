//! Syntax rewriting from the host method DSL into HLSL
//!
//! Operates purely on the statement tree: host type names become target
//! type names, intrinsic class calls become intrinsic function calls,
//! accesses into collected types become scoped accesses, and everything
//! else passes through untouched with a warning so a partially resolvable
//! body still produces inspectable output.

use crate::names;
use shadegen_ast::*;

/// Names visible to every method body during rewriting
pub struct RewriteContext {
    /// Emitted names of every collected type
    types: Vec<String>,

    /// Names declared at global scope in the emitted source
    globals: Vec<String>,
}

impl RewriteContext {
    pub fn new(types: Vec<String>, globals: Vec<String>) -> RewriteContext {
        RewriteContext { types, globals }
    }

    fn is_type(&self, name: &str) -> bool {
        self.types.iter().any(|t| t == name)
    }

    fn is_global(&self, name: &str) -> bool {
        self.globals.iter().any(|g| g == name)
    }
}

/// Rewrite an override chain into a single function definition
///
/// The signature comes from the most derived body; the statements of every
/// body concatenate most base first, so a derived override extends rather
/// than replaces its base behaviour. Names in `extra_visible` are treated
/// as globals for this chain only.
pub fn rewrite_chain(
    bodies: &[impl AsRef<FunctionDefinition>],
    context: &RewriteContext,
    extra_visible: &[String],
) -> FunctionDefinition {
    let signature = bodies
        .last()
        .map(|b| b.as_ref())
        .cloned()
        .unwrap_or_else(|| FunctionDefinition {
            name: String::new(),
            return_type: "Void".to_string(),
            params: Vec::new(),
            body: Vec::new(),
        });

    let mut rewriter = Rewriter {
        context,
        extra_visible,
        locals: signature.params.iter().map(|p| p.name.clone()).collect(),
    };

    let mut statements = Vec::new();
    for body in bodies {
        for statement in &body.as_ref().body {
            statements.push(rewriter.rewrite_statement(statement));
        }
    }

    FunctionDefinition {
        name: signature.name,
        return_type: rewriter.map_type(&signature.return_type),
        params: signature
            .params
            .iter()
            .map(|p| FunctionParam {
                name: names::substitute_keyword(&p.name).to_string(),
                type_name: rewriter.map_type(&p.type_name),
            })
            .collect(),
        body: statements,
    }
}

struct Rewriter<'c> {
    context: &'c RewriteContext,
    extra_visible: &'c [String],

    /// Names bound by parameters and local declarations seen so far
    locals: Vec<String>,
}

impl Rewriter<'_> {
    fn is_visible(&self, name: &str) -> bool {
        self.locals.iter().any(|l| l == name)
            || self.context.is_global(name)
            || self.extra_visible.iter().any(|v| v == name)
    }

    /// Map a host type name to its spelling in the output
    fn map_type(&self, host: &str) -> String {
        if let Some(mapped) = names::target_type_name(host) {
            return mapped.to_string();
        }
        if self.context.is_type(host) {
            return host.to_string();
        }
        log::warn!("type name '{}' is not known, passing through", host);
        host.to_string()
    }

    fn rewrite_statement(&mut self, statement: &Statement) -> Statement {
        match statement {
            Statement::Empty => Statement::Empty,
            Statement::Break => Statement::Break,
            Statement::Continue => Statement::Continue,
            Statement::Expression(expr) => Statement::Expression(self.rewrite_expression(expr)),
            Statement::Var(def) => Statement::Var(self.rewrite_var_def(def)),
            Statement::Block(block) => {
                let depth = self.locals.len();
                let block = block.iter().map(|s| self.rewrite_statement(s)).collect();
                self.locals.truncate(depth);
                Statement::Block(block)
            }
            Statement::If(cond, body) => Statement::If(
                self.rewrite_expression(cond),
                Box::new(self.rewrite_statement(body)),
            ),
            Statement::IfElse(cond, body_true, body_false) => Statement::IfElse(
                self.rewrite_expression(cond),
                Box::new(self.rewrite_statement(body_true)),
                Box::new(self.rewrite_statement(body_false)),
            ),
            Statement::For(init, cond, inc, body) => {
                let depth = self.locals.len();
                let init = match init {
                    InitStatement::Empty => InitStatement::Empty,
                    InitStatement::Expression(expr) => {
                        InitStatement::Expression(self.rewrite_expression(expr))
                    }
                    InitStatement::Declaration(def) => {
                        InitStatement::Declaration(self.rewrite_var_def(def))
                    }
                };
                let cond = self.rewrite_expression(cond);
                let inc = self.rewrite_expression(inc);
                let body = Box::new(self.rewrite_statement(body));
                self.locals.truncate(depth);
                Statement::For(init, cond, inc, body)
            }
            Statement::While(cond, body) => Statement::While(
                self.rewrite_expression(cond),
                Box::new(self.rewrite_statement(body)),
            ),
            Statement::Return(expr) => {
                Statement::Return(expr.as_ref().map(|e| self.rewrite_expression(e)))
            }
        }
    }

    fn rewrite_var_def(&mut self, def: &VarDef) -> VarDef {
        let init = def.init.as_ref().map(|e| self.rewrite_expression(e));
        self.locals.push(def.name.clone());
        VarDef {
            type_name: self.map_type(&def.type_name),
            name: names::substitute_keyword(&def.name).to_string(),
            init,
        }
    }

    fn rewrite_expression(&mut self, expr: &Expression) -> Expression {
        match expr {
            Expression::Literal(literal) => Expression::Literal(literal.clone()),
            Expression::Variable(name) => {
                Expression::Variable(names::substitute_keyword(name).to_string())
            }
            Expression::UnaryOperation(op, inner) => {
                Expression::UnaryOperation(*op, Box::new(self.rewrite_expression(inner)))
            }
            Expression::BinaryOperation(op, left, right) => Expression::BinaryOperation(
                *op,
                Box::new(self.rewrite_expression(left)),
                Box::new(self.rewrite_expression(right)),
            ),
            Expression::TernaryConditional(cond, left, right) => Expression::TernaryConditional(
                Box::new(self.rewrite_expression(cond)),
                Box::new(self.rewrite_expression(left)),
                Box::new(self.rewrite_expression(right)),
            ),
            Expression::ArraySubscript(object, index) => Expression::ArraySubscript(
                Box::new(self.rewrite_expression(object)),
                Box::new(self.rewrite_expression(index)),
            ),
            Expression::Member(object, member) => self.rewrite_member(object, member),
            Expression::Call(callee, args) => self.rewrite_call(callee, args),
            Expression::Constructor(type_name, args) => {
                let mapped = self.map_type(type_name);
                if args.is_empty() {
                    // Zero-argument construction spells as a zero cast
                    Expression::Cast(
                        mapped,
                        Box::new(Expression::Literal(Literal::Int(0))),
                    )
                } else {
                    Expression::Constructor(
                        mapped,
                        args.iter().map(|a| self.rewrite_expression(a)).collect(),
                    )
                }
            }
            Expression::Cast(type_name, inner) => Expression::Cast(
                self.map_type(type_name),
                Box::new(self.rewrite_expression(inner)),
            ),
            Expression::ScopedMember(type_name, member) => {
                Expression::ScopedMember(type_name.clone(), member.clone())
            }
        }
    }

    /// Rewrite a qualified access
    ///
    /// Accesses on a bare name that is not a visible value resolve against
    /// the collected types first; unresolved names pass through with a
    /// warning. Swizzle spellings normalize to lowercase.
    fn rewrite_member(&mut self, object: &Expression, member: &str) -> Expression {
        if let Expression::Variable(name) = object {
            if !self.is_visible(name) {
                if self.context.is_type(name) {
                    return Expression::ScopedMember(name.clone(), member.to_string());
                }
                log::warn!(
                    "member access '{}.{}' does not resolve, passing through",
                    name,
                    member
                );
            }
        }

        let object = Box::new(self.rewrite_expression(object));
        if names::is_swizzle(member) {
            Expression::Member(object, member.to_ascii_lowercase())
        } else {
            Expression::Member(object, member.to_string())
        }
    }

    /// Rewrite a call expression
    ///
    /// Calls through a non-value bare name are intrinsic class calls when the
    /// intrinsic table knows the pair, and scoped static calls when the name
    /// is a collected type.
    fn rewrite_call(&mut self, callee: &Expression, args: &[Expression]) -> Expression {
        let args: Vec<Expression> = args.iter().map(|a| self.rewrite_expression(a)).collect();

        if let Expression::Member(object, member) = callee {
            if let Expression::Variable(name) = &**object {
                if !self.is_visible(name) {
                    if let Some(intrinsic) = names::intrinsic_function(name, member) {
                        return Expression::Call(
                            Box::new(Expression::Variable(intrinsic.to_string())),
                            args,
                        );
                    }
                    if self.context.is_type(name) {
                        return Expression::Call(
                            Box::new(Expression::ScopedMember(name.clone(), member.clone())),
                            args,
                        );
                    }
                    log::warn!(
                        "call '{}.{}' does not resolve, passing through",
                        name,
                        member
                    );
                }
            }
        }

        Expression::Call(Box::new(self.rewrite_expression(callee)), args)
    }
}

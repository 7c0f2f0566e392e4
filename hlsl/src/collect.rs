//! Structural collection over a shader object graph
//!
//! Discovers every distinct type the emitted source must declare, ordered
//! dependencies first, together with the extracted method chains of each
//! type. Collection order fully determines emission order and with it the
//! binding slot assignment, so the walk uses no unordered containers.

use crate::extract;
use crate::names;
use crate::reflect::{self, ClassifiedMember};
use crate::{GenerateError, ShaderCompilationContext};
use shadegen_ast::*;
use shadegen_graph::{ResourceKind, ShaderNode, ShaderStage, TypeDescriptor};
use std::sync::Arc;

/// A method override chain with every body extracted, most base first
pub struct MethodChain {
    pub name: &'static str,
    pub stage: Option<ShaderStage>,
    pub bodies: Vec<Arc<FunctionDefinition>>,
}

/// A structure or enum discovered during traversal
pub struct CollectedType<'a> {
    pub descriptor: &'static TypeDescriptor,

    /// Live instance used to resolve polymorphic member types, when the type
    /// was reached through a value rather than a name
    pub instance: Option<&'a dyn ShaderNode>,

    /// Ordered classified members
    pub members: Vec<ClassifiedMember<'a>>,

    /// Extracted method chains in declared order
    pub methods: Vec<MethodChain>,
}

/// Result of collecting a root shader object
pub struct ShaderCollection<'a> {
    /// Discovered types in dependency order, dependencies first
    pub types: Vec<CollectedType<'a>>,

    /// The root shader object's own members and methods
    pub root: CollectedType<'a>,
}

impl<'a> ShaderCollection<'a> {
    /// Find a collected type by its emitted name
    pub fn find_type(&self, name: &str) -> Option<&CollectedType<'a>> {
        self.types.iter().find(|t| t.descriptor.name == name)
    }
}

/// Collect all types and methods reachable from a root shader object
pub fn collect<'a>(
    root: &'a dyn ShaderNode,
    context: &ShaderCompilationContext,
) -> Result<ShaderCollection<'a>, GenerateError> {
    let mut collector = Collector {
        context,
        seen: vec![root.descriptor().name],
        types: Vec::new(),
    };

    let root_type = collector.build_type(root.descriptor(), Some(root))?;

    Ok(ShaderCollection {
        types: collector.types,
        root: root_type,
    })
}

struct Collector<'a, 'c> {
    context: &'c ShaderCompilationContext,

    /// Names of types already collected or in progress - guards against
    /// type-level cycles
    seen: Vec<&'static str>,

    types: Vec<CollectedType<'a>>,
}

impl<'a> Collector<'a, '_> {
    /// Classify a type's members, collect everything they reference, and
    /// extract its methods
    fn build_type(
        &mut self,
        descriptor: &'static TypeDescriptor,
        instance: Option<&'a dyn ShaderNode>,
    ) -> Result<CollectedType<'a>, GenerateError> {
        let members = reflect::classify_members(descriptor, instance);

        for member in &members {
            match member.kind {
                None => {}
                Some(ResourceKind::ConstantBuffer) | Some(ResourceKind::Semantic(_)) => {
                    // Structure-typed values must resolve to a registered
                    // descriptor; primitives come from the type table
                    if names::target_type_name(&member.type_name).is_none() {
                        match self.context.registry().find(&member.type_name) {
                            Some(found) => self.collect_type(found, member.node)?,
                            None => return Err(unsupported(descriptor, member)),
                        }
                    }
                }
                Some(ResourceKind::Sampler)
                | Some(ResourceKind::Texture2D)
                | Some(ResourceKind::TextureArray)
                | Some(ResourceKind::TextureCube) => {
                    if names::default_resource_kind(&member.type_name).is_none() {
                        return Err(unsupported(descriptor, member));
                    }
                }
                Some(ResourceKind::StaticResource) => {
                    let found = member
                        .node
                        .map(|node| node.descriptor())
                        .or_else(|| self.context.registry().find(&member.type_name));
                    match found {
                        Some(found) => self.collect_type(found, member.node)?,
                        None => return Err(unsupported(descriptor, member)),
                    }
                }
            }
        }

        let mut methods = Vec::new();
        for chain in reflect::method_chains(descriptor) {
            let bodies = extract::extract_chain(&chain, self.context)?;
            for body in &bodies {
                self.collect_body_references(body)?;
            }
            methods.push(MethodChain {
                name: chain.name,
                stage: chain.stage,
                bodies,
            });
        }

        Ok(CollectedType {
            descriptor,
            instance,
            members,
            methods,
        })
    }

    /// Collect a type reached by name or value, once per distinct type
    ///
    /// The type is marked seen before its members are walked so cycles
    /// between types terminate; it is appended to the output after, so its
    /// dependencies emit ahead of it.
    fn collect_type(
        &mut self,
        descriptor: &'static TypeDescriptor,
        instance: Option<&'a dyn ShaderNode>,
    ) -> Result<(), GenerateError> {
        if self.seen.contains(&descriptor.name) {
            return Ok(());
        }
        self.seen.push(descriptor.name);

        let collected = self.build_type(descriptor, instance)?;
        self.types.push(collected);
        Ok(())
    }

    /// Collect types referenced only from inside a method body
    fn collect_body_references(&mut self, body: &FunctionDefinition) -> Result<(), GenerateError> {
        for name in scan_function(body) {
            if let Some(found) = self.context.registry().find(&name) {
                self.collect_type(found, None)?;
            }
        }
        Ok(())
    }
}

fn unsupported(owner: &TypeDescriptor, member: &ClassifiedMember) -> GenerateError {
    GenerateError::UnsupportedResourceKind {
        shader_type: owner.name.to_string(),
        member: member.member.name.to_string(),
        member_type: member.type_name.clone(),
    }
}

/// Gather type name candidates referenced by a method body, in source order
///
/// Parameters and local variables are tracked so a name they shadow is never
/// taken as a type reference.
fn scan_function(def: &FunctionDefinition) -> Vec<String> {
    let mut scan = BodyScan {
        referenced: vec![def.return_type.clone()],
        locals: Vec::new(),
    };
    for param in &def.params {
        scan.referenced.push(param.type_name.clone());
        scan.locals.push(param.name.clone());
    }
    for statement in &def.body {
        scan.scan_statement(statement);
    }
    scan.referenced
}

struct BodyScan {
    referenced: Vec<String>,
    locals: Vec<String>,
}

impl BodyScan {
    fn scan_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Empty | Statement::Break | Statement::Continue => {}
            Statement::Expression(expr) => self.scan_expression(expr),
            Statement::Var(def) => self.scan_var_def(def),
            Statement::Block(block) => {
                let scope_depth = self.locals.len();
                for statement in block {
                    self.scan_statement(statement);
                }
                self.locals.truncate(scope_depth);
            }
            Statement::If(cond, body) => {
                self.scan_expression(cond);
                self.scan_statement(body);
            }
            Statement::IfElse(cond, body_true, body_false) => {
                self.scan_expression(cond);
                self.scan_statement(body_true);
                self.scan_statement(body_false);
            }
            Statement::For(init, cond, inc, body) => {
                let scope_depth = self.locals.len();
                match init {
                    InitStatement::Empty => {}
                    InitStatement::Expression(expr) => self.scan_expression(expr),
                    InitStatement::Declaration(def) => self.scan_var_def(def),
                }
                self.scan_expression(cond);
                self.scan_expression(inc);
                self.scan_statement(body);
                self.locals.truncate(scope_depth);
            }
            Statement::While(cond, body) => {
                self.scan_expression(cond);
                self.scan_statement(body);
            }
            Statement::Return(Some(expr)) => self.scan_expression(expr),
            Statement::Return(None) => {}
        }
    }

    fn scan_var_def(&mut self, def: &VarDef) {
        self.referenced.push(def.type_name.clone());
        if let Some(init) = &def.init {
            self.scan_expression(init);
        }
        self.locals.push(def.name.clone());
    }

    fn scan_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Literal(_) | Expression::Variable(_) => {}
            Expression::UnaryOperation(_, inner) => self.scan_expression(inner),
            Expression::BinaryOperation(_, left, right) => {
                self.scan_expression(left);
                self.scan_expression(right);
            }
            Expression::TernaryConditional(cond, left, right) => {
                self.scan_expression(cond);
                self.scan_expression(left);
                self.scan_expression(right);
            }
            Expression::ArraySubscript(object, index) => {
                self.scan_expression(object);
                self.scan_expression(index);
            }
            Expression::Member(object, _) => {
                // A qualified access on a bare name may be a static or enum
                // value access on a type only referenced here, unless a
                // local shadows the name
                if let Expression::Variable(name) = &**object {
                    if !self.locals.contains(name) {
                        self.referenced.push(name.clone());
                    }
                }
                self.scan_expression(object);
            }
            Expression::Call(callee, args) => {
                self.scan_expression(callee);
                for arg in args {
                    self.scan_expression(arg);
                }
            }
            Expression::Constructor(type_name, args) => {
                self.referenced.push(type_name.clone());
                for arg in args {
                    self.scan_expression(arg);
                }
            }
            Expression::Cast(type_name, inner) => {
                self.referenced.push(type_name.clone());
                self.scan_expression(inner);
            }
            Expression::ScopedMember(type_name, _) => self.referenced.push(type_name.clone()),
        }
    }
}

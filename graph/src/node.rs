use crate::TypeDescriptor;

/// A live node in a shader object graph
///
/// The generation pass prefers the runtime type reported by a member's value
/// over the member's declared type, so polymorphic sub-shader features are
/// emitted according to what they actually are.
pub trait ShaderNode {
    /// Get the descriptor for the runtime type of this node
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Get the current value of a member by name
    fn member(&self, name: &str) -> MemberValue<'_>;
}

/// Value of a member of a live shader node
pub enum MemberValue<'a> {
    /// A nested shader feature with its own descriptor
    Node(&'a dyn ShaderNode),

    /// A plain data or resource-handle value with no sub-graph
    Data,

    /// The member currently has no value - the declared type is used
    Missing,
}

impl ShaderNode for Box<dyn ShaderNode> {
    fn descriptor(&self) -> &'static TypeDescriptor {
        (**self).descriptor()
    }

    fn member(&self, name: &str) -> MemberValue<'_> {
        (**self).member(name)
    }
}

/// Conversion into a shader node reference
///
/// Exists so generated member accessors work uniformly for concrete node
/// fields and for boxed dynamically typed fields.
pub trait AsShaderNode {
    fn as_shader_node(&self) -> &dyn ShaderNode;
}

impl<T: ShaderNode> AsShaderNode for T {
    fn as_shader_node(&self) -> &dyn ShaderNode {
        self
    }
}

/// Stage of the graphics pipeline an entry point method implements
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ShaderStage {
    Vertex,
    Pixel,
    Compute,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Pixel => "pixel",
            ShaderStage::Compute => "compute",
        })
    }
}

impl ShaderStage {
    /// Parse a stage from its annotation name
    pub fn from_name(name: &str) -> Option<ShaderStage> {
        match name {
            "vertex" => Some(ShaderStage::Vertex),
            "pixel" => Some(ShaderStage::Pixel),
            "compute" => Some(ShaderStage::Compute),
            _ => None,
        }
    }
}

/// Category of shader resource a classified member binds as
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ResourceKind {
    /// A value stored in a constant buffer block
    ConstantBuffer,

    /// A sampler state object
    Sampler,

    /// A read-only sampled 2d texture
    Texture2D,

    /// A read-only sampled 2d texture array
    TextureArray,

    /// A read-only sampled cube texture
    TextureCube,

    /// A nested sub-graph whose resources are flattened into the root
    /// binding space and exposed as a static aggregate
    StaticResource,

    /// A vertex attribute or system value bound by semantic
    Semantic(Semantic),
}

/// Semantic a structure field is bound to
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Semantic {
    Position,
    Normal,
    TexCoord,
    Color,
    Tangent,
    SystemPosition,
    SystemTarget,
    SystemInstanceId,
    SystemRenderTargetArrayIndex,
}

/// Whether a described type is a structure or an enumeration
#[derive(PartialEq, Debug, Clone)]
pub enum TypeKind {
    Struct,
    Enum(Vec<&'static str>),
}

/// Description of a type that can appear in a shader object graph
///
/// Members and methods are in declared order. A descriptor may name a base
/// descriptor; base members order before the type's own members and a method
/// name repeated along the base chain forms an override chain.
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Name the type is declared and emitted under
    pub name: &'static str,

    /// Base type in the inheritance chain, if any
    pub base: Option<fn() -> &'static TypeDescriptor>,

    /// Struct or enum layout
    pub kind: TypeKind,

    /// Data members in declared order
    pub members: Vec<MemberDescriptor>,

    /// Methods in declared order
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Get the base descriptor if the type has one
    pub fn base_descriptor(&self) -> Option<&'static TypeDescriptor> {
        self.base.map(|get| get())
    }

    /// Find a method declared directly on this type
    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Description of a single data member of a described type
#[derive(PartialEq, Debug, Clone)]
pub struct MemberDescriptor {
    /// Declared member name
    pub name: &'static str,

    /// Name of the declared member type
    pub type_name: &'static str,

    /// Resource classification annotated on the member itself
    pub kind: Option<ResourceKind>,

    /// When false the member type's own default classification wins over
    /// the annotation above
    pub authoritative: bool,
}

impl MemberDescriptor {
    /// Create a member with an authoritative classification annotation
    pub fn new(
        name: &'static str,
        type_name: &'static str,
        kind: Option<ResourceKind>,
    ) -> MemberDescriptor {
        MemberDescriptor {
            name,
            type_name,
            kind,
            authoritative: true,
        }
    }
}

/// Description of a method declared on a described type
///
/// The body is authored in the shading DSL and is parsed on first use by the
/// method body provider of the active compilation context.
#[derive(PartialEq, Debug, Clone)]
pub struct MethodDescriptor {
    /// Declared method name
    pub name: &'static str,

    /// Pipeline stage this method is the entry point for, if annotated
    pub stage: Option<ShaderStage>,

    /// Full function definition text in the shading DSL
    pub source: &'static str,
}

impl MethodDescriptor {
    /// Create a helper method with no stage annotation
    pub fn helper(name: &'static str, source: &'static str) -> MethodDescriptor {
        MethodDescriptor {
            name,
            stage: None,
            source,
        }
    }

    /// Create a stage entry point method
    pub fn entry(name: &'static str, stage: ShaderStage, source: &'static str) -> MethodDescriptor {
        MethodDescriptor {
            name,
            stage: Some(stage),
            source,
        }
    }
}

//! Classification tables mapping the host surface to HLSL
//!
//! These tables are the single source of truth for what counts as a known
//! primitive, which marker types default to which resource kind, and how
//! intrinsic class members spell in the target language.

use shadegen_graph::{ResourceKind, Semantic};

/// Map a host type name to its HLSL type name
pub fn target_type_name(host: &str) -> Option<&'static str> {
    let name = match host {
        "Void" => "void",
        "Bool" => "bool",
        "Int" => "int",
        "UInt" => "uint",
        "Float" => "float",
        "Double" => "double",
        "Float2" | "Vector2" => "float2",
        "Float3" | "Vector3" => "float3",
        "Float4" | "Vector4" => "float4",
        "Float3x3" => "float3x3",
        "Float4x4" | "Matrix" => "float4x4",
        "Texture2D" => "Texture2D",
        "Texture2DArray" => "Texture2DArray",
        "TextureCube" => "TextureCube",
        "SamplerState" => "SamplerState",
        _ => return None,
    };
    Some(name)
}

/// Get the resource kind a host type classifies as by default
pub fn default_resource_kind(host: &str) -> Option<ResourceKind> {
    let kind = match host {
        "Texture2D" => ResourceKind::Texture2D,
        "Texture2DArray" => ResourceKind::TextureArray,
        "TextureCube" => ResourceKind::TextureCube,
        "SamplerState" => ResourceKind::Sampler,
        _ => return None,
    };
    Some(kind)
}

/// Get the HLSL declaration type for a resource kind
pub fn resource_type_name(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Texture2D => "Texture2D",
        ResourceKind::TextureArray => "Texture2DArray",
        ResourceKind::TextureCube => "TextureCube",
        ResourceKind::Sampler => "SamplerState",
        _ => panic!("resource kind {:?} has no declaration type", kind),
    }
}

/// Get the register space prefix for a resource kind
///
/// Constant buffers, textures and samplers each number their slots
/// independently. All texture kinds share the t space.
pub fn register_prefix(kind: ResourceKind) -> char {
    match kind {
        ResourceKind::ConstantBuffer => 'b',
        ResourceKind::Sampler => 's',
        ResourceKind::Texture2D | ResourceKind::TextureArray | ResourceKind::TextureCube => 't',
        _ => panic!("resource kind {:?} has no register space", kind),
    }
}

/// Map an intrinsic class member to the HLSL intrinsic it spells as
pub fn intrinsic_function(container: &str, member: &str) -> Option<&'static str> {
    let name = match (container, member) {
        ("Vector", "Dot") => "dot",
        ("Vector", "Cross") => "cross",
        ("Vector", "Normalize") => "normalize",
        ("Vector", "Length") => "length",
        ("Vector", "Distance") => "distance",
        ("Vector", "Reflect") => "reflect",
        ("Vector", "Refract") => "refract",
        ("Math", "Abs") => "abs",
        ("Math", "Min") => "min",
        ("Math", "Max") => "max",
        ("Math", "Clamp") => "clamp",
        ("Math", "Saturate") => "saturate",
        ("Math", "Lerp") => "lerp",
        ("Math", "Pow") => "pow",
        ("Math", "Sqrt") => "sqrt",
        ("Math", "Exp") => "exp",
        ("Math", "Log") => "log",
        ("Math", "Sin") => "sin",
        ("Math", "Cos") => "cos",
        ("Math", "Tan") => "tan",
        ("Math", "Floor") => "floor",
        ("Math", "Ceiling") => "ceil",
        ("Math", "Frac") => "frac",
        ("Matrix", "Multiply") => "mul",
        ("Matrix", "Transpose") => "transpose",
        _ => return None,
    };
    Some(name)
}

/// Get the HLSL spelling of a semantic
pub fn semantic_name(semantic: Semantic) -> &'static str {
    match semantic {
        Semantic::Position => "POSITION",
        Semantic::Normal => "NORMAL",
        Semantic::TexCoord => "TEXCOORD",
        Semantic::Color => "COLOR",
        Semantic::Tangent => "TANGENT",
        Semantic::SystemPosition => "SV_Position",
        Semantic::SystemTarget => "SV_Target",
        Semantic::SystemInstanceId => "SV_InstanceID",
        Semantic::SystemRenderTargetArrayIndex => "SV_RenderTargetArrayIndex",
    }
}

/// System value semantics are emitted without an auto-incremented index
pub fn semantic_has_index(semantic: Semantic) -> bool {
    !matches!(
        semantic,
        Semantic::SystemPosition
            | Semantic::SystemTarget
            | Semantic::SystemInstanceId
            | Semantic::SystemRenderTargetArrayIndex
    )
}

/// Substitute host identifiers that collide with target language keywords
pub fn substitute_keyword(id: &str) -> &str {
    match id {
        "vector" => "vec",
        "matrix" => "mat",
        "sampler" => "samp",
        _ => id,
    }
}

/// Check if a member name spells a vector swizzle
///
/// Swizzles are one to four characters all drawn from xyzw or all from rgba,
/// in either case.
pub fn is_swizzle(name: &str) -> bool {
    if name.is_empty() || name.len() > 4 {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    lower.bytes().all(|c| matches!(c, b'x' | b'y' | b'z' | b'w'))
        || lower.bytes().all(|c| matches!(c, b'r' | b'g' | b'b' | b'a'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swizzle_spellings() {
        assert!(is_swizzle("x"));
        assert!(is_swizzle("XYZ"));
        assert!(is_swizzle("rgba"));
        assert!(is_swizzle("wzyx"));
        assert!(!is_swizzle(""));
        assert!(!is_swizzle("xyzwx"));
        assert!(!is_swizzle("xg"));
        assert!(!is_swizzle("Sample"));
    }

    #[test]
    fn texture_kinds_share_register_space() {
        assert_eq!(register_prefix(ResourceKind::Texture2D), 't');
        assert_eq!(register_prefix(ResourceKind::TextureArray), 't');
        assert_eq!(register_prefix(ResourceKind::TextureCube), 't');
        assert_eq!(register_prefix(ResourceKind::ConstantBuffer), 'b');
        assert_eq!(register_prefix(ResourceKind::Sampler), 's');
    }
}

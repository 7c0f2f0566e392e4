mod shared;
use shared::*;

use shadegen_graph::*;
use shadegen_hlsl::{generate, GenerateError, ShaderCompilationContext};
use std::sync::OnceLock;

fn context_with(descriptors: &[&'static TypeDescriptor]) -> ShaderCompilationContext {
    let mut registry = DescriptorRegistry::new();
    for descriptor in descriptors {
        registry.register(descriptor);
    }
    ShaderCompilationContext::new(registry, Box::new(DslProvider))
}

struct FlatMaterial;

impl ShaderNode for FlatMaterial {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "FlatMaterial",
            base: None,
            kind: TypeKind::Struct,
            members: vec![
                MemberDescriptor::new("Tint", "Float4", Some(ResourceKind::ConstantBuffer)),
                MemberDescriptor::new("Albedo", "Texture2D", None),
                MemberDescriptor::new("AlbedoSampler", "SamplerState", None),
            ],
            methods: vec![MethodDescriptor::entry(
                "MainPS",
                ShaderStage::Pixel,
                "Float4 MainPS(Float2 uv) { return Albedo.Sample(AlbedoSampler, uv) * Tint; }",
            )],
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

#[test]
fn check_flat_material() {
    let material = FlatMaterial;
    let context = context_with(&[material.descriptor()]);

    let result = check_generated(
        &material,
        &context,
        "\
cbuffer TintBuffer : register(b0)
{
    float4 Tint;
}

Texture2D Albedo : register(t0);
SamplerState AlbedoSampler : register(s0);

float4 MainPS(float2 uv)
{
    return Albedo.Sample(AlbedoSampler, uv) * Tint;
}
",
    );

    assert_eq!(result.entry_point(ShaderStage::Pixel).unwrap(), "MainPS");
    assert!(matches!(
        result.entry_point(ShaderStage::Vertex),
        Err(GenerateError::MissingEntryPoint(ShaderStage::Vertex))
    ));
}

fn vertex_input_descriptor() -> &'static TypeDescriptor {
    static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
    DESC.get_or_init(|| TypeDescriptor {
        name: "VertexInput",
        base: None,
        kind: TypeKind::Struct,
        members: vec![
            MemberDescriptor::new(
                "Position",
                "Float3",
                Some(ResourceKind::Semantic(Semantic::Position)),
            ),
            MemberDescriptor::new(
                "Normal",
                "Float3",
                Some(ResourceKind::Semantic(Semantic::Normal)),
            ),
            MemberDescriptor::new(
                "Uv",
                "Float2",
                Some(ResourceKind::Semantic(Semantic::TexCoord)),
            ),
        ],
        methods: Vec::new(),
    })
}

fn vertex_output_descriptor() -> &'static TypeDescriptor {
    static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
    DESC.get_or_init(|| TypeDescriptor {
        name: "VertexOutput",
        base: None,
        kind: TypeKind::Struct,
        members: vec![
            MemberDescriptor::new(
                "Position",
                "Float4",
                Some(ResourceKind::Semantic(Semantic::SystemPosition)),
            ),
            MemberDescriptor::new(
                "Uv",
                "Float2",
                Some(ResourceKind::Semantic(Semantic::TexCoord)),
            ),
            MemberDescriptor::new(
                "Uv2",
                "Float2",
                Some(ResourceKind::Semantic(Semantic::TexCoord)),
            ),
        ],
        methods: Vec::new(),
    })
}

struct BasicEffect;

impl ShaderNode for BasicEffect {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "BasicEffect",
            base: None,
            kind: TypeKind::Struct,
            members: vec![MemberDescriptor::new(
                "World",
                "Float4x4",
                Some(ResourceKind::ConstantBuffer),
            )],
            methods: vec![MethodDescriptor::entry(
                "MainVS",
                ShaderStage::Vertex,
                "VertexOutput MainVS(VertexInput input) {
                    VertexOutput output = new VertexOutput();
                    output.Position = Matrix.Multiply(World, new Float4(input.Position, 1.0f));
                    output.Uv = input.Uv;
                    return output;
                }",
            )],
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

/// Structure types referenced from a method body declare before their first
/// use, with auto indexed semantics restarting per structure
#[test]
fn check_vertex_pipeline_structs() {
    let effect = BasicEffect;
    let context = context_with(&[
        effect.descriptor(),
        vertex_input_descriptor(),
        vertex_output_descriptor(),
    ]);

    let result = check_generated(
        &effect,
        &context,
        "\
struct VertexOutput
{
    float4 Position : SV_Position;
    float2 Uv : TEXCOORD0;
    float2 Uv2 : TEXCOORD1;
};

struct VertexInput
{
    float3 Position : POSITION0;
    float3 Normal : NORMAL0;
    float2 Uv : TEXCOORD0;
};

cbuffer WorldBuffer : register(b0)
{
    float4x4 World;
}

VertexOutput MainVS(VertexInput input)
{
    VertexOutput output = (VertexOutput)0;
    output.Position = mul(World, float4(input.Position, 1.0));
    output.Uv = input.Uv;
    return output;
}
",
    );

    assert_eq!(
        result.entry_points(),
        &[(ShaderStage::Vertex, "MainVS".to_string())]
    );
}

fn fog_base_descriptor() -> &'static TypeDescriptor {
    static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
    DESC.get_or_init(|| TypeDescriptor {
        name: "FogEffectBase",
        base: None,
        kind: TypeKind::Struct,
        members: vec![MemberDescriptor::new(
            "Tint",
            "Float4",
            Some(ResourceKind::ConstantBuffer),
        )],
        methods: vec![MethodDescriptor::helper(
            "MainPS",
            "Float4 MainPS() { Float4 result = Tint; }",
        )],
    })
}

struct HighlightEffect;

impl ShaderNode for HighlightEffect {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "HighlightEffect",
            base: Some(fog_base_descriptor),
            kind: TypeKind::Struct,
            members: vec![MemberDescriptor::new(
                "Highlight",
                "Float4",
                Some(ResourceKind::ConstantBuffer),
            )],
            methods: vec![MethodDescriptor::entry(
                "MainPS",
                ShaderStage::Pixel,
                "Float4 MainPS() { return result * Highlight; }",
            )],
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

/// An override extends its base body rather than replacing it, and members
/// declared on the base bind before members of the derived type
#[test]
fn check_override_chain_concatenates() {
    let effect = HighlightEffect;
    let context = context_with(&[effect.descriptor(), fog_base_descriptor()]);

    let result = check_generated(
        &effect,
        &context,
        "\
cbuffer TintBuffer : register(b0)
{
    float4 Tint;
}

cbuffer HighlightBuffer : register(b1)
{
    float4 Highlight;
}

float4 MainPS()
{
    float4 result = Tint;
    return result * Highlight;
}
",
    );

    assert_eq!(result.entry_point(ShaderStage::Pixel).unwrap(), "MainPS");
}

fn tone_base_descriptor() -> &'static TypeDescriptor {
    static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
    DESC.get_or_init(|| TypeDescriptor {
        name: "ToneBase",
        base: None,
        kind: TypeKind::Struct,
        members: vec![MemberDescriptor::new(
            "Exposure",
            "Float4",
            Some(ResourceKind::ConstantBuffer),
        )],
        methods: vec![MethodDescriptor::helper(
            "MainPS",
            "Float4 MainPS() { Float4 color = Exposure; }",
        )],
    })
}

fn contrast_effect_descriptor() -> &'static TypeDescriptor {
    static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
    DESC.get_or_init(|| TypeDescriptor {
        name: "ContrastEffect",
        base: Some(tone_base_descriptor),
        kind: TypeKind::Struct,
        members: vec![MemberDescriptor::new(
            "Contrast",
            "Float4",
            Some(ResourceKind::ConstantBuffer),
        )],
        methods: vec![MethodDescriptor::entry(
            "MainPS",
            ShaderStage::Vertex,
            "Float4 MainPS() { color = color * Contrast; }",
        )],
    })
}

struct VignetteEffect;

impl ShaderNode for VignetteEffect {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "VignetteEffect",
            base: Some(contrast_effect_descriptor),
            kind: TypeKind::Struct,
            members: vec![MemberDescriptor::new(
                "Vignette",
                "Float4",
                Some(ResourceKind::ConstantBuffer),
            )],
            methods: vec![MethodDescriptor::entry(
                "MainPS",
                ShaderStage::Pixel,
                "Float4 MainPS() { return color + Vignette; }",
            )],
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

/// Every level of a three deep override chain contributes its statements in
/// base to derived order, its members bind in the same order, and the stage
/// annotated on the most derived override wins over an intermediate one
#[test]
fn check_deep_override_chain() {
    let effect = VignetteEffect;
    let context = context_with(&[
        effect.descriptor(),
        contrast_effect_descriptor(),
        tone_base_descriptor(),
    ]);

    let result = check_generated(
        &effect,
        &context,
        "\
cbuffer ExposureBuffer : register(b0)
{
    float4 Exposure;
}

cbuffer ContrastBuffer : register(b1)
{
    float4 Contrast;
}

cbuffer VignetteBuffer : register(b2)
{
    float4 Vignette;
}

float4 MainPS()
{
    float4 color = Exposure;
    color = color * Contrast;
    return color + Vignette;
}
",
    );

    assert_eq!(
        result.entry_points(),
        &[(ShaderStage::Pixel, "MainPS".to_string())]
    );
    assert!(matches!(
        result.entry_point(ShaderStage::Vertex),
        Err(GenerateError::MissingEntryPoint(ShaderStage::Vertex))
    ));
}

fn fog_settings_descriptor() -> &'static TypeDescriptor {
    static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
    DESC.get_or_init(|| TypeDescriptor {
        name: "Fog",
        base: None,
        kind: TypeKind::Struct,
        members: vec![MemberDescriptor::new("Density", "Float", None)],
        methods: Vec::new(),
    })
}

struct TintedOverlay;

impl ShaderNode for TintedOverlay {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "TintedOverlay",
            base: None,
            kind: TypeKind::Struct,
            members: vec![MemberDescriptor::new(
                "Tint",
                "Float4",
                Some(ResourceKind::ConstantBuffer),
            )],
            methods: vec![MethodDescriptor::entry(
                "MainPS",
                ShaderStage::Pixel,
                "Float4 MainPS(Float2 uv) { Float4 Fog = Tint * 0.5f; return Fog.x * Tint; }",
            )],
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

/// A local that shadows a registered type name is not a reference to the
/// type, so the shadowed type is not declared in the output
#[test]
fn check_shadowed_type_name_is_not_collected() {
    let overlay = TintedOverlay;
    let context = context_with(&[overlay.descriptor(), fog_settings_descriptor()]);

    check_generated(
        &overlay,
        &context,
        "\
cbuffer TintBuffer : register(b0)
{
    float4 Tint;
}

float4 MainPS(float2 uv)
{
    float4 Fog = Tint * 0.5;
    return Fog.x * Tint;
}
",
    );
}

fn light_rig_descriptor() -> &'static TypeDescriptor {
    static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
    DESC.get_or_init(|| TypeDescriptor {
        name: "LightRig",
        base: None,
        kind: TypeKind::Struct,
        members: vec![
            MemberDescriptor::new("Shadow", "Texture2D", None),
            MemberDescriptor::new("ShadowSampler", "SamplerState", None),
        ],
        methods: Vec::new(),
    })
}

struct DeferredEffect;

impl ShaderNode for DeferredEffect {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "DeferredEffect",
            base: None,
            kind: TypeKind::Struct,
            members: vec![
                MemberDescriptor::new("Albedo", "Texture2D", None),
                MemberDescriptor::new("Lights", "LightRig", Some(ResourceKind::StaticResource)),
            ],
            methods: vec![MethodDescriptor::entry(
                "MainPS",
                ShaderStage::Pixel,
                "Float4 MainPS(Float2 uv) { return Albedo.Sample(Lights.ShadowSampler, uv); }",
            )],
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

/// A static composite flattens into synthetic resource declarations with an
/// aggregate initializer, sharing the texture register space with direct
/// texture members
#[test]
fn check_static_composite_flattening() {
    let effect = DeferredEffect;
    let context = context_with(&[effect.descriptor(), light_rig_descriptor()]);

    check_generated(
        &effect,
        &context,
        "\
struct LightRig
{
    Texture2D Shadow;
    SamplerState ShadowSampler;
};

Texture2D Albedo : register(t0);
Texture2D Lights_Shadow : register(t1);
SamplerState Lights_ShadowSampler : register(s0);
static LightRig Lights = { Lights_Shadow, Lights_ShadowSampler };

float4 MainPS(float2 uv)
{
    return Albedo.Sample(Lights.ShadowSampler, uv);
}
",
    );
}

fn blend_mode_descriptor() -> &'static TypeDescriptor {
    static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
    DESC.get_or_init(|| TypeDescriptor {
        name: "BlendMode",
        base: None,
        kind: TypeKind::Enum(vec!["Opaque", "Transparent"]),
        members: Vec::new(),
        methods: Vec::new(),
    })
}

struct BlendedEffect;

impl ShaderNode for BlendedEffect {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "BlendedEffect",
            base: None,
            kind: TypeKind::Struct,
            members: Vec::new(),
            methods: vec![MethodDescriptor::helper(
                "ChooseMode",
                "Int ChooseMode() { Int mode = BlendMode.Opaque; return mode; }",
            )],
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

/// Enum access through the type name becomes a scoped value access
#[test]
fn check_enum_scoped_access() {
    let effect = BlendedEffect;
    let context = context_with(&[effect.descriptor(), blend_mode_descriptor()]);

    check_generated(
        &effect,
        &context,
        "\
enum BlendMode
{
    Opaque = 0,
    Transparent = 1,
};

int ChooseMode()
{
    int mode = BlendMode::Opaque;
    return mode;
}
",
    );
}

struct TextureSpread;

impl ShaderNode for TextureSpread {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "TextureSpread",
            base: None,
            kind: TypeKind::Struct,
            members: vec![
                MemberDescriptor::new("Diffuse", "Texture2D", None),
                MemberDescriptor::new("Environment", "TextureCube", None),
                MemberDescriptor::new("Decals", "Texture2DArray", None),
                MemberDescriptor::new("Linear", "SamplerState", None),
                MemberDescriptor::new("Point", "SamplerState", None),
            ],
            methods: Vec::new(),
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

/// Every texture kind draws from one register space while samplers count
/// independently
#[test]
fn check_texture_kinds_share_slots() {
    let spread = TextureSpread;
    let context = context_with(&[spread.descriptor()]);

    check_generated(
        &spread,
        &context,
        "\
Texture2D Diffuse : register(t0);
TextureCube Environment : register(t1);
Texture2DArray Decals : register(t2);
SamplerState Linear : register(s0);
SamplerState Point : register(s1);
",
    );
}

struct BrokenMaterial;

impl ShaderNode for BrokenMaterial {
    fn descriptor(&self) -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "BrokenMaterial",
            base: None,
            kind: TypeKind::Struct,
            members: vec![MemberDescriptor::new(
                "Rotation",
                "Quaternion",
                Some(ResourceKind::ConstantBuffer),
            )],
            methods: Vec::new(),
        })
    }

    fn member(&self, _name: &str) -> MemberValue {
        MemberValue::Data
    }
}

#[test]
fn check_unsupported_member_type_fails() {
    let material = BrokenMaterial;
    let context = context_with(&[material.descriptor()]);

    match generate(&material, &context) {
        Err(GenerateError::UnsupportedResourceKind {
            shader_type,
            member,
            member_type,
        }) => {
            assert_eq!(shader_type, "BrokenMaterial");
            assert_eq!(member, "Rotation");
            assert_eq!(member_type, "Quaternion");
        }
        Ok(_) => panic!("generation accepted an unresolvable member"),
        Err(err) => panic!("{}", err),
    }
}

#[test]
fn check_repeated_generation_is_identical() {
    let material = FlatMaterial;
    let context = context_with(&[material.descriptor()]);

    let first = generate(&material, &context).unwrap();
    let second = generate(&material, &context).unwrap();
    assert_eq!(first.source(), second.source());
    assert_eq!(first.entry_points(), second.entry_points());
}

use pretty_assertions::assert_eq;
use shadegen::*;

fn context_for(descriptors: &[&'static TypeDescriptor]) -> ShaderCompilationContext {
    let mut registry = DescriptorRegistry::new();
    for descriptor in descriptors {
        registry.register(descriptor);
    }
    ShaderCompilationContext::new(registry, Box::new(DslMethodBodyProvider))
}

const SPRITE_PS: &str =
    "Float4 MainPS(Float2 uv) { return Albedo.Sample(AlbedoSampler, uv) * Tint; }";

#[derive(ShaderNode, Default)]
#[shader(method(name = "MainPS", stage = "pixel", source = SPRITE_PS))]
#[allow(non_snake_case)]
struct SpriteMaterial {
    #[shader(constant_buffer)]
    Tint: Float4,
    Albedo: Texture2D,
    AlbedoSampler: SamplerState,
}

#[test]
fn compile_sprite_material() {
    let material = SpriteMaterial::default();
    let context = context_for(&[SpriteMaterial::type_descriptor()]);

    let compiled = compile(
        CompileArgs::new(&material, &context).stages(&[ShaderStage::Pixel]),
    )
    .unwrap();

    assert_eq!(
        compiled.source,
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
"
    );

    assert_eq!(compiled.stages.len(), 1);
    assert_eq!(compiled.stages[0].stage, ShaderStage::Pixel);
    assert_eq!(compiled.stages[0].entry_point, "MainPS");
}

#[test]
fn compile_fails_for_missing_stage() {
    let material = SpriteMaterial::default();
    let context = context_for(&[SpriteMaterial::type_descriptor()]);

    let result = compile(
        CompileArgs::new(&material, &context).stages(&[ShaderStage::Compute]),
    );
    assert!(matches!(
        result,
        Err(CompileError::Generate(GenerateError::MissingEntryPoint(
            ShaderStage::Compute
        )))
    ));
}

const FADE_BODY: &str = "Float4 MainPS() { Float4 result = Tint; }";
const GLOW_BODY: &str = "Float4 MainPS() { return result + Glow; }";

#[derive(ShaderNode, Default)]
#[shader(method(name = "MainPS", source = FADE_BODY))]
#[allow(non_snake_case)]
struct FadeEffect {
    #[shader(constant_buffer)]
    Tint: Float4,
}

#[derive(ShaderNode, Default)]
#[shader(base = FadeEffect, method(name = "MainPS", stage = "pixel", source = GLOW_BODY))]
#[allow(non_snake_case)]
struct GlowEffect {
    #[shader(constant_buffer)]
    Glow: Float4,
}

/// A derived effect extends the body it overrides and binds its base
/// members first
#[test]
fn compile_derived_effect() {
    let effect = GlowEffect::default();
    let context = context_for(&[
        GlowEffect::type_descriptor(),
        FadeEffect::type_descriptor(),
    ]);

    let compiled = compile(
        CompileArgs::new(&effect, &context).stages(&[ShaderStage::Pixel]),
    )
    .unwrap();

    assert_eq!(
        compiled.source,
        "\
cbuffer TintBuffer : register(b0)
{
    float4 Tint;
}

cbuffer GlowBuffer : register(b1)
{
    float4 Glow;
}

float4 MainPS()
{
    float4 result = Tint;
    return result + Glow;
}
"
    );
}

const LIT_PS: &str = "Float4 MainPS(Float2 uv) {
    Float shadow = Shadows.Map.Sample(Shadows.MapSampler, uv).x;
    return Albedo.Sample(AlbedoSampler, uv) * shadow;
}";

#[derive(ShaderNode, Default)]
#[allow(non_snake_case)]
struct ShadowRig {
    Map: Texture2D,
    MapSampler: SamplerState,
}

#[derive(ShaderNode, Default)]
#[shader(method(name = "MainPS", stage = "pixel", source = LIT_PS))]
#[allow(non_snake_case)]
struct LitMaterial {
    Albedo: Texture2D,
    AlbedoSampler: SamplerState,
    #[shader(static_resource)]
    Shadows: ShadowRig,
}

/// A static resource member resolves through the live nested node without
/// any registry entry for its type
#[test]
fn compile_static_resource_graph() {
    let material = LitMaterial::default();
    let context = context_for(&[LitMaterial::type_descriptor()]);

    let compiled = compile(
        CompileArgs::new(&material, &context).stages(&[ShaderStage::Pixel]),
    )
    .unwrap();

    assert_eq!(
        compiled.source,
        "\
struct ShadowRig
{
    Texture2D Map;
    SamplerState MapSampler;
};

Texture2D Albedo : register(t0);
SamplerState AlbedoSampler : register(s0);
Texture2D Shadows_Map : register(t1);
SamplerState Shadows_MapSampler : register(s1);
static ShadowRig Shadows = { Shadows_Map, Shadows_MapSampler };

float4 MainPS(float2 uv)
{
    float shadow = Shadows.Map.Sample(Shadows.MapSampler, uv).x;
    return Albedo.Sample(AlbedoSampler, uv) * shadow;
}
"
    );
}

const SPRITE_VS: &str = "SpriteVertexOutput MainVS(SpriteVertex input) {
    SpriteVertexOutput output = new SpriteVertexOutput();
    output.Position = new Float4(input.Position, 1.0f);
    output.Uv = input.Uv;
    return output;
}";
const TINT_PS: &str = "Float4 MainPS(SpriteVertexOutput input) { return Tint; }";

#[derive(ShaderNode, Default)]
#[allow(non_snake_case)]
struct SpriteVertex {
    #[shader(semantic = "position")]
    Position: Float3,
    #[shader(semantic = "texcoord")]
    Uv: Float2,
}

#[derive(ShaderNode, Default)]
#[allow(non_snake_case)]
struct SpriteVertexOutput {
    #[shader(semantic = "sv_position")]
    Position: Float4,
    #[shader(semantic = "texcoord")]
    Uv: Float2,
}

#[derive(ShaderNode, Default)]
#[shader(
    method(name = "MainVS", stage = "vertex", source = SPRITE_VS),
    method(name = "MainPS", stage = "pixel", source = TINT_PS)
)]
#[allow(non_snake_case)]
struct SpriteEffect {
    #[shader(constant_buffer)]
    Tint: Float4,
}

#[test]
fn compile_full_sprite_pipeline() {
    let effect = SpriteEffect::default();
    let context = context_for(&[
        SpriteEffect::type_descriptor(),
        SpriteVertex::type_descriptor(),
        SpriteVertexOutput::type_descriptor(),
    ]);

    let compiled = compile(
        CompileArgs::new(&effect, &context).stages(&[ShaderStage::Vertex, ShaderStage::Pixel]),
    )
    .unwrap();

    assert_eq!(
        compiled.source,
        "\
struct SpriteVertexOutput
{
    float4 Position : SV_Position;
    float2 Uv : TEXCOORD0;
};

struct SpriteVertex
{
    float3 Position : POSITION0;
    float2 Uv : TEXCOORD0;
};

cbuffer TintBuffer : register(b0)
{
    float4 Tint;
}

SpriteVertexOutput MainVS(SpriteVertex input)
{
    SpriteVertexOutput output = (SpriteVertexOutput)0;
    output.Position = float4(input.Position, 1.0);
    output.Uv = input.Uv;
    return output;
}

float4 MainPS(SpriteVertexOutput input)
{
    return Tint;
}
"
    );

    assert_eq!(compiled.stages[0].entry_point, "MainVS");
    assert_eq!(compiled.stages[1].entry_point, "MainPS");
}

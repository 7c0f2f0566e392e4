//! Marker value types for shader graph members
//!
//! Material structs declare their fields with these so the derive can record
//! the member type names the classification tables understand. The values
//! themselves carry no data the generator reads - binding is by declaration
//! order, not by contents.

/// 32 bit float scalar
pub type Float = f32;

/// 32 bit signed integer scalar
pub type Int = i32;

/// 32 bit unsigned integer scalar
pub type UInt = u32;

/// Boolean value
pub type Bool = bool;

/// 64 bit float scalar
pub type Double = f64;

#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Float2(pub f32, pub f32);

#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Float3(pub f32, pub f32, pub f32);

#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Float4(pub f32, pub f32, pub f32, pub f32);

/// 3x3 float matrix
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Float3x3(pub [[f32; 3]; 3]);

/// 4x4 float matrix
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Float4x4(pub [[f32; 4]; 4]);

/// Opaque handle to a 2d texture resource
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Texture2D(pub u32);

/// Opaque handle to a 2d texture array resource
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Texture2DArray(pub u32);

/// Opaque handle to a cube texture resource
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct TextureCube(pub u32);

/// Opaque handle to a sampler state object
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct SamplerState(pub u32);

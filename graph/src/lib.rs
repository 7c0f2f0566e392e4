//! # Shadegen - Shader Object Graph
//!
//! The graph library contains the definitions for describing a shader object
//! graph: type descriptors with ordered members and methods, the resource
//! classification tags attached to them, and the [ShaderNode] trait that
//! lets a generation pass walk live instances.
//!
//! Descriptors stand in for runtime reflection. They are either written by
//! hand or generated with the `ShaderNode` derive from `shadegen-derive`.

mod descriptors;
mod node;
mod registry;
mod values;

pub use descriptors::*;
pub use node::*;
pub use registry::*;
pub use values::*;

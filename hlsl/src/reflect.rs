//! Member reflection over type descriptors
//!
//! Produces the ordered, classified member view the collector and emitter
//! traverse. Base type members order before derived type members so
//! dependent declarations always emit before their first use.

use crate::names;
use shadegen_graph::{
    MemberDescriptor, MemberValue, MethodDescriptor, ResourceKind, ShaderNode, ShaderStage,
    TypeDescriptor,
};

/// A member together with its resolved type and classification
pub struct ClassifiedMember<'a> {
    /// The member as declared
    pub member: &'static MemberDescriptor,

    /// Resolved classification, or None for plain data excluded from
    /// traversal
    pub kind: Option<ResourceKind>,

    /// Resolved host type name - the runtime type of the current value when
    /// one is present, the declared type otherwise
    pub type_name: String,

    /// The member's current value when it is itself a graph node
    pub node: Option<&'a dyn ShaderNode>,
}

/// Get the inheritance chain of a descriptor, most base type first
pub fn base_chain(descriptor: &'static TypeDescriptor) -> Vec<&'static TypeDescriptor> {
    let mut chain = Vec::new();
    let mut current = Some(descriptor);
    while let Some(descriptor) = current {
        chain.push(descriptor);
        current = descriptor.base_descriptor();
    }
    chain.reverse();
    chain
}

/// Resolve the classification of a member
///
/// An authoritative member annotation wins over the member type's default
/// classification. A non-authoritative annotation only applies when the type
/// has no default of its own.
pub fn classify(member: &MemberDescriptor) -> Option<ResourceKind> {
    let type_default = names::default_resource_kind(member.type_name);
    if member.authoritative {
        member.kind.or(type_default)
    } else {
        type_default.or(member.kind)
    }
}

/// Produce the ordered classified members of a type
///
/// Members of base types come first, in declared order within each type.
/// Member values are read from the instance when one is available so the
/// runtime type of polymorphic members takes precedence; a missing value
/// falls back to the declared type.
pub fn classify_members<'a>(
    descriptor: &'static TypeDescriptor,
    instance: Option<&'a dyn ShaderNode>,
) -> Vec<ClassifiedMember<'a>> {
    let mut members = Vec::new();
    for ty in base_chain(descriptor) {
        for member in &ty.members {
            let kind = classify(member);

            let value = match instance {
                Some(instance) => instance.member(member.name),
                None => MemberValue::Missing,
            };
            let (type_name, node) = match value {
                MemberValue::Node(node) => (node.descriptor().name.to_string(), Some(node)),
                MemberValue::Data | MemberValue::Missing => (member.type_name.to_string(), None),
            };

            members.push(ClassifiedMember {
                member,
                kind,
                type_name,
                node,
            });
        }
    }
    members
}

/// A method name with its full override chain, most base declaration first
pub struct MethodChainDesc {
    pub name: &'static str,
    pub stage: Option<ShaderStage>,
    pub overrides: Vec<(&'static str, &'static MethodDescriptor)>,
}

/// Group the methods of a type into override chains
///
/// Chains are ordered by the declaration order of their most base
/// declaration; a stage annotation on a more derived override replaces the
/// base annotation.
pub fn method_chains(descriptor: &'static TypeDescriptor) -> Vec<MethodChainDesc> {
    let mut chains: Vec<MethodChainDesc> = Vec::new();
    for ty in base_chain(descriptor) {
        for method in &ty.methods {
            match chains.iter_mut().find(|c| c.name == method.name) {
                Some(chain) => {
                    chain.overrides.push((ty.name, method));
                    if method.stage.is_some() {
                        chain.stage = method.stage;
                    }
                }
                None => chains.push(MethodChainDesc {
                    name: method.name,
                    stage: method.stage,
                    overrides: vec![(ty.name, method)],
                }),
            }
        }
    }
    chains
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadegen_graph::TypeKind;
    use std::sync::OnceLock;

    fn base_descriptor() -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "Base",
            base: None,
            kind: TypeKind::Struct,
            members: vec![MemberDescriptor::new(
                "BaseColor",
                "Float4",
                Some(ResourceKind::ConstantBuffer),
            )],
            methods: vec![MethodDescriptor::helper("Run", "Void Run() { }")],
        })
    }

    fn derived_descriptor() -> &'static TypeDescriptor {
        static DESC: OnceLock<TypeDescriptor> = OnceLock::new();
        DESC.get_or_init(|| TypeDescriptor {
            name: "Derived",
            base: Some(base_descriptor),
            kind: TypeKind::Struct,
            members: vec![MemberDescriptor::new("Albedo", "Texture2D", None)],
            methods: vec![MethodDescriptor::entry(
                "Run",
                ShaderStage::Pixel,
                "Void Run() { }",
            )],
        })
    }

    #[test]
    fn base_members_order_first() {
        let members = classify_members(derived_descriptor(), None);
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].member.name, "BaseColor");
        assert_eq!(members[0].kind, Some(ResourceKind::ConstantBuffer));
        assert_eq!(members[1].member.name, "Albedo");
        assert_eq!(members[1].kind, Some(ResourceKind::Texture2D));
    }

    #[test]
    fn override_chain_orders_base_first() {
        let chains = method_chains(derived_descriptor());
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].name, "Run");
        assert_eq!(chains[0].stage, Some(ShaderStage::Pixel));
        assert_eq!(chains[0].overrides.len(), 2);
        assert_eq!(chains[0].overrides[0].0, "Base");
        assert_eq!(chains[0].overrides[1].0, "Derived");
    }

    #[test]
    fn weak_annotation_defers_to_type_default() {
        let weak = MemberDescriptor {
            name: "Map",
            type_name: "TextureCube",
            kind: Some(ResourceKind::Texture2D),
            authoritative: false,
        };
        assert_eq!(classify(&weak), Some(ResourceKind::TextureCube));

        let strong = MemberDescriptor::new("Map", "TextureCube", Some(ResourceKind::Texture2D));
        assert_eq!(classify(&strong), Some(ResourceKind::Texture2D));
    }
}

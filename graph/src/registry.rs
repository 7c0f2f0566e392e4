use crate::TypeDescriptor;

/// Explicit name to descriptor table standing in for runtime reflection
///
/// Built by the caller at startup with every type that may be reached from a
/// shader object graph. Lookups during a generation pass resolve type names
/// found in member declarations and method bodies.
#[derive(Default)]
pub struct DescriptorRegistry {
    entries: Vec<&'static TypeDescriptor>,
}

impl DescriptorRegistry {
    /// Create an empty registry
    pub fn new() -> DescriptorRegistry {
        DescriptorRegistry::default()
    }

    /// Register a descriptor
    ///
    /// Registering the same type name twice keeps the first registration.
    pub fn register(&mut self, descriptor: &'static TypeDescriptor) {
        if self.find(descriptor.name).is_none() {
            self.entries.push(descriptor);
        }
    }

    /// Find a descriptor by type name
    pub fn find(&self, name: &str) -> Option<&'static TypeDescriptor> {
        self.entries.iter().find(|d| d.name == name).copied()
    }

    /// Iterate registered descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &'static TypeDescriptor> + '_ {
        self.entries.iter().copied()
    }
}

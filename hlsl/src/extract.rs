//! Method body extraction and caching
//!
//! Bodies are produced by an injected [MethodBodyProvider] and memoized per
//! method identity. The cache is shared between generation passes running on
//! different threads: hits are served under a read lock while population of
//! a missing entry is serialized under the write lock so a body is never
//! produced twice.

use crate::reflect::MethodChainDesc;
use crate::{GenerateError, ShaderCompilationContext};
use shadegen_ast::FunctionDefinition;
use shadegen_graph::MethodDescriptor;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Capability that turns a method declaration into a statement tree
///
/// The default implementation parses the DSL source attached to the method
/// descriptor; tests may substitute providers that build trees directly.
pub trait MethodBodyProvider: Send + Sync {
    fn method_body(
        &self,
        type_name: &str,
        method: &MethodDescriptor,
    ) -> Result<FunctionDefinition, MethodBodyError>;
}

/// Error result when a method body provider fails
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MethodBodyError(pub String);

/// Memoized method bodies keyed by (type name, method name)
///
/// Entries are never invalidated: descriptors are immutable for the life of
/// the process, and a failed generation pass leaves the cache intact.
#[derive(Default)]
pub struct MethodSyntaxCache {
    entries: RwLock<HashMap<(String, String), Arc<FunctionDefinition>>>,
}

impl MethodSyntaxCache {
    pub fn new() -> MethodSyntaxCache {
        MethodSyntaxCache::default()
    }

    /// Get the body for a method, extracting it at most once per identity
    pub fn get_or_extract(
        &self,
        type_name: &str,
        method: &MethodDescriptor,
        provider: &dyn MethodBodyProvider,
    ) -> Result<Arc<FunctionDefinition>, MethodBodyError> {
        let key = (type_name.to_string(), method.name.to_string());

        {
            let entries = self.entries.read().unwrap();
            if let Some(found) = entries.get(&key) {
                return Ok(Arc::clone(found));
            }
        }

        let mut entries = self.entries.write().unwrap();
        // Another pass may have populated the entry while we waited
        if let Some(found) = entries.get(&key) {
            return Ok(Arc::clone(found));
        }

        let body = provider.method_body(type_name, method)?;
        if body.name != method.name {
            return Err(MethodBodyError(format!(
                "provider returned body for '{}' when '{}' was requested",
                body.name, method.name
            )));
        }

        let body = Arc::new(body);
        entries.insert(key, Arc::clone(&body));
        Ok(body)
    }
}

/// Extract every body in an override chain, most base type first
pub fn extract_chain(
    chain: &MethodChainDesc,
    context: &ShaderCompilationContext,
) -> Result<Vec<Arc<FunctionDefinition>>, GenerateError> {
    let mut bodies = Vec::with_capacity(chain.overrides.len());
    for (owner, method) in &chain.overrides {
        match context
            .cache()
            .get_or_extract(owner, method, context.provider())
        {
            Ok(body) => bodies.push(body),
            Err(err) => {
                return Err(GenerateError::MethodResolution {
                    shader_type: owner.to_string(),
                    method: method.name.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }
    Ok(bodies)
}

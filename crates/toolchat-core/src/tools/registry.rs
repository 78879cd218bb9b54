//! Tool registry and merged catalog

use std::collections::HashMap;
use std::sync::Arc;

use crate::logging::Logger;
use crate::types::{ArgMap, ToolSpec};

use super::builtin::{CurrentWeather, Lcm, SumTwoNumbers};
use super::local::{LocalTool, ToolError};

/// Namespace prefix under which remote tools are advertised to the
/// model. It exists only as the wire name: dispatch goes through the
/// catalog's origin tags, never through prefix parsing.
pub const REMOTE_TOOL_PREFIX: &str = "remote_";

/// Where a catalog entry dispatches to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOrigin {
    /// A handler in the local dispatch table
    Local,
    /// A tool served by the remote provider, under its original name
    Remote { name: String },
}

/// One advertised tool with its dispatch tag
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub spec: ToolSpec,
    pub origin: ToolOrigin,
}

/// The merged, namespaced tool list advertised for one conversation
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    entries: Vec<CatalogEntry>,
}

impl ToolCatalog {
    /// Descriptors in advertisement order
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.entries.iter().map(|e| e.spec.clone()).collect()
    }

    /// Resolve an advertised name to its dispatch tag
    pub fn resolve(&self, name: &str) -> Option<&ToolOrigin> {
        self.entries
            .iter()
            .find(|e| e.spec.name == name)
            .map(|e| &e.origin)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

/// Registry of local tools plus the catalog-merge step
pub struct ToolRegistry {
    /// Registration order, preserved in the catalog
    local: Vec<Arc<dyn LocalTool>>,
    /// Dispatch table
    by_name: HashMap<String, Arc<dyn LocalTool>>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            local: Vec::new(),
            by_name: HashMap::new(),
            logger,
        }
    }

    /// Create a registry pre-loaded with the built-in tools
    pub fn with_builtins(logger: Arc<dyn Logger>) -> Self {
        let mut registry = Self::new(logger);
        registry.register(Arc::new(CurrentWeather));
        registry.register(Arc::new(SumTwoNumbers));
        registry.register(Arc::new(Lcm));
        registry
    }

    /// Register a local tool; a duplicate name replaces the handler
    pub fn register(&mut self, tool: Arc<dyn LocalTool>) {
        let name = tool.spec().name;
        if self.by_name.insert(name.clone(), Arc::clone(&tool)).is_some() {
            self.logger
                .warn(&format!("[ToolRegistry] Replacing local tool '{name}'"));
            self.local.retain(|t| t.spec().name != name);
        }
        self.local.push(tool);
    }

    /// Number of registered local tools
    pub fn local_count(&self) -> usize {
        self.local.len()
    }

    /// Merge local descriptors with a discovered remote catalog.
    ///
    /// Pure over its inputs: local descriptors in registration order,
    /// then remote descriptors namespaced with [`REMOTE_TOOL_PREFIX`].
    /// An absent remote catalog (provider unreachable) yields the local
    /// subset only.
    pub fn catalog(&self, remote: Option<&[ToolSpec]>) -> ToolCatalog {
        let mut entries: Vec<CatalogEntry> = self
            .local
            .iter()
            .map(|tool| CatalogEntry {
                spec: tool.spec(),
                origin: ToolOrigin::Local,
            })
            .collect();

        if let Some(remote) = remote {
            for spec in remote {
                entries.push(CatalogEntry {
                    spec: ToolSpec {
                        name: format!("{REMOTE_TOOL_PREFIX}{}", spec.name),
                        description: spec.description.clone(),
                        parameters: spec.parameters.clone(),
                    },
                    origin: ToolOrigin::Remote {
                        name: spec.name.clone(),
                    },
                });
            }
        }

        ToolCatalog { entries }
    }

    /// Execute a local tool from the dispatch table
    pub async fn call_local(&self, name: &str, args: &ArgMap) -> Result<String, ToolError> {
        match self.by_name.get(name) {
            Some(tool) => {
                self.logger
                    .info(&format!("[ToolRegistry] Calling local tool: {name}"));
                tool.call(args).await
            }
            None => Err(ToolError::Failed(format!(
                "no local handler registered for '{name}'"
            ))),
        }
    }
}

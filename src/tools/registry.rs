use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::error::GatewayError;
use crate::core::tool::{Tool, ToolDescriptor};
use crate::infra::gateway::SearchGateway;
use crate::tools::search::SearchTool;

/// Name-gated tool table. Built once at startup and shared read-only.
#[derive(Clone)]
pub struct Registry {
    by_name: Arc<BTreeMap<&'static str, Arc<dyn Tool>>>,
}

impl Registry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let map = iter.into_iter().map(|t| (t.name(), t)).collect();
        Self { by_name: Arc::new(map) }
    }

    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.by_name.values().map(|t| t.descriptor()).collect()
    }

    /// The tool name is checked before the arguments are looked at.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Tool>, GatewayError> {
        self.by_name
            .get(name)
            .ok_or_else(|| GatewayError::UnknownTool(name.to_string()))
    }
}

pub fn build_registry(gateway: Arc<dyn SearchGateway>) -> Registry {
    let search: Arc<dyn Tool> = Arc::new(SearchTool::new(gateway));
    Registry::with_tools([search])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SearchOptions, SearchResult};
    use crate::infra::gateway::FnGateway;

    fn registry() -> Registry {
        build_registry(Arc::new(FnGateway::new(|_o: SearchOptions| async move {
            Ok(SearchResult::default())
        })))
    }

    #[test]
    fn lists_the_search_tool() {
        let metas = registry().list();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].name, "search");
        assert_eq!(metas[0].input_schema["required"][0], "query");
    }

    #[test]
    fn unknown_tool_is_method_not_found() {
        let reg = registry();
        let err = reg.get("translate").err().unwrap();
        assert_eq!(err.code(), -32601);
        assert_eq!(err.to_string(), "Unknown tool: translate");
    }
}

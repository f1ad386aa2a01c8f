use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use tracing::debug;

use super::types::{ToolEntry, ToolHandler, ToolResult, ToolSchema};
use crate::error::ToolError;

#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, ToolEntry>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str, handler: ToolHandler, mut schema: ToolSchema) -> Result<(), ToolError> {
        if name.trim().is_empty() {
            return Err(ToolError::InvalidName);
        }
        if schema.name.is_empty() {
            schema.name = name.to_string();
        }
        if schema.name != name {
            return Err(ToolError::SchemaMismatch {
                name: name.to_string(),
                schema: schema.name,
            });
        }

        let mut map = self.tools.write().map_err(|_| ToolError::Lock)?;
        if map.contains_key(name) {
            return Err(ToolError::Duplicate(name.to_string()));
        }
        map.insert(name.to_string(), ToolEntry { handler, schema });
        debug!(tool = name, "registered tool");
        Ok(())
    }

    pub fn execute(&self, name: &str, args: Value) -> ToolResult {
        let map = match self.tools.read() {
            Ok(lock) => lock,
            Err(_) => return ToolResult::failed("lock error"),
        };

        let entry = match map.get(name) {
            Some(entry) => entry,
            None => return ToolResult::failed(format!("tool not found: {}", name)),
        };

        match (entry.handler)(args) {
            Ok(output) => ToolResult::ok(output),
            Err(err) => ToolResult::failed(err),
        }
    }

    /// Schemas ordered by name so request payloads are stable.
    pub fn get_schemas(&self) -> Vec<ToolSchema> {
        let map = match self.tools.read() {
            Ok(lock) => lock,
            Err(_) => return vec![],
        };
        let mut schemas: Vec<ToolSchema> = map.values().map(|entry| entry.schema.clone()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.read().map(|map| map.contains_key(name)).unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.tools.read().map(|map| map.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    fn schema(name: &str) -> ToolSchema {
        ToolSchema {
            name: name.to_string(),
            description: String::new(),
            parameters: None,
        }
    }

    fn echo() -> ToolHandler {
        Arc::new(|args: Value| Ok(args))
    }

    #[test]
    fn fills_in_blank_schema_name() {
        let registry = ToolRegistry::new();
        registry.register("echo", echo(), schema("")).unwrap();
        assert!(registry.has("echo"));
        assert_eq!(registry.get_schemas()[0].name, "echo");
    }

    #[test]
    fn rejects_invalid_registrations() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.register("", echo(), schema("")), Err(ToolError::InvalidName));
        assert!(matches!(
            registry.register("echo", echo(), schema("other")),
            Err(ToolError::SchemaMismatch { .. })
        ));
        registry.register("echo", echo(), schema("echo")).unwrap();
        assert_eq!(
            registry.register("echo", echo(), schema("echo")),
            Err(ToolError::Duplicate("echo".to_string()))
        );
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn executes_handlers_and_reports_failures() {
        let registry = ToolRegistry::new();
        registry.register("echo", echo(), schema("echo")).unwrap();
        registry
            .register("boom", Arc::new(|_: Value| Err("exploded".to_string())), schema("boom"))
            .unwrap();

        let ok = registry.execute("echo", json!({"x": 1}));
        assert!(ok.success);
        assert_eq!(ok.output, Some(json!({"x": 1})));

        let failed = registry.execute("boom", json!({}));
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("exploded"));

        let missing = registry.execute("nope", json!({}));
        assert!(!missing.success);
        assert_eq!(missing.error.as_deref(), Some("tool not found: nope"));
    }

    #[test]
    fn schemas_are_sorted() {
        let registry = ToolRegistry::new();
        registry.register("zeta", echo(), schema("zeta")).unwrap();
        registry.register("alpha", echo(), schema("alpha")).unwrap();
        let names: Vec<String> = registry.get_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}

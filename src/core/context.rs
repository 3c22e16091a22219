use crate::core::Resource;
use crate::utils::error::{MolluskError, Result};
use std::collections::HashMap;
use std::sync::Arc;

pub const APP_NAME: &str = "myApp";
pub const MOLLUSKS: &str = "Mollusks";

/// Explicit application context, built once at startup and passed to controllers.
#[derive(Clone)]
pub struct AppContext {
    name: String,
    requires: Vec<String>,
    resources: HashMap<String, Arc<dyn Resource>>,
}

impl AppContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: vec!["resource".to_string()],
            resources: HashMap::new(),
        }
    }

    /// `myApp` with the mollusk resource registered under `Mollusks`.
    pub fn with_mollusks(resource: Arc<dyn Resource>) -> Self {
        let mut ctx = Self::new(APP_NAME);
        ctx.register(MOLLUSKS, resource);
        ctx
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    pub fn register(&mut self, name: impl Into<String>, resource: Arc<dyn Resource>) {
        let name = name.into();
        tracing::debug!("Registering resource {} in {}", name, self.name);
        self.resources.insert(name, resource);
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Resource>> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| MolluskError::UnresolvedReference {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.resources.keys().collect();
        names.sort();
        f.debug_struct("AppContext")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("resources", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::HttpResource;
    use crate::core::template::{ParamDefaults, UrlTemplate, DEFAULT_TEMPLATE};
    use std::time::Duration;

    fn offline_resource() -> Arc<dyn Resource> {
        Arc::new(
            HttpResource::new(
                UrlTemplate::parse(DEFAULT_TEMPLATE).unwrap(),
                ParamDefaults::new().with("id", "@id"),
                Duration::from_secs(1),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_with_mollusks_registers_factory() {
        let ctx = AppContext::with_mollusks(offline_resource());
        assert_eq!(ctx.name(), "myApp");
        assert_eq!(ctx.requires(), ["resource".to_string()]);
        assert!(ctx.resolve("Mollusks").is_ok());
    }

    #[test]
    fn test_resolve_unknown_name() {
        let ctx = AppContext::with_mollusks(offline_resource());
        let err = ctx.resolve("Mollusk").err().unwrap();
        assert!(matches!(err, MolluskError::UnresolvedReference { ref name } if name == "Mollusk"));
    }

    #[test]
    fn test_debug_lists_registered_names() {
        let mut ctx = AppContext::new("shellfish");
        ctx.register("Squids", offline_resource());
        ctx.register("Clams", offline_resource());
        let rendered = format!("{:?}", ctx);
        assert!(rendered.contains(r#"resources: ["Clams", "Squids"]"#));
    }
}

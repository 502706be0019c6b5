// File: src/context.rs
// Purpose: Per-render context holding the rule maps published for each root model

use crate::model::ModelType;
use crate::rule_map::RuleMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Default prefix of published context keys
pub const DEFAULT_KEY_PREFIX: &str = "rhtmx_rules";

/// Context passed through one render. Holds the rule maps published for
/// each root model type rendered so far; nothing is shared between renders.
#[derive(Debug, Clone)]
pub struct RenderContext {
    prefix: String,
    maps: HashMap<String, Arc<RuleMap>>,
}

impl RenderContext {
    /// Create an empty context with the default key prefix
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            maps: HashMap::new(),
        }
    }

    /// Key under which the map for `model` is published: `<prefix>_<type name>`
    pub fn context_key(&self, model: ModelType) -> String {
        format!("{}_{}", self.prefix, model.name())
    }

    /// Publish a rule map under an explicit key
    pub fn publish(&mut self, key: impl Into<String>, map: RuleMap) -> Arc<RuleMap> {
        let map = Arc::new(map);
        self.maps.insert(key.into(), Arc::clone(&map));
        map
    }

    /// Publish the rule map for a root model type
    pub fn publish_for(&mut self, model: ModelType, map: RuleMap) -> Arc<RuleMap> {
        let key = self.context_key(model);
        self.publish(key, map)
    }

    /// Look up a published map by key
    pub fn lookup(&self, key: &str) -> Option<&Arc<RuleMap>> {
        self.maps.get(key)
    }

    /// Look up the map published for a root model type
    pub fn lookup_for(&self, model: ModelType) -> Option<&Arc<RuleMap>> {
        self.lookup(&self.context_key(model))
    }

    /// Check if any map has been published
    pub fn has_rules(&self) -> bool {
        !self.maps.is_empty()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, Property};
    use crate::rule_map::FieldPath;
    use crate::wire::{RuleKind, WireRule};

    struct Login;

    impl Model for Login {
        fn properties() -> Vec<Property> {
            vec![Property::of::<String>("User")]
        }
    }

    struct Search;

    impl Model for Search {
        fn properties() -> Vec<Property> {
            vec![Property::of::<String>("Query")]
        }
    }

    fn map_with(path: &str) -> RuleMap {
        let mut map = RuleMap::new();
        map.insert(
            FieldPath::new(path),
            vec![WireRule::new(RuleKind::Required, "This field is required.")],
        );
        map
    }

    #[test]
    fn test_context_key() {
        let context = RenderContext::with_prefix("fv");
        let key = context.context_key(ModelType::of::<Login>());
        assert!(key.starts_with("fv_"));
        assert!(key.ends_with("Login"));
    }

    #[test]
    fn test_distinct_models_do_not_collide() {
        let mut context = RenderContext::new();
        context.publish_for(ModelType::of::<Login>(), map_with("User"));
        context.publish_for(ModelType::of::<Search>(), map_with("Query"));

        let login = context.lookup_for(ModelType::of::<Login>()).unwrap();
        let search = context.lookup_for(ModelType::of::<Search>()).unwrap();
        assert!(login.contains("user"));
        assert!(!login.contains("query"));
        assert!(search.contains("query"));
    }

    #[test]
    fn test_empty_context() {
        let context = RenderContext::new();
        assert!(!context.has_rules());
        assert!(context.lookup_for(ModelType::of::<Login>()).is_none());
        assert!(context.lookup("anything").is_none());
    }
}

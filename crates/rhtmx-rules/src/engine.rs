// File: src/engine.rs
// Purpose: Entry point tying registry, caches, builder and render context together

use crate::attributes::{ContainerAttrs, FieldAttrs};
use crate::builder::RuleMapBuilder;
use crate::cache::{CacheStats, RuleCaches};
use crate::config::RulesConfig;
use crate::context::RenderContext;
use crate::model::{Model, ModelType};
use crate::registry::ValidatorRegistry;
use crate::rule_map::RuleMap;
use std::sync::Arc;

/// Rule extraction engine. Create once per process and share it between
/// renders; the caches it holds live as long as the engine.
///
/// # Example
///
/// ```ignore
/// let engine = RulesEngine::new(Arc::new(registry));
///
/// let mut ctx = engine.new_context();
/// let container = engine.begin_form_for::<Signup>(&mut ctx);
/// let email = engine.field_attrs::<Signup>(&ctx, "Email");
///
/// html! {
///     (PreEscaped(format!("<form {}>", container.render_all())))
///     (email.input("Email", "email"))
///     (PreEscaped("</form>"))
/// }
/// ```
#[derive(Clone)]
pub struct RulesEngine {
    registry: Arc<dyn ValidatorRegistry>,
    caches: Arc<RuleCaches>,
    config: RulesConfig,
}

impl RulesEngine {
    /// Create an engine with fresh caches and default configuration
    pub fn new(registry: Arc<dyn ValidatorRegistry>) -> Self {
        Self {
            registry,
            caches: Arc::new(RuleCaches::new()),
            config: RulesConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing set of caches.
    ///
    /// Cache entries are keyed by model type only, so engines sharing caches
    /// must also share the same registry. An engine over a different registry
    /// would be served the other registry's validators.
    pub fn with_caches(mut self, caches: Arc<RuleCaches>) -> Self {
        self.caches = caches;
        self
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn caches(&self) -> &Arc<RuleCaches> {
        &self.caches
    }

    /// Cache statistics: (validators, descriptors)
    pub fn stats(&self) -> (CacheStats, CacheStats) {
        (
            self.caches.validators.stats(),
            self.caches.descriptors.stats(),
        )
    }

    /// Fresh per-render context using the configured key prefix
    pub fn new_context(&self) -> RenderContext {
        RenderContext::with_prefix(self.config.context_key_prefix.clone())
    }

    /// Build the rule map for a root model type.
    ///
    /// Returns `None` without walking anything when the root has no
    /// validator or its validator cannot describe its rules.
    pub fn rule_map(&self, model: ModelType) -> Option<RuleMap> {
        let Some(descriptor) = self.caches.descriptor_for(&*self.registry, model) else {
            tracing::debug!("No client rules for {}", model);
            return None;
        };

        let map = RuleMapBuilder::new(&*self.registry, &self.caches)
            .with_max_depth(self.config.max_depth)
            .build(&descriptor, model, "");
        tracing::debug!("Built {} client rule entries for {}", map.len(), model);
        Some(map)
    }

    pub fn rule_map_for<T: Model>(&self) -> Option<RuleMap> {
        self.rule_map(ModelType::of::<T>())
    }

    /// Build and publish the rule map for `model` into `ctx`, returning the
    /// attributes for the form container
    pub fn begin_form(&self, model: ModelType, ctx: &mut RenderContext) -> ContainerAttrs {
        match self.rule_map(model) {
            Some(map) => {
                ctx.publish_for(model, map);
                ContainerAttrs::new(self.config.container_marker)
            }
            None => ContainerAttrs::default(),
        }
    }

    pub fn begin_form_for<T: Model>(&self, ctx: &mut RenderContext) -> ContainerAttrs {
        self.begin_form(ModelType::of::<T>(), ctx)
    }

    /// Attributes for the field at `path` inside the form for `model`
    pub fn field_attrs_for(&self, ctx: &RenderContext, model: ModelType, path: &str) -> FieldAttrs {
        FieldAttrs::for_path(ctx.lookup_for(model).map(|map| &**map), path)
    }

    pub fn field_attrs<T: Model>(&self, ctx: &RenderContext, path: &str) -> FieldAttrs {
        self.field_attrs_for(ctx, ModelType::of::<T>(), path)
    }
}

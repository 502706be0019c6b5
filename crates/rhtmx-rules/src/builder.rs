// File: src/builder.rs
// Purpose: Walks a model graph and builds the path -> wire rules map

use crate::cache::RuleCaches;
use crate::classify::classify;
use crate::model::ModelType;
use crate::registry::ValidatorRegistry;
use crate::rule_map::{FieldPath, RuleMap};
use crate::validator::RuleDescriptor;
use crate::wire::WireRule;

/// Default bound on nested expansion
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Builds rule maps for a root model type and everything nested under it.
///
/// Traversal is depth-first and pre-order: a model's own rules are recorded
/// before its complex properties are expanded under their dotted prefix.
/// A complex property whose type is already being expanded higher up the
/// same path is skipped, as is anything deeper than `max_depth` levels.
pub struct RuleMapBuilder<'a> {
    registry: &'a dyn ValidatorRegistry,
    caches: &'a RuleCaches,
    max_depth: usize,
}

impl<'a> RuleMapBuilder<'a> {
    pub fn new(registry: &'a dyn ValidatorRegistry, caches: &'a RuleCaches) -> Self {
        Self {
            registry,
            caches,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the map for `model` from its already-resolved descriptor
    pub fn build(&self, descriptor: &RuleDescriptor, model: ModelType, prefix: &str) -> RuleMap {
        let mut ancestors = vec![model];
        self.build_level(descriptor, model, prefix, &mut ancestors)
    }

    fn build_level(
        &self,
        descriptor: &RuleDescriptor,
        model: ModelType,
        prefix: &str,
        ancestors: &mut Vec<ModelType>,
    ) -> RuleMap {
        let mut map = RuleMap::new();

        for (property, constraints) in descriptor.iter() {
            let rules: Vec<WireRule> = constraints
                .iter()
                .filter_map(|constraint| {
                    let rule = classify(constraint.as_ref());
                    if rule.is_none() {
                        tracing::trace!(
                            "No client rule for {} on {}.{}",
                            constraint.name(),
                            model.short_name(),
                            property
                        );
                    }
                    rule
                })
                .collect();

            if !rules.is_empty() {
                map.insert(FieldPath::join(prefix, property), rules);
            }
        }

        for property in model.properties() {
            let Some(nested) = property.shape.model_type().filter(|_| property.is_complex()) else {
                continue;
            };
            let path = FieldPath::join(prefix, &property.name);

            if ancestors.contains(&nested) {
                tracing::debug!("Not expanding {}: {} is already on this path", path, nested);
                continue;
            }
            if ancestors.len() >= self.max_depth {
                tracing::debug!("Not expanding {}: depth limit {} reached", path, self.max_depth);
                continue;
            }

            let Some(child_descriptor) = self.caches.descriptor_for(self.registry, nested) else {
                continue;
            };

            ancestors.push(nested);
            let child = self.build_level(&child_descriptor, nested, path.as_str(), ancestors);
            ancestors.pop();

            map.merge(child);
        }

        map
    }
}

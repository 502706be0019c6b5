// File: src/cache.rs
// Purpose: Process-wide caches for validator resolution and rule description
// Read-mostly and never evicted. Racing threads may both compute a key; the last insert wins.

use crate::model::ModelType;
use crate::registry::ValidatorRegistry;
use crate::validator::{RuleDescriptor, Validator};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hit/miss counters for a cache
#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Counters {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}

/// Statistics for a rule cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,

    /// Lookups that had to compute
    pub misses: u64,

    /// Number of cached entries
    pub entries: usize,
}

impl CacheStats {
    /// Calculate cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Validator handles keyed by model type.
///
/// Only successful resolutions are stored; a registry miss is asked again on
/// the next call so a validator registered late is still picked up.
#[derive(Default)]
pub struct ValidatorCache {
    entries: DashMap<ModelType, Arc<dyn Validator>>,
    counters: Counters,
}

impl ValidatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the validator for `model`, querying `registry` on a miss
    pub fn resolve(
        &self,
        registry: &dyn ValidatorRegistry,
        model: ModelType,
    ) -> Option<Arc<dyn Validator>> {
        if let Some(handle) = self.entries.get(&model) {
            self.counters.record_hit();
            return Some(Arc::clone(handle.value()));
        }

        self.counters.record_miss();
        match registry.lookup_validator(model) {
            Some(handle) => {
                tracing::debug!("Resolved validator for {}", model);
                self.entries.insert(model, Arc::clone(&handle));
                Some(handle)
            }
            None => {
                tracing::debug!("No validator registered for {}", model);
                None
            }
        }
    }

    pub fn contains(&self, model: ModelType) -> bool {
        self.entries.contains_key(&model)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.entries.len())
    }
}

/// Rule descriptors keyed by validator implementation.
///
/// A validator without the self-description capability is cached as `None`.
/// A description that fails is logged and retried on the next call.
#[derive(Default)]
pub struct DescriptorCache {
    entries: DashMap<TypeId, Option<Arc<RuleDescriptor>>>,
    counters: Counters,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for the implementation behind `handle`
    pub fn describe(&self, handle: &dyn Validator) -> Option<Arc<RuleDescriptor>> {
        let key = handle.implementation();
        if let Some(entry) = self.entries.get(&key) {
            self.counters.record_hit();
            return entry.value().clone();
        }

        self.counters.record_miss();
        let descriptor = match handle.as_describable() {
            None => {
                tracing::debug!("Validator for {} does not describe its rules", handle.model());
                None
            }
            Some(describable) => match describable.describe_rules() {
                Ok(descriptor) => Some(Arc::new(descriptor)),
                Err(e) => {
                    tracing::warn!("Skipping client rules: {}", e);
                    return None;
                }
            },
        };

        self.entries.insert(key, descriptor.clone());
        descriptor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.entries.len())
    }
}

/// The two caches used while building rule maps
#[derive(Default)]
pub struct RuleCaches {
    pub validators: ValidatorCache,
    pub descriptors: DescriptorCache,
}

impl RuleCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve and describe in one step
    pub fn descriptor_for(
        &self,
        registry: &dyn ValidatorRegistry,
        model: ModelType,
    ) -> Option<Arc<RuleDescriptor>> {
        let handle = self.validators.resolve(registry, model)?;
        self.descriptors.describe(&*handle)
    }
}

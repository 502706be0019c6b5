// File: src/registry.rs
// Purpose: Lookup of the validator bound to a model type

use crate::error::RulesError;
use crate::model::{Model, ModelType};
use crate::validator::Validator;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Source of validator instances, usually backed by the application's
/// service container. Lookups must be stable for the life of the process.
pub trait ValidatorRegistry: Send + Sync {
    fn lookup_validator(&self, model: ModelType) -> Option<Arc<dyn Validator>>;
}

/// In-memory registry keyed by model type
#[derive(Default)]
pub struct ServiceRegistry {
    validators: RwLock<HashMap<ModelType, Arc<dyn Validator>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator under its own bound model type
    pub fn register(&self, validator: Arc<dyn Validator>) {
        let model = validator.model();
        tracing::debug!("Registering validator for {}", model);
        // Recover the map from a poisoned lock
        self.validators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(model, validator);
    }

    /// Register a validator for `T`, checking that it is bound to `T`
    pub fn register_for<T: Model>(&self, validator: Arc<dyn Validator>) -> Result<(), RulesError> {
        let expected = ModelType::of::<T>();
        let bound = validator.model();
        if bound != expected {
            return Err(RulesError::ModelMismatch {
                model: expected.name(),
                bound: bound.name(),
            });
        }
        self.register(validator);
        Ok(())
    }

    /// Builder-style registration
    pub fn with(self, validator: Arc<dyn Validator>) -> Self {
        self.register(validator);
        self
    }

    pub fn len(&self) -> usize {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ValidatorRegistry for ServiceRegistry {
    fn lookup_validator(&self, model: ModelType) -> Option<Arc<dyn Validator>> {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&model)
            .cloned()
    }
}

impl<R: ValidatorRegistry + ?Sized> ValidatorRegistry for Arc<R> {
    fn lookup_validator(&self, model: ModelType) -> Option<Arc<dyn Validator>> {
        (**self).lookup_validator(model)
    }
}

// RHTMX Rules - client-side validation rules for server-rendered forms
// Describes a model's validators as data-val attributes; never validates anything itself

// Model description
pub mod model;
pub mod value;
pub mod wire;

// Constraints and validators
pub mod constraint;
pub mod classify;
pub mod validator;
pub mod registry;
pub mod error;

// Rule map construction
pub mod cache;
pub mod rule_map;
pub mod builder;

// Rendering
pub mod context;
pub mod attributes;
pub mod config;
pub mod engine;

// Re-export core types
pub use model::{is_complex, FieldType, Model, ModelType, Property, TypeShape};
pub use value::{ParamValue, Parameters};
pub use wire::{RuleKind, WireRule};
pub use constraint::{Check, CheckRule, CompareOp, Comparison, Constraint, MessageSource};
pub use classify::classify;
pub use validator::{DescribeRules, ModelValidator, RuleBuilder, RuleDescriptor, Validator};
pub use registry::{ServiceRegistry, ValidatorRegistry};
pub use error::{ProbeError, RulesError};

// Re-export framework types
pub use cache::{CacheStats, DescriptorCache, RuleCaches, ValidatorCache};
pub use rule_map::{FieldPath, RuleMap};
pub use builder::RuleMapBuilder;
pub use context::RenderContext;
pub use attributes::{ContainerAttrs, FieldAttrs};
pub use config::RulesConfig;
pub use engine::RulesEngine;

// Re-export Maud for templates
pub use maud::{Markup, PreEscaped, Render};

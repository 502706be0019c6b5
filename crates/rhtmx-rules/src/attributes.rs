// File: src/attributes.rs
// Purpose: data-val attribute generation for rendered form fields

use crate::rule_map::RuleMap;
use crate::wire::WireRule;
use maud::{html, Markup, PreEscaped, Render};

/// Attribute set on a field that carries at least one client rule
pub const HAS_VALIDATION_ATTR: &str = "data-val";

/// Attribute set on a form container whose rule map was built
pub const CONTAINER_ATTR: &str = "data-fluent-validation";

/// Escape a value for use inside a double-quoted attribute
fn escape_attr(value: &str) -> String {
    html! { (value) }.into_string()
}

fn render_pairs(attrs: &[(String, String)]) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_attr(v)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Client validation attributes for a single field, in emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAttrs {
    attrs: Vec<(String, String)>,
}

impl FieldAttrs {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes for the field at `path`, or an empty set when the path has
    /// no rules or no map was published
    pub fn for_path(map: Option<&RuleMap>, path: &str) -> Self {
        map.and_then(|map| map.get(path))
            .map(Self::from_rules)
            .unwrap_or_default()
    }

    /// One `data-val-<kind>` attribute per rule followed by one
    /// `data-val-<kind>-<param>` attribute per parameter
    pub fn from_rules(rules: &[WireRule]) -> Self {
        let mut attrs = Self::new();
        if rules.is_empty() {
            return attrs;
        }

        attrs.push(HAS_VALIDATION_ATTR, "true");
        for rule in rules {
            attrs.push(rule.attribute_name(), rule.message.clone());
            for (name, value) in rule.parameters.iter() {
                attrs.push(rule.parameter_attribute_name(name), value.to_attr_string());
            }
        }
        attrs
    }

    fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }

    /// Whether the field was marked as validated
    pub fn has_validation(&self) -> bool {
        self.get(HAS_VALIDATION_ATTR) == Some("true")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Render all attributes as `name="value"` pairs
    pub fn render_all(&self) -> String {
        render_pairs(&self.attrs)
    }

    /// Render an `<input>` element carrying these attributes
    pub fn input(&self, name: &str, input_type: &str) -> Markup {
        let base = format!(
            "type=\"{}\" id=\"{}\" name=\"{}\"",
            escape_attr(input_type),
            escape_attr(&name.replace('.', "_")),
            escape_attr(name)
        );

        if self.is_empty() {
            PreEscaped(format!("<input {}>", base))
        } else {
            PreEscaped(format!("<input {} {}>", base, self.render_all()))
        }
    }
}

impl Render for FieldAttrs {
    fn render(&self) -> Markup {
        PreEscaped(self.render_all())
    }
}

/// Attributes for the element wrapping a form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerAttrs {
    validated: bool,
}

impl ContainerAttrs {
    pub fn new(validated: bool) -> Self {
        Self { validated }
    }

    /// Whether the rule map for the form was built
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn render_all(&self) -> String {
        if self.validated {
            format!("{}=\"true\"", CONTAINER_ATTR)
        } else {
            String::new()
        }
    }
}

impl Render for ContainerAttrs {
    fn render(&self) -> Markup {
        PreEscaped(self.render_all())
    }
}

// File: src/value.rs
// Purpose: Primitive parameter values attached to wire rules

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Value of a rule parameter (`min`, `max`, `pattern`, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Number(f64),
    Text(String),
    Null,
}

impl ParamValue {
    /// Convert value to the string written into an attribute
    pub fn to_attr_string(&self) -> String {
        self.to_string()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(n) => write!(f, "{}", n),
            ParamValue::Number(n) => {
                // Drop the trailing ".0" on whole numbers
                if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Null => Ok(()),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Integer(n) => serializer.serialize_i64(*n),
            ParamValue::Number(n) => serializer.serialize_f64(*n),
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Null => serializer.serialize_none(),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Integer(n as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(n: usize) -> Self {
        i64::try_from(n)
            .map(ParamValue::Integer)
            .unwrap_or(ParamValue::Number(n as f64))
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

/// Insertion-ordered rule parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameters(Vec<(String, ParamValue)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing an existing one with the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace `{name}` placeholders in a message with parameter values
    pub fn format_message(&self, template: &str) -> String {
        self.iter().fold(template.to_string(), |message, (name, value)| {
            message.replace(&format!("{{{}}}", name), &value.to_string())
        })
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_number_formatting() {
        assert_eq!(ParamValue::Number(18.0).to_string(), "18");
        assert_eq!(ParamValue::Number(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::Integer(-3).to_string(), "-3");
        assert_eq!(ParamValue::Null.to_string(), "");
    }

    #[test]
    fn test_parameters_keep_insertion_order() {
        let params = Parameters::new().with("min", 3).with("max", 20);
        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["min", "max"]);
        assert_eq!(params.get("max"), Some(&ParamValue::Integer(20)));
    }

    #[test]
    fn test_parameters_replace_existing() {
        let params = Parameters::new().with("min", 1).with("min", 5);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("min"), Some(&ParamValue::Integer(5)));
    }

    #[test]
    fn test_format_message() {
        let params = Parameters::new().with("min", 3).with("max", 20);
        assert_eq!(
            params.format_message("Must be between {min} and {max} characters."),
            "Must be between 3 and 20 characters."
        );
    }

    #[test]
    fn test_serialize_as_json_object() {
        let params = Parameters::new()
            .with("min", 18)
            .with("max", ParamValue::Null);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"min":18,"max":null}"#);
    }
}

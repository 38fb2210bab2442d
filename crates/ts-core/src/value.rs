use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Literal;

/// Value stored in an engine's key-value container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::String(value) => Self::String(value),
            Literal::Number(value) => Self::Number(value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_only_match_their_variant() {
        assert_eq!(Value::from("x").as_string(), Some("x"));
        assert_eq!(Value::from(2.0).as_number(), Some(2.0));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(true).as_number(), None);
        assert_eq!(Value::Array(Vec::new()).type_name(), "array");
        assert_eq!(Value::Map(BTreeMap::new()).type_name(), "map");
    }

    #[test]
    fn literal_converts_into_value() {
        assert_eq!(
            Value::from(Literal::String("a".to_string())),
            Value::String("a".to_string())
        );
        assert_eq!(Value::from(Literal::Number(1.5)), Value::Number(1.5));
    }

    #[test]
    fn serializes_as_plain_json() {
        let mut map = BTreeMap::new();
        map.insert("hp".to_string(), Value::Number(3.0));
        map.insert(
            "log".to_string(),
            Value::Array(vec![Value::String("hi".to_string())]),
        );
        let json = serde_json::to_string(&Value::Map(map)).expect("value should serialize");
        assert_eq!(json, r#"{"hp":3.0,"log":["hi"]}"#);
    }
}

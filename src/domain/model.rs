use crate::utils::error::{ArgsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A place in the request an argument can be pulled from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Json,
    Querystring,
    Form,
    Headers,
    Cookies,
    Files,
    #[serde(untagged)]
    Custom(String),
}

impl Location {
    pub fn as_str(&self) -> &str {
        match self {
            Location::Json => "json",
            Location::Querystring => "querystring",
            Location::Form => "form",
            Location::Headers => "headers",
            Location::Cookies => "cookies",
            Location::Files => "files",
            Location::Custom(name) => name,
        }
    }

    /// Resolve a location name. Names that are not built in come back as
    /// `Custom`; whether a handler is registered for them is the parser's
    /// call to make.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => Location::Json,
            "querystring" => Location::Querystring,
            "form" => Location::Form,
            "headers" => Location::Headers,
            "cookies" => Location::Cookies,
            "files" => Location::Files,
            other => Location::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The output of a parse: argument name to coerced value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedArgs {
    pub data: HashMap<String, Value>,
}

impl ParsedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.data.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.data.get(name).and_then(|v| v.as_i64())
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.data.get(name).and_then(|v| v.as_f64())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.data.get(name).and_then(|v| v.as_bool())
    }

    /// Deserialize the parsed map into a caller-defined struct.
    pub fn into_typed<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        let value = Value::Object(self.data.into_iter().collect());
        serde_json::from_value(value).map_err(ArgsError::from)
    }

    pub fn into_inner(self) -> HashMap<String, Value> {
        self.data
    }
}

use crate::core::{Arg, ArgMap, Kind, Location};
use crate::utils::error::{ArgsError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// A declarative argument map loaded from TOML.
///
/// ```toml
/// [spec]
/// name = "create-user"
/// locations = ["json", "querystring"]
///
/// [args.username]
/// kind = "string"
/// required = true
/// min_length = 3
///
/// [args.age]
/// kind = "integer"
/// min = 0
/// max = 150
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecFile {
    pub spec: SpecMeta,
    pub args: HashMap<String, ArgDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecMeta {
    pub name: String,
    pub description: Option<String>,
    /// Location priority for the whole spec; the parser default when absent.
    pub locations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArgDef {
    pub kind: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub allow_missing: bool,
    pub source: Option<String>,
    pub error: Option<String>,
    pub default: Option<Value>,

    // Named builtin validators.
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub one_of: Option<Vec<Value>>,
    pub pattern: Option<String>,
    /// "url" or "email"
    pub format: Option<String>,
}

fn kind_from_name(field: &str, name: &str) -> Result<Kind> {
    match name {
        "int" | "integer" => Ok(Kind::Int),
        "float" | "number" => Ok(Kind::Float),
        "str" | "string" => Ok(Kind::Str),
        "bool" | "boolean" => Ok(Kind::Bool),
        "list" => Ok(Kind::List),
        "object" => Ok(Kind::Object),
        "uuid" => Ok(Kind::Uuid),
        "datetime" => Ok(Kind::DateTime),
        other => Err(ArgsError::InvalidConfigValueError {
            field: field.to_string(),
            value: other.to_string(),
            reason: "Unknown kind name".to_string(),
        }),
    }
}

impl SpecFile {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let spec: SpecFile = toml::from_str(&content)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_str_toml(content: &str) -> Result<Self> {
        let spec: SpecFile = toml::from_str(content)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Location priority declared by the spec, if any.
    pub fn locations(&self) -> Option<Vec<Location>> {
        self.spec
            .locations
            .as_ref()
            .map(|names| names.iter().map(|n| Location::from_name(n)).collect())
    }

    /// Build the runtime argument map.
    pub fn build(&self) -> Result<ArgMap> {
        let mut argmap = ArgMap::new();
        for (name, def) in &self.args {
            argmap.insert(name.clone(), def.build(name)?);
        }
        Ok(argmap)
    }
}

impl ArgDef {
    fn build(&self, name: &str) -> Result<Arg> {
        let mut arg = match &self.kind {
            Some(kind_name) => Arg::of(kind_from_name(name, kind_name)?),
            None => Arg::new(),
        };

        if self.required {
            arg = arg.required();
        }
        if self.multiple {
            arg = arg.multiple();
        }
        if self.allow_missing {
            arg = arg.allow_missing();
        }
        if let Some(source) = &self.source {
            arg = arg.source(source.clone());
        }
        if let Some(error) = &self.error {
            arg = arg.error(error.clone());
        }
        if let Some(default) = &self.default {
            arg = arg.default_value(default.clone());
        }

        if self.min.is_some() || self.max.is_some() {
            arg = arg.validate(validation::range(
                self.min.unwrap_or(f64::MIN),
                self.max.unwrap_or(f64::MAX),
            ));
        }
        if self.min_length.is_some() || self.max_length.is_some() {
            arg = arg.validate(validation::length(self.min_length, self.max_length));
        }
        if let Some(choices) = &self.one_of {
            arg = arg.validate(validation::one_of(choices.clone()));
        }
        if let Some(expr) = &self.pattern {
            arg = arg.validate(validation::pattern(expr)?);
        }
        if let Some(format) = &self.format {
            match format.as_str() {
                "url" => arg = arg.validate(validation::url()),
                "email" => arg = arg.validate(validation::email()),
                other => {
                    return Err(ArgsError::InvalidConfigValueError {
                        field: name.to_string(),
                        value: other.to_string(),
                        reason: "Unknown format name (expected 'url' or 'email')".to_string(),
                    })
                }
            }
        }

        Ok(arg)
    }
}

impl Validate for SpecFile {
    fn validate(&self) -> Result<()> {
        if self.spec.name.trim().is_empty() {
            return Err(ArgsError::MissingConfigError {
                field: "spec.name".to_string(),
            });
        }
        if self.args.is_empty() {
            return Err(ArgsError::ConfigError {
                message: "Spec declares no arguments".to_string(),
            });
        }
        // Surface kind/pattern/format mistakes at load time, not per request.
        for (name, def) in &self.args {
            def.build(name)?;
        }
        Ok(())
    }
}

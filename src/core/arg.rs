use crate::utils::error::ValidationError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

type VResult<T> = std::result::Result<T, ValidationError>;

/// Target type an argument is coerced into before validation.
#[derive(Clone)]
pub enum Kind {
    Bool,
    Int,
    Float,
    Str,
    List,
    Object,
    Uuid,
    DateTime,
    Custom {
        name: String,
        func: Arc<dyn Fn(Value) -> std::result::Result<Value, String> + Send + Sync>,
    },
}

impl Kind {
    pub fn name(&self) -> &str {
        match self {
            Kind::Bool => "boolean",
            Kind::Int => "integer",
            Kind::Float => "number",
            Kind::Str => "string",
            Kind::List => "list",
            Kind::Object => "object",
            Kind::Uuid => "uuid",
            Kind::DateTime => "datetime",
            Kind::Custom { name, .. } => name,
        }
    }

    pub fn custom(
        name: impl Into<String>,
        func: impl Fn(Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Kind::Custom {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    fn type_error(&self, field: &str, got: &Value) -> ValidationError {
        ValidationError::new(format!(
            "Expected type {} for {}, got {}",
            self.name(),
            field,
            json_type_name(got)
        ))
    }

    /// Coerce a raw value into this kind. `null` is never coercible; an
    /// argument that should accept it simply declares no kind.
    pub fn coerce(&self, field: &str, value: Value) -> VResult<Value> {
        if value.is_null() {
            return Err(self.type_error(field, &value));
        }

        match self {
            Kind::Int => match &value {
                Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        Ok(Value::from(i))
                    } else if let Some(f) = n.as_f64() {
                        Ok(Value::from(f as i64))
                    } else {
                        Err(self.type_error(field, &value))
                    }
                }
                Value::Bool(b) => Ok(Value::from(*b as i64)),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| self.type_error(field, &value)),
                _ => Err(self.type_error(field, &value)),
            },

            Kind::Float => match &value {
                Value::Number(n) => n
                    .as_f64()
                    .map(Value::from)
                    .ok_or_else(|| self.type_error(field, &value)),
                Value::Bool(b) => Ok(Value::from(*b as i64 as f64)),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::from)
                    .map_err(|_| self.type_error(field, &value)),
                _ => Err(self.type_error(field, &value)),
            },

            Kind::Str => match &value {
                Value::String(_) => Ok(value),
                Value::Number(n) => Ok(Value::from(n.to_string())),
                Value::Bool(b) => Ok(Value::from(b.to_string())),
                _ => Err(self.type_error(field, &value)),
            },

            Kind::Bool => match &value {
                Value::Bool(_) => Ok(value),
                Value::String(s) => match s.to_ascii_lowercase().as_str() {
                    "true" | "1" => Ok(Value::from(true)),
                    "false" | "0" => Ok(Value::from(false)),
                    _ => Err(self.type_error(field, &value)),
                },
                Value::Number(n) => match n.as_i64() {
                    Some(0) => Ok(Value::from(false)),
                    Some(1) => Ok(Value::from(true)),
                    _ => Err(self.type_error(field, &value)),
                },
                _ => Err(self.type_error(field, &value)),
            },

            Kind::List => match &value {
                Value::Array(_) => Ok(value),
                _ => Err(self.type_error(field, &value)),
            },

            Kind::Object => match &value {
                Value::Object(_) => Ok(value),
                _ => Err(self.type_error(field, &value)),
            },

            Kind::Uuid => match &value {
                Value::String(s) => uuid::Uuid::parse_str(s)
                    .map(|u| Value::from(u.hyphenated().to_string()))
                    .map_err(|_| self.type_error(field, &value)),
                _ => Err(self.type_error(field, &value)),
            },

            Kind::DateTime => match &value {
                Value::String(s) => chrono::DateTime::parse_from_rfc3339(s)
                    .map(|dt| Value::from(dt.to_rfc3339()))
                    .map_err(|_| self.type_error(field, &value)),
                _ => Err(self.type_error(field, &value)),
            },

            Kind::Custom { func, .. } => (func)(value.clone()).map_err(|reason| {
                let mut err = self.type_error(field, &value);
                err.message = format!("{}: {}", err.message, reason);
                err
            }),
        }
    }
}

impl std::fmt::Debug for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Kind({})", self.name())
    }
}

/// JSON type name of a value, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[derive(Clone)]
enum DefaultValue {
    Literal(Value),
    Computed(Arc<dyn Fn() -> Value + Send + Sync>),
}

type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;
type Validator = Arc<dyn Fn(&Value) -> VResult<()> + Send + Sync>;

/// Declarative specification of one request argument: how to find it, how to
/// coerce it, and what makes it valid.
#[derive(Clone, Default)]
pub struct Arg {
    kind: Option<Kind>,
    default: Option<DefaultValue>,
    required: bool,
    multiple: bool,
    allow_missing: bool,
    source: Option<String>,
    error: Option<String>,
    transforms: Vec<Transform>,
    validators: Vec<Validator>,
    metadata: HashMap<String, Value>,
}

impl Arg {
    /// An untyped argument: values pass through coercion untouched.
    pub fn new() -> Self {
        Self::default()
    }

    /// An argument coerced to `kind`.
    pub fn of(kind: Kind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn allow_missing(mut self) -> Self {
        self.allow_missing = true;
        self
    }

    /// Value used when the argument is absent. Defaults bypass coercion and
    /// validation; `Value::Null` is an allowed default.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Literal(value));
        self
    }

    pub fn default_fn(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::Computed(Arc::new(f)));
        self
    }

    /// Name to look up in the request when it differs from the output key.
    pub fn source(mut self, name: impl Into<String>) -> Self {
        self.source = Some(name.into());
        self
    }

    /// Custom message that replaces any coercion or validator message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Applied to the raw value before coercion and validation, in
    /// registration order.
    pub fn transform(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.transforms.push(Arc::new(f));
        self
    }

    pub fn validate(
        mut self,
        f: impl Fn(&Value) -> VResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Arc::new(f));
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn allows_missing(&self) -> bool {
        self.allow_missing
    }

    pub fn kind(&self) -> Option<&Kind> {
        self.kind.as_ref()
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    /// The name to query the request with: the explicit source, or the key
    /// the argument is registered under.
    pub fn lookup_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.source.as_deref().unwrap_or(key)
    }

    /// Evaluate the default, if one was declared.
    pub fn default_for_missing(&self) -> Option<Value> {
        match &self.default {
            Some(DefaultValue::Literal(v)) => Some(v.clone()),
            Some(DefaultValue::Computed(f)) => Some(f()),
            None => None,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Run the full per-value pipeline: transforms, then coercion, then
    /// validators. With `multiple`, each element of the list goes through
    /// individually (a scalar is treated as a one-element list).
    pub fn validated(&self, name: &str, value: Value) -> VResult<Value> {
        if self.multiple {
            let items = match value {
                Value::Array(items) => items,
                other => vec![other],
            };
            let out = items
                .into_iter()
                .map(|item| self.validated_single(name, item))
                .collect::<VResult<Vec<_>>>()?;
            Ok(Value::Array(out))
        } else {
            self.validated_single(name, value)
        }
    }

    fn validated_single(&self, name: &str, mut value: Value) -> VResult<Value> {
        for transform in &self.transforms {
            value = transform(value);
        }

        if let Some(kind) = &self.kind {
            value = kind
                .coerce(name, value)
                .map_err(|err| self.apply_error_override(err))?;
        }

        for validator in &self.validators {
            if let Err(err) = validator(&value) {
                return Err(self.apply_error_override(err));
            }
        }

        Ok(value)
    }

    fn apply_error_override(&self, err: ValidationError) -> ValidationError {
        match &self.error {
            Some(message) => err.override_message(message),
            None => err,
        }
    }
}

impl std::fmt::Debug for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arg")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("multiple", &self.multiple)
            .field("allow_missing", &self.allow_missing)
            .field("source", &self.source)
            .field("has_default", &self.default.is_some())
            .field("validators", &self.validators.len())
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

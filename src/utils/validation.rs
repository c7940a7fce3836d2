use crate::utils::error::ValidationError;
use serde_json::Value;
use url::Url;

type VResult = std::result::Result<(), ValidationError>;

/// Self-validation for configuration types.
pub trait Validate {
    fn validate(&self) -> crate::utils::error::Result<()>;
}

/// Numeric range check, inclusive on both ends. Non-numeric values are
/// rejected so the check never silently passes on a miscoerced value.
pub fn range(min: f64, max: f64) -> impl Fn(&Value) -> VResult + Send + Sync {
    move |value: &Value| match value.as_f64() {
        Some(n) if n >= min && n <= max => Ok(()),
        Some(_) => Err(ValidationError::new(format!(
            "Value must be between {} and {}",
            min, max
        ))),
        None => Err(ValidationError::new("Value must be a number")),
    }
}

/// Length bounds for strings and lists.
pub fn length(min: Option<usize>, max: Option<usize>) -> impl Fn(&Value) -> VResult + Send + Sync {
    move |value: &Value| {
        let len = match value {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            _ => {
                return Err(ValidationError::new(
                    "Length check requires a string or list",
                ))
            }
        };
        if let Some(min) = min {
            if len < min {
                return Err(ValidationError::new(format!(
                    "Must be at least {} long",
                    min
                )));
            }
        }
        if let Some(max) = max {
            if len > max {
                return Err(ValidationError::new(format!(
                    "Must be at most {} long",
                    max
                )));
            }
        }
        Ok(())
    }
}

/// Membership in a fixed set of allowed values.
pub fn one_of(choices: Vec<Value>) -> impl Fn(&Value) -> VResult + Send + Sync {
    move |value: &Value| {
        if choices.contains(value) {
            Ok(())
        } else {
            let rendered: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
            Err(ValidationError::new(format!(
                "Must be one of: {}",
                rendered.join(", ")
            )))
        }
    }
}

/// Full-match regex check on string values. Compilation happens once, here,
/// so a bad pattern is a setup error rather than a per-request one.
pub fn pattern(
    expr: &str,
) -> crate::utils::error::Result<impl Fn(&Value) -> VResult + Send + Sync> {
    let regex = regex::Regex::new(expr).map_err(|e| {
        crate::utils::error::ArgsError::ConfigError {
            message: format!("Invalid pattern '{}': {}", expr, e),
        }
    })?;
    Ok(move |value: &Value| match value.as_str() {
        Some(s) if regex.is_match(s) => Ok(()),
        Some(_) => Err(ValidationError::new(format!(
            "Does not match pattern '{}'",
            regex.as_str()
        ))),
        None => Err(ValidationError::new("Pattern check requires a string")),
    })
}

/// http(s) URL check.
pub fn url() -> impl Fn(&Value) -> VResult + Send + Sync {
    |value: &Value| {
        let s = value
            .as_str()
            .ok_or_else(|| ValidationError::new("URL must be a string"))?;
        match Url::parse(s) {
            Ok(parsed) => match parsed.scheme() {
                "http" | "https" => Ok(()),
                scheme => Err(ValidationError::new(format!(
                    "Unsupported URL scheme: {}",
                    scheme
                ))),
            },
            Err(_) => Err(ValidationError::new("Not a valid URL")),
        }
    }
}

/// Loose email shape check: something@something.something, no whitespace.
pub fn email() -> impl Fn(&Value) -> VResult + Send + Sync {
    |value: &Value| {
        let s = value
            .as_str()
            .ok_or_else(|| ValidationError::new("Email must be a string"))?;
        let valid = !s.contains(char::is_whitespace)
            && s.split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
        if valid {
            Ok(())
        } else {
            Err(ValidationError::new("Not a valid email address"))
        }
    }
}

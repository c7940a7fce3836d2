use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Read access to the argument-bearing parts of a request.
///
/// Every method defaults to "not present" so a backend only implements the
/// locations it actually carries. `None` means the name is absent from the
/// location, which is distinct from the name being present with a `null`
/// value. When `multiple` is set, implementations should aggregate repeated
/// keys into a list where the location supports repetition (query strings,
/// form bodies).
#[async_trait]
pub trait Request: Send + Sync {
    /// Look up a name in the JSON body. Async because framework bodies
    /// usually are.
    async fn json_value(&self, _name: &str, _multiple: bool) -> Result<Option<Value>> {
        Ok(None)
    }

    fn query_value(&self, _name: &str, _multiple: bool) -> Option<Value> {
        None
    }

    fn form_value(&self, _name: &str, _multiple: bool) -> Option<Value> {
        None
    }

    fn header_value(&self, _name: &str) -> Option<Value> {
        None
    }

    fn cookie_value(&self, _name: &str) -> Option<Value> {
        None
    }

    fn file_value(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Pull `name` out of a JSON object, honoring list aggregation: when
/// `multiple` is set a scalar comes back wrapped in a one-element list.
pub fn get_value(container: &Value, name: &str, multiple: bool) -> Option<Value> {
    let found = container.get(name)?.clone();
    if multiple && !found.is_array() {
        Some(Value::Array(vec![found]))
    } else {
        Some(found)
    }
}

// Adapters layer: concrete request backends. `SimpleRequest` is an owned,
// framework-free representation, usable standalone or as the capture format
// for the CLI.

use crate::domain::ports::{get_value, Request};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Metadata of one uploaded file. The body itself is out of scope here;
/// handlers that need bytes read them through their framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub size: u64,
}

/// An owned request: URL, JSON body, form fields, headers, cookies and file
/// metadata. Query and form fields keep every occurrence of a repeated key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleRequest {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub query: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub json: Option<Value>,
    #[serde(default)]
    pub form: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub cookies: HashMap<String, String>,
    #[serde(default)]
    pub files: HashMap<String, UploadedFile>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl SimpleRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }

    /// Set the URL and fill the query map from its query string. Repeated
    /// keys aggregate in order. Accepts absolute and path-only URLs.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.query = parse_query(&url);
        self.url = Some(url);
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn with_form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.entry(name.into()).or_default().push(value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(name.into(), file);
        self
    }

    /// Build from a captured-request JSON document. A `url` in the document
    /// populates the query map unless one was given explicitly.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut req: SimpleRequest = serde_json::from_value(value)?;
        if req.query.is_empty() {
            if let Some(url) = &req.url {
                req.query = parse_query(url);
            }
        }
        Ok(req)
    }

    fn multi_lookup(
        map: &HashMap<String, Vec<String>>,
        name: &str,
        multiple: bool,
    ) -> Option<Value> {
        let values = map.get(name)?;
        if multiple {
            Some(Value::Array(
                values.iter().map(|v| Value::from(v.clone())).collect(),
            ))
        } else {
            values.first().map(|v| Value::from(v.clone()))
        }
    }
}

/// Pull the query pairs out of a URL string, absolute or path-only.
fn parse_query(url: &str) -> HashMap<String, Vec<String>> {
    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    if let Some(raw) = url.split_once('?').map(|(_, q)| q) {
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            out.entry(key.into_owned()).or_default().push(value.into_owned());
        }
    }
    out
}

#[async_trait]
impl Request for SimpleRequest {
    async fn json_value(&self, name: &str, multiple: bool) -> Result<Option<Value>> {
        Ok(self
            .json
            .as_ref()
            .and_then(|body| get_value(body, name, multiple)))
    }

    fn query_value(&self, name: &str, multiple: bool) -> Option<Value> {
        Self::multi_lookup(&self.query, name, multiple)
    }

    fn form_value(&self, name: &str, multiple: bool) -> Option<Value> {
        Self::multi_lookup(&self.form, name, multiple)
    }

    fn header_value(&self, name: &str) -> Option<Value> {
        // Header names compare case-insensitively.
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| Value::from(value.clone()))
    }

    fn cookie_value(&self, name: &str) -> Option<Value> {
        self.cookies.get(name).map(|v| Value::from(v.clone()))
    }

    fn file_value(&self, name: &str) -> Option<Value> {
        self.files
            .get(name)
            .and_then(|file| serde_json::to_value(file).ok())
    }
}

use crate::core::arg::Arg;
use crate::domain::model::{Location, ParsedArgs};
use crate::domain::ports::Request;
use crate::utils::error::{ArgsError, Result, ValidationError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Named argument specifications, keyed by output name.
pub type ArgMap = HashMap<String, Arg>;

/// Validator run against the whole parsed map, after every argument has been
/// resolved individually.
pub type MapValidator =
    Box<dyn Fn(&ParsedArgs) -> std::result::Result<(), ValidationError> + Send + Sync>;

type LocationHandler<R> = Arc<dyn Fn(&R, &str) -> Option<Value> + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(ValidationError) -> ArgsError + Send + Sync>;
type Fallback<R> = Arc<dyn Fn(&R, &str) -> Option<Value> + Send + Sync>;

/// Pulls declared arguments out of a request.
///
/// Locations are tried in order and the first one that has the name wins.
/// Headers, cookies and files are only consulted when listed explicitly.
pub struct Parser<R: Request> {
    locations: Vec<Location>,
    error_message: Option<String>,
    error_handler: Option<ErrorHandler>,
    location_handlers: HashMap<String, LocationHandler<R>>,
    fallback: Option<Fallback<R>>,
}

impl<R: Request> Default for Parser<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Request> Parser<R> {
    pub const DEFAULT_LOCATIONS: [Location; 3] =
        [Location::Json, Location::Querystring, Location::Form];

    pub fn new() -> Self {
        Self {
            locations: Self::DEFAULT_LOCATIONS.to_vec(),
            error_message: None,
            error_handler: None,
            location_handlers: HashMap::new(),
            fallback: None,
        }
    }

    /// Replace the default location priority for every parse.
    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    /// Message that replaces whole-map validator failures.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Route every validation failure through `handler` instead of returning
    /// it as-is. The handler decides what error the caller sees.
    pub fn error_handler(
        mut self,
        handler: impl Fn(ValidationError) -> ArgsError + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Register a lookup for a custom location name. The handler receives the
    /// resolved source name, not the output key.
    pub fn location_handler(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&R, &str) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.location_handlers.insert(name.into(), Arc::new(handler));
        self
    }

    /// Consulted when every location came up empty, before defaults apply.
    pub fn fallback(
        mut self,
        handler: impl Fn(&R, &str) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    fn check_locations(&self, locations: &[Location]) -> Result<()> {
        let invalid: Vec<String> = locations
            .iter()
            .filter_map(|loc| match loc {
                Location::Custom(name) if !self.location_handlers.contains_key(name) => {
                    Some(name.clone())
                }
                _ => None,
            })
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(ArgsError::InvalidLocations(invalid))
        }
    }

    async fn fetch(
        &self,
        req: &R,
        location: &Location,
        name: &str,
        multiple: bool,
    ) -> Result<Option<Value>> {
        let value = match location {
            Location::Json => req.json_value(name, multiple).await?,
            Location::Querystring => req.query_value(name, multiple),
            Location::Form => req.form_value(name, multiple),
            Location::Headers => req.header_value(name),
            Location::Cookies => req.cookie_value(name),
            Location::Files => req.file_value(name),
            Location::Custom(key) => match self.location_handlers.get(key) {
                Some(handler) => handler(req, name),
                None => None,
            },
        };
        Ok(value)
    }

    fn required_error(name: &str) -> ValidationError {
        ValidationError::new(format!("Required parameter '{}' not found.", name))
    }

    /// Resolve a single argument. `Ok(None)` means the key should be omitted
    /// from the output (`allow_missing`).
    pub async fn parse_arg(
        &self,
        name: &str,
        arg: &Arg,
        req: &R,
        locations: &[Location],
    ) -> Result<Option<Value>> {
        self.check_locations(locations)?;

        let lookup = arg.lookup_name(name);
        let mut found: Option<Value> = None;
        for location in locations {
            if let Some(value) = self.fetch(req, location, lookup, arg.is_multiple()).await? {
                tracing::debug!(arg = name, location = %location, "argument resolved");
                found = Some(value);
                break;
            }
        }

        if found.is_none() {
            if let Some(fallback) = &self.fallback {
                found = fallback(req, lookup);
            }
        }

        // An empty list counts as missing for a multiple argument, so that a
        // required one still fails and defaults still apply.
        if arg.is_multiple() {
            if let Some(Value::Array(items)) = &found {
                if items.is_empty() {
                    found = None;
                }
            }
        }

        match found {
            Some(value) => {
                let validated = arg.validated(name, value)?;
                Ok(Some(validated))
            }
            None => {
                if arg.is_required() {
                    return Err(Self::required_error(name).into());
                }
                if let Some(default) = arg.default_for_missing() {
                    return Ok(Some(default));
                }
                if arg.is_multiple() {
                    return Ok(Some(Value::Array(Vec::new())));
                }
                if arg.allows_missing() {
                    return Ok(None);
                }
                Ok(Some(Value::Null))
            }
        }
    }

    /// Parse every argument with the parser's own locations and no whole-map
    /// validators.
    pub async fn parse(&self, argmap: &ArgMap, req: &R) -> Result<ParsedArgs> {
        self.parse_with(argmap, req, None, &[]).await
    }

    /// Full-control parse: per-call location override plus whole-map
    /// validators, run in order after all arguments resolved. The first
    /// failing validator wins.
    pub async fn parse_with(
        &self,
        argmap: &ArgMap,
        req: &R,
        locations: Option<&[Location]>,
        validators: &[MapValidator],
    ) -> Result<ParsedArgs> {
        let locations = locations.unwrap_or(&self.locations);

        let mut parsed = ParsedArgs::new();
        for (name, arg) in argmap {
            match self.parse_arg(name, arg, req, locations).await {
                Ok(Some(value)) => parsed.insert(name.clone(), value),
                Ok(None) => {}
                Err(ArgsError::Validation(err)) => return Err(self.handle_error(err)),
                Err(other) => return Err(other),
            }
        }

        for validator in validators {
            if let Err(err) = validator(&parsed) {
                let err = match &self.error_message {
                    Some(message) => err.override_message(message),
                    None => err,
                };
                return Err(self.handle_error(err));
            }
        }

        Ok(parsed)
    }

    fn handle_error(&self, err: ValidationError) -> ArgsError {
        match &self.error_handler {
            Some(handler) => handler(err),
            None => ArgsError::Validation(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::arg::Kind;
    use crate::domain::ports::get_value;
    use async_trait::async_trait;
    use serde_json::json;

    /// A minimal request backend carrying plain JSON maps per location.
    #[derive(Default)]
    struct MockRequest {
        json: Option<Value>,
        query: Option<Value>,
        form: Option<Value>,
        headers: Option<Value>,
        cookies: Option<Value>,
        files: Option<Value>,
        extra: Option<Value>,
    }

    impl MockRequest {
        fn with_json(body: Value) -> Self {
            Self {
                json: Some(body),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Request for MockRequest {
        async fn json_value(&self, name: &str, multiple: bool) -> Result<Option<Value>> {
            Ok(self
                .json
                .as_ref()
                .and_then(|body| get_value(body, name, multiple)))
        }

        fn query_value(&self, name: &str, multiple: bool) -> Option<Value> {
            self.query
                .as_ref()
                .and_then(|qs| get_value(qs, name, multiple))
        }

        fn form_value(&self, name: &str, multiple: bool) -> Option<Value> {
            self.form
                .as_ref()
                .and_then(|form| get_value(form, name, multiple))
        }

        fn header_value(&self, name: &str) -> Option<Value> {
            self.headers
                .as_ref()
                .and_then(|headers| get_value(headers, name, false))
        }

        fn cookie_value(&self, name: &str) -> Option<Value> {
            self.cookies
                .as_ref()
                .and_then(|cookies| get_value(cookies, name, false))
        }

        fn file_value(&self, name: &str) -> Option<Value> {
            self.files
                .as_ref()
                .and_then(|files| get_value(files, name, false))
        }
    }

    fn locations(names: &[&str]) -> Vec<Location> {
        names.iter().map(|n| Location::from_name(n)).collect()
    }

    #[test]
    fn test_default_locations() {
        assert_eq!(
            Parser::<MockRequest>::DEFAULT_LOCATIONS.to_vec(),
            locations(&["json", "querystring", "form"])
        );
    }

    #[tokio::test]
    async fn test_parse_resolves_every_arg() {
        let req = MockRequest::with_json(json!({"username": 42, "password": 42}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("username".to_string(), Arg::new());
        argmap.insert("password".to_string(), Arg::new());

        let parsed = parser.parse(&argmap, &req).await.unwrap();
        assert_eq!(parsed.get("username"), Some(&json!(42)));
        assert_eq!(parsed.get("password"), Some(&json!(42)));
    }

    #[tokio::test]
    async fn test_required_arg_missing_raises() {
        let req = MockRequest::with_json(json!({}));
        let parser = Parser::new();
        let arg = Arg::new().required();

        let err = parser
            .parse_arg("foo", &arg, &req, &locations(&["json"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "Required parameter 'foo' not found."
        );
    }

    #[tokio::test]
    async fn test_required_arg_present() {
        let req = MockRequest::with_json(json!({"foo": 42}));
        let parser = Parser::new();
        let arg = Arg::new().required();

        let value = parser
            .parse_arg("foo", &arg, &req, &locations(&["json"]))
            .await
            .unwrap();
        assert_eq!(value, Some(json!(42)));
    }

    #[tokio::test]
    async fn test_required_multiple_arg_empty_or_missing_raises() {
        let parser = Parser::new();
        let arg = Arg::new().multiple().required();

        let req = MockRequest {
            form: Some(json!({"foo": []})),
            ..MockRequest::default()
        };
        assert!(parser
            .parse_arg("foo", &arg, &req, &locations(&["form"]))
            .await
            .is_err());

        let req = MockRequest {
            form: Some(json!({})),
            ..MockRequest::default()
        };
        assert!(parser
            .parse_arg("foo", &arg, &req, &locations(&["form"]))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_multiple_missing_defaults_to_empty_list() {
        let req = MockRequest::with_json(json!({}));
        let parser = Parser::new();
        let arg = Arg::new().multiple();

        let value = parser
            .parse_arg("foo", &arg, &req, &locations(&["json"]))
            .await
            .unwrap();
        assert_eq!(value, Some(json!([])));
    }

    #[tokio::test]
    async fn test_default_applied_when_missing() {
        let req = MockRequest::with_json(json!({}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("val".to_string(), Arg::new().default_value(json!("pizza")));

        let parsed = parser
            .parse_with(&argmap, &req, Some(&locations(&["json"])), &[])
            .await
            .unwrap();
        assert_eq!(parsed.get_str("val"), Some("pizza"));
    }

    #[tokio::test]
    async fn test_default_can_be_null() {
        let req = MockRequest::with_json(json!({}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("val".to_string(), Arg::new().default_value(Value::Null));

        let parsed = parser.parse(&argmap, &req).await.unwrap();
        assert_eq!(parsed.get("val"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_computed_default() {
        let req = MockRequest::with_json(json!({}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("val".to_string(), Arg::new().default_fn(|| json!("pizza")));

        let parsed = parser.parse(&argmap, &req).await.unwrap();
        assert_eq!(parsed.get_str("val"), Some("pizza"));
    }

    #[tokio::test]
    async fn test_missing_without_default_is_null() {
        let req = MockRequest::with_json(json!({"username": "foo"}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("username".to_string(), Arg::of(Kind::Str));
        argmap.insert("password".to_string(), Arg::of(Kind::Str));

        let parsed = parser.parse(&argmap, &req).await.unwrap();
        assert_eq!(parsed.get_str("username"), Some("foo"));
        assert_eq!(parsed.get("password"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_allow_missing_omits_key() {
        let req = MockRequest::with_json(json!({"username": "foo"}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("username".to_string(), Arg::of(Kind::Str));
        argmap.insert(
            "password".to_string(),
            Arg::of(Kind::Str).allow_missing(),
        );

        let parsed = parser.parse(&argmap, &req).await.unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(!parsed.contains("password"));
    }

    #[tokio::test]
    async fn test_invalid_location_raises() {
        let req = MockRequest::default();
        let parser = Parser::new();
        let arg = Arg::new();

        let err = parser
            .parse_arg(
                "foo",
                &arg,
                &req,
                &locations(&["invalidlocation", "headers"]),
            )
            .await
            .unwrap_err();
        match err {
            ArgsError::InvalidLocations(names) => {
                assert_eq!(names, vec!["invalidlocation".to_string()])
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_conversion_during_parse() {
        let req = MockRequest::with_json(json!({"foo": 42}));
        let parser = Parser::new();
        let arg = Arg::of(Kind::Str);

        let value = parser
            .parse_arg("foo", &arg, &req, &locations(&["json"]))
            .await
            .unwrap();
        assert_eq!(value, Some(json!("42")));
    }

    #[tokio::test]
    async fn test_location_priority_first_hit_wins() {
        let req = MockRequest {
            json: Some(json!({})),
            query: Some(json!({"foo": "from-query"})),
            form: Some(json!({"foo": "from-form"})),
            ..MockRequest::default()
        };
        let parser = Parser::new();
        let arg = Arg::new();

        let value = parser
            .parse_arg("foo", &arg, &req, &Parser::<MockRequest>::DEFAULT_LOCATIONS)
            .await
            .unwrap();
        assert_eq!(value, Some(json!("from-query")));
    }

    #[tokio::test]
    async fn test_headers_and_cookies_only_when_listed() {
        let req = MockRequest {
            headers: Some(json!({"foo": "from-header"})),
            cookies: Some(json!({"foo": "from-cookie"})),
            ..MockRequest::default()
        };
        let parser = Parser::new();
        let arg = Arg::new();

        // Default locations never touch headers or cookies.
        let value = parser
            .parse_arg("foo", &arg, &req, &Parser::<MockRequest>::DEFAULT_LOCATIONS)
            .await
            .unwrap();
        assert_eq!(value, Some(Value::Null));

        let value = parser
            .parse_arg("foo", &arg, &req, &locations(&["headers"]))
            .await
            .unwrap();
        assert_eq!(value, Some(json!("from-header")));

        let value = parser
            .parse_arg("foo", &arg, &req, &locations(&["cookies"]))
            .await
            .unwrap();
        assert_eq!(value, Some(json!("from-cookie")));
    }

    #[tokio::test]
    async fn test_files_only_when_listed() {
        let metadata = json!({"filename": "me.png", "content_type": "image/png", "size": 2048});
        let req = MockRequest {
            files: Some(json!({"avatar": metadata})),
            ..MockRequest::default()
        };
        let parser = Parser::new();
        let arg = Arg::new();

        let value = parser
            .parse_arg("avatar", &arg, &req, &Parser::<MockRequest>::DEFAULT_LOCATIONS)
            .await
            .unwrap();
        assert_eq!(value, Some(Value::Null));

        let value = parser
            .parse_arg("avatar", &arg, &req, &locations(&["files"]))
            .await
            .unwrap();
        assert_eq!(
            value,
            Some(json!({"filename": "me.png", "content_type": "image/png", "size": 2048}))
        );
    }

    #[tokio::test]
    async fn test_source_overrides_lookup_name() {
        let req = MockRequest::with_json(json!({"foo": 41, "bar": 42}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("foo".to_string(), Arg::of(Kind::Int));
        argmap.insert("baz".to_string(), Arg::of(Kind::Int).source("bar"));

        let parsed = parser.parse(&argmap, &req).await.unwrap();
        assert_eq!(parsed.get_i64("foo"), Some(41));
        assert_eq!(parsed.get_i64("baz"), Some(42));
    }

    #[tokio::test]
    async fn test_custom_location_handler() {
        let req = MockRequest {
            extra: Some(json!({"foo": 42})),
            ..MockRequest::default()
        };
        let parser = Parser::new().location_handler("data", |req: &MockRequest, name| {
            req.extra.as_ref().and_then(|data| get_value(data, name, false))
        });

        let mut argmap = ArgMap::new();
        argmap.insert("foo".to_string(), Arg::of(Kind::Int));

        let parsed = parser
            .parse_with(&argmap, &req, Some(&locations(&["data"])), &[])
            .await
            .unwrap();
        assert_eq!(parsed.get_i64("foo"), Some(42));
    }

    #[tokio::test]
    async fn test_custom_location_handler_receives_source_name() {
        let req = MockRequest {
            extra: Some(json!({"X-Foo": 42})),
            ..MockRequest::default()
        };
        let parser = Parser::new().location_handler("data", |req: &MockRequest, name| {
            assert_eq!(name, "X-Foo");
            req.extra.as_ref().and_then(|data| get_value(data, name, false))
        });

        let mut argmap = ArgMap::new();
        argmap.insert("x_foo".to_string(), Arg::of(Kind::Int).source("X-Foo"));

        let parsed = parser
            .parse_with(&argmap, &req, Some(&locations(&["data"])), &[])
            .await
            .unwrap();
        assert_eq!(parsed.get_i64("x_foo"), Some(42));
    }

    #[tokio::test]
    async fn test_fallback_used_when_all_locations_miss() {
        let req = MockRequest::with_json(json!({}));
        let parser = Parser::new().fallback(|_req: &MockRequest, name| {
            if name == "foo" {
                Some(json!("from-fallback"))
            } else {
                None
            }
        });

        let mut argmap = ArgMap::new();
        argmap.insert("foo".to_string(), Arg::new());

        let parsed = parser.parse(&argmap, &req).await.unwrap();
        assert_eq!(parsed.get_str("foo"), Some("from-fallback"));
    }

    #[tokio::test]
    async fn test_custom_error_handler_translates() {
        let req = MockRequest::with_json(json!({"foo": "nonint"}));
        let parser = Parser::new()
            .error_handler(|err| ArgsError::Other(anyhow::anyhow!("custom: {}", err.message)));

        let mut argmap = ArgMap::new();
        argmap.insert("foo".to_string(), Arg::of(Kind::Int));

        let err = parser.parse(&argmap, &req).await.unwrap_err();
        match err {
            ArgsError::Other(inner) => {
                assert!(inner.to_string().starts_with("custom: Expected type"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_whole_map_validation() {
        let req = MockRequest::with_json(json!({"foo": 41, "bar": 42}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("foo".to_string(), Arg::of(Kind::Int));
        argmap.insert("bar".to_string(), Arg::of(Kind::Int));

        let validators: Vec<MapValidator> = vec![Box::new(|args: &ParsedArgs| {
            if args.get_i64("foo") > args.get_i64("bar") {
                Ok(())
            } else {
                Err(ValidationError::new("foo must be > bar"))
            }
        })];

        let err = parser
            .parse_with(&argmap, &req, None, &validators)
            .await
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().message, "foo must be > bar");
    }

    #[tokio::test]
    async fn test_whole_map_validators_first_failure_wins() {
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("a".to_string(), Arg::of(Kind::Int));
        argmap.insert("b".to_string(), Arg::of(Kind::Int));

        let validators: Vec<MapValidator> = vec![
            Box::new(|args: &ParsedArgs| {
                if args.get_i64("a") > args.get_i64("b") {
                    Err(ValidationError::new("b must be > a"))
                } else {
                    Ok(())
                }
            }),
            Box::new(|args: &ParsedArgs| {
                if args.get_i64("b") > args.get_i64("a") {
                    Err(ValidationError::new("a must be > b"))
                } else {
                    Ok(())
                }
            }),
        ];

        let req = MockRequest::with_json(json!({"a": 2, "b": 1}));
        let err = parser
            .parse_with(&argmap, &req, None, &validators)
            .await
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().message, "b must be > a");

        let req = MockRequest::with_json(json!({"a": 1, "b": 2}));
        let err = parser
            .parse_with(&argmap, &req, None, &validators)
            .await
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().message, "a must be > b");
    }

    #[tokio::test]
    async fn test_parser_error_message_overrides_map_validators() {
        let req = MockRequest::with_json(json!({"foo": 41}));
        let parser = Parser::new().error("cool custom message");
        let mut argmap = ArgMap::new();
        argmap.insert("foo".to_string(), Arg::of(Kind::Int));

        let validators: Vec<MapValidator> =
            vec![Box::new(|_| Err(ValidationError::new("rejected")))];

        let err = parser
            .parse_with(&argmap, &req, None, &validators)
            .await
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().message, "cool custom message");
    }

    #[tokio::test]
    async fn test_per_arg_validator_error_surfaces() {
        let req = MockRequest::with_json(json!({"name": "invalid"}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert(
            "name".to_string(),
            Arg::new().validate(|_| Err(ValidationError::new("Something went wrong."))),
        );

        let err = parser.parse(&argmap, &req).await.unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "Something went wrong."
        );
    }

    #[tokio::test]
    async fn test_multiple_validators_per_arg() {
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert(
            "password".to_string(),
            Arg::new()
                .validate(|v: &Value| {
                    let s = v.as_str().unwrap_or_default();
                    if s.len() < 6 {
                        Err(ValidationError::new("Must be greater than 6 characters."))
                    } else {
                        Ok(())
                    }
                })
                .validate(|v: &Value| {
                    let s = v.as_str().unwrap_or_default();
                    if s.chars().any(|c| c.is_ascii_digit()) {
                        Ok(())
                    } else {
                        Err(ValidationError::new("Must have a digit."))
                    }
                }),
        );

        let req = MockRequest::with_json(json!({"password": "123"}));
        let err = parser.parse(&argmap, &req).await.unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "Must be greater than 6 characters."
        );

        let req = MockRequest::with_json(json!({"password": "abcdefhij"}));
        let err = parser.parse(&argmap, &req).await.unwrap_err();
        assert_eq!(err.as_validation().unwrap().message, "Must have a digit.");
    }

    #[tokio::test]
    async fn test_parse_into_typed_struct() {
        #[derive(serde::Deserialize)]
        struct Credentials {
            username: String,
            password: Option<String>,
        }

        let req = MockRequest::with_json(json!({"username": "foo"}));
        let parser = Parser::new();
        let mut argmap = ArgMap::new();
        argmap.insert("username".to_string(), Arg::of(Kind::Str));
        argmap.insert("password".to_string(), Arg::of(Kind::Str));

        let creds: Credentials = parser
            .parse(&argmap, &req)
            .await
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(creds.username, "foo");
        assert_eq!(creds.password, None);
    }
}

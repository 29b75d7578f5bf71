//! Inbound request model handed to route handlers.
//!
//! # Responsibilities
//! - Hold method, path, query, headers, decoded body and route params
//! - Case-insensitive lookup for query and header names
//! - Build requests from hyper request parts
//!
//! # Design Decisions
//! - Path is stored percent-decoded with leading/trailing `/` trimmed, matching route patterns
//! - Route params are written exactly once, by the route table, before a handler runs
//! - Everything else is read-only once built

use std::borrow::Cow;
use std::collections::HashMap;

use axum::http::request::Parts;

use crate::http::body::{BodyMap, Value};

/// A string map whose keys compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    inner: HashMap<String, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.inner.insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over `(lowercased name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// One inbound HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    path: String,
    query: FieldMap,
    headers: FieldMap,
    body: BodyMap,
    route_params: HashMap<String, String>,
}

impl Request {
    /// Create a request with no query, headers or body.
    pub fn new(method: impl Into<String>, path: &str) -> Self {
        Self {
            method: method.into(),
            path: path.trim_matches('/').to_string(),
            query: FieldMap::new(),
            headers: FieldMap::new(),
            body: BodyMap::new(),
            route_params: HashMap::new(),
        }
    }

    pub fn with_query(mut self, query: FieldMap) -> Self {
        self.query = query;
        self
    }

    pub fn with_headers(mut self, headers: FieldMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: BodyMap) -> Self {
        self.body = body;
        self
    }

    /// Build a request from hyper parts and an already decoded body.
    ///
    /// The path is percent-decoded (kept raw if the escapes are not UTF-8).
    /// Query pairs are form-decoded; a repeated key keeps its last value.
    /// Header values that are not visible ASCII are dropped.
    pub fn from_parts(parts: &Parts, body: BodyMap) -> Self {
        let query: FieldMap = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let headers: FieldMap = parts
            .headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
            .collect();

        let raw_path = parts.uri.path();
        let path = urlencoding::decode(raw_path).unwrap_or(Cow::Borrowed(raw_path));

        Self::new(parts.method.as_str(), &path)
            .with_query(query)
            .with_headers(headers)
            .with_body(body)
    }

    /// Derive a GET request for `path` that keeps this request's query, headers and body.
    pub fn reroute(&self, path: &str) -> Self {
        Self::new("GET", path)
            .with_query(self.query.clone())
            .with_headers(self.headers.clone())
            .with_body(self.body.clone())
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request path without leading or trailing `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name)
    }

    pub fn query_params(&self) -> &FieldMap {
        &self.query
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn headers(&self) -> &FieldMap {
        &self.headers
    }

    pub fn body(&self) -> &BodyMap {
        &self.body
    }

    /// Top-level body field by name, ignoring ASCII case when there is no exact match.
    pub fn body_value(&self, name: &str) -> Option<&Value> {
        self.body.get(name).or_else(|| {
            self.body
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }

    pub fn route_param(&self, name: &str) -> Option<&str> {
        self.route_params.get(name).map(String::as_str)
    }

    pub fn route_params(&self) -> &HashMap<String, String> {
        &self.route_params
    }

    pub(crate) fn set_route_params(&mut self, params: HashMap<String, String>) {
        self.route_params = params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_map_is_case_insensitive() {
        let mut map = FieldMap::new();
        map.insert("Content-Type", "application/json");
        assert_eq!(map.get("content-type"), Some("application/json"));
        assert_eq!(map.get("CONTENT-TYPE"), Some("application/json"));
        assert!(map.contains("Content-type"));

        map.insert("CONTENT-TYPE", "text/html");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("content-type"), Some("text/html"));
    }

    #[test]
    fn path_is_trimmed() {
        assert_eq!(Request::new("GET", "/items/42/").path(), "items/42");
        assert_eq!(Request::new("GET", "/").path(), "");
    }

    #[test]
    fn from_parts_decodes_query_and_headers() {
        let (parts, _) = axum::http::Request::builder()
            .method("POST")
            .uri("http://localhost/search/?Term=hello%20world&page=2&page=3")
            .header("X-Token", "abc")
            .body(())
            .unwrap()
            .into_parts();

        let request = Request::from_parts(&parts, BodyMap::new());
        assert_eq!(request.method(), "POST");
        assert_eq!(request.path(), "search");
        assert_eq!(request.query("term"), Some("hello world"));
        assert_eq!(request.query("PAGE"), Some("3"));
        assert_eq!(request.header("x-token"), Some("abc"));
        assert!(request.route_params().is_empty());
    }

    #[test]
    fn from_parts_decodes_path() {
        let (parts, _) = axum::http::Request::builder()
            .uri("/items/hello%20world/")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(Request::from_parts(&parts, BodyMap::new()).path(), "items/hello world");

        // Escapes that are not valid UTF-8 leave the path untouched.
        let (parts, _) = axum::http::Request::builder()
            .uri("/raw/%FF")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(Request::from_parts(&parts, BodyMap::new()).path(), "raw/%FF");
    }

    #[test]
    fn body_value_ignores_key_case() {
        let body = crate::http::body::parse_body(
            r#"{"UserName":"ann","count":2,"COUNT":3}"#,
            Some("application/json"),
        )
        .unwrap();
        let request = Request::new("POST", "/users").with_body(body);

        assert_eq!(request.body_value("username").and_then(Value::as_str), Some("ann"));
        assert_eq!(request.body_value("USERNAME").and_then(Value::as_str), Some("ann"));
        // An exact match wins over a case-insensitive one.
        assert_eq!(request.body_value("COUNT").and_then(Value::as_i64), Some(3));
        assert!(request.body_value("missing").is_none());
    }

    #[test]
    fn reroute_keeps_inputs() {
        let mut body = BodyMap::new();
        body.insert("k".into(), Value::Int(1));
        let original = Request::new("POST", "/orders")
            .with_query([("q", "1")].into_iter().collect())
            .with_headers([("Accept", "text/html")].into_iter().collect())
            .with_body(body);

        let rerouted = original.reroute("/error/");
        assert_eq!(rerouted.method(), "GET");
        assert_eq!(rerouted.path(), "error");
        assert_eq!(rerouted.query("q"), Some("1"));
        assert_eq!(rerouted.header("accept"), Some("text/html"));
        assert_eq!(rerouted.body().get("k"), Some(&Value::Int(1)));
    }
}

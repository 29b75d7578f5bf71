//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile `{name}` path templates into anchored regular expressions
//! - Extract named parameter values from a matching path
//!
//! # Design Decisions
//! - Each `{name}` token matches one run of non-`/` characters
//! - Literal text is escaped, so `.` or `+` in a path only match themselves
//! - Purely numeric tokens (`{0}`) compile to anonymous groups and are never surfaced
//! - Patterns are anchored at both ends; callers trim `/` from the request path

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Error raised when a route path cannot be compiled.
#[derive(Debug, thiserror::Error)]
#[error("invalid route pattern {path:?}: {source}")]
pub struct PatternError {
    pub path: String,
    #[source]
    pub source: regex::Error,
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("token pattern is valid"))
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
}

impl PathPattern {
    /// Compile a path template such as `items/{id}`.
    pub fn compile(path: &str) -> Result<Self, PatternError> {
        let path = path.trim_matches('/');
        let mut source = String::with_capacity(path.len() + 16);
        source.push('^');

        let mut last = 0;
        for caps in token_regex().captures_iter(path) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            source.push_str(&regex::escape(&path[last..token.start()]));

            let name = name.as_str();
            if name.bytes().all(|b| b.is_ascii_digit()) {
                source.push_str("([^/]+)");
            } else {
                source.push_str("(?P<");
                source.push_str(name);
                source.push_str(">[^/]+)");
            }
            last = token.end();
        }
        source.push_str(&regex::escape(&path[last..]));
        source.push('$');

        let regex = Regex::new(&source).map_err(|source| PatternError {
            path: path.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// The compiled expression; identical templates compile to identical sources.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Match a full path (without leading/trailing `/`), returning named captures.
    pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.regex
                .capture_names()
                .flatten()
                .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern() {
        let pattern = PathPattern::compile("/items/").unwrap();
        assert_eq!(pattern.captures("items"), Some(HashMap::new()));
        assert!(pattern.captures("items/1").is_none());
        assert!(pattern.captures("xitems").is_none());
    }

    #[test]
    fn named_parameter() {
        let pattern = PathPattern::compile("items/{id}").unwrap();
        let params = pattern.captures("items/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(pattern.captures("items/42/extra").is_none());
        assert!(pattern.captures("items/").is_none());
    }

    #[test]
    fn multiple_parameters_and_mixed_segments() {
        let pattern = PathPattern::compile("users/{user}/posts/{post}").unwrap();
        let params = pattern.captures("users/ann/posts/7").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["user"], "ann");
        assert_eq!(params["post"], "7");

        let pattern = PathPattern::compile("files/v{version}.json").unwrap();
        let params = pattern.captures("files/v2.json").unwrap();
        assert_eq!(params["version"], "2");
        assert!(pattern.captures("files/v2xjson").is_none());
    }

    #[test]
    fn numeric_tokens_are_not_surfaced() {
        let pattern = PathPattern::compile("archive/{0}/{name}").unwrap();
        let params = pattern.captures("archive/2024/report").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params["name"], "report");
    }

    #[test]
    fn identical_templates_compile_identically() {
        let a = PathPattern::compile("/a/{x}").unwrap();
        let b = PathPattern::compile("a/{x}/").unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = PathPattern::compile("pair/{id}/{id}").unwrap_err();
        assert_eq!(err.path, "pair/{id}/{id}");
    }
}

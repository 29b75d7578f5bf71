//! Response model and wire serialization.
//!
//! # Responsibilities
//! - Represent a handler outcome: status, optional content, optional redirect
//! - Provide constructors for the common shapes (JSON, HTML, text, redirect)
//! - Convert into an HTTP response for hyper
//!
//! # Design Decisions
//! - Immutable once built; handlers return it by value
//! - A redirect always serializes as `307 Temporary Redirect` with a `Location` header
//! - Content-Length is always explicit (no chunked bodies)

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use serde::Serialize;

pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";

/// A byte payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    data: Bytes,
    content_type: String,
}

impl Content {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// The outcome of handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    content: Option<Content>,
    redirect: Option<String>,
}

impl Response {
    /// A response with a status code and no content.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content: None,
            redirect: None,
        }
    }

    pub fn with_content(status: u16, content: Content) -> Self {
        Self {
            status,
            content: Some(content),
            redirect: None,
        }
    }

    /// Serialize `data` as JSON.
    pub fn json<T: Serialize + ?Sized>(status: u16, data: &T) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(data)?;
        Ok(Self::with_content(
            status,
            Content::new(bytes, crate::http::body::APPLICATION_JSON),
        ))
    }

    /// A `200 OK` HTML page.
    pub fn html(text: impl Into<String>) -> Self {
        Self::with_content(200, Content::new(text.into(), TEXT_HTML))
    }

    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self::with_content(status, Content::new(text.into(), TEXT_PLAIN))
    }

    /// A temporary redirect to a route or resource path.
    pub fn redirect(path: impl Into<String>) -> Self {
        Self {
            status: StatusCode::TEMPORARY_REDIRECT.as_u16(),
            content: None,
            redirect: Some(path.into()),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    pub fn redirect_path(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Convert into an HTTP response ready to be written to the connection.
    ///
    /// Invalid status codes degrade to `500`.
    pub fn into_http(self) -> axum::http::Response<Body> {
        if let Some(target) = self.redirect {
            let location = format!("/{}", target.trim_start_matches('/'));
            let mut response = axum::http::Response::new(Body::empty());
            *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
            if let Ok(value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, value);
            }
            response
                .headers_mut()
                .insert(header::CONTENT_LENGTH, HeaderValue::from(0u64));
            return response;
        }

        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.content {
            Some(content) => {
                let length = content.data.len() as u64;
                let mut response = axum::http::Response::new(Body::from(content.data));
                *response.status_mut() = status;
                if let Ok(value) = HeaderValue::from_str(&content.content_type) {
                    response.headers_mut().insert(header::CONTENT_TYPE, value);
                }
                response
                    .headers_mut()
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(length));
                response
            }
            None => {
                let mut response = axum::http::Response::new(Body::empty());
                *response.status_mut() = status;
                response
                    .headers_mut()
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(0u64));
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_serializes_as_307_with_location() {
        let response = Response::redirect("error");
        assert_eq!(response.status(), 307);
        assert_eq!(response.redirect_path(), Some("error"));

        let http = response.into_http();
        assert_eq!(http.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(http.headers()[header::LOCATION], "/error");
    }

    #[test]
    fn content_sets_headers() {
        let http = Response::html("<p>hi</p>").into_http();
        assert_eq!(http.status(), StatusCode::OK);
        assert_eq!(http.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(http.headers()[header::CONTENT_LENGTH], "9");
    }

    #[test]
    fn json_content() {
        let response = Response::json(201, &serde_json::json!({"id": 7})).unwrap();
        assert_eq!(response.status(), 201);
        let content = response.content().unwrap();
        assert_eq!(content.content_type(), "application/json");
        assert_eq!(content.data().as_ref(), br#"{"id":7}"#);
    }

    #[test]
    fn bare_status() {
        let http = Response::new(404).into_http();
        assert_eq!(http.status(), StatusCode::NOT_FOUND);
        assert_eq!(http.headers()[header::CONTENT_LENGTH], "0");

        let http = Response::new(1000).into_http();
        assert_eq!(http.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

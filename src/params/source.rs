//! Per-request context and raw value lookup.
//!
//! # Lookup Table
//! ```text
//! GET, HEAD                            → query string
//! application/x-www-form-urlencoded    → parsed form body
//! application/json, */*+json           → parsed JSON body (top-level keys)
//! multipart/form-data                  → text parts; files via the upload gate
//! ```

use std::collections::HashMap;

use axum::http::{header, Extensions, HeaderMap, Method, Uri};
use serde_json::Value;

use crate::params::value::ParamValue;
use crate::upload::UploadedFile;

/// Body encoding selected from the `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Form,
    Multipart,
    Other,
}

impl ContentKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return ContentKind::Other;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "multipart/form-data" => ContentKind::Multipart,
            "application/x-www-form-urlencoded" => ContentKind::Form,
            "application/json" => ContentKind::Json,
            other if other.ends_with("+json") => ContentKind::Json,
            _ => ContentKind::Other,
        }
    }
}

/// Parsed request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Form(HashMap<String, String>),
    Json(Value),
    /// Text parts of a multipart body.
    Multipart(HashMap<String, String>),
}

/// Everything parameter resolution may read from one request.
///
/// Injected as-is into context-bound argument positions.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub extensions: Extensions,
    pub query: HashMap<String, String>,
    pub body: RequestBody,
    /// Files accepted by the upload gate, by field name.
    pub files: HashMap<String, Vec<UploadedFile>>,
}

impl RequestContext {
    /// GET and HEAD carry their parameters in the query string.
    pub fn reads_query(&self) -> bool {
        matches!(self.method, Method::GET | Method::HEAD)
    }

    /// Raw value for a non-file parameter.
    pub fn raw_value(&self, name: &str) -> Option<Value> {
        if self.reads_query() {
            return self.query.get(name).map(|v| Value::String(v.clone()));
        }

        match &self.body {
            RequestBody::Form(fields) | RequestBody::Multipart(fields) => {
                fields.get(name).map(|v| Value::String(v.clone()))
            }
            RequestBody::Json(body) => body.get(name).cloned(),
            RequestBody::Empty => None,
        }
    }

    /// Uploaded file(s) for a file parameter: all of them when `multiple`,
    /// otherwise the first.
    pub fn file_value(&self, name: &str, multiple: bool) -> Option<ParamValue> {
        let files = self.files.get(name).filter(|files| !files.is_empty())?;
        if multiple {
            Some(ParamValue::Files(files.clone()))
        } else {
            files.first().cloned().map(ParamValue::File)
        }
    }
}

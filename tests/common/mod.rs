//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use annotated_router::{
    params::ParamError, Argument, Arguments, BeforeMiddleware, BoxError, Controller, MiddlewareRef, ParamValue,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Ordered log of middleware and handler executions.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Echoes its resolved arguments back as JSON.
///
/// Method `fail` returns an opaque error; `reject` returns a parameter error.
pub struct Echo {
    pub log: CallLog,
}

impl Echo {
    pub fn new(log: CallLog) -> Arc<Self> {
        Arc::new(Self { log })
    }
}

#[async_trait]
impl Controller for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    async fn call(&self, method: &str, args: Arguments) -> Result<Response, BoxError> {
        self.log.lock().unwrap().push(format!("handler:{}", method));
        match method {
            "fail" => Err("storage unavailable".into()),
            "reject" => Err(ParamError::Validation {
                name: "email".into(),
                message: "already taken".into(),
            }
            .into()),
            _ => Ok(Json(json!({ "args": args_json(&args) })).into_response()),
        }
    }
}

fn args_json(args: &Arguments) -> Vec<Value> {
    args.iter()
        .map(|arg| match arg {
            Argument::Context(ctx) => json!({ "context": ctx.uri.path() }),
            Argument::Absent => Value::Null,
            Argument::Value(value) => value_json(value),
        })
        .collect()
}

fn value_json(value: &ParamValue) -> Value {
    match value {
        ParamValue::Number(n) => json!(n),
        ParamValue::String(s) => json!(s),
        ParamValue::Bool(b) => json!(b),
        ParamValue::Json(v) => v.clone(),
        ParamValue::File(f) => json!({ "file": f.file_name, "size": f.size() }),
        ParamValue::Files(files) => files
            .iter()
            .map(|f| json!({ "file": f.file_name, "size": f.size() }))
            .collect(),
    }
}

/// Middleware that records its label, optionally stopping the chain.
pub struct Mark {
    label: &'static str,
    log: CallLog,
    stop: bool,
}

#[async_trait]
impl BeforeMiddleware for Mark {
    async fn handle(&self, req: Request<Body>, next: Next) -> Response {
        self.log.lock().unwrap().push(self.label.to_string());
        if self.stop {
            return (StatusCode::FORBIDDEN, "stopped").into_response();
        }
        next.run(req).await
    }
}

pub fn mark(label: &'static str, log: &CallLog) -> MiddlewareRef {
    let log = log.clone();
    MiddlewareRef::from_factory(label, move || {
        Ok(Mark {
            label,
            log: log.clone(),
            stop: false,
        })
    })
}

pub fn stop(label: &'static str, log: &CallLog) -> MiddlewareRef {
    let log = log.clone();
    MiddlewareRef::from_factory(label, move || {
        Ok(Mark {
            label,
            log: log.clone(),
            stop: true,
        })
    })
}

/// Like `mark`, counting factory calls in `calls`.
///
/// Once `limit` instances have been built, further calls fail.
pub fn counted(label: &'static str, log: &CallLog, calls: &Arc<AtomicUsize>, limit: Option<usize>) -> MiddlewareRef {
    let log = log.clone();
    let calls = calls.clone();
    MiddlewareRef::from_factory(label, move || {
        let built = calls.fetch_add(1, Ordering::SeqCst);
        if limit.is_some_and(|limit| built >= limit) {
            return Err("instance limit reached".into());
        }
        Ok(Mark {
            label,
            log: log.clone(),
            stop: false,
        })
    })
}

/// Send one request through `router`, returning status and body text.
pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Resolved arguments from an `Echo` response body.
pub fn echoed(body: &str) -> Vec<Value> {
    let value: Value = serde_json::from_str(body).unwrap();
    value["args"].as_array().cloned().unwrap_or_default()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const BOUNDARY: &str = "TESTBOUNDARY";

/// A multipart part: (field, file name for file parts, content).
pub type Part<'a> = (&'a str, Option<&'a str>, &'a str);

pub fn post_multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                name, file_name
            )),
            None => body.push_str(&format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

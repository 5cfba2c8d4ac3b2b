//! Sample controller served by the binary.

use std::sync::Arc;

use annotated_router::{
    handler::UnknownMethod, Arguments, BeforeMiddleware, BoxError, Constraint, Controller, MiddlewareRef,
    ParamKind, RequestParam, RouteRegistry,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Rejects requests without an `x-api-key` header.
#[derive(Default)]
pub struct RequireApiKey;

#[async_trait]
impl BeforeMiddleware for RequireApiKey {
    async fn handle(&self, req: Request<Body>, next: Next) -> Response {
        if req.headers().contains_key("x-api-key") {
            next.run(req).await
        } else {
            (StatusCode::UNAUTHORIZED, "Missing x-api-key header").into_response()
        }
    }
}

/// Logs the request line before the handler runs.
#[derive(Default)]
pub struct LogRequest;

#[async_trait]
impl BeforeMiddleware for LogRequest {
    async fn handle(&self, req: Request<Body>, next: Next) -> Response {
        tracing::info!(method = %req.method(), uri = %req.uri(), "Demo request");
        next.run(req).await
    }
}

pub struct Users;

#[async_trait]
impl Controller for Users {
    fn name(&self) -> &str {
        "users"
    }

    async fn call(&self, method: &str, args: Arguments) -> Result<Response, BoxError> {
        let body = match method {
            "show" => json!({ "id": args.number(0) }),
            "search" => json!({
                "q": args.string(0),
                "page": args.number(1),
                "active": args.boolean(2),
                "order": args.string(3),
            }),
            "create" => json!({
                "name": args.string(1),
                "age": args.number(2),
                "agent": args
                    .context(0)
                    .and_then(|ctx| ctx.headers.get("user-agent"))
                    .and_then(|v| v.to_str().ok()),
            }),
            "avatar" => {
                let file = args.file(0);
                json!({
                    "file": file.map(|f| f.file_name.clone()),
                    "size": file.map(|f| f.size()),
                })
            }
            "gallery" => json!({
                "files": args
                    .files(0)
                    .map(|files| files.iter().map(|f| f.file_name.clone()).collect::<Vec<_>>())
                    .unwrap_or_default(),
            }),
            other => return Err(UnknownMethod::new(self.name(), other).into()),
        };
        Ok(Json(body).into_response())
    }
}

/// Declare the demo routes.
pub fn register(registry: &mut RouteRegistry) {
    registry.register_handler(Arc::new(Users));

    registry
        .method("users", "show")
        .get("/users", &[ParamKind::Number])
        .param(0, RequestParam::new("id").constraint(Constraint::Min(1.0)));

    registry
        .method("users", "search")
        .get(
            "/users/search",
            &[ParamKind::String, ParamKind::Number, ParamKind::Boolean, ParamKind::String],
        )
        .param(0, RequestParam::new("q").optional())
        .param(1, RequestParam::new("page").with_default(1i64))
        .param(2, RequestParam::new("active").optional())
        .param(
            3,
            RequestParam::new("order")
                .enum_value("asc", "ascending")
                .enum_value("desc", "descending")
                .with_default("ascending"),
        );

    registry
        .method("users", "create")
        .post(
            "/users",
            &[ParamKind::Custom("RequestContext".into()), ParamKind::String, ParamKind::Number],
        )
        .before(MiddlewareRef::of::<LogRequest>())
        .context(0)
        .param(1, RequestParam::new("name").constraint(Constraint::MinLength(2)))
        .param(2, RequestParam::new("age").optional());

    registry
        .method("users", "avatar")
        .post("/users/avatar", &[ParamKind::Custom("File".into())])
        .before(MiddlewareRef::of::<LogRequest>())
        .before(MiddlewareRef::of::<RequireApiKey>())
        .param(0, RequestParam::new("avatar").file());

    registry
        .method("users", "gallery")
        .post("/users/gallery", &[ParamKind::Custom("File[]".into())])
        .param(0, RequestParam::new("photos").file().multiple().max_count(5));
}

//! Assembled routes served through `tower::ServiceExt::oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use annotated_router::{attach_routes, ParamKind, RequestParam, RouteRegistry, RouterOptions};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::json;

mod common;

use common::{call_log, counted, echoed, get, mark, post_json, post_multipart, send, stop, CallLog, Echo};

fn assemble(registry: RouteRegistry) -> Router {
    attach_routes(Router::new(), registry, &RouterOptions::default()).expect("routes should assemble")
}

fn echo_registry(log: &CallLog) -> RouteRegistry {
    let mut registry = RouteRegistry::new();
    registry.register_handler(Echo::new(log.clone()));
    registry
}

#[tokio::test]
async fn test_required_number_from_query() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "show")
        .get("/users", &[ParamKind::Number])
        .param(0, RequestParam::new("id"));
    let router = assemble(registry);

    let (status, body) = send(&router, get("/users?id=7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed(&body), vec![json!(7.0)]);

    let (status, body) = send(&router, get("/users")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("id"), "body should name the parameter: {}", body);
    // The handler never ran for the rejected request.
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_head_reads_query_like_get() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "show")
        .get("/users", &[ParamKind::Number])
        .param(0, RequestParam::new("id"));
    let router = assemble(registry);

    let req = Request::builder()
        .method("HEAD")
        .uri("/users?id=7")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*log.lock().unwrap(), vec!["handler:show"]);
}

#[tokio::test]
async fn test_number_coercion_rules() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "page")
        .get("/page", &[ParamKind::Number])
        .param(0, RequestParam::new("n").with_default(3i64));
    let router = assemble(registry);

    let (status, body) = send(&router, get("/page?n=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("abc"));

    let (_, body) = send(&router, get("/page?n=")).await;
    assert_eq!(echoed(&body), vec![json!(3.0)]);

    let (_, body) = send(&router, get("/page?n=42")).await;
    assert_eq!(echoed(&body), vec![json!(42.0)]);
}

#[tokio::test]
async fn test_boolean_and_optional_params() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "flags")
        .get("/flags", &[ParamKind::Boolean, ParamKind::Boolean, ParamKind::String])
        .param(0, RequestParam::new("a"))
        .param(1, RequestParam::new("b"))
        .param(2, RequestParam::new("note").optional());
    let router = assemble(registry);

    let (status, body) = send(&router, get("/flags?a=yes&b=false")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed(&body), vec![json!(true), json!(false), json!(null)]);

    let (_, body) = send(&router, get("/flags?a=true&b=&note=hi")).await;
    assert_eq!(echoed(&body), vec![json!(true), json!(false), json!("hi")]);
}

#[tokio::test]
async fn test_arguments_follow_index_order() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .register_param("echo", "pair", 1, annotated_router::ParamBinding::Request(RequestParam::new("second")))
        .register_param("echo", "pair", 0, annotated_router::ParamBinding::Request(RequestParam::new("first")))
        .register_route("echo", "pair", "/pair", Method::GET, &[ParamKind::String, ParamKind::String]);
    let router = assemble(registry);

    let (_, body) = send(&router, get("/pair?second=b&first=a")).await;
    assert_eq!(echoed(&body), vec![json!("a"), json!("b")]);
}

#[tokio::test]
async fn test_context_and_json_body() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "create")
        .post("/users", &[ParamKind::Custom("Context".into()), ParamKind::String, ParamKind::Number])
        .context(0)
        .param(1, RequestParam::new("name"))
        .param(2, RequestParam::new("age"));
    let router = assemble(registry);

    let (status, body) = send(&router, post_json("/users", json!({"name": "ada", "age": "36"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed(&body), vec![json!({"context": "/users"}), json!("ada"), json!(36.0)]);
}

#[tokio::test]
async fn test_form_body() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "login")
        .post("/login", &[ParamKind::String, ParamKind::Boolean])
        .param(0, RequestParam::new("user"))
        .param(1, RequestParam::new("remember").optional());
    let router = assemble(registry);

    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("user=kim&remember=on"))
        .unwrap();
    let (_, body) = send(&router, req).await;
    assert_eq!(echoed(&body), vec![json!("kim"), json!(true)]);
}

#[tokio::test]
async fn test_single_file_is_not_an_array() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "avatar")
        .post("/avatar", &[ParamKind::Custom("File".into()), ParamKind::String])
        .param(0, RequestParam::new("avatar").file())
        .param(1, RequestParam::new("caption"));
    let router = assemble(registry);

    let req = post_multipart(
        "/avatar",
        &[("caption", None, "me"), ("avatar", Some("me.png"), "PNGDATA")],
    );
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed(&body), vec![json!({"file": "me.png", "size": 7}), json!("me")]);
}

#[tokio::test]
async fn test_multiple_files_are_an_array() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "gallery")
        .post("/gallery", &[ParamKind::Custom("File[]".into())])
        .param(0, RequestParam::new("photos").file().multiple());
    let router = assemble(registry);

    let req = post_multipart(
        "/gallery",
        &[("photos", Some("a.jpg"), "aa"), ("photos", Some("b.jpg"), "bbb")],
    );
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        echoed(&body),
        vec![json!([{"file": "a.jpg", "size": 2}, {"file": "b.jpg", "size": 3}])]
    );
}

#[tokio::test]
async fn test_missing_required_file() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "avatar")
        .post("/avatar", &[ParamKind::Custom("File".into())])
        .param(0, RequestParam::new("avatar").file());
    let router = assemble(registry);

    let (status, body) = send(&router, post_multipart("/avatar", &[("other", None, "x")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("avatar"));
}

#[tokio::test]
async fn test_undeclared_file_field_is_rejected() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "avatar")
        .post("/avatar", &[ParamKind::Custom("File".into())])
        .param(0, RequestParam::new("avatar").file().optional());
    let router = assemble(registry);

    let (status, body) = send(&router, post_multipart("/avatar", &[("resume", Some("cv.pdf"), "x")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("resume"));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_middleware_runs_in_declaration_order() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry.register_middleware("echo", "secure", mark("first", &log));
    registry.register_route("echo", "secure", "/secure", Method::GET, &[]);
    registry.register_middleware("echo", "secure", mark("second", &log));
    let router = assemble(registry);

    let (status, body) = send(&router, get("/secure")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(echoed(&body).is_empty());
    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "handler:secure"]);
}

#[tokio::test]
async fn test_middleware_can_stop_the_chain() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "admin")
        .get("/admin", &[])
        .before(stop("guard", &log))
        .before(mark("after", &log));
    let router = assemble(registry);

    let (status, _) = send(&router, get("/admin")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(*log.lock().unwrap(), vec!["guard"]);
}

#[tokio::test]
async fn test_middleware_is_built_per_request() {
    let log = call_log();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "audit")
        .get("/audit", &[])
        .before(counted("audit", &log, &calls, None));
    let router = assemble(registry);
    // One instance is built while assembling.
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    for _ in 0..2 {
        let (status, _) = send(&router, get("/audit")).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["audit", "handler:audit", "audit", "handler:audit"]
    );
}

#[tokio::test]
async fn test_middleware_build_failure_is_a_server_error() {
    let log = call_log();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "audit")
        .get("/audit", &[])
        .before(counted("audit", &log, &calls, Some(1)));
    let router = assemble(registry);

    let (status, body) = send(&router, get("/audit")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("instance limit"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_parameter_errors_stop_before_the_handler() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "show")
        .get("/show", &[ParamKind::Number])
        .before(mark("before", &log))
        .param(0, RequestParam::new("id"));
    let router = assemble(registry);

    let (status, _) = send(&router, get("/show")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(*log.lock().unwrap(), vec!["before"]);
}

#[tokio::test]
async fn test_handler_failures() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry.method("echo", "fail").get("/fail", &[]);
    registry.method("echo", "reject").get("/reject", &[]);
    let router = assemble(registry);

    let (status, body) = send(&router, get("/fail")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("storage"));

    let (status, body) = send(&router, get("/reject")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("already taken"));
}

#[tokio::test]
async fn test_no_bindings_ignores_body() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry.method("echo", "ping").post("/ping", &[]);
    let router = assemble(registry);

    let req = Request::builder()
        .method("POST")
        .uri("/ping")
        .header("content-type", "application/json")
        .body(Body::from("{broken"))
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(echoed(&body).is_empty());
}

#[tokio::test]
async fn test_malformed_json_with_bindings() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "create")
        .post("/users", &[ParamKind::String])
        .param(0, RequestParam::new("name"));
    let router = assemble(registry);

    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{broken"))
        .unwrap();
    let (status, _) = send(&router, req).await;
    assert!(status.is_client_error());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_header() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry.method("echo", "ping").get("/ping", &[]);
    let router = assemble(registry);

    use tower::ServiceExt;
    let response = router.clone().oneshot(get("/ping")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let req = Request::builder()
        .uri("/ping")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_body_limit() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry
        .method("echo", "create")
        .post("/users", &[ParamKind::String])
        .param(0, RequestParam::new("name"));
    let options = RouterOptions {
        body_limit_bytes: 16,
        ..RouterOptions::default()
    };
    let router = attach_routes(Router::new(), registry, &options).unwrap();

    let (status, _) = send(&router, post_json("/users", json!({"name": "a very long name indeed"}))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_existing_app_routes_are_kept() {
    let log = call_log();
    let mut registry = echo_registry(&log);
    registry.method("echo", "ping").get("/ping", &[]);

    let app = Router::new().route("/health", axum::routing::get(|| async { "ok" }));
    let router = attach_routes(app, registry, &RouterOptions::default()).unwrap();

    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = send(&router, get("/ping")).await;
    assert_eq!(status, StatusCode::OK);
}

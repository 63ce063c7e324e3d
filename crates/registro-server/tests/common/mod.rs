#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use registro_server::config::Config;
use registro_server::App;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub config: Config,
    pub dir: TempDir,
}

pub async fn setup() -> TestApp {
    setup_with(|_, _| {}).await
}

pub async fn setup_with(customize: impl FnOnce(&mut Config, &Path)) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let mut config = Config {
        database_url: format!("sqlite://{}", dir.path().join("registro.db").display()),
        static_dir: dir.path().join("static"),
        pdf_dir: dir.path().join("pdfs"),
        ..Config::default()
    };
    customize(&mut config, dir.path());

    let app = App::new(config.clone()).await.expect("Failed to create app");
    let pool = app.db().clone();

    TestApp {
        router: app.router(),
        pool,
        config,
        dir,
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let res = router.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn put_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub fn campo_norte() -> Value {
    json!({
        "name": "Campo Norte",
        "owner_email": "a@b.com",
        "cuit": "20-12345678-9",
        "address": "Ruta 40 km 10"
    })
}

pub fn submission(n: u32) -> Value {
    json!({
        "input_text": format!("Establecimiento {n}"),
        "email": format!("owner{n}@example.com"),
        "numeric_field_4": format!("20-{n:08}-9"),
        "input_text_24": format!("Ruta {n}"),
        "phone": "+54 299 555 0000"
    })
}

pub async fn register(router: &Router, body: &Value) -> Value {
    let (status, json) = post_json(router, "/webhook", body).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {json}");
    json
}

pub async fn establishment_count(router: &Router) -> usize {
    let (status, json) = get_json(router, "/establishments").await;
    assert_eq!(status, StatusCode::OK);
    json.as_array().unwrap().len()
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_fake(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

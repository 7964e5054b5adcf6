//! Integration test: Server API endpoints

use recapp::pipeline::PipelineConfig;
use recapp::server::{create_router, AppState, ServerConfig};
use std::sync::Arc;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "recapp-test-boundary";

const DATASET_A: &str = "\
no,name,height,weight,category
1,Ana,150,45,S
2,Budi,155,50,S
3,Cici,160,55,M
4,Dedi,165,60,M
5,Eka,,62,M
6,Fajar,170,65,M
7,Gita,175,70,L
8,Hadi,180,75,L
9,Indah,185,80,L
10,Joko,300,85,L
";

const DATASET_B: &str = "\
no,name,age,income,segment
1,a,21,100,young
2,b,23,120,young
3,c,25,130,young
4,d,41,300,old
5,e,45,320,old
";

fn test_app() -> (axum::Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        media_dir: dir.path().to_path_buf(),
        max_upload_size: 1024 * 1024,
    };
    let state = Arc::new(AppState::new(config, PipelineConfig::default()).unwrap());
    (create_router(state), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn upload(file_name: &str, contents: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        c = contents
    );
    Request::builder()
        .method(Method::POST)
        .uri("/api/dataset/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

fn predict_form(form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["dataset"].is_null());
}

#[tokio::test]
async fn test_predict_without_dataset_is_not_found() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, predict_form("nama=Ana&height=170&weight=65")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_predict_wrong_method() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, get("/api/predict")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn test_summary_without_dataset() {
    let (app, _dir) = test_app();
    let (status, _) = send(&app, get("/api/summary")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_and_predict() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, upload("body.csv", DATASET_A)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["filename"], "body.csv");
    assert_eq!(body["data"]["rows"], 10);
    assert_eq!(body["data"]["input_label"][0]["key"], "height");
    assert_eq!(body["data"]["input_label"][1]["value"], "weight");

    let (status, body) = send(&app, predict_form("nama=Ana&height=170&weight=65")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    let data = &body["data"];
    assert_eq!(data["nama"], "Ana");
    let prediction = data["prediction"].as_str().unwrap();
    assert!(["S", "M", "L"].contains(&prediction));
    assert_eq!(data["data_train"].as_u64().unwrap() + data["data_test"].as_u64().unwrap(), 8);
    assert!(data["report"]["classes"].is_array());
}

#[tokio::test]
async fn test_predict_missing_field_is_bad_request() {
    let (app, _dir) = test_app();
    send(&app, upload("body.csv", DATASET_A)).await;

    let (status, body) = send(&app, predict_form("nama=Ana&height=170")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("weight"));
}

#[tokio::test]
async fn test_second_upload_replaces_first() {
    let (app, dir) = test_app();
    send(&app, upload("a.csv", DATASET_A)).await;
    send(&app, upload("b.csv", DATASET_B)).await;

    let (status, body) = send(&app, get("/api/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], serde_json::json!(["young", "old"]));
    assert_eq!(body["count"], serde_json::json!([3, 2]));

    let (_, body) = send(&app, get("/api/dataset")).await;
    assert_eq!(body["data"]["filename"], "b.csv");
    assert!(!dir.path().join("a.csv").exists());

    let (status, body) = send(&app, predict_form("nama=Budi&age=30&income=150")).await;
    assert_eq!(status, StatusCode::OK);
    let prediction = body["data"]["prediction"].as_str().unwrap();
    assert!(["young", "old"].contains(&prediction));

    let (status, body) = send(&app, predict_form("nama=Budi&height=170&weight=65")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
    assert!(body["message"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn test_invalid_upload_keeps_previous() {
    let (app, _dir) = test_app();
    send(&app, upload("a.csv", DATASET_A)).await;

    let (status, body) = send(&app, upload("empty.csv", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);

    let (status, body) = send(&app, upload("notes.txt", DATASET_B)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);

    let (_, body) = send(&app, get("/api/dataset")).await;
    assert_eq!(body["data"]["filename"], "a.csv");
}

#[tokio::test]
async fn test_delete_dataset() {
    let (app, _dir) = test_app();
    send(&app, upload("a.csv", DATASET_A)).await;

    let delete = || Request::builder().method(Method::DELETE).uri("/api/dataset").body(Body::empty()).unwrap();
    let (status, body) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], true);

    let post_delete = Request::builder().method(Method::POST).uri("/api/dataset/delete").body(Body::empty()).unwrap();
    let (status, body) = send(&app, post_delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], false);

    let (status, _) = send(&app, get("/api/dataset")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, get("/api/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
}

fn json_predict() -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"height": 170}"#))
        .unwrap()
}

#[tokio::test]
async fn test_predict_wrong_content_type_without_dataset() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, json_predict()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn test_predict_wrong_content_type_is_json_error() {
    let (app, _dir) = test_app();
    send(&app, upload("body.csv", DATASET_A)).await;

    let (status, body) = send(&app, json_predict()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_upload_without_multipart_is_json_error() {
    let (app, _dir) = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/dataset/upload")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(DATASET_A))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_delete_runs_while_dataset_present() {
    let (app, dir) = test_app();
    send(&app, upload("a.csv", DATASET_A)).await;

    let request = Request::builder().method(Method::DELETE).uri("/api/dataset").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], true);
    assert!(!dir.path().join("a.csv").exists());
}

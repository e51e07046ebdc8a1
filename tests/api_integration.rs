//! Integration tests for the JSON API feature.

#![cfg(feature = "api")]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use colab_planner::api::{AppState, router};
use colab_planner::config::PlannerConfig;

fn state_for(preset: &str) -> Arc<AppState> {
    let config = PlannerConfig::from_preset(preset).unwrap();
    Arc::new(AppState::from_config(&config))
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn projection_defaults_follow_preset() {
    let (status, json) = get_json(state_for("ev_heavy"), "/projection").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["participationPct"], 45);
    assert_eq!(json["display"]["baseline"]["peak"], "300");
}

#[tokio::test]
async fn projection_query_uses_leading_integer() {
    let (_, json) = get_json(state_for("default"), "/projection?participation=60abc").await;
    assert_eq!(json["participationPct"], 60);
    assert_eq!(json["display"]["strategyA"]["cost"], "82");

    let (_, json) = get_json(state_for("default"), "/projection?participation=abc").await;
    assert_eq!(json["participationPct"], 30);
}

#[tokio::test]
async fn chart_and_curves_share_seeded_data() {
    let (status, chart) = get_json(state_for("default"), "/chart?seed=3").await;
    assert_eq!(status, StatusCode::OK);
    let (_, curves) = get_json(state_for("default"), "/curves?seed=3").await;

    let series = chart["series"].as_array().unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series[0]["data"], curves["baseline"]);
    assert_eq!(series[2]["data"], curves["strategyB"]);
    assert_eq!(chart["labels"].as_array().map(Vec::len), Some(24));
}

#[tokio::test]
async fn bad_seed_is_rejected() {
    let (status, json) = get_json(state_for("default"), "/curves?seed=-4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("seed"));
}

struct ChildGuard {
    child: Child,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn serve_flag_exposes_projection_over_http() {
    let port = allocate_port();
    let child = Command::new(env!("CARGO_BIN_EXE_colab-planner"))
        .args(["--preset", "solar_rich", "--serve", "--port", &port.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("colab-planner process should spawn");
    let _guard = ChildGuard { child };

    let addr = format!("127.0.0.1:{port}");
    let body = wait_for_body(&addr, "/projection", Duration::from_secs(8));
    let json: Value = serde_json::from_str(&body).expect("projection body should be JSON");
    assert_eq!(json["participationPct"], 40);
}

fn allocate_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port bind should succeed");
    listener
        .local_addr()
        .expect("local_addr should be available")
        .port()
}

fn wait_for_body(addr: &str, path: &str, timeout: Duration) -> String {
    let start = Instant::now();
    loop {
        if let Ok((200, body)) = http_get(addr, path) {
            return body;
        }
        if start.elapsed() >= timeout {
            panic!("timed out waiting for API server on {addr}");
        }
        thread::sleep(Duration::from_millis(50));
    }
}

fn http_get(addr: &str, path: &str) -> Result<(u16, String), String> {
    let mut stream = TcpStream::connect(addr).map_err(|err| format!("connect: {err}"))?;
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .map_err(|err| format!("write: {err}"))?;

    let mut raw = String::new();
    stream
        .read_to_string(&mut raw)
        .map_err(|err| format!("read: {err}"))?;

    let (head, body) = raw
        .split_once("\r\n\r\n")
        .ok_or_else(|| "invalid HTTP response".to_string())?;
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| "missing status code".to_string())?
        .parse::<u16>()
        .map_err(|err| format!("invalid status code: {err}"))?;

    Ok((status, body.to_string()))
}

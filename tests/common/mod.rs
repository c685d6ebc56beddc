//! In-process mock of the gate service.
//!
//! `POST /` answers like the real gate for `bird_missing_v1`: STOP without a
//! binding, RESOLVED for `james`/`jenny`, INVALID_BINDING otherwise. Other
//! routes produce the failure shapes the client must classify.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct Recorded(pub Arc<Mutex<Vec<Value>>>);

impl Recorded {
    pub fn bodies(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

async fn gate(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.0.lock().unwrap().push(body.clone());

    let reply = match body["binding"].as_str() {
        None => json!({
            "status": "STOP",
            "question": "Which bird is missing?",
            "options": [
                {"id": "james", "label": "James's bird"},
                {"id": "jenny", "label": "Jenny's bird"}
            ]
        }),
        Some(owner @ ("james" | "jenny")) => json!({
            "status": "RESOLVED",
            "statement": format!("{owner}'s bird is missing.")
        }),
        Some(_) => json!({
            "status": "INVALID_BINDING",
            "message": "Binding does not name a candidate."
        }),
    };
    Json(reply)
}

async fn always_stop() -> Json<Value> {
    Json(json!({"status": "STOP", "question": "Again?", "options": ["x", "y"]}))
}

/// Serve the mock gate on an ephemeral port; returns its base URL.
pub async fn spawn_gate() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/", post(gate))
        .route("/stop", post(always_stop))
        .route("/down", post(|| async { StatusCode::BAD_GATEWAY }))
        .route("/html", post(|| async { "<html>maintenance</html>" }))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), recorded)
}

/// A URL nothing is listening on.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

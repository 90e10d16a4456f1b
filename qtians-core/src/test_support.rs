//! In-process stand-in for the spreadsheet script, used by tests.

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// How the mock answers history reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    Rows,
    /// Writes are accepted but reads keep serving the old rows.
    Lagging,
    ServerError,
    Garbage,
}

#[derive(Clone)]
pub struct MockSheet {
    pub rows: Arc<Mutex<Vec<Value>>>,
    pub posts: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub reads: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub read_mode: Arc<Mutex<ReadMode>>,
}

impl MockSheet {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            posts: Arc::new(Mutex::new(Vec::new())),
            reads: Arc::new(Mutex::new(Vec::new())),
            read_mode: Arc::new(Mutex::new(ReadMode::Rows)),
        }
    }

    pub fn with_rows(rows: Vec<Value>) -> Self {
        let sheet = Self::new();
        *sheet.rows.lock().unwrap() = rows;
        sheet
    }

    pub fn set_read_mode(&self, mode: ReadMode) {
        *self.read_mode.lock().unwrap() = mode;
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    /// Serves the sheet on an ephemeral port and returns its `/exec` URL.
    pub async fn spawn(&self) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/exec", post(append_row).get(read_rows))
            .with_state(self.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/exec")
    }
}

async fn append_row(
    State(sheet): State<MockSheet>,
    Form(fields): Form<HashMap<String, String>>,
) -> &'static str {
    sheet.posts.lock().unwrap().push(fields.clone());
    if *sheet.read_mode.lock().unwrap() == ReadMode::Lagging {
        return "ok";
    }

    let mut rows = sheet.rows.lock().unwrap();
    let mut row = json!({ "id": rows.len() + 1 });
    for (key, value) in &fields {
        row[key.as_str()] = Value::from(value.clone());
    }
    rows.push(row);
    "ok"
}

async fn read_rows(
    State(sheet): State<MockSheet>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    sheet.reads.lock().unwrap().push(query);
    let mode = *sheet.read_mode.lock().unwrap();
    match mode {
        ReadMode::Rows | ReadMode::Lagging => {
            Json(sheet.rows.lock().unwrap().clone()).into_response()
        }
        ReadMode::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        ReadMode::Garbage => "<html>Script error</html>".into_response(),
    }
}

/// A URL on a port nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/exec")
}

/// A spreadsheet row shaped like the script returns it.
pub fn sheet_row(id: u32, date: &str, name: &str, chapel: &str, village: &str) -> Value {
    json!({
        "id": id,
        "date": date,
        "name": name,
        "chapel": chapel,
        "village": village,
        "scripture": "본문",
    })
}

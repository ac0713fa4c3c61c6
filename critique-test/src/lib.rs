// Integration test utilities and fixtures for critique.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};

use critique_core::llm::{InferenceClient, OpenRouterProvider};
use critique_core::session::Session;
use critique_core::store::JsonFileStore;

/// A credential that passes format validation.
pub const TEST_API_KEY: &str = "sk-or-v1-test-0123456789abcdef0123";

/// A temporary data directory backing a [`JsonFileStore`].
#[derive(Debug)]
pub struct TestData {
    pub dir: tempfile::TempDir,
}

impl TestData {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(self.path().to_path_buf())
    }

    /// A fresh session hydrated from whatever is on disk now.
    pub fn session(&self) -> Session {
        Session::open(Box::new(self.store()))
    }

    /// Overwrite a persisted file with raw text.
    pub fn write_raw(&self, file_name: &str, contents: &str) {
        std::fs::write(self.path().join(file_name), contents).expect("write raw file");
    }

    pub fn read_json(&self, file_name: &str) -> Value {
        let text = std::fs::read_to_string(self.path().join(file_name)).expect("read file");
        serde_json::from_str(&text).expect("parse json")
    }
}

impl Default for TestData {
    fn default() -> Self {
        Self::new()
    }
}

/// A small mixed-language project tree, including files the bundler must skip.
pub fn sample_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    let root = dir.path();
    let files: &[(&str, &str)] = &[
        (
            "app/main.py",
            "from app.db import save\n\ndef handler(req):\n    save(req.body)\n",
        ),
        (
            "app/db.py",
            "import sqlite3\n\ndef save(data):\n    conn = sqlite3.connect('x.db')\n    conn.execute(f\"INSERT INTO t VALUES ('{data}')\")\n",
        ),
        ("web/index.ts", "export function render(): string {\n  return '<h1>hi</h1>';\n}\n"),
        ("node_modules/left-pad/index.js", "module.exports = () => {};\n"),
        ("build/out.js", "console.log('generated');\n"),
        (".env", "SECRET=hunter2\n"),
        ("package-lock.json", "{}\n"),
        ("logo.svg", "<svg/>\n"),
    ];
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create dirs");
        }
        std::fs::write(path, contents).expect("write fixture file");
    }
    dir
}

/// What the mock upstream answers to every request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this JSON body.
    Json(Value),
    /// This status with a plain-text body.
    Status(u16, String),
}

impl Reply {
    /// A well-formed chat completion.
    pub fn completion(text: &str, prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self::Json(json!({
            "choices": [{"message": {"role": "assistant", "content": text}}],
            "usage": {"prompt_tokens": prompt_tokens, "completion_tokens": completion_tokens}
        }))
    }
}

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug)]
struct MockState {
    reply: Reply,
    seen: Mutex<Vec<Captured>>,
}

/// A local HTTP server impersonating the chat-completions endpoint.
#[derive(Debug)]
pub struct MockUpstream {
    addr: SocketAddr,
    state: Arc<MockState>,
    task: tokio::task::JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start(reply: Reply) -> Self {
        let state = Arc::new(MockState {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/chat/completions", post(handle))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { addr, state, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// An inference client pointed at this server.
    pub fn client(&self) -> InferenceClient {
        let provider = OpenRouterProvider::new(TEST_API_KEY.to_string())
            .expect("build provider")
            .with_base_url(self.base_url());
        InferenceClient::with_provider(Box::new(provider))
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.state.seen.lock().expect("mock state lock").clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .seen
        .lock()
        .expect("mock state lock")
        .push(Captured { authorization, body });

    match &state.reply {
        Reply::Json(value) => axum::Json(value.clone()).into_response(),
        Reply::Status(code, text) => {
            let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, text.clone()).into_response()
        }
    }
}

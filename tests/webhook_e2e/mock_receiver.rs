//! Mock receiver for E2E tests.
//!
//! Starts an in-process HTTP server standing in for the GitHub check-runs
//! API, a webhook endpoint and a remote configuration document.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, get, post, web};
use serde_json::{Value, json};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// Check run id returned by the mock API.
pub const CHECK_RUN_ID: u64 = 4242;

/// Check suite id returned by the mock API.
pub const CHECK_SUITE_ID: u64 = 77;

/// A webhook message as it arrived on the wire.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub size: usize,
    pub body: Value,
}

/// A check-run creation request.
#[derive(Debug, Clone)]
pub struct ReceivedCheckRun {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Everything the receiver has seen so far.
#[derive(Default)]
pub struct ReceiverState {
    pub messages: Vec<ReceivedMessage>,
    pub check_runs: Vec<ReceivedCheckRun>,
    pub config_requests: usize,
    pub failing_requests: usize,
    /// Webhook URL handed out by `/config`
    pub configured_webhook: Option<String>,
}

#[post("/webhook")]
async fn webhook_endpoint(
    state: web::Data<Arc<Mutex<ReceiverState>>>,
    body: web::Bytes,
) -> HttpResponse {
    let Ok(value) = serde_json::from_slice::<Value>(&body) else {
        return HttpResponse::BadRequest().finish();
    };
    state.lock().unwrap().messages.push(ReceivedMessage {
        size: body.len(),
        body: value,
    });
    HttpResponse::Ok().finish()
}

#[post("/failing-webhook")]
async fn failing_webhook_endpoint(state: web::Data<Arc<Mutex<ReceiverState>>>) -> HttpResponse {
    state.lock().unwrap().failing_requests += 1;
    HttpResponse::InternalServerError().finish()
}

#[post("/repos/{owner}/{repo}/check-runs")]
async fn check_runs_endpoint(
    state: web::Data<Arc<Mutex<ReceiverState>>>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    let authorization = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.lock().unwrap().check_runs.push(ReceivedCheckRun {
        path: req.path().to_string(),
        authorization,
        body: body.into_inner(),
    });

    HttpResponse::Created().json(json!({
        "id": CHECK_RUN_ID,
        "node_id": "CR_kwDOAbCdEf8AAAAB",
        "status": "completed",
        "check_suite": { "id": CHECK_SUITE_ID }
    }))
}

#[get("/config")]
async fn config_endpoint(state: web::Data<Arc<Mutex<ReceiverState>>>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.config_requests += 1;
    HttpResponse::Ok().json(json!({ "webhookUrl": state.configured_webhook }))
}

/// Mock receiver bound to an ephemeral port.
pub struct MockReceiver {
    pub base_url: String,
    pub state: Arc<Mutex<ReceiverState>>,
}

impl MockReceiver {
    /// Start the mock receiver on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(ReceiverState::default()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .service(webhook_endpoint)
                .service(failing_webhook_endpoint)
                .service(check_runs_endpoint)
                .service(config_endpoint)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Server lives as long as the test runtime
        tokio::spawn(server);

        MockReceiver { base_url, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make `/config` hand out the given webhook URL.
    pub fn configure_webhook(&self, url: &str) {
        self.state.lock().unwrap().configured_webhook = Some(url.to_string());
    }

    pub fn messages(&self) -> Vec<ReceivedMessage> {
        self.state.lock().unwrap().messages.clone()
    }

    pub fn check_runs(&self) -> Vec<ReceivedCheckRun> {
        self.state.lock().unwrap().check_runs.clone()
    }

    pub fn config_requests(&self) -> usize {
        self.state.lock().unwrap().config_requests
    }

    pub fn failing_requests(&self) -> usize {
        self.state.lock().unwrap().failing_requests
    }
}

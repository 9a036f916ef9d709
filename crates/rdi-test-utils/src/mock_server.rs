// mock_server: A mock RDI management service for testing client negotiation.
//
// Serves the v2 info, v2 login, v2 pipelines, and legacy login routes over
// real loopback HTTP, with builder-configurable behavior per route and hit
// counters so tests can assert which login generation a negotiation used.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rdi_protocol::{
    LoginRequest, Pipeline, V1_LOGIN_PATH, V2_INFO_PATH, V2_LOGIN_PATH, V2_PIPELINES_PATH,
};

/// Mint a compact JWT with the given `exp` claim. The signature segment is
/// garbage on purpose: the client under test must never verify it.
pub fn make_jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#).as_bytes());
    format!("{header}.{payload}.mock-signature")
}

/// A pipeline entry with only the fields negotiation cares about set.
pub fn sample_pipeline(name: &str, current: bool) -> Pipeline {
    Pipeline {
        name: name.to_owned(),
        active: current,
        config: serde_json::Value::Null,
        status: "ready".to_owned(),
        errors: Vec::new(),
        components: serde_json::Value::Null,
        current,
    }
}

// ---------------------------------------------------------------------------
// Behaviors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum InfoBehavior {
    /// Answer 200 with `{"version": ..}`.
    Version(String),
    /// Answer 200 with a literal JSON `null` body.
    Null,
    /// Answer with a bare status code (404 models a legacy instance).
    Error(StatusCode),
}

#[derive(Debug, Clone)]
enum PipelinesBehavior {
    List(Vec<Pipeline>),
    Error(StatusCode),
}

#[derive(Debug, Default)]
struct Counters {
    info: AtomicUsize,
    v1_logins: AtomicUsize,
    v2_logins: AtomicUsize,
    pipelines: AtomicUsize,
}

struct MockState {
    info: InfoBehavior,
    username: String,
    password: String,
    token: String,
    pipelines: PipelinesBehavior,
    counters: Counters,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`MockRdiServer`].
///
/// Defaults model a legacy instance with credentials `default` / `password`:
/// the info path 404s, the legacy login path mints a token expiring an hour
/// from now, and the pipelines listing is empty.
pub struct MockRdiServerBuilder {
    info: InfoBehavior,
    username: String,
    password: String,
    token: String,
    pipelines: PipelinesBehavior,
}

impl MockRdiServerBuilder {
    fn new() -> Self {
        let in_one_hour = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or(0)
            + 3600;
        Self {
            info: InfoBehavior::Error(StatusCode::NOT_FOUND),
            username: "default".to_owned(),
            password: "password".to_owned(),
            token: make_jwt(in_one_hour),
            pipelines: PipelinesBehavior::List(Vec::new()),
        }
    }

    /// Serve `version` from the info path, making this a v2 instance.
    #[must_use]
    pub fn info_version(mut self, version: &str) -> Self {
        self.info = InfoBehavior::Version(version.to_owned());
        self
    }

    /// Serve a 200 with a JSON `null` body from the info path.
    #[must_use]
    pub fn info_null(mut self) -> Self {
        self.info = InfoBehavior::Null;
        self
    }

    /// Serve a bare error status from the info path.
    #[must_use]
    pub fn info_error(mut self, status: u16) -> Self {
        self.info = InfoBehavior::Error(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        );
        self
    }

    /// Set the accepted credentials.
    #[must_use]
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_owned();
        self.password = password.to_owned();
        self
    }

    /// Mint the login token with an explicit `exp` (epoch seconds).
    #[must_use]
    pub fn token_exp(mut self, exp: i64) -> Self {
        self.token = make_jwt(exp);
        self
    }

    /// Serve a verbatim (possibly malformed) token from login.
    #[must_use]
    pub fn raw_token(mut self, token: &str) -> Self {
        self.token = token.to_owned();
        self
    }

    /// Serve this list from the pipelines path.
    #[must_use]
    pub fn pipelines(mut self, pipelines: Vec<Pipeline>) -> Self {
        self.pipelines = PipelinesBehavior::List(pipelines);
        self
    }

    /// Fail the pipelines path with a bare error status.
    #[must_use]
    pub fn pipelines_error(mut self, status: u16) -> Self {
        self.pipelines = PipelinesBehavior::Error(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        );
        self
    }

    /// Bind to a random loopback port and start serving in a background task.
    pub async fn start(self) -> Result<MockRdiServer, std::io::Error> {
        let state = Arc::new(MockState {
            info: self.info,
            username: self.username,
            password: self.password,
            token: self.token,
            pipelines: self.pipelines,
            counters: Counters::default(),
        });

        let router = Router::new()
            .route(V2_INFO_PATH, get(info))
            .route(V2_LOGIN_PATH, post(login_v2))
            .route(V1_LOGIN_PATH, post(login_v1))
            .route(V2_PIPELINES_PATH, get(pipelines))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Ok(MockRdiServer {
            addr,
            state,
            _task: task,
        })
    }
}

// ---------------------------------------------------------------------------
// Server handle
// ---------------------------------------------------------------------------

/// A mock RDI management service bound to a random loopback port.
///
/// Each test spins up its own isolated instance; the background serve task
/// is dropped with the handle.
pub struct MockRdiServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    _task: tokio::task::JoinHandle<()>,
}

impl MockRdiServer {
    #[must_use]
    pub fn builder() -> MockRdiServerBuilder {
        MockRdiServerBuilder::new()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for the instance, e.g. `http://127.0.0.1:49123`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The token login mints on success.
    pub fn token(&self) -> &str {
        &self.state.token
    }

    pub fn info_hits(&self) -> usize {
        self.state.counters.info.load(Ordering::SeqCst)
    }

    pub fn v1_logins(&self) -> usize {
        self.state.counters.v1_logins.load(Ordering::SeqCst)
    }

    pub fn v2_logins(&self) -> usize {
        self.state.counters.v2_logins.load(Ordering::SeqCst)
    }

    pub fn pipeline_hits(&self) -> usize {
        self.state.counters.pipelines.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn info(State(state): State<Arc<MockState>>) -> Response {
    state.counters.info.fetch_add(1, Ordering::SeqCst);
    match &state.info {
        InfoBehavior::Version(v) => Json(serde_json::json!({ "version": v })).into_response(),
        InfoBehavior::Null => Json(serde_json::Value::Null).into_response(),
        InfoBehavior::Error(status) => (*status).into_response(),
    }
}

async fn login_v1(
    State(state): State<Arc<MockState>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    state.counters.v1_logins.fetch_add(1, Ordering::SeqCst);
    check_login(&state, &req)
}

async fn login_v2(
    State(state): State<Arc<MockState>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    state.counters.v2_logins.fetch_add(1, Ordering::SeqCst);
    check_login(&state, &req)
}

fn check_login(state: &MockState, req: &LoginRequest) -> Response {
    if req.username == state.username && req.password == state.password {
        Json(serde_json::json!({ "access_token": state.token })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn pipelines(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.counters.pipelines.fetch_add(1, Ordering::SeqCst);
    let expected = format!("Bearer {}", state.token);
    let authed = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authed {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match &state.pipelines {
        PipelinesBehavior::List(list) => Json(list.clone()).into_response(),
        PipelinesBehavior::Error(status) => (*status).into_response(),
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::WorkflowError;
use crate::runs::{RunRecord, RunStatus, RunStore, RunUpdate};
use crate::workflow::{PendingReview, ReviewWorkflow, WorkflowEvent};

pub type WorkflowFactory = Arc<dyn Fn() -> ReviewWorkflow + Send + Sync>;

/// Shared between handlers. Suspended workflows live in `sessions` keyed by run id.
#[derive(Clone)]
pub struct AppState {
    pub runs: Arc<RunStore>,
    sessions: Arc<Mutex<HashMap<String, ReviewWorkflow>>>,
    factory: WorkflowFactory,
    token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(runs: RunStore, factory: WorkflowFactory) -> Self {
        Self {
            runs: Arc::new(runs),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            factory,
            token: None,
        }
    }

    /// Requires `Authorization: Bearer <token>` on every `/runs` route. Blank means open.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Arc::from);
        self
    }

    fn park(&self, run_id: &str, workflow: ReviewWorkflow) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(run_id.to_string(), workflow);
        }
    }

    /// Taking the workflow out guarantees only one caller can resume it.
    fn take(&self, run_id: &str) -> Result<Option<ReviewWorkflow>, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::internal("session lock error"))?;
        Ok(sessions.remove(run_id))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateRunRequest {
    pub topic: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FeedbackRequest {
    pub request_id: String,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunView {
    pub run: RunRecord,
    pub review: Option<PendingReview>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RunsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"error": self.message}))).into_response()
    }
}

pub fn authorize(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = match expected {
        Some(token) => token,
        None => return Ok(()),
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);
    match presented {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(ApiError::new(StatusCode::UNAUTHORIZED, "invalid token")),
        None => Err(ApiError::new(StatusCode::UNAUTHORIZED, "missing bearer token")),
    }
}

pub async fn require_token<B>(State(state): State<AppState>, request: Request<B>, next: Next<B>) -> Result<Response, ApiError> {
    authorize(state.token.as_deref(), request.headers())?;
    Ok(next.run(request).await)
}

pub async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

pub async fn handle_list_runs(State(state): State<AppState>, Query(query): Query<RunsQuery>) -> Json<serde_json::Value> {
    let limit = query.limit.unwrap_or(10);
    Json(json!({"runs": state.runs.list(limit)}))
}

pub async fn handle_get_run(State(state): State<AppState>, Path(run_id): Path<String>) -> Result<Json<RunView>, ApiError> {
    let run = state
        .runs
        .get(&run_id)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("run not found: {}", run_id)))?;
    let review = match state.sessions.lock() {
        Ok(sessions) => sessions.get(&run_id).and_then(|wf| wf.pending().cloned()),
        Err(_) => None,
    };
    Ok(Json(RunView { run, review }))
}

pub async fn handle_create_run(
    State(state): State<AppState>,
    Json(req): Json<CreateRunRequest>,
) -> Result<Json<RunView>, ApiError> {
    let topic = req.topic.trim().to_string();
    if topic.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "topic required"));
    }

    let run = state.runs.create(&topic);
    info!(run_id = %run.id, topic = %topic, "starting review run");
    let mut workflow = (state.factory)();

    let joined = tokio::task::spawn_blocking(move || {
        let outcome = workflow.start(&topic);
        (workflow, outcome)
    })
    .await;

    match joined {
        Ok((workflow, outcome)) => settle(&state, &run.id, workflow, outcome).map(Json),
        Err(err) => Err(fail_run(&state, &run.id, err.to_string())),
    }
}

pub async fn handle_feedback(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<RunView>, ApiError> {
    let mut workflow = match state.take(&run_id)? {
        Some(workflow) => workflow,
        None => {
            return Err(match state.runs.get(&run_id) {
                Some(run) if run.status.is_finished() => match run.error {
                    Some(reason) => ApiError::new(StatusCode::CONFLICT, format!("run {} failed: {}", run_id, reason)),
                    None => ApiError::new(StatusCode::CONFLICT, format!("run {} is {:?}", run_id, run.status)),
                },
                Some(run) if run.status == RunStatus::AwaitingFeedback => ApiError::new(
                    StatusCode::CONFLICT,
                    format!("run {} has no live workflow to resume", run_id),
                ),
                Some(_) => ApiError::new(StatusCode::CONFLICT, format!("run {} is busy", run_id)),
                None => ApiError::new(StatusCode::NOT_FOUND, format!("run not found: {}", run_id)),
            })
        }
    };

    state.runs.update(
        &run_id,
        RunUpdate {
            status: Some(RunStatus::Drafting),
            ..RunUpdate::default()
        },
    );

    let joined = tokio::task::spawn_blocking(move || {
        let outcome = workflow.send_feedback(&req.request_id, &req.answer);
        (workflow, outcome)
    })
    .await;

    match joined {
        Ok((workflow, outcome)) => settle(&state, &run_id, workflow, outcome).map(Json),
        Err(err) => Err(fail_run(&state, &run_id, err.to_string())),
    }
}

/// Records the workflow's new position and parks it again if it is waiting on a reviewer.
fn settle(
    state: &AppState,
    run_id: &str,
    workflow: ReviewWorkflow,
    outcome: Result<WorkflowEvent, WorkflowError>,
) -> Result<RunView, ApiError> {
    match outcome {
        Ok(WorkflowEvent::ReviewRequested(pending)) => {
            let run = state
                .runs
                .update(
                    run_id,
                    RunUpdate {
                        status: Some(RunStatus::AwaitingFeedback),
                        draft: Some(pending.request.draft_text.clone()),
                        pending_request_id: Some(Some(pending.request_id.clone())),
                        revisions: Some(workflow.revisions()),
                        ..RunUpdate::default()
                    },
                )
                .ok_or_else(|| ApiError::internal("run record vanished"))?;
            state.park(run_id, workflow);
            Ok(RunView {
                run,
                review: Some(pending),
            })
        }
        Ok(WorkflowEvent::Output { text }) => {
            info!(run_id = %run_id, "review run completed");
            let run = state
                .runs
                .update(
                    run_id,
                    RunUpdate {
                        status: Some(RunStatus::Completed),
                        pending_request_id: Some(None),
                        output: Some(text),
                        revisions: Some(workflow.revisions()),
                        ..RunUpdate::default()
                    },
                )
                .ok_or_else(|| ApiError::internal("run record vanished"))?;
            Ok(RunView { run, review: None })
        }
        Err(err @ WorkflowError::UnknownRequest(_)) | Err(err @ WorkflowError::InvalidState { .. }) => {
            warn!(run_id = %run_id, error = %err, "rejected feedback");
            // The coordinator did not move, so the run is still waiting on its original request.
            state.runs.update(
                run_id,
                RunUpdate {
                    status: Some(RunStatus::AwaitingFeedback),
                    ..RunUpdate::default()
                },
            );
            state.park(run_id, workflow);
            Err(ApiError::new(StatusCode::CONFLICT, err.to_string()))
        }
        Err(err @ WorkflowError::Agent { .. }) => {
            let mut api_err = fail_run(state, run_id, err.to_string());
            api_err.status = StatusCode::BAD_GATEWAY;
            Err(api_err)
        }
    }
}

fn fail_run(state: &AppState, run_id: &str, message: String) -> ApiError {
    error!(run_id = %run_id, error = %message, "review run failed");
    state.runs.update(
        run_id,
        RunUpdate {
            status: Some(RunStatus::Failed),
            pending_request_id: Some(None),
            error: Some(message.clone()),
            ..RunUpdate::default()
        },
    );
    ApiError::internal(message)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(auth: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = auth {
            map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn open_when_no_token_configured() {
        assert!(authorize(None, &headers(None)).is_ok());
    }

    #[test]
    fn bearer_token_must_match() {
        assert!(authorize(Some("abc"), &headers(Some("Bearer abc"))).is_ok());
        let wrong = authorize(Some("abc"), &headers(Some("Bearer abd"))).unwrap_err();
        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        let basic = authorize(Some("abc"), &headers(Some("Basic abc"))).unwrap_err();
        assert_eq!(basic.message, "missing bearer token");
        assert!(authorize(Some("abc"), &headers(None)).is_err());
    }

    #[test]
    fn blank_token_means_open() {
        let factory: WorkflowFactory = Arc::new(|| -> ReviewWorkflow { unreachable!("no runs are created") });
        let state = AppState::new(RunStore::new(None), factory).with_token(Some("  ".to_string()));
        assert!(state.token.is_none());
    }
}

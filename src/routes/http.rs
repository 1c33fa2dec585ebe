//! HTTP endpoint handlers. These are thin wrappers that forward to the problem model.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use tracing::{debug, info, instrument};

use crate::error::ApiError;
use crate::problem::Presentation;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_tasks(State(state): State<Arc<AppState>>) -> Json<TaskListOut> {
  Json(TaskListOut { tasks: state.task_ids().await })
}

#[instrument(level = "info", skip(state, q), fields(language = %q.language()))]
pub async fn http_get_task(
  State(state): State<Arc<AppState>>,
  Path(task_id): Path<String>,
  Query(q): Query<LanguageQuery>,
) -> Result<Json<TaskOut>, ApiError> {
  let task = state.get_task(&task_id).await.ok_or_else(|| ApiError::UnknownTask(task_id.clone()))?;
  let ui = state.ui_translations().await;
  Ok(Json(to_task_out(&task, ui.as_ref(), q.language())))
}

#[instrument(level = "info", skip(state, q), fields(language = %q.language(), seed = %q.seed()))]
pub async fn http_get_input(
  State(state): State<Arc<AppState>>,
  Path((task_id, problem_id)): Path<(String, String)>,
  Query(q): Query<InputQuery>,
) -> Result<Json<Presentation>, ApiError> {
  let task = state.get_task(&task_id).await.ok_or_else(|| ApiError::UnknownTask(task_id.clone()))?;
  let problem = task
    .problem(&problem_id)
    .ok_or_else(|| ApiError::UnknownProblem { task: task_id.clone(), problem: problem_id.clone() })?;
  let out = problem.show_input(task.translations(), q.language(), q.seed());
  debug!(target: "tasks", task = %task_id, problem = %problem_id, type_tag = problem.type_tag(), "Problem input rendered");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(entries = body.input.len()))]
pub async fn http_post_submission(
  State(state): State<Arc<AppState>>,
  Path(task_id): Path<String>,
  Json(body): Json<SubmissionIn>,
) -> Result<Json<SubmissionOut>, ApiError> {
  let task = state.get_task(&task_id).await.ok_or_else(|| ApiError::UnknownTask(task_id.clone()))?;
  let input = task.adapt_input(body.input);
  info!(target: "tasks", task = %task_id, entries = input.len(), "Submission adapted for grading");
  Ok(Json(SubmissionOut { input }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadOut>, ApiError> {
  let report = state.reload().await?;
  let failures = report
    .failures
    .into_iter()
    .map(|(task, e)| ReloadFailure { task, error: e.to_string() })
    .collect();
  Ok(Json(ReloadOut { loaded: report.tasks.len(), failures }))
}

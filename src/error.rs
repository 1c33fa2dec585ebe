//! Error types for problem construction, submission adaptation and the HTTP layer.
//!
//! - `DefinitionError`: raised while building problems/boxes from a task definition.
//!   Always fatal to the task being loaded.
//! - `AdaptationError`: raised while reading a submitted file payload. Recovered
//!   locally by the file problem, never returned to callers of `adapt_input`.
//! - `ApiError`: what HTTP handlers return.

use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
  #[error("Invalid problem id: '{0}'")]
  InvalidProblemId(String),

  #[error("Missing field '{field}' in problem '{problem}'")]
  MissingField { problem: String, field: &'static str },

  #[error("Field '{field}' in problem '{problem}' must be {expected}")]
  WrongFieldType { problem: String, field: &'static str, expected: &'static str },

  #[error("Invalid type '{type_tag}' for problem '{problem}'")]
  UnsupportedType { problem: String, type_tag: String },

  #[error("Environment undefined, but problem '{problem}' has type '{type_tag}'")]
  MissingEnvironment { problem: String, type_tag: String },

  #[error("Invalid box id '{box_id}' in problem '{problem}'")]
  InvalidBoxId { problem: String, box_id: String },

  #[error("Box '{box_id}' in problem '{problem}' does not have a type")]
  MissingBoxType { problem: String, box_id: String },

  #[error("Unknown box type '{box_type}' for box id '{box_id}' in problem '{problem}'")]
  UnsupportedBoxType { problem: String, box_id: String, box_type: String },

  #[error("Multiple choice problem '{0}' does not have any valid answer")]
  NoValidChoice(String),

  #[error("Invalid limit in problem '{problem}': {reason}")]
  InvalidLimit { problem: String, reason: String },

  #[error("Invalid definition for problem '{problem}': {reason}")]
  InvalidField { problem: String, reason: String },

  #[error("Invalid definition for task '{task}': {reason}")]
  InvalidTask { task: String, reason: String },
}

/// A file field whose payload cannot be turned into a `{filename, value}` record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdaptationError {
  #[error("Malformed file payload for problem '{problem}': {reason}")]
  MalformedFile { problem: String, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Unknown task: {0}")]
  UnknownTask(String),

  #[error("Unknown problem '{problem}' in task '{task}'")]
  UnknownProblem { task: String, problem: String },

  #[error("Configuration unavailable: {0}")]
  Config(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> axum::response::Response {
    let status = match self {
      ApiError::UnknownTask(_) | ApiError::UnknownProblem { .. } => StatusCode::NOT_FOUND,
      ApiError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}

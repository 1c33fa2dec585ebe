//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::i18n::Translator;
use crate::problem::{Problem, TaskContext};
use crate::submission::Submission;
use crate::task::Task;

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

impl LanguageQuery {
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }
}

#[derive(Debug, Deserialize)]
pub struct InputQuery {
    pub language: Option<String>,
    pub seed: Option<String>,
}

impl InputQuery {
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn seed(&self) -> &str {
        self.seed.as_deref().unwrap_or("")
    }
}

#[derive(Serialize)]
pub struct TaskListOut {
    pub tasks: Vec<String>,
}

/// Problem summary as listed in a task.
#[derive(Debug, Serialize)]
pub struct ProblemOut {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: &'static str,
    pub type_name: String,
    pub optional: bool,
}

#[derive(Debug, Serialize)]
pub struct TaskOut {
    pub id: String,
    pub environment: Option<String>,
    pub problems: Vec<ProblemOut>,
}

/// Convert a loaded `Task` to the public DTO, with type names in `language`.
pub fn to_task_out(task: &Task, ui: &dyn Translator, language: &str) -> TaskOut {
    TaskOut {
        id: task.id().to_string(),
        environment: task.environment().map(str::to_string),
        problems: task.problems().iter().map(|p| to_problem_out(p, ui, language)).collect(),
    }
}

fn to_problem_out(p: &Problem, ui: &dyn Translator, language: &str) -> ProblemOut {
    ProblemOut {
        id: p.id().to_string(),
        name: p.name().to_string(),
        type_tag: p.type_tag(),
        type_name: p.type_name(ui, language),
        optional: p.is_optional(),
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmissionIn {
    pub input: Submission,
}

#[derive(Debug, Serialize)]
pub struct SubmissionOut {
    pub input: Submission,
}

#[derive(Serialize)]
pub struct ReloadOut {
    pub loaded: usize,
    pub failures: Vec<ReloadFailure>,
}

#[derive(Serialize)]
pub struct ReloadFailure {
    pub task: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

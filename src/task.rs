//! Owning task: environment, translations and the ordered problems it contains.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::error::DefinitionError;
use crate::i18n::Catalog;
use crate::problem::{Problem, TaskContext};
use crate::submission::Submission;

#[derive(Deserialize)]
struct TaskSchema {
  #[serde(default)]
  environment: Option<String>,
  #[serde(default)]
  translations: Catalog,
  #[serde(default)]
  problems: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
  id: String,
  environment: Option<String>,
  translations: Catalog,
  problems: Vec<Problem>,
}

impl TaskContext for Task {
  fn id(&self) -> &str {
    &self.id
  }

  fn environment(&self) -> Option<&str> {
    self.environment.as_deref()
  }
}

impl Task {
  /// Build a task and all of its problems. The first invalid problem aborts the whole task.
  #[instrument(level = "debug", skip(definition))]
  pub fn from_definition(id: &str, definition: &Value) -> Result<Self, DefinitionError> {
    let schema: TaskSchema = serde_json::from_value(definition.clone())
      .map_err(|e| DefinitionError::InvalidTask { task: id.to_string(), reason: e.to_string() })?;

    let mut task = Task {
      id: id.to_string(),
      environment: schema.environment.filter(|e| !e.is_empty()),
      translations: schema.translations,
      problems: Vec::with_capacity(schema.problems.len()),
    };
    for (problem_id, def) in &schema.problems {
      let problem = Problem::from_definition(&task, problem_id, def)?;
      task.problems.push(problem);
    }

    let languages: Vec<&str> = task.translations.languages().collect();
    info!(target: "tasks", task = %id, problems = task.problems.len(), environment = ?task.environment, ?languages, "Task loaded");
    Ok(task)
  }

  pub fn problems(&self) -> &[Problem] {
    &self.problems
  }

  pub fn problem(&self, problem_id: &str) -> Option<&Problem> {
    self.problems.iter().find(|p| p.id() == problem_id)
  }

  /// Task-specific texts (headers, choices).
  pub fn translations(&self) -> &Catalog {
    &self.translations
  }

  /// Run every problem's adaptation over the submitted data, in problem order.
  pub fn adapt_input(&self, input: Submission) -> Submission {
    self.problems.iter().fold(input, |acc, p| p.adapt_input(acc))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::submission::{FilePayload, InputValue};
  use serde_json::json;

  fn sample() -> Value {
    json!({
      "environment": "cpp",
      "translations": {"fr": {"Write it": "Écrivez-le"}},
      "problems": {
        "code1": {"type": "code", "name": "Code", "header": "Write it", "language": "cpp"},
        "up": {"type": "file", "name": "Upload", "header": "Send", "allowed_exts": [".zip"]},
        "mc": {"type": "multiple-choice", "name": "MC", "header": "Pick",
               "choices": [{"text": "a", "valid": true}, {"text": "b"}]}
      }
    })
  }

  #[test]
  fn loads_problems_in_definition_order() {
    let task = Task::from_definition("t1", &sample()).unwrap();
    let ids: Vec<&str> = task.problems().iter().map(Problem::id).collect();
    assert_eq!(ids, vec!["code1", "up", "mc"]);
    assert_eq!(task.environment(), Some("cpp"));
    assert_eq!(task.problem("mc").map(Problem::type_tag), Some("multiple-choice"));
    assert!(task.problem("nope").is_none());
  }

  #[test]
  fn one_bad_problem_fails_the_whole_task() {
    let mut def = sample();
    def["problems"]["bad"] = json!({"type": "match", "name": "x"});
    assert!(matches!(
      Task::from_definition("t1", &def),
      Err(DefinitionError::MissingField { ref problem, field: "header" }) if problem == "bad"
    ));
  }

  #[test]
  fn code_problem_without_environment_fails() {
    let mut def = sample();
    def["environment"] = json!("");
    assert!(matches!(Task::from_definition("t1", &def), Err(DefinitionError::MissingEnvironment { .. })));
  }

  #[test]
  fn malformed_task_schema() {
    let def = json!({"problems": ["not", "a", "map"]});
    assert!(matches!(Task::from_definition("t1", &def), Err(DefinitionError::InvalidTask { .. })));
  }

  #[test]
  fn header_uses_task_translations() {
    let task = Task::from_definition("t1", &sample()).unwrap();
    let p = task.problem("code1").unwrap();
    let v = serde_json::to_value(p.show_input(task.translations(), "fr", "")).unwrap();
    assert_eq!(v["header"]["text"], "Écrivez-le");
  }

  #[test]
  fn adapt_input_touches_only_file_problems() {
    let task = Task::from_definition("t1", &sample()).unwrap();
    let mut input = Submission::new();
    input.insert("code1".into(), InputValue::Text("int main() {}".into()));
    input.insert("mc".into(), InputValue::List(vec!["0".into()]));

    let out = task.adapt_input(input);
    assert_eq!(out["code1"], InputValue::Text("int main() {}".into()));
    assert_eq!(out["mc"], InputValue::List(vec!["0".into()]));
    assert_eq!(out["up"], InputValue::File(FilePayload::default()));
  }

  #[test]
  fn structured_answers_of_other_problems_survive_adaptation() {
    let mut def = sample();
    def["problems"]["pair"] = json!({"type": "match", "name": "Pairs", "header": "Match them"});
    let task = Task::from_definition("t1", &def).unwrap();

    let submitted = json!({
      "pair": {"left": "a", "right": "b"},
      "mc": ["0", null],
      "up": {"filename": "a.zip", "value": "UEs="}
    });
    let input: Submission = serde_json::from_value(submitted).unwrap();
    let out = serde_json::to_value(task.adapt_input(input)).unwrap();
    assert_eq!(out["pair"], json!({"left": "a", "right": "b"}));
    assert_eq!(out["mc"], json!(["0", null]));
    assert_eq!(out["up"], json!({"filename": "a.zip", "value": "UEs="}));
  }
}

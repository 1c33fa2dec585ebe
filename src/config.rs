//! Loading the task catalog (task definitions + UI translations) from TOML.
//!
//! Expected schema:
//!
//! ```toml
//! [ui_translations.fr]
//! "multiple choice" = "choix multiple"
//!
//! [tasks.hello]
//! environment = "python3"
//!
//! [tasks.hello.translations.fr]
//! "Write a program" = "Écrivez un programme"
//!
//! [tasks.hello.problems.q1]
//! type = "code"
//! name = "Hello"
//! header = "Write a program"
//! language = "python"
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::i18n::Catalog;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogConfig {
  /// Labels shared by every task (problem type names).
  #[serde(default)]
  pub ui_translations: Catalog,
  /// Raw task definitions, validated when building `Task`s.
  #[serde(default)]
  pub tasks: Map<String, Value>,
}

impl CatalogConfig {
  pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }
}

/// Path of the catalog file, if configured.
pub fn config_path() -> Option<String> {
  std::env::var("TASKS_CONFIG_PATH").ok().filter(|p| !p.is_empty())
}

/// Attempt to load `CatalogConfig` from `path`. On any parsing/IO error, returns None.
pub fn load_catalog(path: &str) -> Option<CatalogConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match CatalogConfig::from_toml(&s) {
      Ok(cfg) => {
        info!(target: "exercise_backend", %path, tasks = cfg.tasks.len(), "Loaded task catalog (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "exercise_backend", %path, error = %e, "Failed to parse TOML task catalog");
        None
      }
    },
    Err(e) => {
      error!(target: "exercise_backend", %path, error = %e, "Failed to read TOML task catalog");
      None
    }
  }
}

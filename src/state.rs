//! Application state: loaded tasks and UI translations.
//!
//! Tasks are built once from the catalog and then only read. A reload builds a fresh set
//! and swaps it in; requests already holding an `Arc<Task>` keep the old one.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::config::{config_path, load_catalog, CatalogConfig};
use crate::error::{ApiError, DefinitionError};
use crate::i18n::Catalog;
use crate::task::Task;
use crate::util::trunc_for_log;

#[derive(Clone, Default)]
pub struct AppState {
    pub tasks: Arc<RwLock<HashMap<String, Arc<Task>>>>,
    pub ui_translations: Arc<RwLock<Arc<Catalog>>>,
    pub config_path: Option<String>,
}

/// Tasks that loaded, and the errors of those that did not.
pub struct LoadReport {
    pub tasks: HashMap<String, Arc<Task>>,
    pub failures: Vec<(String, DefinitionError)>,
}

/// Build every task of the catalog. A failing task is skipped entirely, never half-loaded.
pub fn build_tasks(cfg: &CatalogConfig) -> LoadReport {
    let mut tasks = HashMap::new();
    let mut failures = Vec::new();
    for (task_id, def) in &cfg.tasks {
        match Task::from_definition(task_id, def) {
            Ok(task) => {
                tasks.insert(task_id.clone(), Arc::new(task));
            }
            Err(e) => {
                error!(target: "tasks", task = %task_id, error = %trunc_for_log(&e.to_string(), 400), "Task failed to load");
                failures.push((task_id.clone(), e));
            }
        }
    }
    LoadReport { tasks, failures }
}

impl AppState {
    /// Build state from env: load the TOML catalog (if any) and build all tasks.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config_path = config_path();
        let cfg = config_path.as_deref().and_then(load_catalog);
        if cfg.is_none() {
            info!(target: "exercise_backend", "No task catalog loaded (TASKS_CONFIG_PATH unset or unreadable).");
        }
        let mut state = Self::from_config(&cfg.unwrap_or_default());
        state.config_path = config_path;
        state
    }

    pub fn from_config(cfg: &CatalogConfig) -> Self {
        let report = build_tasks(cfg);
        info!(target: "tasks", loaded = report.tasks.len(), failed = report.failures.len(), "Startup task inventory");
        Self {
            tasks: Arc::new(RwLock::new(report.tasks)),
            ui_translations: Arc::new(RwLock::new(Arc::new(cfg.ui_translations.clone()))),
            config_path: None,
        }
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_task(&self, id: &str) -> Option<Arc<Task>> {
        self.tasks.read().await.get(id).cloned()
    }

    pub async fn task_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tasks.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn ui_translations(&self) -> Arc<Catalog> {
        self.ui_translations.read().await.clone()
    }

    /// Swap in a freshly built catalog.
    #[instrument(level = "info", skip_all)]
    pub async fn replace(&self, cfg: &CatalogConfig) -> LoadReport {
        let report = build_tasks(cfg);
        *self.tasks.write().await = report.tasks.clone();
        *self.ui_translations.write().await = Arc::new(cfg.ui_translations.clone());
        info!(target: "tasks", loaded = report.tasks.len(), failed = report.failures.len(), "Task catalog reloaded");
        report
    }

    /// Re-read TASKS_CONFIG_PATH. Current tasks stay in place if the file cannot be read.
    pub async fn reload(&self) -> Result<LoadReport, ApiError> {
        let path = self
            .config_path
            .as_deref()
            .ok_or_else(|| ApiError::Config("TASKS_CONFIG_PATH is not set".into()))?;
        let cfg = load_catalog(path)
            .ok_or_else(|| ApiError::Config(format!("cannot load task catalog from {}", path)))?;
        Ok(self.replace(&cfg).await)
    }
}

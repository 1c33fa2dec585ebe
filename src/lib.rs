//! Problem model for exercise task pages.
//!
//! Flow: raw definition → `Problem::from_definition` → immutable `Problem`
//! → `show_input` (presentation parameters) / `adapt_input` (submission for grading).

pub mod telemetry;
pub mod util;
pub mod error;
pub mod i18n;
pub mod text;
pub mod definition;
pub mod boxes;
pub mod choices;
pub mod problem;
pub mod submission;
pub mod task;
pub mod config;
pub mod state;
pub mod protocol;
pub mod routes;

//! Translation capability passed explicitly to rendering and labelling calls.
//!
//! There is no global gettext: callers hand a `&dyn Translator` to whatever needs one.
//! `Catalog` is the in-memory implementation used for task texts and UI labels.

use std::collections::HashMap;

use serde::Deserialize;

pub trait Translator {
  /// Localized text for `message` in `language`, or `message` itself when unknown.
  fn gettext(&self, language: &str, message: &str) -> String;
}

/// Translator that never translates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Translator for Identity {
  fn gettext(&self, _language: &str, message: &str) -> String {
    message.to_string()
  }
}

/// language -> (msgid -> msgstr)
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
  languages: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, language: &str, msgid: &str, msgstr: &str) {
    self
      .languages
      .entry(language.to_string())
      .or_default()
      .insert(msgid.to_string(), msgstr.to_string());
  }

  pub fn languages(&self) -> impl Iterator<Item = &str> {
    self.languages.keys().map(String::as_str)
  }
}

impl Translator for Catalog {
  fn gettext(&self, language: &str, message: &str) -> String {
    self
      .languages
      .get(language)
      .and_then(|m| m.get(message))
      .filter(|s| !s.is_empty())
      .cloned()
      .unwrap_or_else(|| message.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn catalog_falls_back_to_msgid() {
    let mut c = Catalog::new();
    c.insert("fr", "code", "code source");
    c.insert("fr", "match", "");
    assert_eq!(c.gettext("fr", "code"), "code source");
    assert_eq!(c.gettext("fr", "match"), "match");
    assert_eq!(c.gettext("de", "code"), "code");
    assert_eq!(Identity.gettext("fr", "code"), "code");
  }

  #[test]
  fn catalog_from_toml_table() {
    let c: Catalog = toml::from_str("[fr]\n\"multiple choice\" = \"choix multiple\"\n").unwrap();
    assert_eq!(c.gettext("fr", "multiple choice"), "choix multiple");
    assert_eq!(c.languages().collect::<Vec<_>>(), vec!["fr"]);
  }
}

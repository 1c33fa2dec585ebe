//! Rich text handed to the markup renderer. We never interpret the markup here.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum Markup {
  #[serde(rename = "rst")]
  Rst,
  #[serde(rename = "HTML")]
  Html,
}

impl Markup {
  /// Per-field override: HTML only when the field's own isHTML flag is set.
  pub fn from_flag(is_html: bool) -> Self {
    if is_html { Markup::Html } else { Markup::Rst }
  }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RichText {
  pub text: String,
  pub format: Markup,
}

impl RichText {
  pub fn new(text: impl Into<String>, format: Markup) -> Self {
    Self { text: text.into(), format }
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }
}

//! Input boxes of code-family problems.
//!
//! A code problem owns an ordered list of boxes. Box ids come from the keys of the
//! `boxes` mapping, so they are unique within a problem by construction.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::definition::Fields;
use crate::error::DefinitionError;
use crate::text::{Markup, RichText};
use crate::util::is_alnum;

const DEFAULT_LINES: u32 = 8;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputSubtype {
  Text,
  Mail,
  Decimal,
  Integer,
}

impl InputSubtype {
  fn from_type_tag(tag: &str) -> Option<Self> {
    match tag {
      "input-text" => Some(InputSubtype::Text),
      "input-mail" => Some(InputSubtype::Mail),
      "input-decimal" => Some(InputSubtype::Decimal),
      "input-integer" => Some(InputSubtype::Integer),
      _ => None,
    }
  }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodeBox {
  Input {
    id: String,
    subtype: InputSubtype,
    #[serde(rename = "maxChars")]
    max_chars: u32,
  },
  Multiline {
    id: String,
    lines: u32,
    #[serde(rename = "maxChars")]
    max_chars: u32,
    language: String,
  },
  Text {
    id: String,
    content: RichText,
  },
}

impl CodeBox {
  pub fn id(&self) -> &str {
    match self {
      CodeBox::Input { id, .. } | CodeBox::Multiline { id, .. } | CodeBox::Text { id, .. } => id,
    }
  }

  /// The single unnamed box every code-single-line problem has.
  pub fn single_line() -> Self {
    CodeBox::Input { id: String::new(), subtype: InputSubtype::Text, max_chars: 0 }
  }
}

#[derive(Deserialize)]
struct InputFields {
  #[serde(default, rename = "maxChars")]
  max_chars: u32,
}

#[derive(Deserialize)]
struct MultilineFields {
  #[serde(default, rename = "maxChars")]
  max_chars: u32,
  #[serde(default)]
  lines: Option<u32>,
  #[serde(default)]
  language: Option<String>,
}

#[derive(Deserialize)]
struct TextFields {
  content: String,
  #[serde(default, rename = "contentIsHTML")]
  content_is_html: bool,
}

/// Build one box of `problem` from its definition.
/// `language` is the problem's language, inherited by multiline boxes.
pub fn build_box(
  problem: &str,
  language: &str,
  box_id: &str,
  definition: &Value,
) -> Result<CodeBox, DefinitionError> {
  if !box_id.is_empty() && !is_alnum(box_id) {
    return Err(DefinitionError::InvalidBoxId { problem: problem.into(), box_id: box_id.into() });
  }
  let fields = Fields::new(problem, definition)?;
  let box_type = match fields.get("type") {
    Some(Value::String(t)) => t.as_str(),
    Some(other) => {
      return Err(DefinitionError::UnsupportedBoxType {
        problem: problem.into(),
        box_id: box_id.into(),
        box_type: other.to_string(),
      })
    }
    None => return Err(DefinitionError::MissingBoxType { problem: problem.into(), box_id: box_id.into() }),
  };

  match box_type {
    "multiline" => {
      let f: MultilineFields = fields.typed()?;
      Ok(CodeBox::Multiline {
        id: box_id.into(),
        lines: f.lines.unwrap_or(DEFAULT_LINES),
        max_chars: f.max_chars,
        language: f.language.unwrap_or_else(|| language.to_string()),
      })
    }
    "text" => {
      let f: TextFields = fields.typed()?;
      Ok(CodeBox::Text { id: box_id.into(), content: RichText::new(f.content, Markup::from_flag(f.content_is_html)) })
    }
    tag => match InputSubtype::from_type_tag(tag) {
      Some(subtype) => {
        let f: InputFields = fields.typed()?;
        Ok(CodeBox::Input { id: box_id.into(), subtype, max_chars: f.max_chars })
      }
      None => Err(DefinitionError::UnsupportedBoxType {
        problem: problem.into(),
        box_id: box_id.into(),
        box_type: tag.into(),
      }),
    },
  }
}

/// Boxes of a `code` problem: one per entry of `boxes`, or a single unnamed multiline box.
pub fn build_boxes(
  problem: &str,
  language: &str,
  boxes: Option<&Map<String, Value>>,
) -> Result<Vec<CodeBox>, DefinitionError> {
  match boxes {
    Some(defs) => defs
      .iter()
      .map(|(box_id, def)| build_box(problem, language, box_id, def))
      .collect(),
    None => Ok(vec![build_box(problem, language, "", &json!({ "type": "multiline" }))?]),
  }
}

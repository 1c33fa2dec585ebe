//! Problem model: one gradable component of a task.
//!
//! A `Problem` is the common part (id, name, header, optional flag) plus a closed set of
//! variants in `ProblemKind`. `Problem::from_definition` is the single factory: it picks the
//! variant from the `type` tag and validates its fields once. Problems are immutable after that.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::boxes::{build_boxes, CodeBox};
use crate::choices::{seeded_rng, select_choices, Choice, ChoiceDef};
use crate::definition::Fields;
use crate::error::DefinitionError;
use crate::i18n::Translator;
use crate::submission::{adapt_file_input, Submission};
use crate::text::{Markup, RichText};
use crate::util::is_alnum;

const CODE_LINES: u32 = 8;

/// What the owning task exposes to its problems.
pub trait TaskContext {
  fn id(&self) -> &str;
  /// Name of the execution environment, if the task declares one.
  fn environment(&self) -> Option<&str>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
  id: String,
  name: String,
  header: RichText,
  optional: bool,
  kind: ProblemKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProblemKind {
  Code(CodeFields),
  CodeSingleLine(CodeFields),
  File(FileFields),
  MultipleChoice(MultipleChoiceFields),
  Match,
  Test,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CodeFields {
  pub language: String,
  pub default: String,
  pub boxes: Vec<CodeBox>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileFields {
  pub max_size: Option<u64>,
  pub allowed_exts: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MultipleChoiceFields {
  pub multiple: bool,
  /// 0 = unlimited
  pub limit: usize,
  pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct CodeSchema {
  #[serde(default)]
  language: String,
  #[serde(default)]
  default: String,
  #[serde(default)]
  boxes: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct FileSchema {
  #[serde(default)]
  max_size: Option<u64>,
  #[serde(default)]
  allowed_exts: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct MultipleChoiceSchema {
  #[serde(default)]
  multiple: bool,
  choices: Vec<ChoiceDef>,
}

pub const SUPPORTED_TYPES: &[&str] =
  &["code", "code-single-line", "file", "multiple-choice", "match", "test"];

impl Problem {
  /// Build and validate a problem of `task` from its raw definition.
  pub fn from_definition(
    task: &dyn TaskContext,
    problem_id: &str,
    definition: &Value,
  ) -> Result<Self, DefinitionError> {
    if !is_alnum(problem_id) {
      return Err(DefinitionError::InvalidProblemId(problem_id.to_string()));
    }
    let fields = Fields::new(problem_id, definition)?;

    let type_tag = match fields.get("type") {
      Some(Value::String(t)) if SUPPORTED_TYPES.contains(&t.as_str()) => t.as_str(),
      other => {
        return Err(DefinitionError::UnsupportedType {
          problem: problem_id.to_string(),
          type_tag: other.map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string)).unwrap_or_default(),
        })
      }
    };

    let name = fields.required_str("name")?.to_string();
    let header_text = fields.required_str("header")?;
    let header = RichText::new(header_text, Markup::from_flag(fields.flag("headerIsHTML")?));
    let optional = fields.flag("optional")?;

    if matches!(type_tag, "code" | "code-single-line") && task.environment().is_none() {
      return Err(DefinitionError::MissingEnvironment {
        problem: problem_id.to_string(),
        type_tag: type_tag.to_string(),
      });
    }

    let kind = match type_tag {
      "code" => {
        let s: CodeSchema = fields.typed()?;
        let boxes = build_boxes(problem_id, &s.language, s.boxes.as_ref())?;
        ProblemKind::Code(CodeFields { language: s.language, default: s.default, boxes })
      }
      "code-single-line" => {
        let s: CodeSchema = fields.typed()?;
        ProblemKind::CodeSingleLine(CodeFields {
          language: s.language,
          default: s.default,
          boxes: vec![CodeBox::single_line()],
        })
      }
      "file" => {
        let s: FileSchema = fields.typed()?;
        ProblemKind::File(FileFields {
          max_size: s.max_size,
          allowed_exts: s.allowed_exts.unwrap_or_default().into_iter().collect(),
        })
      }
      "multiple-choice" => ProblemKind::MultipleChoice(parse_multiple_choice(&fields)?),
      "match" => ProblemKind::Match,
      _ => ProblemKind::Test,
    };

    debug!(target: "tasks", task = %task.id(), problem = %problem_id, %type_tag, "Problem built");
    Ok(Self { id: problem_id.to_string(), name, header, optional, kind })
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn header(&self) -> &RichText {
    &self.header
  }

  pub fn is_optional(&self) -> bool {
    self.optional
  }

  pub fn kind(&self) -> &ProblemKind {
    &self.kind
  }

  pub fn type_tag(&self) -> &'static str {
    self.kind.type_tag()
  }

  /// Localized label of this problem's kind.
  pub fn type_name(&self, translator: &dyn Translator, language: &str) -> String {
    translator.gettext(language, self.kind.label_msgid())
  }

  /// Parameters for the problem's input template. `seed` only matters to
  /// multiple-choice problems, whose displayed choices derive from it.
  pub fn show_input(&self, translator: &dyn Translator, language: &str, seed: &str) -> Presentation {
    let header = RichText::new(translator.gettext(language, &self.header.text), self.header.format);
    let input_id = self.id.clone();

    match &self.kind {
      ProblemKind::Code(c) => Presentation::Code {
        input_id,
        header,
        lines: CODE_LINES,
        max_chars: 0,
        language: c.language.clone(),
        optional: self.optional,
        default: c.default.clone(),
        boxes: c.boxes.clone(),
      },
      ProblemKind::CodeSingleLine(c) => Presentation::SingleLineCode {
        input_id,
        header,
        input_type: "text",
        max_chars: 0,
        optional: self.optional,
        default: c.default.clone(),
      },
      ProblemKind::File(f) => Presentation::File {
        input_id,
        header,
        max_size: f.max_size,
        allowed_exts: f.allowed_exts.iter().cloned().collect(),
        optional: self.optional,
      },
      ProblemKind::MultipleChoice(mc) => {
        let mut rng = seeded_rng(&self.id, language, seed);
        let choices = select_choices(&mc.choices, mc.multiple, mc.limit, &mut rng)
          .into_iter()
          .map(|c| ChoiceOut { index: c.index, text: translate_text(translator, language, &c.text) })
          .collect();
        Presentation::MultipleChoice { pid: input_id, header, checkbox: mc.multiple, choices }
      }
      ProblemKind::Match => Presentation::Match { input_id, header },
      ProblemKind::Test => Presentation::ExtraTest { input_id, header, lines: CODE_LINES, max_chars: 0, optional: true },
    }
  }

  /// Shape submitted form data for the grading backend.
  pub fn adapt_input(&self, input: Submission) -> Submission {
    match &self.kind {
      ProblemKind::File(_) => adapt_file_input(&self.id, input),
      _ => input,
    }
  }
}

impl ProblemKind {
  pub fn type_tag(&self) -> &'static str {
    match self {
      ProblemKind::Code(_) => "code",
      ProblemKind::CodeSingleLine(_) => "code-single-line",
      ProblemKind::File(_) => "file",
      ProblemKind::MultipleChoice(_) => "multiple-choice",
      ProblemKind::Match => "match",
      ProblemKind::Test => "test",
    }
  }

  /// Message id of the human-readable label, resolved by a `Translator`.
  pub fn label_msgid(&self) -> &'static str {
    match self {
      ProblemKind::Code(_) => "code",
      ProblemKind::CodeSingleLine(_) => "single-line code",
      ProblemKind::File(_) => "file upload",
      ProblemKind::MultipleChoice(_) => "multiple choice",
      ProblemKind::Match => "match",
      ProblemKind::Test => "extra_test",
    }
  }
}

fn parse_multiple_choice(fields: &Fields) -> Result<MultipleChoiceFields, DefinitionError> {
  let problem = fields.owner();
  match fields.get("choices") {
    Some(Value::Array(_)) => {}
    _ => {
      return Err(DefinitionError::WrongFieldType { problem: problem.into(), field: "choices", expected: "an array" })
    }
  }
  let s: MultipleChoiceSchema = fields.typed()?;

  let mut choices = Vec::with_capacity(s.choices.len());
  for (index, def) in s.choices.into_iter().enumerate() {
    let text = def.text.ok_or_else(|| DefinitionError::InvalidField {
      problem: problem.into(),
      reason: format!("choice {} does not have text", index),
    })?;
    choices.push(Choice { index, text: RichText::new(text, Markup::from_flag(def.text_is_html)), valid: def.valid });
  }

  let valid = choices.iter().filter(|c| c.valid).count();
  if valid == 0 {
    return Err(DefinitionError::NoValidChoice(problem.into()));
  }

  let limit = match fields.get("limit") {
    None | Some(Value::Null) => 0,
    Some(v) => {
      let n = v.as_u64().ok_or_else(|| DefinitionError::InvalidLimit {
        problem: problem.into(),
        reason: format!("{} is not a non-negative integer", v),
      })?;
      let n = usize::try_from(n).map_err(|_| DefinitionError::InvalidLimit {
        problem: problem.into(),
        reason: format!("{} is too large", n),
      })?;
      if n != 0 && n < valid {
        return Err(DefinitionError::InvalidLimit {
          problem: problem.into(),
          reason: format!("{} is smaller than the {} valid choices", n, valid),
        });
      }
      n
    }
  };

  Ok(MultipleChoiceFields { multiple: s.multiple, limit, choices })
}

/// Text transform applied to each displayed choice: translate, keep markup, empty stays empty.
fn translate_text(translator: &dyn Translator, language: &str, text: &RichText) -> RichText {
  if text.is_empty() {
    return RichText::new(String::new(), text.format);
  }
  RichText::new(translator.gettext(language, &text.text), text.format)
}

/// A displayed choice. Correctness stays on the server.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChoiceOut {
  pub index: usize,
  pub text: RichText,
}

/// Named parameters handed to the template renderer, tagged by template name.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "template")]
pub enum Presentation {
  #[serde(rename = "tasks/code.html")]
  Code {
    #[serde(rename = "inputId")]
    input_id: String,
    header: RichText,
    lines: u32,
    #[serde(rename = "maxChars")]
    max_chars: u32,
    language: String,
    optional: bool,
    default: String,
    boxes: Vec<CodeBox>,
  },
  #[serde(rename = "tasks/single_line_code.html")]
  SingleLineCode {
    #[serde(rename = "inputId")]
    input_id: String,
    header: RichText,
    #[serde(rename = "type")]
    input_type: &'static str,
    #[serde(rename = "maxChars")]
    max_chars: u32,
    optional: bool,
    default: String,
  },
  #[serde(rename = "tasks/file.html")]
  File {
    #[serde(rename = "inputId")]
    input_id: String,
    header: RichText,
    max_size: Option<u64>,
    allowed_exts: Vec<String>,
    optional: bool,
  },
  #[serde(rename = "tasks/multiple_choice.html")]
  MultipleChoice {
    pid: String,
    header: RichText,
    checkbox: bool,
    choices: Vec<ChoiceOut>,
  },
  #[serde(rename = "tasks/match.html")]
  Match {
    #[serde(rename = "inputId")]
    input_id: String,
    header: RichText,
  },
  #[serde(rename = "tasks/extra_test.html")]
  ExtraTest {
    #[serde(rename = "inputId")]
    input_id: String,
    header: RichText,
    lines: u32,
    #[serde(rename = "maxChars")]
    max_chars: u32,
    optional: bool,
  },
}

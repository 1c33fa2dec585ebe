//! Submitted form data and its adaptation for the grading backend.
//!
//! Values arrive already parsed (JSON on the HTTP side). Objects stay raw until a file
//! problem reads its own entry; everything else passes through untouched. File payloads
//! carry their bytes as base64 strings on the wire and as raw bytes in memory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::AdaptationError;

/// problem/box input id -> submitted value
pub type Submission = BTreeMap<String, InputValue>;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InputValue {
  Text(String),
  List(Vec<String>),
  /// Only produced by file adaptation, never parsed from the wire.
  #[serde(skip_deserializing)]
  File(FilePayload),
  /// Anything that fits none of the shapes above, kept as submitted.
  Other(Value),
}

/// `{filename, value}` record. Both absent is the empty record `{}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FilePayload {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub filename: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
  pub value: Option<Vec<u8>>,
}

impl FilePayload {
  pub fn new(filename: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
    Self { filename: Some(filename.into()), value: Some(value.into()) }
  }
}

mod base64_bytes {
  use base64::{engine::general_purpose::STANDARD, Engine as _};
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
    match value {
      Some(bytes) => s.serialize_str(&STANDARD.encode(bytes)),
      None => s.serialize_none(),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
    let encoded: Option<String> = Option::deserialize(d)?;
    encoded
      .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
      .transpose()
  }
}

fn read_upload(problem: &str, value: Option<InputValue>) -> Result<FilePayload, AdaptationError> {
  let malformed = |reason: &'static str| AdaptationError::MalformedFile { problem: problem.to_string(), reason };
  match value {
    None => Err(malformed("no file submitted")),
    Some(InputValue::File(FilePayload { filename: Some(filename), value: Some(value) })) => {
      Ok(FilePayload { filename: Some(filename), value: Some(value) })
    }
    Some(InputValue::File(_)) => Err(malformed("missing filename or value")),
    Some(InputValue::Other(Value::Object(map))) => {
      let payload: FilePayload =
        serde_json::from_value(Value::Object(map)).map_err(|_| malformed("not a file payload"))?;
      read_upload(problem, Some(InputValue::File(payload)))
    }
    Some(_) => Err(malformed("not a file payload")),
  }
}

/// Replace the entry of `problem` with a plain `{filename, value}` record, or with the
/// empty record when the payload cannot be read. Never fails.
pub fn adapt_file_input(problem: &str, mut input: Submission) -> Submission {
  let record = match read_upload(problem, input.remove(problem)) {
    Ok(record) => record,
    Err(e) => {
      warn!(target: "tasks", %problem, error = %e, "Unreadable file payload replaced by an empty record");
      FilePayload::default()
    }
  };
  input.insert(problem.to_string(), InputValue::File(record));
  input
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn submission(v: Value) -> Submission {
    serde_json::from_value(v).unwrap()
  }

  #[test]
  fn well_formed_file_becomes_a_plain_record() {
    let input = submission(json!({"f1": {"filename": "a.txt", "value": "aGVsbG8="}, "q2": "42"}));
    let out = adapt_file_input("f1", input);
    assert_eq!(out["f1"], InputValue::File(FilePayload::new("a.txt", b"hello".to_vec())));
    assert_eq!(out["q2"], InputValue::Text("42".into()));

    // Adapting twice leaves the record as it is.
    let again = adapt_file_input("f1", out.clone());
    assert_eq!(again, out);
  }

  #[test]
  fn objects_and_mixed_lists_are_kept_as_submitted() {
    let input = submission(json!({"m": {"left": "a", "right": "b"}, "n": ["a", null], "e": {}}));
    assert_eq!(input["m"], InputValue::Other(json!({"left": "a", "right": "b"})));
    assert_eq!(input["n"], InputValue::Other(json!(["a", null])));
    assert_eq!(input["e"], InputValue::Other(json!({})));
    assert_eq!(serde_json::to_value(&input).unwrap(), json!({"m": {"left": "a", "right": "b"}, "n": ["a", null], "e": {}}));
  }

  #[test]
  fn empty_or_missing_file_becomes_empty_record() {
    let out = adapt_file_input("f1", submission(json!({"f1": {}})));
    assert_eq!(out["f1"], InputValue::File(FilePayload::default()));

    let out = adapt_file_input("f1", Submission::new());
    assert_eq!(out["f1"], InputValue::File(FilePayload::default()));
    assert_eq!(serde_json::to_value(&out).unwrap(), json!({"f1": {}}));
  }

  #[test]
  fn malformed_payloads_never_fail() {
    for bad in [json!("just text"), json!({"filename": "a.txt"}), json!({"filename": 3}), json!({"value": "!!"}), json!(7),
                json!({"filename": "a.txt", "value": "aGVsbG8=", "extra": 1})] {
      let out = adapt_file_input("f1", submission(json!({ "f1": bad })));
      assert_eq!(out["f1"], InputValue::File(FilePayload::default()));
    }
  }

  #[test]
  fn wire_format_uses_base64() {
    let input = submission(json!({"f1": {"filename": "a.txt", "value": "aGVsbG8="}, "mc": ["0", "2"]}));
    assert_eq!(input["mc"], InputValue::List(vec!["0".into(), "2".into()]));
    let out = adapt_file_input("f1", input);
    let back = serde_json::to_value(&out).unwrap();
    assert_eq!(back["f1"], json!({"filename": "a.txt", "value": "aGVsbG8="}));
  }

  #[test]
  fn read_upload_reports_the_problem() {
    let err = read_upload("f1", None).unwrap_err();
    assert_eq!(err, AdaptationError::MalformedFile { problem: "f1".into(), reason: "no file submitted" });
  }
}

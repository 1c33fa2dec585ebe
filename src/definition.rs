//! Raw definition access.
//!
//! Definitions arrive as untyped mappings (from TOML or JSON). `Fields` wraps one of them
//! together with the id of the problem it belongs to, so every failure names its owner.
//! Variant-specific fields go through `Fields::typed` into a schema struct in one step.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DefinitionError;

pub struct Fields<'a> {
  owner: &'a str,
  map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
  pub fn new(owner: &'a str, value: &'a Value) -> Result<Self, DefinitionError> {
    match value.as_object() {
      Some(map) => Ok(Self { owner, map }),
      None => Err(DefinitionError::InvalidField {
        problem: owner.to_string(),
        reason: "definition must be a mapping".into(),
      }),
    }
  }

  pub fn owner(&self) -> &'a str {
    self.owner
  }

  pub fn get(&self, field: &str) -> Option<&'a Value> {
    self.map.get(field)
  }

  pub fn required_str(&self, field: &'static str) -> Result<&'a str, DefinitionError> {
    match self.map.get(field) {
      None => Err(DefinitionError::MissingField { problem: self.owner.to_string(), field }),
      Some(Value::String(s)) => Ok(s.as_str()),
      Some(_) => Err(self.wrong_type(field, "a string")),
    }
  }

  /// Absent means false.
  pub fn flag(&self, field: &'static str) -> Result<bool, DefinitionError> {
    match self.map.get(field) {
      None | Some(Value::Null) => Ok(false),
      Some(Value::Bool(b)) => Ok(*b),
      Some(_) => Err(self.wrong_type(field, "a boolean")),
    }
  }

  /// Deserialize the whole mapping into a variant schema struct.
  pub fn typed<T: DeserializeOwned>(&self) -> Result<T, DefinitionError> {
    serde_json::from_value(Value::Object(self.map.clone())).map_err(|e| {
      DefinitionError::InvalidField { problem: self.owner.to_string(), reason: e.to_string() }
    })
  }

  fn wrong_type(&self, field: &'static str, expected: &'static str) -> DefinitionError {
    DefinitionError::WrongFieldType { problem: self.owner.to_string(), field, expected }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn required_str_reports_owner_and_field() {
    let v = json!({"name": 3});
    let f = Fields::new("q1", &v).unwrap();
    assert_eq!(
      f.required_str("name"),
      Err(DefinitionError::WrongFieldType { problem: "q1".into(), field: "name", expected: "a string" })
    );
    assert_eq!(
      f.required_str("header"),
      Err(DefinitionError::MissingField { problem: "q1".into(), field: "header" })
    );
  }

  #[test]
  fn flags_default_to_false() {
    let v = json!({"a": true, "b": "yes"});
    let f = Fields::new("q1", &v).unwrap();
    assert_eq!(f.flag("a"), Ok(true));
    assert_eq!(f.flag("missing"), Ok(false));
    assert!(matches!(f.flag("b"), Err(DefinitionError::WrongFieldType { field: "b", .. })));
  }

  #[test]
  fn non_mapping_definition_is_rejected() {
    let v = json!(["not", "a", "map"]);
    assert!(matches!(Fields::new("q1", &v), Err(DefinitionError::InvalidField { .. })));
  }
}

//! Multiple-choice answers and the seeded selection shown to a learner.
//!
//! The selection is reproducible: the generator is seeded from `"{id}#{language}#{seed}"`
//! (SHA-256 of that string feeds a ChaCha8 generator), built fresh for every call.
//! Flow:
//! 1) shuffle a copy of all choices,
//! 2) quota pass(es) pick the subset under the limit,
//! 3) shuffle the subset again with the same generator.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::text::RichText;

/// A choice as stored on the server. `valid` never leaves it; see `problem::ChoiceOut`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
  /// Position in the definition list; what the learner submits back.
  pub index: usize,
  pub text: RichText,
  pub valid: bool,
}

/// Raw choice entry in a definition.
#[derive(Clone, Debug, Deserialize)]
pub struct ChoiceDef {
  #[serde(default)]
  pub text: Option<String>,
  #[serde(default, rename = "textIsHTML")]
  pub text_is_html: bool,
  #[serde(default)]
  pub valid: bool,
}

/// Fresh generator for one render of one problem.
pub fn seeded_rng(problem_id: &str, language: &str, seed: &str) -> ChaCha8Rng {
  let key = format!("{}#{}#{}", problem_id, language, seed);
  let digest = Sha256::digest(key.as_bytes());
  let mut bytes = [0u8; 32];
  bytes.copy_from_slice(&digest);
  ChaCha8Rng::from_seed(bytes)
}

/// Pick the choices to display.
///
/// `limit == 0` means no limit. With `multiple`, every valid choice is taken first and
/// invalid ones fill the rest. Without it, invalid choices are taken while more than one
/// slot remains, and the remaining slot(s) go to valid choices.
pub fn select_choices<'c>(
  choices: &'c [Choice],
  multiple: bool,
  limit: usize,
  rng: &mut ChaCha8Rng,
) -> Vec<&'c Choice> {
  let mut budget = if limit == 0 { choices.len() } else { limit };

  let mut shuffled: Vec<&Choice> = choices.iter().collect();
  shuffled.shuffle(rng);

  let mut picked: Vec<&Choice> = Vec::with_capacity(budget.min(choices.len()));
  if multiple {
    for c in shuffled.iter().copied().filter(|c| c.valid) {
      if budget == 0 {
        break;
      }
      picked.push(c);
      budget -= 1;
    }
    for c in shuffled.iter().copied().filter(|c| !c.valid) {
      if budget == 0 {
        break;
      }
      picked.push(c);
      budget -= 1;
    }
  } else {
    for c in shuffled.iter().copied().filter(|c| !c.valid) {
      if budget <= 1 {
        break;
      }
      picked.push(c);
      budget -= 1;
    }
    for c in shuffled.iter().copied().filter(|c| c.valid) {
      if budget == 0 {
        break;
      }
      picked.push(c);
      budget -= 1;
    }
  }

  picked.shuffle(rng);
  picked
}

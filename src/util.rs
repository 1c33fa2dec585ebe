//! Small utility helpers used across modules.

/// True if the string is non-empty and made only of alphanumeric characters.
/// Same rule for problem ids and (non-empty) box ids.
pub fn is_alnum(s: &str) -> bool {
  !s.is_empty() && s.chars().all(char::is_alphanumeric)
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge submitted payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

//! Parse a project `.env` into a key-value map (applied to the process env in lib).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Path of the `.env` to read: `override_dir` if given, else current directory.
fn env_file_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match override_dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Splits one line into a key-value pair.
///
/// * Empty lines and lines starting with `#` (after trim) yield nothing; a
///   `#` inside a value is kept.
/// * Key and value are trimmed; a line without `=` or with an empty key is
///   skipped.
fn split_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), unquote(value.trim())))
}

/// Strips one pair of surrounding quotes. Double-quoted values support the
/// `\"` escape; single-quoted values are taken literally. No multiline values.
fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return value[1..value.len() - 1].replace("\\\"", "\"");
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].to_string();
    }
    value.to_string()
}

fn parse_env_file(content: &str) -> HashMap<String, String> {
    content.lines().filter_map(split_line).collect()
}

/// Loads `.env` from `override_dir` or the current directory into a map.
/// A missing file returns an empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    let Some(path) = env_file_path(override_dir) else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path)?;
    Ok(parse_env_file(&content))
}

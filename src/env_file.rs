//! `.env` file persistence for the corpus handle.
//!
//! The corpus resource name is externally sourced and survives restarts only
//! through a local `.env` file. This module loads that file into the process
//! environment at startup and writes the handle back when a corpus is created
//! or deleted, leaving unrelated keys and comments untouched.

use crate::error::{Result, SporreError};
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable holding the corpus resource name.
pub const CORPUS_NAME_VAR: &str = "RAG_CORPUS_NAME";

/// Load a `.env` file into the process environment.
///
/// Missing files are not an error; variables already set in the environment
/// take precedence over file values.
pub fn load(path: &Path) -> Result<()> {
    if !path.exists() {
        debug!("No env file at {}", path.display());
        return Ok(());
    }

    dotenvy::from_path(path)
        .map_err(|e| SporreError::EnvFile(format!("{}: {}", path.display(), e)))?;

    debug!("Loaded env file {}", path.display());
    Ok(())
}

/// Read a single variable from a `.env` file without touching the process
/// environment.
pub fn read_var(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    for line in content.lines() {
        if let Some((k, v)) = parse_line(line) {
            if k == key {
                return Ok(Some(v));
            }
        }
    }
    Ok(None)
}

/// Set a variable in a `.env` file, creating the file if needed.
///
/// Replaces the existing `KEY=value` line in place, or appends one. All other
/// lines (comments, blanks, unrelated keys) are preserved verbatim.
pub fn set_var(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let new_line = format!("{}={}", key, value);
    let mut lines: Vec<String> = Vec::new();
    let mut replaced = false;

    for line in content.lines() {
        match parse_line(line) {
            Some((k, _)) if k == key && !replaced => {
                lines.push(new_line.clone());
                replaced = true;
            }
            _ => lines.push(line.to_string()),
        }
    }

    if !replaced {
        lines.push(new_line);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut output = lines.join("\n");
    output.push('\n');
    std::fs::write(path, output)?;

    debug!("Wrote {} to {}", key, path.display());
    Ok(())
}

/// Parse a `KEY=value` line, skipping comments and malformed lines.
fn parse_line(line: &str) -> Option<(&str, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        warn!("Skipping malformed env line: {}", line);
        return None;
    }

    // Strip surrounding quotes the way dotenv files commonly use them.
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");

        let handle = "projects/acme/locations/us-central1/ragCorpora/123";
        set_var(&path, CORPUS_NAME_VAR, handle).unwrap();

        let read = read_var(&path, CORPUS_NAME_VAR).unwrap();
        assert_eq!(read.as_deref(), Some(handle));
    }

    #[test]
    fn test_set_preserves_other_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# project settings\nGOOGLE_CLOUD_PROJECT=acme\n\nRAG_CORPUS_NAME=old\n",
        )
        .unwrap();

        set_var(&path, CORPUS_NAME_VAR, "new-handle").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# project settings"));
        assert!(content.contains("GOOGLE_CLOUD_PROJECT=acme"));
        assert!(content.contains("RAG_CORPUS_NAME=new-handle"));
        assert!(!content.contains("RAG_CORPUS_NAME=old"));
    }

    #[test]
    fn test_set_appends_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OTHER=1\n").unwrap();

        set_var(&path, CORPUS_NAME_VAR, "abc").unwrap();

        assert_eq!(read_var(&path, "OTHER").unwrap().as_deref(), Some("1"));
        assert_eq!(
            read_var(&path, CORPUS_NAME_VAR).unwrap().as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_blank_value_clears_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        set_var(&path, CORPUS_NAME_VAR, "abc").unwrap();
        set_var(&path, CORPUS_NAME_VAR, "").unwrap();

        assert_eq!(
            read_var(&path, CORPUS_NAME_VAR).unwrap().as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.env");
        assert!(read_var(&path, CORPUS_NAME_VAR).unwrap().is_none());
    }

    #[test]
    fn test_parse_line_quotes_and_comments() {
        assert_eq!(
            parse_line("KEY=\"quoted value\""),
            Some(("KEY", "quoted value".to_string()))
        );
        assert_eq!(parse_line("# comment"), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("novalue"), None);
    }
}

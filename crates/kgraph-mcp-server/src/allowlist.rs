//! C1 — the path-safety allowlist gating ingestion actions (spec §4.3).
//!
//! Config is a small JSON file at a platform-conventional location resolved
//! with `dirs`, matching the reference CLI's own use of that crate for
//! config discovery. Matching uses `glob::Pattern` for the allowed/blocked
//! lists; directory child counts use a plain `read_dir` rather than
//! `walkdir` since the cap only applies to *immediate* children (§4.3 step 6).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AllowlistError;

const INIT_HINT: &str =
    "path allowlist is not initialized; run the server's `init-allowlist` command first";

/// Immutable per-process-run configuration (spec §3.1 `AllowlistConfig`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowlistConfig {
    pub allowed_directories: Vec<PathBuf>,
    #[serde(default)]
    pub allowed_patterns: Vec<String>,
    #[serde(default)]
    pub blocked_patterns: Vec<String>,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    #[serde(default = "default_max_files_per_directory")]
    pub max_files_per_directory: u64,
}

fn default_max_file_size_mb() -> u64 {
    100
}

fn default_max_files_per_directory() -> u64 {
    10_000
}

/// Result of a single `validate_path`/`validate_directory` call.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub resolved_absolute: String,
}

/// The allowlist component. Loaded once at startup; config is read-only for
/// the rest of the process lifetime.
pub struct Allowlist {
    config_path: PathBuf,
    config: Option<AllowlistConfig>,
}

impl Allowlist {
    /// Resolves the config path via `dirs::config_dir()` and loads it if
    /// present. A missing or unparsable file is treated as "not initialized"
    /// (§3.1: `AllowlistConfig` "may be absent").
    pub fn load() -> Self {
        let config_path = dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("kgraph-mcp")
            .join("allowlist.json");

        let config = fs::read_to_string(&config_path)
            .ok()
            .and_then(|raw| serde_json::from_str::<AllowlistConfig>(&raw).ok());

        Self {
            config_path,
            config,
        }
    }

    #[cfg(test)]
    pub fn with_config(config_path: PathBuf, config: AllowlistConfig) -> Self {
        Self {
            config_path,
            config: Some(config),
        }
    }

    pub fn get_config(&self) -> Option<&AllowlistConfig> {
        self.config.as_ref()
    }

    pub fn get_path(&self) -> &Path {
        &self.config_path
    }

    pub fn validate_path(&self, raw: &str) -> ValidationResult {
        self.validate(raw, false)
    }

    pub fn validate_directory(&self, raw: &str) -> ValidationResult {
        self.validate(raw, true)
    }

    fn validate(&self, raw: &str, as_directory: bool) -> ValidationResult {
        let Some(config) = &self.config else {
            return ValidationResult {
                allowed: false,
                reason: Some("path allowlist is not initialized".to_string()),
                hint: Some(INIT_HINT.to_string()),
                resolved_absolute: raw.to_string(),
            };
        };

        let resolved = expand_and_normalize(raw);
        let resolved_str = resolved.to_string_lossy().to_string();

        // Step 3: blocked patterns win over everything else (§4.3 invariant).
        if let Some(pattern) = first_match(&config.blocked_patterns, &resolved_str) {
            return ValidationResult {
                allowed: false,
                reason: Some(format!("path matches blocked pattern: {pattern}")),
                hint: None,
                resolved_absolute: resolved_str,
            };
        }

        // Step 4: directory containment.
        if !config.allowed_directories.is_empty()
            && !config
                .allowed_directories
                .iter()
                .any(|dir| resolved.starts_with(dir))
        {
            return ValidationResult {
                allowed: false,
                reason: Some("path is outside all allowed directories".to_string()),
                hint: Some(
                    "add the containing directory to the allowlist configuration".to_string(),
                ),
                resolved_absolute: resolved_str,
            };
        }

        // Step 5: at least one allowed pattern must match.
        if !config.allowed_patterns.is_empty()
            && first_match(&config.allowed_patterns, &resolved_str).is_none()
        {
            return ValidationResult {
                allowed: false,
                reason: Some("path does not match any allowed pattern".to_string()),
                hint: Some("check the allowlist's `allowed_patterns` glob list".to_string()),
                resolved_absolute: resolved_str,
            };
        }

        // Step 6: size/count caps, best-effort (only enforced when the path exists).
        if let Ok(metadata) = fs::metadata(&resolved) {
            if as_directory || metadata.is_dir() {
                if let Ok(entries) = fs::read_dir(&resolved) {
                    let count = entries.count() as u64;
                    if count > config.max_files_per_directory {
                        return ValidationResult {
                            allowed: false,
                            reason: Some(format!(
                                "directory contains {count} files (max {})",
                                config.max_files_per_directory
                            )),
                            hint: Some("narrow the ingest scope or raise max_files_per_directory".to_string()),
                            resolved_absolute: resolved_str,
                        };
                    }
                }
            } else if metadata.is_file() {
                let size_mb = metadata.len() / (1024 * 1024);
                if size_mb > config.max_file_size_mb {
                    return ValidationResult {
                        allowed: false,
                        reason: Some(format!(
                            "file is {size_mb} MB (max {} MB)",
                            config.max_file_size_mb
                        )),
                        hint: Some("split the file or raise max_file_size_mb".to_string()),
                        resolved_absolute: resolved_str,
                    };
                }
            }
        }

        ValidationResult {
            allowed: true,
            reason: None,
            hint: None,
            resolved_absolute: resolved_str,
        }
    }
}

fn first_match<'a>(patterns: &'a [String], path: &str) -> Option<&'a str> {
    patterns
        .iter()
        .find(|p| glob::Pattern::new(p).map(|pat| pat.matches(path)).unwrap_or(false))
        .map(String::as_str)
}

/// Expands a leading `~` against `HOME` (§4.3 step 2 / B4) and lexically
/// normalizes `.`/`..` components without touching the filesystem — ingest
/// paths may not exist yet, so `fs::canonicalize` is unusable here.
fn expand_and_normalize(raw: &str) -> PathBuf {
    let expanded = if let Some(rest) = raw.strip_prefix("~/") {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .unwrap_or_else(|_| PathBuf::from(raw))
    } else if raw == "~" {
        std::env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(raw))
    } else {
        PathBuf::from(raw)
    };

    let mut normalized = PathBuf::new();
    for component in expanded.components() {
        use std::path::Component;
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path) -> AllowlistConfig {
        AllowlistConfig {
            allowed_directories: vec![dir.to_path_buf()],
            allowed_patterns: vec!["**/*.txt".to_string(), "**/*.md".to_string()],
            blocked_patterns: vec!["**/*.exe".to_string()],
            max_file_size_mb: 1,
            max_files_per_directory: 10,
        }
    }

    #[test]
    fn absent_config_denies_with_init_hint() {
        let allowlist = Allowlist {
            config_path: PathBuf::from("/nonexistent"),
            config: None,
        };
        let result = allowlist.validate_path("/tmp/x.txt");
        assert!(!result.allowed);
        assert_eq!(result.hint.as_deref(), Some(INIT_HINT));
    }

    #[test]
    fn blocked_pattern_wins_even_inside_allowed_directory() {
        let dir = std::env::temp_dir();
        let allowlist = Allowlist::with_config(PathBuf::from("/cfg"), config(&dir));
        let path = dir.join("malware.exe");
        let result = allowlist.validate_path(path.to_str().unwrap());
        assert!(!result.allowed);
        assert!(result.reason.unwrap().contains("blocked pattern"));
    }

    #[test]
    fn outside_allowed_directories_is_denied() {
        let dir = std::env::temp_dir().join("allowed-root");
        let allowlist = Allowlist::with_config(PathBuf::from("/cfg"), config(&dir));
        let result = allowlist.validate_path("/etc/passwd.txt");
        assert!(!result.allowed);
    }

    #[test]
    fn matching_path_inside_allowed_directory_is_allowed() {
        let dir = std::env::temp_dir().join("kgraph-allowlist-test");
        let _ = fs::create_dir_all(&dir);
        let allowlist = Allowlist::with_config(PathBuf::from("/cfg"), config(&dir));
        let path = dir.join("notes.txt");
        let result = allowlist.validate_path(path.to_str().unwrap());
        assert!(result.allowed, "reason: {:?}", result.reason);
    }

    #[test]
    fn tilde_expands_against_home() {
        std::env::set_var("HOME", "/home/tester");
        let resolved = expand_and_normalize("~/docs/file.txt");
        assert_eq!(resolved, PathBuf::from("/home/tester/docs/file.txt"));
    }

    #[test]
    fn parent_components_are_resolved_lexically() {
        let resolved = expand_and_normalize("/a/b/../c/./d");
        assert_eq!(resolved, PathBuf::from("/a/c/d"));
    }
}

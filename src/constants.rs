//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and prompt limits so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "parley";

/// Local config filename (e.g. `.parley.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".parley.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "parley";

/// Default repository ignore file consulted for exclusion patterns.
pub const IGNORE_FILENAME: &str = ".parleyignore";

/// Hard cap on the assembled prompt, in characters.
///
/// The agent runtime rejects oversized inputs outright; a truncated
/// prompt still produces a useful answer, a rejected one produces none.
pub const MAX_PROMPT_CHARS: usize = 170_000;

/// Marker appended when the prompt is cut at [`MAX_PROMPT_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n[... prompt truncated ...]";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_AGENT_ID: &str = "PARLEY_AGENT_ID";
pub const ENV_AGENT_ALIAS_ID: &str = "PARLEY_AGENT_ALIAS_ID";
pub const ENV_ENDPOINT: &str = "PARLEY_ENDPOINT";
pub const ENV_SERVICE_TOKEN: &str = "PARLEY_SERVICE_TOKEN";
pub const ENV_INSTRUCTION: &str = "PARLEY_INSTRUCTION";
pub const ENV_IGNORE_PATTERNS: &str = "PARLEY_IGNORE_PATTERNS";
pub const ENV_IGNORE_FILE: &str = "PARLEY_IGNORE_FILE";
pub const ENV_MEMORY: &str = "PARLEY_MEMORY";
pub const ENV_MEMORY_KEY: &str = "PARLEY_MEMORY_KEY";
pub const ENV_DEBUG: &str = "PARLEY_DEBUG";

// ── Host (GitHub Actions) variable names ────────────────────────────

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_GITHUB_EVENT_PATH: &str = "GITHUB_EVENT_PATH";

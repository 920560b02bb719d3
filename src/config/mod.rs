//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. Environment variables
//! 2. `.parley.toml` in repo root
//! 3. `~/.config/parley/config.toml` (global defaults)
//! 4. Built-in defaults
//!
//! The agent identity and endpoint are required; everything else has a
//! sensible default. Validation happens before any network call so a
//! misconfigured workflow fails fast with a clear message.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::scope::parse_pattern_list;

/// Errors during config loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("missing required configuration: {what} (set {env_var})")]
    Missing {
        what: &'static str,
        env_var: &'static str,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub scope: ScopeConfig,
    pub memory: MemoryConfig,
    /// Verbose diagnostics on stderr.
    pub debug: bool,
}

/// Analysis service configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Agent identity on the analysis service.
    pub agent_id: String,
    /// Alias identity selecting the agent version to invoke.
    pub agent_alias_id: String,
    /// Agent-runtime endpoint URL.
    pub endpoint: Option<String>,
    /// Bearer token for the endpoint.
    pub token: Option<String>,
    /// Instruction appended to every assembled prompt.
    pub instruction: String,
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("agent_id", &self.agent_id)
            .field("agent_alias_id", &self.agent_alias_id)
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("instruction", &self.instruction)
            .finish()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            agent_id: String::new(),
            agent_alias_id: String::new(),
            endpoint: None,
            token: None,
            instruction: "Analyze the changed files above. Point out bugs, risky patterns, \
                          and missing tests, and finish with a short summary of the change."
                .to_string(),
        }
    }
}

/// Analysis scope configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Glob patterns excluding paths from analysis.
    pub ignore_patterns: Vec<String>,
    /// Repository file with additional patterns, one per line.
    pub ignore_file: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            ignore_file: constants::IGNORE_FILENAME.to_string(),
        }
    }
}

/// Long-lived agent memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Whether to derive a memory key for each request.
    pub enabled: bool,
    /// Prefix for derived memory keys.
    pub prefix: String,
    /// Explicit memory key; used verbatim and implies `enabled`.
    pub key: Option<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix: "parley-memory".to_string(),
            key: None,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, repo-local config, then applies
    /// environment variable overrides.
    pub fn load(repo_root: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 3: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 2: repo-local config
        if let Some(root) = repo_root {
            let local_path = root.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 1: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Check that the values without usable defaults are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.agent_id.trim().is_empty() {
            return Err(ConfigError::Missing {
                what: "agent identity",
                env_var: constants::ENV_AGENT_ID,
            });
        }
        if self.analysis.agent_alias_id.trim().is_empty() {
            return Err(ConfigError::Missing {
                what: "agent alias identity",
                env_var: constants::ENV_AGENT_ALIAS_ID,
            });
        }
        if self.analysis.endpoint.is_none() {
            return Err(ConfigError::Missing {
                what: "agent-runtime endpoint",
                env_var: constants::ENV_ENDPOINT,
            });
        }
        Ok(())
    }

    /// The memory prefix to derive keys with, when memory is enabled and
    /// no explicit key overrides derivation.
    pub fn memory_prefix(&self) -> Option<&str> {
        (self.memory.enabled && self.memory.key.is_none()).then_some(self.memory.prefix.as_str())
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for
    /// non-default values).
    fn merge(&mut self, other: Config) {
        let default_analysis = AnalysisConfig::default();
        if !other.analysis.agent_id.is_empty() {
            self.analysis.agent_id = other.analysis.agent_id;
        }
        if !other.analysis.agent_alias_id.is_empty() {
            self.analysis.agent_alias_id = other.analysis.agent_alias_id;
        }
        if other.analysis.endpoint.is_some() {
            self.analysis.endpoint = other.analysis.endpoint;
        }
        if other.analysis.token.is_some() {
            self.analysis.token = other.analysis.token;
        }
        if other.analysis.instruction != default_analysis.instruction {
            self.analysis.instruction = other.analysis.instruction;
        }

        if !other.scope.ignore_patterns.is_empty() {
            self.scope.ignore_patterns = other.scope.ignore_patterns;
        }
        if other.scope.ignore_file != ScopeConfig::default().ignore_file {
            self.scope.ignore_file = other.scope.ignore_file;
        }

        if other.memory.enabled {
            self.memory.enabled = true;
        }
        if other.memory.prefix != MemoryConfig::default().prefix {
            self.memory.prefix = other.memory.prefix;
        }
        if other.memory.key.is_some() {
            self.memory.key = other.memory.key;
        }

        if other.debug {
            self.debug = true;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.get(constants::ENV_AGENT_ID) {
            self.analysis.agent_id = val;
        }
        if let Some(val) = env.get(constants::ENV_AGENT_ALIAS_ID) {
            self.analysis.agent_alias_id = val;
        }
        if let Some(val) = env.get(constants::ENV_ENDPOINT) {
            self.analysis.endpoint = Some(val);
        }
        if let Some(val) = env.get(constants::ENV_SERVICE_TOKEN) {
            self.analysis.token = Some(val);
        }
        if let Some(val) = env.get(constants::ENV_INSTRUCTION) {
            self.analysis.instruction = val;
        }
        if let Some(val) = env.get(constants::ENV_IGNORE_PATTERNS) {
            self.scope.ignore_patterns = parse_pattern_list(&val);
        }
        if let Some(val) = env.get(constants::ENV_IGNORE_FILE) {
            self.scope.ignore_file = val;
        }
        if env.is_set(constants::ENV_MEMORY) {
            self.memory.enabled = env.flag(constants::ENV_MEMORY);
        }
        if let Some(val) = env.get(constants::ENV_MEMORY_KEY) {
            self.memory.enabled = true;
            self.memory.key = Some(val);
        }
        if env.is_set(constants::ENV_DEBUG) {
            self.debug = env.flag(constants::ENV_DEBUG);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.analysis.agent_id.is_empty());
        assert!(config.analysis.endpoint.is_none());
        assert!(!config.memory.enabled);
        assert_eq!(config.scope.ignore_file, ".parleyignore");
        assert!(!config.debug);
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
debug = true

[analysis]
agent_id = "AGENT123"
agent_alias_id = "ALIAS456"
endpoint = "https://agents.example.com/invoke"
instruction = "Focus on security."

[scope]
ignore_patterns = ["**/*.md", "docs/**"]

[memory]
enabled = true
prefix = "custom-memory"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.analysis.agent_id, "AGENT123");
        assert_eq!(config.analysis.agent_alias_id, "ALIAS456");
        assert_eq!(
            config.analysis.endpoint.as_deref(),
            Some("https://agents.example.com/invoke")
        );
        assert_eq!(config.analysis.instruction, "Focus on security.");
        assert_eq!(config.scope.ignore_patterns, vec!["**/*.md", "docs/**"]);
        assert!(config.memory.enabled);
        assert_eq!(config.memory.prefix, "custom-memory");
        assert!(config.debug);
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();
        other.analysis.agent_id = "A".to_string();
        other.analysis.endpoint = Some("https://x".to_string());
        other.scope.ignore_patterns = vec!["*.lock".to_string()];
        other.memory.enabled = true;
        other.debug = true;

        base.merge(other);
        assert_eq!(base.analysis.agent_id, "A");
        assert_eq!(base.analysis.endpoint.as_deref(), Some("https://x"));
        assert_eq!(base.scope.ignore_patterns, vec!["*.lock"]);
        assert!(base.memory.enabled);
        assert!(base.debug);
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.analysis.agent_id = "KEEP".to_string();
        base.scope.ignore_patterns = vec!["dist/".to_string()];

        base.merge(Config::default());
        assert_eq!(base.analysis.agent_id, "KEEP");
        assert_eq!(base.scope.ignore_patterns, vec!["dist/"]);
    }

    #[test]
    fn load_from_repo_root() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".parley.toml"),
            r#"
[analysis]
agent_id = "FROM_FILE"
"#,
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.analysis.agent_id, "FROM_FILE");
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let result = Config::load_file(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn env_overrides_file_values() {
        let env = Env::mock([
            ("PARLEY_AGENT_ID", "FROM_ENV"),
            ("PARLEY_IGNORE_PATTERNS", "**/*.md,docs/**"),
            ("PARLEY_DEBUG", "true"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".parley.toml"),
            r#"
[analysis]
agent_id = "FROM_FILE"
"#,
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.analysis.agent_id, "FROM_ENV");
        assert_eq!(config.scope.ignore_patterns, vec!["**/*.md", "docs/**"]);
        assert!(config.debug);
    }

    #[test]
    fn explicit_memory_key_enables_memory() {
        let env = Env::mock([("PARLEY_MEMORY_KEY", "mem-explicit")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert!(config.memory.enabled);
        assert_eq!(config.memory.key.as_deref(), Some("mem-explicit"));
        // Derivation is bypassed when an explicit key is set
        assert!(config.memory_prefix().is_none());
    }

    #[test]
    fn memory_prefix_only_when_enabled() {
        let mut config = Config::default();
        assert!(config.memory_prefix().is_none());
        config.memory.enabled = true;
        assert_eq!(config.memory_prefix(), Some("parley-memory"));
    }

    #[test]
    fn validate_reports_each_missing_value() {
        let mut config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PARLEY_AGENT_ID"));

        config.analysis.agent_id = "A".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PARLEY_AGENT_ALIAS_ID"));

        config.analysis.agent_alias_id = "B".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PARLEY_ENDPOINT"));

        config.analysis.endpoint = Some("https://x".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let mut config = Config::default();
        config.analysis.token = Some("super-secret".to_string());
        let debug = format!("{:?}", config.analysis);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}

//! Configuration management for blwiki.
//!
//! Parses `blwiki.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values in the `[backlog]` section support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `backlog.space_id`
//! - `backlog.domain`
//! - `backlog.project_id`
//! - `backlog.api_key`

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Backlog space identifier.
    pub space_id: Option<String>,
    /// Override Backlog project id or key.
    pub project_id: Option<String>,
    /// Override API key.
    pub api_key: Option<String>,
    /// Override documents directory.
    pub docs_dir: Option<PathBuf>,
    /// Override attachments directory.
    pub files_dir: Option<PathBuf>,
    /// Override delete mode.
    pub delete_mode: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "blwiki.toml";

/// Default Backlog domain.
const DEFAULT_DOMAIN: &str = "backlog.jp";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backlog connection settings.
    pub backlog: BacklogConfig,
    /// Sync settings (paths are relative strings from TOML).
    sync: SyncConfigRaw,

    /// Resolved sync configuration (set after loading).
    #[serde(skip)]
    pub sync_resolved: SyncConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Backlog connection configuration.
#[derive(Deserialize)]
#[serde(default)]
pub struct BacklogConfig {
    /// Space identifier (the `acme` in `acme.backlog.jp`).
    pub space_id: String,
    /// Backlog domain, `backlog.jp` or `backlog.com`.
    pub domain: String,
    /// Project numeric id or project key.
    pub project_id: String,
    /// API key sent with every request.
    pub api_key: String,
}

impl Default for BacklogConfig {
    fn default() -> Self {
        Self {
            space_id: String::new(),
            domain: DEFAULT_DOMAIN.to_owned(),
            project_id: String::new(),
            api_key: String::new(),
        }
    }
}

impl fmt::Debug for BacklogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BacklogConfig")
            .field("space_id", &self.space_id)
            .field("domain", &self.domain)
            .field("project_id", &self.project_id)
            .field("api_key", &"***")
            .finish()
    }
}

impl BacklogConfig {
    /// API base URL, e.g. `https://acme.backlog.jp/api/v2`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}.{}/api/v2", self.space_id, self.domain)
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.space_id, "backlog.space_id")?;
        require_host_fragment(&self.space_id, "backlog.space_id")?;
        require_non_empty(&self.domain, "backlog.domain")?;
        require_host_fragment(&self.domain, "backlog.domain")?;
        require_non_empty(&self.project_id, "backlog.project_id")?;
        require_non_empty(&self.api_key, "backlog.api_key")?;
        Ok(())
    }
}

/// Raw sync configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SyncConfigRaw {
    docs_dir: Option<String>,
    files_dir: Option<String>,
    delete_mode: Option<bool>,
}

/// Resolved sync configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SyncConfig {
    /// Root directory of the Markdown documents.
    pub docs_dir: PathBuf,
    /// Directory holding files referenced as `/files/<name>`.
    pub files_dir: PathBuf,
    /// Whether remote pages without a local document are deleted.
    pub delete_mode: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`backlog.api_key`").
        field: String,
        /// Error message (e.g., "${`BACKLOG_API_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a value that is spliced into the API host name to be a bare host fragment.
fn require_host_fragment(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.contains("://") || value.contains('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must be a host name fragment, not a URL"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `blwiki.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the directories are invalid once CLI overrides are applied.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(space_id) = &settings.space_id {
            self.backlog.space_id.clone_from(space_id);
        }
        if let Some(project_id) = &settings.project_id {
            self.backlog.project_id.clone_from(project_id);
        }
        if let Some(api_key) = &settings.api_key {
            self.backlog.api_key.clone_from(api_key);
        }
        if let Some(docs_dir) = &settings.docs_dir {
            self.sync_resolved.docs_dir.clone_from(docs_dir);
        }
        if let Some(files_dir) = &settings.files_dir {
            self.sync_resolved.files_dir.clone_from(files_dir);
        }
        if let Some(delete_mode) = settings.delete_mode {
            self.sync_resolved.delete_mode = delete_mode;
        }
    }

    /// Get validated Backlog configuration.
    ///
    /// Use this instead of accessing the `backlog` field directly when the
    /// command talks to the Backlog API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a required field is empty or invalid.
    pub fn require_backlog(&self) -> Result<&BacklogConfig, ConfigError> {
        self.backlog.validate()?;
        Ok(&self.backlog)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            backlog: BacklogConfig::default(),
            sync: SyncConfigRaw::default(),
            sync_resolved: SyncConfig {
                docs_dir: base.join("docs"),
                files_dir: base.join("files"),
                delete_mode: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Credentials are not checked here since they may still arrive from the
    /// command line; see [`Config::require_backlog`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.backlog.domain, "backlog.domain")?;
        require_host_fragment(&self.backlog.domain, "backlog.domain")?;
        if self.sync_resolved.docs_dir == self.sync_resolved.files_dir {
            return Err(ConfigError::Validation(
                "sync.docs_dir and sync.files_dir must differ".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_backlog(&mut self.backlog)
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.sync_resolved = SyncConfig {
            docs_dir: resolve(self.sync.docs_dir.as_deref(), "docs"),
            files_dir: resolve(self.sync.files_dir.as_deref(), "files"),
            delete_mode: self.sync.delete_mode.unwrap_or(false),
        };
    }
}

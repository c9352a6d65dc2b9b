//! Configuration management for docnav.
//!
//! Parses `docnav.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.source_dir`
//! - `docs.output_dir`
//! - `docs.root_doc`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override HTML output directory.
    pub output_dir: Option<PathBuf>,
    /// Override root document name.
    pub root_doc: Option<String>,
    /// Override comment-block handling mode.
    pub comment_mode: Option<CommentMode>,
    /// Override standalone page rendering.
    pub standalone: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docnav.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Table of contents generation.
    pub toc: TocConfig,
    /// Link normalization.
    pub links: LinksConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    root_doc: Option<String>,
    source_suffixes: Option<Vec<String>>,
    include_patterns: Option<Vec<String>>,
    exclude_patterns: Option<Vec<String>>,
    output_extension: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markup files.
    pub source_dir: PathBuf,
    /// Directory holding the rendered HTML site.
    pub output_dir: PathBuf,
    /// Name of the document the navigation tree starts from.
    pub root_doc: String,
    /// File suffixes recognized as source documents (e.g. `.md`).
    pub source_suffixes: Vec<String>,
    /// Glob patterns (relative to `source_dir`) a document must match.
    pub include_patterns: Vec<String>,
    /// Glob patterns (relative to `source_dir`) that remove documents.
    pub exclude_patterns: Vec<String>,
    /// Extension of rendered pages, without the dot (e.g. `html`).
    pub output_extension: String,
}

/// How comment-delimited navigation blocks are handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentMode {
    /// Parse the block contents directly, ahead of ordinary directives.
    #[default]
    OutOfBand,
    /// Strip the comment markers and treat the contents as ordinary source.
    Uncomment,
}

impl std::str::FromStr for CommentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "out-of-band" => Ok(Self::OutOfBand),
            "uncomment" => Ok(Self::Uncomment),
            other => Err(ConfigError::Validation(format!(
                "unknown comment mode '{other}' (expected 'out-of-band' or 'uncomment')"
            ))),
        }
    }
}

/// Table of contents configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Artifact path relative to the output directory.
    pub output_path: String,
    /// Comment-block handling mode.
    pub comment_mode: CommentMode,
    /// Marker opening a comment-delimited navigation block.
    pub start_marker: String,
    /// Marker closing a comment-delimited navigation block.
    pub end_marker: String,
    /// URL schemes treated as external references.
    pub url_schemes: Vec<String>,
    /// Wrap the tree in a full HTML page instead of emitting a fragment.
    pub standalone: bool,
    /// Page title for standalone output.
    pub title: String,
    /// Optional JSON export path relative to the output directory.
    pub json_path: Option<String>,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            output_path: "_static/toc.html".to_owned(),
            comment_mode: CommentMode::default(),
            start_marker: "RTD-TOC-START".to_owned(),
            end_marker: "RTD-TOC-END".to_owned(),
            url_schemes: ["http", "https", "mailto", "ftp"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            standalone: true,
            title: "Table of Contents".to_owned(),
            json_path: None,
        }
    }
}

/// Link normalization configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Whether the `post-build` hook runs the normalizer.
    pub enabled: bool,
    /// Subdirectories of the output directory to scan (empty: all of it).
    pub scan_dirs: Vec<String>,
    /// File extensions to scan.
    pub extensions: Vec<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_dirs: Vec::new(),
            extensions: vec!["html".to_owned()],
        }
    }
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
        /// Config field path (e.g., "`docs.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require every pattern in a list to be a valid glob.
fn require_globs(patterns: &[String], field: &str) -> Result<(), ConfigError> {
    for pattern in patterns {
        glob::Pattern::new(pattern).map_err(|e| {
            ConfigError::Validation(format!("{field}: invalid pattern '{pattern}': {e}"))
        })?;
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docnav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(root_doc) = &settings.root_doc {
            self.docs_resolved.root_doc.clone_from(root_doc);
        }
        if let Some(comment_mode) = settings.comment_mode {
            self.toc.comment_mode = comment_mode;
        }
        if let Some(standalone) = settings.standalone {
            self.toc.standalone = standalone;
        }
    }

    /// Absolute path of the TOC artifact.
    #[must_use]
    pub fn toc_output_file(&self) -> PathBuf {
        self.docs_resolved.output_dir.join(&self.toc.output_path)
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
        let mut config = Self {
            docs: DocsConfigRaw::default(),
            toc: TocConfig::default(),
            links: LinksConfig::default(),
            docs_resolved: DocsConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_docs()?;
        self.validate_toc()?;
        self.validate_links()?;
        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        require_non_empty(&docs.root_doc, "docs.root_doc")?;

        if docs.source_suffixes.is_empty() {
            return Err(ConfigError::Validation(
                "docs.source_suffixes cannot be empty".to_owned(),
            ));
        }
        if let Some(bad) = docs.source_suffixes.iter().find(|s| !s.starts_with('.')) {
            return Err(ConfigError::Validation(format!(
                "docs.source_suffixes: '{bad}' must start with '.'"
            )));
        }

        require_globs(&docs.include_patterns, "docs.include_patterns")?;
        require_globs(&docs.exclude_patterns, "docs.exclude_patterns")?;

        require_non_empty(&docs.output_extension, "docs.output_extension")?;
        if docs.output_extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "docs.output_extension must not start with '.'".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_toc(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.toc.output_path, "toc.output_path")?;
        if Path::new(&self.toc.output_path).is_absolute() {
            return Err(ConfigError::Validation(
                "toc.output_path must be relative to the output directory".to_owned(),
            ));
        }
        if let Some(json_path) = &self.toc.json_path {
            require_non_empty(json_path, "toc.json_path")?;
        }

        require_non_empty(&self.toc.start_marker, "toc.start_marker")?;
        require_non_empty(&self.toc.end_marker, "toc.end_marker")?;
        if self.toc.start_marker == self.toc.end_marker {
            return Err(ConfigError::Validation(
                "toc.start_marker and toc.end_marker must differ".to_owned(),
            ));
        }

        if self.toc.url_schemes.is_empty() {
            return Err(ConfigError::Validation(
                "toc.url_schemes cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_links(&self) -> Result<(), ConfigError> {
        if self.links.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "links.extensions cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let docs = &mut self.docs;
        if let Some(ref dir) = docs.source_dir {
            docs.source_dir = Some(expand::expand_env(dir, "docs.source_dir")?);
        }
        if let Some(ref dir) = docs.output_dir {
            docs.output_dir = Some(expand::expand_env(dir, "docs.output_dir")?);
        }
        if let Some(ref root) = docs.root_doc {
            docs.root_doc = Some(expand::expand_env(root, "docs.root_doc")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let docs = &self.docs;

        self.docs_resolved = DocsConfig {
            source_dir: resolve(docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(docs.output_dir.as_deref(), "docs/_build/html"),
            root_doc: docs.root_doc.clone().unwrap_or_else(|| "index".to_owned()),
            source_suffixes: docs
                .source_suffixes
                .clone()
                .unwrap_or_else(|| vec![".rst".to_owned(), ".md".to_owned()]),
            include_patterns: docs
                .include_patterns
                .clone()
                .unwrap_or_else(|| vec!["**".to_owned()]),
            exclude_patterns: docs
                .exclude_patterns
                .clone()
                .unwrap_or_else(|| vec!["_build/**".to_owned()]),
            output_extension: docs
                .output_extension
                .clone()
                .unwrap_or_else(|| "html".to_owned()),
        };
    }
}

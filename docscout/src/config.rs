use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::export::ExportFormat;

/// Lower bound for the worker pool size
pub const MIN_THREADS: usize = 1;
/// Upper bound for the worker pool size
pub const MAX_THREADS: usize = 32;

/// File patterns searched when PDF support is requested
pub const DEFAULT_PATTERNS: &[&str] = &["*.docx", "*.pdf"];

/// Directory names skipped entirely during traversal
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git", "target", "node_modules", ".venv"];

/// Configuration for a single search run.
///
/// Values can be loaded from YAML config files and merged with CLI
/// arguments, with the CLI taking precedence. Config file locations in
/// order of precedence:
/// 1. Custom file passed to [`SearchConfig::load_from`]
/// 2. Local `.docscout.yaml` in the current directory
/// 3. Global `$CONFIG_DIR/docscout/config.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The term or pattern to search for
    #[serde(default)]
    pub term: String,

    /// Whether to match case exactly
    #[serde(default)]
    pub case_sensitive: bool,

    /// Whether to match whole words only
    #[serde(default)]
    pub whole_word: bool,

    /// Whether to interpret the term as a regular expression
    #[serde(default)]
    pub use_regex: bool,

    /// Root directory to start the search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Glob patterns selecting which files to search (matched on file names)
    #[serde(default = "default_file_patterns")]
    pub file_patterns: Vec<String>,

    /// Directory names to prune during traversal
    #[serde(default = "default_excluded_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Number of worker threads
    /// Defaults to min(32, CPU count + 4)
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Format to export results in, if any
    #[serde(default)]
    pub export_format: Option<ExportFormat>,

    /// Directory export files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_patterns() -> Vec<String> {
    vec!["*.docx".to_string()]
}

fn default_excluded_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect()
}

/// Pool size scales with available cores with a reasonable upper bound
pub fn default_thread_count() -> NonZeroUsize {
    let workers = MAX_THREADS.min(num_cpus::get() + 4).max(MIN_THREADS);
    NonZeroUsize::new(workers).unwrap()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            term: String::new(),
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            root_path: default_root_path(),
            file_patterns: default_file_patterns(),
            exclude_dirs: default_excluded_dirs(),
            thread_count: default_thread_count(),
            export_format: None,
            output_dir: default_output_dir(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("docscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".docscout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values.
    /// CLI values take precedence over config file values.
    pub fn merge_with_cli(mut self, cli: SearchConfig) -> Self {
        if !cli.term.is_empty() {
            self.term = cli.term;
        }
        if cli.case_sensitive {
            self.case_sensitive = true;
        }
        if cli.whole_word {
            self.whole_word = true;
        }
        if cli.use_regex {
            self.use_regex = true;
        }
        if cli.root_path != default_root_path() {
            self.root_path = cli.root_path;
        }
        if cli.file_patterns != default_file_patterns() {
            self.file_patterns = cli.file_patterns;
        }
        if cli.exclude_dirs != default_excluded_dirs() {
            self.exclude_dirs = cli.exclude_dirs;
        }
        // Always use the CLI thread count if specified
        self.thread_count = cli.thread_count;
        if cli.export_format.is_some() {
            self.export_format = cli.export_format;
        }
        if cli.output_dir != default_output_dir() {
            self.output_dir = cli.output_dir;
        }
        if cli.log_level != default_log_level() {
            self.log_level = cli.log_level;
        }
        self
    }

    /// Worker pool size clamped to the supported bounds
    pub fn effective_thread_count(&self) -> usize {
        self.thread_count.get().clamp(MIN_THREADS, MAX_THREADS)
    }
}

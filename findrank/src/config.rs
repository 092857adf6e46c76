use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::SearchResult;
use crate::search::options::SearchOptions;

/// User defaults for ranking and searching.
///
/// # Configuration Locations
///
/// Files are layered, later ones overriding earlier ones:
/// 1. Global `$CONFIG_DIR/findrank/config.yaml`
/// 2. Local `.findrank.yaml` in the current directory
/// 3. A file given with `--config`
///
/// # Configuration Format
///
/// ```yaml
/// case_sensitive: false
/// whole_word: false
/// use_regex: false
///
/// # Comma-separated globs
/// include_glob: "src/**/*.rs"
/// exclude_glob: "target/**,*.min.js"
///
/// # Listed first when the quick-open query is empty
/// recent_files:
///   - "src/main.rs"
///
/// # Threads used to read files (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// Command-line flags take precedence over every file; see
/// [`FindConfig::merge_with_cli`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindConfig {
    #[serde(default)]
    pub case_sensitive: bool,

    #[serde(default)]
    pub whole_word: bool,

    #[serde(default)]
    pub use_regex: bool,

    #[serde(default)]
    pub include_glob: String,

    #[serde(default)]
    pub exclude_glob: String,

    /// Most recent first
    #[serde(default)]
    pub recent_files: Vec<String>,

    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            include_glob: String::new(),
            exclude_glob: String::new(),
            recent_files: Vec::new(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl FindConfig {
    /// Loads configuration from the default locations
    pub fn load() -> SearchResult<Self> {
        Self::load_from(None)
    }

    /// Loads the default locations, then `config_path` on top. Unlike the
    /// default locations, an explicit file must exist.
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        let defaults = [
            dirs::config_dir().map(|p| p.join("findrank/config.yaml")),
            Some(PathBuf::from(".findrank.yaml")),
        ];
        let mut builder = ConfigBuilder::builder();

        for path in defaults.iter().flatten() {
            if path.exists() {
                debug!("Loading config from {}", path.display());
                builder = builder.add_source(File::from(path.as_path()));
            }
        }
        if let Some(path) = config_path {
            debug!("Loading config from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Layers existing files in the given order, skipping missing ones
    pub fn from_files(paths: &[PathBuf]) -> SearchResult<Self> {
        let mut builder = ConfigBuilder::builder();
        for path in paths.iter().filter(|p| p.exists()) {
            builder = builder.add_source(File::from(path.as_path()));
        }
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: FindConfig) -> Self {
        // Flags can only switch a behaviour on from the command line
        self.case_sensitive |= cli_config.case_sensitive;
        self.whole_word |= cli_config.whole_word;
        self.use_regex |= cli_config.use_regex;
        if !cli_config.include_glob.is_empty() {
            self.include_glob = cli_config.include_glob;
        }
        if !cli_config.exclude_glob.is_empty() {
            self.exclude_glob = cli_config.exclude_glob;
        }
        if !cli_config.recent_files.is_empty() {
            self.recent_files = cli_config.recent_files;
        }
        if cli_config.thread_count != default_thread_count() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }

    pub fn to_search_options(&self) -> SearchOptions {
        SearchOptions::new()
            .case_sensitive(self.case_sensitive)
            .whole_word(self.whole_word)
            .regex(self.use_regex)
            .include(self.include_glob.clone())
            .exclude(self.exclude_glob.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            case_sensitive: true
            use_regex: true
            include_glob: "src/**/*.rs"
            exclude_glob: "target/**"
            recent_files: ["src/main.rs", "Cargo.toml"]
            thread_count: 4
            log_level: "debug"
        "#;
        fs::write(&config_path, config_content).unwrap();

        let config = FindConfig::from_files(&[config_path]).unwrap();
        assert!(config.case_sensitive);
        assert!(!config.whole_word);
        assert!(config.use_regex);
        assert_eq!(config.include_glob, "src/**/*.rs");
        assert_eq!(config.exclude_glob, "target/**");
        assert_eq!(config.recent_files, vec!["src/main.rs", "Cargo.toml"]);
        assert_eq!(config.thread_count, NonZeroUsize::new(4).unwrap());
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_later_files_override_earlier() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.yaml");
        let local = dir.path().join("local.yaml");
        fs::write(&global, "whole_word: true\nexclude_glob: \"*.log\"\n").unwrap();
        fs::write(&local, "exclude_glob: \"*.tmp\"\n").unwrap();

        let missing = dir.path().join("missing.yaml");
        let config = FindConfig::from_files(&[global, missing, local]).unwrap();
        assert!(config.whole_word);
        assert_eq!(config.exclude_glob, "*.tmp");
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, "whole_word: false\n").unwrap();

        let config = FindConfig::from_files(&[config_path]).unwrap();
        assert_eq!(config, FindConfig::default());
        assert_eq!(
            config.thread_count,
            NonZeroUsize::new(num_cpus::get()).unwrap()
        );
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_merge_with_cli() {
        let file_config = FindConfig {
            include_glob: "*.rs".to_string(),
            exclude_glob: "target/**".to_string(),
            recent_files: vec!["a.rs".to_string()],
            log_level: "info".to_string(),
            ..FindConfig::default()
        };
        let cli_config = FindConfig {
            whole_word: true,
            exclude_glob: "*.tmp".to_string(),
            thread_count: NonZeroUsize::new(2).unwrap(),
            ..FindConfig::default()
        };

        let merged = file_config.merge_with_cli(cli_config);
        assert!(merged.whole_word); // CLI value
        assert_eq!(merged.include_glob, "*.rs"); // File value
        assert_eq!(merged.exclude_glob, "*.tmp"); // CLI value
        assert_eq!(merged.recent_files, vec!["a.rs"]); // File value
        assert_eq!(merged.log_level, "info"); // File value (CLI default)
        // An explicit count equal to the CPU count cannot be told apart from the default.
        if num_cpus::get() != 2 {
            assert_eq!(merged.thread_count, NonZeroUsize::new(2).unwrap());
        }
    }

    #[test]
    fn test_to_search_options() {
        let config = FindConfig {
            use_regex: true,
            include_glob: "*.ts".to_string(),
            ..FindConfig::default()
        };
        let options = config.to_search_options();
        assert!(options.use_regex);
        assert!(!options.case_sensitive);
        assert_eq!(options.include_glob, "*.ts");
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, "thread_count: \"invalid\"\nrecent_files: 12\n").unwrap();

        let result = FindConfig::from_files(&[config_path]);
        assert!(matches!(result, Err(SearchError::ConfigError(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = FindConfig::load_from(Some(Path::new("nonexistent-findrank.yaml")));
        assert!(result.is_err());
    }
}

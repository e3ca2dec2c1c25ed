//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeindex/treeindex.toml`
//! 3. Local config: `./.treeindex.toml` (current directory)
//! 4. Environment variables: `TREEINDEX_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, IndexOptions};

/// File name of the per-directory config.
pub const LOCAL_CONFIG_FILE: &str = ".treeindex.toml";

/// Unified configuration for treeindex.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Dataset used when a command gets no file argument
    pub dataset: Option<PathBuf>,
    /// Index behaviour
    pub index: IndexOptions,
}

/// Get the XDG config directory for treeindex.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeindex").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeindex.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Load settings from the standard locations.
    pub fn load() -> Result<Self, ApplicationError> {
        let local = std::env::current_dir()
            .ok()
            .map(|dir| local_config_path(&dir));
        Self::load_from(global_config_path().as_deref(), local.as_deref())
    }

    /// Load settings with explicit config file locations.
    ///
    /// Missing files are skipped. Each layer replaces the values it sets;
    /// `search_fields` is replaced as a whole, not merged.
    ///
    /// # Environment variables
    /// `TREEINDEX_DATASET`, `TREEINDEX_INDEX__SEARCH_FIELDS=label,value`,
    /// `TREEINDEX_INDEX__DUPLICATE_IDS`, `TREEINDEX_INDEX__CANDIDATE_FILTER`,
    /// `TREEINDEX_INDEX__PARALLEL_THRESHOLD`.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        for path in [global, local].into_iter().flatten() {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("TREEINDEX")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("index.search_fields")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dataset) = &self.dataset {
            let expanded = expand_env_vars(dataset.to_string_lossy().as_ref());
            self.dataset = Some(PathBuf::from(expanded));
        }
    }

    /// Dataset to work on: the explicit argument, else the configured one.
    pub fn dataset_path(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.dataset.clone())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treeindex configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeindex/treeindex.toml
#   Local:  ./.treeindex.toml
#   Env:    TREEINDEX_* environment variables (TREEINDEX_INDEX__SEARCH_FIELDS=label,value)

# Dataset used when no file argument is given
# dataset = "~/data/tree.json"

[index]
# Node fields joined into the search text: id, label, value, isHidden, parentId
# An empty list disables search (queries return the whole tree)
# search_fields = ["label", "value"]

# Duplicate ids: "last_wins" (later record replaces earlier) or "reject" (load fails)
# duplicate_ids = "last_wins"

# Candidate shortlist: "last_char" (postings of the last query char)
# or "all_chars" (intersection over all query chars)
# candidate_filter = "last_char"

# Datasets at least this large build search texts in parallel
# parallel_threshold = 50000
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

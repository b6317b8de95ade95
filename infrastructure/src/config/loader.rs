//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["crew.toml", ".crew.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CREW_` environment variables (`CREW_GAME__ROUNDS=5`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./crew.toml` or `./.crew.toml`
    /// 4. Global config: `$XDG_CONFIG_HOME/byzantine-crew/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Build the merged figment without extracting it
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("CREW_").split("__"))
    }

    /// Load a single file on top of the defaults, ignoring every other source
    pub fn load_file(path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Configuration for `--no-config`: global, project and environment
    /// sources are skipped, but an explicit file is still read on its own.
    pub fn load_isolated(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        match config_path {
            Some(path) => Self::load_file(path),
            None => Ok(Self::load_defaults()),
        }
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("byzantine-crew").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for `--show-config`)
    pub fn describe_sources(config_path: Option<&PathBuf>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push("  [ENV  ] CREW_* variables".to_string());

        if let Some(path) = config_path {
            lines.push(format!("  [FOUND] Explicit: {}", path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./crew.toml or ./.crew.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

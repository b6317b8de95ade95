//! Configuration file loading for byzantine-crew
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CREW_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./crew.toml` or `./.crew.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/byzantine-crew/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGameConfig, FileMapConfig, FileOutputConfig,
    FileOutputFormat, FileProvidersConfig, ProviderKind,
};
pub use loader::ConfigLoader;

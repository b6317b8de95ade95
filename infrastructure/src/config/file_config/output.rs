//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the final report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    #[default]
    Text,
    Json,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<FileOutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Directory for the JSONL event log and stats export
    pub log_dir: Option<PathBuf>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
color = false
log_dir = "logs"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, Some(FileOutputFormat::Json));
        assert!(!config.output.color);
        assert_eq!(config.output.log_dir, Some(PathBuf::from("logs")));
    }
}

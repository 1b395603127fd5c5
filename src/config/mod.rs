pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, ScanMode};

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::{ExportConfig, TomlConfig};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::{Parser, ValueEnum};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
    pub enum ScanMode {
        /// Identity documents into the visitor form
        Identity,
        /// Patrol checkpoint tags
        Checkpoint,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "guard-scan")]
    #[command(about = "Dispatch identity-document and checkpoint-tag scans")]
    pub struct CliConfig {
        #[arg(long, value_enum, default_value = "identity")]
        pub mode: ScanMode,

        #[arg(long, help = "File with one scan payload per line (default: stdin)")]
        pub input: Option<String>,

        #[arg(short, long, help = "TOML configuration file")]
        pub config: Option<String>,

        #[arg(long, help = "Override patrol.tag_prefix")]
        pub tag_prefix: Option<String>,

        #[arg(long, help = "Capture unrecognized payloads as a raw id number")]
        pub raw_id_fallback: bool,

        #[arg(long, help = "Write the entry log to this path")]
        pub export: Option<String>,

        #[arg(long, default_value = "csv")]
        pub format: String,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// File config (or defaults) with command line overrides applied.
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };

            if let Some(prefix) = &self.tag_prefix {
                config.patrol.tag_prefix = prefix.clone();
            }
            if self.raw_id_fallback {
                config.dispatch.raw_id_fallback = true;
            }
            if let Some(path) = &self.export {
                config.export = Some(ExportConfig {
                    path: path.clone(),
                    format: self.format.clone(),
                });
            }

            Ok(config)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if let Some(input) = &self.input {
                validation::validate_path("input", input)?;
            }
            if let Some(config) = &self.config {
                validation::validate_path("config", config)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core::ConfigProvider;

        #[test]
        fn test_cli_overrides_defaults() {
            let cli = CliConfig::parse_from([
                "guard-scan",
                "--mode",
                "checkpoint",
                "--tag-prefix",
                "gate-",
                "--raw-id-fallback",
                "--export",
                "shift.json",
                "--format",
                "json",
            ]);
            assert_eq!(cli.mode, ScanMode::Checkpoint);

            let config = cli.resolve().unwrap();
            assert_eq!(config.tag_prefix(), "gate-");
            assert!(config.raw_id_fallback());
            assert_eq!(config.export.as_ref().unwrap().format, "json");
        }

        #[test]
        fn test_cli_defaults() {
            let cli = CliConfig::parse_from(["guard-scan"]);
            assert_eq!(cli.mode, ScanMode::Identity);
            assert!(cli.validate().is_ok());
            assert_eq!(cli.resolve().unwrap().tag_prefix(), "cp-");
        }
    }
}

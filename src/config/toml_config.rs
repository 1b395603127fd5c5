use crate::adapters::export::EXPORT_FORMATS;
use crate::core::dispatcher::DispatchOptions;
use crate::core::patrol::{PatrolRoster, DEFAULT_TAG_PREFIX};
use crate::core::ConfigProvider;
use crate::domain::model::{Checkpoint, CheckpointStatus};
use crate::utils::error::{GuardError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub dispatch: DispatchConfig,
    pub patrol: PatrolConfig,
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Capture unrecognized payloads as a truncated id number.
    pub raw_id_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    pub tag_prefix: String,
    pub checkpoints: Vec<CheckpointConfig>,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
            checkpoints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub time: String,
    #[serde(default = "default_status")]
    pub status: CheckpointStatus,
}

fn default_status() -> CheckpointStatus {
    CheckpointStatus::Pending
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub path: String,
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GuardError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GuardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SITE_PREFIX})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GuardError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("patrol.tag_prefix", &self.patrol.tag_prefix)?;

        validation::validate_unique_ids(
            "patrol.checkpoints",
            self.patrol.checkpoints.iter().map(|cp| cp.id.as_str()),
        )?;
        for checkpoint in &self.patrol.checkpoints {
            validation::validate_non_empty_string("patrol.checkpoints.name", &checkpoint.name)?;
        }

        if let Some(export) = &self.export {
            validation::validate_path("export.path", &export.path)?;
            validation::validate_one_of("export.format", &export.format, &EXPORT_FORMATS)?;
        }

        Ok(())
    }

    /// Configured route, or the built-in one when none is configured.
    pub fn roster(&self) -> PatrolRoster {
        if self.patrol.checkpoints.is_empty() {
            return PatrolRoster::default_roster();
        }

        PatrolRoster::new(
            self.patrol
                .checkpoints
                .iter()
                .map(|cp| Checkpoint {
                    id: cp.id.clone(),
                    name: cp.name.clone(),
                    status: cp.status,
                    time: cp.time.clone(),
                })
                .collect(),
        )
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions::from_config(self)
    }
}

impl ConfigProvider for TomlConfig {
    fn tag_prefix(&self) -> &str {
        &self.patrol.tag_prefix
    }

    fn raw_id_fallback(&self) -> bool {
        self.dispatch.raw_id_fallback
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

// Configuration loading - TOML with defaults for every section

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub statements: StatementsConfig,
    pub ledger: LedgerConfig,
    pub institutions: InstitutionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file. `~` expands to the home directory.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from("transactions.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter; overridden by RUST_LOG when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementsConfig {
    /// Folder of pre-extracted statement text files, used when the CLI
    /// does not name one.
    pub input_folder: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Push stored records to the external ledger application.
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionsConfig {
    pub ipay: IPayConfig,
}

/// Tunables for the ipay payslip template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IPayConfig {
    /// Line labels whose amounts sum into other income.
    pub other_income_labels: Vec<String>,

    /// Markers in the text after a lone other-income amount that promote
    /// it from YTD to current period.
    pub current_period_markers: Vec<String>,

    /// Trailing-text prefixes that are template plumbing, never
    /// current-period markers.
    pub ignored_trailing_prefixes: Vec<String>,
}

impl Default for IPayConfig {
    fn default() -> Self {
        IPayConfig {
            other_income_labels: vec![
                "cola".to_string(),
                "retro cola".to_string(),
                "contribution".to_string(),
                "retro contribution".to_string(),
                "retro contribtn".to_string(),
                "award".to_string(),
                "skillpay allow".to_string(),
            ],
            current_period_markers: vec!["$".to_string(), "non-taxable".to_string()],
            ignored_trailing_prefixes: vec!["g t l".to_string(), "checking".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from `config.toml` in
    /// the working directory when present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = PathBuf::from("config.toml");
                default.exists().then_some(default)
            }
        };

        let Some(path) = candidate else {
            return Ok(Config::default());
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Database path with `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        expand_home(&self.database.path)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.path, PathBuf::from("transactions.db"));
        assert_eq!(config.logging.level, "info");
        assert!(!config.ledger.enabled);
        assert!(config
            .institutions
            .ipay
            .other_income_labels
            .contains(&"cola".to_string()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "paychecks.db"

            [institutions.ipay]
            current_period_markers = ["$", "non-taxable", "excluded"]
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("paychecks.db"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.institutions.ipay.current_period_markers.len(), 3);
        // Unspecified keys in a present section still default.
        assert!(!config.institutions.ipay.other_income_labels.is_empty());
    }
}

//! Service configuration: a YAML file in the platform config directory plus
//! environment overrides for deployment-provided identifiers.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Guild the scheduler reports on. All queries are guild-scoped.
    pub guild_id: i64,
    /// Channel watched for image posts.
    pub target_channel_id: i64,
    /// Channel the monthly report is delivered to.
    pub report_channel_id: i64,
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Day of month the monthly report and retention purge fire on.
    #[serde(default = "default_trigger_day")]
    pub trigger_day: u32,
    /// Minimum elapsed days between now and the start of the month to clear
    /// before the purge may run.
    #[serde(default = "default_retention_margin")]
    pub retention_margin_days: i64,
    /// Reactions applied (best-effort) to each counted image post.
    #[serde(default = "default_reactions")]
    pub reaction_emojis: Vec<String>,
}

fn default_trigger_day() -> u32 {
    2
}

fn default_retention_margin() -> i64 {
    58
}

fn default_reactions() -> Vec<String> {
    vec!["🍗".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            guild_id: 0,
            target_channel_id: 0,
            report_channel_id: 0,
            webhook_url: None,
            trigger_day: default_trigger_day(),
            retention_margin_days: default_retention_margin(),
            reaction_emojis: default_reactions(),
        }
    }
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pollotally")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("pollotally.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("pollotally.sqlite")
    }

    /// Load configuration from file (defaults when absent), then apply
    /// environment overrides.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::parse(&content, &path)?
        } else {
            Config::default()
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn parse(content: &str, path: &Path) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("POLLOTALLY_DB") {
            self.database = v;
        }
        if let Some(v) = env_id("POLLOTALLY_GUILD_ID") {
            self.guild_id = v;
        }
        if let Some(v) = env_id("POLLOTALLY_TARGET_CHANNEL_ID") {
            self.target_channel_id = v;
        }
        if let Some(v) = env_id("POLLOTALLY_REPORT_CHANNEL_ID") {
            self.report_channel_id = v;
        }
        if let Ok(v) = env::var("POLLOTALLY_WEBHOOK_URL") {
            self.webhook_url = Some(v);
        }
    }

    /// Required identifiers must be present before the ingestion/scheduling
    /// core starts; a misconfigured process refuses to come up.
    pub fn validate(&self) -> AppResult<()> {
        if self.guild_id == 0 {
            return Err(AppError::Config("guild_id is not set".into()));
        }
        if self.target_channel_id == 0 {
            return Err(AppError::Config("target_channel_id is not set".into()));
        }
        if self.report_channel_id == 0 {
            return Err(AppError::Config("report_channel_id is not set".into()));
        }
        if !(1..=28).contains(&self.trigger_day) {
            return Err(AppError::Config(
                "trigger_day must be between 1 and 28".into(),
            ));
        }
        Ok(())
    }
}

fn env_id(name: &str) -> Option<i64> {
    env::var(name).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            guild_id: 1,
            target_channel_id: 2,
            report_channel_id: 3,
            ..Config::default()
        }
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_channels() {
        let mut cfg = valid();
        cfg.target_channel_id = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.report_channel_id = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.guild_id = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_trigger_day_outside_every_month() {
        let mut cfg = valid();
        cfg.trigger_day = 29;
        assert!(cfg.validate().is_err());
        cfg.trigger_day = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parse_error_names_the_file_and_the_cause() {
        let path = PathBuf::from("/etc/pollotally/pollotally.conf");
        let err = Config::parse("guild_id: [not a number", &path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/etc/pollotally/pollotally.conf"));
        assert!(msg.contains("failed to parse"));
    }

    #[test]
    fn parse_accepts_a_minimal_file() {
        let yaml = "database: /tmp/p.sqlite\nguild_id: 1\ntarget_channel_id: 2\nreport_channel_id: 3\n";
        let cfg = Config::parse(yaml, &PathBuf::from("x.conf")).unwrap();
        assert_eq!(cfg.guild_id, 1);
        assert_eq!(cfg.trigger_day, 2);
    }

    #[test]
    fn defaults_match_the_retention_policy() {
        let cfg = Config::default();
        assert_eq!(cfg.trigger_day, 2);
        assert_eq!(cfg.retention_margin_days, 58);
    }
}

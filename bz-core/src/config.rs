//! Configuration schema for Botzee.
//!
//! One YAML file configures the seats, the rule set, the dice source and the event log.
//! Every section is optional; missing sections take the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::state::{Player, PlayerKind, Rules};

/// Most seats a game supports.
pub const MAX_PLAYERS: usize = 8;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Seats in turn order.
    #[serde(default = "default_players")]
    pub players: Vec<PlayerConfig>,

    /// Scoring rule options.
    #[serde(default)]
    pub rules: Rules,

    /// Dice source settings.
    #[serde(default)]
    pub chance: ChanceConfig,

    /// Event log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default = "default_player_kind")]
    pub kind: PlayerKind,
}

fn default_player_kind() -> PlayerKind {
    PlayerKind::Human
}

fn default_players() -> Vec<PlayerConfig> {
    vec![
        PlayerConfig {
            name: "Player 1".to_string(),
            kind: PlayerKind::Human,
        },
        PlayerConfig {
            name: "Player 2".to_string(),
            kind: PlayerKind::Human,
        },
        PlayerConfig {
            name: "Botzee".to_string(),
            kind: PlayerKind::Bot,
        },
    ]
}

/// Dice source configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChanceConfig {
    /// If true, use the event-keyed dice stream (reproducible per seed and decisions).
    #[serde(default)]
    pub deterministic: bool,
    /// Seed for either dice source. If None, the CLI derives one from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Event log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// NDJSON event log path; no event log if None.
    #[serde(default)]
    pub events_path: Option<String>,
    /// JSON manifest path written at the end of a run; none if None.
    #[serde(default)]
    pub manifest_path: Option<String>,
    /// Flush the event log every N lines (0 = only on close).
    #[serde(default = "default_flush_every_lines")]
    pub flush_every_lines: u64,
}

fn default_flush_every_lines() -> u64 {
    100
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            events_path: None,
            manifest_path: None,
            flush_every_lines: default_flush_every_lines(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() || self.players.len() > MAX_PLAYERS {
            return Err(ConfigError::Invalid(format!(
                "players: expected 1..={} seats, got {}",
                MAX_PLAYERS,
                self.players.len()
            )));
        }
        for (i, p) in self.players.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("players[{i}]: empty name")));
            }
            if self.players[..i].iter().any(|q| q.name == p.name) {
                return Err(ConfigError::Invalid(format!(
                    "players[{i}]: duplicate name {:?}",
                    p.name
                )));
            }
        }
        Ok(())
    }

    /// Seats with empty scorecards, in configured order.
    pub fn build_players(&self) -> Vec<Player> {
        self.players
            .iter()
            .map(|p| Player::new(p.name.clone(), p.kind))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players: default_players(),
            rules: Rules::default(),
            chance: ChanceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::YahtzeeBonusRule;

    #[test]
    fn test_load_default_yaml() {
        let config =
            Config::load("../configs/default.yaml").expect("Failed to load configs/default.yaml");

        assert_eq!(config.players.len(), 3);
        assert_eq!(config.players[0].name, "Player 1");
        assert_eq!(config.players[2].name, "Botzee");
        assert_eq!(config.players[2].kind, PlayerKind::Bot);
        assert_eq!(config.rules.yahtzee_bonus, YahtzeeBonusRule::Placeholder);
        assert!(!config.chance.deterministic);
        assert_eq!(config.chance.seed, Some(7));
        assert_eq!(config.logging.events_path, None);
        assert_eq!(config.logging.flush_every_lines, 100);
    }

    #[test]
    fn test_parse_yaml_string_applies_defaults() {
        let yaml = r#"
players:
  - name: "Ann"
  - name: "Bob"
    kind: bot

rules:
  yahtzee_bonus: standard
"#;

        let config = Config::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.players[0].kind, PlayerKind::Human);
        assert_eq!(config.players[1].kind, PlayerKind::Bot);
        assert_eq!(config.rules.yahtzee_bonus, YahtzeeBonusRule::Standard);
        // Check defaults are applied
        assert!(!config.chance.deterministic);
        assert_eq!(config.chance.seed, None);
        assert_eq!(config.logging.flush_every_lines, 100);
    }

    #[test]
    fn test_empty_yaml_is_default_config() {
        let config = Config::from_yaml("{}").expect("Failed to parse YAML");
        let names: Vec<&str> = config.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Player 1", "Player 2", "Botzee"]);
        assert_eq!(config.build_players().len(), 3);
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let invalid_yaml = "this is not: valid: yaml: {{{}}}";
        let result = Config::from_yaml(invalid_yaml);
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_unknown_bonus_rule_fails() {
        let result = Config::from_yaml("rules:\n  yahtzee_bonus: joker\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validation_rejects_bad_seats() {
        assert!(matches!(
            Config::from_yaml("players: []\n"),
            Err(ConfigError::Invalid(_))
        ));

        let dup = "players:\n  - name: A\n  - name: A\n";
        assert!(matches!(Config::from_yaml(dup), Err(ConfigError::Invalid(_))));

        let blank = "players:\n  - name: \"  \"\n";
        assert!(matches!(Config::from_yaml(blank), Err(ConfigError::Invalid(_))));

        let mut many = String::from("players:\n");
        for i in 0..=MAX_PLAYERS {
            many.push_str(&format!("  - name: P{i}\n"));
        }
        assert!(matches!(Config::from_yaml(&many), Err(ConfigError::Invalid(_))));
    }
}

//! Match configuration: seats, humans and the dice seed.

use crate::games::ludo::Color;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings consumed by a match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct MatchConfig {
    /// Number of seated players (2-4).
    #[serde(default = "default_player_count")]
    player_count: u8,

    /// Colors whose moves are picked by a person.
    #[serde(default)]
    humans: Vec<Color>,

    /// Leaving start needs a six. No other variant is supported.
    #[serde(default = "default_start_requires_six")]
    start_requires_six: bool,

    /// Seed for the random die; unseeded when absent.
    #[serde(default)]
    #[setters(strip_option)]
    seed: Option<u64>,
}

#[instrument]
fn default_player_count() -> u8 {
    4
}

#[instrument]
fn default_start_requires_six() -> bool {
    true
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_count: default_player_count(),
            humans: Vec::new(),
            start_requires_six: default_start_requires_six(),
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Creates an all-automated configuration for the given player count.
    #[instrument]
    pub fn new(player_count: u8) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Io(format!("Failed to read config file: {}", e)))
        })?;
        let config = Self::from_toml(&content)?;
        info!(player_count = config.player_count, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Parse(format!("Failed to parse config: {}", e)))
        })
    }

    /// Renders the configuration as TOML.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Parse(format!("Failed to render config: {}", e)))
        })
    }

    /// Seated colors for the player count.
    ///
    /// Two players sit opposite each other (A, C); three leave C empty.
    #[instrument(skip(self), fields(player_count = self.player_count))]
    pub fn active_seats(&self) -> Result<Vec<Color>, ConfigError> {
        match self.player_count {
            2 => Ok(vec![Color::A, Color::C]),
            3 => Ok(vec![Color::A, Color::B, Color::D]),
            4 => Ok(Color::ALL.to_vec()),
            n => Err(ConfigError::new(ConfigErrorKind::PlayerCount(n))),
        }
    }

    /// Checks every setting, returning the seated colors.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<Vec<Color>, ConfigError> {
        if !self.start_requires_six {
            return Err(ConfigError::new(ConfigErrorKind::StartRuleDisabled));
        }
        let seats = self.active_seats()?;
        if let Some(&color) = self.humans.iter().find(|c| !seats.contains(c)) {
            return Err(ConfigError::new(ConfigErrorKind::EmptySeat(color)));
        }
        Ok(seats)
    }

    /// Seat lookup: `None` for an empty seat, otherwise whether a person plays it.
    pub fn seat(&self, seats: &[Color], color: Color) -> Option<bool> {
        seats
            .contains(&color)
            .then(|| self.humans.contains(&color))
    }
}

/// What went wrong while setting a match up.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ConfigErrorKind {
    /// The player count is outside 2-4.
    #[display("Player count {} is outside 2-4", _0)]
    PlayerCount(u8),
    /// A human or first player was assigned to an empty seat.
    #[display("Color {} has no seat", _0)]
    EmptySeat(Color),
    /// The start-requires-six rule was switched off.
    #[display("Leaving start without a six is not supported")]
    StartRuleDisabled,
    /// No dice were supplied.
    #[display("No dice configured")]
    MissingDice,
    /// The starting positions break a table rule.
    #[display("Invalid starting layout: {}", _0)]
    InvalidLayout(String),
    /// A scripted replay was asked to wait on a person.
    #[display("Replay cannot drive human seat {}", _0)]
    HumanInReplay(Color),
    /// The config file could not be read.
    #[display("{}", _0)]
    Io(String),
    /// The config text could not be parsed.
    #[display("{}", _0)]
    Parse(String),
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", kind, file, line)]
pub struct ConfigError {
    /// What went wrong.
    pub kind: ConfigErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind), fields(kind = %kind))]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_patterns() {
        let seats = |n| MatchConfig::new(n).active_seats().map_err(|e| e.kind);
        assert_eq!(seats(2), Ok(vec![Color::A, Color::C]));
        assert_eq!(seats(3), Ok(vec![Color::A, Color::B, Color::D]));
        assert_eq!(seats(4), Ok(Color::ALL.to_vec()));
        assert_eq!(seats(0), Err(ConfigErrorKind::PlayerCount(0)));
        assert_eq!(seats(5), Err(ConfigErrorKind::PlayerCount(5)));
    }

    #[test]
    fn test_human_must_be_seated() {
        let config = MatchConfig::new(2).with_humans(vec![Color::B]);
        assert_eq!(
            config.validate().map_err(|e| e.kind),
            Err(ConfigErrorKind::EmptySeat(Color::B))
        );
    }

    #[test]
    fn test_start_rule_cannot_be_disabled() {
        let config = MatchConfig::default().with_start_requires_six(false);
        assert_eq!(
            config.validate().map_err(|e| e.kind),
            Err(ConfigErrorKind::StartRuleDisabled)
        );
    }

    #[test]
    fn test_toml_defaults() {
        let config = MatchConfig::from_toml("humans = [\"A\"]").expect("valid toml");
        assert_eq!(*config.player_count(), 4);
        assert!(*config.start_requires_six());
        assert_eq!(config.humans(), &vec![Color::A]);
        assert_eq!(*config.seed(), None);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MatchConfig::new(3).with_seed(11);
        let text = config.to_toml().expect("renders");
        assert_eq!(MatchConfig::from_toml(&text).expect("parses"), config);
    }

    #[test]
    fn test_bad_toml_reports_location() {
        let err = MatchConfig::from_toml("player_count = \"four\"").unwrap_err();
        assert!(matches!(err.kind, ConfigErrorKind::Parse(_)));
        assert!(err.file.ends_with("match_config.rs"));
    }

    #[test]
    fn test_seat_lookup() {
        let config = MatchConfig::new(2).with_humans(vec![Color::C]);
        let seats = config.validate().expect("valid");
        assert_eq!(config.seat(&seats, Color::A), Some(false));
        assert_eq!(config.seat(&seats, Color::B), None);
        assert_eq!(config.seat(&seats, Color::C), Some(true));
    }
}

//! Game and match configuration
//!
//! `GameConfig` is the immutable record handed to every boundary operation.
//! It can only be built through validation, so code holding one may assume a
//! sane radius and a known variant.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ai::SearchConfig;
use crate::board::MAX_RADIUS;
use crate::error::ConfigError;
use crate::eval::Heuristics;

/// Which game governs move generation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Forward-only one-step slides
    Dodo,
    /// Placement next to exactly one enemy stone
    Gopher,
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dodo" => Ok(Variant::Dodo),
            "gopher" => Ok(Variant::Gopher),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

impl Variant {
    /// Smallest radius the variant can be played on
    ///
    /// Dodo needs room for two disjoint starting camps.
    pub fn min_radius(self) -> i8 {
        match self {
            Variant::Dodo => 3,
            Variant::Gopher => 1,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Dodo => write!(f, "dodo"),
            Variant::Gopher => write!(f, "gopher"),
        }
    }
}

/// Validated (variant, radius) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    variant: Variant,
    radius: i8,
}

#[derive(Deserialize)]
struct RawGameConfig {
    variant: String,
    radius: i64,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigError;

    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        let variant = raw.variant.parse()?;
        GameConfig::new(variant, raw.radius)
    }
}

impl GameConfig {
    pub fn new(variant: Variant, radius: i64) -> Result<Self, ConfigError> {
        let min = variant.min_radius();
        if radius < min as i64 || radius > MAX_RADIUS as i64 {
            return Err(ConfigError::InvalidRadius {
                variant,
                radius,
                min,
                max: MAX_RADIUS,
            });
        }
        Ok(Self {
            variant,
            radius: radius as i8,
        })
    }

    /// Parse both fields from user-facing text
    pub fn parse(variant: &str, radius: i64) -> Result<Self, ConfigError> {
        Self::new(variant.parse()?, radius)
    }

    pub fn dodo(radius: i64) -> Result<Self, ConfigError> {
        Self::new(Variant::Dodo, radius)
    }

    pub fn gopher(radius: i64) -> Result<Self, ConfigError> {
        Self::new(Variant::Gopher, radius)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn radius(&self) -> i8 {
        self.radius
    }
}

/// Everything needed to run one game from a settings file
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSettings {
    pub game: GameConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub heuristics: Heuristics,
    #[serde(default = "default_max_plies")]
    pub max_plies: u32,
}

fn default_max_plies() -> u32 {
    500
}

impl MatchSettings {
    pub fn new(game: GameConfig) -> Self {
        Self {
            game,
            search: SearchConfig::default(),
            heuristics: Heuristics::default(),
            max_plies: default_max_plies(),
        }
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

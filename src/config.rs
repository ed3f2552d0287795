use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    combat::Mitigation,
    data::{
        MonsterKind, StatusEffectRule, Treasure, items::default_treasure_roster,
        monsters::{default_monster_roster, default_status_effects},
    },
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every tunable knob of the core.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map: MapConfig,
    pub spawns: SpawnConfig,
    pub combat: CombatConfig,
    pub progression: ProgressionConfig,
    pub rosters: Rosters,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    /// Probability that an interior cell starts alive (wall).
    pub density: f64,
    pub generations: u32,
    /// Density removed on each regeneration after a degenerate map.
    pub density_relax_step: f64,
    pub max_exit_attempts: u32,
    pub min_dimension: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 20,
            density: 0.4,
            generations: 1,
            density_relax_step: 0.1,
            max_exit_attempts: 32,
            min_dimension: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub boss_chance: f64,
    pub loot_chance: f64,
    pub lock_chance: f64,
    /// Inclusive `[low, high]`.
    pub boss_health: (i32, i32),
    pub boss_attack: (i32, i32),
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            boss_chance: 0.99,
            loot_chance: 0.8,
            lock_chance: 0.5,
            boss_health: (1, 20),
            boss_attack: (1, 10),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub base_hit: f64,
    pub hit_per_bonus: f64,
    pub hero_damage_scale: f64,
    pub curse_chance: f64,
    pub mitigation: Mitigation,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_hit: 0.5,
            hit_per_bonus: 0.1,
            hero_damage_scale: 5.0,
            curse_chance: 0.5,
            mitigation: Mitigation::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub max_level: u32,
    pub health_soft_cap: i32,
    pub min_light: i32,
    pub max_light: i32,
    pub keep_chance: f64,
    pub keep_chance_asleep: f64,
    pub fountain_chance: f64,
    pub start_health: i32,
    pub start_attack: i32,
    pub start_armour: i32,
    pub start_light: i32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            max_level: 50,
            health_soft_cap: 100,
            min_light: 2,
            max_light: 5,
            keep_chance: 0.95,
            keep_chance_asleep: 0.99,
            fountain_chance: 0.05,
            start_health: 20,
            start_attack: 1,
            start_armour: 1,
            start_light: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rosters {
    pub monsters: Vec<MonsterKind>,
    pub treasure: Vec<Treasure>,
    pub status_effects: Vec<StatusEffectRule>,
}

impl Default for Rosters {
    fn default() -> Self {
        Self {
            monsters: default_monster_roster(),
            treasure: default_treasure_roster(),
            status_effects: default_status_effects(),
        }
    }
}

impl GameConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let map = &self.map;
        if map.min_dimension < 4 {
            return Err(invalid("map.min_dimension must be at least 4"));
        }
        if map.width < map.min_dimension || map.height < map.min_dimension {
            return Err(invalid(format!(
                "map must be at least {0}x{0}, got {1}x{2}",
                map.min_dimension, map.width, map.height
            )));
        }
        check_probability("map.density", map.density)?;
        if map.density_relax_step <= 0.0 {
            return Err(invalid("map.density_relax_step must be positive"));
        }
        if map.max_exit_attempts == 0 {
            return Err(invalid("map.max_exit_attempts must be positive"));
        }

        check_probability("spawns.boss_chance", self.spawns.boss_chance)?;
        check_probability("spawns.loot_chance", self.spawns.loot_chance)?;
        check_probability("spawns.lock_chance", self.spawns.lock_chance)?;
        check_range("spawns.boss_health", self.spawns.boss_health)?;
        check_range("spawns.boss_attack", self.spawns.boss_attack)?;
        if self.spawns.boss_health.0 < 1 {
            return Err(invalid("spawns.boss_health must start at 1 or more"));
        }

        check_probability("combat.base_hit", self.combat.base_hit)?;
        check_probability("combat.curse_chance", self.combat.curse_chance)?;
        if self.combat.hero_damage_scale < 0.0 {
            return Err(invalid("combat.hero_damage_scale must not be negative"));
        }
        self.combat
            .mitigation
            .validate()
            .map_err(|reason| invalid(format!("combat.mitigation: {reason}")))?;

        let progression = &self.progression;
        check_probability("progression.keep_chance", progression.keep_chance)?;
        check_probability("progression.keep_chance_asleep", progression.keep_chance_asleep)?;
        if progression.keep_chance_asleep < progression.keep_chance {
            return Err(invalid(
                "progression.keep_chance_asleep must not be below progression.keep_chance",
            ));
        }
        check_probability("progression.fountain_chance", progression.fountain_chance)?;
        if progression.min_light < 1 || progression.min_light > progression.max_light {
            return Err(invalid("progression light bounds are inverted or below 1"));
        }
        if progression.max_level == 0 {
            return Err(invalid("progression.max_level must be positive"));
        }
        if progression.start_health <= 0 {
            return Err(invalid("progression.start_health must be positive"));
        }

        if self.rosters.monsters.is_empty() {
            return Err(invalid("rosters.monsters is empty"));
        }
        if self.rosters.treasure.is_empty() {
            return Err(invalid("rosters.treasure is empty"));
        }
        Ok(())
    }
}

fn invalid<S: Into<String>>(reason: S) -> ConfigError {
    ConfigError::Invalid(reason.into())
}

fn check_probability(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must lie in [0, 1], got {value}")))
    }
}

fn check_range(name: &str, (low, high): (i32, i32)) -> Result<(), ConfigError> {
    if low <= high {
        Ok(())
    } else {
        Err(invalid(format!("{name} is inverted: [{low}, {high}]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "map": { "width": 40 }, "seed": 7 }"#).unwrap();
        assert_eq!(config.map.width, 40);
        assert_eq!(config.map.height, 20);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.rosters, Rosters::default());
    }

    #[test]
    fn mitigation_strategy_is_selectable() {
        let config = GameConfig::from_json_str(
            r#"{ "combat": { "mitigation": { "deflection": { "per_point": 2 } } } }"#,
        )
        .unwrap();
        assert_eq!(config.combat.mitigation, Mitigation::Deflection { per_point: 2 });
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let err = GameConfig::from_json_str(r#"{ "spawns": { "boss_chance": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_tiny_map() {
        let err = GameConfig::from_json_str(r#"{ "map": { "width": 3 } }"#).unwrap_err();
        assert!(err.to_string().contains("at least 4x4"));
    }

    #[test]
    fn sleep_may_not_loosen_enchantments() {
        let raw = r#"{ "progression": { "keep_chance": 0.95, "keep_chance_asleep": 0.5 } }"#;
        let err = GameConfig::from_json_str(raw).unwrap_err();
        assert!(err.to_string().contains("keep_chance_asleep"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = GameConfig::from_json_str("{ map: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

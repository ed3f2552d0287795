//! A turn-based dungeon crawl: cellular-automaton levels under fog of war, a
//! single hidden boss, loot chests and a lockable exit.

pub mod combat;
pub mod config;
pub mod data;
pub mod game;
pub mod map;
pub mod player;
pub mod render;
pub mod rng;
pub mod scripted_input;
pub mod visibility;

pub use config::{ConfigError, GameConfig};
pub use game::{Direction, Ending, Game, GameEvent, Intent};
pub use map::{Level, generator::LevelGenerator};
pub use rng::{RandomSource, ScriptedRolls};

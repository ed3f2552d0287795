pub mod items;
pub mod monsters;

use serde::{Deserialize, Serialize};

pub use items::{Curse, Enchantment, KeyKind, Treasure};
pub use monsters::{MonsterKind, StatusEffectRule};

/// Wall palette; one variant is chosen per level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    Rock,
    Mountain,
}

impl WallKind {
    pub const PALETTE: [WallKind; 2] = [WallKind::Rock, WallKind::Mountain];

    pub fn symbol(&self) -> &'static str {
        match self {
            WallKind::Rock => "🪨",
            WallKind::Mountain => "🗻",
        }
    }

    pub fn ascii(&self) -> char {
        match self {
            WallKind::Rock => '#',
            WallKind::Mountain => '^',
        }
    }
}

pub const DOOR_SYMBOL: &str = "🚪";
pub const CHEST_SYMBOL: &str = "🗃";
pub const HERO_SYMBOL: &str = "🧙";
pub const DEAD_SYMBOL: &str = "☠️";

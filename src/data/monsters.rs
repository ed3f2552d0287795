use serde::{Deserialize, Serialize};

use super::items::Curse;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    Dragon,
    Snake,
    Troll,
    Genie,
    Scorpion,
    Skull,
    Spider,
    Bat,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 8] = [
        MonsterKind::Dragon,
        MonsterKind::Snake,
        MonsterKind::Troll,
        MonsterKind::Genie,
        MonsterKind::Scorpion,
        MonsterKind::Skull,
        MonsterKind::Spider,
        MonsterKind::Bat,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            MonsterKind::Dragon => "🐉",
            MonsterKind::Snake => "🐍",
            MonsterKind::Troll => "🧌",
            MonsterKind::Genie => "🧞",
            MonsterKind::Scorpion => "🦂",
            MonsterKind::Skull => "💀",
            MonsterKind::Spider => "🕷️",
            MonsterKind::Bat => "🦇",
        }
    }

    pub fn ascii(&self) -> char {
        match self {
            MonsterKind::Dragon => 'D',
            MonsterKind::Snake => 'S',
            MonsterKind::Troll => 'T',
            MonsterKind::Genie => 'G',
            MonsterKind::Scorpion => 's',
            MonsterKind::Skull => 'Z',
            MonsterKind::Spider => 'x',
            MonsterKind::Bat => 'B',
        }
    }
}

/// A curse and the monster kinds able to inflict it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectRule {
    pub curse: Curse,
    pub afflicts: Vec<MonsterKind>,
}

impl StatusEffectRule {
    pub fn new(curse: Curse, afflicts: &[MonsterKind]) -> Self {
        Self {
            curse,
            afflicts: afflicts.to_vec(),
        }
    }

    pub fn inflicted_by(&self, kind: MonsterKind) -> bool {
        self.afflicts.contains(&kind)
    }
}

pub fn default_monster_roster() -> Vec<MonsterKind> {
    MonsterKind::ALL.to_vec()
}

pub fn default_status_effects() -> Vec<StatusEffectRule> {
    vec![
        StatusEffectRule::new(
            Curse::Poison,
            &[MonsterKind::Snake, MonsterKind::Scorpion, MonsterKind::Spider],
        ),
        StatusEffectRule::new(Curse::Sleep, &[MonsterKind::Genie, MonsterKind::Bat]),
        StatusEffectRule::new(Curse::Darkness, &[MonsterKind::Skull, MonsterKind::Dragon]),
    ]
}

use serde::{Deserialize, Serialize};

/// Anything that can be picked up, dropped by a fountain, or stored as level loot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Treasure {
    Dagger,
    Shield,
    Gold,
    Meat,
    Potion,
    Serum,
    Bow,
    Ring,
    Clover,
    Scroll,
}

impl Treasure {
    pub const ALL: [Treasure; 10] = [
        Treasure::Dagger,
        Treasure::Shield,
        Treasure::Gold,
        Treasure::Meat,
        Treasure::Potion,
        Treasure::Serum,
        Treasure::Bow,
        Treasure::Ring,
        Treasure::Clover,
        Treasure::Scroll,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Treasure::Dagger => "🗡️",
            Treasure::Shield => "🛡️",
            Treasure::Gold => "💰",
            Treasure::Meat => "🥩",
            Treasure::Potion => "🧪",
            Treasure::Serum => "🧫",
            Treasure::Bow => "🏹",
            Treasure::Ring => "💍",
            Treasure::Clover => "🍀",
            Treasure::Scroll => "📜",
        }
    }

    pub fn ascii(&self) -> char {
        match self {
            Treasure::Dagger => '|',
            Treasure::Shield => '[',
            Treasure::Gold => '$',
            Treasure::Meat => '%',
            Treasure::Potion => '!',
            Treasure::Serum => '¡',
            Treasure::Bow => '}',
            Treasure::Ring => '=',
            Treasure::Clover => '&',
            Treasure::Scroll => '?',
        }
    }

    /// The enchantment this item grants when picked up, if any.
    pub fn enchantment(&self) -> Option<Enchantment> {
        match self {
            Treasure::Bow => Some(Enchantment::Bow),
            Treasure::Ring => Some(Enchantment::Ring),
            Treasure::Clover => Some(Enchantment::Clover),
            _ => None,
        }
    }
}

/// Persistent boons.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enchantment {
    /// Ranged weapon: every landed hit kills.
    Bow,
    /// Ring of secrets: reveals the level's hidden specials.
    Ring,
    /// Luck: amplifies most power-ups.
    Clover,
}

impl Enchantment {
    pub const ALL: [Enchantment; 3] = [Enchantment::Ring, Enchantment::Clover, Enchantment::Bow];

    pub fn symbol(&self) -> &'static str {
        self.treasure().symbol()
    }

    pub fn treasure(&self) -> Treasure {
        match self {
            Enchantment::Bow => Treasure::Bow,
            Enchantment::Ring => Treasure::Ring,
            Enchantment::Clover => Treasure::Clover,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curse {
    Poison,
    Sleep,
    Darkness,
}

impl Curse {
    pub fn symbol(&self) -> &'static str {
        match self {
            Curse::Poison => "☠️",
            Curse::Sleep => "😴",
            Curse::Darkness => "🌙",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Skeleton,
    Brass,
}

impl KeyKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            KeyKind::Skeleton => "🗝",
            KeyKind::Brass => "🔑",
        }
    }
}

pub fn default_treasure_roster() -> Vec<Treasure> {
    Treasure::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_boons_grant_enchantments() {
        let granting: Vec<_> = Treasure::ALL
            .iter()
            .filter_map(|t| t.enchantment())
            .collect();
        assert_eq!(
            granting,
            vec![Enchantment::Bow, Enchantment::Ring, Enchantment::Clover]
        );
        for enchantment in Enchantment::ALL {
            assert_eq!(enchantment.treasure().enchantment(), Some(enchantment));
        }
    }
}

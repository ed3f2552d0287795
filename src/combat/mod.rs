//! One exchange of blows per call: the hero strikes, then the monster answers
//! if it is still standing. Callers re-invoke until the fight concludes.

use log::{trace, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    config::CombatConfig,
    data::{Curse, Enchantment, StatusEffectRule},
    map::Monster,
    player::Player,
    rng::RandomSource,
};

/// How armour class reduces a monster's raw damage. One strategy is chosen
/// per game through [`CombatConfig::mitigation`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mitigation {
    /// Deflect `floor(raw * per_point * armour)`.
    Percentage { per_point: f64 },
    /// Deflect a flat `per_point * armour`.
    Deflection { per_point: i32 },
}

impl Default for Mitigation {
    fn default() -> Self {
        Mitigation::Percentage { per_point: 0.05 }
    }
}

impl Mitigation {
    pub fn apply(&self, raw: i32, armour_class: i32) -> i32 {
        let armour = armour_class.max(0);
        let deflected = match *self {
            Mitigation::Percentage { per_point } => {
                (raw as f64 * per_point * armour as f64).floor() as i32
            }
            Mitigation::Deflection { per_point } => per_point * armour,
        };
        (raw - deflected).max(0)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        match *self {
            Mitigation::Percentage { per_point } if !(0.0..=1.0).contains(&per_point) => {
                Err(format!("per_point {per_point} outside [0, 1]"))
            }
            Mitigation::Deflection { per_point } if per_point < 0 => {
                Err(format!("per_point {per_point} is negative"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CombatResult {
    MonsterDefeated,
    PlayerDefeated,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CombatState {
    Idle,
    Resolving,
    Concluded(CombatResult),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strike {
    Hit { damage: i32, fatal: bool },
    Miss,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Retaliation {
    Strike(Strike),
    /// The monster fell to the hero's blow and never answered.
    None,
}

/// Everything a caller needs to report one exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatOutcome {
    pub hero: Strike,
    pub monster: Retaliation,
    pub player_health: i32,
    pub monster_health: i32,
    pub inflicted: SmallVec<[Curse; 3]>,
    pub curses: Vec<Curse>,
    pub state: CombatState,
}

impl CombatOutcome {
    pub fn result(&self) -> Option<CombatResult> {
        match self.state {
            CombatState::Concluded(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CombatResolver {
    monster: Monster,
    state: CombatState,
}

impl CombatResolver {
    pub fn new(monster: Monster) -> Self {
        Self {
            monster,
            state: CombatState::Idle,
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn monster(&self) -> &Monster {
        &self.monster
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self.state, CombatState::Concluded(_))
    }

    pub fn exchange<R: RandomSource>(
        &mut self,
        player: &mut Player,
        rules: &CombatConfig,
        effects: &[StatusEffectRule],
        rng: &mut R,
    ) -> CombatOutcome {
        if self.is_concluded() || self.monster.health <= 0 {
            debug_assert!(false, "exchange on a finished fight: {:?}", self.state);
            warn!("ignoring combat exchange against a defeated monster");
            return self.idle_outcome(player);
        }
        self.state = CombatState::Resolving;

        let hero = self.hero_strike(player, rules, rng);
        if self.monster.health <= 0 {
            self.state = CombatState::Concluded(CombatResult::MonsterDefeated);
            return self.outcome(player, hero, Retaliation::None, SmallVec::new());
        }

        let mut inflicted = SmallVec::new();
        let strike = self.monster_strike(player, rules, effects, &mut inflicted, rng);
        if player.health <= 0 {
            player.alive = false;
            self.state = CombatState::Concluded(CombatResult::PlayerDefeated);
        }
        self.outcome(player, hero, Retaliation::Strike(strike), inflicted)
    }

    fn hero_strike<R: RandomSource>(
        &mut self,
        player: &Player,
        rules: &CombatConfig,
        rng: &mut R,
    ) -> Strike {
        let threshold = rules.base_hit - rules.hit_per_bonus * player.attack_bonus as f64;
        if !rng.above(threshold) {
            trace!("hero misses {:?}", self.monster.kind);
            return Strike::Miss;
        }
        let rolled = rng.scaled(player.attack_bonus as f64 * rules.hero_damage_scale);
        let damage = if player.has_enchantment(Enchantment::Bow) {
            self.monster.health
        } else {
            rolled.max(0)
        };
        self.monster.health = (self.monster.health - damage).max(0);
        trace!(
            "hero hits {:?} for {damage}, {} left",
            self.monster.kind, self.monster.health
        );
        Strike::Hit {
            damage,
            fatal: self.monster.health <= 0,
        }
    }

    fn monster_strike<R: RandomSource>(
        &self,
        player: &mut Player,
        rules: &CombatConfig,
        effects: &[StatusEffectRule],
        inflicted: &mut SmallVec<[Curse; 3]>,
        rng: &mut R,
    ) -> Strike {
        let attack = self.monster.attack_bonus;
        let threshold = rules.base_hit - rules.hit_per_bonus * attack as f64;
        if !rng.above(threshold) {
            trace!("{:?} misses", self.monster.kind);
            return Strike::Miss;
        }
        let raw = rng.scaled(attack as f64).max(0);
        let damage = rules.mitigation.apply(raw, player.armour_class);

        for rule in effects.iter().filter(|rule| rule.inflicted_by(self.monster.kind)) {
            if rng.uniform() < rules.curse_chance && player.add_curse(rule.curse) {
                inflicted.push(rule.curse);
            }
        }

        player.health = (player.health - damage).max(0);
        trace!(
            "{:?} hits for {damage} (raw {raw}), player at {}",
            self.monster.kind, player.health
        );
        Strike::Hit {
            damage,
            fatal: player.health <= 0,
        }
    }

    fn outcome(
        &self,
        player: &Player,
        hero: Strike,
        monster: Retaliation,
        inflicted: SmallVec<[Curse; 3]>,
    ) -> CombatOutcome {
        CombatOutcome {
            hero,
            monster,
            player_health: player.health,
            monster_health: self.monster.health,
            inflicted,
            curses: player.curses.iter().copied().collect(),
            state: self.state,
        }
    }

    fn idle_outcome(&self, player: &Player) -> CombatOutcome {
        self.outcome(player, Strike::Miss, Retaliation::None, SmallVec::new())
    }
}

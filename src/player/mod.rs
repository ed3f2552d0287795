use std::collections::BTreeSet;

use bracket_geometry::prelude::Point;
use log::debug;
use smallvec::SmallVec;

use crate::{
    config::ProgressionConfig,
    data::{Curse, Enchantment, Treasure},
    rng::RandomSource,
};

/// The hero. Persists across levels; only position and the "just moved"
/// flag reset when a new level starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub position: Point,
    pub health: i32,
    pub attack_bonus: i32,
    pub armour_class: i32,
    pub light_range: i32,
    pub gold: i32,
    pub experience: u32,
    pub alive: bool,
    pub just_moved: bool,
    pub enchantments: BTreeSet<Enchantment>,
    pub curses: BTreeSet<Curse>,
}

/// What a pickup did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerUp {
    pub item: Treasure,
    /// Stat change for attack/armour/gold/health/light items, 0 otherwise.
    pub amount: i32,
    pub cured: Option<Curse>,
    pub granted: Option<Enchantment>,
    /// The ring asks the level to show its secrets.
    pub reveal_secrets: bool,
}

/// Entropy applied when a new floor starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerDown {
    pub health_lost: i32,
    pub light_lost: i32,
    pub lost: SmallVec<[Enchantment; 3]>,
    /// A kept ring of secrets shows the new level's specials.
    pub reveal_secrets: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub position: Point,
    pub health: i32,
    pub armour_class: i32,
    pub attack_bonus: i32,
    pub gold: i32,
    pub experience: u32,
    pub enchantments: Vec<Enchantment>,
    pub curses: Vec<Curse>,
}

impl Player {
    pub fn new(rules: &ProgressionConfig) -> Self {
        Self {
            position: Point::new(0, 0),
            health: rules.start_health,
            attack_bonus: rules.start_attack,
            armour_class: rules.start_armour,
            light_range: rules.start_light,
            gold: 0,
            experience: 0,
            alive: true,
            just_moved: false,
            enchantments: BTreeSet::new(),
            curses: BTreeSet::new(),
        }
    }

    /// Place the player on a fresh level and apply entropy for the floor.
    pub fn init<R: RandomSource>(
        &mut self,
        spawn: Point,
        rules: &ProgressionConfig,
        rng: &mut R,
    ) -> PowerDown {
        self.position = spawn;
        self.alive = true;
        self.just_moved = false;
        self.power_down(self.experience, rules, rng)
    }

    pub fn has_enchantment(&self, enchantment: Enchantment) -> bool {
        self.enchantments.contains(&enchantment)
    }

    pub fn has_curse(&self, curse: Curse) -> bool {
        self.curses.contains(&curse)
    }

    /// True when newly granted.
    pub fn add_enchantment(&mut self, enchantment: Enchantment) -> bool {
        self.enchantments.insert(enchantment)
    }

    pub fn remove_enchantment(&mut self, enchantment: Enchantment) -> bool {
        self.enchantments.remove(&enchantment)
    }

    /// True when newly inflicted.
    pub fn add_curse(&mut self, curse: Curse) -> bool {
        self.curses.insert(curse)
    }

    pub fn cure(&mut self, curse: Curse) -> bool {
        self.curses.remove(&curse)
    }

    /// Darkness pins the light to a single cell around the player.
    pub fn light_radius(&self) -> i32 {
        if self.has_curse(Curse::Darkness) {
            1
        } else {
            self.light_range.max(0)
        }
    }

    pub fn power_up<R: RandomSource>(
        &mut self,
        item: Treasure,
        rules: &ProgressionConfig,
        rng: &mut R,
    ) -> PowerUp {
        let luck = if self.has_enchantment(Enchantment::Clover) {
            2.0
        } else {
            1.0
        };
        let mut result = PowerUp {
            item,
            amount: 0,
            cured: None,
            granted: None,
            reveal_secrets: false,
        };

        match item {
            Treasure::Dagger => {
                result.amount = rng.scaled(3.0 * luck) + 1;
                self.attack_bonus += result.amount;
            }
            Treasure::Shield => {
                result.amount = rng.scaled(2.0 * luck) + 1;
                self.armour_class += result.amount;
            }
            Treasure::Gold => {
                let gold_luck = if luck > 1.0 { 5.0 } else { 1.0 };
                result.amount = rng.scaled(100.0 * gold_luck).max(0);
                self.gold += result.amount;
            }
            Treasure::Meat => {
                result.amount = rng.scaled(50.0 * luck);
                self.health += result.amount;
            }
            Treasure::Potion | Treasure::Serum => {
                let curse = if item == Treasure::Potion {
                    Curse::Poison
                } else {
                    Curse::Sleep
                };
                result.amount = rng.scaled(10.0 * luck);
                self.health += result.amount;
                if self.cure(curse) {
                    result.cured = Some(curse);
                }
            }
            Treasure::Scroll => {
                let before = self.light_range;
                let boost = rng.scaled(5.0 * luck);
                self.light_range = (self.light_range + boost).min(rules.max_light);
                result.amount = self.light_range - before;
                if self.cure(Curse::Darkness) {
                    result.cured = Some(Curse::Darkness);
                }
            }
            Treasure::Bow | Treasure::Ring | Treasure::Clover => {
                if let Some(enchantment) = item.enchantment() {
                    if self.add_enchantment(enchantment) {
                        result.granted = Some(enchantment);
                    }
                }
                result.reveal_secrets = item == Treasure::Ring;
            }
        }
        result
    }

    /// `since_level` 0 keeps every enchantment.
    pub fn power_down<R: RandomSource>(
        &mut self,
        since_level: u32,
        rules: &ProgressionConfig,
        rng: &mut R,
    ) -> PowerDown {
        let mut report = PowerDown::default();

        if self.health > rules.health_soft_cap {
            let before = self.health;
            self.health = (self.health - (rng.scaled(5.0) + 1)).max(rules.health_soft_cap);
            report.health_lost = before - self.health;
        }

        let keep = if since_level == 0 {
            1.0
        } else if self.has_curse(Curse::Sleep) {
            rules.keep_chance_asleep
        } else {
            rules.keep_chance
        };

        for enchantment in Enchantment::ALL {
            if rng.above(keep) {
                if self.remove_enchantment(enchantment) {
                    report.lost.push(enchantment);
                }
            } else if enchantment == Enchantment::Ring && self.has_enchantment(Enchantment::Ring) {
                report.reveal_secrets = true;
            }
        }

        let before = self.light_range;
        let decay = if rng.above(0.5) { 1 } else { 0 };
        self.light_range = (self.light_range - decay).max(rules.min_light);
        report.light_lost = before - self.light_range;

        if !report.lost.is_empty() {
            debug!("power down lost {:?}", report.lost);
        }
        report
    }

    /// Health drifts with every step: poison drains, otherwise the hero mends.
    pub fn after_move<R: RandomSource>(&mut self, rng: &mut R) {
        let roll_hits = rng.above(0.9);
        if self.has_curse(Curse::Poison) {
            if roll_hits {
                self.health -= 1;
            }
        } else if roll_hits {
            self.health += 1;
        }
        self.health = self.health.max(0);
        self.alive = self.health > 0;
    }

    /// Debug aid: every boon, no curses.
    pub fn grant_all(&mut self) {
        self.enchantments = Enchantment::ALL.into_iter().collect();
        self.curses.clear();
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.light_range = 0;
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            position: self.position,
            health: self.health,
            armour_class: self.armour_class,
            attack_bonus: self.attack_bonus,
            gold: self.gold,
            experience: self.experience,
            enchantments: self.enchantments.iter().copied().collect(),
            curses: self.curses.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRolls, from_seed};

    fn rules() -> ProgressionConfig {
        ProgressionConfig::default()
    }

    #[test]
    fn dagger_and_shield_always_add_at_least_one() {
        let mut player = Player::new(&rules());
        let mut rolls = ScriptedRolls::new([0.0, 0.0]);
        player.power_up(Treasure::Dagger, &rules(), &mut rolls);
        player.power_up(Treasure::Shield, &rules(), &mut rolls);
        assert_eq!(player.attack_bonus, 2);
        assert_eq!(player.armour_class, 2);
    }

    #[test]
    fn luck_quintuples_gold() {
        let mut player = Player::new(&rules());
        player.add_enchantment(Enchantment::Clover);
        let mut rolls = ScriptedRolls::new([0.5]);
        let up = player.power_up(Treasure::Gold, &rules(), &mut rolls);
        assert_eq!(up.amount, 250);
        assert_eq!(player.gold, 250);
    }

    #[test]
    fn potion_cures_poison_only() {
        let mut player = Player::new(&rules());
        player.add_curse(Curse::Poison);
        player.add_curse(Curse::Sleep);
        let mut rolls = ScriptedRolls::new([0.5]);
        let up = player.power_up(Treasure::Potion, &rules(), &mut rolls);
        assert_eq!(up.cured, Some(Curse::Poison));
        assert_eq!(player.health, 25);
        assert!(player.has_curse(Curse::Sleep));
    }

    #[test]
    fn scroll_caps_light_and_lifts_darkness() {
        let mut player = Player::new(&rules());
        player.add_curse(Curse::Darkness);
        let mut rolls = ScriptedRolls::new([0.99]);
        let up = player.power_up(Treasure::Scroll, &rules(), &mut rolls);
        assert_eq!(player.light_range, 5);
        assert_eq!(up.amount, 3);
        assert_eq!(up.cured, Some(Curse::Darkness));
    }

    #[test]
    fn granting_held_enchantment_is_a_no_op() {
        let mut player = Player::new(&rules());
        let mut rolls = ScriptedRolls::new([]);
        let first = player.power_up(Treasure::Bow, &rules(), &mut rolls);
        let before = player.clone();
        let second = player.power_up(Treasure::Bow, &rules(), &mut rolls);
        assert_eq!(first.granted, Some(Enchantment::Bow));
        assert_eq!(second.granted, None);
        assert_eq!(player, before);
    }

    #[test]
    fn ring_pickup_reveals_secrets() {
        let mut player = Player::new(&rules());
        let mut rolls = ScriptedRolls::new([]);
        let up = player.power_up(Treasure::Ring, &rules(), &mut rolls);
        assert!(up.reveal_secrets);
        assert!(player.has_enchantment(Enchantment::Ring));
    }

    #[test]
    fn power_down_regresses_health_to_soft_cap() {
        let mut player = Player::new(&rules());
        player.health = 102;
        // health roll 0.99 -> lose 5, then keep all three, no light decay
        let mut rolls = ScriptedRolls::new([0.99, 0.0, 0.0, 0.0, 0.0]);
        let report = player.power_down(3, &rules(), &mut rolls);
        assert_eq!(player.health, 100);
        assert_eq!(report.health_lost, 2);
        assert_eq!(report.light_lost, 0);
    }

    #[test]
    fn sleep_holds_enchantments_tighter() {
        let mut player = Player::new(&rules());
        player.grant_all();
        player.add_curse(Curse::Sleep);
        // 0.97 beats the awake keep chance but not the asleep one
        let mut rolls = ScriptedRolls::new([0.97, 0.97, 0.97, 0.0]);
        let report = player.power_down(4, &rules(), &mut rolls);
        assert!(report.lost.is_empty());
        assert_eq!(player.enchantments.len(), 3);
        assert!(report.reveal_secrets);

        let mut awake = Player::new(&rules());
        awake.grant_all();
        let mut rolls = ScriptedRolls::new([0.97, 0.97, 0.97, 0.0]);
        let report = awake.power_down(4, &rules(), &mut rolls);
        assert_eq!(report.lost.len(), 3);
        assert!(!report.reveal_secrets);
    }

    #[test]
    fn sleeping_hero_loses_enchantments_less_often() {
        let loss_rate = |asleep: bool| {
            let mut rng = from_seed(Some(0x51ee9));
            let mut lost = 0;
            for _ in 0..4000 {
                let mut player = Player::new(&rules());
                player.grant_all();
                if asleep {
                    player.add_curse(Curse::Sleep);
                }
                lost += player.power_down(3, &rules(), &mut rng).lost.len();
            }
            lost as f64 / 12_000.0
        };
        let awake = loss_rate(false);
        let asleep = loss_rate(true);
        assert!(asleep < awake, "asleep {asleep} vs awake {awake}");
        assert!(awake > 0.03 && awake < 0.07);
    }

    #[test]
    fn level_zero_keeps_everything() {
        let mut player = Player::new(&rules());
        player.grant_all();
        let mut rolls = ScriptedRolls::new([0.999, 0.999, 0.999, 0.999]);
        let report = player.power_down(0, &rules(), &mut rolls);
        assert!(report.lost.is_empty());
        assert_eq!(player.enchantments.len(), 3);
        // light never decays below the minimum
        assert_eq!(player.light_range, 2);
    }

    #[test]
    fn poison_drains_on_high_roll() {
        let mut player = Player::new(&rules());
        player.add_curse(Curse::Poison);
        let mut rolls = ScriptedRolls::new([0.95, 0.5]);
        player.after_move(&mut rolls);
        assert_eq!(player.health, 19);
        player.after_move(&mut rolls);
        assert_eq!(player.health, 19);

        player.cure(Curse::Poison);
        let mut rolls = ScriptedRolls::new([0.95]);
        player.after_move(&mut rolls);
        assert_eq!(player.health, 20);
    }

    #[test]
    fn darkness_overrides_light_range() {
        let mut player = Player::new(&rules());
        player.light_range = 5;
        assert_eq!(player.light_radius(), 5);
        player.add_curse(Curse::Darkness);
        assert_eq!(player.light_radius(), 1);
    }
}

use std::collections::BTreeSet;

use bracket_geometry::prelude::Point;
use log::{debug, trace};

use super::{BossCell, Cell, Level, LootCell, Monster};
use crate::{
    config::{GameConfig, MapConfig, SpawnConfig},
    data::{Enchantment, MonsterKind, Treasure, WallKind},
    rng::RandomSource,
};

/// Neighbour counts that keep a live cell alive / bring a dead one to life.
const SURVIVE: [u8; 5] = [4, 5, 6, 7, 8];
const BORN: [u8; 4] = [5, 6, 7, 8];

/// Birth/survival automaton over the interior of a level.
struct Automaton {
    width: i32,
    height: i32,
    alive: Vec<bool>,
}

impl Automaton {
    /// Seeds every cell alive with probability `density`, column by column.
    fn randomize<R: RandomSource>(width: i32, height: i32, density: f64, rng: &mut R) -> Self {
        let mut alive = vec![false; (width * height) as usize];
        for x in 0..width {
            for y in 0..height {
                alive[(y * width + x) as usize] = rng.uniform() < density;
            }
        }
        Self {
            width,
            height,
            alive,
        }
    }

    fn is_alive(&self, x: i32, y: i32) -> bool {
        x >= 0
            && x < self.width
            && y >= 0
            && y < self.height
            && self.alive[(y * self.width + x) as usize]
    }

    fn neighbours(&self, x: i32, y: i32) -> u8 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx != 0 || dy != 0) && self.is_alive(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    fn step(&mut self) {
        let mut next = vec![false; self.alive.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                let count = self.neighbours(x, y);
                next[(y * self.width + x) as usize] = if self.is_alive(x, y) {
                    SURVIVE.contains(&count)
                } else {
                    BORN.contains(&count)
                };
            }
        }
        self.alive = next;
    }
}

/// Builds levels: carve, place exit, boss and loot, then decide the lock.
#[derive(Clone, Debug)]
pub struct LevelGenerator {
    map: MapConfig,
    spawns: SpawnConfig,
    monsters: Vec<MonsterKind>,
    treasure: Vec<Treasure>,
}

impl LevelGenerator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            map: config.map.clone(),
            spawns: config.spawns.clone(),
            monsters: config.rosters.monsters.clone(),
            treasure: config.rosters.treasure.clone(),
        }
    }

    /// Level at the configured size and density.
    pub fn generate_default<R: RandomSource>(
        &self,
        held: &BTreeSet<Enchantment>,
        rng: &mut R,
    ) -> Level {
        self.generate(self.map.width, self.map.height, self.map.density, held, rng)
    }

    /// Never fails: a map too cramped for an exit is carved again with a
    /// lower density until one fits.
    pub fn generate<R: RandomSource>(
        &self,
        width: i32,
        height: i32,
        density: f64,
        held: &BTreeSet<Enchantment>,
        rng: &mut R,
    ) -> Level {
        let min = self.map.min_dimension.max(4);
        let (width, height) = (width.max(min), height.max(min));
        self.generate_with(width, height, density, held, rng, |density, rng| {
            self.carve(width, height, density, rng)
        })
    }

    fn generate_with<R, C>(
        &self,
        width: i32,
        height: i32,
        density: f64,
        held: &BTreeSet<Enchantment>,
        rng: &mut R,
        mut carve: C,
    ) -> Level
    where
        R: RandomSource,
        C: FnMut(f64, &mut R) -> Level,
    {
        let mut density = density.clamp(0.0, 1.0);

        loop {
            let mut level = carve(density, rng);
            if let Some(idx) = self.pick_exit(level.free_cells.len(), rng) {
                let exit = level.free_cells.remove(idx);
                level.exit = exit;
                self.place_boss(&mut level, rng);
                self.place_loot(&mut level, held, rng);
                if level.boss.is_some() || level.loot.is_some() {
                    let locked = rng.uniform() < self.spawns.lock_chance;
                    level.set_locked(locked);
                }
                trace!(
                    "generated {}x{} level: exit {:?}, boss {:?}, loot {:?}, locked {}",
                    width,
                    height,
                    level.exit,
                    level.boss.map(|b| b.point),
                    level.loot.map(|l| l.point),
                    level.is_locked()
                );
                return level;
            }

            if density <= 0.0 {
                // An empty automaton leaves the whole interior open, so this
                // only triggers if the interior itself is smaller than two cells.
                debug!("density exhausted; falling back to an open level");
                let exit = Point::new(width - 2, height - 2);
                return Level::blank(width, height, exit);
            }
            let relaxed = (density - self.map.density_relax_step).max(0.0);
            debug!(
                "only {} free cells at density {density:.2}; relaxing to {relaxed:.2}",
                level.free_cells.len()
            );
            density = relaxed;
        }
    }

    fn carve<R: RandomSource>(&self, width: i32, height: i32, density: f64, rng: &mut R) -> Level {
        let mut automaton = Automaton::randomize(width - 2, height - 2, density, rng);
        let wall = WallKind::PALETTE[if rng.above(0.5) { 1 } else { 0 }];
        for _ in 0..self.map.generations.max(1) {
            automaton.step();
        }

        let mut level = Level::bordered(width, height, wall);
        for y in 0..automaton.height {
            for x in 0..automaton.width {
                let point = Point::new(x + 1, y + 1);
                if automaton.is_alive(x, y) {
                    level.set_cell(point, Cell::Wall(wall));
                } else {
                    level.set_cell(point, Cell::Hidden);
                    level.free_cells.push(point);
                }
            }
        }
        level
    }

    /// Index 0 is the player's start and is never handed out.
    fn pick_exit<R: RandomSource>(&self, len: usize, rng: &mut R) -> Option<usize> {
        if len < 2 {
            return None;
        }
        for _ in 0..self.map.max_exit_attempts {
            let idx = rng.index(len);
            if idx != 0 {
                return Some(idx);
            }
        }
        Some(len - 1)
    }

    fn take_free_cell<R: RandomSource>(level: &mut Level, rng: &mut R) -> Option<Point> {
        if level.free_cells.len() < 2 {
            return None;
        }
        let idx = 1 + rng.index(level.free_cells.len() - 1);
        Some(level.free_cells.remove(idx))
    }

    fn place_boss<R: RandomSource>(&self, level: &mut Level, rng: &mut R) {
        if rng.uniform() >= self.spawns.boss_chance {
            return;
        }
        let Some(point) = Self::take_free_cell(level, rng) else {
            return;
        };
        let kind = rng.pick(&self.monsters).copied().unwrap_or(MonsterKind::Bat);
        let (attack_low, attack_high) = self.spawns.boss_attack;
        let (health_low, health_high) = self.spawns.boss_health;
        let attack_bonus = rng.between(attack_low, attack_high);
        let health = rng.between(health_low, health_high).max(1);
        level.boss = Some(BossCell {
            point,
            monster: Monster {
                kind,
                health,
                attack_bonus,
            },
        });
    }

    fn place_loot<R: RandomSource>(
        &self,
        level: &mut Level,
        held: &BTreeSet<Enchantment>,
        rng: &mut R,
    ) {
        if rng.uniform() >= self.spawns.loot_chance {
            return;
        }
        let Some(treasure) = random_treasure(&self.treasure, held, rng) else {
            return;
        };
        let Some(point) = Self::take_free_cell(level, rng) else {
            return;
        };
        level.loot = Some(LootCell { point, treasure });
    }
}

/// A roster item the player does not already hold as an enchantment.
pub fn random_treasure<R: RandomSource>(
    roster: &[Treasure],
    held: &BTreeSet<Enchantment>,
    rng: &mut R,
) -> Option<Treasure> {
    let candidates: Vec<Treasure> = roster
        .iter()
        .copied()
        .filter(|item| item.enchantment().is_none_or(|e| !held.contains(&e)))
        .collect();
    rng.pick(&candidates).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRolls, from_seed};

    fn generator() -> LevelGenerator {
        LevelGenerator::new(&GameConfig::default())
    }

    #[test]
    fn automaton_with_no_life_stays_empty() {
        let mut rolls = ScriptedRolls::new([]);
        let mut automaton = Automaton::randomize(6, 6, 0.0, &mut rolls);
        automaton.step();
        assert!(automaton.alive.iter().all(|alive| !alive));
    }

    #[test]
    fn automaton_fills_solid_block() {
        let mut rolls = ScriptedRolls::new([]);
        let mut automaton = Automaton::randomize(4, 4, 1.0, &mut rolls);
        automaton.step();
        // corners have three neighbours and die, everything else survives
        assert!(!automaton.is_alive(0, 0));
        assert!(automaton.is_alive(1, 1));
        assert!(automaton.is_alive(1, 0));
    }

    #[test]
    fn exit_never_takes_the_spawn() {
        let generator = generator();
        let mut rolls = ScriptedRolls::new(std::iter::repeat_n(0.0, 64));
        assert_eq!(generator.pick_exit(5, &mut rolls), Some(4));
        assert_eq!(generator.pick_exit(1, &mut rolls), None);
    }

    #[test]
    fn solid_map_still_gets_an_exit() {
        let generator = generator();
        let mut rng = from_seed(Some(3));
        let level = generator.generate(8, 8, 1.0, &BTreeSet::new(), &mut rng);
        assert_eq!(level.cell(level.exit), Some(Cell::Hidden));
        assert!(!level.free_cells.is_empty());
    }

    fn cramped(width: i32, height: i32) -> Level {
        let mut level = Level::bordered(width, height, WallKind::Rock);
        level.set_cell(Point::new(2, 2), Cell::Hidden);
        level.free_cells.push(Point::new(2, 2));
        level
    }

    #[test]
    fn cramped_carve_relaxes_density_until_an_exit_fits() {
        let mut rolls = ScriptedRolls::new([]);
        let mut densities = Vec::new();
        let level = generator().generate_with(5, 5, 0.4, &BTreeSet::new(), &mut rolls, |density, _| {
            densities.push(density);
            if density < 0.25 {
                Level::blank(5, 5, Point::new(3, 3))
            } else {
                cramped(5, 5)
            }
        });
        assert_eq!(densities.len(), 3);
        assert!(densities.windows(2).all(|pair| pair[1] < pair[0]));
        assert_ne!(level.exit, level.spawn());
        assert_eq!(level.cell(level.exit), Some(Cell::Hidden));
    }

    #[test]
    fn exhausted_density_falls_back_to_an_open_level() {
        let mut rolls = ScriptedRolls::new([]);
        let mut carves = 0;
        let level = generator().generate_with(6, 5, 0.4, &BTreeSet::new(), &mut rolls, |_, _| {
            carves += 1;
            cramped(6, 5)
        });
        assert!(carves <= 7);
        assert_eq!(level, Level::blank(6, 5, Point::new(4, 3)));
        assert!(level.boss.is_none() && level.loot.is_none());
    }

    #[test]
    fn dimensions_below_minimum_are_raised() {
        let generator = generator();
        let mut rng = from_seed(Some(9));
        let level = generator.generate(2, 1, 0.4, &BTreeSet::new(), &mut rng);
        assert_eq!((level.width, level.height), (4, 4));
    }

    #[test]
    fn loot_skips_held_enchantments() {
        let held: BTreeSet<_> = Enchantment::ALL.into_iter().collect();
        let roster = [Treasure::Bow, Treasure::Ring, Treasure::Clover, Treasure::Gold];
        let mut rng = from_seed(Some(11));
        for _ in 0..32 {
            assert_eq!(random_treasure(&roster, &held, &mut rng), Some(Treasure::Gold));
        }
        let only_boons = [Treasure::Bow];
        assert_eq!(random_treasure(&only_boons, &held, &mut rng), None);
    }
}

//! Turn processing. One [`Intent`] in, a batch of [`GameEvent`]s out; nothing
//! here touches a display.

use bracket_geometry::prelude::Point;
use chrono::{DateTime, Utc};
use log::{debug, info};
use smallvec::SmallVec;

use crate::{
    combat::{CombatOutcome, CombatResolver, CombatResult},
    config::GameConfig,
    data::{KeyKind, Treasure},
    map::{Cell, Level, generator::{LevelGenerator, random_treasure}},
    player::{Player, PowerDown, PowerUp, StatusSnapshot},
    rng::RandomSource,
    visibility::{self, Discovery},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn delta(&self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::Right => Point::new(1, 0),
            Direction::Down => Point::new(0, 1),
            Direction::Left => Point::new(-1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Move(Direction),
    RegenerateLevel,
    DebugGrant,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocked,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Died { experience: u32 },
    Won { seconds: i64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChestContents {
    Loot(Treasure),
    Key,
    Treasure(Treasure),
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelEntered { depth: u32 },
    Moved { to: Point, health: i32 },
    Blocked { at: Point },
    Discovered(Discovery),
    Combat(CombatOutcome),
    ChestOpened { contents: ChestContents, fountain: bool },
    ItemTaken(PowerUp),
    PoweredDown(PowerDown),
    LockStatus(LockState),
    Stats(StatusSnapshot),
    GameOver(Ending),
}

pub struct Game<R: RandomSource> {
    config: GameConfig,
    generator: LevelGenerator,
    level: Level,
    player: Player,
    combat: Option<CombatResolver>,
    rng: R,
    depth: u32,
    started_at: DateTime<Utc>,
    ending: Option<Ending>,
    events: Vec<GameEvent>,
}

impl<R: RandomSource> Game<R> {
    /// Opening events wait in [`Game::drain_events`].
    pub fn new(config: GameConfig, mut rng: R) -> Self {
        let generator = LevelGenerator::new(&config);
        let player = Player::new(&config.progression);
        let level = generator.generate_default(&player.enchantments, &mut rng);
        let mut game = Self::from_parts(config, level, player, rng);
        game.begin_level();
        game.light_surroundings();
        game
    }

    pub fn from_parts(config: GameConfig, level: Level, player: Player, rng: R) -> Self {
        Self {
            generator: LevelGenerator::new(&config),
            config,
            level,
            player,
            combat: None,
            rng,
            depth: 0,
            started_at: Utc::now(),
            ending: None,
            events: Vec::new(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn combat(&self) -> Option<&CombatResolver> {
        self.combat.as_ref()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    pub fn is_over(&self) -> bool {
        self.ending.is_some()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Process one intent. After the game ends every intent is ignored.
    pub fn handle(&mut self, intent: Intent) -> Vec<GameEvent> {
        if self.is_over() {
            return Vec::new();
        }
        match intent {
            Intent::Move(direction) => self.step(direction),
            Intent::RegenerateLevel => self.next_level(),
            Intent::DebugGrant => {
                self.player.grant_all();
                let report = self
                    .player
                    .power_down(0, &self.config.progression, &mut self.rng);
                self.apply_power_down(report);
                self.push_stats();
            }
        }
        self.finish_turn();
        self.drain_events()
    }

    fn push_stats(&mut self) {
        self.events.push(GameEvent::Stats(self.player.snapshot()));
    }

    fn step(&mut self, direction: Direction) {
        let delta = direction.delta();
        let from = self.player.position;
        let target = Point::new(from.x + delta.x, from.y + delta.y);

        if self.level.is_passable(target) {
            self.move_to(target);
            return;
        }
        match self.level.cell_or_border(target) {
            Cell::Monster(_) if self.level.is_boss(target) => self.fight(target),
            Cell::Chest => self.open_chest(target),
            Cell::Item(item) => self.pick_up_item(target, item),
            Cell::Key(_) => self.pick_up_key(target),
            _ => self.events.push(GameEvent::Blocked { at: target }),
        }
    }

    fn move_to(&mut self, target: Point) {
        self.player.position = target;
        self.player.just_moved = true;
        self.player.after_move(&mut self.rng);
        self.events.push(GameEvent::Moved {
            to: target,
            health: self.player.health,
        });
    }

    fn fight(&mut self, target: Point) {
        if self.combat.is_none() {
            let Some(boss) = self.level.boss_at(target) else {
                return;
            };
            self.combat = Some(CombatResolver::new(boss.monster));
        }
        let Some(combat) = self.combat.as_mut() else {
            return;
        };
        let outcome = combat.exchange(
            &mut self.player,
            &self.config.combat,
            &self.config.rosters.status_effects,
            &mut self.rng,
        );
        if let Some(boss) = self.level.boss.as_mut() {
            boss.monster.health = combat.monster().health;
        }
        let result = outcome.result();
        self.events.push(GameEvent::Combat(outcome));

        match result {
            Some(CombatResult::MonsterDefeated) => {
                self.combat = None;
                self.level.defeat_boss();
                let from = self.player.position;
                self.move_to(target);
                let drop = if self.level.is_locked() {
                    Cell::Key(KeyKind::Skeleton)
                } else {
                    Cell::Chest
                };
                self.level.drop_item(from, drop);
                self.push_stats();
            }
            Some(CombatResult::PlayerDefeated) => self.combat = None,
            None => {}
        }
    }

    fn open_chest(&mut self, target: Point) {
        let from = self.player.position;
        self.level.set_cell(target, Cell::Revealed);
        self.move_to(target);

        let contents = if self.level.loot_at(target).is_some() {
            match self.level.take_loot() {
                Some(loot) => ChestContents::Loot(loot.treasure),
                None => ChestContents::Empty,
            }
        } else if self.level.is_locked() {
            ChestContents::Key
        } else {
            random_treasure(
                &self.config.rosters.treasure,
                &self.player.enchantments,
                &mut self.rng,
            )
            .map_or(ChestContents::Empty, ChestContents::Treasure)
        };

        let fountain = self.rng.uniform() < self.config.progression.fountain_chance;
        if fountain {
            let report = visibility::cast_anything(
                &mut self.level,
                visibility::square(from, 1),
                &self.config.rosters.treasure,
                true,
                Some(self.player.position),
                &mut self.rng,
            );
            debug!("fountain scattered {} items", report.dropped.len());
            self.record_discoveries(report.discovered);
        } else {
            let cell = match contents {
                ChestContents::Loot(item) | ChestContents::Treasure(item) => Some(Cell::Item(item)),
                ChestContents::Key => Some(Cell::Key(KeyKind::Skeleton)),
                ChestContents::Empty => None,
            };
            if let Some(cell) = cell {
                self.level.drop_item(from, cell);
            }
        }
        self.events
            .push(GameEvent::ChestOpened { contents, fountain });
    }

    fn pick_up_item(&mut self, target: Point, item: Treasure) {
        self.level.set_cell(target, Cell::Revealed);
        self.move_to(target);
        let power_up = self
            .player
            .power_up(item, &self.config.progression, &mut self.rng);
        if power_up.reveal_secrets {
            let found = visibility::reveal_all_secrets(&mut self.level);
            self.record_discoveries(found);
        }
        self.events.push(GameEvent::ItemTaken(power_up));
        self.push_stats();
    }

    fn pick_up_key(&mut self, target: Point) {
        self.level.set_cell(target, Cell::Revealed);
        self.move_to(target);
        self.level.collect_key();
        self.events.push(GameEvent::LockStatus(LockState::Unlocked));
    }

    fn next_level(&mut self) {
        self.level = self
            .generator
            .generate_default(&self.player.enchantments, &mut self.rng);
        self.begin_level();
    }

    fn begin_level(&mut self) {
        self.depth += 1;
        self.combat = None;
        let report = self.player.init(
            self.level.spawn(),
            &self.config.progression,
            &mut self.rng,
        );
        info!(
            "entered level {} ({}x{}, locked: {})",
            self.depth,
            self.level.width,
            self.level.height,
            self.level.is_locked()
        );
        self.events.push(GameEvent::LevelEntered { depth: self.depth });
        self.apply_power_down(report);
        self.push_stats();
    }

    fn apply_power_down(&mut self, report: PowerDown) {
        if report.reveal_secrets {
            let found = visibility::reveal_all_secrets(&mut self.level);
            self.record_discoveries(found);
        }
        self.events.push(GameEvent::PoweredDown(report));
    }

    fn record_discoveries(&mut self, found: SmallVec<[Discovery; 3]>) {
        for discovery in found {
            self.events.push(GameEvent::Discovered(discovery));
            if let Discovery::Exit { locked: true, .. } = discovery {
                self.events.push(GameEvent::LockStatus(LockState::Locked));
            }
        }
    }

    fn light_surroundings(&mut self) {
        let report = visibility::cast_light(&mut self.level, &self.player, self.player.position);
        self.record_discoveries(report.discovered);
    }

    fn finish_turn(&mut self) {
        if !self.player.alive {
            self.player.die();
            self.light_surroundings();
            let ending = Ending::Died {
                experience: self.player.experience,
            };
            info!("player died with {} experience", self.player.experience);
            self.ending = Some(ending);
            self.events.push(GameEvent::GameOver(ending));
            return;
        }

        self.light_surroundings();
        if self.level.is_exit(self.player.position) && !self.level.is_locked() {
            self.player.experience += 1;
            if self.player.experience >= self.config.progression.max_level {
                let seconds = (Utc::now() - self.started_at).num_seconds();
                let ending = Ending::Won { seconds };
                info!("run won in {seconds}s");
                self.ending = Some(ending);
                self.push_stats();
                self.events.push(GameEvent::GameOver(ending));
            } else {
                self.next_level();
                self.light_surroundings();
            }
        }
    }
}

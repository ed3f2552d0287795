//! Narrow interfaces to the outside world and the adapter that feeds them.
//! The core never formats text or picks colours anywhere else.

use bracket_geometry::prelude::Point;

use crate::{
    combat::{Retaliation, Strike},
    data::{Curse, DEAD_SYMBOL, Enchantment, HERO_SYMBOL},
    game::{Ending, GameEvent, Intent, LockState},
    map::{Cell, Level},
    player::{Player, StatusSnapshot},
};

/// Colour roles; front-ends map them to real colours.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tint {
    Shadow,
    Light,
    Border,
    Accent,
    Hero,
}

impl Tint {
    pub fn of(cell: Cell) -> Self {
        match cell {
            Cell::Hidden => Tint::Shadow,
            Cell::Revealed => Tint::Light,
            Cell::Border | Cell::Wall(_) => Tint::Border,
            _ => Tint::Accent,
        }
    }
}

pub trait Renderer {
    fn clear(&mut self);
    fn draw(&mut self, point: Point, glyph: Glyph, tint: Tint);
}

/// What to draw at a position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Cell(Cell),
    Hero,
    Dead,
}

impl Glyph {
    pub fn symbol(&self) -> &'static str {
        match self {
            Glyph::Cell(cell) => cell.symbol(),
            Glyph::Hero => HERO_SYMBOL,
            Glyph::Dead => DEAD_SYMBOL,
        }
    }

    pub fn ascii(&self) -> char {
        match self {
            Glyph::Cell(cell) => cell.ascii(),
            Glyph::Hero => '@',
            Glyph::Dead => '%',
        }
    }
}

pub trait InputSource {
    /// `None` once the source is exhausted.
    fn next_intent(&mut self) -> Option<Intent>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Coordinates,
    Hp,
    Ac,
    Attack,
    Gold,
    Experience,
    Enchantments,
    Curses,
    LockStatus,
    HeroCombat,
    MonsterCombat,
    GameOver,
}

impl Channel {
    pub const ALL: [Channel; 12] = [
        Channel::Coordinates,
        Channel::Hp,
        Channel::Ac,
        Channel::Attack,
        Channel::Gold,
        Channel::Experience,
        Channel::Enchantments,
        Channel::Curses,
        Channel::LockStatus,
        Channel::HeroCombat,
        Channel::MonsterCombat,
        Channel::GameOver,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Coordinates => "coordinates",
            Channel::Hp => "HP",
            Channel::Ac => "AC",
            Channel::Attack => "Attack",
            Channel::Gold => "Gold",
            Channel::Experience => "Experience",
            Channel::Enchantments => "enchantments",
            Channel::Curses => "curses",
            Channel::LockStatus => "lockStatus",
            Channel::HeroCombat => "heroCombat",
            Channel::MonsterCombat => "monsterCombat",
            Channel::GameOver => "gameOver",
        }
    }
}

pub trait MessageSink {
    fn message(&mut self, channel: Channel, text: &str);
}

/// Redraw the whole level and the hero on top.
pub fn draw_scene<T: Renderer + ?Sized>(renderer: &mut T, level: &Level, player: &Player) {
    renderer.clear();
    level.for_each_cell(|point, cell| renderer.draw(point, Glyph::Cell(cell), Tint::of(cell)));
    let hero = if player.alive { Glyph::Hero } else { Glyph::Dead };
    renderer.draw(player.position, hero, Tint::Hero);
}

/// Map outcome events onto the named channels.
pub fn publish<S: MessageSink + ?Sized>(sink: &mut S, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::LevelEntered { .. } => {
                sink.message(Channel::LockStatus, "");
                sink.message(Channel::HeroCombat, "");
                sink.message(Channel::MonsterCombat, "");
            }
            GameEvent::Moved { to, health } => {
                sink.message(Channel::Coordinates, &coordinates(*to));
                sink.message(Channel::Hp, &format!("HP: {health}"));
            }
            GameEvent::Stats(snapshot) => publish_stats(sink, snapshot),
            GameEvent::Combat(outcome) => {
                sink.message(
                    Channel::HeroCombat,
                    &format!("H: {}", hero_summary(outcome.hero)),
                );
                sink.message(Channel::MonsterCombat, &monster_summary(outcome.monster));
                sink.message(Channel::Hp, &format!("HP: {}", outcome.player_health));
                sink.message(Channel::Curses, &curse_list(&outcome.curses));
            }
            GameEvent::LockStatus(LockState::Locked) => sink.message(Channel::LockStatus, "locked"),
            GameEvent::LockStatus(LockState::Unlocked) => {
                sink.message(Channel::LockStatus, "unlocked")
            }
            GameEvent::GameOver(ending) => sink.message(Channel::GameOver, &ending_text(*ending)),
            GameEvent::Blocked { .. }
            | GameEvent::Discovered(_)
            | GameEvent::ChestOpened { .. }
            | GameEvent::ItemTaken(_)
            | GameEvent::PoweredDown(_) => {}
        }
    }
}

fn publish_stats<S: MessageSink + ?Sized>(sink: &mut S, snapshot: &StatusSnapshot) {
    sink.message(Channel::Coordinates, &coordinates(snapshot.position));
    sink.message(Channel::Ac, &format!("AC: {}", snapshot.armour_class));
    sink.message(Channel::Attack, &format!("Att: {}", snapshot.attack_bonus));
    sink.message(Channel::Hp, &format!("HP: {}", snapshot.health));
    sink.message(Channel::Gold, &format!("$$: {}", snapshot.gold));
    sink.message(Channel::Experience, &format!("Exp: {}", snapshot.experience));
    sink.message(Channel::Enchantments, &enchantment_list(&snapshot.enchantments));
    sink.message(Channel::Curses, &curse_list(&snapshot.curses));
}

fn coordinates(point: Point) -> String {
    format!("({}, {})", point.x, point.y)
}

fn hero_summary(strike: Strike) -> String {
    match strike {
        Strike::Hit { damage, fatal: true } => format!("Hit: {damage} (*)"),
        Strike::Hit { damage, .. } => format!("Hit: {damage}"),
        Strike::Miss => "Missed".to_string(),
    }
}

fn monster_summary(retaliation: Retaliation) -> String {
    match retaliation {
        Retaliation::Strike(Strike::Hit { damage, fatal: true }) => format!("M: Dam: {damage} (X)"),
        Retaliation::Strike(Strike::Hit { damage, .. }) => format!("M: Dam: {damage}"),
        Retaliation::Strike(Strike::Miss) => "M: Dodge".to_string(),
        Retaliation::None => String::new(),
    }
}

fn ending_text(ending: Ending) -> String {
    match ending {
        Ending::Died { experience } => format!("You died, level: {experience}"),
        Ending::Won { seconds } => format!("You win, time: {seconds}s"),
    }
}

fn enchantment_list(enchantments: &[Enchantment]) -> String {
    enchantments.iter().map(|e| e.symbol()).collect()
}

fn curse_list(curses: &[Curse]) -> String {
    curses.iter().map(|c| c.symbol()).collect()
}

//! Fog of war. Hidden cells become lit floor, hidden specials become their
//! manifest form, and fountains scatter items onto open floor.

use bracket_geometry::prelude::{Point, Rect};
use smallvec::SmallVec;

use crate::{
    data::{MonsterKind, Treasure},
    map::{Cell, Level},
    player::Player,
    rng::RandomSource,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Discovery {
    Boss { point: Point, kind: MonsterKind },
    Loot { point: Point },
    Exit { point: Point, locked: bool },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CastReport {
    /// Hidden floor turned into lit floor or a dropped item.
    pub lit: usize,
    pub discovered: SmallVec<[Discovery; 3]>,
    /// Items drawn but not dropped (a flash for the renderer).
    pub glimpsed: Vec<(Point, Treasure)>,
    pub dropped: Vec<(Point, Treasure)>,
}

/// Manifest the boss, loot or exit stored hidden at `point`; checked in that
/// order. Returns false if nothing hidden lives there, including when it was
/// already revealed.
pub fn reveal(level: &mut Level, point: Point) -> bool {
    reveal_special(level, point).is_some()
}

pub fn reveal_special(level: &mut Level, point: Point) -> Option<Discovery> {
    if level.cell(point)? != Cell::Hidden {
        return None;
    }
    if let Some(boss) = level.boss_at(point).copied() {
        level.set_cell(point, Cell::Monster(boss.monster.kind));
        return Some(Discovery::Boss {
            point,
            kind: boss.monster.kind,
        });
    }
    if level.loot_at(point).is_some() {
        level.set_cell(point, Cell::Chest);
        return Some(Discovery::Loot { point });
    }
    if point == level.exit {
        level.set_cell(point, Cell::Exit);
        return Some(Discovery::Exit {
            point,
            locked: level.is_locked(),
        });
    }
    None
}

/// Ring of secrets: every special on the level shows itself.
pub fn reveal_all_secrets(level: &mut Level) -> SmallVec<[Discovery; 3]> {
    let mut found = SmallVec::new();
    let points = [
        level.loot.map(|loot| loot.point),
        level.boss.map(|boss| boss.point),
        Some(level.exit),
    ];
    for point in points.into_iter().flatten() {
        if let Some(discovery) = reveal_special(level, point) {
            found.push(discovery);
        }
    }
    found
}

/// Chebyshev square around `origin`, inclusive of its edge.
pub fn square(origin: Point, radius: i32) -> Rect {
    let radius = radius.max(0);
    Rect::with_exact(
        origin.x - radius,
        origin.y - radius,
        origin.x + radius + 1,
        origin.y + radius + 1,
    )
}

/// Light the player's surroundings.
pub fn cast_light(level: &mut Level, player: &Player, origin: Point) -> CastReport {
    sweep(level, square(origin, player.light_radius()), false, None, || None)
}

/// Fill unrevealed floor in `range` with draws from `pool`. With `drop` the
/// items stay on the map and lit-but-empty floor is filled too; cells
/// already holding something are skipped, as is `skip`.
pub fn cast_anything<R: RandomSource>(
    level: &mut Level,
    range: Rect,
    pool: &[Treasure],
    drop: bool,
    skip: Option<Point>,
    rng: &mut R,
) -> CastReport {
    sweep(level, range, drop, skip, || rng.pick(pool).copied())
}

fn sweep<F>(level: &mut Level, range: Rect, drop: bool, skip: Option<Point>, mut draw: F) -> CastReport
where
    F: FnMut() -> Option<Treasure>,
{
    let mut report = CastReport::default();
    range.for_each(|point| {
        if skip == Some(point) {
            return;
        }
        let hidden = match level.cell(point) {
            Some(Cell::Hidden) => true,
            Some(Cell::Revealed) if drop => false,
            _ => return,
        };
        if hidden {
            if let Some(discovery) = reveal_special(level, point) {
                report.discovered.push(discovery);
                return;
            }
            report.lit += 1;
        }
        match draw() {
            Some(item) if drop => {
                level.drop_item(point, Cell::Item(item));
                report.dropped.push((point, item));
            }
            Some(item) => {
                level.set_cell(point, Cell::Revealed);
                report.glimpsed.push((point, item));
            }
            None => level.set_cell(point, Cell::Revealed),
        }
    });
    report
}

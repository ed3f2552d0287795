pub mod generator;

use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

use crate::data::{
    CHEST_SYMBOL, DOOR_SYMBOL, KeyKind, MonsterKind, Treasure, WallKind,
};

/// What a grid position holds. Hidden specials are stored as [`Cell::Hidden`]
/// and only take their manifest form once revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Border,
    Wall(WallKind),
    Hidden,
    Revealed,
    Exit,
    Chest,
    Item(Treasure),
    Key(KeyKind),
    Monster(MonsterKind),
}

impl Cell {
    pub fn symbol(&self) -> &'static str {
        match self {
            Cell::Border => "+",
            Cell::Wall(kind) => kind.symbol(),
            Cell::Hidden => ".",
            Cell::Revealed => " ",
            Cell::Exit => DOOR_SYMBOL,
            Cell::Chest => CHEST_SYMBOL,
            Cell::Item(item) => item.symbol(),
            Cell::Key(key) => key.symbol(),
            Cell::Monster(kind) => kind.symbol(),
        }
    }

    pub fn ascii(&self) -> char {
        match self {
            Cell::Border => '+',
            Cell::Wall(kind) => kind.ascii(),
            Cell::Hidden => '.',
            Cell::Revealed => ' ',
            Cell::Exit => '>',
            Cell::Chest => '■',
            Cell::Item(item) => item.ascii(),
            Cell::Key(_) => 'k',
            Cell::Monster(kind) => kind.ascii(),
        }
    }

    pub fn is_floor(&self) -> bool {
        matches!(self, Cell::Hidden | Cell::Revealed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub kind: MonsterKind,
    pub health: i32,
    pub attack_bonus: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BossCell {
    pub point: Point,
    pub monster: Monster,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LootCell {
    pub point: Point,
    pub treasure: Treasure,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
    pub wall: WallKind,
    /// Unassigned floor. The first entry is the player's start.
    pub free_cells: Vec<Point>,
    pub exit: Point,
    pub boss: Option<BossCell>,
    pub loot: Option<LootCell>,
    locked: bool,
}

impl Level {
    /// Bordered, all-hidden-floor level with only an exit.
    pub fn blank(width: i32, height: i32, exit: Point) -> Self {
        let mut level = Self::bordered(width, height, WallKind::Rock);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let point = Point::new(x, y);
                level.set_cell(point, Cell::Hidden);
                if point != exit {
                    level.free_cells.push(point);
                }
            }
        }
        level.exit = exit;
        level
    }

    pub(crate) fn bordered(width: i32, height: i32, wall: WallKind) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::Border; size],
            wall,
            free_cells: Vec::new(),
            exit: Point::new(0, 0),
            boss: None,
            loot: None,
            locked: false,
        }
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.idx(point).map(|idx| self.cells[idx])
    }

    pub fn cell_or_border(&self, point: Point) -> Cell {
        self.cell(point).unwrap_or(Cell::Border)
    }

    pub fn set_cell(&mut self, point: Point, cell: Cell) {
        if let Some(idx) = self.idx(point) {
            self.cells[idx] = cell;
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn spawn(&self) -> Point {
        self.free_cells.first().copied().unwrap_or(self.exit)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        if locked && self.boss.is_none() && self.loot.is_none() {
            debug_assert!(false, "locked level without boss or loot");
            log::warn!("refusing to lock a level with neither boss nor loot");
            return;
        }
        self.locked = locked;
    }

    pub fn collect_key(&mut self) {
        self.locked = false;
    }

    pub fn is_passable(&self, point: Point) -> bool {
        match self.cell_or_border(point) {
            Cell::Hidden | Cell::Revealed => true,
            Cell::Exit => !self.locked,
            _ => false,
        }
    }

    pub fn is_boss(&self, point: Point) -> bool {
        matches!(self.cell_or_border(point), Cell::Monster(_))
            && self.boss.is_some_and(|boss| boss.point == point)
    }

    pub fn is_exit(&self, point: Point) -> bool {
        point == self.exit && self.cell_or_border(point) == Cell::Exit
    }

    pub fn drop_item(&mut self, point: Point, cell: Cell) {
        self.set_cell(point, cell);
    }

    pub fn defeat_boss(&mut self) -> Option<BossCell> {
        let boss = self.boss.take()?;
        self.set_cell(boss.point, Cell::Revealed);
        Some(boss)
    }

    pub fn take_loot(&mut self) -> Option<LootCell> {
        self.loot.take()
    }

    pub fn boss_at(&self, point: Point) -> Option<&BossCell> {
        self.boss.as_ref().filter(|boss| boss.point == point)
    }

    pub fn loot_at(&self, point: Point) -> Option<&LootCell> {
        self.loot.as_ref().filter(|loot| loot.point == point)
    }

    pub fn for_each_cell<F>(&self, mut f: F)
    where
        F: FnMut(Point, Cell),
    {
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if let Some(cell) = self.cell(point) {
                    f(point, cell);
                }
            }
        }
    }

    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.cell_or_border(Point::new(x, y)).ascii());
            }
            out.push('\n');
        }
        out
    }
}

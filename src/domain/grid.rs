/// Maze cells, continuous positions, and the pellet layer.
/// Cell semantics are queried via methods, not stored as flags,
/// so grid rules are centralized here.

/// Side length of one maze cell in sub-cell units.
pub const CELL_SIZE: f32 = 64.0;
/// Offset from a cell's origin to its center.
pub const HALF_CELL: f32 = CELL_SIZE / 2.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Open,
    Wall,
}

impl Cell {
    /// Can an agent occupy this cell?
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Open)
    }
}

/// A continuous agent position in sub-cell units.
///
/// All motion keeps coordinates on whole sub-cell units (speeds and snap
/// targets are integral), so exact comparisons against cell centers are
/// well-defined.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub fn new(x: f32, y: f32) -> Self {
        Pos { x, y }
    }

    /// Center of the given cell.
    pub fn cell_center(cx: usize, cy: usize) -> Self {
        Pos {
            x: cx as f32 * CELL_SIZE + HALF_CELL,
            y: cy as f32 * CELL_SIZE + HALF_CELL,
        }
    }

    /// The cell this position occupies (floor division by cell size).
    /// Signed so that one-step neighbor math can leave the grid; `Maze`
    /// treats anything outside bounds as a wall.
    pub fn cell(&self) -> (i32, i32) {
        (
            (self.x / CELL_SIZE).floor() as i32,
            (self.y / CELL_SIZE).floor() as i32,
        )
    }

    /// Is this position exactly at its cell's center?
    pub fn is_centered(&self) -> bool {
        self.x.rem_euclid(CELL_SIZE) == HALF_CELL && self.y.rem_euclid(CELL_SIZE) == HALF_CELL
    }

    pub fn distance_to(&self, other: Pos) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Static wall layout of one level. Immutable for the level's lifetime.
#[derive(Clone, Debug)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Maze { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Is (cx, cy) an Open cell? Anything outside the grid counts as wall.
    pub fn is_open(&self, cx: i32, cy: i32) -> bool {
        if cx < 0 || cy < 0 || cx >= self.width as i32 || cy >= self.height as i32 {
            return false;
        }
        self.cells[cy as usize * self.width + cx as usize].is_open()
    }

    pub fn cell_at(&self, cx: usize, cy: usize) -> Cell {
        if cx < self.width && cy < self.height {
            self.cells[cy * self.width + cx]
        } else {
            Cell::Wall
        }
    }
}

/// A score-bearing pickup on an Open cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Item {
    Pellet,
    PowerPellet,
}

/// Mutable pellet layer, same dimensions as its maze.
///
/// Seeded from the maze (every Open cell starts with a Pellet, a designated
/// subset overridden to PowerPellet) and mutated only by removal. The
/// remaining count is cached so the win check is O(1).
#[derive(Clone, Debug)]
pub struct ItemGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<Item>>,
    remaining: usize,
}

impl ItemGrid {
    /// Build a fresh grid for a level (re)start.
    pub fn seed(maze: &Maze, power_pellets: &[(usize, usize)]) -> Self {
        let width = maze.width();
        let height = maze.height();
        let mut cells = vec![None; width * height];
        let mut remaining = 0;
        for cy in 0..height {
            for cx in 0..width {
                if maze.cell_at(cx, cy).is_open() {
                    cells[cy * width + cx] = Some(Item::Pellet);
                    remaining += 1;
                }
            }
        }
        for &(cx, cy) in power_pellets {
            // Validated Open at level load; overriding keeps the count.
            if cx < width && cy < height {
                cells[cy * width + cx] = Some(Item::PowerPellet);
            }
        }
        ItemGrid { width, height, cells, remaining }
    }

    pub fn item_at(&self, cx: usize, cy: usize) -> Option<Item> {
        if cx < self.width && cy < self.height {
            self.cells[cy * self.width + cx]
        } else {
            None
        }
    }

    /// Remove and return the item at (cx, cy), if any.
    pub fn take(&mut self, cx: usize, cy: usize) -> Option<Item> {
        if cx >= self.width || cy >= self.height {
            return None;
        }
        let taken = self.cells[cy * self.width + cx].take();
        if taken.is_some() {
            self.remaining -= 1;
        }
        taken
    }

    /// How many pellets (of either kind) are left on the board.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maze_from(rows: &[&str]) -> Maze {
        let height = rows.len();
        let width = rows[0].len();
        let cells = rows
            .iter()
            .flat_map(|row| {
                row.chars()
                    .map(|ch| if ch == '#' { Cell::Wall } else { Cell::Open })
            })
            .collect();
        Maze::new(width, height, cells)
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let m = maze_from(&["..", ".."]);
        assert!(m.is_open(0, 0));
        assert!(!m.is_open(-1, 0));
        assert!(!m.is_open(0, -1));
        assert!(!m.is_open(2, 0));
        assert!(!m.is_open(0, 2));
    }

    #[test]
    fn seed_places_pellets_on_open_cells_only() {
        let m = maze_from(&["#.#", "...", "#.#"]);
        let items = ItemGrid::seed(&m, &[]);
        assert_eq!(items.remaining(), 5);
        assert_eq!(items.item_at(0, 0), None);
        assert_eq!(items.item_at(1, 0), Some(Item::Pellet));
        assert_eq!(items.item_at(1, 1), Some(Item::Pellet));
    }

    #[test]
    fn power_pellet_override_keeps_count() {
        let m = maze_from(&["..", ".."]);
        let items = ItemGrid::seed(&m, &[(1, 1)]);
        assert_eq!(items.remaining(), 4);
        assert_eq!(items.item_at(1, 1), Some(Item::PowerPellet));
        assert_eq!(items.item_at(0, 0), Some(Item::Pellet));
    }

    #[test]
    fn take_removes_and_decrements_once() {
        let m = maze_from(&["..", ".."]);
        let mut items = ItemGrid::seed(&m, &[]);
        assert_eq!(items.take(0, 0), Some(Item::Pellet));
        assert_eq!(items.remaining(), 3);
        assert_eq!(items.take(0, 0), None);
        assert_eq!(items.remaining(), 3);
    }

    #[test]
    fn cell_derivation_and_centering() {
        let p = Pos::cell_center(12, 7);
        assert_eq!(p.cell(), (12, 7));
        assert!(p.is_centered());

        let nudged = Pos::new(p.x + 4.0, p.y);
        assert_eq!(nudged.cell(), (12, 7));
        assert!(!nudged.is_centered());

        let boundary = Pos::new(13.0 * CELL_SIZE, p.y);
        assert_eq!(boundary.cell(), (13, 7));
    }
}

/// Shared motion resolver — single source of truth for "can I move this way".
///
/// One algorithm serves both agent kinds:
///   1. The occupied cell is the floor of position / cell size.
///   2. The target cell is one step along the heading.
///   3. The move is legal only if BOTH cells are Open. An agent can sit in
///      an invalid cell only transiently and must not advance while there.
///   4. Legal: the cross-axis coordinate snaps to the current cell's center
///      (axis locking) and the in-axis coordinate advances by the full
///      delta.
///   5. Illegal: the cross-axis still snaps, and the in-axis coordinate is
///      clamped so the bounding radius stops at the boundary to the invalid
///      cell.
///
/// Callers differ only in what they do with `Blocked`: the player takes the
/// clamped position (touching the wall), a pursuer snaps back to its cell
/// center.

use super::agent::Direction;
use super::grid::{Maze, Pos, CELL_SIZE, HALF_CELL};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Move {
    Moved(Pos),
    /// The requested transition was illegal; `clamped` is the position
    /// stopped at the wall boundary, cross-axis centered.
    Blocked { clamped: Pos },
}

pub fn resolve(maze: &Maze, pos: Pos, dir: Direction, speed: f32, radius: f32) -> Move {
    let (dx, dy) = dir.delta();
    let (cx, cy) = pos.cell();
    let legal = maze.is_open(cx, cy) && maze.is_open(cx + dx, cy + dy);

    // Axis lock: the cross-axis coordinate is always the cell center.
    let mut next = if dx != 0 {
        Pos::new(
            pos.x + dx as f32 * speed,
            cy as f32 * CELL_SIZE + HALF_CELL,
        )
    } else {
        Pos::new(
            cx as f32 * CELL_SIZE + HALF_CELL,
            pos.y + dy as f32 * speed,
        )
    };

    if legal {
        return Move::Moved(next);
    }

    let cell_left = cx as f32 * CELL_SIZE;
    let cell_right = (cx + 1) as f32 * CELL_SIZE;
    let cell_top = cy as f32 * CELL_SIZE;
    let cell_bottom = (cy + 1) as f32 * CELL_SIZE;

    if dx > 0 {
        next.x = next.x.min(cell_right - radius - 1.0);
    } else if dx < 0 {
        next.x = next.x.max(cell_left + radius);
    } else if dy > 0 {
        next.y = next.y.min(cell_bottom - radius - 1.0);
    } else {
        next.y = next.y.max(cell_top + radius);
    }

    Move::Blocked { clamped: next }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Cell;

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

    const RADIUS: f32 = 28.0;

    #[test]
    fn legal_move_advances_full_delta() {
        let m = maze_from(&["####", "#..#", "####"]);
        let start = Pos::cell_center(1, 1);
        match resolve(&m, start, Direction::Right, 8.0, RADIUS) {
            Move::Moved(p) => {
                assert_eq!(p.x, start.x + 8.0);
                assert_eq!(p.y, start.y);
            }
            other => panic!("expected Moved, got {other:?}"),
        }
    }

    #[test]
    fn cross_axis_snaps_to_center_on_turn() {
        let m = maze_from(&["###", "#.#", "#.#", "###"]);
        // Off-center horizontally inside (1,1); moving down must re-center x.
        let start = Pos::new(Pos::cell_center(1, 1).x + 3.0, Pos::cell_center(1, 1).y);
        match resolve(&m, start, Direction::Down, 4.0, RADIUS) {
            Move::Moved(p) => {
                assert_eq!(p.x, Pos::cell_center(1, 1).x);
                assert_eq!(p.y, start.y + 4.0);
            }
            other => panic!("expected Moved, got {other:?}"),
        }
    }

    #[test]
    fn blocked_clamps_at_wall_boundary() {
        let m = maze_from(&["###", "#.#", "###"]);
        let start = Pos::cell_center(1, 1);

        match resolve(&m, start, Direction::Right, 8.0, RADIUS) {
            Move::Blocked { clamped } => {
                // Right edge of cell 1 is at 2 * CELL_SIZE; the radius stops
                // one unit short of it.
                assert_eq!(clamped.x, 2.0 * CELL_SIZE - RADIUS - 1.0);
                assert_eq!(clamped.y, start.y);
            }
            other => panic!("expected Blocked, got {other:?}"),
        }

        match resolve(&m, start, Direction::Left, 8.0, RADIUS) {
            Move::Blocked { clamped } => {
                assert_eq!(clamped.x, CELL_SIZE + RADIUS);
            }
            other => panic!("expected Blocked, got {other:?}"),
        }

        match resolve(&m, start, Direction::Down, 8.0, RADIUS) {
            Move::Blocked { clamped } => {
                assert_eq!(clamped.y, 2.0 * CELL_SIZE - RADIUS - 1.0);
            }
            other => panic!("expected Blocked, got {other:?}"),
        }

        match resolve(&m, start, Direction::Up, 8.0, RADIUS) {
            Move::Blocked { clamped } => {
                assert_eq!(clamped.y, CELL_SIZE + RADIUS);
            }
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn blocked_clamp_never_pulls_backwards() {
        let m = maze_from(&["###", "#.#", "###"]);
        // Already resting at the clamp boundary: repeated blocked moves must
        // not move the agent at all.
        let resting = Pos::new(2.0 * CELL_SIZE - RADIUS - 1.0, Pos::cell_center(1, 1).y);
        match resolve(&m, resting, Direction::Right, 8.0, RADIUS) {
            Move::Blocked { clamped } => assert_eq!(clamped, resting),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn grid_edge_counts_as_wall() {
        let m = maze_from(&["..", ".."]);
        let start = Pos::cell_center(0, 0);
        assert!(matches!(
            resolve(&m, start, Direction::Left, 8.0, RADIUS),
            Move::Blocked { .. }
        ));
        assert!(matches!(
            resolve(&m, start, Direction::Up, 8.0, RADIUS),
            Move::Blocked { .. }
        ));
        assert!(matches!(
            resolve(&m, start, Direction::Right, 8.0, RADIUS),
            Move::Moved(_)
        ));
    }

    #[test]
    fn mid_transit_keeps_moving_toward_open_target() {
        let m = maze_from(&["####", "#..#", "####"]);
        // Partway between the two open cells, still inside (1,1).
        let start = Pos::new(Pos::cell_center(1, 1).x + 24.0, Pos::cell_center(1, 1).y);
        match resolve(&m, start, Direction::Right, 8.0, RADIUS) {
            Move::Moved(p) => assert_eq!(p.x, start.x + 8.0),
            other => panic!("expected Moved, got {other:?}"),
        }
    }
}

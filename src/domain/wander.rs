/// Pursuer wandering policy.
///
/// Evaluated only when a pursuer sits exactly at a cell center (not
/// mid-transit). The cascade:
///   1. Candidates: every cardinal direction whose neighbor cell is Open.
///   2. Drop the reverse of the current heading (no doubling back) unless
///      that would empty the set (dead end: reversal is the only move).
///   3. If the set is still empty, fall back to the unfiltered candidates.
///      With step 2's dead-end exception this branch cannot fire in a
///      connected maze; it is kept as a guard rather than removed.
///   4. Keep the current heading with fixed probability when it is still a
///      candidate (favors straight runs), otherwise choose uniformly.
///
/// The random source is caller-supplied so trajectories are reproducible
/// under a fixed seed.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::agent::Direction;
use super::grid::Maze;

/// Probability of keeping the current heading when it remains valid.
pub const KEEP_HEADING_CHANCE: f64 = 0.25;

pub fn choose_heading<R: Rng + ?Sized>(
    maze: &Maze,
    cell: (i32, i32),
    current: Direction,
    rng: &mut R,
) -> Direction {
    let candidates: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| {
            let (dx, dy) = d.delta();
            maze.is_open(cell.0 + dx, cell.1 + dy)
        })
        .collect();

    let opposite = current.opposite();
    let mut filtered: Vec<Direction> =
        candidates.iter().copied().filter(|&d| d != opposite).collect();

    if filtered.is_empty() && candidates.contains(&opposite) {
        filtered = vec![opposite];
    }
    if filtered.is_empty() {
        filtered = candidates;
    }
    if filtered.is_empty() {
        // Isolated Open cell: a level-configuration error, rejected at
        // load time. Hold the heading rather than panic.
        return current;
    }

    if filtered.contains(&current) && rng.random_bool(KEEP_HEADING_CHANCE) {
        return current;
    }
    *filtered.choose(rng).unwrap_or(&current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Cell;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

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
    fn never_doubles_back_in_a_corridor() {
        let m = maze_from(&["#####", "#...#", "#####"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let d = choose_heading(&m, (2, 1), Direction::Right, &mut rng);
            assert_eq!(d, Direction::Right);
        }
    }

    #[test]
    fn dead_end_forces_reversal() {
        let m = maze_from(&["####", "#..#", "####"]);
        // Heading right into the dead end at (2,1): the only Open neighbor
        // is behind, so the opposite-direction filter must yield.
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let d = choose_heading(&m, (2, 1), Direction::Right, &mut rng);
            assert_eq!(d, Direction::Left);
        }
    }

    #[test]
    fn junction_explores_every_non_reverse_arm() {
        let m = maze_from(&["#.#", "...", "#.#"]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let d = choose_heading(&m, (1, 1), Direction::Right, &mut rng);
            assert_ne!(d, Direction::Left, "doubled back at a 4-way junction");
            seen[d as usize] = true;
        }
        assert!(seen[Direction::Right as usize]);
        assert!(seen[Direction::Down as usize]);
        assert!(seen[Direction::Up as usize]);
    }

    #[test]
    fn reproducible_under_a_fixed_seed() {
        let m = maze_from(&["#.#", "...", "#.#"]);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..64)
                .map(|_| choose_heading(&m, (1, 1), Direction::Up, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }
}

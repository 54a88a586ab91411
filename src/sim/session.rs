/// Session: the single owner of all live game state.
///
/// One session holds the level catalog, the active level index, the mutable
/// pellet layer, the player, and the pursuer set. Nothing else mutates
/// simulation state; the renderer only reads a completed tick. Agents never
/// hold references to each other; proximity is resolved by the step
/// pipeline reading positions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::agent::{Direction, Player, Pursuer};
use crate::domain::grid::{ItemGrid, Maze};
use crate::sim::level::LevelDef;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Playing,
    GameOver,
    Victory,
}

pub struct Session {
    pub(crate) levels: Vec<LevelDef>,
    level_index: usize,
    pub items: ItemGrid,
    pub player: Player,
    pub pursuers: Vec<Pursuer>,
    pub outcome: Outcome,
    pub tick: u64,
    /// Simulation randomness (pursuer decisions). Seeded at construction
    /// so trajectories are reproducible; cosmetic effects use their own
    /// generator in the UI layer.
    pub(crate) rng: StdRng,
}

impl Session {
    /// Build a session on a validated catalog. `start_level` comes from the
    /// external level-select step; `seed` from the startup clock (or a
    /// fixed value in tests).
    pub fn new(levels: Vec<LevelDef>, start_level: usize, seed: u64) -> Self {
        debug_assert!(start_level < levels.len());
        let start = &levels[start_level];
        let mut session = Session {
            items: ItemGrid::seed(&start.maze, &start.power_pellets),
            player: Player::new(start.home),
            pursuers: Vec::new(),
            outcome: Outcome::Playing,
            tick: 0,
            level_index: start_level,
            rng: StdRng::seed_from_u64(seed),
            levels,
        };
        session.spawn_pursuers();
        session
    }

    pub fn maze(&self) -> &Maze {
        &self.levels[self.level_index].maze
    }

    pub fn level(&self) -> &LevelDef {
        &self.levels[self.level_index]
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn on_last_level(&self) -> bool {
        self.level_index + 1 == self.levels.len()
    }

    /// Advance to the next level: fresh pellet layer, player at the new
    /// home, pursuers at their configured spawns. Score and lives carry.
    pub(crate) fn advance_level(&mut self) {
        let next = self.level_index + 1;
        self.load_level(next);
    }

    /// Full reset after GameOver/Victory: back to level 0 with fresh
    /// score and lives.
    pub(crate) fn restart(&mut self) {
        self.player = Player::new(self.levels[0].home);
        self.outcome = Outcome::Playing;
        self.tick = 0;
        self.load_level(0);
    }

    fn load_level(&mut self, index: usize) {
        self.level_index = index;
        let def = &self.levels[index];
        self.items = ItemGrid::seed(&def.maze, &def.power_pellets);
        self.player.enter_level(def.home);
        self.spawn_pursuers();
    }

    fn spawn_pursuers(&mut self) {
        let rng = &mut self.rng;
        self.pursuers = self.levels[self.level_index]
            .pursuer_spawns
            .iter()
            .map(|&(x, y, id)| {
                let heading = Direction::ALL[rng.random_range(0..4)];
                Pursuer::new(id, (x, y), heading)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Pos;
    use crate::sim::level;

    #[test]
    fn new_session_starts_playing_at_requested_level() {
        let session = Session::new(level::catalog().unwrap(), 1, 7);
        assert_eq!(session.outcome, Outcome::Playing);
        assert_eq!(session.level_index(), 1);
        assert_eq!(session.level().name, "CYBER CORE");
        assert_eq!(session.pursuers.len(), 4);
        assert_eq!(session.player.pos, Pos::cell_center(12, 7));
    }

    #[test]
    fn pursuers_spawn_at_configured_cells() {
        let session = Session::new(level::catalog().unwrap(), 0, 7);
        for (pursuer, &(x, y, id)) in
            session.pursuers.iter().zip(&session.level().pursuer_spawns)
        {
            assert_eq!(pursuer.id, id);
            assert_eq!(pursuer.pos, Pos::cell_center(x, y));
            assert!(!pursuer.fleeing);
        }
    }

    #[test]
    fn restart_resets_progress() {
        let mut session = Session::new(level::catalog().unwrap(), 2, 7);
        session.player.score = 990;
        session.player.lives = 1;
        session.outcome = Outcome::GameOver;

        session.restart();
        assert_eq!(session.outcome, Outcome::Playing);
        assert_eq!(session.level_index(), 0);
        assert_eq!(session.player.score, 0);
        assert_eq!(session.player.lives, 3);
        assert_eq!(session.items.remaining(), full_board(&session));
    }

    fn full_board(session: &Session) -> usize {
        let maze = session.maze();
        (0..maze.height())
            .map(|y| (0..maze.width()).filter(|&x| maze.is_open(x as i32, y as i32)).count())
            .sum()
    }
}

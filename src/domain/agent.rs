/// Agents: the player and the wandering pursuers.
/// Movement itself lives in `motion`; decision logic in `wander`.
/// This module holds state, tuning constants, and the small operations
/// the tick pipeline composes.

use super::grid::{Item, Pos};

/// Base player speed, sub-cell units per tick.
pub const PLAYER_SPEED: f32 = 8.0;
/// Player speed while power mode is active (3/2 × base).
pub const PLAYER_POWER_SPEED: f32 = 12.0;
/// Pursuer speed, sub-cell units per tick.
pub const PURSUER_SPEED: f32 = 4.0;
/// Collision radius shared by all agents.
pub const AGENT_RADIUS: f32 = 28.0;
/// Center distance below which the player and a pursuer collide.
pub const CAPTURE_DISTANCE: f32 = 32.0;
/// Power mode lifetime, measured against the per-tick clock sample.
pub const POWER_MODE_DURATION_MS: u64 = 7000;

pub const PELLET_SCORE: u32 = 10;
pub const POWER_PELLET_SCORE: u32 = 100;
pub const CAPTURE_SCORE: u32 = 200;
pub const STARTING_LIVES: u32 = 3;

/// Cardinal facing. Diagonals are not a thing in this maze.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

    /// Unit cell offset along this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }
}

/// Cosmetic identity key for a pursuer; the renderer maps it to a color.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PursuerId {
    Red,
    Green,
    Pink,
    Magenta,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Pos,
    /// None until the first input of the level; an idle player stays put.
    pub heading: Option<Direction>,
    pub speed: f32,
    pub radius: f32,
    pub score: u32,
    pub lives: u32,
    pub power_mode: bool,
    power_started_ms: u64,
    /// Home cell, used for soft respawn.
    home: (usize, usize),
}

impl Player {
    pub fn new(home: (usize, usize)) -> Self {
        Player {
            pos: Pos::cell_center(home.0, home.1),
            heading: None,
            speed: PLAYER_SPEED,
            radius: AGENT_RADIUS,
            score: 0,
            lives: STARTING_LIVES,
            power_mode: false,
            power_started_ms: 0,
            home,
        }
    }

    /// Record desired facing; applied by the next tick's motion pass.
    /// An illegal direction is not an error, it just fails to move.
    pub fn set_direction(&mut self, dir: Direction) {
        self.heading = Some(dir);
    }

    pub fn activate_power_mode(&mut self, now_ms: u64) {
        self.power_mode = true;
        self.power_started_ms = now_ms;
        self.speed = PLAYER_POWER_SPEED;
    }

    /// Expire power mode once its window has passed.
    /// Returns true on the tick it deactivates.
    pub fn tick_power_mode(&mut self, now_ms: u64) -> bool {
        if self.power_mode && now_ms.saturating_sub(self.power_started_ms) > POWER_MODE_DURATION_MS
        {
            self.power_mode = false;
            self.speed = PLAYER_SPEED;
            return true;
        }
        false
    }

    /// Award score for a collected item; a power pellet also starts power mode.
    pub fn collect(&mut self, item: Item, now_ms: u64) {
        match item {
            Item::Pellet => self.score += PELLET_SCORE,
            Item::PowerPellet => {
                self.score += POWER_PELLET_SCORE;
                self.activate_power_mode(now_ms);
            }
        }
    }

    /// Lose a life. Returns true when no lives remain (game over);
    /// otherwise performs a soft respawn: position, heading, and power
    /// state reset, score and lives kept.
    pub fn lose_life(&mut self) -> bool {
        self.lives -= 1;
        if self.lives == 0 {
            return true;
        }
        self.soft_respawn();
        false
    }

    /// Reset motion and power state without touching score or lives.
    pub fn soft_respawn(&mut self) {
        self.pos = Pos::cell_center(self.home.0, self.home.1);
        self.heading = None;
        self.power_mode = false;
        self.speed = PLAYER_SPEED;
    }

    /// Move to a new level's home cell, keeping score and lives.
    pub fn enter_level(&mut self, home: (usize, usize)) {
        self.home = home;
        self.soft_respawn();
    }
}

#[derive(Clone, Debug)]
pub struct Pursuer {
    pub id: PursuerId,
    pub pos: Pos,
    pub heading: Direction,
    /// Mirrors the player's power mode; set and cleared by the session.
    pub fleeing: bool,
    pub speed: f32,
    pub radius: f32,
    /// Configured spawn cell; capture teleports back here.
    pub spawn: (usize, usize),
}

impl Pursuer {
    pub fn new(id: PursuerId, spawn: (usize, usize), heading: Direction) -> Self {
        Pursuer {
            id,
            pos: Pos::cell_center(spawn.0, spawn.1),
            heading,
            fleeing: false,
            speed: PURSUER_SPEED,
            radius: AGENT_RADIUS,
            spawn,
        }
    }

    /// Snap back to the spawn cell after being caught. The heading is
    /// kept; the next centered decision point replaces it anyway.
    pub fn return_to_spawn(&mut self) {
        self.pos = Pos::cell_center(self.spawn.0, self.spawn.1);
        self.fleeing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_mode_expires_strictly_after_window() {
        let mut p = Player::new((1, 1));
        p.activate_power_mode(1000);
        assert!(p.power_mode);
        assert_eq!(p.speed, PLAYER_POWER_SPEED);

        assert!(!p.tick_power_mode(1000 + POWER_MODE_DURATION_MS));
        assert!(p.power_mode);

        assert!(p.tick_power_mode(1001 + POWER_MODE_DURATION_MS));
        assert!(!p.power_mode);
        assert_eq!(p.speed, PLAYER_SPEED);
    }

    #[test]
    fn collect_rewards_and_power_trigger() {
        let mut p = Player::new((1, 1));
        p.collect(Item::Pellet, 0);
        assert_eq!(p.score, 10);
        assert!(!p.power_mode);
        p.collect(Item::PowerPellet, 5);
        assert_eq!(p.score, 110);
        assert!(p.power_mode);
    }

    #[test]
    fn soft_respawn_keeps_score_and_lives() {
        let mut p = Player::new((2, 3));
        p.score = 340;
        p.set_direction(Direction::Left);
        p.pos = Pos::cell_center(5, 5);
        p.activate_power_mode(0);

        assert!(!p.lose_life());
        assert_eq!(p.lives, STARTING_LIVES - 1);
        assert_eq!(p.score, 340);
        assert_eq!(p.pos, Pos::cell_center(2, 3));
        assert_eq!(p.heading, None);
        assert!(!p.power_mode);
    }

    #[test]
    fn last_life_signals_game_over() {
        let mut p = Player::new((2, 3));
        p.lives = 1;
        assert!(p.lose_life());
        assert_eq!(p.lives, 0);
    }

    #[test]
    fn opposites() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }
}

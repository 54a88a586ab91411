/// The step function: advances the session by one tick.
///
/// Processing order:
///   1. Apply player intent (last-pressed-wins; None = keep heading)
///   2. Player motion
///   3. Item collection at the player's cell
///   4. Power-mode expiry against this tick's clock sample
///   5. Pursuer decisions + motion
///   6. Collision resolution (captures / life loss)
///   7. Win check (level advance / victory)
///
/// Outside the Playing outcome the pipeline is skipped entirely; only the
/// restart signal is honored. Every stage is total: an illegal move request
/// is simply a non-move, never an error. The clock is sampled once by the
/// caller and threaded through; no stage reads ambient time.

use crate::domain::agent::{Direction, CAPTURE_DISTANCE, CAPTURE_SCORE};
use crate::domain::grid::{Item, Pos};
use crate::domain::motion::{self, Move};
use crate::domain::wander;

use super::event::GameEvent;
use super::session::{Outcome, Session};

/// Collaborator inputs sampled once per tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    /// Desired player direction, if any key was pressed since last tick.
    pub intent: Option<Direction>,
    /// Restart control; meaningful only in GameOver/Victory.
    pub restart: bool,
}

pub fn step(session: &mut Session, input: TickInput, now_ms: u64) -> Vec<GameEvent> {
    if session.outcome != Outcome::Playing {
        if input.restart {
            session.restart();
            return vec![GameEvent::SessionRestarted];
        }
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    session.tick += 1;

    if let Some(dir) = input.intent {
        session.player.set_direction(dir);
    }

    resolve_player_motion(session);
    resolve_collection(session, now_ms, &mut events);
    resolve_power_expiry(session, now_ms, &mut events);
    resolve_pursuer_motion(session);
    if resolve_collisions(session, &mut events) {
        return events;
    }
    resolve_win(session, &mut events);

    events
}

// ── Player motion ──

fn resolve_player_motion(session: &mut Session) {
    let Some(dir) = session.player.heading else {
        return;
    };
    let index = session.level_index();
    let maze = &session.levels[index].maze;
    let player = &mut session.player;
    player.pos = match motion::resolve(maze, player.pos, dir, player.speed, player.radius) {
        Move::Moved(next) => next,
        // Blocked: the player rests against the wall.
        Move::Blocked { clamped } => clamped,
    };
}

// ── Collection ──

fn resolve_collection(session: &mut Session, now_ms: u64, events: &mut Vec<GameEvent>) {
    let (cx, cy) = session.player.pos.cell();
    let (cx, cy) = (cx as usize, cy as usize);
    let Some(item) = session.items.take(cx, cy) else {
        return;
    };
    session.player.collect(item, now_ms);
    match item {
        Item::Pellet => events.push(GameEvent::PelletEaten { x: cx, y: cy }),
        Item::PowerPellet => {
            events.push(GameEvent::PowerPelletEaten { x: cx, y: cy });
            for pursuer in &mut session.pursuers {
                pursuer.fleeing = true;
            }
        }
    }
}

// ── Power expiry ──

fn resolve_power_expiry(session: &mut Session, now_ms: u64, events: &mut Vec<GameEvent>) {
    if session.player.tick_power_mode(now_ms) {
        for pursuer in &mut session.pursuers {
            pursuer.fleeing = false;
        }
        events.push(GameEvent::PowerFaded);
    }
}

// ── Pursuer decisions + motion ──

fn resolve_pursuer_motion(session: &mut Session) {
    let index = session.level_index();
    let maze = &session.levels[index].maze;
    let rng = &mut session.rng;
    for pursuer in &mut session.pursuers {
        // Decisions happen only at cell centers, never mid-transit.
        if pursuer.pos.is_centered() {
            pursuer.heading =
                wander::choose_heading(maze, pursuer.pos.cell(), pursuer.heading, rng);
        }
        match motion::resolve(maze, pursuer.pos, pursuer.heading, pursuer.speed, pursuer.radius) {
            Move::Moved(next) => pursuer.pos = next,
            Move::Blocked { .. } => {
                // Defensive clamp: the decision policy only advances toward
                // Open cells, so re-center rather than hug the wall.
                let (cx, cy) = pursuer.pos.cell();
                pursuer.pos = Pos::cell_center(cx as usize, cy as usize);
            }
        }
    }
}

// ── Collision resolution ──

/// Returns true when the session ended this tick (lives exhausted).
fn resolve_collisions(session: &mut Session, events: &mut Vec<GameEvent>) -> bool {
    for i in 0..session.pursuers.len() {
        let dist = session.player.pos.distance_to(session.pursuers[i].pos);
        if dist >= CAPTURE_DISTANCE {
            continue;
        }
        let fleeing = session.pursuers[i].fleeing;
        if session.player.power_mode && fleeing {
            let pursuer = &mut session.pursuers[i];
            events.push(GameEvent::PursuerCaught {
                x: pursuer.pos.x,
                y: pursuer.pos.y,
                id: pursuer.id,
            });
            pursuer.return_to_spawn();
            session.player.score += CAPTURE_SCORE;
        } else if !session.player.power_mode && !fleeing {
            events.push(GameEvent::LifeLost);
            if session.player.lose_life() {
                session.outcome = Outcome::GameOver;
                events.push(GameEvent::GameOver);
                return true;
            }
            // Soft respawn cleared the player's power state; fleeing
            // mirrors it, so the whole set clears. One capture per tick.
            for pursuer in &mut session.pursuers {
                pursuer.fleeing = false;
            }
            break;
        }
        // Mixed power/fleeing states are transitional: no effect.
    }
    false
}

// ── Win check ──

fn resolve_win(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.items.remaining() > 0 {
        return;
    }
    if session.on_last_level() {
        session.outcome = Outcome::Victory;
        events.push(GameEvent::Victory);
    } else {
        session.advance_level();
        events.push(GameEvent::LevelCleared { level: session.level_index() });
    }
}

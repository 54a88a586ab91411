/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and one-shot effects;
/// they carry no authority over simulation state.

use crate::domain::agent::PursuerId;

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    PelletEaten { x: usize, y: usize },
    PowerPelletEaten { x: usize, y: usize },
    PowerFaded,
    /// A fleeing pursuer was captured; position is where the confetti goes.
    PursuerCaught { x: f32, y: f32, id: PursuerId },
    LifeLost,
    /// The board was cleared and play moved to the given level index.
    LevelCleared { level: usize },
    Victory,
    GameOver,
    SessionRestarted,
}

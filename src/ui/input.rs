/// Input state tracker.
///
/// Drains terminal events once per frame and tracks which keys are held,
/// giving the game loop two views of the keyboard:
///   - held keys, for continuous steering
///   - fresh presses in arrival order, for last-pressed-wins intent and
///     one-shot actions (restart, menu selection)
///
/// Terminals without key-release reporting get a timeout fallback: a key
/// counts as held until no Press/Repeat arrives for HOLD_TIMEOUT.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEventKind, KeyModifiers};

/// After this long without a Press/Repeat event, the key counts as released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of the last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went from released to held during the most recent
    /// drain_events() call, in arrival order.
    fresh_presses: Vec<KeyCode>,
    /// Ctrl+C seen during the most recent drain.
    ctrl_c: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };

            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            {
                self.ctrl_c = true;
            }

            match key.kind {
                KeyEventKind::Release => {
                    self.last_active.remove(&key.code);
                }
                _ => {
                    let was_held = self.held_now(key.code);
                    self.last_active.insert(key.code, Instant::now());
                    if !was_held {
                        self.fresh_presses.push(key.code);
                    }
                }
            }
        }

        // Expire keys that timed out (terminals without Release events).
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Is any of these keys currently held down?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.held_now(*c))
    }

    /// Was any of these keys freshly pressed this frame? (edge trigger)
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    /// Fresh presses this frame, in arrival order.
    pub fn fresh_presses(&self) -> &[KeyCode] {
        &self.fresh_presses
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }

    fn held_now(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

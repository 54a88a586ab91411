/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::error::Error;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::agent::Direction;
use sim::event::GameEvent;
use sim::level::LevelDef;
use sim::session::Session;
use sim::step::{self, TickInput};
use ui::effects::Effects;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    env_logger::init();

    let config = GameConfig::load();
    let levels = match sim::level::catalog() {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Invalid level configuration: {e}");
            std::process::exit(1);
        }
    };
    log::info!(
        "{} levels loaded, tick rate {} ms",
        levels.len(),
        config.tick_rate_ms
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = run(&mut renderer, sound.as_ref(), levels, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(Some(score)) => {
            println!();
            println!("Thanks for playing CyberMaze!");
            println!("Final Credits: {score}");
        }
        Ok(None) => {}
        Err(e) => eprintln!("Game error: {e}"),
    }
}

fn run(
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    levels: Vec<LevelDef>,
    config: &GameConfig,
) -> Result<Option<u32>, Box<dyn Error>> {
    let Some(start_level) = level_select(renderer, &levels)? else {
        return Ok(None);
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = Session::new(levels, start_level, seed);
    renderer.invalidate();

    let mut kb = InputState::new();
    let mut effects = Effects::new();
    let epoch = Instant::now();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    // Presses landing between ticks are held until the next tick samples
    // them; the latest direction press wins.
    let mut pending_intent: Option<Direction> = None;
    let mut pending_restart = false;

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }
        if let Some(dir) = detect_intent(&kb) {
            pending_intent = Some(dir);
        }
        if kb.any_pressed(KEYS_RESTART) {
            pending_restart = true;
        }

        if last_tick.elapsed() >= tick_rate {
            let now_ms = epoch.elapsed().as_millis() as u64;
            let input = TickInput {
                intent: pending_intent.take(),
                restart: std::mem::take(&mut pending_restart),
            };
            let events = step::step(&mut session, input, now_ms);
            process_events(sound, &mut effects, &events);
            effects.update();
            last_tick = Instant::now();
        }

        let now_ms = epoch.elapsed().as_millis() as u64;
        renderer.render(&session, &effects, now_ms)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    log::info!(
        "session ended after {} ticks at score {}",
        session.tick,
        session.player.score
    );
    Ok(Some(session.player.score))
}

// ── Level select (runs before the session exists) ──

/// Returns the chosen starting level, or None to quit.
fn level_select(
    renderer: &mut Renderer,
    levels: &[LevelDef],
) -> Result<Option<usize>, Box<dyn Error>> {
    let names: Vec<String> = levels.iter().map(|l| l.name.clone()).collect();
    let mut cursor = 0usize;
    let mut kb = InputState::new();

    loop {
        kb.drain_events();
        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            return Ok(None);
        }

        for &key in kb.fresh_presses() {
            match key {
                KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                    cursor = cursor.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                    cursor = (cursor + 1).min(names.len().saturating_sub(1));
                }
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(Some(cursor)),
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    if index < names.len() {
                        return Ok(Some(index));
                    }
                }
                _ => {}
            }
        }

        renderer.render_menu(&names, cursor)?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

// ── Event routing ──

fn process_events(sound: Option<&SoundEngine>, effects: &mut Effects, events: &[GameEvent]) {
    for event in events {
        if let GameEvent::PursuerCaught { x, y, .. } = event {
            effects.confetti_burst(*x, *y);
        }
    }

    let Some(sfx) = sound else { return };
    for event in events {
        match event {
            GameEvent::PelletEaten { .. } => sfx.play_pellet(),
            GameEvent::PowerPelletEaten { .. } => sfx.play_power(),
            GameEvent::PursuerCaught { .. } => sfx.play_capture(),
            GameEvent::LifeLost => sfx.play_life_lost(),
            GameEvent::LevelCleared { .. } => sfx.play_level_clear(),
            GameEvent::Victory => sfx.play_victory(),
            GameEvent::GameOver => sfx.play_game_over(),
            GameEvent::PowerFaded | GameEvent::SessionRestarted => {}
        }
    }
}

// ── Key constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R'), KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc];

/// Direction the player is asking for this frame: the most recent fresh
/// press wins; failing that, a still-held key keeps asserting its
/// direction (so movement resumes immediately after a respawn).
fn detect_intent(kb: &InputState) -> Option<Direction> {
    let mut intent = None;
    for &key in kb.fresh_presses() {
        let dir = if KEYS_LEFT.contains(&key) {
            Direction::Left
        } else if KEYS_RIGHT.contains(&key) {
            Direction::Right
        } else if KEYS_UP.contains(&key) {
            Direction::Up
        } else if KEYS_DOWN.contains(&key) {
            Direction::Down
        } else {
            continue;
        };
        intent = Some(dir);
    }
    if intent.is_some() {
        return intent;
    }

    if kb.any_held(KEYS_UP) {
        Some(Direction::Up)
    } else if kb.any_held(KEYS_DOWN) {
        Some(Direction::Down)
    } else if kb.any_held(KEYS_LEFT) {
        Some(Direction::Left)
    } else if kb.any_held(KEYS_RIGHT) {
        Some(Direction::Right)
    } else {
        None
    }
}

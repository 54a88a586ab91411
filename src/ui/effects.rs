/// One-shot cosmetic particle effects.
///
/// A capture spawns a confetti burst at the pursuer's last position.
/// Particles live in world coordinates; the renderer projects them onto
/// the terminal grid. This randomness is presentation-only and never
/// touches the simulation's seeded generator.

use crossterm::style::Color;
use rand::seq::IndexedRandom;
use rand::Rng;

const CONFETTI_COUNT: usize = 60;
const CONFETTI_COLORS: [Color; 5] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Magenta,
];
const CONFETTI_GLYPHS: [char; 3] = ['*', '+', '•'];

pub struct Particle {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    pub color: Color,
    pub glyph: char,
    lifetime: u32,
    age: u32,
}

impl Particle {
    /// Advance one frame. Returns false once expired.
    fn update(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= 0.95;
        self.vy += 0.25;
        self.age += 1;
        self.age < self.lifetime
    }
}

pub struct Effects {
    particles: Vec<Particle>,
}

impl Effects {
    pub fn new() -> Self {
        Effects { particles: Vec::new() }
    }

    pub fn confetti_burst(&mut self, x: f32, y: f32) {
        let mut rng = rand::rng();
        for _ in 0..CONFETTI_COUNT {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                color: *CONFETTI_COLORS.choose(&mut rng).unwrap_or(&Color::White),
                glyph: *CONFETTI_GLYPHS.choose(&mut rng).unwrap_or(&'*'),
                lifetime: rng.random_range(20..40),
                age: 0,
            });
        }
    }

    /// Advance all particles one frame and drop the expired ones.
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| p.update());
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

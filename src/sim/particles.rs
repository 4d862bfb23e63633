//! Cosmetic particles (screen space, no collision)

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, ParticleColor};
use crate::consts::*;
use crate::rand_range;

/// Emit `count` particles evenly spread around a point, respecting `cap`
pub fn emit_burst<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    cap: usize,
    pos: Vec2,
    color: ParticleColor,
    count: usize,
) {
    for i in 0..count {
        if particles.len() >= cap {
            return;
        }
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        let speed = rand_range(rng, 1.0, 3.0);
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
            radius: rand_range(rng, 2.0, 4.0),
            color,
        });
    }
}

/// Integrate, apply drag, and drop expired particles
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel *= PARTICLE_DRAG;
        p.life = p.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}

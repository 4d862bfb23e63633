//! Rifts, enemy spawning, enemy AI and enemy shots
//!
//! Enemies live in world space. Their shots live in screen space, like the
//! player's, and are converted back to world space only for obstacle tests.

use glam::Vec2;
use rand::Rng;

use super::geometry::line_of_sight;
use super::obstacles::ObstacleGrid;
use super::particles::emit_burst;
use super::state::{
    Attack, Charge, Enemy, EnemyKind, EnemyProjectile, GameState, ParticleColor, Rift, ShotKind,
};
use crate::consts::*;
use crate::{rand_range, screen_to_world, world_to_screen};

/// Stop-to-shoot enemies crawl at this fraction of their speed
const PLANTED_SPEED_FRACTION: f32 = 0.2;
/// ... once their cooldown is this close to expiring
const PLANT_WINDOW_TICKS: u32 = 20;
/// Outward pushes tried per heading when a wave enemy lands in an obstacle
const WAVE_NUDGE_STEPS: u32 = 6;

/// Pick an enemy kind, unlocking tougher kinds as the level rises
pub fn pick_enemy_kind<R: Rng + ?Sized>(rng: &mut R, level: u32) -> EnemyKind {
    let roll = rng.random_range(0..100u32);
    match level {
        0 | 1 => EnemyKind::Grunt,
        2 => {
            if roll < 25 {
                EnemyKind::Swarmer
            } else {
                EnemyKind::Grunt
            }
        }
        3 | 4 => match roll {
            0..25 => EnemyKind::Swarmer,
            25..50 => EnemyKind::Gunner,
            _ => EnemyKind::Grunt,
        },
        _ => match roll {
            0..20 => EnemyKind::Swarmer,
            20..45 => EnemyKind::Gunner,
            45..65 => EnemyKind::Warlock,
            _ => EnemyKind::Grunt,
        },
    }
}

/// Add an enemy of `kind` at a world position; returns its id
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
    let profile = kind.profile();
    let id = state.next_entity_id();
    let rng = &mut state.rng;
    let enemy = Enemy {
        id,
        pos,
        radius: ENEMY_RADIUS,
        kind,
        hp: profile.hp,
        max_hp: profile.hp,
        phase: rand_range(rng, 0.0, std::f32::consts::TAU),
        shoot_cooldown: rand_range(rng, 25.0, 70.0) as u32,
        charge: None,
    };
    state.enemies.push(enemy);

    let screen = world_to_screen(pos, state.player.camera);
    emit_burst(
        &mut state.particles,
        &mut state.rng,
        state.particle_cap,
        screen,
        ParticleColor::Spawn,
        10,
    );
    id
}

/// Spawn `count` enemies on a ring around the player
pub fn spawn_enemy_wave(state: &mut GameState, count: u32) {
    if !state.is_active() {
        return;
    }
    let center = state.player_world_pos();
    let mut skipped = 0;

    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
        let dir = Vec2::new(angle.cos(), angle.sin());
        let dist = rand_range(&mut state.rng, 350.0, 700.0);
        let jitter = Vec2::new(
            rand_range(&mut state.rng, -40.0, 40.0),
            rand_range(&mut state.rng, -40.0, 40.0),
        );
        let Some(pos) = clear_ring_spot(&state.obstacles, center, dir, dist, jitter) else {
            skipped += 1;
            continue;
        };
        let kind = pick_enemy_kind(&mut state.rng, state.level);
        spawn_enemy(state, kind, pos);
    }
    if skipped > 0 {
        log::debug!("{} wave enemies had no clear spot", skipped);
    }
    log::info!("Wave of {} enemies summoned", count - skipped);
}

/// Swing the ring direction a little either way, then push outward, until the
/// enemy circle is clear of every obstacle
fn clear_ring_spot(
    obstacles: &ObstacleGrid,
    center: Vec2,
    dir: Vec2,
    dist: f32,
    jitter: Vec2,
) -> Option<Vec2> {
    const SWINGS: [f32; 5] = [0.0, 0.2, -0.2, 0.4, -0.4];
    for swing in SWINGS {
        let heading = Vec2::from_angle(swing).rotate(dir);
        for step in 0..WAVE_NUDGE_STEPS {
            let pos = center + heading * (dist + step as f32 * ENEMY_RADIUS * 4.0) + jitter;
            if !obstacles.blocks_circle(pos, ENEMY_RADIUS) {
                return Some(pos);
            }
        }
    }
    None
}

/// Open a rift somewhere inside the visible window, clear of obstacles
pub fn spawn_rift(state: &mut GameState) -> bool {
    let cam = state.player.camera;
    let vp = state.viewport;

    for _ in 0..RIFT_PLACEMENT_ATTEMPTS {
        let pos = Vec2::new(
            rand_range(&mut state.rng, cam.x + 140.0, cam.x + vp.width - 140.0),
            rand_range(&mut state.rng, cam.y + 120.0, cam.y + vp.height - 240.0),
        );
        if state.obstacles.blocks_circle(pos, RIFT_RADIUS) {
            continue;
        }
        let pulse = rand_range(&mut state.rng, 0.0, std::f32::consts::TAU);
        state.rifts.push(Rift {
            pos,
            life: RIFT_LIFETIME,
            pulse,
            rotation: 0.0,
            spawn_left: state.rift_spawn_count,
        });
        return true;
    }

    log::debug!("No clear spot for a rift this cycle");
    false
}

/// Rift interval for the current level (ticks)
fn next_rift_interval<R: Rng + ?Sized>(rng: &mut R, level: u32) -> u32 {
    let reduction = (level.saturating_sub(1).min(10) * 10) as f32;
    let min = (RIFT_INTERVAL_MIN - reduction).max(RIFT_INTERVAL_FLOOR);
    let max = (RIFT_INTERVAL_MAX - reduction).max(RIFT_INTERVAL_FLOOR);
    rand_range(rng, min, max).floor() as u32
}

/// Tick the rift timer, age rifts, and let them release enemies
pub fn update_rifts(state: &mut GameState) {
    state.rift_timer = state.rift_timer.saturating_sub(1);
    if state.rift_timer == 0 {
        spawn_rift(state);
        state.rift_timer = next_rift_interval(&mut state.rng, state.level).max(1);
    }

    let mut spawns = Vec::new();
    for rift in &mut state.rifts {
        rift.life = rift.life.saturating_sub(1);
        rift.pulse += 0.08;
        rift.rotation += 0.02;

        if rift.life < RIFT_SPAWN_WINDOW
            && rift.spawn_left > 0
            && rift.life % RIFT_SPAWN_PERIOD == 0
        {
            rift.spawn_left -= 1;
            spawns.push(rift.pos);
        }
    }
    state.rifts.retain(|r| r.life > 0);

    for pos in spawns {
        let jitter = Vec2::new(
            rand_range(&mut state.rng, -10.0, 10.0),
            rand_range(&mut state.rng, -10.0, 10.0),
        );
        let kind = pick_enemy_kind(&mut state.rng, state.level);
        spawn_enemy(state, kind, pos + jitter);
    }
}

/// Try the direct step, then both perpendicular slides; `None` means stalled
pub fn avoid_step(obstacles: &ObstacleGrid, pos: Vec2, vel: Vec2, radius: f32) -> Option<Vec2> {
    let candidates = [vel, vel.perp(), -vel.perp()];
    candidates
        .into_iter()
        .map(|v| pos + v)
        .find(|p| !obstacles.blocks_circle(*p, radius))
}

/// Chase, avoid obstacles, and run each enemy's attack state machine
pub fn update_enemies(state: &mut GameState) {
    let player = state.player_world_pos();
    let camera = state.player.camera;
    let speed_mult = state.tuning.enemy_speed_mult;
    let linear_damage = state.tuning.linear_shot_damage;
    let charged_damage = state.tuning.charged_shot_damage;

    let GameState {
        enemies,
        obstacles,
        rng,
        enemy_projectiles,
        ..
    } = state;

    for e in enemies.iter_mut() {
        e.phase += ENEMY_PHASE_STEP;

        let to_player = player - e.pos;
        let len = to_player.length();
        let d = if len > 0.0 { len } else { 1.0 };
        let dir = to_player / d;

        let profile = e.kind.profile();
        let range = match profile.attack {
            Attack::None => 0.0,
            Attack::Linear { range } | Attack::Charged { range, .. } => range,
        };
        let in_range = d < range;

        let mut speed = profile.speed * speed_mult;
        if profile.stop_to_shoot
            && in_range
            && (e.shoot_cooldown <= PLANT_WINDOW_TICKS || e.charge.is_some())
        {
            speed *= PLANTED_SPEED_FRACTION;
        }

        let vel = dir * speed + Vec2::new(e.phase.sin() * ENEMY_WOBBLE, 0.0);
        if let Some(next) = avoid_step(obstacles, e.pos, vel, e.radius) {
            e.pos = next;
        }

        let origin = world_to_screen(e.pos, camera);
        match profile.attack {
            Attack::None => {}
            Attack::Linear { .. } => {
                e.shoot_cooldown = e.shoot_cooldown.saturating_sub(1);
                if e.shoot_cooldown == 0 {
                    if in_range && line_of_sight(e.pos, player, obstacles.rects()) {
                        enemy_projectiles.push(EnemyProjectile {
                            pos: origin,
                            vel: dir * LINEAR_SHOT_SPEED,
                            radius: LINEAR_SHOT_RADIUS,
                            damage: linear_damage,
                            kind: ShotKind::Linear,
                        });
                    }
                    e.shoot_cooldown = rand_range(rng, profile.rate.0, profile.rate.1) as u32;
                }
            }
            Attack::Charged { chance, .. } => {
                if let Some(charge) = e.charge.as_mut() {
                    charge.timer = charge.timer.saturating_sub(1);
                    charge.windup = (charge.windup + 1.0 / CHARGE_DURATION_TICKS as f32).min(1.0);
                    if charge.timer == 0 {
                        if line_of_sight(e.pos, player, obstacles.rects()) {
                            enemy_projectiles.push(EnemyProjectile {
                                pos: origin,
                                vel: dir * CHARGED_SHOT_SPEED,
                                radius: CHARGED_SHOT_RADIUS,
                                damage: charged_damage,
                                kind: ShotKind::Charged,
                            });
                        }
                        e.charge = None;
                        e.shoot_cooldown = rand_range(rng, profile.rate.0, profile.rate.1) as u32;
                    }
                } else {
                    e.shoot_cooldown = e.shoot_cooldown.saturating_sub(1);
                    if e.shoot_cooldown == 0 {
                        if in_range
                            && line_of_sight(e.pos, player, obstacles.rects())
                            && rng.random_bool(chance)
                        {
                            e.charge = Some(Charge {
                                timer: CHARGE_DURATION_TICKS,
                                windup: 0.0,
                            });
                        } else {
                            e.shoot_cooldown =
                                rand_range(rng, profile.rate.0, profile.rate.1) as u32;
                        }
                    }
                }
            }
        }
    }
}

/// Move enemy shots; drop those far off-screen or inside an obstacle
pub fn update_enemy_projectiles(state: &mut GameState) {
    let camera = state.player.camera;
    let viewport = state.viewport;
    let obstacles = &state.obstacles;

    for p in state.enemy_projectiles.iter_mut() {
        p.pos += p.vel;
    }
    state.enemy_projectiles.retain(|p| {
        !viewport.is_outside(p.pos, OFFSCREEN_MARGIN)
            && !obstacles.blocks_point(screen_to_world(p.pos, camera))
    });
}

//! PLACMAN native entry point
//!
//! The playable build runs in the browser (see `web.rs`). Natively this runs
//! a headless scripted session, handy for checking balance changes:
//!
//! ```text
//! RUST_LOG=info placman [seed] [seconds] [tuning.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use placman::Tuning;
    use placman::consts::SIM_DT;
    use placman::sim::{FrameDriver, GameState, ObstacleGrid, TickInput, Viewport};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1u64);
    let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(120u32);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    log::info!("PLACMAN (headless) seed={} duration={}s", seed, seconds);

    let mut state = GameState::with_config(seed, tuning, Viewport::default(), ObstacleGrid::new(seed));
    let mut driver = FrameDriver::new();

    // Circle-strafe while firing, dash every couple of seconds, summon a
    // wave every ten seconds and always take the first pact offered.
    let frames = seconds * 60;
    for frame in 0..frames {
        let phase = (frame / 90) % 4;
        let input = TickInput {
            up: phase == 0,
            right: phase == 1,
            down: phase == 2,
            left: phase == 3,
            dash: frame % 120 == 0,
            fire: true,
            spawn_wave: frame % 600 == 0,
            pact_choice: Some(0),
            ..Default::default()
        };
        driver.advance(&mut state, &input, SIM_DT);
        if !state.is_active() {
            break;
        }
    }

    log::info!(
        "Session over after {} ticks: level {}, score {}, kills {}, health {:.0}/{:.0}, {} obstacles resident",
        state.time_ticks,
        state.level,
        state.score,
        state.kills,
        state.player.health,
        state.player.max_health,
        state.obstacles.len()
    );
    println!(
        "seed={} ticks={} level={} score={} kills={} alive={}",
        state.seed,
        state.time_ticks,
        state.level,
        state.score,
        state.kills,
        state.is_active()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start`, this is just to satisfy the compiler
}

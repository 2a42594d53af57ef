//! Sector Engine headless driver
//!
//! Loads a level (or the built-in demo), lets the autopilot walk it at a fixed
//! 60 Hz step and logs what happened.
//!
//! Usage: `sector-engine [level.json|demo] [frames] [seed]`
//! Tuning overrides are read from the JSON file named by `SECTOR_TUNING`.

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use sector_engine::Level;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u64 = 600;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 0x5EC7_0A11;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Sector Engine (native) starting...");

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; embedders drive `sim::tick` themselves
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    use sector_engine::consts::SIM_DT;
    use sector_engine::sim::{Autopilot, SimState, tick};
    use sector_engine::tuning::Tuning;

    let level = match args.first().map(String::as_str) {
        None | Some("demo") => Level::demo()?,
        Some(path) => Level::load(path)?,
    };
    let frames = match args.get(1) {
        Some(s) => s.parse::<u64>().map_err(|e| format!("bad frame count {:?}: {}", s, e))?,
        None => DEFAULT_FRAMES,
    };
    let seed = match args.get(2) {
        Some(s) => s.parse::<u64>().map_err(|e| format!("bad seed {:?}: {}", s, e))?,
        None => DEFAULT_SEED,
    };
    let tuning = match std::env::var_os("SECTOR_TUNING") {
        Some(path) => Tuning::load(path),
        None => Tuning::default(),
    };

    let mut state = SimState::new(level, tuning);
    let mut pilot = Autopilot::new(seed);
    let mut transitions = 0u64;
    let mut landings = 0u64;
    let mut wall_contacts = 0u64;
    let mut visited = vec![false; state.world.len()];
    visited[state.player.sector()] = true;

    log::info!("Running {} frames with seed {:#x}", frames, seed);
    for _ in 0..frames {
        let report = tick(&mut state, &pilot.next_input(), SIM_DT);

        if let Some(t) = report.transition {
            log::info!(
                "t={:.2}s sector {} -> {} (edge {})",
                state.elapsed(SIM_DT),
                t.from,
                t.to,
                t.edge
            );
            transitions += 1;
            visited[t.to] = true;
        }
        landings += report.landed as u64;
        wall_contacts += u64::from(report.wall_contacts);
    }

    let p = state.player.position();
    log::info!(
        "Done after {:.1}s: sector {}, position ({:.2}, {:.2}, {:.2}), yaw {:.1}",
        state.elapsed(SIM_DT),
        state.player.sector(),
        p.x,
        p.y,
        p.z,
        state.player.yaw()
    );
    log::info!(
        "{} transitions, {} landings, {} wall contacts, {}/{} sectors visited",
        transitions,
        landings,
        wall_contacts,
        visited.iter().filter(|v| **v).count(),
        visited.len()
    );
    Ok(())
}

//! Per-frame simulation tick
//!
//! Advances the player by one frame: look, then intent, then collision.

use glam::Vec2;

use super::collision::{StepReport, resolve};
use super::movement::MoveIntent;
use super::state::SimState;
use crate::consts::MAX_FRAME_DT;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Movement keys held this frame
    pub intent: MoveIntent,
    /// Raw mouse delta (x turns, y pitches)
    pub look: Vec2,
}

/// Advance the simulation by `dt` seconds
///
/// `dt` is capped at [`MAX_FRAME_DT`] so a stalled frame cannot tunnel the
/// player through thin sectors.
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) -> StepReport {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    if dt > MAX_FRAME_DT {
        log::debug!("Frame delta {:.3}s capped to {}s", dt, MAX_FRAME_DT);
    }
    let dt = dt.min(MAX_FRAME_DT);

    state
        .player
        .mouse_move(input.look.x, input.look.y, &state.tuning);
    state.player.apply_intent(input.intent, &state.tuning);
    let report = resolve(&mut state.player, &state.world, &state.tuning, dt);

    if report.landed {
        log::debug!("Landed in sector {}", state.player.sector());
    }

    state.time_ticks += 1;
    report
}

//! Simulation state

use glam::Vec2;

use super::player::Player;
use super::world::World;
use crate::level::Level;
use crate::tuning::Tuning;

/// Complete simulation state: the static world plus everything that moves
#[derive(Debug, Clone)]
pub struct SimState {
    /// Immutable after construction
    pub world: World,
    pub player: Player,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimState {
    /// Start a run in `level`, player standing at its spawn point
    pub fn new(level: Level, tuning: Tuning) -> Self {
        Self::from_world(level.world, level.spawn, tuning)
    }

    pub fn from_world(world: World, spawn: Vec2, tuning: Tuning) -> Self {
        let player = Player::spawn(&world, spawn, &tuning);
        Self {
            world,
            player,
            tuning,
            time_ticks: 0,
        }
    }

    /// Seconds simulated so far at a fixed step
    pub fn elapsed(&self, dt: f32) -> f32 {
        self.time_ticks as f32 * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_spawns_on_floor() {
        let level = Level::demo().unwrap();
        let spawn = level.spawn;
        let state = SimState::new(level, Tuning::default());

        assert_eq!(state.time_ticks, 0);
        assert_eq!(crate::horizontal(state.player.position()), spawn);
        let floor = state.world.sector(state.player.sector()).unwrap().floor;
        assert_eq!(state.player.position().y, floor + state.tuning.eye_height);
    }
}

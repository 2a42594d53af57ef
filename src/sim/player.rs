//! Player kinematic state and view orientation
//!
//! Renderers read the player through the getters here; only the simulation
//! (movement and collision) mutates it.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::world::World;
use crate::consts::DEFAULT_YAW;
use crate::tuning::Tuning;
use crate::wrap_degrees;

/// World up axis
pub const WORLD_UP: Vec3 = Vec3::Y;

/// The player: a point body with an eye, moving through sectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Eye position (x, height, z)
    pub(crate) position: Vec3,
    /// Velocity in units per second
    pub(crate) velocity: Vec3,
    /// Index of the sector the player occupies
    pub(crate) sector: usize,
    /// Degrees, wrapped to [0, 360)
    pub(crate) yaw: f32,
    /// Degrees, clamped to ±pitch limit
    pub(crate) pitch: f32,
    /// Not resting on a floor
    pub(crate) falling: bool,
}

impl Player {
    /// Place a player at an explicit position inside `sector`
    pub fn new(sector: usize, position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            sector,
            yaw: wrap_degrees(DEFAULT_YAW),
            pitch: 0.0,
            falling: false,
        }
    }

    /// Spawn at a horizontal point, standing on the floor of its sector
    ///
    /// A point outside every sector spawns at the centre of sector 0.
    pub fn spawn(world: &World, point: Vec2, tuning: &Tuning) -> Self {
        let sector = world.spawn_sector(point);
        // spawn_sector only returns valid indices and a world is never empty
        let (point, floor) = match world.sector(sector) {
            Some(s) if s.contains(point) => (point, s.floor),
            Some(s) => (s.centroid(), s.floor),
            None => (point, 0.0),
        };
        let position = crate::to_world(point, floor + tuning.eye_height);
        log::info!("Player spawned in sector {} at {}", sector, position);
        Self::new(sector, position)
    }

    // === Read access ===

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub fn sector(&self) -> usize {
        self.sector
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.falling
    }

    // === Setup ===

    /// Override the velocity (spawn impulses, scripted scenes)
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_falling(mut self, falling: bool) -> Self {
        self.falling = falling;
        self
    }

    /// Set orientation in degrees (pitch is clamped to ±89°)
    pub fn with_orientation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = wrap_degrees(yaw);
        self.pitch = pitch.clamp(-crate::consts::PITCH_LIMIT, crate::consts::PITCH_LIMIT);
        self
    }

    // === Orientation ===

    /// Apply a raw mouse delta
    pub fn mouse_move(&mut self, dx: f32, dy: f32, tuning: &Tuning) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.yaw = wrap_degrees(self.yaw + dx * tuning.mouse_sensitivity);
        self.pitch = (self.pitch + dy * tuning.mouse_sensitivity)
            .clamp(-tuning.pitch_limit, tuning.pitch_limit);
    }

    /// Unit view direction from yaw/pitch
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Unit right vector (forward × up)
    pub fn right(&self) -> Vec3 {
        self.forward().cross(WORLD_UP).normalize()
    }

    /// Horizontal facing direction in sector coordinates
    pub fn forward_flat(&self) -> Vec2 {
        let yaw = self.yaw.to_radians();
        Vec2::new(yaw.cos(), yaw.sin())
    }

    /// Horizontal right direction in sector coordinates
    pub fn right_flat(&self) -> Vec2 {
        let f = self.forward_flat();
        // (f.x, 0, f.y) × (0, 1, 0) = (-f.y, 0, f.x)
        Vec2::new(-f.y, f.x)
    }

    /// Right-handed look-at view matrix from the eye
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), WORLD_UP)
    }
}

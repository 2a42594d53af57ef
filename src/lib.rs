//! Sector Engine - first-person movement through a portal-connected sector world
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, sectors, player, collision)
//! - `level`: Level interchange and load-time validation
//! - `tuning`: Data-driven movement feel

pub mod level;
pub mod sim;
pub mod tuning;

pub use level::{Level, LevelError};
pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Default tuning constants
pub mod consts {
    /// Camera height above the floor
    pub const EYE_HEIGHT: f32 = 6.0;
    /// Margin kept between the eye and the ceiling
    pub const HEAD_CLEARANCE: f32 = 0.5;
    /// Tallest ledge the player walks up without jumping
    pub const STEP_HEIGHT: f32 = 2.0;

    /// Downward acceleration while falling (units/s²)
    pub const GRAVITY: f32 = 25.0;
    /// Upward velocity given by a jump (units/s)
    pub const JUMP_SPEED: f32 = 12.0;

    /// Horizontal walking speed (units/s)
    pub const MOVE_SPEED: f32 = 50.0;
    /// Forward movement is faster than backward/strafe
    pub const FORWARD_MULTIPLIER: f32 = 1.5;
    /// Exponential smoothing factor applied per `apply_intent` call
    pub const BLEND_FACTOR: f32 = 0.2;

    /// Degrees of rotation per unit of mouse delta
    pub const MOUSE_SENSITIVITY: f32 = 0.1;
    /// Pitch is clamped to ±this many degrees
    pub const PITCH_LIMIT: f32 = 89.0;
    /// Initial yaw, looking down -z
    pub const DEFAULT_YAW: f32 = -90.0;

    /// Distance inside an edge at which it already counts as touched
    pub const WALL_TOLERANCE: f32 = 0.25;
    /// Half width of the horizontal bounding box probed against walls
    pub const PLAYER_HALF_EXTENT: f32 = 1.0;
    /// Solid walls closer than this push the player back
    pub const WALL_PUSH_DISTANCE: f32 = 0.5;
    /// Push-away velocity per unit of penetration (1/s)
    pub const WALL_PUSH_RATE: f32 = 8.0;

    /// Largest frame delta accepted by the driver (avoids tunnelling after stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Fixed step used by the headless driver
    pub const SIM_DT: f32 = 1.0 / 60.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Horizontal (x, z) part of a world position, in sector coordinates
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Lift a sector-plane point into world space at the given height
#[inline]
pub fn to_world(p: Vec2, height: f32) -> Vec3 {
    Vec3::new(p.x, height, p.y)
}

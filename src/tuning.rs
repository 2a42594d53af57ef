//! Movement tuning
//!
//! Every feel constant of the simulation lives here so levels, tests and the
//! driver can override them without touching code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What a blocking edge does to the velocity running into it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallResponse {
    /// Keep only the component along the edge
    #[default]
    Slide,
    /// Mirror the velocity about the edge normal
    Bounce,
}

/// Tunable movement and collision parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Body ===
    /// Camera height above the floor
    pub eye_height: f32,
    /// Margin kept between the eye and the ceiling
    pub head_clearance: f32,
    /// Tallest ledge that can be walked up
    pub step_height: f32,
    /// Half width of the horizontal probe box (0 = point probe)
    pub player_half_extent: f32,

    // === Vertical ===
    /// Downward acceleration while falling (units/s²)
    pub gravity: f32,
    /// Jump launch velocity (units/s)
    pub jump_speed: f32,

    // === Horizontal ===
    /// Walking speed (units/s)
    pub move_speed: f32,
    /// Forward speed relative to backward/strafe speed
    pub forward_multiplier: f32,
    /// Exponential smoothing toward the target velocity, per call
    pub blend_factor: f32,

    // === Look ===
    /// Degrees per unit of mouse delta
    pub mouse_sensitivity: f32,
    /// Pitch limit in degrees
    pub pitch_limit: f32,

    // === Walls ===
    /// Distance inside an edge at which it counts as touched
    pub wall_tolerance: f32,
    /// Solid walls closer than this push the player back
    pub wall_push_distance: f32,
    /// Push-away velocity per unit of penetration (1/s)
    pub wall_push_rate: f32,
    pub wall_response: WallResponse,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            eye_height: EYE_HEIGHT,
            head_clearance: HEAD_CLEARANCE,
            step_height: STEP_HEIGHT,
            player_half_extent: PLAYER_HALF_EXTENT,

            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,

            move_speed: MOVE_SPEED,
            forward_multiplier: FORWARD_MULTIPLIER,
            blend_factor: BLEND_FACTOR,

            mouse_sensitivity: MOUSE_SENSITIVITY,
            pitch_limit: PITCH_LIMIT,

            wall_tolerance: WALL_TOLERANCE,
            wall_push_distance: WALL_PUSH_DISTANCE,
            wall_push_rate: WALL_PUSH_RATE,
            wall_response: WallResponse::Slide,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values that would make the simulation misbehave
    pub fn sanitized(mut self) -> Self {
        let blend = if self.blend_factor.is_finite() {
            self.blend_factor.clamp(0.0, 1.0)
        } else {
            BLEND_FACTOR
        };
        if blend != self.blend_factor {
            log::warn!("blend_factor {} out of range, using {}", self.blend_factor, blend);
            self.blend_factor = blend;
        }

        let pitch = if self.pitch_limit.is_finite() {
            self.pitch_limit.clamp(0.0, PITCH_LIMIT)
        } else {
            PITCH_LIMIT
        };
        if pitch != self.pitch_limit {
            log::warn!("pitch_limit {} out of range, using {}", self.pitch_limit, pitch);
            self.pitch_limit = pitch;
        }

        for (name, value) in [
            ("eye_height", &mut self.eye_height),
            ("head_clearance", &mut self.head_clearance),
            ("step_height", &mut self.step_height),
            ("player_half_extent", &mut self.player_half_extent),
            ("gravity", &mut self.gravity),
            ("jump_speed", &mut self.jump_speed),
            ("move_speed", &mut self.move_speed),
            ("forward_multiplier", &mut self.forward_multiplier),
            ("wall_tolerance", &mut self.wall_tolerance),
            ("wall_push_distance", &mut self.wall_push_distance),
            ("wall_push_rate", &mut self.wall_push_rate),
        ] {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("{} = {} is invalid, using 0", name, value);
                *value = 0.0;
            }
        }

        self
    }
}

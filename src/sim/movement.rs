//! Movement intent and horizontal velocity blending
//!
//! Input is reduced to a [`MoveIntent`] once per frame, then blended into the
//! player's velocity with exponential smoothing. The smoothing is what gives
//! movement its slight inertia.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::tuning::Tuning;

/// Directions requested this frame; any combination may be held at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Jump if standing on a floor
    pub jump: bool,
}

impl MoveIntent {
    pub const NONE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
        jump: false,
    };

    pub const FORWARD: Self = Self {
        forward: true,
        ..Self::NONE
    };

    /// Merge two intents (either one asserting a direction asserts it)
    pub fn union(self, other: Self) -> Self {
        Self {
            forward: self.forward || other.forward,
            backward: self.backward || other.backward,
            left: self.left || other.left,
            right: self.right || other.right,
            jump: self.jump || other.jump,
        }
    }

    /// Unit-less axis values: (forward, right), each in {-1, 0, 1}
    ///
    /// Opposite directions cancel through the sum.
    pub fn axes(&self) -> Vec2 {
        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
        Vec2::new(
            axis(self.forward, self.backward),
            axis(self.right, self.left),
        )
    }

    pub fn is_idle(&self) -> bool {
        self.axes() == Vec2::ZERO && !self.jump
    }

    /// Target horizontal velocity (sector coordinates, units/s)
    ///
    /// Diagonals are normalized; the forward component alone gets
    /// `forward_multiplier`.
    pub fn target_velocity(&self, facing: Vec2, right: Vec2, tuning: &Tuning) -> Vec2 {
        let axes = self.axes().normalize_or_zero();
        let forward_speed = if axes.x > 0.0 {
            tuning.move_speed * tuning.forward_multiplier
        } else {
            tuning.move_speed
        };
        facing * axes.x * forward_speed + right * axes.y * tuning.move_speed
    }
}

impl Player {
    /// Blend this frame's intent into the velocity
    ///
    /// Horizontal: `v' = v * (1 - a) + target * a` with `a = blend_factor`,
    /// once per call. A jump only starts from the ground.
    pub fn apply_intent(&mut self, intent: MoveIntent, tuning: &Tuning) {
        let target = intent.target_velocity(self.forward_flat(), self.right_flat(), tuning);
        let alpha = tuning.blend_factor;

        // Sector (x, y) is world (x, z)
        self.velocity.x = self.velocity.x * (1.0 - alpha) + target.x * alpha;
        self.velocity.z = self.velocity.z * (1.0 - alpha) + target.y * alpha;

        if intent.jump && !self.falling {
            self.velocity.y = tuning.jump_speed;
            self.falling = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn facing_pos_x() -> Player {
        Player::new(0, Vec3::ZERO).with_orientation(0.0, 0.0)
    }

    #[test]
    fn test_opposites_cancel() {
        let intent = MoveIntent {
            forward: true,
            backward: true,
            left: true,
            right: true,
            jump: false,
        };
        assert_eq!(intent.axes(), Vec2::ZERO);
        assert!(intent.is_idle());
    }

    #[test]
    fn test_union() {
        let a = MoveIntent { left: true, ..MoveIntent::NONE };
        let combined = a.union(MoveIntent::FORWARD);
        assert!(combined.forward && combined.left);
        assert!(!combined.backward && !combined.right);
    }

    #[test]
    fn test_forward_faster_than_backward() {
        let tuning = Tuning::default();
        let f = MoveIntent::FORWARD.target_velocity(Vec2::X, Vec2::Y, &tuning);
        let b = MoveIntent { backward: true, ..MoveIntent::NONE }
            .target_velocity(Vec2::X, Vec2::Y, &tuning);
        let s = MoveIntent { right: true, ..MoveIntent::NONE }
            .target_velocity(Vec2::X, Vec2::Y, &tuning);
        assert!((f.length() - 75.0).abs() < 1e-4);
        assert!((b.length() - 50.0).abs() < 1e-4);
        assert!((s.length() - 50.0).abs() < 1e-4);
        assert!(b.x < 0.0);
        assert!(s.y > 0.0);
    }

    #[test]
    fn test_blend_factor() {
        let tuning = Tuning::default();
        let mut p = facing_pos_x();
        p.apply_intent(MoveIntent::FORWARD, &tuning);
        // 20% of 75 units/s on the first call
        assert!((p.velocity().x - 15.0).abs() < 1e-3);
        assert!(p.velocity().z.abs() < 1e-3);

        p.apply_intent(MoveIntent::FORWARD, &tuning);
        assert!((p.velocity().x - 27.0).abs() < 1e-3);
    }

    #[test]
    fn test_release_decays_velocity() {
        let tuning = Tuning::default();
        let mut p = facing_pos_x().with_velocity(Vec3::new(10.0, 0.0, 0.0));
        p.apply_intent(MoveIntent::NONE, &tuning);
        assert!((p.velocity().x - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_blend_leaves_vertical_alone() {
        let tuning = Tuning::default();
        let mut p = facing_pos_x()
            .with_velocity(Vec3::new(0.0, -3.0, 0.0))
            .with_falling(true);
        p.apply_intent(MoveIntent::FORWARD, &tuning);
        assert_eq!(p.velocity().y, -3.0);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let tuning = Tuning::default();
        let jump = MoveIntent { jump: true, ..MoveIntent::NONE };

        let mut grounded = facing_pos_x();
        grounded.apply_intent(jump, &tuning);
        assert_eq!(grounded.velocity().y, tuning.jump_speed);
        assert!(grounded.is_falling());

        let mut airborne = facing_pos_x()
            .with_velocity(Vec3::new(0.0, -1.0, 0.0))
            .with_falling(true);
        airborne.apply_intent(jump, &tuning);
        assert_eq!(airborne.velocity().y, -1.0);
    }
}

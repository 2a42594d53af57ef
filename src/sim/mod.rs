//! Deterministic simulation module
//!
//! All movement and collision logic lives here. This module must be pure and
//! deterministic:
//! - Caller-supplied frame delta only, no clocks
//! - Seeded RNG only (autopilot)
//! - Stable iteration order (edges in boundary order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod geometry;
pub mod movement;
pub mod player;
pub mod sector;
pub mod state;
pub mod tick;
pub mod world;

pub use autopilot::Autopilot;
pub use collision::{StepReport, Transition, resolve};
pub use geometry::{contains, cross, line_side, outward_normal, project, reflect, signed_distance};
pub use movement::MoveIntent;
pub use player::{Player, WORLD_UP};
pub use sector::{Edge, Sector, SurfaceMaterials};
pub use state::SimState;
pub use tick::{TickInput, tick};
pub use world::{World, WorldError, link_neighbors};

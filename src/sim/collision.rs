//! Collision resolution against the sector world
//!
//! The tricky part of the simulation: one step moves the player vertically
//! (gravity, floor and ceiling), then horizontally against the boundary of the
//! current sector, sliding along walls and crossing portals into neighbors.
//!
//! Walls are tested against the *prospective* position (lookahead), once per
//! frame. There is no iteration to convergence; a final clamp stops anything
//! the single slide pass missed in tight corners. The committed path is then
//! walked through as many portals as it crosses, so a fast step cannot skip
//! over a sector thinner than itself.

use glam::Vec2;

use super::geometry::{project, reflect};
use super::player::Player;
use super::sector::{Edge, Sector};
use super::world::World;
use crate::horizontal;
use crate::tuning::{Tuning, WallResponse};

/// Snap tolerance used when deciding whether a portal changed the floor under the eye
const FLOOR_MATCH_EPSILON: f32 = 1e-4;
/// Most portals followed in one step
const MAX_PORTAL_HOPS: u32 = 16;
/// Distance kept from a wall the path was stopped at
const STOP_MARGIN: f32 = 1e-3;
/// Overshoot past the sector boundary reported as a leak
const LEAK_TOLERANCE: f32 = 1e-2;
/// Span widening for exit tests, so a path through a vertex hits one of its edges
const SPAN_SLACK: f32 = 1e-3;

/// Sector change made during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    /// Sector the step ended in
    pub to: usize,
    /// Edge of `from` that was crossed
    pub edge: usize,
    /// Portals crossed on the way (more than one through thin sectors)
    pub hops: u32,
}

/// What happened during one resolver step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Came to rest on the floor this step
    pub landed: bool,
    /// Bumped the ceiling while rising
    pub hit_ceiling: bool,
    /// Number of blocking edges that changed the horizontal velocity
    pub wall_contacts: u32,
    /// A solid wall pushed the player back
    pub pushed: bool,
    /// Sector change, if the step ended in another sector
    pub transition: Option<Transition>,
}

/// Advance the player by `dt` seconds against `world`
///
/// Call after [`Player::apply_intent`] each frame.
pub fn resolve(player: &mut Player, world: &World, tuning: &Tuning, dt: f32) -> StepReport {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut report = StepReport::default();

    if !player.velocity.is_finite() {
        log::warn!("Discarding non-finite velocity {}", player.velocity);
        player.velocity = glam::Vec3::ZERO;
    }

    let index = checked_sector(player, world);
    let sector = &world.sectors()[index];

    resolve_vertical(player, sector, tuning, dt, &mut report);
    resolve_horizontal(player, world, index, tuning, dt, &mut report);

    report
}

/// The player's sector index, clamped if it is somehow out of range
fn checked_sector(player: &mut Player, world: &World) -> usize {
    if player.sector < world.len() {
        return player.sector;
    }
    if cfg!(debug_assertions) {
        panic!(
            "player sector {} out of range ({} sectors)",
            player.sector,
            world.len()
        );
    }
    log::error!(
        "Player sector {} out of range ({} sectors), clamping",
        player.sector,
        world.len()
    );
    player.sector = world.len() - 1;
    player.sector
}

/// Gravity, floor landing and ceiling bump
fn resolve_vertical(
    player: &mut Player,
    sector: &Sector,
    tuning: &Tuning,
    dt: f32,
    report: &mut StepReport,
) {
    if player.falling {
        player.velocity.y -= tuning.gravity * dt;
    }

    let floor_eye = sector.floor + tuning.eye_height;
    let ceil_eye = sector.ceil - tuning.head_clearance;
    let next_y = player.position.y + player.velocity.y * dt;

    if player.velocity.y < 0.0 && next_y < floor_eye {
        player.position.y = floor_eye;
        player.velocity.y = 0.0;
        report.landed = player.falling;
        player.falling = false;
    } else if player.velocity.y > 0.0 && next_y > ceil_eye {
        player.velocity.y = 0.0;
        player.falling = true;
        report.hit_ceiling = true;
    } else {
        player.position.y = next_y;
    }
}

/// Wall push, slide, portal crossing and horizontal commit
fn resolve_horizontal(
    player: &mut Player,
    world: &World,
    index: usize,
    tuning: &Tuning,
    dt: f32,
    report: &mut StepReport,
) {
    let sector = &world.sectors()[index];
    let eye_y = player.position.y;
    let pos = horizontal(player.position);
    let mut vel = horizontal(player.velocity);

    // Solid walls the body has crept into push it back out
    if tuning.wall_push_distance > 0.0 {
        for edge in sector.edges().filter(|e| !e.is_portal()) {
            let (Some(distance), Some(normal)) = (edge.distance(pos), edge.outward_normal()) else {
                continue;
            };
            let penetration = distance + tuning.wall_push_distance;
            if penetration > 0.0 && within_span(&edge, pos, 0.0) {
                vel -= normal * penetration * tuning.wall_push_rate;
                report.pushed = true;
            }
        }
    }

    // Slide along (or bounce off) every edge the body would run into
    let probes = probe_offsets(tuning.player_half_extent);
    for edge in sector.edges() {
        let Some(normal) = edge.outward_normal() else {
            continue;
        };
        if vel.dot(normal) <= 0.0 {
            continue;
        }
        let next = pos + vel * dt;
        let touching = probes
            .iter()
            .any(|&o| reaches(&edge, pos + o, next + o, tuning.wall_tolerance));
        if !touching || fits_opening(world, sector, &edge, eye_y, tuning) {
            continue;
        }

        vel = match tuning.wall_response {
            WallResponse::Slide => match project(vel, edge.direction()) {
                Some(slid) => slid,
                None => continue,
            },
            WallResponse::Bounce => reflect(vel, normal),
        };
        report.wall_contacts += 1;
    }

    // The single pass can leave the centre heading through a corner
    let next = pos + vel * dt;
    let still_blocked = sector.edges().any(|edge| {
        edge.outward_normal().is_some_and(|n| vel.dot(n) > 0.0)
            && reaches(&edge, pos, next, 0.0)
            && !fits_opening(world, sector, &edge, eye_y, tuning)
    });
    if still_blocked {
        vel = Vec2::ZERO;
        report.wall_contacts += 1;
    }

    // Follow the path through every portal it crosses this step
    let mut next = pos + vel * dt;
    let mut current = index;
    let mut first_edge = None;
    let mut hops = 0;
    let mut settled = false;
    while hops < MAX_PORTAL_HOPS {
        let here = &world.sectors()[current];
        let Some((edge, s)) = exit_edge(here, pos, next) else {
            settled = true;
            break;
        };
        if let Some(to) = edge
            .neighbor
            .filter(|_| fits_opening(world, here, &edge, eye_y, tuning))
        {
            log::debug!("Sector {} -> {} through edge {}", current, to, edge.index);
            first_edge.get_or_insert(edge.index);
            current = to;
            hops += 1;
            continue;
        }

        // A wall further along the portal chain: stop just short of it
        let path = next - pos;
        let back = STOP_MARGIN / path.length().max(STOP_MARGIN);
        next = pos + path * (s - back).max(0.0);
        vel = project(vel, edge.direction()).unwrap_or(Vec2::ZERO);
        report.wall_contacts += 1;
        settled = true;
        break;
    }
    if !settled {
        log::warn!(
            "Gave up after {} portals from sector {}, holding position",
            hops,
            index
        );
        next = pos;
        current = index;
        vel = Vec2::ZERO;
    }

    if let Some(edge) = first_edge.filter(|_| current != index) {
        enter_sector(player, world, index, current, edge, hops, tuning, report);
    }

    player.velocity.x = vel.x;
    player.velocity.z = vel.y;
    player.position.x = next.x;
    player.position.z = next.y;

    let out = world.sectors()[current].overshoot(next);
    if out > LEAK_TOLERANCE {
        log::warn!("Centre {} is {:.4} outside sector {}", next, out, current);
    }
}

#[allow(clippy::too_many_arguments)]
fn enter_sector(
    player: &mut Player,
    world: &World,
    from: usize,
    to: usize,
    edge: usize,
    hops: u32,
    tuning: &Tuning,
    report: &mut StepReport,
) {
    player.sector = to;
    report.transition = Some(Transition {
        from,
        to,
        edge,
        hops,
    });

    // Links are validated at load time
    if let Some(next) = world.sector(to) {
        let floor_eye = next.floor + tuning.eye_height;
        if (player.position.y - floor_eye).abs() > FLOOR_MATCH_EPSILON {
            // Ledge below or step above: the vertical pass settles it next step
            player.falling = true;
        }
    }
    log::debug!(
        "Entered sector {} from {} after {} portal(s) (falling: {})",
        to,
        from,
        hops,
        player.falling
    );
}

/// Edge through which the path `from -> to` leaves `sector`, with the path
/// fraction where it crosses
///
/// `None` when `to` is inside every edge line. Of several candidates the
/// earliest crossing wins.
fn exit_edge(sector: &Sector, from: Vec2, to: Vec2) -> Option<(Edge, f32)> {
    sector
        .edges()
        .filter_map(|edge| {
            let (d_from, d_to) = (edge.distance(from)?, edge.distance(to)?);
            if d_to <= 0.0 {
                return None;
            }
            let s = if d_to > d_from {
                (-d_from / (d_to - d_from)).clamp(0.0, 1.0)
            } else {
                0.0
            };
            within_span(&edge, from + (to - from) * s, SPAN_SLACK).then_some((edge, s))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Whether the body at eye height `eye_y` fits through `edge` into its neighbor
///
/// Solid walls never fit.
fn fits_opening(world: &World, sector: &Sector, edge: &Edge, eye_y: f32, tuning: &Tuning) -> bool {
    let Some(neighbor) = edge.neighbor.and_then(|n| world.sector(n)) else {
        return false;
    };
    let (low, high) = sector.opening_with(neighbor);
    let knees = eye_y - tuning.eye_height + tuning.step_height;
    let head = eye_y + tuning.head_clearance;
    low <= knees && high >= head
}

/// Horizontal probe points relative to the centre
fn probe_offsets(half_extent: f32) -> Vec<Vec2> {
    if half_extent <= 0.0 {
        return vec![Vec2::ZERO];
    }
    let h = half_extent;
    vec![
        Vec2::ZERO,
        Vec2::new(-h, -h),
        Vec2::new(h, -h),
        Vec2::new(h, h),
        Vec2::new(-h, h),
    ]
}

/// Whether `p` projects onto the edge segment (widened by `margin` units)
fn within_span(edge: &Edge, p: Vec2, margin: f32) -> bool {
    let dir = edge.direction();
    let len_sq = dir.length_squared();
    if len_sq <= 0.0 {
        return false;
    }
    let t = (p - edge.start).dot(dir) / len_sq;
    let slack = margin / len_sq.sqrt();
    t >= -slack && t <= 1.0 + slack
}

/// Whether moving `from -> to` ends within `tolerance` of the edge segment
///
/// The edge counts only where the path meets its line inside the segment,
/// so collinear neighbours of a portal do not block it.
fn reaches(edge: &Edge, from: Vec2, to: Vec2, tolerance: f32) -> bool {
    let (Some(d_from), Some(d_to)) = (edge.distance(from), edge.distance(to)) else {
        return false;
    };
    if d_to <= -tolerance {
        return false;
    }
    let s = if d_to > d_from {
        ((-tolerance - d_from) / (d_to - d_from)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    within_span(edge, from + (to - from) * s, tolerance)
}

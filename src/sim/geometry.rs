//! 2D geometry primitives for the sector plane
//!
//! Everything here is pure. Sector polygons are wound so that a positive
//! [`line_side`] means "outside"; see [`crate::sim::World`] for the
//! normalization that guarantees it.

use glam::Vec2;

/// Edges shorter than this are treated as degenerate
pub const DEGENERATE_EDGE_EPSILON: f32 = 1e-6;

/// 2D cross product (z component of the 3D cross)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Signed side of `p` relative to the directed edge `a -> b`
///
/// Returns `cross(b - a, p - a)`. Its magnitude is the distance from the
/// edge's line scaled by the edge length. Positive is outside the sector.
#[inline]
pub fn line_side(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    cross(b - a, p - a)
}

/// Signed distance from the line through `a -> b`, positive outside
///
/// Returns `None` for a zero-length edge.
#[inline]
pub fn signed_distance(a: Vec2, b: Vec2, p: Vec2) -> Option<f32> {
    let len = (b - a).length();
    if len < DEGENERATE_EDGE_EPSILON {
        return None;
    }
    Some(line_side(a, b, p) / len)
}

/// Unit normal of `a -> b` pointing to the outside (positive) side
#[inline]
pub fn outward_normal(a: Vec2, b: Vec2) -> Option<Vec2> {
    let edge = b - a;
    if edge.length_squared() < DEGENERATE_EDGE_EPSILON * DEGENERATE_EDGE_EPSILON {
        return None;
    }
    // Rotating the edge by +90° gives the side where line_side > 0
    Some(Vec2::new(-edge.y, edge.x).normalize())
}

/// Twice the signed area of a polygon (shoelace)
///
/// Negative for the winding where [`line_side`] is positive outside.
pub fn signed_area2(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    (0..n)
        .map(|i| cross(polygon[i], polygon[(i + 1) % n]))
        .sum()
}

/// Whether `p` lies on the segment `a`-`b` (within `epsilon`)
pub fn on_segment(a: Vec2, b: Vec2, p: Vec2, epsilon: f32) -> bool {
    let edge = b - a;
    let len_sq = edge.length_squared();
    if len_sq < DEGENERATE_EDGE_EPSILON * DEGENERATE_EDGE_EPSILON {
        return (p - a).length() <= epsilon;
    }
    let t = ((p - a).dot(edge) / len_sq).clamp(0.0, 1.0);
    (a + edge * t - p).length() <= epsilon
}

/// Boundary tolerance used by [`contains`]
const BOUNDARY_EPSILON: f32 = 1e-4;

/// Point-in-polygon test (even-odd ray casting)
///
/// Boundary-exclusive: a point on (or within 1e-4 of) any edge is not
/// contained. Works for any simple polygon regardless of winding.
pub fn contains(polygon: &[Vec2], p: Vec2) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = polygon[i];
        let vj = polygon[j];

        if on_segment(vi, vj, p, BOUNDARY_EPSILON) {
            return false;
        }

        // Straddle check guarantees vj.y != vi.y, so the division is safe
        if (vi.y > p.y) != (vj.y > p.y) && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Project `v` onto the direction of `onto` (vector projection)
///
/// Returns `None` when `onto` is (nearly) zero. Used for frictionless sliding
/// along a wall edge.
#[inline]
pub fn project(v: Vec2, onto: Vec2) -> Option<Vec2> {
    let len_sq = onto.length_squared();
    if len_sq < DEGENERATE_EDGE_EPSILON * DEGENERATE_EDGE_EPSILON {
        return None;
    }
    Some(onto * (v.dot(onto) / len_sq))
}

/// Reflect `v` off a surface with unit `normal`: v' = v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

//! Sector data: a convex-ish polygon extruded between a floor and a ceiling
//!
//! Edge `i` runs from `vertices[i]` to `vertices[(i + 1) % n]` and is a portal
//! into `neighbors[i]` when that is `Some`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{self, line_side, outward_normal, signed_distance};

/// Texture indices for the three surface kinds of a sector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceMaterials {
    pub wall: u32,
    pub ceil: u32,
    pub floor: u32,
}

/// A sector of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Floor height
    pub floor: f32,
    /// Ceiling height
    pub ceil: f32,
    /// Texture indices for rendering
    #[serde(default)]
    pub materials: SurfaceMaterials,
    /// Boundary polygon in the horizontal plane
    pub(crate) vertices: Vec<Vec2>,
    /// Portal links, parallel to `vertices`
    pub(crate) neighbors: Vec<Option<usize>>,
}

/// One boundary edge of a sector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Index of the edge within its sector
    pub index: usize,
    pub start: Vec2,
    pub end: Vec2,
    /// Sector on the other side, `None` for a solid wall
    pub neighbor: Option<usize>,
}

impl Edge {
    /// Edge vector `end - start`
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    pub fn is_portal(&self) -> bool {
        self.neighbor.is_some()
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction().length() < geometry::DEGENERATE_EDGE_EPSILON
    }

    /// Raw line-side value of `p`; positive is outside the sector
    #[inline]
    pub fn side(&self, p: Vec2) -> f32 {
        line_side(self.start, self.end, p)
    }

    /// Signed distance of `p` from the edge line; `None` if degenerate
    #[inline]
    pub fn distance(&self, p: Vec2) -> Option<f32> {
        signed_distance(self.start, self.end, p)
    }

    /// Unit normal pointing out of the sector; `None` if degenerate
    #[inline]
    pub fn outward_normal(&self) -> Option<Vec2> {
        outward_normal(self.start, self.end)
    }
}

impl Sector {
    /// Build a sector; validation happens when it joins a [`super::World`]
    pub fn new(floor: f32, ceil: f32, vertices: Vec<Vec2>, neighbors: Vec<Option<usize>>) -> Self {
        Self {
            floor,
            ceil,
            materials: SurfaceMaterials::default(),
            vertices,
            neighbors,
        }
    }

    /// A sector whose edges are all solid walls
    pub fn closed(floor: f32, ceil: f32, vertices: Vec<Vec2>) -> Self {
        let neighbors = vec![None; vertices.len()];
        Self::new(floor, ceil, vertices, neighbors)
    }

    pub fn with_materials(mut self, materials: SurfaceMaterials) -> Self {
        self.materials = materials;
        self
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn neighbors(&self) -> &[Option<usize>] {
        &self.neighbors
    }

    /// Vertex indices joined by edge `i`: `(i, (i + 1) % n)`
    #[inline]
    pub fn edge_vertices(&self, i: usize) -> (usize, usize) {
        (i, (i + 1) % self.vertices.len())
    }

    /// Edge `i`, or `None` if out of range
    pub fn edge(&self, i: usize) -> Option<Edge> {
        if i >= self.vertices.len() {
            return None;
        }
        let (a, b) = self.edge_vertices(i);
        Some(Edge {
            index: i,
            start: self.vertices[a],
            end: self.vertices[b],
            neighbor: self.neighbors.get(i).copied().flatten(),
        })
    }

    /// All edges in boundary order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.vertices.len()).filter_map(move |i| self.edge(i))
    }

    /// Strict point-in-polygon test (boundary excluded)
    pub fn contains(&self, p: Vec2) -> bool {
        geometry::contains(&self.vertices, p)
    }

    /// Vertical gap shared with `other` through a portal: `(low, high)`
    #[inline]
    pub fn opening_with(&self, other: &Sector) -> (f32, f32) {
        (self.floor.max(other.floor), self.ceil.min(other.ceil))
    }

    /// How far `p` lies outside the polygon: the largest edge distance
    ///
    /// Zero or negative inside a convex sector. Degenerate edges are ignored.
    pub fn overshoot(&self, p: Vec2) -> f32 {
        self.edges()
            .filter_map(|e| e.distance(p))
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Vertex centroid, the fallback spawn point inside convex sectors
    pub fn centroid(&self) -> Vec2 {
        if self.vertices.is_empty() {
            return Vec2::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec2>() / self.vertices.len() as f32
    }

    /// Reverse the winding, keeping each neighbor attached to its edge
    pub(crate) fn reverse_winding(&mut self) {
        let n = self.vertices.len();
        if n < 2 {
            return;
        }
        self.vertices.reverse();
        // New edge j joins old vertices n-1-j and n-2-j, which was old edge n-2-j
        let old = std::mem::take(&mut self.neighbors);
        self.neighbors = (0..n).map(|j| old[(2 * n - 2 - j) % n]).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Sector {
        Sector::new(
            0.0,
            10.0,
            vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 4.0), Vec2::new(4.0, 0.0)],
            vec![Some(1), None, Some(2)],
        )
    }

    #[test]
    fn test_edges_wrap_around() {
        let s = triangle();
        let edges: Vec<Edge> = s.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2].start, Vec2::new(4.0, 0.0));
        assert_eq!(edges[2].end, Vec2::new(0.0, 0.0));
        assert_eq!(s.edge_vertices(2), (2, 0));
        assert!(s.edge(3).is_none());
    }

    #[test]
    fn test_edge_neighbors() {
        let s = triangle();
        assert_eq!(s.edge(0).unwrap().neighbor, Some(1));
        assert!(!s.edge(1).unwrap().is_portal());
        assert!(s.edge(2).unwrap().is_portal());
    }

    #[test]
    fn test_reverse_winding_keeps_portals_on_their_edges() {
        let mut s = triangle();
        let before: Vec<(Vec2, Vec2, Option<usize>)> =
            s.edges().map(|e| (e.start, e.end, e.neighbor)).collect();
        s.reverse_winding();
        for e in s.edges() {
            // Same undirected edge must carry the same neighbor
            let original = before
                .iter()
                .find(|(a, b, _)| *a == e.end && *b == e.start)
                .expect("reversed edge exists");
            assert_eq!(original.2, e.neighbor);
        }
    }

    #[test]
    fn test_opening_with() {
        let low = Sector::closed(0.0, 10.0, vec![]);
        let high = Sector::closed(2.0, 8.0, vec![]);
        assert_eq!(low.opening_with(&high), (2.0, 8.0));
        assert_eq!(high.opening_with(&low), (2.0, 8.0));
    }

    #[test]
    fn test_overshoot() {
        // Square wound so that positive distances are outside
        let s = Sector::closed(
            0.0,
            10.0,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 10.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(10.0, 0.0),
            ],
        );
        assert!((s.overshoot(Vec2::new(5.0, 5.0)) + 5.0).abs() < 1e-5);
        assert!((s.overshoot(Vec2::new(9.0, 5.0)) + 1.0).abs() < 1e-5);
        assert!((s.overshoot(Vec2::new(12.0, 5.0)) - 2.0).abs() < 1e-5);
        assert_eq!(s.centroid(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_degenerate_edge_detected() {
        let s = Sector::closed(
            0.0,
            1.0,
            vec![Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        );
        assert!(s.edge(0).unwrap().is_degenerate());
        assert!(s.edge(0).unwrap().outward_normal().is_none());
        assert!(!s.edge(1).unwrap().is_degenerate());
    }
}

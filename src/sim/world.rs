//! Validated, immutable sector collection
//!
//! A [`World`] can only be built through [`World::new`], which rejects
//! malformed sectors and normalizes winding. The resolver relies on both.

use glam::Vec2;
use thiserror::Error;

use super::geometry::signed_area2;
use super::sector::Sector;

/// Load-time problems with sector data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("world has no sectors")]
    Empty,

    #[error("sector {sector}: {count} vertices, need at least 3")]
    TooFewVertices { sector: usize, count: usize },

    #[error("sector {sector}: {vertices} vertices but {neighbors} neighbor entries")]
    NeighborCountMismatch {
        sector: usize,
        vertices: usize,
        neighbors: usize,
    },

    #[error("sector {sector} edge {edge}: neighbor {neighbor} does not exist ({count} sectors)")]
    DanglingNeighbor {
        sector: usize,
        edge: usize,
        neighbor: usize,
        count: usize,
    },

    #[error("sector {sector} edge {edge}: sector links to itself")]
    SelfNeighbor { sector: usize, edge: usize },

    #[error("sector {sector}: non-finite coordinate or height")]
    NonFinite { sector: usize },

    #[error("sector {sector}: polygon has zero area")]
    ZeroArea { sector: usize },
}

/// The static sector collection the simulation runs against
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    sectors: Vec<Sector>,
}

impl World {
    /// Validate `sectors` and normalize their winding
    pub fn new(mut sectors: Vec<Sector>) -> Result<Self, WorldError> {
        if sectors.is_empty() {
            return Err(WorldError::Empty);
        }
        let count = sectors.len();

        for (index, sector) in sectors.iter_mut().enumerate() {
            validate_sector(index, sector, count)?;

            let area2 = signed_area2(&sector.vertices);
            if area2.abs() < f32::EPSILON {
                return Err(WorldError::ZeroArea { sector: index });
            }
            if area2 > 0.0 {
                sector.reverse_winding();
            }

            if sector.floor >= sector.ceil {
                log::warn!(
                    "Sector {}: floor {} is not below ceiling {}",
                    index,
                    sector.floor,
                    sector.ceil
                );
            }
            for edge in sector.edges().filter(|e| e.is_degenerate()) {
                log::warn!("Sector {}: edge {} has zero length", index, edge.index);
            }
        }

        log::info!("World built: {} sectors", count);
        Ok(Self { sectors })
    }

    #[inline]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    #[inline]
    pub fn sector(&self, index: usize) -> Option<&Sector> {
        self.sectors.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    /// Always false; a world holds at least one sector
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// First sector whose polygon strictly contains `p`
    pub fn locate(&self, p: Vec2) -> Option<usize> {
        self.sectors.iter().position(|s| s.contains(p))
    }

    /// Sector to spawn in: the containing sector, or sector 0
    pub fn spawn_sector(&self, p: Vec2) -> usize {
        match self.locate(p) {
            Some(index) => index,
            None => {
                log::warn!("Spawn point {} is outside every sector, using sector 0", p);
                0
            }
        }
    }
}

fn validate_sector(index: usize, sector: &Sector, count: usize) -> Result<(), WorldError> {
    let n = sector.vertices.len();
    if n < 3 {
        return Err(WorldError::TooFewVertices { sector: index, count: n });
    }
    if sector.neighbors.len() != n {
        return Err(WorldError::NeighborCountMismatch {
            sector: index,
            vertices: n,
            neighbors: sector.neighbors.len(),
        });
    }
    if !sector.floor.is_finite()
        || !sector.ceil.is_finite()
        || sector.vertices.iter().any(|v| !v.is_finite())
    {
        return Err(WorldError::NonFinite { sector: index });
    }
    for (edge, neighbor) in sector.neighbors.iter().enumerate() {
        match *neighbor {
            Some(neighbor) if neighbor >= count => {
                return Err(WorldError::DanglingNeighbor {
                    sector: index,
                    edge,
                    neighbor,
                    count,
                });
            }
            Some(neighbor) if neighbor == index => {
                return Err(WorldError::SelfNeighbor { sector: index, edge });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Derive portal links from shared edges
///
/// Edge `a -> b` of one sector links to another sector that has the edge
/// `b -> a`. Existing links are overwritten only where a match is found.
/// Returns the number of links set.
pub fn link_neighbors(sectors: &mut [Sector]) -> usize {
    let mut links = Vec::new();
    for (s, sector) in sectors.iter().enumerate() {
        for edge in sector.edges() {
            let other = sectors.iter().enumerate().find(|(o, other)| {
                *o != s
                    && other
                        .edges()
                        .any(|oe| oe.start == edge.end && oe.end == edge.start)
            });
            if let Some((o, _)) = other {
                links.push((s, edge.index, o));
            }
        }
    }

    for &(s, edge, o) in &links {
        sectors[s].neighbors[edge] = Some(o);
    }
    links.len()
}

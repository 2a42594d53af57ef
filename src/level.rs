//! Level interchange
//!
//! Levels are stored as JSON: an ordered texture list, the sectors, and a
//! spawn point. Loading always goes through [`World::new`], so a [`Level`] in
//! hand is a validated one.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Sector, SurfaceMaterials, World, WorldError, link_neighbors};

/// Error type for level loading and saving
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid world: {0}")]
    World(#[from] WorldError),

    #[error("sector {sector}: material index {index} but only {textures} textures")]
    UnknownMaterial {
        sector: usize,
        index: u32,
        textures: usize,
    },
}

/// On-disk layout
#[derive(Serialize, Deserialize)]
struct LevelFile {
    #[serde(default)]
    textures: Vec<String>,
    sectors: Vec<Sector>,
    spawn: Vec2,
}

/// A validated level
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub world: World,
    pub spawn: Vec2,
    /// Texture names, indexed by [`SurfaceMaterials`]
    pub textures: Vec<String>,
}

impl Level {
    /// Validate and assemble a level
    ///
    /// Material indices are only checked when a texture list is given.
    pub fn new(sectors: Vec<Sector>, spawn: Vec2, textures: Vec<String>) -> Result<Self, LevelError> {
        if !textures.is_empty() {
            for (index, sector) in sectors.iter().enumerate() {
                check_materials(index, &sector.materials, textures.len())?;
            }
        }
        let world = World::new(sectors)?;
        if world.locate(spawn).is_none() {
            log::warn!("Level spawn {} is not inside any sector", spawn);
        }
        Ok(Self {
            world,
            spawn,
            textures,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        Self::new(file.sectors, file.spawn, file.textures)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        let file = LevelFile {
            textures: self.textures.clone(),
            sectors: self.world.sectors().to_vec(),
            spawn: self.spawn,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level {} ({} sectors, {} textures)",
            path.display(),
            level.world.len(),
            level.textures.len()
        );
        Ok(level)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Level saved to {}", path.display());
        Ok(())
    }

    /// Built-in test map
    ///
    /// A hall with a raised dais to the east, a tight duct beyond it that
    /// drops into a pit, a crawlspace to the north too low to enter, and a
    /// one unit deep door frame to a room in the west.
    pub fn demo() -> Result<Self, LevelError> {
        let v = |x: f32, y: f32| Vec2::new(x, y);
        let mat = |wall, ceil, floor| SurfaceMaterials { wall, ceil, floor };

        let mut sectors = vec![
            // 0: hall
            Sector::closed(
                0.0,
                20.0,
                vec![
                    v(0.0, 0.0),
                    v(40.0, 0.0),
                    v(40.0, 10.0),
                    v(40.0, 30.0),
                    v(40.0, 40.0),
                    v(25.0, 40.0),
                    v(15.0, 40.0),
                    v(0.0, 40.0),
                    v(0.0, 25.0),
                    v(0.0, 15.0),
                ],
            )
            .with_materials(mat(0, 0, 1)),
            // 1: dais, one step up
            Sector::closed(
                1.5,
                20.0,
                vec![
                    v(40.0, 10.0),
                    v(56.0, 10.0),
                    v(56.0, 15.0),
                    v(56.0, 25.0),
                    v(56.0, 30.0),
                    v(40.0, 30.0),
                ],
            )
            .with_materials(mat(1, 0, 1)),
            // 2: duct, just tall enough to walk through
            Sector::closed(
                1.5,
                9.0,
                vec![v(56.0, 15.0), v(80.0, 15.0), v(80.0, 25.0), v(56.0, 25.0)],
            )
            .with_materials(mat(2, 2, 2)),
            // 3: pit, no way back up
            Sector::closed(
                -6.0,
                20.0,
                vec![
                    v(80.0, 5.0),
                    v(100.0, 5.0),
                    v(100.0, 35.0),
                    v(80.0, 35.0),
                    v(80.0, 25.0),
                    v(80.0, 15.0),
                ],
            )
            .with_materials(mat(1, 0, 3)),
            // 4: crawlspace
            Sector::closed(
                0.0,
                5.0,
                vec![v(15.0, 40.0), v(25.0, 40.0), v(25.0, 55.0), v(15.0, 55.0)],
            )
            .with_materials(mat(0, 2, 1)),
            // 5: door frame, thinner than one fast step
            Sector::closed(
                0.0,
                14.0,
                vec![v(-1.0, 15.0), v(0.0, 15.0), v(0.0, 25.0), v(-1.0, 25.0)],
            )
            .with_materials(mat(2, 2, 2)),
            // 6: west room
            Sector::closed(
                0.0,
                20.0,
                vec![
                    v(-30.0, 5.0),
                    v(-1.0, 5.0),
                    v(-1.0, 15.0),
                    v(-1.0, 25.0),
                    v(-1.0, 35.0),
                    v(-30.0, 35.0),
                ],
            )
            .with_materials(mat(1, 0, 0)),
        ];
        link_neighbors(&mut sectors);

        let textures = ["stone", "brick", "metal", "slime"].map(String::from).to_vec();
        Self::new(sectors, v(20.0, 20.0), textures)
    }
}

fn check_materials(sector: usize, materials: &SurfaceMaterials, textures: usize) -> Result<(), LevelError> {
    for index in [materials.wall, materials.ceil, materials.floor] {
        if index as usize >= textures {
            return Err(LevelError::UnknownMaterial {
                sector,
                index,
                textures,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_FRAME_DT, SIM_DT};
    use crate::sim::{MoveIntent, SimState, TickInput, tick};
    use crate::tuning::Tuning;

    const TWO_ROOMS: &str = r#"{
        "textures": ["stone", "brick"],
        "sectors": [
            {
                "floor": 0.0, "ceil": 20.0,
                "materials": { "wall": 1, "ceil": 0, "floor": 0 },
                "vertices": [[0, 0], [10, 0], [10, 10], [0, 10]],
                "neighbors": [null, 1, null, null]
            },
            {
                "floor": 1.0, "ceil": 20.0,
                "vertices": [[10, 0], [20, 0], [20, 10], [10, 10]],
                "neighbors": [null, null, null, 0]
            }
        ],
        "spawn": [5, 5]
    }"#;

    #[test]
    fn test_demo_is_linked() {
        let level = Level::demo().unwrap();
        assert_eq!(level.world.len(), 7);
        let portals: usize = level
            .world
            .sectors()
            .iter()
            .map(|s| s.edges().filter(|e| e.is_portal()).count())
            .sum();
        assert_eq!(portals, 12);
        assert_eq!(level.world.locate(level.spawn), Some(0));
    }

    #[test]
    fn test_from_json() {
        let level = Level::from_json(TWO_ROOMS).unwrap();
        assert_eq!(level.world.len(), 2);
        assert_eq!(level.spawn, Vec2::new(5.0, 5.0));
        assert_eq!(level.textures, vec!["stone", "brick"]);
        assert_eq!(level.world.sector(0).unwrap().materials.wall, 1);
        // Materials default when omitted
        assert_eq!(level.world.sector(1).unwrap().materials, SurfaceMaterials::default());
    }

    #[test]
    fn test_json_round_trip() {
        let level = Level::demo().unwrap();
        let json = level.to_json().unwrap();
        assert_eq!(Level::from_json(&json).unwrap(), level);
    }

    #[test]
    fn test_unknown_material() {
        let json = TWO_ROOMS.replace(r#""wall": 1"#, r#""wall": 9"#);
        let err = Level::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            LevelError::UnknownMaterial { sector: 0, index: 9, textures: 2 }
        ));
    }

    #[test]
    fn test_invalid_world_is_reported() {
        let json = TWO_ROOMS.replace("[null, 1, null, null]", "[null, 5, null, null]");
        let err = Level::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            LevelError::World(WorldError::DanglingNeighbor { neighbor: 5, .. })
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Level::from_json("{"), Err(LevelError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Level::load("/definitely/not/here/level.json").unwrap_err();
        assert!(matches!(err, LevelError::Io(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("sector-engine-{}.json", std::process::id()));
        let level = Level::from_json(TWO_ROOMS).unwrap();
        level.save(&path).unwrap();
        let loaded = Level::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), level);
    }

    #[test]
    fn test_demo_walk_onto_dais() {
        let mut level = Level::demo().unwrap();
        level.spawn = Vec2::new(30.0, 20.0);
        let mut state = SimState::new(level, Tuning::default());
        state.player = state.player.clone().with_orientation(0.0, 0.0);

        let forward = TickInput {
            intent: MoveIntent::FORWARD,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &forward, SIM_DT);
            if state.player.sector() != 0 {
                break;
            }
        }
        assert_eq!(state.player.sector(), 1);

        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.player.sector(), 1);
        assert!(!state.player.is_falling());
        assert_eq!(state.player.position().y, 7.5);
    }

    #[test]
    fn test_demo_sprint_through_door_frame() {
        let mut level = Level::demo().unwrap();
        level.spawn = Vec2::new(10.0, 20.0);
        let mut state = SimState::new(level, Tuning::default());
        // Face -x in the sector plane
        state.player = state.player.clone().with_orientation(180.0, 0.0);

        let forward = TickInput {
            intent: MoveIntent::FORWARD,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &forward, MAX_FRAME_DT);
            let p = state.player.position();
            let sector = state.world.sector(state.player.sector()).unwrap();
            assert!(sector.overshoot(crate::horizontal(p)) <= 1e-3, "left the world at {}", p);
        }
        assert_eq!(state.player.sector(), 6);
        assert!(state.player.position().x > -30.0);
    }

    #[test]
    fn test_demo_crawlspace_too_low() {
        let mut level = Level::demo().unwrap();
        level.spawn = Vec2::new(20.0, 30.0);
        let mut state = SimState::new(level, Tuning::default());
        // Face +y in the sector plane
        state.player = state.player.clone().with_orientation(90.0, 0.0);

        let forward = TickInput {
            intent: MoveIntent::FORWARD,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &forward, SIM_DT);
        }
        assert_eq!(state.player.sector(), 0);
        assert!(state.player.position().z <= 40.0);
    }
}

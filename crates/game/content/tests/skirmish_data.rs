//! The bundled skirmish scenario must always load.
#![cfg(feature = "loaders")]

use std::path::PathBuf;

use tactics_content::ContentFactory;
use tactics_core::{Coordinate, TeamId, TerrainKind};

fn skirmish_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data/skirmish")
}

#[test]
fn skirmish_scenario_loads() {
    let content = ContentFactory::new(skirmish_dir()).load_all().unwrap();

    assert_eq!(content.board.terrain(Coordinate::new(4, 3)), Some(TerrainKind::Road));
    assert_eq!(content.board.terrain(Coordinate::new(6, 6)), Some(TerrainKind::HighWall));
    assert!(content.board.edge_blocks(Coordinate::new(2, 2), Coordinate::new(3, 2)));
    assert_eq!(content.covers.lookup(TerrainKind::Rubble).map(|c| c.name.as_str()), Some("half"));

    let teams: Vec<TeamId> = content.roster.iter().map(|unit| unit.team).collect();
    assert!(teams.contains(&TeamId(0)) && teams.contains(&TeamId(1)));
}

#[test]
fn every_unit_references_known_content() {
    let content = ContentFactory::new(skirmish_dir()).load_all().unwrap();

    for unit in &content.roster {
        assert!(content.weapon(&unit.weapon).is_some(), "{} carries {}", unit.id, unit.weapon);
        if let Some(behavior) = unit.behavior {
            assert!(content.behaviors.iter().any(|b| b.id == behavior));
        }
        let terrain = content.board.terrain(unit.position).unwrap();
        assert!(content.rules.walkable_terrain.contains(&terrain));
    }
}

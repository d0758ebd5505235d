use crate::earthquake::{EarthquakeSettings, EarthquakeSeverity, EventPhase};
use crate::grid::Terrain;
use crate::notifications::NotificationEvent;
use crate::scenario::ScenarioConfig;
use crate::sound_effects::{SfxEvent, SfxTally};
use crate::test_harness::TestCity;

const WALLED_TOWN: &str = r#"{
    "name": "Walled town",
    "map_width": 16,
    "map_height": 16,
    "seed": 99,
    "start_year": -120,
    "earthquake": { "severity": 1, "x": 8, "y": 8, "offset_year": 0 },
    "terrain": [
        { "x": 0, "y": 12, "width": 16, "height": 4, "kind": "water" },
        { "x": 2, "y": 2, "width": 3, "height": 3, "kind": "garden" }
    ],
    "buildings": [
        { "x": 8, "y": 8, "chain": 4 },
        { "x": 9, "y": 8, "chain": 4 },
        { "x": 10, "y": 8, "chain": 4 },
        { "x": 1, "y": 1, "size": 2, "zone": "Commercial" }
    ]
}"#;

fn walled_town() -> TestCity {
    let config = ScenarioConfig::from_json_str(WALLED_TOWN).unwrap();
    TestCity::new().with_scenario(&config)
}

#[test]
fn test_scenario_configures_earthquake() {
    let mut city = walled_town();
    city.assert_earthquake_enabled();
    let settings = *city.resource::<EarthquakeSettings>();
    assert_eq!(settings.severity, EarthquakeSeverity::Small);
    assert_eq!(settings.trigger_year(), -120);
    assert_eq!(city.earthquake().trigger_year, -120);
    assert_eq!(city.clock().year(), -120);
    assert_eq!(city.building_count(), 4);
    assert_eq!(city.grid().width, 16);
}

#[test]
fn test_scenario_quake_levels_wall_chain() {
    let mut city = walled_town().at_earthquake_date();
    city.tick(1);

    city.assert_earthquake_phase(EventPhase::InProgress);
    assert_eq!(city.building_count(), 1);
    assert_eq!(city.resource::<SfxTally>().count(SfxEvent::Explosion), 1);
    city.assert_has_terrain(9, 8, Terrain::RUBBLE);
    city.assert_has_terrain(10, 8, Terrain::RUBBLE);
    city.assert_cleared(8, 8);

    let messages = city.events::<NotificationEvent>();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].grid_offset, Some(8 * 16 + 8));
}

#[test]
fn test_scenario_quake_never_enters_water() {
    let mut city = walled_town().at_earthquake_date();
    city.tick_until(5_000, |c| c.earthquake().is_finished());
    city.assert_earthquake_phase(EventPhase::Finished);

    for y in 12..16 {
        for x in 0..16 {
            city.assert_has_terrain(x, y, Terrain::WATER);
        }
    }
    city.assert_fronts_on_map();
    for front in city.earthquake().fronts {
        assert!(front.y < 12, "front entered the water at {:?}", front);
    }
}

#[test]
fn test_same_scenario_same_quake() {
    let mut a = walled_town().at_earthquake_date();
    let mut b = walled_town().at_earthquake_date();
    a.tick(300);
    b.tick(300);
    assert_eq!(*a.earthquake(), *b.earthquake());
}

use hexworld::ecology::BiomeId;
use hexworld::geometry::HexGrid;
use hexworld::pipeline::{run_recipe, FieldId, FieldKind, WorldMap, WorldSummary};
use hexworld::projection::TerrainType;
use hexworld::recipe::knobs::{PlatesKnob, SwatchesKnob};
use hexworld::recipe::Recipe;

fn generate(recipe: &Recipe, seed: u64) -> WorldMap {
    run_recipe(HexGrid::new(40, 26), &recipe.compile().unwrap(), seed).unwrap()
}

#[test]
fn default_recipe_publishes_every_field() {
    let world = generate(&Recipe::default(), 11);
    let tiles = world.grid.len();
    for &id in FieldId::ALL {
        let data = world.fields.get(id).unwrap_or_else(|e| panic!("{id:?}: {e}"));
        assert_eq!(data.kind(), id.kind());
        if id.kind() != FieldKind::Indices {
            assert_eq!(data.len(), tiles, "{}", id.name());
        }
    }
    assert!(world.has_tectonics());
    assert!(world.num_plates() >= 2);
}

#[test]
fn same_seed_same_world() {
    let recipe = Recipe::default();
    let a = generate(&recipe, 3);
    let b = generate(&recipe, 3);
    for &id in FieldId::ALL {
        assert_eq!(a.fields.get(id).unwrap(), b.fields.get(id).unwrap(), "{}", id.name());
    }

    let c = generate(&recipe, 4);
    assert_ne!(
        a.fields.u8(FieldId::PlateId).unwrap(),
        c.fields.u8(FieldId::PlateId).unwrap()
    );
}

#[test]
fn layers_agree_with_each_other() {
    let world = generate(&Recipe::default(), 21);
    let f = &world.fields;
    let closeness = f.u8(FieldId::BoundaryCloseness).unwrap();
    let shield = f.u8(FieldId::ShieldStability).unwrap();
    let elevation = f.f32(FieldId::Elevation).unwrap();
    let land = f.u8(FieldId::LandMask).unwrap();
    let biome = f.u8(FieldId::Biome).unwrap();
    let terrain = f.u8(FieldId::Terrain).unwrap();
    let rivers = f.u8(FieldId::RiverMask).unwrap();
    let vegetation = f.u8(FieldId::Vegetation).unwrap();
    let aridity = f.f32(FieldId::Aridity).unwrap();
    let rainfall = f.f32(FieldId::RainfallRefined).unwrap();

    for i in 0..world.grid.len() {
        assert_eq!(shield[i], 255 - closeness[i]);
        // Sea level sits at zero elevation.
        assert_eq!(land[i] != 0, elevation[i] > 0.0);
        let water = land[i] == 0;
        assert_eq!(biome[i] == 0, water);
        assert_eq!(TerrainType::from_u8(terrain[i]).is_water(), water);
        if water {
            assert_eq!(rivers[i], 0);
            assert_eq!(vegetation[i], 0);
        } else {
            assert!(BiomeId::from_u8(biome[i]).is_some());
        }
        assert!(rainfall[i] >= 0.0 && rainfall[i].is_finite());
        assert!(aridity[i] >= 0.0 && aridity[i].is_finite());
    }

    let land_share = world.land_share().unwrap();
    assert!(land_share > 0.1 && land_share < 0.6, "land share {land_share}");
}

#[test]
fn starts_are_distinct_land_tiles() {
    let world = generate(&Recipe::default(), 8);
    let starts = world.fields.indices(FieldId::StartTiles).unwrap();
    let terrain = world.fields.u8(FieldId::Terrain).unwrap();
    assert!(!starts.is_empty() && starts.len() <= 8);
    for (k, &s) in starts.iter().enumerate() {
        assert!(!TerrainType::from_u8(terrain[s]).is_water());
        assert!(!starts[..k].contains(&s));
    }
}

#[test]
fn knobs_change_the_generated_world() {
    let mut few = Recipe::default();
    few.foundation.knobs.plates = PlatesKnob::Few;
    few.hydrology_climate_refine.knobs.swatches = SwatchesKnob::Off;
    let mut many = Recipe::default();
    many.foundation.knobs.plates = PlatesKnob::Many;

    // Fallback attempts may drop a third of the plates, never more.
    let few = generate(&few, 5);
    let many = generate(&many, 5);
    assert!(few.num_plates() <= 5);
    assert!(many.num_plates() >= 8);
}

#[test]
fn summary_reports_the_run() {
    let world = generate(&Recipe::default(), 2);
    let summary = WorldSummary::of(&world);
    assert_eq!((summary.width, summary.height, summary.seed), (40, 26, 2));
    assert_eq!(summary.fields.len(), FieldId::ALL.len());
    assert_eq!(summary.plates, world.num_plates());
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"start_count\""));
}

use std::fs;

use hexworld::climate::{RefinePrecipitationStrategy, SwatchStrategy};
use hexworld::projection::RiverProjectionStrategy;
use hexworld::recipe::Recipe;
use hexworld::schema::{ConfigError, NoOptions};

const AUTHORED: &str = r#"
[foundation.knobs]
plates = "few"
activity = "violent"

[foundation.advanced.compute-plates]
strategy = "voronoi"

[foundation.advanced.compute-plates.plates]
count = 10

[hydrology-climate-refine.knobs]
swatches = "off"

[map-hydrology.advanced.project-rivers]
strategy = "all"
"#;

#[test]
fn authored_file_loads_and_compiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipe.toml");
    fs::write(&path, AUTHORED).unwrap();

    let recipe = Recipe::from_toml_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(recipe.foundation.advanced.compute_plates.voronoi().plates.count, 10);

    let compiled = recipe.compile().unwrap();
    assert_eq!(compiled.foundation.compute_plates.voronoi().plates.count, 6);
    assert_eq!(compiled.climate_refine.apply_swatches, SwatchStrategy::None(NoOptions {}));
    assert_eq!(compiled.map_hydrology.project_rivers, RiverProjectionStrategy::All(NoOptions {}));
}

#[test]
fn defaults_round_trip_through_both_formats() {
    let defaults = Recipe::default();
    let toml_text = defaults.to_toml_string().unwrap();
    let json_text = defaults.to_json_string().unwrap();
    assert_eq!(Recipe::from_toml_str(&toml_text).unwrap(), defaults);
    assert_eq!(Recipe::from_json_str(&json_text).unwrap(), defaults);

    // Dumping a loaded authored recipe is stable.
    let authored = Recipe::from_toml_str(AUTHORED).unwrap();
    let once = authored.to_toml_string().unwrap();
    let twice = Recipe::from_toml_str(&once).unwrap().to_toml_string().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn errors_name_the_offending_node() {
    let cases = [
        ("[placement.advanced.place-starts]\nstrategy = \"fertility-spaced\"\nplayer_count = 0\n", "placement.advanced.place-starts.player_count"),
        ("[foundation.advanced.compute-plates.generation]\ncell_density = -1.0\n", "foundation.advanced.compute-plates.generation.cell_density"),
    ];
    for (text, expected) in cases {
        let err = Recipe::from_toml_str(text).unwrap_err();
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some(expected), "{err}");
    }
}

#[test]
fn unknown_strategy_and_bad_syntax_are_rejected() {
    let err = Recipe::from_toml_str("[ecology.advanced.classify-biomes]\nstrategy = \"koppen\"\n").unwrap_err();
    assert!(!matches!(err, ConfigError::OutOfRange { .. }), "{err:?}");

    let err = Recipe::from_toml_str("[foundation\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");

    let err = Recipe::from_json_str(r#"{"foundation": {"knobs": {"plates": "lots"}}}"#).unwrap_err();
    assert!(err.to_string().contains("foundation"), "{err}");
}

#[test]
fn bare_strategies_load_from_their_tag() {
    let text = "[hydrology-climate-refine.advanced.compute-precipitation]\nstrategy = \"passthrough\"\n\n\
                [hydrology-climate-refine.advanced.apply-swatches]\nstrategy = \"none\"\n\n\
                [map-hydrology.advanced.project-rivers]\nstrategy = \"major-only\"\n";
    let recipe = Recipe::from_toml_str(text).unwrap();
    let advanced = &recipe.hydrology_climate_refine.advanced;
    assert_eq!(advanced.compute_precipitation, RefinePrecipitationStrategy::Passthrough(NoOptions {}));
    assert_eq!(advanced.apply_swatches, SwatchStrategy::None(NoOptions {}));
    assert_eq!(
        recipe.map_hydrology.advanced.project_rivers,
        RiverProjectionStrategy::MajorOnly(NoOptions {})
    );
}

#[test]
fn bare_strategies_reject_stray_keys() {
    let cases = [
        (
            "[hydrology-climate-refine.advanced.compute-precipitation]\nstrategy = \"passthrough\"\nstrength = 2.0\n",
            "hydrology-climate-refine.advanced.compute-precipitation.strength",
        ),
        (
            "[hydrology-climate-refine.advanced.apply-swatches]\nstrategy = \"none\"\nbelt_count = 3\n",
            "hydrology-climate-refine.advanced.apply-swatches.belt_count",
        ),
        (
            "[map-hydrology.advanced.project-rivers]\nstrategy = \"major-only\"\nminimum = \"minor\"\n",
            "map-hydrology.advanced.project-rivers.minimum",
        ),
        (
            "{\"map-hydrology\": {\"advanced\": {\"project-rivers\": {\"strategy\": \"all\", \"typo\": true}}}}",
            "map-hydrology.advanced.project-rivers.typo",
        ),
    ];
    for (text, expected) in cases {
        let err = if text.starts_with('{') {
            Recipe::from_json_str(text).unwrap_err()
        } else {
            Recipe::from_toml_str(text).unwrap_err()
        };
        assert!(matches!(err, ConfigError::UnknownKey { .. }), "{err:?}");
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some(expected), "{err}");
    }
}

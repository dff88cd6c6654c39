//! hexworld CLI - tectonic hex-map generator.
//!
//! Runs a recipe over a wrapping hex grid and writes preview maps plus a
//! JSON summary of the result.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use hexworld::export::{
    export_biome_map, export_boundary_map, export_plate_map, export_scalar_png, BiomeMapOptions, ExportOptions,
    ScalarRange,
};
use hexworld::geometry::HexGrid;
use hexworld::pipeline::{run_recipe, FieldId, FieldKind, WorldSummary};
use hexworld::recipe::Recipe;

/// Tectonic hex-map generator.
#[derive(Parser)]
#[command(name = "hexworld")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a map and write preview images.
    Generate {
        /// Map width in tiles (wraps east-west).
        #[arg(long, default_value = "84")]
        width: u32,

        /// Map height in tiles.
        #[arg(long, default_value = "54")]
        height: u32,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Recipe file (.toml or .json). Defaults apply when omitted.
        #[arg(short, long)]
        recipe: Option<PathBuf>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "map")]
        name: String,

        /// Pixels per tile in the preview images.
        #[arg(long, default_value = "8")]
        scale: u32,

        /// Skip image export and only write the summary.
        #[arg(long)]
        no_images: bool,
    },

    /// Inspect or check recipe documents.
    Recipe {
        #[command(subcommand)]
        action: RecipeCommand,
    },

    /// Display information about a map size.
    Info {
        #[arg(long, default_value = "84")]
        width: u32,

        #[arg(long, default_value = "54")]
        height: u32,
    },
}

#[derive(Subcommand)]
enum RecipeCommand {
    /// Print the fully-defaulted recipe.
    Defaults {
        #[arg(short, long, default_value = "toml")]
        format: RecipeFormat,
    },
    /// Load a recipe, apply its knobs and report problems.
    Validate {
        /// Recipe file (.toml or .json).
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RecipeFormat {
    Toml,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            width,
            height,
            seed,
            recipe,
            output,
            name,
            scale,
            no_images,
        } => run_generate(width, height, seed, recipe.as_deref(), &output, &name, scale, no_images),
        Commands::Recipe { action } => match action {
            RecipeCommand::Defaults { format } => run_recipe_defaults(format),
            RecipeCommand::Validate { file } => run_recipe_validate(&file),
        },
        Commands::Info { width, height } => run_info(width, height),
    }
}

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn load_recipe(path: &Path) -> Recipe {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with(format!("cannot read {}: {e}", path.display())));
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        Recipe::from_json_str(&text)
    } else {
        Recipe::from_toml_str(&text)
    };
    parsed.unwrap_or_else(|e| exit_with(format!("{}: {e}", path.display())))
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    width: u32,
    height: u32,
    seed: Option<u64>,
    recipe_path: Option<&Path>,
    output: &Path,
    name: &str,
    scale: u32,
    no_images: bool,
) {
    if !(4..=4096).contains(&width) || !(4..=4096).contains(&height) {
        exit_with("width and height must be between 4 and 4096");
    }
    if !(1..=64).contains(&scale) {
        exit_with("scale must be between 1 and 64");
    }

    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });

    let recipe = recipe_path.map(load_recipe).unwrap_or_default();
    let compiled = recipe.compile().unwrap_or_else(|e| exit_with(e));

    println!("hexworld - Hex Map Generator");
    println!("============================");
    println!("Size: {width}x{height} tiles");
    println!("Seed: {seed}");
    println!("Output: {}", output.display());

    let start = Instant::now();
    let world = run_recipe(HexGrid::new(width, height), &compiled, seed)
        .unwrap_or_else(|e| exit_with(format!("generation failed: {e}")));
    println!("Generation completed in {:.2?}", start.elapsed());

    let summary = WorldSummary::of(&world);
    println!("Plates: {} (accepted: {})", summary.plates, summary.plates_accepted);
    if let Some(share) = summary.land_share {
        println!("Land: {:.1}%", share * 100.0);
    }
    println!("Starts: {}", summary.start_count);

    if let Err(e) = std::fs::create_dir_all(output) {
        exit_with(format!("cannot create output directory: {e}"));
    }

    let summary_path = output.join(format!("{name}_summary.json"));
    let json = serde_json::to_string_pretty(&summary).unwrap_or_else(|e| exit_with(e));
    std::fs::write(&summary_path, json).unwrap_or_else(|e| exit_with(e));
    println!("\nWrote {}", summary_path.display());

    if no_images {
        return;
    }

    let options = ExportOptions {
        scale,
        ..Default::default()
    };
    let plates = output.join(format!("{name}_plates.png"));
    export_plate_map(&world, &plates, &options).unwrap_or_else(|e| exit_with(e));
    println!("Wrote {}", plates.display());

    let boundaries = output.join(format!("{name}_boundaries.png"));
    export_boundary_map(&world, &boundaries, &options).unwrap_or_else(|e| exit_with(e));
    println!("Wrote {}", boundaries.display());

    let biomes = output.join(format!("{name}_biomes.png"));
    export_biome_map(&world, &biomes, &options, &BiomeMapOptions::default()).unwrap_or_else(|e| exit_with(e));
    println!("Wrote {}", biomes.display());

    for (id, suffix) in [
        (FieldId::Elevation, "elevation"),
        (FieldId::Temperature, "temperature"),
        (FieldId::RainfallRefined, "rainfall"),
    ] {
        let path = output.join(format!("{name}_{suffix}.png"));
        export_scalar_png(&world, id, &path, ScalarRange::Auto, &options).unwrap_or_else(|e| exit_with(e));
        println!("Wrote {}", path.display());
    }
}

fn run_recipe_defaults(format: RecipeFormat) {
    let recipe = Recipe::default();
    let text = match format {
        RecipeFormat::Toml => recipe.to_toml_string(),
        RecipeFormat::Json => recipe.to_json_string(),
    };
    println!("{}", text.unwrap_or_else(|e| exit_with(e)));
}

fn run_recipe_validate(path: &Path) {
    let recipe = load_recipe(path);
    let compiled = recipe.compile().unwrap_or_else(|e| exit_with(e));
    println!("{}: OK", path.display());
    println!(
        "  plates: {}",
        compiled.foundation.compute_plates.voronoi().plates.count
    );
}

fn run_info(width: u32, height: u32) {
    let grid = HexGrid::new(width, height);
    let tiles = grid.len() as u64;
    let published = FieldId::ALL.len();
    let bytes: u64 = FieldId::ALL
        .iter()
        .map(|id| match id.kind() {
            FieldKind::U8 | FieldKind::I8 => tiles,
            FieldKind::U32 | FieldKind::F32 => tiles * 4,
            FieldKind::Indices => 0,
        })
        .sum();

    println!("hexworld - Map Size Info");
    println!("========================");
    println!();
    println!("Size:   {width}x{height} tiles (wraps east-west)");
    println!("Tiles:  {tiles:>12}");
    println!("Layers: {published:>12}");
    println!();
    println!(
        "Layer memory: {:>12} bytes ({:.2} MB)",
        bytes,
        bytes as f64 / 1024.0 / 1024.0
    );
}

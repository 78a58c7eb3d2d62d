mod replay;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use datasets::InMemoryDatasets;
use foundation::math::{
    Vec2, from_sphere_vector, great_circle_distance_km, rotate_vector_around_vertical_axis,
};
use globe::GlobeConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scene::{LinkedRecord, MarkerCatalog, ViewMode, click_to_sphere, resolve};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless tools for the interactive globe")]
struct Args {
    /// Directory holding countries.json and impact-stories.json
    #[arg(long, global = true, default_value = "data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize the marker catalog for a mode
    Catalog {
        #[arg(long, default_value = "countries")]
        mode: ViewMode,

        /// Seed for the satellite scatter
        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, default_value_t = scene::NOMINAL_CONSTELLATION_SIZE)]
        satellites: usize,

        /// Number of markers to list
        #[arg(long, default_value_t = 5)]
        head: usize,
    },

    /// Resolve one normalized click (x right, y up, both in [-1, 1])
    Pick {
        #[arg(long, default_value = "countries")]
        mode: ViewMode,

        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Effective globe rotation in radians
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        rotation: f64,
    },

    /// Replay a JSON interaction script through a headless globe
    Replay {
        script: PathBuf,

        /// Optional JSON config file; GLOBE_* env vars still apply
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    match args.command {
        Command::Catalog {
            mode,
            seed,
            satellites,
            head,
        } => cmd_catalog(&args.data, mode, seed, satellites, head),
        Command::Pick {
            mode,
            x,
            y,
            rotation,
        } => cmd_pick(&args.data, mode, Vec2::new(x, y), rotation),
        Command::Replay { script, config } => cmd_replay(&args.data, &script, config.as_deref()),
    }
}

fn load_datasets(dir: &Path) -> Result<InMemoryDatasets, String> {
    let data = InMemoryDatasets::load_dir(dir).map_err(|e| e.to_string())?;
    info!(dir = %dir.display(), "datasets loaded");
    Ok(data)
}

fn print_json(value: &serde_json::Value) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| format!("serialize: {e}"))?;
    println!("{out}");
    Ok(())
}

fn record_json(record: &LinkedRecord) -> serde_json::Value {
    match record {
        LinkedRecord::Country(c) => json!({ "country": c }),
        LinkedRecord::Story(s) => json!({ "story": s }),
    }
}

fn cmd_catalog(
    data: &Path,
    mode: ViewMode,
    seed: u64,
    satellites: usize,
    head: usize,
) -> Result<(), String> {
    let datasets = load_datasets(data)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let catalog = MarkerCatalog::build(mode, &datasets, satellites, &mut rng);

    let first: Vec<_> = catalog
        .markers()
        .iter()
        .take(head)
        .map(|m| {
            json!({
                "location": [m.location.lat_deg, m.location.lon_deg],
                "size": m.size,
                "title": m.linked.as_ref().map(|l| l.title()),
            })
        })
        .collect();

    print_json(&json!({
        "mode": mode,
        "label": mode.label(),
        "description": mode.description(),
        "count": catalog.len(),
        "clickable": catalog.clickable_count(),
        "markers": first,
    }))
}

fn cmd_pick(data: &Path, mode: ViewMode, click: Vec2, rotation: f64) -> Result<(), String> {
    let datasets = load_datasets(data)?;
    // Satellites are never selectable, so the scatter itself does not matter here.
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let catalog = MarkerCatalog::build(mode, &datasets, 0, &mut rng);
    let res = resolve(click, rotation, &catalog);

    // Where the click lands on the unrotated globe.
    let clicked_at = click_to_sphere(click)
        .and_then(|p| from_sphere_vector(rotate_vector_around_vertical_axis(p, rotation)));

    let matched = res.hit.and_then(|h| {
        let record = catalog.get(h.index)?.linked.as_ref()?;
        let km = clicked_at.map(|at| great_circle_distance_km(at, record.location()));
        Some(json!({ "index": h.index, "km_from_click": km, "record": record_json(record) }))
    });
    print_json(&json!({
        "mode": mode,
        "click": [click.x, click.y],
        "rotation": rotation,
        "clicked_at": clicked_at.map(|p| [p.lat_deg, p.lon_deg]),
        "nearest_distance": res.distance.is_finite().then_some(res.distance),
        "match": matched,
    }))
}

fn cmd_replay(data: &Path, script_path: &Path, config: Option<&Path>) -> Result<(), String> {
    let datasets = load_datasets(data)?;
    let config = GlobeConfig::load(config).map_err(|e| e.to_string())?;
    let raw = fs::read_to_string(script_path).map_err(|e| format!("read {script_path:?}: {e}"))?;
    let script = replay::parse_script(&raw)?;

    let report = replay::run(config, Box::new(datasets), &script)?;
    print_json(&json!({
        "selections": report.selections,
        "final_mode": report.final_mode,
        "final_rotation": report.final_rotation,
        "frames_rendered": report.frames_rendered,
        "summary": report.summary,
    }))
}

use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shorenav::config::FileConfig;
use shorenav::domain::WaterMask;
use shorenav::export::write_json;
use shorenav::extract::{BoundaryTracer, RegionExtractor};
use shorenav::pipeline::Pipeline;

/// Luma at or above this is water in a classified mask image
const WATER_THRESHOLD: u8 = 128;

/// Build a navigable waypoint graph around the islands of a water mask
///
/// Examples:
///   # White water, black land
///   shorenav -i world_mask.png
///
///   # Dark water, shorter cross-water links, custom output path
///   shorenav -i world_mask.png --invert --max-link 200 -o assets/map/collision_data.json
///
///   # Use a config file
///   shorenav --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "shorenav")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches shorenav.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Classified mask image (bright = water)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output JSON path (defaults to collision_data.json)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Treat dark pixels as water
    #[arg(long)]
    invert: bool,

    /// Longest cross-water connection in pixels
    #[arg(long)]
    max_link: Option<f64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        let contents = std::fs::read_to_string(config_path)
            .context(format!("Failed to read config file: {:?}", config_path))?;
        FileConfig::from_toml_str(&contents).context("Failed to parse config file")?
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    init_tracing(verbose);

    let Some(input) = args.input.clone().or(file_config.input.clone()) else {
        bail!("No input mask given; pass --input or set `input` in the config file");
    };
    let output_path = args.output.clone().unwrap_or(file_config.output.clone());
    let invert = args.invert || file_config.invert;
    let mut nav = file_config.nav;
    if let Some(max_link) = args.max_link {
        nav.links.max_bridge_distance = max_link;
    }

    println!("shorenav - Navigation Graph Builder");
    println!("===================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Input: {}", input.display());
        println!("  Output: {}", output_path.display());
        println!("  Water: {}", if invert { "dark" } else { "bright" });
        println!("  Max link: {}px", nav.links.max_bridge_distance);
        println!("  Sample step: {}px", nav.sample_step);
        println!("  Push distances: {:?}", nav.push.distances);
        println!();
    }

    let pipeline = Pipeline::new(nav).context("Invalid navigation config")?;

    let spinner = create_spinner("Loading water mask...");
    let start = Instant::now();
    let image = image::open(&input)
        .with_context(|| format!("Failed to open mask image: {}", input.display()))?
        .into_luma8();
    let mask = WaterMask::from_luma(&image, WATER_THRESHOLD, invert)
        .context("Failed to build water mask")?;
    spinner.finish_with_message(format!(
        "Loaded {}x{} mask, {:.1}% water [{:.1}s]",
        mask.width(),
        mask.height(),
        mask.water_fraction() * 100.0,
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Extracting land regions...");
    let start = Instant::now();
    let raw = BoundaryTracer::default().extract(&mask);
    spinner.finish_with_message(format!(
        "Extracted {} land regions [{:.1}s]",
        raw.len(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Building waypoint graph...");
    let start = Instant::now();
    let output = pipeline
        .run_regions(mask.width(), mask.height(), raw)
        .context("Failed to build navigation graph")?;
    spinner.finish_with_message(format!(
        "Built {} waypoints on {} islands [{:.1}s]",
        output.graph.len(),
        output.regions.len(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Writing collision data...");
    let start = Instant::now();
    write_json(&output_path, &output)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    spinner.finish_with_message(format!(
        "Wrote {} [{:.1}s]",
        output_path.display(),
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!("{}", output.report.summary());
    println!("{}", output.validation.summary());
    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "shorenav=debug"
    } else {
        "shorenav=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

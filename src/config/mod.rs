use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{NavError, Result};

/// Simplification tolerance for regions whose pixel area exceeds `min_area`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EpsilonBand {
    pub min_area: f64,
    /// Multiplied by the region perimeter
    pub factor: f64,
}

fn default_min_collision_area() -> f64 {
    800.0
}
fn default_convex_area() -> f64 {
    3000.0
}
fn default_small_area() -> f64 {
    5000.0
}
fn default_hull_blend_ratio() -> f64 {
    0.30
}
fn default_epsilon_bands() -> Vec<EpsilonBand> {
    vec![
        EpsilonBand {
            min_area: 50000.0,
            factor: 0.0025,
        },
        EpsilonBand {
            min_area: 10000.0,
            factor: 0.004,
        },
        EpsilonBand {
            min_area: 5000.0,
            factor: 0.0055,
        },
        EpsilonBand {
            min_area: 0.0,
            factor: 0.0075,
        },
    ]
}
fn default_kink_dot() -> f64 {
    0.92
}
fn default_kink_long_edge() -> f64 {
    8.0
}
fn default_min_vertices() -> usize {
    4
}

/// Polygon refinement thresholds (areas in px²)
#[derive(Debug, Clone, Deserialize)]
pub struct RefineConfig {
    /// Regions below this are navigable clutter and dropped
    #[serde(default = "default_min_collision_area")]
    pub min_collision_area: f64,
    /// Regions below this are replaced by their convex hull
    #[serde(default = "default_convex_area")]
    pub convex_area: f64,
    /// Upper edge of the hull blend band and the small/large split
    #[serde(default = "default_small_area")]
    pub small_area: f64,
    /// Blend band takes the hull only if it grows the area by less than this
    #[serde(default = "default_hull_blend_ratio")]
    pub hull_blend_ratio: f64,
    #[serde(default = "default_epsilon_bands")]
    pub epsilon_bands: Vec<EpsilonBand>,
    /// Turns with a unit-vector dot product above this are kinks
    #[serde(default = "default_kink_dot")]
    pub kink_dot: f64,
    /// Kinks between two edges longer than this are kept
    #[serde(default = "default_kink_long_edge")]
    pub kink_long_edge: f64,
    /// Kink removal never leaves fewer vertices than this
    #[serde(default = "default_min_vertices")]
    pub min_vertices: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            min_collision_area: default_min_collision_area(),
            convex_area: default_convex_area(),
            small_area: default_small_area(),
            hull_blend_ratio: default_hull_blend_ratio(),
            epsilon_bands: default_epsilon_bands(),
            kink_dot: default_kink_dot(),
            kink_long_edge: default_kink_long_edge(),
            min_vertices: default_min_vertices(),
        }
    }
}

fn default_push_distances() -> Vec<f64> {
    vec![10.0, 15.0, 20.0]
}
fn default_visibility_fractions() -> Vec<f64> {
    vec![0.75, 0.85, 0.90]
}
fn default_degenerate_bisector() -> f64 {
    0.1
}

/// Push-out relaxation: one entry per pass in both vectors
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    #[serde(default = "default_push_distances")]
    pub distances: Vec<f64>,
    /// Share of the distance to each ring neighbour that must stay visible
    #[serde(default = "default_visibility_fractions")]
    pub visibility: Vec<f64>,
    /// Bisectors shorter than this fall back to a centroid push
    #[serde(default = "default_degenerate_bisector")]
    pub degenerate_bisector: f64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            distances: default_push_distances(),
            visibility: default_visibility_fractions(),
            degenerate_bisector: default_degenerate_bisector(),
        }
    }
}

fn default_chain_passes() -> usize {
    3
}
fn default_min_run() -> usize {
    5
}
fn default_min_ring() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_passes")]
    pub passes: usize,
    /// Rings shorter than this are not merged at all
    #[serde(default = "default_min_run")]
    pub min_run: usize,
    /// Merging stops once a ring is down to this many live waypoints
    #[serde(default = "default_min_ring")]
    pub min_ring: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            passes: default_chain_passes(),
            min_run: default_min_run(),
            min_ring: default_min_ring(),
        }
    }
}

fn default_max_bridge() -> f64 {
    300.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Longest cross-water connection in pixels
    #[serde(default = "default_max_bridge")]
    pub max_bridge_distance: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_bridge_distance: default_max_bridge(),
        }
    }
}

fn default_sample_step() -> f64 {
    2.0
}

/// Every tunable of the navigation build
#[derive(Debug, Clone, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub refine: RefineConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub links: LinkConfig,
    /// Pixel interval for all line-of-sight sampling
    #[serde(default = "default_sample_step")]
    pub sample_step: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            refine: RefineConfig::default(),
            push: PushConfig::default(),
            chain: ChainConfig::default(),
            links: LinkConfig::default(),
            sample_step: default_sample_step(),
        }
    }
}

impl NavConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let r = &self.refine;
        if !(r.min_collision_area <= r.convex_area && r.convex_area <= r.small_area) {
            return Err(NavError::Config(format!(
                "area thresholds out of order: {} <= {} <= {} required",
                r.min_collision_area, r.convex_area, r.small_area
            )));
        }
        if r.epsilon_bands.is_empty() {
            return Err(NavError::Config("epsilon_bands must not be empty".into()));
        }
        if r.min_vertices < 3 {
            return Err(NavError::Config("min_vertices must be at least 3".into()));
        }
        if self.push.distances.len() != self.push.visibility.len() {
            return Err(NavError::Config(format!(
                "{} push distances but {} visibility fractions",
                self.push.distances.len(),
                self.push.visibility.len()
            )));
        }
        if self.chain.min_ring < 3 {
            return Err(NavError::Config("chain.min_ring must be at least 3".into()));
        }
        if self.sample_step <= 0.0 {
            return Err(NavError::Config("sample_step must be positive".into()));
        }
        Ok(())
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("collision_data.json")
}
fn default_verbose() -> bool {
    false
}

/// Settings file for the command-line tool
#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub invert: bool,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub nav: NavConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: default_output(),
            invert: false,
            verbose: default_verbose(),
            nav: NavConfig::default(),
        }
    }
}

impl FileConfig {
    /// Parse a settings file and validate its `[nav]` table
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.nav.validate()?;
        Ok(config)
    }

    /// First parseable config from the standard search paths
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match Self::from_toml_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("shorenav.toml"),
        PathBuf::from(".shorenav.toml"),
    ];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("shorenav").join("config.toml"));
        paths.push(config_dir.join("shorenav.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".shorenav.toml"));
    }

    paths
}

//! The staged navigation build
//!
//! raw regions → refined regions → authoritative mask → seeded rings →
//! pushed rings → simplified rings → linked graph
//!
//! Each stage takes the previous stage's output by value and hands a new
//! value on; nothing earlier is touched once a later stage has started.

use crate::config::NavConfig;
use crate::domain::{RawRegion, Region, WaterMask};
use crate::error::{NavError, Result};
use crate::extract::RegionExtractor;
use crate::geometry::rasterize_land;
use crate::graph::{
    ChainStats, GraphValidation, PushStats, WaypointGraph, link_cross_water, push_out,
    seed_rings, simplify_chains, validate_graph,
};
use crate::refine::{RefineStats, refine_regions};

/// Counters from every stage of one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub refine: RefineStats,
    pub seeded: usize,
    pub push: PushStats,
    pub chain: ChainStats,
    pub cross_links: usize,
    /// Waypoints in the final graph
    pub waypoints: usize,
    /// Connections in the final graph
    pub connections: usize,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        format!(
            "{} of {} regions kept ({} too small, {} degenerate, {} reversed), \
             {} waypoints seeded, {} pushes ({} fallback, {} never pushed), \
             {} merges, {} stranded, {} ring edges cut, {} cross-water links, \
             {} waypoints / {} connections",
            self.refine.refined,
            self.refine.input,
            self.refine.too_small,
            self.refine.degenerate,
            self.refine.windings_reversed,
            self.seeded,
            self.push.moves,
            self.push.fallbacks,
            self.push.never_pushed,
            self.chain.merges,
            self.chain.stranded,
            self.chain.cut_edges,
            self.cross_links,
            self.waypoints,
            self.connections
        )
    }
}

/// Everything a finished run hands to downstream consumers
#[derive(Debug, Clone)]
pub struct NavOutput {
    pub width: usize,
    pub height: usize,
    pub regions: Vec<Region>,
    /// Rasterised from `regions`; land is polygon interior
    pub mask: WaterMask,
    pub graph: WaypointGraph,
    pub report: PipelineReport,
    pub validation: GraphValidation,
}

/// Refined regions with the mask derived from them
struct Shoreline {
    width: usize,
    height: usize,
    regions: Vec<Region>,
    mask: WaterMask,
}

/// Coastal rings after push-out and chain simplification
struct Coast {
    shore: Shoreline,
    graph: WaypointGraph,
}

pub struct Pipeline {
    config: NavConfig,
}

impl Pipeline {
    pub fn new(config: NavConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Extract regions from `mask` and build the navigation graph
    pub fn run(&self, mask: &WaterMask, extractor: &impl RegionExtractor) -> Result<NavOutput> {
        if mask.is_empty() {
            return Err(NavError::EmptyMask {
                width: mask.width(),
                height: mask.height(),
            });
        }
        let raw = extractor.extract(mask);
        tracing::info!(
            "Extracted {} land regions from {}x{} mask ({:.1}% water)",
            raw.len(),
            mask.width(),
            mask.height(),
            mask.water_fraction() * 100.0
        );
        self.run_regions(mask.width(), mask.height(), raw)
    }

    /// Build the navigation graph from already extracted regions
    pub fn run_regions(
        &self,
        width: usize,
        height: usize,
        raw: Vec<RawRegion>,
    ) -> Result<NavOutput> {
        if width == 0 || height == 0 {
            return Err(NavError::EmptyMask { width, height });
        }
        check_region_bounds(&raw, width, height)?;

        let mut report = PipelineReport::default();
        let shore = self.refine(width, height, raw, &mut report);
        let coast = self.shape_coast(shore, &mut report);
        Ok(self.link(coast, report))
    }

    fn refine(
        &self,
        width: usize,
        height: usize,
        raw: Vec<RawRegion>,
        report: &mut PipelineReport,
    ) -> Shoreline {
        let (regions, stats) = refine_regions(raw, &self.config.refine);
        if regions.is_empty() {
            tracing::warn!("No land regions survived refinement; the graph will be empty");
        }
        tracing::info!(
            "Refined {} regions ({} dropped as too small)",
            regions.len(),
            stats.too_small
        );
        report.refine = stats;

        let mask = rasterize_land(width, height, regions.iter().map(|r| &r.polygon));
        Shoreline {
            width,
            height,
            regions,
            mask,
        }
    }

    fn shape_coast(&self, shore: Shoreline, report: &mut PipelineReport) -> Coast {
        let step = self.config.sample_step;
        let mut graph = seed_rings(&shore.regions);
        report.seeded = graph.len();

        report.push = push_out(
            &mut graph,
            &shore.regions,
            &shore.mask,
            &self.config.push,
            step,
        );
        tracing::info!(
            "Pushed waypoints off the shore ({} moves, {} never pushed)",
            report.push.moves,
            report.push.never_pushed
        );

        report.chain = simplify_chains(&mut graph, &shore.mask, &self.config.chain, step);
        tracing::info!(
            "Simplified rings: {} merges, {} waypoints remain",
            report.chain.merges,
            graph.len()
        );

        Coast { shore, graph }
    }

    fn link(&self, coast: Coast, mut report: PipelineReport) -> NavOutput {
        let Coast { shore, mut graph } = coast;
        let max_distance = self.config.links.max_bridge_distance;
        let step = self.config.sample_step;

        report.cross_links = link_cross_water(&mut graph, &shore.mask, max_distance, step);
        report.waypoints = graph.len();
        report.connections = graph.edges().len();
        tracing::info!(
            "Linked {} cross-water connections",
            report.cross_links
        );

        let validation = validate_graph(&graph, &shore.mask, max_distance, step);
        if !validation.is_valid() {
            for warning in &validation.warnings {
                tracing::warn!("{}", warning);
            }
        }

        NavOutput {
            width: shore.width,
            height: shore.height,
            regions: shore.regions,
            mask: shore.mask,
            graph,
            report,
            validation,
        }
    }
}

/// Vertices may sit on the far edge of the mask but not beyond it
fn check_region_bounds(raw: &[RawRegion], width: usize, height: usize) -> Result<()> {
    for (index, region) in raw.iter().enumerate() {
        let outside = region.polygon.points.iter().any(|p| {
            p.x < 0 || p.y < 0 || p.x as usize > width || p.y as usize > height
        });
        if outside {
            return Err(NavError::RegionOutOfBounds {
                index,
                width,
                height,
            });
        }
    }
    Ok(())
}

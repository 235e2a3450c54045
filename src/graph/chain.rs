use super::WaypointGraph;
use crate::config::ChainConfig;
use crate::domain::{WaterMask, WaypointId};
use crate::geometry::{segment_on_water, vector};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChainStats {
    pub merges: usize,
    /// Ring members dropped because they ended up on land
    pub stranded: usize,
    /// Rebuilt ring edges dropped because they cross land
    pub cut_edges: usize,
    /// Rings left with fewer than three waypoints
    pub degenerate_rings: usize,
    /// Waypoints removed by the final compaction
    pub dropped: usize,
}

/// Merge neighbouring ring waypoints into their midpoints, then rebuild
/// every ring and renumber the survivors
///
/// Rebuilt ring edges that would cross land are left out, so a ring that
/// lost a stranded member may end up as an open chain.
pub fn simplify_chains(
    graph: &mut WaypointGraph,
    mask: &WaterMask,
    config: &ChainConfig,
    step: f64,
) -> ChainStats {
    let mut stats = ChainStats::default();

    for pass in 0..config.passes {
        let mut merged = 0;
        for index in 0..graph.rings().len() {
            merged += merge_ring(graph, index, mask, config, step);
        }
        tracing::debug!("Chain pass {}: {} merges", pass + 1, merged);
        stats.merges += merged;
        if merged == 0 {
            break;
        }
    }

    stats.stranded = prune_stranded(graph, mask);
    graph.rebuild_ring_links();
    stats.cut_edges = cut_blocked_ring_edges(graph, mask, step);

    stats.degenerate_rings = graph
        .rings()
        .iter()
        .filter(|ring| !ring.is_empty() && ring.len() < 3)
        .count();
    if stats.degenerate_rings > 0 {
        tracing::warn!(
            "{} rings have fewer than 3 waypoints",
            stats.degenerate_rings
        );
    }

    stats.dropped = graph.compact();
    stats
}

/// One scan over one ring; returns the number of accepted merges
fn merge_ring(
    graph: &mut WaypointGraph,
    index: usize,
    mask: &WaterMask,
    config: &ChainConfig,
    step: f64,
) -> usize {
    let ring = graph.ring(index).to_vec();
    let n = ring.len();
    if n < config.min_run {
        return 0;
    }

    let mut live = n;
    let mut merges = 0;
    let mut kept: Vec<WaypointId> = Vec::with_capacity(n);
    let mut i = 0;

    while i < n {
        if i + 1 < n && live > config.min_ring {
            let (first, second) = (ring[i], ring[i + 1]);
            let pred = kept.last().copied().unwrap_or(ring[n - 1]);
            let succ = ring[(i + 2) % n];
            let mid = vector::midpoint(graph.position(first), graph.position(second));

            if mask.is_water_at(mid.0, mid.1)
                && segment_on_water(mask, graph.position(pred), mid, step)
                && segment_on_water(mask, mid, graph.position(succ), step)
            {
                if let Some(w) = graph.waypoint_mut(first) {
                    w.set_position(mid);
                }
                graph.isolate(second);
                kept.push(first);
                live -= 1;
                merges += 1;
                i += 2;
                continue;
            }
        }
        kept.push(ring[i]);
        i += 1;
    }

    graph.set_ring(index, kept);
    merges
}

/// Take ring members sitting on land out of their rings
fn prune_stranded(graph: &mut WaypointGraph, mask: &WaterMask) -> usize {
    let mut stranded = Vec::new();
    for index in 0..graph.rings().len() {
        let (wet, dry): (Vec<WaypointId>, Vec<WaypointId>) =
            graph.ring(index).iter().copied().partition(|&id| {
                let (x, y) = graph.position(id);
                mask.is_water_at(x, y)
            });
        if !dry.is_empty() {
            graph.set_ring(index, wet);
            stranded.extend(dry);
        }
    }

    for &id in &stranded {
        graph.isolate(id);
    }
    if !stranded.is_empty() {
        tracing::warn!("Dropped {} waypoints stranded on land", stranded.len());
    }
    stranded.len()
}

/// Disconnect ring neighbours whose straight line crosses land
fn cut_blocked_ring_edges(graph: &mut WaypointGraph, mask: &WaterMask, step: f64) -> usize {
    let blocked: Vec<(WaypointId, WaypointId)> = graph
        .ring_edges()
        .into_iter()
        .filter(|&(a, b)| !segment_on_water(mask, graph.position(a), graph.position(b), step))
        .collect();

    for &(a, b) in &blocked {
        graph.disconnect(a, b);
    }
    if !blocked.is_empty() {
        tracing::warn!("Cut {} ring edges crossing land", blocked.len());
    }
    blocked.len()
}

use shorenav::config::NavConfig;
use shorenav::domain::WaterMask;
use shorenav::extract::{BoundaryTracer, RegionExtractor};
use shorenav::geometry::segment_on_water;
use shorenav::graph::simplify_chains;
use shorenav::pipeline::{NavOutput, Pipeline};

/// Water field with a land disk per `(cx, cy, r)`
fn islands(width: usize, height: usize, disks: &[(f64, f64, f64)]) -> WaterMask {
    let mut mask = WaterMask::all_water(width, height);
    for y in 0..height {
        for x in 0..width {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            if disks
                .iter()
                .any(|&(cx, cy, r)| (px - cx).hypot(py - cy) <= r)
            {
                mask.set(x, y, false);
            }
        }
    }
    mask
}

fn build(mask: &WaterMask) -> NavOutput {
    Pipeline::new(NavConfig::default())
        .unwrap()
        .run(mask, &BoundaryTracer::default())
        .unwrap()
}

fn cross_region_links(output: &NavOutput) -> usize {
    output
        .graph
        .edges()
        .iter()
        .filter(|&&(a, b)| {
            let (wa, wb) = (
                output.graph.waypoint(a).unwrap(),
                output.graph.waypoint(b).unwrap(),
            );
            wa.region != wb.region
        })
        .count()
}

#[test]
fn single_round_island() {
    let mask = islands(200, 200, &[(100.0, 100.0, 50.0)]);
    let raw = BoundaryTracer::default().extract(&mask);
    assert_eq!(raw.len(), 1);
    let raw_vertices = raw[0].polygon.len();

    let output = build(&mask);

    assert_eq!(output.regions.len(), 1);
    assert!(output.graph.len() >= 3);
    assert!(
        output.graph.len() < raw_vertices,
        "{} waypoints from {} traced vertices",
        output.graph.len(),
        raw_vertices
    );
    for w in output.graph.waypoints() {
        assert!(output.mask.is_water_at(w.x, w.y));
        assert!(!raw[0].polygon.contains(w.x, w.y));
        assert!((w.x - 100.0).hypot(w.y - 100.0) > 50.0);
    }
    assert!(output.validation.is_valid(), "{}", output.validation.summary());
}

#[test]
fn island_on_the_map_edge_keeps_edges_on_water() {
    // Headland cut off by the west edge; pushes toward the edge fail
    let mut mask = WaterMask::all_water(200, 200);
    for y in 40..160 {
        for x in 0..60 {
            mask.set(x, y, false);
        }
    }
    let output = build(&mask);

    assert_eq!(output.regions.len(), 1);
    assert_eq!(output.validation.blocked_ring_edges, 0);
    assert_eq!(output.validation.blocked_links, 0);
    assert!(output.validation.is_valid(), "{}", output.validation.summary());
    for (a, b) in output.graph.edges() {
        assert!(segment_on_water(
            &output.mask,
            output.graph.position(a),
            output.graph.position(b),
            NavConfig::default().sample_step
        ));
    }
}

#[test]
fn close_islands_are_linked() {
    // 100px of open water between the shores
    let mask = islands(400, 200, &[(90.0, 100.0, 40.0), (270.0, 100.0, 40.0)]);
    let output = build(&mask);

    assert_eq!(output.regions.len(), 2);
    assert!(cross_region_links(&output) >= 1);
    assert!(output.validation.is_valid(), "{}", output.validation.summary());
}

#[test]
fn distant_islands_stay_apart() {
    // 400px of open water, beyond the 300px bridging distance
    let mask = islands(780, 300, &[(150.0, 150.0, 40.0), (630.0, 150.0, 40.0)]);
    let output = build(&mask);

    assert_eq!(output.regions.len(), 2);
    assert_eq!(cross_region_links(&output), 0);
    assert_eq!(output.validation.overlong_links, 0);
}

#[test]
fn refined_shapes_survive_rasterisation() {
    let mask = islands(400, 300, &[(100.0, 150.0, 60.0), (290.0, 140.0, 35.0)]);
    let output = build(&mask);

    let again = BoundaryTracer::default().extract(&output.mask);
    assert_eq!(again.len(), output.regions.len());

    let mut refined: Vec<f64> = output.regions.iter().map(|r| r.area).collect();
    let mut traced: Vec<f64> = again.iter().map(|r| r.pixel_area as f64).collect();
    refined.sort_by(f64::total_cmp);
    traced.sort_by(f64::total_cmp);
    for (a, b) in refined.iter().zip(&traced) {
        assert!((a - b).abs() / a < 0.1, "refined {a} vs traced {b}");
    }
}

#[test]
fn chain_rerun_keeps_rings_navigable() {
    let mask = islands(300, 300, &[(150.0, 150.0, 70.0)]);
    let mut output = build(&mask);
    let before: Vec<usize> = output.graph.rings().iter().map(Vec::len).collect();

    let config = NavConfig::default();
    simplify_chains(
        &mut output.graph,
        &output.mask,
        &config.chain,
        config.sample_step,
    );

    for (ring, &len) in output.graph.rings().iter().zip(&before) {
        assert!(ring.len() >= len.min(config.chain.min_ring));
    }
    for w in output.graph.waypoints() {
        assert!(output.mask.is_water_at(w.x, w.y));
    }
}

#[test]
fn every_connection_is_symmetric() {
    let mask = islands(400, 200, &[(90.0, 100.0, 40.0), (270.0, 100.0, 45.0)]);
    let output = build(&mask);

    for w in output.graph.waypoints() {
        for &other in &w.connections {
            assert!(output.graph.are_connected(other, w.id));
        }
    }
    for (index, w) in output.graph.waypoints().iter().enumerate() {
        assert_eq!(w.id, index);
    }
}

#[test]
fn clutter_is_not_an_obstacle() {
    // A 20px rock sits below the collision threshold and becomes water
    let mask = islands(300, 200, &[(80.0, 100.0, 45.0), (220.0, 100.0, 12.0)]);
    let output = build(&mask);

    assert_eq!(output.regions.len(), 1);
    assert_eq!(output.report.refine.too_small, 1);
    assert!(output.mask.is_water_at(220.0, 100.0));
}

//! JSON export in the layout the game's collision loader reads

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::geometry::Bounds;
use crate::pipeline::NavOutput;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollisionData<'a> {
    map_width: usize,
    map_height: usize,
    islands: Vec<IslandRecord>,
    waypoints: Vec<WaypointRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct IslandRecord {
    id: usize,
    polygon: Vec<[i32; 2]>,
    bounds: Bounds,
    area: f64,
}

#[derive(Debug, Serialize)]
struct WaypointRecord<'a> {
    id: usize,
    x: f64,
    y: f64,
    connections: &'a std::collections::BTreeSet<usize>,
}

fn collision_data(output: &NavOutput) -> CollisionData<'_> {
    let islands = output
        .regions
        .iter()
        .enumerate()
        .filter_map(|(id, region)| {
            Some(IslandRecord {
                id,
                polygon: region.polygon.points.iter().map(|p| [p.x, p.y]).collect(),
                bounds: region.polygon.bounds()?,
                area: region.area,
            })
        })
        .collect();

    let waypoints = output
        .graph
        .waypoints()
        .iter()
        .map(|w| WaypointRecord {
            id: w.id,
            x: w.x,
            y: w.y,
            connections: &w.connections,
        })
        .collect();

    CollisionData {
        map_width: output.width,
        map_height: output.height,
        islands,
        waypoints,
    }
}

/// Pretty-printed JSON document for a finished run
pub fn to_json_string(output: &NavOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(&collision_data(output))?)
}

/// Write the JSON document for a finished run to `path`
pub fn write_json(path: &Path, output: &NavOutput) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &collision_data(output))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

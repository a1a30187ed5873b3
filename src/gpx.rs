//! Navigable routes from GPX 1.1 files.
//!
//! Wraps the `gpx` crate. A planned route (`<rte>`) is preferred; files
//! that only carry a recorded track (`<trk>`) are navigated along the
//! track instead. The resulting point list is cut into one instruction
//! per leg plus a final arrival instruction, the same shape an online
//! router hands to [`crate::nav::locate`].

use std::io::Read;

use crate::geo::{haversine, path_length, GeoPoint};
use crate::nav::Instruction;

/// Walking pace in meters per second.
pub const DEFAULT_SPEED_MPS: f64 = 1.4;

/// Read the path to navigate from a GPX file.
///
/// Returns the points of the first route, or the flattened points of the
/// first track if the file has no routes.
pub fn parse<R: Read>(reader: R) -> Result<Vec<GeoPoint>, String> {
    let gpx = gpx::read(reader).map_err(|e| format!("GPX parse error: {e}"))?;

    let to_geo = |wp: &gpx::Waypoint| GeoPoint::new(wp.point().y(), wp.point().x());

    if let Some(route) = gpx.routes.first() {
        return Ok(route.points.iter().map(to_geo).collect());
    }

    if let Some(track) = gpx.tracks.first() {
        return Ok(track
            .segments
            .iter()
            .flat_map(|seg| seg.points.iter())
            .map(to_geo)
            .collect());
    }

    Err("GPX parse error: no route or track found".to_string())
}

/// Split a path into one instruction per leg followed by an arrival
/// instruction at the last point.
///
/// Leg times are in milliseconds at `speed_mps`; a speed that is not a
/// positive finite number yields zero times.
pub fn instructions_from_points(points: &[GeoPoint], speed_mps: f64) -> Vec<Instruction> {
    let Some(last) = points.last() else {
        return Vec::new();
    };

    let ms_per_meter = if speed_mps.is_finite() && speed_mps > 0.0 {
        1000.0 / speed_mps
    } else {
        0.0
    };

    let mut instructions: Vec<Instruction> = points
        .windows(2)
        .map(|leg| {
            let distance = haversine(&leg[0], &leg[1]);
            Instruction {
                points: leg.to_vec(),
                distance,
                time: distance * ms_per_meter,
            }
        })
        .collect();

    instructions.push(Instruction {
        points: vec![*last],
        distance: 0.0,
        time: 0.0,
    });

    instructions
}

/// Parse GPX and return the instruction list as JSON.
pub fn parse_route_to_json(data: &[u8], speed_mps: f64) -> Result<String, String> {
    let points = parse(data).inspect_err(|e| log::warn!("{e}"))?;
    let instructions = instructions_from_points(&points, speed_mps);
    log::debug!(
        "GPX route: {} points, {} instructions, {:.0} m",
        points.len(),
        instructions.len(),
        path_length(&points)
    );
    serde_json::to_string(&instructions).map_err(|e| format!("JSON serialize error: {e}"))
}

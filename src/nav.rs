//! Turn-by-turn positioning.
//!
//! Given a routed instruction list and the traveler's current position,
//! work out which instruction comes next, how far and how long until it,
//! and what remains to the end of the route. All coordinates use
//! WGS84 (lat/lon in degrees); distances are meters and times use the
//! unit of [`Instruction::time`] (milliseconds by convention).

use serde::{Deserialize, Serialize, Serializer};

use crate::geo::{haversine, project_onto_segment, projection_is_on_segment, GeoPoint};

/// Distance to the next instruction reported when nothing was matched.
pub const MIN_DISTANCE_TO_NEXT_M: f64 = 10.0;

/// One leg of a routed path.
///
/// Consecutive instructions share their boundary point: the last point
/// of one is the first point of the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Leg geometry, serialized as `[lon, lat]` pairs.
    #[serde(with = "lon_lat_pairs")]
    pub points: Vec<GeoPoint>,
    /// Full length of the leg in meters.
    pub distance: f64,
    /// Duration of the leg.
    pub time: f64,
}

/// Where the traveler is relative to the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProgress {
    /// Instruction the traveler is heading towards; `None` if the route
    /// has no points. Serialized as `-1` when absent.
    #[serde(serialize_with = "index_or_negative")]
    pub instruction_index: Option<usize>,
    pub time_to_next: f64,
    pub distance_to_next: f64,
    pub remaining_time: f64,
    pub remaining_distance: f64,
}

impl NavigationProgress {
    pub fn has_instruction(&self) -> bool {
        self.instruction_index.is_some()
    }
}

/// Nearest route geometry found so far.
struct Snap {
    distance: f64,
    instruction_index: usize,
    distance_to_next: f64,
}

/// Locate `position` on the route.
///
/// Every point of every instruction is a candidate, as is the
/// perpendicular projection onto each segment when it lands inside the
/// segment. The first candidate with the smallest distance wins. Once a
/// point of instruction `i` is the closest match the traveler is
/// considered to be heading to instruction `i + 1` (or the last one).
///
/// Never fails: an empty route yields `instruction_index: None` with
/// [`MIN_DISTANCE_TO_NEXT_M`] as distance and zero times.
pub fn locate(instructions: &[Instruction], position: &GeoPoint) -> NavigationProgress {
    let mut best: Option<Snap> = None;

    for (instr_idx, instruction) in instructions.iter().enumerate() {
        let points = &instruction.points;
        let Some(last) = points.last() else {
            continue;
        };

        for (p_idx, p) in points.iter().enumerate() {
            let mut snapped = *p;
            let mut dist = haversine(p, position);

            if let Some(next) = points.get(p_idx + 1) {
                if projection_is_on_segment(position, p, next) {
                    let projected = project_onto_segment(position, p, next);
                    let projected_dist = haversine(&projected, position);
                    if projected_dist < dist {
                        dist = projected_dist;
                        snapped = projected;
                    }
                }
            }

            let is_better = match &best {
                Some(prev) => dist < prev.distance,
                None => dist < f64::INFINITY,
            };

            if is_better {
                best = Some(Snap {
                    distance: dist,
                    instruction_index: if instr_idx + 1 < instructions.len() {
                        instr_idx + 1
                    } else {
                        instr_idx
                    },
                    distance_to_next: haversine(last, &snapped).round(),
                });
            }
        }
    }

    let Some(snap) = best else {
        log::trace!("locate: no route points, position {position:?}");
        return NavigationProgress {
            instruction_index: None,
            time_to_next: 0.0,
            distance_to_next: MIN_DISTANCE_TO_NEXT_M,
            remaining_time: 0.0,
            remaining_distance: MIN_DISTANCE_TO_NEXT_M,
        };
    };

    let index = snap.instruction_index;
    let distance_to_next = snap.distance_to_next;

    // Proportional estimate from the leg just finished. The first
    // instruction has no predecessor and reports zero.
    let time_to_next = match index.checked_sub(1).map(|i| &instructions[i]) {
        Some(prev) if prev.distance > 0.0 => prev.time * (distance_to_next / prev.distance),
        _ => 0.0,
    };

    let (remaining_time, remaining_distance) = instructions[index..]
        .iter()
        .fold((time_to_next, distance_to_next), |(t, d), instr| {
            (t + instr.time, d + instr.distance)
        });

    log::trace!(
        "locate: instruction {index}, {distance_to_next} m to next, {remaining_distance} m remaining (off route {:.1} m)",
        snap.distance
    );

    NavigationProgress {
        instruction_index: Some(index),
        time_to_next,
        distance_to_next,
        remaining_time,
        remaining_distance,
    }
}

/// Locate a position on a JSON instruction list and return the progress
/// as JSON with camelCase keys (`instructionIndex`, `timeToNext`, ...).
/// Convenience wrapper for JNI.
pub fn locate_json(instructions_json: &str, lat: f64, lon: f64) -> Result<String, String> {
    let instructions: Vec<Instruction> = serde_json::from_str(instructions_json)
        .map_err(|e| format!("JSON parse error: {e}"))?;
    let progress = locate(&instructions, &GeoPoint::new(lat, lon));
    serde_json::to_string(&progress).map_err(|e| format!("JSON serialize error: {e}"))
}

fn index_or_negative<S: Serializer>(index: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
    match index {
        Some(i) => s.serialize_u64(*i as u64),
        None => s.serialize_i64(-1),
    }
}

/// Routing engines emit instruction geometry as `[lon, lat]` arrays,
/// with a trailing elevation when elevation is enabled. Anything after
/// the first two values is ignored.
mod lon_lat_pairs {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::geo::GeoPoint;

    pub fn serialize<S: Serializer>(points: &[GeoPoint], s: S) -> Result<S::Ok, S::Error> {
        let pairs: Vec<[f64; 2]> = points.iter().map(|p| [p.lon, p.lat]).collect();
        pairs.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<GeoPoint>, D::Error> {
        let coords = Vec::<Vec<f64>>::deserialize(d)?;
        coords
            .into_iter()
            .map(|c| match c[..] {
                [lon, lat, ..] => Ok(GeoPoint::new(lat, lon)),
                _ => Err(D::Error::invalid_length(c.len(), &"at least 2 coordinates")),
            })
            .collect()
    }
}

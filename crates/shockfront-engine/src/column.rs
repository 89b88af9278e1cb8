//! Terrain-following ring sampling.
//!
//! One ring job per radius: `6 × max(radius, 1)` angularly-even sample
//! columns around the center, each snapped to the terrain surface, with
//! linear bridge samples inserted wherever two adjacent columns differ
//! in surface height by more than one voxel. The result is a closed
//! loop with no vertical discontinuity greater than one step, so the
//! destruction surface follows cliffs instead of tunneling past them.

use smallvec::SmallVec;

use shockfront_core::{BlockPos, RingJob};
use shockfront_world::WorldReader;

/// Number of angular samples for a given radius.
///
/// Scaling with the radius keeps the arc length between samples roughly
/// constant (about one voxel) in world units.
fn sample_count(radius: u32) -> u32 {
    6 * radius.max(1)
}

/// Generate the ring job for one radius.
///
/// Radius 0 is the single column at the center. The terrain query goes
/// through `terrain`, which is safe for concurrent background reads by
/// contract ([`WorldReader`]).
pub fn generate(
    terrain: &dyn WorldReader,
    center: BlockPos,
    radius: u32,
    max_height: u32,
    power: f64,
) -> RingJob {
    let bounds = terrain.bounds();
    let ceiling = center.y.saturating_add(i32::try_from(max_height).unwrap_or(i32::MAX));

    let surface_at = |x: i32, z: i32| -> BlockPos {
        let y = terrain
            .highest_solid_y(x, z)
            .unwrap_or(bounds.min_y)
            .min(ceiling);
        BlockPos::new(x, bounds.clamp_y(y), z)
    };

    if radius == 0 {
        return RingJob {
            radius,
            power,
            columns: vec![surface_at(center.x, center.z)],
        };
    }

    let steps = sample_count(radius);
    let angle_step = std::f64::consts::TAU / f64::from(steps);
    let r = f64::from(radius);

    let mut columns: Vec<BlockPos> = Vec::with_capacity(steps as usize);
    for i in 0..steps {
        let angle = angle_step * f64::from(i);
        let x = center.x + (r * angle.cos()).round() as i32;
        let z = center.z + (r * angle.sin()).round() as i32;
        // Rounding can land two adjacent angles on the same column.
        if let Some(last) = columns.last() {
            if last.x == x && last.z == z {
                continue;
            }
        }
        let sample = surface_at(x, z);
        if let Some(&last) = columns.last() {
            push_bridge(last, sample, &mut columns);
        }
        columns.push(sample);
    }

    // Close the loop: bridge from the last sample back to the first.
    if columns.len() > 1 {
        let first = columns[0];
        let last = *columns.last().expect("ring has samples");
        if !(first.x == last.x && first.z == last.z) {
            push_bridge(last, first, &mut columns);
        }
    }

    RingJob {
        radius,
        power,
        columns,
    }
}

/// Insert intermediate samples along the straight line from `from`
/// toward `to` when their surface heights differ by more than one step.
///
/// One sample per vertical step, so consecutive output columns never
/// differ by more than one in Y. `to` itself is not pushed.
fn push_bridge(from: BlockPos, to: BlockPos, out: &mut Vec<BlockPos>) {
    let dy = to.y - from.y;
    if dy.abs() <= 1 {
        return;
    }
    let steps = dy.abs();
    let sign = dy.signum();
    let mut bridge: SmallVec<[BlockPos; 8]> = SmallVec::new();
    for k in 1..steps {
        let t = f64::from(k) / f64::from(steps);
        let x = lerp_round(from.x, to.x, t);
        let z = lerp_round(from.z, to.z, t);
        bridge.push(BlockPos::new(x, from.y + sign * k, z));
    }
    out.extend_from_slice(&bridge);
}

fn lerp_round(a: i32, b: i32, t: f64) -> i32 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as i32
}

//! Joining pass: short straight connectors from road ends to nearby roads.
use glam::DVec2;

use crate::field::EigenfieldMask;
use crate::generator::params::GeneratorParameters;
use crate::generator::MIN_STREAMLINE_NODES;
use crate::storage::{PointHandle, RoadStorage};

/// Points on either side of a node used to estimate its tangent.
const TANGENT_REACH: u32 = MIN_STREAMLINE_NODES as u32 / 2;

/// Signed angle from `a` to `b`, in `(-pi, pi]`.
#[inline]
fn angle_between(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b).atan2(a.dot(b))
}

/// Direction of the road through `point`, estimated from up to two neighbours on each side.
pub fn tangent(storage: &RoadStorage, point: PointHandle) -> DVec2 {
    let road = storage.road(point.road);
    let left = point.index.saturating_sub(TANGENT_REACH).max(road.begin);
    let right = (point.index + TANGENT_REACH).min(road.end.saturating_sub(1));

    let at = |index| storage.position(PointHandle { index, road: point.road });
    at(right) - at(left)
}

/// Closest point of another road that `point` could be joined to.
///
/// Candidates lie within `d_lookahead` and make an angle below `theta_max` with the road's
/// tangent. At a road end the tangent points outward and candidates behind the end are
/// ignored.
pub fn joining_candidate(
    storage: &RoadStorage,
    point: PointHandle,
    params: &GeneratorParameters,
) -> Option<PointHandle> {
    let road = storage.road(point.road);
    let pos = storage.position(point);

    let is_begin = point.index == road.begin;
    let is_end = point.index + 1 == road.end;
    let mut dir = tangent(storage, point);
    if is_begin {
        dir = -dir;
    }

    let mut best = None;
    let mut min_dist2 = f64::INFINITY;
    for candidate in storage.nearby_points(pos, params.d_lookahead, EigenfieldMask::ALL) {
        if candidate.road == point.road {
            continue;
        }

        let join = storage.position(candidate) - pos;
        let dist2 = join.length_squared();
        if dist2 <= f64::EPSILON || dist2 >= min_dist2 {
            continue;
        }
        if (is_begin || is_end) && join.dot(dir) < 0.0 {
            continue;
        }

        if angle_between(dir, join).abs() < params.theta_max {
            min_dist2 = dist2;
            best = Some(candidate);
        }
    }

    best
}

/// Straight polyline from `x0` to `x1` with a step of at most `dl`.
///
/// The step shrinks for short joins so the result always has several segments.
pub fn joining_streamline(dl: f64, x0: DVec2, x1: DVec2) -> Vec<DVec2> {
    let diff = x1 - x0;
    let dist = diff.length();
    if dist <= f64::EPSILON {
        return vec![x0, x1];
    }

    let step = (dist / MIN_STREAMLINE_NODES as f64).min(dl);
    let inc = diff * (step / dist);

    let mut points = vec![x0];
    let mut last = x0;
    while (x1 - last).length_squared() > step * step {
        last += inc;
        points.push(last);
    }
    points.push(x1);
    points
}

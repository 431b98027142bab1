//! Polyline simplification.
//!
//! Recursive Douglas-Peucker, where every segment that is found flat enough is also
//! thinned: an interior point closer than `node_sep` to the previous kept point is
//! dropped. The endpoints of every flat segment (and so every split point) survive.
use glam::DVec2;

/// Distance from `p` to the line through `a` and `b`, or to `a` if the chord is degenerate.
pub fn perpendicular_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let chord = b - a;
    let len = chord.length();
    if len <= f64::EPSILON {
        return p.distance(a);
    }
    chord.perp_dot(p - a).abs() / len
}

/// Simplify `points` in place. Panics if `epsilon <= 0`.
pub fn simplify(points: &mut Vec<DVec2>, epsilon: f64, node_sep2: f64) {
    assert!(epsilon > 0.0, "simplification epsilon must be > 0, got {epsilon}");

    let mut keep = vec![true; points.len()];
    douglas_peucker(points, &mut keep, 0, points.len(), epsilon, node_sep2);

    let mut flags = keep.into_iter();
    points.retain(|_| flags.next().unwrap_or(true));
}

fn douglas_peucker(
    points: &[DVec2],
    keep: &mut [bool],
    begin: usize,
    end: usize,
    epsilon: f64,
    min_sep2: f64,
) {
    if end < begin + 3 {
        return;
    }

    let first = points[begin];
    let last = points[end - 1];

    let mut d_max = 0.0;
    let mut index = begin;
    for (i, &p) in points.iter().enumerate().take(end - 1).skip(begin + 1) {
        let d = perpendicular_distance(p, first, last);
        if d > d_max {
            d_max = d;
            index = i;
        }
    }

    if d_max > epsilon {
        douglas_peucker(points, keep, begin, index + 1, epsilon, min_sep2);
        douglas_peucker(points, keep, index, end, epsilon, min_sep2);
        return;
    }

    let mut prev = begin;
    for i in begin + 1..end - 1 {
        if points[i].distance_squared(points[prev]) < min_sep2 {
            keep[i] = false;
        } else {
            prev = i;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::generator::seeding::rand01;

    #[test]
    fn near_collinear_polyline_collapses_to_its_endpoints() {
        let mut pts = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.3),
            DVec2::new(3.0, 0.0),
            DVec2::new(4.0, 0.0),
        ];
        simplify(&mut pts, 0.5, 10.0 * 10.0);
        assert_eq!(pts, vec![DVec2::new(0.0, 0.0), DVec2::new(4.0, 0.0)]);
    }

    #[test]
    fn flat_segments_are_thinned_to_node_sep() {
        let mut pts: Vec<DVec2> = (0..=100).map(|i| DVec2::new(i as f64, 0.0)).collect();
        simplify(&mut pts, 0.5, 10.0 * 10.0);
        let expected: Vec<DVec2> = (0..=10).map(|i| DVec2::new(10.0 * i as f64, 0.0)).collect();
        assert_eq!(pts, expected);
    }

    #[test]
    fn corners_beyond_epsilon_are_kept() {
        let mut pts: Vec<DVec2> = (0..=20)
            .map(|i| DVec2::new(i as f64, 0.0))
            .chain((1..=20).map(|i| DVec2::new(20.0, i as f64)))
            .collect();
        simplify(&mut pts, 0.5, 1.0);
        assert!(pts.contains(&DVec2::new(20.0, 0.0)));
        assert_eq!(pts.first(), Some(&DVec2::ZERO));
        assert_eq!(pts.last(), Some(&DVec2::new(20.0, 20.0)));
    }

    #[test]
    fn short_polylines_are_untouched() {
        let mut pts = vec![DVec2::ZERO, DVec2::new(0.1, 0.0)];
        simplify(&mut pts, 1.0, 100.0);
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn closed_loops_keep_their_shared_endpoint() {
        let mut pts: Vec<DVec2> = (0..64)
            .map(|i| {
                let a = i as f64 / 64.0 * std::f64::consts::TAU;
                DVec2::new(a.cos(), a.sin()) * 50.0
            })
            .collect();
        pts.push(pts[0]);
        simplify(&mut pts, 0.5, 4.0);
        assert_eq!(pts.first(), pts.last());
        assert!(pts.len() > 4);
    }

    #[test]
    fn simplification_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..50 {
            let mut pos = DVec2::ZERO;
            let mut heading: f64 = 0.0;
            let mut pts = vec![pos];
            for _ in 0..200 {
                heading += (rand01(&mut rng) - 0.5) * 0.4;
                pos += DVec2::new(heading.cos(), heading.sin()) * (0.5 + rand01(&mut rng));
                pts.push(pos);
            }

            simplify(&mut pts, 0.5, 9.0);
            let once = pts.clone();
            simplify(&mut pts, 0.5, 9.0);
            assert_eq!(pts, once);
        }
    }

    #[test]
    #[should_panic(expected = "epsilon must be > 0")]
    fn non_positive_epsilon_is_a_contract_violation() {
        let mut pts = vec![DVec2::ZERO; 4];
        simplify(&mut pts, 0.0, 1.0);
    }
}

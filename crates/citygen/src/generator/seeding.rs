//! Seed candidates for new streamlines.
use std::collections::VecDeque;

use glam::DVec2;
use rand::RngCore;

use crate::field::Eigenfield;
use crate::storage::Aabb;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniformly random point inside `bbox`.
pub(crate) fn random_point_in(bbox: &Aabb, rng: &mut dyn RngCore) -> DVec2 {
    DVec2::new(
        rand01(rng) * bbox.width() + bbox.min.x,
        rand01(rng) * bbox.height() + bbox.min.y,
    )
}

/// FIFO queues of candidate seeds, one per eigenfield.
#[derive(Clone, Debug, Default)]
pub struct SeedQueues {
    queues: [VecDeque<DVec2>; Eigenfield::COUNT],
}

impl SeedQueues {
    pub fn push(&mut self, pos: DVec2, ef: Eigenfield) {
        self.queues[ef.index()].push_back(pos);
    }

    pub fn pop(&mut self, ef: Eigenfield) -> Option<DVec2> {
        self.queues[ef.index()].pop_front()
    }

    pub fn len(&self, ef: Eigenfield) -> usize {
        self.queues[ef.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    pub fn clear(&mut self) {
        self.queues.iter_mut().for_each(VecDeque::clear);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct FixedRng {
        value: u64,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.value
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
        }
    }

    #[test]
    fn rand01_stays_below_one() {
        assert_eq!(rand01(&mut FixedRng { value: 0 }), 0.0);
        let top = rand01(&mut FixedRng { value: u64::MAX });
        assert!(top < 1.0);
        assert!(top > 0.999_999);
    }

    #[test]
    fn random_points_fall_inside_the_box() {
        let mut rng = StdRng::seed_from_u64(5);
        let bbox = Aabb::new(DVec2::new(-10.0, 100.0), DVec2::new(10.0, 140.0));
        for _ in 0..1000 {
            assert!(bbox.contains(random_point_in(&bbox, &mut rng)));
        }
    }

    #[test]
    fn queues_are_fifo_per_eigenfield() {
        let mut seeds = SeedQueues::default();
        seeds.push(DVec2::new(1.0, 0.0), Eigenfield::Major);
        seeds.push(DVec2::new(2.0, 0.0), Eigenfield::Major);
        seeds.push(DVec2::new(3.0, 0.0), Eigenfield::Minor);

        assert_eq!(seeds.len(Eigenfield::Major), 2);
        assert_eq!(seeds.pop(Eigenfield::Major), Some(DVec2::new(1.0, 0.0)));
        assert_eq!(seeds.pop(Eigenfield::Minor), Some(DVec2::new(3.0, 0.0)));
        assert_eq!(seeds.pop(Eigenfield::Minor), None);

        seeds.clear();
        assert!(seeds.is_empty());
    }
}

//! Point and road storage backed by a masked region quadtree.
//!
//! [`RoadStorage`] keeps an append-only array of points. Each road is a half-open range
//! into that array, filed under its [`RoadType`] and [`Eigenfield`]. Every inserted point
//! is also bucketed into a [`QuadTree`], which answers "is there / which are the points of
//! these eigenfields within this circle or box" queries. Nothing is ever removed; the
//! storage is cleared as a whole with [`RoadStorage::reset`] before a generation pass.
use glam::{DVec2, Vec2};
use tracing::warn;

pub mod bbox;
pub mod quadtree;

pub use bbox::Aabb;
pub use quadtree::{NodeId, QuadNode, QuadTree};

use crate::field::{Eigenfield, EigenfieldMask};
use crate::generator::params::RoadType;

/// Identifies a road by category, eigenfield and position in that list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoadHandle {
    pub index: u32,
    pub road_type: RoadType,
    pub eigenfield: Eigenfield,
}

/// Identifies a stored point and the road it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointHandle {
    pub index: u32,
    pub road: RoadHandle,
}

impl PointHandle {
    #[inline]
    pub fn eigenfield(&self) -> Eigenfield {
        self.road.eigenfield
    }
}

/// Half-open index range `[begin, end)` into point storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Road {
    pub begin: u32,
    pub end: u32,
    /// Synthetic straight segment produced by the joining pass.
    pub is_joining_road: bool,
}

impl Road {
    pub fn len(&self) -> usize {
        (self.end - self.begin) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

#[derive(Clone, Debug)]
pub struct RoadStorage {
    viewport: Aabb,
    points: Vec<DVec2>,
    /// `f32` copy of `points` handed out to renderers.
    fpoints: Vec<Vec2>,
    roads: [[Vec<Road>; Eigenfield::COUNT]; RoadType::COUNT],
    tree: QuadTree,
}

impl RoadStorage {
    pub fn new(viewport: Aabb) -> Self {
        Self::with_limits(
            viewport,
            QuadTree::DEFAULT_MAX_DEPTH,
            QuadTree::DEFAULT_LEAF_CAPACITY,
        )
    }

    pub fn with_limits(viewport: Aabb, max_depth: usize, leaf_capacity: usize) -> Self {
        Self {
            viewport,
            points: Vec::new(),
            fpoints: Vec::new(),
            roads: Default::default(),
            tree: QuadTree::with_limits(viewport, max_depth, leaf_capacity),
        }
    }

    /// Discard all points, roads and tree nodes and adopt `viewport`.
    pub fn reset(&mut self, viewport: Aabb) {
        self.viewport = viewport;
        self.points.clear();
        self.fpoints.clear();
        self.roads.iter_mut().flatten().for_each(Vec::clear);
        self.tree.reset(viewport);
    }

    pub fn viewport(&self) -> Aabb {
        self.viewport
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Append `points` as a new road. Returns `None` for an empty polyline.
    ///
    /// Points should lie inside the viewport; points outside it are stored and rendered
    /// but proximity queries are not guaranteed to find them.
    pub fn insert(
        &mut self,
        points: &[DVec2],
        road_type: RoadType,
        eigenfield: Eigenfield,
        is_joining_road: bool,
    ) -> Option<RoadHandle> {
        if points.is_empty() {
            return None;
        }

        let outside = points.iter().filter(|p| !self.viewport.contains(**p)).count();
        if outside > 0 {
            warn!(
                "Inserting {:?}/{:?} road with {} of {} points outside the viewport.",
                road_type,
                eigenfield,
                outside,
                points.len()
            );
        }

        let begin = self.points.len() as u32;
        let end = begin + points.len() as u32;
        let list = &mut self.roads[road_type.index()][eigenfield.index()];
        let handle = RoadHandle {
            index: list.len() as u32,
            road_type,
            eigenfield,
        };
        list.push(Road {
            begin,
            end,
            is_joining_road,
        });

        self.points.extend_from_slice(points);
        self.fpoints.extend(points.iter().map(|p| p.as_vec2()));

        let batch = (begin..end)
            .map(|index| PointHandle {
                index,
                road: handle,
            })
            .collect();
        self.tree.insert(&self.points, batch);

        Some(handle)
    }

    pub fn road(&self, handle: RoadHandle) -> &Road {
        &self.roads[handle.road_type.index()][handle.eigenfield.index()][handle.index as usize]
    }

    #[inline]
    pub fn position(&self, handle: PointHandle) -> DVec2 {
        self.points[handle.index as usize]
    }

    /// Renderable points of a road.
    pub fn get_road_points(&self, handle: RoadHandle) -> &[Vec2] {
        let road = self.road(handle);
        &self.fpoints[road.begin as usize..road.end as usize]
    }

    /// Renderable points of a road as `mint` vectors, for consumers not built on glam.
    pub fn road_polyline(&self, handle: RoadHandle) -> Vec<mint::Vector2<f32>> {
        self.get_road_points(handle)
            .iter()
            .map(|p| (*p).into())
            .collect()
    }

    /// Full precision points of a road.
    pub fn road_points(&self, handle: RoadHandle) -> &[DVec2] {
        let road = self.road(handle);
        &self.points[road.begin as usize..road.end as usize]
    }

    pub fn road_count(&self, road_type: RoadType, eigenfield: Eigenfield) -> u32 {
        self.roads[road_type.index()][eigenfield.index()].len() as u32
    }

    /// Handles of every road of one category and eigenfield, in insertion order.
    pub fn road_handles(
        &self,
        road_type: RoadType,
        eigenfield: Eigenfield,
    ) -> impl Iterator<Item = RoadHandle> {
        (0..self.road_count(road_type, eigenfield)).map(move |index| RoadHandle {
            index,
            road_type,
            eigenfield,
        })
    }

    pub fn is_connective_road(&self, handle: RoadHandle) -> bool {
        self.road(handle).is_joining_road
    }

    pub fn has_nearby_point(
        &self,
        centre: DVec2,
        radius: f64,
        eigenfields: impl Into<EigenfieldMask>,
    ) -> bool {
        self.tree
            .any_in_circle(&self.points, centre, radius, eigenfields.into())
    }

    /// Like [`RoadStorage::has_nearby_point`] but ignores points exactly `radius` away.
    pub fn has_point_closer_than(
        &self,
        centre: DVec2,
        radius: f64,
        eigenfields: impl Into<EigenfieldMask>,
    ) -> bool {
        self.tree
            .any_closer_than(&self.points, centre, radius, eigenfields.into())
    }

    pub fn nearby_points(
        &self,
        centre: DVec2,
        radius: f64,
        eigenfields: impl Into<EigenfieldMask>,
    ) -> Vec<PointHandle> {
        self.tree
            .collect_in_circle(&self.points, centre, radius, eigenfields.into())
    }

    pub fn has_point_in_box(&self, bbox: Aabb, eigenfields: impl Into<EigenfieldMask>) -> bool {
        self.tree.any_in_box(&self.points, bbox, eigenfields.into())
    }

    pub fn points_in_box(
        &self,
        bbox: Aabb,
        eigenfields: impl Into<EigenfieldMask>,
    ) -> Vec<PointHandle> {
        self.tree
            .collect_in_box(&self.points, bbox, eigenfields.into())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::generator::seeding::rand01;

    fn viewport() -> Aabb {
        Aabb::new(DVec2::ZERO, DVec2::new(1920.0, 1080.0))
    }

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    /// Fill storage with 1000 points spread over random roads.
    fn random_storage(rng: &mut StdRng) -> (RoadStorage, Vec<(DVec2, Eigenfield)>) {
        let vp = viewport();
        let mut storage = RoadStorage::new(vp);
        let mut all = Vec::new();
        while all.len() < 1000 {
            let n = 1 + (rand01(rng) * 30.0) as usize;
            let n = n.min(1000 - all.len());
            let ef = if rand01(rng) < 0.5 {
                Eigenfield::Major
            } else {
                Eigenfield::Minor
            };
            let road_type = RoadType::ALL[(rand01(rng) * 3.0) as usize % 3];
            let pts: Vec<DVec2> = (0..n)
                .map(|_| DVec2::new(rand01(rng) * vp.width(), rand01(rng) * vp.height()))
                .collect();
            storage.insert(&pts, road_type, ef, false);
            all.extend(pts.into_iter().map(|p| (p, ef)));
        }
        (storage, all)
    }

    fn random_mask(rng: &mut StdRng) -> EigenfieldMask {
        match (rand01(rng) * 3.0) as usize {
            0 => Eigenfield::Major.mask(),
            1 => Eigenfield::Minor.mask(),
            _ => EigenfieldMask::ALL,
        }
    }

    #[test]
    fn circle_queries_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(0xC17);
        let (storage, all) = random_storage(&mut rng);

        for _ in 0..100 {
            let centre = DVec2::new(rand01(&mut rng) * 2000.0 - 40.0, rand01(&mut rng) * 1200.0 - 60.0);
            let radius = rand01(&mut rng) * 300.0;
            let mask = random_mask(&mut rng);

            let expected: Vec<u32> = all
                .iter()
                .enumerate()
                .filter(|(_, (p, ef))| {
                    mask.contains(*ef) && p.distance_squared(centre) <= radius * radius
                })
                .map(|(i, _)| i as u32)
                .collect();
            let got: Vec<u32> = storage
                .nearby_points(centre, radius, mask)
                .into_iter()
                .map(|h| h.index)
                .collect();

            assert_eq!(sorted(got), expected);
            assert_eq!(storage.has_nearby_point(centre, radius, mask), !expected.is_empty());
        }
    }

    #[test]
    fn box_queries_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(0xB0C5);
        let (storage, all) = random_storage(&mut rng);

        for _ in 0..100 {
            let min = DVec2::new(rand01(&mut rng) * 1900.0, rand01(&mut rng) * 1000.0);
            let bbox = Aabb::new(min, min + DVec2::new(rand01(&mut rng) * 400.0, rand01(&mut rng) * 400.0));
            let mask = random_mask(&mut rng);

            let expected: Vec<u32> = all
                .iter()
                .enumerate()
                .filter(|(_, (p, ef))| mask.contains(*ef) && bbox.contains(*p))
                .map(|(i, _)| i as u32)
                .collect();
            let got: Vec<u32> = storage
                .points_in_box(bbox, mask)
                .into_iter()
                .map(|h| h.index)
                .collect();

            assert_eq!(sorted(got), expected);
            assert_eq!(storage.has_point_in_box(bbox, mask), !expected.is_empty());
        }
    }

    #[test]
    fn roads_are_contiguous_and_monotonic() {
        let mut storage = RoadStorage::new(viewport());
        let a = storage
            .insert(&[DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0)], RoadType::Main, Eigenfield::Major, false)
            .expect("non-empty road");
        let b = storage
            .insert(&[DVec2::new(3.0, 3.0)], RoadType::Main, Eigenfield::Major, true)
            .expect("non-empty road");
        let c = storage
            .insert(&[DVec2::new(4.0, 4.0); 3], RoadType::SideStreet, Eigenfield::Minor, false)
            .expect("non-empty road");

        assert_eq!(storage.road(a), &Road { begin: 0, end: 2, is_joining_road: false });
        assert_eq!(storage.road(b), &Road { begin: 2, end: 3, is_joining_road: true });
        assert_eq!(storage.road(c).len(), 3);
        assert_eq!((a.index, b.index, c.index), (0, 1, 0));

        assert_eq!(storage.road_count(RoadType::Main, Eigenfield::Major), 2);
        assert_eq!(storage.road_count(RoadType::Main, Eigenfield::Minor), 0);
        assert!(storage.is_connective_road(b));
        assert!(!storage.is_connective_road(a));
        assert_eq!(storage.get_road_points(a), &[Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)]);
        assert_eq!(storage.road_points(c), &[DVec2::new(4.0, 4.0); 3]);
        let polyline = storage.road_polyline(a);
        assert_eq!((polyline[1].x, polyline[1].y), (2.0, 2.0));
        assert_eq!(storage.road_handles(RoadType::Main, Eigenfield::Major).count(), 2);
    }

    #[test]
    fn circle_radius_is_inclusive_unless_strict() {
        let mut storage = RoadStorage::new(viewport());
        storage.insert(&[DVec2::new(100.0, 100.0)], RoadType::Main, Eigenfield::Major, false);

        let on_boundary = DVec2::new(120.0, 100.0);
        assert!(storage.has_nearby_point(on_boundary, 20.0, Eigenfield::Major));
        assert_eq!(storage.nearby_points(on_boundary, 20.0, Eigenfield::Major).len(), 1);
        assert!(!storage.has_point_closer_than(on_boundary, 20.0, Eigenfield::Major));
        assert!(storage.has_point_closer_than(DVec2::new(119.5, 100.0), 20.0, Eigenfield::Major));
        assert!(!storage.has_point_closer_than(DVec2::new(119.5, 100.0), 20.0, Eigenfield::Minor));
    }

    #[test]
    fn strict_circle_queries_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5791C7);
        let (storage, all) = random_storage(&mut rng);

        for _ in 0..100 {
            let centre = DVec2::new(rand01(&mut rng) * 1920.0, rand01(&mut rng) * 1080.0);
            let radius = rand01(&mut rng) * 200.0;
            let mask = random_mask(&mut rng);
            let expected = all
                .iter()
                .any(|(p, ef)| mask.contains(*ef) && p.distance_squared(centre) < radius * radius);
            assert_eq!(storage.has_point_closer_than(centre, radius, mask), expected);
        }
    }

    #[test]
    fn empty_roads_are_not_stored() {
        let mut storage = RoadStorage::new(viewport());
        assert!(storage.insert(&[], RoadType::Main, Eigenfield::Major, false).is_none());
        assert_eq!(storage.road_count(RoadType::Main, Eigenfield::Major), 0);
    }

    #[test]
    fn reset_discards_everything() {
        let mut storage = RoadStorage::new(viewport());
        storage.insert(&[DVec2::new(10.0, 10.0)], RoadType::HighStreet, Eigenfield::Minor, false);
        let new_vp = Aabb::new(DVec2::splat(-50.0), DVec2::splat(50.0));
        storage.reset(new_vp);

        assert_eq!(storage.point_count(), 0);
        assert_eq!(storage.road_count(RoadType::HighStreet, Eigenfield::Minor), 0);
        assert_eq!(storage.viewport(), new_vp);
        assert_eq!(storage.tree().nodes().len(), 1);
        assert!(!storage.has_nearby_point(DVec2::new(10.0, 10.0), 5.0, EigenfieldMask::ALL));
    }
}

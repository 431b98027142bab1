//! Arena-backed region quadtree over point handles.
//!
//! Nodes live in a single `Vec` and refer to their children by [`NodeId`]; absent
//! children are [`NodeId::NULL`]. Nodes are never removed: the whole tree is rebuilt
//! through [`QuadTree::reset`]. Point positions are not owned by the tree; every
//! operation takes the backing position slice that [`PointHandle::index`] points into.
use glam::DVec2;

use crate::field::EigenfieldMask;
use crate::storage::bbox::Aabb;
use crate::storage::PointHandle;

/// Handle of a node in the quadtree arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const NULL: NodeId = NodeId(u32::MAX);
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self == NodeId::NULL
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct QuadNode {
    pub bbox: Aabb,
    /// Point handles stored at this node. Only leaves hold data.
    pub data: Vec<PointHandle>,
    pub children: [NodeId; 4],
    /// Eigenfields present anywhere beneath this node.
    pub eigenfields: EigenfieldMask,
}

impl QuadNode {
    fn new(bbox: Aabb, eigenfields: EigenfieldMask) -> Self {
        Self {
            bbox,
            data: Vec::new(),
            children: [NodeId::NULL; 4],
            eigenfields,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_null())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QueryMode {
    FirstHit,
    CollectAll,
}

struct BoxQuery {
    mask: EigenfieldMask,
    mode: QueryMode,
    bbox: Aabb,
    harvest: Vec<PointHandle>,
}

impl BoxQuery {
    fn new(bbox: Aabb, mask: EigenfieldMask, mode: QueryMode) -> Self {
        Self {
            mask,
            mode,
            bbox,
            harvest: Vec::new(),
        }
    }
}

struct CircleQuery {
    /// Carries the inscribed box of the circle, every point inside it is inside the circle.
    inner: BoxQuery,
    centre: DVec2,
    radius2: f64,
    outer: Aabb,
    /// Points exactly on the circle do not match.
    strict: bool,
}

impl CircleQuery {
    fn new(centre: DVec2, radius: f64, mask: EigenfieldMask, mode: QueryMode) -> Self {
        let inscribed = radius / std::f64::consts::SQRT_2;
        Self {
            inner: BoxQuery::new(Aabb::around(centre, inscribed), mask, mode),
            centre,
            radius2: radius * radius,
            outer: Aabb::around(centre, radius),
            strict: false,
        }
    }

    fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    #[inline]
    fn matches(&self, p: DVec2) -> bool {
        let d2 = self.centre.distance_squared(p);
        if self.strict {
            d2 < self.radius2
        } else {
            d2 <= self.radius2
        }
    }
}

/// Region quadtree with per-node eigenfield masks.
#[derive(Clone, Debug)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    max_depth: usize,
    leaf_capacity: usize,
}

impl QuadTree {
    pub const DEFAULT_MAX_DEPTH: usize = 10;
    pub const DEFAULT_LEAF_CAPACITY: usize = 10;

    pub fn new(bbox: Aabb) -> Self {
        Self::with_limits(bbox, Self::DEFAULT_MAX_DEPTH, Self::DEFAULT_LEAF_CAPACITY)
    }

    pub fn with_limits(bbox: Aabb, max_depth: usize, leaf_capacity: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            max_depth,
            leaf_capacity,
        };
        tree.reset(bbox);
        tree
    }

    /// Drop every node and start over with an empty root covering `bbox`.
    pub fn reset(&mut self, bbox: Aabb) {
        self.nodes.clear();
        self.nodes.push(QuadNode::new(bbox, EigenfieldMask::NONE));
    }

    pub fn bbox(&self) -> Aabb {
        self.nodes[NodeId::ROOT.index()].bbox
    }

    pub fn node(&self, id: NodeId) -> &QuadNode {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn leaf_capacity(&self) -> usize {
        self.leaf_capacity
    }

    /// Bucket a batch of handles into the tree.
    pub fn insert(&mut self, positions: &[DVec2], batch: Vec<PointHandle>) {
        if batch.is_empty() {
            return;
        }
        let mask = batch
            .iter()
            .fold(EigenfieldMask::NONE, |m, h| m | h.eigenfield().mask());
        self.insert_rec(positions, 0, NodeId::ROOT, mask, batch);
    }

    fn insert_rec(
        &mut self,
        positions: &[DVec2],
        depth: usize,
        id: NodeId,
        mask: EigenfieldMask,
        mut batch: Vec<PointHandle>,
    ) {
        let node = &mut self.nodes[id.index()];

        if depth >= self.max_depth {
            node.eigenfields |= mask;
            node.data.append(&mut batch);
            return;
        }

        if node.is_leaf() {
            if node.data.len() + batch.len() <= self.leaf_capacity {
                node.eigenfields |= mask;
                node.data.append(&mut batch);
                return;
            }
            batch.append(&mut node.data);
        }

        node.eigenfields |= mask;
        let bbox = node.bbox;
        let quadrants = bbox.quadrants();

        for (q, (sub_mask, sub_batch)) in partition(&bbox, positions, batch).into_iter().enumerate() {
            if sub_batch.is_empty() {
                continue;
            }

            let mut child = self.nodes[id.index()].children[q];
            if child.is_null() {
                child = NodeId(self.nodes.len() as u32);
                self.nodes.push(QuadNode::new(quadrants[q], sub_mask));
                self.nodes[id.index()].children[q] = child;
            }

            self.insert_rec(positions, depth + 1, child, sub_mask, sub_batch);
        }
    }

    pub fn any_in_circle(
        &self,
        positions: &[DVec2],
        centre: DVec2,
        radius: f64,
        mask: EigenfieldMask,
    ) -> bool {
        let mut query = CircleQuery::new(centre, radius, mask, QueryMode::FirstHit);
        self.circle_rec(positions, NodeId::ROOT, &mut query)
    }

    /// First-hit circle query that excludes points exactly `radius` away.
    pub fn any_closer_than(
        &self,
        positions: &[DVec2],
        centre: DVec2,
        radius: f64,
        mask: EigenfieldMask,
    ) -> bool {
        let mut query = CircleQuery::new(centre, radius, mask, QueryMode::FirstHit).strict();
        self.circle_rec(positions, NodeId::ROOT, &mut query)
    }

    pub fn collect_in_circle(
        &self,
        positions: &[DVec2],
        centre: DVec2,
        radius: f64,
        mask: EigenfieldMask,
    ) -> Vec<PointHandle> {
        let mut query = CircleQuery::new(centre, radius, mask, QueryMode::CollectAll);
        self.circle_rec(positions, NodeId::ROOT, &mut query);
        query.inner.harvest
    }

    pub fn any_in_box(&self, positions: &[DVec2], bbox: Aabb, mask: EigenfieldMask) -> bool {
        let mut query = BoxQuery::new(bbox, mask, QueryMode::FirstHit);
        self.box_rec(positions, NodeId::ROOT, &mut query)
    }

    pub fn collect_in_box(
        &self,
        positions: &[DVec2],
        bbox: Aabb,
        mask: EigenfieldMask,
    ) -> Vec<PointHandle> {
        let mut query = BoxQuery::new(bbox, mask, QueryMode::CollectAll);
        self.box_rec(positions, NodeId::ROOT, &mut query);
        query.harvest
    }

    fn circle_rec(&self, positions: &[DVec2], id: NodeId, query: &mut CircleQuery) -> bool {
        let node = &self.nodes[id.index()];

        if !node.eigenfields.intersects(query.inner.mask) || !query.outer.intersects(&node.bbox) {
            return false;
        }

        // The inscribed box touches the circle at its corners, so strict queries test every point.
        if !query.strict && query.inner.bbox.contains_box(&node.bbox) {
            return self.box_rec(positions, id, &mut query.inner);
        }

        let mut found = false;

        if node.is_leaf() {
            for &handle in &node.data {
                if !query.inner.mask.contains(handle.eigenfield()) {
                    continue;
                }
                if !query.matches(positions[handle.index as usize]) {
                    continue;
                }
                match query.inner.mode {
                    QueryMode::FirstHit => return true,
                    QueryMode::CollectAll => {
                        query.inner.harvest.push(handle);
                        found = true;
                    }
                }
            }
            return found;
        }

        for child in node.children {
            if child.is_null() {
                continue;
            }
            if self.circle_rec(positions, child, query) {
                if query.inner.mode == QueryMode::FirstHit {
                    return true;
                }
                found = true;
            }
        }

        found
    }

    fn box_rec(&self, positions: &[DVec2], id: NodeId, query: &mut BoxQuery) -> bool {
        let node = &self.nodes[id.index()];

        if !node.eigenfields.intersects(query.mask) || !query.bbox.intersects(&node.bbox) {
            return false;
        }

        let enclosed = query.bbox.contains_box(&node.bbox);
        let mut found = false;

        if node.is_leaf() {
            for &handle in &node.data {
                if !query.mask.contains(handle.eigenfield()) {
                    continue;
                }
                if !enclosed && !query.bbox.contains(positions[handle.index as usize]) {
                    continue;
                }
                match query.mode {
                    QueryMode::FirstHit => return true,
                    QueryMode::CollectAll => {
                        query.harvest.push(handle);
                        found = true;
                    }
                }
            }
            return found;
        }

        for child in node.children {
            if child.is_null() {
                continue;
            }
            if self.box_rec(positions, child, query) {
                if query.mode == QueryMode::FirstHit {
                    return true;
                }
                found = true;
            }
        }

        found
    }
}

/// Split `batch` by quadrant of `bbox`, also returning each quadrant's eigenfield mask.
fn partition(
    bbox: &Aabb,
    positions: &[DVec2],
    batch: Vec<PointHandle>,
) -> [(EigenfieldMask, Vec<PointHandle>); 4] {
    let mut out: [(EigenfieldMask, Vec<PointHandle>); 4] = Default::default();
    for handle in batch {
        let q = bbox.quadrant_of(positions[handle.index as usize]);
        out[q].0 |= handle.eigenfield().mask();
        out[q].1.push(handle);
    }
    out
}

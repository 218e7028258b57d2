//! R-tree over obstacle edges.
//!
//! Each obstacle record contributes the edge from its vertex to the next
//! vertex on the ring.  The tree stores edge bounding boxes in raw scaled
//! integer coordinates, so `rstar` only ever compares integers and the
//! candidate set is exact.  Every candidate is then tested with the
//! fixed-point predicates before it is accepted.

use rstar::{AABB, RTree, RTreeObject};

use orca_core::{ObstacleId, ObstacleStore};
use orca_fixed::{Fixed, FixedVector2, left_of};

use crate::geometry::{dist_sq_point_segment, dist_sq_segment_segment};
use crate::{ObstacleNeighbors, SpatialResult, insert_obstacle_neighbor};

// ── R-tree edge entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct EdgeEntry {
    id: ObstacleId,
    envelope: AABB<[i64; 2]>,
}

impl RTreeObject for EdgeEntry {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn raw(p: FixedVector2) -> [i64; 2] {
    [p.x.raw(), p.y.raw()]
}

/// Box around `a–b` grown by `margin` on every side.
fn padded_box(a: FixedVector2, b: FixedVector2, margin: Fixed) -> AABB<[i64; 2]> {
    let m = margin.abs().raw();
    let lo = [a.x.min(b.x).raw().saturating_sub(m), a.y.min(b.y).raw().saturating_sub(m)];
    let hi = [a.x.max(b.x).raw().saturating_add(m), a.y.max(b.y).raw().saturating_add(m)];
    AABB::from_corners(lo, hi)
}

// ── ObstacleTree ──────────────────────────────────────────────────────────────

/// Static obstacle index.  Built once per change of the obstacle set.
pub struct ObstacleTree {
    tree: RTree<EdgeEntry>,
}

impl Default for ObstacleTree {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl ObstacleTree {
    /// Bulk-load every edge in `store`.
    pub fn build(store: &ObstacleStore) -> SpatialResult<Self> {
        let mut entries = Vec::with_capacity(store.len());
        for o in store.iter() {
            let next = store.obstacle(o.next)?;
            entries.push(EdgeEntry { id: o.id, envelope: padded_box(o.point, next.point, Fixed::ZERO) });
        }
        Ok(Self { tree: RTree::bulk_load(entries) })
    }

    /// Number of indexed edges.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Edges whose bounding box touches the box around `a–b` grown by
    /// `margin`, in ascending id order.
    fn candidates(&self, a: FixedVector2, b: FixedVector2, margin: Fixed) -> Vec<ObstacleId> {
        let query = padded_box(a, b, margin);
        let mut ids: Vec<ObstacleId> =
            self.tree.locate_in_envelope_intersecting(&query).map(|e| e.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Append to `out` every edge within `range` of `position` that the
    /// agent sees from its outer side (strictly right of the directed edge),
    /// keeping `out` sorted nearest first.
    ///
    /// Edges at equal distance are found in ascending `ObstacleId` order.
    pub fn query(
        &self,
        store: &ObstacleStore,
        position: FixedVector2,
        range: Fixed,
        out: &mut ObstacleNeighbors,
    ) -> SpatialResult<()> {
        let range_sq = range * range;
        for id in self.candidates(position, position, range) {
            let o1 = store.obstacle(id)?;
            let o2 = store.obstacle(o1.next)?;
            if !left_of(o1.point, o2.point, position).is_negative() {
                continue;
            }
            let dist_sq = dist_sq_point_segment(o1.point, o2.point, position)?;
            if dist_sq < range_sq {
                insert_obstacle_neighbor(out, dist_sq, id);
            }
        }
        Ok(())
    }

    /// `true` if a disc of `radius` can travel from `q1` to `q2` without
    /// touching any obstacle edge.
    pub fn query_visibility(
        &self,
        store: &ObstacleStore,
        q1: FixedVector2,
        q2: FixedVector2,
        radius: Fixed,
    ) -> SpatialResult<bool> {
        let radius_sq = radius * radius;
        for id in self.candidates(q1, q2, radius) {
            let o1 = store.obstacle(id)?;
            let o2 = store.obstacle(o1.next)?;
            let dist_sq = dist_sq_segment_segment(q1, q2, o1.point, o2.point)?;
            if dist_sq.is_zero() || dist_sq < radius_sq {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

//! k-d tree over agent positions.
//!
//! # Layout
//!
//! Agents are copied into a flat array and partitioned in place.  Node `n`
//! covers `agents[begin..end]`; its children sit at `n + 1` (left) and
//! `n + 2·(split − begin)` (right), so the whole tree lives in one
//! `Vec<Node>` of `2·len − 1` entries and nothing is boxed.
//!
//! # Canonical input
//!
//! Before building, the snapshot is sorted by `(x, y, id)`.  The tree shape,
//! and therefore the discovery order of equidistant neighbours, depends only
//! on the set of positions and not on the order agents were added in.

use orca_core::AgentId;
use orca_fixed::{Fixed, FixedVector2};

use crate::AgentNeighbors;

/// Nodes with at most this many agents are scanned linearly.
pub const MAX_LEAF_SIZE: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct TreeAgent {
    id: AgentId,
    position: FixedVector2,
}

#[derive(Copy, Clone, Debug, Default)]
struct Node {
    begin: usize,
    end: usize,
    left: usize,
    right: usize,
    min: FixedVector2,
    max: FixedVector2,
}

impl Node {
    /// Squared distance from `p` to this node's bounding box (zero inside).
    fn dist_sq_to(&self, p: FixedVector2) -> Fixed {
        let sq = |v: Fixed| v * v;
        sq((self.min.x - p.x).max(Fixed::ZERO))
            + sq((p.x - self.max.x).max(Fixed::ZERO))
            + sq((self.min.y - p.y).max(Fixed::ZERO))
            + sq((p.y - self.max.y).max(Fixed::ZERO))
    }
}

/// Agent index.  Rebuilt from scratch every step; the allocations are reused.
#[derive(Clone, Debug, Default)]
pub struct AgentTree {
    agents: Vec<TreeAgent>,
    nodes: Vec<Node>,
}

impl AgentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Replace the indexed set with `agents`.
    pub fn rebuild<I>(&mut self, agents: I)
    where
        I: IntoIterator<Item = (AgentId, FixedVector2)>,
    {
        self.agents.clear();
        self.agents.extend(agents.into_iter().map(|(id, position)| TreeAgent { id, position }));
        self.agents.sort_unstable_by(|a, b| {
            (a.position.x, a.position.y, a.id).cmp(&(b.position.x, b.position.y, b.id))
        });

        self.nodes.clear();
        if self.agents.is_empty() {
            return;
        }
        self.nodes.resize(2 * self.agents.len() - 1, Node::default());
        self.build_recursive(0, self.agents.len(), 0);
    }

    fn build_recursive(&mut self, begin: usize, end: usize, node: usize) {
        let mut min = self.agents[begin].position;
        let mut max = min;
        for a in &self.agents[begin + 1..end] {
            min.x = min.x.min(a.position.x);
            max.x = max.x.max(a.position.x);
            min.y = min.y.min(a.position.y);
            max.y = max.y.max(a.position.y);
        }
        self.nodes[node] = Node { begin, end, left: 0, right: 0, min, max };

        if end - begin <= MAX_LEAF_SIZE {
            return;
        }

        let vertical = max.x - min.x > max.y - min.y;
        let axis = |p: FixedVector2| if vertical { p.x } else { p.y };
        let split = if vertical { (max.x + min.x) * Fixed::HALF } else { (max.y + min.y) * Fixed::HALF };

        let mut left = begin;
        let mut right = end;
        while left < right {
            while left < right && axis(self.agents[left].position) < split {
                left += 1;
            }
            while right > left && axis(self.agents[right - 1].position) >= split {
                right -= 1;
            }
            if left < right {
                self.agents.swap(left, right - 1);
                left += 1;
                right -= 1;
            }
        }
        // Every agent sat at or beyond the split value: force a non-empty
        // left half so the recursion terminates.
        if left == begin {
            left += 1;
        }

        let left_node = node + 1;
        let right_node = node + 2 * (left - begin);
        self.nodes[node].left = left_node;
        self.nodes[node].right = right_node;
        self.build_recursive(begin, left, left_node);
        self.build_recursive(left, end, right_node);
    }

    /// Collect the agents nearest to `position`, excluding `exclude`, into
    /// `out`, subject to `*range_sq`.
    ///
    /// `out` is not cleared.  `*range_sq` shrinks once `out` is full.
    pub fn query(&self, position: FixedVector2, exclude: AgentId, range_sq: &mut Fixed, out: &mut AgentNeighbors) {
        if self.nodes.is_empty() {
            return;
        }
        self.query_recursive(position, exclude, range_sq, out, 0);
    }

    fn query_recursive(
        &self,
        position: FixedVector2,
        exclude: AgentId,
        range_sq: &mut Fixed,
        out: &mut AgentNeighbors,
        node: usize,
    ) {
        let n = self.nodes[node];
        if n.end - n.begin <= MAX_LEAF_SIZE {
            for a in &self.agents[n.begin..n.end] {
                if a.id != exclude {
                    out.insert((position - a.position).abs_sq(), a.id, range_sq);
                }
            }
            return;
        }

        let dist_left = self.nodes[n.left].dist_sq_to(position);
        let dist_right = self.nodes[n.right].dist_sq_to(position);
        let (near, near_dist, far, far_dist) = if dist_left < dist_right {
            (n.left, dist_left, n.right, dist_right)
        } else {
            (n.right, dist_right, n.left, dist_left)
        };

        if near_dist < *range_sq {
            self.query_recursive(position, exclude, range_sq, out, near);
            if far_dist < *range_sq {
                self.query_recursive(position, exclude, range_sq, out, far);
            }
        }
    }
}

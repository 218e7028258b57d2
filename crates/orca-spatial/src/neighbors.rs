//! Sorted neighbour lists.
//!
//! Both lists are kept sorted by squared distance with a plain insertion
//! sort that compares with strict `<`, so an entry never overtakes an earlier
//! one at the same distance.

use orca_core::{AGENT_NEIGHBOR_CAPACITY, AgentId, ObstacleId};
use orca_fixed::Fixed;

/// Nearest-first list of at most `limit ≤ N` entries, stored inline.
#[derive(Clone, Debug)]
pub struct NeighborList<H, const N: usize> {
    entries: [(Fixed, H); N],
    len: usize,
    limit: usize,
}

/// The per-agent list of neighbouring agents.
pub type AgentNeighbors = NeighborList<AgentId, AGENT_NEIGHBOR_CAPACITY>;

/// The per-agent list of obstacle edges in range.  Unbounded.
pub type ObstacleNeighbors = Vec<(Fixed, ObstacleId)>;

impl<H: Copy + Default, const N: usize> NeighborList<H, N> {
    /// Empty list that keeps at most `limit` entries (clamped to `N`).
    pub fn new(limit: usize) -> Self {
        Self { entries: [(Fixed::ZERO, H::default()); N], len: 0, limit: limit.min(N) }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Change the bound.  Clears the list.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.min(N);
        self.len = 0;
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.limit
    }

    #[inline]
    pub fn as_slice(&self) -> &[(Fixed, H)] {
        &self.entries[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Fixed, H)> {
        self.as_slice().iter()
    }

    /// Offer a candidate at squared distance `dist_sq`.
    ///
    /// Accepted only if `dist_sq < *range_sq`.  When the list is full the
    /// farthest entry is dropped, and once full `*range_sq` shrinks to the
    /// farthest kept distance so the caller can prune the rest of its search.
    pub fn insert(&mut self, dist_sq: Fixed, handle: H, range_sq: &mut Fixed) {
        if self.limit == 0 || dist_sq >= *range_sq {
            return;
        }
        if self.len < self.limit {
            self.len += 1;
        }
        let mut i = self.len - 1;
        while i != 0 && dist_sq < self.entries[i - 1].0 {
            self.entries[i] = self.entries[i - 1];
            i -= 1;
        }
        self.entries[i] = (dist_sq, handle);
        if self.len == self.limit {
            *range_sq = self.entries[self.len - 1].0;
        }
    }
}

/// Insert into an unbounded obstacle list, keeping it sorted.
pub fn insert_obstacle_neighbor(list: &mut ObstacleNeighbors, dist_sq: Fixed, id: ObstacleId) {
    list.push((dist_sq, id));
    let mut i = list.len() - 1;
    while i != 0 && dist_sq < list[i - 1].0 {
        list[i] = list[i - 1];
        i -= 1;
    }
    list[i] = (dist_sq, id);
}

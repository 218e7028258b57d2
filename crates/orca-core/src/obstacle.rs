//! Static obstacles as rings of directed edges.
//!
//! Every vertex of a polygon becomes one `Obstacle` record: the vertex
//! position plus the unit direction of the edge leaving it.  Records of one
//! polygon are stored contiguously and linked into a ring through `next` /
//! `previous` indices, so walking the boundary never touches a pointer.
//!
//! Polygons are expected counter-clockwise; agents are then kept outside.
//! A clockwise ring is accepted and keeps agents inside it instead.  A
//! two-vertex obstacle is a double-sided wall segment.

use orca_fixed::{Fixed, FixedVector2, left_of};

use crate::{ObstacleId, OrcaError, OrcaResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Start vertex of the edge.
    pub point: FixedVector2,
    /// Unit vector from `point` toward the next vertex.
    pub direction: FixedVector2,
    pub next: ObstacleId,
    pub previous: ObstacleId,
    /// The interior angle at `point` is at most 180°.
    pub convex: bool,
}

/// Arena of obstacle vertices.  Append-only.
#[derive(Clone, Debug, Default)]
pub struct ObstacleStore {
    obstacles: Vec<Obstacle>,
    /// First vertex of every registered polygon, in registration order.
    polygons: Vec<ObstacleId>,
}

impl ObstacleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closed ring of `vertices`.  Returns the id of the first
    /// vertex.
    ///
    /// Fails without registering anything if there are fewer than two
    /// vertices, two consecutive vertices (nearly) coincide, or a ring of three or more
    /// vertices encloses no area.
    pub fn add_polygon(&mut self, vertices: &[FixedVector2]) -> OrcaResult<ObstacleId> {
        let n = vertices.len();
        if n < 2 {
            return Err(OrcaError::DegenerateObstacle(format!("needs at least 2 vertices, got {n}")));
        }
        if n > 2 && signed_area_doubled(vertices).is_zero() {
            return Err(OrcaError::DegenerateObstacle("vertices are collinear".into()));
        }

        let base = self.obstacles.len();
        if u32::try_from(base + n).is_err() {
            return Err(OrcaError::Config("obstacle arena full".into()));
        }
        let first = ObstacleId(base as u32);

        let mut ring = Vec::with_capacity(n);
        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;
            let edge = vertices[next] - vertices[i];
            // An edge shorter than ~0.004 squares to zero and could not be
            // projected onto.
            if edge.abs_sq().is_zero() {
                return Err(OrcaError::DegenerateObstacle(format!(
                    "vertices {i} and {next} coincide at {}",
                    vertices[i]
                )));
            }
            let convex =
                n == 2 || !left_of(vertices[prev], vertices[i], vertices[next]).is_negative();
            ring.push(Obstacle {
                id: ObstacleId((base + i) as u32),
                point: vertices[i],
                direction: edge.normalize()?,
                next: ObstacleId((base + next) as u32),
                previous: ObstacleId((base + prev) as u32),
                convex,
            });
        }

        self.obstacles.extend(ring);
        self.polygons.push(first);
        Ok(first)
    }

    pub fn obstacle(&self, id: ObstacleId) -> OrcaResult<&Obstacle> {
        self.obstacles.get(id.index()).ok_or(OrcaError::ObstacleNotFound(id))
    }

    /// The vertex following `id` on its ring.
    pub fn next(&self, id: ObstacleId) -> OrcaResult<&Obstacle> {
        let next = self.obstacle(id)?.next;
        self.obstacle(next)
    }

    /// The vertex preceding `id` on its ring.
    pub fn previous(&self, id: ObstacleId) -> OrcaResult<&Obstacle> {
        let previous = self.obstacle(id)?.previous;
        self.obstacle(previous)
    }

    /// Number of vertices (equivalently, edges).
    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

fn signed_area_doubled(vertices: &[FixedVector2]) -> Fixed {
    let n = vertices.len();
    (0..n).fold(Fixed::ZERO, |acc, i| acc + vertices[i].det(vertices[(i + 1) % n]))
}

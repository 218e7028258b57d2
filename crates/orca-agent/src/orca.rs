//! ORCA-line construction.
//!
//! An ORCA line is the boundary of the half-plane of velocities that keep an
//! agent clear of one neighbour for the relevant time horizon.  Obstacles are
//! static, so the agent takes all of the avoidance on itself.  Against
//! another agent it takes exactly half: the line passes through
//! `velocity + u/2`, where `u` is the smallest change in relative velocity
//! that leaves the velocity obstacle.
//!
//! # Geometry of the obstacle case
//!
//! ```text
//!          left leg          right leg
//!              \               /
//!               \  cutoff     /
//!    left cutoff ( ========== ) right cutoff
//!                o1         o2
//! ```
//!
//! The velocity obstacle of an edge is bounded by a cutoff segment between
//! the two vertex discs (scaled by `1/τ_obst`) and two legs tangent to those
//! discs.  The current velocity is projected onto whichever boundary piece is
//! nearest, and the line is laid along that piece.

use orca_core::{AgentId, Obstacle, ObstacleId, ObstacleStore};
use orca_fixed::{Fixed, FixedResult, FixedVector2};

use crate::{AgentResult, AgentSnapshot, Line};

/// The state of the agent a line is built for.
#[derive(Copy, Clone, Debug)]
pub struct Subject {
    pub id: AgentId,
    pub position: FixedVector2,
    pub velocity: FixedVector2,
    pub radius: Fixed,
}

/// `√max(x, 0)`.  Rounding can push a squared leg length a few raw units
/// below zero when the agent is exactly at the tangent distance.  Leg lengths
/// span many orders of magnitude, so the root is taken on a rescaled value.
fn sqrt_clamped(x: Fixed) -> FixedResult<Fixed> {
    x.max(Fixed::ZERO).sqrt_scaled()
}

/// Unit vector along `v`, or along `fallback` when `v` is zero.
fn unit_or(v: FixedVector2, fallback: FixedVector2) -> FixedResult<FixedVector2> {
    if v.is_zero() { fallback.normalize() } else { v.normalize() }
}

/// Direction of the tangent from the origin to the disc of `radius` around
/// `rel`, on its left side.  `leg = √(|rel|² − radius²)`.
fn left_leg(rel: FixedVector2, leg: Fixed, radius: Fixed, dist_sq: Fixed) -> FixedResult<FixedVector2> {
    FixedVector2::new(rel.x * leg - rel.y * radius, rel.x * radius + rel.y * leg).try_div(dist_sq)
}

/// Right-side counterpart of [`left_leg`].
fn right_leg(rel: FixedVector2, leg: Fixed, radius: Fixed, dist_sq: Fixed) -> FixedResult<FixedVector2> {
    FixedVector2::new(rel.x * leg + rel.y * radius, -rel.x * radius + rel.y * leg).try_div(dist_sq)
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// Append one line per obstacle edge in `neighbors` (nearest first) that is
/// not already covered by a line appended before it.
pub fn push_obstacle_lines(
    subject: &Subject,
    inv_time_horizon_obst: Fixed,
    neighbors: &[(Fixed, ObstacleId)],
    store: &ObstacleStore,
    lines: &mut Vec<Line>,
) -> AgentResult<()> {
    for &(_, id) in neighbors {
        let o1 = store.obstacle(id)?;
        let o2 = store.obstacle(o1.next)?;
        if let Some(line) = obstacle_line(subject, inv_time_horizon_obst, o1, o2, store, &lines[..])? {
            lines.push(line);
        }
    }
    Ok(())
}

fn obstacle_line(
    subject: &Subject,
    inv_tau: Fixed,
    edge_start: &Obstacle,
    edge_end: &Obstacle,
    store: &ObstacleStore,
    existing: &[Line],
) -> AgentResult<Option<Line>> {
    let radius = subject.radius;
    let rel1 = edge_start.point - subject.position;
    let rel2 = edge_end.point - subject.position;
    let scaled_radius = inv_tau * radius;

    // Both scaled endpoints on the permitted side of an earlier line: this
    // edge's velocity obstacle is already excluded.
    let covered = existing.iter().any(|line| {
        (rel1 * inv_tau - line.point).det(line.direction) - scaled_radius >= -Fixed::EPSILON
            && (rel2 * inv_tau - line.point).det(line.direction) - scaled_radius >= -Fixed::EPSILON
    });
    if covered {
        return Ok(None);
    }

    let dist_sq1 = rel1.abs_sq();
    let dist_sq2 = rel2.abs_sq();
    let radius_sq = radius * radius;

    let edge = edge_end.point - edge_start.point;
    let s = (-rel1).dot(edge).try_div(edge.abs_sq())?;
    let dist_sq_line = (-rel1 - edge * s).abs_sq();

    // ── Already overlapping ──────────────────────────────────────────────
    if s.is_negative() && dist_sq1 <= radius_sq {
        // Left vertex.  A reflex vertex is handled by its other edge.
        if !edge_start.convex {
            return Ok(None);
        }
        let direction = unit_or(rel1.perp_ccw(), -edge_start.direction)?;
        return Ok(Some(Line::through_origin(direction)));
    }
    if s > Fixed::ONE && dist_sq2 <= radius_sq {
        // Right vertex, unless the next edge will deal with it.
        if !(edge_end.convex && rel2.det(edge_end.direction) >= Fixed::ZERO) {
            return Ok(None);
        }
        let direction = unit_or(rel2.perp_ccw(), -edge_start.direction)?;
        return Ok(Some(Line::through_origin(direction)));
    }
    if !s.is_negative() && s < Fixed::ONE && dist_sq_line <= radius_sq {
        // The segment itself.
        return Ok(Some(Line::through_origin(-edge_start.direction)));
    }

    // ── Legs ─────────────────────────────────────────────────────────────
    let mut o1 = edge_start;
    let mut o2 = edge_end;
    let mut left_dir;
    let mut right_dir;

    if s.is_negative() && dist_sq_line <= radius_sq {
        // Seen obliquely: the left vertex alone shapes the obstacle.
        if !o1.convex {
            return Ok(None);
        }
        o2 = o1;
        let leg = sqrt_clamped(dist_sq1 - radius_sq)?;
        left_dir = left_leg(rel1, leg, radius, dist_sq1)?;
        right_dir = right_leg(rel1, leg, radius, dist_sq1)?;
    } else if s > Fixed::ONE && dist_sq_line <= radius_sq {
        // Seen obliquely: the right vertex alone shapes the obstacle.
        if !o2.convex {
            return Ok(None);
        }
        o1 = o2;
        let leg = sqrt_clamped(dist_sq2 - radius_sq)?;
        left_dir = left_leg(rel2, leg, radius, dist_sq2)?;
        right_dir = right_leg(rel2, leg, radius, dist_sq2)?;
    } else {
        left_dir = if o1.convex {
            let leg = sqrt_clamped(dist_sq1 - radius_sq)?;
            left_leg(rel1, leg, radius, dist_sq1)?
        } else {
            // Reflex left vertex: the leg continues the cutoff line.
            -o1.direction
        };
        right_dir = if o2.convex {
            let leg = sqrt_clamped(dist_sq2 - radius_sq)?;
            right_leg(rel2, leg, radius, dist_sq2)?
        } else {
            o1.direction
        };
    }

    // A leg of a convex vertex never points into the neighbouring edge; if it
    // would, that edge's direction is used and the leg is marked foreign.
    let left_neighbor = store.obstacle(o1.previous)?;
    let mut left_foreign = false;
    let mut right_foreign = false;
    if o1.convex && left_dir.det(-left_neighbor.direction) >= Fixed::ZERO {
        left_dir = -left_neighbor.direction;
        left_foreign = true;
    }
    if o2.convex && right_dir.det(o2.direction) <= Fixed::ZERO {
        right_dir = o2.direction;
        right_foreign = true;
    }

    // ── Project the current velocity ─────────────────────────────────────
    let left_cutoff = (o1.point - subject.position) * inv_tau;
    let right_cutoff = (o2.point - subject.position) * inv_tau;
    let cutoff_vec = right_cutoff - left_cutoff;
    let single_vertex = o1.id == o2.id || cutoff_vec.abs_sq().is_zero();
    let velocity = subject.velocity;

    let t = if single_vertex {
        Fixed::HALF
    } else {
        (velocity - left_cutoff).dot(cutoff_vec).try_div(cutoff_vec.abs_sq())?
    };
    let t_left = (velocity - left_cutoff).dot(left_dir);
    let t_right = (velocity - right_cutoff).dot(right_dir);

    if (t.is_negative() && t_left.is_negative())
        || (single_vertex && t_left.is_negative() && t_right.is_negative())
    {
        // Left cutoff disc.
        let unit_w = unit_or(velocity - left_cutoff, -left_cutoff)?;
        return Ok(Some(Line::new(left_cutoff + unit_w * scaled_radius, unit_w.perp_cw())));
    }
    if t > Fixed::ONE && t_right.is_negative() {
        // Right cutoff disc.
        let unit_w = unit_or(velocity - right_cutoff, -right_cutoff)?;
        return Ok(Some(Line::new(right_cutoff + unit_w * scaled_radius, unit_w.perp_cw())));
    }

    let dist_sq_cutoff = if t.is_negative() || t > Fixed::ONE || single_vertex {
        Fixed::MAX
    } else {
        (velocity - (left_cutoff + cutoff_vec * t)).abs_sq()
    };
    let dist_sq_left = if t_left.is_negative() {
        Fixed::MAX
    } else {
        (velocity - (left_cutoff + left_dir * t_left)).abs_sq()
    };
    let dist_sq_right = if t_right.is_negative() {
        Fixed::MAX
    } else {
        (velocity - (right_cutoff + right_dir * t_right)).abs_sq()
    };

    if dist_sq_cutoff <= dist_sq_left && dist_sq_cutoff <= dist_sq_right {
        // Cutoff segment.
        let direction = -o1.direction;
        return Ok(Some(Line::new(left_cutoff + direction.perp_ccw() * scaled_radius, direction)));
    }
    if dist_sq_left <= dist_sq_right {
        if left_foreign {
            return Ok(None);
        }
        let direction = left_dir;
        return Ok(Some(Line::new(left_cutoff + direction.perp_ccw() * scaled_radius, direction)));
    }
    if right_foreign {
        return Ok(None);
    }
    let direction = -right_dir;
    Ok(Some(Line::new(right_cutoff + direction.perp_ccw() * scaled_radius, direction)))
}

// ── Agents ────────────────────────────────────────────────────────────────────

/// The reciprocal line of `subject` against `other`, and the correction `u`.
///
/// The line's point is always `subject.velocity + u/2`.  Agents that overlap
/// use the one-step cutoff (`inv_time_step`) so they separate within a step.
pub fn reciprocal_line(
    subject: &Subject,
    other: &AgentSnapshot,
    inv_time_horizon: Fixed,
    inv_time_step: Fixed,
) -> FixedResult<(Line, FixedVector2)> {
    let rel_pos = other.position - subject.position;
    let rel_vel = subject.velocity - other.velocity;
    let dist_sq = rel_pos.abs_sq();
    let combined_radius = subject.radius + other.radius;
    let combined_radius_sq = combined_radius * combined_radius;

    let (direction, u) = if dist_sq > combined_radius_sq {
        // Apart: cutoff disc or legs of the truncated cone.
        let w = rel_vel - rel_pos * inv_time_horizon;
        let w_length_sq = w.abs_sq();
        let dot1 = w.dot(rel_pos);

        if dot1.is_negative() && dot1 * dot1 > combined_radius_sq * w_length_sq {
            let w_length = w.abs()?;
            let unit_w = w.normalize()?;
            (unit_w.perp_cw(), unit_w * (combined_radius * inv_time_horizon - w_length))
        } else {
            let leg = sqrt_clamped(dist_sq - combined_radius_sq)?;
            let direction = if rel_pos.det(w).is_positive() {
                left_leg(rel_pos, leg, combined_radius, dist_sq)?
            } else {
                -right_leg(rel_pos, leg, combined_radius, dist_sq)?
            };
            let dot2 = rel_vel.dot(direction);
            (direction, direction * dot2 - rel_vel)
        }
    } else {
        // Overlapping: cutoff disc of one time step.
        let w = rel_vel - rel_pos * inv_time_step;
        let (unit_w, w_length) = if w.is_zero() {
            // Same place, same velocity.  Split along x by handle order so
            // the two agents pick opposite sides.
            let x = if subject.id < other.id { -Fixed::ONE } else { Fixed::ONE };
            (FixedVector2::new(x, Fixed::ZERO), Fixed::ZERO)
        } else {
            (w.normalize()?, w.abs()?)
        };
        (unit_w.perp_cw(), unit_w * (combined_radius * inv_time_step - w_length))
    };

    Ok((Line::new(subject.velocity + u * Fixed::HALF, direction), u))
}

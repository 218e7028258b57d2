//! Velocity selection by incremental linear programming.
//!
//! The feasible region is the intersection of the half-planes left of every
//! [`Line`] and the disc of radius `max_speed`.  Lines are added one at a
//! time; when the running optimum violates a new line, the optimum is
//! re-found on that line (a 1D problem bounded by the earlier lines).
//!
//! * [`solve_line`]: 1D: optimise along one line.
//! * [`solve`]: 2D: feasibility and optimum over all lines.
//! * [`solve_all`]: 3D: when [`solve`] fails, minimise the largest
//!   violation instead.  Obstacle lines stay hard constraints.

use orca_fixed::{Fixed, FixedResult, FixedVector2};

use crate::Line;

/// Result of the 2D program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LpOutcome {
    /// The optimum, or the best candidate before the failing line.
    pub result: FixedVector2,
    /// Index of the first line that could not be satisfied.
    pub failed_at: Option<usize>,
}

/// Optimise on line `line_no`, subject to lines `0..line_no` and the disc of
/// `radius`.
///
/// With `direction_opt` the point furthest along `target` (a unit vector) is
/// returned; otherwise the point closest to `target`.  `None` when the
/// feasible interval on the line is empty.
pub fn solve_line(
    lines: &[Line],
    line_no: usize,
    radius: Fixed,
    target: FixedVector2,
    direction_opt: bool,
) -> FixedResult<Option<FixedVector2>> {
    let line = lines[line_no];
    let dot = line.point.dot(line.direction);
    let discriminant = dot * dot + radius * radius - line.point.abs_sq();
    if discriminant.is_negative() {
        // The disc misses the line entirely.
        return Ok(None);
    }

    let sqrt_discriminant = discriminant.sqrt()?;
    let mut t_left = -dot - sqrt_discriminant;
    let mut t_right = -dot + sqrt_discriminant;

    for earlier in &lines[..line_no] {
        let denominator = line.direction.det(earlier.direction);
        let numerator = earlier.direction.det(line.point - earlier.point);

        if denominator.abs() <= Fixed::EPSILON {
            // Parallel: either entirely excluded or no restriction.
            if numerator.is_negative() {
                return Ok(None);
            }
            continue;
        }

        let t = numerator.try_div(denominator)?;
        if !denominator.is_negative() {
            t_right = t_right.min(t);
        } else {
            t_left = t_left.max(t);
        }
        if t_left > t_right {
            return Ok(None);
        }
    }

    let t = if direction_opt {
        if target.dot(line.direction).is_positive() { t_right } else { t_left }
    } else {
        line.direction.dot(target - line.point).clamp(t_left, t_right)
    };
    Ok(Some(line.point + line.direction * t))
}

/// Velocity closest to `target` (or furthest along it, with `direction_opt`)
/// inside the disc of `radius` and left of every line.
pub fn solve(lines: &[Line], radius: Fixed, target: FixedVector2, direction_opt: bool) -> FixedResult<LpOutcome> {
    let mut result = if direction_opt {
        // `target` is a unit vector here.
        target * radius
    } else if target.abs_sq() > radius * radius {
        target.normalize()? * radius
    } else {
        target
    };

    for i in 0..lines.len() {
        if lines[i].is_violated_by(result) {
            match solve_line(lines, i, radius, target, direction_opt)? {
                Some(v) => result = v,
                None => return Ok(LpOutcome { result, failed_at: Some(i) }),
            }
        }
    }
    Ok(LpOutcome { result, failed_at: None })
}

/// Least-violation fallback, entered when [`solve`] failed at `begin_line`.
///
/// The first `num_obstacle_lines` lines are kept as hard constraints.  For
/// every later line violated by more than the current worst violation, the
/// remaining agent lines are projected onto it and the 2D program is rerun
/// pushing as far as possible toward that line's permitted side.
pub fn solve_all(
    lines: &[Line],
    num_obstacle_lines: usize,
    begin_line: usize,
    radius: Fixed,
    mut result: FixedVector2,
) -> FixedResult<FixedVector2> {
    let mut distance = Fixed::ZERO;
    let mut projected: Vec<Line> = Vec::with_capacity(lines.len());

    for i in begin_line..lines.len() {
        let line_i = lines[i];
        if line_i.violation(result) <= distance {
            continue;
        }

        projected.clear();
        projected.extend_from_slice(&lines[..num_obstacle_lines]);

        for line_j in &lines[num_obstacle_lines..i] {
            let determinant = line_i.direction.det(line_j.direction);
            let point = if determinant.abs() <= Fixed::EPSILON {
                if line_i.direction.dot(line_j.direction).is_positive() {
                    // Same direction: `line_j` adds nothing.
                    continue;
                }
                // Opposite directions: the bisector.
                (line_i.point + line_j.point) * Fixed::HALF
            } else {
                let along = line_j.direction.det(line_i.point - line_j.point).try_div(determinant)?;
                line_i.point + line_i.direction * along
            };
            let direction = (line_j.direction - line_i.direction).normalize()?;
            projected.push(Line { point, direction });
        }

        let outward = line_i.direction.perp_ccw();
        let outcome = solve(&projected, radius, outward, true)?;
        // Failure is only possible through rounding; keep the previous value.
        if outcome.failed_at.is_none() {
            result = outcome.result;
        }
        distance = line_i.violation(result);
    }
    Ok(result)
}

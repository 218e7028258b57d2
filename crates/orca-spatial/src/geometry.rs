//! Segment predicates shared by the obstacle queries and the ORCA builder.

use orca_fixed::{Fixed, FixedResult, FixedVector2, left_of};

/// Squared distance from `c` to the segment `a–b`.
///
/// Fails only if `|b − a|²` is zero.
pub fn dist_sq_point_segment(a: FixedVector2, b: FixedVector2, c: FixedVector2) -> FixedResult<Fixed> {
    let ab = b - a;
    let r = (c - a).dot(ab).try_div(ab.abs_sq())?;
    Ok(if r.is_negative() {
        (c - a).abs_sq()
    } else if r > Fixed::ONE {
        (c - b).abs_sq()
    } else {
        (c - (a + ab * r)).abs_sq()
    })
}

/// `c` lies within the bounding box of `a–b`.  Only meaningful when the
/// three points are collinear.
fn within_box(a: FixedVector2, b: FixedVector2, c: FixedVector2) -> bool {
    c.x >= a.x.min(b.x) && c.x <= a.x.max(b.x) && c.y >= a.y.min(b.y) && c.y <= a.y.max(b.y)
}

/// The closed segments `p1–p2` and `q1–q2` share at least one point.
pub fn segments_intersect(p1: FixedVector2, p2: FixedVector2, q1: FixedVector2, q2: FixedVector2) -> bool {
    let d1 = left_of(q1, q2, p1);
    let d2 = left_of(q1, q2, p2);
    let d3 = left_of(p1, p2, q1);
    let d4 = left_of(p1, p2, q2);

    let straddles = |u: Fixed, v: Fixed| (u.is_positive() && v.is_negative()) || (u.is_negative() && v.is_positive());
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    (d1.is_zero() && within_box(q1, q2, p1))
        || (d2.is_zero() && within_box(q1, q2, p2))
        || (d3.is_zero() && within_box(p1, p2, q1))
        || (d4.is_zero() && within_box(p1, p2, q2))
}

/// Squared distance between the segments `p1–p2` and `q1–q2`.
///
/// Zero when they intersect; otherwise the closest pair involves an endpoint
/// of one of them.  A degenerate (point) segment is handled as a point.
pub fn dist_sq_segment_segment(
    p1: FixedVector2,
    p2: FixedVector2,
    q1: FixedVector2,
    q2: FixedVector2,
) -> FixedResult<Fixed> {
    if segments_intersect(p1, p2, q1, q2) {
        return Ok(Fixed::ZERO);
    }
    let to_q = |c: FixedVector2| -> FixedResult<Fixed> {
        if (q2 - q1).abs_sq().is_zero() { Ok((c - q1).abs_sq()) } else { dist_sq_point_segment(q1, q2, c) }
    };
    let to_p = |c: FixedVector2| -> FixedResult<Fixed> {
        if (p2 - p1).abs_sq().is_zero() { Ok((c - p1).abs_sq()) } else { dist_sq_point_segment(p1, p2, c) }
    };
    Ok(to_q(p1)?.min(to_q(p2)?).min(to_p(q1)?).min(to_p(q2)?))
}

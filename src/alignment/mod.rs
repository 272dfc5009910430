//! Least-squares rigid alignment of matched point pairs (2D Procrustes).

use nalgebra::{Matrix2, Vector2};

use crate::core::types::LocalPoint;
use crate::error::{FitError, Result};

/// Rigid offset that best superimposes the planned points onto the observed
/// ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidAlignment {
    /// Rotation offset in degrees; the sign is chosen so the value can be
    /// added directly to a compass bearing in a right-handed (NEU) frame.
    pub rotation_deg: f64,
    /// Observed centroid minus planned centroid, in local meters.
    pub translation: LocalPoint,
}

/// Compute the optimal rigid superposition of `planned` onto `observed`.
///
/// SVD (Kabsch) solution for matched 2D pairs: both sets are centered on
/// their centroids, the 2x2 cross-covariance `M[r][c] = Σ obs_i[r] · plan_i[c]`
/// of the centered sets is decomposed as `M = U S Vᵗ`, and the rotation is
/// `R = U Vᵗ` after reordering so the larger singular value comes first
/// (not every SVD implementation sorts them descending). The rotation offset
/// is `atan2(R[0][1], R[0][0])`; the translation is the centroid difference
/// only — the rotation is folded into the orientation update by the caller,
/// not applied to the offset.
///
/// Reflection correction (negating a singular vector when `det(U Vᵗ) < 0`)
/// is intentionally left out: the refinement loop only ever asks for small
/// heading corrections, and a mirrored fleet layout is a correspondence
/// problem for the assignment step to surface, not something to fold away
/// here.
///
/// Both slices must have the same nonzero length. Two pairs still produce a
/// well-defined (if degenerate) answer; callers guard against zero pairs.
pub fn align_pairs(observed: &[LocalPoint], planned: &[LocalPoint]) -> Result<RigidAlignment> {
    debug_assert_eq!(observed.len(), planned.len());
    debug_assert!(!observed.is_empty());

    let observed_centroid = centroid(observed);
    let planned_centroid = centroid(planned);

    let mut m = Matrix2::zeros();
    for (obs, plan) in observed.iter().zip(planned) {
        let a = Vector2::new(obs.x - observed_centroid.x, obs.y - observed_centroid.y);
        let b = Vector2::new(plan.x - planned_centroid.x, plan.y - planned_centroid.y);
        m += a * b.transpose();
    }

    let svd = m.svd(true, true);
    let mut u = svd.u.ok_or(FitError::SvdFailed)?;
    let mut v_t = svd.v_t.ok_or(FitError::SvdFailed)?;
    if svd.singular_values[1] > svd.singular_values[0] {
        u.swap_columns(0, 1);
        v_t.swap_rows(0, 1);
    }

    let r = u * v_t;
    let rotation_deg = r[(0, 1)].atan2(r[(0, 0)]).to_degrees();

    Ok(RigidAlignment {
        rotation_deg,
        translation: LocalPoint::new(
            observed_centroid.x - planned_centroid.x,
            observed_centroid.y - planned_centroid.y,
        ),
    })
}

fn centroid(points: &[LocalPoint]) -> LocalPoint {
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    LocalPoint::new(sum_x / n, sum_y / n)
}

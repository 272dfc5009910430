//! Distance matrix and greedy one-to-one assignment.
//!
//! The fit needs a correspondence between projected UAV positions and the
//! planned takeoff slots. The solver here is deliberately greedy rather than
//! globally optimal (Hungarian): with a tight threshold and show-sized point
//! counts the greedy choice is almost always the right one, and an exact
//! bipartite matcher could be substituted without touching the callers as
//! long as the threshold semantics stay the same.

/// One-to-one correspondence between two point sets.
///
/// Pairs are `(source_index, target_index)`; for the fit the source set is
/// the UAVs and the target set the takeoff slots. No index repeats on either
/// side. Call [`Matching::canonicalize`] before comparing matchings from
/// different iterations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matching {
    pairs: Vec<(usize, usize)>,
}

impl Matching {
    /// Wrap an explicit pair list.
    pub fn from_pairs(pairs: Vec<(usize, usize)>) -> Self {
        Self { pairs }
    }

    /// The matched `(source_index, target_index)` pairs.
    #[inline]
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Number of matched pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair was matched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Sort pairs by target index so that equal matchings compare equal
    /// regardless of the order the solver discovered them in.
    pub fn canonicalize(&mut self) {
        self.pairs.sort_unstable_by_key(|&(_, target)| target);
    }
}

/// Compute the dense pairwise distance matrix `matrix[i][j] = dist(a[i], b[j])`.
pub fn distance_matrix<A, B, F>(a: &[A], b: &[B], dist: F) -> Vec<Vec<f64>>
where
    F: Fn(&A, &B) -> f64,
{
    a.iter()
        .map(|pa| b.iter().map(|pb| dist(pa, pb)).collect())
        .collect()
}

/// Extract a one-to-one matching by repeatedly committing the globally
/// smallest remaining entry not larger than `max_distance`, then discarding
/// its row and column from further consideration.
///
/// Ties resolve by row-major scan order; callers must not rely on the exact
/// tie choice. Returns an empty matching when nothing is within the
/// threshold — whether that counts as a failure is the caller's call.
///
/// The repeated full re-scan is O(rows · cols) per extracted pair, which is
/// fine for the few hundred points a show involves.
pub fn greedy_assignment(matrix: &[Vec<f64>], max_distance: f64) -> Matching {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    let mut row_used = vec![false; rows];
    let mut col_used = vec![false; cols];
    let mut pairs = Vec::with_capacity(rows.min(cols));

    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for (i, row) in matrix.iter().enumerate() {
            if row_used[i] {
                continue;
            }
            for (j, &d) in row.iter().enumerate() {
                // The negated comparison also rejects NaN entries.
                if col_used[j] || !(d <= max_distance) {
                    continue;
                }
                if best.map_or(true, |(_, _, best_d)| d < best_d) {
                    best = Some((i, j, d));
                }
            }
        }

        match best {
            Some((i, j, _)) => {
                row_used[i] = true;
                col_used[j] = true;
                pairs.push((i, j));
            }
            None => break,
        }
    }

    Matching { pairs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LocalPoint;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_matrix_values() {
        let a = [LocalPoint::new(0.0, 0.0), LocalPoint::new(3.0, 4.0)];
        let b = [LocalPoint::new(0.0, 0.0)];
        let m = distance_matrix(&a, &b, |p, q| p.distance(q));

        assert_eq!(m.len(), 2);
        assert_eq!(m[0].len(), 1);
        assert_relative_eq!(m[0][0], 0.0);
        assert_relative_eq!(m[1][0], 5.0);
    }

    #[test]
    fn test_greedy_picks_smallest_first() {
        // Row 0 would prefer column 0 (5 < nothing), but the global minimum
        // is (0,1)=1, which then forces row 1 onto column 0.
        let m = vec![vec![5.0, 1.0], vec![2.0, 3.0]];
        let mut matching = greedy_assignment(&m, 10.0);
        matching.canonicalize();
        assert_eq!(matching.pairs(), &[(1, 0), (0, 1)]);
    }

    #[test]
    fn test_greedy_respects_threshold() {
        let m = vec![vec![5.0, 1.0], vec![2.0, 3.0]];
        let matching = greedy_assignment(&m, 1.5);
        assert_eq!(matching.pairs(), &[(0, 1)]);
    }

    #[test]
    fn test_greedy_empty_when_nothing_in_range() {
        let m = vec![vec![5.0, 6.0]];
        let matching = greedy_assignment(&m, 3.0);
        assert!(matching.is_empty());
    }

    #[test]
    fn test_greedy_rectangular_no_repeats() {
        // 3 sources, 2 targets: at most 2 pairs, all indices unique.
        let m = vec![
            vec![1.0, 9.0],
            vec![2.0, 2.5],
            vec![0.5, 8.0],
        ];
        let matching = greedy_assignment(&m, 10.0);
        assert_eq!(matching.len(), 2);

        let mut sources: Vec<usize> = matching.pairs().iter().map(|&(s, _)| s).collect();
        let mut targets: Vec<usize> = matching.pairs().iter().map(|&(_, t)| t).collect();
        sources.dedup();
        targets.sort_unstable();
        targets.dedup();
        assert_eq!(sources.len(), 2);
        assert_eq!(targets.len(), 2);

        // Global minimum 0.5 goes to (2,0); row 1 then takes (1,1).
        let mut matching = matching;
        matching.canonicalize();
        assert_eq!(matching.pairs(), &[(2, 0), (1, 1)]);
    }

    #[test]
    fn test_greedy_skips_nan_entries() {
        let m = vec![vec![f64::NAN, 2.0]];
        let matching = greedy_assignment(&m, 10.0);
        assert_eq!(matching.pairs(), &[(0, 1)]);
    }

    #[test]
    fn test_canonicalize_orders_by_target() {
        let mut matching = Matching::from_pairs(vec![(0, 2), (1, 0), (2, 1)]);
        matching.canonicalize();
        assert_eq!(matching.pairs(), &[(1, 0), (2, 1), (0, 2)]);
    }
}

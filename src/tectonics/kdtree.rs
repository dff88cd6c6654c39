//! Nearest-site lookup over Voronoi site positions.
//!
//! A thin layer over [`kiddo::ImmutableKdTree`] in the plane, with squared
//! Euclidean distance and no wrap. Distances are recomputed from the stored
//! sites so that results agree exactly with [`nearest_linear`]: among sites at
//! the minimal squared distance the lowest index wins.

use std::fmt;

use glam::Vec2;
use kiddo::{ImmutableKdTree, SquaredEuclidean};

/// Spatial index over a fixed set of sites.
pub struct KdTree {
    points: Vec<Vec2>,
    tree: Option<ImmutableKdTree<f32, 2>>,
}

impl KdTree {
    /// Builds the tree. Sites are copied; indices refer to positions in `points`.
    pub fn build(points: &[Vec2]) -> Self {
        let entries: Vec<[f32; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        let tree = (!entries.is_empty()).then(|| ImmutableKdTree::new_from_slice(&entries));
        Self {
            points: points.to_vec(),
            tree,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, idx: usize) -> Vec2 {
        self.points[idx]
    }

    /// Index of the nearest site by squared Euclidean distance, `None` if empty.
    pub fn nearest(&self, query: Vec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let n = self.points.len();
        let mut k = 4.min(n);
        loop {
            let found = tree.nearest_n::<SquaredEuclidean>(&[query.x, query.y], k);
            let first = found.first()?.distance;
            // Widen while every returned site still ties with the closest one.
            let all_tied = found.iter().all(|nn| nn.distance <= first);
            if all_tied && k < n {
                k = (k * 2).min(n);
                continue;
            }
            return found
                .iter()
                .map(|nn| nn.item as usize)
                .map(|idx| (self.points[idx].distance_squared(query), idx))
                .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                .map(|(_, idx)| idx);
        }
    }

    /// The `k` nearest sites as `(index, squared distance)`, closest first.
    ///
    /// Equal distances are ordered by site index.
    pub fn k_nearest(&self, query: Vec2, k: usize) -> Vec<(usize, f32)> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }
        let mut found: Vec<(usize, f32)> = tree
            .nearest_n::<SquaredEuclidean>(&[query.x, query.y], k.min(self.points.len()))
            .into_iter()
            .map(|nn| {
                let idx = nn.item as usize;
                (idx, self.points[idx].distance_squared(query))
            })
            .collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found
    }
}

impl Clone for KdTree {
    fn clone(&self) -> Self {
        Self::build(&self.points)
    }
}

impl fmt::Debug for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree").field("sites", &self.points.len()).finish()
    }
}

/// Linear strict-less-than scan; the reference the tree must agree with.
pub fn nearest_linear(points: &[Vec2], query: Vec2) -> Option<usize> {
    let mut best_idx = None;
    let mut best_dist_sq = f32::INFINITY;
    for (idx, p) in points.iter().enumerate() {
        let dist_sq = p.distance_squared(query);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best_idx = Some(idx);
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_points(n: usize, seed: u64) -> Vec<Vec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|_| Vec2::new(rng.random::<f32>() * 80.0, rng.random::<f32>() * 50.0))
            .collect()
    }

    #[test]
    fn nearest_matches_linear_scan() {
        let points = random_points(300, 7);
        let tree = KdTree::build(&points);
        let queries = random_points(500, 8);
        for q in queries {
            assert_eq!(tree.nearest(q), nearest_linear(&points, q));
        }
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        // Four sites equidistant from the origin query.
        let points = vec![
            Vec2::new(1.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, -1.0),
        ];
        let tree = KdTree::build(&points);
        assert_eq!(tree.nearest(Vec2::ZERO), Some(0));

        // Integer lattice: every query midway between two sites.
        let lattice: Vec<Vec2> = (0..10).map(|i| Vec2::new(i as f32 * 2.0, 0.0)).collect();
        let tree = KdTree::build(&lattice);
        for i in 0..9 {
            let q = Vec2::new(i as f32 * 2.0 + 1.0, 0.0);
            assert_eq!(tree.nearest(q), Some(i));
            assert_eq!(tree.nearest(q), nearest_linear(&lattice, q));
        }
    }

    #[test]
    fn many_equidistant_sites_still_pick_the_first() {
        // Twelve sites on a circle around the query, listed in reverse angle order.
        let ring: Vec<Vec2> = (0..12)
            .rev()
            .map(|i| Vec2::from_angle(i as f32 * std::f32::consts::FRAC_PI_2 / 3.0) * 5.0 + Vec2::new(20.0, 20.0))
            .collect();
        let q = Vec2::new(20.0, 20.0);
        let tree = KdTree::build(&ring);
        assert_eq!(tree.nearest(q), nearest_linear(&ring, q));
    }

    #[test]
    fn k_nearest_is_sorted_and_exact() {
        let points = random_points(200, 11);
        let tree = KdTree::build(&points);
        let q = Vec2::new(40.0, 25.0);
        let got = tree.k_nearest(q, 12);
        assert_eq!(got.len(), 12);

        let mut brute: Vec<(usize, f32)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance_squared(q)))
            .collect();
        brute.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        assert_eq!(got, brute[..12].to_vec());
    }

    #[test]
    fn k_larger_than_the_site_count_returns_every_site() {
        let points = random_points(5, 3);
        let tree = KdTree::build(&points);
        let got = tree.k_nearest(Vec2::new(10.0, 10.0), 12);
        assert_eq!(got.len(), 5);
    }

    #[test]
    fn empty_tree_has_no_nearest() {
        let tree = KdTree::build(&[]);
        assert_eq!(tree.nearest(Vec2::ZERO), None);
        assert!(tree.k_nearest(Vec2::ZERO, 3).is_empty());
    }
}

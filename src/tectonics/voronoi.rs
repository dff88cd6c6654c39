//! Planar Voronoi tessellation with Lloyd relaxation.
//!
//! Cells are built by clipping the map's bounding box against the bisectors of
//! each site's nearest neighbors. Neighbors are pulled from the k-d tree in
//! growing batches until the cell's security radius proves no farther site can
//! cut it.

use glam::Vec2;
use rand::Rng;

use super::error::TectonicError;
use super::kdtree::KdTree;

/// Initial neighbor batch for cell clipping.
const INITIAL_K: usize = 12;

/// Cells with area at or below this are treated as degenerate.
const MIN_CELL_AREA: f32 = 1e-6;

/// One Voronoi cell: its generating site and clipped polygon.
#[derive(Debug, Clone)]
pub struct VoronoiCell {
    pub site: Vec2,
    /// Counter-clockwise polygon, empty if the cell was clipped away.
    pub polygon: Vec<Vec2>,
    pub area: f32,
}

impl VoronoiCell {
    pub fn is_degenerate(&self) -> bool {
        self.polygon.len() < 3 || self.area <= MIN_CELL_AREA
    }

    /// Area-weighted centroid, or the site itself for degenerate cells.
    pub fn centroid(&self) -> Vec2 {
        if self.is_degenerate() {
            return self.site;
        }
        polygon_centroid(&self.polygon).unwrap_or(self.site)
    }
}

/// A Voronoi diagram over `[0, bounds.x] × [0, bounds.y]`.
///
/// Cells are index-aligned with the sites they were built from. The spatial
/// index is part of the value and is rebuilt with every relaxation pass.
#[derive(Debug, Clone)]
pub struct VoronoiMesh {
    pub bounds: Vec2,
    pub cells: Vec<VoronoiCell>,
    index: KdTree,
}

impl VoronoiMesh {
    /// Builds the diagram for the given sites.
    pub fn build(sites: &[Vec2], bounds: Vec2) -> Self {
        let index = KdTree::build(sites);
        let cells = (0..sites.len())
            .map(|i| build_cell(i, sites, &index, bounds))
            .collect();
        Self { bounds, cells, index }
    }

    /// Scatters `num_sites` uniform random sites and applies `relaxation_steps` Lloyd passes.
    ///
    /// # Errors
    /// [`TectonicError::EmptyDiagram`] when no non-degenerate cell survives.
    pub fn random<R: Rng>(
        num_sites: usize,
        bounds: Vec2,
        relaxation_steps: usize,
        rng: &mut R,
    ) -> Result<Self, TectonicError> {
        let sites: Vec<Vec2> = (0..num_sites)
            .map(|_| Vec2::new(rng.random::<f32>() * bounds.x, rng.random::<f32>() * bounds.y))
            .collect();

        let mut mesh = Self::build(&sites, bounds);
        for _ in 0..relaxation_steps {
            mesh = mesh.relaxed();
        }

        let live = mesh.live_cell_count();
        if live == 0 {
            return Err(TectonicError::EmptyDiagram {
                sites: num_sites,
                cells: live,
            });
        }
        Ok(mesh)
    }

    /// One Lloyd pass: every site moves to its cell centroid, then the diagram is rebuilt.
    pub fn relaxed(&self) -> Self {
        let sites: Vec<Vec2> = self.cells.iter().map(VoronoiCell::centroid).collect();
        Self::build(&sites, self.bounds)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells with a real polygon.
    pub fn live_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_degenerate()).count()
    }

    pub fn sites(&self) -> Vec<Vec2> {
        self.cells.iter().map(|c| c.site).collect()
    }

    /// The cell whose site is nearest to `p`.
    pub fn nearest_cell(&self, p: Vec2) -> Option<usize> {
        self.index.nearest(p)
    }

    pub fn total_area(&self) -> f32 {
        self.cells.iter().map(|c| c.area).sum()
    }
}

fn build_cell(i: usize, sites: &[Vec2], index: &KdTree, bounds: Vec2) -> VoronoiCell {
    let site = sites[i];
    let mut polygon = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(bounds.x, 0.0),
        Vec2::new(bounds.x, bounds.y),
        Vec2::new(0.0, bounds.y),
    ];

    let n = sites.len();
    let mut k = INITIAL_K.min(n);
    let mut processed = 0;

    loop {
        let neighbors = index.k_nearest(site, k);
        for &(j, _) in &neighbors[processed..] {
            if j == i {
                continue;
            }
            let other = sites[j];
            if other == site {
                // Coincident sites: the lower index owns the cell.
                if j < i {
                    polygon.clear();
                }
                continue;
            }
            polygon = clip_half_plane(&polygon, site, other);
            if polygon.is_empty() {
                break;
            }
        }
        processed = neighbors.len();

        if polygon.is_empty() || k >= n {
            break;
        }

        // Security radius: a site farther than twice the cell radius cannot clip it.
        let radius_sq = polygon
            .iter()
            .map(|v| v.distance_squared(site))
            .fold(0.0f32, f32::max);
        let farthest_sq = neighbors.last().map(|&(_, d)| d).unwrap_or(0.0);
        if farthest_sq >= 4.0 * radius_sq {
            break;
        }
        k = (k * 2).min(n);
    }

    let area = polygon_area(&polygon);
    VoronoiCell { site, polygon, area }
}

/// Keeps the part of `polygon` closer to `site` than to `other`.
fn clip_half_plane(polygon: &[Vec2], site: Vec2, other: Vec2) -> Vec<Vec2> {
    let normal = other - site;
    let mid = (site + other) * 0.5;
    let side = |p: Vec2| (p - mid).dot(normal);

    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (idx, &a) in polygon.iter().enumerate() {
        let b = polygon[(idx + 1) % polygon.len()];
        let da = side(a);
        let db = side(b);
        if da <= 0.0 {
            out.push(a);
        }
        if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
            let t = da / (da - db);
            out.push(a + (b - a) * t);
        }
    }
    out
}

/// Unsigned polygon area (shoelace).
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice: f32 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum();
    twice.abs() * 0.5
}

/// Area-weighted polygon centroid.
pub fn polygon_centroid(polygon: &[Vec2]) -> Option<Vec2> {
    if polygon.len() < 3 {
        return None;
    }
    let mut twice_area = 0.0f32;
    let mut acc = Vec2::ZERO;
    for (a, b) in polygon.iter().zip(polygon.iter().cycle().skip(1)) {
        let cross = a.perp_dot(*b);
        twice_area += cross;
        acc += (*a + *b) * cross;
    }
    if twice_area.abs() <= MIN_CELL_AREA {
        let sum: Vec2 = polygon.iter().copied().sum();
        return Some(sum / polygon.len() as f32);
    }
    Some(acc / (3.0 * twice_area))
}

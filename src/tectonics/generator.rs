//! Plate generation entry point with saturation-driven retries.
//!
//! One attempt builds both Voronoi diagrams, assigns plates, classifies the
//! boundaries and diffuses their influence. Attempts that saturate the map
//! with boundary influence are discarded and rerun with the next, more
//! conservative parameter record. Structural errors are never retried.

use glam::Vec2;
use log::{debug, info, warn, Level};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::assign::{assign_cells, assign_tiles_by_cells, RegionCell};
use super::boundary::{classify_boundaries, detect_boundaries, distance_field};
use super::config::{GenerationParams, PlateConfig, ValidationLimits};
use super::error::TectonicError;
use super::influence::{diffuse_influence, movement_fields, TectonicFields};
use super::plate::PlateRegion;
use super::voronoi::VoronoiMesh;
use crate::geometry::HexGrid;
use crate::schema::Validate;
use crate::util::Timed;

/// Upper bound on attempts per generation.
pub const MAX_ATTEMPTS: usize = 4;

/// Parameters that vary between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptParams {
    pub plate_count: usize,
    pub cell_density: f32,
    pub max_influence_distance: u32,
    pub influence_decay: f32,
}

impl AttemptParams {
    /// `params` with this record's mesh and influence values swapped in.
    pub fn apply_to(&self, params: &GenerationParams) -> GenerationParams {
        GenerationParams {
            cell_density: self.cell_density,
            max_influence_distance: self.max_influence_distance,
            influence_decay: self.influence_decay,
            ..*params
        }
    }
}

/// The ordered fallback records, configured values first.
///
/// Each fallback cuts the influence reach and steepens the decay, so both the
/// influenced share and the closeness of what remains go down.
pub fn fallback_schedule(config: &PlateConfig, params: &GenerationParams) -> Vec<AttemptParams> {
    let base = AttemptParams {
        plate_count: config.count,
        cell_density: params.cell_density,
        max_influence_distance: params.max_influence_distance,
        influence_decay: params.influence_decay,
    };
    let shorter = |by: u32| base.max_influence_distance.saturating_sub(by).max(1);
    let coarse = AttemptParams {
        cell_density: base.cell_density * 0.5,
        max_influence_distance: shorter(2),
        influence_decay: base.influence_decay * 1.75,
        ..base
    };
    vec![
        base,
        AttemptParams {
            cell_density: base.cell_density * 0.75,
            max_influence_distance: shorter(1),
            influence_decay: base.influence_decay * 1.25,
            ..base
        },
        coarse,
        AttemptParams {
            plate_count: (base.plate_count * 2 / 3).max(2),
            ..coarse
        },
    ]
}

/// Coverage statistics of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptStats {
    pub attempt: usize,
    pub params: AttemptParams,
    /// Share of tiles that are boundary tiles.
    pub boundary_share: f32,
    /// Share of interior tiles that boundary influence reached (closeness > 0).
    pub influenced_share: f32,
    /// Mean closeness over the influenced interior tiles, 0 when there are none.
    pub average_closeness: f32,
    pub saturated: bool,
}

impl AttemptStats {
    pub fn measure(attempt: usize, params: AttemptParams, fields: &TectonicFields, limits: &ValidationLimits) -> Self {
        let total = fields.len().max(1) as f32;
        let boundary = fields.distance_field.iter().filter(|&&d| d == 0).count();
        // Boundary tiles always sit at full closeness; only the spread into interiors is scored.
        let (influenced, closeness_sum) = fields
            .distance_field
            .iter()
            .zip(&fields.boundary_closeness)
            .filter(|&(&d, &c)| d > 0 && c > 0)
            .fold((0usize, 0u64), |(n, sum), (_, &c)| (n + 1, sum + c as u64));

        let boundary_share = boundary as f32 / total;
        let influenced_share = influenced as f32 / total;
        let average_closeness = if influenced == 0 {
            0.0
        } else {
            closeness_sum as f32 / influenced as f32
        };
        let saturated = boundary_share > limits.saturation_limit
            || influenced_share > limits.saturation_limit
            || average_closeness > limits.closeness_limit;

        Self {
            attempt,
            params,
            boundary_share,
            influenced_share,
            average_closeness,
            saturated,
        }
    }
}

/// Diagnostics returned alongside the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Resolved base seed of the random stream.
    pub seed: u64,
    /// Plate seed positions of the returned attempt.
    pub seed_locations: Vec<Vec2>,
    /// Stats of every attempt that ran, in order.
    pub attempts: Vec<AttemptStats>,
    /// Index into `attempts` of the returned attempt.
    pub chosen_attempt: usize,
    /// False when every attempt saturated and the last one was kept anyway.
    pub accepted: bool,
}

/// Result of [`generate_plates`].
#[derive(Debug, Clone)]
pub struct PlateGeneration {
    pub fields: TectonicFields,
    pub plates: Vec<PlateRegion>,
    pub cells: Vec<RegionCell>,
    pub metadata: GenerationMetadata,
}

impl PlateGeneration {
    pub fn plate_count(&self) -> usize {
        self.plates.len()
    }

    pub fn stats(&self) -> &AttemptStats {
        &self.metadata.attempts[self.metadata.chosen_attempt]
    }
}

/// Generates plates and tectonic fields for `grid`.
///
/// # Arguments
/// * `grid` - Tile grid
/// * `config` - Plate layout and seed configuration
/// * `params` - Mesh density, influence and validation parameters
/// * `engine_seed` - Host seed, used when `config.seed.mode` is `engine`
///
/// # Errors
/// Structural failures of any attempt, or invalid inputs. Saturation alone never fails.
pub fn generate_plates(
    grid: &HexGrid,
    config: &PlateConfig,
    params: &GenerationParams,
    engine_seed: u64,
) -> Result<PlateGeneration, TectonicError> {
    if grid.width < 2 || grid.height < 2 {
        return Err(TectonicError::InvalidGrid {
            width: grid.width,
            height: grid.height,
        });
    }
    config
        .validate_at_root()
        .and_then(|_| params.validate_at_root())
        .map_err(|e| TectonicError::InvalidParams(e.to_string()))?;

    let _t = Timed::new(Level::Info, "plate generation");
    let seed = config.seed.resolve(engine_seed);
    let schedule = fallback_schedule(config, params);

    let outcome = run_schedule(&schedule, |attempt, record| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(attempt as u64);

        let (fields, plates, cells) = run_attempt(grid, config, params, record, &mut rng)?;
        let stats = AttemptStats::measure(attempt, *record, &fields, &params.validation);
        debug!(
            "attempt {}: {} plates, density {:.3}, influence {} @ {:.2} -> boundary {:.3}, influenced {:.3}, closeness {:.1}",
            attempt,
            record.plate_count,
            record.cell_density,
            record.max_influence_distance,
            record.influence_decay,
            stats.boundary_share,
            stats.influenced_share,
            stats.average_closeness
        );
        Ok(((fields, plates, cells), stats))
    })?;

    let ScheduleOutcome {
        value: (fields, plates, cells),
        attempts,
        chosen_attempt,
        accepted,
    } = outcome;
    if accepted {
        info!("plates accepted on attempt {}", chosen_attempt);
    } else {
        warn!("all {} plate attempts saturated; keeping the last", attempts.len());
    }

    Ok(PlateGeneration {
        fields,
        metadata: GenerationMetadata {
            seed,
            seed_locations: plates.iter().map(|p| p.seed).collect(),
            attempts,
            chosen_attempt,
            accepted,
        },
        plates,
        cells,
    })
}

/// Result of [`run_schedule`].
#[derive(Debug)]
pub struct ScheduleOutcome<T> {
    pub value: T,
    pub attempts: Vec<AttemptStats>,
    pub chosen_attempt: usize,
    pub accepted: bool,
}

/// Runs `attempt` over `schedule` until one result is not saturated.
///
/// The first unsaturated attempt wins and later records never run. When every
/// record saturates, the last result is returned with `accepted = false`.
/// Errors from `attempt` abort the whole schedule.
pub fn run_schedule<T, F>(schedule: &[AttemptParams], mut attempt: F) -> Result<ScheduleOutcome<T>, TectonicError>
where
    F: FnMut(usize, &AttemptParams) -> Result<(T, AttemptStats), TectonicError>,
{
    let mut attempts = Vec::with_capacity(schedule.len());
    let mut last = None;

    for (idx, record) in schedule.iter().enumerate() {
        let (value, stats) = attempt(idx, record)?;
        attempts.push(stats);
        last = Some(value);
        if !stats.saturated {
            break;
        }
        warn!("plate attempt {} saturated the map", idx);
    }

    let value = last.ok_or_else(|| TectonicError::InvalidParams("no attempts scheduled".into()))?;
    let chosen_attempt = attempts.len() - 1;
    let accepted = !attempts[chosen_attempt].saturated;
    Ok(ScheduleOutcome {
        value,
        attempts,
        chosen_attempt,
        accepted,
    })
}

/// Number of fine assignment cells for an attempt.
pub fn fine_cell_count(grid: &HexGrid, record: &AttemptParams) -> usize {
    ((grid.len() as f32 * record.cell_density).round() as usize).max(record.plate_count)
}

fn run_attempt(
    grid: &HexGrid,
    config: &PlateConfig,
    params: &GenerationParams,
    record: &AttemptParams,
    rng: &mut ChaCha8Rng,
) -> Result<(TectonicFields, Vec<PlateRegion>, Vec<RegionCell>), TectonicError> {
    let bounds = Vec2::new(grid.width as f32, grid.height as f32);

    let coarse = VoronoiMesh::random(record.plate_count, bounds, config.relaxation_steps, rng)?;
    let fine_count = fine_cell_count(grid, record);
    let fine = VoronoiMesh::random(fine_count, bounds, config.relaxation_steps, rng)?;

    let center = bounds * 0.5;
    let mut plates = Vec::with_capacity(record.plate_count);
    for (id, seed) in coarse.sites().into_iter().enumerate() {
        if !seed.is_finite() {
            return Err(TectonicError::NonFiniteSeed {
                plate: id,
                sites: record.plate_count,
                cells: coarse.live_cell_count(),
            });
        }
        plates.push(PlateRegion::random(
            id,
            seed,
            center,
            config.convergence_mix,
            config.directionality,
            rng,
        ));
    }

    let cells = assign_cells(&fine, &plates)?;
    let plate_ids = assign_tiles_by_cells(grid, &fine, &cells, plates.len())?;
    let fields = build_fields(grid, &plates, plate_ids, config.rotation_multiplier, &record.apply_to(params));
    Ok((fields, plates, cells))
}

/// Derives every tectonic layer from a finished plate assignment.
pub fn build_fields(
    grid: &HexGrid,
    plates: &[PlateRegion],
    plate_ids: Vec<u8>,
    rotation_multiplier: f32,
    params: &GenerationParams,
) -> TectonicFields {
    let boundaries = detect_boundaries(grid, &plate_ids);
    let distance = distance_field(grid, &boundaries, params.max_influence_distance);
    let classification = classify_boundaries(
        grid,
        &boundaries,
        &plate_ids,
        plates,
        rotation_multiplier,
        &params.thresholds,
    );
    let influence = diffuse_influence(
        grid,
        &boundaries,
        &classification,
        &distance,
        params.max_influence_distance,
        params.influence_decay,
    );
    let (plate_movement_u, plate_movement_v, plate_rotation) =
        movement_fields(grid, &plate_ids, plates, rotation_multiplier);

    TectonicFields {
        plate_id: plate_ids,
        boundary_closeness: influence.closeness,
        boundary_type: influence.boundary_type,
        tectonic_stress: influence.stress,
        uplift_potential: influence.uplift,
        rift_potential: influence.rift,
        shield_stability: influence.shield,
        plate_movement_u,
        plate_movement_v,
        plate_rotation,
        distance_field: distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tectonics::assign::{assign_tiles_direct, nearest_plate};
    use crate::tectonics::boundary::{BoundaryType, FAR};
    use crate::tectonics::influence::closeness_at;
    use approx::assert_relative_eq;

    #[test]
    fn fallback_schedule_gets_coarser() {
        let config = PlateConfig { count: 9, ..Default::default() };
        let params = GenerationParams {
            cell_density: 0.2,
            max_influence_distance: 2,
            ..Default::default()
        };
        let s = fallback_schedule(&config, &params);
        assert_eq!(s.len(), MAX_ATTEMPTS);
        assert_eq!(s[0].cell_density, 0.2);
        assert_eq!(s[1].cell_density, 0.2 * 0.75);
        assert_eq!(s[1].max_influence_distance, 1);
        assert_eq!(s[2].max_influence_distance, 1);
        assert_eq!(s[2].cell_density, 0.1);
        assert_eq!(s[3].plate_count, 6);
        assert_eq!(s[2].plate_count, 9);
    }

    #[test]
    fn fallbacks_steepen_the_decay() {
        let params = GenerationParams::default();
        let s = fallback_schedule(&PlateConfig::default(), &params);
        assert_eq!(s[0].influence_decay, params.influence_decay);
        for pair in s.windows(2) {
            assert!(pair[1].influence_decay >= pair[0].influence_decay);
            assert!(pair[1].max_influence_distance <= pair[0].max_influence_distance);
        }
        // One hop into the interior, every fallback is dimmer than the configured record.
        let first_ring = |r: &AttemptParams| closeness_at(1, r.influence_decay);
        assert!(s[1..].iter().all(|r| first_ring(r) < first_ring(&s[0])));
    }

    fn stats(attempt: usize, saturated: bool) -> AttemptStats {
        AttemptStats {
            attempt,
            params: fallback_schedule(&PlateConfig::default(), &GenerationParams::default())[attempt],
            boundary_share: 0.1,
            influenced_share: 0.2,
            average_closeness: if saturated { 120.0 } else { 50.0 },
            saturated,
        }
    }

    #[test]
    fn first_unsaturated_attempt_wins() {
        let schedule = fallback_schedule(&PlateConfig::default(), &GenerationParams::default());
        let verdicts = [true, true, false, false];
        let mut ran = Vec::new();
        let outcome = run_schedule(&schedule, |attempt, record| {
            ran.push(attempt);
            assert_eq!(*record, schedule[attempt]);
            Ok((attempt * 10, stats(attempt, verdicts[attempt])))
        })
        .unwrap();

        assert_eq!(ran, vec![0, 1, 2]);
        assert!(outcome.accepted);
        assert_eq!(outcome.chosen_attempt, 2);
        assert_eq!(outcome.value, 20);
        assert_eq!(outcome.attempts.len(), 3);
        assert!(outcome.attempts[..2].iter().all(|a| a.saturated));
    }

    #[test]
    fn exhausted_schedule_keeps_the_last_attempt() {
        let schedule = fallback_schedule(&PlateConfig::default(), &GenerationParams::default());
        let outcome = run_schedule(&schedule, |attempt, _| Ok((attempt, stats(attempt, true)))).unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.chosen_attempt, MAX_ATTEMPTS - 1);
        assert_eq!(outcome.value, MAX_ATTEMPTS - 1);
    }

    #[test]
    fn structural_errors_escape_the_schedule() {
        let schedule = fallback_schedule(&PlateConfig::default(), &GenerationParams::default());
        let mut calls = 0;
        let err = run_schedule::<(), _>(&schedule, |_, _| {
            calls += 1;
            Err(TectonicError::EmptyDiagram { sites: 8, cells: 0 })
        })
        .unwrap_err();
        assert!(matches!(err, TectonicError::EmptyDiagram { .. }));
        assert_eq!(calls, 1);
    }

    #[test]
    fn stats_score_only_the_interior_spread() {
        let fields = TectonicFields {
            distance_field: vec![0, 0, 1, 2, 3, FAR],
            boundary_closeness: vec![255, 255, 104, 42, 0, 0],
            plate_id: vec![0; 6],
            ..Default::default()
        };
        let record = fallback_schedule(&PlateConfig::default(), &GenerationParams::default())[0];
        let stats = AttemptStats::measure(0, record, &fields, &ValidationLimits::default());
        assert_relative_eq!(stats.boundary_share, 2.0 / 6.0);
        assert_relative_eq!(stats.influenced_share, 2.0 / 6.0);
        assert_relative_eq!(stats.average_closeness, 73.0);
        assert!(!stats.saturated);
    }

    #[test]
    fn earth_like_defaults_are_accepted_first_time() {
        let grid = HexGrid::new(84, 54);
        for seed in [1, 2, 3] {
            let result = generate_plates(&grid, &PlateConfig::earth_like(seed), &GenerationParams::default(), 0).unwrap();
            let meta = &result.metadata;
            assert!(meta.accepted, "seed {seed}: {:?}", meta.attempts);
            assert_eq!(meta.chosen_attempt, 0, "seed {seed}: {:?}", meta.attempts);
            assert_eq!(result.plate_count(), 8);
        }
    }

    #[test]
    fn fallback_plate_count_never_drops_below_two() {
        let config = PlateConfig { count: 2, ..Default::default() };
        let s = fallback_schedule(&config, &GenerationParams::default());
        assert_eq!(s[3].plate_count, 2);
    }

    #[test]
    fn four_by_four_two_plates_at_rest() {
        let grid = HexGrid::new(4, 4);
        let plates = vec![
            PlateRegion::stationary(0, Vec2::new(0.0, 0.0)),
            PlateRegion::stationary(1, Vec2::new(2.0, 2.0)),
        ];
        let ids = assign_tiles_direct(&grid, &plates).unwrap();
        let fields = build_fields(&grid, &plates, ids, 1.0, &GenerationParams::default());

        let mut boundary_tiles = 0;
        for idx in 0..grid.len() {
            let (x, y) = grid.coords(idx);
            let expected = nearest_plate(&plates, grid.tile_position(x, y)).unwrap();
            assert_eq!(fields.plate_id[idx] as usize, expected);

            let crosses = grid
                .neighbor_indices(idx)
                .any(|n| fields.plate_id[n] != fields.plate_id[idx]);
            assert_eq!(fields.is_boundary(idx), crosses);
            if crosses {
                boundary_tiles += 1;
                assert_eq!(fields.boundary_type_at(idx), BoundaryType::None);
            }
            assert_eq!(fields.shield_stability[idx], 255 - fields.boundary_closeness[idx]);
            assert_eq!(fields.plate_movement_u[idx], 0);
            assert_eq!(fields.plate_movement_v[idx], 0);
        }
        assert!(boundary_tiles > 0);
        assert!(fields.tectonic_stress.iter().all(|&s| s == 0));
    }

    #[test]
    fn saturating_layout_terminates_within_the_schedule() {
        let grid = HexGrid::new(10, 8);
        let config = PlateConfig {
            count: 80,
            ..PlateConfig::earth_like(3)
        };
        let result = generate_plates(&grid, &config, &GenerationParams::default(), 0).unwrap();
        let meta = &result.metadata;
        assert!(!meta.attempts.is_empty() && meta.attempts.len() <= MAX_ATTEMPTS);
        assert!(!meta.accepted);
        assert_eq!(meta.attempts.len(), MAX_ATTEMPTS);
        assert_eq!(meta.chosen_attempt, MAX_ATTEMPTS - 1);
        assert_eq!(result.plates.len(), 80 * 2 / 3);
        assert_eq!(result.fields.len(), grid.len());
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let grid = HexGrid::new(48, 30);
        let config = PlateConfig::earth_like(1234);
        let a = generate_plates(&grid, &config, &GenerationParams::default(), 0).unwrap();
        let b = generate_plates(&grid, &config, &GenerationParams::default(), 99).unwrap();
        assert_eq!(a.fields, b.fields);
        assert_eq!(a.metadata, b.metadata);
    }

    #[test]
    fn every_tile_gets_a_valid_plate() {
        let grid = HexGrid::new(60, 40);
        let result = generate_plates(&grid, &PlateConfig::active(7), &GenerationParams::default(), 0).unwrap();
        let count = result.plate_count();
        assert!(result.fields.plate_id.iter().all(|&id| (id as usize) < count));
        assert_eq!(result.metadata.seed_locations.len(), count);
        assert!(result.stats().boundary_share > 0.0);
    }

    #[test]
    fn tiny_grid_is_rejected() {
        let grid = HexGrid::new(1, 1);
        let err = generate_plates(&grid, &PlateConfig::default(), &GenerationParams::default(), 0).unwrap_err();
        assert!(matches!(err, TectonicError::InvalidGrid { .. }));
    }

    #[test]
    fn invalid_config_is_rejected_before_meshing() {
        let grid = HexGrid::new(20, 10);
        let config = PlateConfig { count: 0, ..Default::default() };
        let err = generate_plates(&grid, &config, &GenerationParams::default(), 0).unwrap_err();
        assert!(matches!(err, TectonicError::InvalidParams(_)));
    }
}

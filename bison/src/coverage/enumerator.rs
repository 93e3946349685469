//! Parallel enumeration of detecting triples.
//!
//! Targets are processed in parallel; each worker walks every heading,
//! source and receiver for its target and evaluates the predicate, which
//! applies the cheap geometric rejects before target strength and line of
//! sight. Per-target results are merged into one map.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::acoustics::{DetectionPredicate, Rejection, Verdict};
use crate::config::DetectionSection;
use crate::core::{CancelToken, Cell, Heading};
use crate::error::CoverageError;
use crate::grid::OceanGrid;

use super::{DetectionKey, DetectionMap};

/// Counters collected during enumeration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumerationStats {
    /// Triples evaluated
    pub tested: u64,
    /// Source or receiver on the target
    pub coincident: u64,
    /// Inside the direct-blast zone
    pub direct_blast: u64,
    /// Outside the range envelope
    pub out_of_range: u64,
    /// Skipped by the overflow guard
    pub overflow: u64,
    /// Probability not above pmin
    pub below_floor: u64,
    /// A leg crosses land
    pub blocked: u64,
    /// Entries materialized
    pub materialized: u64,
    /// Wall-clock time
    pub elapsed: Duration,
}

impl EnumerationStats {
    fn record(&mut self, verdict: Verdict) {
        self.tested += 1;
        match verdict {
            Verdict::Detected(_) => self.materialized += 1,
            Verdict::Rejected(Rejection::Coincident) => self.coincident += 1,
            Verdict::Rejected(Rejection::DirectBlast) => self.direct_blast += 1,
            Verdict::Rejected(Rejection::OutOfRange) => self.out_of_range += 1,
            Verdict::Rejected(Rejection::Overflow) => self.overflow += 1,
            Verdict::Rejected(Rejection::BelowFloor) => self.below_floor += 1,
            Verdict::Rejected(Rejection::Blocked) => self.blocked += 1,
        }
    }

    fn merge(&mut self, other: &EnumerationStats) {
        self.tested += other.tested;
        self.coincident += other.coincident;
        self.direct_blast += other.direct_blast;
        self.out_of_range += other.out_of_range;
        self.overflow += other.overflow;
        self.below_floor += other.below_floor;
        self.blocked += other.blocked;
        self.materialized += other.materialized;
    }
}

/// Builds the detection map for a grid and detection settings.
pub struct CoverageEnumerator<'a> {
    grid: &'a OceanGrid,
    settings: &'a DetectionSection,
    cancel: Option<CancelToken>,
    stats: EnumerationStats,
}

impl<'a> CoverageEnumerator<'a> {
    /// Create an enumerator over every ocean cell of the grid.
    pub fn new(grid: &'a OceanGrid, settings: &'a DetectionSection) -> Self {
        Self {
            grid,
            settings,
            cancel: None,
            stats: EnumerationStats::default(),
        }
    }

    /// Check the token once per target and abort when it is set.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &EnumerationStats {
        &self.stats
    }

    /// Headings evaluated for every target.
    pub fn headings(&self) -> Vec<Heading> {
        Heading::discretize(self.settings.heading_step, self.settings.models_headings())
    }

    /// Evaluate all triples and collect the detection map.
    pub fn enumerate(&mut self) -> Result<DetectionMap, CoverageError> {
        let start = Instant::now();
        let candidates = self.grid.ocean_cells();
        let targets = candidates.clone();
        let headings = self.headings();
        let predicate = DetectionPredicate::new(self.grid, self.settings);

        log::info!(
            "Enumerating coverage: {} targets x {} headings x {} candidates",
            targets.len(),
            headings.len(),
            candidates.len()
        );

        let cancel = self.cancel.as_ref();
        let per_target: Vec<(Vec<(DetectionKey, f64)>, EnumerationStats)> = targets
            .par_iter()
            .map(|&target| {
                if cancel.is_some_and(CancelToken::is_cancelled) {
                    return Err(CoverageError::Cancelled);
                }
                Ok(enumerate_target(&predicate, target, &headings, &candidates))
            })
            .collect::<Result<_, _>>()?;

        let mut stats = EnumerationStats::default();
        let mut entries = HashMap::new();
        for (found, target_stats) in per_target {
            stats.merge(&target_stats);
            entries.extend(found);
        }
        stats.elapsed = start.elapsed();

        log::info!(
            "Coverage: {} of {} triples detect ({} blast, {} range, {} overflow, {} floor, {} blocked) in {:.2}s",
            stats.materialized,
            stats.tested,
            stats.direct_blast,
            stats.out_of_range,
            stats.overflow,
            stats.below_floor,
            stats.blocked,
            stats.elapsed.as_secs_f64()
        );
        self.stats = stats;

        Ok(DetectionMap::new(
            self.settings.model,
            targets,
            headings,
            candidates,
            entries,
        ))
    }
}

fn enumerate_target(
    predicate: &DetectionPredicate<'_>,
    target: Cell,
    headings: &[Heading],
    candidates: &[Cell],
) -> (Vec<(DetectionKey, f64)>, EnumerationStats) {
    let mut found = Vec::new();
    let mut stats = EnumerationStats::default();
    for &heading in headings {
        for &source in candidates {
            if source == target {
                continue;
            }
            for &receiver in candidates {
                if receiver == target {
                    continue;
                }
                let verdict = predicate.evaluate(target, heading, source, receiver);
                stats.record(verdict);
                if let Verdict::Detected(value) = verdict {
                    found.push((DetectionKey::new(target, heading, source, receiver), value));
                }
            }
        }
    }
    (found, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionModel;

    fn open_water(width: usize, height: usize) -> OceanGrid {
        OceanGrid::new(width, height, vec![-100.0; width * height]).unwrap()
    }

    #[test]
    fn test_excludes_coincident_triples() {
        let grid = open_water(3, 3);
        let settings = DetectionSection {
            rho_0: 10.0,
            pulse_length: 0.0,
            ..DetectionSection::default()
        };
        let mut enumerator = CoverageEnumerator::new(&grid, &settings);
        let map = enumerator.enumerate().unwrap();
        for (key, _) in map.entries() {
            assert_ne!(key.source, key.target);
            assert_ne!(key.receiver, key.target);
        }
        // 9 targets, 8 sources, 8 receivers, all in range with rb = 0
        assert_eq!(map.len(), 9 * 8 * 8);
        assert_eq!(enumerator.stats().materialized, 9 * 8 * 8);
        assert_eq!(enumerator.stats().coincident, 0);
    }

    #[test]
    fn test_entries_satisfy_predicate() {
        let mut elevation = vec![-100.0; 25];
        elevation[12] = 5.0;
        let grid = OceanGrid::new(5, 5, elevation).unwrap();
        let settings = DetectionSection {
            rho_0: 2.0,
            pulse_length: 0.4,
            target_strength: vec![[0.0, 0.5], [90.0, 1.0]],
            heading_step: 45,
            ..DetectionSection::default()
        };
        let mut enumerator = CoverageEnumerator::new(&grid, &settings);
        let map = enumerator.enumerate().unwrap();
        assert_eq!(map.headings().len(), 4);
        let predicate = DetectionPredicate::new(&grid, &settings);
        for (key, value) in map.entries() {
            assert_eq!(
                predicate.evaluate(key.target, key.heading, key.source, key.receiver),
                Verdict::Detected(value)
            );
        }
        let stats = enumerator.stats();
        assert_eq!(
            stats.tested,
            stats.materialized
                + stats.coincident
                + stats.direct_blast
                + stats.out_of_range
                + stats.overflow
                + stats.below_floor
                + stats.blocked
        );
        assert!(stats.blocked > 0);
    }

    #[test]
    fn test_probabilistic_values_negative() {
        let grid = open_water(4, 1);
        let settings = DetectionSection {
            model: DetectionModel::Probabilistic,
            rho_0: 2.0,
            ..DetectionSection::default()
        };
        let map = CoverageEnumerator::new(&grid, &settings).enumerate().unwrap();
        assert!(!map.is_empty());
        assert!(map.entries().all(|(_, v)| v < 0.0));
    }

    #[test]
    fn test_cancelled() {
        let grid = open_water(3, 3);
        let settings = DetectionSection::default();
        let token = CancelToken::new();
        token.cancel();
        let result = CoverageEnumerator::new(&grid, &settings)
            .with_cancel(token)
            .enumerate();
        assert_eq!(result.err(), Some(CoverageError::Cancelled));
    }
}

//! Row sums of the detection map and the bound policy.
//!
//! For every (target, heading, source) the sum over receivers, and for every
//! (target, heading, receiver) the sum over sources. Rows without entries
//! are not stored and read as 0. The global extremes are taken over both
//! directions, with empty rows contributing 0.
//!
//! Under [`BoundPolicy::Uniform`] every bound accessor returns the global
//! max (cookie-cutter) or global min (probabilistic); under
//! [`BoundPolicy::Individual`] it returns the exact row sum.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::{BoundPolicy, DetectionModel};
use crate::core::{Cell, Heading};

use super::DetectionMap;

/// Key of one row: target, heading, and the location being summed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    /// Target cell
    pub target: Cell,
    /// Target heading
    pub heading: Heading,
    /// Source (for sums over receivers) or receiver (for sums over sources)
    pub location: Cell,
}

impl RowKey {
    /// Create a key.
    #[inline]
    pub fn new(target: Cell, heading: Heading, location: Cell) -> Self {
        Self {
            target,
            heading,
            location,
        }
    }
}

/// Aggregated row sums with the active bound policy.
#[derive(Clone, Debug)]
pub struct RowSums {
    model: DetectionModel,
    policy: BoundPolicy,
    over_receivers: HashMap<RowKey, f64>,
    over_sources: HashMap<RowKey, f64>,
    min: f64,
    max: f64,
}

impl RowSums {
    /// Aggregate a detection map.
    pub fn from_map(map: &DetectionMap, policy: BoundPolicy) -> Self {
        let candidates = map.candidates();
        let rows: Vec<(Cell, Heading)> = map
            .targets()
            .iter()
            .flat_map(|&t| map.headings().iter().map(move |&h| (t, h)))
            .collect();

        let partial: Vec<(Vec<(RowKey, f64)>, Vec<(RowKey, f64)>)> = rows
            .par_iter()
            .map(|&(target, heading)| {
                let mut by_source: HashMap<usize, f64> = HashMap::new();
                let mut by_receiver: HashMap<usize, f64> = HashMap::new();
                for e in map.pairs(target, heading) {
                    *by_source.entry(e.source).or_insert(0.0) += e.value;
                    *by_receiver.entry(e.receiver).or_insert(0.0) += e.value;
                }
                let key = |i: usize| RowKey::new(target, heading, candidates[i]);
                (
                    by_source.into_iter().map(|(i, v)| (key(i), v)).collect(),
                    by_receiver.into_iter().map(|(i, v)| (key(i), v)).collect(),
                )
            })
            .collect();

        let mut over_receivers = HashMap::new();
        let mut over_sources = HashMap::new();
        for (source_rows, receiver_rows) in partial {
            over_receivers.extend(source_rows);
            over_sources.extend(receiver_rows);
        }

        let (min, max) = over_receivers
            .values()
            .chain(over_sources.values())
            .fold((0.0f64, 0.0f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        log::info!(
            "Row sums: {} source rows, {} receiver rows, range [{:.4}, {:.4}]",
            over_receivers.len(),
            over_sources.len(),
            min,
            max
        );

        Self {
            model: map.model(),
            policy,
            over_receivers,
            over_sources,
            min,
            max,
        }
    }

    /// Active bound policy
    #[inline]
    pub fn policy(&self) -> BoundPolicy {
        self.policy
    }

    /// Global (min, max) over both directions
    #[inline]
    pub fn extremes(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Exact Σ_r D[t, θ, source, r].
    pub fn exact_for_source(&self, key: &RowKey) -> f64 {
        self.over_receivers.get(key).copied().unwrap_or(0.0)
    }

    /// Exact Σ_s D[t, θ, s, receiver].
    pub fn exact_for_receiver(&self, key: &RowKey) -> f64 {
        self.over_sources.get(key).copied().unwrap_or(0.0)
    }

    /// Policy-bounded row sum for a source row.
    pub fn source_bound(&self, key: &RowKey) -> f64 {
        match self.policy {
            BoundPolicy::Individual => self.exact_for_source(key),
            BoundPolicy::Uniform => self.uniform(),
        }
    }

    /// Policy-bounded row sum for a receiver row.
    pub fn receiver_bound(&self, key: &RowKey) -> f64 {
        match self.policy {
            BoundPolicy::Individual => self.exact_for_receiver(key),
            BoundPolicy::Uniform => self.uniform(),
        }
    }

    #[inline]
    fn uniform(&self) -> f64 {
        match self.model {
            DetectionModel::CookieCutter => self.max,
            DetectionModel::Probabilistic => self.min,
        }
    }
}

//! Sparse detection map keyed by (target, heading, source, receiver).

use std::collections::HashMap;

use crate::config::DetectionModel;
use crate::core::{Cell, Heading};

/// Composite key of one detection entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DetectionKey {
    /// Target cell
    pub target: Cell,
    /// Target heading
    pub heading: Heading,
    /// Source location
    pub source: Cell,
    /// Receiver location
    pub receiver: Cell,
}

impl DetectionKey {
    /// Create a key.
    #[inline]
    pub fn new(target: Cell, heading: Heading, source: Cell, receiver: Cell) -> Self {
        Self {
            target,
            heading,
            source,
            receiver,
        }
    }
}

/// One entry of a (target, heading) row with candidate indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairEntry {
    /// Index of the source in the candidate list
    pub source: usize,
    /// Index of the receiver in the candidate list
    pub receiver: usize,
    /// Detection value (1 or ln(1 - p))
    pub value: f64,
}

/// Detection map plus the index structures the model and cuts need.
///
/// Built once by the enumerator and read-only afterwards.
#[derive(Clone, Debug)]
pub struct DetectionMap {
    model: DetectionModel,
    targets: Vec<Cell>,
    headings: Vec<Heading>,
    candidates: Vec<Cell>,
    candidate_index: HashMap<Cell, usize>,
    entries: HashMap<DetectionKey, f64>,
    rows: HashMap<(Cell, Heading), Vec<PairEntry>>,
}

impl DetectionMap {
    /// Assemble a map from raw entries.
    ///
    /// Entries whose source or receiver is not a candidate are dropped.
    pub fn new(
        model: DetectionModel,
        targets: Vec<Cell>,
        headings: Vec<Heading>,
        candidates: Vec<Cell>,
        mut entries: HashMap<DetectionKey, f64>,
    ) -> Self {
        let candidate_index: HashMap<Cell, usize> = candidates
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();

        entries.retain(|key, _| {
            candidate_index.contains_key(&key.source) && candidate_index.contains_key(&key.receiver)
        });

        let mut rows: HashMap<(Cell, Heading), Vec<PairEntry>> = HashMap::new();
        for (key, &value) in &entries {
            rows.entry((key.target, key.heading)).or_default().push(PairEntry {
                source: candidate_index[&key.source],
                receiver: candidate_index[&key.receiver],
                value,
            });
        }
        for row in rows.values_mut() {
            row.sort_by_key(|e| (e.source, e.receiver));
        }

        Self {
            model,
            targets,
            headings,
            candidates,
            candidate_index,
            entries,
            rows,
        }
    }

    /// Detection model the values belong to
    #[inline]
    pub fn model(&self) -> DetectionModel {
        self.model
    }

    /// Target cells
    #[inline]
    pub fn targets(&self) -> &[Cell] {
        &self.targets
    }

    /// Modeled headings
    #[inline]
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Candidate locations for sources and receivers
    #[inline]
    pub fn candidates(&self) -> &[Cell] {
        &self.candidates
    }

    /// Index of a candidate location.
    #[inline]
    pub fn candidate_index(&self, cell: Cell) -> Option<usize> {
        self.candidate_index.get(&cell).copied()
    }

    /// Number of materialized entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no triple detects anything
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry lookup.
    #[inline]
    pub fn get(&self, key: &DetectionKey) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// Entry value, 0 when absent.
    #[inline]
    pub fn value(&self, target: Cell, heading: Heading, source: Cell, receiver: Cell) -> f64 {
        self.get(&DetectionKey::new(target, heading, source, receiver))
            .unwrap_or(0.0)
    }

    /// All entries in arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = (&DetectionKey, f64)> {
        self.entries.iter().map(|(k, &v)| (k, v))
    }

    /// Entries of one (target, heading) row, sorted by (source, receiver).
    pub fn pairs(&self, target: Cell, heading: Heading) -> &[PairEntry] {
        self.rows
            .get(&(target, heading))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// (target, heading) rows that no pair can detect.
    pub fn undetectable(&self) -> Vec<(Cell, Heading)> {
        let mut missing = Vec::new();
        for &target in &self.targets {
            for &heading in &self.headings {
                if self.pairs(target, heading).is_empty() {
                    missing.push((target, heading));
                }
            }
        }
        missing
    }

    /// Total detection value of `target` over all headings for the selected
    /// pairs. `sources` and `receivers` are indexed like [`Self::candidates`].
    pub fn coverage_of(&self, target: Cell, sources: &[bool], receivers: &[bool]) -> f64 {
        self.headings
            .iter()
            .flat_map(|&h| self.pairs(target, h))
            .filter(|e| sources[e.source] && receivers[e.receiver])
            .map(|e| e.value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DetectionMap {
        let a = Cell::new(0, 0);
        let b = Cell::new(1, 0);
        let c = Cell::new(2, 0);
        let h = Heading::Isotropic;
        let mut entries = HashMap::new();
        entries.insert(DetectionKey::new(a, h, b, c), 1.0);
        entries.insert(DetectionKey::new(a, h, b, b), 1.0);
        entries.insert(DetectionKey::new(b, h, c, c), 1.0);
        // Not a candidate: dropped
        entries.insert(DetectionKey::new(b, h, Cell::new(9, 9), c), 1.0);
        DetectionMap::new(
            DetectionModel::CookieCutter,
            vec![a, b, c],
            vec![h],
            vec![a, b, c],
            entries,
        )
    }

    #[test]
    fn test_rows_sorted_and_indexed() {
        let map = sample();
        assert_eq!(map.len(), 3);
        let row = map.pairs(Cell::new(0, 0), Heading::Isotropic);
        assert_eq!(row.len(), 2);
        assert_eq!((row[0].source, row[0].receiver), (1, 1));
        assert_eq!((row[1].source, row[1].receiver), (1, 2));
    }

    #[test]
    fn test_undetectable_rows() {
        let map = sample();
        assert_eq!(
            map.undetectable(),
            vec![(Cell::new(2, 0), Heading::Isotropic)]
        );
    }

    #[test]
    fn test_coverage_of_selection() {
        let map = sample();
        let a = Cell::new(0, 0);
        assert_eq!(map.coverage_of(a, &[false, true, false], &[false, true, true]), 2.0);
        assert_eq!(map.coverage_of(a, &[false, true, false], &[false, false, true]), 1.0);
        assert_eq!(map.coverage_of(a, &[true, false, true], &[true, true, true]), 0.0);
    }

    #[test]
    fn test_value_defaults_to_zero() {
        let map = sample();
        let a = Cell::new(0, 0);
        assert_eq!(map.value(a, Heading::Isotropic, a, a), 0.0);
        assert_eq!(map.value(a, Heading::Isotropic, Cell::new(1, 0), Cell::new(2, 0)), 1.0);
    }
}

//! Cut callbacks consulted by a solver session.

use crate::model::Constraint;

/// When the solver consults a callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutKind {
    /// On candidate incumbents; returned cuts are required for validity
    Lazy,
    /// On fractional points; returned cuts only tighten the relaxation
    User,
}

/// Point handed to a callback.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
    /// Variable values indexed by `VarId`
    pub values: &'a [f64],
    /// True for integral candidate incumbents
    pub integral: bool,
}

/// Inequality produced by a callback.
#[derive(Clone, Debug, PartialEq)]
pub struct Cut {
    /// The inequality
    pub constraint: Constraint,
    /// Amount by which the candidate violates it
    pub violation: f64,
}

/// Stateful separation routine owned by the caller.
pub trait CutCallback {
    /// Lazy or user callback
    fn kind(&self) -> CutKind;

    /// Return inequalities violated by the candidate (possibly none).
    fn separate(&mut self, candidate: &Candidate<'_>) -> Vec<Cut>;
}

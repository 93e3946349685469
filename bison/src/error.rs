//! Error types for bison

use thiserror::Error;

use crate::config::ConfigLoadError;

/// Elevation grid loading and sub-sampling failures. Always fatal.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Failed to read elevation grid: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed grid header: {0}")]
    Header(String),

    #[error("Malformed grid data at sample {index}: {message}")]
    Data { index: usize, message: String },

    #[error("Grid declares {expected} samples but only {found} were read")]
    Truncated { expected: usize, found: usize },

    #[error("Cannot sub-sample {ncols}x{nrows} grid to {cells_x}x{cells_y} cells")]
    Undersized {
        ncols: usize,
        nrows: usize,
        cells_x: usize,
        cells_y: usize,
    },
}

/// Coverage enumeration failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoverageError {
    #[error("Coverage enumeration cancelled")]
    Cancelled,
}

/// Failures reported by a solver session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("No model loaded into the solver session")]
    NotLoaded,

    #[error("Unknown variable index {0}")]
    UnknownVariable(usize),

    #[error("Solver backend error: {0}")]
    Backend(String),

    #[error("Time limit of {0} s is not a representable duration")]
    InvalidTimeLimit(f64),
}

/// Bison error type
#[derive(Error, Debug)]
pub enum BisonError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("Coverage error: {0}")]
    Coverage(#[from] CoverageError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Solve ended without a feasible placement ({0})")]
    NoSolution(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BisonError>;

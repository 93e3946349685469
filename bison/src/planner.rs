//! End-to-end placement run.
//!
//! ```text
//! ESRI grid -> OceanGrid -> DetectionMap -> RowSums -> PlacementModel
//!                                                          |
//!                          SolverSession <- heuristic / cuts
//!                                |
//!                         PlacementReport
//! ```

use std::path::Path;

use crate::config::{BisonConfig, ConfigLoadError, Formulation};
use crate::core::CancelToken;
use crate::coverage::{CoverageEnumerator, DetectionMap, EnumerationStats, RowSums};
use crate::error::{BisonError, Result};
use crate::grid::OceanGrid;
use crate::io::{EsriGrid, load_esri_ascii};
use crate::model::{ModelBuilder, PlacementModel};
use crate::placement::{AlternatingHeuristic, PlacementReport, SubmodularSeparator};
use crate::solver::{CutCallback, SolveLimits, SolverSession, time_limit};

/// Everything computed before a solver is involved.
#[derive(Debug)]
pub struct PreparedModel {
    /// Sparse detection values
    pub map: DetectionMap,
    /// Row aggregates and bounds
    pub sums: RowSums,
    /// The optimization model
    pub model: PlacementModel,
    /// Enumeration counters
    pub stats: EnumerationStats,
}

/// Drives one placement run with an immutable configuration.
pub struct Planner {
    config: BisonConfig,
    cancel: Option<CancelToken>,
}

impl Planner {
    /// Create a planner for one configuration.
    pub fn new(config: BisonConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Share a cancellation flag with enumeration and the heuristic.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Configuration the planner runs with.
    pub fn config(&self) -> &BisonConfig {
        &self.config
    }

    /// Load and sub-sample the elevation grid.
    ///
    /// `input` overrides `grid.input` from the configuration.
    pub fn load_grid(&self, input: Option<&Path>) -> Result<OceanGrid> {
        let path = match (input, self.config.grid.input.as_deref()) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => Path::new(path).to_path_buf(),
            (None, None) => {
                return Err(ConfigLoadError::Invalid(
                    "no elevation grid given (grid.input)".to_string(),
                )
                .into());
            }
        };
        log::info!("Loading elevation grid from {}", path.display());
        let esri = load_esri_ascii(&path)?;
        self.grid_from_esri(&esri)
    }

    /// Sub-sample a parsed grid and apply the configured depth layers.
    pub fn grid_from_esri(&self, esri: &EsriGrid) -> Result<OceanGrid> {
        let grid = esri
            .subsample(self.config.grid.cells_x, self.config.grid.cells_y)?
            .with_depth_layers(self.config.grid.depth_layers.clone());
        Ok(grid)
    }

    /// Enumerate coverage, aggregate rows and build the model.
    pub fn prepare(&self, grid: &OceanGrid) -> Result<PreparedModel> {
        let mut enumerator = CoverageEnumerator::new(grid, &self.config.detection);
        if let Some(cancel) = &self.cancel {
            enumerator = enumerator.with_cancel(cancel.clone());
        }
        let map = enumerator.enumerate()?;
        let stats = enumerator.stats().clone();

        let sums = RowSums::from_map(&map, self.config.optimization.bound_policy);
        let model = ModelBuilder::new(&self.config, &map, &sums).build();

        Ok(PreparedModel {
            map,
            sums,
            model,
            stats,
        })
    }

    /// Prepare and solve in one go.
    pub fn run<S: SolverSession + ?Sized>(
        &self,
        grid: &OceanGrid,
        session: &mut S,
    ) -> Result<PlacementReport> {
        let prepared = self.prepare(grid)?;
        self.solve(&prepared, session)
    }

    /// Solve a prepared model on a session and report the placement.
    ///
    /// A time-limited solve with an incumbent is a success; the report
    /// carries its gap.
    pub fn solve<S: SolverSession + ?Sized>(
        &self,
        prepared: &PreparedModel,
        session: &mut S,
    ) -> Result<PlacementReport> {
        let settings = &self.config.optimization;
        let PreparedModel { map, model, .. } = prepared;

        log::info!("Loading model into {}", session.name());
        session.load(&model.program)?;

        let lazy_enabled = model.formulation == Formulation::SubmodularCuts || settings.lazy_cuts;
        let mut lazy = lazy_enabled.then(|| SubmodularSeparator::lazy(map, model));
        let mut user = settings
            .user_cuts
            .then(|| SubmodularSeparator::user(map, model, settings.user_cut_tolerance));

        let mut heuristic_objective = None;
        let outcome = {
            let mut callbacks: Vec<&mut dyn CutCallback> = Vec::new();
            if let Some(separator) = lazy.as_mut() {
                callbacks.push(separator);
            }
            if let Some(separator) = user.as_mut() {
                callbacks.push(separator);
            }

            if self.config.heuristic.enabled() {
                let mut heuristic = AlternatingHeuristic::new(model, &self.config.heuristic);
                if let Some(cancel) = &self.cancel {
                    heuristic = heuristic.with_cancel(cancel.clone());
                }
                let result =
                    heuristic.run(session, &mut callbacks, self.config.equipment.source_count)?;
                heuristic_objective = result.best.map(|best| best.objective);
            }

            session.set_limits(SolveLimits {
                time_limit: Some(time_limit(self.config.limits.time_limit_secs)?),
                mode: settings.solve_mode,
            })?;
            session.solve(&mut callbacks)?
        };

        log::info!(
            "Solve finished: {:?}, objective {:?}, bound {:?}",
            outcome.status,
            outcome.objective,
            outcome.best_bound
        );
        if !outcome.status.has_solution() {
            return Err(BisonError::NoSolution(format!("{:?}", outcome.status)));
        }

        let mut report = PlacementReport::from_outcome(model, map, &outcome);
        report.heuristic_objective = heuristic_objective;
        report.lazy_cuts = lazy.map(|s| s.stats().into());
        report.user_cuts = user.map(|s| s.stats().into());
        Ok(report)
    }
}

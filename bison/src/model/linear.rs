//! Plain-data linear program handed to a solver session.

use std::collections::BTreeMap;

/// Index of a variable in [`LinearProgram::variables`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

/// Variable domain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    /// 0/1 variable
    Binary,
    /// Real-valued variable
    Continuous,
}

/// Decision variable with bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// LP-safe name
    pub name: String,
    /// Domain
    pub domain: Domain,
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl Variable {
    /// Binary variable in [0, 1].
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Binary,
            lower: 0.0,
            upper: 1.0,
        }
    }

    /// Continuous variable in `[lower, upper]`.
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Continuous,
            lower,
            upper,
        }
    }
}

/// Sparse linear expression `Σ coef·x + constant`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    /// Variable coefficients
    pub terms: BTreeMap<VarId, f64>,
    /// Constant offset
    pub constant: f64,
}

impl LinearExpr {
    /// Empty expression
    pub fn zero() -> Self {
        Self::default()
    }

    /// Single term `coef·var`
    pub fn from_var(var: VarId, coef: f64) -> Self {
        let mut expr = Self::zero();
        expr.add_term(var, coef);
        expr
    }

    /// `Σ var` over the given variables
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        let mut expr = Self::zero();
        for var in vars {
            expr.add_term(var, 1.0);
        }
        expr
    }

    /// Accumulate `coef·var` into the expression.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        *self.terms.entry(var).or_insert(0.0) += coef;
    }

    /// Builder form of [`Self::add_term`].
    pub fn with_term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    /// Value of the expression at `values[var.0]`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(var, coef)| coef * values[var.0])
                .sum::<f64>()
    }

    /// Number of non-zero terms
    pub fn len(&self) -> usize {
        self.terms.values().filter(|c| **c != 0.0).count()
    }

    /// True when no term has a non-zero coefficient
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Constraint direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
    /// `expr = rhs`
    Eq,
}

/// Linear constraint `expr (sense) rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    /// LP-safe row name
    pub name: String,
    /// Left-hand side
    pub expr: LinearExpr,
    /// Direction
    pub sense: Sense,
    /// Right-hand side
    pub rhs: f64,
}

impl Constraint {
    /// Create a constraint.
    pub fn new(name: impl Into<String>, expr: LinearExpr, sense: Sense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            sense,
            rhs,
        }
    }

    /// Amount by which the constraint is violated at `values` (0 if satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Le => (lhs - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - lhs).max(0.0),
            Sense::Eq => (lhs - self.rhs).abs(),
        }
    }

    /// Satisfied within `tolerance`?
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.violation(values) <= tolerance
    }
}

/// Optimization direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// Minimize
    Minimize,
    /// Maximize
    Maximize,
}

/// Objective function
#[derive(Clone, Debug, PartialEq)]
pub struct Objective {
    /// Direction
    pub sense: ObjectiveSense,
    /// Expression
    pub expr: LinearExpr,
}

impl Objective {
    /// Is `candidate` strictly better than `incumbent`?
    pub fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        match self.sense {
            ObjectiveSense::Minimize => candidate < incumbent,
            ObjectiveSense::Maximize => candidate > incumbent,
        }
    }

    /// Worst possible objective value for this direction.
    pub fn worst(&self) -> f64 {
        match self.sense {
            ObjectiveSense::Minimize => f64::INFINITY,
            ObjectiveSense::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// Variables, constraints and objective of a mixed-integer linear program.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProgram {
    /// Model name
    pub name: String,
    /// Variables indexed by [`VarId`]
    pub variables: Vec<Variable>,
    /// Constraints
    pub constraints: Vec<Constraint>,
    /// Objective
    pub objective: Objective,
}

impl LinearProgram {
    /// Empty program with the given direction.
    pub fn new(name: impl Into<String>, sense: ObjectiveSense) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Objective {
                sense,
                expr: LinearExpr::zero(),
            },
        }
    }

    /// Append a variable and return its id.
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        VarId(self.variables.len() - 1)
    }

    /// Append a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Variable by id.
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    /// Number of binary variables
    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.domain == Domain::Binary)
            .count()
    }

    /// Objective value at `values`.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.expr.evaluate(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_accumulates_terms() {
        let x = VarId(0);
        let y = VarId(1);
        let expr = LinearExpr::sum([x, y]).with_term(x, 2.0).with_term(y, -1.0);
        assert_eq!(expr.terms[&x], 3.0);
        assert_eq!(expr.len(), 1);
        assert_eq!(expr.evaluate(&[1.0, 5.0]), 3.0);
    }

    #[test]
    fn test_constraint_violation() {
        let x = VarId(0);
        let c = Constraint::new("c", LinearExpr::from_var(x, 1.0), Sense::Ge, 1.0);
        assert_eq!(c.violation(&[0.25]), 0.75);
        assert!(c.is_satisfied(&[1.0], 0.0));
        let c = Constraint::new("c", LinearExpr::from_var(x, 1.0), Sense::Eq, 1.0);
        assert_eq!(c.violation(&[3.0]), 2.0);
    }

    #[test]
    fn test_objective_improves() {
        let mut lp = LinearProgram::new("t", ObjectiveSense::Maximize);
        let x = lp.add_variable(Variable::binary("x"));
        lp.objective.expr.add_term(x, 5.0);
        assert!(lp.objective.improves(5.0, 4.0));
        assert!(!lp.objective.improves(4.0, 4.0));
        assert_eq!(lp.objective.worst(), f64::NEG_INFINITY);
        assert_eq!(lp.objective_value(&[1.0]), 5.0);
        assert_eq!(lp.binary_count(), 1);
    }
}

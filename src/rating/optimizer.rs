//! Unconstrained minimization
//!
//! This module defines the interface between the rating model and the
//! numerical solver, and provides a BFGS quasi-Newton implementation.

use crate::error::RatingError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Armijo sufficient-decrease constant
const ARMIJO_C1: f64 = 1e-4;

/// A smooth scalar function of a parameter vector
pub trait Objective {
    /// Number of parameters
    fn dimension(&self) -> usize;

    /// Function value at `params`
    fn value(&self, params: &DVector<f64>) -> f64;

    /// Gradient at `params`
    ///
    /// Defaults to a central finite difference; implementors with a closed
    /// form should override it.
    fn gradient(&self, params: &DVector<f64>) -> DVector<f64> {
        central_difference(self, params)
    }
}

/// Central-difference gradient approximation
pub fn central_difference<O: Objective + ?Sized>(objective: &O, params: &DVector<f64>) -> DVector<f64> {
    let step_base = f64::EPSILON.cbrt();
    let mut gradient = DVector::zeros(params.len());
    let mut probe = params.clone();

    for i in 0..params.len() {
        let h = step_base * params[i].abs().max(1.0);
        let original = probe[i];

        probe[i] = original + h;
        let forward = objective.value(&probe);
        probe[i] = original - h;
        let backward = objective.value(&probe);
        probe[i] = original;

        gradient[i] = (forward - backward) / (2.0 * h);
    }

    gradient
}

/// Why the minimizer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Gradient norm fell below the tolerance
    GradientTolerance,
    /// Iteration budget exhausted
    MaxIterations,
    /// No step along the search direction decreased the objective
    LineSearchFailed,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::GradientTolerance => write!(f, "gradient tolerance reached"),
            Termination::MaxIterations => write!(f, "iteration limit reached"),
            Termination::LineSearchFailed => write!(f, "line search failed"),
        }
    }
}

/// Result of a minimization run
#[derive(Debug, Clone)]
pub struct MinimizeOutcome {
    /// Best parameters found
    pub params: DVector<f64>,
    /// Objective value at `params`
    pub value: f64,
    /// Infinity norm of the gradient at `params`
    pub gradient_norm: f64,
    pub iterations: usize,
    pub function_evaluations: usize,
    pub termination: Termination,
}

impl MinimizeOutcome {
    /// Did the run satisfy its convergence tolerance?
    pub fn converged(&self) -> bool {
        self.termination == Termination::GradientTolerance
    }
}

/// Trait for unconstrained minimizers
pub trait Minimizer: Send + Sync {
    /// Minimize `objective` starting from `start`
    ///
    /// Running out of budget is not an error: the best iterate is returned
    /// with a non-converged [`Termination`].
    fn minimize(
        &self,
        objective: &dyn Objective,
        start: DVector<f64>,
    ) -> crate::error::Result<MinimizeOutcome>;

    /// Current configuration as JSON
    fn config(&self) -> serde_json::Value;
}

/// BFGS quasi-Newton minimizer with a backtracking line search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bfgs {
    /// Stop when the gradient infinity norm is at or below this
    pub gradient_tolerance: f64,
    /// Iteration cap; `None` means 200 per parameter
    pub max_iterations: Option<usize>,
    /// Maximum step halvings per line search
    pub max_line_search_steps: usize,
}

impl Default for Bfgs {
    fn default() -> Self {
        Self {
            gradient_tolerance: 1e-5,
            max_iterations: None,
            max_line_search_steps: 50,
        }
    }
}

impl Bfgs {
    pub fn new(gradient_tolerance: f64, max_iterations: Option<usize>) -> Self {
        Self {
            gradient_tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.gradient_tolerance > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Gradient tolerance must be positive".to_string(),
            }
            .into());
        }

        if self.max_iterations == Some(0) {
            return Err(RatingError::ConfigurationError {
                message: "Max iterations must be greater than 0".to_string(),
            }
            .into());
        }

        if self.max_line_search_steps == 0 {
            return Err(RatingError::ConfigurationError {
                message: "Line search steps must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    fn iteration_budget(&self, dimension: usize) -> usize {
        self.max_iterations.unwrap_or(200 * dimension.max(1))
    }
}

impl Minimizer for Bfgs {
    fn minimize(
        &self,
        objective: &dyn Objective,
        start: DVector<f64>,
    ) -> crate::error::Result<MinimizeOutcome> {
        let n = objective.dimension();
        if start.len() != n {
            return Err(RatingError::malformed(format!(
                "start vector has {} entries, objective expects {}",
                start.len(),
                n
            ))
            .into());
        }

        let max_iterations = self.iteration_budget(n);
        let mut x = start;
        let mut f = objective.value(&x);
        let mut g = objective.gradient(&x);
        let mut h_inv = DMatrix::<f64>::identity(n, n);
        let mut iterations = 0;
        let mut evaluations = 1;

        let termination = loop {
            if g.amax() <= self.gradient_tolerance {
                break Termination::GradientTolerance;
            }
            if iterations >= max_iterations {
                break Termination::MaxIterations;
            }

            let mut direction = -(&h_inv * &g);
            let mut slope = g.dot(&direction);
            if slope >= 0.0 {
                // Lost positive definiteness; restart from steepest descent
                h_inv = DMatrix::identity(n, n);
                direction = -g.clone();
                slope = g.dot(&direction);
            }

            // The first step has no curvature information yet
            let mut alpha = if iterations == 0 {
                (1.0 / g.norm()).min(1.0)
            } else {
                1.0
            };

            let mut accepted = None;
            for _ in 0..self.max_line_search_steps {
                let candidate = &x + alpha * &direction;
                let value = objective.value(&candidate);
                evaluations += 1;

                if value <= f + ARMIJO_C1 * alpha * slope {
                    accepted = Some((candidate, value));
                    break;
                }
                alpha *= 0.5;
            }

            let Some((x_next, f_next)) = accepted else {
                break Termination::LineSearchFailed;
            };

            let g_next = objective.gradient(&x_next);
            let s = &x_next - &x;
            let y = &g_next - &g;
            let sy = s.dot(&y);

            // Skip the update when curvature along s is not positive
            if sy > 1e-10 * s.norm() * y.norm() {
                if iterations == 0 {
                    h_inv *= sy / y.dot(&y);
                }

                let rho = 1.0 / sy;
                let hy = &h_inv * &y;
                let yhy = y.dot(&hy);

                h_inv -= (&s * hy.transpose() + &hy * s.transpose()) * rho;
                h_inv += (&s * s.transpose()) * (rho * rho * yhy + rho);
            }

            trace!(iteration = iterations, value = f_next, step = alpha, "BFGS step");

            x = x_next;
            f = f_next;
            g = g_next;
            iterations += 1;
        };

        let gradient_norm = g.amax();
        debug!(
            "BFGS finished after {} iterations ({} evaluations): {} (f = {:.6}, |g| = {:.3e})",
            iterations, evaluations, termination, f, gradient_norm
        );

        Ok(MinimizeOutcome {
            params: x,
            value: f,
            gradient_norm,
            iterations,
            function_evaluations: evaluations,
            termination,
        })
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

//! Iteration control for the Krylov solvers.
//!
//! A solver asks its controller three things: whether the right-hand side
//! allows an iteration at all ([`IterationControl::init`]), whether a residual
//! is small enough or the budget is spent ([`IterationControl::finished`]), and
//! it reports breakdowns through [`IterationControl::fail`]. The controller keeps
//! the iteration count and an integer error code:
//!
//! | code | meaning |
//! |------|---------|
//! | `0`  | converged (or still running) |
//! | `-2` | iteration budget exhausted |
//! | `> 0` | numerical breakdown, see [`BreakdownKind`] |
//!
//! Custom controllers can stop an iteration early (for cancellation) by
//! returning `true` from `finished` with a code of their own; the solver then
//! reports [`SolveStatus::Stopped`].

use std::fmt;

use num_complex::Complex;
use serde::{Deserialize, Serialize};
use splitsparse_core::Real;

use crate::vector::norm2;

/// Error code of an iteration that ran out of budget.
pub const MAX_ITERATIONS_CODE: i32 = -2;

/// Why [`IterationControl::init`] refused to start an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// The right-hand side is zero; the solution is `x = 0`.
    ZeroRightHandSide,
}

/// Contract between a Krylov solver and its stopping logic.
pub trait IterationControl<T: Real> {
    /// Reset the counters for a new solve with right-hand side `rhs`.
    fn init(&mut self, rhs: &[Complex<T>]) -> Result<(), InitStatus>;

    /// Decide whether to stop, given the norm of the current residual.
    fn finished_with_norm(&mut self, residual_norm: T) -> bool;

    /// Decide whether to stop, given the current residual vector.
    fn finished(&mut self, residual: &[Complex<T>]) -> bool {
        self.finished_with_norm(norm2(residual))
    }

    /// Record a breakdown.
    fn fail(&mut self, code: i32, message: &str);

    /// Count one iteration.
    fn advance(&mut self);

    /// Current error code (see the module documentation).
    fn error_code(&self) -> i32;

    /// The caller declared the initial guess to be zero.
    fn is_initial_guess_zero(&self) -> bool;

    /// Iterations counted so far.
    fn iterations(&self) -> usize;

    /// True before the first [`advance`](Self::advance).
    fn is_first(&self) -> bool {
        self.iterations() == 0
    }

    /// Last residual seen by `finished`, relative to the right-hand side norm.
    fn residual(&self) -> T;
}

/// Settings of the default controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IterationConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on `‖r‖ / ‖b‖`.
    pub tol: f64,
    /// Ignore the content of `x` and start from zero.
    pub initial_guess_zero: bool,
    /// Log the residual every this many iterations (0 disables).
    pub print_every: usize,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            max_iter: 500,
            tol: 1e-8,
            initial_guess_zero: true,
            print_every: 0,
        }
    }
}

impl IterationConfig {
    /// Set the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the relative residual tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Start from the content of `x` (`false`) or from zero (`true`).
    pub fn with_initial_guess_zero(mut self, zero: bool) -> Self {
        self.initial_guess_zero = zero;
        self
    }

    /// Log the residual every `n` iterations.
    pub fn with_print_every(mut self, n: usize) -> Self {
        self.print_every = n;
        self
    }
}

/// Default controller: relative residual test plus an iteration budget.
///
/// Convergence is checked before the budget, so a residual below the
/// tolerance on the last allowed iteration counts as converged.
#[derive(Debug, Clone)]
pub struct Iteration<T: Real> {
    config: IterationConfig,
    tol: T,
    iterations: usize,
    rhs_norm: T,
    residual: T,
    error_code: i32,
    message: Option<String>,
}

impl<T: Real> Iteration<T> {
    /// Controller for `config`, with the tolerance converted to `T`.
    pub fn new(config: IterationConfig) -> Self {
        let tol = T::from_f64_lossy(config.tol);
        Self {
            config,
            tol,
            iterations: 0,
            rhs_norm: T::one(),
            residual: T::one(),
            error_code: 0,
            message: None,
        }
    }

    /// Settings this controller was built from.
    pub fn config(&self) -> &IterationConfig {
        &self.config
    }

    /// Message recorded by the last [`fail`](IterationControl::fail).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl<T: Real> Default for Iteration<T> {
    fn default() -> Self {
        Self::new(IterationConfig::default())
    }
}

impl<T: Real> IterationControl<T> for Iteration<T> {
    fn init(&mut self, rhs: &[Complex<T>]) -> Result<(), InitStatus> {
        self.iterations = 0;
        self.error_code = 0;
        self.message = None;
        self.residual = T::one();
        self.rhs_norm = norm2(rhs);
        if self.rhs_norm.is_zero() {
            self.residual = T::zero();
            return Err(InitStatus::ZeroRightHandSide);
        }
        Ok(())
    }

    fn finished_with_norm(&mut self, residual_norm: T) -> bool {
        self.residual = residual_norm / self.rhs_norm;
        if self.config.print_every > 0 && self.iterations % self.config.print_every == 0 {
            log::info!("iteration {}: residual {:e}", self.iterations, self.residual);
        }

        if self.residual < self.tol {
            self.error_code = 0;
            return true;
        }
        if self.iterations >= self.config.max_iter {
            self.error_code = MAX_ITERATIONS_CODE;
            return true;
        }
        false
    }

    fn fail(&mut self, code: i32, message: &str) {
        log::warn!("iteration {} failed: {message}", self.iterations);
        self.error_code = code;
        self.message = Some(message.to_string());
    }

    fn advance(&mut self) {
        self.iterations += 1;
    }

    fn error_code(&self) -> i32 {
        self.error_code
    }

    fn is_initial_guess_zero(&self) -> bool {
        self.config.initial_guess_zero
    }

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn residual(&self) -> T {
        self.residual
    }
}

/// Numerical breakdown of a Krylov recurrence.
///
/// Every test is an exact comparison with zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    /// Norm of the preconditioned vector (QMR) or `r·z` (COCG) is zero.
    Rho,
    /// COCG: `p·Ap` is zero.
    Curvature,
    /// QMR: `y·v` is zero.
    Delta,
    /// QMR: `p·Ap` is zero.
    Epsilon,
    /// QMR: `ε/δ` is zero.
    Beta,
    /// QMR: the rotation factor `γ` is zero.
    Gamma,
}

impl BreakdownKind {
    /// Error code reported through [`IterationControl::fail`].
    pub fn code(self) -> i32 {
        match self {
            BreakdownKind::Rho => 1,
            BreakdownKind::Curvature => 2,
            BreakdownKind::Delta => 3,
            BreakdownKind::Epsilon => 4,
            BreakdownKind::Beta => 5,
            BreakdownKind::Gamma => 6,
        }
    }
}

impl fmt::Display for BreakdownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            BreakdownKind::Rho => "rho = 0",
            BreakdownKind::Curvature => "p.Ap = 0",
            BreakdownKind::Delta => "delta = 0",
            BreakdownKind::Epsilon => "epsilon = 0",
            BreakdownKind::Beta => "beta = 0",
            BreakdownKind::Gamma => "gamma = 0",
        };
        write!(f, "breakdown #{} ({what})", self.code())
    }
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The residual test passed.
    Converged,
    /// The iteration budget was spent first.
    MaxIterations,
    /// The recurrence broke down; `x` holds the last completed update.
    Breakdown(BreakdownKind),
    /// A custom controller stopped the iteration with its own code.
    Stopped(i32),
}

impl SolveStatus {
    /// Integer code in the controller convention.
    pub fn code(self) -> i32 {
        match self {
            SolveStatus::Converged => 0,
            SolveStatus::MaxIterations => MAX_ITERATIONS_CODE,
            SolveStatus::Breakdown(kind) => kind.code(),
            SolveStatus::Stopped(code) => code,
        }
    }

    pub fn is_converged(self) -> bool {
        self == SolveStatus::Converged
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Converged => write!(f, "converged"),
            SolveStatus::MaxIterations => write!(f, "maximum number of iterations reached"),
            SolveStatus::Breakdown(kind) => write!(f, "{kind}"),
            SolveStatus::Stopped(code) => write!(f, "stopped with code {code}"),
        }
    }
}

/// Outcome of an iterative solve. The solution itself is written into the
/// caller's `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolveResult<T> {
    pub status: SolveStatus,
    /// Iterations performed.
    pub iterations: usize,
    /// Last relative residual seen by the controller.
    pub residual: T,
}

impl<T: Real> SolveResult<T> {
    /// Result of an iteration that left its loop through `finished`.
    pub(crate) fn from_control(iter: &dyn IterationControl<T>) -> Self {
        let status = match iter.error_code() {
            0 => SolveStatus::Converged,
            MAX_ITERATIONS_CODE => SolveStatus::MaxIterations,
            code => SolveStatus::Stopped(code),
        };
        Self {
            status,
            iterations: iter.iterations(),
            residual: iter.residual(),
        }
    }

    /// Result of a zero right-hand side.
    pub(crate) fn trivial() -> Self {
        Self {
            status: SolveStatus::Converged,
            iterations: 0,
            residual: T::zero(),
        }
    }

    /// Record `kind` in the controller and build the matching result.
    pub(crate) fn breakdown(
        iter: &mut dyn IterationControl<T>,
        solver: &str,
        kind: BreakdownKind,
    ) -> Self {
        iter.fail(kind.code(), &format!("{solver} {kind}"));
        Self {
            status: SolveStatus::Breakdown(kind),
            iterations: iter.iterations(),
            residual: iter.residual(),
        }
    }

    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }
}

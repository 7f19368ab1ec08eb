//! Solver method selection.

use std::fmt;

use clap::ValueEnum;
use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};
use splitsparse_solver::{
    ComplexOperator, ComplexPreconditioner, GmresConfig, IterationControl, SolveResult, cocg, gmres,
    qmr_sym,
};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Symmetric QMR (complex symmetric matrices).
    #[default]
    QmrSym,
    /// Conjugate orthogonal conjugate gradient (complex symmetric matrices).
    Cocg,
    /// Restarted GMRES (any nonsingular matrix).
    Gmres,
}

impl Method {
    /// Whether the method assumes `A = Aᵀ`.
    pub fn needs_symmetry(self) -> bool {
        matches!(self, Method::QmrSym | Method::Cocg)
    }

    pub fn run(
        self,
        op: &dyn ComplexOperator<f64>,
        x: &mut [C64],
        b: &[C64],
        precond: &dyn ComplexPreconditioner<f64>,
        iter: &mut dyn IterationControl<f64>,
        gmres_config: &GmresConfig,
    ) -> splitsparse_solver::Result<SolveResult<f64>> {
        match self {
            Method::QmrSym => qmr_sym(op, x, b, precond, iter),
            Method::Cocg => cocg(op, x, b, precond, iter),
            Method::Gmres => gmres(op, x, b, precond, iter, gmres_config),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::QmrSym => write!(f, "qmr-sym"),
            Method::Cocg => write!(f, "cocg"),
            Method::Gmres => write!(f, "gmres"),
        }
    }
}

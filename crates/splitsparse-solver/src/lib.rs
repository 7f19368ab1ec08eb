//! Matrix-free Krylov solvers for complex symmetric systems.
//!
//! This crate provides:
//! - Operator and preconditioner traits the solvers are written against
//! - An iteration controller deciding convergence and recording failures
//! - Symmetric QMR and COCG for complex symmetric matrices, restarted GMRES for general ones
//! - Direct sparse (faer) and dense (nalgebra) reference solvers

pub mod error;
pub mod iteration;
pub mod krylov;
pub mod linear;
pub mod operator;
pub mod preconditioner;
pub mod sparse_operator;
pub mod vector;

pub use error::{Error, Result};
pub use iteration::{
    BreakdownKind, InitStatus, Iteration, IterationConfig, IterationControl, SolveResult,
    SolveStatus,
};
pub use krylov::{GmresConfig, cocg, gmres, qmr_sym};
pub use operator::ComplexOperator;
pub use preconditioner::{ComplexPreconditioner, IdentityPreconditioner, JacobiPreconditioner};

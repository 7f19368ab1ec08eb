use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Args;
use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};
use splitsparse_core::{Layout, SplitSparseMatrix, Symmetry};
use splitsparse_solver::linear::solve_sparse_direct;
use splitsparse_solver::{
    ComplexPreconditioner, GmresConfig, IdentityPreconditioner, Iteration, IterationConfig,
    JacobiPreconditioner,
};

use crate::input::{MatrixSource, load, with_layout};
use crate::method::Method;
use crate::report::{SolveReport, is_symmetric};

#[derive(Args, Debug)]
pub struct SolveArgs {
    #[command(flatten)]
    pub source: MatrixSource,

    /// Krylov method [default: qmr-sym].
    #[arg(long, value_enum)]
    pub method: Option<Method>,

    /// Relative residual tolerance.
    #[arg(long)]
    pub tol: Option<f64>,

    /// Iteration budget.
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// GMRES restart length.
    #[arg(long)]
    pub restart: Option<usize>,

    /// Use the Jacobi (diagonal) preconditioner.
    #[arg(long)]
    pub jacobi: bool,

    /// Compare against the sparse LU solution.
    #[arg(long)]
    pub direct: bool,

    /// JSON solver configuration; command-line flags take precedence.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Solver settings as read from `--config`.
///
/// ```json
/// { "method": "cocg", "jacobi": true, "iteration": { "tol": 1e-10 }, "gmres": { "restart": 50 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    pub method: Method,
    pub jacobi: bool,
    pub iteration: IterationConfig,
    pub gmres: GmresConfig,
}

impl SolveConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid solver config {}", path.display()))
    }

    /// Overlay the command-line flags.
    pub fn with_args(mut self, args: &SolveArgs) -> Self {
        if let Some(method) = args.method {
            self.method = method;
        }
        if let Some(tol) = args.tol {
            self.iteration.tol = tol;
        }
        if let Some(max_iter) = args.max_iter {
            self.iteration.max_iter = max_iter;
        }
        if let Some(restart) = args.restart {
            self.gmres.restart = restart;
        }
        self.jacobi |= args.jacobi;
        self
    }
}

pub fn solve(args: &SolveArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SolveConfig::from_file(path)?,
        None => SolveConfig::default(),
    }
    .with_args(args);

    let report = with_layout!(args.source.layout, L => {
        let matrix = load::<L>(&args.source)?;
        run::<L>(&matrix, &config, args.direct, args.source.file.display().to_string())?
    });

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        report.print();
    }
    if !report.status.is_converged() {
        eprintln!("Warning: solver did not converge: {}", report.status);
    }
    Ok(())
}

/// Solve `A x = A·1` from a zero initial guess.
pub fn run<L: Layout>(
    matrix: &SplitSparseMatrix<f64, L>,
    config: &SolveConfig,
    direct: bool,
    file: String,
) -> Result<SolveReport> {
    let n = matrix.rows();
    if n != matrix.cols() {
        bail!("Cannot solve with a {} x {} matrix: not square", n, matrix.cols());
    }
    if config.method.needs_symmetry() {
        let symmetric = match L::SYMMETRY {
            Symmetry::Symmetric => true,
            Symmetry::Hermitian => matrix.imag_nnz() == 0,
            Symmetry::General => is_symmetric(matrix)?,
        };
        if !symmetric {
            log::warn!("{} assumes a complex symmetric matrix; this one is not", config.method);
        }
    }

    let ones = vec![C64::new(1.0, 0.0); n];
    let mut b = vec![C64::default(); n];
    matrix.mlt(&ones, &mut b)?;

    let (precond, precond_name): (Box<dyn ComplexPreconditioner<f64>>, &'static str) =
        if config.jacobi {
            (Box::new(JacobiPreconditioner::from_matrix(matrix)), "jacobi")
        } else {
            (Box::new(IdentityPreconditioner::new(n)), "identity")
        };

    let mut iter = Iteration::<f64>::new(config.iteration.clone());
    let mut x = vec![C64::default(); n];

    let start = Instant::now();
    let result = config
        .method
        .run(matrix, &mut x, &b, precond.as_ref(), &mut iter, &config.gmres)
        .with_context(|| format!("{} failed", config.method))?;
    let seconds = start.elapsed().as_secs_f64();
    log::info!(
        "{} finished after {} iterations in {:.3} s: {}",
        config.method,
        result.iterations,
        seconds,
        result.status
    );

    let direct_difference = if direct {
        let reference = solve_sparse_direct(matrix, &b).context("Sparse LU failed")?;
        Some(max_difference(&x, &reference))
    } else {
        None
    };

    Ok(SolveReport {
        file,
        layout: L::NAME,
        method: config.method,
        size: n,
        preconditioner: precond_name,
        status: result.status,
        code: result.status.code(),
        message: iter.message().map(str::to_string),
        iterations: result.iterations,
        residual: result.residual,
        max_error: max_difference(&x, &ones),
        direct_difference,
        seconds,
    })
}

fn max_difference(a: &[C64], b: &[C64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).norm()).fold(0.0, f64::max)
}

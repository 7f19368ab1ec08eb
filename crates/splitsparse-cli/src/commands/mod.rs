//! Subcommand implementations.

mod convert;
mod info;
mod solve;

pub use convert::{ConvertArgs, convert};
pub use info::{InfoArgs, info};
pub use solve::{SolveArgs, solve};

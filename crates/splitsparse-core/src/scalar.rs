//! Real scalar types stored in the value arrays of a split matrix.

use bytemuck::Pod;
use num_traits::{Float, NumAssign};
use std::fmt::{Debug, Display, LowerExp};
use std::num::ParseFloatError;
use std::str::FromStr;

/// Real coefficient type of a [`SplitSparseMatrix`](crate::SplitSparseMatrix).
///
/// Implemented for `f32` and `f64`. The binary format writes values at the
/// width of the scalar, so a matrix of `f32` round-trips through 4-byte values
/// and a matrix of `f64` through 8-byte values.
pub trait Real:
    Float
    + NumAssign
    + Pod
    + Default
    + Debug
    + Display
    + LowerExp
    + FromStr<Err = ParseFloatError>
    + Send
    + Sync
    + 'static
{
    /// Width in bytes of one value in the binary format.
    const WIDTH: usize = std::mem::size_of::<Self>();

    /// Lossy conversion from `f64`, used for constants in generic code.
    fn from_f64_lossy(value: f64) -> Self;
}

impl Real for f32 {
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }
}

impl Real for f64 {
    fn from_f64_lossy(value: f64) -> Self {
        value
    }
}

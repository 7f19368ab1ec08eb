//! Binary and text serialization.
//!
//! # Binary format
//!
//! Native-endian, no padding, no checksum:
//!
//! ```text
//! i32 rows, i32 cols, i32 real_nnz, i32 imag_nnz
//! i32 real_ptr[major_dim + 1], i32 real_ind[real_nnz], T real_data[real_nnz]
//! i32 imag_ptr[major_dim + 1], i32 imag_ind[imag_nnz], T imag_data[imag_nnz]
//! ```
//!
//! `T` is written at its own width (4 bytes for `f32`, 8 for `f64`).
//!
//! # Text format
//!
//! One stored position per line, 1-indexed: `row col (re,im)`, or with
//! `cplx = true` the two parts in separate columns: `row col re im`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use bytemuck::Pod;
use num_complex::Complex;

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::matrix::SplitSparseMatrix;
use crate::pattern::CompressedPattern;
use crate::scalar::Real;

fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| Error::Dimension(format!("{what} = {value} does not fit the 32-bit format")))
}

fn from_i32(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::Dimension(format!("negative {what} ({value}) in header")))
}

fn write_indices<W: Write>(out: &mut W, values: &[usize], what: &str) -> Result<()> {
    let raw = values
        .iter()
        .map(|&v| to_i32(v, what))
        .collect::<Result<Vec<i32>>>()?;
    out.write_all(bytemuck::cast_slice(raw.as_slice()))?;
    Ok(())
}

/// Read `len` plain values.
///
/// The buffer grows with the bytes actually received, so a header claiming
/// more entries than the stream holds fails with a short read before any
/// large allocation.
fn read_values<R: Read, P: Pod>(input: &mut R, len: usize) -> Result<Vec<P>> {
    let width = std::mem::size_of::<P>();
    let bytes = len
        .checked_mul(width)
        .ok_or_else(|| Error::Dimension(format!("{len} values overflow the address space")))?;
    let mut raw = Vec::new();
    input.by_ref().take(bytes as u64).read_to_end(&mut raw)?;
    if raw.len() < bytes {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {bytes} bytes, stream ended after {}", raw.len()),
        )
        .into());
    }
    Ok(raw.chunks_exact(width).map(bytemuck::pod_read_unaligned).collect())
}

fn read_indices<R: Read>(input: &mut R, len: usize, what: &str) -> Result<Vec<usize>> {
    read_values::<R, i32>(input, len)?
        .into_iter()
        .map(|v| from_i32(v, what))
        .collect()
}

fn write_pattern<W: Write, T: Real>(out: &mut W, pattern: &CompressedPattern<T>) -> Result<()> {
    write_indices(out, pattern.ptr(), "pointer")?;
    write_indices(out, pattern.ind(), "index")?;
    out.write_all(bytemuck::cast_slice(pattern.data()))?;
    Ok(())
}

fn read_pattern<R: Read, T: Real>(
    input: &mut R,
    major_dim: usize,
    nnz: usize,
) -> Result<CompressedPattern<T>> {
    let ptr = read_indices(input, major_dim + 1, "pointer")?;
    let ind = read_indices(input, nnz, "index")?;
    let data = read_values(input, nnz)?;
    Ok(CompressedPattern::from_raw_parts(ptr, ind, data))
}

impl<T: Real, L: Layout> SplitSparseMatrix<T, L> {
    /// Write the binary format to `out`.
    pub fn write_binary<W: Write>(&self, out: &mut W) -> Result<()> {
        let header = [
            to_i32(self.rows(), "rows")?,
            to_i32(self.cols(), "cols")?,
            to_i32(self.real_nnz(), "real nnz")?,
            to_i32(self.imag_nnz(), "imaginary nnz")?,
        ];
        out.write_all(bytemuck::cast_slice(&header[..]))?;
        write_pattern(out, self.real())?;
        write_pattern(out, self.imag())?;
        Ok(())
    }

    /// Read the binary format from `input`.
    ///
    /// A stream shorter than its header announces yields [`Error::Io`]; the
    /// decoded patterns are then validated so a corrupt stream yields
    /// [`Error::Dimension`] instead of an invalid matrix.
    pub fn read_binary<R: Read>(input: &mut R) -> Result<Self> {
        let mut header = [0i32; 4];
        input.read_exact(bytemuck::cast_slice_mut(&mut header[..]))?;
        let rows = from_i32(header[0], "rows")?;
        let cols = from_i32(header[1], "cols")?;
        let real_nnz = from_i32(header[2], "real nnz")?;
        let imag_nnz = from_i32(header[3], "imaginary nnz")?;

        Self::check_shape(rows, cols)?;
        let major_dim = L::major_dim(rows, cols);
        let minor_dim = L::minor_dim(rows, cols);

        let real = read_pattern(input, major_dim, real_nnz)?;
        let imag = read_pattern(input, major_dim, imag_nnz)?;
        real.check(major_dim, minor_dim)?;
        imag.check(major_dim, minor_dim)?;

        log::debug!(
            "read {} {rows}x{cols} matrix, {real_nnz} real and {imag_nnz} imaginary nonzeros",
            L::NAME
        );
        Ok(Self::from_parts(rows, cols, real, imag))
    }

    /// Write the binary format to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_binary(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Read the binary format from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut input = BufReader::new(File::open(path)?);
        Self::read_binary(&mut input)
    }

    /// Write one `row col value` line per stored position, 1-indexed.
    ///
    /// With `cplx` the real and imaginary parts are written as two columns,
    /// otherwise as a `(re,im)` literal.
    pub fn write_text<W: Write>(&self, out: &mut W, cplx: bool) -> Result<()> {
        for (i, j, value) in self.stored_entries() {
            if cplx {
                writeln!(out, "{} {} {} {}", i + 1, j + 1, value.re, value.im)?;
            } else {
                writeln!(out, "{} {} ({},{})", i + 1, j + 1, value.re, value.im)?;
            }
        }
        Ok(())
    }

    /// Write the text format to a file.
    pub fn write_text_file(&self, path: impl AsRef<Path>, cplx: bool) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_text(&mut out, cplx)?;
        out.flush()?;
        Ok(())
    }

    /// Read the text format. Both value forms are accepted, as are plain real
    /// values (`row col re`). Lines starting with `%` or `#` are skipped.
    ///
    /// The shape is the largest row and column index found (square for
    /// symmetric layouts); duplicates are summed.
    pub fn read_text<R: BufRead>(input: &mut R) -> Result<Self> {
        let mut triplets = Vec::new();
        let (mut rows, mut cols) = (0, 0);

        for (n, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') || line.starts_with('#') {
                continue;
            }
            let (i, j, value) = parse_line::<T>(line).map_err(|message| Error::Parse {
                line: n + 1,
                message,
            })?;
            rows = rows.max(i + 1);
            cols = cols.max(j + 1);
            triplets.push((i, j, value));
        }

        if L::is_triangular() {
            rows = rows.max(cols);
            cols = rows;
        }
        Self::from_triplets(rows, cols, &triplets)
    }

    /// Read the text format from a file.
    pub fn read_text_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut input = BufReader::new(File::open(path)?);
        Self::read_text(&mut input)
    }
}

fn parse_index(token: Option<&str>) -> std::result::Result<usize, String> {
    let token = token.ok_or("missing index")?;
    let index: usize = token
        .parse()
        .map_err(|e| format!("bad index '{token}': {e}"))?;
    index
        .checked_sub(1)
        .ok_or_else(|| "indices are 1-based".to_string())
}

fn parse_value<T: Real>(token: &str) -> std::result::Result<T, String> {
    token
        .trim()
        .parse()
        .map_err(|e| format!("bad value '{token}': {e}"))
}

fn parse_line<T: Real>(line: &str) -> std::result::Result<(usize, usize, Complex<T>), String> {
    let mut tokens = line.split_whitespace();
    let i = parse_index(tokens.next())?;
    let j = parse_index(tokens.next())?;
    let rest: Vec<&str> = tokens.collect();

    let value = match rest.as_slice() {
        [literal] if literal.starts_with('(') => {
            let inner = literal
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .ok_or_else(|| format!("unterminated complex literal '{literal}'"))?;
            let (re, im) = inner
                .split_once(',')
                .ok_or_else(|| format!("complex literal '{literal}' needs a comma"))?;
            Complex::new(parse_value(re)?, parse_value(im)?)
        }
        [re] => Complex::new(parse_value(re)?, T::zero()),
        [re, im] => Complex::new(parse_value(re)?, parse_value(im)?),
        _ => return Err(format!("expected 1 or 2 values, found {}", rest.len())),
    };
    Ok((i, j, value))
}

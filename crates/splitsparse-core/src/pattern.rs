//! One compressed sparsity pattern.
//!
//! A pattern is the classic CSR/CSC triple: `ptr` splits `ind`/`data` into one
//! segment per major index, and each segment holds strictly increasing minor
//! indices with their values. A [`SplitSparseMatrix`](crate::SplitSparseMatrix)
//! owns two of them, one per complex component.
//!
//! Structural edits keep the pattern valid after every call:
//!
//! - `ptr[0] == 0`, `ptr` non-decreasing, `ptr[major_dim] == nnz`
//! - `ind.len() == data.len() == nnz`
//! - minor indices unique and sorted inside each segment

use std::ops::Range;

use crate::error::{Error, Result};
use crate::scalar::Real;

/// Allocate a vector of `len` copies of `value`, reporting allocation failure
/// instead of aborting.
pub(crate) fn try_filled<V: Clone>(len: usize, value: V) -> Result<Vec<V>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { requested: len })?;
    v.resize(len, value);
    Ok(v)
}

/// Allocate an empty vector able to hold `len` elements.
pub(crate) fn try_with_capacity<V>(len: usize) -> Result<Vec<V>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { requested: len })?;
    Ok(v)
}

/// Segment pointers, sorted minor indices and aligned values of one component.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedPattern<T> {
    ptr: Vec<usize>,
    ind: Vec<usize>,
    data: Vec<T>,
}

impl<T: Real> Default for CompressedPattern<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Real> CompressedPattern<T> {
    /// Pattern with zero segments.
    pub fn new() -> Self {
        Self {
            ptr: vec![0],
            ind: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Pattern with `major_dim` empty segments.
    pub fn empty(major_dim: usize) -> Result<Self> {
        let len = major_dim
            .checked_add(1)
            .ok_or_else(|| Error::Dimension(format!("{major_dim} segments overflow")))?;
        Ok(Self {
            ptr: try_filled(len, 0)?,
            ind: Vec::new(),
            data: Vec::new(),
        })
    }

    /// Take ownership of caller-built arrays without validating them.
    ///
    /// Use [`check`](Self::check) when the source is not trusted.
    pub fn from_raw_parts(ptr: Vec<usize>, ind: Vec<usize>, data: Vec<T>) -> Self {
        Self { ptr, ind, data }
    }

    /// Give the three arrays back to the caller.
    pub fn into_raw_parts(self) -> (Vec<usize>, Vec<usize>, Vec<T>) {
        (self.ptr, self.ind, self.data)
    }

    /// Build a pattern from `(major, minor, value)` entries in any order.
    ///
    /// Entries at the same position are summed. Positions are assumed to be in
    /// range; the caller checks bounds.
    pub(crate) fn from_entries(
        major_dim: usize,
        mut entries: Vec<(usize, usize, T)>,
    ) -> Result<Self> {
        let mut pattern = Self::empty(major_dim)?;
        if entries.is_empty() {
            return Ok(pattern);
        }

        entries.sort_by_key(|&(major, minor, _)| (major, minor));

        let mut ind = try_with_capacity(entries.len())?;
        let mut data = try_with_capacity(entries.len())?;
        let mut counts = try_filled(major_dim, 0usize)?;

        let (mut cur_major, mut cur_minor, mut cur_val) = entries[0];
        for &(major, minor, value) in &entries[1..] {
            if major == cur_major && minor == cur_minor {
                cur_val += value;
            } else {
                ind.push(cur_minor);
                data.push(cur_val);
                counts[cur_major] += 1;
                cur_major = major;
                cur_minor = minor;
                cur_val = value;
            }
        }
        ind.push(cur_minor);
        data.push(cur_val);
        counts[cur_major] += 1;

        for (k, count) in counts.into_iter().enumerate() {
            pattern.ptr[k + 1] = pattern.ptr[k] + count;
        }
        pattern.ind = ind;
        pattern.data = data;
        Ok(pattern)
    }

    /// Number of stored coefficients.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Number of segments.
    #[inline]
    pub fn major_dim(&self) -> usize {
        self.ptr.len().saturating_sub(1)
    }

    /// Segment pointer array (`major_dim + 1` entries).
    pub fn ptr(&self) -> &[usize] {
        &self.ptr
    }

    /// Minor index of every stored coefficient.
    pub fn ind(&self) -> &[usize] {
        &self.ind
    }

    /// Stored values, aligned with [`ind`](Self::ind).
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable values. The structure cannot be changed through this slice.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Array positions of segment `major`.
    #[inline]
    pub fn segment(&self, major: usize) -> Range<usize> {
        self.ptr[major]..self.ptr[major + 1]
    }

    /// Array position of `(major, minor)`, or the position where it would be inserted.
    #[inline]
    pub fn find(&self, major: usize, minor: usize) -> std::result::Result<usize, usize> {
        let seg = self.segment(major);
        let start = seg.start;
        self.ind[seg]
            .binary_search(&minor)
            .map(|p| start + p)
            .map_err(|p| start + p)
    }

    /// Stored value at `(major, minor)`.
    #[inline]
    pub fn get(&self, major: usize, minor: usize) -> Option<T> {
        self.find(major, minor).ok().map(|p| self.data[p])
    }

    /// Mutable stored value at `(major, minor)`.
    pub fn get_mut(&mut self, major: usize, minor: usize) -> Option<&mut T> {
        match self.find(major, minor) {
            Ok(p) => Some(&mut self.data[p]),
            Err(_) => None,
        }
    }

    /// Mutable value at `(major, minor)`, inserting a zero coefficient first if
    /// the position is not stored.
    ///
    /// Insertion shifts every later entry one slot to the right and bumps the
    /// pointers of every later segment, so it costs O(nnz).
    pub fn get_or_insert(&mut self, major: usize, minor: usize) -> Result<&mut T> {
        let p = match self.find(major, minor) {
            Ok(p) => p,
            Err(k) => {
                let requested = self.nnz() + 1;
                self.ind
                    .try_reserve(1)
                    .map_err(|_| Error::Allocation { requested })?;
                self.data
                    .try_reserve(1)
                    .map_err(|_| Error::Allocation { requested })?;

                self.ind.insert(k, minor);
                self.data.insert(k, T::zero());
                for p in &mut self.ptr[major + 1..] {
                    *p += 1;
                }
                k
            }
        };
        Ok(&mut self.data[p])
    }

    /// Iterate over `(major, minor, value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.major_dim()).flat_map(move |major| {
            self.segment(major)
                .map(move |p| (major, self.ind[p], self.data[p]))
        })
    }

    /// Set every stored value to zero. The structure is untouched.
    pub fn zero(&mut self) {
        self.data.fill(T::zero());
    }

    /// Set every stored value to `value`. The structure is untouched.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Bytes held by the three arrays.
    pub fn memory_size(&self) -> usize {
        (self.ptr.len() + self.ind.len()) * std::mem::size_of::<usize>()
            + self.data.len() * std::mem::size_of::<T>()
    }

    /// Copy of this pattern restricted to `major_dim` segments and minor indices
    /// below `minor_dim`. Entries outside the new shape are dropped, new segments
    /// are empty.
    pub(crate) fn resized(&self, major_dim: usize, minor_dim: usize) -> Result<Self> {
        let kept_majors = self.major_dim().min(major_dim);
        let kept: usize = (0..kept_majors)
            .map(|k| {
                self.ind[self.segment(k)]
                    .iter()
                    .take_while(|&&minor| minor < minor_dim)
                    .count()
            })
            .sum();

        let mut out = Self::empty(major_dim)?;
        out.ind = try_with_capacity(kept)?;
        out.data = try_with_capacity(kept)?;

        for k in 0..kept_majors {
            for p in self.segment(k) {
                if self.ind[p] >= minor_dim {
                    break;
                }
                out.ind.push(self.ind[p]);
                out.data.push(self.data[p]);
            }
            out.ptr[k + 1] = out.ind.len();
        }
        let total = out.ind.len();
        for p in &mut out.ptr[kept_majors + 1..] {
            *p = total;
        }
        Ok(out)
    }

    /// Drop every entry past position `nnz`.
    pub(crate) fn truncate(&mut self, nnz: usize) {
        self.ind.truncate(nnz);
        self.data.truncate(nnz);
        for p in &mut self.ptr {
            *p = (*p).min(nnz);
        }
    }

    /// Position `(major, minor)` of the last stored entry.
    fn last_entry(&self) -> Option<(usize, usize)> {
        let nnz = self.nnz();
        if nnz == 0 {
            return None;
        }
        let major = self.ptr.partition_point(|&p| p < nnz) - 1;
        Some((major, self.ind[nnz - 1]))
    }

    /// Grow or shrink to exactly `nnz` entries, keeping the existing prefix in place.
    ///
    /// New entries are zero-valued and occupy the first free cells after the last
    /// stored entry, in storage order, so the pattern stays valid. Fails if the
    /// tail of the shape has fewer free cells than requested; the pattern is then
    /// unchanged.
    pub(crate) fn set_nnz<F>(&mut self, nnz: usize, minor_dim: usize, minor_range: F) -> Result<()>
    where
        F: Fn(usize, usize) -> Range<usize>,
    {
        let current = self.nnz();
        if nnz <= current {
            self.truncate(nnz);
            return Ok(());
        }

        let extra = nnz - current;
        self.ind
            .try_reserve_exact(extra)
            .map_err(|_| Error::Allocation { requested: nnz })?;
        self.data
            .try_reserve_exact(extra)
            .map_err(|_| Error::Allocation { requested: nnz })?;

        let major_dim = self.major_dim();
        let mut added = try_filled(major_dim, 0usize)?;
        let (mut major, mut start) = match self.last_entry() {
            Some((major, minor)) => (major, minor + 1),
            None => (0, 0),
        };

        let mut remaining = extra;
        while remaining > 0 && major < major_dim {
            let range = minor_range(major, minor_dim);
            for minor in start.max(range.start)..range.end {
                if remaining == 0 {
                    break;
                }
                self.ind.push(minor);
                self.data.push(T::zero());
                added[major] += 1;
                remaining -= 1;
            }
            major += 1;
            start = 0;
        }

        if remaining > 0 {
            self.ind.truncate(current);
            self.data.truncate(current);
            return Err(Error::Dimension(format!(
                "cannot place {nnz} entries: only {} free cells follow the last stored entry",
                extra - remaining
            )));
        }

        let mut shift = 0;
        for (k, count) in added.into_iter().enumerate() {
            shift += count;
            self.ptr[k + 1] += shift;
        }
        Ok(())
    }

    /// Check array lengths against `major_dim` (cheap, no scan of the indices).
    pub fn check_lengths(&self, major_dim: usize) -> Result<()> {
        if self.ptr.len() != major_dim + 1 {
            return Err(Error::Dimension(format!(
                "pointer array has {} entries, expected {}",
                self.ptr.len(),
                major_dim + 1
            )));
        }
        if self.ind.len() != self.data.len() {
            return Err(Error::Dimension(format!(
                "{} indices for {} values",
                self.ind.len(),
                self.data.len()
            )));
        }
        if self.ptr[0] != 0 || self.ptr[major_dim] != self.data.len() {
            return Err(Error::Dimension(format!(
                "pointer array spans [{}, {}], expected [0, {}]",
                self.ptr[0],
                self.ptr[major_dim],
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Full invariant check: lengths, monotone pointers, sorted in-range indices.
    pub fn check(&self, major_dim: usize, minor_dim: usize) -> Result<()> {
        self.check_lengths(major_dim)?;
        for k in 0..major_dim {
            if self.ptr[k] > self.ptr[k + 1] {
                return Err(Error::Dimension(format!(
                    "pointer array decreases at segment {k}"
                )));
            }
            let seg = &self.ind[self.segment(k)];
            if seg.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::Dimension(format!(
                    "indices of segment {k} are not strictly increasing"
                )));
            }
            if let Some(&last) = seg.last() {
                if last >= minor_dim {
                    return Err(Error::Dimension(format!(
                        "segment {k} holds index {last}, minor dimension is {minor_dim}"
                    )));
                }
            }
        }
        Ok(())
    }
}

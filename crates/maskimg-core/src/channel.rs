//! Masked channel grids.
//!
//! A [`Channel`] is one 2-D grid of `f32` values bundled with a boolean mask
//! grid of the same shape. A `true` mask entry marks the value at that
//! position as missing: it is carried along numerically but excluded from
//! statistics and rendered transparent (or filled) on output.
//!
//! # Memory Layout
//!
//! Both grids are stored **row-major**, top-to-bottom:
//!
//! ```text
//! values: [v00 v01 v02 ... v10 v11 ...]
//! mask:   [m00 m01 m02 ... m10 m11 ...]
//! ```
//!
//! # Usage
//!
//! ```rust
//! use maskimg_core::Channel;
//!
//! let chn = Channel::from_masked_rows(&[
//!     vec![Some(0.0), Some(0.5)],
//!     vec![Some(1.0), None],
//! ]).unwrap();
//!
//! assert_eq!(chn.shape(), (2, 2));
//! assert_eq!(chn.count_valid(), 3);
//! assert_eq!(chn.get(1, 1), None);
//! assert_eq!(chn.valid_range(), Some((0.0, 1.0)));
//! ```
//!
//! # Parallelism
//!
//! With the `parallel` feature (default), elementwise maps over grids larger
//! than [`PARALLEL_THRESHOLD`] elements run on the rayon thread pool. Results
//! are identical to the sequential path.

use crate::{Error, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Grids with at least this many elements are mapped in parallel.
pub const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// One 2-D grid of values plus its validity mask.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Channel {
    height: usize,
    width: usize,
    values: Vec<f32>,
    mask: Vec<bool>,
}

impl Channel {
    /// Creates a channel from row-major values and mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RaggedGrid`] if either buffer length differs from
    /// `height * width`.
    pub fn new(height: usize, width: usize, values: Vec<f32>, mask: Vec<bool>) -> Result<Self> {
        let expected = height * width;
        if values.len() != expected || mask.len() != expected {
            return Err(Error::RaggedGrid(format!(
                "expected {} elements for {}x{}, got {} values and {} mask entries",
                expected,
                height,
                width,
                values.len(),
                mask.len()
            )));
        }
        Ok(Self {
            height,
            width,
            values,
            mask,
        })
    }

    /// Creates a fully valid channel from row-major values.
    pub fn from_values(height: usize, width: usize, values: Vec<f32>) -> Result<Self> {
        let mask = vec![false; values.len()];
        Self::new(height, width, values, mask)
    }

    /// Creates a fully valid channel from a grid of rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RaggedGrid`] if rows differ in length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let width = check_rows(rows.iter().map(Vec::len))?;
        let values: Vec<f32> = rows.iter().flatten().copied().collect();
        Self::from_values(rows.len(), width, values)
    }

    /// Creates a channel from rows where `None` marks a missing value.
    ///
    /// Missing entries hold `0.0` underneath the mask.
    pub fn from_masked_rows(rows: &[Vec<Option<f32>>]) -> Result<Self> {
        let width = check_rows(rows.iter().map(Vec::len))?;
        let values = rows.iter().flatten().map(|v| v.unwrap_or(0.0)).collect();
        let mask = rows.iter().flatten().map(Option::is_none).collect();
        Self::new(rows.len(), width, values, mask)
    }

    /// Creates a fully valid channel holding `value` everywhere.
    pub fn filled(height: usize, width: usize, value: f32) -> Self {
        Self {
            height,
            width,
            values: vec![value; height * width],
            mask: vec![false; height * width],
        }
    }

    /// Fully valid channel of zeros.
    #[inline]
    pub fn zeros(height: usize, width: usize) -> Self {
        Self::filled(height, width, 0.0)
    }

    /// Fully valid channel of ones.
    #[inline]
    pub fn ones(height: usize, width: usize) -> Self {
        Self::filled(height, width, 1.0)
    }

    /// Shape as `(height, width)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the grid has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw values, including those under the mask.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Mutable raw values. The mask is not touched.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Mask grid (`true` = missing).
    #[inline]
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Mutable mask grid.
    #[inline]
    pub fn mask_mut(&mut self) -> &mut [bool] {
        &mut self.mask
    }

    /// Replaces the mask wholesale.
    pub fn set_mask(&mut self, mask: Vec<bool>) -> Result<()> {
        if mask.len() != self.values.len() {
            return Err(Error::RaggedGrid(format!(
                "mask has {} entries, channel has {}",
                mask.len(),
                self.values.len()
            )));
        }
        self.mask = mask;
        Ok(())
    }

    /// Consumes the channel into `(values, mask)`.
    pub fn into_parts(self) -> (Vec<f32>, Vec<bool>) {
        (self.values, self.mask)
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height && col < self.width, "element out of bounds");
        row * self.width + col
    }

    /// Value at `(row, col)`, or `None` if masked.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        let i = self.offset(row, col);
        if self.mask[i] { None } else { Some(self.values[i]) }
    }

    /// Raw value at `(row, col)` regardless of the mask.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.values[self.offset(row, col)]
    }

    /// Returns `true` if `(row, col)` is masked.
    #[inline]
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.mask[self.offset(row, col)]
    }

    /// Number of valid elements.
    pub fn count_valid(&self) -> usize {
        self.mask.iter().filter(|m| !**m).count()
    }

    /// Number of masked elements.
    pub fn count_masked(&self) -> usize {
        self.len() - self.count_valid()
    }

    /// Returns `true` if every element is masked (including the 0-element grid).
    pub fn is_all_masked(&self) -> bool {
        self.mask.iter().all(|m| *m)
    }

    /// Valid values in row-major order (the "compressed" channel).
    pub fn valid_values(&self) -> Vec<f32> {
        self.values
            .iter()
            .zip(&self.mask)
            .filter(|(_, m)| !**m)
            .map(|(v, _)| *v)
            .collect()
    }

    /// Minimum and maximum over valid values, `None` if fully masked.
    pub fn valid_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .zip(&self.mask)
            .filter(|(_, m)| !**m)
            .fold(None, |acc, (&v, _)| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Applies `f` to every value, masked or not. The mask is unchanged.
    pub fn map_values<F>(&mut self, f: F)
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        if self.values.len() >= PARALLEL_THRESHOLD {
            self.values.par_iter_mut().for_each(|v| *v = f(*v));
            return;
        }
        self.values.iter_mut().for_each(|v| *v = f(*v));
    }

    /// Applies `f` to valid values only.
    pub fn map_valid<F>(&mut self, f: F)
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        let mask = &self.mask;
        #[cfg(feature = "parallel")]
        if self.values.len() >= PARALLEL_THRESHOLD {
            self.values
                .par_iter_mut()
                .zip(mask.par_iter())
                .filter(|(_, m)| !**m)
                .for_each(|(v, _)| *v = f(*v));
            return;
        }
        self.values
            .iter_mut()
            .zip(mask)
            .filter(|(_, m)| !**m)
            .for_each(|(v, _)| *v = f(*v));
    }

    /// Clamps every value to `[lo, hi]`.
    pub fn clip(&mut self, lo: f32, hi: f32) {
        self.map_values(|v| v.clamp(lo, hi));
    }

    /// Derives a channel from `sources` elementwise.
    ///
    /// `f` receives the element offset and returns the new value; the derived
    /// mask is the disjunction of all source masks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the sources disagree on shape, or
    /// [`Error::InvalidParameter`] if `sources` is empty.
    pub fn derive<F>(sources: &[&Channel], f: F) -> Result<Channel>
    where
        F: Fn(usize) -> f32 + Sync + Send,
    {
        let first = sources
            .first()
            .ok_or_else(|| Error::invalid_parameter("derive needs at least one source channel"))?;
        let shape = first.shape();
        if let Some(bad) = sources.iter().find(|c| c.shape() != shape) {
            return Err(Error::shape_mismatch(shape, bad.shape()));
        }
        let values = collect_indexed(first.len(), f);
        let mask = mask_any(sources.iter().copied());
        Channel::new(shape.0, shape.1, values, mask)
    }

    /// Picks rows and columns by index, building a `rows.len() x cols.len()` grid.
    ///
    /// Used for nearest-neighbour zoom (repeated indices) and decimation
    /// (strided indices).
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Channel {
        let mut values = Vec::with_capacity(rows.len() * cols.len());
        let mut mask = Vec::with_capacity(rows.len() * cols.len());
        for &r in rows {
            for &c in cols {
                let i = self.offset(r, c);
                values.push(self.values[i]);
                mask.push(self.mask[i]);
            }
        }
        Channel {
            height: rows.len(),
            width: cols.len(),
            values,
            mask,
        }
    }
}

/// Elementwise disjunction: `true` where any channel is masked.
///
/// Returns an empty vector for no channels.
pub fn mask_any<'a>(channels: impl IntoIterator<Item = &'a Channel>) -> Vec<bool> {
    combine_masks(channels, |a, b| a || b)
}

/// Elementwise conjunction: `true` only where every channel is masked.
///
/// Returns an empty vector for no channels.
pub fn mask_all<'a>(channels: impl IntoIterator<Item = &'a Channel>) -> Vec<bool> {
    combine_masks(channels, |a, b| a && b)
}

fn combine_masks<'a>(
    channels: impl IntoIterator<Item = &'a Channel>,
    op: impl Fn(bool, bool) -> bool,
) -> Vec<bool> {
    let mut iter = channels.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let mut acc = first.mask.clone();
    for chn in iter {
        debug_assert_eq!(chn.mask.len(), acc.len(), "mask length mismatch");
        acc.iter_mut().zip(&chn.mask).for_each(|(a, &b)| *a = op(*a, b));
    }
    acc
}

fn check_rows(lens: impl Iterator<Item = usize>) -> Result<usize> {
    let mut width = None;
    for (i, len) in lens.enumerate() {
        match width {
            None => width = Some(len),
            Some(w) if w != len => {
                return Err(Error::RaggedGrid(format!(
                    "row {} has {} elements, expected {}",
                    i, len, w
                )));
            }
            Some(_) => {}
        }
    }
    Ok(width.unwrap_or(0))
}

fn collect_indexed<F>(len: usize, f: F) -> Vec<f32>
where
    F: Fn(usize) -> f32 + Sync + Send,
{
    #[cfg(feature = "parallel")]
    if len >= PARALLEL_THRESHOLD {
        return (0..len).into_par_iter().map(f).collect();
    }
    (0..len).map(f).collect()
}

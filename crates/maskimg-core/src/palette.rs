//! Palettes for indexed (`P`/`PA`) images.
//!
//! A [`Palette`] is an ordered list of color tuples. Index channels of an
//! indexed image hold offsets into it. Entries are registered by exact tuple
//! equality: the first entry equal to a color wins, otherwise the color is
//! appended.
//!
//! ```rust
//! use maskimg_core::Palette;
//!
//! let mut palette = Palette::new(3);
//! assert_eq!(palette.register(&[1.0, 0.0, 0.0]), 0);
//! assert_eq!(palette.register(&[0.0, 1.0, 0.0]), 1);
//! assert_eq!(palette.register(&[1.0, 0.0, 0.0]), 0);
//! assert_eq!(palette.len(), 2);
//! ```

use crate::{Error, Result};
use std::collections::HashMap;

/// Ordered list of color tuples with exact-match lookup.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    width: usize,
    entries: Vec<Vec<f32>>,
    lookup: HashMap<Vec<u32>, usize>,
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.entries == other.entries
    }
}

impl Palette {
    /// Creates an empty palette whose entries have `width` components.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            entries: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Builds a palette from explicit entries.
    ///
    /// Duplicate entries are kept in order; lookups resolve to the first one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if entries differ in width.
    pub fn from_entries(entries: Vec<Vec<f32>>) -> Result<Self> {
        let width = entries.first().map_or(0, Vec::len);
        let mut palette = Self::new(width);
        for entry in entries {
            if entry.len() != width {
                return Err(Error::invalid_parameter(format!(
                    "palette entry has {} components, expected {}",
                    entry.len(),
                    width
                )));
            }
            let idx = palette.entries.len();
            palette.lookup.entry(key(&entry)).or_insert(idx);
            palette.entries.push(entry);
        }
        Ok(palette)
    }

    /// Number of components per entry.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the palette has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in palette order.
    #[inline]
    pub fn entries(&self) -> &[Vec<f32>] {
        &self.entries
    }

    /// Entry at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&[f32]> {
        self.entries.get(index).map(Vec::as_slice)
    }

    /// Index of the first entry exactly equal to `color`.
    pub fn index_of(&self, color: &[f32]) -> Option<usize> {
        self.lookup.get(&key(color)).copied()
    }

    /// Returns the index of `color`, appending it if absent.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `color` has the wrong number of components.
    pub fn register(&mut self, color: &[f32]) -> usize {
        debug_assert_eq!(color.len(), self.width, "palette entry width");
        let next = self.entries.len();
        let idx = *self.lookup.entry(key(color)).or_insert(next);
        if idx == next {
            self.entries.push(color.to_vec());
        }
        idx
    }

    /// Values of component `c` across all entries, in palette order.
    pub fn component(&self, c: usize) -> Vec<f32> {
        self.entries.iter().map(|e| e[c]).collect()
    }
}

/// Bit-pattern key with `-0.0` folded onto `0.0` so that the hash lookup
/// agrees with `==` on tuples.
fn key(color: &[f32]) -> Vec<u32> {
    color
        .iter()
        .map(|&v| if v == 0.0 { 0.0f32.to_bits() } else { v.to_bits() })
        .collect()
}

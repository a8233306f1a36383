use std::fmt;
use std::num::NonZeroU32;

use bitvec::prelude::{BitVec, Lsb0};

mod biome;

pub use biome::{BIOME_COUNT, BiomeId, UnknownBiome};

/// Half-open horizontal run `[x_start, x_end)` on row `y`.
///
/// Coordinates are signed: brush circles legitimately extend past the grid
/// edges and are clipped with [`RasterGrid::clip_span`] before any write.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub x_start: i32,
    pub x_end: i32,
    pub y: i32,
}

impl Span {
    pub const fn new(x_start: i32, x_end: i32, y: i32) -> Self {
        Self { x_start, x_end, y }
    }

    pub const fn is_empty(&self) -> bool {
        self.x_end <= self.x_start
    }

    pub fn len(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.x_end.abs_diff(self.x_start)
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        y == self.y && self.x_start <= x && x < self.x_end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDiameter;

impl fmt::Display for InvalidDiameter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "brush diameter must be at least one cell")
    }
}

impl std::error::Error for InvalidDiameter {}

/// Brush or eraser diameter in model cells, always at least one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BrushDiameter(NonZeroU32);

impl BrushDiameter {
    pub fn new(cells: u32) -> Result<Self, InvalidDiameter> {
        NonZeroU32::new(cells).map(Self).ok_or(InvalidDiameter)
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterGridError {
    InvalidSize { width: u32, height: u32 },
    OutOfBounds { x: u32, y: u32 },
    InvalidSpan { x_start: u32, x_end: u32 },
}

impl fmt::Display for RasterGridError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterGridError::InvalidSize { width, height } => {
                write!(formatter, "map size {width}x{height} is not usable")
            }
            RasterGridError::OutOfBounds { x, y } => {
                write!(formatter, "cell ({x}, {y}) is outside the map")
            }
            RasterGridError::InvalidSpan { x_start, x_end } => {
                write!(formatter, "span start {x_start} is past its end {x_end}")
            }
        }
    }
}

impl std::error::Error for RasterGridError {}

/// Dense biome label map plus a per-row dirty mask.
pub struct RasterGrid {
    // labels.len() == width * height, dirty_rows.len() == height
    width: u32,
    height: u32,
    labels: Box<[BiomeId]>,
    dirty_rows: BitVec<usize, Lsb0>,
    dirty_row_count: usize,
}

impl RasterGrid {
    pub fn new(width: u32, height: u32) -> Result<Self, RasterGridError> {
        let cell_count = (width as usize).checked_mul(height as usize);
        match cell_count {
            Some(cell_count) if width > 0 && height > 0 && i32::try_from(width).is_ok() => {
                Ok(Self {
                    width,
                    height,
                    labels: vec![BiomeId::NONE; cell_count].into_boxed_slice(),
                    dirty_rows: BitVec::repeat(false, height as usize),
                    dirty_row_count: 0,
                })
            }
            _ => Err(RasterGridError::InvalidSize { width, height }),
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn labels(&self) -> &[BiomeId] {
        &self.labels
    }

    fn cell_index(&self, x: u32, y: u32) -> Result<usize, RasterGridError> {
        if x >= self.width || y >= self.height {
            Err(RasterGridError::OutOfBounds { x, y })
        } else {
            Ok(y as usize * self.width as usize + x as usize)
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Result<BiomeId, RasterGridError> {
        let index = self.cell_index(x, y)?;
        Ok(self.labels[index])
    }

    pub fn set(&mut self, x: u32, y: u32, label: BiomeId) -> Result<(), RasterGridError> {
        let index = self.cell_index(x, y)?;
        self.labels[index] = label;
        self.mark_row_dirty(y);
        Ok(())
    }

    pub fn row(&self, y: u32) -> Result<&[BiomeId], RasterGridError> {
        let start = self.cell_index(0, y)?;
        Ok(&self.labels[start..start + self.width as usize])
    }

    /// Writes `label` into `[x_start, x_end)` of row `y`.
    ///
    /// The range must already lie inside the grid; an empty range is a no-op
    /// that does not mark the row dirty.
    pub fn fill_row(
        &mut self,
        label: BiomeId,
        y: u32,
        x_start: u32,
        x_end: u32,
    ) -> Result<(), RasterGridError> {
        if x_start > x_end {
            return Err(RasterGridError::InvalidSpan { x_start, x_end });
        }
        if y >= self.height || x_end > self.width {
            return Err(RasterGridError::OutOfBounds {
                x: x_end.saturating_sub(1),
                y,
            });
        }
        if x_start == x_end {
            return Ok(());
        }
        let row_start = y as usize * self.width as usize;
        self.labels[row_start + x_start as usize..row_start + x_end as usize].fill(label);
        self.mark_row_dirty(y);
        Ok(())
    }

    /// Intersects `span` with the grid, returning `None` when nothing remains.
    pub fn clip_span(&self, span: Span) -> Option<Span> {
        if span.y < 0 || span.y as i64 >= self.height as i64 {
            return None;
        }
        let x_start = span.x_start.max(0);
        let x_end = span.x_end.min(self.width as i32);
        let clipped = Span::new(x_start, x_end, span.y);
        (!clipped.is_empty()).then_some(clipped)
    }

    /// Clips `span` and writes the remainder. Returns the written span, if any.
    pub fn paint_span(
        &mut self,
        label: BiomeId,
        span: Span,
    ) -> Result<Option<Span>, RasterGridError> {
        let Some(clipped) = self.clip_span(span) else {
            return Ok(None);
        };
        self.fill_row(
            label,
            clipped.y as u32,
            clipped.x_start as u32,
            clipped.x_end as u32,
        )?;
        Ok(Some(clipped))
    }

    /// Cell count per biome code, indexed by [`BiomeId::index`].
    pub fn histogram(&self) -> [usize; BIOME_COUNT as usize + 1] {
        let mut counts = [0usize; BIOME_COUNT as usize + 1];
        for label in self.labels.iter() {
            counts[label.index()] += 1;
        }
        counts
    }

    fn mark_row_dirty(&mut self, y: u32) {
        let index = y as usize;
        let was_dirty = self.dirty_rows[index];
        self.dirty_rows.set(index, true);
        self.dirty_row_count += !was_dirty as usize;
    }

    pub fn dirty_row_count(&self) -> usize {
        self.dirty_row_count
    }

    pub fn iter_dirty_rows(&self) -> impl Iterator<Item = u32> + '_ {
        self.dirty_rows.iter_ones().map(|index| index as u32)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty_rows.fill(false);
        self.dirty_row_count = 0;
    }
}

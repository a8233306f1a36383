use crate::ViewportError;

pub const DEFAULT_ZOOM_LEVELS: [f64; 10] = [0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0, 6.0, 8.0];
pub const DEFAULT_ZOOM_INDEX: usize = 3;

/// Model-unit spacings tried, smallest first, when picking the minor grid step.
const MINOR_GRID_STEPS: [f64; 9] = [1.0, 2.0, 4.0, 5.0, 10.0, 20.0, 25.0, 50.0, 100.0];
const MINOR_GRID_MIN_PIXELS: f64 = 15.0;
const MAJOR_GRID_STEP: f64 = 100.0;

/// Ordered set of allowed scale factors.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomLevels {
    levels: Vec<f64>,
    default_index: usize,
}

impl Default for ZoomLevels {
    fn default() -> Self {
        Self {
            levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            default_index: DEFAULT_ZOOM_INDEX,
        }
    }
}

impl ZoomLevels {
    /// Levels must be finite, positive and strictly increasing.
    pub fn new(levels: Vec<f64>, default_index: usize) -> Result<Self, ViewportError> {
        if levels.is_empty() {
            return Err(ViewportError::EmptyZoomLevels);
        }
        if levels.iter().any(|scale| !scale.is_finite() || *scale <= 0.0) {
            return Err(ViewportError::InvalidZoom);
        }
        if levels.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ViewportError::UnorderedZoomLevels);
        }
        if default_index >= levels.len() {
            return Err(ViewportError::UnknownZoomLevel);
        }
        Ok(Self {
            levels,
            default_index,
        })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.levels.get(index).copied()
    }

    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn default_scale(&self) -> f64 {
        self.levels[self.default_index]
    }

    pub fn index_of(&self, scale: f64) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| (level - scale).abs() <= f64::EPSILON * level.max(1.0))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.levels
    }
}

/// Background grid spacing in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLines {
    pub minor_pixels: f64,
    pub major_pixels: f64,
}

impl GridLines {
    pub fn for_scale(scale: f64) -> Self {
        let mut minor_pixels = 0.0;
        for step in MINOR_GRID_STEPS {
            minor_pixels = step * scale;
            if minor_pixels >= MINOR_GRID_MIN_PIXELS {
                break;
            }
        }
        Self {
            minor_pixels,
            major_pixels: MAJOR_GRID_STEP * scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unusable_level_lists() {
        assert_eq!(
            ZoomLevels::new(Vec::new(), 0),
            Err(ViewportError::EmptyZoomLevels)
        );
        assert_eq!(
            ZoomLevels::new(vec![1.0, 0.0], 0),
            Err(ViewportError::InvalidZoom)
        );
        assert_eq!(
            ZoomLevels::new(vec![2.0, 1.0], 0),
            Err(ViewportError::UnorderedZoomLevels)
        );
        assert_eq!(
            ZoomLevels::new(vec![1.0, 2.0], 2),
            Err(ViewportError::UnknownZoomLevel)
        );
    }

    #[test]
    fn finds_levels_by_value() {
        let levels = ZoomLevels::default();
        assert_eq!(levels.default_scale(), 1.0);
        assert_eq!(levels.index_of(0.75), Some(2));
        assert_eq!(levels.index_of(0.8), None);
    }

    #[test]
    fn minor_grid_step_is_at_least_fifteen_pixels() {
        let at_one = GridLines::for_scale(1.0);
        assert_eq!(at_one.minor_pixels, 20.0);
        assert_eq!(at_one.major_pixels, 100.0);

        assert_eq!(GridLines::for_scale(4.0).minor_pixels, 16.0);
        assert_eq!(GridLines::for_scale(8.0).minor_pixels, 16.0);
        assert_eq!(GridLines::for_scale(0.25).minor_pixels, 25.0);
        // nothing reaches fifteen pixels, the largest step is kept
        assert_eq!(GridLines::for_scale(0.1).minor_pixels, 10.0);
    }
}

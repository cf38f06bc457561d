//! Named regions of interest and frame cropping.

use ndarray::{ArrayView3, s};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A named rectangle of the frame, counted independently.
///
/// Ranges are half-open pixel spans `[start, end)`. The polygon, when
/// present, is the outline picked by the user and is kept for drawing only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub x_range: (u32, u32),
    pub y_range: (u32, u32),
    #[serde(default)]
    pub polygon: Option<Vec<(i32, i32)>>,
}

impl Region {
    /// Create a region from an explicit rectangle.
    pub fn new(
        name: impl Into<String>,
        x_range: (u32, u32),
        y_range: (u32, u32),
    ) -> Result<Self, ConfigError> {
        let region = Self {
            name: name.into(),
            x_range,
            y_range,
            polygon: None,
        };
        region.validate()?;
        Ok(region)
    }

    /// Reject rectangles whose start lies past their end.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_range.0 > self.x_range.1 || self.y_range.0 > self.y_range.1 {
            return Err(ConfigError::InvertedRegion {
                name: self.name.clone(),
                x_range: self.x_range,
                y_range: self.y_range,
            });
        }
        Ok(())
    }

    /// Create a region from outline points inside a `frame_width` x
    /// `frame_height` frame.
    ///
    /// The rectangle is the bounding box of the points, clamped so that it
    /// starts at or after pixel 0 and ends at or before the last pixel.
    pub fn from_polygon(
        name: impl Into<String>,
        points: Vec<(i32, i32)>,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let (Some(min_x), Some(max_x), Some(min_y), Some(max_y)) = (
            points.iter().map(|p| p.0).min(),
            points.iter().map(|p| p.0).max(),
            points.iter().map(|p| p.1).min(),
            points.iter().map(|p| p.1).max(),
        ) else {
            return Err(ConfigError::EmptyPolygon(name));
        };

        let x_range = clamp_span(min_x, max_x, frame_width);
        let y_range = clamp_span(min_y, max_y, frame_height);
        let mut region = Self::new(name, x_range, y_range)?;
        region.polygon = Some(points);
        Ok(region)
    }

    pub fn width(&self) -> u32 {
        self.x_range.1.saturating_sub(self.x_range.0)
    }

    pub fn height(&self) -> u32 {
        self.y_range.1.saturating_sub(self.y_range.0)
    }

    /// View of `frame` (height, width, channel) covered by this region.
    ///
    /// Spans past the frame edge are cut at the edge; a region entirely
    /// outside the frame yields an empty view.
    pub fn crop<'a>(&self, frame: ArrayView3<'a, u8>) -> ArrayView3<'a, u8> {
        let (height, width, _) = frame.dim();
        let (y0, y1) = clip(self.y_range, height);
        let (x0, x1) = clip(self.x_range, width);
        frame.slice_move(s![y0..y1, x0..x1, ..])
    }
}

fn clamp_span(min: i32, max: i32, extent: u32) -> (u32, u32) {
    let last = i64::from(extent.saturating_sub(1));
    let start = i64::from(min).clamp(0, last);
    let end = i64::from(max).clamp(start, last);
    (start as u32, end as u32)
}

fn clip(range: (u32, u32), extent: usize) -> (usize, usize) {
    let start = (range.0 as usize).min(extent);
    let end = (range.1 as usize).clamp(start, extent);
    (start, end)
}

/// Check that a set of regions is non-empty, uniquely named and upright.
pub(crate) fn validate_regions(regions: &[Region]) -> Result<(), ConfigError> {
    if regions.is_empty() {
        return Err(ConfigError::NoRegions);
    }
    for (i, region) in regions.iter().enumerate() {
        region.validate()?;
        if regions[..i].iter().any(|r| r.name == region.name) {
            return Err(ConfigError::DuplicateRegion(region.name.clone()));
        }
    }
    Ok(())
}

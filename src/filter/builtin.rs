/// Built-in filters
///
/// `ColorMatrixFilter` and `ToneCurveFilter` are generic building blocks a
/// host can register with its own parameters. The default looks
/// (`1977`, `Nashville`) are compositions of the two.

use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

use super::{Filter, FilterRegistry};
use crate::color::{ChannelCurves, ColorMatrix, ToneCurve};
use crate::error::FilterError;

/// Apply a per-pixel operation to an RGBA copy of `image`
fn map_pixels<F>(image: &DynamicImage, mut op: F) -> Result<DynamicImage, FilterError>
where
    F: FnMut(&mut [u8; 4]),
{
    if image.width() == 0 || image.height() == 0 {
        return Err(FilterError::EmptyImage);
    }

    let mut rgba: RgbaImage = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        op(&mut pixel.0);
    }
    Ok(DynamicImage::ImageRgba8(rgba))
}

/// Color matrix + offset, applied per pixel
#[derive(Debug, Clone)]
pub struct ColorMatrixFilter {
    id: String,
    matrix: ColorMatrix,
}

impl ColorMatrixFilter {
    pub fn new(id: impl Into<String>, matrix: ColorMatrix) -> Self {
        Self {
            id: id.into(),
            matrix,
        }
    }
}

impl Filter for ColorMatrixFilter {
    fn id(&self) -> &str {
        &self.id
    }

    fn process(&self, image: &DynamicImage) -> Result<DynamicImage, FilterError> {
        map_pixels(image, |px| self.matrix.apply_rgba8(px))
    }
}

/// Per-channel tone curves, optionally followed by a color matrix
#[derive(Debug, Clone)]
pub struct ToneCurveFilter {
    id: String,
    curves: ChannelCurves,
    grade: Option<ColorMatrix>,
}

impl ToneCurveFilter {
    pub fn new(id: impl Into<String>, curves: ChannelCurves) -> Self {
        Self {
            id: id.into(),
            curves,
            grade: None,
        }
    }

    /// Add a color matrix run after the curves
    pub fn with_grade(mut self, grade: ColorMatrix) -> Self {
        self.grade = if grade.is_identity() { None } else { Some(grade) };
        self
    }
}

impl Filter for ToneCurveFilter {
    fn id(&self) -> &str {
        &self.id
    }

    fn process(&self, image: &DynamicImage) -> Result<DynamicImage, FilterError> {
        map_pixels(image, |px| {
            self.curves.apply_rgba8(px);
            if let Some(grade) = &self.grade {
                grade.apply_rgba8(px);
            }
        })
    }
}

/// Warm, lifted blacks with a pink cast
pub fn vintage_1977() -> ToneCurveFilter {
    let curves = ChannelCurves {
        red: ToneCurve::from_points(&[(0, 75), (75, 125), (145, 200), (255, 255)]),
        green: ToneCurve::from_points(&[(0, 52), (42, 54), (110, 120), (255, 238)]),
        blue: ToneCurve::from_points(&[(0, 62), (65, 82), (184, 185), (255, 218)]),
    };
    ToneCurveFilter::new("1977", curves).with_grade(ColorMatrix::saturation(1.1))
}

/// Faded, warm highlights with cool shadows
pub fn nashville() -> ToneCurveFilter {
    let curves = ChannelCurves {
        red: ToneCurve::from_points(&[(0, 35), (80, 105), (190, 230), (255, 255)]),
        green: ToneCurve::from_points(&[(0, 20), (90, 95), (200, 210), (255, 235)]),
        blue: ToneCurve::from_points(&[(0, 85), (120, 125), (255, 180)]),
    };
    let warm = ColorMatrix::from_rows(
        [
            1.05, 0.02, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.92,
        ],
        [0.02, 0.0, 0.0],
    );
    ToneCurveFilter::new("Nashville", curves).with_grade(ColorMatrix::saturation(0.85).then(&warm))
}

/// Register the default looks, in display order
pub fn register_default_filters(registry: &FilterRegistry) {
    registry.register(Arc::new(vintage_1977()));
    registry.register(Arc::new(nashville()));
}

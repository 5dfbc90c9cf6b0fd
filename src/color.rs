/// Per-pixel color math used by the built-in filters
///
/// Two primitives cover the looks we ship:
/// - a 3x3 color matrix plus offset (channel mixing, saturation, tint)
/// - per-channel tone curves baked into 256-entry lookup tables
///
/// Both operate on normalized RGB (0.0 - 1.0) and leave alpha untouched.

use cgmath::{Matrix3, SquareMatrix, Vector3};

/// Rec. 601 luma weights, used for saturation matrices
const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// A 3x3 color transform with an additive offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    pub matrix: Matrix3<f32>,
    pub offset: Vector3<f32>,
}

impl ColorMatrix {
    /// Build from a row-major array (the way matrices are usually written down)
    pub fn from_rows(rows: [f32; 9], offset: [f32; 3]) -> Self {
        // cgmath stores columns
        let matrix = Matrix3::new(
            rows[0], rows[3], rows[6], // Column 0
            rows[1], rows[4], rows[7], // Column 1
            rows[2], rows[5], rows[8], // Column 2
        );
        Self {
            matrix,
            offset: Vector3::new(offset[0], offset[1], offset[2]),
        }
    }

    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
            offset: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// Saturation matrix: 0.0 = grayscale, 1.0 = unchanged, >1.0 = boosted
    pub fn saturation(amount: f32) -> Self {
        let inv = 1.0 - amount;
        let (r, g, b) = (LUMA[0] * inv, LUMA[1] * inv, LUMA[2] * inv);
        Self::from_rows(
            [
                r + amount, g, b,
                r, g + amount, b,
                r, g, b + amount,
            ],
            [0.0, 0.0, 0.0],
        )
    }

    /// Compose: apply `self` first, then `next`
    pub fn then(&self, next: &ColorMatrix) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
            offset: next.matrix * self.offset + next.offset,
        }
    }

    pub fn is_identity(&self) -> bool {
        const EPSILON: f32 = 0.001;
        let identity: Matrix3<f32> = Matrix3::identity();
        (0..3).all(|c| {
            (0..3).all(|r| (self.matrix[c][r] - identity[c][r]).abs() < EPSILON)
                && self.offset[c].abs() < EPSILON
        })
    }

    /// Transform one normalized RGB triple, clamped to 0.0 - 1.0
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = self.matrix * Vector3::new(rgb[0], rgb[1], rgb[2]) + self.offset;
        [
            out.x.clamp(0.0, 1.0),
            out.y.clamp(0.0, 1.0),
            out.z.clamp(0.0, 1.0),
        ]
    }

    /// Transform an 8-bit pixel in place (alpha is kept)
    pub fn apply_rgba8(&self, pixel: &mut [u8; 4]) {
        let rgb = self.apply([
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ]);
        pixel[0] = to_u8(rgb[0]);
        pixel[1] = to_u8(rgb[1]);
        pixel[2] = to_u8(rgb[2]);
    }
}

/// A tone curve baked into a lookup table
///
/// Control points are (input, output) pairs in 0 - 255. Values between
/// points are linearly interpolated; values outside the first/last point
/// are held flat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneCurve {
    lut: [u8; 256],
}

impl ToneCurve {
    pub fn identity() -> Self {
        let mut lut = [0u8; 256];
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self { lut }
    }

    pub fn from_points(points: &[(u8, u8)]) -> Self {
        let mut sorted: Vec<(u8, u8)> = points.to_vec();
        sorted.sort_by_key(|p| p.0);
        sorted.dedup_by_key(|p| p.0);

        if sorted.is_empty() {
            return Self::identity();
        }

        let mut lut = [0u8; 256];
        for (i, v) in lut.iter_mut().enumerate() {
            let x = i as f32;
            let first = sorted[0];
            let last = sorted[sorted.len() - 1];

            *v = if x <= first.0 as f32 {
                first.1
            } else if x >= last.0 as f32 {
                last.1
            } else {
                // x lies strictly inside some segment
                let seg = sorted
                    .windows(2)
                    .find(|w| x <= w[1].0 as f32)
                    .unwrap_or(&sorted[sorted.len() - 2..]);
                let (x0, y0) = (seg[0].0 as f32, seg[0].1 as f32);
                let (x1, y1) = (seg[1].0 as f32, seg[1].1 as f32);
                let t = (x - x0) / (x1 - x0);
                (y0 + t * (y1 - y0)).round().clamp(0.0, 255.0) as u8
            };
        }

        Self { lut }
    }

    #[inline]
    pub fn map(&self, value: u8) -> u8 {
        self.lut[value as usize]
    }
}

/// One curve per RGB channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCurves {
    pub red: ToneCurve,
    pub green: ToneCurve,
    pub blue: ToneCurve,
}

impl ChannelCurves {
    /// Same curve on every channel
    pub fn uniform(curve: ToneCurve) -> Self {
        Self {
            red: curve.clone(),
            green: curve.clone(),
            blue: curve,
        }
    }

    pub fn apply_rgba8(&self, pixel: &mut [u8; 4]) {
        pixel[0] = self.red.map(pixel[0]);
        pixel[1] = self.green.map(pixel[1]);
        pixel[2] = self.blue.map(pixel[2]);
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matrix_detection() {
        assert!(ColorMatrix::identity().is_identity());
        assert!(ColorMatrix::saturation(1.0).is_identity());

        let tinted = ColorMatrix::from_rows(
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            [0.1, 0.0, 0.0],
        );
        assert!(!tinted.is_identity());
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let mut pixel = [200, 40, 90, 128];
        ColorMatrix::saturation(0.0).apply_rgba8(&mut pixel);

        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
        assert_eq!(pixel[3], 128);
    }

    #[test]
    fn test_row_major_layout() {
        // Swap red and blue
        let swap = ColorMatrix::from_rows(
            [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        );
        let mut pixel = [255, 10, 0, 255];
        swap.apply_rgba8(&mut pixel);
        assert_eq!(pixel, [0, 10, 255, 255]);
    }

    #[test]
    fn test_then_composes_in_order() {
        let lift = ColorMatrix::from_rows(
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            [0.2, 0.2, 0.2],
        );
        let gray = ColorMatrix::saturation(0.0);
        let combined = lift.then(&gray);

        let rgb = [0.5, 0.1, 0.3];
        let expected = gray.apply(lift.apply(rgb));
        let actual = combined.apply(rgb);
        for i in 0..3 {
            assert!((expected[i] - actual[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn test_tone_curve_interpolates() {
        let curve = ToneCurve::from_points(&[(0, 20), (255, 235)]);
        assert_eq!(curve.map(0), 20);
        assert_eq!(curve.map(255), 235);
        assert_eq!(curve.map(128), 128);
    }

    #[test]
    fn test_tone_curve_holds_outside_points() {
        let curve = ToneCurve::from_points(&[(64, 10), (192, 250)]);
        assert_eq!(curve.map(0), 10);
        assert_eq!(curve.map(64), 10);
        assert_eq!(curve.map(255), 250);
    }

    #[test]
    fn test_empty_curve_is_identity() {
        assert_eq!(ToneCurve::from_points(&[]), ToneCurve::identity());
    }
}

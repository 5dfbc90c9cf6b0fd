/// Derived image copies
///
/// The coordinator never filters the source image interactively. It
/// keeps two smaller renditions instead:
/// - preview copy: fits the live preview area
/// - thumbnail copy: fits one gallery cell
///
/// Both are recomputed when the source changes. A container resize only
/// touches the preview copy.

use image::{imageops::FilterType, DynamicImage};
use std::sync::Arc;

/// Size in points (layout units, before `scale_factor`)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert to a whole-pixel bound at the given density
    pub fn to_pixels(self, scale_factor: f32) -> (u32, u32) {
        let w = (self.width * scale_factor).floor().max(0.0) as u32;
        let h = (self.height * scale_factor).floor().max(0.0) as u32;
        (w, h)
    }
}

/// Aspect-preserving fit of `size` inside `bound`
///
/// Returns `None` when either size is degenerate. An image already inside
/// the bound keeps its size; it is never scaled up.
pub fn fit_within(size: (u32, u32), bound: (u32, u32)) -> Option<(u32, u32)> {
    let (w, h) = size;
    let (tw, th) = bound;

    if w == 0 || h == 0 || tw == 0 || th == 0 {
        return None;
    }

    if w <= tw && h <= th {
        return Some(size);
    }

    let ratio = (tw as f64 / w as f64).min(th as f64 / h as f64);
    // Rounding cannot overshoot: each scaled side is <= its integer bound
    let new_w = ((w as f64 * ratio).round() as u32).clamp(1, tw);
    let new_h = ((h as f64 * ratio).round() as u32).clamp(1, th);

    Some((new_w, new_h))
}

/// Resize `image` to fit `bound`, or `None` if it cannot be done
pub fn resize_to_fit(image: &DynamicImage, bound: (u32, u32)) -> Option<DynamicImage> {
    let (w, h) = fit_within((image.width(), image.height()), bound)?;

    if (w, h) == (image.width(), image.height()) {
        return Some(image.clone());
    }

    Some(image.resize_exact(w, h, FilterType::Lanczos3))
}

/// Preview and thumbnail renditions of one source image
#[derive(Debug, Clone)]
pub struct DerivedImages {
    pub preview: Arc<DynamicImage>,
    pub thumbnail: Arc<DynamicImage>,
}

impl DerivedImages {
    /// Derive both copies; `None` if either resize fails
    pub fn derive(
        source: &DynamicImage,
        preview_bound: Bounds,
        thumbnail_bound: Bounds,
        scale_factor: f32,
    ) -> Option<Self> {
        let preview = resize_to_fit(source, preview_bound.to_pixels(scale_factor))?;
        let thumbnail = resize_to_fit(source, thumbnail_bound.to_pixels(scale_factor))?;

        log::debug!(
            "📐 Derived preview {}x{}, thumbnail {}x{} from {}x{}",
            preview.width(),
            preview.height(),
            thumbnail.width(),
            thumbnail.height(),
            source.width(),
            source.height()
        );

        Some(Self {
            preview: Arc::new(preview),
            thumbnail: Arc::new(thumbnail),
        })
    }

    /// Re-derive only the preview copy; the thumbnail is shared with `self`
    pub fn with_preview(
        &self,
        source: &DynamicImage,
        preview_bound: Bounds,
        scale_factor: f32,
    ) -> Option<Self> {
        let preview = resize_to_fit(source, preview_bound.to_pixels(scale_factor))?;
        log::debug!("📐 Re-derived preview {}x{}", preview.width(), preview.height());

        Some(Self {
            preview: Arc::new(preview),
            thumbnail: self.thumbnail.clone(),
        })
    }
}

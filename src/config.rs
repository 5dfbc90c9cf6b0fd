/// Presentation settings for the filter picker
///
/// These are the tunables a host may want to change: thumbnail geometry,
/// highlight styling, toolbar titles and the output pixel density.
/// The struct is serialized to JSON so it can live in a config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::Result;

/// All presentation settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilterUiConfig {
    // ========== Gallery ==========

    /// Width of a gallery cell in points
    pub thumbnail_width: f32,

    /// Height of the filter name label under each thumbnail
    pub thumbnail_label_height: f32,

    /// Font size of the filter name label
    pub thumbnail_label_size: f32,

    /// Thickness of the strip that holds the gallery
    /// - Height when the gallery sits under the preview (portrait)
    /// - Width when it sits beside it (landscape)
    pub gallery_extent: f32,

    /// Margin removed from `gallery_extent` to get the thumbnail bound
    pub thumbnail_inset: f32,

    /// RGB color of the border around the selected cell (0.0 - 1.0)
    pub highlight_color: [f32; 3],

    /// Border width of the selected cell
    pub highlight_border_width: f32,

    // ========== Window ==========

    /// Initial container size in points
    pub window_width: f32,
    pub window_height: f32,

    // ========== Toolbar ==========

    pub cancel_title: String,
    pub confirm_title: String,

    // ========== Output ==========

    /// Pixels per point used when deriving the preview and thumbnail copies
    pub scale_factor: f32,
}

impl Default for FilterUiConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: 120.0,
            thumbnail_label_height: 30.0,
            thumbnail_label_size: 15.0,
            gallery_extent: 120.0,
            thumbnail_inset: 10.0,
            highlight_color: [0.0, 0.0, 1.0],
            highlight_border_width: 4.0,
            window_width: 480.0,
            window_height: 800.0,
            cancel_title: "Cancel".to_string(),
            confirm_title: "Confirm".to_string(),
            scale_factor: 1.0,
        }
    }
}

impl FilterUiConfig {
    /// Load settings from the user's config directory
    ///
    /// - Linux: ~/.config/filter-picker/config.json
    /// - macOS: ~/Library/Application Support/filter-picker/config.json
    /// - Windows: %APPDATA%\filter-picker\config.json
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let json = fs::read_to_string(&path)?;
                let config = Self::from_json(&json)?;
                log::info!("⚙️  Loaded settings from {}", path.display());
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Where the settings file is expected
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("filter-picker");
        path.push("config.json");
        Some(path)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Bounding box (in points) of the thumbnail copy
    pub fn thumbnail_bound(&self) -> (f32, f32) {
        let side = (self.gallery_extent - self.thumbnail_inset).max(0.0);
        (side, side)
    }

    /// Thickness of the gallery strip once labels are included
    pub fn strip_thickness(&self) -> f32 {
        self.gallery_extent + self.thumbnail_label_height
    }

    /// Size of one gallery cell including its label
    pub fn cell_size(&self) -> (f32, f32) {
        (
            self.thumbnail_width,
            self.thumbnail_width + self.thumbnail_label_height,
        )
    }
}

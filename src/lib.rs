//! Embeddable photo filter picker.
//!
//! Shows a source image, a gallery of filter thumbnails and a live
//! preview. Once the user confirms or cancels, exactly one
//! [`FilterOutcome`] is delivered on the receiver handed out at
//! construction.
//!
//! ```no_run
//! use filter_picker::{create_filter_ui, FilterRegistry, FilterUiConfig};
//!
//! let image = image::open("photo.jpg").unwrap();
//! let registry = FilterRegistry::new();
//! let (ui, outcome) = create_filter_ui(image, registry, FilterUiConfig::default(), true);
//! // run `ui` as an iced application, then read `outcome`
//! # drop((ui, outcome));
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod state;
pub mod ui;

use image::DynamicImage;
use std::sync::Arc;

pub use config::FilterUiConfig;
pub use error::{Error, FilterError, Result};
pub use filter::{register_default_filters, Filter, FilterId, FilterRegistry};
pub use state::coordinator::{ConfirmJob, ConfirmResult, FilterCoordinator};
pub use state::outcome::{FilterOutcome, OutcomeReceiver};
pub use ui::{FilterUi, Message, Mode};

/// Create the full picker flow (preview, gallery, Cancel/Confirm toolbar)
///
/// With `use_default_filters` the built-in looks are added to `registry`
/// first.
pub fn create_filter_ui(
    image: impl Into<Arc<DynamicImage>>,
    registry: FilterRegistry,
    config: FilterUiConfig,
    use_default_filters: bool,
) -> (FilterUi, OutcomeReceiver) {
    if use_default_filters {
        register_default_filters(&registry);
    }
    // The toolbar takes part of the window
    let window = iced::Size::new(config.window_width, config.window_height);
    let container = Mode::Normal.content_bounds(window);
    let (coordinator, outcome) = FilterCoordinator::with_container(image, registry, config, container);
    (FilterUi::new(coordinator, Mode::Normal), outcome)
}

/// Create just the coordinator, for hosts embedding the picker in their own view
pub fn create_custom_filter_ui(
    image: impl Into<Arc<DynamicImage>>,
    registry: FilterRegistry,
    config: FilterUiConfig,
    use_default_filters: bool,
) -> (FilterCoordinator, OutcomeReceiver) {
    if use_default_filters {
        register_default_filters(&registry);
    }
    FilterCoordinator::new(image, registry, config)
}

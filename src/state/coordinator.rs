/// The filter coordinator
///
/// Single source of truth for one picker session. It links:
/// - the full-resolution source image
/// - the derived preview and thumbnail copies
/// - the selected filter and the filtered preview
/// - the confirm workflow and the one outcome reported to the host
///
/// Everything here runs on the UI thread except `ConfirmJob::run`, which
/// moves the full-resolution filter apply onto tokio's blocking pool.

use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;

use super::derive::{Bounds, DerivedImages};
use super::outcome::{FilterOutcome, OutcomeReceiver, OutcomeSender};
use crate::config::FilterUiConfig;
use crate::error::{Error, FilterError, Result};
use crate::filter::{Filter, FilterRegistry};
use crate::ui::gallery::ThumbnailGallery;
use crate::ui::layout::{LayoutPlan, Orientation};
use crate::ui::preview::PreviewSurface;

/// Result of the background filter apply
pub type ConfirmResult = std::result::Result<Arc<DynamicImage>, FilterError>;

/// Progress indicator shown while a confirm is in flight
///
/// Held by the coordinator from dispatch until `finish_confirm`; dropping
/// it hides the indicator.
#[derive(Debug)]
pub struct ProgressIndicator {
    started: Instant,
}

impl ProgressIndicator {
    fn show() -> Self {
        log::debug!("⏳ Progress indicator shown");
        Self {
            started: Instant::now(),
        }
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        log::debug!("⏳ Progress indicator hidden after {:?}", self.started.elapsed());
    }
}

/// Full-resolution filter apply, ready to run off the UI thread
#[derive(Clone)]
pub struct ConfirmJob {
    filter: Arc<dyn Filter>,
    source: Arc<DynamicImage>,
}

impl ConfirmJob {
    pub fn filter_id(&self) -> &str {
        self.filter.id()
    }

    /// Run on tokio's blocking pool
    pub async fn run(self) -> ConfirmResult {
        task::spawn_blocking(move || self.run_blocking())
            .await
            .map_err(|e| FilterError::Worker(format!("Task join error: {}", e)))?
    }

    /// Run on the current thread
    pub fn run_blocking(&self) -> ConfirmResult {
        self.filter.process(&self.source).map(Arc::new)
    }
}

impl std::fmt::Debug for ConfirmJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmJob")
            .field("filter", &self.filter.id())
            .field("width", &self.source.width())
            .field("height", &self.source.height())
            .finish()
    }
}

pub struct FilterCoordinator {
    registry: FilterRegistry,
    config: FilterUiConfig,
    source: Arc<DynamicImage>,
    container: Bounds,
    layout: LayoutPlan,
    derived: Option<DerivedImages>,
    selection: Option<Arc<dyn Filter>>,
    preview: Option<Arc<DynamicImage>>,
    gallery: ThumbnailGallery,
    surface: PreviewSurface,
    progress: Option<ProgressIndicator>,
    outcome: OutcomeSender,
}

impl FilterCoordinator {
    /// Create a coordinator for `image`, sized to the configured window
    pub fn new(
        image: impl Into<Arc<DynamicImage>>,
        registry: FilterRegistry,
        config: FilterUiConfig,
    ) -> (Self, OutcomeReceiver) {
        let container = Bounds::new(config.window_width, config.window_height);
        Self::with_container(image, registry, config, container)
    }

    pub fn with_container(
        image: impl Into<Arc<DynamicImage>>,
        registry: FilterRegistry,
        config: FilterUiConfig,
        container: Bounds,
    ) -> (Self, OutcomeReceiver) {
        let (outcome, receiver) = OutcomeSender::channel();
        let mut coordinator = Self {
            registry,
            config,
            source: Arc::new(DynamicImage::new_rgba8(0, 0)),
            container,
            layout: LayoutPlan::for_orientation(Orientation::from_size(container)),
            derived: None,
            selection: None,
            preview: None,
            gallery: ThumbnailGallery::new(),
            surface: PreviewSurface::new(),
            progress: None,
            outcome,
        };
        coordinator.set_image(image);
        (coordinator, receiver)
    }

    // ========== Image & container ==========

    /// Replace the source image and re-derive everything from it
    ///
    /// The current selection is kept and re-applied to the new preview copy.
    pub fn set_image(&mut self, image: impl Into<Arc<DynamicImage>>) {
        self.source = image.into();
        log::info!(
            "🖼️  Source image set: {}x{}",
            self.source.width(),
            self.source.height()
        );
        self.rederive();
    }

    pub fn update_image(&mut self, image: impl Into<Arc<DynamicImage>>) {
        self.set_image(image);
    }

    /// New container size, e.g. after a rotation or window resize
    pub fn set_container_size(&mut self, container: Bounds) {
        let orientation = match (Orientation::from_size(container), self.layout.orientation) {
            // Keep an explicit left-landscape while the container stays wide
            (Orientation::LandscapeRight, Orientation::LandscapeLeft) => Orientation::LandscapeLeft,
            (guess, _) => guess,
        };
        self.container = container;
        self.layout = LayoutPlan::for_orientation(orientation);
        self.relayout();
    }

    /// Override the orientation the container size suggests
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.layout.orientation == orientation {
            return;
        }
        self.layout = LayoutPlan::for_orientation(orientation);
        self.relayout();
    }

    fn preview_bound(&self) -> Bounds {
        self.layout
            .preview_bound(self.container, self.config.strip_thickness())
    }

    /// Source changed: derive both copies and re-render the gallery
    fn rederive(&mut self) {
        let preview_bound = self.preview_bound();
        let (tw, th) = self.config.thumbnail_bound();

        match DerivedImages::derive(
            &self.source,
            preview_bound,
            Bounds::new(tw, th),
            self.config.scale_factor,
        ) {
            Some(derived) => {
                self.surface.set_original(derived.preview.clone());
                self.derived = Some(derived);
                self.render_gallery();
                self.refresh_preview();
            }
            None => {
                log::warn!(
                    "⚠️  Could not derive copies of {}x{} for {:?}; keeping previous ones",
                    self.source.width(),
                    self.source.height(),
                    preview_bound
                );
            }
        }
    }

    /// Container or orientation changed: only the preview copy depends on it
    fn relayout(&mut self) {
        let Some(current) = &self.derived else {
            self.rederive();
            return;
        };

        let preview_bound = self.preview_bound();
        match current.with_preview(&self.source, preview_bound, self.config.scale_factor) {
            Some(derived) => {
                self.surface.set_original(derived.preview.clone());
                self.derived = Some(derived);
                self.refresh_preview();
            }
            None => {
                log::warn!(
                    "⚠️  Could not fit the preview into {:?}; keeping the previous one",
                    preview_bound
                );
            }
        }
    }

    // ========== Gallery ==========

    fn render_gallery(&mut self) {
        let Some(derived) = &self.derived else {
            return;
        };

        // Read the revision first so a mutation during the render marks us stale
        let revision = self.registry.revision();
        let filters = self.registry.snapshot();
        self.gallery.render(&filters, &derived.thumbnail, revision);

        // Follow the registry: a replaced filter is re-bound, a removed one is dropped
        if let Some(current) = &self.selection {
            match filters.iter().find(|f| f.id() == current.id()) {
                Some(latest) => {
                    let latest = latest.clone();
                    self.selection = Some(latest);
                    self.gallery.set_selected(self.selection.as_ref().map(|f| f.id()));
                }
                None => {
                    log::info!("🗑️  Selected filter '{}' was removed", current.id());
                    self.selection = None;
                    self.gallery.set_selected(None);
                }
            }
        }
    }

    /// Re-render the gallery if the registry changed; returns true if it did
    pub fn refresh_gallery(&mut self) -> bool {
        if !self.gallery.is_stale(self.registry.revision()) {
            return false;
        }
        self.render_gallery();
        self.refresh_preview();
        true
    }

    // ========== Selection & preview ==========

    /// Select the filter registered under `id` and recompute the preview
    ///
    /// Selecting the current filter again does nothing. Pending registry
    /// changes are picked up first.
    pub fn select(&mut self, id: &str) -> Result<()> {
        self.ensure_interactive()?;
        self.refresh_gallery();

        if self.selection.as_ref().map(|f| f.id()) == Some(id) {
            return Ok(());
        }

        let filter = self
            .registry
            .get(id)
            .ok_or_else(|| Error::UnknownFilter(id.to_string()))?;

        log::info!("🎨 Selected filter '{}'", id);
        self.selection = Some(filter);
        self.gallery.set_selected(Some(id));
        self.refresh_preview();
        Ok(())
    }

    fn refresh_preview(&mut self) {
        self.preview = match (&self.selection, &self.derived) {
            (Some(filter), Some(derived)) => match filter.process(&derived.preview) {
                Ok(image) => Some(Arc::new(image)),
                Err(e) => {
                    log::warn!("⚠️  Preview for '{}' failed: {}", filter.id(), e);
                    None
                }
            },
            _ => None,
        };
        self.surface.set_processed(self.preview.clone());
    }

    // ========== Confirm / cancel ==========

    /// Start applying the selected filter to the full-resolution source
    ///
    /// Shows the progress indicator and hands back the job to run off the
    /// UI thread. Feed its result to `finish_confirm`.
    pub fn confirm(&mut self) -> Result<ConfirmJob> {
        self.ensure_interactive()?;
        // A filter the host removed since the last render must not be applied
        self.refresh_gallery();

        let filter = self.selection.clone().ok_or(Error::NoSelection)?;
        self.progress = Some(ProgressIndicator::show());

        log::info!(
            "🚀 Applying '{}' to {}x{} source",
            filter.id(),
            self.source.width(),
            self.source.height()
        );

        Ok(ConfirmJob {
            filter,
            source: self.source.clone(),
        })
    }

    /// Complete a confirm: hide the indicator and report the outcome
    pub fn finish_confirm(&mut self, result: ConfirmResult) -> Result<()> {
        let Some(progress) = self.progress.take() else {
            return Err(Error::NoPendingConfirm);
        };
        drop(progress);

        let outcome = match result {
            Ok(filtered) => {
                log::info!("✅ Filter applied: {}x{}", filtered.width(), filtered.height());
                FilterOutcome::Filtered(filtered)
            }
            Err(e) => {
                log::warn!("⚠️  Filter apply failed: {}", e);
                FilterOutcome::Failed(self.source.clone())
            }
        };

        self.deliver(outcome)
    }

    /// Back out without applying anything
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_interactive()?;
        log::info!("↩️  Cancelled");
        self.deliver(FilterOutcome::Cancelled(self.source.clone()))
    }

    fn deliver(&mut self, outcome: FilterOutcome) -> Result<()> {
        if self.outcome.send(outcome) {
            Ok(())
        } else {
            Err(Error::Dismissed)
        }
    }

    fn ensure_interactive(&self) -> Result<()> {
        if self.outcome.is_spent() {
            return Err(Error::Dismissed);
        }
        if self.progress.is_some() {
            return Err(Error::ConfirmPending);
        }
        Ok(())
    }

    // ========== Synchronous helpers ==========

    /// Apply the selected filter to the source on the current thread
    ///
    /// Without a selection this is `Error::NoSelection`.
    pub fn apply_selected_filter(&self) -> Result<DynamicImage> {
        self.process(&self.source)
    }

    /// Run the selected filter on an arbitrary image
    pub fn process(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let filter = self.selection.as_ref().ok_or(Error::NoSelection)?;
        Ok(filter.process(image)?)
    }

    // ========== Accessors ==========

    pub fn source(&self) -> &Arc<DynamicImage> {
        &self.source
    }

    pub fn derived(&self) -> Option<&DerivedImages> {
        self.derived.as_ref()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_ref().map(|f| f.id())
    }

    /// Filtered preview copy, `None` without a selection
    pub fn preview(&self) -> Option<&Arc<DynamicImage>> {
        self.preview.as_ref()
    }

    pub fn gallery(&self) -> &ThumbnailGallery {
        &self.gallery
    }

    pub fn surface(&self) -> &PreviewSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut PreviewSurface {
        &mut self.surface
    }

    pub fn layout(&self) -> LayoutPlan {
        self.layout
    }

    pub fn container(&self) -> Bounds {
        self.container
    }

    pub fn config(&self) -> &FilterUiConfig {
        &self.config
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// A confirm is in flight
    pub fn is_busy(&self) -> bool {
        self.progress.is_some()
    }

    /// An outcome has been delivered; the session is over
    pub fn is_dismissed(&self) -> bool {
        self.outcome.is_spent()
    }
}

impl std::fmt::Debug for FilterCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCoordinator")
            .field("source", &(self.source.width(), self.source.height()))
            .field("container", &self.container)
            .field("layout", &self.layout)
            .field("selection", &self.selection())
            .field("busy", &self.is_busy())
            .field("dismissed", &self.is_dismissed())
            .finish_non_exhaustive()
    }
}

use filter_picker::state::derive::Bounds;
use filter_picker::ui::layout::Axis;
use filter_picker::{
    create_custom_filter_ui, create_filter_ui, Error, Filter, FilterCoordinator, FilterError,
    FilterOutcome, FilterRegistry, FilterUiConfig, Message, Mode,
};
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::{Arc, Mutex};

/// Pass-through filter that remembers the size of every image it saw
struct NoopFilter {
    seen: Mutex<Vec<(u32, u32)>>,
}

impl NoopFilter {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    fn last_seen(&self) -> Option<(u32, u32)> {
        self.seen.lock().unwrap().last().copied()
    }
}

impl Filter for NoopFilter {
    fn id(&self) -> &str {
        "noop"
    }

    fn name(&self) -> &str {
        "No-op"
    }

    fn process(&self, image: &DynamicImage) -> Result<DynamicImage, FilterError> {
        self.seen.lock().unwrap().push((image.width(), image.height()));
        Ok(image.clone())
    }
}

fn photo() -> DynamicImage {
    let mut img = RgbaImage::new(1000, 500);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]);
    }
    DynamicImage::ImageRgba8(img)
}

fn custom(registry: FilterRegistry) -> (FilterCoordinator, filter_picker::OutcomeReceiver) {
    let config = FilterUiConfig {
        window_width: 300.0,
        window_height: 600.0,
        ..FilterUiConfig::default()
    };
    create_custom_filter_ui(photo(), registry, config, false)
}

#[tokio::test]
async fn confirm_returns_full_resolution_image() {
    let noop = NoopFilter::new();
    let registry = FilterRegistry::new();
    registry.register(noop.clone());

    let (mut coordinator, mut outcome) = custom(registry);

    let thumbnail = &coordinator.derived().unwrap().thumbnail;
    assert_eq!((thumbnail.width(), thumbnail.height()), (110, 55));

    coordinator.select("noop").unwrap();
    let job = coordinator.confirm().unwrap();
    let result = job.run().await;
    coordinator.finish_confirm(result).unwrap();

    assert_eq!(noop.last_seen(), Some((1000, 500)));
    match outcome.try_recv().unwrap() {
        FilterOutcome::Filtered(image) => {
            assert_eq!((image.width(), image.height()), (1000, 500));
        }
        other => panic!("expected a filtered image, got {:?}", other),
    }
}

#[test]
fn empty_registry_has_no_cells_and_cannot_confirm() {
    let (mut coordinator, mut outcome) = custom(FilterRegistry::new());

    assert!(coordinator.gallery().cells().is_empty());
    assert!(matches!(coordinator.confirm(), Err(Error::NoSelection)));
    assert!(!coordinator.is_busy());
    assert!(outcome.try_recv().is_err());
}

#[test]
fn cancel_reports_only_the_original() {
    let noop = NoopFilter::new();
    let registry = FilterRegistry::new();
    registry.register(noop.clone());
    let (mut coordinator, mut outcome) = custom(registry);
    let original = coordinator.source().clone();

    coordinator.cancel().unwrap();

    match outcome.try_recv().unwrap() {
        FilterOutcome::Cancelled(image) => assert!(Arc::ptr_eq(&image, &original)),
        other => panic!("expected cancellation, got {:?}", other),
    }
    // Nothing else can follow
    assert!(matches!(coordinator.confirm(), Err(Error::Dismissed)));
}

#[test]
fn rotation_flips_gallery_axis() {
    let (mut coordinator, _outcome) = custom(FilterRegistry::new());
    let before = coordinator.derived().unwrap().preview.clone();
    assert_eq!(coordinator.layout().gallery_scroll, Axis::Horizontal);

    coordinator.set_container_size(Bounds::new(600.0, 300.0));

    assert_eq!(coordinator.layout().gallery_scroll, Axis::Vertical);
    let after = &coordinator.derived().unwrap().preview;
    assert!(!Arc::ptr_eq(&before, after));
    assert!(after.width() <= 450 && after.height() <= 300);
}

#[test]
fn default_filters_show_up_in_the_gallery() {
    let registry = FilterRegistry::new();
    let (ui, _outcome) = create_filter_ui(photo(), registry.clone(), FilterUiConfig::default(), true);

    assert_eq!(ui.mode(), Mode::Normal);
    let names: Vec<&str> = ui
        .coordinator()
        .gallery()
        .cells()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["1977", "Nashville"]);
    assert!(ui.coordinator().gallery().cells().iter().all(|c| !c.degraded));
}

#[test]
fn windowed_ui_leaves_room_for_the_toolbar() {
    let (ui, _outcome) = create_filter_ui(photo(), FilterRegistry::new(), FilterUiConfig::default(), false);

    // 480x800 window minus the 44pt toolbar
    assert_eq!(ui.coordinator().container(), Bounds::new(480.0, 756.0));
    let preview = &ui.coordinator().derived().unwrap().preview;
    assert_eq!((preview.width(), preview.height()), (480, 240));
}

#[test]
fn closing_the_window_mid_apply_still_reports_once() {
    let registry = FilterRegistry::new();
    let (mut ui, mut outcome) = create_filter_ui(photo(), registry, FilterUiConfig::default(), true);
    let _ = ui.update(Message::FilterSelected("1977".to_string()));
    let job = ui.coordinator_mut().confirm().unwrap();

    let _ = ui.update(Message::CloseRequested);
    assert!(outcome.try_recv().is_err());

    let _ = ui.update(Message::FilterApplied(job.run_blocking()));
    assert!(matches!(outcome.try_recv(), Ok(FilterOutcome::Filtered(_))));
    assert!(outcome.try_recv().is_err());
}

#[test]
fn ui_messages_drive_the_coordinator() {
    let registry = FilterRegistry::new();
    let (mut ui, mut outcome) = create_filter_ui(photo(), registry, FilterUiConfig::default(), true);

    let _ = ui.update(Message::FilterSelected("Nashville".to_string()));
    assert_eq!(ui.coordinator().selection(), Some("Nashville"));

    let job = ui.coordinator_mut().confirm().unwrap();
    assert!(ui.coordinator().is_busy());

    // Confirm and cancel are ignored while the job is in flight
    let _ = ui.update(Message::Cancel);
    assert!(outcome.try_recv().is_err());

    let _ = ui.update(Message::FilterApplied(job.run_blocking()));
    assert!(!ui.coordinator().is_busy());
    assert!(matches!(outcome.try_recv(), Ok(FilterOutcome::Filtered(_))));
}

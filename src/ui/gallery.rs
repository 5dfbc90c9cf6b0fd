/// Thumbnail gallery: one cell per registered filter
///
/// Each cell shows the thumbnail copy run through its filter. A filter
/// that fails on the thumbnail gets a degraded cell showing the plain
/// thumbnail instead, and the rest of the gallery is unaffected.

use iced::widget::image::Handle;
use iced::widget::{button, column, container, image as image_widget, scrollable, text, Column, Row};
use iced::{Border, Color, Element, Length};
use image::DynamicImage;
use std::sync::Arc;

use super::app::Message;
use super::layout::Axis;
use crate::config::FilterUiConfig;
use crate::filter::{Filter, FilterId};

/// Build an iced image handle from decoded pixels
pub(crate) fn to_handle(image: &DynamicImage) -> Handle {
    let rgba = image.to_rgba8();
    Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}

/// One rendered gallery entry
#[derive(Debug, Clone)]
pub struct GalleryCell {
    pub id: FilterId,
    pub name: String,
    pub thumbnail: Arc<DynamicImage>,
    /// The filter failed; `thumbnail` is the unfiltered copy
    pub degraded: bool,
    handle: Handle,
}

#[derive(Debug, Default)]
pub struct ThumbnailGallery {
    cells: Vec<GalleryCell>,
    selected: Option<FilterId>,
    /// Registry revision the cells were rendered from
    rendered_revision: Option<u64>,
}

impl ThumbnailGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-render every cell from a registry snapshot
    pub fn render(&mut self, filters: &[Arc<dyn Filter>], thumbnail: &Arc<DynamicImage>, revision: u64) {
        self.cells = filters
            .iter()
            .map(|filter| render_cell(filter.as_ref(), thumbnail))
            .collect();
        self.rendered_revision = Some(revision);

        // Drop a highlight whose filter no longer has a cell
        let still_listed = self
            .selected
            .as_ref()
            .map_or(true, |id| self.cells.iter().any(|c| &c.id == id));
        if !still_listed {
            self.selected = None;
        }

        log::debug!("🖼️  Rendered {} gallery cells", self.cells.len());
    }

    /// True if the registry changed since the last render
    pub fn is_stale(&self, revision: u64) -> bool {
        self.rendered_revision != Some(revision)
    }

    pub fn cells(&self) -> &[GalleryCell] {
        &self.cells
    }

    pub fn cell(&self, id: &str) -> Option<&GalleryCell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_selected(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    /// A tap on the cell at `index`: the selection event for that filter
    pub fn tap(&self, index: usize) -> Option<Message> {
        self.cells
            .get(index)
            .map(|cell| Message::FilterSelected(cell.id.clone()))
    }

    pub fn view(&self, config: &FilterUiConfig, scroll: Axis, enabled: bool) -> Element<'_, Message> {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(index, cell)| self.view_cell(index, cell, config, enabled));

        match scroll {
            Axis::Horizontal => scrollable(Row::with_children(cells).spacing(4).padding(2))
                .direction(scrollable::Direction::Horizontal(scrollable::Scrollbar::new()))
                .width(Length::Fill)
                .into(),
            Axis::Vertical => scrollable(Column::with_children(cells).spacing(4).padding(2))
                .direction(scrollable::Direction::Vertical(scrollable::Scrollbar::new()))
                .height(Length::Fill)
                .into(),
        }
    }

    fn view_cell<'a>(
        &'a self,
        index: usize,
        cell: &'a GalleryCell,
        config: &FilterUiConfig,
        enabled: bool,
    ) -> Element<'a, Message> {
        let (cell_width, cell_height) = config.cell_size();
        let (thumb_side, _) = config.thumbnail_bound();

        let mut label = text(cell.name.as_str()).size(config.thumbnail_label_size);
        if cell.degraded {
            label = label.color(Color::from_rgb(0.55, 0.55, 0.55));
        }

        let content = column![
            image_widget(cell.handle.clone())
                .width(Length::Fixed(thumb_side))
                .height(Length::Fixed(thumb_side)),
            label,
        ]
        .spacing(2)
        .align_x(iced::Alignment::Center);

        let is_selected = self.selected.as_deref() == Some(cell.id.as_str());
        let [r, g, b] = config.highlight_color;
        let border = if is_selected {
            Border {
                color: Color::from_rgb(r, g, b),
                width: config.highlight_border_width,
                radius: 0.0.into(),
            }
        } else {
            Border::default()
        };

        let framed = container(content)
            .width(Length::Fixed(cell_width))
            .height(Length::Fixed(cell_height))
            .center_x(Length::Fixed(cell_width))
            .style(move |_theme| container::Style {
                border,
                ..container::Style::default()
            });

        button(framed)
            .padding(0)
            .style(button::text)
            .on_press_maybe(if enabled { self.tap(index) } else { None })
            .into()
    }
}

fn render_cell(filter: &dyn Filter, thumbnail: &Arc<DynamicImage>) -> GalleryCell {
    let (image, degraded) = match filter.process(thumbnail) {
        Ok(filtered) => (Arc::new(filtered), false),
        Err(e) => {
            log::warn!("⚠️  Thumbnail for '{}' failed: {}", filter.id(), e);
            (thumbnail.clone(), true)
        }
    };

    GalleryCell {
        id: filter.id().to_string(),
        name: filter.name().to_string(),
        handle: to_handle(&image),
        thumbnail: image,
        degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::testing::{arc, solid, BrokenFilter, InvertFilter};

    #[test]
    fn test_one_cell_per_filter_in_order() {
        let thumb = Arc::new(solid(4, 2, [10, 20, 30, 255]));
        let mut gallery = ThumbnailGallery::new();
        gallery.render(
            &[arc(InvertFilter("b")), arc(InvertFilter("a"))],
            &thumb,
            1,
        );

        let ids: Vec<&str> = gallery.cells().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let px = gallery.cells()[0].thumbnail.to_rgba8().get_pixel(0, 0).0;
        assert_eq!(px, [245, 235, 225, 255]);
    }

    #[test]
    fn test_failed_filter_degrades_single_cell() {
        let thumb = Arc::new(solid(4, 2, [10, 20, 30, 255]));
        let mut gallery = ThumbnailGallery::new();
        gallery.render(
            &[
                arc(InvertFilter("ok")),
                arc(BrokenFilter("broken")),
                arc(InvertFilter("also-ok")),
            ],
            &thumb,
            1,
        );

        assert_eq!(gallery.cells().len(), 3);
        let broken = gallery.cell("broken").unwrap();
        assert!(broken.degraded);
        assert!(Arc::ptr_eq(&broken.thumbnail, &thumb));
        assert!(!gallery.cell("ok").unwrap().degraded);
        assert!(!gallery.cell("also-ok").unwrap().degraded);
    }

    #[test]
    fn test_empty_registry_renders_nothing() {
        let mut gallery = ThumbnailGallery::new();
        gallery.render(&[], &Arc::new(solid(2, 2, [0; 4])), 0);
        assert!(gallery.cells().is_empty());
        assert!(gallery.tap(0).is_none());
    }

    #[test]
    fn test_tap_emits_selection_event() {
        let mut gallery = ThumbnailGallery::new();
        gallery.render(
            &[arc(InvertFilter("x")), arc(InvertFilter("y"))],
            &Arc::new(solid(2, 2, [0; 4])),
            0,
        );

        match gallery.tap(1) {
            Some(Message::FilterSelected(id)) => assert_eq!(id, "y"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_rerender_drops_missing_highlight() {
        let thumb = Arc::new(solid(2, 2, [0; 4]));
        let mut gallery = ThumbnailGallery::new();
        gallery.render(&[arc(InvertFilter("x"))], &thumb, 1);
        gallery.set_selected(Some("x"));
        assert_eq!(gallery.selected(), Some("x"));

        gallery.render(&[arc(InvertFilter("y"))], &thumb, 2);
        assert_eq!(gallery.selected(), None);
    }

    #[test]
    fn test_staleness_follows_revision() {
        let mut gallery = ThumbnailGallery::new();
        assert!(gallery.is_stale(0));

        gallery.render(&[], &Arc::new(solid(1, 1, [0; 4])), 5);
        assert!(!gallery.is_stale(5));
        assert!(gallery.is_stale(6));
    }
}

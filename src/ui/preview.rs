/// Live preview surface
///
/// Holds two already-computed images: the raw preview copy and the
/// filtered preview. While the pointer is held down the raw copy is shown
/// so the user can compare; releasing (or leaving) shows the filtered one.

use iced::widget::image::Handle;
use iced::widget::{image as image_widget, mouse_area, text};
use iced::{ContentFit, Element, Length};
use image::DynamicImage;
use std::sync::Arc;

use super::app::Message;
use super::gallery::to_handle;

#[derive(Debug, Clone)]
struct Shown {
    image: Arc<DynamicImage>,
    handle: Handle,
}

impl Shown {
    fn new(image: Arc<DynamicImage>) -> Self {
        let handle = to_handle(&image);
        Self { image, handle }
    }
}

#[derive(Debug, Default)]
pub struct PreviewSurface {
    original: Option<Shown>,
    processed: Option<Shown>,
    touching: bool,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the unfiltered preview copy
    pub fn set_original(&mut self, image: Arc<DynamicImage>) {
        self.original = Some(Shown::new(image));
    }

    /// Replace the filtered preview (`None` = nothing selected)
    pub fn set_processed(&mut self, image: Option<Arc<DynamicImage>>) {
        self.processed = image.map(Shown::new);
    }

    pub fn touch_began(&mut self) {
        self.touching = true;
    }

    pub fn touch_ended(&mut self) {
        self.touching = false;
    }

    pub fn touch_cancelled(&mut self) {
        self.touching = false;
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// The image currently on screen
    pub fn displayed(&self) -> Option<&Arc<DynamicImage>> {
        self.displayed_entry().map(|s| &s.image)
    }

    fn displayed_entry(&self) -> Option<&Shown> {
        if self.touching {
            self.original.as_ref()
        } else {
            self.processed.as_ref().or(self.original.as_ref())
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match self.displayed_entry() {
            Some(shown) => image_widget(shown.handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => text("No preview").into(),
        };

        mouse_area(content)
            .on_press(Message::PreviewPressed)
            .on_release(Message::PreviewReleased)
            .on_exit(Message::PreviewLeft)
            .into()
    }
}

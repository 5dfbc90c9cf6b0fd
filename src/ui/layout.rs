/// Orientation-dependent arrangement of preview and gallery
///
/// Portrait stacks the preview above a horizontally scrolling gallery.
/// Landscape puts them side by side and the gallery scrolls vertically.
/// The stack axis and the gallery scroll axis are always orthogonal.

use iced::widget::{column, container, row};
use iced::{Element, Length};

use crate::state::derive::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    /// Landscape with the gallery on the leading side
    LandscapeLeft,
    /// Landscape with the gallery on the trailing side
    LandscapeRight,
}

impl Orientation {
    /// Guess from the container shape
    ///
    /// A size cannot tell the two landscape variants apart, so wide
    /// containers map to `LandscapeRight`.
    pub fn from_size(size: Bounds) -> Self {
        if size.height >= size.width {
            Orientation::Portrait
        } else {
            Orientation::LandscapeRight
        }
    }

    pub fn is_portrait(self) -> bool {
        self == Orientation::Portrait
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn orthogonal(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Where everything goes for one orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPlan {
    pub orientation: Orientation,
    /// Direction preview and gallery are stacked in
    pub stack_axis: Axis,
    /// Direction the gallery scrolls in
    pub gallery_scroll: Axis,
    /// Gallery is placed before the preview in the stack
    pub gallery_first: bool,
}

impl LayoutPlan {
    pub fn for_orientation(orientation: Orientation) -> Self {
        let stack_axis = if orientation.is_portrait() {
            Axis::Vertical
        } else {
            Axis::Horizontal
        };

        Self {
            orientation,
            stack_axis,
            gallery_scroll: stack_axis.orthogonal(),
            gallery_first: orientation == Orientation::LandscapeLeft,
        }
    }

    /// Area left for the preview once the gallery strip is taken out
    pub fn preview_bound(&self, container: Bounds, strip_thickness: f32) -> Bounds {
        match self.stack_axis {
            Axis::Vertical => Bounds::new(
                container.width,
                (container.height - strip_thickness).max(0.0),
            ),
            Axis::Horizontal => Bounds::new(
                (container.width - strip_thickness).max(0.0),
                container.height,
            ),
        }
    }

    /// Stack preview and gallery according to the plan
    pub fn compose<'a, Message: 'a>(
        &self,
        preview: Element<'a, Message>,
        gallery: Element<'a, Message>,
        strip_thickness: f32,
    ) -> Element<'a, Message> {
        let preview = container(preview)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill);

        let strip = match self.stack_axis {
            Axis::Vertical => container(gallery)
                .width(Length::Fill)
                .height(Length::Fixed(strip_thickness)),
            Axis::Horizontal => container(gallery)
                .width(Length::Fixed(strip_thickness))
                .height(Length::Fill),
        };

        let (first, second): (Element<'a, Message>, Element<'a, Message>) = if self.gallery_first {
            (strip.into(), preview.into())
        } else {
            (preview.into(), strip.into())
        };

        match self.stack_axis {
            Axis::Vertical => column![first, second].into(),
            Axis::Horizontal => row![first, second].into(),
        }
    }
}

use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{window, Alignment, Element, Length, Size, Subscription, Task, Theme};

use crate::filter::FilterId;
use crate::state::coordinator::{ConfirmResult, FilterCoordinator};
use crate::state::derive::Bounds;

/// Height reserved for the Cancel/Confirm toolbar
pub const TOOLBAR_HEIGHT: f32 = 44.0;

/// How the picker is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Full flow with a toolbar; the application exits once an outcome is reported
    #[default]
    Normal,
    /// Embedded in a host view; the host drives confirm/cancel
    Custom,
}

impl Mode {
    /// Area left for the preview and gallery inside a window of `size`
    pub fn content_bounds(self, size: Size) -> Bounds {
        let toolbar = match self {
            Mode::Normal => TOOLBAR_HEIGHT,
            Mode::Custom => 0.0,
        };
        Bounds::new(size.width, (size.height - toolbar).max(0.0))
    }
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// A gallery cell was tapped
    FilterSelected(FilterId),
    /// Pointer went down on the preview
    PreviewPressed,
    /// Pointer released over the preview
    PreviewReleased,
    /// Pointer left the preview (touch cancelled)
    PreviewLeft,
    Confirm,
    Cancel,
    /// Background apply finished
    FilterApplied(ConfirmResult),
    /// Window was resized or rotated
    Resized(Size),
    /// The window's close button was pressed
    CloseRequested,
}

/// Filter picker application state
pub struct FilterUi {
    coordinator: FilterCoordinator,
    mode: Mode,
    /// Close once the in-flight confirm has reported its outcome
    close_pending: bool,
}

impl FilterUi {
    pub fn new(coordinator: FilterCoordinator, mode: Mode) -> Self {
        Self {
            coordinator,
            mode,
            close_pending: false,
        }
    }

    pub fn coordinator(&self) -> &FilterCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut FilterCoordinator {
        &mut self.coordinator
    }

    pub fn into_coordinator(self) -> FilterCoordinator {
        self.coordinator
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The window was asked to close while a confirm was running
    pub fn is_close_pending(&self) -> bool {
        self.close_pending
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        // The registry is shared with the host and may have changed under us
        self.coordinator.refresh_gallery();

        match message {
            Message::FilterSelected(id) => {
                if let Err(e) = self.coordinator.select(&id) {
                    log::warn!("⚠️  Cannot select '{}': {}", id, e);
                }
                Task::none()
            }
            Message::PreviewPressed => {
                self.coordinator.surface_mut().touch_began();
                Task::none()
            }
            Message::PreviewReleased => {
                self.coordinator.surface_mut().touch_ended();
                Task::none()
            }
            Message::PreviewLeft => {
                self.coordinator.surface_mut().touch_cancelled();
                Task::none()
            }
            Message::Confirm => match self.coordinator.confirm() {
                Ok(job) => Task::perform(job.run(), Message::FilterApplied),
                Err(e) => {
                    log::warn!("⚠️  Confirm ignored: {}", e);
                    Task::none()
                }
            },
            Message::FilterApplied(result) => {
                if let Err(e) = self.coordinator.finish_confirm(result) {
                    log::warn!("⚠️  Unexpected filter result: {}", e);
                }
                self.dismiss_if_done()
            }
            Message::Cancel => {
                if let Err(e) = self.coordinator.cancel() {
                    log::warn!("⚠️  Cancel ignored: {}", e);
                }
                self.dismiss_if_done()
            }
            Message::Resized(size) => {
                self.coordinator
                    .set_container_size(self.mode.content_bounds(size));
                Task::none()
            }
            Message::CloseRequested => {
                if self.coordinator.is_busy() {
                    log::info!("⏳ Close requested, waiting for the filter to finish");
                    self.close_pending = true;
                    return Task::none();
                }
                if !self.coordinator.is_dismissed() {
                    if let Err(e) = self.coordinator.cancel() {
                        log::warn!("⚠️  Cancel on close failed: {}", e);
                    }
                }
                close_window()
            }
        }
    }

    fn dismiss_if_done(&self) -> Task<Message> {
        let wants_close = self.mode == Mode::Normal || self.close_pending;
        if wants_close && self.coordinator.is_dismissed() {
            close_window()
        } else {
            Task::none()
        }
    }

    /// Build the user interface
    pub fn view(&self) -> Element<'_, Message> {
        let coordinator = &self.coordinator;
        let config = coordinator.config();
        let plan = coordinator.layout();
        let interactive = !coordinator.is_busy() && !coordinator.is_dismissed();

        let gallery = coordinator
            .gallery()
            .view(config, plan.gallery_scroll, interactive);
        let body = plan.compose(coordinator.surface().view(), gallery, config.strip_thickness());

        if self.mode == Mode::Custom {
            return body;
        }

        let status: Element<'_, Message> = if coordinator.is_busy() {
            text("Applying filter...").size(16).into()
        } else {
            horizontal_space().into()
        };

        let can_confirm = interactive && coordinator.selection().is_some();
        let toolbar = row![
            button(text(config.cancel_title.as_str()))
                .on_press_maybe(interactive.then_some(Message::Cancel)),
            horizontal_space(),
            status,
            horizontal_space(),
            button(text(config.confirm_title.as_str()))
                .on_press_maybe(can_confirm.then_some(Message::Confirm)),
        ]
        .align_y(Alignment::Center)
        .padding(6)
        .height(Length::Fixed(TOOLBAR_HEIGHT));

        container(column![body, toolbar])
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Track window size changes so the layout follows rotation, and
    /// intercept the close button so an outcome is always reported
    ///
    /// The application must run with `exit_on_close_request(false)`.
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::resize_events().map(|(_id, size)| Message::Resized(size)),
            window::close_requests().map(|_id| Message::CloseRequested),
        ])
    }

    pub fn title(&self) -> String {
        match self.coordinator.selection() {
            Some(id) => format!("Filters - {}", id),
            None => "Filters".to_string(),
        }
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn close_window() -> Task<Message> {
    window::get_latest().and_then(window::close)
}

/// Presentation layer
///
/// - `app.rs` - iced program: messages, update, view, subscriptions
/// - `gallery.rs` - filter thumbnail strip and selection highlight
/// - `preview.rs` - live preview with press-to-compare
/// - `layout.rs` - orientation-dependent stacking and scroll axes

pub mod app;
pub mod gallery;
pub mod layout;
pub mod preview;

pub use app::{FilterUi, Message, Mode};

use chrono::Local;
use filter_picker::{create_filter_ui, FilterOutcome, FilterRegistry, FilterUi, FilterUiConfig};
use iced::Size;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Demo host: pick a photo, choose a filter, save the result next to it
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = FilterUiConfig::load()?;

    // Path from the command line, otherwise ask
    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match FileDialog::new()
            .set_title("Select a Photo")
            .add_filter("Images", &["jpg", "jpeg", "png", "webp", "tif", "tiff", "bmp"])
            .pick_file()
        {
            Some(path) => path,
            None => {
                log::info!("No photo selected, exiting");
                return Ok(());
            }
        },
    };

    let image = image::open(&path)?;
    log::info!("📷 Opened {} ({}x{})", path.display(), image.width(), image.height());

    let window_size = Size::new(config.window_width, config.window_height);
    let (ui, mut outcome) = create_filter_ui(image, FilterRegistry::new(), config, true);

    iced::application(FilterUi::title, FilterUi::update, FilterUi::view)
        .subscription(FilterUi::subscription)
        .theme(FilterUi::theme)
        .window_size(window_size)
        .exit_on_close_request(false)
        .centered()
        .run_with(move || (ui, iced::Task::none()))?;

    match outcome.try_recv() {
        Ok(FilterOutcome::Filtered(filtered)) => {
            let output = output_path(&path);
            filtered.save(&output)?;
            log::info!("✅ Saved {}", output.display());
        }
        Ok(FilterOutcome::Failed(_)) => log::warn!("⚠️  Filter could not be applied, nothing saved"),
        Ok(FilterOutcome::Cancelled(_)) => log::info!("↩️  Cancelled, nothing saved"),
        Err(_) => log::info!("Window closed without a choice"),
    }

    Ok(())
}

/// `photo.jpg` -> `photo_filtered_20261019_153000.png`
fn output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo".to_string());
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    source.with_file_name(format!("{}_filtered_{}.png", stem, stamp))
}

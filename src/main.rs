use musicloop::ui::MusicLoopApp;
use musicloop::{AppConfig, DirectoryLibrary};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let config = AppConfig::load_or_default();
    if AppConfig::default_path().is_some_and(|path| !path.exists()) {
        match config.save_default() {
            Ok(path) => log::info!("Wrote default settings to {}", path.display()),
            Err(e) => log::warn!("Cannot write default settings: {}", e),
        }
    }
    log::info!("Library directory: {}", config.library_dir.display());

    let library = match DirectoryLibrary::open(&config.library_dir, config.max_upload_bytes) {
        Ok(library) => library,
        Err(e) => {
            log::error!("Cannot open library {}: {}", config.library_dir.display(), e);
            return;
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([960.0, 420.0])
            .with_title("MusicLoop"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "MusicLoop",
        native_options,
        Box::new(move |_cc| Ok(Box::new(MusicLoopApp::new(&config, library)))),
    ) {
        log::error!("UI terminated: {}", e);
    }
}

// UI module
// egui render layer over the loop engine

pub mod app;
pub mod timeline;

pub use app::MusicLoopApp;
pub use timeline::TimelineView;

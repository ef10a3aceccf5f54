// Main UI App - Library browser, transport and segment editor

use crate::config::AppConfig;
use crate::engine::LoopEngine;
use crate::interaction::TimelineGeometry;
use crate::library::{AssetId, AssetLibrary, AudioAsset, DirectoryLibrary, SUPPORTED_FORMATS};
use crate::messaging::{
    EngineEvent, EventConsumer, Notification, NotificationCategory, NotificationLevel,
};
use crate::playback::{PlaybackRate, SimulatedClock, format_time};
use crate::segment::Segment;
use crate::ui::timeline::TimelineView;
use eframe::egui;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const VOLUME_BAR_SIZE: egui::Vec2 = egui::vec2(100.0, 14.0);
const NOTIFICATION_TTL_MS: u64 = 5000;

/// Library panel request, applied once the panel is drawn
enum LibraryAction {
    Import,
    Refresh,
    Select(AudioAsset),
    Delete(AssetId),
}

pub struct MusicLoopApp {
    engine: LoopEngine<SimulatedClock>,
    events: EventConsumer,
    library: DirectoryLibrary,
    assets: Vec<AudioAsset>,
    timeline: TimelineView,
    start_text: String,
    end_text: String,
    last_frame: Option<Instant>,
    // Notification system
    notification_queue: VecDeque<Notification>,
    max_notifications: usize,
}

impl MusicLoopApp {
    pub fn new(config: &AppConfig, library: DirectoryLibrary) -> Self {
        let mut engine = LoopEngine::from_config(SimulatedClock::new(), config);
        let events = engine.subscribe(config.event_capacity);

        let mut app = Self {
            engine,
            events,
            library,
            assets: Vec::new(),
            timeline: TimelineView::new(),
            start_text: format_seconds(0.0),
            end_text: format_seconds(0.0),
            last_frame: None,
            notification_queue: VecDeque::new(),
            max_notifications: config.max_notifications,
        };
        app.refresh_assets();
        app
    }

    fn notify(&mut self, notification: Notification) {
        self.notification_queue.push_back(notification);
        if self.notification_queue.len() > self.max_notifications {
            self.notification_queue.pop_front();
        }
    }

    /// Advance the clock by the frame time and dispatch its events
    fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_frame {
            self.engine.clock_mut().advance(now - last);
        }
        self.last_frame = Some(now);
        self.engine.pump();
    }

    /// Drain engine events into the notification queue and text fields
    fn update_from_events(&mut self) {
        while let Some(event) = ringbuf::traits::Consumer::try_pop(&mut self.events) {
            match event {
                EngineEvent::Reset(snapshot) => self.sync_segment_text(snapshot.segment),
                EngineEvent::SegmentChanged(segment) => self.sync_segment_text(segment),
                EngineEvent::Notify(notification) => self.notify(notification),
                EngineEvent::PositionChanged(_) | EngineEvent::PlaybackChanged(_) => {}
            }
        }
    }

    fn sync_segment_text(&mut self, segment: Segment) {
        self.start_text = format_seconds(segment.start());
        self.end_text = format_seconds(segment.end());
    }

    fn refresh_assets(&mut self) {
        match self.library.list_assets() {
            Ok(assets) => self.assets = assets,
            Err(e) => {
                log::error!("Failed to list assets: {}", e);
                self.notify(Notification::from_library_error(&e));
            }
        }
    }

    fn import_file(&mut self) {
        let extensions: Vec<&str> = SUPPORTED_FORMATS.iter().map(|(ext, _)| *ext).collect();
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Audio", &extensions[..])
            .pick_file()
        else {
            return;
        };

        match self.library.import(&path) {
            Ok(asset) => {
                self.notify(Notification::info(
                    NotificationCategory::Library,
                    format!("Imported {}", asset.original_name),
                ));
                self.refresh_assets();
                self.engine.load_asset(asset);
            }
            Err(e) => {
                log::warn!("Import of {} failed: {}", path.display(), e);
                self.notify(Notification::from_library_error(&e));
            }
        }
    }

    fn delete_asset(&mut self, id: &AssetId) {
        match self.library.delete_asset(id) {
            Ok(asset) => {
                self.engine.on_asset_deleted(id);
                self.notify(Notification::info(
                    NotificationCategory::Library,
                    format!("Deleted {}", asset.original_name),
                ));
            }
            Err(e) => {
                log::warn!("Delete of {} failed: {}", id, e);
                self.notify(Notification::from_library_error(&e));
            }
        }
        self.refresh_assets();
    }

    fn apply(&mut self, action: LibraryAction) {
        match action {
            LibraryAction::Import => self.import_file(),
            LibraryAction::Refresh => self.refresh_assets(),
            LibraryAction::Select(asset) => self.engine.load_asset(asset),
            LibraryAction::Delete(id) => self.delete_asset(&id),
        }
    }

    fn draw_library(&self, ui: &mut egui::Ui) -> Option<LibraryAction> {
        let mut action = None;

        ui.heading("Library");
        ui.horizontal(|ui| {
            if ui.button("Import...").clicked() {
                action = Some(LibraryAction::Import);
            }
            if ui.button("🔄").on_hover_text("Refresh library").clicked() {
                action = Some(LibraryAction::Refresh);
            }
        });
        ui.separator();

        if self.assets.is_empty() {
            ui.label("No recordings yet");
            return action;
        }

        let current = self.engine.asset().map(|a| a.id.clone());
        egui::ScrollArea::vertical().show(ui, |ui| {
            for asset in &self.assets {
                ui.horizontal(|ui| {
                    let selected = current.as_ref() == Some(&asset.id);
                    let label = format!("{} ({:.1} MB)", asset.original_name, asset.size_mb());
                    if ui.selectable_label(selected, label).clicked() && !selected {
                        action = Some(LibraryAction::Select(asset.clone()));
                    }
                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        action = Some(LibraryAction::Delete(asset.id.clone()));
                    }
                });
            }
        });

        action
    }

    fn draw_transport(&mut self, ui: &mut egui::Ui) {
        let ready = self.engine.is_ready();
        let state = self.engine.playback_state();

        ui.horizontal(|ui| {
            let play_label = if state.is_playing { "⏸ Pause" } else { "▶ Play" };
            if ui.add_enabled(ready, egui::Button::new(play_label)).clicked() {
                self.engine.toggle_play();
            }
            if ui.add_enabled(ready, egui::Button::new("⏹ Stop")).clicked() {
                self.engine.stop();
            }
            if ui.selectable_label(state.is_looping, "🔁 Loop").clicked() {
                self.engine.toggle_loop();
            }

            ui.separator();
            ui.label(format!(
                "{} / {}",
                format_time(state.position),
                format_time(state.duration)
            ))
            .on_hover_text(format!("{:.0}% of the track", state.progress_percent()));

            ui.separator();
            ui.label("Speed:");
            let mut rate = state.rate;
            egui::ComboBox::from_id_salt("rate_selector")
                .selected_text(rate.to_string())
                .show_ui(ui, |ui| {
                    for option in PlaybackRate::ALL {
                        ui.selectable_value(&mut rate, option, option.to_string());
                    }
                });
            if rate != state.rate {
                self.engine.set_rate(rate);
            }

            ui.separator();
            let mute_label = if state.is_muted() { "🔇" } else { "🔊" };
            if ui.button(mute_label).on_hover_text("Mute").clicked() {
                self.engine.toggle_mute();
            }
            self.draw_volume_bar(ui, state.volume);
        });
    }

    fn draw_volume_bar(&mut self, ui: &mut egui::Ui, volume: f32) {
        let (rect, response) = ui.allocate_exact_size(VOLUME_BAR_SIZE, egui::Sense::click_and_drag());
        let response = response.on_hover_text(format!("Volume {:.0}%", volume * 100.0));
        if (response.clicked() || response.dragged())
            && let Some(pos) = response.interact_pointer_pos()
        {
            let geometry = TimelineGeometry::new(rect.left(), rect.width());
            self.engine.set_volume_fraction(pos.x, &geometry);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 3.0, egui::Color32::from_gray(50));
        let mut filled = rect;
        filled.set_width(rect.width() * volume);
        painter.rect_filled(filled, 3.0, egui::Color32::from_rgb(100, 150, 255));
    }

    fn draw_segment_controls(&mut self, ui: &mut egui::Ui) {
        let snapshot = self.engine.snapshot();
        let ready = snapshot.is_ready();

        ui.horizontal(|ui| {
            ui.label("Start:");
            let start = ui.add_enabled(
                ready,
                egui::TextEdit::singleline(&mut self.start_text).desired_width(60.0),
            );
            if start.lost_focus() {
                let segment = self.engine.set_start_text(&self.start_text);
                self.sync_segment_text(segment);
            }
            if ui
                .add_enabled(
                    snapshot.can_set_start_from_position(),
                    egui::Button::new("Set start"),
                )
                .on_hover_text("Use the current position")
                .clicked()
            {
                self.engine.set_start_from_current_position();
            }

            ui.separator();
            ui.label("End:");
            let end = ui.add_enabled(
                ready,
                egui::TextEdit::singleline(&mut self.end_text).desired_width(60.0),
            );
            if end.lost_focus() {
                let segment = self.engine.set_end_text(&self.end_text);
                self.sync_segment_text(segment);
            }
            if ui
                .add_enabled(
                    snapshot.can_set_end_from_position(),
                    egui::Button::new("Set end"),
                )
                .on_hover_text("Use the current position")
                .clicked()
            {
                self.engine.set_end_from_current_position();
            }

            ui.separator();
            if ui
                .add_enabled(snapshot.can_cue_segment(), egui::Button::new("⏮ Cue"))
                .on_hover_text("Jump to the segment start")
                .clicked()
            {
                self.engine.cue_segment();
            }
            if ui.add_enabled(ready, egui::Button::new("Reset")).clicked() {
                self.engine.reset_segment();
            }
        });

        if ready {
            let segment = snapshot.segment;
            ui.label(format!(
                "Segment {} - {} ({:.1}s), looped {} times",
                format_time(segment.start()),
                format_time(segment.end()),
                segment.width_seconds(),
                self.engine.loop_count()
            ));
        }
    }

    /// Status bar at the bottom of the window
    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(status) = self.engine.status() {
                ui.colored_label(egui::Color32::RED, status);
                return;
            }

            let recent: Vec<&Notification> = self
                .notification_queue
                .iter()
                .rev()
                .filter(|n| n.is_recent(NOTIFICATION_TTL_MS))
                .take(3)
                .collect();

            if recent.is_empty() {
                ui.label("Ready");
                return;
            }

            for notification in recent {
                let (icon, color) = match notification.level {
                    NotificationLevel::Info => ("ℹ", egui::Color32::from_rgb(100, 150, 255)),
                    NotificationLevel::Warning => ("⚠", egui::Color32::from_rgb(255, 165, 0)),
                    NotificationLevel::Error => ("✖", egui::Color32::RED),
                };
                ui.colored_label(color, icon);
                ui.colored_label(color, &notification.message);
                ui.add_space(10.0);
            }
        });
    }
}

impl eframe::App for MusicLoopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick();
        self.update_from_events();

        let action = egui::SidePanel::left("library_panel")
            .default_width(240.0)
            .show(ctx, |ui| self.draw_library(ui))
            .inner;
        if let Some(action) = action {
            self.apply(action);
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.engine.asset() {
                Some(asset) => ui.heading(&asset.original_name),
                None => ui.heading("Select a recording"),
            };
            ui.separator();

            self.draw_transport(ui);
            ui.add_space(10.0);
            self.timeline.show(ui, &mut self.engine);
            ui.add_space(10.0);
            self.draw_segment_controls(ui);
        });

        // Pick up events raised by this frame's input
        self.engine.pump();
        self.update_from_events();

        if self.engine.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else if !self.notification_queue.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}

fn format_seconds(seconds: f64) -> String {
    format!("{:.2}", seconds)
}

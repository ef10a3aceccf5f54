// Segment timeline - Track bar with draggable segment handles and playhead

use crate::engine::LoopEngine;
use crate::interaction::TimelineGeometry;
use crate::playback::{ClockSource, format_time};
use crate::segment::Handle;
use egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Vec2};

/// Pointer distance (px) at which a handle can be grabbed
const HANDLE_GRAB_RADIUS: f32 = 8.0;
const HANDLE_WIDTH: f32 = 6.0;
const BAR_HEIGHT: f32 = 48.0;
const LABEL_HEIGHT: f32 = 16.0;

const TRACK_COLOR: Color32 = Color32::from_gray(40);
const SEGMENT_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 110, 200, 120);
const HANDLE_COLOR: Color32 = Color32::from_rgb(90, 150, 255);
const ACTIVE_HANDLE_COLOR: Color32 = Color32::from_rgb(255, 200, 80);
const PLAYHEAD_COLOR: Color32 = Color32::from_rgb(255, 80, 80);

#[derive(Default)]
pub struct TimelineView {
    hovered: Option<Handle>,
}

impl TimelineView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the timeline and route pointer input to the engine
    pub fn show<C: ClockSource>(&mut self, ui: &mut egui::Ui, engine: &mut LoopEngine<C>) {
        let width = ui.available_width();
        let (response, painter) = ui.allocate_painter(
            Vec2::new(width, BAR_HEIGHT + LABEL_HEIGHT),
            Sense::click_and_drag(),
        );

        let bar = Rect::from_min_size(response.rect.min, Vec2::new(width, BAR_HEIGHT));
        let geometry = TimelineGeometry::new(bar.left(), bar.width());
        let duration = engine.duration();

        self.hovered = response
            .hover_pos()
            .and_then(|pos| geometry.handle_at(pos.x, &engine.segment(), duration, HANDLE_GRAB_RADIUS));
        if self.hovered.is_some() || engine.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        }

        // Press on a handle opens a drag session; hit-test where the press
        // began, the pointer has moved past the drag threshold by now
        if response.drag_started()
            && let Some(pos) = ui.input(|i| i.pointer.press_origin())
            && let Some(handle) =
                geometry.handle_at(pos.x, &engine.segment(), duration, HANDLE_GRAB_RADIUS)
        {
            engine.begin_drag(handle, pos.x);
        }

        if response.dragged()
            && let Some(pos) = response.interact_pointer_pos()
        {
            engine.update_drag(pos.x, &geometry);
        }

        if response.drag_stopped() {
            engine.end_drag();
        }

        // A plain click seeks; the engine ignores it while a drag is open
        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            engine.click_seek(pos.x, &geometry);
        }

        self.draw(&painter, bar, &geometry, engine);
    }

    fn draw<C: ClockSource>(
        &self,
        painter: &Painter,
        bar: Rect,
        geometry: &TimelineGeometry,
        engine: &LoopEngine<C>,
    ) {
        painter.rect_filled(bar, 4.0, TRACK_COLOR);

        let duration = engine.duration();
        if duration <= 0.0 {
            painter.text(
                bar.center(),
                Align2::CENTER_CENTER,
                "No track loaded",
                FontId::proportional(13.0),
                Color32::GRAY,
            );
            return;
        }

        let segment = engine.segment();
        let start_x = geometry.x_for_time(segment.start(), duration);
        let end_x = geometry.x_for_time(segment.end(), duration);
        let region = Rect::from_min_max(
            Pos2::new(start_x, bar.top()),
            Pos2::new(end_x, bar.bottom()),
        );
        painter.rect_filled(region, 0.0, SEGMENT_COLOR);
        if engine.is_looping() {
            painter.rect_stroke(region, 0.0, Stroke::new(1.0, HANDLE_COLOR));
        }

        let dragging = engine.active_handle();
        for (handle, x) in [(Handle::Start, start_x), (Handle::End, end_x)] {
            let color = if dragging == Some(handle) || self.hovered == Some(handle) {
                ACTIVE_HANDLE_COLOR
            } else {
                HANDLE_COLOR
            };
            let handle_rect = Rect::from_center_size(
                Pos2::new(x, bar.center().y),
                Vec2::new(HANDLE_WIDTH, bar.height()),
            );
            painter.rect_filled(handle_rect, 2.0, color);
        }

        let playhead_x = geometry.x_for_time(engine.position(), duration);
        painter.line_segment(
            [
                Pos2::new(playhead_x, bar.top()),
                Pos2::new(playhead_x, bar.bottom()),
            ],
            Stroke::new(2.0, PLAYHEAD_COLOR),
        );

        let label_y = bar.bottom() + 2.0;
        let font = FontId::proportional(11.0);
        painter.text(
            Pos2::new(start_x, label_y),
            Align2::CENTER_TOP,
            format_time(segment.start()),
            font.clone(),
            Color32::LIGHT_GRAY,
        );
        painter.text(
            Pos2::new(end_x, label_y),
            Align2::CENTER_TOP,
            format_time(segment.end()),
            font,
            Color32::LIGHT_GRAY,
        );
    }
}

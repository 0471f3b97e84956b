//! egui path viewer
//!
//! Paints the draw commands of a [`PathView`] frame and turns egui pointer
//! input into [`PathEvent`]s. Toolbar, tooltip overlay and detail panel live
//! here too.

use super::details::DetailPanel;
use super::interaction::PathEvent;
use super::render::{DrawCommand, RenderedFrame};
use super::view::PathView;
use eframe::egui::{
    self, epaint::CubicBezierShape, Color32, FontId, Painter, Pos2, Sense, Shape, Stroke,
    Vec2,
};

/// Offset of the tooltip from the pointer
const TOOLTIP_OFFSET: Vec2 = Vec2::new(14.0, 14.0);

pub struct PathViewer {
    view: PathView,
    pub show_details: bool,
    /// Last hover position seen, canvas-local
    last_hover: Option<Pos2>,
}

impl PathViewer {
    pub fn new(view: PathView) -> Self {
        Self {
            view,
            show_details: true,
            last_hover: None,
        }
    }

    pub fn view(&self) -> &PathView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut PathView {
        &mut self.view
    }

    /// Toolbar, detail panel and canvas
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.draw_toolbar(ui);
        ui.separator();

        if self.show_details {
            egui::SidePanel::right("path_details")
                .resizable(true)
                .default_width(280.0)
                .show_inside(ui, |ui| {
                    draw_details(ui, &self.view.details());
                });
        }

        self.draw_canvas(ui);
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.small_button("➕").on_hover_text("Zoom in").clicked() {
                self.view.handle(PathEvent::ZoomIn);
            }
            if ui.small_button("➖").on_hover_text("Zoom out").clicked() {
                self.view.handle(PathEvent::ZoomOut);
            }
            if ui.small_button("⟲").on_hover_text("Reset view").clicked() {
                self.view.handle(PathEvent::Reset);
            }
            if ui
                .selectable_label(self.view.state().curved, "〰 Curved")
                .on_hover_text("Curved connectors and serpentine layout")
                .clicked()
            {
                self.view.handle(PathEvent::ToggleCurve);
            }
            ui.separator();
            ui.label(format!("{:.0}%", self.view.state().transform.scale * 100.0));
            ui.label(self.view.layout_mode().name());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.toggle_value(&mut self.show_details, "Details");
            });
        });
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;

        if rect.size() != self.view.state().canvas_size {
            self.view.handle(PathEvent::Resize(rect.size()));
        }

        self.handle_input(ui, &response);

        painter.rect_filled(rect, 0.0, self.view.theme().canvas_bg);
        paint_frame(&painter, self.view.frame(), rect.min);

        if let Some(tooltip) = self.view.tooltip() {
            egui::Area::new(egui::Id::new("path_tooltip"))
                .fixed_pos(rect.min + tooltip.anchor.to_vec2() + TOOLTIP_OFFSET)
                .order(egui::Order::Tooltip)
                .interactable(false)
                .show(ui.ctx(), |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        for (i, line) in tooltip.lines.iter().enumerate() {
                            if i == 0 {
                                ui.strong(line);
                            } else {
                                ui.label(line);
                            }
                        }
                    });
                });
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let origin = response.rect.min.to_vec2();
        let local = |pos: Pos2| pos - origin;

        if response.drag_started() {
            // egui reports the start past its drag threshold; pan from the press
            let press = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(pos) = press {
                self.view.handle(PathEvent::PointerDown(local(pos)));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.view.handle(PathEvent::PointerMove(local(pos)));
            }
        }
        if response.drag_stopped() {
            self.view.handle(PathEvent::PointerUp);
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.view.handle(PathEvent::Click(local(pos)));
            }
        }

        match response.hover_pos().map(local) {
            Some(pos) => {
                if !self.view.state().is_dragging() && self.last_hover != Some(pos) {
                    self.view.handle(PathEvent::PointerMove(pos));
                }
                self.last_hover = Some(pos);

                let scroll = ui.input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    self.view.handle(PathEvent::Wheel { pos, delta: scroll });
                }
            }
            None => {
                if self.last_hover.take().is_some() {
                    self.view.handle(PathEvent::PointerLeave);
                }
            }
        }
    }
}

/// Paint a frame with its transform, offset to the canvas origin
pub fn paint_frame(painter: &Painter, frame: &RenderedFrame, origin: Pos2) {
    let transform = frame.transform;
    let scale = transform.scale;
    let to_screen = |p: Pos2| transform.to_screen(p) + origin.to_vec2();

    for command in &frame.commands {
        match command {
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                painter.circle(to_screen(*center), radius * scale, *fill, *stroke);
            }
            DrawCommand::Line { points, stroke } => {
                painter.line_segment([to_screen(points[0]), to_screen(points[1])], *stroke);
            }
            DrawCommand::Bezier { points, stroke } => {
                let points = points.map(to_screen);
                painter.add(CubicBezierShape::from_points_stroke(
                    points,
                    false,
                    Color32::TRANSPARENT,
                    *stroke,
                ));
            }
            DrawCommand::Polygon { points, fill } => {
                let points = points.iter().map(|p| to_screen(*p)).collect();
                painter.add(Shape::convex_polygon(points, *fill, Stroke::NONE));
            }
            DrawCommand::Text {
                pos,
                anchor,
                text,
                size,
                color,
            } => {
                painter.text(
                    to_screen(*pos),
                    *anchor,
                    text,
                    FontId::proportional(size * scale),
                    *color,
                );
            }
        }
    }
}

/// Detail panel body
pub fn draw_details(ui: &mut egui::Ui, panel: &DetailPanel) {
    ui.heading(&panel.title);
    ui.add_space(4.0);

    egui::Grid::new("path_detail_fields")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .striped(true)
        .show(ui, |ui| {
            for field in &panel.fields {
                ui.label(egui::RichText::new(field.label).strong());
                ui.add(egui::Label::new(&field.value).wrap());
                ui.end_row();
            }
        });

    if !panel.members.is_empty() {
        ui.add_space(8.0);
        ui.label(egui::RichText::new("Members").strong());
        egui::ScrollArea::vertical()
            .id_salt("path_detail_members")
            .show(ui, |ui| {
                for member in &panel.members {
                    ui.label(member);
                }
            });
    }
}

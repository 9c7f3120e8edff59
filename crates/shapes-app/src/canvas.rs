//! Paints a scene's draw list with the egui painter.

use eframe::egui::{self, Color32};

use shapes_renderer::{parse_color, RenderMode, Rgba, Scene};

use crate::config::CanvasConfig;

fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

pub fn paint(ui: &mut egui::Ui, scene: &Scene, config: &CanvasConfig) {
    let desired = egui::vec2(config.width, config.height);
    let (canvas_rect, _response) = ui.allocate_exact_size(desired, egui::Sense::hover());
    let painter = ui.painter_at(canvas_rect);

    let background = parse_color(&config.background).map(color32).unwrap_or(Color32::WHITE);
    painter.rect_filled(canvas_rect, 0.0, background);

    // Surface coordinates are pixels from the canvas top-left, y down.
    let offset = canvas_rect.min;
    for item in scene.draw_list() {
        if item.points.is_empty() { continue; }
        let pts: Vec<egui::Pos2> = item.points.iter()
            .map(|(x, y)| egui::pos2(offset.x + *x as f32, offset.y + *y as f32))
            .collect();

        let color = color32(item.color);
        match item.mode {
            RenderMode::Fill => {
                painter.add(egui::Shape::convex_polygon(pts, color, egui::Stroke::NONE));
            }
            RenderMode::Outline(width) => {
                painter.add(egui::Shape::closed_line(pts, egui::Stroke::new(width, color)));
            }
        }
    }
}

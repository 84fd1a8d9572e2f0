use crate::braille;
use crate::model::{Alphabet, Graph};
use eframe::egui;

use super::geometry::{label_bounds, scale_bar};
use super::interaction::{Editor, Mode};
use super::to_pos2;

const WALL_COLOR: egui::Color32 = egui::Color32::from_rgb(40, 40, 40);
const VERTEX_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 90, 90);
const HOVER_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 140, 30);
const SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(40, 110, 220);
const PREVIEW_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);

pub(super) fn draw_background(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(248, 248, 246));
}

pub(super) fn draw_graph(painter: &egui::Painter, origin: egui::Pos2, editor: &Editor) {
    let graph = editor.preview_graph();
    let view = editor.view();
    let wall = egui::Stroke::new(3.0, WALL_COLOR);

    for edge in graph.edges() {
        if let Ok((a, b)) = graph.edge_endpoints(edge) {
            painter.line_segment(
                [
                    to_pos2(origin, view.world_to_pixel(a)),
                    to_pos2(origin, view.world_to_pixel(b)),
                ],
                wall,
            );
        }
    }

    if editor.mode() == Mode::AddNode {
        draw_add_preview(painter, origin, editor, &graph);
    }

    let radius = editor.config().node_radius_px as f32;
    for v in graph.vertices() {
        let color = if editor.selected_vertices().contains(&v.id) {
            SELECTED_COLOR
        } else if editor.hovered().contains(&v.id) {
            HOVER_COLOR
        } else {
            VERTEX_COLOR
        };
        let center = to_pos2(origin, view.world_to_pixel(v.position));
        painter.circle_filled(center, radius * 0.6, color);
        if editor.previous_vertex() == Some(v.id) {
            painter.circle_stroke(center, radius, egui::Stroke::new(1.5, SELECTED_COLOR));
        }
    }

    let editing = editor.editing_label().map(|(id, _)| id);
    for label in graph.labels() {
        if Some(label.id) == editing {
            continue;
        }
        let anchor = view.world_to_pixel(label.position);
        let font_px = (label.size * view.zoom()) as f32;
        let color = if editor.selected_label() == Some(label.id) {
            SELECTED_COLOR
        } else {
            WALL_COLOR
        };
        painter.text(
            to_pos2(origin, anchor),
            egui::Align2::LEFT_TOP,
            &label.text,
            egui::FontId::proportional(font_px.max(1.0)),
            color,
        );
        if editor.selected_label() == Some(label.id) {
            let (min, max) = label_bounds(
                anchor,
                braille::visual_char_count(&label.text),
                label.size,
                view.zoom(),
            );
            painter.rect_stroke(
                egui::Rect::from_min_max(to_pos2(origin, min), to_pos2(origin, max)),
                2.0,
                egui::Stroke::new(1.0, SELECTED_COLOR),
                egui::StrokeKind::Outside,
            );
        }
    }
}

fn draw_add_preview(painter: &egui::Painter, origin: egui::Pos2, editor: &Editor, graph: &Graph) {
    let Some(phantom) = editor.phantom_vertex() else {
        return;
    };
    let view = editor.view();
    let phantom_px = to_pos2(origin, view.world_to_pixel(phantom));
    if let Some(prev) = editor.previous_vertex().and_then(|id| graph.vertex(id)) {
        painter.line_segment(
            [to_pos2(origin, view.world_to_pixel(prev.position)), phantom_px],
            egui::Stroke::new(2.0, PREVIEW_COLOR),
        );
    }
    if editor.hovered().is_empty() {
        let radius = editor.config().node_radius_px as f32;
        painter.circle_stroke(phantom_px, radius * 0.6, egui::Stroke::new(1.5, PREVIEW_COLOR));
    }
}

/// Pixel rect of the label being edited, for placing the inline text box.
pub(super) fn editing_rect(origin: egui::Pos2, editor: &Editor) -> Option<egui::Rect> {
    let (id, text) = editor.editing_label()?;
    let label = editor.graph().label(id)?;
    let view = editor.view();
    let anchor = view.world_to_pixel(label.position);
    let chars = braille::visual_char_count(text).max(8);
    let (min, max) = label_bounds(anchor, chars, label.size, view.zoom());
    Some(egui::Rect::from_min_max(to_pos2(origin, min), to_pos2(origin, max)))
}

pub(super) fn draw_scale_bar(painter: &egui::Painter, rect: egui::Rect, zoom: f64) {
    let (world, width) = scale_bar(zoom);
    let width = width as f32;
    let right = rect.right() - 20.0;
    let bottom = rect.bottom() - 20.0;
    let stroke = egui::Stroke::new(2.0, WALL_COLOR);
    painter.line_segment(
        [egui::pos2(right - width, bottom), egui::pos2(right, bottom)],
        stroke,
    );
    for x in [right - width, right] {
        painter.line_segment([egui::pos2(x, bottom - 5.0), egui::pos2(x, bottom + 5.0)], stroke);
    }
    let text = if world >= 1.0 {
        format!("{world} m")
    } else {
        format!("{:.0} cm", world * 100.0)
    };
    painter.text(
        egui::pos2(right - width / 2.0, bottom - 8.0),
        egui::Align2::CENTER_BOTTOM,
        text,
        egui::FontId::proportional(12.0),
        WALL_COLOR,
    );
}

pub(super) fn alphabet_name(alphabet: Alphabet) -> &'static str {
    match alphabet {
        Alphabet::Regular => "text",
        Alphabet::Braille => "braille",
    }
}

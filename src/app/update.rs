use crate::model::Alphabet;
use eframe::egui;

use super::interaction::{Mode, Modifiers, PointerButton};
use super::render::{alphabet_name, draw_background, draw_graph, draw_scale_bar, editing_rect};
use super::{EditorApp, from_pos2};

/// egui reports wheel motion in points with "up" positive; the editor expects
/// browser-style deltas, roughly 100 per notch with "down" positive.
const WHEEL_TO_DELTA_Y: f64 = -2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shortcut {
    Open,
    Save,
    ExportPayload,
    Undo,
    Redo,
    ToggleAddMode,
    Escape,
    Delete,
    ResetZoom,
    Help,
}

fn editor_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Middle => PointerButton::Middle,
        _ => PointerButton::Secondary,
    }
}

fn editor_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.shift,
        command: modifiers.command || modifiers.ctrl,
    }
}

impl EditorApp {
    fn collect_shortcuts(&self, ctx: &egui::Context) -> Vec<Shortcut> {
        let skip_shortcuts = ctx.wants_keyboard_input() || self.editor.editing_label().is_some();
        let mut out = Vec::new();
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                out.push(Shortcut::Open);
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
                out.push(Shortcut::Save);
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::E) {
                out.push(Shortcut::ExportPayload);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                out.push(Shortcut::Help);
            }
            if skip_shortcuts {
                return;
            }
            if i.consume_key(
                egui::Modifiers::COMMAND | egui::Modifiers::SHIFT,
                egui::Key::Z,
            ) || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y)
            {
                out.push(Shortcut::Redo);
            } else if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z) {
                out.push(Shortcut::Undo);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::A) {
                out.push(Shortcut::ToggleAddMode);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                out.push(Shortcut::Escape);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
            {
                out.push(Shortcut::Delete);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Num0) {
                out.push(Shortcut::ResetZoom);
            }
        });
        out
    }

    fn run_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Open => self.open_dialog(),
            Shortcut::Save => self.save_dialog(),
            Shortcut::ExportPayload => self.export_payload_dialog(),
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
            Shortcut::ToggleAddMode => self.editor.toggle_add_mode(),
            Shortcut::Escape => self.editor.escape(),
            Shortcut::Delete => {
                if !self.editor.delete_selected() {
                    self.editor.remove_selected_label();
                }
            }
            Shortcut::ResetZoom => self.editor.reset_zoom(),
            Shortcut::Help => self.show_help = true,
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open... (⌘O)").clicked() {
                        self.open_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Save vector map... (⌘S)").clicked() {
                        self.save_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Import boxes...").clicked() {
                        self.import_boxes_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Export boxes...").clicked() {
                        self.export_boxes_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Generate payload... (⌘E)").clicked() {
                        self.export_payload_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.label("Quick save paths:");
                    ui.small("Vector map:");
                    ui.text_edit_singleline(&mut self.settings.file_path);
                    ui.small("Payload:");
                    ui.text_edit_singleline(&mut self.settings.payload_path);
                    ui.horizontal(|ui| {
                        if ui.small_button("Quick Save").clicked() {
                            self.save_to_path();
                            ui.close_menu();
                        }
                        if ui.small_button("Quick Generate").clicked() {
                            self.export_payload_to_path();
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Save settings").clicked() {
                        self.persist_settings();
                        ui.close_menu();
                    }
                    if ui.button("Reload settings").clicked() {
                        self.reload_settings();
                        ui.close_menu();
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.editor.can_undo(), egui::Button::new("Undo (⌘Z)"))
                        .clicked()
                    {
                        self.undo();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.editor.can_redo(), egui::Button::new("Redo (⌘⇧Z)"))
                        .clicked()
                    {
                        self.redo();
                        ui.close_menu();
                    }
                    ui.separator();
                    let any_selected = !self.editor.selected_vertices().is_empty();
                    if ui
                        .add_enabled(any_selected, egui::Button::new("Delete vertices (Del)"))
                        .clicked()
                    {
                        self.editor.delete_selected();
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Reset zoom (0)").clicked() {
                        self.editor.reset_zoom();
                        ui.close_menu();
                    }
                    if ui.button("Reset pan").clicked() {
                        self.editor.reset_pan();
                        ui.close_menu();
                    }
                });
                if ui.button("Help").clicked() {
                    self.show_help = true;
                }
            });
        });
    }

    fn side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("right_panel")
            .resizable(true)
            .min_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Mode");
                    ui.horizontal(|ui| {
                        let mode = self.editor.mode();
                        if ui.selectable_label(mode == Mode::Edit, "Edit").clicked() {
                            self.editor.set_mode(Mode::Edit);
                        }
                        if ui
                            .selectable_label(mode == Mode::AddNode, "Add walls (A)")
                            .clicked()
                        {
                            self.editor.set_mode(Mode::AddNode);
                        }
                    });

                    ui.separator();
                    ui.heading("Labels");
                    ui.text_edit_singleline(&mut self.label_input);
                    ui.horizontal(|ui| {
                        if ui.button("Add as text").clicked() {
                            self.add_label_from_input(Alphabet::Regular);
                        }
                        if ui.button("Add as braille").clicked() {
                            self.add_label_from_input(Alphabet::Braille);
                        }
                    });
                    let selected = self
                        .editor
                        .selected_label()
                        .and_then(|id| self.editor.graph().label(id))
                        .map(|l| (l.text.clone(), l.alphabet));
                    if let Some((text, alphabet)) = selected {
                        ui.label(format!("Selected {}: {text}", alphabet_name(alphabet)));
                        ui.small("Click the label again to edit it.");
                        if ui.button("Delete label").clicked() {
                            self.editor.remove_selected_label();
                        }
                    }

                    ui.separator();
                    ui.heading("Cleanup");
                    egui::Grid::new("cleanup").num_columns(2).show(ui, |ui| {
                        ui.label("Merge radius (m)");
                        ui.add(
                            egui::DragValue::new(&mut self.settings.merge_radius_m)
                                .speed(0.01)
                                .range(0.0..=5.0),
                        );
                        ui.end_row();
                        ui.label("Snap angle (°)");
                        ui.add(
                            egui::DragValue::new(&mut self.settings.snap_angle_deg)
                                .speed(0.5)
                                .range(0.0..=45.0),
                        );
                        ui.end_row();
                    });
                    let idle = !self.editor.is_dragging();
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(idle, egui::Button::new("Merge near vertices"))
                            .clicked()
                        {
                            self.merge_near_vertices();
                        }
                        if ui
                            .add_enabled(idle, egui::Button::new("Straighten walls"))
                            .clicked()
                        {
                            self.orthogonalize();
                        }
                    });

                    ui.separator();
                    ui.heading("Model parameters");
                    let params = &mut self.settings.model_params;
                    egui::Grid::new("model_params").num_columns(2).show(ui, |ui| {
                        ui.label("Scale factor");
                        ui.add(egui::DragValue::new(&mut params.model_scale_factor).speed(0.0001));
                        ui.end_row();
                        ui.label("Wall height (mm)");
                        ui.add(egui::DragValue::new(&mut params.wall_height_mm).speed(0.1));
                        ui.end_row();
                        ui.label("Wall thickness (mm)");
                        ui.add(egui::DragValue::new(&mut params.wall_thickness_mm).speed(0.1));
                        ui.end_row();
                        ui.label("Border width (mm)");
                        ui.add(egui::DragValue::new(&mut params.border_width_mm).speed(0.1));
                        ui.end_row();
                        ui.label("Floor thickness (mm)");
                        ui.add(egui::DragValue::new(&mut params.floor_thickness_mm).speed(0.1));
                        ui.end_row();
                    });
                    if let Err(e) = self.settings.model_params.validate() {
                        ui.colored_label(egui::Color32::from_rgb(200, 40, 40), e.to_string());
                    }
                    if ui.button("Generate payload...").clicked() {
                        self.export_payload_dialog();
                    }
                });
            });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.label("Ready");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let graph = self.editor.graph();
                    ui.label(format!("Zoom: {:.0}%", self.editor.view().zoom() * 100.0));
                    ui.separator();
                    ui.label(format!(
                        "Vertices: {}  Walls: {}  Labels: {}  Boxes: {}",
                        graph.vertex_count(),
                        graph.edge_count(),
                        graph.label_count(),
                        self.boxes.len()
                    ));
                    ui.separator();
                    ui.label(format!("Selected: {}", self.editor.selected_vertices().len()));
                    ui.separator();
                    ui.label(match self.editor.mode() {
                        Mode::Edit => "Edit",
                        Mode::AddNode => "Add walls",
                    });
                });
            });
        });
    }

    fn canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                let origin = rect.center();

                let inside = response.contains_pointer();
                if inside != self.pointer_inside {
                    self.pointer_inside = inside;
                    if inside {
                        self.editor.pointer_entered();
                    } else {
                        self.editor.pointer_left();
                    }
                }

                let events = ctx.input(|i| i.events.clone());
                for event in &events {
                    match event {
                        egui::Event::PointerMoved(pos) if self.pointer_inside => {
                            self.editor.pointer_moved(from_pos2(origin, *pos));
                        }
                        egui::Event::PointerButton {
                            pos,
                            button,
                            pressed,
                            modifiers,
                        } => {
                            let pixel = from_pos2(origin, *pos);
                            let button = editor_button(*button);
                            let modifiers = editor_modifiers(*modifiers);
                            if *pressed {
                                if self.pointer_inside && rect.contains(*pos) {
                                    self.editor.pointer_pressed(pixel, button, modifiers);
                                }
                            } else {
                                self.editor.pointer_released(pixel, button, modifiers);
                            }
                        }
                        egui::Event::PointerGone if self.pointer_inside => {
                            self.pointer_inside = false;
                            self.editor.pointer_left();
                        }
                        _ => {}
                    }
                }

                let scroll = ctx.input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 && self.pointer_inside {
                    self.editor.wheel(scroll as f64 * WHEEL_TO_DELTA_Y);
                }

                let painter = ui.painter_at(rect);
                draw_background(&painter, rect);
                draw_graph(&painter, origin, &self.editor);
                draw_scale_bar(&painter, rect, self.editor.view().zoom());

                self.inline_label_editor(ui, ctx, origin);
            });
    }

    fn inline_label_editor(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, origin: egui::Pos2) {
        let Some(rect) = editing_rect(origin, &self.editor) else {
            self.edit_focus = None;
            return;
        };
        let Some((id, pending)) = self.editor.editing_label() else {
            return;
        };
        let font_px = self
            .editor
            .graph()
            .label(id)
            .map_or(12.0, |l| (l.size * self.editor.view().zoom()) as f32);
        let mut text = pending.to_string();
        let response = ui.put(
            rect,
            egui::TextEdit::singleline(&mut text).font(egui::FontId::proportional(font_px.max(1.0))),
        );
        if self.edit_focus != Some(id) {
            response.request_focus();
            self.edit_focus = Some(id);
        }
        if response.changed() {
            self.editor.set_editing_text(&text);
        }
        if response.lost_focus() {
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.editor.cancel_label_edit();
            } else {
                self.editor.finish_label_edit();
            }
            self.edit_focus = None;
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for shortcut in self.collect_shortcuts(ctx) {
            self.run_shortcut(shortcut);
        }

        self.menu_bar(ctx);
        self.side_panel(ctx);
        self.status_bar(ctx);
        self.canvas(ctx);
        self.sync_boxes();

        super::help::draw_help_window(ctx, &mut self.show_help);
    }
}

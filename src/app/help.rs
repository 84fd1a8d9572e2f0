use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help & Shortcuts")
        .open(open)
        .resizable(true)
        .default_width(520.0)
        .default_height(440.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard Shortcuts");
                ui.separator();

                ui.label("Files");
                help_row(ui, "⌘O", "Open vector map or box file");
                help_row(ui, "⌘S", "Save vector map (JSON)");
                help_row(ui, "⌘E", "Write generate-model payload");

                ui.add_space(10.0);
                ui.label("Editing");
                help_row(ui, "A", "Toggle add-walls mode");
                help_row(ui, "Escape", "Stop chaining walls / leave add mode / deselect");
                help_row(ui, "Delete / Backspace", "Delete selected vertices or label");
                help_row(ui, "⌘Z", "Undo");
                help_row(ui, "⌘⇧Z / ⌘Y", "Redo");
                help_row(ui, "Cleanup panel", "Merge near vertices, straighten walls");

                ui.add_space(10.0);
                ui.label("View");
                help_row(ui, "Scroll wheel", "Zoom in/out");
                help_row(ui, "Drag empty space", "Pan");
                help_row(ui, "Middle drag / ⌘ + drag", "Pan from anywhere");
                help_row(ui, "0", "Reset zoom");
                help_row(ui, "F1", "This window");

                ui.add_space(20.0);
                ui.heading("Mouse");
                ui.separator();
                help_row(ui, "Click vertex", "Select it");
                help_row(ui, "Shift + click", "Add to or remove from the selection");
                help_row(ui, "Drag selected", "Move; drop one vertex on another to merge");
                help_row(ui, "Click (add mode)", "Place a vertex joined to the previous one");
                help_row(ui, "Click label twice", "Edit its text, Enter to apply");

                ui.add_space(20.0);
                ui.heading("Files");
                ui.separator();
                ui.label("• Vector maps are saved as JSON keyed by entity id");
                ui.label("• Box files hold box_centers, box_extents and box_rotations");
                ui.label("• Settings are stored in ~/.config/wallmap.toml or settings.toml");
            });
        });
}

fn help_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [150.0, 16.0],
            egui::Label::new(egui::RichText::new(shortcut).monospace().strong()),
        );
        ui.label(description);
    });
}

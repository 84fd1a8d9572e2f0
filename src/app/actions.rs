use crate::convert;
use crate::model::Alphabet;
use crate::vector_map;
use log::info;

use super::{settings, EditorApp};

impl EditorApp {
    /// Opens either a saved vector map or a box-properties seed file.
    pub(super) fn open_path(&mut self, path: &str) {
        match vector_map::load(path) {
            Ok(graph) => {
                self.editor.load_graph(graph);
                self.settings.file_path = path.to_string();
                self.status = Some(format!("Loaded {path}"));
            }
            Err(map_err) => match convert::load_box_properties(path) {
                Ok(boxes) => self.apply_boxes(path, &boxes),
                Err(_) => self.report_error("Open", map_err),
            },
        }
    }

    fn apply_boxes(&mut self, path: &str, boxes: &convert::BoxProperties) {
        let graph = convert::boxes_to_graph(boxes);
        info!("imported {} walls from {path}", graph.edge_count());
        self.editor.load_graph(graph);
        self.settings.boxes_path = path.to_string();
        self.status = Some(format!("Imported {} boxes from {path}", boxes.len()));
    }

    pub(super) fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            self.open_path(&path.display().to_string());
        }
    }

    pub(super) fn save_to_path(&mut self) {
        let path = self.settings.file_path.clone();
        match vector_map::save(&path, self.editor.graph()) {
            Ok(()) => self.status = Some(format!("Saved {path}")),
            Err(e) => self.report_error("Save", e),
        }
    }

    pub(super) fn save_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&self.settings.file_path)
            .add_filter("JSON", &["json"])
            .save_file()
        {
            self.settings.file_path = path.display().to_string();
            self.save_to_path();
        }
    }

    pub(super) fn import_boxes_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            let path = path.display().to_string();
            match convert::load_box_properties(&path) {
                Ok(boxes) => self.apply_boxes(&path, &boxes),
                Err(e) => self.report_error("Import", e),
            }
        }
    }

    pub(super) fn export_boxes_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&self.settings.boxes_path)
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        let path = path.display().to_string();
        self.sync_boxes();
        match convert::save_box_properties(&path, &self.boxes) {
            Ok(()) => {
                self.settings.boxes_path = path.clone();
                self.status = Some(format!("Exported {} boxes to {path}", self.boxes.len()));
            }
            Err(e) => self.report_error("Export", e),
        }
    }

    pub(super) fn export_payload_to_path(&mut self) {
        let path = self.settings.payload_path.clone();
        match vector_map::write_payload(&path, self.editor.graph(), self.settings.model_params) {
            Ok(()) => self.status = Some(format!("Wrote generate payload {path}")),
            Err(e) => self.report_error("Generate", e),
        }
    }

    pub(super) fn export_payload_dialog(&mut self) {
        if let Err(e) = self.settings.model_params.validate() {
            self.status = Some(format!("Cannot generate: {e}"));
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&self.settings.payload_path)
            .add_filter("JSON", &["json"])
            .save_file()
        {
            self.settings.payload_path = path.display().to_string();
            self.export_payload_to_path();
        }
    }

    pub(super) fn add_label_from_input(&mut self, alphabet: Alphabet) {
        match self.editor.add_label(&self.label_input, alphabet) {
            Some(_) => self.label_input.clear(),
            None => self.status = Some("Label text is empty".to_string()),
        }
    }

    pub(super) fn undo(&mut self) {
        if !self.editor.undo() && self.editor.is_dragging() {
            self.status = Some("Finish the drag before undoing".to_string());
        }
    }

    pub(super) fn redo(&mut self) {
        if !self.editor.redo() && self.editor.is_dragging() {
            self.status = Some("Finish the drag before redoing".to_string());
        }
    }

    pub(super) fn merge_near_vertices(&mut self) {
        let radius = self.settings.merge_radius_m;
        let before = self.editor.graph().vertex_count();
        self.status = Some(if self.editor.merge_near_vertices(radius) {
            let merged = before - self.editor.graph().vertex_count();
            format!("Merged {merged} vertices closer than {radius} m")
        } else {
            "No vertices to merge".to_string()
        });
    }

    pub(super) fn orthogonalize(&mut self) {
        let degrees = self.settings.snap_angle_deg;
        self.status = Some(if self.editor.orthogonalize(degrees.to_radians()) {
            format!("Straightened walls within {degrees}°")
        } else {
            "No walls to straighten".to_string()
        });
    }

    pub(super) fn persist_settings(&mut self) {
        if let Err(e) = settings::save_settings(&self.settings_path, &self.settings) {
            self.report_error("Settings save", e);
        } else {
            self.status = Some(format!("Settings saved to {}", self.settings_path));
        }
    }

    pub(super) fn reload_settings(&mut self) {
        match settings::load_settings(&self.settings_path) {
            Ok(settings) => {
                self.editor.set_config(settings.editor_config());
                self.settings = settings;
                self.status = Some("Settings reloaded".to_string());
            }
            Err(e) => self.report_error("Settings reload", e),
        }
    }
}

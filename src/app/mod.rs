use crate::convert::{self, BoxProperties};
use crate::model::Graph;
use eframe::egui;
use log::{info, warn};

mod actions;
pub(crate) mod geometry;
mod help;
mod history;
mod interaction;
mod render;
mod settings;
mod update;
mod view;

use interaction::Editor;

pub struct EditorApp {
    editor: Editor,
    settings: settings::AppSettings,
    settings_path: String,
    /// Box form of the committed graph, rebuilt whenever the history moves.
    boxes: BoxProperties,
    boxes_revision: Option<u64>,
    label_input: String,
    status: Option<String>,
    pointer_inside: bool,
    edit_focus: Option<u64>,
    show_help: bool,
}

impl EditorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, initial_path: Option<String>) -> Self {
        let (settings, settings_path) = settings::load_startup_settings();

        let mut app = Self {
            editor: Editor::new(Graph::new(), settings.editor_config()),
            settings,
            settings_path,
            boxes: BoxProperties::default(),
            boxes_revision: None,
            label_input: String::new(),
            status: None,
            pointer_inside: false,
            edit_focus: None,
            show_help: false,
        };
        if let Some(path) = initial_path {
            app.open_path(&path);
        }
        info!("editor ready");
        app
    }

    fn sync_boxes(&mut self) {
        let revision = self.editor.revision();
        if self.boxes_revision != Some(revision) {
            self.boxes = convert::graph_to_boxes(self.editor.graph());
            self.boxes_revision = Some(revision);
        }
    }

    fn report_error(&mut self, what: &str, e: anyhow::Error) {
        warn!("{what} failed: {e:#}");
        self.status = Some(format!("{what} failed: {e:#}"));
    }
}

fn to_pos2(origin: egui::Pos2, p: crate::model::Point) -> egui::Pos2 {
    egui::pos2(origin.x + p.x as f32, origin.y + p.y as f32)
}

fn from_pos2(origin: egui::Pos2, p: egui::Pos2) -> crate::model::Point {
    crate::model::Point::new((p.x - origin.x) as f64, (p.y - origin.y) as f64)
}

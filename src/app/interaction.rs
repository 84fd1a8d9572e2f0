//! Pointer and keyboard handling for the wall editor, independent of egui.
//!
//! The shell feeds events with pixel positions relative to the canvas
//! centre (y down). Every committed change goes through [`History`]; drags
//! and the phantom vertex only exist in the preview.

use std::borrow::Cow;
use std::collections::BTreeSet;

use log::debug;

use crate::braille;
use crate::model::{Alphabet, Graph, Point};

use super::geometry::{self, contains, label_bounds};
use super::history::{self, History};
use super::view::{ViewState, ZoomLimits};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Edit,
    AddNode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Cmd on macOS.
    pub command: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorConfig {
    pub node_radius_px: f64,
    pub label_size: f64,
    pub history_limit: usize,
    pub zoom: ZoomLimits,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_radius_px: 6.5,
            label_size: 12.0,
            history_limit: history::DEFAULT_LIMIT,
            zoom: ZoomLimits::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
    Idle,
    /// A primary press on the canvas that may become a click.
    Press,
    Pan {
        button: PointerButton,
        select_on_release: bool,
    },
    DragVertices {
        start_world: Point,
    },
    DragLabel {
        id: u64,
        start_world: Point,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct LabelEdit {
    id: u64,
    text: String,
}

pub struct Editor {
    history: History<Graph>,
    view: ViewState,
    mode: Mode,
    config: EditorConfig,
    pointer: Option<Point>,
    hovered: BTreeSet<u64>,
    selected: BTreeSet<u64>,
    selected_label: Option<u64>,
    editing: Option<LabelEdit>,
    gesture: Gesture,
    drag_offset: Point,
    previous: Option<u64>,
}

impl Editor {
    pub fn new(graph: Graph, config: EditorConfig) -> Self {
        Self {
            history: History::with_limit(graph, config.history_limit),
            view: ViewState::new(config.zoom),
            mode: Mode::Edit,
            config,
            pointer: None,
            hovered: BTreeSet::new(),
            selected: BTreeSet::new(),
            selected_label: None,
            editing: None,
            gesture: Gesture::Idle,
            drag_offset: Point::ZERO,
            previous: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        self.history.present()
    }

    pub fn revision(&self) -> u64 {
        self.history.revision()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> EditorConfig {
        self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
        self.view.set_limits(config.zoom);
        self.history.set_limit(config.history_limit);
    }

    pub fn hovered(&self) -> &BTreeSet<u64> {
        &self.hovered
    }

    pub fn selected_vertices(&self) -> &BTreeSet<u64> {
        &self.selected
    }

    pub fn selected_label(&self) -> Option<u64> {
        self.selected_label
    }

    /// The label being edited and its pending text.
    pub fn editing_label(&self) -> Option<(u64, &str)> {
        self.editing.as_ref().map(|e| (e.id, e.text.as_str()))
    }

    pub fn previous_vertex(&self) -> Option<u64> {
        self.previous
    }

    pub fn pointer_world(&self) -> Option<Point> {
        self.pointer.map(|p| self.view.pixel_to_world(p))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self.gesture,
            Gesture::DragVertices { .. } | Gesture::DragLabel { .. }
        )
    }

    /// Where a click would place a new vertex, only while adding walls.
    pub fn phantom_vertex(&self) -> Option<Point> {
        match self.mode {
            Mode::AddNode => self.pointer_world(),
            Mode::Edit => None,
        }
    }

    /// The committed graph with the drag in progress and pending label text
    /// applied.
    pub fn preview_graph(&self) -> Cow<'_, Graph> {
        let mut graph = Cow::Borrowed(self.graph());
        if !self.drag_offset.is_zero() {
            match self.gesture {
                Gesture::DragVertices { .. } => {
                    graph = Cow::Owned(graph.with_vertex_offset(&self.selected, self.drag_offset));
                }
                Gesture::DragLabel { id, .. } => {
                    if let Some(label) = graph.label(id) {
                        let moved = label.position.offset(self.drag_offset);
                        graph = Cow::Owned(graph.move_label(id, moved));
                    }
                }
                _ => {}
            }
        }
        if let Some(edit) = &self.editing {
            graph = Cow::Owned(graph.update_label_text(edit.id, edit.text.clone()));
        }
        graph
    }

    fn commit(&mut self, graph: Graph, what: &str) {
        debug!("commit: {what}");
        self.history.set(graph);
    }

    /// Replaces the whole graph, e.g. after opening a file.
    pub fn load_graph(&mut self, graph: Graph) {
        self.view.finish_pan();
        self.gesture = Gesture::Idle;
        self.drag_offset = Point::ZERO;
        self.selected.clear();
        self.hovered.clear();
        self.selected_label = None;
        self.editing = None;
        self.previous = None;
        self.commit(graph, "load graph");
    }

    // Vertices whose projection lies strictly inside the node radius.
    fn vertices_at(&self, graph: &Graph, pixel: Point) -> BTreeSet<u64> {
        graph
            .vertices()
            .filter(|v| {
                let p = self.view.world_to_pixel(v.position);
                geometry::distance(p, pixel) < self.config.node_radius_px
            })
            .map(|v| v.id)
            .collect()
    }

    // Topmost label under the pointer; later labels draw over earlier ones.
    fn label_at(&self, graph: &Graph, pixel: Point) -> Option<u64> {
        let zoom = self.view.zoom();
        graph
            .labels()
            .filter(|l| {
                let anchor = self.view.world_to_pixel(l.position);
                let chars = braille::visual_char_count(&l.text);
                contains(label_bounds(anchor, chars, l.size, zoom), pixel)
            })
            .last()
            .map(|l| l.id)
    }

    fn update_hover(&mut self) {
        let Some(pixel) = self.pointer else {
            self.hovered.clear();
            return;
        };
        let hovered = match self.mode {
            Mode::Edit => {
                let preview = self.preview_graph();
                self.vertices_at(&preview, pixel)
            }
            Mode::AddNode => self.vertices_at(self.graph(), pixel),
        };
        self.hovered = hovered;
    }

    fn track_pointer(&mut self, pixel: Point) {
        self.pointer = Some(pixel);
        self.view.update_pan(pixel);
        let world = self.view.pixel_to_world(pixel);
        match self.gesture {
            Gesture::DragVertices { start_world } | Gesture::DragLabel { start_world, .. } => {
                self.drag_offset = start_world.delta_to(world);
            }
            _ => {}
        }
    }

    pub fn pointer_moved(&mut self, pixel: Point) {
        self.track_pointer(pixel);
        self.update_hover();
    }

    pub fn pointer_entered(&mut self) {
        self.view.start_zoom_listening();
    }

    pub fn pointer_left(&mut self) {
        self.view.finish_pan();
        if matches!(self.gesture, Gesture::Pan { .. }) {
            self.gesture = Gesture::Idle;
        }
        self.pointer = None;
        self.hovered.clear();
        self.commit_drag();
        self.view.stop_zoom_listening();
    }

    /// Returns whether the zoom changed.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        let changed = self.view.zoom_by_wheel(delta_y);
        if changed {
            self.update_hover();
        }
        changed
    }

    pub fn reset_zoom(&mut self) {
        self.view.reset_zoom();
        self.update_hover();
    }

    pub fn reset_pan(&mut self) {
        self.view.reset_pan();
        self.update_hover();
    }

    fn start_pan(&mut self, pixel: Point, button: PointerButton, select_on_release: bool) {
        self.view.start_pan(pixel);
        self.gesture = Gesture::Pan {
            button,
            select_on_release,
        };
    }

    pub fn pointer_pressed(&mut self, pixel: Point, button: PointerButton, modifiers: Modifiers) {
        self.pointer_moved(pixel);
        if !matches!(self.gesture, Gesture::Idle | Gesture::Press) {
            return;
        }
        self.gesture = Gesture::Idle;

        if button == PointerButton::Middle
            || (button == PointerButton::Primary && modifiers.command)
        {
            self.start_pan(pixel, button, false);
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        let label_hit = self.label_at(&self.preview_graph(), pixel);
        if self
            .editing
            .as_ref()
            .is_some_and(|edit| label_hit != Some(edit.id))
        {
            self.finish_label_edit();
        }

        match self.mode {
            Mode::AddNode => self.add_node_at(pixel),
            Mode::Edit => {
                self.gesture = Gesture::Press;
                if let Some(id) = label_hit {
                    self.press_label(id);
                } else if self.hovered.is_empty() {
                    self.selected.clear();
                    self.selected_label = None;
                    self.start_pan(pixel, button, true);
                } else if !self.hovered.is_disjoint(&self.selected) {
                    self.selected_label = None;
                    self.gesture = Gesture::DragVertices {
                        start_world: self.view.pixel_to_world(pixel),
                    };
                    self.drag_offset = Point::ZERO;
                }
            }
        }
    }

    fn press_label(&mut self, id: u64) {
        if self.selected_label == Some(id) {
            if self.editing.is_none() {
                if let Some(label) = self.graph().label(id) {
                    self.editing = Some(LabelEdit {
                        id,
                        text: label.text.clone(),
                    });
                }
            }
            return;
        }
        self.selected.clear();
        self.selected_label = Some(id);
        if let Some(pixel) = self.pointer {
            self.gesture = Gesture::DragLabel {
                id,
                start_world: self.view.pixel_to_world(pixel),
            };
            self.drag_offset = Point::ZERO;
        }
    }

    pub fn pointer_released(&mut self, pixel: Point, button: PointerButton, modifiers: Modifiers) {
        self.track_pointer(pixel);
        self.update_hover();

        let gesture = self.gesture;
        if let Gesture::Pan { button: b, .. } = gesture {
            if b != button {
                return;
            }
        }
        if button != PointerButton::Primary && !matches!(gesture, Gesture::Pan { .. }) {
            return;
        }

        let select = match gesture {
            Gesture::Idle => false,
            Gesture::Press => self.mode == Mode::Edit,
            Gesture::Pan {
                select_on_release, ..
            } => select_on_release,
            Gesture::DragVertices { .. } => self.drag_offset.is_zero(),
            Gesture::DragLabel { .. } => false,
        };
        if select {
            self.apply_selection(modifiers.shift);
        }

        self.view.finish_pan();
        if matches!(gesture, Gesture::Pan { .. }) {
            self.gesture = Gesture::Idle;
        }
        self.commit_drag();
        self.prune_selection();
    }

    fn apply_selection(&mut self, shift: bool) {
        if !shift {
            self.selected = self.hovered.clone();
        } else if !self.hovered.is_disjoint(&self.selected) {
            self.selected = &self.selected - &self.hovered;
        } else {
            self.selected.extend(self.hovered.iter().copied());
        }
        if !self.selected.is_empty() {
            self.selected_label = None;
        }
    }

    // Single-vertex drops onto exactly one other vertex merge into it, in the
    // same history entry as the move.
    fn commit_drag(&mut self) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        let offset = std::mem::replace(&mut self.drag_offset, Point::ZERO);
        match gesture {
            Gesture::DragVertices { .. } if !offset.is_zero() => {
                let mut next = self.graph().with_vertex_offset(&self.selected, offset);
                let mut what = "move vertices";
                if self.selected.len() == 1 {
                    let others: Vec<u64> = self.hovered.difference(&self.selected).copied().collect();
                    if let ([target], Some(&dragged)) = (others.as_slice(), self.selected.first()) {
                        next = next.merge_vertices(*target, dragged);
                        what = "merge vertices";
                    }
                }
                self.commit(next, what);
                self.update_hover();
            }
            Gesture::DragLabel { id, .. } if !offset.is_zero() => {
                if let Some(label) = self.graph().label(id) {
                    let moved = label.position.offset(offset);
                    let next = self.graph().move_label(id, moved);
                    self.commit(next, "move label");
                }
            }
            Gesture::Pan { .. } => self.gesture = gesture,
            _ => {}
        }
    }

    fn prune_selection(&mut self) {
        let graph = self.history.present();
        self.selected.retain(|id| graph.vertex(*id).is_some());
        self.hovered.retain(|id| graph.vertex(*id).is_some());
        if self.selected_label.is_some_and(|id| graph.label(id).is_none()) {
            self.selected_label = None;
        }
        if self.previous.is_some_and(|id| graph.vertex(id).is_none()) {
            self.previous = None;
        }
    }

    fn add_node_at(&mut self, pixel: Point) {
        let hits = self.vertices_at(self.graph(), pixel);
        match hits.len() {
            0 => {
                let world = self.view.pixel_to_world(pixel);
                let (mut next, id) = self.graph().add_vertex(world);
                if let Some(prev) = self.previous {
                    match next.add_edge(id, prev) {
                        Ok((with_edge, _)) => next = with_edge,
                        Err(e) => debug!("not joining new vertex: {e}"),
                    }
                }
                self.previous = Some(id);
                self.commit(next, "add vertex");
            }
            1 => {
                let Some(&hit) = hits.first() else {
                    return;
                };
                if let Some(prev) = self.previous {
                    match self.graph().add_edge(hit, prev) {
                        Ok((next, _)) => self.commit(next, "add wall"),
                        Err(e) => debug!("refused wall: {e}"),
                    }
                }
                self.previous = Some(hit);
            }
            _ => {}
        }
        self.update_hover();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        if self.mode == Mode::AddNode {
            self.previous = None;
        }
        debug!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.update_hover();
    }

    pub fn toggle_add_mode(&mut self) {
        let next = match self.mode {
            Mode::Edit => Mode::AddNode,
            Mode::AddNode => Mode::Edit,
        };
        self.set_mode(next);
    }

    pub fn escape(&mut self) {
        if self.editing.is_some() {
            self.cancel_label_edit();
            return;
        }
        match self.mode {
            Mode::AddNode if self.previous.is_some() => self.previous = None,
            Mode::AddNode => self.set_mode(Mode::Edit),
            Mode::Edit => {
                self.selected.clear();
                self.selected_label = None;
            }
        }
    }

    /// Removes every selected vertex and the walls touching them.
    pub fn delete_selected(&mut self) -> bool {
        if self.is_dragging() || self.selected.is_empty() {
            return false;
        }
        let next = self.graph().remove_vertices(&self.selected);
        self.commit(next, "delete vertices");
        self.selected.clear();
        self.prune_selection();
        self.update_hover();
        true
    }

    pub fn merge_near_vertices(&mut self, radius_m: f64) -> bool {
        self.cleanup(|g| g.merge_near_vertices(radius_m), "merge near vertices")
    }

    pub fn orthogonalize(&mut self, threshold_rad: f64) -> bool {
        self.cleanup(|g| g.orthogonalize(threshold_rad), "orthogonalize walls")
    }

    // Whole-graph edits commit once, and only when something changed.
    fn cleanup(&mut self, edit: impl FnOnce(&Graph) -> Graph, what: &str) -> bool {
        if self.is_dragging() {
            return false;
        }
        let next = edit(self.graph());
        if &next == self.graph() {
            debug!("{what}: nothing to change");
            return false;
        }
        self.commit(next, what);
        self.prune_selection();
        self.update_hover();
        true
    }

    /// Places a label at the centre of the canvas. Returns its id, or `None`
    /// when nothing printable is left of `text`.
    pub fn add_label(&mut self, text: &str, alphabet: Alphabet) -> Option<u64> {
        let text = match alphabet {
            Alphabet::Regular => text.to_string(),
            Alphabet::Braille => braille::to_braille(text),
        };
        if text.trim().is_empty() {
            return None;
        }
        let position = self.view.pixel_to_world(Point::ZERO);
        let (next, id) = self
            .graph()
            .add_label(text, position, alphabet, self.config.label_size);
        self.commit(next, "add label");
        self.selected.clear();
        self.selected_label = Some(id);
        Some(id)
    }

    pub fn set_editing_text(&mut self, text: &str) {
        if let Some(edit) = &mut self.editing {
            edit.text = text.to_string();
        }
    }

    /// Commits the pending text once and deselects the label.
    pub fn finish_label_edit(&mut self) {
        let Some(edit) = self.editing.take() else {
            return;
        };
        if let Some(label) = self.graph().label(edit.id) {
            let text = match label.alphabet {
                Alphabet::Regular => edit.text,
                Alphabet::Braille => braille::to_braille(&edit.text),
            };
            if text != label.text && !text.trim().is_empty() {
                let next = self.graph().update_label_text(edit.id, text);
                self.commit(next, "edit label");
            }
        }
        self.selected_label = None;
    }

    pub fn cancel_label_edit(&mut self) {
        self.editing = None;
    }

    pub fn remove_selected_label(&mut self) -> bool {
        let Some(id) = self.selected_label else {
            return false;
        };
        if self.is_dragging() {
            return false;
        }
        self.editing = None;
        self.selected_label = None;
        if self.graph().label(id).is_none() {
            return false;
        }
        let next = self.graph().remove_label(id);
        self.commit(next, "remove label");
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.is_dragging() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_dragging() && self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if self.is_dragging() || !self.history.undo() {
            return false;
        }
        self.after_time_travel();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.is_dragging() || !self.history.redo() {
            return false;
        }
        self.after_time_travel();
        true
    }

    fn after_time_travel(&mut self) {
        self.editing = None;
        self.prune_selection();
        self.update_hover();
    }
}

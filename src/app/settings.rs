use crate::vector_map::PhysicalParameters;
use anyhow::Context;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::interaction::EditorConfig;
use super::view::ZoomLimits;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(super) struct AppSettings {
    pub file_path: String,
    pub boxes_path: String,
    pub payload_path: String,
    pub node_radius_px: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub default_zoom: f64,
    pub zoom_sensitivity: f64,
    pub label_size: f64,
    pub history_limit: usize,
    /// Vertices closer than this are merged by "Merge near vertices".
    pub merge_radius_m: f64,
    /// Walls within this many degrees of an axis are snapped to it.
    pub snap_angle_deg: f64,
    pub model_params: PhysicalParameters,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            file_path: "vector_map.json".to_string(),
            boxes_path: "boxes.json".to_string(),
            payload_path: "generate.json".to_string(),
            node_radius_px: 6.5,
            min_zoom: 0.1,
            max_zoom: 50.0,
            default_zoom: 1.0,
            zoom_sensitivity: 0.0002,
            label_size: 12.0,
            history_limit: 200,
            merge_radius_m: 0.05,
            snap_angle_deg: 5.0,
            model_params: PhysicalParameters::default(),
        }
    }
}

impl AppSettings {
    /// Editor settings with unusable values replaced by their defaults.
    pub fn editor_config(&self) -> EditorConfig {
        let defaults = EditorConfig::default();
        let positive = |v: f64, fallback: f64| {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                warn!("ignoring setting value {v}, using {fallback}");
                fallback
            }
        };
        let (min, max) = if self.min_zoom <= self.max_zoom {
            (self.min_zoom, self.max_zoom)
        } else {
            (self.max_zoom, self.min_zoom)
        };
        let zoom = ZoomLimits {
            min,
            max,
            default: self.default_zoom,
            sensitivity: self.zoom_sensitivity,
        };
        let zoom = if zoom.is_valid() {
            zoom
        } else {
            warn!("ignoring zoom settings {zoom:?}");
            defaults.zoom
        };
        EditorConfig {
            node_radius_px: positive(self.node_radius_px, defaults.node_radius_px),
            label_size: positive(self.label_size, defaults.label_size),
            history_limit: self.history_limit,
            zoom,
        }
    }
}

/// `$HOME/.config/wallmap.toml` when present, else `settings.toml`.
pub(super) fn config_path() -> Option<String> {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home)
            .join(".config")
            .join("wallmap.toml");
        if path.exists() {
            return Some(path.display().to_string());
        }
    }
    if std::path::Path::new("settings.toml").exists() {
        return Some("settings.toml".to_string());
    }
    None
}

/// Settings from the first readable candidate, with the path they came from
/// so later saves and reloads use the same file.
pub(super) fn load_startup_settings() -> (AppSettings, String) {
    let mut candidates: Vec<String> = config_path().into_iter().collect();
    for fallback in ["settings.toml", "settings.json"] {
        if !candidates.iter().any(|c| c == fallback) {
            candidates.push(fallback.to_string());
        }
    }
    load_first(&candidates)
}

fn load_first(candidates: &[String]) -> (AppSettings, String) {
    for path in candidates {
        match load_settings(path) {
            Ok(settings) => {
                info!("loaded settings from {path}");
                return (settings, path.clone());
            }
            Err(e) => debug!("no settings at {path}: {e:#}"),
        }
    }
    let path = candidates
        .first()
        .cloned()
        .unwrap_or_else(|| "settings.toml".to_string());
    info!("using default settings, saving to {path}");
    (AppSettings::default(), path)
}

pub(super) fn load_settings(path: &str) -> anyhow::Result<AppSettings> {
    let s = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let parsed = if path.ends_with(".toml") {
        toml::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| serde_json::from_str::<AppSettings>(&s).ok())
    } else {
        serde_json::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| toml::from_str::<AppSettings>(&s).ok())
    };
    parsed.with_context(|| format!("{path} is neither valid TOML nor JSON settings"))
}

pub(super) fn save_settings(path: &str, settings: &AppSettings) -> anyhow::Result<()> {
    let text = if path.ends_with(".toml") {
        toml::to_string_pretty(settings).context("serializing settings")?
    } else {
        serde_json::to_string_pretty(settings).context("serializing settings")?
    };
    std::fs::write(path, text).with_context(|| format!("writing {path}"))
}

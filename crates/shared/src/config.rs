use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::geometry::Rect;
use crate::render::RegionClassifier;
use crate::transform::{ZoomLimits, DEFAULT_BOUNDS_PADDING};

/// Options recognised by a map view. Every field has a default, so a JSON
/// document only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Exponent of one wheel step: scale is multiplied by `exp(±intensity)`.
    pub zoom_intensity: f64,
    /// Multiplier used by the zoom-in/zoom-out buttons.
    pub button_zoom_factor: f64,
    /// Scale a freshly loaded map starts at. The reset button always returns
    /// to scale 1.
    pub initial_zoom: f64,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub hover_color: String,
    pub default_fill_color: String,
    pub cover_fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub per_region_override_colors: HashMap<String, String>,
    /// Replaces both the dataset's viewBox and computed bounds.
    pub viewport_override: Option<Rect>,
    pub bounds_padding: f64,
    pub cover_classes: Vec<String>,
    pub non_interactive_classes: Vec<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            min_scale: 0.1,
            max_scale: 10.0,
            zoom_intensity: 0.1,
            button_zoom_factor: 1.2,
            initial_zoom: 1.0,
            enable_pan: true,
            enable_zoom: true,
            hover_color: "#f4a261".to_string(),
            default_fill_color: "#e0e0e0".to_string(),
            cover_fill_color: "black".to_string(),
            stroke_color: "#444444".to_string(),
            stroke_width: 0.5,
            per_region_override_colors: HashMap::new(),
            viewport_override: None,
            bounds_padding: DEFAULT_BOUNDS_PADDING,
            cover_classes: vec!["map-cover".to_string()],
            non_interactive_classes: vec![
                "map-water".to_string(),
                "map-foreign".to_string(),
            ],
        }
    }
}

impl MapConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let config: MapConfig =
            serde_json::from_str(json).map_err(|e| MapError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        let fail = |msg: String| -> Result<(), MapError> {
            tracing::warn!(reason = %msg, "Rejected map configuration");
            Err(MapError::InvalidConfig(msg))
        };
        let finite = [
            ("minScale", self.min_scale),
            ("maxScale", self.max_scale),
            ("zoomIntensity", self.zoom_intensity),
            ("buttonZoomFactor", self.button_zoom_factor),
            ("initialZoom", self.initial_zoom),
            ("strokeWidth", self.stroke_width),
            ("boundsPadding", self.bounds_padding),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return fail(format!("{name} must be finite"));
        }
        if self.min_scale <= 0.0 {
            return fail(format!("minScale must be > 0, got {}", self.min_scale));
        }
        if self.max_scale <= self.min_scale {
            return fail(format!(
                "maxScale ({}) must be greater than minScale ({})",
                self.max_scale, self.min_scale
            ));
        }
        if self.zoom_intensity <= 0.0 {
            return fail(format!("zoomIntensity must be > 0, got {}", self.zoom_intensity));
        }
        if self.button_zoom_factor <= 1.0 {
            return fail(format!(
                "buttonZoomFactor must be > 1, got {}",
                self.button_zoom_factor
            ));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.initial_zoom) {
            return fail(format!(
                "initialZoom ({}) must lie within [{}, {}]",
                self.initial_zoom, self.min_scale, self.max_scale
            ));
        }
        if self.stroke_width < 0.0 || self.bounds_padding < 0.0 {
            return fail("strokeWidth and boundsPadding must not be negative".to_string());
        }
        if let Some(vp) = self.viewport_override {
            if !vp.is_valid() {
                return fail(format!("viewportOverride {vp:?} must have positive size"));
            }
        }
        Ok(())
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.min_scale,
            max: self.max_scale,
        }
    }

    pub fn classifier(&self) -> RegionClassifier {
        RegionClassifier {
            cover_classes: self.cover_classes.clone(),
            non_interactive_classes: self.non_interactive_classes.clone(),
        }
    }
}

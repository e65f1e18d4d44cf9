use std::collections::HashMap;

use crate::config::MapConfig;
use crate::dataset::{Dataset, Region};
use crate::geometry::Rect;
use crate::transform::compute_bounding_box;

/// Decides which regions are excluded from hover and click by looking at
/// their `styleClass`. Matching is by substring, so `"map-cover sea"`
/// matches `"map-cover"`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionClassifier {
    /// Background fill regions; also drawn with the cover colour.
    pub cover_classes: Vec<String>,
    /// Other non-interactive regions (water, foreign territory).
    pub non_interactive_classes: Vec<String>,
}

impl Default for RegionClassifier {
    fn default() -> Self {
        MapConfig::default().classifier()
    }
}

fn class_matches(region: &Region, classes: &[String]) -> bool {
    region
        .style_class
        .as_deref()
        .is_some_and(|class| classes.iter().any(|c| class.contains(c.as_str())))
}

impl RegionClassifier {
    pub fn is_cover(&self, region: &Region) -> bool {
        class_matches(region, &self.cover_classes)
    }

    pub fn is_non_interactive(&self, region: &Region) -> bool {
        self.is_cover(region) || class_matches(region, &self.non_interactive_classes)
    }
}

/// The three base colours a region can be drawn with.
#[derive(Debug, Clone, Copy)]
pub struct FillPalette<'a> {
    pub hover: &'a str,
    pub default: &'a str,
    pub cover: &'a str,
}

impl<'a> FillPalette<'a> {
    pub fn from_config(config: &'a MapConfig) -> Self {
        FillPalette {
            hover: &config.hover_color,
            default: &config.default_fill_color,
            cover: &config.cover_fill_color,
        }
    }
}

/// Fill for `region`, highest priority first: hover (interactive regions
/// only), explicit override, cover colour, default.
pub fn resolve_fill<'a>(
    region: &Region,
    overrides: &'a HashMap<String, String>,
    hovered_id: Option<&str>,
    palette: &FillPalette<'a>,
    classifier: &RegionClassifier,
) -> &'a str {
    if hovered_id == Some(region.id.as_str()) && !classifier.is_non_interactive(region) {
        return palette.hover;
    }
    if let Some(color) = overrides.get(&region.id) {
        return color;
    }
    if classifier.is_cover(region) {
        return palette.cover;
    }
    palette.default
}

/// Whether `region` reacts to click and hover.
pub fn is_interactive(region: &Region, has_click_handler: bool, classifier: &RegionClassifier) -> bool {
    has_click_handler && !classifier.is_non_interactive(region)
}

/// Display name with its first letter upper-cased, as passed to click handlers.
pub fn capitalize_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// CSS classes for a region path: a base class for the map level plus the
/// region's own class.
pub fn region_classes(region: &Region, is_country: bool) -> String {
    let base = if is_country {
        "state-boundary"
    } else {
        "district-boundary"
    };
    match region.style_class.as_deref().map(str::trim) {
        Some(own) if !own.is_empty() => format!("{base} {own}"),
        _ => base.to_string(),
    }
}

/// Rectangle the transform engine works from: an explicit override wins,
/// then the dataset's own bounds, then bounds computed from its geometry.
pub fn effective_bounds(dataset: &Dataset, config: &MapConfig) -> Rect {
    if let Some(vp) = config.viewport_override {
        return vp;
    }
    if let Some(bounds) = dataset.intrinsic_bounds {
        return bounds;
    }
    compute_bounding_box(&dataset.regions, config.bounds_padding).rect()
}

/// Everything needed to draw one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRegion {
    pub id: String,
    pub name: String,
    pub geometry: String,
    pub transform: Option<String>,
    pub class: String,
    pub fill: String,
    pub interactive: bool,
}

impl RenderedRegion {
    pub fn cursor(&self) -> &'static str {
        if self.interactive {
            "pointer"
        } else {
            "default"
        }
    }
}

/// Draw list for `dataset` in source order.
pub fn render_regions(
    dataset: &Dataset,
    is_country: bool,
    config: &MapConfig,
    hovered_id: Option<&str>,
    has_click_handler: bool,
) -> Vec<RenderedRegion> {
    let classifier = config.classifier();
    let palette = FillPalette::from_config(config);
    dataset
        .regions
        .iter()
        .map(|region| RenderedRegion {
            id: region.id.clone(),
            name: region.name.clone(),
            geometry: region.geometry.clone(),
            transform: region.auxiliary_transform.clone(),
            class: region_classes(region, is_country),
            fill: resolve_fill(
                region,
                &config.per_region_override_colors,
                hovered_id,
                &palette,
                &classifier,
            )
            .to_string(),
            interactive: is_interactive(region, has_click_handler, &classifier),
        })
        .collect()
}

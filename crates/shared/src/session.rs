use crate::config::MapConfig;
use crate::dataset::{Dataset, Region};
use crate::geometry::{Point, Rect};
use crate::registry;
use crate::render::{self, capitalize_name, RenderedRegion};
use crate::transform::{self, ScreenFrame, ViewportTransform};

/// Screen distance (pixels) a press must travel before it counts as a drag
/// rather than a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanState {
    Idle,
    Panning {
        /// Map-space point under the pointer, in the current viewport.
        last: Point,
        /// Screen position of the press.
        pressed_at: Point,
        dragged: bool,
    },
}

/// Output of interaction handling, for the host's callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// `name` is already capitalised.
    Click { name: String, id: String },
    HoverEnter { name: String, id: String },
    /// Pointer moved within the hovered region; `screen` is in client pixels.
    HoverMove { id: String, screen: Point },
    HoverLeave { id: String },
}

impl MapEvent {
    /// `(name, id)` for hover-change callbacks; leave carries no name.
    pub fn hover_change(&self) -> Option<(Option<&str>, &str)> {
        match self {
            MapEvent::HoverEnter { name, id } => Some((Some(name.as_str()), id.as_str())),
            MapEvent::HoverLeave { id } => Some((None, id.as_str())),
            _ => None,
        }
    }
}

/// Interaction state for one loaded map. Created when a dataset finishes
/// loading and dropped when another map is selected, so transform, pan and
/// hover state start fresh for each dataset.
#[derive(Debug, Clone)]
pub struct MapSession {
    map_name: String,
    dataset: Dataset,
    bounds: Rect,
    transform: ViewportTransform,
    pan: PanState,
    hovered: Option<String>,
    suppress_click: bool,
}

impl MapSession {
    pub fn new(map_name: &str, dataset: Dataset, config: &MapConfig) -> Self {
        let bounds = render::effective_bounds(&dataset, config);
        MapSession {
            map_name: map_name.to_string(),
            dataset,
            bounds,
            transform: ViewportTransform {
                scale: config.zoom_limits().clamp(config.initial_zoom),
                ..ViewportTransform::IDENTITY
            },
            pan: PanState::Idle,
            hovered: None,
            suppress_click: false,
        }
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    pub fn pan_state(&self) -> PanState {
        self.pan
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.pan, PanState::Panning { .. })
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_country(&self) -> bool {
        registry::is_country(&self.map_name)
    }

    /// Currently visible rectangle in dataset space.
    pub fn viewport(&self) -> Rect {
        transform::derive_rendered_viewport(&self.bounds, &self.transform)
    }

    pub fn view_box(&self) -> String {
        self.viewport().to_view_box()
    }

    pub fn zoom_label(&self) -> String {
        format!("Zoom: {:.1}x", self.transform.scale)
    }

    fn frame(&self, surface: Rect) -> Option<ScreenFrame> {
        ScreenFrame::fit(surface, &self.viewport())
    }

    /// Map-space point under `screen`, or `None` if the surface has no area.
    pub fn map_point(&self, screen: Point, surface: Rect) -> Option<Point> {
        let frame = self.frame(surface)?;
        Some(transform::screen_to_map_point(&self.viewport(), screen, &frame))
    }

    pub fn pointer_down(&mut self, screen: Point, surface: Rect, config: &MapConfig) {
        self.suppress_click = false;
        if !config.enable_pan {
            return;
        }
        if let Some(last) = self.map_point(screen, surface) {
            self.pan = PanState::Panning {
                last,
                pressed_at: screen,
                dragged: false,
            };
        }
    }

    pub fn pointer_move(&mut self, screen: Point, surface: Rect) {
        let PanState::Panning {
            last,
            pressed_at,
            dragged,
        } = self.pan
        else {
            return;
        };
        let Some(current) = self.map_point(screen, surface) else {
            return;
        };
        self.transform =
            transform::apply_pan(&self.transform, current.x - last.x, current.y - last.y);
        // Re-read the pointer in the shifted viewport so the next delta starts
        // from where the content now sits.
        let last = self.map_point(screen, surface).unwrap_or(current);
        let dragged = dragged
            || (screen.x - pressed_at.x).abs() > DRAG_THRESHOLD
            || (screen.y - pressed_at.y).abs() > DRAG_THRESHOLD;
        self.pan = PanState::Panning {
            last,
            pressed_at,
            dragged,
        };
    }

    pub fn pointer_up(&mut self) {
        if let PanState::Panning { dragged: true, .. } = self.pan {
            self.suppress_click = true;
        }
        self.pan = PanState::Idle;
    }

    /// Pointer left the drawing surface.
    pub fn pointer_leave(&mut self) {
        self.pan = PanState::Idle;
    }

    /// Wheel input at `screen`. Returns `true` when the event was consumed
    /// and the page's own scroll/zoom should be suppressed.
    pub fn wheel(&mut self, screen: Point, delta_y: f64, surface: Rect, config: &MapConfig) -> bool {
        if !config.enable_zoom {
            return false;
        }
        if delta_y == 0.0 || !delta_y.is_finite() {
            return true;
        }
        let Some(anchor) = self.map_point(screen, surface) else {
            return true;
        };
        let sign = if delta_y < 0.0 { 1.0 } else { -1.0 };
        self.transform = transform::apply_zoom(
            &self.transform,
            &self.bounds,
            anchor,
            sign,
            config.zoom_intensity,
            config.zoom_limits(),
        );
        true
    }

    pub fn zoom_in(&mut self, config: &MapConfig) {
        self.transform = transform::zoom_about_center(
            &self.transform,
            &self.bounds,
            config.button_zoom_factor,
            config.zoom_limits(),
        );
    }

    pub fn zoom_out(&mut self, config: &MapConfig) {
        self.transform = transform::zoom_about_center(
            &self.transform,
            &self.bounds,
            1.0 / config.button_zoom_factor,
            config.zoom_limits(),
        );
    }

    pub fn reset_view(&mut self) {
        self.transform = ViewportTransform::IDENTITY;
        self.pan = PanState::Idle;
    }

    /// Bring the live view in line with a replaced configuration.
    ///
    /// A changed `viewportOverride` or `boundsPadding` recomputes the bounds
    /// and resets the view. The scale is then pulled into the new zoom
    /// limits, keeping the viewport centre fixed.
    pub fn reconfigure(&mut self, previous: &MapConfig, config: &MapConfig) {
        if previous.viewport_override != config.viewport_override
            || previous.bounds_padding != config.bounds_padding
        {
            self.bounds = render::effective_bounds(&self.dataset, config);
            self.reset_view();
        }
        let limits = config.zoom_limits();
        let scale = self.transform.scale;
        let clamped = limits.clamp(scale);
        if clamped != scale {
            let zoomed =
                transform::zoom_about_center(&self.transform, &self.bounds, clamped / scale, limits);
            self.transform = ViewportTransform {
                scale: clamped,
                ..zoomed
            };
        }
    }

    fn interactive_region(
        &self,
        id: &str,
        has_click_handler: bool,
        config: &MapConfig,
    ) -> Option<&Region> {
        let region = self.dataset.region(id)?;
        render::is_interactive(region, has_click_handler, &config.classifier()).then_some(region)
    }

    pub fn region_enter(
        &mut self,
        id: &str,
        has_click_handler: bool,
        config: &MapConfig,
    ) -> Option<MapEvent> {
        let name = self
            .interactive_region(id, has_click_handler, config)?
            .name
            .clone();
        self.hovered = Some(id.to_string());
        Some(MapEvent::HoverEnter {
            name,
            id: id.to_string(),
        })
    }

    pub fn region_move(&self, id: &str, screen: Point) -> Option<MapEvent> {
        (self.hovered.as_deref() == Some(id)).then(|| MapEvent::HoverMove {
            id: id.to_string(),
            screen,
        })
    }

    pub fn region_leave(&mut self, id: &str) -> Option<MapEvent> {
        if self.hovered.as_deref() != Some(id) {
            return None;
        }
        self.hovered = None;
        Some(MapEvent::HoverLeave { id: id.to_string() })
    }

    /// Click on a region. Swallowed when it ends a drag.
    pub fn region_click(
        &mut self,
        id: &str,
        has_click_handler: bool,
        config: &MapConfig,
    ) -> Option<MapEvent> {
        if std::mem::take(&mut self.suppress_click) {
            return None;
        }
        let region = self.interactive_region(id, has_click_handler, config)?;
        Some(MapEvent::Click {
            name: capitalize_name(&region.name),
            id: region.id.clone(),
        })
    }

    pub fn render(&self, config: &MapConfig, has_click_handler: bool) -> Vec<RenderedRegion> {
        render::render_regions(
            &self.dataset,
            self.is_country(),
            config,
            self.hovered(),
            has_click_handler,
        )
    }
}

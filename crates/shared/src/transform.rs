use serde::{Deserialize, Serialize};

use crate::dataset::Region;
use crate::geometry::{Point, Rect, FALLBACK_RECT};
use crate::path;

/// Padding added on every side of computed bounds, in map units.
pub const DEFAULT_BOUNDS_PADDING: f64 = 50.0;

/// Current pan/zoom state. Translation is in dataset units, so a pan of `d`
/// map units shifts the rendered viewport by exactly `-d` at any scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl ViewportTransform {
    pub const IDENTITY: ViewportTransform = ViewportTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Inclusive scale bounds. `0 < min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl ZoomLimits {
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

/// Where a rendered viewport is actually drawn on screen, in client pixels.
///
/// With `preserveAspectRatio="xMidYMid meet"` the viewport is scaled
/// uniformly to fit the surface and centred, so the drawn area can be smaller
/// than the element on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenFrame {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl ScreenFrame {
    /// Fit `viewport` into `surface` (client-space rect of the SVG element).
    /// Returns `None` for a collapsed surface or viewport.
    pub fn fit(surface: Rect, viewport: &Rect) -> Option<Self> {
        if !surface.is_valid() || !viewport.is_valid() {
            return None;
        }
        let k = (surface.width / viewport.width).min(surface.height / viewport.height);
        let width = viewport.width * k;
        let height = viewport.height * k;
        Some(ScreenFrame {
            origin: Point::new(
                surface.x + (surface.width - width) / 2.0,
                surface.y + (surface.height - height) / 2.0,
            ),
            width,
            height,
        })
    }
}

/// Convert a screen (client pixel) point into dataset coordinates.
pub fn screen_to_map_point(viewport: &Rect, screen: Point, frame: &ScreenFrame) -> Point {
    Point::new(
        (screen.x - frame.origin.x) * (viewport.width / frame.width) + viewport.x,
        (screen.y - frame.origin.y) * (viewport.height / frame.height) + viewport.y,
    )
}

/// Inverse of [`screen_to_map_point`] for the same viewport and frame.
pub fn map_to_screen_point(viewport: &Rect, map: Point, frame: &ScreenFrame) -> Point {
    Point::new(
        (map.x - viewport.x) * (frame.width / viewport.width) + frame.origin.x,
        (map.y - viewport.y) * (frame.height / viewport.height) + frame.origin.y,
    )
}

/// Visible rectangle in dataset space for `transform` over `bounds`.
///
/// Scale shrinks the viewport around the bounds' midpoint, then translation
/// shifts it.
pub fn derive_rendered_viewport(bounds: &Rect, transform: &ViewportTransform) -> Rect {
    let width = bounds.width / transform.scale;
    let height = bounds.height / transform.scale;
    Rect::new(
        bounds.x + (bounds.width - width) / 2.0 - transform.translate_x,
        bounds.y + (bounds.height - height) / 2.0 - transform.translate_y,
        width,
        height,
    )
}

/// Wheel zoom: one step of `exp(delta_sign * intensity)`, keeping `anchor`
/// (a map-space point, normally the one under the cursor) fixed on screen.
///
/// `delta_sign` is `+1.0` to zoom in and `-1.0` to zoom out.
pub fn apply_zoom(
    transform: &ViewportTransform,
    bounds: &Rect,
    anchor: Point,
    delta_sign: f64,
    intensity: f64,
    limits: ZoomLimits,
) -> ViewportTransform {
    if delta_sign == 0.0 || !delta_sign.is_finite() {
        return *transform;
    }
    apply_zoom_factor(
        transform,
        bounds,
        anchor,
        (delta_sign.signum() * intensity).exp(),
        limits,
    )
}

/// Multiply the scale by `factor` (clamped), keeping `anchor` fixed on screen.
///
/// At a clamp boundary the transform is returned unchanged.
pub fn apply_zoom_factor(
    transform: &ViewportTransform,
    bounds: &Rect,
    anchor: Point,
    factor: f64,
    limits: ZoomLimits,
) -> ViewportTransform {
    let old = transform.scale;
    let new = limits.clamp(old * factor);
    if new == old || !new.is_finite() {
        return *transform;
    }
    // The anchor's offset from the viewport origin, as a fraction of the
    // viewport size, must be the same before and after.
    let ratio = old / new;
    let center = bounds.center();
    ViewportTransform {
        translate_x: (center.x - anchor.x) * (1.0 - ratio) + transform.translate_x * ratio,
        translate_y: (center.y - anchor.y) * (1.0 - ratio) + transform.translate_y * ratio,
        scale: new,
    }
}

/// Zoom by `factor` around the centre of the current rendered viewport.
pub fn zoom_about_center(
    transform: &ViewportTransform,
    bounds: &Rect,
    factor: f64,
    limits: ZoomLimits,
) -> ViewportTransform {
    let anchor = derive_rendered_viewport(bounds, transform).center();
    apply_zoom_factor(transform, bounds, anchor, factor, limits)
}

/// Shift translation by a map-space delta. Unbounded.
pub fn apply_pan(transform: &ViewportTransform, delta_x: f64, delta_y: f64) -> ViewportTransform {
    ViewportTransform {
        translate_x: transform.translate_x + delta_x,
        translate_y: transform.translate_y + delta_y,
        scale: transform.scale,
    }
}

/// Result of bounds computation: either real extents or the fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsOutcome {
    Computed(Rect),
    /// No finite coordinate was found; holds [`FALLBACK_RECT`].
    Fallback(Rect),
}

impl BoundsOutcome {
    pub fn rect(&self) -> Rect {
        match self {
            BoundsOutcome::Computed(r) | BoundsOutcome::Fallback(r) => *r,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, BoundsOutcome::Fallback(_))
    }
}

/// Smallest rectangle enclosing every coordinate of every region, grown by
/// `padding` on all four sides.
pub fn compute_bounding_box(regions: &[Region], padding: f64) -> BoundsOutcome {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut found = false;

    for region in regions {
        path::visit_points(&region.geometry, |p| {
            if p.is_finite() {
                found = true;
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            }
        });
    }

    if !found {
        tracing::warn!(
            regions = regions.len(),
            "No usable coordinates in region geometry, using fallback bounds"
        );
        return BoundsOutcome::Fallback(FALLBACK_RECT);
    }

    let rect = Rect::new(
        min.x - padding,
        min.y - padding,
        max.x - min.x + padding * 2.0,
        max.y - min.y + padding * 2.0,
    );
    if rect.is_valid() {
        BoundsOutcome::Computed(rect)
    } else {
        // A single point with zero padding has no area.
        tracing::warn!(?rect, "Degenerate region bounds, using fallback bounds");
        BoundsOutcome::Fallback(FALLBACK_RECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: ZoomLimits = ZoomLimits { min: 0.1, max: 10.0 };

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 800.0)
    }

    fn frame() -> ScreenFrame {
        ScreenFrame {
            origin: Point::new(20.0, 40.0),
            width: 500.0,
            height: 400.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identity_viewport_equals_bounds() {
        let vp = derive_rendered_viewport(&bounds(), &ViewportTransform::IDENTITY);
        assert_eq!(vp, bounds());
    }

    #[test]
    fn test_viewport_scale_two_is_centered() {
        let t = ViewportTransform {
            scale: 2.0,
            ..ViewportTransform::IDENTITY
        };
        let vp = derive_rendered_viewport(&bounds(), &t);
        assert!(approx(vp.width, 500.0));
        assert!(approx(vp.height, 400.0));
        assert!(approx(vp.x, 250.0));
        assert!(approx(vp.y, 200.0));
    }

    #[test]
    fn test_viewport_translation_shifts_origin() {
        let t = ViewportTransform {
            translate_x: 30.0,
            translate_y: -10.0,
            scale: 1.0,
        };
        let vp = derive_rendered_viewport(&bounds(), &t);
        assert!(approx(vp.x, -30.0));
        assert!(approx(vp.y, 10.0));
    }

    #[test]
    fn test_screen_to_map_origin_and_corner() {
        let vp = bounds();
        let p = screen_to_map_point(&vp, Point::new(20.0, 40.0), &frame());
        assert!(approx(p.x, 0.0) && approx(p.y, 0.0));
        let p = screen_to_map_point(&vp, Point::new(520.0, 440.0), &frame());
        assert!(approx(p.x, 1000.0) && approx(p.y, 800.0));
    }

    #[test]
    fn test_screen_to_map_under_zoom_and_pan() {
        let t = ViewportTransform {
            translate_x: 100.0,
            translate_y: 50.0,
            scale: 2.0,
        };
        let vp = derive_rendered_viewport(&bounds(), &t);
        // Frame centre maps to viewport centre.
        let p = screen_to_map_point(&vp, Point::new(270.0, 240.0), &frame());
        assert!(approx(p.x, vp.center().x));
        assert!(approx(p.y, vp.center().y));
    }

    #[test]
    fn test_map_to_screen_roundtrip() {
        let vp = Rect::new(-12.0, 7.5, 333.0, 120.0);
        let screen = Point::new(123.4, 321.0);
        let back = map_to_screen_point(&vp, screen_to_map_point(&vp, screen, &frame()), &frame());
        assert!((back.x - screen.x).abs() < 1e-9);
        assert!((back.y - screen.y).abs() < 1e-9);
    }

    #[test]
    fn test_fit_letterboxes_wide_surface() {
        // 1000x800 viewport into 1000x400 surface: height-limited, k = 0.5
        let f = ScreenFrame::fit(Rect::new(10.0, 0.0, 1000.0, 400.0), &bounds()).unwrap();
        assert!(approx(f.width, 500.0));
        assert!(approx(f.height, 400.0));
        assert!(approx(f.origin.x, 10.0 + 250.0));
        assert!(approx(f.origin.y, 0.0));
    }

    #[test]
    fn test_fit_rejects_collapsed_surface() {
        assert!(ScreenFrame::fit(Rect::new(0.0, 0.0, 0.0, 400.0), &bounds()).is_none());
    }

    #[test]
    fn test_zoom_in_keeps_anchor_on_screen() {
        let t = ViewportTransform {
            translate_x: 40.0,
            translate_y: -25.0,
            scale: 1.5,
        };
        let anchor = Point::new(700.0, 150.0);
        let before = map_to_screen_point(&derive_rendered_viewport(&bounds(), &t), anchor, &frame());
        let zoomed = apply_zoom(&t, &bounds(), anchor, 1.0, 0.1, LIMITS);
        assert!(zoomed.scale > t.scale);
        let after =
            map_to_screen_point(&derive_rendered_viewport(&bounds(), &zoomed), anchor, &frame());
        assert!((before.x - after.x).abs() < 1e-6);
        assert!((before.y - after.y).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_out_uses_exponential_step() {
        let t = ViewportTransform::IDENTITY;
        let zoomed = apply_zoom(&t, &bounds(), bounds().center(), -1.0, 0.2, LIMITS);
        assert!(approx(zoomed.scale, (-0.2f64).exp()));
        // Anchored at the bounds centre with no pan, translation stays put.
        assert!(approx(zoomed.translate_x, 0.0));
        assert!(approx(zoomed.translate_y, 0.0));
    }

    #[test]
    fn test_zoom_without_direction_is_a_no_op() {
        let t = ViewportTransform {
            translate_x: 3.0,
            translate_y: -4.0,
            scale: 2.0,
        };
        let anchor = Point::new(100.0, 200.0);
        for sign in [0.0, -0.0, f64::NAN, f64::INFINITY] {
            assert_eq!(apply_zoom(&t, &bounds(), anchor, sign, 0.1, LIMITS), t);
        }
    }

    #[test]
    fn test_zoom_clamps_to_max_and_is_idempotent() {
        let t = ViewportTransform {
            translate_x: 5.0,
            translate_y: 6.0,
            scale: 9.9,
        };
        let anchor = Point::new(10.0, 10.0);
        let first = apply_zoom(&t, &bounds(), anchor, 1.0, 0.5, LIMITS);
        assert_eq!(first.scale, 10.0);
        let second = apply_zoom(&first, &bounds(), anchor, 1.0, 0.5, LIMITS);
        assert_eq!(second, first);
    }

    #[test]
    fn test_zoom_clamps_to_min() {
        let t = ViewportTransform {
            scale: 0.11,
            ..ViewportTransform::IDENTITY
        };
        let out = apply_zoom(&t, &bounds(), Point::ZERO, -1.0, 1.0, LIMITS);
        assert_eq!(out.scale, 0.1);
        assert_eq!(apply_zoom(&out, &bounds(), Point::ZERO, -1.0, 1.0, LIMITS), out);
    }

    #[test]
    fn test_zoom_about_center_keeps_translation() {
        let t = ViewportTransform {
            translate_x: 80.0,
            translate_y: 20.0,
            scale: 1.0,
        };
        let out = zoom_about_center(&t, &bounds(), 1.2, LIMITS);
        assert!(approx(out.scale, 1.2));
        assert!(approx(out.translate_x, 80.0));
        assert!(approx(out.translate_y, 20.0));
    }

    #[test]
    fn test_pan_adds_deltas_and_keeps_scale() {
        let t = ViewportTransform {
            translate_x: 1.0,
            translate_y: 2.0,
            scale: 3.0,
        };
        let out = apply_pan(&t, -10.0, 5000.0);
        assert_eq!(
            out,
            ViewportTransform {
                translate_x: -9.0,
                translate_y: 5002.0,
                scale: 3.0
            }
        );
    }

    #[test]
    fn test_bounding_box_with_padding() {
        let regions = vec![
            Region::new("a", "A", "M100 200 L300 250 L150 400 Z"),
            Region::new("b", "B", "M50 220 h10 v10"),
        ];
        let out = compute_bounding_box(&regions, 50.0);
        assert!(!out.is_fallback());
        assert_eq!(out.rect(), Rect::new(0.0, 150.0, 350.0, 300.0));
    }

    #[test]
    fn test_bounding_box_fallback_on_empty() {
        assert_eq!(
            compute_bounding_box(&[], 50.0),
            BoundsOutcome::Fallback(FALLBACK_RECT)
        );
        let junk = vec![Region::new("x", "X", "not a path")];
        assert!(compute_bounding_box(&junk, 50.0).is_fallback());
    }

    #[test]
    fn test_bounding_box_single_point_without_padding_falls_back() {
        let regions = vec![Region::new("p", "P", "M5 5")];
        assert!(compute_bounding_box(&regions, 0.0).is_fallback());
        assert_eq!(
            compute_bounding_box(&regions, 1.0).rect(),
            Rect::new(4.0, 4.0, 2.0, 2.0)
        );
    }
}

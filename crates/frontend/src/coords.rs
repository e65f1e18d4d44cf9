use std::sync::atomic::{AtomicUsize, Ordering};

use dioxus::html::geometry::WheelDelta;
use indiamap_shared::{Point, Rect};

static NEXT_SURFACE: AtomicUsize = AtomicUsize::new(0);

/// Unique DOM id for one map's `<svg>` element.
pub fn next_surface_id() -> String {
    format!("svg-map-{}", NEXT_SURFACE.fetch_add(1, Ordering::Relaxed))
}

/// Client-space rectangle of the element with `element_id`.
pub fn surface_rect(element_id: &str) -> Option<Rect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(element_id)?;
    let rect = element.get_bounding_client_rect();
    Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
}

/// Position relative to the surface's top-left corner, for overlays drawn
/// inside the map container.
pub fn client_to_surface(client: Point, surface: Rect) -> Point {
    Point::new(client.x - surface.x, client.y - surface.y)
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
pub fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::html::geometry::{LinesVector, PagesVector, PixelsVector3D as PixelsVector};

    #[test]
    fn test_client_to_surface_offset() {
        let p = client_to_surface(Point::new(450.0, 350.0), Rect::new(320.0, 50.0, 800.0, 600.0));
        assert!((p.x - 130.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_delta_units() {
        assert_eq!(wheel_delta_y(WheelDelta::Pixels(PixelsVector::new(0.0, -53.0, 0.0))), -53.0);
        assert_eq!(wheel_delta_y(WheelDelta::Lines(LinesVector::new(0.0, 3.0, 0.0))), 120.0);
        assert_eq!(wheel_delta_y(WheelDelta::Pages(PagesVector::new(0.0, -1.0, 0.0))), -400.0);
    }

    #[test]
    fn test_surface_ids_are_unique() {
        assert_ne!(next_surface_id(), next_surface_id());
    }
}

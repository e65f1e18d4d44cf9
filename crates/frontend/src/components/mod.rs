pub mod map_of_svg;
pub mod safe_map;
pub mod zoom_controls;

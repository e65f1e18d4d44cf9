use std::collections::HashMap;
use std::rc::Rc;

use dioxus::prelude::*;
use indiamap_shared::registry::COUNTRY_NAME;
use indiamap_shared::{DatasetRegistry, MapConfig, MapError};

use crate::components::safe_map::SafeMap;
use crate::Route;

/// Maps offered by the toolbar. Gujarat and Uttar Pradesh have no bundled
/// data and show the not-found path.
const MAP_CHOICES: [(&str, &str); 5] = [
    ("India", "India"),
    ("Goa", "Goa"),
    ("Kerala", "Kerala"),
    ("Gujarat", "Gujarat"),
    ("Uttar_Pradesh", "Uttar Pradesh"),
];

fn demo_config(highlight: bool, enable_pan: bool, enable_zoom: bool) -> MapConfig {
    let mut overrides = HashMap::new();
    if highlight {
        overrides.insert("MH".to_string(), "orange".to_string());
        overrides.insert("KL".to_string(), "#2a9d8f".to_string());
    }
    MapConfig {
        enable_pan,
        enable_zoom,
        per_region_override_colors: overrides,
        ..MapConfig::default()
    }
}

/// Demo page for the map named `map`. Switching maps navigates, so every
/// map has its own address.
#[component]
pub fn Tester(map: ReadSignal<String>) -> Element {
    let registry = use_context::<Rc<DatasetRegistry>>();
    let nav = navigator();
    let mut highlight = use_signal(|| true);
    let mut enable_pan = use_signal(|| true);
    let mut enable_zoom = use_signal(|| true);
    let mut clicked = use_signal(|| None::<(String, String)>);
    let mut hovered = use_signal(|| None::<String>);
    let mut last_error = use_signal(|| None::<String>);

    let config = use_memo(move || demo_config(*highlight.read(), *enable_pan.read(), *enable_zoom.read()));

    let current = map.read().clone();
    let clicked_text = match clicked.read().as_ref() {
        Some((name, id)) => format!("Clicked: {name} ({id})"),
        None => "Clicked: none".to_string(),
    };
    let hovered_text = format!("Hovered: {}", hovered.read().as_deref().unwrap_or("none"));

    rsx! {
        div { class: "tester",
            h1 { "India Boundary Maps" }

            div { class: "tester-toolbar",
                for (choice, caption) in MAP_CHOICES {
                    button {
                        class: if current == choice { "active" } else { "" },
                        onclick: move |_| {
                            clicked.set(None);
                            hovered.set(None);
                            last_error.set(None);
                            nav.push(Route::MapPage { name: choice.to_string() });
                        },
                        "{caption}"
                    }
                }
            }

            div { class: "tester-toolbar",
                label {
                    input {
                        r#type: "checkbox",
                        checked: *highlight.read(),
                        onchange: move |evt: Event<FormData>| highlight.set(evt.checked()),
                    }
                    " Highlight overrides"
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: *enable_pan.read(),
                        onchange: move |evt: Event<FormData>| enable_pan.set(evt.checked()),
                    }
                    " Pan"
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: *enable_zoom.read(),
                        onchange: move |evt: Event<FormData>| enable_zoom.set(evt.checked()),
                    }
                    " Zoom"
                }
            }

            p { class: "tester-status", "{clicked_text}" }
            p { class: "tester-status", "{hovered_text}" }
            if let Some(error) = last_error.read().clone() {
                p { class: "tester-status", "Last error: {error}" }
            }

            SafeMap {
                name: map,
                config,
                height: "560px",
                on_region_click: move |(name, id): (String, String)| {
                    // Clicking a state on the country map opens that state.
                    let drill_into = map.peek().eq_ignore_ascii_case(COUNTRY_NAME)
                        && registry.contains(&name);
                    clicked.set(Some((name.clone(), id)));
                    if drill_into {
                        hovered.set(None);
                        nav.push(Route::MapPage { name });
                    }
                },
                on_region_hover: move |(name, _id): (Option<String>, String)| hovered.set(name),
                on_error: move |error: MapError| {
                    last_error.set(Some(error.user_message()));
                },
            }
        }
    }
}

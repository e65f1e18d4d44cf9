use dioxus::prelude::*;
use indiamap_shared::{MapConfig, MapError};

use crate::components::map_of_svg::MapOfSvg;

#[component]
fn MapFallback(title: String, message: String, on_retry: Option<EventHandler<()>>) -> Element {
    rsx! {
        div { class: "map-fallback",
            h3 { "{title}" }
            p { "{message}" }
            if let Some(on_retry) = on_retry {
                button { onclick: move |_| on_retry.call(()), "Try Again" }
            }
        }
    }
}

/// [`MapOfSvg`] behind a failure boundary.
///
/// A configuration that does not validate is reported without mounting the
/// map. Anything thrown while drawing is caught and replaced by a fallback
/// panel whose retry remounts the map from scratch.
#[component]
pub fn SafeMap(
    name: ReadSignal<String>,
    config: ReadSignal<MapConfig>,
    #[props(default = "100%".to_string())] width: String,
    #[props(default = "600px".to_string())] height: String,
    on_region_click: Option<EventHandler<(String, String)>>,
    on_region_hover: Option<EventHandler<(Option<String>, String)>>,
    on_error: Option<EventHandler<MapError>>,
) -> Element {
    let mut attempt = use_signal(|| 0_u32);
    let config_error = use_memo(move || config.read().validate().err());

    if let Some(error) = config_error.read().clone() {
        return rsx! {
            MapFallback { title: "Map Unavailable", message: error.to_string() }
        };
    }

    rsx! {
        ErrorBoundary {
            handle_error: move |errors: ErrorContext| {
                tracing::error!(?errors, "Map rendering failed");
                rsx! {
                    MapFallback {
                        title: "Map Error",
                        message: "Something went wrong while drawing this map.",
                        on_retry: move |_| {
                            errors.clear_errors();
                            *attempt.write() += 1;
                        },
                    }
                }
            },
            MapOfSvg {
                key: "{attempt}",
                name,
                config,
                width,
                height,
                on_region_click,
                on_region_hover,
                on_error,
            }
        }
    }
}

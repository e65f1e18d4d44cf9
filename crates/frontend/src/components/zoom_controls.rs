use dioxus::prelude::*;

#[component]
pub fn ZoomControls(
    zoom_label: String,
    on_zoom_in: EventHandler<()>,
    on_zoom_out: EventHandler<()>,
    on_reset: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "zoom-controls",
            button { title: "Zoom in", onclick: move |_| on_zoom_in.call(()), "+" }
            button { title: "Zoom out", onclick: move |_| on_zoom_out.call(()), "-" }
            button { title: "Reset view", onclick: move |_| on_reset.call(()), "⟲" }
        }
        div { class: "zoom-indicator", "{zoom_label}" }
    }
}

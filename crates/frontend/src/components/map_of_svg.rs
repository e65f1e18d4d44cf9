use std::rc::Rc;

use dioxus::html::geometry::ClientPoint;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use indiamap_shared::render::RenderedRegion;
use indiamap_shared::{
    DatasetRegistry, LoadOutcome, LoadTicket, MapConfig, MapError, MapEvent, MapSession, MapViewer,
    Point, ViewState,
};

use crate::components::zoom_controls::ZoomControls;
use crate::coords;

#[derive(Debug, Clone, PartialEq)]
struct Tooltip {
    text: String,
    /// Relative to the top-left of the map surface.
    at: Point,
}

/// What the component draws this frame, pulled out of the viewer so no
/// borrow is held while building the tree.
enum Frame {
    Loading,
    Failed(String),
    Ready {
        regions: Vec<RenderedRegion>,
        view_box: String,
        zoom_label: String,
        panning: bool,
    },
}

fn to_point(client: ClientPoint) -> Point {
    Point::new(client.x, client.y)
}

/// Pointer position relative to the surface element, for overlay placement.
fn surface_point(surface_id: Signal<String>, client: ClientPoint) -> Point {
    let client = to_point(client);
    match coords::surface_rect(&surface_id.peek()) {
        Some(rect) => coords::client_to_surface(client, rect),
        None => client,
    }
}

/// Resolve `name` off the current event turn and hand the result to the
/// viewer. Results for superseded requests are dropped by the viewer.
fn spawn_load(
    mut viewer: Signal<MapViewer>,
    registry: Rc<DatasetRegistry>,
    ticket: LoadTicket,
    name: String,
    on_error: Option<EventHandler<MapError>>,
) {
    spawn(async move {
        // Let the loading state paint first.
        TimeoutFuture::new(0).await;
        let result = registry.resolve(&name);
        let failure = result.as_ref().err().cloned();
        let outcome = viewer.write().complete(ticket, result);
        if outcome == LoadOutcome::Applied {
            if let (Some(error), Some(handler)) = (failure, on_error) {
                handler.call(error);
            }
        }
    });
}

/// Interactive SVG map of the dataset registered under `name`.
///
/// Expects an `Rc<DatasetRegistry>` in context. Click callbacks receive
/// `(display name, region id)`; hover callbacks receive the name on enter
/// and `None` on leave.
#[component]
pub fn MapOfSvg(
    name: ReadSignal<String>,
    config: ReadSignal<MapConfig>,
    #[props(default = "100%".to_string())] width: String,
    #[props(default = "600px".to_string())] height: String,
    on_region_click: Option<EventHandler<(String, String)>>,
    on_region_hover: Option<EventHandler<(Option<String>, String)>>,
    on_error: Option<EventHandler<MapError>>,
) -> Element {
    let registry = use_context::<Rc<DatasetRegistry>>();
    let mut viewer = use_signal(MapViewer::default);
    let surface_id = use_signal(coords::next_surface_id);
    let mut tooltip = use_signal(|| None::<Tooltip>);

    use_effect(move || {
        let config = config.read().clone();
        if let Err(error) = viewer.write().set_config(config) {
            tracing::warn!(%error, "Map configuration rejected");
        }
    });

    let load_registry = registry.clone();
    use_effect(move || {
        let name = name.read().clone();
        let ticket = viewer.write().request(&name);
        tooltip.set(None);
        spawn_load(viewer, load_registry.clone(), ticket, name, on_error);
    });

    let retry = move |_: Event<MouseData>| {
        let Some(ticket) = viewer.write().retry() else {
            return;
        };
        let name = viewer.peek().requested_name().unwrap_or_default().to_string();
        spawn_load(viewer, registry.clone(), ticket, name, on_error);
    };

    let has_click = on_region_click.is_some();
    let (frame, stroke, stroke_width, enable_pan, enable_zoom) = {
        let current = viewer.read();
        let cfg = current.config();
        let frame = match current.state() {
            ViewState::Empty | ViewState::Loading { .. } => Frame::Loading,
            ViewState::Failed { error, .. } => Frame::Failed(error.user_message()),
            ViewState::Ready(session) => Frame::Ready {
                regions: session.render(cfg, has_click),
                view_box: session.view_box(),
                zoom_label: session.zoom_label(),
                panning: session.is_panning(),
            },
        };
        (
            frame,
            cfg.stroke_color.clone(),
            cfg.stroke_width,
            cfg.enable_pan,
            cfg.enable_zoom,
        )
    };

    let container_style = format!("width: {width}; height: {height};");

    let (regions, view_box, zoom_label, panning) = match frame {
        Frame::Loading => {
            return rsx! {
                div { class: "map-container", style: "{container_style}",
                    div { class: "map-loading", "Loading Map..." }
                }
            };
        }
        Frame::Failed(message) => {
            return rsx! {
                div { class: "map-container", style: "{container_style}",
                    div { class: "map-error",
                        p { "{message}" }
                        button { onclick: retry, "Try Again" }
                    }
                }
            };
        }
        Frame::Ready {
            regions,
            view_box,
            zoom_label,
            panning,
        } => (regions, view_box, zoom_label, panning),
    };

    let cursor = match (enable_pan, panning) {
        (false, _) => "default",
        (true, true) => "grabbing",
        (true, false) => "grab",
    };

    let emit_hover = move |event: Option<MapEvent>| {
        let Some(handler) = on_region_hover else {
            return;
        };
        if let Some((name, id)) = event.as_ref().and_then(MapEvent::hover_change) {
            handler.call((name.map(str::to_owned), id.to_owned()));
        }
    };

    rsx! {
        div { class: "map-container", style: "{container_style}",
            svg {
                id: "{surface_id}",
                xmlns: "http://www.w3.org/2000/svg",
                view_box: "{view_box}",
                preserve_aspect_ratio: "xMidYMid meet",
                style: "cursor: {cursor};",

                onwheel: move |evt: Event<WheelData>| {
                    let Some(surface) = coords::surface_rect(&surface_id.peek()) else { return };
                    let screen = to_point(evt.data().client_coordinates());
                    let delta_y = coords::wheel_delta_y(evt.data().delta());
                    if viewer.write().wheel(screen, delta_y, surface) {
                        evt.prevent_default();
                    }
                },

                onmousedown: move |evt: Event<MouseData>| {
                    if evt.trigger_button() != Some(MouseButton::Primary) {
                        return;
                    }
                    let Some(surface) = coords::surface_rect(&surface_id.peek()) else { return };
                    viewer.write().pointer_down(to_point(evt.client_coordinates()), surface);
                },

                onmousemove: move |evt: Event<MouseData>| {
                    let panning = viewer.peek().session().is_some_and(MapSession::is_panning);
                    if !panning {
                        return;
                    }
                    let Some(surface) = coords::surface_rect(&surface_id.peek()) else { return };
                    viewer.write().pointer_move(to_point(evt.client_coordinates()), surface);
                },

                onmouseup: move |_| viewer.write().pointer_up(),

                onmouseleave: move |_| viewer.write().pointer_leave(),

                g {
                    for region in regions {
                        {
                            let click_id = region.id.clone();
                            let enter_id = region.id.clone();
                            let move_id = region.id.clone();
                            let leave_id = region.id.clone();
                            let path_style = format!("cursor: {};", region.cursor());

                            rsx! {
                                path {
                                    key: "{region.id}",
                                    d: "{region.geometry}",
                                    transform: region.transform.clone(),
                                    class: "{region.class}",
                                    fill: "{region.fill}",
                                    stroke: "{stroke}",
                                    stroke_width: "{stroke_width}",
                                    style: "{path_style}",

                                    onclick: move |evt: Event<MouseData>| {
                                        evt.stop_propagation();
                                        let event = viewer.write().region_click(&click_id, has_click);
                                        if let (Some(MapEvent::Click { name, id }), Some(handler)) =
                                            (event, on_region_click)
                                        {
                                            handler.call((name, id));
                                        }
                                    },

                                    onmouseenter: move |evt: Event<MouseData>| {
                                        let event = viewer.write().region_enter(&enter_id, has_click);
                                        if let Some(MapEvent::HoverEnter { name, .. }) = &event {
                                            tooltip.set(Some(Tooltip {
                                                text: name.clone(),
                                                at: surface_point(surface_id, evt.client_coordinates()),
                                            }));
                                        }
                                        emit_hover(event);
                                    },

                                    onmousemove: move |evt: Event<MouseData>| {
                                        let screen = to_point(evt.client_coordinates());
                                        if viewer.peek().region_move(&move_id, screen).is_none() {
                                            return;
                                        }
                                        let at = surface_point(surface_id, evt.client_coordinates());
                                        if let Some(tip) = tooltip.write().as_mut() {
                                            tip.at = at;
                                        }
                                    },

                                    onmouseleave: move |_| {
                                        let event = viewer.write().region_leave(&leave_id);
                                        if event.is_some() {
                                            tooltip.set(None);
                                        }
                                        emit_hover(event);
                                    },

                                    title { "{region.name}" }
                                }
                            }
                        }
                    }
                }
            }

            if let Some(tip) = tooltip.read().clone() {
                div {
                    class: "map-tooltip",
                    style: "left: {tip.at.x}px; top: {tip.at.y}px;",
                    "{tip.text}"
                }
            }

            if enable_zoom {
                ZoomControls {
                    zoom_label,
                    on_zoom_in: move |_| viewer.write().zoom_in(),
                    on_zoom_out: move |_| viewer.write().zoom_out(),
                    on_reset: move |_| viewer.write().reset_view(),
                }
            }
        }
    }
}

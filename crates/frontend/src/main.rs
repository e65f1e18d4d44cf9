mod components;
mod coords;
mod datasets;
mod pages;

use std::rc::Rc;

use dioxus::prelude::*;
use indiamap_shared::registry::COUNTRY_NAME;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/map/:name")]
    MapPage { name: String },
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::tester::Tester { map: COUNTRY_NAME.to_string() }
    }
}

#[component]
fn MapPage(name: String) -> Element {
    rsx! {
        pages::tester::Tester { map: name }
    }
}

const CSS: Asset = asset!("/assets/main.css");

#[allow(non_snake_case)]
fn App() -> Element {
    use_context_provider(|| Rc::new(datasets::registry()));

    rsx! {
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    dioxus::logger::initialize_default();
    launch(App);
}

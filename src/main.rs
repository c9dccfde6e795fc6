#![allow(non_snake_case)]
mod pages;
mod components;
mod utils;

use dioxus::prelude::*;
use pages::{payment_success::PaymentSuccess, quiz::QuizView};

#[derive(Routable, PartialEq, Clone)]
enum Route {
    #[route("/q/:id")]
    QuizView { id: String },
    #[route("/payment/success")]
    PaymentSuccess {},
    #[route("/:..route")]
    PageNotFound { route: Vec<String> }
}

fn main() {
    dioxus::launch(App);
}

fn App() -> Element {
    rsx! { Router::<Route> {} }
}

#[component]
fn PageNotFound(route: Vec<String>) -> Element {
    rsx! {
        h1 { "Page not found" }
        p { "We are terribly sorry, but the page you requested doesn't exist." }
        pre { color: "red", "log:\nattemped to navigate to: {route:?}" }
    }
}

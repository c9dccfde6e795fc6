use dioxus::prelude::*;

pub const DASHBOARD_URL: &str = env!("DASHBOARD_URL");

// Post-checkout confirmation screen. Everything interesting already happened
// on the billing provider's side; this page only confirms and hands off.
#[component]
pub fn PaymentSuccess() -> Element {
  static CSS: Asset = asset!("/assets/payment.css");

  rsx! {
    document::Stylesheet { href: CSS },
    div {
      class: "payment-page",
      div {
        class: "payment-card",
        div { class: "payment-check", "✓" }
        h1 { "Payment confirmed" }
        p { "Your subscription is active and your free trial has started. You will only be billed once the trial ends." }
        p { class: "payment-note", "A receipt is on its way to your email address." }
        a {
          class: "cta-button",
          href: DASHBOARD_URL,
          "Go to dashboard"
        }
      }
    }
  }
}

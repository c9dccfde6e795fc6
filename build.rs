use dotenvy::dotenv;

fn main() {
  // Tell Cargo that if the env file changes, to rerun this build script.
  println!("cargo::rerun-if-changed=.env");

  dotenv().ok();

  // An empty base URL means same-origin requests, which is what the deployed
  // bundle uses. Point it at a local backend during development.
  let api_base = std::env::var("API_BASE_URL").unwrap_or_default();
  println!("cargo::rustc-env=API_BASE_URL={}", api_base);

  let dashboard = std::env::var("DASHBOARD_URL").unwrap_or_else(|_| "https://app.leadquiz.io".to_string());
  println!("cargo::rustc-env=DASHBOARD_URL={}", dashboard);
}

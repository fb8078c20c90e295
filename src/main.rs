//! Shared Todo Frontend Entry Point

mod app;
mod cache;
mod components;
mod config;
mod context;
mod error;
mod graphql;
mod logging;
mod models;
mod ordering;
mod reconcile;
mod routes;
mod session;
mod store;
mod toast;

use app::App;
use config::AppConfig;
use leptos::prelude::*;
use session::{LocalStorage, Session};

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load();
    logging::init(&config.log_level);
    logging::expose_recent_lines();
    let session = Session::restore(&LocalStorage, &config.token_storage_key);
    log::info!("[APP] starting, api={}", config.graphql_http_url);

    mount_to_body(move || view! { <App config=config session=session /> });
}

//! spacedash client - main entry point
//!
//! Supports both web (WASM) and desktop platforms.

#![allow(non_snake_case)]

use anyhow::Context;
use dioxus::prelude::*;
use spacedash_client::{log_error, log_info, logging, AppConfig, AuthProvider, Route};

/// Outcome of loading the configuration, handed to the app as context.
type Startup = Result<AppConfig, String>;

fn main() {
    logging::init("spacedash_client=debug");

    let startup: Startup = match AppConfig::load().context("Invalid configuration") {
        Ok(config) => {
            log_info!("Using API at {}", config.api_base_url);
            Ok(config)
        }
        Err(e) => {
            log_error!("{:#}", e);
            Err(format!("{e:#}"))
        }
    };

    LaunchBuilder::new().with_context(startup).launch(App);
}

#[component]
fn App() -> Element {
    match use_context::<Startup>() {
        Ok(config) => rsx! {
            AuthProvider { config, Router::<Route> {} }
        },
        Err(message) => rsx! {
            div { class: "fatal",
                h1 { "spacedash could not start" }
                p { "{message}" }
            }
        },
    }
}

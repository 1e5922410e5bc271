//! spacedash client - Dioxus web/desktop application
//!
//! Talks to the spacedash REST API for spaces, files, courses, tests and
//! users, and to three WebSocket services (assistant, course creator, Q&A).

pub mod logging;

pub mod api;
pub mod api_client;
pub mod articles;
pub mod auth_session;
pub mod cache;
pub mod chat;
pub mod config;
pub mod identity;
pub mod presentation;
pub mod quiz;
pub mod resource;
pub mod session;
pub mod storage;
pub mod ws;

pub mod components;
pub mod hooks;
pub mod routes;
pub mod stores;
pub mod views;

pub use api_client::ApiClient;
pub use auth_session::{AuthContext, AuthProvider};
pub use config::AppConfig;
pub use routes::Route;

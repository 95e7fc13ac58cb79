//! HTTP front door for the conversational job intake service.

pub mod config;
pub mod routes;
pub mod server;
pub mod twilio;

pub use config::Config;
pub use server::{build_app, AppState};

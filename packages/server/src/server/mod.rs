pub mod app;

pub use app::{build_app, AppState};

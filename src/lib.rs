pub mod app;
pub mod config;
pub mod dispatcher;
pub mod draft;
pub mod errors;
pub mod guard;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod remote;
pub mod report;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use tracker::Tracker;

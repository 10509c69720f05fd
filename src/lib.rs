pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod evaluator;
pub mod events;
pub mod handlers;
pub mod models;
pub mod progression;
pub mod reminder;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::{Config, TrackerPolicy};
pub use errors::{AppError, TrackerError};
pub use state::AppState;
pub use storage::Storage;
pub use tracker::Tracker;

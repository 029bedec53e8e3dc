pub mod achievements;
pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod image_source;
pub mod journal;
pub mod models;
pub mod records;
pub mod state;
pub mod storage;
pub mod themes;
pub mod ticker;
pub mod timer;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use journal::Journal;
pub use state::AppState;
pub use storage::{resolve_data_path, SnapshotFile};

pub mod app;
pub mod errors;
pub mod gaming;
pub mod handlers;
pub mod models;
pub mod session;
pub mod snack;
pub mod state;
pub mod stats;
pub mod storage;
pub mod validation;

pub use app::router;
pub use session::Session;
pub use state::AppState;
pub use storage::{FileStore, resolve_data_path};

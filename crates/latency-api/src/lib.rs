pub mod error;
pub mod report;
pub mod server;
pub mod settings;

pub use error::{ApiError, ErrorBody};
pub use server::{AppState, build_router};
pub use settings::Settings;

pub mod format;
pub mod router;
pub mod state;
pub mod views;

pub use router::app;
pub use state::AppState;

// State management module
// Holds the shared handles every request handler reads from

/// `AppState`: resource roots and the injected `FileService`
pub mod app_state;

pub use app_state::AppState;

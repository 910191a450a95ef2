//! User preferences (non-secret settings only).

pub mod settings;

pub use settings::Settings;

pub mod audio_models;
pub mod config;
pub mod content;
pub mod error;
pub mod recording_result;
pub mod settings;
pub mod state;
pub mod transcript;

pub mod audio_muxer;
pub mod capture_engine;
pub mod permissions;
pub mod recorder_delegate;

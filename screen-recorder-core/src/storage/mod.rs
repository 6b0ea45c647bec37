pub mod audio_file_writer;
pub mod metadata;
pub mod wav_muxer;

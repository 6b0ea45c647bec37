pub mod pcm;
pub mod wav_format;

pub mod screen_recorder;

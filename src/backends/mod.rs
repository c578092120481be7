/// Built-in ASR backend powered by `whisper-rs`.
pub mod whisper;

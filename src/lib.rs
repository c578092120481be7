//! `earshot`: a local speech-to-text service built on top of Whisper.
//!
//! The service loads one model at startup, then answers length-prefixed `f32` PCM
//! frames read from a byte stream with one JSON line each:
//!
//! ```text
//! in:  [u32 LE length][length bytes of f32 LE PCM, mono, 16 kHz] ...
//! out: {"success":true,"text":"...","language":"en"}
//!      {"success":false,"error":"..."}
//! ```
//!
//! This crate provides:
//! - Framing (`frame`) and sample handling (`samples`)
//! - A pluggable model seam (`backend`) with a whisper.cpp implementation
//! - The per-frame adapter (`transcriber`) and the blocking loop (`service`)
//! - Model catalog and optional download (`models`, `fetch`)

mod error;

// High-level API (most consumers should start here).
pub mod opts;
pub mod service;
pub mod transcriber;

// Wire format.
pub mod frame;
pub mod response;
pub mod samples;

// Model seam and built-in backends.
pub mod backend;
pub mod backends;
pub mod models;

#[cfg(feature = "download")]
pub mod fetch;

#[cfg(feature = "signal")]
pub mod signal;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use backend::{Backend, Transcript};
pub use backends::whisper::WhisperBackend;
pub use error::{Error, Result};
pub use opts::Opts;
pub use response::TranscriptionResult;
pub use service::{Service, Shutdown, State, StopReason, Summary};
pub use transcriber::Transcriber;

#[cfg(feature = "logging")]
pub use logging::init as init_logging;

use std::io::Write;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::Result;

/// The per-frame outcome written back to the caller.
///
/// Serializes as `{"success":true,"text":..,"language":..}` or
/// `{"success":false,"error":..}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionResult {
    Success { text: String, language: String },
    Failure { error: String },
}

impl TranscriptionResult {
    /// Build a failure, substituting a generic message when `error` is blank.
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "transcription failed".to_owned()
        } else {
            error
        };
        Self::Failure { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl Serialize for TranscriptionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Success { text, language } => {
                let mut s = serializer.serialize_struct("TranscriptionResult", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("text", text)?;
                s.serialize_field("language", language)?;
                s.end()
            }
            Self::Failure { error } => {
                let mut s = serializer.serialize_struct("TranscriptionResult", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}

/// Writes one JSON object per line and flushes after every line.
///
/// Flushing per line matters: the caller on the other side of a pipe is blocked
/// waiting for exactly this response before it sends the next frame.
pub struct ResponseWriter<W: Write> {
    w: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn write_result(&mut self, result: &TranscriptionResult) -> Result<()> {
        serde_json::to_writer(&mut self.w, result)?;
        self.w.write_all(b"\n")?;
        self.w.flush()?;
        Ok(())
    }
}

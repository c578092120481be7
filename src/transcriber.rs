//! Turns one frame payload into one [`TranscriptionResult`].
//!
//! Every failure on the way (misaligned payload, model error) is folded into
//! `TranscriptionResult::Failure`, so callers never handle errors from this layer.

use tracing::{debug, warn};

use crate::Result;
use crate::backend::Backend;
use crate::opts::{DEFAULT_LANGUAGE, Opts};
use crate::response::TranscriptionResult;
use crate::samples::{peak_normalize, samples_from_le_bytes};

/// Wraps a loaded [`Backend`] with the payload decoding and result shaping around it.
pub struct Transcriber<B: Backend> {
    backend: B,
    opts: Opts,
}

impl<B: Backend> Transcriber<B> {
    pub fn new(backend: B, opts: Opts) -> Self {
        Self { backend, opts }
    }

    /// Transcribe one raw payload of little-endian `f32` samples.
    pub fn transcribe_bytes(&self, payload: &[u8]) -> TranscriptionResult {
        match self.try_transcribe(payload) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, bytes = payload.len(), "transcription failed");
                TranscriptionResult::failure(err.to_string())
            }
        }
    }

    fn try_transcribe(&self, payload: &[u8]) -> Result<TranscriptionResult> {
        let mut samples = samples_from_le_bytes(payload)?;
        if peak_normalize(&mut samples) {
            debug!(samples = samples.len(), "peak-normalized out-of-range audio");
        }

        let transcript = self.backend.transcribe(&self.opts, &samples)?;

        let language = transcript
            .language
            .filter(|lang| !lang.trim().is_empty())
            .or_else(|| self.opts.language_hint().map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned());

        Ok(TranscriptionResult::Success {
            text: transcript.text.trim().to_owned(),
            language,
        })
    }

    pub fn opts(&self) -> &Opts {
        &self.opts
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

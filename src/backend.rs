use crate::Result;
use crate::opts::Opts;

/// Raw output of a single model call, before it is shaped into a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    /// Concatenated transcript text, untrimmed.
    pub text: String,

    /// Language the model reports for the audio, when it reports one.
    pub language: Option<String>,
}

/// Pluggable ASR backend used by [`crate::Transcriber`].
///
/// A backend turns 16 kHz mono `f32` samples into a [`Transcript`]. The model is loaded
/// when the backend is constructed and is only read afterwards, so `transcribe` takes `&self`.
pub trait Backend {
    /// Run one transcription pass over a contiguous sample buffer.
    ///
    /// `samples` may be empty.
    fn transcribe(&self, opts: &Opts, samples: &[f32]) -> Result<Transcript>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn transcribe(&self, opts: &Opts, samples: &[f32]) -> Result<Transcript> {
        (**self).transcribe(opts, samples)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn transcribe(&self, opts: &Opts, samples: &[f32]) -> Result<Transcript> {
        (**self).transcribe(opts, samples)
    }
}

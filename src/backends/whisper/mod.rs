use std::path::Path;

use anyhow::{Context, ensure};
use whisper_rs::WhisperContext;

use crate::Result;
use crate::backend::{Backend, Transcript};
use crate::opts::Opts;

mod ctx;
mod logging;
mod transcript;

/// Built-in backend powered by `whisper-rs` / `whisper.cpp`.
///
/// Owns the loaded model. Every call creates a fresh `WhisperState`, so the context itself
/// is never mutated after load.
pub struct WhisperBackend {
    ctx: WhisperContext,
    model_path: String,
}

impl WhisperBackend {
    /// Load a whisper.cpp model from disk and initialize a backend.
    pub fn new(model_path: impl AsRef<Path>, opts: &Opts) -> Result<Self> {
        Ok(Self::load(model_path.as_ref(), opts)?)
    }

    fn load(model_path: &Path, opts: &Opts) -> anyhow::Result<Self> {
        ensure!(
            model_path.is_file(),
            "model not found at '{}'",
            model_path.display()
        );
        let model_path = model_path
            .to_str()
            .with_context(|| format!("model path is not valid UTF-8: {}", model_path.display()))?
            .to_owned();

        let ctx = ctx::get_context(&model_path, opts)?;
        Ok(Self { ctx, model_path })
    }

    /// Path the model was loaded from, for diagnostics.
    pub fn model_path(&self) -> &str {
        &self.model_path
    }
}

impl Backend for WhisperBackend {
    fn transcribe(&self, opts: &Opts, samples: &[f32]) -> Result<Transcript> {
        Ok(transcript::transcribe_samples(&self.ctx, opts, samples)?)
    }
}

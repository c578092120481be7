use anyhow::{Context, Result};
use whisper_rs::{WhisperContext, WhisperContextParameters};

use crate::opts::Opts;

use super::logging::init_whisper_logging;

/// Load a Whisper model and return an initialized `WhisperContext`.
///
/// Precision and GPU placement are fixed here; whisper.cpp cannot change them per call.
pub fn get_context(model_path: &str, opts: &Opts) -> Result<WhisperContext> {
    init_whisper_logging();

    let mut ctx_params = WhisperContextParameters::default();
    ctx_params.use_gpu(opts.use_gpu);
    ctx_params.flash_attn(opts.half_precision);

    let ctx = WhisperContext::new_with_params(model_path, ctx_params)
        .with_context(|| format!("failed to load model from path: {model_path}"))?;

    Ok(ctx)
}

//! Catalog of known Whisper model artifacts.
//!
//! Model sizes are addressed by short names (`small`, `base.en`, ...) the same way
//! Whisper's own loaders name them. Each maps to a whisper.cpp GGML file.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Model loaded when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "small";

/// Default directory models are read from and downloaded into.
pub const DEFAULT_MODEL_DIR: &str = "./models";

const GGML_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// A known model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Friendly name users type (e.g. "small").
    pub name: &'static str,

    /// Filename on disk (e.g. "ggml-small.bin").
    pub filename: &'static str,
}

impl ModelSpec {
    /// Where this model can be downloaded from.
    pub fn url(&self) -> String {
        format!("{GGML_BASE_URL}/{}", self.filename)
    }

    /// Where this model lives inside `dir`.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.filename)
    }
}

macro_rules! model {
    ($name:literal) => {
        ModelSpec {
            name: $name,
            filename: concat!("ggml-", $name, ".bin"),
        }
    };
}

static MODELS: &[ModelSpec] = &[
    model!("tiny"),
    model!("tiny.en"),
    model!("base"),
    model!("base.en"),
    model!("small"),
    model!("small.en"),
    model!("medium"),
    model!("medium.en"),
    model!("large-v2"),
    model!("large-v3"),
    model!("large-v3-turbo"),
];

/// Find a model by its friendly name.
pub fn lookup_model(name: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|m| m.name == name)
}

/// Like [`lookup_model`], but an unknown name is an error listing the valid ones.
pub fn require_model(name: &str) -> Result<&'static ModelSpec> {
    lookup_model(name).ok_or_else(|| {
        let names: Vec<&str> = MODELS.iter().map(|m| m.name).collect();
        Error::msg(format!(
            "unknown model '{name}' (expected one of: {})",
            names.join(", ")
        ))
    })
}

/// Human-readable catalog, one model per line.
pub fn model_list_string() -> String {
    let mut out = String::from("Whisper models:\n");
    for m in MODELS {
        out.push_str("  - ");
        out.push_str(m.name);
        if m.name == DEFAULT_MODEL {
            out.push_str(" (default)");
        }
        out.push('\n');
    }
    out
}

/// Language hint used when the caller does not supply one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Language value that asks the model to detect the spoken language.
pub const AUTO_DETECT: &str = "auto";

/// Options that control how frames are transcribed.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The binary maps user input into this type so tests and other frontends can
/// construct it programmatically.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Language hint passed to the model (e.g. `"en"`).
    ///
    /// `"auto"` or an empty string asks the model to detect the language.
    pub language: String,

    /// Whether the model may run attention in half precision.
    ///
    /// Whisper.cpp fixes precision when the model is loaded, so this is read by
    /// backends at construction time rather than per call.
    pub half_precision: bool,

    /// Whether the backend may offload inference to a GPU.
    pub use_gpu: bool,

    /// Emit an error line for a truncated payload instead of dropping it silently.
    pub report_truncated: bool,
}

impl Opts {
    /// The concrete language hint, or `None` when the model should detect it.
    pub fn language_hint(&self) -> Option<&str> {
        let lang = self.language.trim();
        if lang.is_empty() || lang.eq_ignore_ascii_case(AUTO_DETECT) {
            return None;
        }
        Some(lang)
    }
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_owned(),
            half_precision: false,
            use_gpu: false,
            report_truncated: false,
        }
    }
}

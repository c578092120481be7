use std::os::raw::c_int;

use anyhow::{Context, Result};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperState};

use crate::backend::Transcript;
use crate::opts::{AUTO_DETECT, Opts};

pub(super) fn transcribe_samples(
    ctx: &WhisperContext,
    opts: &Opts,
    samples: &[f32],
) -> Result<Transcript> {
    let state = run_whisper_full(ctx, opts, samples)?;

    let mut text = String::new();
    for segment in state.as_iter() {
        let segment_text = segment.to_str().context("failed to get segment text")?;
        text.push_str(segment_text);
    }

    let language = detected_language(state.full_lang_id_from_state(), opts);

    Ok(Transcript { text, language })
}

/// Map whisper's language id to a code, falling back to the configured hint.
///
/// With a hint set, whisper.cpp reports the hint's id; with detection it reports the
/// detected one. A negative or unknown id yields the hint, or `None` under detection.
fn detected_language(lang_id: c_int, opts: &Opts) -> Option<String> {
    let detected = if lang_id >= 0 {
        whisper_rs::get_lang_str(lang_id)
    } else {
        None
    };

    detected.or(opts.language_hint()).map(str::to_owned)
}

fn build_full_params(opts: &Opts) -> FullParams<'_, '_> {
    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(false);
    params.set_language(Some(opts.language_hint().unwrap_or(AUTO_DETECT)));
    params.set_no_context(true);
    params.set_single_segment(false);

    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    params
}

fn run_whisper_full(ctx: &WhisperContext, opts: &Opts, samples: &[f32]) -> Result<WhisperState> {
    let params = build_full_params(opts);

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;

    state
        .full(params, samples)
        .context("failed to run whisper full()")?;

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_language(language: &str) -> Opts {
        Opts {
            language: language.to_owned(),
            ..Opts::default()
        }
    }

    #[test]
    fn detected_id_wins_over_auto() {
        // Id 0 is English in whisper.cpp's language table.
        assert_eq!(detected_language(0, &with_language("auto")), Some("en".to_owned()));
    }

    #[test]
    fn detected_id_wins_over_hint() {
        assert_eq!(detected_language(0, &with_language("fr")), Some("en".to_owned()));
    }

    #[test]
    fn missing_id_falls_back_to_hint() {
        assert_eq!(detected_language(-1, &with_language("fr")), Some("fr".to_owned()));
    }

    #[test]
    fn missing_id_under_detection_is_unknown() {
        assert_eq!(detected_language(-1, &with_language("auto")), None);
        assert_eq!(detected_language(-1, &with_language("")), None);
    }
}

use std::io::Cursor;

use earshot::{Opts, Service, Transcriber, WhisperBackend};

#[test]
fn missing_model_file_is_an_error() {
    let msg = match WhisperBackend::new("tests/fixtures/does-not-exist.bin", &Opts::default()) {
        Ok(_) => panic!("expected error for missing model"),
        Err(err) => err.to_string(),
    };
    assert!(
        msg.contains("model not found"),
        "unexpected error message:\n{msg}"
    );
}

#[test]
#[ignore = "needs ./models/ggml-small.bin"]
fn silent_frame_transcribes_with_small_model() -> anyhow::Result<()> {
    let backend = WhisperBackend::new("./models/ggml-small.bin", &Opts::default())?;
    let service = Service::new(Transcriber::new(backend, Opts::default()));

    let mut input = 16u32.to_le_bytes().to_vec();
    input.extend([0u8; 16]);
    let mut out = Vec::new();
    service.run(Cursor::new(input), &mut out)?;

    let resp: serde_json::Value = serde_json::from_str(std::str::from_utf8(&out)?.trim())?;
    assert_eq!(resp["success"], true);
    assert_eq!(resp["language"], "en");
    Ok(())
}

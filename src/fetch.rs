//! Fetch a missing model file so startup can load it.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tracing::info;

use crate::Result;
use crate::models::ModelSpec;

/// Return the on-disk path of `spec` inside `dir`, downloading it first if absent.
pub fn ensure_model(spec: &ModelSpec, dir: &Path) -> Result<PathBuf> {
    let dest_path = spec.path_in(dir);
    if dest_path.is_file() {
        return Ok(dest_path);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create model dir: {}", dir.display()))?;

    let url = spec.url();
    info!(model = spec.name, %url, dest = %dest_path.display(), "downloading model");

    let client = Client::builder()
        .user_agent(concat!("earshot/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    download_to_path(&client, &url, &dest_path)?;

    info!(dest = %dest_path.display(), "model saved");
    Ok(dest_path)
}

fn download_to_path(client: &Client, url: &str, dest_path: &Path) -> anyhow::Result<()> {
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("request failed: {url}"))?
        .error_for_status()
        .with_context(|| format!("download failed (bad status): {url}"))?;

    let total = resp.content_length();
    download_to_path_with_reader(resp, total, dest_path)
}

/// Stream `reader` into `dest_path` via a `.part` file:
/// fsync, then rename into place. The `.part` file is removed on failure.
fn download_to_path_with_reader<R: Read>(
    mut reader: R,
    total_bytes: Option<u64>,
    dest_path: &Path,
) -> anyhow::Result<()> {
    let pb = match total_bytes {
        Some(total) if total > 0 => ProgressBar::new(total),
        _ => ProgressBar::new_spinner(),
    };
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {bytes}/{total_bytes} {bar:40.cyan/blue} {eta}",
        )
        .map_err(|err| anyhow!("invalid progress template: {err}"))?
        .progress_chars("#>-"),
    );

    let tmp_path = PathBuf::from(format!("{}.part", dest_path.display()));

    let result = (|| -> anyhow::Result<()> {
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

        io::copy(&mut reader, &mut pb.wrap_write(&mut file))
            .with_context(|| format!("failed to write model: {}", tmp_path.display()))?;

        file.sync_all()?;
        fs::rename(&tmp_path, dest_path)
            .with_context(|| format!("failed to move into place: {}", dest_path.display()))?;

        Ok(())
    })();

    pb.finish_and_clear();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lookup_model;

    #[test]
    fn existing_model_is_not_downloaded_again() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let spec = lookup_model("tiny").expect("tiny spec");
        let path = spec.path_in(dir.path());
        std::fs::write(&path, b"weights")?;

        assert_eq!(ensure_model(spec, dir.path())?, path);
        assert_eq!(std::fs::read(&path)?, b"weights");
        Ok(())
    }

    #[test]
    fn reader_contents_land_at_destination() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let dest_path = dir.path().join("ggml-tiny.bin");
        let tmp_path = PathBuf::from(format!("{}.part", dest_path.display()));

        let bytes = b"ggml-weights".to_vec();
        download_to_path_with_reader(
            std::io::Cursor::new(bytes.clone()),
            Some(bytes.len() as u64),
            &dest_path,
        )?;

        assert_eq!(std::fs::read(&dest_path)?, bytes);
        assert!(!tmp_path.exists());
        Ok(())
    }

    #[test]
    fn multi_chunk_download_is_written_whole() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let dest_path = dir.path().join("ggml-base.bin");

        let bytes: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        download_to_path_with_reader(std::io::Cursor::new(bytes.clone()), None, &dest_path)?;

        assert_eq!(std::fs::read(&dest_path)?, bytes);
        Ok(())
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("connection reset"))
        }
    }

    #[test]
    fn failed_download_leaves_no_files_behind() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let dest_path = dir.path().join("ggml-tiny.bin");
        let tmp_path = PathBuf::from(format!("{}.part", dest_path.display()));

        let err = download_to_path_with_reader(FailingReader, None, &dest_path).unwrap_err();
        assert!(format!("{err:#}").contains("connection reset"));
        assert!(!dest_path.exists());
        assert!(!tmp_path.exists());
        Ok(())
    }
}
